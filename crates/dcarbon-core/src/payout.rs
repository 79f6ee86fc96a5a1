//! Payout requests raised by partners and reviewed by admins.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::names::{parse_wire, wire_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    Pending,
    Paid,
    Rejected,
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

impl FromStr for PayoutStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("payout status", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub invoice_url: Option<String>,
    pub status: PayoutStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PayoutRequest {
    /// Only pending requests can be approved or rejected.
    pub fn is_actionable(&self) -> bool {
        self.status == PayoutStatus::Pending
    }

    pub fn requester(&self) -> &str {
        self.user_name
            .as_deref()
            .or(self.user_email.as_deref())
            .unwrap_or(&self.user_id)
    }
}

/// Totals shown above the payout list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayoutSummary {
    pub pending_count: usize,
    pub pending_amount: f64,
    pub paid_count: usize,
    pub paid_amount: f64,
    pub rejected_count: usize,
}

impl PayoutSummary {
    pub fn from_requests(requests: &[PayoutRequest]) -> Self {
        requests.iter().fold(Self::default(), |mut acc, r| {
            match r.status {
                PayoutStatus::Pending => {
                    acc.pending_count += 1;
                    acc.pending_amount += r.amount;
                }
                PayoutStatus::Paid => {
                    acc.paid_count += 1;
                    acc.paid_amount += r.amount;
                }
                PayoutStatus::Rejected => acc.rejected_count += 1,
            }
            acc
        })
    }
}
