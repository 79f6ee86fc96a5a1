//! Utility providers, provider requests, and utility-data authorizations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountStatus;
use crate::names::wire_name;

/// Meter-data provider that hosts the customer-facing authorization flow.
pub const INSTAPULL_BASE_URL: &str = "https://main.instapull.io";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityProvider {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

/// A user's request to add a utility provider that is not listed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityProviderRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub requested_by: Option<String>,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationStatus {
    Pending,
    Authorized,
    Failed,
    Expired,
}

impl AuthorizationStatus {
    /// No further change is expected once a terminal status is reached.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityAuthorization {
    pub id: String,
    pub customer_email: String,
    pub utility: String,
    pub status: AuthorizationStatus,
    #[serde(default)]
    pub authorization_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UtilityAuthorization {
    /// Where the customer completes the authorization. Falls back to the
    /// provider's landing page keyed by our reference when the server sent
    /// no explicit URL.
    pub fn external_url(&self) -> String {
        match self.authorization_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{INSTAPULL_BASE_URL}/authorize?ref={}", self.id),
        }
    }
}

/// Body of the Green Button authorization POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GreenButtonRequest {
    pub customer_email: String,
    pub utility: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
}
