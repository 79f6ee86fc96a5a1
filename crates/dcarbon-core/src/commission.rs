//! Commission tiers and structures as served by `/api/commission-tier` and
//! `/api/commission-structure`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::format::format_amount;
use crate::names::{humanize, parse_wire, wire_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Commercial,
    Residential,
}

/// How a deal was sourced. Decides which shares a commission structure carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionMode {
    DirectCustomer,
    ReferredCustomer,
    PartnerInstaller,
    PartnerSalesAgent,
    PartnerFinance,
    EpcAssistedFinance,
    EpcAssistedInstaller,
}

/// One of the four share columns of a commission structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareField {
    Customer,
    Installer,
    SalesAgent,
    Finance,
}

impl ShareField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Installer => "Installer",
            Self::SalesAgent => "Sales Agent",
            Self::Finance => "Finance",
        }
    }
}

impl CommissionMode {
    pub const ALL: [CommissionMode; 7] = [
        Self::DirectCustomer,
        Self::ReferredCustomer,
        Self::PartnerInstaller,
        Self::PartnerSalesAgent,
        Self::PartnerFinance,
        Self::EpcAssistedFinance,
        Self::EpcAssistedInstaller,
    ];

    /// Share columns displayed for this mode in the tier matrix.
    pub fn display_fields(self) -> &'static [ShareField] {
        match self {
            Self::DirectCustomer => &[ShareField::Customer],
            Self::ReferredCustomer => &[ShareField::Customer, ShareField::SalesAgent],
            Self::PartnerInstaller => &[ShareField::Installer, ShareField::Customer],
            Self::PartnerSalesAgent => &[ShareField::SalesAgent, ShareField::Customer],
            Self::PartnerFinance => &[ShareField::Finance, ShareField::Installer],
            Self::EpcAssistedFinance => &[ShareField::Finance],
            Self::EpcAssistedInstaller => &[ShareField::Installer],
        }
    }

    pub fn is_epc_assisted(self) -> bool {
        matches!(self, Self::EpcAssistedFinance | Self::EpcAssistedInstaller)
    }

    /// The other leg of an EPC-assisted pair.
    pub fn epc_counterpart(self) -> Option<CommissionMode> {
        match self {
            Self::EpcAssistedFinance => Some(Self::EpcAssistedInstaller),
            Self::EpcAssistedInstaller => Some(Self::EpcAssistedFinance),
            _ => None,
        }
    }

    /// The share an EPC-assisted leg contributes toward the partner finance total.
    pub fn epc_leg_field(self) -> Option<ShareField> {
        match self {
            Self::EpcAssistedFinance => Some(ShareField::Finance),
            Self::EpcAssistedInstaller => Some(ShareField::Installer),
            _ => None,
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::EpcAssistedFinance => "EPC Assisted Finance".to_string(),
            Self::EpcAssistedInstaller => "EPC Assisted Installer".to_string(),
            other => humanize(&wire_name(&other)),
        }
    }
}

impl fmt::Display for CommissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

impl FromStr for CommissionMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("mode", s)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

impl FromStr for PropertyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("property type", s)
    }
}

/// A commission tier: an ordered amount band used as a column of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionTier {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub label: String,
    pub min_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub order: i32,
}

impl CommissionTier {
    /// `$0 - $50,000`, or `$500,000+` for an open-ended tier.
    pub fn range_label(&self) -> String {
        match self.max_amount {
            Some(max) => {
                let min = format_amount(self.min_amount);
                format!("{min} - {}", format_amount(max))
            }
            None => format!("{}+", format_amount(self.min_amount)),
        }
    }
}

/// Sort tiers for display: ascending `order`, ties broken by `minAmount`.
pub fn sort_tiers(tiers: &mut [CommissionTier]) {
    tiers.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then(a.min_amount.total_cmp(&b.min_amount))
    });
}

/// Percentage shares and contract terms for one (property type, mode, tier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionStructure {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub property_type: PropertyType,
    pub mode: CommissionMode,
    pub tier_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_share: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_share: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_agent_share: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_share: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_yrs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_cap: Option<f64>,
}

impl CommissionStructure {
    /// An empty structure for the given key, to be filled in by a form.
    pub fn new(property_type: PropertyType, mode: CommissionMode, tier_id: &str) -> Self {
        Self {
            id: String::new(),
            property_type,
            mode,
            tier_id: tier_id.to_string(),
            customer_share: None,
            installer_share: None,
            sales_agent_share: None,
            finance_share: None,
            max_duration: None,
            agreement_yrs: None,
            cancellation_fee: None,
            annual_cap: None,
        }
    }

    pub fn share(&self, field: ShareField) -> Option<f64> {
        match field {
            ShareField::Customer => self.customer_share,
            ShareField::Installer => self.installer_share,
            ShareField::SalesAgent => self.sales_agent_share,
            ShareField::Finance => self.finance_share,
        }
    }

    pub fn set_share(&mut self, field: ShareField, value: Option<f64>) {
        match field {
            ShareField::Customer => self.customer_share = value,
            ShareField::Installer => self.installer_share = value,
            ShareField::SalesAgent => self.sales_agent_share = value,
            ShareField::Finance => self.finance_share = value,
        }
    }

    /// Finance share plus installer share. A missing share counts as zero.
    pub fn partner_finance_total(&self) -> f64 {
        self.finance_share.unwrap_or(0.0) + self.installer_share.unwrap_or(0.0)
    }
}
