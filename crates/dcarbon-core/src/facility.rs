//! Facility document checklist and the "verify facility" gate.
//!
//! Facilities carry their documents as flattened fields: for a slot with key
//! `financeAgreement` the server sends `financeAgreementUrl`,
//! `financeAgreementStatus` and `financeAgreementRejectionReason`. The slot
//! list per facility kind is fixed here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ValidationError;
use crate::names::{parse_wire, wire_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Commercial,
    Residential,
}

impl FacilityKind {
    /// Path segment used by the facility endpoints.
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Residential => "residential",
        }
    }

    pub fn document_slots(self) -> &'static [DocumentSlot] {
        match self {
            Self::Commercial => COMMERCIAL_DOCUMENTS,
            Self::Residential => RESIDENTIAL_DOCUMENTS,
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for FacilityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Ok(Self::Commercial),
            "residential" => Ok(Self::Residential),
            _ => Err(ValidationError::InvalidValue {
                field: "facility kind",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Required,
    Submitted,
    Approved,
    Rejected,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityStatus {
    Pending,
    Active,
    Verified,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

/// A named document every facility of a kind is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSlot {
    /// Field prefix and endpoint segment, e.g. `financeAgreement`.
    pub key: &'static str,
    pub label: &'static str,
    pub mandatory: bool,
}

const fn slot(key: &'static str, label: &'static str, mandatory: bool) -> DocumentSlot {
    DocumentSlot {
        key,
        label,
        mandatory,
    }
}

pub const COMMERCIAL_DOCUMENTS: &[DocumentSlot] = &[
    slot(
        "wregisAssignment",
        "WREGIS Assignment of Registration Rights",
        true,
    ),
    slot("financeAgreement", "Finance Agreement / PPA", true),
    slot(
        "solarInstallationContract",
        "Solar Installation Contract",
        true,
    ),
    slot(
        "interconnectionAgreement",
        "Utility Interconnection Agreement",
        true,
    ),
    slot("ptoLetter", "Utility PTO Email / Letter", true),
    slot("singleLineDiagram", "Single Line Diagram", true),
    slot("siteLocationMap", "Site Location with Module Layout", true),
    slot(
        "panelInverterDatasheet",
        "Panel and Inverter Datasheets",
        true,
    ),
    slot("revenueMeterDatasheet", "Revenue Meter Datasheet", true),
    slot(
        "utilityMeterPhoto",
        "Utility Meter Photo with Serial #",
        true,
    ),
    slot(
        "assignmentOfRegistrationRight",
        "Acknowledgement of Station Service",
        false,
    ),
    slot("businessLicense", "Business License", false),
];

pub const RESIDENTIAL_DOCUMENTS: &[DocumentSlot] = &[
    slot("financeAgreement", "Finance Agreement / PPA", true),
    slot(
        "solarInstallationContract",
        "Solar Installation Contract",
        true,
    ),
    slot(
        "interconnectionAgreement",
        "Utility Interconnection Agreement",
        true,
    ),
    slot("ptoLetter", "Utility PTO Email / Letter", true),
    slot("singleLineDiagram", "Single Line Diagram", true),
    slot("installationSitePlan", "Installation Site Plan", true),
    slot(
        "panelInverterDatasheet",
        "Panel and Inverter Datasheets",
        true,
    ),
    slot(
        "utilityMeterPhoto",
        "Utility Meter Photo with Serial #",
        true,
    ),
    slot("nemAgreement", "Net Energy Metering Agreement", false),
    slot("homeownerId", "Homeowner ID", false),
];

/// A commercial or residential facility as returned by the facility endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    #[serde(alias = "name")]
    pub facility_name: String,
    pub status: FacilityStatus,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub utility_provider: Option<String>,
    #[serde(default)]
    pub system_capacity: Option<f64>,
    /// Everything else, including the per-document fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Facility {
    fn text_field(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// The checklist for this facility's documents under `kind`'s slot list.
    pub fn checklist(&self, kind: FacilityKind) -> DocumentChecklist {
        let entries = kind
            .document_slots()
            .iter()
            .map(|slot| {
                let url = self.text_field(&format!("{}Url", slot.key));
                let reported = self
                    .fields
                    .get(&format!("{}Status", slot.key))
                    .and_then(|v| serde_json::from_value::<DocumentStatus>(v.clone()).ok());
                DocumentEntry {
                    slot: *slot,
                    status: effective_status(url.as_deref(), reported),
                    url,
                    rejection_reason: self.text_field(&format!("{}RejectionReason", slot.key)),
                }
            })
            .collect();
        DocumentChecklist {
            facility_status: self.status,
            entries,
        }
    }
}

/// Status shown for a document: `REQUIRED` without a URL, `SUBMITTED` when a
/// URL exists but the server reported no status, otherwise the server's.
pub fn effective_status(url: Option<&str>, reported: Option<DocumentStatus>) -> DocumentStatus {
    match (url.map(str::trim).filter(|u| !u.is_empty()), reported) {
        (None, _) => DocumentStatus::Required,
        (Some(_), None) => DocumentStatus::Submitted,
        (Some(_), Some(status)) => status,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry {
    pub slot: DocumentSlot,
    pub url: Option<String>,
    pub status: DocumentStatus,
    pub rejection_reason: Option<String>,
}

/// One facility's documents with their effective statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChecklist {
    pub facility_status: FacilityStatus,
    pub entries: Vec<DocumentEntry>,
}

impl DocumentChecklist {
    /// Mandatory documents that are not yet approved.
    pub fn blocking(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries
            .iter()
            .filter(|e| e.slot.mandatory && e.status != DocumentStatus::Approved)
    }

    /// Whether "Verify Facility" is enabled: every mandatory document is
    /// approved and the facility is not verified already.
    pub fn can_verify(&self) -> bool {
        self.facility_status != FacilityStatus::Verified && self.blocking().next().is_none()
    }

    /// `Ok` when the facility may be verified, otherwise the reason it may not.
    pub fn check_verifiable(&self) -> Result<(), ValidationError> {
        if self.facility_status == FacilityStatus::Verified {
            return Err(ValidationError::VerificationBlocked(
                "facility is already verified".into(),
            ));
        }
        let pending: Vec<&str> = self.blocking().map(|e| e.slot.label).collect();
        if !pending.is_empty() {
            return Err(ValidationError::VerificationBlocked(format!(
                "awaiting approval of {}",
                pending.join(", ")
            )));
        }
        Ok(())
    }

    pub fn entry(&self, key: &str) -> Option<&DocumentEntry> {
        self.entries.iter().find(|e| e.slot.key == key)
    }

    pub fn count(&self, status: DocumentStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

/// A non-blank reason attached to a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn new(reason: &str) -> Result<Self, ValidationError> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankReason);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RejectionReason {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Body of the per-document status PUT.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDecision {
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
}

impl DocumentDecision {
    pub fn approve() -> Self {
        Self {
            status: DocumentStatus::Approved,
            rejection_reason: None,
        }
    }

    pub fn reject(reason: RejectionReason) -> Self {
        Self {
            status: DocumentStatus::Rejected,
            rejection_reason: Some(reason),
        }
    }
}

/// Parse a document status typed by an operator (`approved`, `REJECTED`, ...).
pub fn parse_document_status(s: &str) -> Result<DocumentStatus, ValidationError> {
    parse_wire("document status", s)
}
