use thiserror::Error;

/// Client-side checks that stop an action before any request is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a rejection reason is required")]
    BlankReason,

    #[error("facility cannot be verified: {0}")]
    VerificationBlocked(String),

    #[error("no record with id {0}")]
    UnknownRecord(String),

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
