use std::path::PathBuf;

use thiserror::Error;

/// Shown when a failed response carries no `message` of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not signed in: no auth token available")]
    MissingToken,

    #[error("token refresh is not supported by this session")]
    RefreshUnsupported,

    #[error("could not read token file {path}: {source}")]
    TokenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, or a 2xx whose envelope status was not `success`.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contained no data")]
    MissingData,
}

impl ApiError {
    /// HTTP status of a server-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingToken) || self.status() == Some(401)
    }
}
