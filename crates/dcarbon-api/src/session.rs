//! Where the bearer token comes from.
//!
//! The token is read from the provider on every request; nothing is cached
//! here, so a token rotated on disk is picked up by the next call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::ApiError;

pub trait TokenProvider: Send + Sync {
    /// The current token, or `None` when signed out.
    fn token(&self) -> Result<Option<String>, ApiError>;

    /// Obtain a fresh token. Providers that cannot refresh return
    /// [`ApiError::RefreshUnsupported`].
    fn refresh(&self) -> Result<(), ApiError> {
        Err(ApiError::RefreshUnsupported)
    }
}

/// A token fixed at construction, e.g. from `--token` or `DCARBON_TOKEN`.
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.0.clone())
    }
}

/// A token stored in a file, re-read on every request.
pub struct FileToken {
    path: PathBuf,
}

impl FileToken {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenProvider for FileToken {
    fn token(&self) -> Result<Option<String>, ApiError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "token file missing");
                Ok(None)
            }
            Err(source) => Err(ApiError::TokenFile {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Explicit auth context handed to the client.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn TokenProvider>,
}

impl Session {
    pub fn new(provider: impl TokenProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(StaticToken::new(Some(token.into())))
    }

    pub fn signed_out() -> Self {
        Self::new(StaticToken::new(None))
    }

    /// The token to send, or [`ApiError::MissingToken`] before any request
    /// is attempted.
    pub fn bearer(&self) -> Result<String, ApiError> {
        match self.provider.token()? {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ApiError::MissingToken),
        }
    }

    pub fn refresh(&self) -> Result<(), ApiError> {
        self.provider.refresh()
    }
}
