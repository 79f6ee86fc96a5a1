//! The two user-facing seams: confirmation dialogs and toast notifications.

use std::sync::Arc;

use dcarbon_api::ApiError;
use dcarbon_core::ValidationError;
use tracing::{error, info};

use crate::ScreenError;

pub trait Confirm: Send + Sync {
    /// Ask the operator; `true` to go ahead.
    fn confirm(&self, prompt: &str) -> bool;
}

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Confirms everything. For scripted use (`--yes`).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        info!(prompt, "auto-confirmed");
        true
    }
}

/// Sends notifications to the log only.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(message, "success");
    }

    fn error(&self, message: &str) {
        error!(message, "error");
    }
}

#[derive(Clone)]
pub struct Ui {
    confirm: Arc<dyn Confirm>,
    notifier: Arc<dyn Notifier>,
}

impl Ui {
    pub fn new(confirm: impl Confirm + 'static, notifier: impl Notifier + 'static) -> Self {
        Self {
            confirm: Arc::new(confirm),
            notifier: Arc::new(notifier),
        }
    }

    pub fn from_arcs(confirm: Arc<dyn Confirm>, notifier: Arc<dyn Notifier>) -> Self {
        Self { confirm, notifier }
    }

    /// `Err(Declined)` unless the operator agrees.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<(), ScreenError> {
        if self.confirm.confirm(prompt) {
            Ok(())
        } else {
            info!(prompt, "declined");
            Err(ScreenError::Declined)
        }
    }

    /// Toast the outcome of a mutation.
    pub(crate) fn report<T>(
        &self,
        result: Result<T, ApiError>,
        success: &str,
    ) -> Result<T, ScreenError> {
        match result {
            Ok(value) => {
                self.notifier.success(success);
                Ok(value)
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Toast a client-side validation failure.
    pub(crate) fn invalid(&self, e: ValidationError) -> ScreenError {
        self.notifier.error(&e.to_string());
        e.into()
    }

    pub(crate) fn unknown(&self, id: &str) -> ScreenError {
        self.invalid(ValidationError::UnknownRecord(id.to_string()))
    }
}
