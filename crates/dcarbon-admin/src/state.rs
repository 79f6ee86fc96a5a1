use dcarbon_api::ApiError;

use crate::ScreenError;

/// One fetched slot of screen state.
///
/// A failed fetch records its message and keeps whatever was loaded before,
/// so a screen never shows a half-overwritten list.
#[derive(Debug, Clone)]
pub struct Loadable<T> {
    data: Option<T>,
    error: Option<String>,
    loading: bool,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

impl<T> Loadable<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn apply(&mut self, result: Result<T, ApiError>) -> Result<(), ScreenError> {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn set(&mut self, data: T) {
        self.data = Some(data);
        self.error = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The data, or `NotLoaded(what)`.
    pub fn require(&self, what: &'static str) -> Result<&T, ScreenError> {
        self.data.as_ref().ok_or(ScreenError::NotLoaded(what))
    }
}
