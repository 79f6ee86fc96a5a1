use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://services.dcarbon.solutions";

/// Connection settings for [`AdminClient`](crate::AdminClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host, no trailing slash, e.g. `https://services.dcarbon.solutions`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("dcarbon-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
