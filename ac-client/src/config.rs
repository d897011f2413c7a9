//! Client configuration

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backend address used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "https://localhost:8443";

/// Client configuration for connecting to the reporting backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://reports.example.org")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Trust any server certificate.
    ///
    /// Some deployments run the backend with a self-signed certificate.
    /// Off by default.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Trust self-signed / invalid server certificates
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Base URL without trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
