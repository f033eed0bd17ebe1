use std::fmt;
use std::time::Duration;

use tracing::info;

/// Default VKPNS gateway base URL
pub const DEFAULT_GATEWAY_URL: &str = "https://vkpns.rustore.ru";

const SEND_PATH_TEMPLATE: &str = "/v1/projects/{project_id}/messages:send";

/// VKPNS project credentials
#[derive(Clone)]
pub struct VkpnsConfig {
    /// RuStore project ID, embedded in the endpoint path
    pub project_id: String,
    /// Service token issued for the project
    pub service_token: String,
    /// Gateway base URL (scheme + host)
    pub gateway_url: String,
}

impl fmt::Debug for VkpnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VkpnsConfig")
            .field("project_id", &self.project_id)
            .field("service_token", &"[REDACTED]")
            .field("gateway_url", &self.gateway_url)
            .finish()
    }
}

impl VkpnsConfig {
    /// Create new VKPNS configuration targeting the default gateway
    pub fn new(project_id: impl Into<String>, service_token: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            service_token: service_token.into(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
        }
    }

    /// Override the gateway base URL
    ///
    /// The default [`TlsDialer`](crate::TlsDialer) only speaks HTTPS: an
    /// `http://` base is accepted here but every send through that dialer
    /// fails with [`VkpnsError::Transport`](crate::VkpnsError::Transport).
    pub fn with_gateway_url(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = gateway_url.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// Missing credentials are left empty; the client factory rejects them.
    pub fn from_env() -> Self {
        Self {
            project_id: std::env::var("VKPNS_PROJECT_ID").unwrap_or_default(),
            service_token: std::env::var("VKPNS_SERVICE_TOKEN").unwrap_or_default(),
            gateway_url: std::env::var("VKPNS_GATEWAY_URL")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string()),
        }
    }

    /// Message send endpoint for this project
    pub fn endpoint(&self) -> String {
        let base = self.gateway_url.trim_end_matches('/');
        let path = SEND_PATH_TEMPLATE.replace("{project_id}", &self.project_id);
        format!("{base}{path}")
    }
}

/// HTTP transport tunables
///
/// A zero duration disables the corresponding setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Maximum time to establish the TLS connection
    pub dial_timeout: Duration,
    /// TCP keep-alive probe interval on open connections
    pub tcp_keepalive: Duration,
    /// HTTP/2 PING health check after this long without inbound frames
    pub read_idle_timeout: Duration,
    /// Overall per-call limit: connect, redirects and body read
    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            dial_timeout: Duration::from_secs(20),
            tcp_keepalive: Duration::from_secs(15),
            read_idle_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl TransportConfig {
    /// Create a TransportConfig from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            dial_timeout: secs_from_env("VKPNS_DIAL_TIMEOUT_SECS").unwrap_or(defaults.dial_timeout),
            tcp_keepalive: secs_from_env("VKPNS_TCP_KEEPALIVE_SECS")
                .unwrap_or(defaults.tcp_keepalive),
            read_idle_timeout: secs_from_env("VKPNS_READ_IDLE_TIMEOUT_SECS")
                .unwrap_or(defaults.read_idle_timeout),
            request_timeout: secs_from_env("VKPNS_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    pub fn with_tcp_keepalive(mut self, interval: Duration) -> Self {
        self.tcp_keepalive = interval;
        self
    }

    pub fn with_read_idle_timeout(mut self, timeout: Duration) -> Self {
        self.read_idle_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Log transport configuration details
    pub fn log_config(&self) {
        info!(
            "VKPNS Transport Configuration: \
             dial_timeout={:?}, tcp_keepalive={:?}, read_idle_timeout={:?}, request_timeout={:?}",
            self.dial_timeout, self.tcp_keepalive, self.read_idle_timeout, self.request_timeout
        );
    }
}

/// `None` for a zero duration
pub(crate) fn enabled(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

fn secs_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
}
