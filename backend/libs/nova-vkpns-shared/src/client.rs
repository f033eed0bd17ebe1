use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::config::{enabled, TransportConfig, VkpnsConfig};
use crate::context::SendContext;
use crate::dialer::{DialStrategy, TlsDialer};
use crate::errors::{CredentialField, VkpnsError};
use crate::models::{Message, PushRequest, Response};

const BEARER_PREFIX: &str = "Bearer ";

/// Gateway operations, for services that hold the client as a trait object
#[async_trait::async_trait]
pub trait PushGateway: Send + Sync {
    /// Deliver a message; see [`VkpnsClient::send`]
    async fn send(&self, message: &Message, ctx: &SendContext) -> Result<Response, VkpnsError>;

    /// Validate a message without delivering it
    async fn send_dry_run(
        &self,
        message: &Message,
        ctx: &SendContext,
    ) -> Result<Response, VkpnsError>;
}

pub type DynPushGateway = std::sync::Arc<dyn PushGateway>;

/// VK Push Notification Service (VKPNS) client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct VkpnsClient {
    project_id: String,
    endpoint: String,
    authorization: String,
    http_client: reqwest::Client,
}

impl fmt::Debug for VkpnsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VkpnsClient")
            .field("project_id", &self.project_id)
            .field("endpoint", &self.endpoint)
            .field("authorization", &"[REDACTED]")
            .finish()
    }
}

impl VkpnsClient {
    /// Create new VKPNS client with default transport settings
    pub fn new(config: VkpnsConfig) -> Result<Self, VkpnsError> {
        Self::with_transport(config, TransportConfig::default())
    }

    /// Create new VKPNS client from `VKPNS_*` environment variables
    pub fn from_env() -> Result<Self, VkpnsError> {
        Self::with_transport(VkpnsConfig::from_env(), TransportConfig::from_env())
    }

    pub fn with_transport(
        config: VkpnsConfig,
        transport: TransportConfig,
    ) -> Result<Self, VkpnsError> {
        Self::with_dialer(config, transport, &TlsDialer)
    }

    /// Create new VKPNS client
    ///
    /// # Arguments
    /// * `config` - Project ID, service token and gateway URL
    /// * `transport` - Timeouts and keep-alive settings
    /// * `dialer` - Connection establishment strategy
    ///
    /// Credentials are checked before any transport object is built. No
    /// network I/O happens here.
    pub fn with_dialer(
        config: VkpnsConfig,
        transport: TransportConfig,
        dialer: &dyn DialStrategy,
    ) -> Result<Self, VkpnsError> {
        if config.project_id.is_empty() {
            return Err(VkpnsError::MissingCredential(CredentialField::ProjectId));
        }
        if config.service_token.is_empty() {
            return Err(VkpnsError::MissingCredential(CredentialField::ServiceToken));
        }

        let mut builder = dialer
            .configure(reqwest::Client::builder(), &transport)
            .http2_keep_alive_interval(enabled(transport.read_idle_timeout))
            .http2_keep_alive_while_idle(true);
        if let Some(timeout) = enabled(transport.request_timeout) {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(VkpnsError::ClientBuild)?;

        let endpoint = config.endpoint();
        info!(
            "Initialized VKPNS client for project_id={}, endpoint={}",
            config.project_id, endpoint
        );

        Ok(Self {
            authorization: format!("{BEARER_PREFIX}{}", config.service_token),
            project_id: config.project_id,
            endpoint,
            http_client,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Resolved message send endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a message to the VKPNS gateway
    ///
    /// Any HTTP status is accepted; the body is decoded into a [`Response`]
    /// and its `status` is left for the caller to interpret. Nothing is
    /// retried. The call ends early with `Canceled` or `DeadlineExceeded`
    /// when `ctx` is done first.
    pub async fn send(
        &self,
        message: &Message,
        ctx: &SendContext,
    ) -> Result<Response, VkpnsError> {
        let body = serde_json::to_vec(&PushRequest { message }).map_err(VkpnsError::Encoding)?;

        let request = self
            .http_client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .body(body);

        // The response (and its connection) is released when this future
        // finishes or is dropped by the context.
        let (status, raw) = ctx
            .run(async {
                let response = request.send().await.map_err(|e| {
                    warn!("VKPNS send failed for project_id={}: {}", self.project_id, e);
                    VkpnsError::Transport(e)
                })?;
                let status = response.status();
                let raw = response.bytes().await.map_err(VkpnsError::Io)?;
                Ok::<_, VkpnsError>((status, raw))
            })
            .await??;

        debug!(
            status = %status,
            body = %String::from_utf8_lossy(&raw),
            "VKPNS response received"
        );

        serde_json::from_slice(&raw).map_err(VkpnsError::Decoding)
    }

    /// Not supported by this client; always fails without network I/O
    pub async fn send_dry_run(
        &self,
        _message: &Message,
        _ctx: &SendContext,
    ) -> Result<Response, VkpnsError> {
        Err(VkpnsError::NotImplemented)
    }
}

#[async_trait::async_trait]
impl PushGateway for VkpnsClient {
    async fn send(&self, message: &Message, ctx: &SendContext) -> Result<Response, VkpnsError> {
        VkpnsClient::send(self, message, ctx).await
    }

    async fn send_dry_run(
        &self,
        message: &Message,
        ctx: &SendContext,
    ) -> Result<Response, VkpnsError> {
        VkpnsClient::send_dry_run(self, message, ctx).await
    }
}
