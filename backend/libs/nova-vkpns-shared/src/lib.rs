/// Nova VKPNS Shared Library
///
/// This library provides a client for the VK Push Notification Service
/// (VKPNS, the RuStore push gateway) used to deliver push notifications to
/// Android devices across the Nova platform.
///
/// It handles:
/// - Credential validation and endpoint resolution per project
/// - HTTP/2 transport setup with dial timeout, keep-alive and health checks
/// - Message serialization with empty-field omission
/// - Caller-driven cancellation and deadlines
/// - Decoding of the gateway's `{code, message, status}` reply
pub mod client;
pub mod config;
pub mod context;
pub mod dialer;
pub mod errors;
pub mod models;

pub use client::{DynPushGateway, PushGateway, VkpnsClient};
pub use config::{TransportConfig, VkpnsConfig, DEFAULT_GATEWAY_URL};
pub use context::SendContext;
pub use dialer::{DialStrategy, TlsDialer};
pub use errors::{CredentialField, VkpnsError};
pub use models::{
    AndroidConfig, AndroidNotification, ClickActionType, GatewayStatus, Message, Notification,
    Response,
};
pub use tokio_util::sync::CancellationToken;
