use std::fmt;

use crate::config::{enabled, TransportConfig};

/// Connection establishment strategy for the gateway transport
///
/// Invoked once while the client is built. Implementations own the dial
/// timeout, TCP keep-alive and protocol negotiation settings; request-level
/// settings (overall timeout, HTTP/2 health checks) are applied by the client.
pub trait DialStrategy: Send + Sync + fmt::Debug {
    fn configure(
        &self,
        builder: reqwest::ClientBuilder,
        transport: &TransportConfig,
    ) -> reqwest::ClientBuilder;
}

/// Default dialer: TLS connections speaking HTTP/2 only
///
/// rustls offers `h2` as the only ALPN protocol, so the gateway must agree to
/// HTTP/2 during the handshake. Plain `http://` gateway URLs are refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsDialer;

impl DialStrategy for TlsDialer {
    fn configure(
        &self,
        builder: reqwest::ClientBuilder,
        transport: &TransportConfig,
    ) -> reqwest::ClientBuilder {
        let builder = builder
            .use_rustls_tls()
            .https_only(true)
            .http2_prior_knowledge()
            .tcp_keepalive(enabled(transport.tcp_keepalive));

        match enabled(transport.dial_timeout) {
            Some(timeout) => builder.connect_timeout(timeout),
            None => builder,
        }
    }
}
