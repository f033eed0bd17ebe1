//! Send a single push notification through VKPNS
//!
//! ```bash
//! export VKPNS_PROJECT_ID="my-project"
//! export VKPNS_SERVICE_TOKEN="..."
//! RUST_LOG=nova_vkpns_shared=debug cargo run -p nova-vkpns-shared --example send_push -- <device-token>
//! ```

use std::time::Duration;

use nova_vkpns_shared::{
    AndroidConfig, Message, Notification, SendContext, TransportConfig, VkpnsClient, VkpnsConfig,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let device_token = std::env::args()
        .nth(1)
        .ok_or("usage: send_push <device-token>")?;

    let transport = TransportConfig::from_env();
    transport.log_config();

    let client = VkpnsClient::with_transport(VkpnsConfig::from_env(), transport)?;

    let message = Message::new(device_token)
        .with_notification(Notification::new("Nova", "Hello from Nova"))
        .with_android(AndroidConfig::default().with_ttl(Duration::from_secs(3600)));

    let ctx = SendContext::background().with_timeout(Duration::from_secs(10));
    match client.send(&message, &ctx).await {
        Ok(response) => info!(
            "VKPNS replied code={}, status={}, message={}",
            response.code, response.status, response.message
        ),
        Err(e) => {
            error!("VKPNS send failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
