use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Send request body: `{"message": ...}`
#[derive(Debug, Serialize)]
pub(crate) struct PushRequest<'a> {
    pub message: &'a Message,
}

/// Push notification for a single device
///
/// Empty fields are left out of the payload entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Push token obtained by the application on the device
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// Custom "key": "value" pairs
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    /// Cross-platform notification template
    #[serde(skip_serializing_if = "Notification::is_empty")]
    pub notification: Notification,
    /// Android specific options
    #[serde(skip_serializing_if = "AndroidConfig::is_empty")]
    pub android: AndroidConfig,
}

impl Message {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = notification;
        self
    }

    pub fn with_android(mut self, android: AndroidConfig) -> Self {
        self.android = android;
        self
    }
}

/// Notification fields shared by all platforms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Image URL shown in the notification
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image: String::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty() && self.image.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// How long the gateway keeps an undelivered message, e.g. "3.5s"
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ttl: String,
    #[serde(skip_serializing_if = "AndroidNotification::is_empty")]
    pub notification: AndroidNotification,
}

impl AndroidConfig {
    /// Set the TTL in the gateway's seconds notation
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = format!("{}s", ttl.as_secs_f64());
        self
    }

    pub fn with_notification(mut self, notification: AndroidNotification) -> Self {
        self.notification = notification;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ttl.is_empty() && self.notification.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidNotification {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    /// Icon color, `#rrggbb`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub click_action: String,
    #[serde(skip_serializing_if = "ClickActionType::is_default")]
    pub click_action_type: ClickActionType,
}

impl AndroidNotification {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.body.is_empty()
            && self.icon.is_empty()
            && self.color.is_empty()
            && self.image.is_empty()
            && self.channel_id.is_empty()
            && self.click_action.is_empty()
            && self.click_action_type.is_default()
    }
}

/// How the device interprets `click_action`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ClickActionType {
    /// Used as an intent action
    #[default]
    IntentAction,
    /// Used as a deep link
    DeepLink,
}

impl ClickActionType {
    pub fn is_default(&self) -> bool {
        *self == ClickActionType::IntentAction
    }
}

impl From<ClickActionType> for u8 {
    fn from(value: ClickActionType) -> Self {
        match value {
            ClickActionType::IntentAction => 0,
            ClickActionType::DeepLink => 1,
        }
    }
}

impl TryFrom<u8> for ClickActionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ClickActionType::IntentAction),
            1 => Ok(ClickActionType::DeepLink),
            other => Err(format!("unknown click_action_type: {other}")),
        }
    }
}

/// VKPNS gateway reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Numeric error code
    pub code: i32,
    /// Detailed error description
    pub message: String,
    /// Symbolic error code
    pub status: String,
}

impl Response {
    /// Known status value, `None` for anything outside the documented vocabulary
    pub fn gateway_status(&self) -> Option<GatewayStatus> {
        self.status.parse().ok()
    }
}

/// Status codes documented by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayStatus {
    /// Request parameters are wrong
    InvalidArgument,
    /// Gateway internal error
    Internal,
    /// Send attempts exceeded
    TooManyRequests,
    /// Service token is wrong
    PermissionDenied,
    /// Push token is wrong
    NotFound,
}

impl GatewayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayStatus::InvalidArgument => "INVALID_ARGUMENT",
            GatewayStatus::Internal => "INTERNAL",
            GatewayStatus::TooManyRequests => "TOO_MANY_REQUESTS",
            GatewayStatus::PermissionDenied => "PERMISSION_DENIED",
            GatewayStatus::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for GatewayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INVALID_ARGUMENT" => Ok(GatewayStatus::InvalidArgument),
            "INTERNAL" => Ok(GatewayStatus::Internal),
            "TOO_MANY_REQUESTS" => Ok(GatewayStatus::TooManyRequests),
            "PERMISSION_DENIED" => Ok(GatewayStatus::PermissionDenied),
            "NOT_FOUND" => Ok(GatewayStatus::NotFound),
            other => Err(format!("unknown gateway status: {other}")),
        }
    }
}
