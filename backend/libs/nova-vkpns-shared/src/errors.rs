use std::fmt;

use thiserror::Error;

/// Credential field that was blank at client construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    ProjectId,
    ServiceToken,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialField::ProjectId => write!(f, "project_id"),
            CredentialField::ServiceToken => write!(f, "service_token"),
        }
    }
}

/// VKPNS Client Error Types
#[derive(Error, Debug)]
pub enum VkpnsError {
    #[error("No data to access VKPNS: {0}")]
    MissingCredential(CredentialField),

    #[error("Failed to encode push message: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("VKPNS send request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("VKPNS send canceled")]
    Canceled,

    #[error("VKPNS send deadline exceeded")]
    DeadlineExceeded,

    #[error("Failed to read VKPNS response body: {0}")]
    Io(#[source] reqwest::Error),

    #[error("Failed to parse VKPNS response: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("Method is not implemented")]
    NotImplemented,
}

impl From<VkpnsError> for String {
    fn from(err: VkpnsError) -> Self {
        err.to_string()
    }
}
