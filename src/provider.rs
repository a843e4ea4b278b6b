use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

use async_trait::async_trait;

/// A durable reference to a file registered with the provider's file API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteImage {
    pub uri: String,
    pub mime_type: String,
}

/// One part of an outbound generation message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessagePart {
    Text(String),
    FileData(RemoteImage),
}

#[derive(Debug)]
pub enum ProviderError {
    Network(reqwest::Error),
    Api { code: u32, status: String, message: String },
    Blocked(Vec<String>),
    Malformed(&'static str),
    Filesystem(io::Error),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => match err.source() {
                Some(source) => write!(f, "{err}: {source}"),
                None => write!(f, "{err}"),
            },
            Self::Api { code, message, .. } => write!(f, "Google error {code}: {message}"),
            Self::Blocked(reasons) => {
                if reasons.is_empty() {
                    write!(f, "request blocked by Google.")
                } else {
                    write!(f, "request blocked by Google: {}.", reasons.join(", "))
                }
            }
            Self::Malformed(message) => f.write_str(message),
            Self::Filesystem(err) => write!(f, "failed to read the file to upload: {err}"),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.without_url())
    }
}

/// Builds provider sessions. `connect` binds an API key and performs no I/O
/// beyond what the concrete provider needs to validate it.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn connect(&self, api_key: &str) -> Result<Box<dyn ProviderSession>, ProviderError>;
}

/// A reusable handle to the generative AI service, bound to one credential.
#[async_trait]
pub trait ProviderSession: Send + Sync {
    /// uploads a local file and returns its durable reference
    async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<RemoteImage, ProviderError>;

    /// submits one composed message and returns the generated text
    async fn generate(
        &self,
        system_instruction: &str,
        parts: &[MessagePart],
    ) -> Result<String, ProviderError>;
}
