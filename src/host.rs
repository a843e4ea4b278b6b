use std::fmt;

use async_trait::async_trait;

/// Notification levels offered by the host editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// An error reported by the host editor while performing a requested action.
#[derive(Debug)]
pub struct HostError {
    pub message: String,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self { message: message.into() }
    }
}

/// The editor capabilities the generation pipeline depends on. The embedding
/// extension implements this once over its editor's extension API.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// reads an extension-scoped configuration value
    async fn read_setting(&self, key: &str) -> Result<Option<String>, HostError>;

    /// persists an extension-scoped configuration value
    async fn write_setting(&self, key: &str, value: &str) -> Result<(), HostError>;

    /// prompts the user for a masked secret; `None` means the prompt was dismissed
    async fn request_secret(&self, prompt: &str) -> Result<Option<String>, HostError>;

    async fn begin_progress(&self, title: &str) -> Result<(), HostError>;

    async fn end_progress(&self) -> Result<(), HostError>;

    /// inserts text at the focused editor's cursor; returns `false` when no
    /// editable document is focused
    async fn insert_at_cursor(&self, text: &str) -> Result<bool, HostError>;

    /// opens a new document holding `content` and focuses it
    async fn open_document(&self, content: &str) -> Result<(), HostError>;

    async fn show_notification(&self, severity: Severity, message: &str) -> Result<(), HostError>;
}
