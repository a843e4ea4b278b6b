use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::frameworks::FrameworkCatalog;
use crate::generation::{GenerationError, GenerationRequest, Generator};
use crate::host::{EditorHost, Severity};
use crate::provider::Provider;
use crate::sink;

const PROGRESS_TITLE: &str = "Generating response...";
const SUCCESS_MESSAGE: &str = "Response inserted in editor!";
const BUSY_MESSAGE: &str = "A generation is already in progress.";
const EMPTY_REQUEST_MESSAGE: &str = "No prompt or image provided.";

/// A message posted by the sidebar webview form.
#[derive(Debug, Deserialize)]
#[serde(tag = "command")]
pub enum SidebarMessage {
    #[serde(rename = "sendPrompt", rename_all = "camelCase")]
    SendPrompt {
        prompt: String,
        /// screenshot as a base64 data URL
        image_path: Option<String>,
        framework: Option<String>,
    },
}

/// Receives sidebar messages and runs them through the generation pipeline,
/// reporting progress and outcomes through the host editor.
pub struct Sidebar {
    host: Arc<dyn EditorHost>,
    generator: Generator,
    busy: Mutex<()>,
}

impl Sidebar {
    pub fn new(host: Arc<dyn EditorHost>, provider: Box<dyn Provider>) -> Self {
        Self::with_catalog(host, provider, FrameworkCatalog::default())
    }

    pub fn with_catalog(
        host: Arc<dyn EditorHost>,
        provider: Box<dyn Provider>,
        catalog: FrameworkCatalog,
    ) -> Self {
        Self { host, generator: Generator::new(provider, catalog), busy: Mutex::new(()) }
    }

    /// Handles one raw JSON message posted by the webview. Messages that do not
    /// parse as a known command are logged and ignored.
    pub async fn handle_message(&self, message: &str) {
        match serde_json::from_str(message) {
            Ok(message) => self.dispatch(message).await,
            Err(err) => log::warn!("ignoring an unrecognized sidebar message: {err}"),
        }
    }

    pub async fn dispatch(&self, message: SidebarMessage) {
        match message {
            SidebarMessage::SendPrompt { prompt, image_path, framework } => {
                self.send_prompt(GenerationRequest {
                    prompt,
                    framework: framework.filter(|framework| !framework.is_empty()),
                    image: image_path.filter(|path| !path.is_empty()),
                })
                .await;
            }
        }
    }

    async fn send_prompt(&self, request: GenerationRequest) {
        let Ok(_busy) = self.busy.try_lock() else {
            log::warn!("rejecting a sendPrompt message while a generation is in flight");
            self.notify(Severity::Warning, BUSY_MESSAGE).await;
            return;
        };

        if request.prompt.is_empty() && request.image.is_none() {
            self.notify(Severity::Warning, EMPTY_REQUEST_MESSAGE).await;
            return;
        }

        log::info!(
            "running sendPrompt {:?} (framework: {:?}, image attached: {})",
            request.prompt,
            request.framework,
            request.image.is_some()
        );

        if let Err(err) = self.host.begin_progress(PROGRESS_TITLE).await {
            log::warn!("failed to show the progress indicator: {err}");
        }

        let outcome = self.run(request).await;

        if let Err(err) = self.host.end_progress().await {
            log::warn!("failed to hide the progress indicator: {err}");
        }

        match outcome {
            Ok(()) => self.notify(Severity::Info, SUCCESS_MESSAGE).await,
            Err(err) => {
                log::error!("sendPrompt failed: {err}");
                self.notify(Severity::Error, &format!("Error: {err}")).await;
            }
        }
    }

    async fn run(&self, request: GenerationRequest) -> Result<(), GenerationError> {
        let result = self.generator.generate(self.host.as_ref(), &request).await?;
        sink::deliver(self.host.as_ref(), result).await?;
        Ok(())
    }

    async fn notify(&self, severity: Severity, message: &str) {
        if let Err(err) = self.host.show_notification(severity, message).await {
            log::error!("failed to report the previous message to the editor: {err}");
        }
    }
}
