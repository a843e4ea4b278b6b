use crate::generation::GenerationResult;
use crate::host::{EditorHost, HostError, Severity};

const NO_EDITOR_WARNING: &str = "No active text editor found. Opening a new file.";

/// Places the generated text into the editor: at the cursor of the focused
/// document, or in a new document when nothing is focused. The text is
/// inserted exactly as generated.
pub async fn deliver(host: &dyn EditorHost, result: GenerationResult) -> Result<(), HostError> {
    if host.insert_at_cursor(&result.text).await? {
        return Ok(());
    }

    log::warn!("no active text editor, falling back to a new document");
    host.show_notification(Severity::Warning, NO_EDITOR_WARNING).await?;
    host.open_document(&result.text).await
}
