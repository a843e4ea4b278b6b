use crate::generation::GenerationError;
use crate::host::EditorHost;

/// Configuration key holding the Gemini API key, scoped to the extension.
pub const API_KEY_SETTING: &str = "apiKey";

const API_KEY_PROMPT: &str = "Enter your Gemini API Key";

/// Resolves the Gemini API key from the host configuration, asking the user
/// once and persisting the answer when the configuration holds none.
pub async fn resolve_api_key(host: &dyn EditorHost) -> Result<String, GenerationError> {
    if let Some(api_key) = host.read_setting(API_KEY_SETTING).await?
        && !api_key.is_empty()
    {
        return Ok(api_key);
    }

    let Some(api_key) = host.request_secret(API_KEY_PROMPT).await? else {
        return Err(GenerationError::MissingCredential);
    };

    if api_key.is_empty() {
        return Err(GenerationError::MissingCredential);
    }

    host.write_setting(API_KEY_SETTING, &api_key).await?;
    log::info!("stored a newly entered API key in the editor configuration");

    Ok(api_key)
}
