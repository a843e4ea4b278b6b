use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::provider::{MessagePart, Provider, ProviderError, ProviderSession, RemoteImage};

pub const MODEL: &str = "gemini-1.5-flash";

const BASE_URL: &str = "https://generativelanguage.googleapis.com";
const TEMPERATURE: f64 = 1.;
const TOP_P: f64 = 0.95;
const TOP_K: u16 = 64;
const MAX_OUTPUT_TOKENS: u16 = 8192;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content<'a>],
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
    role: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    FileData(FileData<'a>),
}

impl<'a> From<&'a MessagePart> for Part<'a> {
    fn from(part: &'a MessagePart) -> Self {
        match part {
            MessagePart::Text(text) => Self::Text(text),
            MessagePart::FileData(image) => {
                Self::FileData(FileData { mime_type: &image.mime_type, file_uri: &image.uri })
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u16,
    max_output_tokens: u16,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: Option<ContentResponse>,
}

#[derive(Deserialize)]
pub struct ContentResponse {
    pub parts: Option<Vec<PartResponse>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartResponse {
    Text(String),
    InlineData(Blob),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub safety_ratings: Option<Vec<SafetyRating>>,
}

#[derive(Deserialize)]
pub struct SafetyRating {
    pub category: String,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Serialize)]
struct StartUploadRequest<'a> {
    file: UploadMetadata<'a>,
}

#[derive(Serialize)]
struct UploadMetadata<'a> {
    display_name: &'a str,
}

#[derive(Deserialize)]
pub struct FileResponse {
    pub file: File,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub name: String,
    pub uri: String,
    pub mime_type: String,
    pub state: State,
    pub error: Option<Error>,
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    Processing,
    Active,
    Failed,
}

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: Error,
}

#[derive(Deserialize)]
pub struct Error {
    pub code: u32,
    #[serde(default)]
    pub status: String,
    pub message: String,
}

/// Gemini client. [`Provider::connect`] binds an API key, sent as the `key`
/// query parameter on every request.
pub struct Gemini {
    http_client: reqwest::Client,
}

impl Gemini {
    pub fn new() -> Self {
        Self { http_client: reqwest::Client::new() }
    }
}

impl Default for Gemini {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn connect(&self, api_key: &str) -> Result<Box<dyn ProviderSession>, ProviderError> {
        Ok(Box::new(GeminiSession {
            http_client: self.http_client.clone(),
            api_key: api_key.to_owned(),
        }))
    }
}

struct GeminiSession {
    http_client: reqwest::Client,
    api_key: String,
}

impl GeminiSession {
    fn url(&self, endpoint: &str) -> Url {
        Url::parse_with_params(endpoint, [("key", self.api_key.as_str())]).unwrap()
    }
}

#[async_trait]
impl ProviderSession for GeminiSession {
    async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<RemoteImage, ProviderError> {
        let file = tokio::fs::File::open(path).await.map_err(ProviderError::Filesystem)?;
        let size = file.metadata().await.map_err(ProviderError::Filesystem)?.len();
        let display_name = path.display().to_string();

        let response = self
            .http_client
            .post(self.url(&format!("{BASE_URL}/upload/v1beta/files")))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&StartUploadRequest { file: UploadMetadata { display_name: &display_name } })
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(api_error(response).await);
        }

        let upload_url = response
            .headers()
            .get("X-Goog-Upload-URL")
            .and_then(|header| header.to_str().ok())
            .ok_or(ProviderError::Malformed("the upload response has no upload URL."))?
            .to_owned();

        let response = self
            .http_client
            .post(upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(file)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(api_error(response).await);
        }

        let mut file = response.json::<FileResponse>().await?.file;

        while matches!(file.state, State::Processing) {
            tokio::time::sleep(Duration::from_secs(1)).await;

            let response = self
                .http_client
                .get(self.url(&format!("{BASE_URL}/v1beta/{}", file.name)))
                .send()
                .await?;

            if response.status() != StatusCode::OK {
                return Err(api_error(response).await);
            }

            file = response.json().await?;
        }

        let image = uploaded_image(file)?;

        log::info!("uploaded {display_name} as {}", image.uri);

        Ok(image)
    }

    async fn generate(
        &self,
        system_instruction: &str,
        parts: &[MessagePart],
    ) -> Result<String, ProviderError> {
        let contents =
            [Content { parts: parts.iter().map(Part::from).collect(), role: Some("user") }];

        let response = self
            .http_client
            .post(self.url(&format!("{BASE_URL}/v1beta/models/{MODEL}:generateContent")))
            .json(&GenerateContentRequest {
                contents: &contents,
                system_instruction: Content {
                    parts: vec![Part::Text(system_instruction)],
                    role: None,
                },
                generation_config: GenerationConfig {
                    temperature: TEMPERATURE,
                    top_p: TOP_P,
                    top_k: TOP_K,
                    max_output_tokens: MAX_OUTPUT_TOKENS,
                },
            })
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(api_error(response).await);
        }

        response_text(response.json().await?)
    }
}

async fn api_error(response: reqwest::Response) -> ProviderError {
    match response.json::<ErrorResponse>().await {
        Ok(response) => ProviderError::Api {
            code: response.error.code,
            status: response.error.status,
            message: response.error.message,
        },
        Err(err) => err.into(),
    }
}

fn uploaded_image(file: File) -> Result<RemoteImage, ProviderError> {
    if let Some(error) = file.error {
        return Err(ProviderError::Api {
            code: error.code,
            status: error.status,
            message: error.message,
        });
    }

    if matches!(file.state, State::Failed) {
        return Err(ProviderError::Malformed("the uploaded file failed processing."));
    }

    Ok(RemoteImage { uri: file.uri, mime_type: file.mime_type })
}

fn response_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    if let Some(prompt_feedback) = response.prompt_feedback {
        if prompt_feedback.block_reason.is_some() {
            let reasons = prompt_feedback
                .safety_ratings
                .unwrap_or_default()
                .into_iter()
                .filter(|rating| rating.blocked)
                .map(|rating| rating.category)
                .collect();

            return Err(ProviderError::Blocked(reasons));
        }
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ProviderError::Malformed("no response generated."));
    };

    let text = candidate
        .content
        .and_then(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| match part {
            PartResponse::Text(text) => Some(text),
            PartResponse::InlineData(..) => None,
        })
        .collect::<String>();

    if text.is_empty() {
        return Err(ProviderError::Malformed("no text generated."));
    }

    Ok(text)
}
