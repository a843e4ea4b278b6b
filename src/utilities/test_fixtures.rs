use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::host::{EditorHost, HostError, Severity};
use crate::provider::{MessagePart, Provider, ProviderError, ProviderSession, RemoteImage};

pub const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
pub const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub fn jpeg_data_url() -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_MAGIC))
}

pub fn png_data_url(mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(PNG_MAGIC))
}

pub struct EditorState {
    pub content: String,
    pub cursor: usize,
}

/// Scriptable in-memory stand-in for the editor. Tests poke the public fields
/// directly and assert on what accumulated in them afterwards.
pub struct MockHost {
    pub settings: Mutex<HashMap<String, String>>,
    /// answer returned by `request_secret`; `None` plays a dismissed prompt
    pub secret: Mutex<Option<String>>,
    pub secret_prompts: Mutex<Vec<String>>,
    pub editor: Mutex<Option<EditorState>>,
    pub documents: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<(Severity, String)>>,
    pub progress_titles: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(HashMap::new()),
            secret: Mutex::new(None),
            secret_prompts: Mutex::new(Vec::new()),
            editor: Mutex::new(None),
            documents: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            progress_titles: Mutex::new(Vec::new()),
        }
    }

    pub fn focus_editor(&self, content: &str, cursor: usize) {
        *self.editor.lock().unwrap() = Some(EditorState { content: content.into(), cursor });
    }

    pub fn editor_content(&self) -> Option<String> {
        self.editor.lock().unwrap().as_ref().map(|editor| editor.content.clone())
    }
}

#[async_trait]
impl EditorHost for MockHost {
    async fn read_setting(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.settings.lock().unwrap().get(key).cloned())
    }

    async fn write_setting(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.settings.lock().unwrap().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn request_secret(&self, prompt: &str) -> Result<Option<String>, HostError> {
        self.secret_prompts.lock().unwrap().push(prompt.to_owned());
        Ok(self.secret.lock().unwrap().clone())
    }

    async fn begin_progress(&self, title: &str) -> Result<(), HostError> {
        self.progress_titles.lock().unwrap().push(title.to_owned());
        Ok(())
    }

    async fn end_progress(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn insert_at_cursor(&self, text: &str) -> Result<bool, HostError> {
        let mut editor = self.editor.lock().unwrap();

        let Some(editor) = editor.as_mut() else {
            return Ok(false);
        };

        editor.content.insert_str(editor.cursor, text);
        editor.cursor += text.len();

        Ok(true)
    }

    async fn open_document(&self, content: &str) -> Result<(), HostError> {
        self.documents.lock().unwrap().push(content.to_owned());
        Ok(())
    }

    async fn show_notification(&self, severity: Severity, message: &str) -> Result<(), HostError> {
        self.notices.lock().unwrap().push((severity, message.to_owned()));
        Ok(())
    }
}

/// `connect` suspends once before recording, so tests can interleave
/// concurrent first calls.
pub struct FakeProvider {
    pub session: Arc<FakeSession>,
    pub connects: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn new(response: &str) -> Self {
        Self {
            session: Arc::new(FakeSession::new(response)),
            connects: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn connect(&self, api_key: &str) -> Result<Box<dyn ProviderSession>, ProviderError> {
        tokio::task::yield_now().await;
        self.connects.lock().unwrap().push(api_key.to_owned());
        Ok(Box::new(Arc::clone(&self.session)))
    }
}

pub struct UploadRecord {
    pub path: PathBuf,
    pub mime_type: String,
    /// whether the file existed at upload time
    pub existed: bool,
}

pub struct FakeSession {
    pub response: Mutex<String>,
    pub uploads: Mutex<Vec<UploadRecord>>,
    pub upload_error: Mutex<Option<ProviderError>>,
    pub generate_error: Mutex<Option<ProviderError>>,
    pub generations: Mutex<Vec<(String, Vec<MessagePart>)>>,
}

impl FakeSession {
    pub fn new(response: &str) -> Self {
        Self {
            response: Mutex::new(response.to_owned()),
            uploads: Mutex::new(Vec::new()),
            upload_error: Mutex::new(None),
            generate_error: Mutex::new(None),
            generations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ProviderSession for Arc<FakeSession> {
    async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<RemoteImage, ProviderError> {
        self.uploads.lock().unwrap().push(UploadRecord {
            path: path.to_path_buf(),
            mime_type: mime_type.to_owned(),
            existed: path.exists(),
        });

        if let Some(error) = self.upload_error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(RemoteImage {
            uri: format!("files/fake-{}", self.uploads.lock().unwrap().len()),
            mime_type: mime_type.to_owned(),
        })
    }

    async fn generate(
        &self,
        system_instruction: &str,
        parts: &[MessagePart],
    ) -> Result<String, ProviderError> {
        self.generations.lock().unwrap().push((system_instruction.to_owned(), parts.to_vec()));

        if let Some(error) = self.generate_error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(self.response.lock().unwrap().clone())
    }
}
