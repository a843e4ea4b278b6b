use std::fmt::{self, Write};

use tokio::sync::OnceCell;

use crate::credentials;
use crate::frameworks::FrameworkCatalog;
use crate::host::{EditorHost, HostError};
use crate::provider::{MessagePart, Provider, ProviderError, ProviderSession};
use crate::staging::{self, StagingError};

const IMAGE_ANALYSIS_STEP: &str = "\
1. If there's an uploaded image, analyze the image and extract the following details:
Layout: Describe the arrangement of elements (e.g., column, row, stack).
Colors: Specify the colors used for background, text, borders, etc.
Typography: Note font family, size, weight, and style (e.g., bold, italic).
Spacing: Measure padding, margin, and spacing between elements.
Shapes: Determine the shapes of elements (e.g., rectangular, rounded, circular).
Borders: Specify border width, color, and style (e.g., solid, dashed).";

const OUTPUT_ONLY_GUIDELINE: &str = "- The output should be only the code, \
    without any comments, markdown formatting, or explanations.";

const WEB_STYLING_GUIDELINE: &str = "- For web-based frameworks \
    (React, Vue, Angular, HTML/CSS/JavaScript), include appropriate styling \
    within the component or in a separate CSS file.";

const TEXT_PROMPT_GUIDELINE: &str = "- If no image is provided, base the code \
    on the text prompt, creating a user interface that matches the description.";

/// One sidebar submission, normalized by the dispatcher.
#[derive(Debug)]
pub struct GenerationRequest {
    pub prompt: String,
    pub framework: Option<String>,
    /// screenshot as a base64 data URL
    pub image: Option<String>,
}

#[derive(Debug)]
pub struct GenerationResult {
    pub text: String,
}

#[derive(Debug)]
pub enum GenerationError {
    MissingCredential,
    Staging(StagingError),
    Provider(ProviderError),
    Host(HostError),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "API Key is required"),
            Self::Staging(err) => write!(f, "{err}"),
            Self::Provider(err) => write!(f, "{err}"),
            Self::Host(err) => write!(f, "{err}"),
        }
    }
}

impl From<StagingError> for GenerationError {
    fn from(value: StagingError) -> Self {
        Self::Staging(value)
    }
}

impl From<ProviderError> for GenerationError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<HostError> for GenerationError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

/// Turns one request into one provider call: resolves the credential, stages
/// the screenshot, composes the message, and returns the generated text
/// verbatim.
pub struct Generator {
    provider: Box<dyn Provider>,
    session: OnceCell<Box<dyn ProviderSession>>,
    catalog: FrameworkCatalog,
}

impl Generator {
    pub fn new(provider: Box<dyn Provider>, catalog: FrameworkCatalog) -> Self {
        Self { provider, session: OnceCell::new(), catalog }
    }

    /// Runs one generation request end to end.
    ///
    /// The provider session is established on the first call and reused for the
    /// lifetime of this generator, so a key changed in the host configuration
    /// takes effect in the next editor process. A failed establishment is not
    /// cached; a dismissed credential prompt shows up again on the next call.
    pub async fn generate(
        &self,
        host: &dyn EditorHost,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let session = self
            .session
            .get_or_try_init(|| async {
                let api_key = credentials::resolve_api_key(host).await?;
                log::info!("establishing the provider session");
                self.provider.connect(&api_key).await.map_err(GenerationError::Provider)
            })
            .await?;

        let mut parts = Vec::new();

        if let Some(image) = request.image.as_deref() {
            let image = staging::stage(session.as_ref(), image).await?;
            parts.push(MessagePart::FileData(image));
        }

        parts.push(MessagePart::Text(message_text(request.framework.as_deref(), &request.prompt)));

        let instruction = system_instruction(request.framework.as_deref(), &self.catalog);
        let text = session.generate(&instruction, &parts).await?;

        Ok(GenerationResult { text })
    }
}

fn message_text(framework: Option<&str>, prompt: &str) -> String {
    match framework {
        Some(label) => format!("Create a {label} screen for: {prompt}"),
        None => format!("Create a screen for: {prompt}"),
    }
}

fn system_instruction(framework: Option<&str>, catalog: &FrameworkCatalog) -> String {
    let mut instruction = String::from(IMAGE_ANALYSIS_STEP);
    instruction.push_str("\n\n");

    match framework {
        Some(label) => {
            writeln!(
                instruction,
                "2. Generate code for the {label} framework based on the extracted details or \
                 the provided prompt.\n"
            )
            .unwrap();
            writeln!(instruction, "3. For the specified framework, follow these guidelines:")
                .unwrap();
            writeln!(instruction, "- {}", catalog.guideline(label)).unwrap();
            writeln!(instruction, "{OUTPUT_ONLY_GUIDELINE}").unwrap();
            writeln!(
                instruction,
                "- Ensure the code is complete and can be directly used in a project for the \
                 specified framework."
            )
            .unwrap();
        }
        None => {
            writeln!(
                instruction,
                "2. Generate code based on the extracted details or the provided prompt.\n"
            )
            .unwrap();
            writeln!(instruction, "3. Follow these guidelines:").unwrap();
            writeln!(instruction, "{OUTPUT_ONLY_GUIDELINE}").unwrap();
            writeln!(
                instruction,
                "- Ensure the code is complete and can be directly used in a project."
            )
            .unwrap();
        }
    }

    writeln!(instruction, "{WEB_STYLING_GUIDELINE}").unwrap();
    writeln!(instruction, "{TEXT_PROMPT_GUIDELINE}\n").unwrap();
    write!(instruction, "4. Do not include any comments in the generated code.").unwrap();

    instruction
}
