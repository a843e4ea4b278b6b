//! Native core of the Lazy Coder editor extension: turns one sidebar form
//! submission (prompt text, optional screenshot, optional target framework)
//! into one Gemini request and routes the generated code into the host editor.
//!
//! The embedding extension implements [`host::EditorHost`] over its editor API
//! and forwards webview messages to [`sidebar::Sidebar::handle_message`].

pub mod apis;
pub mod credentials;
pub mod frameworks;
pub mod generation;
pub mod host;
pub mod provider;
pub mod sidebar;
pub mod sink;
pub mod staging;
pub mod utilities;

pub use apis::gemini::Gemini;
pub use frameworks::FrameworkCatalog;
pub use generation::{GenerationError, GenerationRequest, GenerationResult, Generator};
pub use host::{EditorHost, HostError, Severity};
pub use provider::{Provider, ProviderSession};
pub use sidebar::{Sidebar, SidebarMessage};
