//! Turns short text ideas into art prompts and images through Google Gemini.
//!
//! Image generation never ends empty-handed: a native image request falls
//! back to model-drawn SVG, and that falls back to a deterministic local
//! placeholder. Failures are reported as a classified [`ErrorKind`] with a
//! localized message.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod interpreter;
pub mod logger;
pub mod models;
pub mod placeholder;
pub mod provider;

pub use client::{CredentialCheck, GenAiClient, ImageClient, PromptClient};
pub use config::{Config, GeminiConfig, ImageGenConfig, Locale};
pub use error::{classify, ErrorKind, GenError, Result};
pub use export::{Clipboard, DirectorySaver, ImageSaver, WriterClipboard};
pub use models::*;
pub use provider::{GeminiProvider, GenerationParameters, GenerativeProvider, ProviderResponse};
