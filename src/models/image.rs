use super::common::{AspectRatio, Quality, Style};
use crate::error::{ErrorKind, GenError, Result};
use crate::extract::data_uri;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub const MIN_IDEA_CHARS: usize = 5;

/// Per-call generation options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub style: Style,
    pub quality: Quality,
    pub aspect_ratio: AspectRatio,
    pub negative_prompt: Option<String>,
    /// Pause between consecutive batch requests.
    #[serde(skip)]
    pub delay: Option<Duration>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        let negative = negative.into();
        self.negative_prompt = if negative.trim().is_empty() {
            None
        } else {
            Some(negative)
        };
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub idea: String,
    pub style: Style,
    pub quality: Quality,
    pub aspect_ratio: AspectRatio,
    pub negative_prompt: Option<String>,
}

impl GenerationRequest {
    pub fn new(idea: impl Into<String>, options: &GenerationOptions) -> Self {
        Self {
            idea: idea.into(),
            style: options.style.clone(),
            quality: options.quality,
            aspect_ratio: options.aspect_ratio,
            negative_prompt: options.negative_prompt.clone(),
        }
    }

    /// The input rules a caller applies before submitting an idea.
    pub fn validate(&self) -> Result<()> {
        validate_idea(&self.idea)
    }
}

pub fn validate_idea(idea: &str) -> Result<()> {
    let trimmed = idea.trim();
    if trimmed.is_empty() {
        return Err(GenError::ValidationError(
            "Please enter an image idea".into(),
        ));
    }
    if trimmed.chars().count() < MIN_IDEA_CHARS {
        return Err(GenError::ValidationError(
            "The idea is too short. Please describe it in more detail".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageKind {
    EmbeddedBinary,
    RemoteUrl,
    SyntheticVector,
    TextDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Native,
    FallbackTextToVector,
    Placeholder,
    UrlExtracted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ImagePayload {
    /// Base64 payload exactly as the provider sent it.
    Binary { mime_type: String, data: String },
    Url { url: String },
    Vector { markup: String },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: Uuid,
    pub payload: ImagePayload,
    pub source_idea: String,
    pub created_at: DateTime<Utc>,
    pub strategy: Strategy,
    /// Model text that accompanied a placeholder.
    pub description: Option<String>,
}

impl GeneratedImage {
    pub fn new(payload: ImagePayload, source_idea: &str, strategy: Strategy) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            source_idea: source_idea.to_string(),
            created_at: Utc::now(),
            strategy,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn kind(&self) -> ImageKind {
        match self.payload {
            ImagePayload::Binary { .. } => ImageKind::EmbeddedBinary,
            ImagePayload::Url { .. } => ImageKind::RemoteUrl,
            ImagePayload::Vector { .. } => ImageKind::SyntheticVector,
            ImagePayload::Text { .. } => ImageKind::TextDescription,
        }
    }

    /// A URL a renderer can load: a `data:` URI for inline payloads, the
    /// remote address otherwise. Text descriptions have none.
    pub fn url(&self) -> Option<String> {
        match &self.payload {
            ImagePayload::Binary { mime_type, data } => Some(format!(
                "data:{};base64,{}",
                mime_type, data
            )),
            ImagePayload::Url { url } => Some(url.clone()),
            ImagePayload::Vector { markup } => Some(data_uri("image/svg+xml", markup.as_bytes())),
            ImagePayload::Text { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub succeeded: bool,
    pub images: Vec<GeneratedImage>,
    pub original_idea: String,
    pub error_kind: Option<ErrorKind>,
    pub error_description: Option<String>,
}

impl GenerationOutcome {
    /// Callers must pass at least one image.
    pub(crate) fn success(original_idea: &str, images: Vec<GeneratedImage>) -> Self {
        debug_assert!(!images.is_empty());
        Self {
            succeeded: true,
            images,
            original_idea: original_idea.to_string(),
            error_kind: None,
            error_description: None,
        }
    }

    pub(crate) fn failure(original_idea: &str, kind: ErrorKind, description: String) -> Self {
        Self {
            succeeded: false,
            images: Vec::new(),
            original_idea: original_idea.to_string(),
            error_kind: Some(kind),
            error_description: Some(description),
        }
    }

    /// Strategy of the first image, if any.
    pub fn strategy(&self) -> Option<Strategy> {
        self.images.first().map(|image| image.strategy)
    }

    pub fn is_consistent(&self) -> bool {
        if self.succeeded {
            !self.images.is_empty()
        } else {
            self.error_description.is_some()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub idea: String,
    pub outcome: GenerationOutcome,
}
