pub mod gemini;
#[cfg(test)]
pub mod mock;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use gemini::GeminiProvider;

/// Sampling parameters forwarded to the model. Unset fields are left to the
/// provider's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub response_format: Option<String>,
}

impl GenerationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = Some(format.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentSegment {
    InlineBinary { mime_type: String, data: String },
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub segments: Vec<ContentSegment>,
}

/// Provider output normalised to candidates of text or inline-binary segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    pub candidates: Vec<Candidate>,
}

impl ProviderResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                segments: vec![ContentSegment::Text(text.into())],
            }],
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &ContentSegment> {
        self.candidates.iter().flat_map(|c| c.segments.iter())
    }

    pub fn text_segments(&self) -> impl Iterator<Item = &str> {
        self.segments().filter_map(|segment| match segment {
            ContentSegment::Text(text) => Some(text.as_str()),
            ContentSegment::InlineBinary { .. } => None,
        })
    }

    /// All text segments concatenated in order.
    pub fn text(&self) -> String {
        self.text_segments().collect()
    }
}

#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn invoke(
        &self,
        model_id: &str,
        instruction: &str,
        params: &GenerationParameters,
    ) -> Result<ProviderResponse>;
}
