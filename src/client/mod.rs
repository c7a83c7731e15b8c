pub mod image_client;
pub mod prompt_client;

use crate::{
    config::Config,
    error::Result,
    models::{
        available_models, available_providers, available_styles, quality_options, ModelInfo,
        OptionInfo,
    },
    provider::{GeminiProvider, GenerativeProvider},
};
use std::sync::Arc;

pub use image_client::{CredentialCheck, ImageClient};
pub use prompt_client::PromptClient;

/// Entry point bundling the image and prompt clients over one provider.
#[derive(Clone)]
pub struct GenAiClient {
    image_client: ImageClient,
    prompt_client: PromptClient,
}

impl GenAiClient {
    /// Builds a Gemini-backed client. Without a credential the client still
    /// constructs, and every generation reports a missing credential.
    pub fn new(config: Config) -> Result<Self> {
        let provider: Option<Arc<dyn GenerativeProvider>> = if config.gemini.has_credential() {
            Some(Arc::new(GeminiProvider::new(&config.gemini)?))
        } else {
            log::warn!("GEMINI_API_KEY is not set");
            None
        };

        Ok(Self::from_parts(provider, config))
    }

    pub fn with_provider(provider: Arc<dyn GenerativeProvider>, config: Config) -> Self {
        Self::from_parts(Some(provider), config)
    }

    fn from_parts(provider: Option<Arc<dyn GenerativeProvider>>, config: Config) -> Self {
        Self {
            image_client: ImageClient::new(provider.clone(), config.image),
            prompt_client: PromptClient::new(provider),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn prompts(&self) -> &PromptClient {
        &self.prompt_client
    }

    pub fn available_models(&self) -> Vec<ModelInfo> {
        available_models()
    }

    pub fn available_providers(&self) -> Vec<OptionInfo> {
        available_providers()
    }

    pub fn available_styles(&self) -> Vec<OptionInfo> {
        available_styles()
    }

    pub fn quality_options(&self) -> Vec<OptionInfo> {
        quality_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::error::ErrorKind;
    use crate::models::GenerationOptions;
    use crate::provider::mock::ScriptedProvider;

    #[tokio::test]
    async fn test_client_without_key_reports_missing_credential() {
        let client = GenAiClient::new(Config::new().with_gemini(GeminiConfig::new())).unwrap();
        let outcome = client
            .image()
            .generate("a lighthouse at dusk", &GenerationOptions::new())
            .await;
        assert_eq!(outcome.error_kind, Some(ErrorKind::MissingCredential));
        assert_eq!(client.available_models().len(), 5);
    }

    #[tokio::test]
    async fn test_clients_share_provider() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then_text("**Prompt 1:**\nA lighthouse\n---")
                .then_text("ok"),
        );
        let client = GenAiClient::with_provider(provider.clone(), Config::new());

        let records = client
            .prompts()
            .generate_prompts("a lighthouse at dusk", &Default::default())
            .await
            .unwrap();
        assert_eq!(records[0].prompt_text, "A lighthouse");
        assert!(client.image().validate_credential().await.valid);
        assert_eq!(provider.calls().len(), 2);
    }
}
