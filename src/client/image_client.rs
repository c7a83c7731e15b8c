use crate::{
    config::{ImageGenConfig, Locale},
    error::{ErrorKind, GenError, Result},
    export::ImageSaver,
    extract::{extract_image_urls, extract_svg},
    logger,
    models::{
        is_image_capable, BatchEntry, GeneratedImage, GenerationOptions, GenerationOutcome,
        GenerationRequest, ImagePayload, ProviderKind, Strategy,
    },
    placeholder,
    provider::{ContentSegment, GenerationParameters, GenerativeProvider, ProviderResponse},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const VALIDATION_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Serialize)]
pub struct CredentialCheck {
    pub valid: bool,
    pub message: String,
}

/// Runs the image strategies in order (native, vector fallback, placeholder)
/// and always hands back a [`GenerationOutcome`].
#[derive(Clone)]
pub struct ImageClient {
    provider: Option<Arc<dyn GenerativeProvider>>,
    config: ImageGenConfig,
}

struct NativePlan {
    model: String,
    instruction: String,
    params: GenerationParameters,
}

impl ImageClient {
    /// `provider` is `None` when no credential is configured.
    pub fn new(provider: Option<Arc<dyn GenerativeProvider>>, config: ImageGenConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ImageGenConfig {
        &self.config
    }

    pub async fn generate(&self, idea: &str, options: &GenerationOptions) -> GenerationOutcome {
        self.generate_request(&GenerationRequest::new(idea, options))
            .await
    }

    pub async fn generate_request(&self, request: &GenerationRequest) -> GenerationOutcome {
        let locale = self.config.locale;

        let Some(provider) = self.provider.as_deref() else {
            log::warn!("No Gemini API key configured, skipping image generation");
            return failure(request, ErrorKind::MissingCredential, locale);
        };

        let _timer = logger::timer("image generation");
        match self.run_strategies(provider, request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Image generation failed: {}", e);
                failure(request, e.kind(), locale)
            }
        }
    }

    /// Processes ideas one after another, pausing between requests when a
    /// delay is set. Each idea gets its own entry, in input order.
    pub async fn generate_batch<S: AsRef<str>>(
        &self,
        ideas: &[S],
        options: &GenerationOptions,
    ) -> Vec<BatchEntry> {
        let delay = options.delay.or(self.config.batch_delay);
        let mut results = Vec::with_capacity(ideas.len());

        for (index, idea) in ideas.iter().enumerate() {
            if index > 0 {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
            }

            let idea = idea.as_ref();
            log::info!("Batch item {}/{}", index + 1, ideas.len());
            let outcome = self.generate(idea, options).await;
            results.push(BatchEntry {
                idea: idea.to_string(),
                outcome,
            });
        }

        results
    }

    /// Sends a minimal request to check the configured key.
    pub async fn validate_credential(&self) -> CredentialCheck {
        let locale = self.config.locale;
        let Some(provider) = self.provider.as_deref() else {
            return CredentialCheck {
                valid: false,
                message: ErrorKind::MissingCredential.describe(locale).to_string(),
            };
        };

        match provider
            .invoke(VALIDATION_MODEL, "test", &GenerationParameters::default())
            .await
        {
            Ok(_) => CredentialCheck {
                valid: true,
                message: match locale {
                    Locale::English => "The API key is valid.".to_string(),
                    Locale::Vietnamese => "API key hợp lệ.".to_string(),
                },
            },
            Err(e) => {
                log::warn!("API key validation failed: {}", e);
                CredentialCheck {
                    valid: false,
                    message: e.describe(locale),
                }
            }
        }
    }

    pub async fn download_image(
        &self,
        saver: &dyn ImageSaver,
        image: &GeneratedImage,
        file_name: &str,
    ) -> Result<PathBuf> {
        let url = image.url().ok_or_else(|| {
            GenError::Unsupported("text descriptions cannot be downloaded".into())
        })?;
        saver.save_binary_as_file(&url, file_name).await
    }

    async fn run_strategies(
        &self,
        provider: &dyn GenerativeProvider,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome> {
        match self.native_plan(request) {
            Some(plan) => {
                log::info!("Attempting native image generation with {}", plan.model);
                match provider
                    .invoke(&plan.model, &plan.instruction, &plan.params)
                    .await
                {
                    Ok(response) => {
                        let images = collect_native_images(&response, &request.idea);
                        if !images.is_empty() {
                            log::info!("Native generation returned {} image(s)", images.len());
                            return Ok(GenerationOutcome::success(&request.idea, images));
                        }
                        log::info!("No images in response, falling back to SVG generation");
                    }
                    Err(e) => log::warn!("Native image generation failed: {}", e),
                }
            }
            None => log::info!(
                "Model {} cannot return images, using SVG generation",
                self.config.model
            ),
        }

        self.fallback(provider, request).await
    }

    async fn fallback(
        &self,
        provider: &dyn GenerativeProvider,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome> {
        let instruction = fallback_instruction(&request.idea);
        let text = match provider
            .invoke(
                &self.config.fallback_model,
                &instruction,
                &GenerationParameters::default(),
            )
            .await
        {
            Ok(response) => Some(response.text()),
            Err(e) => match e.kind() {
                // A placeholder would hide problems only the user can fix.
                ErrorKind::InvalidCredential | ErrorKind::SafetyBlocked => return Err(e),
                _ => {
                    log::warn!("SVG fallback failed, using placeholder: {}", e);
                    None
                }
            },
        };

        if let Some(svg) = text.as_deref().and_then(extract_svg) {
            log::info!("Fallback returned SVG markup ({} bytes)", svg.len());
            let image = GeneratedImage::new(
                ImagePayload::Vector {
                    markup: svg.to_string(),
                },
                &request.idea,
                Strategy::FallbackTextToVector,
            );
            return Ok(GenerationOutcome::success(&request.idea, vec![image]));
        }

        log::info!("No SVG available, synthesizing placeholder");
        let image = GeneratedImage::new(
            ImagePayload::Vector {
                markup: placeholder::synthesize(&request.idea, &request.style),
            },
            &request.idea,
            Strategy::Placeholder,
        )
        .with_description(text.filter(|t| !t.trim().is_empty()));

        Ok(GenerationOutcome::success(&request.idea, vec![image]))
    }

    fn native_plan(&self, request: &GenerationRequest) -> Option<NativePlan> {
        match self.config.provider {
            ProviderKind::Imagen3 => Some(NativePlan {
                model: self.config.model.clone(),
                instruction: format!(
                    "Generate an image using Imagen 3: {}",
                    build_imagen_prompt(request)
                ),
                params: GenerationParameters::new()
                    .with_temperature(0.4)
                    .with_top_k(32)
                    .with_top_p(0.95)
                    .with_max_output_tokens(8192),
            }),
            ProviderKind::Gemini if is_image_capable(&self.config.model) => Some(NativePlan {
                model: self.config.model.clone(),
                instruction: build_native_prompt(request),
                params: GenerationParameters::new()
                    .with_temperature(0.9)
                    .with_top_k(32)
                    .with_top_p(0.95)
                    .with_max_output_tokens(8192)
                    .with_response_format("text/plain"),
            }),
            ProviderKind::Gemini => None,
        }
    }
}

fn failure(request: &GenerationRequest, kind: ErrorKind, locale: Locale) -> GenerationOutcome {
    GenerationOutcome::failure(&request.idea, kind, kind.describe(locale).to_string())
}

/// Images carried directly by a response.
///
/// Inline binaries take precedence: when any are present, URLs mentioned in
/// the text are ignored.
pub fn collect_native_images(response: &ProviderResponse, idea: &str) -> Vec<GeneratedImage> {
    let binaries: Vec<GeneratedImage> = response
        .segments()
        .filter_map(|segment| match segment {
            ContentSegment::InlineBinary { mime_type, data } => Some(GeneratedImage::new(
                ImagePayload::Binary {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                },
                idea,
                Strategy::Native,
            )),
            ContentSegment::Text(_) => None,
        })
        .collect();

    if !binaries.is_empty() {
        return binaries;
    }

    response
        .text_segments()
        .flat_map(extract_image_urls)
        .map(|url| GeneratedImage::new(ImagePayload::Url { url }, idea, Strategy::UrlExtracted))
        .collect()
}

/// The negative prompt is only honoured by the Imagen instruction.
pub fn build_native_prompt(request: &GenerationRequest) -> String {
    format!(
        "Create an image: {}. Style: {}. Quality: {}. Make it visually appealing and detailed.",
        request.idea, request.style, request.quality
    )
}

pub fn build_imagen_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "{}, {}, {}, {}",
        request.idea,
        request.style.imagen_phrase(),
        request.quality.imagen_phrase(),
        request.aspect_ratio.format_phrase()
    );
    if let Some(negative) = request.negative_prompt.as_deref() {
        prompt.push_str(&format!(". Avoid: {}", negative));
    }
    prompt
}

fn fallback_instruction(idea: &str) -> String {
    format!(
        r#"I need you to create a simple SVG image for the following description: "{idea}".

Please create an SVG that meets these requirements:
1. Size {w}x{h}px
2. Use basic shapes (circle, rect, path, text)
3. Colors that suit the description
4. A simple but meaningful composition

Return the SVG in this format:
<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">
  <!-- SVG content here -->
</svg>

If you cannot create an SVG, give a detailed description of the image so the user can picture it."#,
        idea = idea,
        w = placeholder::CANVAS_WIDTH,
        h = placeholder::CANVAS_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, ImageKind, Quality, Style};
    use crate::provider::mock::ScriptedProvider;
    use crate::provider::Candidate;
    use std::time::Duration;

    const IDEA: &str = "A red bicycle leaning against a blue wall";

    fn client(provider: Arc<ScriptedProvider>, config: ImageGenConfig) -> ImageClient {
        let provider: Arc<dyn GenerativeProvider> = provider;
        ImageClient::new(Some(provider), config)
    }

    fn inline(mime: &str, data: &str) -> ContentSegment {
        ContentSegment::InlineBinary {
            mime_type: mime.into(),
            data: data.into(),
        }
    }

    fn response(segments: Vec<ContentSegment>) -> ProviderResponse {
        ProviderResponse {
            candidates: vec![Candidate { segments }],
        }
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let client = ImageClient::new(None, ImageGenConfig::new());
        let outcome = client.generate(IDEA, &GenerationOptions::new()).await;
        assert!(!outcome.succeeded);
        assert!(outcome.images.is_empty());
        assert_eq!(outcome.error_kind, Some(ErrorKind::MissingCredential));
        assert!(outcome.is_consistent());
    }

    #[tokio::test]
    async fn test_native_binaries_win_over_urls() {
        let provider = Arc::new(ScriptedProvider::new().then(Ok(response(vec![
            inline("image/png", "AAAA"),
            ContentSegment::Text("also at https://x.io/a.png".into()),
            inline("image/jpeg", "BBBB"),
        ]))));
        let outcome = client(provider.clone(), ImageGenConfig::new())
            .generate(IDEA, &GenerationOptions::new())
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.images.len(), 2);
        assert!(outcome
            .images
            .iter()
            .all(|i| i.kind() == ImageKind::EmbeddedBinary && i.strategy == Strategy::Native));
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);

        let call = &calls[0];
        assert_eq!(call.model_id, "gemini-1.5-pro");
        assert!(call.instruction.starts_with("Create an image: A red bicycle"));
        assert_eq!(call.params.temperature, Some(0.9));
        assert_eq!(call.params.response_format.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_native_urls_are_extracted() {
        let provider = Arc::new(ScriptedProvider::new().then_text(
            "Try https://img.example.com/bike.webp or https://img.example.com/bike2.JPG",
        ));
        let outcome = client(provider, ImageGenConfig::new())
            .generate(IDEA, &GenerationOptions::new())
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.images.len(), 2);
        assert_eq!(outcome.strategy(), Some(Strategy::UrlExtracted));
        assert_eq!(
            outcome.images[1].url().as_deref(),
            Some("https://img.example.com/bike2.JPG")
        );
    }

    #[tokio::test]
    async fn test_fallback_svg_becomes_data_uri() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then_text("I can't draw, sorry.")
                .then_text("Sure!\n<svg width=\"400\" height=\"300\"><rect/></svg>\nEnjoy"),
        );
        let outcome = client(provider.clone(), ImageGenConfig::new())
            .generate(IDEA, &GenerationOptions::new())
            .await;

        assert!(outcome.succeeded);
        let image = &outcome.images[0];
        assert_eq!(image.strategy, Strategy::FallbackTextToVector);
        assert_eq!(image.kind(), ImageKind::SyntheticVector);
        assert_eq!(
            image.url().unwrap(),
            crate::extract::data_uri(
                "image/svg+xml",
                b"<svg width=\"400\" height=\"300\"><rect/></svg>"
            )
        );

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].model_id, "gemini-1.5-pro");
        assert!(calls[1].instruction.contains(IDEA));
        assert_eq!(calls[1].params, GenerationParameters::default());
    }

    #[tokio::test]
    async fn test_network_failures_end_in_placeholder() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then_error(GenError::NetworkError("connection reset".into()))
                .then_error(GenError::NetworkError("connection reset".into())),
        );
        let options = GenerationOptions::new()
            .with_style(Style::Minimalist)
            .with_quality(Quality::Standard);
        let outcome = client(provider, ImageGenConfig::new())
            .generate(IDEA, &options)
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.images.len(), 1);
        let image = &outcome.images[0];
        assert_eq!(image.kind(), ImageKind::SyntheticVector);
        assert_eq!(image.strategy, Strategy::Placeholder);
        assert!(image.description.is_none());
        assert_eq!(
            image.payload,
            ImagePayload::Vector {
                markup: placeholder::synthesize(IDEA, &Style::Minimalist)
            }
        );
    }

    #[tokio::test]
    async fn test_placeholder_keeps_fallback_text() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then_text("")
                .then_text("Picture a crimson bike against cobalt bricks."),
        );
        let outcome = client(provider, ImageGenConfig::new())
            .generate(IDEA, &GenerationOptions::new())
            .await;

        let image = &outcome.images[0];
        assert_eq!(image.strategy, Strategy::Placeholder);
        assert_eq!(
            image.description.as_deref(),
            Some("Picture a crimson bike against cobalt bricks.")
        );
    }

    #[tokio::test]
    async fn test_invalid_credential_in_fallback_is_a_failure() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then_error(GenError::HttpError {
                    status: 400,
                    message: "API key not valid".into(),
                })
                .then_error(GenError::HttpError {
                    status: 400,
                    message: "API key not valid".into(),
                }),
        );
        let config = ImageGenConfig::new().with_locale(Locale::Vietnamese);
        let outcome = client(provider, config)
            .generate(IDEA, &GenerationOptions::new())
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.error_kind, Some(ErrorKind::InvalidCredential));
        assert_eq!(
            outcome.error_description.as_deref(),
            Some(ErrorKind::InvalidCredential.describe(Locale::Vietnamese))
        );
        assert!(outcome.is_consistent());
    }

    #[tokio::test]
    async fn test_non_image_model_skips_native() {
        let provider = Arc::new(ScriptedProvider::new().then_text("no svg"));
        let config = ImageGenConfig::new()
            .with_model("gemini-1.0-pro")
            .with_fallback_model("gemini-1.5-flash");
        let outcome = client(provider.clone(), config)
            .generate(IDEA, &GenerationOptions::new())
            .await;

        assert_eq!(outcome.strategy(), Some(Strategy::Placeholder));
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model_id, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_imagen_instruction() {
        let provider = Arc::new(ScriptedProvider::new().then(Ok(response(vec![inline(
            "image/png",
            "AAAA",
        )]))));
        let config = ImageGenConfig::new().with_provider(ProviderKind::Imagen3);
        let options = GenerationOptions::new()
            .with_style(Style::Anime)
            .with_aspect_ratio(AspectRatio::Widescreen)
            .with_negative_prompt("blurry");
        let outcome = client(provider.clone(), config).generate(IDEA, &options).await;

        assert!(outcome.succeeded);
        let calls = provider.calls();
        let call = &calls[0];
        assert_eq!(call.model_id, "imagen-3.0-generate-002");
        assert!(call
            .instruction
            .starts_with("Generate an image using Imagen 3: A red bicycle"));
        assert!(call.instruction.contains("anime art style"));
        assert!(call.instruction.contains("widescreen format"));
        assert!(call.instruction.ends_with(". Avoid: blurry"));
        assert_eq!(call.params.temperature, Some(0.4));
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then(Ok(response(vec![inline("image/png", "AAAA")])))
                .then_error(GenError::HttpError {
                    status: 401,
                    message: "unauthorized".into(),
                })
                .then_error(GenError::HttpError {
                    status: 401,
                    message: "unauthorized".into(),
                })
                .then(Ok(response(vec![inline("image/png", "CCCC")]))),
        );
        let options = GenerationOptions::new().with_delay(Duration::from_millis(1));
        let ideas = ["first idea", "second idea", "third idea"];
        let results = client(provider, ImageGenConfig::new())
            .generate_batch(&ideas, &options)
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].idea, "first idea");
        assert!(results[0].outcome.succeeded);
        assert!(!results[1].outcome.succeeded);
        assert_eq!(
            results[1].outcome.error_kind,
            Some(ErrorKind::InvalidCredential)
        );
        assert_eq!(results[2].idea, "third idea");
        assert!(results[2].outcome.succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_sleeps_only_between_items() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then(Ok(response(vec![inline("image/png", "AAAA")])))
                .then(Ok(response(vec![inline("image/png", "BBBB")])))
                .then(Ok(response(vec![inline("image/png", "CCCC")]))),
        );
        let config = ImageGenConfig::new().with_batch_delay(Duration::from_secs(2));
        let client = client(provider, config);
        assert_eq!(client.config().batch_delay, Some(Duration::from_secs(2)));

        let start = tokio::time::Instant::now();
        let results = client
            .generate_batch(
                &["first idea", "second idea", "third idea"],
                &GenerationOptions::new(),
            )
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_option_delay_overrides_config() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then(Ok(response(vec![inline("image/png", "AAAA")])))
                .then(Ok(response(vec![inline("image/png", "BBBB")]))),
        );
        let config = ImageGenConfig::new().with_batch_delay(Duration::from_secs(10));
        let options = GenerationOptions::new().with_delay(Duration::from_millis(300));

        let start = tokio::time::Instant::now();
        client(provider.clone(), config)
            .generate_batch(&["first idea", "second idea"], &options)
            .await;
        assert_eq!(start.elapsed(), Duration::from_millis(300));

        let start = tokio::time::Instant::now();
        let config = ImageGenConfig::new().with_batch_delay(Duration::from_secs(10));
        let single = client(provider, config)
            .generate_batch(&["only idea"], &options)
            .await;
        assert_eq!(single.len(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_validate_credential() {
        let provider = Arc::new(ScriptedProvider::new().then_text("ok"));
        let check = client(provider.clone(), ImageGenConfig::new())
            .validate_credential()
            .await;
        assert!(check.valid);
        assert_eq!(provider.calls()[0].model_id, VALIDATION_MODEL);

        let provider = Arc::new(ScriptedProvider::new().then_error(GenError::HttpError {
            status: 429,
            message: "Resource has been exhausted".into(),
        }));
        let check = client(provider, ImageGenConfig::new())
            .validate_credential()
            .await;
        assert!(!check.valid);
        assert_eq!(check.message, ErrorKind::QuotaExceeded.describe(Locale::English));

        let check = ImageClient::new(None, ImageGenConfig::new())
            .validate_credential()
            .await;
        assert!(!check.valid);
    }

    #[tokio::test]
    async fn test_download_image_uses_saver() {
        let dir = tempfile::tempdir().unwrap();
        let saver = crate::export::DirectorySaver::new(dir.path());
        let image = GeneratedImage::new(
            ImagePayload::Vector {
                markup: placeholder::synthesize(IDEA, &Style::Cartoon),
            },
            IDEA,
            Strategy::Placeholder,
        );
        let client = ImageClient::new(None, ImageGenConfig::new());
        let path = client
            .download_image(&saver, &image, "bike")
            .await
            .unwrap();
        assert!(path.ends_with("bike.svg"));

        let text = GeneratedImage::new(
            ImagePayload::Text {
                text: "words".into(),
            },
            IDEA,
            Strategy::Placeholder,
        );
        assert!(client.download_image(&saver, &text, "x").await.is_err());
    }

    #[test]
    fn test_build_native_prompt() {
        let request = GenerationRequest::new(
            "A cat on a mat",
            &GenerationOptions::new()
                .with_style(Style::Cartoon)
                .with_quality(Quality::Low)
                .with_negative_prompt("dogs"),
        );
        assert_eq!(
            build_native_prompt(&request),
            "Create an image: A cat on a mat. Style: cartoon. Quality: low. Make it visually appealing and detailed."
        );
    }
}
