use crate::models::ProviderKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-1.5-pro";
pub const IMAGEN3_MODEL: &str = "imagen-3.0-generate-002";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    English,
    Vietnamese,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "vi" | "vietnamese" => Ok(Locale::Vietnamese),
            other => Err(format!("unknown locale: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok();
        let base_url = env::var("GEMINI_API_BASE").ok();

        GeminiConfig { api_key, base_url }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into().trim().to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The credential, if one is set and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }
}

#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub fallback_model: String,
    pub locale: Locale,
    pub batch_delay: Option<Duration>,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        ImageGenConfig {
            provider: ProviderKind::Gemini,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            locale: Locale::English,
            batch_delay: None,
        }
    }
}

impl ImageGenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(provider) = env::var("IMAGE_GEN_PROVIDER")
            .ok()
            .and_then(|s| s.parse::<ProviderKind>().ok())
        {
            config = config.with_provider(provider);
        }
        if let Ok(model) = env::var("IMAGE_GEN_MODEL") {
            config.model = model;
        }
        if let Ok(model) = env::var("IMAGE_GEN_FALLBACK_MODEL") {
            config.fallback_model = model;
        }
        if let Some(locale) = env::var("IMAGE_GEN_LOCALE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.locale = locale;
        }
        config.batch_delay = env::var("IMAGE_GEN_BATCH_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis);

        config
    }

    /// Selecting Imagen 3 also selects its model; leaving it restores the
    /// default Gemini model.
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        match provider {
            ProviderKind::Imagen3 => self.model = IMAGEN3_MODEL.to_string(),
            ProviderKind::Gemini if self.model == IMAGEN3_MODEL => {
                self.model = DEFAULT_IMAGE_MODEL.to_string()
            }
            ProviderKind::Gemini => {}
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !crate::models::is_known_model(&model) {
            log::warn!("Model {} may not support image generation", model);
        }
        self.model = model;
        self
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub image: ImageGenConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            gemini: GeminiConfig::from_env(),
            image: ImageGenConfig::from_env(),
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_image(mut self, config: ImageGenConfig) -> Self {
        self.image = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credential_is_absent() {
        assert!(!GeminiConfig::new().has_credential());
        assert!(!GeminiConfig::new().with_api_key("   ").has_credential());
        assert_eq!(
            GeminiConfig::new().with_api_key(" abc ").credential(),
            Some("abc")
        );
    }

    #[test]
    fn test_provider_switch_updates_model() {
        let config = ImageGenConfig::new().with_provider(ProviderKind::Imagen3);
        assert_eq!(config.model, IMAGEN3_MODEL);

        let config = config.with_provider(ProviderKind::Gemini);
        assert_eq!(config.model, DEFAULT_IMAGE_MODEL);

        let config = ImageGenConfig::new()
            .with_model("gemini-1.5-flash")
            .with_provider(ProviderKind::Gemini);
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = GeminiConfig::new().with_base_url("http://localhost:8080/");
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(GeminiConfig::new().base_url(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("vi".parse::<Locale>(), Ok(Locale::Vietnamese));
        assert_eq!("English".parse::<Locale>(), Ok(Locale::English));
        assert!("fr".parse::<Locale>().is_err());
    }
}
