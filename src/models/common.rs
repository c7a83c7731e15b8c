use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Models that can be asked for inline image output.
pub const IMAGE_CAPABLE_MODELS: &[&str] = &[
    "gemini-1.5-pro",
    "gemini-1.5-flash",
    "gemini-2.0-flash-preview-image-generation",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: ProviderKind,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl OptionInfo {
    fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

pub fn available_models() -> Vec<ModelInfo> {
    [
        ("gemini-1.5-pro", "Gemini 1.5 Pro", "Reliable, high quality", ProviderKind::Gemini),
        ("gemini-1.5-flash", "Gemini 1.5 Flash", "Fast and efficient", ProviderKind::Gemini),
        (
            "gemini-2.0-flash-preview-image-generation",
            "Gemini 2.0 Flash (Image Gen)",
            "Specialised for image generation",
            ProviderKind::Gemini,
        ),
        (
            "imagen-3.0-generate-002",
            "Imagen 3",
            "Google Imagen 3, highest quality",
            ProviderKind::Imagen3,
        ),
        ("gemini-1.0-pro", "Gemini 1.0 Pro", "Stable, basic", ProviderKind::Gemini),
    ]
    .into_iter()
    .map(|(id, name, description, provider)| ModelInfo {
        id: id.to_string(),
        name: name.to_string(),
        provider,
        description: description.to_string(),
    })
    .collect()
}

pub fn is_known_model(model: &str) -> bool {
    available_models().iter().any(|m| m.id == model)
}

pub fn is_image_capable(model: &str) -> bool {
    IMAGE_CAPABLE_MODELS.contains(&model)
}

pub fn available_providers() -> Vec<OptionInfo> {
    vec![
        OptionInfo::new("gemini", "Gemini AI", "Google Gemini with built-in image generation"),
        OptionInfo::new("imagen3", "Imagen 3", "Google Imagen 3 professional image generation"),
    ]
}

pub fn available_styles() -> Vec<OptionInfo> {
    Style::KNOWN
        .iter()
        .map(|style| OptionInfo::new(style.as_str(), &style.display_name(), style.blurb()))
        .collect()
}

pub fn quality_options() -> Vec<OptionInfo> {
    [Quality::High, Quality::Standard, Quality::Low]
        .iter()
        .map(|q| OptionInfo::new(q.as_str(), q.display_name(), q.blurb()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Imagen3,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Imagen3 => "imagen3",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "imagen3" | "imagen-3" | "imagen" => Ok(ProviderKind::Imagen3),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Visual style of a generated image. Unrecognised names are kept verbatim
/// in `Custom` so they can still be echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Style {
    #[default]
    Photorealistic,
    Artistic,
    Anime,
    Cartoon,
    Minimalist,
    Fantasy,
    Custom(String),
}

impl Style {
    pub const KNOWN: [Style; 6] = [
        Style::Photorealistic,
        Style::Artistic,
        Style::Anime,
        Style::Cartoon,
        Style::Minimalist,
        Style::Fantasy,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Style::Photorealistic => "photorealistic",
            Style::Artistic => "artistic",
            Style::Anime => "anime",
            Style::Cartoon => "cartoon",
            Style::Minimalist => "minimalist",
            Style::Fantasy => "fantasy",
            Style::Custom(name) => name,
        }
    }

    /// The style name with its first character upper-cased.
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn blurb(&self) -> &'static str {
        match self {
            Style::Photorealistic => "As real as a photograph",
            Style::Artistic => "Painterly, artistic look",
            Style::Anime => "Anime / manga style",
            Style::Cartoon => "Cartoon animation style",
            Style::Minimalist => "Minimal and refined",
            Style::Fantasy => "Fantasy and mythological",
            Style::Custom(_) => "Custom style",
        }
    }

    /// Phrase used by the Imagen prompt builder.
    pub fn imagen_phrase(&self) -> &'static str {
        match self {
            Style::Artistic => {
                "artistic painting, creative composition, expressive brushstrokes, vivid colors"
            }
            Style::Anime => {
                "anime art style, manga illustration, cel-shaded, vibrant colors, Japanese animation"
            }
            Style::Cartoon => "cartoon illustration, animated style, bright colors, playful design",
            Style::Minimalist => {
                "minimalist design, clean composition, simple forms, elegant simplicity"
            }
            Style::Fantasy => {
                "fantasy art, magical atmosphere, ethereal lighting, mystical elements"
            }
            Style::Photorealistic | Style::Custom(_) => {
                "photorealistic, highly detailed, professional photography, natural lighting"
            }
        }
    }
}

impl From<String> for Style {
    fn from(s: String) -> Self {
        match s.as_str() {
            "photorealistic" => Style::Photorealistic,
            "artistic" => Style::Artistic,
            "anime" => Style::Anime,
            "cartoon" => Style::Cartoon,
            "minimalist" => Style::Minimalist,
            "fantasy" => Style::Fantasy,
            _ => Style::Custom(s),
        }
    }
}

impl From<&str> for Style {
    fn from(s: &str) -> Self {
        Style::from(s.to_string())
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    High,
    Standard,
    Low,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Standard => "standard",
            Quality::Low => "low",
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Quality::High => "High",
            Quality::Standard => "Standard",
            Quality::Low => "Low",
        }
    }

    fn blurb(&self) -> &'static str {
        match self {
            Quality::High => "Maximum quality",
            Quality::Standard => "Good balance",
            Quality::Low => "Faster",
        }
    }

    pub fn imagen_phrase(&self) -> &'static str {
        match self {
            Quality::High => {
                "ultra high quality, 8K resolution, masterpiece, best quality, highly detailed"
            }
            Quality::Standard => "high quality, detailed, good composition",
            Quality::Low => "standard quality, clear image",
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Quality::High),
            "standard" => Ok(Quality::Standard),
            "low" => Ok(Quality::Low),
            other => Err(format!("unknown quality: {}", other)),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "3:4")]
    Vertical,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Vertical => "3:4",
        }
    }

    pub fn format_phrase(&self) -> &'static str {
        match self {
            AspectRatio::Square => "square format",
            AspectRatio::Widescreen => "widescreen format",
            AspectRatio::Portrait => "portrait format",
            AspectRatio::Vertical => "vertical format",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(AspectRatio::Square),
            "16:9" => Ok(AspectRatio::Widescreen),
            "9:16" => Ok(AspectRatio::Portrait),
            "3:4" => Ok(AspectRatio::Vertical),
            other => Err(format!("unsupported aspect ratio: {}", other)),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
