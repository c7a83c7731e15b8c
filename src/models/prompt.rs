use super::common::AspectRatio;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_PROMPTS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPromptRecord {
    /// 1-based position among the records kept from one response.
    pub ordinal: usize,
    pub prompt_text: String,
    pub localized_description: String,
    pub negative_prompt: String,
}

impl ParsedPromptRecord {
    /// Prompt plus negative prompt, formatted for a single clipboard copy.
    pub fn copy_all_text(&self) -> String {
        let mut text = format!("Prompt:\n{}", self.prompt_text);
        if !self.negative_prompt.is_empty() {
            text.push_str(&format!("\n\nNegative Prompt:\n{}", self.negative_prompt));
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtStyle {
    #[default]
    Realistic,
    Anime,
    Cartoon,
    OilPainting,
    Watercolor,
    DigitalArt,
    Fantasy,
    Cyberpunk,
    Minimalist,
    Vintage,
}

impl ArtStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtStyle::Realistic => "realistic",
            ArtStyle::Anime => "anime",
            ArtStyle::Cartoon => "cartoon",
            ArtStyle::OilPainting => "oil-painting",
            ArtStyle::Watercolor => "watercolor",
            ArtStyle::DigitalArt => "digital-art",
            ArtStyle::Fantasy => "fantasy",
            ArtStyle::Cyberpunk => "cyberpunk",
            ArtStyle::Minimalist => "minimalist",
            ArtStyle::Vintage => "vintage",
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            ArtStyle::Realistic => "realistic, photorealistic",
            ArtStyle::Anime => "anime style, manga style",
            ArtStyle::Cartoon => "cartoon style, animated",
            ArtStyle::OilPainting => "oil painting, classical art",
            ArtStyle::Watercolor => "watercolor painting, soft colors",
            ArtStyle::DigitalArt => "digital art, concept art",
            ArtStyle::Fantasy => "fantasy art, magical",
            ArtStyle::Cyberpunk => "cyberpunk style, neon, futuristic",
            ArtStyle::Minimalist => "minimalist, simple, clean",
            ArtStyle::Vintage => "vintage style, retro",
        }
    }
}

impl FromStr for ArtStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "realistic" => Ok(ArtStyle::Realistic),
            "anime" => Ok(ArtStyle::Anime),
            "cartoon" => Ok(ArtStyle::Cartoon),
            "oil-painting" => Ok(ArtStyle::OilPainting),
            "watercolor" => Ok(ArtStyle::Watercolor),
            "digital-art" => Ok(ArtStyle::DigitalArt),
            "fantasy" => Ok(ArtStyle::Fantasy),
            "cyberpunk" => Ok(ArtStyle::Cyberpunk),
            "minimalist" => Ok(ArtStyle::Minimalist),
            "vintage" => Ok(ArtStyle::Vintage),
            other => Err(format!("unknown art style: {}", other)),
        }
    }
}

impl fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailLevel {
    Basic,
    #[default]
    Detailed,
    VeryDetailed,
    UltraDetailed,
}

impl DetailLevel {
    pub fn phrase(&self) -> &'static str {
        match self {
            DetailLevel::Basic => "simple description",
            DetailLevel::Detailed => "detailed description with lighting and composition",
            DetailLevel::VeryDetailed => {
                "very detailed with specific camera angles, lighting, and artistic techniques"
            }
            DetailLevel::UltraDetailed => {
                "ultra detailed with professional photography terms, specific art techniques, and quality modifiers"
            }
        }
    }
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(DetailLevel::Basic),
            "detailed" => Ok(DetailLevel::Detailed),
            "very-detailed" => Ok(DetailLevel::VeryDetailed),
            "ultra-detailed" => Ok(DetailLevel::UltraDetailed),
            other => Err(format!("unknown detail level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOptions {
    pub art_style: ArtStyle,
    pub detail_level: DetailLevel,
    pub aspect_ratio: AspectRatio,
    pub count: u8,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            art_style: ArtStyle::default(),
            detail_level: DetailLevel::default(),
            aspect_ratio: AspectRatio::default(),
            count: 3,
        }
    }
}

impl PromptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_art_style(mut self, art_style: ArtStyle) -> Self {
        self.art_style = art_style;
        self
    }

    pub fn with_detail_level(mut self, detail_level: DetailLevel) -> Self {
        self.detail_level = detail_level;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Clamped to `1..=MAX_PROMPTS`.
    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count.clamp(1, MAX_PROMPTS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_all_text() {
        let mut record = ParsedPromptRecord {
            ordinal: 1,
            prompt_text: "A cat".into(),
            localized_description: String::new(),
            negative_prompt: "blurry".into(),
        };
        assert_eq!(
            record.copy_all_text(),
            "Prompt:\nA cat\n\nNegative Prompt:\nblurry"
        );
        record.negative_prompt.clear();
        assert_eq!(record.copy_all_text(), "Prompt:\nA cat");
    }

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(PromptOptions::new().with_count(0).count, 1);
        assert_eq!(PromptOptions::new().with_count(9).count, MAX_PROMPTS);
    }

    #[test]
    fn test_art_style_parse() {
        assert_eq!("oil-painting".parse::<ArtStyle>(), Ok(ArtStyle::OilPainting));
        assert_eq!(ArtStyle::Cyberpunk.phrase(), "cyberpunk style, neon, futuristic");
    }
}
