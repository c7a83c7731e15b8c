//! Deterministic placeholder artwork.
//!
//! The same idea and style always produce byte-identical SVG, so a user who
//! retries an idea sees the same placeholder. The shape layout is driven by a
//! 32-bit rolling hash over the idea's UTF-16 code units with two's-complement
//! wraparound; shifts and absolute values operate on the signed value.

use crate::models::Style;

pub const CANVAS_WIDTH: u32 = 400;
pub const CANVAS_HEIGHT: u32 = 300;
pub const CAPTION_MAX_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

impl Palette {
    pub fn for_style(style: &Style) -> Self {
        let (background, text, accent) = match style {
            Style::Artistic => ("#fff5ee", "#8b4513", "#ff6347"),
            Style::Anime => ("#ffe4e1", "#ff1493", "#ff69b4"),
            Style::Cartoon => ("#f0fff0", "#228b22", "#32cd32"),
            Style::Minimalist => ("#f8f8ff", "#696969", "#708090"),
            Style::Fantasy => ("#e6e6fa", "#4b0082", "#9370db"),
            Style::Photorealistic | Style::Custom(_) => ("#f0f8ff", "#2c3e50", "#3498db"),
        };
        Palette {
            background,
            text,
            accent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    RoundedRect,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: i64,
    pub y: i64,
    pub size: i64,
}

/// `hash = (hash << 5) - hash + unit` over UTF-16 code units, wrapping at 32 bits.
pub fn idea_hash(idea: &str) -> i32 {
    idea.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Three to five decorative shapes derived from `hash`.
pub fn shapes_for_hash(hash: i32) -> Vec<Shape> {
    let count = 3 + (hash % 3).unsigned_abs();

    (0..count)
        .map(|i| {
            let sub = (hash >> (i * 4)).unsigned_abs();
            let x = 50 + i64::from(sub % 300);
            // Reinterpreting as i32 keeps the shift arithmetic when sub == 2^31.
            let y = 50 + i64::from((sub as i32 >> 8) % 200);
            let size = 20 + i64::from(sub % 60);
            let kind = match sub % 3 {
                0 => ShapeKind::Circle,
                1 => ShapeKind::RoundedRect,
                _ => ShapeKind::Triangle,
            };
            Shape { kind, x, y, size }
        })
        .collect()
}

/// The idea as echoed on the caption panel: unchanged up to
/// [`CAPTION_MAX_CHARS`] characters, otherwise cut and ellipsis-terminated to
/// exactly that many.
pub fn caption_text(idea: &str) -> String {
    if idea.chars().count() <= CAPTION_MAX_CHARS {
        return idea.to_string();
    }
    let keep = CAPTION_MAX_CHARS - ELLIPSIS.len();
    let mut caption: String = idea.chars().take(keep).collect();
    caption.push_str(ELLIPSIS);
    caption
}

pub fn synthesize(idea: &str, style: &Style) -> String {
    let palette = Palette::for_style(style);
    let shapes = shapes_for_hash(idea_hash(idea))
        .iter()
        .map(|shape| render_shape(shape, palette.accent))
        .collect::<Vec<_>>()
        .join("\n    ");

    format!(
        r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
    <rect width="100%" height="100%" fill="{bg}" />
    {shapes}
    <rect x="20" y="200" width="360" height="80" fill="white" stroke="{accent}" stroke-width="2" rx="10" opacity="0.9" />
    <text x="200" y="40" text-anchor="middle" font-family="Arial, sans-serif" font-size="16" font-weight="bold" fill="{text}">
        AI Generated Image
    </text>
    <text x="200" y="60" text-anchor="middle" font-family="Arial, sans-serif" font-size="12" fill="{accent}">
        Style: {style}
    </text>
    <text x="200" y="230" text-anchor="middle" font-family="Arial, sans-serif" font-size="14" fill="{text}">
        "{caption}"
    </text>
    <text x="200" y="260" text-anchor="middle" font-family="Arial, sans-serif" font-size="10" fill="{accent}">
        Generated with Gemini AI
    </text>
</svg>"#,
        width = CANVAS_WIDTH,
        height = CANVAS_HEIGHT,
        bg = palette.background,
        text = palette.text,
        accent = palette.accent,
        shapes = shapes,
        style = escape_xml(&style.display_name()),
        caption = escape_xml(&caption_text(idea)),
    )
}

fn render_shape(shape: &Shape, accent: &str) -> String {
    let Shape { kind, x, y, size } = *shape;
    let half = size as f64 / 2.0;
    let (x, y) = (x as f64, y as f64);

    match kind {
        ShapeKind::Circle => format!(
            r#"<circle class="shape" cx="{}" cy="{}" r="{}" fill="{}" opacity="0.7" />"#,
            x, y, half, accent
        ),
        ShapeKind::RoundedRect => format!(
            r#"<rect class="shape" x="{}" y="{}" width="{}" height="{}" fill="{}" opacity="0.6" rx="5" />"#,
            x - half,
            y - half,
            size,
            size as f64 * 0.6,
            accent
        ),
        ShapeKind::Triangle => format!(
            r#"<polygon class="shape" points="{},{} {},{} {},{}" fill="{}" opacity="0.5" />"#,
            x,
            y - half,
            x - half,
            y + half,
            x + half,
            y + half,
            accent
        ),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
