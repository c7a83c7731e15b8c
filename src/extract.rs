//! Pattern extraction over free-form model text and `data:` URI helpers.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://\S+\.(?:jpg|jpeg|png|gif|webp|svg)").expect("valid image url regex")
});

static SVG_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<svg.*?</svg>").expect("valid svg regex"));

/// Every image URL in `text`, in order of appearance.
pub fn extract_image_urls(text: &str) -> Vec<String> {
    IMAGE_URL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The first `<svg ...>...</svg>` block, verbatim.
pub fn extract_svg(text: &str) -> Option<&str> {
    SVG_BLOCK.find(text).map(|m| m.as_str())
}

pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Splits a base64 `data:` URI into its mime type and decoded bytes.
pub fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime_type.to_string(), bytes))
}

/// File extension for a mime type, `png` when unknown.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_urls() {
        let text = "See https://cdn.example.com/a/cat.PNG and http://x.io/dog.jpeg, \
                    not https://example.com/page.html";
        assert_eq!(
            extract_image_urls(text),
            vec![
                "https://cdn.example.com/a/cat.PNG".to_string(),
                "http://x.io/dog.jpeg".to_string()
            ]
        );
        assert!(extract_image_urls("no links here").is_empty());
    }

    #[test]
    fn test_extract_svg_case_insensitive_and_multiline() {
        let text = "Here you go:\n<SVG width=\"400\" height=\"300\">\n<circle r=\"4\"/>\n</svg>\nDone";
        assert_eq!(
            extract_svg(text),
            Some("<SVG width=\"400\" height=\"300\">\n<circle r=\"4\"/>\n</svg>")
        );
        assert_eq!(extract_svg("<svg width=\"1\"> unterminated"), None);
    }

    #[test]
    fn test_data_uri_roundtrip() {
        let uri = data_uri("image/svg+xml", b"<svg/>");
        let (mime, bytes) = parse_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/svg+xml");
        assert_eq!(bytes, b"<svg/>");
        assert!(parse_data_uri("https://example.com/a.png").is_none());
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/JPEG"), "jpg");
        assert_eq!(extension_for_mime("application/octet-stream"), "png");
    }
}
