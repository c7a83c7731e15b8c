use crate::config::Locale;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl GenError {
    /// Maps the error onto the user-facing taxonomy.
    ///
    /// Structured variants map directly; everything else goes through the
    /// substring rules in [`classify`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenError::MissingCredential(_) => ErrorKind::MissingCredential,
            GenError::ParseError(_) => ErrorKind::ParseFailure,
            GenError::HttpError { status: 401, .. } | GenError::HttpError { status: 403, .. } => {
                ErrorKind::InvalidCredential
            }
            GenError::HttpError { status: 429, .. } => ErrorKind::QuotaExceeded,
            GenError::HttpError { status: 404, .. } => ErrorKind::ModelUnavailable,
            GenError::NetworkError(_) => ErrorKind::NetworkFailure,
            other => classify(&other.to_string()),
        }
    }

    /// Localized, complete sentence suitable for display.
    pub fn describe(&self, locale: Locale) -> String {
        self.kind().describe(locale).to_string()
    }
}

impl From<reqwest::Error> for GenError {
    fn from(e: reqwest::Error) -> Self {
        // The URL would otherwise leak into classification.
        let e = e.without_url();
        if let Some(status) = e.status() {
            GenError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            GenError::NetworkError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for GenError {
    fn from(e: serde_json::Error) -> Self {
        GenError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for GenError {
    fn from(e: std::io::Error) -> Self {
        GenError::IoError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    MissingCredential,
    InvalidCredential,
    QuotaExceeded,
    SafetyBlocked,
    ModelUnavailable,
    NetworkFailure,
    ParseFailure,
    Unknown,
}

/// Ordered (substring, kind) rules; the first match wins.
///
/// Matching is heuristic and can misclassify provider wording. Order
/// matters: "api key" must be checked before "not found" because key errors
/// often read "API key not found".
const CLASSIFICATION_RULES: &[(&str, ErrorKind)] = &[
    ("api key", ErrorKind::InvalidCredential),
    ("api_key", ErrorKind::InvalidCredential),
    ("401", ErrorKind::InvalidCredential),
    ("unauthenticated", ErrorKind::InvalidCredential),
    ("permission denied", ErrorKind::InvalidCredential),
    ("quota", ErrorKind::QuotaExceeded),
    ("429", ErrorKind::QuotaExceeded),
    ("rate limit", ErrorKind::QuotaExceeded),
    ("resource exhausted", ErrorKind::QuotaExceeded),
    ("safety", ErrorKind::SafetyBlocked),
    ("blocked", ErrorKind::SafetyBlocked),
    ("model", ErrorKind::ModelUnavailable),
    ("not found", ErrorKind::ModelUnavailable),
    ("network", ErrorKind::NetworkFailure),
    ("fetch", ErrorKind::NetworkFailure),
    ("connection", ErrorKind::NetworkFailure),
    ("timed out", ErrorKind::NetworkFailure),
    ("dns", ErrorKind::NetworkFailure),
    ("parse", ErrorKind::ParseFailure),
];

pub fn classify(message: &str) -> ErrorKind {
    let lowered = message.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Unknown)
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingCredential => "missing-credential",
            ErrorKind::InvalidCredential => "invalid-credential",
            ErrorKind::QuotaExceeded => "quota-exceeded",
            ErrorKind::SafetyBlocked => "safety-blocked",
            ErrorKind::ModelUnavailable => "model-unavailable",
            ErrorKind::NetworkFailure => "network-failure",
            ErrorKind::ParseFailure => "parse-failure",
            ErrorKind::Unknown => "unknown",
        }
    }

    pub fn describe(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => match self {
                ErrorKind::MissingCredential => {
                    "Please set a Gemini API key before generating images."
                }
                ErrorKind::InvalidCredential => {
                    "The API key is invalid. Please check your Gemini API key."
                }
                ErrorKind::QuotaExceeded => {
                    "The API usage limit has been exceeded. Please try again later or check your quota."
                }
                ErrorKind::SafetyBlocked => {
                    "The content was blocked by the safety filter. Please try a different description."
                }
                ErrorKind::ModelUnavailable => {
                    "The model does not support image generation or is unavailable. Please try again later."
                }
                ErrorKind::NetworkFailure => {
                    "A network error occurred. Please check your internet connection and try again."
                }
                ErrorKind::ParseFailure => {
                    "The model output could not be interpreted. Please try again."
                }
                ErrorKind::Unknown => "An unknown error occurred. Please try again.",
            },
            Locale::Vietnamese => match self {
                ErrorKind::MissingCredential => {
                    "Vui lòng thiết lập API key Gemini trước khi tạo ảnh."
                }
                ErrorKind::InvalidCredential => {
                    "API key không hợp lệ. Vui lòng kiểm tra lại API key Gemini của bạn."
                }
                ErrorKind::QuotaExceeded => {
                    "Đã vượt quá giới hạn sử dụng API. Vui lòng thử lại sau hoặc kiểm tra quota của bạn."
                }
                ErrorKind::SafetyBlocked => {
                    "Nội dung bị chặn bởi bộ lọc an toàn. Vui lòng thử với mô tả khác."
                }
                ErrorKind::ModelUnavailable => {
                    "Model không hỗ trợ tạo ảnh hoặc không khả dụng. Vui lòng thử lại sau."
                }
                ErrorKind::NetworkFailure => {
                    "Lỗi kết nối mạng. Vui lòng kiểm tra internet và thử lại."
                }
                ErrorKind::ParseFailure => {
                    "Không thể phân tích kết quả. Vui lòng thử lại."
                }
                ErrorKind::Unknown => "Đã xảy ra lỗi không xác định. Vui lòng thử lại.",
            },
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
