use super::{Candidate, ContentSegment, GenerationParameters, GenerativeProvider, ProviderResponse};
use crate::config::GeminiConfig;
use crate::error::{GenError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_INLINE_MIME: &str = "image/jpeg";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inlineData")]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Deserialize)]
struct GeminiInlineData {
    #[serde(default, alias = "mimeType")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// `generateContent` adapter for the Google Generative Language API.
#[derive(Clone)]
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .credential()
            .ok_or_else(|| GenError::MissingCredential("Gemini API key is required".into()))?
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: config.base_url().to_string(),
        })
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            model_id.trim()
        )
    }

    fn build_request(instruction: &str, params: &GenerationParameters) -> GeminiRequest {
        let generation_config = if *params == GenerationParameters::default() {
            None
        } else {
            Some(GeminiGenerationConfig {
                temperature: params.temperature,
                top_k: params.top_k,
                top_p: params.top_p,
                max_output_tokens: params.max_output_tokens,
                response_mime_type: params.response_format.clone(),
            })
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiRequestPart {
                    text: instruction.to_string(),
                }],
            }],
            generation_config,
        }
    }

    fn normalize(response: GeminiResponse) -> Result<ProviderResponse> {
        if response.candidates.is_empty() {
            if let Some(reason) = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
            {
                return Err(GenError::ResponseError(format!(
                    "Prompt blocked by safety filter: {}",
                    reason
                )));
            }
        }

        let candidates = response
            .candidates
            .into_iter()
            .map(|candidate| {
                if let Some(reason) = candidate.finish_reason.as_deref() {
                    log::debug!("Gemini candidate finished with reason: {}", reason);
                }
                let segments = candidate
                    .content
                    .map(|content| content.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .flat_map(|part| {
                        let mut segments = Vec::new();
                        if let Some(inline) = part.inline_data.filter(|i| !i.data.is_empty()) {
                            segments.push(ContentSegment::InlineBinary {
                                mime_type: inline
                                    .mime_type
                                    .unwrap_or_else(|| DEFAULT_INLINE_MIME.to_string()),
                                data: inline.data,
                            });
                        }
                        if let Some(text) = part.text {
                            segments.push(ContentSegment::Text(text));
                        }
                        segments
                    })
                    .collect();
                Candidate { segments }
            })
            .collect();

        Ok(ProviderResponse { candidates })
    }

    fn decode(body: &str) -> Result<ProviderResponse> {
        let parsed: GeminiResponse = serde_json::from_str(body)
            .map_err(|e| GenError::ParseError(format!("Invalid Gemini response JSON: {}", e)))?;
        Self::normalize(parsed)
    }

    fn error_from_body(status: u16, body: &str) -> GenError {
        let message = match serde_json::from_str::<GeminiErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.status {
                Some(code) => format!("{} ({})", envelope.error.message, code),
                None => envelope.error.message,
            },
            Err(_) => body.chars().take(200).collect(),
        };
        GenError::HttpError { status, message }
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn invoke(
        &self,
        model_id: &str,
        instruction: &str,
        params: &GenerationParameters,
    ) -> Result<ProviderResponse> {
        let request = Self::build_request(instruction, params);

        log::info!("Invoking Gemini model: {}", model_id);
        log::debug!("Instruction length: {} characters", instruction.len());

        let response = self
            .http
            .post(self.endpoint(model_id))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                GenError::NetworkError(format!("Gemini request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GenError::NetworkError(format!(
                "Reading Gemini response failed: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            log::error!("Gemini returned HTTP {}", status);
            return Err(Self::error_from_body(status.as_u16(), &body));
        }

        Self::decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_requires_credential() {
        let err = GeminiProvider::new(&GeminiConfig::new()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingCredential);
    }

    #[test]
    fn test_endpoint() {
        let provider = GeminiProvider::new(
            &GeminiConfig::new()
                .with_api_key("k")
                .with_base_url("http://localhost:9000/"),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint("gemini-1.5-pro"),
            "http://localhost:9000/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_request_serialization() {
        let params = GenerationParameters::new()
            .with_temperature(0.9)
            .with_top_k(32)
            .with_max_output_tokens(8192)
            .with_response_format("text/plain");
        let value = serde_json::to_value(GeminiProvider::build_request("draw", &params)).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "draw");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["generationConfig"]["topK"], 32);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(value["generationConfig"]["responseMimeType"], "text/plain");
        assert!(value["generationConfig"].get("topP").is_none());

        let bare =
            serde_json::to_value(GeminiProvider::build_request("x", &GenerationParameters::new()))
                .unwrap();
        assert!(bare.get("generationConfig").is_none());
    }

    #[test]
    fn test_normalize_mixed_parts() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}},
                        {"inlineData": {"data": "AAAA"}}
                    ]
                },
                "finishReason": "STOP"
            }]
        });
        let parsed: GeminiResponse = serde_json::from_value(raw).unwrap();
        let normalized = GeminiProvider::normalize(parsed).unwrap();
        let segments: Vec<_> = normalized.segments().cloned().collect();
        assert_eq!(
            segments,
            vec![
                ContentSegment::Text("Here is your image".into()),
                ContentSegment::InlineBinary {
                    mime_type: "image/png".into(),
                    data: "iVBORw0KGgo=".into()
                },
                ContentSegment::InlineBinary {
                    mime_type: "image/jpeg".into(),
                    data: "AAAA".into()
                },
            ]
        );
    }

    #[test]
    fn test_normalize_blocked_prompt() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let parsed: GeminiResponse = serde_json::from_value(raw).unwrap();
        let err = GeminiProvider::normalize(parsed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SafetyBlocked);
    }

    #[test]
    fn test_undecodable_body_is_parse_failure() {
        let err = GeminiProvider::decode("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, GenError::ParseError(_)));
        assert_eq!(err.kind(), ErrorKind::ParseFailure);

        let ok = GeminiProvider::decode(r#"{"candidates":[]}"#).unwrap();
        assert!(ok.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_failure() {
        let provider = GeminiProvider::new(
            &GeminiConfig::new()
                .with_api_key("k")
                .with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let err = provider
            .invoke("gemini-1.5-pro", "draw", &GenerationParameters::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NetworkFailure);
        assert!(!err.to_string().contains("generateContent"));
    }

    #[test]
    fn test_error_from_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = GeminiProvider::error_from_body(400, body);
        assert_eq!(err.kind(), ErrorKind::InvalidCredential);

        let err = GeminiProvider::error_from_body(503, "<html>upstream down</html>");
        match err {
            GenError::HttpError { status, message } => {
                assert_eq!(status, 503);
                assert!(message.contains("upstream"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
