//! GeminiApiClient - Direct REST API implementation of the diagnosis model.
//!
//! This client calls the Gemini REST API directly without CLI dependency.
//! Configuration is loaded from secret.json

use crate::{parse, prompts};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use verdant_core::diagnosis::{DetectionResult, DiagnosisModel, ModelError, RemedyResult};
use verdant_core::image::ImagePayload;
use verdant_core::secret::SecretService;
use verdant_infrastructure::SecretServiceImpl;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Diagnosis model implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiApiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from secret.json
    ///
    /// Model name defaults to `gemini-2.5-flash` if not specified.
    pub async fn try_from_secrets() -> Result<Self, ModelError> {
        let service = SecretServiceImpl::new().map_err(|e| {
            ModelError::Config(format!("Failed to initialize SecretService: {}", e))
        })?;

        let secret_config = service
            .load_secrets()
            .await
            .map_err(|e| ModelError::Config(format!("Failed to load secret.json: {}", e)))?;

        let gemini_config = secret_config.gemini.ok_or_else(|| {
            ModelError::Config("Gemini configuration not found in secret.json".to_string())
        })?;

        let model = gemini_config
            .model_name
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self::new(gemini_config.api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<String, ModelError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        };
        self.send_request(&request).await
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, ModelError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        tracing::debug!(model = %self.model, "sending Gemini generateContent request");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| ModelError::Transport {
                message: format!("Gemini API request failed: {err}"),
                retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| ModelError::Malformed(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl DiagnosisModel for GeminiApiClient {
    async fn detect(&self, image: &ImagePayload) -> Result<DetectionResult, ModelError> {
        let parts = vec![
            Part::Text {
                text: prompts::detection_prompt().to_string(),
            },
            Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.mime_type().to_string(),
                    data: BASE64_STANDARD.encode(image.bytes()),
                },
            },
        ];

        let text = self.generate(parts).await?;
        parse::detection_from_text(&text)
    }

    async fn suggest_remedies(
        &self,
        disease: &str,
        plant_description: &str,
    ) -> Result<RemedyResult, ModelError> {
        let prompt = prompts::remedy_prompt(disease, plant_description)?;
        let text = self
            .generate(vec![Part::Text { text: prompt }])
            .await?;
        parse::remedy_from_text(&text)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, ModelError> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            ModelError::Malformed("Gemini API returned no text in the response candidates".into())
        })
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> ModelError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    ModelError::Http {
        status: status.as_u16(),
        message,
        retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_inline_image_parts_in_gemini_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: "prompt".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: "image/jpeg".to_string(),
                            data: "QUJD".to_string(),
                        },
                    },
                ],
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(
            value["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["data"], "QUJD");
    }

    #[test]
    fn extract_text_takes_the_last_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hello"}]}}]}"#,
        )
        .unwrap();

        assert_eq!(extract_text_response(response).unwrap(), "hello");
    }

    #[test]
    fn extract_text_without_candidates_is_malformed() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            extract_text_response(response),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn http_error_mapping_classifies_retryability() {
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, String::new(), None);
        assert!(err.is_retryable());

        let err = map_http_error(StatusCode::BAD_REQUEST, String::new(), None);
        assert!(!err.is_retryable());

        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, String::new(), None);
        assert!(err.is_retryable());
    }

    #[test]
    fn http_error_message_prefers_the_structured_body() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string(), None);

        match err {
            ModelError::Http { message, status, .. } => {
                assert_eq!(status, 429);
                assert_eq!(message, "RESOURCE_EXHAUSTED: Quota exceeded");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn retry_after_seconds_are_parsed() {
        let header = HeaderValue::from_static("30");
        assert_eq!(
            parse_retry_after(Some(&header)),
            Some(Duration::from_secs(30))
        );

        let header = HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&header)), None);
        assert_eq!(parse_retry_after(None), None);
    }
}
