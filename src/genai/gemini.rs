//! Gemini REST client implementing the generation service traits

use super::service::{GenerationRequest, ImageGenerationService, MediaPart, TextGenerationService};
use crate::config::GeminiConfig;
use crate::error::{AgriMarketError, Result, ServiceError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| AgriMarketError::InvalidConfig("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AgriMarketError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn post(&self, url: String, body: &Value) -> std::result::Result<Value, ServiceError> {
        tracing::debug!(%url, "POST model endpoint");
        let response = self.http_client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| ServiceError::MalformedResponse(format!("response body is not JSON: {e}")))
    }
}

#[async_trait]
impl TextGenerationService for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> std::result::Result<Value, ServiceError> {
        let url = self.endpoint(&self.config.text_model, "generateContent");
        let body = generate_content_body(&request);
        let raw = self.post(url, &body).await?;

        let response: GenerateContentResponse = serde_json::from_value(raw)
            .map_err(|e| ServiceError::MalformedResponse(format!("unexpected response shape: {e}")))?;
        let text = response.text()?;

        serde_json::from_str(strip_code_fence(&text))
            .map_err(|e| ServiceError::MalformedResponse(format!("model output is not JSON: {e}")))
    }
}

#[async_trait]
impl ImageGenerationService for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> std::result::Result<MediaPart, ServiceError> {
        let url = self.endpoint(&self.config.image_model, "predict");
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1 },
        });
        let raw = self.post(url, &body).await?;

        let response: PredictResponse = serde_json::from_value(raw)
            .map_err(|e| ServiceError::MalformedResponse(format!("unexpected response shape: {e}")))?;

        let prediction = response
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.as_deref().is_some_and(|d| !d.is_empty()))
            .ok_or_else(|| ServiceError::MalformedResponse("no image in predictions".to_string()))?;

        Ok(MediaPart {
            mime_type: prediction.mime_type.unwrap_or_else(|| "image/png".to_string()),
            data: prediction.bytes_base64_encoded.unwrap_or_default(),
        })
    }
}

fn generate_content_body(request: &GenerationRequest) -> Value {
    let mut parts = vec![json!({ "text": request.prompt })];
    if let Some(media) = &request.media {
        parts.push(json!({
            "inlineData": { "mimeType": media.mime_type, "data": media.data }
        }));
    }

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.output_schema,
        },
    })
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Models sometimes wrap JSON in a Markdown fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner).trim();
    // Drop an info string such as `json`, with or without a line break after it
    let body = inner.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if body.trim_start().starts_with(['{', '[']) {
        body.trim()
    } else {
        inner
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn text(self) -> std::result::Result<String, ServiceError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::MalformedResponse("no candidates returned".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(ServiceError::MalformedResponse(format!(
                "candidate has no text (finish reason: {reason})"
            )));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}
