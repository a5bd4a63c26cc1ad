//! Collaborator traits for hosted generative models

use crate::error::{AgriMarketError, Result, ServiceError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Inline binary payload (an image) sent to or received from a model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaPart {
    pub mime_type: String,
    /// Standard base64 encoding of the payload
    pub data: String,
}

impl MediaPart {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse `data:<mimetype>;base64,<encoded_data>`.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            AgriMarketError::InvalidInput(format!("malformed data URI: {reason}"))
        };

        let rest = uri.strip_prefix("data:").ok_or_else(|| invalid("missing data: scheme"))?;
        let (header, data) = rest.split_once(',').ok_or_else(|| invalid("missing payload"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("payload must be base64 encoded"))?;

        if mime_type.is_empty() || !mime_type.contains('/') {
            return Err(invalid("missing MIME type"));
        }
        if data.is_empty() {
            return Err(invalid("empty payload"));
        }
        STANDARD
            .decode(data)
            .map_err(|e| invalid(&format!("invalid base64 ({e})")))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| AgriMarketError::InvalidInput(format!("invalid base64 payload: {e}")))
    }
}

/// One prompt-in, JSON-out request
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub media: Option<MediaPart>,
    /// JSON schema (OpenAPI subset) the response must follow
    pub output_schema: Value,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, output_schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            media: None,
            output_schema,
        }
    }

    pub fn with_media(mut self, media: MediaPart) -> Self {
        self.media = Some(media);
        self
    }
}

/// Hosted model that answers a prompt with structured JSON
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> std::result::Result<Value, ServiceError>;
}

/// Hosted model that renders an image from a prompt
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> std::result::Result<MediaPart, ServiceError>;
}

/// Run `request` under `timeout` and decode the answer into `T`.
pub async fn generate_structured<T>(
    service: &dyn TextGenerationService,
    request: GenerationRequest,
    timeout: Duration,
) -> std::result::Result<T, ServiceError>
where
    T: DeserializeOwned,
{
    let value = tokio::time::timeout(timeout, service.generate(request))
        .await
        .map_err(|_| ServiceError::Timeout(timeout))??;

    serde_json::from_value(value).map_err(ServiceError::SchemaMismatch)
}

/// Run an image request under `timeout`.
pub async fn generate_image_within(
    service: &dyn ImageGenerationService,
    prompt: &str,
    timeout: Duration,
) -> std::result::Result<MediaPart, ServiceError> {
    tokio::time::timeout(timeout, service.generate_image(prompt))
        .await
        .map_err(|_| ServiceError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::scripted::{ScriptedReply, ScriptedTextService};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Notes {
        notes: String,
    }

    #[test]
    fn test_data_uri_parsing() {
        let media = MediaPart::from_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(media.mime_type, "image/png");
        assert_eq!(media.decode().unwrap(), b"hello");
        assert_eq!(media.to_data_uri(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_malformed_data_uris() {
        for uri in [
            "image/png;base64,aGVsbG8=",
            "data:image/png;base64",
            "data:image/png,aGVsbG8=",
            "data:;base64,aGVsbG8=",
            "data:image/png;base64,",
            "data:image/png;base64,***",
        ] {
            assert!(
                matches!(MediaPart::from_data_uri(uri), Err(AgriMarketError::InvalidInput(_))),
                "accepted {uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_generate_structured_decodes() {
        let service = ScriptedTextService::always(ScriptedReply::Respond(json!({"notes": "firm"})));
        let request = GenerationRequest::new("describe", json!({"type": "object"}));

        let notes: Notes = generate_structured(&service, request, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(notes.notes, "firm");
    }

    #[tokio::test]
    async fn test_generate_structured_schema_mismatch() {
        let service = ScriptedTextService::always(ScriptedReply::Respond(json!({"other": 1})));
        let request = GenerationRequest::new("describe", json!({"type": "object"}));

        let result: std::result::Result<Notes, _> =
            generate_structured(&service, request, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ServiceError::SchemaMismatch(_))));
    }

    #[tokio::test]
    async fn test_generate_structured_timeout() {
        let service = ScriptedTextService::always(ScriptedReply::Hang);
        let request = GenerationRequest::new("describe", json!({"type": "object"}));

        let result: std::result::Result<Notes, _> =
            generate_structured(&service, request, Duration::from_millis(20)).await;
        assert!(matches!(result, Err(ServiceError::Timeout(d)) if d == Duration::from_millis(20)));
    }
}
