//! Quality notes for a listing, generated from a crop photo

use crate::error::{AgriMarketError, Result};
use crate::genai::{generate_structured, GenerationRequest, MediaPart, TextGenerationService};
use crate::prompts;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityNotesInput {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub crop_photo_data_uri: String,
    pub crop_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityNotesOutput {
    pub quality_notes: String,
}

#[derive(Clone)]
pub struct QualityNoteGenerator {
    service: Arc<dyn TextGenerationService>,
    timeout: Duration,
}

impl QualityNoteGenerator {
    pub fn new(service: Arc<dyn TextGenerationService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub async fn generate(&self, input: &QualityNotesInput) -> Result<QualityNotesOutput> {
        let crop_type = input.crop_type.trim();
        if crop_type.is_empty() {
            return Err(AgriMarketError::InvalidInput("cropType is required".to_string()));
        }
        let photo = MediaPart::from_data_uri(&input.crop_photo_data_uri)?;
        if !photo.mime_type.starts_with("image/") {
            return Err(AgriMarketError::InvalidInput(format!(
                "crop photo must be an image, got {}",
                photo.mime_type
            )));
        }

        tracing::debug!(crop_type, mime_type = %photo.mime_type, "Requesting quality notes");
        let request = GenerationRequest::new(prompts::quality_notes(crop_type), output_schema())
            .with_media(photo);
        let output: QualityNotesOutput =
            generate_structured(self.service.as_ref(), request, self.timeout).await?;

        if output.quality_notes.trim().is_empty() {
            return Err(AgriMarketError::EmptyOutput("qualityNotes"));
        }
        Ok(output)
    }
}

fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "qualityNotes": {
                "type": "string",
                "description": "AI-generated quality notes for the crop (e.g., Excellent grain uniformity)."
            }
        },
        "required": ["qualityNotes"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::{ScriptedReply, ScriptedTextService};

    const PHOTO: &str = "data:image/jpeg;base64,aGVsbG8=";

    fn generator(reply: ScriptedReply) -> (Arc<ScriptedTextService>, QualityNoteGenerator) {
        let service = Arc::new(ScriptedTextService::always(reply));
        let generator = QualityNoteGenerator::new(service.clone(), Duration::from_secs(1));
        (service, generator)
    }

    fn input(photo: &str, crop_type: &str) -> QualityNotesInput {
        QualityNotesInput {
            crop_photo_data_uri: photo.to_string(),
            crop_type: crop_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_generates_notes_with_photo() {
        let (service, generator) = generator(ScriptedReply::Respond(json!({
            "qualityNotes": "Excellent grain uniformity, low moisture."
        })));

        let output = generator.generate(&input(PHOTO, "Rice")).await.unwrap();
        assert_eq!(output.quality_notes, "Excellent grain uniformity, low moisture.");

        let request = service.last_request().unwrap();
        assert!(request.prompt.contains("Crop Type: Rice"));
        let media = request.media.unwrap();
        assert_eq!(media.mime_type, "image/jpeg");
        assert_eq!(media.data, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_rejects_bad_input_without_call() {
        let (service, generator) = generator(ScriptedReply::Respond(json!({"qualityNotes": "x"})));

        for bad in [
            input("not-a-data-uri", "Rice"),
            input(PHOTO, "  "),
            input("data:application/pdf;base64,aGVsbG8=", "Rice"),
        ] {
            let result = generator.generate(&bad).await;
            assert!(matches!(result, Err(AgriMarketError::InvalidInput(_))));
        }
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_notes() {
        let (_, generator) = generator(ScriptedReply::Respond(json!({"qualityNotes": ""})));

        let result = generator.generate(&input(PHOTO, "Wheat")).await;
        assert!(matches!(result, Err(AgriMarketError::EmptyOutput("qualityNotes"))));
    }

    #[tokio::test]
    async fn test_service_failure() {
        let (_, generator) = generator(ScriptedReply::Malformed("truncated".to_string()));

        let result = generator.generate(&input(PHOTO, "Wheat")).await;
        assert!(matches!(result, Err(AgriMarketError::UpstreamService(_))));
    }
}
