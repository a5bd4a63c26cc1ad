//! agrimarket application wiring the assists to their model services

use crate::assist::{
    AgreementSummarizer, CropImageGenerator, CropImageInput, ListingAssistant, QualityNoteGenerator,
    QualityNotesInput, QualityNotesOutput, SummarizeAgreementInput, SummarizeAgreementOutput,
};
use crate::config::{AdvisorConfig, GeminiConfig};
use crate::error::{AgriMarketError, Result};
use crate::genai::{GeminiClient, ImageGenerationService, MediaPart, TextGenerationService};
use crate::negotiation::{NegotiationAdvisor, SuggestCounterOfferInput, SuggestCounterOfferOutput};
use std::path::Path;
use std::sync::Arc;

/// Main agrimarket application
#[derive(Clone)]
pub struct AgriMarketApp {
    advisor: NegotiationAdvisor,
    quality_notes: QualityNoteGenerator,
    summarizer: AgreementSummarizer,
    images: CropImageGenerator,
}

impl AgriMarketApp {
    /// Build against the hosted Gemini API configured in the environment
    pub fn from_env(config: AdvisorConfig) -> Result<Self> {
        let gemini = GeminiConfig::from_env()?.with_request_timeout(config.timeout);
        let client = Arc::new(GeminiClient::new(gemini)?);
        tracing::debug!(config = ?client.config(), "Using Gemini client");
        Self::with_services(client.clone(), client, config)
    }

    pub fn with_services(
        text: Arc<dyn TextGenerationService>,
        image: Arc<dyn ImageGenerationService>,
        config: AdvisorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout;

        Ok(Self {
            quality_notes: QualityNoteGenerator::new(text.clone(), timeout),
            summarizer: AgreementSummarizer::new(text.clone(), timeout),
            images: CropImageGenerator::new(image, timeout),
            advisor: NegotiationAdvisor::with_config(text, config),
        })
    }

    pub fn advisor(&self) -> &NegotiationAdvisor {
        &self.advisor
    }

    pub fn summarizer(&self) -> &AgreementSummarizer {
        &self.summarizer
    }

    pub fn listing_assistant(&self) -> ListingAssistant {
        ListingAssistant::new(self.quality_notes.clone(), self.images.clone())
    }

    /// Counter-offer from inline text or a history file
    pub async fn suggest_counter_offer(
        &self,
        offer: f64,
        listing_price: f64,
        history: Option<String>,
        history_file: Option<&Path>,
    ) -> Result<SuggestCounterOfferOutput> {
        let negotiation_history = match (history, history_file) {
            (Some(text), _) => text,
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => String::new(),
        };

        self.advisor
            .suggest(SuggestCounterOfferInput {
                negotiation_history,
                current_retailer_offer: offer,
                farmer_listing_price: listing_price,
            })
            .await
    }

    pub async fn quality_notes(&self, crop_type: &str, photo: &Path) -> Result<QualityNotesOutput> {
        let mime_type = image_mime_type(photo)?;
        let bytes = std::fs::read(photo)?;
        let media = MediaPart::from_bytes(mime_type, &bytes);

        self.quality_notes
            .generate(&QualityNotesInput {
                crop_photo_data_uri: media.to_data_uri(),
                crop_type: crop_type.to_string(),
            })
            .await
    }

    pub async fn summarize(&self, agreement_file: &Path) -> Result<SummarizeAgreementOutput> {
        let agreement_text = std::fs::read_to_string(agreement_file)?;
        self.summarizer
            .summarize(&SummarizeAgreementInput { agreement_text })
            .await
    }

    /// Generate a crop image. With `out`, the decoded image is written there
    /// and the path is returned; otherwise the data URI is returned.
    pub async fn crop_image(&self, crop_type: &str, out: Option<&Path>) -> Result<String> {
        let output = self
            .images
            .generate(&CropImageInput {
                crop_type: crop_type.to_string(),
            })
            .await?;

        match out {
            None => Ok(output.image_url),
            Some(path) => {
                let media = MediaPart::from_data_uri(&output.image_url)?;
                std::fs::write(path, media.decode()?)?;
                tracing::info!("Wrote {} image to {}", media.mime_type, path.display());
                Ok(path.display().to_string())
            }
        }
    }
}

fn image_mime_type(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => Err(AgriMarketError::InvalidInput(format!(
            "unsupported photo type: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::{ScriptedImageService, ScriptedReply, ScriptedTextService};
    use serde_json::json;
    use std::io::Write;
    use std::time::Duration;

    fn app(text: ScriptedReply) -> (Arc<ScriptedTextService>, AgriMarketApp) {
        let text = Arc::new(ScriptedTextService::always(text));
        let image = Arc::new(ScriptedImageService::returning(MediaPart::from_bytes(
            "image/png",
            b"\x89PNG",
        )));
        let app = AgriMarketApp::with_services(text.clone(), image, AdvisorConfig::default()).unwrap();
        (text, app)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let text = Arc::new(ScriptedTextService::always(ScriptedReply::Hang));
        let image = Arc::new(ScriptedImageService::failing());
        let config = AdvisorConfig::default().with_timeout(Duration::ZERO);

        assert!(AgriMarketApp::with_services(text, image, config).is_err());
    }

    #[tokio::test]
    async fn test_suggest_from_history_file() {
        let (service, app) = app(ScriptedReply::Respond(json!({
            "suggestedCounterOffer": 500.0,
            "reasoning": "Quality justifies the ask"
        })));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Retailer: 100 per ton for 10 tons?").unwrap();

        let output = app
            .suggest_counter_offer(100.0, 150.0, None, Some(file.path()))
            .await
            .unwrap();

        assert_eq!(output.suggested_counter_offer, 150.0);
        assert!(service
            .last_request()
            .unwrap()
            .prompt
            .contains("Retailer: 100 per ton for 10 tons?"));
    }

    #[tokio::test]
    async fn test_suggest_missing_history_file() {
        let (service, app) = app(ScriptedReply::Hang);

        let result = app
            .suggest_counter_offer(100.0, 150.0, None, Some(Path::new("/nonexistent/history.txt")))
            .await;
        assert!(matches!(result, Err(AgriMarketError::Io(_))));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_quality_notes_from_photo() {
        let (service, app) = app(ScriptedReply::Respond(json!({"qualityNotes": "Plump grains"})));
        let mut photo = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        photo.write_all(b"hello").unwrap();

        let output = app.quality_notes("Rice", photo.path()).await.unwrap();

        assert_eq!(output.quality_notes, "Plump grains");
        let media = service.last_request().unwrap().media.unwrap();
        assert_eq!(media.mime_type, "image/jpeg");
        assert_eq!(media.data, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_quality_notes_unsupported_photo() {
        let (_, app) = app(ScriptedReply::Hang);
        let photo = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();

        let result = app.quality_notes("Rice", photo.path()).await;
        assert!(matches!(result, Err(AgriMarketError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_summarize_file() {
        let (_, app) = app(ScriptedReply::Respond(json!({"summary": "10 t at 140"})));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Farmer sells 10 tons at 140 per ton.").unwrap();

        let output = app.summarize(file.path()).await.unwrap();
        assert_eq!(output.summary, "10 t at 140");
    }

    #[tokio::test]
    async fn test_crop_image_to_file() {
        let (_, app) = app(ScriptedReply::Hang);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("wheat.png");

        let written = app.crop_image("Wheat", Some(&out)).await.unwrap();

        assert_eq!(written, out.display().to_string());
        assert_eq!(std::fs::read(&out).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_crop_image_data_uri() {
        let (_, app) = app(ScriptedReply::Hang);

        let uri = app.crop_image("Wheat", None).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
