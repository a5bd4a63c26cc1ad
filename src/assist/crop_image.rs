//! Generated listing images

use crate::error::{AgriMarketError, Result};
use crate::genai::{generate_image_within, ImageGenerationService};
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropImageInput {
    pub crop_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropImageOutput {
    /// Data URI of the generated image
    pub image_url: String,
}

#[derive(Clone)]
pub struct CropImageGenerator {
    service: Arc<dyn ImageGenerationService>,
    timeout: Duration,
}

impl CropImageGenerator {
    pub fn new(service: Arc<dyn ImageGenerationService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub async fn generate(&self, input: &CropImageInput) -> Result<CropImageOutput> {
        let crop_type = input.crop_type.trim();
        if crop_type.is_empty() {
            return Err(AgriMarketError::InvalidInput("cropType is required".to_string()));
        }

        tracing::debug!(crop_type, "Requesting crop image");
        let media =
            generate_image_within(self.service.as_ref(), &prompts::crop_image(crop_type), self.timeout)
                .await?;

        if media.data.is_empty() {
            return Err(AgriMarketError::EmptyOutput("imageUrl"));
        }
        Ok(CropImageOutput {
            image_url: media.to_data_uri(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::genai::{MediaPart, ScriptedImageService};

    #[tokio::test]
    async fn test_generate_image() {
        let service = Arc::new(ScriptedImageService::returning(MediaPart::from_bytes(
            "image/png",
            b"png-bytes",
        )));
        let generator = CropImageGenerator::new(service.clone(), Duration::from_secs(1));

        let output = generator
            .generate(&CropImageInput {
                crop_type: " Wheat ".to_string(),
            })
            .await
            .unwrap();

        assert!(output.image_url.starts_with("data:image/png;base64,"));
        let prompt = service.last_prompt().unwrap();
        assert!(prompt.contains("harvested Wheat."));
    }

    #[tokio::test]
    async fn test_empty_image_data() {
        let service = Arc::new(ScriptedImageService::returning(MediaPart {
            mime_type: "image/png".to_string(),
            data: String::new(),
        }));
        let generator = CropImageGenerator::new(service, Duration::from_secs(1));

        let result = generator
            .generate(&CropImageInput {
                crop_type: "Rice".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AgriMarketError::EmptyOutput("imageUrl"))));
    }

    #[tokio::test]
    async fn test_missing_crop_type() {
        let service = Arc::new(ScriptedImageService::failing());
        let generator = CropImageGenerator::new(service.clone(), Duration::from_secs(1));

        let result = generator
            .generate(&CropImageInput {
                crop_type: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AgriMarketError::InvalidInput(_))));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_service_failure() {
        let service = Arc::new(ScriptedImageService::failing());
        let generator = CropImageGenerator::new(service, Duration::from_secs(1));

        let result = generator
            .generate(&CropImageInput {
                crop_type: "Corn".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(AgriMarketError::UpstreamService(ServiceError::Api { status: 500, .. }))
        ));
    }
}
