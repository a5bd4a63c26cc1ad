//! Listing preparation: quality notes from the first photo, a generated
//! image when no photo was uploaded

use super::crop_image::{CropImageGenerator, CropImageInput};
use super::quality_notes::{QualityNoteGenerator, QualityNotesInput};
use crate::error::{AgriMarketError, Result};
use crate::types::{CropListing, ListingID, ListingStatus};
use serde::{Deserialize, Serialize};

/// Listing form contents before publication
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub farmer_id: String,
    pub crop_type: String,
    /// Metric tons
    pub quantity: f64,
    /// Asking price per ton
    pub price: f64,
    pub location: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Uploaded photos as data URIs
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub quality_notes: Option<String>,
}

impl ListingDraft {
    fn validate(&self) -> Result<()> {
        if self.farmer_id.trim().is_empty() {
            return Err(AgriMarketError::InvalidInput("farmerId is required".to_string()));
        }
        if self.crop_type.trim().is_empty() {
            return Err(AgriMarketError::InvalidInput("cropType is required".to_string()));
        }
        if !(self.quantity.is_finite() && self.quantity > 0.0) {
            return Err(AgriMarketError::InvalidInput(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(AgriMarketError::InvalidInput(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        Ok(())
    }

    fn has_notes(&self) -> bool {
        self.quality_notes
            .as_deref()
            .is_some_and(|notes| !notes.trim().is_empty())
    }
}

#[derive(Clone)]
pub struct ListingAssistant {
    notes: QualityNoteGenerator,
    images: CropImageGenerator,
}

impl ListingAssistant {
    pub fn new(notes: QualityNoteGenerator, images: CropImageGenerator) -> Self {
        Self { notes, images }
    }

    /// Fill in quality notes from the draft's first photo.
    pub async fn annotate_quality(&self, draft: &mut ListingDraft) -> Result<()> {
        let photo = draft.photos.first().ok_or_else(|| {
            AgriMarketError::InvalidInput("upload at least one crop photo first".to_string())
        })?;

        let output = self
            .notes
            .generate(&QualityNotesInput {
                crop_photo_data_uri: photo.clone(),
                crop_type: draft.crop_type.clone(),
            })
            .await?;
        draft.quality_notes = Some(output.quality_notes);
        Ok(())
    }

    /// Turn a draft into a publishable listing.
    ///
    /// A draft without photos gets one generated image. Listings are marked
    /// AI-verified only when they carry quality notes.
    pub async fn prepare(
        &self,
        draft: ListingDraft,
        id: ListingID,
        listing_date: String,
    ) -> Result<CropListing> {
        draft.validate()?;

        let mut images: Vec<String> = draft
            .photos
            .iter()
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .collect();

        if images.is_empty() {
            tracing::info!(listing = %id, crop_type = %draft.crop_type, "No photos uploaded, generating one");
            let generated = self
                .images
                .generate(&CropImageInput {
                    crop_type: draft.crop_type.clone(),
                })
                .await?;
            images.push(generated.image_url);
        }

        let ai_verified = draft.has_notes();
        let quality_notes = draft.quality_notes.filter(|notes| !notes.trim().is_empty());

        Ok(CropListing {
            id,
            farmer_id: draft.farmer_id,
            crop_type: draft.crop_type.trim().to_string(),
            quantity: draft.quantity,
            price: draft.price,
            location: draft.location,
            city: draft.city,
            country: draft.country,
            images,
            quality_notes,
            status: ListingStatus::Listed,
            ai_verified,
            listing_date,
        })
    }
}
