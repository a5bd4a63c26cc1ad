//! Listing and deal assists built on the hosted models

pub mod agreement;
pub mod crop_image;
pub mod listing;
pub mod quality_notes;

pub use agreement::{AgreementSummarizer, SummarizeAgreementInput, SummarizeAgreementOutput};
pub use crop_image::{CropImageGenerator, CropImageInput, CropImageOutput};
pub use listing::{ListingAssistant, ListingDraft};
pub use quality_notes::{QualityNoteGenerator, QualityNotesInput, QualityNotesOutput};
