//! Hosted generative model collaborators

pub mod gemini;
pub mod scripted;
pub mod service;

pub use gemini::GeminiClient;
pub use scripted::{ScriptedImageService, ScriptedReply, ScriptedTextService};
pub use service::{
    generate_image_within, generate_structured, GenerationRequest, ImageGenerationService,
    MediaPart, TextGenerationService,
};
