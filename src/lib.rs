//! agrimarket
//!
//! AI assists for a farm-to-retail crop marketplace:
//! - Counter-offer suggestions kept within the negotiation's price bounds
//! - Quality notes generated from crop photos
//! - Agreement summaries for deals
//! - Generated listing images when a farmer uploads none
//!
//! Model calls go through the [`genai::TextGenerationService`] and
//! [`genai::ImageGenerationService`] traits; [`genai::GeminiClient`] talks to
//! the hosted Gemini API.

pub mod assist;
pub mod cli;
pub mod config;
pub mod error;
pub mod genai;
pub mod negotiation;
pub mod prompts;
pub mod types;

// Re-export commonly used types
pub use config::{AdvisorConfig, GeminiConfig};
pub use error::{AgriMarketError, Result, ServiceError};
pub use genai::{GeminiClient, ImageGenerationService, TextGenerationService};
pub use negotiation::{
    BoundsPolicy, CounterOfferSuggestion, NegotiationAdvisor, NegotiationContext,
    SuggestCounterOfferInput, SuggestCounterOfferOutput,
};
