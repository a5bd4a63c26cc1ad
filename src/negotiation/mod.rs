//! Negotiation assist: bounded counter-offer suggestions

pub mod advisor;
pub mod bounds;
pub mod transcript;
pub mod types;

pub use advisor::NegotiationAdvisor;
pub use bounds::{BoundsPolicy, PriceBounds};
pub use transcript::{NegotiationTranscript, Proposal};
pub use types::{
    CounterOfferSuggestion, NegotiationContext, Party, SuggestCounterOfferInput,
    SuggestCounterOfferOutput,
};
