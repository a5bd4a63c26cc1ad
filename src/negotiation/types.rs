//! Negotiation inputs and outputs

use super::bounds::PriceBounds;
use crate::error::{AgriMarketError, Result};
use crate::types::Fingerprint;
use serde::{Deserialize, Serialize};

/// Side of a negotiation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Party {
    Farmer,
    Retailer,
}

/// Everything the advisor needs for one suggestion.
///
/// Prices are validated on construction: both must be finite and
/// non-negative. No ordering between them is required.
#[derive(Clone, Debug, PartialEq)]
pub struct NegotiationContext {
    transcript: String,
    current_offer: f64,
    listing_price: f64,
}

impl NegotiationContext {
    pub fn new(transcript: String, current_offer: f64, listing_price: f64) -> Result<Self> {
        Ok(Self {
            transcript,
            current_offer: validate_price("currentOffer", current_offer)?,
            listing_price: validate_price("listingPrice", listing_price)?,
        })
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn current_offer(&self) -> f64 {
        self.current_offer
    }

    pub fn listing_price(&self) -> f64 {
        self.listing_price
    }

    /// Range a suggestion must land in
    pub fn bounds(&self) -> PriceBounds {
        PriceBounds::for_offer(self.current_offer, self.listing_price)
    }

    /// Log correlation id; never reveals the transcript
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_fields(&[
            self.transcript.as_bytes(),
            &self.current_offer.to_le_bytes(),
            &self.listing_price.to_le_bytes(),
        ])
    }
}

pub(crate) fn validate_price(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(AgriMarketError::InvalidInput(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AgriMarketError::InvalidInput(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(value)
}

/// Advisor result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterOfferSuggestion {
    pub suggested_price: f64,
    pub reasoning: String,
}

/// Caller-facing request shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestCounterOfferInput {
    #[serde(default)]
    pub negotiation_history: String,
    pub current_retailer_offer: f64,
    pub farmer_listing_price: f64,
}

impl SuggestCounterOfferInput {
    /// Parse a JSON request. Missing or non-numeric prices are input errors,
    /// not JSON errors.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AgriMarketError::InvalidInput(format!("malformed counter-offer request: {e}")))
    }
}

impl TryFrom<SuggestCounterOfferInput> for NegotiationContext {
    type Error = AgriMarketError;

    fn try_from(input: SuggestCounterOfferInput) -> Result<Self> {
        NegotiationContext::new(
            input.negotiation_history,
            input.current_retailer_offer,
            input.farmer_listing_price,
        )
    }
}

/// Caller-facing response shape; also the shape requested from the model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestCounterOfferOutput {
    pub suggested_counter_offer: f64,
    pub reasoning: String,
}

impl From<CounterOfferSuggestion> for SuggestCounterOfferOutput {
    fn from(suggestion: CounterOfferSuggestion) -> Self {
        Self {
            suggested_counter_offer: suggestion.suggested_price,
            reasoning: suggestion.reasoning,
        }
    }
}
