//! Counter-offer suggestions bounded by the negotiation's price range

use super::bounds::{BoundsPolicy, PriceBounds};
use super::types::{
    CounterOfferSuggestion, NegotiationContext, SuggestCounterOfferInput, SuggestCounterOfferOutput,
};
use crate::config::AdvisorConfig;
use crate::error::{AgriMarketError, Result};
use crate::genai::{generate_structured, GenerationRequest, TextGenerationService};
use crate::prompts;
use crate::types::Fingerprint;
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;

/// Asks a text model for a counter-offer and keeps its answer inside the
/// negotiation's price bounds.
///
/// Holds no per-request state; share one instance behind an `Arc`.
#[derive(Clone)]
pub struct NegotiationAdvisor {
    service: Arc<dyn TextGenerationService>,
    config: AdvisorConfig,
}

impl NegotiationAdvisor {
    pub fn new(service: Arc<dyn TextGenerationService>) -> Self {
        Self::with_config(service, AdvisorConfig::default())
    }

    pub fn with_config(service: Arc<dyn TextGenerationService>, config: AdvisorConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Suggest a counter-offer for `context`.
    ///
    /// Makes exactly one service call. Transport, timeout and decoding
    /// failures surface as [`AgriMarketError::UpstreamService`]; a blank
    /// rationale surfaces as [`AgriMarketError::EmptyReasoning`]. An
    /// out-of-range price is not an error: it is clamped (or passed through,
    /// per [`BoundsPolicy`]) and logged.
    pub async fn suggest_counter_offer(
        &self,
        context: &NegotiationContext,
    ) -> Result<CounterOfferSuggestion> {
        let fingerprint = context.fingerprint();
        let bounds = context.bounds();
        tracing::debug!(
            %fingerprint,
            lower = bounds.lower(),
            upper = bounds.upper(),
            "Requesting counter-offer suggestion"
        );

        let request = GenerationRequest::new(prompts::counter_offer(context), output_schema());
        let output: SuggestCounterOfferOutput =
            generate_structured(self.service.as_ref(), request, self.config.timeout)
                .await
                .map_err(|e| {
                    tracing::debug!(%fingerprint, error = %e, "Counter-offer request failed");
                    AgriMarketError::UpstreamService(e)
                })?;

        if output.reasoning.trim().is_empty() {
            tracing::warn!(%fingerprint, "Model returned a suggestion without reasoning");
            return Err(AgriMarketError::EmptyReasoning);
        }

        let suggested_price =
            self.enforce_bounds(output.suggested_counter_offer, bounds, &fingerprint);

        Ok(CounterOfferSuggestion {
            suggested_price,
            reasoning: output.reasoning,
        })
    }

    /// Caller-facing entry point using the marketplace request/response shapes.
    pub async fn suggest(&self, input: SuggestCounterOfferInput) -> Result<SuggestCounterOfferOutput> {
        let context = NegotiationContext::try_from(input)?;
        let suggestion = self.suggest_counter_offer(&context).await?;
        Ok(suggestion.into())
    }

    /// Suggest for several independent negotiations concurrently.
    ///
    /// At most `max_concurrent_requests` calls are in flight; results come
    /// back in input order.
    pub async fn suggest_batch(
        &self,
        contexts: &[NegotiationContext],
    ) -> Vec<Result<CounterOfferSuggestion>> {
        let limit = self.config.max_concurrent_requests.max(1);
        stream::iter(contexts)
            .map(|context| self.suggest_counter_offer(context))
            .buffered(limit)
            .collect()
            .await
    }

    fn enforce_bounds(&self, raw: f64, bounds: PriceBounds, fingerprint: &Fingerprint) -> f64 {
        if bounds.contains(raw) {
            return raw;
        }

        match self.config.bounds_policy {
            BoundsPolicy::Clamp => {
                let clamped = bounds.clamp(raw);
                tracing::warn!(
                    %fingerprint,
                    raw,
                    clamped,
                    lower = bounds.lower(),
                    upper = bounds.upper(),
                    "Suggested price outside bounds, clamping"
                );
                clamped
            }
            BoundsPolicy::Passthrough => {
                tracing::warn!(
                    %fingerprint,
                    raw,
                    lower = bounds.lower(),
                    upper = bounds.upper(),
                    "Suggested price outside bounds, passing through"
                );
                raw
            }
        }
    }
}

fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "suggestedCounterOffer": {
                "type": "number",
                "description": "The AI-suggested counteroffer for the retailer."
            },
            "reasoning": {
                "type": "string",
                "description": "The AI reasoning behind the suggested counteroffer."
            }
        },
        "required": ["suggestedCounterOffer", "reasoning"]
    })
}
