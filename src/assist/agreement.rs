//! Plain-language summaries of negotiated agreements

use crate::error::{AgriMarketError, Result};
use crate::genai::{generate_structured, GenerationRequest, TextGenerationService};
use crate::prompts;
use crate::types::{Deal, DealStatus};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeAgreementInput {
    pub agreement_text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummarizeAgreementOutput {
    pub summary: String,
}

#[derive(Clone)]
pub struct AgreementSummarizer {
    service: Arc<dyn TextGenerationService>,
    timeout: Duration,
}

impl AgreementSummarizer {
    pub fn new(service: Arc<dyn TextGenerationService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub async fn summarize(&self, input: &SummarizeAgreementInput) -> Result<SummarizeAgreementOutput> {
        if input.agreement_text.trim().is_empty() {
            return Err(AgriMarketError::InvalidInput(
                "agreementText must not be empty".to_string(),
            ));
        }

        tracing::debug!(chars = input.agreement_text.len(), "Requesting agreement summary");
        let request = GenerationRequest::new(
            prompts::agreement_summary(&input.agreement_text),
            output_schema(),
        );
        let output: SummarizeAgreementOutput =
            generate_structured(self.service.as_ref(), request, self.timeout).await?;

        if output.summary.trim().is_empty() {
            return Err(AgriMarketError::EmptyOutput("summary"));
        }
        Ok(output)
    }

    /// Summarize `agreement_text` and record the result on `deal`.
    ///
    /// Cancelled deals are rejected before the service is called.
    pub async fn summarize_deal(&self, deal: &mut Deal, agreement_text: &str) -> Result<()> {
        if deal.status == DealStatus::Cancelled {
            return Err(AgriMarketError::InvalidInput(format!("deal {} is cancelled", deal.id)));
        }

        let output = self
            .summarize(&SummarizeAgreementInput {
                agreement_text: agreement_text.to_string(),
            })
            .await?;
        deal.record_agreement_summary(output.summary)?;

        tracing::info!(deal = %deal.id, "Recorded agreement summary");
        Ok(())
    }
}

fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "A concise summary of the key terms and conditions of the agreement."
            }
        },
        "required": ["summary"]
    })
}
