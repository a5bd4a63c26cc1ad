//! Prompt templates for the assist features

use crate::negotiation::NegotiationContext;

/// Counter-offer prompt. Placeholders: `{history}`, `{offer}`, `{listing_price}`.
pub const COUNTER_OFFER_PROMPT: &str = r#"You are an AI assistant helping a retailer negotiate with a farmer for crop prices.

Given the negotiation history, the retailer's current offer, and the farmer's original listing price, suggest a counteroffer that is likely to be accepted by the farmer.

Negotiation History: {history}
Current Retailer Offer: {offer}
Farmer Listing Price: {listing_price}

Consider factors such as market prices, crop quality (if mentioned in the history), and the urgency of the deal.

Provide a suggested counteroffer and explain your reasoning. The suggested offer should be a number.
Ensure the counteroffer is no lower than the current offer, and no higher than the farmer's listing price.

Format your response as follows:
{
  "suggestedCounterOffer": <suggested_price>,
  "reasoning": "<reasoning_for_the_suggested_price>"
}"#;

/// Quality-notes prompt. Placeholder: `{crop_type}`; the photo is attached as media.
pub const QUALITY_NOTES_PROMPT: &str = r#"You are an AI assistant that generates quality notes for crop listings based on image analysis.

Analyze the attached crop photo and generate concise, informative quality notes that highlight key characteristics.
The notes should be suitable for display on a crop listing to inform potential buyers.

Crop Type: {crop_type}

Respond with JSON: {"qualityNotes": "<notes>"}"#;

/// Agreement summary prompt. Placeholder: `{agreement}`.
pub const AGREEMENT_SUMMARY_PROMPT: &str = r#"You are an AI assistant helping users quickly understand agreements.
Summarize the following agreement, highlighting the key terms and conditions, including price, quantity, delivery details, and payment terms. Keep the summary concise and easy to understand.

Agreement:
{agreement}

Respond with JSON: {"summary": "<summary>"}"#;

/// Listing image prompt. Placeholder: `{crop_type}`.
pub const CROP_IMAGE_PROMPT: &str = "Generate a photorealistic image of harvested {crop_type}. The image should be high quality, well-lit, and suitable for a marketplace listing. Show the crop in a clean, appealing presentation, perhaps in a wooden bowl or on a simple surface.";

/// Shown to the model instead of a blank history
const EMPTY_HISTORY: &str = "(no messages exchanged yet)";

pub fn counter_offer(context: &NegotiationContext) -> String {
    let history = if context.transcript().trim().is_empty() {
        EMPTY_HISTORY
    } else {
        context.transcript()
    };

    // Price placeholders go last so a transcript containing "{offer}" stays literal
    COUNTER_OFFER_PROMPT
        .replacen("{offer}", &context.current_offer().to_string(), 1)
        .replacen("{listing_price}", &context.listing_price().to_string(), 1)
        .replacen("{history}", history, 1)
}

pub fn quality_notes(crop_type: &str) -> String {
    QUALITY_NOTES_PROMPT.replacen("{crop_type}", crop_type, 1)
}

pub fn agreement_summary(agreement: &str) -> String {
    AGREEMENT_SUMMARY_PROMPT.replacen("{agreement}", agreement, 1)
}

pub fn crop_image(crop_type: &str) -> String {
    CROP_IMAGE_PROMPT.replacen("{crop_type}", crop_type, 1)
}
