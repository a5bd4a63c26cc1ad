//! Negotiation demo: counter-offer suggestions against a scripted model
//!
//! Walks through a wheat negotiation without network access:
//! 1. Build a transcript from retailer and farmer proposals
//! 2. Ask for a suggestion the model keeps in range
//! 3. Ask again with a model that overshoots the listing price (clamped)
//! 4. Show an offer that already exceeds the ask
//!
//! Run with: cargo run --example negotiation_demo

use agrimarket::genai::{ScriptedReply, ScriptedTextService};
use agrimarket::negotiation::{NegotiationAdvisor, NegotiationTranscript, Party, Proposal};
use agrimarket::types::{CropListing, ListingID, ListingStatus};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,agrimarket=debug")
        .init();

    println!("\n╔══════════════════════════════════════════════╗");
    println!("║   agrimarket Negotiation Demo                ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let listing = CropListing {
        id: ListingID("crop_wheat_01".to_string()),
        farmer_id: "farmer_harpreet".to_string(),
        crop_type: "Wheat".to_string(),
        quantity: 25.0,
        price: 150.0,
        location: "Ludhiana, Punjab".to_string(),
        city: Some("Ludhiana".to_string()),
        country: Some("India".to_string()),
        images: vec![],
        quality_notes: Some("Uniform golden kernels, low moisture".to_string()),
        status: ListingStatus::Negotiating,
        ai_verified: true,
        listing_date: "2024-05-01T00:00:00Z".to_string(),
    };

    let mut transcript = NegotiationTranscript::new(listing.id.clone());
    transcript.add_proposal(
        Proposal::new(Party::Retailer, 110.0).with_note("We can take all 25 tons this week"),
    )?;
    transcript.add_proposal(
        Proposal::new(Party::Farmer, 145.0).with_note("Quality is premium, see the notes"),
    )?;
    transcript.add_proposal(Proposal::new(Party::Retailer, 120.0))?;

    println!("📜 Transcript:");
    for line in transcript.render().lines() {
        println!("   {}", line);
    }
    println!();

    let context = transcript.context_for(&listing)?;

    // =========================================================================
    // Scenario 1: model stays in range
    // =========================================================================
    println!("┌─────────────────────────────────────────────┐");
    println!("│ Scenario 1: Suggestion within bounds        │");
    println!("└─────────────────────────────────────────────┘");
    let model = Arc::new(ScriptedTextService::always(ScriptedReply::Respond(json!({
        "suggestedCounterOffer": 134.0,
        "reasoning": "Volume and a quick close justify meeting near the middle."
    }))));
    let advisor = NegotiationAdvisor::new(model);
    let suggestion = advisor.suggest_counter_offer(&context).await?;
    println!("   💡 Suggested: {} per ton", suggestion.suggested_price);
    println!("   🧠 Reasoning: {}\n", suggestion.reasoning);

    // =========================================================================
    // Scenario 2: model overshoots, advisor clamps
    // =========================================================================
    println!("┌─────────────────────────────────────────────┐");
    println!("│ Scenario 2: Overshooting model is clamped   │");
    println!("└─────────────────────────────────────────────┘");
    let model = Arc::new(ScriptedTextService::always(ScriptedReply::Respond(json!({
        "suggestedCounterOffer": 9999.0,
        "reasoning": "Premium grade wheat commands a premium."
    }))));
    let advisor = NegotiationAdvisor::new(model);
    let suggestion = advisor.suggest_counter_offer(&context).await?;
    println!("   💡 Suggested: {} per ton (model said 9999)\n", suggestion.suggested_price);

    // =========================================================================
    // Scenario 3: offer already above the ask
    // =========================================================================
    println!("┌─────────────────────────────────────────────┐");
    println!("│ Scenario 3: Offer exceeds listing price     │");
    println!("└─────────────────────────────────────────────┘");
    transcript.add_proposal(Proposal::new(Party::Retailer, 160.0).with_note("Final offer"))?;
    let context = transcript.context_for(&listing)?;
    let suggestion = advisor.suggest_counter_offer(&context).await?;
    println!(
        "   💡 Suggested: {} per ton (no headroom left above the ask)\n",
        suggestion.suggested_price
    );

    println!("✅ Demo complete");
    Ok(())
}
