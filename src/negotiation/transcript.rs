//! Negotiation history between a farmer and a retailer

use super::types::{validate_price, NegotiationContext, Party};
use crate::error::{AgriMarketError, Result};
use crate::types::{CropListing, ListingID};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Price proposal made during a negotiation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: Party,
    /// Per-ton price
    pub price: f64,
    /// Free-text message sent with the price
    pub note: Option<String>,
    pub timestamp: SystemTime,
}

impl Proposal {
    pub fn new(proposer: Party, price: f64) -> Self {
        Self {
            proposer,
            price,
            note: None,
            timestamp: SystemTime::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Ordered proposals exchanged over one listing
#[derive(Clone, Debug)]
pub struct NegotiationTranscript {
    listing_id: ListingID,
    proposals: Vec<Proposal>,
}

impl NegotiationTranscript {
    pub fn new(listing_id: ListingID) -> Self {
        Self {
            listing_id,
            proposals: Vec::new(),
        }
    }

    pub fn listing_id(&self) -> &ListingID {
        &self.listing_id
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Add a proposal to the transcript
    pub fn add_proposal(&mut self, proposal: Proposal) -> Result<()> {
        validate_price("price", proposal.price)?;
        self.proposals.push(proposal);
        Ok(())
    }

    /// Get the latest proposal price, if any
    pub fn latest_price(&self) -> Option<f64> {
        self.proposals.last().map(|p| p.price)
    }

    /// Most recent price proposed by `party`
    pub fn latest_offer_from(&self, party: Party) -> Option<f64> {
        self.proposals
            .iter()
            .rev()
            .find(|p| p.proposer == party)
            .map(|p| p.price)
    }

    /// One line per proposal, in order
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Advisor input for `listing`, using the retailer's latest offer
    pub fn context_for(&self, listing: &CropListing) -> Result<NegotiationContext> {
        if listing.id != self.listing_id {
            return Err(AgriMarketError::InvalidInput(format!(
                "transcript is for listing {}, not {}",
                self.listing_id, listing.id
            )));
        }

        let current_offer = self.latest_offer_from(Party::Retailer).ok_or_else(|| {
            AgriMarketError::InvalidInput(format!(
                "no retailer offer on listing {}",
                self.listing_id
            ))
        })?;

        NegotiationContext::new(self.render(), current_offer, listing.price)
    }
}

impl fmt::Display for NegotiationTranscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, proposal) in self.proposals.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let who = match proposal.proposer {
                Party::Farmer => "Farmer",
                Party::Retailer => "Retailer",
            };
            write!(f, "{} proposed {} per ton", who, proposal.price)?;
            if let Some(note) = proposal.note.as_deref().filter(|n| !n.trim().is_empty()) {
                write!(f, ": {}", note.trim())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListingStatus;

    fn listing(id: &str, price: f64) -> CropListing {
        CropListing {
            id: ListingID(id.to_string()),
            farmer_id: "farmer_1".to_string(),
            crop_type: "Wheat".to_string(),
            quantity: 10.0,
            price,
            location: "Punjab".to_string(),
            city: None,
            country: None,
            images: vec![],
            quality_notes: None,
            status: ListingStatus::Negotiating,
            ai_verified: false,
            listing_date: "2024-05-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_add_proposal() {
        let mut transcript = NegotiationTranscript::new(ListingID("crop_1".to_string()));
        transcript.add_proposal(Proposal::new(Party::Retailer, 100.0)).unwrap();

        assert_eq!(transcript.proposals().len(), 1);
        assert_eq!(transcript.latest_price(), Some(100.0));
    }

    #[test]
    fn test_rejects_invalid_price() {
        let mut transcript = NegotiationTranscript::new(ListingID("crop_1".to_string()));
        let result = transcript.add_proposal(Proposal::new(Party::Retailer, -3.0));

        assert!(result.is_err());
        assert!(transcript.proposals().is_empty());
    }

    #[test]
    fn test_multiple_proposals() {
        let mut transcript = NegotiationTranscript::new(ListingID("crop_1".to_string()));
        transcript
            .add_proposal(Proposal::new(Party::Retailer, 100.0).with_note("Bulk order, 10 tons"))
            .unwrap();
        transcript
            .add_proposal(Proposal::new(Party::Farmer, 145.0).with_note("Grain is premium grade"))
            .unwrap();
        transcript.add_proposal(Proposal::new(Party::Retailer, 110.0)).unwrap();

        assert_eq!(transcript.latest_price(), Some(110.0));
        assert_eq!(transcript.latest_offer_from(Party::Farmer), Some(145.0));
        assert_eq!(
            transcript.render(),
            "Retailer proposed 100 per ton: Bulk order, 10 tons\n\
             Farmer proposed 145 per ton: Grain is premium grade\n\
             Retailer proposed 110 per ton"
        );
    }

    #[test]
    fn test_context_for_listing() {
        let mut transcript = NegotiationTranscript::new(ListingID("crop_1".to_string()));
        transcript.add_proposal(Proposal::new(Party::Retailer, 100.0)).unwrap();
        transcript.add_proposal(Proposal::new(Party::Farmer, 140.0)).unwrap();

        let context = transcript.context_for(&listing("crop_1", 150.0)).unwrap();
        assert_eq!(context.current_offer(), 100.0);
        assert_eq!(context.listing_price(), 150.0);
        assert_eq!(context.transcript(), transcript.render());
    }

    #[test]
    fn test_context_requires_retailer_offer() {
        let mut transcript = NegotiationTranscript::new(ListingID("crop_1".to_string()));
        transcript.add_proposal(Proposal::new(Party::Farmer, 140.0)).unwrap();

        assert!(matches!(
            transcript.context_for(&listing("crop_1", 150.0)),
            Err(AgriMarketError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_context_listing_mismatch() {
        let mut transcript = NegotiationTranscript::new(ListingID("crop_1".to_string()));
        transcript.add_proposal(Proposal::new(Party::Retailer, 100.0)).unwrap();

        assert!(transcript.context_for(&listing("crop_2", 150.0)).is_err());
    }
}
