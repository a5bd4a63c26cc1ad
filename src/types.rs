//! Marketplace records shared across the assist features

use crate::error::{AgriMarketError, Result};
use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a crop listing (assigned by the persistence layer)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingID(pub String);

impl fmt::Display for ListingID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a deal between a farmer and a retailer
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealID(pub String);

impl fmt::Display for DealID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short Blake2b digest used to correlate log lines without logging content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 16]);

impl Fingerprint {
    /// Digest a sequence of fields. Each field is length-prefixed so that
    /// `["ab", "c"]` and `["a", "bc"]` differ.
    pub fn from_fields(fields: &[&[u8]]) -> Self {
        let mut hasher = Blake2b512::new();
        for field in fields {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        let result = hasher.finalize();

        let mut digest = [0u8; 16];
        digest.copy_from_slice(&result[..16]);
        Fingerprint(digest)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Marketplace participant role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Farmer,
    Retailer,
}

/// Lifecycle of a crop listing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Listed,
    Negotiating,
    Sold,
    Paid,
}

/// Lifecycle of a deal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStatus {
    Negotiating,
    Agreement,
    Signed,
    Paid,
    Completed,
    Cancelled,
}

impl DealStatus {
    /// Check if the deal can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStatus::Completed | DealStatus::Cancelled)
    }
}

/// A crop offered on the marketplace
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropListing {
    pub id: ListingID,
    pub farmer_id: String,
    pub crop_type: String,
    /// Metric tons
    pub quantity: f64,
    /// Asking price per ton
    pub price: f64,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_notes: Option<String>,
    pub status: ListingStatus,
    pub ai_verified: bool,
    pub listing_date: String,
}

/// A negotiation between one retailer and one farmer over a listing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: DealID,
    pub listing_id: ListingID,
    pub retailer_id: String,
    pub farmer_id: String,
    pub status: DealStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_summary: Option<String>,
}

impl Deal {
    /// Attach an agreement summary. A deal still negotiating moves to
    /// `Agreement`; later stages keep their status.
    pub fn record_agreement_summary(&mut self, summary: String) -> Result<()> {
        if self.status == DealStatus::Cancelled {
            return Err(AgriMarketError::InvalidInput(format!(
                "deal {} is cancelled",
                self.id
            )));
        }

        self.agreement_summary = Some(summary);
        if self.status == DealStatus::Negotiating {
            self.status = DealStatus::Agreement;
        }
        Ok(())
    }
}
