//! CLI command definitions

use crate::error::Result;
use crate::negotiation::types::validate_price;
use crate::negotiation::BoundsPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "agrimarket")]
#[command(about = "agrimarket - AI assists for a farm-to-retail crop marketplace", long_about = None)]
pub struct Cli {
    /// Seconds to wait for a model response
    #[arg(long, global = true, env = "AGRIMARKET_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest a counter-offer for a negotiation
    Suggest {
        /// Retailer's current offer per ton
        #[arg(short, long, allow_negative_numbers = true)]
        offer: f64,

        /// Farmer's listing price per ton
        #[arg(short, long, allow_negative_numbers = true)]
        listing_price: f64,

        /// Negotiation history as text
        #[arg(long, conflicts_with = "history_file")]
        history: Option<String>,

        /// File containing the negotiation history
        #[arg(long)]
        history_file: Option<PathBuf>,

        /// Handling of model prices outside [offer, listing price]
        #[arg(long, value_enum, default_value_t = BoundsMode::Clamp)]
        bounds: BoundsMode,
    },

    /// Generate quality notes from a crop photo
    QualityNotes {
        /// Crop type (e.g. Wheat, Rice)
        #[arg(short, long)]
        crop_type: String,

        /// Photo file (jpg, png, webp, gif)
        #[arg(short, long)]
        photo: PathBuf,
    },

    /// Summarize an agreement text file
    Summarize {
        /// File containing the agreement
        agreement_file: PathBuf,
    },

    /// Generate a listing image for a crop
    CropImage {
        /// Crop type (e.g. Wheat, Rice)
        #[arg(short, long)]
        crop_type: String,

        /// Write the decoded image here instead of printing a data URI
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

impl Commands {
    /// Check arguments that need no model client, so bad input is reported
    /// before any configuration is loaded.
    pub fn validate(&self) -> Result<()> {
        if let Commands::Suggest {
            offer,
            listing_price,
            ..
        } = self
        {
            validate_price("currentOffer", *offer)?;
            validate_price("listingPrice", *listing_price)?;
        }
        Ok(())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsMode {
    Clamp,
    Passthrough,
}

impl From<BoundsMode> for BoundsPolicy {
    fn from(mode: BoundsMode) -> Self {
        match mode {
            BoundsMode::Clamp => BoundsPolicy::Clamp,
            BoundsMode::Passthrough => BoundsPolicy::Passthrough,
        }
    }
}
