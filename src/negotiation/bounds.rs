//! Price range enforcement for model suggestions

use serde::{Deserialize, Serialize};

/// Handling of a suggestion that falls outside [`PriceBounds`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsPolicy {
    /// Pull the price back into range
    #[default]
    Clamp,
    /// Return the model's price unchanged (the deviation is still logged)
    Passthrough,
}

/// Closed interval a counter-offer must land in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceBounds {
    lower: f64,
    upper: f64,
}

impl PriceBounds {
    /// `[current_offer, listing_price]`, or just `listing_price` when the
    /// offer already exceeds the ask.
    pub fn for_offer(current_offer: f64, listing_price: f64) -> Self {
        if current_offer <= listing_price {
            Self {
                lower: current_offer,
                upper: listing_price,
            }
        } else {
            Self {
                lower: listing_price,
                upper: listing_price,
            }
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// No negotiation headroom left
    pub fn is_collapsed(&self) -> bool {
        self.lower == self.upper
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.lower && price <= self.upper
    }

    pub fn clamp(&self, price: f64) -> f64 {
        if price.is_nan() {
            return self.lower;
        }
        price.clamp(self.lower, self.upper)
    }
}
