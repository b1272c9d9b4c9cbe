use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fuel types offered by the input form
pub const FUEL_TYPES: [&str; 6] = ["Petrol", "Diesel", "Electric", "Hybrid", "plug in hyrbrid", "Other"];

/// Seat bounds offered by the input form
pub const MIN_SEATS: u8 = 1;
pub const MAX_SEATS: u8 = 10;

/// How the confidence band was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandMethod {
    /// Percentiles over the ensemble members' predictions
    EnsemblePercentile,
    /// Fixed fraction around the point estimate
    FixedFraction,
}

/// Naive confidence band around an estimate, in model currency
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
    pub method: BandMethod,
}

/// Price segment of an estimate, judged on the local-currency price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Budget,
    MidRange,
    Premium,
    Luxury,
}

impl PriceTier {
    pub fn suggestion(self) -> &'static str {
        match self {
            PriceTier::Budget => {
                "Consider checking fuel efficiency and maintenance costs for budget cars."
            }
            PriceTier::MidRange => "Good mid-range option. Check safety ratings and resale value.",
            PriceTier::Premium => {
                "Premium segment. Consider luxury features and brand reputation."
            }
            PriceTier::Luxury => {
                "High-end luxury car. Focus on performance specs and exclusive features."
            }
        }
    }
}

/// Currency and band parameters applied to every estimate
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// Display currency code
    pub currency: String,
    /// Local currency units per model unit (USD)
    pub rate: f64,
    /// Half-width of the fallback band, as a fraction of the estimate
    pub band_fraction: f64,
    /// Lower/upper percentile for ensemble bands, 0-100
    pub band_low_percentile: f64,
    pub band_high_percentile: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            currency: "PKR".to_string(),
            rate: 280.0,
            band_fraction: 0.10,
            band_low_percentile: 10.0,
            band_high_percentile: 90.0,
        }
    }
}

/// One car from the reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCar {
    /// Parsed price, when the price cell held a number
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<f64>,
    /// Raw cells keyed by column header
    pub fields: BTreeMap<String, String>,
}

/// Reference car with its distance from a queried price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableCar {
    #[serde(flatten)]
    pub car: ReferenceCar,
    #[serde(rename = "priceGap")]
    pub price_gap: f64,
}
