use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::core::features::{CategoryOutcome, FeatureRow};
use crate::models::domain::{ComparableCar, PriceBand, PriceTier, ReferenceCar};

/// Response for the estimate endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EstimateResponse {
    #[serde(rename = "estimateId")]
    pub estimate_id: String,
    /// Raw model output (USD)
    #[serde(rename = "priceUsd")]
    pub price_usd: f64,
    /// Price in display currency
    #[serde(rename = "priceLocal")]
    pub price_local: f64,
    #[serde(rename = "displayPrice")]
    pub display_price: String,
    pub band: PriceBand,
    #[serde(rename = "bandDisplay")]
    pub band_display: (String, String),
    pub tier: PriceTier,
    pub suggestion: String,
    pub warnings: Vec<String>,
    #[serde(rename = "unseenCategories")]
    pub unseen_categories: Vec<CategoryOutcome>,
    pub features: FeatureRow,
    pub comparables: Vec<ComparableCar>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "featureCount")]
    pub feature_count: usize,
    #[serde(rename = "referenceLoaded")]
    pub reference_loaded: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Choices the input form offers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsResponse {
    #[serde(rename = "fuelTypes")]
    pub fuel_types: Vec<String>,
    #[serde(rename = "minSeats")]
    pub min_seats: u8,
    #[serde(rename = "maxSeats")]
    pub max_seats: u8,
    #[serde(rename = "featureOrder")]
    pub feature_order: Vec<String>,
    /// Labels the encoders were trained on, per categorical field
    #[serde(rename = "knownLabels")]
    pub known_labels: BTreeMap<String, Vec<String>>,
}

/// Reference dataset rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceResponse {
    pub columns: Vec<String>,
    pub cars: Vec<ReferenceCar>,
}

/// Nearest-price lookup rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestResponse {
    pub price: f64,
    pub cars: Vec<ComparableCar>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
