//! Car Price Estimator - price estimates from a pre-trained regression model
//!
//! This library turns free-text car specifications into the feature row a
//! trained model expects, runs the model and prices the result.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{build_feature_row, extract_number, Estimator, FeatureOrder, FeatureRow};
pub use models::{EstimateResponse, PricingPolicy, RawInputs};
pub use services::{ModelContext, Regressor};
