use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::PricingPolicy;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub reference: ReferenceSettings,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Locations of the trained artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_encoders_path")]
    pub encoders_path: String,
    #[serde(default = "default_features_path")]
    pub features_path: String,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            encoders_path: default_encoders_path(),
            features_path: default_features_path(),
        }
    }
}

fn default_model_path() -> String { "artifacts/car_price_model.json".to_string() }
fn default_encoders_path() -> String { "artifacts/car_price_encoders.json".to_string() }
fn default_features_path() -> String { "artifacts/car_price_features.json".to_string() }

/// Optional reference dataset
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceSettings {
    pub path: Option<String>,
    #[serde(default = "default_price_column")]
    pub price_column: String,
    #[serde(default = "default_comparables")]
    pub comparables: usize,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            path: None,
            price_column: default_price_column(),
            comparables: default_comparables(),
        }
    }
}

fn default_price_column() -> String { "Cars Prices".to_string() }
fn default_comparables() -> usize { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default = "default_band_fraction")]
    pub band_fraction: f64,
    #[serde(default = "default_band_low_percentile")]
    pub band_low_percentile: f64,
    #[serde(default = "default_band_high_percentile")]
    pub band_high_percentile: f64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            rate: default_rate(),
            band_fraction: default_band_fraction(),
            band_low_percentile: default_band_low_percentile(),
            band_high_percentile: default_band_high_percentile(),
        }
    }
}

impl From<PricingSettings> for PricingPolicy {
    fn from(settings: PricingSettings) -> Self {
        Self {
            currency: settings.currency,
            rate: settings.rate,
            band_fraction: settings.band_fraction,
            band_low_percentile: settings.band_low_percentile,
            band_high_percentile: settings.band_high_percentile,
        }
    }
}

fn default_currency() -> String { "PKR".to_string() }
fn default_rate() -> f64 { 280.0 }
fn default_band_fraction() -> f64 { 0.10 }
fn default_band_low_percentile() -> f64 { 10.0 }
fn default_band_high_percentile() -> f64 { 90.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "CARPRICE_CONFIG";

// e.g., CARPRICE__SERVER__PORT -> server.port
fn env_overrides() -> Environment {
    Environment::with_prefix("CARPRICE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CARPRICE_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_overrides())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an explicit file (`CARPRICE_CONFIG`), still honouring env overrides
    ///
    /// Unlike [`Settings::load`], the file must exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(env_overrides())
            .build()?
            .try_deserialize()
    }

    /// `load_from` when `CARPRICE_CONFIG` names a file, `load` otherwise
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => Self::load_from(path),
            _ => Self::load(),
        }
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        self.pricing.clone().into()
    }
}
