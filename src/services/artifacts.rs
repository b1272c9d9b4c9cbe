use crate::core::encoding::EncoderSet;
use crate::core::features::FeatureOrder;
use crate::services::model::{ModelError, PriceModel, Regressor};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the trained artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model in {}: {source}", .path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Everything inference needs, loaded once and never mutated
pub struct ModelContext {
    model: Box<dyn Regressor>,
    encoders: EncoderSet,
    feature_order: FeatureOrder,
}

impl ModelContext {
    pub fn new(model: Box<dyn Regressor>, encoders: EncoderSet, feature_order: FeatureOrder) -> Self {
        if model.n_features() != feature_order.len() {
            tracing::warn!(
                "Model expects {} features but feature order lists {}; every prediction will fail",
                model.n_features(),
                feature_order.len()
            );
        }

        Self {
            model,
            encoders,
            feature_order,
        }
    }

    /// Load model, encoders and feature order from their JSON artifacts
    pub fn load(
        model_path: impl AsRef<Path>,
        encoders_path: impl AsRef<Path>,
        features_path: impl AsRef<Path>,
    ) -> Result<Self, ArtifactError> {
        let model_path = model_path.as_ref();
        let model: PriceModel = read_json(model_path)?;
        model.validate().map_err(|source| ArtifactError::Model {
            path: model_path.to_path_buf(),
            source,
        })?;

        let encoders: EncoderSet = read_json(encoders_path.as_ref())?;
        let feature_order: FeatureOrder = read_json(features_path.as_ref())?;

        tracing::info!(
            "Loaded {} model ({} features), {} encoders, {} feature columns",
            model.kind(),
            model.n_features(),
            encoders.len(),
            feature_order.len()
        );

        Ok(Self::new(Box::new(model), encoders, feature_order))
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    pub fn feature_order(&self) -> &FeatureOrder {
        &self.feature_order
    }
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("n_features", &self.model.n_features())
            .field("encoders", &self.encoders.len())
            .field("feature_order", &self.feature_order)
            .finish()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("car-price-artifacts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_artifacts() {
        let model = write_temp(
            "model_ok.json",
            r#"{"kind": "linear", "intercept": 1000.0, "coefficients": [2.0, 3.0]}"#,
        );
        let encoders = write_temp("encoders_ok.json", r#"{"Fuel Types": {"classes": ["Diesel", "Petrol"]}}"#);
        let features = write_temp("features_ok.json", r#"["Seats", "Fuel Types"]"#);

        let context = ModelContext::load(&model, &encoders, &features).unwrap();

        assert_eq!(context.model().n_features(), 2);
        assert_eq!(context.feature_order().len(), 2);
        assert_eq!(context.encoders().encode_category("Fuel Types", "Petrol"), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let features = write_temp("features_missing.json", r#"["Seats"]"#);
        let result = ModelContext::load("/nonexistent/car_price_model.json", &features, &features);
        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }

    #[test]
    fn test_corrupt_feature_order() {
        let model = write_temp(
            "model_dup.json",
            r#"{"kind": "linear", "intercept": 0.0, "coefficients": [1.0]}"#,
        );
        let encoders = write_temp("encoders_dup.json", "{}");
        let features = write_temp("features_dup.json", r#"["Seats", "Seats"]"#);

        let result = ModelContext::load(&model, &encoders, &features);
        assert!(matches!(result, Err(ArtifactError::Parse { .. })));
    }

    #[test]
    fn test_invalid_model_rejected() {
        let model = write_temp("model_empty.json", r#"{"kind": "forest", "n_features": 1, "trees": []}"#);
        let encoders = write_temp("encoders_empty.json", "{}");
        let features = write_temp("features_empty.json", r#"["Seats"]"#);

        let result = ModelContext::load(&model, &encoders, &features);
        assert!(matches!(result, Err(ArtifactError::Model { .. })));
    }
}
