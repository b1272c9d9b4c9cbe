use crate::core::features::{normalize, CategoryOutcome, FeatureRow};
use crate::core::pricing::{confidence_band, format_amount, price_tier};
use crate::models::{PriceBand, PriceTier, PricingPolicy, RawInputs};
use crate::services::model::ModelError;
use crate::services::ModelContext;
use thiserror::Error;

/// Errors that abort a single estimate
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("Prediction failed: {0}")]
    Inference(#[from] ModelError),
}

/// Result of one estimate, before it is shaped for the API
#[derive(Debug, Clone)]
pub struct Estimate {
    pub price: f64,
    pub local_price: f64,
    pub display_price: String,
    pub band: PriceBand,
    pub band_display: (String, String),
    pub tier: PriceTier,
    pub warnings: Vec<String>,
    pub unseen: Vec<CategoryOutcome>,
    pub features: FeatureRow,
}

/// Runs one submission through normalization, inference and pricing
///
/// # Pipeline Stages
/// 1. Normalize form inputs into the model's feature row
/// 2. Predict, and collect ensemble member predictions
/// 3. Derive the confidence band
/// 4. Convert, format and segment the price
#[derive(Debug, Clone)]
pub struct Estimator {
    policy: PricingPolicy,
}

impl Estimator {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: PricingPolicy::default(),
        }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Estimate a price for one set of form inputs
    ///
    /// Missing numeric fields only add a warning; the row is still submitted.
    /// Only a model failure aborts the estimate.
    pub fn estimate(&self, context: &ModelContext, inputs: &RawInputs) -> Result<Estimate, EstimateError> {
        let normalized = normalize(inputs, context.encoders(), context.feature_order());

        let mut warnings = Vec::new();
        if normalized.has_missing() {
            tracing::debug!("Missing numeric features: {:?}", normalized.missing);
            warnings.push(missing_fields_warning(&normalized.missing));
        }

        let unseen: Vec<CategoryOutcome> = normalized.unseen().cloned().collect();
        for outcome in &unseen {
            tracing::debug!("Unseen label '{}' for {}", outcome.label, outcome.feature);
        }

        let row = normalized.row.values();
        let (price, members) = context.model().predict_with_members(&row)?;

        let band = confidence_band(price, &members, &self.policy);
        let local_price = price * self.policy.rate;
        let display_price = format_amount(local_price, &self.policy.currency);
        let band_display = (
            format_amount(band.low * self.policy.rate, &self.policy.currency),
            format_amount(band.high * self.policy.rate, &self.policy.currency),
        );

        Ok(Estimate {
            price,
            local_price,
            display_price,
            band,
            band_display,
            tier: price_tier(local_price),
            warnings,
            unseen,
            features: normalized.row,
        })
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

fn missing_fields_warning(missing: &[&str]) -> String {
    format!(
        "Some numeric fields are missing or in the wrong format ({}). Enter capacity, horsepower, \
         top speed, acceleration and torque as numbers (e.g. '220 km/h', '150 hp'). \
         Prediction may be less accurate.",
        missing.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoding::{CategoryEncoder, EncoderSet};
    use crate::core::features::{FeatureOrder, CAPACITY, COMPANY, FUEL, HORSEPOWER, SEATS};
    use crate::models::BandMethod;
    use crate::services::model::{ensemble_mean, LinearModel, Regressor};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn context() -> ModelContext {
        let order = FeatureOrder::new([CAPACITY, HORSEPOWER, SEATS, COMPANY, FUEL]).unwrap();
        let mut encoders = HashMap::new();
        encoders.insert(COMPANY.to_string(), CategoryEncoder::new(["Honda", "Toyota"]).unwrap());
        encoders.insert(FUEL.to_string(), CategoryEncoder::new(["Diesel", "Petrol"]).unwrap());

        let model = LinearModel {
            intercept: 1_000.0,
            coefficients: vec![5.0, 20.0, 100.0, 500.0, 250.0],
        };

        ModelContext::new(Box::new(model), EncoderSet::new(encoders), order)
    }

    fn inputs() -> RawInputs {
        RawInputs {
            company: "Toyota".to_string(),
            model: "Corolla".to_string(),
            engine: "I4".to_string(),
            capacity: Some("1998 cc".to_string()),
            horsepower: Some("150 hp".to_string()),
            top_speed: Some("220 km/h".to_string()),
            accel: Some("8.5 sec".to_string()),
            torque: Some("240 Nm".to_string()),
            seats: 5,
            fuel: "Petrol".to_string(),
        }
    }

    #[test]
    fn test_estimate_linear() {
        let estimate = Estimator::default().estimate(&context(), &inputs()).unwrap();

        // 1000 + 5*1998 + 20*150 + 100*5 + 500*1 + 250*1
        assert_eq!(estimate.price, 15_240.0);
        assert_eq!(estimate.local_price, 15_240.0 * 280.0);
        assert_eq!(estimate.display_price, "PKR 4,267,200");
        assert_eq!(estimate.tier, PriceTier::Premium);
        assert_eq!(estimate.band.method, BandMethod::FixedFraction);
        assert!(estimate.warnings.is_empty());
        assert!(estimate.unseen.is_empty());
    }

    #[test]
    fn test_unseen_company_is_not_a_warning() {
        let mut inputs = inputs();
        inputs.company = "Lada".to_string();

        let estimate = Estimator::default().estimate(&context(), &inputs).unwrap();

        assert!(estimate.warnings.is_empty());
        assert_eq!(estimate.unseen.len(), 1);
        assert_eq!(estimate.features.get(COMPANY), Some(Some(-1.0)));
    }

    #[test]
    fn test_model_failure_aborts() {
        let mut inputs = inputs();
        inputs.capacity = Some("unknown".to_string());

        // The linear model cannot take a missing value
        let result = Estimator::default().estimate(&context(), &inputs);
        assert!(matches!(result, Err(EstimateError::Inference(ModelError::NonFinite))));
    }

    /// Ensemble that counts how often its members are evaluated
    struct CountingEnsemble {
        n_features: usize,
        evaluations: Arc<AtomicUsize>,
    }

    impl Regressor for CountingEnsemble {
        fn n_features(&self) -> usize {
            self.n_features
        }

        fn predict(&self, row: &[Option<f64>]) -> Result<f64, ModelError> {
            ensemble_mean(&self.member_predictions(row)?)
        }

        fn member_predictions(&self, _row: &[Option<f64>]) -> Result<Vec<f64>, ModelError> {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            Ok(vec![10_000.0, 12_000.0, 14_000.0])
        }
    }

    #[test]
    fn test_ensemble_evaluated_once_per_estimate() {
        let evaluations = Arc::new(AtomicUsize::new(0));
        let order = FeatureOrder::new([CAPACITY, HORSEPOWER, SEATS, COMPANY, FUEL]).unwrap();
        let model = CountingEnsemble {
            n_features: order.len(),
            evaluations: Arc::clone(&evaluations),
        };
        let context = ModelContext::new(Box::new(model), EncoderSet::default(), order);

        let estimate = Estimator::default().estimate(&context, &inputs()).unwrap();

        assert_eq!(evaluations.load(Ordering::SeqCst), 1);
        assert_eq!(estimate.price, 12_000.0);
        assert_eq!(estimate.band.method, BandMethod::EnsemblePercentile);
    }

    #[test]
    fn test_missing_fields_warning_names_fields() {
        let warning = missing_fields_warning(&[CAPACITY, HORSEPOWER]);
        assert!(warning.contains("CC/Battery Capacity, HorsePower"));
        assert!(warning.contains("less accurate"));
    }
}
