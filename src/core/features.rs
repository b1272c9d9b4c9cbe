use crate::core::encoding::{EncoderSet, Encoding};
use crate::core::extract::extract_field;
use crate::models::RawInputs;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::HashSet;

// Column names the model was trained on
pub const CAPACITY: &str = "CC/Battery Capacity";
pub const HORSEPOWER: &str = "HorsePower";
pub const TOP_SPEED: &str = "Total Speed";
pub const ACCELERATION: &str = "Performance(0 - 100 )KM/H";
pub const TORQUE: &str = "Torque";
pub const SEATS: &str = "Seats";
pub const COMPANY: &str = "Company Names";
pub const MODEL: &str = "Cars Names";
pub const ENGINE: &str = "Engines";
pub const FUEL: &str = "Fuel Types";

/// Form fields that go through a label encoder
pub const CATEGORICAL_FEATURES: [&str; 4] = [COMPANY, MODEL, ENGINE, FUEL];

/// Exact column order the model expects
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct FeatureOrder(Vec<String>);

impl FeatureOrder {
    /// Build an order; it must be non-empty and free of duplicates
    pub fn new<I, S>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err("feature order is empty".to_string());
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate feature name '{}'", name));
            }
        }

        Ok(Self(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }
}

impl TryFrom<Vec<String>> for FeatureOrder {
    type Error = String;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

/// One model input row, in [`FeatureOrder`]; `None` marks a missing value
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, Option<f64>)>,
}

impl FeatureRow {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Values in column order, ready for the regressor
    pub fn values(&self) -> Vec<Option<f64>> {
        self.columns.iter().map(|(_, value)| *value).collect()
    }

    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// How one categorical input was encoded
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryOutcome {
    pub feature: &'static str,
    pub label: String,
    pub encoding: Encoding,
}

/// Result of one normalization pass
#[derive(Debug, Clone)]
pub struct NormalizedInput {
    pub row: FeatureRow,
    /// Numeric features whose text held no parseable number
    pub missing: Vec<&'static str>,
    pub categories: Vec<CategoryOutcome>,
}

impl NormalizedInput {
    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn unseen(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.categories.iter().filter(|c| c.encoding.is_unseen())
    }
}

/// Convert raw form inputs into the model's feature row
///
/// Features the order asks for but the inputs do not produce are zero-filled;
/// produced features the order does not name are dropped.
pub fn normalize(inputs: &RawInputs, encoders: &EncoderSet, order: &FeatureOrder) -> NormalizedInput {
    let numeric = [
        (CAPACITY, extract_field(inputs.capacity.as_deref())),
        (HORSEPOWER, extract_field(inputs.horsepower.as_deref())),
        (TOP_SPEED, extract_field(inputs.top_speed.as_deref())),
        (ACCELERATION, extract_field(inputs.accel.as_deref())),
        (TORQUE, extract_field(inputs.torque.as_deref())),
    ];

    let missing: Vec<&'static str> = numeric
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

    let labels = [
        (COMPANY, inputs.company.as_str()),
        (MODEL, inputs.model.as_str()),
        (ENGINE, inputs.engine.as_str()),
        (FUEL, inputs.fuel.as_str()),
    ];

    let categories: Vec<CategoryOutcome> = labels
        .into_iter()
        .map(|(feature, label)| CategoryOutcome {
            feature,
            label: label.to_string(),
            encoding: encoders.encode(feature, label),
        })
        .collect();

    let mut produced: Vec<(&str, Option<f64>)> = Vec::with_capacity(10);
    produced.extend(numeric.iter().copied());
    produced.push((SEATS, Some(inputs.seats as f64)));
    produced.extend(
        categories
            .iter()
            .map(|c| (c.feature, Some(c.encoding.code() as f64))),
    );

    let columns = order
        .names()
        .iter()
        .map(|name| {
            let value = produced
                .iter()
                .find(|(feature, _)| *feature == name.as_str())
                .map(|(_, value)| *value)
                .unwrap_or(Some(0.0));
            (name.clone(), value)
        })
        .collect();

    NormalizedInput {
        row: FeatureRow { columns },
        missing,
        categories,
    }
}

/// Build the feature row alone, discarding the normalization diagnostics
pub fn build_feature_row(inputs: &RawInputs, encoders: &EncoderSet, order: &FeatureOrder) -> FeatureRow {
    normalize(inputs, encoders, order).row
}
