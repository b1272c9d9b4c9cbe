use crate::core::extract::parse_price_cell;
use crate::models::{ComparableCar, ReferenceCar};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the reference dataset
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Price column '{0}' not found")]
    MissingColumn(String),
}

/// Read-only table of known cars, used for previews and price comparisons
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    columns: Vec<String>,
    cars: Vec<ReferenceCar>,
}

impl ReferenceDataset {
    /// Load a Latin-1 encoded CSV file with a header row
    pub fn load(path: impl AsRef<Path>, price_column: &str) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_csv(&decode_latin1(&bytes), price_column)?;
        tracing::info!("Loaded {} reference cars from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parse CSV text; rows whose price cell holds no number are kept without a price
    pub fn from_csv(text: &str, price_column: &str) -> Result<Self, ReferenceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let price_index = columns
            .iter()
            .position(|c| c == price_column)
            .ok_or_else(|| ReferenceError::MissingColumn(price_column.to_string()))?;

        let mut cars = Vec::new();
        for record in reader.records() {
            let record = record?;
            let fields: BTreeMap<String, String> = columns
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column.clone(), cell.to_string()))
                .collect();
            let price_usd = record.get(price_index).and_then(parse_price_cell);

            cars.push(ReferenceCar { price_usd, fields });
        }

        Ok(Self { columns, cars })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// First `limit` rows, in file order
    pub fn sample(&self, limit: usize) -> Vec<ReferenceCar> {
        self.cars.iter().take(limit).cloned().collect()
    }

    /// Up to `limit` priced cars closest to `price`, nearest first
    ///
    /// Ties keep file order.
    pub fn nearest_by_price(&self, price: f64, limit: usize) -> Vec<ComparableCar> {
        if !price.is_finite() {
            return Vec::new();
        }

        let mut comparables: Vec<ComparableCar> = self
            .cars
            .iter()
            .filter_map(|car| {
                car.price_usd.map(|p| ComparableCar {
                    car: car.clone(),
                    price_gap: (p - price).abs(),
                })
            })
            .collect();

        comparables.sort_by(|a, b| {
            a.price_gap
                .partial_cmp(&b.price_gap)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        comparables.truncate(limit);
        comparables
    }
}

/// Latin-1 maps every byte to the code point of the same value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
