// Core normalization and pricing exports
pub mod encoding;
pub mod estimator;
pub mod extract;
pub mod features;
pub mod pricing;

pub use encoding::{CategoryEncoder, EncoderSet, Encoding, UNSEEN_CODE};
pub use estimator::{Estimate, EstimateError, Estimator};
pub use extract::{extract_field, extract_number, parse_price_cell};
pub use features::{build_feature_row, normalize, FeatureOrder, FeatureRow, NormalizedInput};
pub use pricing::{confidence_band, format_amount, format_price, percentile, price_tier};
