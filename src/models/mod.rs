// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BandMethod, ComparableCar, PriceBand, PriceTier, PricingPolicy, ReferenceCar, FUEL_TYPES, MAX_SEATS, MIN_SEATS};
pub use requests::{NearestQuery, RawInputs, SampleQuery, MAX_SAMPLE_LIMIT};
pub use responses::{EstimateResponse, ErrorResponse, HealthResponse, NearestResponse, OptionsResponse, ReferenceResponse};
