use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Form inputs for one price estimate
///
/// Numeric fields are free text (`"150 hp"`); a bare JSON number is accepted
/// as well. Absent or `null` numeric fields count as missing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RawInputs {
    #[serde(default, alias = "companyName")]
    pub company: String,
    #[serde(default, alias = "carName")]
    pub model: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub capacity: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub horsepower: Option<String>,
    #[serde(default, rename = "topSpeed", alias = "top_speed", deserialize_with = "text_or_number")]
    pub top_speed: Option<String>,
    #[serde(default, alias = "acceleration", deserialize_with = "text_or_number")]
    pub accel: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub torque: Option<String>,
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_seats")]
    pub seats: u8,
    #[serde(default, alias = "fuelType")]
    pub fuel: String,
}

fn default_seats() -> u8 {
    5
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(f64),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}

/// Largest sample preview; bigger requests are capped, not rejected
pub const MAX_SAMPLE_LIMIT: usize = 100;

/// Query for the reference sample preview
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SampleQuery {
    #[validate(range(min = 1))]
    #[serde(default = "default_sample_limit")]
    pub limit: usize,
}

impl SampleQuery {
    pub fn capped_limit(&self) -> usize {
        self.limit.min(MAX_SAMPLE_LIMIT)
    }
}

fn default_sample_limit() -> usize {
    10
}

/// Query for the nearest-price lookup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearestQuery {
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1, max = 50))]
    #[serde(default = "default_nearest_limit")]
    pub limit: usize,
}

fn default_nearest_limit() -> usize {
    5
}
