use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Code written into the feature row for a label the encoder never saw
pub const UNSEEN_CODE: i64 = -1;

/// Code written into the feature row when the field has no encoder at all
pub const NO_ENCODER_CODE: i64 = 0;

/// Serialized form of a label encoder: its training vocabulary in code order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub classes: Vec<String>,
}

/// Maps labels seen at training time to their integer codes
///
/// Codes are the position of the label in the training vocabulary, so they
/// are always non-negative and never collide with [`UNSEEN_CODE`].
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "EncoderArtifact")]
pub struct CategoryEncoder {
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl CategoryEncoder {
    /// Build an encoder from a vocabulary; duplicate labels are rejected
    pub fn new<I, S>(classes: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let mut codes = HashMap::with_capacity(classes.len());

        for (code, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), code as i64).is_some() {
                return Err(format!("duplicate class label '{}'", label));
            }
        }

        Ok(Self { classes, codes })
    }

    /// Look up a label; labels are matched exactly
    pub fn encode(&self, label: &str) -> Encoding {
        match self.codes.get(label) {
            Some(code) => Encoding::Known(*code),
            None => Encoding::Unseen,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TryFrom<EncoderArtifact> for CategoryEncoder {
    type Error = String;

    fn try_from(artifact: EncoderArtifact) -> Result<Self, Self::Error> {
        Self::new(artifact.classes)
    }
}

/// Outcome of encoding one categorical label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum Encoding {
    /// Label was part of the training vocabulary
    Known(i64),
    /// Encoder exists but the label is new
    Unseen,
    /// No encoder was shipped for this field
    NoEncoder,
}

impl Encoding {
    /// Numeric value placed in the feature row
    pub fn code(self) -> i64 {
        match self {
            Encoding::Known(code) => code,
            Encoding::Unseen => UNSEEN_CODE,
            Encoding::NoEncoder => NO_ENCODER_CODE,
        }
    }

    pub fn is_unseen(self) -> bool {
        matches!(self, Encoding::Unseen)
    }
}

/// All encoders shipped with the model, keyed by feature name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: HashMap<String, CategoryEncoder>,
}

impl EncoderSet {
    pub fn new(encoders: HashMap<String, CategoryEncoder>) -> Self {
        Self { encoders }
    }

    /// Encode `label` with the encoder registered for `field_name`
    pub fn encode(&self, field_name: &str, label: &str) -> Encoding {
        match self.encoders.get(field_name) {
            Some(encoder) => encoder.encode(label),
            None => Encoding::NoEncoder,
        }
    }

    /// Integer form of [`EncoderSet::encode`]: trained code, `-1` if unseen, `0` without encoder
    pub fn encode_category(&self, field_name: &str, label: &str) -> i64 {
        self.encode(field_name, label).code()
    }

    pub fn get(&self, field_name: &str) -> Option<&CategoryEncoder> {
        self.encoders.get(field_name)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
