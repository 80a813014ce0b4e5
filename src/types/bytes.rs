use super::base::BaseType;
use crate::error::{ConversionError, FieldErrors, Result};
use crate::value::Value;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use rand::Rng;

const DEFAULT_MOCK_MIN_LENGTH: usize = 5;
const DEFAULT_MOCK_MAX_LENGTH: usize = 256;

/// Byte sequences with optional length bounds.
///
/// Strings are accepted on conversion as standard base64.
#[derive(Debug, Clone, Default)]
pub struct BytesType {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl BytesType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Random bytes with a length between the configured bounds.
    pub fn mock<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
        let min = self.min_length.unwrap_or(DEFAULT_MOCK_MIN_LENGTH);
        let max = self.max_length.unwrap_or(DEFAULT_MOCK_MAX_LENGTH).max(min);

        let mut bytes = vec![0u8; rng.random_range(min..=max)];
        rng.fill(&mut bytes[..]);
        bytes
    }
}

impl BaseType for BytesType {
    fn type_name(&self) -> &'static str {
        "bytes"
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Bytes(bytes) => Ok(Value::Bytes(bytes)),
            Value::String(s) => BASE64_STANDARD.decode(s.as_bytes()).map(Value::Bytes).map_err(
                |e| ConversionError::new(format!("Value '{s}' is not valid base64: {e}")).into(),
            ),
            other => Err(ConversionError::new(format!("Value '{other}' is not bytes.")).into()),
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        let Value::Bytes(bytes) = value else {
            return Ok(());
        };
        if self.max_length.is_some_and(|max| bytes.len() > max) {
            return Err(FieldErrors::message("Bytes value is too long."));
        }
        if self.min_length.is_some_and(|min| bytes.len() < min) {
            return Err(FieldErrors::message("Bytes value is too short."));
        }
        Ok(())
    }
}
