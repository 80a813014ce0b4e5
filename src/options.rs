use serde::{Deserialize, Serialize};

/// Model-wide export options.
///
/// Deserializable from any serde format; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Whether fields holding the presence sentinel appear in exported
    /// mappings (as `Unset`, rendered `null`) or are left out entirely.
    pub serialize_when_none: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        ModelOptions {
            serialize_when_none: true,
        }
    }
}
