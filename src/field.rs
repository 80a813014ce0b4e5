//! Field declarations.

use crate::types::FieldType;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type Check = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// A custom rule run against a field's converted value.
///
/// Returns the human-readable message on failure. Validators never see the
/// presence sentinel.
#[derive(Clone)]
pub struct Validator(Arc<Check>);

impl Validator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Validator(Arc::new(check))
    }

    pub fn check(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Options shared by every field kind.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub required: bool,
    pub validators: Vec<Validator>,
    /// Wire field (or oneof group) name, when it differs from the field name.
    pub wire_name: Option<String>,
    /// Overrides the model's `serialize_when_none` for this field.
    pub serialize_when_none: Option<bool>,
}

/// A named field of a model or a variant of a oneof field.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Name of the wire field this field reads from and writes to.
    pub fn wire_name(&self) -> &str {
        self.field_type
            .options()
            .wire_name
            .as_deref()
            .unwrap_or(&self.name)
    }

    pub fn required(mut self) -> Self {
        self.field_type.options_mut().required = true;
        self
    }

    pub fn rename(mut self, wire_name: impl Into<String>) -> Self {
        self.field_type.options_mut().wire_name = Some(wire_name.into());
        self
    }

    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.field_type
            .options_mut()
            .validators
            .push(Validator::new(check));
        self
    }

    pub fn serialize_when_none(mut self, serialize: bool) -> Self {
        self.field_type.options_mut().serialize_when_none = Some(serialize);
        self
    }
}
