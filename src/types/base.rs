use crate::error::{FieldErrors, Result};
use crate::field::FieldOptions;
use crate::value::{FieldValue, Value};

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";

/// Conversion, validation and export rules for one kind of value.
///
/// Base types only ever see real values; the presence sentinel is handled by
/// [`Presence`] before they are called.
pub trait BaseType {
    fn type_name(&self) -> &'static str;

    fn convert(&self, value: Value) -> Result<Value>;

    fn validate(&self, _value: &Value) -> std::result::Result<(), FieldErrors> {
        Ok(())
    }

    fn export(&self, value: &Value) -> Value {
        value.clone()
    }
}

/// Wraps a base type with presence handling and the field's options.
#[derive(Debug, Clone)]
pub struct Presence<T> {
    inner: T,
    options: FieldOptions,
}

impl<T: BaseType> Presence<T> {
    pub fn new(inner: T) -> Self {
        Presence {
            inner,
            options: FieldOptions::default(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    /// `Unset` passes through untouched; anything else goes to the base type.
    pub fn convert(&self, value: FieldValue) -> Result<FieldValue> {
        match value {
            FieldValue::Unset => Ok(FieldValue::Unset),
            FieldValue::Set(value) => self.inner.convert(value).map(FieldValue::Set),
        }
    }

    pub fn check_required(&self, value: &FieldValue) -> std::result::Result<(), FieldErrors> {
        if self.options.required && value.is_unset() {
            return Err(FieldErrors::message(REQUIRED_MESSAGE));
        }
        Ok(())
    }

    /// The required check is the only rule applied to `Unset`.
    pub fn validate(&self, value: &FieldValue) -> std::result::Result<(), FieldErrors> {
        self.check_required(value)?;
        match value {
            FieldValue::Unset => Ok(()),
            FieldValue::Set(value) => self.validate_value(value),
        }
    }

    /// Run the base type's rules and then every custom validator, collecting
    /// all failures.
    pub fn validate_value(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        let mut errors = self.inner.validate(value).err().unwrap_or_default();
        for validator in &self.options.validators {
            if let Err(message) = validator.check(value) {
                errors.push(message);
            }
        }
        errors.into_result()
    }

    /// Export for a plain mapping; `None` means the field is left out.
    pub fn export(&self, value: &FieldValue, serialize_when_none: bool) -> Option<FieldValue> {
        match value {
            FieldValue::Unset => self
                .options
                .serialize_when_none
                .unwrap_or(serialize_when_none)
                .then_some(FieldValue::Unset),
            FieldValue::Set(value) => Some(FieldValue::Set(self.inner.export(value))),
        }
    }
}
