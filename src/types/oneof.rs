//! Oneof fields: exactly one of several named, differently typed variants.
//!
//! The selected variant travels with the value as a [`VariantValue`], so two
//! models sharing a schema never influence each other's selection.

use super::base::BaseType;
use crate::error::{ConversionError, Error, ErrorKey, FieldErrors, Result, SchemaError};
use crate::field::Field;
use crate::value::{FieldValue, Value};
use std::collections::HashMap;

/// An active oneof selection.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantValue {
    variant: String,
    value: Value,
}

impl VariantValue {
    pub fn new(variant: impl Into<String>, value: impl Into<Value>) -> Self {
        VariantValue {
            variant: variant.into(),
            value: value.into(),
        }
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.variant, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct OneOfType {
    variants: Vec<Field>,
    by_name: HashMap<String, usize>,
    by_wire: HashMap<String, usize>,
}

impl OneOfType {
    /// Declare the variants; their wire names must be unique.
    pub fn new(variants: Vec<Field>) -> std::result::Result<Self, SchemaError> {
        let mut by_name = HashMap::new();
        let mut by_wire = HashMap::new();

        for (index, variant) in variants.iter().enumerate() {
            if by_name.insert(variant.name().to_string(), index).is_some() {
                return Err(SchemaError::DuplicateField {
                    model: "oneof".to_string(),
                    field: variant.name().to_string(),
                });
            }
            if let Some(first) = by_wire.insert(variant.wire_name().to_string(), index) {
                return Err(SchemaError::DuplicateWireName {
                    wire_name: variant.wire_name().to_string(),
                    first: variants[first].name().to_string(),
                    second: variant.name().to_string(),
                });
            }
        }

        Ok(OneOfType {
            variants,
            by_name,
            by_wire,
        })
    }

    pub fn variants(&self) -> &[Field] {
        &self.variants
    }

    /// Look up a variant by its declared name or its wire name.
    pub fn variant(&self, name: &str) -> Result<&Field> {
        self.by_name
            .get(name)
            .or_else(|| self.by_wire.get(name))
            .map(|index| &self.variants[*index])
            .ok_or_else(|| Error::UnknownVariant {
                variant: name.to_string(),
                expected: self.variants.iter().map(|v| v.name().to_string()).collect(),
            })
    }

    /// Look up a variant by the wire field it is stored in.
    pub fn variant_by_wire(&self, wire_name: &str) -> Option<&Field> {
        self.by_wire.get(wire_name).map(|index| &self.variants[*index])
    }

    fn select(&self, variant: &str, value: Value) -> Result<Value> {
        let field = self.variant(variant)?;
        let value = field
            .field_type()
            .convert_value(value)
            .map_err(|e| e.at(field.name()))?;
        Ok(Value::from(VariantValue::new(field.name(), value)))
    }
}

impl BaseType for OneOfType {
    fn type_name(&self) -> &'static str {
        "oneof"
    }

    /// Accepts a [`VariantValue`], a `{"variant": .., "value": ..}` mapping or
    /// a `[variant, value]` pair.
    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Variant(variant) => {
                let (name, value) = variant.into_parts();
                self.select(&name, value)
            }
            Value::Map(mut entries) if entries.len() == 2 => {
                match (entries.shift_remove("variant"), entries.shift_remove("value")) {
                    (Some(FieldValue::Set(Value::String(name))), Some(FieldValue::Set(value))) => {
                        self.select(&name, value)
                    }
                    _ => Err(pair_error()),
                }
            }
            Value::List(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(Value::String(name)), Some(value)) => self.select(&name, value),
                    _ => Err(pair_error()),
                }
            }
            _ => Err(pair_error()),
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        let Value::Variant(variant) = value else {
            return Ok(());
        };
        let field = self
            .variant(variant.variant())
            .map_err(|e| FieldErrors::message(e.to_string()))?;
        match field.field_type().validate_value(variant.value()) {
            Ok(()) => Ok(()),
            Err(errors) => {
                let mut keyed = FieldErrors::default();
                keyed.insert(ErrorKey::Field(field.name().to_string()), errors);
                Err(keyed)
            }
        }
    }

    fn export(&self, value: &Value) -> Value {
        let Value::Variant(variant) = value else {
            return value.clone();
        };
        match self.variant(variant.variant()) {
            Ok(field) => Value::from(VariantValue::new(
                variant.variant(),
                field.field_type().export_value(variant.value()),
            )),
            Err(_) => value.clone(),
        }
    }
}

fn pair_error() -> Error {
    ConversionError::new("Value must be a (variant, value) pair.").into()
}
