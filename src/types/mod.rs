//! Field adapters.
//!
//! A [`FieldType`] is one of five adapter kinds. Each wraps a [`BaseType`]
//! in [`Presence`], which handles the presence sentinel and the field's
//! options before delegating to the base type.

pub mod base;
pub mod bytes;
pub mod message;
pub mod oneof;
pub mod primitive;
pub mod repeated;
pub mod wrapper;

pub use base::{BaseType, Presence};
pub use bytes::BytesType;
pub use message::MessageType;
pub use oneof::{OneOfType, VariantValue};
pub use primitive::{BoolType, FloatType, IntType, ScalarType, StringType};
pub use repeated::ListType;

use crate::error::{ConversionError, FieldErrors, Result, SchemaError};
use crate::field::{Field, FieldOptions};
use crate::model::ModelSchema;
use crate::value::{FieldValue, Value};
use crate::wire::{decode_value, encode_scalar};
use proto_runtime::{
    ProtoFieldDescriptor, ProtoFieldValue, ProtoMessage, ProtoMessageDescriptor, ProtoSchema,
    ProtoType,
};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum FieldType {
    /// A scalar stored directly in a wire field.
    Primitive(Presence<ScalarType>),
    /// A scalar stored in the `value` field of a wrapper sub-message.
    Wrapper(Presence<ScalarType>),
    /// A nested model stored in a sub-message.
    Message(Presence<MessageType>),
    Repeated(Presence<ListType>),
    /// A selection among the members of a oneof group.
    OneOf(Presence<OneOfType>),
}

macro_rules! dispatch {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            FieldType::Primitive($p) | FieldType::Wrapper($p) => $body,
            FieldType::Message($p) => $body,
            FieldType::Repeated($p) => $body,
            FieldType::OneOf($p) => $body,
        }
    };
}

impl FieldType {
    pub fn primitive(scalar: impl Into<ScalarType>) -> Self {
        FieldType::Primitive(Presence::new(scalar.into()))
    }

    pub fn wrapper(scalar: impl Into<ScalarType>) -> Self {
        FieldType::Wrapper(Presence::new(scalar.into()))
    }

    pub fn int() -> Self {
        Self::primitive(IntType::new())
    }

    pub fn float() -> Self {
        Self::primitive(FloatType::new())
    }

    pub fn bool() -> Self {
        Self::primitive(BoolType)
    }

    pub fn string() -> Self {
        Self::primitive(StringType::new())
    }

    pub fn bytes() -> Self {
        Self::primitive(BytesType::new())
    }

    pub fn int_wrapper() -> Self {
        Self::wrapper(IntType::new())
    }

    pub fn float_wrapper() -> Self {
        Self::wrapper(FloatType::new())
    }

    pub fn bool_wrapper() -> Self {
        Self::wrapper(BoolType)
    }

    pub fn string_wrapper() -> Self {
        Self::wrapper(StringType::new())
    }

    pub fn bytes_wrapper() -> Self {
        Self::wrapper(BytesType::new())
    }

    pub fn message(schema: &Arc<ModelSchema>) -> Self {
        FieldType::Message(Presence::new(MessageType::new(schema)))
    }

    pub fn repeated(field: FieldType) -> Self {
        Self::list(ListType::new(field))
    }

    pub fn list(list: ListType) -> Self {
        FieldType::Repeated(Presence::new(list))
    }

    pub fn one_of(variants: Vec<Field>) -> std::result::Result<Self, SchemaError> {
        Ok(FieldType::OneOf(Presence::new(OneOfType::new(variants)?)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldType::Primitive(_) => "primitive",
            FieldType::Wrapper(_) => "wrapper",
            FieldType::Message(_) => "message",
            FieldType::Repeated(_) => "repeated",
            FieldType::OneOf(_) => "oneof",
        }
    }

    pub fn options(&self) -> &FieldOptions {
        dispatch!(self, p => p.options())
    }

    pub(crate) fn options_mut(&mut self) -> &mut FieldOptions {
        dispatch!(self, p => p.options_mut())
    }

    pub fn convert(&self, value: FieldValue) -> Result<FieldValue> {
        dispatch!(self, p => p.convert(value))
    }

    /// Convert a value that is known not to be the sentinel.
    pub fn convert_value(&self, value: Value) -> Result<Value> {
        dispatch!(self, p => p.inner().convert(value))
    }

    pub fn validate(&self, value: &FieldValue) -> std::result::Result<(), FieldErrors> {
        dispatch!(self, p => p.validate(value))
    }

    pub fn validate_value(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        dispatch!(self, p => p.validate_value(value))
    }

    pub fn export(&self, value: &FieldValue, serialize_when_none: bool) -> Option<FieldValue> {
        dispatch!(self, p => p.export(value, serialize_when_none))
    }

    pub fn export_value(&self, value: &Value) -> Value {
        dispatch!(self, p => p.inner().export(value))
    }

    /// Read the raw value of this field from `message`.
    ///
    /// Presence is decided by `set_fields` for compound fields and for
    /// scalars with explicit presence; other scalars always have a value.
    pub(crate) fn extract(
        &self,
        message: &ProtoMessage,
        wire_name: &str,
        set_fields: &HashSet<&str>,
    ) -> Result<FieldValue> {
        let present = set_fields.contains(wire_name);
        match self {
            FieldType::Primitive(_) => {
                let field = message.descriptor().get_field(wire_name)?;
                if field.has_presence() && !present {
                    return Ok(FieldValue::Unset);
                }
                self.read(message, wire_name).map(FieldValue::Set)
            }
            FieldType::Wrapper(_) | FieldType::Message(_) | FieldType::Repeated(_) => {
                if !present {
                    return Ok(FieldValue::Unset);
                }
                self.read(message, wire_name).map(FieldValue::Set)
            }
            FieldType::OneOf(p) => {
                let Some(member) = message.which_oneof(wire_name)? else {
                    return Ok(FieldValue::Unset);
                };
                let variant = p.inner().variant_by_wire(member).ok_or_else(|| {
                    ConversionError::new(format!(
                        "Oneof member '{member}' is not a declared variant."
                    ))
                })?;
                let value = variant
                    .field_type()
                    .read(message, member)
                    .map_err(|e| e.at(variant.name()))?;
                Ok(FieldValue::Set(Value::from(VariantValue::new(
                    variant.name(),
                    value,
                ))))
            }
        }
    }

    fn read(&self, message: &ProtoMessage, wire_name: &str) -> Result<Value> {
        match (self, message.get_field(wire_name)?) {
            (FieldType::Wrapper(_), ProtoFieldValue::Message(inner)) => wrapper::unwrap(&inner),
            (FieldType::Wrapper(_), other) => Err(ConversionError::new(format!(
                "Expected a wrapper message, got {}.",
                other.type_name()
            ))
            .into()),
            (_, value) => Ok(decode_value(value)),
        }
    }

    /// Write this field's value onto `message`; `Unset` leaves it untouched.
    pub(crate) fn dump(
        &self,
        value: &FieldValue,
        message: &mut ProtoMessage,
        wire_name: &str,
    ) -> Result<()> {
        match value {
            FieldValue::Unset => Ok(()),
            FieldValue::Set(value) => self.write(value, message, wire_name),
        }
    }

    fn write(&self, value: &Value, message: &mut ProtoMessage, wire_name: &str) -> Result<()> {
        match (self, value) {
            (FieldType::Wrapper(_), value) => wrapper::assign(message, wire_name, value),
            (FieldType::OneOf(p), Value::Variant(variant)) => {
                let field = p.inner().variant(variant.variant())?;
                field
                    .field_type()
                    .write(variant.value(), message, field.wire_name())
                    .map_err(|e| e.at(field.name()))
            }
            (FieldType::OneOf(_), other) => Err(ConversionError::new(format!(
                "Cannot write {} value to a oneof field.",
                other.kind()
            ))
            .into()),
            (_, value) => {
                let descriptor = Arc::clone(message.descriptor());
                let field = descriptor.get_field(wire_name)?;
                let encoded = self.encode(value, &field.field_type)?;
                message.set_field(wire_name, encoded)?;
                Ok(())
            }
        }
    }

    fn encode(&self, value: &Value, proto_type: &ProtoType) -> Result<ProtoFieldValue> {
        match (self, value) {
            (FieldType::Primitive(_), value) => Ok(encode_scalar(value, proto_type)?),
            (FieldType::Message(_), Value::Model(model)) => {
                Ok(ProtoFieldValue::Message(Box::new(model.to_protobuf()?)))
            }
            (FieldType::Repeated(p), Value::List(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    p.inner()
                        .field()
                        .encode(item, proto_type)
                        .map_err(|e| e.at(index.to_string()))
                })
                .collect::<Result<Vec<_>>>()
                .map(ProtoFieldValue::Repeated),
            (_, value) => Err(ConversionError::new(format!(
                "Cannot write {} value to a {} field.",
                value.kind(),
                self.kind()
            ))
            .into()),
        }
    }

    /// Check that this field can be stored in `wire_name` of `descriptor`.
    pub(crate) fn check_wire(
        &self,
        descriptor: &ProtoMessageDescriptor,
        wire_name: &str,
        proto: &ProtoSchema,
    ) -> std::result::Result<(), String> {
        if let FieldType::OneOf(p) = self {
            let group = descriptor.get_oneof(wire_name).map_err(|e| e.to_string())?;
            for variant in p.inner().variants() {
                if !group.fields.iter().any(|member| member == variant.wire_name()) {
                    return Err(format!(
                        "oneof '{wire_name}' has no member '{}'",
                        variant.wire_name()
                    ));
                }
                if matches!(
                    variant.field_type(),
                    FieldType::Repeated(_) | FieldType::OneOf(_)
                ) {
                    return Err(format!(
                        "variant '{}' cannot be a {} field",
                        variant.name(),
                        variant.field_type().kind()
                    ));
                }
                variant
                    .field_type()
                    .check_wire(descriptor, variant.wire_name(), proto)
                    .map_err(|reason| format!("variant '{}': {reason}", variant.name()))?;
            }
            return Ok(());
        }

        let field = descriptor.get_field(wire_name).map_err(|e| e.to_string())?;
        self.check_field(field, proto)
    }

    fn check_field(
        &self,
        field: &ProtoFieldDescriptor,
        proto: &ProtoSchema,
    ) -> std::result::Result<(), String> {
        let singular = || {
            if field.is_repeated {
                Err(format!("wire field is repeated {}", field.field_type))
            } else {
                Ok(())
            }
        };

        match self {
            FieldType::Primitive(p) => {
                singular()?;
                if p.inner().accepts_proto(&field.field_type) {
                    Ok(())
                } else {
                    Err(format!(
                        "{} values cannot be stored in a {} field",
                        p.inner().type_name(),
                        field.field_type
                    ))
                }
            }
            FieldType::Wrapper(p) => {
                singular()?;
                match field.field_type.message_name() {
                    Some(message_type) => wrapper::check(proto, message_type, p.inner()),
                    None => Err(format!(
                        "wire field is {}, expected a wrapper message",
                        field.field_type
                    )),
                }
            }
            FieldType::Message(p) => {
                singular()?;
                let expected = p.inner().schema().message_type();
                match field.field_type.message_name() {
                    Some(message_type) if message_type == expected => Ok(()),
                    _ => Err(format!(
                        "wire field is {}, expected message:{expected}",
                        field.field_type
                    )),
                }
            }
            FieldType::Repeated(p) => {
                if !field.is_repeated {
                    return Err(format!("wire field is singular {}", field.field_type));
                }
                let element = ProtoFieldDescriptor {
                    is_repeated: false,
                    ..field.clone()
                };
                match p.inner().field() {
                    inner @ (FieldType::Primitive(_) | FieldType::Message(_)) => {
                        inner.check_field(&element, proto)
                    }
                    other => Err(format!(
                        "{} elements are not supported in repeated fields",
                        other.kind()
                    )),
                }
            }
            FieldType::OneOf(_) => Err("oneof fields map onto oneof groups".to_string()),
        }
    }

    pub(crate) fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            FieldType::Primitive(p) | FieldType::Wrapper(p) => p.inner().check_bounds(),
            FieldType::Message(_) => Ok(()),
            FieldType::Repeated(p) => {
                let list = p.inner();
                if matches!((list.min_size, list.max_size), (Some(min), Some(max)) if min > max) {
                    return Err("minimum size is greater than maximum size".to_string());
                }
                list.field().check_bounds()
            }
            FieldType::OneOf(p) => p
                .inner()
                .variants()
                .iter()
                .try_for_each(|variant| variant.field_type().check_bounds()),
        }
    }
}
