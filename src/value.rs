//! Domain values held by model fields.

use crate::model::Model;
use crate::types::oneof::VariantValue;
use crate::unset::Unset;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use indexmap::IndexMap;
use proto_runtime::ProtoMessage;
use std::fmt;

/// A converted field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// Unsigned values that do not fit `i64`; smaller ones are `Int`.
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// Plain mapping, as exported from a nested model or accepted as its input.
    Map(IndexMap<String, FieldValue>),
    Model(Box<Model>),
    Variant(Box<VariantValue>),
    /// A sub-message read off the wire that has not been converted yet.
    Message(Box<ProtoMessage>),
}

/// The value slot of a single model field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Unset,
    Set(Value),
}

impl Value {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Model(_) => "model",
            Value::Variant(_) => "variant",
            Value::Message(_) => "message",
        }
    }

    /// Render as a JSON-safe primitive.
    ///
    /// Bytes become standard base64, non-finite floats become `null` and
    /// variants become `{"variant": .., "value": ..}`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::UInt(u) => Json::from(*u),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Bytes(b) => Json::String(BASE64_STANDARD.encode(b)),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Model(model) => model.to_primitive(),
            Value::Variant(variant) => serde_json::json!({
                "variant": variant.variant(),
                "value": variant.value().to_json(),
            }),
            Value::Message(message) => crate::wire::message_to_json(message),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&BASE64_STANDARD.encode(b)),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl FieldValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Unset => None,
            FieldValue::Set(value) => Some(value),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            FieldValue::Unset => None,
            FieldValue::Set(value) => Some(value),
        }
    }

    /// Render as a JSON-safe primitive; the sentinel becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Unset => serde_json::Value::Null,
            FieldValue::Set(value) => value.to_json(),
        }
    }
}

impl From<Unset> for FieldValue {
    fn from(_: Unset) -> Self {
        FieldValue::Unset
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Set(value)
    }
}

impl PartialEq<Unset> for FieldValue {
    fn eq(&self, _: &Unset) -> bool {
        self.is_unset()
    }
}

impl PartialEq<Value> for Unset {
    fn eq(&self, _: &Value) -> bool {
        false
    }
}

impl PartialEq<Unset> for Value {
    fn eq(&self, _: &Unset) -> bool {
        false
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }

            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Set(Value::from(value))
                }
            }
        )*
    };
}

impl_from!(
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
    Vec<u8> => Bytes,
    Vec<Value> => List,
    Model => Model,
    VariantValue => Variant,
    ProtoMessage => Message,
);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Value::Int(value),
            Err(_) => Value::UInt(value),
        }
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Set(Value::from(value))
    }
}
