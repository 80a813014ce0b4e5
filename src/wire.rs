//! Conversion between runtime protobuf values and domain values.

use crate::error::ConversionError;
use crate::value::Value;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use proto_runtime::{ProtoFieldValue, ProtoMessage, ProtoType};

/// Convert a protobuf field value to a domain value.
///
/// Sub-messages are kept as [`Value::Message`]; turning them into models is
/// up to the field that reads them.
pub fn decode_value(value: ProtoFieldValue) -> Value {
    match value {
        ProtoFieldValue::Double(d) => Value::Float(d),
        ProtoFieldValue::Float(f) => Value::Float(f64::from(f)),
        ProtoFieldValue::Int32(i) => Value::Int(i64::from(i)),
        ProtoFieldValue::Int64(i) => Value::Int(i),
        ProtoFieldValue::Uint32(u) => Value::Int(i64::from(u)),
        ProtoFieldValue::Uint64(u) => Value::from(u),
        ProtoFieldValue::Bool(b) => Value::Bool(b),
        ProtoFieldValue::String(s) => Value::String(s),
        ProtoFieldValue::Bytes(b) => Value::Bytes(b),
        ProtoFieldValue::Message(m) => Value::Message(m),
        ProtoFieldValue::Repeated(items) => Value::List(items.into_iter().map(decode_value).collect()),
    }
}

/// Encode a scalar domain value for a wire field of type `proto_type`.
///
/// Integers are narrowed to the wire width; values out of range fail. Values
/// a `float` field cannot hold exactly fail as well.
pub fn encode_scalar(
    value: &Value,
    proto_type: &ProtoType,
) -> Result<ProtoFieldValue, ConversionError> {
    let out_of_range = || {
        ConversionError::new(format!(
            "Value '{value}' is out of range for {proto_type}."
        ))
    };
    let lossy = || {
        ConversionError::new(format!(
            "Value '{value}' cannot be stored exactly in a {proto_type} field."
        ))
    };

    match (proto_type, value) {
        (ProtoType::Double, Value::Float(f)) => Ok(ProtoFieldValue::Double(*f)),
        (ProtoType::Double, Value::Int(i)) => Ok(ProtoFieldValue::Double(*i as f64)),
        (ProtoType::Float, Value::Float(f)) => narrow_float(*f).ok_or_else(lossy),
        (ProtoType::Float, Value::Int(i)) => narrow_float(*i as f64)
            .filter(|_| (*i as f64) as i64 == *i)
            .ok_or_else(lossy),
        (
            ProtoType::Int32 | ProtoType::Sint32 | ProtoType::Sfixed32 | ProtoType::Enum(_),
            Value::Int(i),
        ) => i32::try_from(*i)
            .map(ProtoFieldValue::Int32)
            .map_err(|_| out_of_range()),
        (ProtoType::Int64 | ProtoType::Sint64 | ProtoType::Sfixed64, Value::Int(i)) => {
            Ok(ProtoFieldValue::Int64(*i))
        }
        (ProtoType::Uint32 | ProtoType::Fixed32, Value::Int(i)) => u32::try_from(*i)
            .map(ProtoFieldValue::Uint32)
            .map_err(|_| out_of_range()),
        (ProtoType::Uint64 | ProtoType::Fixed64, Value::Int(i)) => u64::try_from(*i)
            .map(ProtoFieldValue::Uint64)
            .map_err(|_| out_of_range()),
        (ProtoType::Uint64 | ProtoType::Fixed64, Value::UInt(u)) => Ok(ProtoFieldValue::Uint64(*u)),
        (_, Value::UInt(_)) if !matches!(proto_type, ProtoType::Double | ProtoType::Float) => {
            Err(out_of_range())
        }
        (ProtoType::Double, Value::UInt(u)) => Ok(ProtoFieldValue::Double(*u as f64)),
        (ProtoType::Float, Value::UInt(u)) => narrow_float(*u as f64)
            .filter(|_| (*u as f64) as u64 == *u)
            .ok_or_else(lossy),
        (ProtoType::Bool, Value::Bool(b)) => Ok(ProtoFieldValue::Bool(*b)),
        (ProtoType::String, Value::String(s)) => Ok(ProtoFieldValue::String(s.clone())),
        (ProtoType::Bytes, Value::Bytes(b)) => Ok(ProtoFieldValue::Bytes(b.clone())),
        _ => Err(ConversionError::new(format!(
            "Cannot write {} value '{value}' to a {proto_type} field.",
            value.kind()
        ))),
    }
}

fn narrow_float(f: f64) -> Option<ProtoFieldValue> {
    let narrowed = f as f32;
    (!f.is_finite() || f64::from(narrowed) == f).then_some(ProtoFieldValue::Float(narrowed))
}

/// Render a raw protobuf value as JSON.
pub fn proto_to_json(value: &ProtoFieldValue) -> serde_json::Value {
    match value {
        ProtoFieldValue::Double(d) => serde_json::json!(*d),
        ProtoFieldValue::Float(f) => serde_json::json!(*f),
        ProtoFieldValue::Int32(i) => serde_json::json!(*i),
        ProtoFieldValue::Int64(i) => serde_json::json!(*i),
        ProtoFieldValue::Uint32(u) => serde_json::json!(*u),
        ProtoFieldValue::Uint64(u) => serde_json::json!(*u),
        ProtoFieldValue::Bool(b) => serde_json::json!(*b),
        ProtoFieldValue::String(s) => serde_json::json!(s),
        ProtoFieldValue::Bytes(b) => serde_json::json!(BASE64_STANDARD.encode(b)),
        ProtoFieldValue::Message(m) => message_to_json(m),
        ProtoFieldValue::Repeated(items) => {
            serde_json::Value::Array(items.iter().map(proto_to_json).collect())
        }
    }
}

/// Render a raw message as a JSON object in field declaration order.
///
/// Unset scalars and lists show their defaults; unset sub-messages are `null`.
pub fn message_to_json(message: &ProtoMessage) -> serde_json::Value {
    let descriptor = message.descriptor();
    let mut map = serde_json::Map::new();

    for name in descriptor.list_fields() {
        let value = match message.has_field(name) {
            Ok(true) => message.get_field(name).ok(),
            _ => descriptor.fields.get(name).and_then(|field| {
                if field.is_repeated {
                    Some(ProtoFieldValue::Repeated(Vec::new()))
                } else {
                    field.field_type.default_value()
                }
            }),
        };
        map.insert(
            name.clone(),
            value
                .map(|v| proto_to_json(&v))
                .unwrap_or(serde_json::Value::Null),
        );
    }

    serde_json::Value::Object(map)
}
