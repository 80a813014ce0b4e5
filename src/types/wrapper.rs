//! Helpers for wrapper messages: sub-messages holding one scalar `value`
//! field, used on the wire to tell a default scalar apart from a missing one.

use super::primitive::ScalarType;
use crate::error::Result;
use crate::value::Value;
use crate::wire::{decode_value, encode_scalar};
use proto_runtime::{ProtoMessage, ProtoSchema};
use std::sync::Arc;

pub const VALUE_FIELD: &str = "value";

/// Read the inner scalar of a wrapper message.
pub(crate) fn unwrap(message: &ProtoMessage) -> Result<Value> {
    Ok(decode_value(message.get_field(VALUE_FIELD)?))
}

/// Write `value` into the wrapper stored at `wire_name`, creating it if needed.
///
/// The wrapper is present afterwards even when `value` is the default.
pub(crate) fn assign(message: &mut ProtoMessage, wire_name: &str, value: &Value) -> Result<()> {
    let wrapper = message.mut_message(wire_name)?;
    let descriptor = Arc::clone(wrapper.descriptor());
    let inner = descriptor.get_field(VALUE_FIELD)?;
    let encoded = encode_scalar(value, &inner.field_type)?;
    wrapper.set_field(VALUE_FIELD, encoded)?;
    Ok(())
}

/// Check that `message_type` is a wrapper whose value fits `scalar`.
pub(crate) fn check(
    schema: &ProtoSchema,
    message_type: &str,
    scalar: &ScalarType,
) -> std::result::Result<(), String> {
    let descriptor = schema
        .get_message(message_type)
        .map_err(|e| e.to_string())?;
    let inner = descriptor
        .get_field(VALUE_FIELD)
        .map_err(|_| format!("'{message_type}' has no '{VALUE_FIELD}' field"))?;
    if inner.is_repeated || !scalar.accepts_proto(&inner.field_type) {
        return Err(format!(
            "'{message_type}.{VALUE_FIELD}' is {} and cannot hold {} values",
            inner.field_type,
            super::base::BaseType::type_name(scalar)
        ));
    }
    Ok(())
}
