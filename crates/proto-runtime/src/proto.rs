//! Protobuf type definitions.
//!
//! These are the shared data structures describing message layouts
//! ([`ProtoMessageDescriptor`] and friends) and the runtime values stored in a
//! [`ProtoMessage`](crate::ProtoMessage).

use crate::error::{Error, Result};
use crate::message::ProtoMessage;
use std::collections::HashMap;

/// Represents a field value held by a dynamic protobuf message.
///
/// Enum fields carry their numeric value as `Int32`. The zig-zag and fixed
/// width integer kinds share the representation of their plain counterparts
/// (`sint32`/`sfixed32` as `Int32`, `fixed64` as `Uint64`, and so on).
#[derive(Debug, Clone, PartialEq)]
pub enum ProtoFieldValue {
    Double(f64),
    Float(f32),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Message(Box<ProtoMessage>),
    Repeated(Vec<ProtoFieldValue>),
}

impl ProtoFieldValue {
    /// Short name of the runtime representation, used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            ProtoFieldValue::Double(_) => "double".to_string(),
            ProtoFieldValue::Float(_) => "float".to_string(),
            ProtoFieldValue::Int32(_) => "int32".to_string(),
            ProtoFieldValue::Int64(_) => "int64".to_string(),
            ProtoFieldValue::Uint32(_) => "uint32".to_string(),
            ProtoFieldValue::Uint64(_) => "uint64".to_string(),
            ProtoFieldValue::Bool(_) => "bool".to_string(),
            ProtoFieldValue::String(_) => "string".to_string(),
            ProtoFieldValue::Bytes(_) => "bytes".to_string(),
            ProtoFieldValue::Message(msg) => format!("message:{}", msg.message_type()),
            ProtoFieldValue::Repeated(_) => "repeated".to_string(),
        }
    }

    /// Whether this is the proto3 default for its kind.
    ///
    /// Messages are never considered default: once assigned they are present.
    pub fn is_default(&self) -> bool {
        match self {
            ProtoFieldValue::Double(v) => *v == 0.0,
            ProtoFieldValue::Float(v) => *v == 0.0,
            ProtoFieldValue::Int32(v) => *v == 0,
            ProtoFieldValue::Int64(v) => *v == 0,
            ProtoFieldValue::Uint32(v) => *v == 0,
            ProtoFieldValue::Uint64(v) => *v == 0,
            ProtoFieldValue::Bool(v) => !*v,
            ProtoFieldValue::String(v) => v.is_empty(),
            ProtoFieldValue::Bytes(v) => v.is_empty(),
            ProtoFieldValue::Message(_) => false,
            ProtoFieldValue::Repeated(v) => v.is_empty(),
        }
    }
}

/// Protobuf field type enumeration.
///
/// Message and enum types carry their fully qualified name without the
/// leading dot (e.g. `"mypackage.MyMessage"`).
#[derive(Debug, Clone, PartialEq)]
pub enum ProtoType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    Message(String),
    Enum(String),
}

impl std::fmt::Display for ProtoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl ProtoType {
    pub fn type_name(&self) -> String {
        match self {
            ProtoType::Double => "double".to_string(),
            ProtoType::Float => "float".to_string(),
            ProtoType::Int32 => "int32".to_string(),
            ProtoType::Int64 => "int64".to_string(),
            ProtoType::Uint32 => "uint32".to_string(),
            ProtoType::Uint64 => "uint64".to_string(),
            ProtoType::Sint32 => "sint32".to_string(),
            ProtoType::Sint64 => "sint64".to_string(),
            ProtoType::Fixed32 => "fixed32".to_string(),
            ProtoType::Fixed64 => "fixed64".to_string(),
            ProtoType::Sfixed32 => "sfixed32".to_string(),
            ProtoType::Sfixed64 => "sfixed64".to_string(),
            ProtoType::Bool => "bool".to_string(),
            ProtoType::String => "string".to_string(),
            ProtoType::Bytes => "bytes".to_string(),
            ProtoType::Message(name) => format!("message:{name}"),
            ProtoType::Enum(name) => format!("enum:{name}"),
        }
    }

    /// Default value of a singular scalar field of this type.
    ///
    /// Returns `None` for message types, whose default needs a schema to build.
    pub fn default_value(&self) -> Option<ProtoFieldValue> {
        Some(match self {
            ProtoType::Double => ProtoFieldValue::Double(0.0),
            ProtoType::Float => ProtoFieldValue::Float(0.0),
            ProtoType::Int32 | ProtoType::Sint32 | ProtoType::Sfixed32 | ProtoType::Enum(_) => {
                ProtoFieldValue::Int32(0)
            }
            ProtoType::Int64 | ProtoType::Sint64 | ProtoType::Sfixed64 => ProtoFieldValue::Int64(0),
            ProtoType::Uint32 | ProtoType::Fixed32 => ProtoFieldValue::Uint32(0),
            ProtoType::Uint64 | ProtoType::Fixed64 => ProtoFieldValue::Uint64(0),
            ProtoType::Bool => ProtoFieldValue::Bool(false),
            ProtoType::String => ProtoFieldValue::String(String::new()),
            ProtoType::Bytes => ProtoFieldValue::Bytes(Vec::new()),
            ProtoType::Message(_) => return None,
        })
    }

    /// Whether `value` is a valid single element for a field of this type.
    pub fn accepts(&self, value: &ProtoFieldValue) -> bool {
        match (self, value) {
            (ProtoType::Double, ProtoFieldValue::Double(_)) => true,
            (ProtoType::Float, ProtoFieldValue::Float(_)) => true,
            (
                ProtoType::Int32 | ProtoType::Sint32 | ProtoType::Sfixed32 | ProtoType::Enum(_),
                ProtoFieldValue::Int32(_),
            ) => true,
            (
                ProtoType::Int64 | ProtoType::Sint64 | ProtoType::Sfixed64,
                ProtoFieldValue::Int64(_),
            ) => true,
            (ProtoType::Uint32 | ProtoType::Fixed32, ProtoFieldValue::Uint32(_)) => true,
            (ProtoType::Uint64 | ProtoType::Fixed64, ProtoFieldValue::Uint64(_)) => true,
            (ProtoType::Bool, ProtoFieldValue::Bool(_)) => true,
            (ProtoType::String, ProtoFieldValue::String(_)) => true,
            (ProtoType::Bytes, ProtoFieldValue::Bytes(_)) => true,
            (ProtoType::Message(name), ProtoFieldValue::Message(msg)) => msg.message_type() == name,
            _ => false,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, ProtoType::Message(_))
    }

    /// Fully qualified name of the referenced message type, if any.
    pub fn message_name(&self) -> Option<&str> {
        match self {
            ProtoType::Message(name) => Some(name),
            _ => None,
        }
    }
}

/// Describes a single field in a message
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoFieldDescriptor {
    /// Field name
    pub name: String,
    /// Field number (tag)
    pub number: i32,
    /// Field type (element type for repeated fields)
    pub field_type: ProtoType,
    /// Whether the field is repeated
    pub is_repeated: bool,
    /// Owning oneof group; synthetic groups of proto3 `optional` fields are not recorded
    pub oneof: Option<String>,
    /// Whether the field was declared with the proto3 `optional` keyword
    pub proto3_optional: bool,
}

impl ProtoFieldDescriptor {
    /// Whether the field tracks presence explicitly.
    ///
    /// Singular message fields, oneof members and proto3 `optional` fields
    /// are present once assigned, even when assigned their default.
    pub fn has_presence(&self) -> bool {
        !self.is_repeated
            && (self.field_type.is_message() || self.oneof.is_some() || self.proto3_optional)
    }
}

/// Describes a oneof group
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoOneofDescriptor {
    pub name: String,
    /// Member field names in declaration order
    pub fields: Vec<String>,
}

/// Describes a protobuf message type
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoMessageDescriptor {
    /// Fully qualified message name (e.g., "mypackage.MyMessage")
    pub name: String,
    /// Map of field names to their descriptors
    pub fields: HashMap<String, ProtoFieldDescriptor>,
    /// Ordered list of field names
    pub field_order: Vec<String>,
    /// Map of oneof group names to their descriptors
    pub oneofs: HashMap<String, ProtoOneofDescriptor>,
}

impl ProtoMessageDescriptor {
    /// Get a field descriptor by name
    pub fn get_field(&self, name: &str) -> Result<&ProtoFieldDescriptor> {
        self.fields.get(name).ok_or_else(|| Error::FieldNotFound {
            message: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Get a oneof group descriptor by name
    pub fn get_oneof(&self, name: &str) -> Result<&ProtoOneofDescriptor> {
        self.oneofs.get(name).ok_or_else(|| Error::OneofNotFound {
            message: self.name.clone(),
            oneof: name.to_string(),
        })
    }

    /// List all field names in order
    pub fn list_fields(&self) -> &[String] {
        &self.field_order
    }
}
