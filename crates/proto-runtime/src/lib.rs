//! Runtime protobuf support for proto-model.
//!
//! `.proto` sources are parsed at runtime with `protobuf-parse` (no code
//! generation). The resulting [`ProtoSchema`] hands out message descriptors,
//! and [`ProtoMessage`] is an in-memory dynamic message with protobuf 3
//! presence rules:
//!
//! - implicit-presence scalars count as set only when they hold a non-default value
//! - repeated fields count as set only when non-empty
//! - message fields, oneof members and proto3 `optional` fields track presence explicitly
//!
//! Encoding to and decoding from the wire format is not provided here.

pub mod error;
pub mod message;
pub mod parser;
pub mod proto;

pub use error::{Error, Result};
pub use message::ProtoMessage;
pub use parser::ProtoSchema;
pub use proto::{
    ProtoFieldDescriptor, ProtoFieldValue, ProtoMessageDescriptor, ProtoOneofDescriptor, ProtoType,
};
