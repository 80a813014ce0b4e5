use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Protobuf parse error: {0}")]
    ProtobufParse(String),

    #[error("Field not found: {message}.{field}")]
    FieldNotFound { message: String, field: String },

    #[error("Oneof group not found: {message}.{oneof}")]
    OneofNotFound { message: String, oneof: String },

    #[error("Invalid value for field '{field}': expected {expected}, got {actual}")]
    InvalidFieldType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Message type not found: {0}")]
    MessageTypeNotFound(String),

    #[error("Message type '{name}' is ambiguous, candidates: {}", .candidates.join(", "))]
    AmbiguousMessageType {
        name: String,
        candidates: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
