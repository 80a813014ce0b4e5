//! Error types for proto-model.
//!
//! Conversion failures abort immediately and name the offending field.
//! Validation failures are collected per field into a [`DataError`].
//! Schema problems are reported once, when a model schema is built.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A raw value could not be coerced to a field's domain type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}{message}", location(.path))]
pub struct ConversionError {
    path: Vec<String>,
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        ConversionError {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Prefix the error location with `segment` (a field name or list index).
    pub fn at(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Dotted location of the offending field, e.g. `grades.1.grade`.
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn location(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}: ", path.join("."))
    }
}

/// Key of a nested validation error: a field/variant name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    Field(String),
    Index(usize),
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::Field(name) => f.write_str(name),
            ErrorKey::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Validation messages for one field, with nested errors for its parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    messages: Vec<String>,
    children: BTreeMap<ErrorKey, FieldErrors>,
}

impl FieldErrors {
    pub fn message(message: impl Into<String>) -> Self {
        FieldErrors {
            messages: vec![message.into()],
            children: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Attach `errors` under `key`, merging with errors already there.
    pub fn insert(&mut self, key: ErrorKey, errors: FieldErrors) {
        if !errors.is_empty() {
            self.children.entry(key).or_default().merge(errors);
        }
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.messages.extend(other.messages);
        for (key, errors) in other.children {
            self.insert(key, errors);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn children(&self) -> &BTreeMap<ErrorKey, FieldErrors> {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&FieldErrors> {
        self.children.get(&ErrorKey::Field(name.to_string()))
    }

    pub fn index(&self, index: usize) -> Option<&FieldErrors> {
        self.children.get(&ErrorKey::Index(index))
    }

    pub fn into_result(self) -> std::result::Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Messages render as an array; nested errors as an object keyed by
    /// field name or index, with the field's own messages under `"_messages"`.
    pub fn to_primitive(&self) -> serde_json::Value {
        if self.children.is_empty() {
            return serde_json::Value::from(self.messages.clone());
        }

        let mut object = serde_json::Map::new();
        if !self.messages.is_empty() {
            object.insert(
                "_messages".to_string(),
                serde_json::Value::from(self.messages.clone()),
            );
        }
        for (key, errors) in &self.children {
            object.insert(key.to_string(), errors.to_primitive());
        }
        serde_json::Value::Object(object)
    }
}

impl From<DataError> for FieldErrors {
    fn from(error: DataError) -> Self {
        let mut errors = FieldErrors::default();
        for (field, field_errors) in error.errors {
            errors.insert(ErrorKey::Field(field), field_errors);
        }
        errors
    }
}

/// Aggregated validation failure of a model, keyed by field name.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{model} failed validation: {}", render(.errors))]
pub struct DataError {
    model: String,
    errors: BTreeMap<String, FieldErrors>,
}

impl DataError {
    pub fn new(model: impl Into<String>, errors: BTreeMap<String, FieldErrors>) -> Self {
        DataError {
            model: model.into(),
            errors,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn errors(&self) -> &BTreeMap<String, FieldErrors> {
        &self.errors
    }

    pub fn field(&self, name: &str) -> Option<&FieldErrors> {
        self.errors.get(name)
    }

    pub fn to_primitive(&self) -> serde_json::Value {
        render(&self.errors)
    }
}

fn render(errors: &BTreeMap<String, FieldErrors>) -> serde_json::Value {
    serde_json::Value::Object(
        errors
            .iter()
            .map(|(field, errors)| (field.clone(), errors.to_primitive()))
            .collect(),
    )
}

/// Model or field declarations that cannot work against the message type.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Model '{model}' declares field '{field}' more than once")]
    DuplicateField { model: String, field: String },

    #[error("Wire name '{wire_name}' is used by both '{first}' and '{second}'")]
    DuplicateWireName {
        wire_name: String,
        first: String,
        second: String,
    },

    #[error("Field '{field}' of model '{model}' cannot map onto wire field '{wire_name}': {reason}")]
    IncompatibleField {
        model: String,
        field: String,
        wire_name: String,
        reason: String,
    },

    #[error("Invalid bounds for field '{field}': {reason}")]
    InvalidBounds { field: String, reason: String },

    #[error("Message runtime error: {0}")]
    Proto(#[from] proto_runtime::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Unknown variant '{variant}', expected one of: {}", .expected.join(", "))]
    UnknownVariant {
        variant: String,
        expected: Vec<String>,
    },

    #[error(transparent)]
    Validation(#[from] DataError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Message runtime error: {0}")]
    Proto(#[from] proto_runtime::Error),
}

impl Error {
    /// Prefix the location of a conversion error with `segment`.
    pub fn at(self, segment: impl Into<String>) -> Self {
        match self {
            Error::Conversion(error) => Error::Conversion(error.at(segment)),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
