//! Scalar base types.

use super::base::BaseType;
use super::bytes::BytesType;
use crate::error::{ConversionError, FieldErrors, Result};
use crate::value::Value;
use proto_runtime::ProtoType;

#[derive(Debug, Clone, Default)]
pub struct IntType {
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

impl IntType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_value(mut self, min: i64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: i64) -> Self {
        self.max_value = Some(max);
        self
    }
}

impl BaseType for IntType {
    fn type_name(&self) -> &'static str {
        "int"
    }

    fn convert(&self, value: Value) -> Result<Value> {
        let converted = match &value {
            Value::Int(_) => Some(value.clone()),
            Value::UInt(u) => Some(Value::from(*u)),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(Value::Int(*f as i64))
            }
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(Value::Int)
                    .or_else(|_| s.parse::<u64>().map(Value::UInt))
                    .ok()
            }
            _ => None,
        };
        converted.ok_or_else(|| ConversionError::new(format!("Value '{value}' is not int.")).into())
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        let number = match value {
            Value::Int(i) => i128::from(*i),
            Value::UInt(u) => i128::from(*u),
            _ => return Ok(()),
        };
        let mut errors = FieldErrors::default();
        if let Some(min) = self.min_value.filter(|min| number < i128::from(*min)) {
            errors.push(format!("Int value should be greater than or equal to {min}."));
        }
        if let Some(max) = self.max_value.filter(|max| number > i128::from(*max)) {
            errors.push(format!("Int value should be less than or equal to {max}."));
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FloatType {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl FloatType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }
}

impl BaseType for FloatType {
    fn type_name(&self) -> &'static str {
        "float"
    }

    fn convert(&self, value: Value) -> Result<Value> {
        let converted = match &value {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        converted
            .map(Value::Float)
            .ok_or_else(|| ConversionError::new(format!("Value '{value}' is not float.")).into())
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        let Value::Float(number) = value else {
            return Ok(());
        };
        let mut errors = FieldErrors::default();
        if let Some(min) = self.min_value.filter(|min| number < min) {
            errors.push(format!("Float value should be greater than or equal to {min}."));
        }
        if let Some(max) = self.max_value.filter(|max| number > max) {
            errors.push(format!("Float value should be less than or equal to {max}."));
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoolType;

impl BaseType for BoolType {
    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn convert(&self, value: Value) -> Result<Value> {
        let converted = match &value {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            Value::String(s) => match s.as_str() {
                "True" | "true" | "1" => Some(true),
                "False" | "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        converted
            .map(Value::Bool)
            .ok_or_else(|| ConversionError::new("Must be either true or false.").into())
    }
}

/// Text; lengths are counted in characters.
#[derive(Debug, Clone, Default)]
pub struct StringType {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl StringType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

impl BaseType for StringType {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(s) => Ok(Value::String(s)),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            Value::UInt(u) => Ok(Value::String(u.to_string())),
            Value::Bytes(bytes) => String::from_utf8(bytes).map(Value::String).map_err(|e| {
                ConversionError::new(format!(
                    "Couldn't interpret '{}' as string.",
                    Value::Bytes(e.into_bytes())
                ))
                .into()
            }),
            other => {
                Err(ConversionError::new(format!("Couldn't interpret '{other}' as string.")).into())
            }
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        let Value::String(s) = value else {
            return Ok(());
        };
        let length = s.chars().count();
        let mut errors = FieldErrors::default();
        if self.max_length.is_some_and(|max| length > max) {
            errors.push("String value is too long.");
        }
        if self.min_length.is_some_and(|min| length < min) {
            errors.push("String value is too short.");
        }
        errors.into_result()
    }
}

/// The scalar kinds a primitive or wrapper field can hold.
#[derive(Debug, Clone)]
pub enum ScalarType {
    Int(IntType),
    Float(FloatType),
    Bool(BoolType),
    String(StringType),
    Bytes(BytesType),
}

impl ScalarType {
    /// Whether values of this kind can be stored in a wire field of type `proto`.
    pub fn accepts_proto(&self, proto: &ProtoType) -> bool {
        match self {
            ScalarType::Int(_) => matches!(
                proto,
                ProtoType::Int32
                    | ProtoType::Int64
                    | ProtoType::Uint32
                    | ProtoType::Uint64
                    | ProtoType::Sint32
                    | ProtoType::Sint64
                    | ProtoType::Fixed32
                    | ProtoType::Fixed64
                    | ProtoType::Sfixed32
                    | ProtoType::Sfixed64
                    | ProtoType::Enum(_)
            ),
            ScalarType::Float(_) => matches!(proto, ProtoType::Double | ProtoType::Float),
            ScalarType::Bool(_) => matches!(proto, ProtoType::Bool),
            ScalarType::String(_) => matches!(proto, ProtoType::String),
            ScalarType::Bytes(_) => matches!(proto, ProtoType::Bytes),
        }
    }

    pub(crate) fn check_bounds(&self) -> std::result::Result<(), String> {
        let inverted = match self {
            ScalarType::Int(t) => matches!((t.min_value, t.max_value), (Some(min), Some(max)) if min > max),
            ScalarType::Float(t) => matches!((t.min_value, t.max_value), (Some(min), Some(max)) if min > max),
            ScalarType::String(t) => matches!((t.min_length, t.max_length), (Some(min), Some(max)) if min > max),
            ScalarType::Bytes(t) => matches!((t.min_length, t.max_length), (Some(min), Some(max)) if min > max),
            ScalarType::Bool(_) => false,
        };
        if inverted {
            Err("minimum is greater than maximum".to_string())
        } else {
            Ok(())
        }
    }
}

impl BaseType for ScalarType {
    fn type_name(&self) -> &'static str {
        match self {
            ScalarType::Int(t) => t.type_name(),
            ScalarType::Float(t) => t.type_name(),
            ScalarType::Bool(t) => t.type_name(),
            ScalarType::String(t) => t.type_name(),
            ScalarType::Bytes(t) => t.type_name(),
        }
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match self {
            ScalarType::Int(t) => t.convert(value),
            ScalarType::Float(t) => t.convert(value),
            ScalarType::Bool(t) => t.convert(value),
            ScalarType::String(t) => t.convert(value),
            ScalarType::Bytes(t) => t.convert(value),
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        match self {
            ScalarType::Int(t) => t.validate(value),
            ScalarType::Float(t) => t.validate(value),
            ScalarType::Bool(t) => t.validate(value),
            ScalarType::String(t) => t.validate(value),
            ScalarType::Bytes(t) => t.validate(value),
        }
    }
}

impl From<IntType> for ScalarType {
    fn from(t: IntType) -> Self {
        ScalarType::Int(t)
    }
}

impl From<FloatType> for ScalarType {
    fn from(t: FloatType) -> Self {
        ScalarType::Float(t)
    }
}

impl From<BoolType> for ScalarType {
    fn from(t: BoolType) -> Self {
        ScalarType::Bool(t)
    }
}

impl From<StringType> for ScalarType {
    fn from(t: StringType) -> Self {
        ScalarType::String(t)
    }
}

impl From<BytesType> for ScalarType {
    fn from(t: BytesType) -> Self {
        ScalarType::Bytes(t)
    }
}
