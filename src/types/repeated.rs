use super::base::BaseType;
use super::FieldType;
use crate::error::{ConversionError, ErrorKey, FieldErrors, Result};
use crate::value::Value;

/// A homogeneous list; elements go through the inner field type.
#[derive(Debug, Clone)]
pub struct ListType {
    field: Box<FieldType>,
    pub min_size: Option<usize>,
    pub max_size: Option<usize>,
}

impl ListType {
    pub fn new(field: FieldType) -> Self {
        ListType {
            field: Box::new(field),
            min_size: None,
            max_size: None,
        }
    }

    pub fn min_size(mut self, min: usize) -> Self {
        self.min_size = Some(min);
        self
    }

    pub fn max_size(mut self, max: usize) -> Self {
        self.max_size = Some(max);
        self
    }

    pub fn field(&self) -> &FieldType {
        &self.field
    }
}

impl BaseType for ListType {
    fn type_name(&self) -> &'static str {
        "list"
    }

    fn convert(&self, value: Value) -> Result<Value> {
        let Value::List(items) = value else {
            return Err(
                ConversionError::new("Could not interpret the value as a list.").into(),
            );
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                self.field
                    .convert_value(item)
                    .map_err(|e| e.at(index.to_string()))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    /// Size rules first, then every element; element failures are keyed by index.
    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        let Value::List(items) = value else {
            return Ok(());
        };
        let mut errors = FieldErrors::default();
        if let Some(min) = self.min_size.filter(|min| items.len() < *min) {
            errors.push(format!("Please provide at least {min} item(s)."));
        }
        if let Some(max) = self.max_size.filter(|max| items.len() > *max) {
            errors.push(format!("Please provide no more than {max} item(s)."));
        }
        for (index, item) in items.iter().enumerate() {
            if let Err(item_errors) = self.field.validate_value(item) {
                errors.insert(ErrorKey::Index(index), item_errors);
            }
        }
        errors.into_result()
    }

    fn export(&self, value: &Value) -> Value {
        match value {
            Value::List(items) => {
                Value::List(items.iter().map(|item| self.field.export_value(item)).collect())
            }
            other => other.clone(),
        }
    }
}
