use super::base::BaseType;
use crate::error::{ConversionError, FieldErrors, Result};
use crate::model::{Model, ModelSchema};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A field holding another model.
#[derive(Clone)]
pub struct MessageType {
    schema: Arc<ModelSchema>,
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageType")
            .field("model", &self.schema.name())
            .finish()
    }
}

impl MessageType {
    pub fn new(schema: &Arc<ModelSchema>) -> Self {
        MessageType {
            schema: Arc::clone(schema),
        }
    }

    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    fn is_own_model(&self, model: &Model) -> bool {
        Arc::ptr_eq(model.schema(), &self.schema)
            || (model.schema().name() == self.schema.name()
                && model.schema().message_type() == self.schema.message_type())
    }
}

impl BaseType for MessageType {
    fn type_name(&self) -> &'static str {
        "model"
    }

    /// Accepts a sub-message of the model's message type, an instance of the
    /// model, or a mapping of its fields.
    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Message(message) if message.message_type() == self.schema.message_type() => {
                Ok(Value::from(Model::load(&self.schema, &message)?))
            }
            Value::Model(model) if self.is_own_model(&model) => Ok(Value::Model(model)),
            Value::Map(entries) => Ok(Value::from(Model::from_map(&self.schema, entries)?)),
            other => Err(ConversionError::new(format!(
                "Please use a mapping for this field or {} instance instead of {}.",
                self.schema.name(),
                match &other {
                    Value::Message(message) => format!("message {}", message.message_type()),
                    Value::Model(model) => format!("model {}", model.schema().name()),
                    value => value.kind().to_string(),
                }
            ))
            .into()),
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), FieldErrors> {
        match value {
            Value::Model(model) => model.validate().map_err(FieldErrors::from),
            _ => Ok(()),
        }
    }

    fn export(&self, value: &Value) -> Value {
        match value {
            Value::Model(model) => Value::Map(model.to_native()),
            other => other.clone(),
        }
    }
}
