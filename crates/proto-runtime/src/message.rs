use crate::error::{Error, Result};
use crate::parser::ProtoSchema;
use crate::proto::{ProtoFieldDescriptor, ProtoFieldValue, ProtoMessageDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

/// A dynamic protobuf message.
///
/// Holds field values by name and answers presence questions the way
/// generated protobuf 3 code does.
#[derive(Clone)]
pub struct ProtoMessage {
    schema: ProtoSchema,
    descriptor: Arc<ProtoMessageDescriptor>,
    fields: HashMap<String, ProtoFieldValue>,
}

impl std::fmt::Debug for ProtoMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct(&self.descriptor.name);
        for name in self.list_fields() {
            debug.field(name, &self.fields[name]);
        }
        debug.finish()
    }
}

impl PartialEq for ProtoMessage {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.fields == other.fields
    }
}

impl ProtoMessage {
    /// Construct an empty message of the given type.
    pub fn new(schema: &ProtoSchema, message_type: &str) -> Result<Self> {
        let descriptor = schema.get_message(message_type)?;
        Ok(ProtoMessage {
            schema: schema.clone(),
            descriptor,
            fields: HashMap::new(),
        })
    }

    pub fn descriptor(&self) -> &Arc<ProtoMessageDescriptor> {
        &self.descriptor
    }

    /// Fully qualified message type name.
    pub fn message_type(&self) -> &str {
        &self.descriptor.name
    }

    pub fn schema(&self) -> &ProtoSchema {
        &self.schema
    }

    /// Names of the fields that are set, in declaration order.
    pub fn list_fields(&self) -> Vec<&str> {
        self.descriptor
            .field_order
            .iter()
            .filter(|name| self.fields.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn has_field(&self, name: &str) -> Result<bool> {
        self.descriptor.get_field(name)?;
        Ok(self.fields.contains_key(name))
    }

    /// Read a field, falling back to its default when it is not set.
    ///
    /// Unset message fields read as an empty message and unset repeated
    /// fields as an empty list.
    pub fn get_field(&self, name: &str) -> Result<ProtoFieldValue> {
        let field = self.descriptor.get_field(name)?;
        match self.fields.get(name) {
            Some(value) => Ok(value.clone()),
            None => self.default_for(field),
        }
    }

    /// Assign a field.
    ///
    /// Assigning a oneof member clears the other members of its group.
    /// Assigning the default to a field without explicit presence leaves it unset.
    pub fn set_field(&mut self, name: &str, value: ProtoFieldValue) -> Result<()> {
        let descriptor = Arc::clone(&self.descriptor);
        let field = descriptor.get_field(name)?;

        let accepted = match (&value, field.is_repeated) {
            (ProtoFieldValue::Repeated(items), true) => {
                items.iter().all(|item| field.field_type.accepts(item))
            }
            (_, true) => false,
            (value, false) => field.field_type.accepts(value),
        };
        if !accepted {
            return Err(Error::InvalidFieldType {
                field: format!("{}.{}", descriptor.name, name),
                expected: if field.is_repeated {
                    format!("repeated {}", field.field_type)
                } else {
                    field.field_type.type_name()
                },
                actual: value.type_name(),
            });
        }

        self.clear_oneof_siblings(&descriptor, field);

        if !field.has_presence() && value.is_default() {
            self.fields.remove(name);
        } else {
            self.fields.insert(name.to_string(), value);
        }

        Ok(())
    }

    pub fn clear_field(&mut self, name: &str) -> Result<()> {
        self.descriptor.get_field(name)?;
        self.fields.remove(name);
        Ok(())
    }

    /// Name of the member of oneof group `oneof` that is set, if any.
    pub fn which_oneof(&self, oneof: &str) -> Result<Option<&str>> {
        let group = self.descriptor.get_oneof(oneof)?;
        Ok(group
            .fields
            .iter()
            .find(|member| self.fields.contains_key(member.as_str()))
            .map(String::as_str))
    }

    /// Mutable access to a singular message field.
    ///
    /// The sub-message is created empty and marked present on first access.
    pub fn mut_message(&mut self, name: &str) -> Result<&mut ProtoMessage> {
        let descriptor = Arc::clone(&self.descriptor);
        let field = descriptor.get_field(name)?;

        let message_type = match field.field_type.message_name() {
            Some(message_type) if !field.is_repeated => message_type,
            _ => {
                return Err(Error::InvalidFieldType {
                    field: format!("{}.{}", descriptor.name, name),
                    expected: "singular message".to_string(),
                    actual: field.field_type.type_name(),
                })
            }
        };

        if !matches!(self.fields.get(name), Some(ProtoFieldValue::Message(_))) {
            let empty = ProtoMessage::new(&self.schema, message_type)?;
            self.clear_oneof_siblings(&descriptor, field);
            self.fields
                .insert(name.to_string(), ProtoFieldValue::Message(Box::new(empty)));
        }

        match self.fields.get_mut(name) {
            Some(ProtoFieldValue::Message(message)) => Ok(&mut **message),
            _ => Err(Error::FieldNotFound {
                message: descriptor.name.clone(),
                field: name.to_string(),
            }),
        }
    }

    fn clear_oneof_siblings(
        &mut self,
        descriptor: &ProtoMessageDescriptor,
        field: &ProtoFieldDescriptor,
    ) {
        let Some(group) = field.oneof.as_ref().and_then(|o| descriptor.oneofs.get(o)) else {
            return;
        };
        for member in &group.fields {
            if member != &field.name {
                self.fields.remove(member);
            }
        }
    }

    fn default_for(&self, field: &ProtoFieldDescriptor) -> Result<ProtoFieldValue> {
        if field.is_repeated {
            return Ok(ProtoFieldValue::Repeated(Vec::new()));
        }
        match field.field_type.default_value() {
            Some(value) => Ok(value),
            None => {
                let message_type = field.field_type.message_name().unwrap_or_default();
                Ok(ProtoFieldValue::Message(Box::new(ProtoMessage::new(
                    &self.schema,
                    message_type,
                )?)))
            }
        }
    }
}
