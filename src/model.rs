//! Model schemas and model instances.
//!
//! A [`ModelSchema`] declares an ordered list of fields and binds them to a
//! protobuf message type. A [`Model`] holds one [`FieldValue`] per declared
//! field and converts to and from [`ProtoMessage`]s of that type.

use crate::error::{ConversionError, DataError, Result, SchemaError};
use crate::field::Field;
use crate::options::ModelOptions;
use crate::value::FieldValue;
use indexmap::IndexMap;
use proto_runtime::{ProtoMessage, ProtoSchema};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Declared fields of a model and the message type they map onto.
pub struct ModelSchema {
    name: String,
    message_type: String,
    proto: ProtoSchema,
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    by_wire: HashMap<String, usize>,
    options: ModelOptions,
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("name", &self.name)
            .field("message_type", &self.message_type)
            .field("fields", &self.fields)
            .field("options", &self.options)
            .finish()
    }
}

impl ModelSchema {
    /// Start declaring a model named `name` backed by `message_type`.
    ///
    /// The message type may be given by full name or any unambiguous suffix.
    pub fn builder(
        name: impl Into<String>,
        proto: &ProtoSchema,
        message_type: impl Into<String>,
    ) -> ModelSchemaBuilder {
        ModelSchemaBuilder {
            name: name.into(),
            proto: proto.clone(),
            message_type: message_type.into(),
            fields: Vec::new(),
            options: ModelOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name of the backing message type.
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn proto(&self) -> &ProtoSchema {
        &self.proto
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|index| &self.fields[*index])
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Position of a field given its name or its wire name.
    fn position(&self, key: &str) -> Option<usize> {
        self.by_name
            .get(key)
            .or_else(|| self.by_wire.get(key))
            .copied()
    }
}

pub struct ModelSchemaBuilder {
    name: String,
    proto: ProtoSchema,
    message_type: String,
    fields: Vec<Field>,
    options: ModelOptions,
}

impl ModelSchemaBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve the message type and check every field against it.
    pub fn build(self) -> std::result::Result<Arc<ModelSchema>, SchemaError> {
        let descriptor = self.proto.get_message(&self.message_type)?;

        let mut by_name = HashMap::new();
        let mut by_wire: HashMap<String, usize> = HashMap::new();

        for (index, field) in self.fields.iter().enumerate() {
            if by_name.insert(field.name().to_string(), index).is_some() {
                return Err(SchemaError::DuplicateField {
                    model: self.name.clone(),
                    field: field.name().to_string(),
                });
            }
            if let Some(first) = by_wire.insert(field.wire_name().to_string(), index) {
                return Err(SchemaError::DuplicateWireName {
                    wire_name: field.wire_name().to_string(),
                    first: self.fields[first].name().to_string(),
                    second: field.name().to_string(),
                });
            }

            field
                .field_type()
                .check_bounds()
                .map_err(|reason| SchemaError::InvalidBounds {
                    field: format!("{}.{}", self.name, field.name()),
                    reason,
                })?;

            field
                .field_type()
                .check_wire(&descriptor, field.wire_name(), &self.proto)
                .map_err(|reason| SchemaError::IncompatibleField {
                    model: self.name.clone(),
                    field: field.name().to_string(),
                    wire_name: field.wire_name().to_string(),
                    reason,
                })?;
        }

        debug!(
            "Built model schema {} over {} with {} fields",
            self.name,
            descriptor.name,
            self.fields.len()
        );

        Ok(Arc::new(ModelSchema {
            name: self.name,
            message_type: descriptor.name.clone(),
            proto: self.proto,
            fields: self.fields,
            by_name,
            by_wire,
            options: self.options,
        }))
    }
}

/// An instance of a model: one value per declared field.
#[derive(Clone)]
pub struct Model {
    schema: Arc<ModelSchema>,
    values: Vec<FieldValue>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(&self.schema.name);
        for (field, value) in self.iter() {
            debug.field(field.name(), value);
        }
        debug.finish()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name
            && self.schema.message_type == other.schema.message_type
            && self.values == other.values
    }
}

impl Model {
    /// A model with every field `Unset`.
    pub fn new(schema: &Arc<ModelSchema>) -> Self {
        Model {
            schema: Arc::clone(schema),
            values: vec![FieldValue::Unset; schema.fields.len()],
        }
    }

    /// Build a model from raw values keyed by field name or wire name.
    ///
    /// Every value is converted by its field; fields not mentioned are `Unset`.
    pub fn from_map<I, K, V>(schema: &Arc<ModelSchema>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut model = Model::new(schema);
        for (key, value) in entries {
            model.set(key.as_ref(), value)?;
        }
        Ok(model)
    }

    /// Load a model from a message of its message type.
    pub fn load(schema: &Arc<ModelSchema>, message: &ProtoMessage) -> Result<Self> {
        if message.message_type() != schema.message_type {
            return Err(ConversionError::new(format!(
                "Expected a {} message, got {}.",
                schema.message_type,
                message.message_type()
            ))
            .into());
        }

        let set_fields: HashSet<&str> = message.list_fields().into_iter().collect();
        debug!(
            "Loading {} from {} with set fields {:?}",
            schema.name,
            message.message_type(),
            message.list_fields()
        );

        let mut model = Model::new(schema);
        for (index, field) in schema.fields.iter().enumerate() {
            let raw = field
                .field_type()
                .extract(message, field.wire_name(), &set_fields)
                .map_err(|e| e.at(field.name()))?;
            trace!("Extracted {}.{} = {:?}", schema.name, field.name(), raw);
            model.values[index] = field
                .field_type()
                .convert(raw)
                .map_err(|e| e.at(field.name()))?;
        }
        Ok(model)
    }

    /// Write every set field onto a new message; `Unset` fields stay unset.
    pub fn to_protobuf(&self) -> Result<ProtoMessage> {
        let mut message = ProtoMessage::new(&self.schema.proto, &self.schema.message_type)?;
        for (field, value) in self.iter() {
            field
                .field_type()
                .dump(value, &mut message, field.wire_name())
                .map_err(|e| e.at(field.name()))?;
        }
        debug!(
            "Dumped {} to {} with set fields {:?}",
            self.schema.name,
            message.message_type(),
            message.list_fields()
        );
        Ok(message)
    }

    /// Validate every field, collecting all failures keyed by field name.
    pub fn validate(&self) -> std::result::Result<(), DataError> {
        let mut errors = BTreeMap::new();
        for (field, value) in self.iter() {
            if let Err(field_errors) = field.field_type().validate(value) {
                errors.insert(field.name().to_string(), field_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            debug!(
                "Validation of {} failed for fields {:?}",
                self.schema.name,
                errors.keys().collect::<Vec<_>>()
            );
            Err(DataError::new(self.schema.name.clone(), errors))
        }
    }

    /// Export to a mapping in declaration order.
    ///
    /// `Unset` fields appear as `Unset` or are left out, per
    /// `serialize_when_none`.
    pub fn to_native(&self) -> IndexMap<String, FieldValue> {
        let serialize_when_none = self.schema.options.serialize_when_none;
        self.iter()
            .filter_map(|(field, value)| {
                field
                    .field_type()
                    .export(value, serialize_when_none)
                    .map(|exported| (field.name().to_string(), exported))
            })
            .collect()
    }

    /// Export to a JSON object in declaration order; `Unset` renders as `null`.
    pub fn to_primitive(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.to_native()
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }

    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    /// Value of a field by name or wire name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.position(name).map(|index| &self.values[index])
    }

    /// Convert and assign a field by name or wire name.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let index = self.schema.position(name).ok_or_else(|| {
            ConversionError::new(format!(
                "Rogue field: {} has no field named '{name}'.",
                self.schema.name
            ))
            .at(name)
        })?;
        let field = &self.schema.fields[index];
        self.values[index] = field
            .field_type()
            .convert(value.into())
            .map_err(|e| e.at(field.name()))?;
        Ok(())
    }

    /// Declared fields with their values, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldValue)> {
        self.schema.fields.iter().zip(self.values.iter())
    }
}
