use crate::error::{Error, Result};
use crate::proto::{ProtoFieldDescriptor, ProtoMessageDescriptor, ProtoOneofDescriptor, ProtoType};
use protobuf::descriptor::{DescriptorProto, FieldDescriptorProto};
use protobuf_parse::Parser;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Represents a parsed protobuf schema
///
/// Cloning is cheap: descriptors are shared.
#[derive(Clone, Default)]
pub struct ProtoSchema {
    /// Map of fully qualified message type names to their descriptors
    pub(crate) messages: Arc<HashMap<String, Arc<ProtoMessageDescriptor>>>,
}

impl std::fmt::Debug for ProtoSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.list_messages();
        names.sort();
        f.debug_struct("ProtoSchema")
            .field("messages", &names)
            .finish()
    }
}

impl ProtoSchema {
    /// Parse a .proto file and create a schema
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();

        let mut parser = Parser::new();
        parser.input(p);

        // Imports are resolved relative to the file's own directory
        if let Some(parent) = p.parent() {
            parser.include(parent);
        }

        let parsed = parser
            .parse_and_typecheck()
            .map_err(|e| Error::ProtobufParse(e.to_string()))?;

        Self::from_file_descriptors(parsed.file_descriptors)
    }

    /// Parse a .proto file content from string
    pub fn from_string(content: &str) -> Result<Self> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new()
            .map_err(|e| Error::ProtobufParse(format!("Failed to create temp file: {e}")))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| Error::ProtobufParse(format!("Failed to write temp file: {e}")))?;

        Self::from_file(temp_file.path())
    }

    /// Build a schema from already parsed file descriptors.
    pub fn from_file_descriptors<I>(file_descriptors: I) -> Result<Self>
    where
        I: IntoIterator<Item = protobuf::descriptor::FileDescriptorProto>,
    {
        let mut messages = HashMap::new();

        for file_descriptor in file_descriptors {
            let prefix = file_descriptor.package.clone().unwrap_or_default();
            for message in &file_descriptor.message_type {
                Self::collect_message(&prefix, message, &mut messages)?;
            }
        }

        debug!("Parsed protobuf schema with {} message types", messages.len());

        Ok(ProtoSchema {
            messages: Arc::new(messages),
        })
    }

    /// Register `message` and its nested types under their full names.
    fn collect_message(
        prefix: &str,
        message: &DescriptorProto,
        messages: &mut HashMap<String, Arc<ProtoMessageDescriptor>>,
    ) -> Result<()> {
        let simple_name = message.name.clone().unwrap_or_default();
        let message_name = if prefix.is_empty() {
            simple_name
        } else {
            format!("{prefix}.{simple_name}")
        };

        let mut fields = HashMap::new();
        let mut field_order = Vec::new();
        let mut oneofs: HashMap<String, ProtoOneofDescriptor> = HashMap::new();

        for field in &message.field {
            let field_name = field.name.clone().unwrap_or_default();
            if field_name.is_empty() {
                continue;
            }
            field_order.push(field_name.clone());

            let proto3_optional = field.proto3_optional.unwrap_or(false);

            // proto3 `optional` fields live in a synthetic oneof which is not a real group
            let oneof = match field.oneof_index {
                Some(index) if !proto3_optional => {
                    let oneof_name = message
                        .oneof_decl
                        .get(index as usize)
                        .and_then(|decl| decl.name.clone())
                        .ok_or_else(|| {
                            Error::ProtobufParse(format!(
                                "Field '{message_name}.{field_name}' references unknown oneof {index}"
                            ))
                        })?;
                    oneofs
                        .entry(oneof_name.clone())
                        .or_insert_with(|| ProtoOneofDescriptor {
                            name: oneof_name.clone(),
                            fields: Vec::new(),
                        })
                        .fields
                        .push(field_name.clone());
                    Some(oneof_name)
                }
                _ => None,
            };

            let descriptor = ProtoFieldDescriptor {
                name: field_name.clone(),
                number: field.number.unwrap_or(0),
                field_type: Self::parse_field_type(field)?,
                is_repeated: field.label
                    == Some(
                        protobuf::descriptor::field_descriptor_proto::Label::LABEL_REPEATED.into(),
                    ),
                oneof,
                proto3_optional,
            };

            fields.insert(field_name, descriptor);
        }

        for nested in &message.nested_type {
            Self::collect_message(&message_name, nested, messages)?;
        }

        messages.insert(
            message_name.clone(),
            Arc::new(ProtoMessageDescriptor {
                name: message_name,
                fields,
                field_order,
                oneofs,
            }),
        );

        Ok(())
    }

    fn parse_field_type(field: &FieldDescriptorProto) -> Result<ProtoType> {
        use protobuf::descriptor::field_descriptor_proto::Type;

        let field_type_enum_or_unknown = field
            .type_
            .ok_or_else(|| Error::ProtobufParse("Field missing type".to_string()))?;

        let field_type_enum = field_type_enum_or_unknown.enum_value_or_default();

        // Type references are fully qualified with a leading dot
        let referenced_type = || {
            field
                .type_name
                .clone()
                .unwrap_or_default()
                .trim_start_matches('.')
                .to_string()
        };

        Ok(match field_type_enum {
            Type::TYPE_DOUBLE => ProtoType::Double,
            Type::TYPE_FLOAT => ProtoType::Float,
            Type::TYPE_INT64 => ProtoType::Int64,
            Type::TYPE_UINT64 => ProtoType::Uint64,
            Type::TYPE_INT32 => ProtoType::Int32,
            Type::TYPE_FIXED64 => ProtoType::Fixed64,
            Type::TYPE_FIXED32 => ProtoType::Fixed32,
            Type::TYPE_BOOL => ProtoType::Bool,
            Type::TYPE_STRING => ProtoType::String,
            Type::TYPE_MESSAGE => ProtoType::Message(referenced_type()),
            Type::TYPE_BYTES => ProtoType::Bytes,
            Type::TYPE_UINT32 => ProtoType::Uint32,
            Type::TYPE_ENUM => ProtoType::Enum(referenced_type()),
            Type::TYPE_SFIXED32 => ProtoType::Sfixed32,
            Type::TYPE_SFIXED64 => ProtoType::Sfixed64,
            Type::TYPE_SINT32 => ProtoType::Sint32,
            Type::TYPE_SINT64 => ProtoType::Sint64,
            Type::TYPE_GROUP => {
                return Err(Error::ProtobufParse(
                    "TYPE_GROUP is Proto2 syntax only and deprecated hence not supported"
                        .to_string(),
                ))
            }
        })
    }

    /// Get a message descriptor by name
    ///
    /// Accepts the fully qualified name (with or without a leading dot) or
    /// any unambiguous dotted suffix of it, such as the bare message name.
    pub fn get_message(&self, name: &str) -> Result<Arc<ProtoMessageDescriptor>> {
        let name = name.trim_start_matches('.');
        if let Some(descriptor) = self.messages.get(name) {
            return Ok(Arc::clone(descriptor));
        }

        let suffix = format!(".{name}");
        let mut candidates: Vec<&String> = self
            .messages
            .keys()
            .filter(|full_name| full_name.ends_with(&suffix))
            .collect();

        match candidates.len() {
            0 => Err(Error::MessageTypeNotFound(name.to_string())),
            1 => Ok(Arc::clone(&self.messages[candidates[0]])),
            _ => {
                candidates.sort();
                Err(Error::AmbiguousMessageType {
                    name: name.to_string(),
                    candidates: candidates.into_iter().cloned().collect(),
                })
            }
        }
    }

    /// List all message types in the schema
    pub fn list_messages(&self) -> Vec<String> {
        self.messages.keys().cloned().collect()
    }
}
