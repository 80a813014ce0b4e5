//! Validated data models backed by protobuf messages.
//!
//! Models declare typed fields that map onto the fields of a protobuf message
//! type and convert to and from messages of that type without losing field
//! presence: a field that was not transmitted loads as [`Unset`], distinct
//! from one transmitted with its default value.
//!
//! # Field kinds
//!
//! - primitive: a scalar stored directly in a wire field
//! - wrapper: a scalar stored in a wrapper sub-message (`Int32Value` style)
//! - message: a nested model
//! - repeated: a list of primitives or nested models
//! - oneof: one active variant of a oneof group
//!
//! # Example
//!
//! ```no_run
//! use proto_model::{Field, FieldType, Model, ModelSchema};
//! use proto_runtime::ProtoSchema;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let proto = ProtoSchema::from_file("school.proto")?;
//! let grade = ModelSchema::builder("CourseGrade", &proto, "CourseGrade")
//!     .field(Field::new("course_id", FieldType::string()))
//!     .field(Field::new("grade", FieldType::string()))
//!     .build()?;
//! let student = ModelSchema::builder("Student", &proto, "Student")
//!     .field(Field::new("id", FieldType::int()).required())
//!     .field(Field::new("name", FieldType::string_wrapper()))
//!     .field(Field::new("grades", FieldType::repeated(FieldType::message(&grade))))
//!     .build()?;
//!
//! let model = Model::from_map(&student, [("id", 12)])?;
//! model.validate()?;
//! let message = model.to_protobuf()?;
//! assert_eq!(Model::load(&student, &message)?, model);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod field;
pub mod model;
pub mod options;
pub mod types;
pub mod unset;
pub mod value;
pub mod wire;

pub use error::{ConversionError, DataError, Error, ErrorKey, FieldErrors, Result, SchemaError};
pub use field::{Field, FieldOptions, Validator};
pub use model::{Model, ModelSchema, ModelSchemaBuilder};
pub use options::ModelOptions;
pub use types::{
    BoolType, BytesType, FieldType, FloatType, IntType, ListType, OneOfType, StringType,
    VariantValue,
};
pub use unset::{Unset, UNSET};
pub use value::{FieldValue, Value};
