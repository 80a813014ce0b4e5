use crate::common::fixtures;
use proto_model::{Field, FieldType, FieldValue, Model, ModelOptions, ModelSchema, Value, UNSET};
use proto_runtime::{ProtoFieldValue, ProtoMessage, ProtoSchema};
use std::sync::Arc;

const FIELDS: [&str; 6] = [
    "int_value",
    "uint_value",
    "double_value",
    "bool_value",
    "string_value",
    "bytes_value",
];

fn wrapped_schema(proto: &ProtoSchema, options: ModelOptions) -> anyhow::Result<Arc<ModelSchema>> {
    Ok(ModelSchema::builder("Wrapped", proto, "fixtures.Wrapped")
        .field(Field::new("int_value", FieldType::int_wrapper()))
        .field(Field::new("uint_value", FieldType::int_wrapper()))
        .field(Field::new("double_value", FieldType::float_wrapper()))
        .field(Field::new("bool_value", FieldType::bool_wrapper()))
        .field(Field::new("string_value", FieldType::string_wrapper()))
        .field(Field::new("bytes_value", FieldType::bytes_wrapper()))
        .options(options)
        .build()?)
}

#[test]
fn test_absent_wrappers_load_as_unset() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = wrapped_schema(&proto, ModelOptions::default())?;

    let model = Model::load(&schema, &ProtoMessage::new(&proto, "Wrapped")?)?;
    model.validate()?;

    for field in FIELDS {
        assert_eq!(model.get(field), Some(&FieldValue::Unset), "field {field}");
    }

    let native = model.to_native();
    assert_eq!(native.len(), FIELDS.len());
    assert!(native.values().all(|value| *value == UNSET));

    let data = model.to_primitive();
    for field in FIELDS {
        assert_eq!(data[field], serde_json::Value::Null, "field {field}");
    }

    assert!(model.to_protobuf()?.list_fields().is_empty());
    Ok(())
}

#[test]
fn test_present_wrappers_with_defaults_are_set() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = wrapped_schema(&proto, ModelOptions::default())?;

    let mut msg = ProtoMessage::new(&proto, "Wrapped")?;
    for field in FIELDS {
        msg.mut_message(field)?;
    }

    let model = Model::load(&schema, &msg)?;
    assert_eq!(model.get("int_value"), Some(&FieldValue::from(0)));
    assert_eq!(model.get("uint_value"), Some(&FieldValue::from(0)));
    assert_eq!(model.get("double_value"), Some(&FieldValue::from(0.0)));
    assert_eq!(model.get("bool_value"), Some(&FieldValue::from(false)));
    assert_eq!(model.get("string_value"), Some(&FieldValue::from("")));
    assert_eq!(
        model.get("bytes_value"),
        Some(&FieldValue::from(Vec::<u8>::new()))
    );

    // Defaults survive the round trip as present wrappers
    let dumped = model.to_protobuf()?;
    assert_eq!(dumped.list_fields(), FIELDS.to_vec());
    assert_eq!(Model::load(&schema, &dumped)?, model);
    Ok(())
}

#[test]
fn test_load_wrapped_values() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = wrapped_schema(&proto, ModelOptions::default())?;

    let mut msg = ProtoMessage::new(&proto, "Wrapped")?;
    msg.mut_message("int_value")?
        .set_field("value", ProtoFieldValue::Int32(-3))?;
    msg.mut_message("uint_value")?
        .set_field("value", ProtoFieldValue::Uint64(u64::MAX))?;
    msg.mut_message("string_value")?
        .set_field("value", ProtoFieldValue::String("abc".to_string()))?;

    let model = Model::load(&schema, &msg)?;
    assert_eq!(model.get("int_value"), Some(&FieldValue::from(-3)));
    assert_eq!(model.get("uint_value"), Some(&FieldValue::from(u64::MAX)));
    assert_eq!(model.get("string_value"), Some(&FieldValue::from("abc")));
    assert_eq!(model.get("bool_value"), Some(&FieldValue::Unset));

    assert_eq!(
        model.to_primitive(),
        serde_json::json!({
            "int_value": -3,
            "uint_value": u64::MAX,
            "double_value": null,
            "bool_value": null,
            "string_value": "abc",
            "bytes_value": null,
        })
    );
    Ok(())
}

#[test]
fn test_round_trip() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = wrapped_schema(&proto, ModelOptions::default())?;

    let model = Model::from_map(
        &schema,
        [
            ("int_value", Value::from("12")),
            ("double_value", Value::Float(0.5)),
            ("bool_value", Value::Bool(true)),
            ("bytes_value", Value::from("AAH+")),
        ],
    )?;
    assert_eq!(model.get("int_value"), Some(&FieldValue::from(12)));
    assert_eq!(
        model.get("bytes_value"),
        Some(&FieldValue::from(vec![0u8, 1, 254]))
    );

    let dumped = model.to_protobuf()?;
    assert_eq!(
        dumped.list_fields(),
        vec!["int_value", "double_value", "bool_value", "bytes_value"]
    );
    match dumped.get_field("int_value")? {
        ProtoFieldValue::Message(inner) => {
            assert_eq!(inner.message_type(), "fixtures.Int32Value");
            assert_eq!(inner.get_field("value")?, ProtoFieldValue::Int32(12));
        }
        other => panic!("unexpected value {other:?}"),
    }

    assert_eq!(Model::load(&schema, &dumped)?, model);
    Ok(())
}

#[test]
fn test_none_not_dumped() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = wrapped_schema(
        &proto,
        ModelOptions {
            serialize_when_none: false,
        },
    )?;

    let mut msg = ProtoMessage::new(&proto, "Wrapped")?;
    msg.mut_message("int_value")?
        .set_field("value", ProtoFieldValue::Int32(42))?;

    let model = Model::load(&schema, &msg)?;
    let native = model.to_native();
    assert_eq!(native.keys().collect::<Vec<_>>(), vec!["int_value"]);
    assert_eq!(model.to_primitive(), serde_json::json!({"int_value": 42}));

    let empty = Model::load(&schema, &ProtoMessage::new(&proto, "Wrapped")?)?;
    assert!(empty.to_native().is_empty());
    assert_eq!(empty.to_primitive(), serde_json::json!({}));
    Ok(())
}

#[test]
fn test_field_level_serialize_when_none_wins() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = ModelSchema::builder("Wrapped", &proto, "Wrapped")
        .field(Field::new("int_value", FieldType::int_wrapper()).serialize_when_none(true))
        .field(Field::new("string_value", FieldType::string_wrapper()))
        .options(ModelOptions {
            serialize_when_none: false,
        })
        .build()?;

    let model = Model::new(&schema);
    assert_eq!(model.to_primitive(), serde_json::json!({"int_value": null}));
    Ok(())
}

#[test]
fn test_wrapper_narrowing_on_dump() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = wrapped_schema(&proto, ModelOptions::default())?;

    let model = Model::from_map(&schema, [("int_value", Value::Int(i64::MAX))])?;
    let err = model.to_protobuf().expect_err("does not fit int32");
    assert_eq!(
        err.to_string(),
        format!("int_value: Value '{}' is out of range for int32.", i64::MAX)
    );
    Ok(())
}
