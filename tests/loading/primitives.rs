use crate::common::fixtures;
use proto_model::{
    Field, FieldType, FieldValue, FloatType, IntType, Model, ModelOptions, ModelSchema, Value,
};
use proto_runtime::{ProtoFieldValue, ProtoMessage, ProtoSchema};
use std::sync::Arc;

fn scalars_schema(proto: &ProtoSchema) -> anyhow::Result<Arc<ModelSchema>> {
    Ok(ModelSchema::builder("Scalars", proto, "Scalars")
        .field(Field::new("int32_field", FieldType::int()))
        .field(Field::new("int64_field", FieldType::int()))
        .field(Field::new("uint32_field", FieldType::int()))
        .field(Field::new("uint64_field", FieldType::int()))
        .field(Field::new("double_field", FieldType::float()))
        .field(Field::new("float_field", FieldType::float()))
        .field(Field::new("bool_field", FieldType::bool()))
        .field(Field::new("string_field", FieldType::string()))
        .field(Field::new("bytes_field", FieldType::bytes()))
        .field(Field::new("optional_field", FieldType::int()))
        .build()?)
}

fn all_set(proto: &ProtoSchema) -> anyhow::Result<ProtoMessage> {
    let mut msg = ProtoMessage::new(proto, "Scalars")?;
    msg.set_field("int32_field", ProtoFieldValue::Int32(-17))?;
    msg.set_field("int64_field", ProtoFieldValue::Int64(1 << 40))?;
    msg.set_field("uint32_field", ProtoFieldValue::Uint32(4_000_000_000))?;
    msg.set_field("uint64_field", ProtoFieldValue::Uint64(u64::MAX))?;
    msg.set_field("double_field", ProtoFieldValue::Double(2.75))?;
    msg.set_field("float_field", ProtoFieldValue::Float(0.5))?;
    msg.set_field("bool_field", ProtoFieldValue::Bool(true))?;
    msg.set_field("string_field", ProtoFieldValue::String("zażółć".to_string()))?;
    msg.set_field("bytes_field", ProtoFieldValue::Bytes(vec![0, 1, 254]))?;
    msg.set_field("optional_field", ProtoFieldValue::Int32(3))?;
    Ok(msg)
}

#[test]
fn test_load_all_set() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = scalars_schema(&proto)?;

    let model = Model::load(&schema, &all_set(&proto)?)?;
    model.validate()?;

    assert_eq!(model.get("int32_field"), Some(&FieldValue::from(-17)));
    assert_eq!(model.get("int64_field"), Some(&FieldValue::from(1i64 << 40)));
    assert_eq!(
        model.get("uint32_field"),
        Some(&FieldValue::from(4_000_000_000u32))
    );
    assert_eq!(model.get("uint64_field"), Some(&FieldValue::from(u64::MAX)));
    assert_eq!(model.get("double_field"), Some(&FieldValue::from(2.75)));
    assert_eq!(model.get("float_field"), Some(&FieldValue::from(0.5)));
    assert_eq!(model.get("bool_field"), Some(&FieldValue::from(true)));
    assert_eq!(model.get("string_field"), Some(&FieldValue::from("zażółć")));
    assert_eq!(
        model.get("bytes_field"),
        Some(&FieldValue::from(vec![0u8, 1, 254]))
    );
    assert_eq!(model.get("optional_field"), Some(&FieldValue::from(3)));

    let data = model.to_primitive();
    assert_eq!(data["uint64_field"], serde_json::json!(u64::MAX));
    assert_eq!(data["bytes_field"], serde_json::json!("AAH+"));
    assert_eq!(data["string_field"], serde_json::json!("zażółć"));
    Ok(())
}

#[test]
fn test_unset_scalars_load_as_defaults() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = scalars_schema(&proto)?;

    let model = Model::load(&schema, &ProtoMessage::new(&proto, "Scalars")?)?;
    model.validate()?;

    assert_eq!(model.get("int32_field"), Some(&FieldValue::from(0)));
    assert_eq!(model.get("double_field"), Some(&FieldValue::from(0.0)));
    assert_eq!(model.get("bool_field"), Some(&FieldValue::from(false)));
    assert_eq!(model.get("string_field"), Some(&FieldValue::from("")));
    assert_eq!(model.get("bytes_field"), Some(&FieldValue::from(Vec::<u8>::new())));

    // proto3 `optional` tracks presence
    assert_eq!(model.get("optional_field"), Some(&FieldValue::Unset));
    Ok(())
}

#[test]
fn test_optional_scalar_present_with_default() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = scalars_schema(&proto)?;

    let mut msg = ProtoMessage::new(&proto, "Scalars")?;
    msg.set_field("optional_field", ProtoFieldValue::Int32(0))?;

    let model = Model::load(&schema, &msg)?;
    assert_eq!(model.get("optional_field"), Some(&FieldValue::from(0)));

    let dumped = model.to_protobuf()?;
    assert_eq!(dumped.list_fields(), vec!["optional_field"]);
    Ok(())
}

#[test]
fn test_round_trip() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = scalars_schema(&proto)?;

    let model = Model::from_map(
        &schema,
        [
            ("int32_field", Value::Int(-5)),
            ("uint64_field", Value::UInt(u64::MAX - 1)),
            ("double_field", Value::Float(-0.125)),
            ("float_field", Value::Float(1.5)),
            ("bool_field", Value::Bool(true)),
            ("string_field", Value::from("text")),
            ("bytes_field", Value::Bytes(b"raw".to_vec())),
        ],
    )?;

    let reloaded = Model::load(&schema, &model.to_protobuf()?)?;
    for field in [
        "int32_field",
        "uint64_field",
        "double_field",
        "float_field",
        "bool_field",
        "string_field",
        "bytes_field",
    ] {
        assert_eq!(reloaded.get(field), model.get(field), "field {field}");
    }
    assert_eq!(reloaded.get("optional_field"), Some(&FieldValue::Unset));
    Ok(())
}

#[test]
fn test_dump_rejects_out_of_range_values() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = scalars_schema(&proto)?;

    let model = Model::from_map(&schema, [("uint32_field", Value::Int(-1))])?;
    let err = model.to_protobuf().expect_err("negative uint32");
    assert_eq!(
        err.to_string(),
        "uint32_field: Value '-1' is out of range for uint32."
    );
    Ok(())
}

#[test]
fn test_dump_rejects_inexact_float_values() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = scalars_schema(&proto)?;

    let model = Model::from_map(
        &schema,
        [("float_field", Value::Float(0.1)), ("double_field", Value::Float(0.1))],
    )?;
    let err = model.to_protobuf().expect_err("0.1 has no exact float form");
    assert_eq!(
        err.to_string(),
        "float_field: Value '0.1' cannot be stored exactly in a float field."
    );

    let model = Model::from_map(
        &schema,
        [("float_field", Value::Float(0.375)), ("double_field", Value::Float(0.1))],
    )?;
    let reloaded = Model::load(&schema, &model.to_protobuf()?)?;
    assert_eq!(reloaded.get("float_field"), Some(&FieldValue::from(Value::Float(0.375))));
    assert_eq!(reloaded.get("double_field"), Some(&FieldValue::from(Value::Float(0.1))));
    Ok(())
}

#[test]
fn test_load_plain_model_variants()-> anyhow::Result<()> {
    let proto = fixtures()?;

    let mut msg = ProtoMessage::new(&proto, "Plain")?;
    msg.set_field("value", ProtoFieldValue::Int32(42))?;
    let empty = ProtoMessage::new(&proto, "Plain")?;

    let optional = ModelSchema::builder("ModelOptional", &proto, "Plain")
        .field(Field::new("value", FieldType::int()))
        .build()?;
    let required = ModelSchema::builder("ModelRequired", &proto, "Plain")
        .field(Field::new("value", FieldType::int()).required())
        .build()?;
    let none_not_dumped = ModelSchema::builder("ModelNoneNotDumped", &proto, "Plain")
        .field(Field::new("value", FieldType::int()))
        .options(ModelOptions {
            serialize_when_none: false,
        })
        .build()?;
    let renamed = ModelSchema::builder("ModelFieldRenamed", &proto, "Plain")
        .field(Field::new("custom_name", FieldType::int()).rename("value"))
        .build()?;

    for (field_name, schema) in [
        ("value", &optional),
        ("value", &required),
        ("value", &none_not_dumped),
        ("custom_name", &renamed),
    ] {
        for (message, expected) in [(&msg, 42), (&empty, 0)] {
            let model = Model::load(schema, message)?;
            model.validate()?;

            assert_eq!(model.get(field_name), Some(&FieldValue::from(expected)));

            let data = model.to_primitive();
            assert_eq!(data[field_name], serde_json::json!(expected));

            let native = model.to_native();
            assert_eq!(native.get(field_name), Some(&FieldValue::from(expected)));
        }
    }

    // The rename reads and writes the wire name only
    let model = Model::from_map(&renamed, [("custom_name", 7)])?;
    let dumped = model.to_protobuf()?;
    assert_eq!(dumped.get_field("value")?, ProtoFieldValue::Int32(7));
    assert!(dumped.descriptor().get_field("custom_name").is_err());
    Ok(())
}

#[test]
fn test_constrained_scalars() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let schema = ModelSchema::builder("Bounded", &proto, "Scalars")
        .field(Field::new(
            "int32_field",
            FieldType::primitive(IntType::new().min_value(0).max_value(100)),
        ))
        .field(Field::new(
            "double_field",
            FieldType::primitive(FloatType::new().min_value(0.0)),
        ))
        .build()?;

    let model = Model::from_map(
        &schema,
        [("int32_field", Value::Int(101)), ("double_field", Value::Float(-1.0))],
    )?;
    let err = model.validate().expect_err("out of bounds");
    assert_eq!(
        err.to_primitive(),
        serde_json::json!({
            "double_field": ["Float value should be greater than or equal to 0."],
            "int32_field": ["Int value should be less than or equal to 100."],
        })
    );
    Ok(())
}
