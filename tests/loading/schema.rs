use crate::common::fixtures;
use proto_model::{Field, FieldType, IntType, ListType, ModelSchema, SchemaError};
use proto_runtime::ProtoSchema;

fn incompatible_reason(result: Result<impl std::fmt::Debug, SchemaError>) -> String {
    match result {
        Err(SchemaError::IncompatibleField { reason, .. }) => reason,
        other => panic!("expected an incompatible field, got {other:?}"),
    }
}

#[test]
fn test_duplicate_names() -> anyhow::Result<()> {
    let proto = fixtures()?;

    let err = ModelSchema::builder("Twice", &proto, "Plain")
        .field(Field::new("value", FieldType::int()))
        .field(Field::new("value", FieldType::int()))
        .build()
        .expect_err("duplicate field");
    assert!(matches!(
        err,
        SchemaError::DuplicateField { ref model, ref field } if model == "Twice" && field == "value"
    ));

    let err = ModelSchema::builder("Shared", &proto, "Plain")
        .field(Field::new("alias", FieldType::int()).rename("value"))
        .field(Field::new("value", FieldType::int()))
        .build()
        .expect_err("duplicate wire name");
    assert_eq!(
        err.to_string(),
        "Wire name 'value' is used by both 'alias' and 'value'"
    );

    let err = FieldType::one_of(vec![
        Field::new("number", FieldType::int()),
        Field::new("number", FieldType::string()).rename("text"),
    ])
    .expect_err("duplicate variant");
    assert!(matches!(err, SchemaError::DuplicateField { .. }));
    Ok(())
}

#[test]
fn test_unknown_message_type() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let err = ModelSchema::builder("Missing", &proto, "Missing")
        .build()
        .expect_err("no such message");
    assert!(matches!(
        err,
        SchemaError::Proto(proto_runtime::Error::MessageTypeNotFound(_))
    ));
    Ok(())
}

#[test]
fn test_ambiguous_message_type() -> anyhow::Result<()> {
    let proto = ProtoSchema::from_string(
        r#"
        syntax = "proto3";
        message A { message Item { int32 id = 1; } }
        message B { message Item { int32 id = 1; } }
        "#,
    )?;

    let err = ModelSchema::builder("Item", &proto, "Item")
        .build()
        .expect_err("two candidates");
    assert!(matches!(
        err,
        SchemaError::Proto(proto_runtime::Error::AmbiguousMessageType { .. })
    ));

    ModelSchema::builder("Item", &proto, "B.Item")
        .field(Field::new("id", FieldType::int()))
        .build()?;
    Ok(())
}

#[test]
fn test_incompatible_scalars() -> anyhow::Result<()> {
    let proto = fixtures()?;

    let reason = incompatible_reason(
        ModelSchema::builder("Plain", &proto, "Plain")
            .field(Field::new("value", FieldType::string()))
            .build(),
    );
    assert_eq!(reason, "string values cannot be stored in a int32 field");

    let reason = incompatible_reason(
        ModelSchema::builder("Wrapped", &proto, "Wrapped")
            .field(Field::new("int_value", FieldType::bool_wrapper()))
            .build(),
    );
    assert_eq!(
        reason,
        "'fixtures.Int32Value.value' is int32 and cannot hold bool values"
    );

    let reason = incompatible_reason(
        ModelSchema::builder("Plain", &proto, "Plain")
            .field(Field::new("value", FieldType::int_wrapper()))
            .build(),
    );
    assert_eq!(reason, "wire field is int32, expected a wrapper message");

    incompatible_reason(
        ModelSchema::builder("Plain", &proto, "Plain")
            .field(Field::new("missing", FieldType::int()))
            .build(),
    );
    Ok(())
}

#[test]
fn test_incompatible_compound_fields() -> anyhow::Result<()> {
    let proto = fixtures()?;
    let grade = ModelSchema::builder("CourseGrade", &proto, "Student.CourseGrade")
        .field(Field::new("course_id", FieldType::string()))
        .build()?;

    let reason = incompatible_reason(
        ModelSchema::builder("Wrapper", &proto, "Wrapper")
            .field(Field::new("value", FieldType::message(&grade)))
            .build(),
    );
    assert_eq!(
        reason,
        "wire field is message:fixtures.Int32Value, expected message:fixtures.Student.CourseGrade"
    );

    let reason = incompatible_reason(
        ModelSchema::builder("Plain", &proto, "Plain")
            .field(Field::new("value", FieldType::repeated(FieldType::int())))
            .build(),
    );
    assert_eq!(reason, "wire field is singular int32");

    let reason = incompatible_reason(
        ModelSchema::builder("Lists", &proto, "Lists")
            .field(Field::new("numbers", FieldType::int()))
            .build(),
    );
    assert_eq!(reason, "wire field is repeated int32");

    let reason = incompatible_reason(
        ModelSchema::builder("Lists", &proto, "Lists")
            .field(Field::new(
                "numbers",
                FieldType::repeated(FieldType::int_wrapper()),
            ))
            .build(),
    );
    assert_eq!(reason, "wrapper elements are not supported in repeated fields");
    Ok(())
}

#[test]
fn test_incompatible_oneof_fields() -> anyhow::Result<()> {
    let proto = fixtures()?;

    let reason = incompatible_reason(
        ModelSchema::builder("Choice", &proto, "Choice")
            .field(Field::new(
                "inner",
                FieldType::one_of(vec![Field::new("other", FieldType::int())])?,
            ))
            .build(),
    );
    assert_eq!(reason, "oneof 'inner' has no member 'other'");

    let reason = incompatible_reason(
        ModelSchema::builder("Choice", &proto, "Choice")
            .field(Field::new(
                "inner",
                FieldType::one_of(vec![Field::new(
                    "number",
                    FieldType::repeated(FieldType::int()),
                )])?,
            ))
            .build(),
    );
    assert_eq!(reason, "variant 'number' cannot be a repeated field");

    let reason = incompatible_reason(
        ModelSchema::builder("Choice", &proto, "Choice")
            .field(Field::new(
                "inner",
                FieldType::one_of(vec![Field::new("text", FieldType::int())])?,
            ))
            .build(),
    );
    assert_eq!(
        reason,
        "variant 'text': int values cannot be stored in a string field"
    );

    incompatible_reason(
        ModelSchema::builder("Choice", &proto, "Choice")
            .field(Field::new(
                "missing",
                FieldType::one_of(vec![Field::new("number", FieldType::int())])?,
            ))
            .build(),
    );

    ModelSchema::builder("Choice", &proto, "Choice")
        .field(Field::new(
            "inner",
            FieldType::one_of(vec![
                Field::new("text", FieldType::string()),
                Field::new("wrapped", FieldType::string_wrapper()),
            ])?,
        ))
        .field(Field::new("other", FieldType::int()))
        .build()?;
    Ok(())
}

#[test]
fn test_inverted_bounds() -> anyhow::Result<()> {
    let proto = fixtures()?;

    let err = ModelSchema::builder("Plain", &proto, "Plain")
        .field(Field::new(
            "value",
            FieldType::primitive(IntType::new().min_value(10).max_value(1)),
        ))
        .build()
        .expect_err("min above max");
    assert_eq!(
        err.to_string(),
        "Invalid bounds for field 'Plain.value': minimum is greater than maximum"
    );

    let err = ModelSchema::builder("Lists", &proto, "Lists")
        .field(Field::new(
            "numbers",
            FieldType::list(ListType::new(FieldType::int()).min_size(3).max_size(2)),
        ))
        .build()
        .expect_err("min size above max size");
    assert!(matches!(err, SchemaError::InvalidBounds { .. }));
    Ok(())
}
