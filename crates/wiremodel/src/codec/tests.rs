// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::field::FieldDescriptor;
use crate::protocol::{BinaryProtocol, CompactProtocol, ProtocolError};
use crate::schema::StructDecl;
use crate::types::{TypeDescriptor, Value};

fn registry_with(decls: Vec<StructDecl>) -> Registry {
    let registry = Registry::new();
    for decl in decls {
        registry.declare(decl);
    }
    registry.freeze_all().expect("freeze");
    registry
}

#[test]
fn test_writes_present_fields_in_id_order_then_stop() {
    let registry = registry_with(vec![StructDecl::new("Pair")
        .field(FieldDescriptor::new("b", TypeDescriptor::Bool).with_id(2))
        .field(FieldDescriptor::new("a", TypeDescriptor::I64).with_id(1))
        .field(FieldDescriptor::new("unset", TypeDescriptor::Double).with_id(3))]);
    let schema = registry.schema("Pair").expect("schema");

    let model = Model::new(&schema)
        .with("b", true)
        .and_then(|m| m.with("a", 7i64))
        .expect("set");
    let bytes = serialize(&model, &BinaryProtocol).expect("serialize");
    assert_eq!(
        bytes,
        [10, 0, 1, 0, 0, 0, 0, 0, 0, 0, 7, 2, 0, 2, 1, 0]
    );
}

#[test]
fn test_empty_instance_is_just_the_stop_marker() {
    let registry = registry_with(vec![StructDecl::new("Empty")
        .field(FieldDescriptor::new("x", TypeDescriptor::I64))]);
    let schema = registry.schema("Empty").expect("schema");
    assert_eq!(serialize(&Model::new(&schema), &BinaryProtocol).expect("serialize"), [0]);
    assert_eq!(serialize(&Model::new(&schema), &CompactProtocol).expect("serialize"), [0]);
}

#[test]
fn test_value_of_wrong_type_fails_to_serialize() {
    let registry = registry_with(vec![StructDecl::new("Typed")
        .field(FieldDescriptor::new("ids", TypeDescriptor::list(TypeDescriptor::I64)))]);
    let schema = registry.schema("Typed").expect("schema");
    let model = Model::new(&schema)
        .with("ids", Value::list([Value::I64(1), Value::from("two")]))
        .expect("set");

    match serialize(&model, &BinaryProtocol) {
        Err(CodecError::TypeMismatch {
            type_name,
            field,
            expected,
            found,
        }) => {
            assert_eq!((type_name.as_str(), field.as_str()), ("Typed", "ids"));
            assert_eq!((expected.as_str(), found.as_str()), ("i64", "string"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_nested_instance_of_other_type_fails_to_serialize() {
    let registry = registry_with(vec![
        StructDecl::new("A"),
        StructDecl::new("B"),
        StructDecl::new("Holder").field(FieldDescriptor::new("a", TypeDescriptor::struct_ref("A"))),
    ]);
    let b = Model::new(&registry.schema("B").expect("B"));
    let holder = Model::new(&registry.schema("Holder").expect("Holder"))
        .with("a", b)
        .expect("set");
    assert!(matches!(
        serialize(&holder, &CompactProtocol),
        Err(CodecError::TypeMismatch { ref found, .. }) if found == "B"
    ));
}

#[test]
fn test_unknown_fields_are_skipped() {
    let writer_side = registry_with(vec![StructDecl::new("Event")
        .field(FieldDescriptor::new("id", TypeDescriptor::I64).with_id(1))
        .field(FieldDescriptor::new(
            "extra",
            TypeDescriptor::map(
                TypeDescriptor::string(),
                TypeDescriptor::list(TypeDescriptor::Double),
            ),
        ).with_id(7))
        .field(FieldDescriptor::new("name", TypeDescriptor::Utf8).with_id(9))]);
    let reader_side = registry_with(vec![StructDecl::new("Event")
        .field(FieldDescriptor::new("id", TypeDescriptor::I64).with_id(1))
        .field(FieldDescriptor::new("name", TypeDescriptor::Utf8).with_id(9))]);

    let model = Model::new(&writer_side.schema("Event").expect("schema"))
        .with("id", 3i64)
        .and_then(|m| m.with("extra", Value::map([("k", Value::list([1.0, 2.0]))])))
        .and_then(|m| m.with("name", "boot"))
        .expect("set");

    for protocol in [&BinaryProtocol as &dyn Protocol, &CompactProtocol] {
        let bytes = serialize(&model, protocol).expect("serialize");
        let decoded = deserialize(&reader_side, "Event", &bytes, protocol).expect("deserialize");
        assert_eq!(decoded.get_as::<i64>("id").expect("id"), Some(3));
        assert_eq!(decoded.get_as::<String>("name").expect("name"), Some("boot".to_string()));
        assert_eq!(decoded.len(), 2);
    }
}

#[test]
fn test_incompatible_wire_type_is_skipped() {
    let writer_side = registry_with(vec![StructDecl::new("Reading")
        .field(FieldDescriptor::new("value", TypeDescriptor::Double).with_id(1))
        .field(FieldDescriptor::new("unit", TypeDescriptor::string()).with_id(2))]);
    let reader_side = registry_with(vec![StructDecl::new("Reading")
        .field(FieldDescriptor::new("value", TypeDescriptor::I64).with_id(1))
        .field(FieldDescriptor::new("unit", TypeDescriptor::Utf8).with_id(2))]);

    let model = Model::new(&writer_side.schema("Reading").expect("schema"))
        .with("value", 1.5)
        .and_then(|m| m.with("unit", "kPa"))
        .expect("set");
    let bytes = serialize(&model, &BinaryProtocol).expect("serialize");
    let decoded =
        deserialize(&reader_side, "Reading", &bytes, &BinaryProtocol).expect("deserialize");

    assert!(!decoded.is_set("value").expect("value"));
    // string and utf8 share an encoding
    assert_eq!(decoded.get("unit").expect("unit"), Some(&Value::from("kPa")));
}

#[test]
fn test_container_element_mismatch_is_an_error() {
    let writer_side = registry_with(vec![StructDecl::new("Bag")
        .field(
            FieldDescriptor::new("items", TypeDescriptor::list(TypeDescriptor::Double)).with_id(1),
        )]);
    let reader_side = registry_with(vec![StructDecl::new("Bag")
        .field(
            FieldDescriptor::new("items", TypeDescriptor::list(TypeDescriptor::I64)).with_id(1),
        )]);

    let model = Model::new(&writer_side.schema("Bag").expect("schema"))
        .with("items", Value::list([0.5]))
        .expect("set");
    let bytes = serialize(&model, &CompactProtocol).expect("serialize");
    let err = deserialize(&reader_side, "Bag", &bytes, &CompactProtocol).expect_err("mismatch");
    assert!(
        matches!(
            err,
            CodecError::ElementTypeMismatch {
                expected: WireType::I64,
                found: WireType::Double
            }
        ),
        "{}",
        err
    );
}

#[test]
fn test_depth_limit_applies_to_nested_containers() {
    let registry = registry_with(vec![StructDecl::new("Deep").field(FieldDescriptor::new(
        "grid",
        TypeDescriptor::list(TypeDescriptor::list(TypeDescriptor::I64)),
    ))]);
    let schema = registry.schema("Deep").expect("schema");
    let model = Model::new(&schema)
        .with("grid", Value::list([Value::list([1i64, 2])]))
        .expect("set");
    let bytes = serialize(&model, &BinaryProtocol).expect("serialize");

    let shallow = CodecConfig {
        max_depth: 2,
        ..CodecConfig::default()
    };
    let codec = Codec::with_config(&registry, shallow).expect("config");
    assert!(matches!(
        codec.deserialize("Deep", &bytes, &BinaryProtocol),
        Err(CodecError::DepthLimitExceeded { max: 2 })
    ));
    assert!(matches!(
        codec.serialize(&model, &BinaryProtocol),
        Err(CodecError::DepthLimitExceeded { max: 2 })
    ));

    let roomy = CodecConfig {
        max_depth: 3,
        ..CodecConfig::default()
    };
    let codec = Codec::with_config(&registry, roomy).expect("config");
    assert_eq!(codec.deserialize("Deep", &bytes, &BinaryProtocol).expect("decode"), model);
}

#[test]
fn test_skipped_values_share_the_depth_budget() {
    let row = TypeDescriptor::list(TypeDescriptor::I64);
    let cube = TypeDescriptor::list(TypeDescriptor::list(row));
    let writer_side = registry_with(vec![StructDecl::new("Envelope")
        .field(FieldDescriptor::new("id", TypeDescriptor::I64).with_id(1))
        .field(FieldDescriptor::new("cube", cube).with_id(2))]);
    let reader_side = registry_with(vec![StructDecl::new("Envelope")
        .field(FieldDescriptor::new("id", TypeDescriptor::I64).with_id(1))]);

    let model = Model::new(&writer_side.schema("Envelope").expect("schema"))
        .with("id", 7i64)
        .and_then(|m| m.with("cube", Value::list([Value::list([Value::list([1i64])])])))
        .expect("set");
    let bytes = serialize(&model, &BinaryProtocol).expect("serialize");

    // the innermost list sits at depth 4
    let tight = CodecConfig {
        max_depth: 3,
        ..CodecConfig::default()
    };
    for registry in [&writer_side, &reader_side] {
        let codec = Codec::with_config(registry, tight.clone()).expect("config");
        let err = codec.deserialize("Envelope", &bytes, &BinaryProtocol).expect_err("too deep");
        assert!(
            matches!(
                err,
                CodecError::DepthLimitExceeded { max: 3 }
                    | CodecError::Protocol(ProtocolError::DepthLimitExceeded { max: 3 })
            ),
            "{}",
            err
        );
    }

    let enough = CodecConfig {
        max_depth: 4,
        ..CodecConfig::default()
    };
    let codec = Codec::with_config(&reader_side, enough).expect("config");
    let decoded = codec.deserialize("Envelope", &bytes, &BinaryProtocol).expect("decode");
    assert_eq!(decoded.get_as::<i64>("id").expect("id"), Some(7));
    assert_eq!(decoded.len(), 1);
}

#[test]
fn test_container_limit_is_enforced() {
    let registry = registry_with(vec![StructDecl::new("Many")
        .field(FieldDescriptor::new("values", TypeDescriptor::set(TypeDescriptor::I64)))]);
    let schema = registry.schema("Many").expect("schema");
    let model = Model::new(&schema)
        .with("values", Value::set(0i64..10))
        .expect("set");
    let bytes = serialize(&model, &CompactProtocol).expect("serialize");

    let config = CodecConfig {
        max_container_len: 5,
        ..CodecConfig::default()
    };
    let codec = Codec::with_config(&registry, config).expect("config");
    assert!(matches!(
        codec.deserialize("Many", &bytes, &CompactProtocol),
        Err(CodecError::Protocol(ProtocolError::LengthLimit { len: 10, max: 5 }))
    ));
}

#[test]
fn test_zero_limits_are_rejected_by_codec() {
    let registry = Registry::new();
    let config = CodecConfig {
        max_depth: 0,
        ..CodecConfig::default()
    };
    assert!(matches!(Codec::with_config(&registry, config), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_truncated_input_is_reported() {
    let registry = registry_with(vec![StructDecl::new("Msg")
        .field(FieldDescriptor::new("text", TypeDescriptor::string()))]);
    let schema = registry.schema("Msg").expect("schema");
    let model = Model::new(&schema).with("text", "hello").expect("set");
    let bytes = serialize(&model, &BinaryProtocol).expect("serialize");

    let err = deserialize(&registry, "Msg", &bytes[..bytes.len() - 3], &BinaryProtocol)
        .expect_err("truncated");
    assert!(
        matches!(err, CodecError::Protocol(ProtocolError::UnexpectedEof { .. })),
        "{}",
        err
    );
}

#[test]
fn test_unknown_root_type_is_a_schema_error() {
    let registry = Registry::new();
    assert!(matches!(
        deserialize(&registry, "Nope", &[0], &BinaryProtocol),
        Err(CodecError::Schema(SchemaError::UndefinedType(_)))
    ));
}
