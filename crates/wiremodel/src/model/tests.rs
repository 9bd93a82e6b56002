// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::field::validators::{Length, NotNull, Range};
use crate::field::FieldDescriptor;
use crate::schema::{Registry, StructDecl, StructSchema};
use crate::types::{ElementDescriptor, TypeDescriptor, Value};
use std::sync::Arc;

fn point(registry: &Registry) -> Arc<StructSchema> {
    registry
        .register(
            StructDecl::new("Point")
                .field(FieldDescriptor::new("y", TypeDescriptor::I64).with_id(2))
                .field(FieldDescriptor::new("x", TypeDescriptor::I64).with_id(1))
                .field(
                    FieldDescriptor::new("label", TypeDescriptor::string())
                        .with_id(3)
                        .wire_name("Label")
                        .with_default("origin"),
                ),
        )
        .expect("register Point")
}

#[test]
fn test_positional_values_bind_in_id_order() {
    let registry = Registry::new();
    let schema = point(&registry);
    let model = Model::from_positional(&schema, [Value::I64(10), Value::I64(20)]).expect("bind");
    assert_eq!(model.get_as::<i64>("x").expect("x"), Some(10));
    assert_eq!(model.get_as::<i64>("y").expect("y"), Some(20));
    assert!(!model.is_set("label").expect("label"));

    let err = Model::from_positional(&schema, [1i64, 2, 3, 4]).expect_err("too many");
    assert_eq!(
        err,
        ModelError::TooManyArguments {
            type_name: "Point".to_string(),
            expected: 3,
            given: 4
        }
    );
}

#[test]
fn test_named_values_reject_unknown_fields() {
    let registry = Registry::new();
    let schema = point(&registry);
    let model = Model::from_named(&schema, [("x", 1i64), ("y", 2)]).expect("bind");
    assert_eq!(model.len(), 2);

    let err = Model::from_named(&schema, [("z", 1i64)]).expect_err("unknown");
    assert_eq!(
        err,
        ModelError::UndefinedField {
            type_name: "Point".to_string(),
            field: "z".to_string()
        }
    );
}

#[test]
fn test_set_does_not_type_check_but_validate_does() {
    let registry = Registry::new();
    let schema = point(&registry);
    let mut model = Model::new(&schema);
    model.set("x", "not a number").expect("set stores anything");

    match model.validate() {
        Err(ModelError::Validation { field, id, reason, .. }) => {
            assert_eq!((field.as_str(), id), ("x", 1));
            assert!(reason.contains("expected i64"), "{}", reason);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_delete_unset_field_is_noop() {
    let registry = Registry::new();
    let schema = point(&registry);
    let mut model = Model::new(&schema);
    assert_eq!(model.delete("x").expect("delete"), None);

    model.set("x", 3i64).expect("set");
    assert_eq!(model.delete("x").expect("delete"), Some(Value::I64(3)));
    assert!(model.is_empty());
    assert!(model.delete("nope").is_err());
}

#[test]
fn test_unset_is_distinct_from_default() {
    let registry = Registry::new();
    let schema = point(&registry);
    let empty = Model::new(&schema);
    assert_eq!(empty.get("label").expect("get"), None);
    assert_eq!(empty.get_or_default("label").expect("get"), Some(&Value::from("origin")));

    let explicit = Model::new(&schema).with("label", "origin").expect("set");
    assert_ne!(empty, explicit);
}

#[test]
fn test_typed_getter_reports_wrong_type() {
    let registry = Registry::new();
    let schema = point(&registry);
    let model = Model::new(&schema).with("label", "here").expect("set");
    let err = model.get_as::<i64>("label").expect_err("wrong type");
    assert!(matches!(
        err,
        ModelError::WrongType {
            expected: "i64",
            found: "string",
            ..
        }
    ));
}

#[test]
fn test_wire_name_and_id_access() {
    let registry = Registry::new();
    let schema = point(&registry);
    let mut model = Model::new(&schema);
    model.set_by_wire_name("Label", "tag").expect("wire name");
    assert_eq!(model.get_as::<String>("label").expect("get"), Some("tag".to_string()));
    assert!(model.get_by_wire_name("label").is_err());

    model.set_by_id(1, 5i64).expect("by id");
    assert_eq!(model.value_by_id(1), Some(&Value::I64(5)));
    assert_eq!(
        model.set_by_id(9, 1i64),
        Err(ModelError::UndefinedFieldId {
            type_name: "Point".to_string(),
            id: 9
        })
    );
}

#[test]
fn test_display_lists_set_fields_in_id_order() {
    let registry = Registry::new();
    let schema = point(&registry);
    let model = Model::new(&schema)
        .with("label", "a")
        .and_then(|m| m.with("y", 2i64))
        .and_then(|m| m.with("x", 1i64))
        .expect("set");
    assert_eq!(model.to_string(), "Point(x=1, y=2, label=\"a\")");
    assert_eq!(format!("{:?}", model), model.to_string());
}

#[test]
fn test_validation_is_fail_fast_in_id_order() {
    let registry = Registry::new();
    let schema = registry
        .register(
            StructDecl::new("Account")
                .field(FieldDescriptor::new("name", TypeDescriptor::string()).with_id(2).required())
                .field(
                    FieldDescriptor::new("age", TypeDescriptor::I64)
                        .with_id(1)
                        .validator(Range::new(0, 150)),
                ),
        )
        .expect("register");

    let model = Model::new(&schema).with("age", 200i64).expect("set");
    match model.validate() {
        Err(ModelError::Validation { field, .. }) => assert_eq!(field, "age"),
        other => panic!("unexpected result: {:?}", other),
    }

    let model = Model::new(&schema).with("age", 20i64).expect("set");
    match model.validate() {
        Err(ModelError::Validation { field, reason, .. }) => {
            assert_eq!(field, "name");
            assert_eq!(reason, "required field is not set");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_required_field_tracks_set_and_delete() {
    let registry = Registry::new();
    let schema = registry
        .register(
            StructDecl::new("Session")
                .field(FieldDescriptor::new("token", TypeDescriptor::string()).required())
                .field(FieldDescriptor::new("ttl", TypeDescriptor::I64)),
        )
        .expect("register");

    let mut model = Model::new(&schema).with("ttl", 60i64).expect("ttl");
    let missing = ModelError::Validation {
        type_name: "Session".to_string(),
        field: "token".to_string(),
        id: 1,
        reason: "required field is not set".to_string(),
    };
    assert_eq!(model.validate(), Err(missing.clone()));

    model.set("token", "abc").expect("set");
    assert_eq!(model.validate(), Ok(()));

    assert_eq!(model.delete("token").expect("delete"), Some(Value::from("abc")));
    assert_eq!(model.validate(), Err(missing));
    assert_eq!(model.get_as::<i64>("ttl").expect("ttl"), Some(60));
}

#[test]
fn test_equality_compares_schema_layout() {
    let here = Registry::new();
    let there = Registry::new();
    let model = Model::new(&point(&here)).with("x", 1i64).expect("x");
    let same_layout = Model::new(&point(&there)).with("x", 1i64).expect("x");
    assert!(!Arc::ptr_eq(model.schema(), same_layout.schema()));
    assert_eq!(model, same_layout);

    let elsewhere = Registry::new();
    let other = elsewhere
        .register(
            StructDecl::new("Point")
                .field(FieldDescriptor::new("x", TypeDescriptor::I64).with_id(1))
                .field(FieldDescriptor::new("z", TypeDescriptor::I64).with_id(2)),
        )
        .expect("register");
    let same_name = Model::new(&other).with("x", 1i64).expect("x");
    assert_eq!(same_name.type_name(), model.type_name());
    assert!(!model.schema().fields_equal(same_name.schema()));
    assert_ne!(model, same_name);
    assert_ne!(model, same_layout.clone().with("y", 2i64).expect("y"));
}

#[test]
fn test_field_validators_see_unset_values() {
    let registry = Registry::new();
    let schema = registry
        .register(StructDecl::new("Ping").field(
            FieldDescriptor::new("seq", TypeDescriptor::I64).validator(NotNull),
        ))
        .expect("register");
    assert!(Model::new(&schema).validate().is_err());
    assert!(Model::new(&schema).with("seq", 1i64).and_then(|m| m.validate()).is_ok());
}

#[test]
fn test_element_validators_run_per_element_and_per_map_entry() {
    let registry = Registry::new();
    let schema = registry
        .register(
            StructDecl::new("Scores")
                .field(
                    FieldDescriptor::new(
                        "values",
                        TypeDescriptor::list(
                            ElementDescriptor::new(TypeDescriptor::I64)
                                .validator(Range::new(0, 10)),
                        ),
                    )
                    .with_id(1),
                )
                .field(
                    FieldDescriptor::new(
                        "by_name",
                        TypeDescriptor::map(
                            ElementDescriptor::new(TypeDescriptor::string())
                                .validator(Length::at_least(1)),
                            TypeDescriptor::I64,
                        ),
                    )
                    .with_id(2),
                ),
        )
        .expect("register");

    let model = Model::new(&schema)
        .with("values", Value::list([1i64, 11]))
        .expect("set");
    match model.validate() {
        Err(ModelError::Validation { field, reason, .. }) => {
            assert_eq!(field, "values");
            assert!(reason.starts_with("element 1:"), "{}", reason);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let model = Model::new(&schema)
        .with("by_name", Value::map([("", 1i64)]))
        .expect("set");
    match model.validate() {
        Err(ModelError::Validation { field, reason, .. }) => {
            assert_eq!(field, "by_name");
            assert!(reason.starts_with("map key"), "{}", reason);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_nested_instances_validate_recursively() {
    let registry = Registry::new();
    let inner = registry
        .register(StructDecl::new("Inner").field(
            FieldDescriptor::new("v", TypeDescriptor::I64).required(),
        ))
        .expect("Inner");
    let outer = registry
        .register(
            StructDecl::new("Outer").field(FieldDescriptor::new(
                "items",
                TypeDescriptor::list(TypeDescriptor::struct_ref("Inner")),
            )),
        )
        .expect("Outer");

    let good = Model::new(&inner).with("v", 1i64).expect("set");
    let bad = Model::new(&inner);
    let model = Model::new(&outer)
        .with("items", Value::list([good, bad]))
        .expect("set");

    match model.validate() {
        Err(ModelError::Validation { type_name, field, reason, .. }) => {
            assert_eq!((type_name.as_str(), field.as_str()), ("Outer", "items"));
            assert!(reason.contains("Inner.v"), "{}", reason);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_nested_instance_of_wrong_type_is_rejected() {
    let registry = Registry::new();
    let a = registry.register(StructDecl::new("A")).expect("A");
    registry.register(StructDecl::new("B")).expect("B");
    let holder = registry
        .register(StructDecl::new("Holder").field(
            FieldDescriptor::new("b", TypeDescriptor::struct_ref("B")),
        ))
        .expect("Holder");

    let model = Model::new(&holder).with("b", Model::new(&a)).expect("set");
    assert!(model.validate().is_err());
}

#[test]
fn test_union_allows_at_most_one_field() {
    let registry = Registry::new();
    let schema = registry
        .register(
            StructDecl::new("Choice")
                .union()
                .field(FieldDescriptor::new("number", TypeDescriptor::I64))
                .field(FieldDescriptor::new("text", TypeDescriptor::Utf8)),
        )
        .expect("register");

    assert!(Model::new(&schema).validate().is_ok());
    let one = Model::new(&schema).with("text", "hi").expect("set");
    assert!(one.validate().is_ok());
    let two = one.with("number", 1i64).expect("set");
    assert!(matches!(
        two.validate(),
        Err(ModelError::ModelValidation { ref validator, .. }) if validator == "union"
    ));
}

#[test]
fn test_model_validators_are_inherited_and_run_last() {
    let registry = Registry::new();
    registry
        .register(
            StructDecl::new("Range")
                .field(FieldDescriptor::new("lo", TypeDescriptor::I64).with_id(1))
                .field(FieldDescriptor::new("hi", TypeDescriptor::I64).with_id(2))
                .validator("lo <= hi", |model| {
                    let lo = model.get_as::<i64>("lo").map_err(|e| e.to_string())?;
                    let hi = model.get_as::<i64>("hi").map_err(|e| e.to_string())?;
                    match (lo, hi) {
                        (Some(lo), Some(hi)) if lo > hi => Err(format!("{} > {}", lo, hi)),
                        _ => Ok(()),
                    }
                }),
        )
        .expect("Range");
    let schema = registry
        .register(
            StructDecl::new("NamedRange")
                .extends("Range")
                .field(FieldDescriptor::new("name", TypeDescriptor::string())),
        )
        .expect("NamedRange");

    let model =
        Model::from_named(&schema, [("lo", Value::I64(5)), ("hi", Value::I64(1))]).expect("bind");
    match model.validate() {
        Err(ModelError::ModelValidation { validator, reason, .. }) => {
            assert_eq!(validator, "lo <= hi");
            assert_eq!(reason, "5 > 1");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // Field errors come first.
    let model = model.with("name", 3i64).expect("set");
    assert!(matches!(model.validate(), Err(ModelError::Validation { .. })));
}
