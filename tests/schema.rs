//! Tests for per-model block definitions and palettes.
mod common;
use blockbot::catalog::PLACEHOLDER;
use blockbot::prelude::*;
use blockbot::toolbox::{NUMBER_BLOCK, REPEAT_BLOCK};
use common::*;

#[test]
fn test_every_definition_is_namespaced() {
    for model in ["alpha", "beta-2", "x"] {
        let schema = build_schema(model, &create_catalog());
        assert_eq!(schema.len(), BaseType::ALL.len());
        for (definition, base) in schema.iter().zip(BaseType::ALL) {
            assert_eq!(definition.block_type, format!("{}.{}", model, base));
        }
    }
}

#[test]
fn test_dropdowns_are_never_empty() {
    let schema = build_schema(MODEL, &Catalog::default());
    for base in BaseType::ALL {
        let Some(field) = base.dropdown_field() else {
            continue;
        };
        let definition = schema
            .iter()
            .find(|d| d.block_type == format!("{}.{}", MODEL, base))
            .unwrap();
        let options = definition.dropdown_options(field).unwrap();
        assert_eq!(
            options,
            &[(PLACEHOLDER.to_string(), PLACEHOLDER.to_string())],
            "{} should fall back to the placeholder",
            base
        );
    }
}

#[test]
fn test_dropdowns_use_catalog_entries() {
    let schema = build_schema(MODEL, &create_catalog());

    let actions = schema[0].dropdown_options("ACTION").unwrap();
    assert_eq!(
        actions,
        &[
            ("Wave".to_string(), "wave".to_string()),
            ("Bow".to_string(), "bow".to_string())
        ]
    );

    // Skills are empty in the fixture catalog.
    let skills = schema[3].dropdown_options("SKILL").unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].1, PLACEHOLDER);
}

#[test]
fn test_malformed_entries_pass_through() {
    let catalog = Catalog {
        actions: vec![Primitive::new("", "")],
        ..Catalog::default()
    };
    let schema = build_schema(MODEL, &catalog);
    assert_eq!(
        schema[0].dropdown_options("ACTION").unwrap(),
        &[(String::new(), String::new())]
    );
}

#[test]
fn test_builds_do_not_leak_into_each_other() {
    let first = build_schema("alpha", &create_catalog());
    let second = build_schema("beta", &Catalog::default());

    assert_eq!(first[0].block_type, "alpha.action");
    assert_eq!(first[0].dropdown_options("ACTION").unwrap().len(), 2);
    assert_eq!(second[0].block_type, "beta.action");
    assert_eq!(second[0].dropdown_options("ACTION").unwrap().len(), 1);

    // Rebuilding after other builds gives the same result.
    assert_eq!(build_schema("alpha", &create_catalog()), first);
}

#[test]
fn test_chaining_flags_and_serialized_shape() {
    let schema = build_schema(MODEL, &create_catalog());
    assert!(schema.iter().all(|d| d.previous_statement && d.next_statement));

    let json = serde_json::to_value(&schema[0]).unwrap();
    assert_eq!(json["type"], "alpha.action");
    assert_eq!(json["args0"][0]["type"], "field_dropdown");
    assert_eq!(json["args0"][0]["options"][0][1], "wave");
    assert_eq!(json["args0"][1]["type"], "field_number");
    assert_eq!(json["previousStatement"], true);
}

#[test]
fn test_default_toolbox_has_no_robot_category() {
    let toolbox = default_toolbox();
    assert_eq!(toolbox.categories().collect::<Vec<_>>(), vec!["Loops", "Math"]);
    let blocks: Vec<&str> = toolbox.contents.iter().flat_map(|c| c.block_types()).collect();
    assert_eq!(blocks, vec![REPEAT_BLOCK, NUMBER_BLOCK]);
}

#[test]
fn test_toolbox_for_model_appends_one_namespaced_category() {
    let toolbox = toolbox_for_model("X");
    assert_eq!(
        toolbox.categories().collect::<Vec<_>>(),
        vec!["Loops", "Math", "Robot"]
    );

    let robot = toolbox.category("Robot").unwrap();
    let expected: Vec<String> = BaseType::ALL.iter().map(|b| format!("X.{}", b)).collect();
    assert_eq!(robot.block_types(), expected);
}

#[test]
fn test_toolbox_copies_are_independent() {
    let mut first = toolbox_for_model("X");
    let second = toolbox_for_model("X");
    assert_eq!(first, second);

    first.contents.clear();
    assert_ne!(first, second);
    assert_eq!(second, toolbox_for_model("X"));
    assert_eq!(default_toolbox().contents.len(), 2);
}
