//! Tests for the workspace controller's document round-trip.
mod common;
use blockbot::prelude::*;
use common::*;
use serde_json::json;

fn reload(document: WorkspaceDocument) -> WorkspaceDocument {
    let mut workspace = Workspace::new();
    workspace.load(document);
    workspace.serialize()
}

#[test]
fn test_serialization_is_idempotent_under_reload() {
    let fixtures = [
        TWO_ACTION_WORKSPACE_JSON,
        FOREIGN_BLOCK_WORKSPACE_JSON,
        "{}",
        r#"{"blocks": {"languageVersion": 0, "blocks": []}}"#,
    ];
    for fixture in fixtures {
        let once = reload(WorkspaceDocument::from_json(fixture).unwrap());
        let twice = reload(once.clone());
        assert_eq!(once, twice, "fixture: {}", fixture);
    }
}

#[test]
fn test_load_empty_document_clears_workspace() {
    let mut workspace = workspace_with(action("wave"));
    assert!(!workspace.is_empty());

    workspace.load(WorkspaceDocument::from_json("{}").unwrap());
    assert!(workspace.is_empty());
    assert_eq!(serde_json::to_value(workspace.serialize()).unwrap(), json!({}));
}

#[test]
fn test_unknown_keys_survive_round_trip() {
    let document = WorkspaceDocument::from_json(TWO_ACTION_WORKSPACE_JSON).unwrap();
    let json = serde_json::to_value(reload(document)).unwrap();

    assert_eq!(json["variables"][0]["name"], "count");
    assert_eq!(json["blocks"]["blocks"][0]["id"], "b1");
    assert_eq!(json["blocks"]["blocks"][0]["next"]["block"]["fields"]["TEXT"], "Hello");
}

#[test]
fn test_serialized_json_reloads_to_same_graph() {
    let workspace = workspace_with(action("wave").at(5.0, 5.0).then(speak("Hi")));
    let json = workspace.serialize().to_json().unwrap();

    let mut restored = Workspace::new();
    restored.load(WorkspaceDocument::from_json(&json).unwrap());
    assert_eq!(restored.top_blocks(), workspace.top_blocks());
}

#[test]
fn test_block_count_includes_nested_blocks() {
    let document = WorkspaceDocument::from_json(FOREIGN_BLOCK_WORKSPACE_JSON).unwrap();
    assert_eq!(document.block_count(), 3);

    let nested = workspace_with(
        Block::new("controls_repeat_ext")
            .with_input("TIMES", Block::new("math_number").with_field("NUM", 2))
            .with_input("DO", action("wave").then(action("bow"))),
    );
    assert_eq!(nested.serialize().block_count(), 4);
}

#[test]
fn test_long_stacks_reload_from_json() {
    for len in [63, 64, 65, 400] {
        let workspace = workspace_with(action_chain(len));
        let json = workspace.serialize().to_json().unwrap();

        let document = WorkspaceDocument::from_json(&json).unwrap();
        assert_eq!(document.block_count(), len, "len: {}", len);

        let mut restored = Workspace::new();
        restored.load(document);
        assert_eq!(restored.serialize(), workspace.serialize(), "len: {}", len);
    }
}

#[test]
fn test_long_stack_inside_repeat_reloads() {
    let workspace = workspace_with(
        Block::new("controls_repeat_ext")
            .with_input("TIMES", Block::new("math_number").with_field("NUM", 2))
            .with_input("DO", action_chain(200))
            .then(action_chain(200)),
    );
    let json = workspace.serialize().to_json().unwrap();
    let document = WorkspaceDocument::from_json(&json).unwrap();

    assert_eq!(document.block_count(), 402);
    assert_eq!(document, workspace.serialize());
}

#[test]
fn test_null_connections_read_as_absent() {
    let document = WorkspaceDocument::from_json(
        r#"{"blocks": {"blocks": [{"type": "alpha.action", "next": null, "inputs": null}]}}"#,
    )
    .unwrap();
    let block = &document.blocks.unwrap().blocks[0];
    assert!(block.next.is_none());
    assert!(block.inputs.is_empty());
}

#[test]
fn test_malformed_block_is_rejected() {
    assert!(WorkspaceDocument::from_json(r#"{"blocks": {"blocks": [42]}}"#).is_err());
    assert!(WorkspaceDocument::from_json(r#"{"blocks": {"blocks": [{"id": "no-type"}]}}"#).is_err());
    assert!(WorkspaceDocument::from_json(r#"{"blocks": {}} trailing"#).is_err());
}
