//! Unit tests for error messages, settings and catalog parsing.
mod common;
use blockbot::prelude::*;
use std::io::Write;

#[test]
fn test_error_display() {
    let err = CompileError::UnknownBlockType {
        block_id: "b7".to_string(),
        type_name: "beta.action".to_string(),
        model_id: "alpha".to_string(),
    };
    assert!(err.to_string().contains("b7"));
    assert!(err.to_string().contains("beta.action"));
    assert!(err.to_string().contains("alpha"));

    let exec_err = ExecutionError::from(err);
    assert!(exec_err.to_string().starts_with("Program fault"));

    let budget = ExecutionError::BudgetExceeded { limit: 10 };
    assert!(budget.to_string().contains("10"));
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::load(None).unwrap();
    assert_eq!(settings.storage.namespace_prefix, "program");
    assert_eq!(settings.speech.native_lang, "vi");
    assert_eq!(settings.relay.timeout_secs, 10);
}

#[test]
fn test_settings_file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[relay]\nbase_url = \"http://relay.example:9000\"\n\n[speech]\nforeign_lang = \"ja\""
    )
    .unwrap();

    let settings = Settings::load(Some(file.path())).unwrap();
    assert_eq!(settings.relay.base_url, "http://relay.example:9000");
    assert_eq!(settings.speech.foreign_lang, "ja");
    assert_eq!(settings.speech.native_lang, "vi");
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let result = Settings::load(Some(std::path::Path::new("/nonexistent/blockbot.toml")));
    assert!(result.is_err());
}

#[test]
fn test_catalog_accepts_paged_collections() {
    let json = r#"{
        "actions": {"count": 2, "next": null, "results": [
            {"code": "wave", "name": "Wave"},
            {"code": "bow", "name": "Bow"}
        ]},
        "expressions": [{"code": "smile", "name": "Smile"}]
    }"#;
    let catalog = Catalog::from_json(json).unwrap();
    assert_eq!(catalog.actions.len(), 2);
    assert_eq!(catalog.expressions[0], Primitive::new("Smile", "smile"));
    assert!(catalog.skills.is_empty());
    assert!(!catalog.is_empty());
}
