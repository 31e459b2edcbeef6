use serde_json::json;
use std::fs;
use tempfile::TempDir;
use templatedir::context::{load_context_file, parse_context};
use templatedir::error::Error;

#[test]
fn test_empty_context() {
    let result = parse_context("").unwrap();
    assert_eq!(result, serde_json::Value::Null);
}

#[test]
fn test_valid_json_context() {
    let result = parse_context(r#"{"key": "value"}"#).unwrap();
    assert_eq!(result, json!({"key": "value"}));
}

#[test]
fn test_numeric_json_context() {
    let result = parse_context("42").unwrap();
    assert_eq!(result, json!(42));
}

#[test]
fn test_yaml_context() {
    let result = parse_context("name: Ada\nfeatures:\n  - cli\n  - docs\n").unwrap();
    assert_eq!(result, json!({"name": "Ada", "features": ["cli", "docs"]}));
}

#[test]
fn test_invalid_context() {
    let result = parse_context(r#"{"key": "value""#); // Missing closing brace
    match result {
        Err(Error::Context(msg)) => assert!(msg.contains("Failed to parse context")),
        other => panic!("Expected Error::Context, got {other:?}"),
    }
}

#[test]
fn test_load_context_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.yaml");
    fs::write(&path, "Name: Roger Mellie\n").unwrap();

    let result = load_context_file(&path).unwrap();
    assert_eq!(result, json!({"Name": "Roger Mellie"}));

    let missing = load_context_file(temp_dir.path().join("missing.json"));
    assert!(matches!(missing, Err(Error::FileIo { .. })));
}
