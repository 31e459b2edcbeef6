use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use templatedir::config::{load_config, parse_config, Options};
use templatedir::error::Error;
use templatedir::filter::FilterMatch;

#[test]
fn test_parse_json_options() {
    let content = r#"{
        "filters": [".tmpl", ".template"],
        "ignore": ["secret.env"],
        "ignore_patterns": ["**/*.bak"],
        "rename": {"config.go": "settings.go"},
        "match": "suffix"
    }"#;
    let options = parse_config(content).unwrap();

    assert_eq!(options.filters, vec![".tmpl", ".template"]);
    assert_eq!(options.ignore, vec!["secret.env"]);
    assert_eq!(options.ignore_patterns, vec!["**/*.bak"]);
    assert_eq!(
        options.rename.get(&PathBuf::from("config.go")),
        Some(&PathBuf::from("settings.go"))
    );
    assert_eq!(options.filter_match, Some(FilterMatch::Suffix));
}

#[test]
fn test_parse_yaml_options() {
    let content = "filters:\n  - .j2\nrename:\n  b.txt: z.txt\n  a.txt: y.txt\n";
    let options = parse_config(content).unwrap();

    assert_eq!(options.filters, vec![".j2"]);
    assert!(options.ignore.is_empty());
    assert_eq!(options.filter_match, None);
    // Rename order follows the file.
    let keys: Vec<_> = options.rename.keys().cloned().collect();
    assert_eq!(keys, vec![PathBuf::from("b.txt"), PathBuf::from("a.txt")]);
}

#[test]
fn test_parse_empty_options() {
    assert_eq!(parse_config("").unwrap(), Options::default());
}

#[test]
fn test_unknown_field_is_rejected() {
    let result = parse_config(r#"{"filtres": [".tmpl"]}"#);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_load_config() {
    let temp_dir = TempDir::new().unwrap();
    assert!(load_config(temp_dir.path()).unwrap().is_none());

    let path = temp_dir.path().join("templatedir.yaml");
    fs::write(&path, "ignore:\n  - .DS_Store\n").unwrap();

    let (found, options) = load_config(temp_dir.path()).unwrap().unwrap();
    assert_eq!(found, path);
    assert_eq!(options.ignore, vec![".DS_Store"]);
}

#[test]
fn test_load_config_prefers_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("templatedir.json"), r#"{"filters": [".json"]}"#).unwrap();
    fs::write(temp_dir.path().join("templatedir.yml"), "filters: [.yml]\n").unwrap();

    let (found, options) = load_config(temp_dir.path()).unwrap().unwrap();
    assert_eq!(found.file_name().unwrap(), "templatedir.json");
    assert_eq!(options.filters, vec![".json"]);
}
