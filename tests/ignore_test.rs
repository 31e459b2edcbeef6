use std::path::Path;

use templatedir::error::Error;
use templatedir::ignore::IgnoreRules;

#[test]
fn test_ignored_names() {
    let mut rules = IgnoreRules::new();
    assert!(!rules.is_ignored_name("secret.env"));

    rules.add_name("secret.env");
    rules.add_name("secret.env");
    assert!(rules.is_ignored_name("secret.env"));
    assert!(!rules.is_ignored_name("secret.env.tmpl"));
    assert_eq!(rules.names().collect::<Vec<_>>(), vec!["secret.env"]);
}

#[test]
fn test_ignore_patterns() {
    let mut rules = IgnoreRules::new();
    assert!(!rules.matches_pattern(Path::new("file.pyc")));

    rules.add_pattern("*.pyc").unwrap();
    rules.add_pattern("__pycache__").unwrap();
    assert!(rules.matches_pattern(Path::new("file.pyc")));
    assert!(rules.matches_pattern(Path::new("pkg/file.pyc")));
    assert!(rules.matches_pattern(Path::new("__pycache__")));
    assert!(!rules.matches_pattern(Path::new("pkg/__pycache__")));
    assert!(!rules.matches_pattern(Path::new("main.py")));
}

#[test]
fn test_invalid_pattern() {
    let mut rules = IgnoreRules::new();
    assert!(matches!(rules.add_pattern("a[b"), Err(Error::IgnorePattern(_))));

    // A failed pattern leaves the existing rules intact.
    rules.add_pattern("*.log").unwrap();
    assert!(rules.add_pattern("{").is_err());
    assert!(rules.matches_pattern(Path::new("build.log")));
}
