//! Loading template data from JSON or YAML files and stdin.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Parses template data from JSON or YAML text.
///
/// Empty input yields `null`.
pub fn parse_context(content: &str) -> Result<serde_json::Value> {
    if content.is_empty() {
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_str(content).or_else(|json_err| {
        serde_yaml::from_str(content).map_err(|yaml_err| {
            Error::Context(format!(
                "Failed to parse context as JSON ({json_err}) or YAML ({yaml_err})"
            ))
        })
    })
}

/// Reads template data from a JSON or YAML file.
pub fn load_context_file<P: AsRef<Path>>(path: P) -> Result<serde_json::Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|err| Error::file_io(path, err))?;
    parse_context(&content)
}

/// Reads template data from stdin.
pub fn load_context_stdin() -> Result<serde_json::Value> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer).map_err(|err| Error::file_io("<stdin>", err))?;
    parse_context(buffer.trim())
}
