//! Options files for template directories.
//! A template may carry a `templatedir.json`, `templatedir.yml` or
//! `templatedir.yaml` at its root describing filters, ignored files and
//! renames. Content is parsed as JSON first, then as YAML.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use crate::filter::FilterMatch;

/// Extraction options, as read from an options file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Template filters, in match order
    pub filters: Vec<String>,
    /// Basenames of files to skip
    pub ignore: Vec<String>,
    /// Glob patterns of paths to skip
    pub ignore_patterns: Vec<String>,
    /// Logical relative path -> target relative path
    pub rename: IndexMap<PathBuf, PathBuf>,
    #[serde(rename = "match")]
    pub filter_match: Option<FilterMatch>,
}

/// Parses options from JSON or YAML text.
///
/// # Errors
/// * `Error::Config` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<Options> {
    if content.trim().is_empty() {
        return Ok(Options::default());
    }

    match serde_json::from_str(content) {
        Ok(options) => Ok(options),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid options format: {e}"))),
    }
}

/// Loads the first options file found in `template_dir`.
///
/// # Returns
/// * `Result<Option<(PathBuf, Options)>>` - The file that was read and its
///   options, or `None` if the template has no options file
pub fn load_config<P: AsRef<Path>>(template_dir: P) -> Result<Option<(PathBuf, Options)>> {
    for file in CONFIG_FILES {
        let config_path = template_dir.as_ref().join(file);
        if config_path.is_file() {
            debug!("Loading options from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)
                .map_err(|err| Error::file_io(&config_path, err))?;
            let options = parse_config(&content)?;
            return Ok(Some((config_path, options)));
        }
    }

    debug!("No options file found (tried: {})", CONFIG_FILES.join(", "));
    Ok(None)
}
