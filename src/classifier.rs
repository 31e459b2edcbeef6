//! Classification of a source tree into directories, template files and plain
//! files.

use std::path::PathBuf;

use log::debug;

use crate::error::Result;
use crate::filter::TemplateFilters;
use crate::ignore::IgnoreRules;
use crate::source::SourceTree;

/// Result of a single walk over a source tree.
///
/// Every entry other than the root and ignored entries lands in exactly one of
/// the three lists, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub directories: Vec<PathBuf>,
    pub template_files: Vec<PathBuf>,
    pub plain_files: Vec<PathBuf>,
}

impl Classification {
    /// Total number of classified entries.
    pub fn len(&self) -> usize {
        self.directories.len() + self.template_files.len() + self.plain_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walks `tree` once and sorts every entry into a [`Classification`].
///
/// Directories are always classified as directories, whatever their name.
/// Files are checked against the ignore rules first and the template filters
/// second; anything left is a plain file.
///
/// # Errors
/// * `Error::Traversal` if the tree cannot be walked
pub fn classify<T>(tree: &T, ignore: &IgnoreRules, filters: &TemplateFilters) -> Result<Classification>
where
    T: SourceTree + ?Sized,
{
    let mut classification = Classification::default();
    let mut pruned: Vec<PathBuf> = Vec::new();

    for entry in tree.entries()? {
        if pruned.iter().any(|dir| entry.path.starts_with(dir)) {
            continue;
        }

        if ignore.matches_pattern(&entry.path) {
            debug!("Skipping '{}' (ignore pattern)", entry.path.display());
            if entry.is_dir() {
                pruned.push(entry.path);
            }
            continue;
        }

        if entry.is_dir() {
            debug!("Directory: '{}'", entry.path.display());
            classification.directories.push(entry.path);
            continue;
        }

        let file_name = entry.file_name().into_owned();
        if ignore.is_ignored_name(&file_name) {
            debug!("Skipping '{}' (ignored file)", entry.path.display());
        } else if filters.is_template(&file_name) {
            debug!("Template: '{}'", entry.path.display());
            classification.template_files.push(entry.path);
        } else {
            debug!("File: '{}'", entry.path.display());
            classification.plain_files.push(entry.path);
        }
    }

    Ok(classification)
}
