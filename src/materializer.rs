//! Writing a classified source tree to disk.
//!
//! Materialization runs in three passes over a [`TargetPlan`]: the directory
//! skeleton first, then template files, then plain files. Each pass stops at the
//! first error. Nothing is rolled back, so a failed pass leaves whatever was
//! already written in place.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::path::{Component, Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use log::debug;
use minijinja::{ErrorKind, Value};

use crate::classifier::Classification;
use crate::error::{Error, Result};
use crate::filter::TemplateFilters;
use crate::renderer::TemplateRenderer;
use crate::source::SourceTree;

/// Source file paired with the path it is written to, both relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Relative target paths for every classified entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetPlan {
    /// Directories to create, including parents of renamed files.
    pub directories: Vec<PathBuf>,
    pub template_files: Vec<FileTarget>,
    pub plain_files: Vec<FileTarget>,
}

fn is_safe_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|component| matches!(component, Component::Normal(_)))
}

/// Derives the relative target path of a classified file.
///
/// Template files (`filters` is `Some`) lose their filter markers first. The
/// resulting path is then looked up in `renames`, so rename keys always name
/// the logical, post-strip file. A rename value replaces the file name and is
/// resolved against the file's own directory.
///
/// # Errors
/// * `Error::InvalidTargetPath` if stripping leaves an empty name or a rename
///   points outside the target root
pub fn target_path(
    source: &Path,
    filters: Option<&TemplateFilters>,
    renames: &IndexMap<PathBuf, PathBuf>,
) -> Result<PathBuf> {
    let logical = match filters {
        Some(filters) => {
            let file_name =
                source.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
            let stripped = filters.strip(&file_name);
            if stripped.is_empty() {
                return Err(Error::invalid_target(
                    source,
                    "template name is empty once filters are removed",
                ));
            }
            source.with_file_name(stripped)
        }
        None => source.to_path_buf(),
    };

    match renames.get(&logical) {
        Some(renamed) if is_safe_relative(renamed) => {
            let target = logical.with_file_name(renamed);
            debug!("Renaming '{}' to '{}'", logical.display(), target.display());
            Ok(target)
        }
        Some(renamed) => Err(Error::invalid_target(
            renamed,
            "rename target must be a relative path inside the target directory",
        )),
        None => Ok(logical),
    }
}

/// Computes every target path up front, before anything touches the disk.
pub fn plan(
    classification: &Classification,
    filters: &TemplateFilters,
    renames: &IndexMap<PathBuf, PathBuf>,
) -> Result<TargetPlan> {
    let mut directories: IndexSet<PathBuf> =
        classification.directories.iter().cloned().collect();

    let mut targets = |sources: &[PathBuf], filters: Option<&TemplateFilters>| {
        sources
            .iter()
            .map(|source| -> Result<FileTarget> {
                let target = target_path(source, filters, renames)?;
                if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                    directories.insert(parent.to_path_buf());
                }
                Ok(FileTarget { source: source.clone(), target })
            })
            .collect::<Result<Vec<_>>>()
    };

    let template_files = targets(&classification.template_files, Some(filters))?;
    let plain_files = targets(&classification.plain_files, None)?;

    Ok(TargetPlan { directories: directories.into_iter().collect(), template_files, plain_files })
}

/// Creates each directory (and missing parents) under `target_root`.
///
/// Directories that already exist are fine; any other failure aborts.
pub fn create_directories(target_root: &Path, directories: &[PathBuf]) -> Result<()> {
    for directory in directories {
        let path = target_root.join(directory);
        debug!("Creating directory: {}", path.display());
        fs::create_dir_all(&path).map_err(|source| Error::DirectoryCreation { path, source })?;
    }
    Ok(())
}

fn read_template<T: SourceTree + ?Sized>(tree: &T, path: &Path) -> Result<String> {
    let mut source = String::new();
    tree.open(path)?.read_to_string(&mut source).map_err(|err| Error::file_io(path, err))?;
    Ok(source)
}

/// Renders each template into its target file.
///
/// The template is parsed before its target is created, so a syntax error
/// leaves no file behind. A render error leaves the target truncated.
pub fn render_templates<T: SourceTree + ?Sized>(
    tree: &T,
    target_root: &Path,
    templates: &[FileTarget],
    renderer: &dyn TemplateRenderer,
    context: &Value,
) -> Result<()> {
    for file in templates {
        let body = read_template(tree, &file.source)?;
        let name = file.source.to_string_lossy();
        let template = renderer.compile(&name, &body)?;

        let target = target_root.join(&file.target);
        debug!("Writing file: {}", target.display());
        let created = File::create(&target).map_err(|err| Error::file_io(&target, err))?;
        let mut writer = BufWriter::new(created);

        template.render_to(context, &mut writer).map_err(|err| match err {
            Error::TemplateRender { source, .. } if source.kind() == ErrorKind::WriteFailure => {
                Error::file_io(&target, io::Error::other(source))
            }
            other => other,
        })?;
        writer
            .into_inner()
            .map_err(|err| Error::file_io(&target, err.into_error()))?
            .sync_all()
            .map_err(|err| Error::file_io(&target, err))?;
    }
    Ok(())
}

/// Copies each plain file byte for byte.
pub fn copy_plain_files<T: SourceTree + ?Sized>(
    tree: &T,
    target_root: &Path,
    files: &[FileTarget],
) -> Result<()> {
    for file in files {
        let mut reader = tree.open(&file.source)?;

        let target = target_root.join(&file.target);
        debug!("Copying file: {}", target.display());
        let created = File::create(&target).map_err(|err| Error::file_io(&target, err))?;
        let mut writer = BufWriter::new(created);

        io::copy(&mut reader, &mut writer).map_err(|err| Error::file_io(&target, err))?;
        writer
            .into_inner()
            .map_err(|err| Error::file_io(&target, err.into_error()))?
            .sync_all()
            .map_err(|err| Error::file_io(&target, err))?;
    }
    Ok(())
}
