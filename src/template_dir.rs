//! The extraction entry point.
//! A [`TemplateDir`] binds a source tree to its ignore rules, template filters
//! and rename map, and writes the tree out on [`TemplateDir::extract`].

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info, warn};
use minijinja::Value;
use serde::Serialize;

use crate::classifier::{classify, Classification};
use crate::config::Options;
use crate::error::{Error, Result};
use crate::filter::{FilterMatch, TemplateFilters};
use crate::ignore::IgnoreRules;
use crate::materializer::{self, TargetPlan};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::source::{DirSource, SourceTree};

/// A template directory ready to be extracted.
///
/// Configuration is read on every call to [`extract`](Self::extract), so
/// changing it between calls affects the next extraction. No state from a
/// previous extraction is kept.
pub struct TemplateDir<S = DirSource> {
    source: S,
    renderer: Box<dyn TemplateRenderer>,
    ignore: IgnoreRules,
    filters: TemplateFilters,
    renames: IndexMap<PathBuf, PathBuf>,
}

impl TemplateDir<DirSource> {
    /// Creates a template directory from a path on disk.
    ///
    /// # Errors
    /// * `Error::PathNotFound` if `path` does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DirSource::new(path.as_ref())?))
    }
}

impl<S: SourceTree> TemplateDir<S> {
    /// Creates a template directory over any source tree, with the default
    /// filter, no ignored files and no renames.
    pub fn new(source: S) -> Self {
        Self {
            source,
            renderer: Box::new(MiniJinjaRenderer::new()),
            ignore: IgnoreRules::new(),
            filters: TemplateFilters::default(),
            renames: IndexMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Skips every file with this exact basename.
    pub fn ignore_file(&mut self, name: impl Into<String>) -> &mut Self {
        self.ignore.add_name(name);
        self
    }

    /// Skips every entry whose relative path matches the glob.
    pub fn ignore_pattern(&mut self, pattern: &str) -> Result<&mut Self> {
        self.ignore.add_pattern(pattern)?;
        Ok(self)
    }

    /// Replaces the template filters. An empty list restores the default.
    pub fn set_template_filters<I, T>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.filters = TemplateFilters::new(filters).with_match(self.filters.matching());
        self
    }

    pub fn set_filter_match(&mut self, matching: FilterMatch) -> &mut Self {
        self.filters.set_match(matching);
        self
    }

    /// Replaces the rename map. Keys are relative paths after filter removal;
    /// values replace the file name inside the entry's own directory.
    pub fn set_rename_map<I, K, V>(&mut self, renames: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<PathBuf>,
        V: Into<PathBuf>,
    {
        self.renames = renames.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn set_renderer<R: TemplateRenderer + 'static>(&mut self, renderer: R) -> &mut Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Applies an options file on top of the current configuration.
    ///
    /// Non-empty filter and rename lists replace the current ones; ignore
    /// entries are added.
    pub fn apply_options(&mut self, options: &Options) -> Result<&mut Self> {
        if !options.filters.is_empty() {
            self.set_template_filters(options.filters.iter().cloned());
        }
        if let Some(matching) = options.filter_match {
            self.set_filter_match(matching);
        }
        for name in &options.ignore {
            self.ignore_file(name.clone());
        }
        for pattern in &options.ignore_patterns {
            self.ignore_pattern(pattern)?;
        }
        if !options.rename.is_empty() {
            self.set_rename_map(options.rename.clone());
        }
        Ok(self)
    }

    /// Classifies the source tree without writing anything.
    pub fn classify(&self) -> Result<Classification> {
        classify(&self.source, &self.ignore, &self.filters)
    }

    /// Extracts the template directory into `target`.
    ///
    /// `target` is created if missing. Existing content is overlaid, not
    /// cleared. `data` is handed to every template as its root context.
    ///
    /// On error the target may hold a partial extraction: directories and any
    /// files written before the failing one stay on disk.
    ///
    /// # Returns
    /// * `Result<Classification>` - What this run found in the source tree
    pub fn extract<P, D>(&self, target: P, data: &D) -> Result<Classification>
    where
        P: AsRef<Path>,
        D: Serialize + ?Sized,
    {
        let target = absolute(target.as_ref())?;
        fs::create_dir_all(&target)
            .map_err(|source| Error::DirectoryCreation { path: target.clone(), source })?;

        info!("Extracting template into '{}'", target.display());
        let classification = self.classify()?;
        self.materialize(&target, &classification, &Value::from_serialize(data))?;
        info!(
            "Extraction complete: {} directories, {} templates, {} files",
            classification.directories.len(),
            classification.template_files.len(),
            classification.plain_files.len()
        );
        Ok(classification)
    }

    /// Extracts into a staging directory next to `target` and moves it into
    /// place only once every file has been written.
    ///
    /// `target` must not exist or be an empty directory. On failure the
    /// staging directory is removed and `target` is left untouched.
    ///
    /// # Errors
    /// * `Error::TargetNotEmpty` if `target` holds anything
    pub fn extract_atomic<P, D>(&self, target: P, data: &D) -> Result<Classification>
    where
        P: AsRef<Path>,
        D: Serialize + ?Sized,
    {
        let target = absolute(target.as_ref())?;
        if target.exists() && !is_empty_dir(&target)? {
            return Err(Error::TargetNotEmpty { path: target });
        }

        let parent = target.parent().map(Path::to_path_buf).unwrap_or_else(|| target.clone());
        fs::create_dir_all(&parent)
            .map_err(|source| Error::DirectoryCreation { path: parent.clone(), source })?;
        let staging = tempfile::Builder::new()
            .prefix(".templatedir-")
            .tempdir_in(&parent)
            .map_err(|source| Error::DirectoryCreation { path: parent.clone(), source })?;
        debug!("Staging extraction in '{}'", staging.path().display());

        let outcome = self.classify().and_then(|classification| {
            self.materialize(staging.path(), &classification, &Value::from_serialize(data))?;
            Ok(classification)
        });
        let classification = match outcome {
            Ok(classification) => classification,
            Err(err) => {
                if let Err(cleanup) = staging.close() {
                    warn!("Failed to remove staging directory: {cleanup}");
                }
                return Err(err);
            }
        };

        let staged = staging.keep();
        if let Err(err) = publish(&staged, &target) {
            if let Err(cleanup) = fs::remove_dir_all(&staged) {
                warn!("Failed to remove staging directory: {cleanup}");
            }
            return Err(err);
        }
        info!("Extracted template into '{}'", target.display());
        Ok(classification)
    }

    fn materialize(
        &self,
        target: &Path,
        classification: &Classification,
        context: &Value,
    ) -> Result<()> {
        let TargetPlan { directories, template_files, plain_files } =
            materializer::plan(classification, &self.filters, &self.renames)?;

        materializer::create_directories(target, &directories)?;
        materializer::render_templates(
            &self.source,
            target,
            &template_files,
            self.renderer.as_ref(),
            context,
        )?;
        materializer::copy_plain_files(&self.source, target, &plain_files)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|err| Error::file_io(path, err))
}

/// Moves a fully staged tree onto `target`, replacing an empty directory.
fn publish(staged: &Path, target: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(staged, fs::Permissions::from_mode(0o755))
            .map_err(|err| Error::file_io(staged, err))?;
    }

    if target.exists() {
        fs::remove_dir(target).map_err(|err| Error::file_io(target, err))?;
    }
    fs::rename(staged, target).map_err(|err| Error::file_io(target, err))
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(path).map_err(|err| Error::file_io(path, err))?;
    Ok(entries.next().is_none())
}
