//! Read-only source trees that templates are extracted from.
//! A [`SourceTree`] lists its entries and opens files by relative path; the
//! extraction engine never touches the source through any other channel.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Whether a source entry is a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of a source tree, addressed relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl SourceEntry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self { path: path.into(), kind }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Basename of the entry, lossily converted for matching.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default()
    }
}

/// Read-only capability over an abstract file tree.
pub trait SourceTree {
    /// Lists every entry below the root, depth-first with parents before their
    /// children and siblings in file-name order. The root itself is not listed.
    fn entries(&self) -> Result<Vec<SourceEntry>>;

    /// Opens the file at `path`, relative to the tree root.
    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>>;
}

/// A source tree backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Creates a source rooted at `root`.
    ///
    /// # Errors
    /// * `Error::PathNotFound` if `root` does not exist
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(Error::PathNotFound { path: root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceTree for DirSource {
    fn entries(&self) -> Result<Vec<SourceEntry>> {
        if !self.root.is_dir() {
            return Err(Error::Traversal {
                path: self.root.clone(),
                source: io::Error::other("source root is not a directory"),
            });
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                Error::Traversal { path, source: err.into() }
            })?;

            let relative = entry.path().strip_prefix(&self.root).map_err(|err| {
                Error::Traversal { path: entry.path().to_path_buf(), source: io::Error::other(err) }
            })?;

            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(SourceEntry::new(relative, kind));
        }

        debug!("Found {} entries under '{}'", entries.len(), self.root.display());
        Ok(entries)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>> {
        let full_path = self.root.join(path);
        let file = File::open(&full_path).map_err(|err| Error::file_io(full_path, err))?;
        Ok(Box::new(file))
    }
}

/// An in-memory source tree, for templates shipped inside a binary.
///
/// Parent directories are implied by file paths; empty directories can be
/// added explicitly with [`MemorySource::add_dir`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: IndexMap<PathBuf, Vec<u8>>,
    dirs: IndexSet<PathBuf>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, contents);
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_dir(path);
        self
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn add_dir(&mut self, path: impl Into<PathBuf>) {
        self.dirs.insert(path.into());
    }
}

fn validate_relative(path: &Path) -> Result<()> {
    let valid = path.components().next().is_some()
        && path.components().all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(Error::Traversal {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "entry path must be relative"),
        })
    }
}

impl SourceTree for MemorySource {
    fn entries(&self) -> Result<Vec<SourceEntry>> {
        // PathBuf orders component-wise, which yields a depth-first pre-order.
        let mut tree: BTreeMap<PathBuf, EntryKind> = BTreeMap::new();

        let explicit_dirs = self.dirs.iter();
        let implied_dirs = self.files.keys().filter_map(|path| path.parent());
        for dir in explicit_dirs.map(PathBuf::as_path).chain(implied_dirs) {
            for ancestor in dir.ancestors().filter(|a| !a.as_os_str().is_empty()) {
                validate_relative(ancestor)?;
                tree.insert(ancestor.to_path_buf(), EntryKind::Directory);
            }
        }

        for path in self.files.keys() {
            validate_relative(path)?;
            if tree.insert(path.clone(), EntryKind::File).is_some() {
                return Err(Error::Traversal {
                    path: path.clone(),
                    source: io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "path is both a file and a directory",
                    ),
                });
            }
        }

        Ok(tree.into_iter().map(|(path, kind)| SourceEntry::new(path, kind)).collect())
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>> {
        match self.files.get(path) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.as_slice()))),
            None => Err(Error::file_io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such file in source tree"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn paths(entries: &[SourceEntry]) -> Vec<(String, EntryKind)> {
        entries.iter().map(|e| (e.path.display().to_string(), e.kind)).collect()
    }

    #[test]
    fn test_dir_source_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        match DirSource::new(&missing) {
            Err(Error::PathNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected PathNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_dir_source_walk_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b/inner")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("b/inner/z.txt"), "z").unwrap();
        fs::write(root.join("c.txt"), "c").unwrap();

        let source = DirSource::new(root).unwrap();
        let entries = source.entries().unwrap();
        assert_eq!(
            paths(&entries),
            vec![
                ("a.txt".to_string(), EntryKind::File),
                ("b".to_string(), EntryKind::Directory),
                (format!("b{}inner", std::path::MAIN_SEPARATOR), EntryKind::Directory),
                (
                    format!("b{0}inner{0}z.txt", std::path::MAIN_SEPARATOR),
                    EntryKind::File
                ),
                ("c.txt".to_string(), EntryKind::File),
            ]
        );

        let mut contents = String::new();
        source.open(Path::new("c.txt")).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "c");
    }

    #[test]
    fn test_dir_source_root_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let source = DirSource::new(&file).unwrap();
        assert!(matches!(source.entries(), Err(Error::Traversal { .. })));
    }

    #[test]
    fn test_memory_source_implies_parents() {
        let source = MemorySource::new()
            .with_file("src/main.rs.tmpl", "fn main() {}")
            .with_file("README.md", "readme")
            .with_dir("empty");

        let entries = source.entries().unwrap();
        let dirs: Vec<_> = entries.iter().filter(|e| e.is_dir()).map(|e| e.path.clone()).collect();
        assert_eq!(dirs, vec![PathBuf::from("empty"), PathBuf::from("src")]);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].path, PathBuf::from("README.md"));
    }

    #[test]
    fn test_memory_source_rejects_file_dir_collision() {
        let source = MemorySource::new().with_file("a", "x").with_file("a/b", "y");
        assert!(matches!(source.entries(), Err(Error::Traversal { .. })));
    }

    #[test]
    fn test_memory_source_rejects_escaping_paths() {
        let source = MemorySource::new().with_file("../evil", "x");
        assert!(matches!(source.entries(), Err(Error::Traversal { .. })));
    }

    #[test]
    fn test_memory_source_open_missing() {
        let source = MemorySource::new();
        assert!(matches!(source.open(Path::new("nope")), Err(Error::FileIo { .. })));
    }
}
