//! Error handling for templatedir.
//! Defines the error taxonomy shared by every extraction stage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for template directory operations.
///
/// Every stage of an extraction aborts on the first error, so a single value of
/// this enum always describes the first failure encountered.
#[derive(Error, Debug)]
pub enum Error {
    /// The source path handed to the constructor does not exist
    #[error("Path '{}' does not exist.", path.display())]
    PathNotFound { path: PathBuf },

    /// I/O failure while walking the source tree
    #[error("Failed to walk source tree at '{}': {source}.", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A target directory could not be created
    #[error("Failed to create directory '{}': {source}.", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template body failed to parse
    #[error("Syntax error in template '{}': {source}", template.display())]
    TemplateSyntax {
        template: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// A template parsed but failed while rendering against the data
    #[error("Failed to render template '{}': {source}", template.display())]
    TemplateRender {
        template: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// Open, create, copy or close failure for a single file
    #[error("IO error on '{}': {source}.", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A derived or renamed target path cannot be written under the target root
    #[error("Invalid target path '{}': {reason}.", path.display())]
    InvalidTargetPath { path: PathBuf, reason: String },

    /// An ignore glob failed to compile
    #[error("Ignore pattern error: {0}.")]
    IgnorePattern(#[from] globset::Error),

    /// Atomic extraction refuses to replace a non-empty target root
    #[error("Target directory '{}' already exists and is not empty.", path.display())]
    TargetNotEmpty { path: PathBuf },

    /// Options file could not be read or parsed
    #[error("Configuration error: {0}.")]
    Config(String),

    /// Data for the templates could not be parsed
    #[error("Context error: {0}.")]
    Context(String),
}

impl Error {
    pub(crate) fn file_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileIo { path: path.into(), source }
    }

    pub(crate) fn invalid_target(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidTargetPath { path: path.into(), reason: reason.into() }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
