//! templatedir materializes a template directory onto disk.
//! Files flagged as templates are rendered with user-supplied data, every other
//! file is copied verbatim, and the directory structure is recreated under the
//! target, with optional renames and ignored files.

/// Classification of source entries into directories, templates and plain files
pub mod classifier;

/// Command-line interface module for the templatedir binary
pub mod cli;

/// Options files (templatedir.json, templatedir.yml, templatedir.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Loading template data from files or stdin
pub mod context;

/// Error types and handling
pub mod error;

/// Template filters and the match policy
pub mod filter;

/// Ignored file names and glob patterns
pub mod ignore;

/// Logger setup for the binary
pub mod logger;

/// Directory creation, template rendering and file copying
pub mod materializer;

/// Template rendering functionality
pub mod renderer;

/// Read-only source trees
pub mod source;

/// The extraction entry point
pub mod template_dir;

pub use error::{Error, Result};
pub use template_dir::TemplateDir;
