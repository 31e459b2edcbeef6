//! Common constants used throughout templatedir.

/// Filter used when no template filter has been configured
pub const DEFAULT_TEMPLATE_FILTER: &str = ".tmpl";

/// Supported options file names, looked up in the template root
pub const CONFIG_FILES: [&str; 3] = ["templatedir.json", "templatedir.yml", "templatedir.yaml"];
