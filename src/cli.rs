//! Command-line interface implementation for templatedir.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for templatedir.
#[derive(Parser, Debug)]
#[command(author, version, about = "templatedir: materialize a template directory onto disk", long_about = None)]
pub struct Args {
    /// Path to the template directory
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Directory the template is extracted into
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// JSON or YAML file holding the data passed to every template
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdin")]
    pub data: Option<PathBuf>,

    /// Read template data from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Template filter; repeat to set several. Defaults to ".tmpl"
    #[arg(short, long = "filter", value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Basename of a file to skip; repeatable
    #[arg(short, long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Glob of relative paths to skip; repeatable
    #[arg(long = "ignore-pattern", value_name = "GLOB")]
    pub ignore_patterns: Vec<String>,

    /// Rename an output file, e.g. `config.go=settings.go`; repeatable
    #[arg(short, long = "rename", value_name = "FROM=TO", value_parser = parse_rename)]
    pub renames: Vec<(PathBuf, PathBuf)>,

    /// Only treat files ending with a filter as templates
    #[arg(long)]
    pub suffix: bool,

    /// Write into a staging directory and move it into place on success.
    /// OUTPUT_DIR must not exist or be empty.
    #[arg(long)]
    pub atomic: bool,

    /// Print how the template would be classified without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_rename(value: &str) -> Result<(PathBuf, PathBuf), String> {
    match value.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((PathBuf::from(from), PathBuf::from(to)))
        }
        _ => Err(format!("expected FROM=TO, got '{value}'")),
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
