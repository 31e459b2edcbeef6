//! templatedir's application entry point.
//! Parses arguments, configures a template directory and extracts it.

use templatedir::{
    cli::{get_args, Args},
    config::load_config,
    context::{load_context_file, load_context_stdin},
    error::{default_error_handler, Result},
    filter::FilterMatch,
    logger::init_logger,
    TemplateDir,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Opens the template directory
/// 2. Applies the template's options file, if any
/// 3. Applies command-line overrides
/// 4. Loads template data
/// 5. Classifies (dry run) or extracts the template
fn run(args: Args) -> Result<()> {
    let mut template_dir = TemplateDir::open(&args.template)?;

    if let Some((config_path, options)) = load_config(&args.template)? {
        template_dir.apply_options(&options)?;
        // The options file describes the template; it is never part of the output.
        if let Some(name) = config_path.file_name() {
            template_dir.ignore_pattern(&name.to_string_lossy())?;
        }
    }

    if !args.filters.is_empty() {
        template_dir.set_template_filters(args.filters);
    }
    if args.suffix {
        template_dir.set_filter_match(FilterMatch::Suffix);
    }
    for name in args.ignore {
        template_dir.ignore_file(name);
    }
    for pattern in &args.ignore_patterns {
        template_dir.ignore_pattern(pattern)?;
    }
    if !args.renames.is_empty() {
        template_dir.set_rename_map(args.renames);
    }

    if args.dry_run {
        let classification = template_dir.classify()?;
        for directory in &classification.directories {
            println!("directory: '{}'", directory.display());
        }
        for template in &classification.template_files {
            println!("template: '{}'", template.display());
        }
        for file in &classification.plain_files {
            println!("file: '{}'", file.display());
        }
        return Ok(());
    }

    let data = if args.stdin {
        load_context_stdin()?
    } else if let Some(path) = &args.data {
        load_context_file(path)?
    } else {
        serde_json::Value::Object(serde_json::Map::new())
    };

    let classification = if args.atomic {
        template_dir.extract_atomic(&args.output_dir, &data)?
    } else {
        template_dir.extract(&args.output_dir, &data)?
    };

    println!(
        "Template extracted into {} ({} directories, {} templates, {} files).",
        args.output_dir.display(),
        classification.directories.len(),
        classification.template_files.len(),
        classification.plain_files.len()
    );
    Ok(())
}
