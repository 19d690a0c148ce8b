//! Generate command implementation

use crate::cli::utils;
use crate::Config;
use anyhow::Result;
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("generate")
        .about("Generate JSON Schema and validation annotations from an API description")
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("API description file or directory")
                .value_name("INPUT"),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory")
                .value_name("DIR"),
        )
        .arg(
            clap::Arg::new("no-schema")
                .long("no-schema")
                .help("Don't generate the JSON Schema document")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Don't write files")
                .action(clap::ArgAction::SetTrue),
        )
}

/// Configuration from file, or defaults when only an input is given
pub fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let input = matches.get_one::<String>("input");

    let mut config = match (utils::find_config_path(matches), input) {
        (Some(path), _) => Config::from_file(&path)?,
        (None, Some(input)) => Config::for_input(input),
        (None, None) => utils::load_config(matches)?,
    };

    // Override input path if specified
    if let Some(input) = input {
        config.input = PathBuf::from(input);
    }

    // Override output path if specified
    if let Some(output_path) = matches.get_one::<String>("output") {
        config.output.base_path = PathBuf::from(output_path);
    }

    if matches.get_flag("no-schema") {
        config.generation.generate_json_schema = false;
    }

    config.validate()?;
    Ok(config)
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Starting rule generation");

    let config = resolve_config(matches)?;
    let dry_run = matches.get_flag("dry-run");

    let app = utils::create_app(config)?.with_dry_run(dry_run);

    if dry_run {
        info!("Dry run mode - no files will be written");
        println!("Dry run mode - no files will be written");
    }

    let (_, result) = app.generate_from_input()?;

    if dry_run {
        println!("Dry run completed successfully!");
    } else {
        println!("Generation completed successfully!");
    }
    println!(
        "Models: {} processed, {} skipped",
        result.models_processed,
        result.models_skipped.len()
    );
    println!(
        "Operations indexed: {} in {} groups",
        result.operations_indexed, result.groups_processed
    );
    println!("Parameters indexed: {}", result.parameters_indexed);
    println!(
        "Next indices: operation {}, parameter {}",
        result.counters.operation, result.counters.parameter
    );
    println!("Processing time: {}ms", result.processing_time_ms);

    let base_path = app.config().output.base_path.clone();
    for path in &result.files_written {
        let display = base_path
            .canonicalize()
            .ok()
            .and_then(|base| crate::utils::get_relative_path(path, &base).ok())
            .unwrap_or_else(|| path.clone());
        println!("  Wrote {}", display.display());
    }

    for warning in &result.warnings {
        println!("  Warning: {warning}");
    }

    for error in &result.errors {
        eprintln!("  Error: {error}");
    }

    Ok(())
}
