//! Validate command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate configuration file and API description")
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .value_name("FILE"),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    let config = utils::load_config(matches)?;

    println!("Configuration file is valid!");
    println!("Version: {}", config.version);
    println!("Input: {:?}", config.input);
    println!("Output path: {:?}", config.output.base_path);
    println!(
        "JSON Schema: {}",
        if config.generation.generate_json_schema {
            config.schema_path().display().to_string()
        } else {
            "disabled".to_string()
        }
    );
    println!(
        "Index seeds: operation {}, parameter {}",
        config.indexing.operation_seed, config.indexing.parameter_seed
    );

    let app = utils::create_app(config)?;
    let (files, api) = app.load_input_files()?;

    println!("API description is valid!");
    println!("  Files: {}", files.len());
    println!("  Models: {}", api.models.len());
    println!("  Operation groups: {}", api.operation_groups.len());
    println!("  Operations: {}", api.operation_count());

    for group in &api.operation_groups {
        println!("  - {} ({} operations)", group.name, group.operations.len());
    }

    Ok(())
}
