//! Info command implementation

use anyhow::Result;
use clap::{ArgMatches, Command};
use wafgen_rules::keys::{INDEX_MAX, OPERATION_SEED, PARAMETER_SEED};
use wafgen_schema::JSON_SCHEMA_DRAFT7;

pub fn command() -> Command {
    Command::new("info").about("Show tool information").arg(
        clap::Arg::new("detailed")
            .short('d')
            .long("detailed")
            .help("Show detailed information")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    println!("WafGen - JSON Schema and validation rule generator");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    if detailed {
        println!("\nDetailed Information:");
        println!("  - JSON Schema output: {JSON_SCHEMA_DRAFT7}");
        println!("  - Anchored validation patterns per parameter");
        println!("  - Path matchers for templated paths");
        println!("  - Flattened names for structured parameters");
        println!("  - {INDEX_MAX} index slots per operation and parameter");
        println!("  - Default seeds: operation {OPERATION_SEED}, parameter {PARAMETER_SEED}");
        println!("  - Path-safe output below the configured base path");
    }

    Ok(())
}
