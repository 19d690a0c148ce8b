//! Init command implementation

use crate::utils::ensure_directory;
use crate::Config;
use anyhow::Result;
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a new configuration file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(".wafgen.yaml"),
        )
        .arg(
            clap::Arg::new("example")
                .short('e')
                .long("example")
                .help("Create example configuration")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".wafgen.yaml"));
    let example = matches.get_flag("example");

    info!("Initializing configuration file: {:?}", output_path);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let config = if example {
        create_example_config()
    } else {
        Config::default()
    };

    config.save_to_file(&output_path)?;

    info!("Configuration file created: {:?}", output_path);

    if example {
        println!("Example configuration created for a petstore API description.");
        println!("Edit the file to point at your own API description.");
    } else {
        println!("Default configuration file created.");
        println!("Set 'input' to your API description file or directory to get started.");
    }

    Ok(())
}

fn create_example_config() -> Config {
    let mut config = Config::for_input("./api/petstore.yaml");
    config.output.base_path = PathBuf::from("./generated/petstore");
    config.generation.api_version = "1.0.0".to_string();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliApp;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf/wafgen.yaml");

        let matches = CliApp::app()
            .try_get_matches_from(["wafgen", "init", "-o", path.to_str().unwrap(), "--example"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        run(sub_matches).await.unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.input, PathBuf::from("./api/petstore.yaml"));
        assert_eq!(config.generation.api_version, "1.0.0");
    }
}
