//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("wafgen")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Generate JSON Schema and request validation rules from API descriptions")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::generate::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::pattern::command())
            .subcommand(commands::info::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("generate", sub_matches)) => commands::generate::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("pattern", sub_matches)) => commands::pattern::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use crate::WafGenError;
    use anyhow::Result;
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_FILES: [&str; 4] =
        [".wafgen.yaml", ".wafgen.yml", "wafgen.yaml", "wafgen.yml"];

    /// Get configuration file path from arguments or use default
    pub fn find_config_path(matches: &clap::ArgMatches) -> Option<PathBuf> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            return Some(PathBuf::from(config_path));
        }

        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Get configuration file path, failing when none is given or found
    pub fn get_config_path(matches: &clap::ArgMatches) -> Result<PathBuf> {
        find_config_path(matches).ok_or_else(|| {
            WafGenError::Config(
                "No configuration file found. Use --config to specify a file or create one with 'wafgen init'"
                    .to_string(),
            )
            .into()
        })
    }

    /// Load configuration from file
    pub fn load_config(matches: &clap::ArgMatches) -> Result<crate::Config> {
        let config_path = get_config_path(matches)?;
        crate::Config::from_file(&config_path)
    }

    /// Create WafGen instance
    pub fn create_app(config: crate::Config) -> Result<crate::WafGen> {
        crate::WafGen::new(config)
    }
}
