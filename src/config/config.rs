//! Main configuration structure and implementation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{GenerationConfig, IndexConfig, OutputConfig};

pub const CONFIG_VERSION: &str = "1.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// API description file or directory
    pub input: PathBuf,

    /// Output configuration
    pub output: OutputConfig,

    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Index seeds
    #[serde(default)]
    pub indexing: IndexConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        if self.input.as_os_str().is_empty() {
            return Err(anyhow!("Input path cannot be empty"));
        }

        self.output.validate()?;
        self.generation.validate()?;

        Ok(())
    }

    /// Configuration reading `input` with every other setting at its default
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Where the JSON Schema document is written
    pub fn schema_path(&self) -> PathBuf {
        self.output
            .base_path
            .join(&self.generation.json_schema_output_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            input: PathBuf::from("./api"),
            output: OutputConfig::default(),
            generation: GenerationConfig::default(),
            indexing: IndexConfig::default(),
        }
    }
}
