//! Output configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base path for generated files
    pub base_path: PathBuf,

    /// File name of the annotated operations, relative to the base path
    #[serde(default = "default_annotations_file")]
    pub annotations_file: String,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_path.to_string_lossy().is_empty() {
            return Err(anyhow!("Base path cannot be empty"));
        }
        if self.annotations_file.trim().is_empty() {
            return Err(anyhow!("Annotations file cannot be empty"));
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./generated"),
            annotations_file: default_annotations_file(),
        }
    }
}

fn default_annotations_file() -> String {
    "operations.json".to_string()
}
