//! Generation and indexing configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use wafgen_rules::keys::{OPERATION_SEED, PARAMETER_SEED};
use wafgen_rules::IndexCounters;

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Whether to write the JSON Schema document
    pub generate_json_schema: bool,

    /// File name of the JSON Schema document, relative to the output base path
    pub json_schema_output_file: String,

    /// Value of the `validateBodySchema` flag on every operation
    pub validate_body_schema: bool,

    /// API version passed through to downstream rendering
    pub api_version: String,

    /// Whether to write the annotated operations
    pub write_annotations: bool,
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.json_schema_output_file.trim().is_empty() {
            return Err(anyhow!("JSON Schema output file cannot be empty"));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            generate_json_schema: true,
            json_schema_output_file: "schema.json".to_string(),
            validate_body_schema: true,
            api_version: "0.0.2".to_string(),
            write_annotations: true,
        }
    }
}

/// First index values handed out in a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexConfig {
    pub operation_seed: u64,
    pub parameter_seed: u64,
}

impl IndexConfig {
    pub fn counters(&self) -> IndexCounters {
        IndexCounters {
            operation: self.operation_seed,
            parameter: self.parameter_seed,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            operation_seed: OPERATION_SEED,
            parameter_seed: PARAMETER_SEED,
        }
    }
}
