//! Output artifacts of a generation run

use crate::config::OutputConfig;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;
use wafgen_model::OperationGroup;
use wafgen_rules::IndexCounters;
use wafgen_schema::{write_json, WriteError};

/// Writes generated documents below the configured base path
pub struct ArtifactWriter {
    output_config: OutputConfig,
}

impl ArtifactWriter {
    pub fn new(output_config: OutputConfig) -> Self {
        Self { output_config }
    }

    pub fn base_path(&self) -> &Path {
        &self.output_config.base_path
    }

    /// Write the combined JSON Schema document
    pub fn write_schema(&self, file_name: &str, document: &Value) -> Result<PathBuf, WriteError> {
        info!("Writing JSON Schema document: {}", file_name);
        write_json(self.base_path(), file_name, document)
    }

    /// Write the annotated operation groups for downstream rendering
    pub fn write_annotations(
        &self,
        api_version: &str,
        groups: &[OperationGroup],
    ) -> Result<PathBuf, WriteError> {
        info!(
            "Writing annotations for {} operation groups: {}",
            groups.len(),
            self.output_config.annotations_file
        );
        let document = annotations_document(api_version, groups)?;
        write_json(self.base_path(), &self.output_config.annotations_file, &document)
    }
}

/// Annotated operations wrapped with the API version
pub fn annotations_document(
    api_version: &str,
    groups: &[OperationGroup],
) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "apiVersion": api_version,
        "operationGroups": serde_json::to_value(groups)?,
    }))
}

/// Outcome of one generation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub models_processed: usize,
    pub models_skipped: Vec<String>,
    pub groups_processed: usize,
    pub operations_indexed: usize,
    pub parameters_indexed: usize,
    pub files_written: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Counter values after the run, usable as seeds for the next one
    pub counters: IndexCounters,
    pub processing_time_ms: u64,
}

impl GenerationResult {
    pub fn new(counters: IndexCounters) -> Self {
        Self {
            models_processed: 0,
            models_skipped: Vec::new(),
            groups_processed: 0,
            operations_indexed: 0,
            parameters_indexed: 0,
            files_written: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            counters,
            processing_time_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
