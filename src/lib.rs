//! WafGen Library
//!
//! Derives a JSON Schema document and per-operation validation rules
//! (anchored patterns, path matchers, stable numeric indices) from an API
//! description, for consumption by request-filtering rule templates.

pub mod cli;
pub mod config;
pub mod generator;
pub mod utils;

pub use config::{Config, GenerationConfig, IndexConfig, OutputConfig};
pub use generator::{ArtifactWriter, GenerationResult};
pub use wafgen_model::{ApiDescription, ApiParser, Model, Operation, OperationGroup, Parameter};
pub use wafgen_rules::{IndexCounters, OperationIndexer};
pub use wafgen_schema::{SchemaBuilder, SchemaGenerationError};

use anyhow::Result;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Main application context that coordinates all components
pub struct WafGen {
    config: Config,
    parser: ApiParser,
    schema_builder: SchemaBuilder,
    writer: ArtifactWriter,
    dry_run: bool,
}

impl WafGen {
    /// Create a new WafGen instance with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let writer = ArtifactWriter::new(config.output.clone());
        Ok(Self {
            config,
            parser: ApiParser::new(),
            schema_builder: SchemaBuilder::new(),
            writer,
            dry_run: false,
        })
    }

    /// Derive everything but write nothing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured input
    pub fn load_input(&self) -> WafGenResult<ApiDescription> {
        let (_, api) = self.load_input_files()?;
        Ok(api)
    }

    /// Load the configured input along with the files it was read from
    pub fn load_input_files(&self) -> WafGenResult<(Vec<PathBuf>, ApiDescription)> {
        let files = self.parser.description_files(&self.config.input)?;
        let api = self.parser.parse_files(&files)?;
        Ok((files, api))
    }

    /// Load the configured input and run generation over it
    pub fn generate_from_input(&self) -> Result<(ApiDescription, GenerationResult)> {
        info!("Loading API description from {:?}", self.config.input);
        let mut api = self.load_input()?;
        let result = self.generate(&mut api);
        Ok((api, result))
    }

    /// Annotate every operation group of `api` and write the configured artifacts
    ///
    /// Schema and write failures are recorded in the result, never returned.
    pub fn generate(&self, api: &mut ApiDescription) -> GenerationResult {
        info!("Starting rule generation");
        let start_time = Instant::now();

        let generation = &self.config.generation;
        let mut indexer = OperationIndexer::new(
            self.config.indexing.counters(),
            generation.validate_body_schema,
        );
        let mut result = GenerationResult::new(indexer.counters());

        for group in &mut api.operation_groups {
            let stats = indexer.process_group(group);
            result.groups_processed += 1;
            result.operations_indexed += stats.operations;
            result.parameters_indexed += stats.parameters;
            if stats.replaced_patterns > 0 {
                result.warnings.push(format!(
                    "{}: {} supplied patterns used lookaround and were replaced",
                    group.name, stats.replaced_patterns
                ));
            }
        }
        result.counters = indexer.counters();

        if generation.generate_json_schema {
            let schema = self.schema_builder.build_document(&api.models);
            result.models_processed = schema.generated;
            for name in &schema.skipped {
                result
                    .errors
                    .push(format!("Schema for model {name:?} could not be generated"));
            }
            result.models_skipped = schema.skipped;

            if self.dry_run {
                info!("Dry run: skipping {}", generation.json_schema_output_file);
            } else {
                match self
                    .writer
                    .write_schema(&generation.json_schema_output_file, &schema.document)
                {
                    Ok(path) => result.files_written.push(path),
                    Err(e) => {
                        error!("Error writing JSON Schema: {}", e);
                        result.errors.push(format!("Failed to write JSON Schema: {e}"));
                    }
                }
            }
        }

        if generation.write_annotations {
            if self.dry_run {
                info!("Dry run: skipping {}", self.config.output.annotations_file);
            } else {
                match self
                    .writer
                    .write_annotations(&generation.api_version, &api.operation_groups)
                {
                    Ok(path) => result.files_written.push(path),
                    Err(e) => {
                        error!("Error writing annotations: {}", e);
                        result.errors.push(format!("Failed to write annotations: {e}"));
                    }
                }
            }
        }

        for warning in &result.warnings {
            warn!("{}", warning);
        }

        let generation_time = start_time.elapsed();
        result.processing_time_ms = generation_time.as_millis() as u64;
        info!(
            "Generation completed in {}",
            utils::format_duration(generation_time)
        );

        result
    }

    /// Build the schema of a single model, surfacing any failure
    pub fn build_model_schema(
        &self,
        api: &ApiDescription,
        name: &str,
    ) -> WafGenResult<Map<String, Value>> {
        Ok(self
            .schema_builder
            .build_model_schema_by_name(&api.models, name)?)
    }
}

/// Error types for WafGen
#[derive(thiserror::Error, Debug)]
pub enum WafGenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(#[from] wafgen_model::ParseError),

    #[error("Schema generation failed: {0}")]
    Schema(#[from] SchemaGenerationError),

    #[error("Write failed: {0}")]
    Write(#[from] wafgen_schema::WriteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

/// Result type for WafGen operations
pub type WafGenResult<T> = std::result::Result<T, WafGenError>;
