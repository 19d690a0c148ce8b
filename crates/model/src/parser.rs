//! API description loader

use crate::types::ApiDescription;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Errors raised while loading an API description
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported input file: {0}")]
    UnsupportedFile(PathBuf),

    #[error("Input path does not exist: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ParseError>;

pub struct ApiParser;

impl Default for ApiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiParser {
    pub fn new() -> Self {
        Self
    }

    /// Load an API description from a file or a directory of files
    pub fn parse_path(&self, path: &Path) -> Result<ApiDescription> {
        let files = self.description_files(path)?;
        self.parse_files(&files)
    }

    /// Load every description file under a directory, in sorted path order
    pub fn parse_directory(&self, dir_path: &Path) -> Result<ApiDescription> {
        info!("Parsing API descriptions from directory: {:?}", dir_path);
        let files = self.description_files(dir_path)?;
        self.parse_files(&files)
    }

    /// Files that make up the description at `path`
    ///
    /// A file is returned as-is; a directory is walked recursively in sorted
    /// path order, keeping only YAML and JSON files.
    pub fn description_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            return Err(ParseError::NotFound(path.to_path_buf()));
        }

        let files = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_description_file(e.path()))
            .map(|e| e.into_path())
            .collect();
        Ok(files)
    }

    /// Load and concatenate the given files in order
    pub fn parse_files(&self, files: &[PathBuf]) -> Result<ApiDescription> {
        let mut api = ApiDescription::default();
        for file in files {
            api.extend(self.parse_file(file)?);
        }

        info!(
            "Loaded {} models and {} operations from {} files",
            api.models.len(),
            api.operation_count(),
            files.len()
        );
        Ok(api)
    }

    /// Load a single YAML or JSON description file
    pub fn parse_file(&self, path: &Path) -> Result<ApiDescription> {
        debug!("Parsing API description file: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|source| ParseError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Some("yaml") | Some("yml") => {
                // An empty document is an empty description
                if content.trim().is_empty() {
                    return Ok(ApiDescription::default());
                }
                serde_yaml::from_str(&content).map_err(|source| ParseError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Err(ParseError::UnsupportedFile(path.to_path_buf())),
        }
    }
}

/// Whether a path looks like an API description file
pub fn is_description_file(path: &Path) -> bool {
    matches!(
        extension(path).as_deref(),
        Some("yaml") | Some("yml") | Some("json")
    )
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
