//! Configuration management for WafGen

pub mod config;
pub mod generation;
pub mod output;


// Re-export main types for convenience
pub use config::Config;
pub use generation::{GenerationConfig, IndexConfig};
pub use output::OutputConfig;
