//! Validation rule derivation: patterns, flattening and operation indexing

pub mod flatten;
pub mod indexer;
pub mod keys;
pub mod pattern;

pub use flatten::{flatten, flatten_all, FlatProperty};
pub use indexer::{path_regex, GroupStats, IndexCounters, OperationIndexer};
pub use pattern::{derive_pattern, is_invalid_pattern, resolve_pattern, PatternSubject};
