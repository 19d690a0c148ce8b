//! JSON Schema generation for API models

pub mod builder;
pub mod error;
pub mod overrides;
pub mod types;
pub mod writer;

pub use builder::{SchemaBuilder, SchemaDocument, JSON_SCHEMA_DRAFT7};
pub use error::{SchemaGenerationError, WriteError};
pub use overrides::{OverrideFn, PropertyOverrides};
pub use types::{canonicalize, is_primitive, SchemaType};
pub use writer::{resolve_output_path, write_json};
