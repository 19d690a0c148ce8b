//! In-memory API description consumed by the schema and rule engines

pub mod parser;
pub mod types;

pub use parser::{ApiParser, ParseError};
pub use types::{
    ApiDescription, AuthMethod, Constraints, MediaType, Model, Operation, OperationGroup,
    Parameter, Property, SemanticType, VendorExtensions,
};
