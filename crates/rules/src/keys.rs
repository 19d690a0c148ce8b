//! Vendor-extension keys written by the operation indexer

pub const INDEX_KEY: &str = "x-codegen-globalIndex";
/// Number of index slots consumed per operation and per parameter
pub const INDEX_MAX: usize = 20;
pub const PATH_REGEX: &str = "x-codegen-pathRegex";
pub const HAS_ARRAY_MIN: &str = "x-codegen-hasArrayMin";
pub const HAS_ARRAY_MAX: &str = "x-codegen-hasArrayMax";
pub const IS_JSON: &str = "x-codegen-isJson";
pub const IS_XML: &str = "x-codegen-isXml";
pub const MODEL_PROPERTIES: &str = "x-codegen-modelProperties";
pub const AUTH_PARAM: &str = "x-codegen-authParam";
pub const VALIDATE_BODY_SCHEMA: &str = "validateBodySchema";

/// Default first operation index of a run
pub const OPERATION_SEED: u64 = 4_200_001;
/// Default first parameter index of a run
pub const PARAMETER_SEED: u64 = 4_210_001;

/// Key of the n-th index slot, `n` in `1..=INDEX_MAX`
pub fn index_slot(n: usize) -> String {
    format!("{INDEX_KEY}_{n}")
}
