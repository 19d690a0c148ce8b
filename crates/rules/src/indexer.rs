//! Deterministic numbering and annotation of operations and parameters

use crate::flatten::{flatten_all, FlatProperty};
use crate::keys::{
    index_slot, AUTH_PARAM, HAS_ARRAY_MAX, HAS_ARRAY_MIN, INDEX_KEY, INDEX_MAX, IS_JSON, IS_XML,
    MODEL_PROPERTIES, OPERATION_SEED, PARAMETER_SEED, PATH_REGEX, VALIDATE_BODY_SCHEMA,
};
use crate::pattern::resolve_pattern;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use wafgen_model::{Operation, OperationGroup, Parameter};

static PATH_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{.*?\}").expect("path placeholder regex should be valid"));

const PATH_SEGMENT: &str = "[^/]+";

/// Next index values to hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexCounters {
    pub operation: u64,
    pub parameter: u64,
}

impl Default for IndexCounters {
    fn default() -> Self {
        Self {
            operation: OPERATION_SEED,
            parameter: PARAMETER_SEED,
        }
    }
}

/// Totals for one processed group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    pub operations: usize,
    pub parameters: usize,
    pub replaced_patterns: usize,
}

/// Annotates operations in strict declaration order
///
/// One indexer is built per run; its counters only ever move forward.
#[derive(Debug, Clone)]
pub struct OperationIndexer {
    counters: IndexCounters,
    validate_body_schema: bool,
}

impl Default for OperationIndexer {
    fn default() -> Self {
        Self::new(IndexCounters::default(), true)
    }
}

impl OperationIndexer {
    pub fn new(counters: IndexCounters, validate_body_schema: bool) -> Self {
        Self {
            counters,
            validate_body_schema,
        }
    }

    /// Counter values the next operation and parameter will receive
    pub fn counters(&self) -> IndexCounters {
        self.counters
    }

    /// Annotate every operation of a group, then take one group-level index
    pub fn process_group(&mut self, group: &mut OperationGroup) -> GroupStats {
        debug!("Processing operation group: {}", group.name);

        let mut stats = GroupStats::default();
        for operation in &mut group.operations {
            let op_stats = self.process_operation(operation);
            stats.operations += 1;
            stats.parameters += op_stats.parameters;
            stats.replaced_patterns += op_stats.replaced_patterns;
        }

        let batch_index = self.next_operation_index();
        group
            .vendor_extensions
            .insert(INDEX_KEY.to_string(), Value::from(batch_index));

        stats
    }

    /// Annotate one operation and then each of its parameters
    pub fn process_operation(&mut self, operation: &mut Operation) -> GroupStats {
        debug!("Processing operation: {}", operation.operation_id);

        let path_regex = path_regex(&operation.path);
        let extensions = &mut operation.vendor_extensions;
        extensions.insert(PATH_REGEX.to_string(), Value::String(path_regex));

        for slot in 1..=INDEX_MAX {
            let index = self.next_operation_index();
            extensions.insert(index_slot(slot), Value::from(index));
        }

        extensions.insert(
            VALIDATE_BODY_SCHEMA.to_string(),
            Value::Bool(self.validate_body_schema),
        );

        let accepts_json = operation.consumes.iter().any(|media| media.is_json);
        let accepts_xml = operation.consumes.iter().any(|media| media.is_xml);
        extensions.insert(IS_JSON.to_string(), Value::Bool(accepts_json));
        extensions.insert(IS_XML.to_string(), Value::Bool(accepts_xml));

        let auth_keys: Vec<&str> = operation
            .auth_methods
            .iter()
            .filter_map(|method| method.query_key())
            .collect();
        if !auth_keys.is_empty() {
            extensions.insert(AUTH_PARAM.to_string(), Value::String(auth_keys.join("|")));
        }

        let mut stats = GroupStats {
            operations: 1,
            ..Default::default()
        };
        for param in &mut operation.params {
            if self.process_parameter(param) {
                stats.replaced_patterns += 1;
            }
            stats.parameters += 1;
        }
        stats
    }

    /// Annotate one parameter; returns whether a supplied pattern had to be replaced
    pub fn process_parameter(&mut self, param: &mut Parameter) -> bool {
        if param.required && param.is_array && matches!(param.constraints.min_items, None | Some(0)) {
            debug!("Required array parameter: {}", param.name);
            param.constraints.min_items = Some(1);
        }

        if param.is_model {
            debug!("Model parameter: {}", param.name);
            let leaves: Vec<FlatProperty> = flatten_all(&param.name, &param.vars)
                .iter()
                .map(FlatProperty::from)
                .collect();
            match serde_json::to_value(&leaves) {
                Ok(value) => {
                    param
                        .vendor_extensions
                        .insert(MODEL_PROPERTIES.to_string(), value);
                }
                Err(e) => warn!("Failed to record model properties of {}: {}", param.name, e),
            }
        }

        param.vendor_extensions.insert(
            HAS_ARRAY_MIN.to_string(),
            Value::Bool(param.constraints.min_items.is_some()),
        );
        param.vendor_extensions.insert(
            HAS_ARRAY_MAX.to_string(),
            Value::Bool(param.constraints.max_items.is_some()),
        );

        for slot in 1..=INDEX_MAX {
            let index = self.next_parameter_index();
            param
                .vendor_extensions
                .insert(index_slot(slot), Value::from(index));
        }

        let supplied = param
            .constraints
            .pattern
            .clone()
            .filter(|pattern| !pattern.is_empty());
        let resolved = resolve_pattern(&*param);
        let replaced = supplied.is_some_and(|pattern| pattern != resolved);
        param.constraints.pattern = Some(resolved);
        replaced
    }

    fn next_operation_index(&mut self) -> u64 {
        let index = self.counters.operation;
        self.counters.operation += 1;
        index
    }

    fn next_parameter_index(&mut self) -> u64 {
        let index = self.counters.parameter;
        self.counters.parameter += 1;
        index
    }
}

/// Regex matching concrete paths of a templated path, one segment per placeholder
pub fn path_regex(path: &str) -> String {
    PATH_PLACEHOLDER
        .replace_all(path, NoExpand(PATH_SEGMENT))
        .into_owned()
}
