//! Mapping from declared type names to JSON Schema types

use serde_json::{Map, Value};

/// Canonical JSON Schema type plus an optional format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaType {
    pub kind: &'static str,
    pub format: Option<&'static str>,
}

impl SchemaType {
    const fn plain(kind: &'static str) -> Self {
        Self { kind, format: None }
    }

    const fn formatted(kind: &'static str, format: &'static str) -> Self {
        Self {
            kind,
            format: Some(format),
        }
    }

    /// Write `type` (and `format`, if any) onto a schema node, dropping any `$ref`
    pub fn apply_to(&self, node: &mut Map<String, Value>) {
        node.remove("$ref");
        node.insert("type".to_string(), Value::String(self.kind.to_string()));
        if let Some(format) = self.format {
            node.insert("format".to_string(), Value::String(format.to_string()));
        }
    }
}

impl Default for SchemaType {
    fn default() -> Self {
        Self::plain("string")
    }
}

const TYPE_TABLE: &[(&str, SchemaType)] = &[
    ("integer", SchemaType::plain("integer")),
    ("int", SchemaType::plain("integer")),
    ("int32", SchemaType::plain("integer")),
    ("int64", SchemaType::plain("integer")),
    ("long", SchemaType::plain("integer")),
    ("float", SchemaType::plain("number")),
    ("double", SchemaType::plain("number")),
    ("number", SchemaType::plain("number")),
    ("decimal", SchemaType::plain("number")),
    ("boolean", SchemaType::plain("boolean")),
    ("bool", SchemaType::plain("boolean")),
    ("string", SchemaType::plain("string")),
    ("byte", SchemaType::plain("string")),
    ("binary", SchemaType::plain("string")),
    ("base64", SchemaType::plain("string")),
    ("password", SchemaType::plain("string")),
    ("date", SchemaType::formatted("string", "date")),
    ("date-time", SchemaType::formatted("string", "date-time")),
    ("datetime", SchemaType::formatted("string", "date-time")),
    ("email", SchemaType::formatted("string", "email")),
    ("uuid", SchemaType::formatted("string", "uuid")),
    ("uri", SchemaType::formatted("string", "uri")),
    ("url", SchemaType::formatted("string", "uri")),
    ("hostname", SchemaType::formatted("string", "hostname")),
    ("ipv4", SchemaType::formatted("string", "ipv4")),
    ("ipv6", SchemaType::formatted("string", "ipv6")),
    ("object", SchemaType::plain("object")),
    ("map", SchemaType::plain("object")),
    ("array", SchemaType::plain("array")),
    ("list", SchemaType::plain("array")),
];

fn lookup(type_name: &str) -> Option<SchemaType> {
    TYPE_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(type_name))
        .map(|(_, schema_type)| *schema_type)
}

/// Map a type name to its canonical schema type; unknown or empty names become plain strings
pub fn canonicalize(type_name: Option<&str>) -> SchemaType {
    type_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .and_then(lookup)
        .unwrap_or_default()
}

/// Whether a type name is a built-in (non-model) type
pub fn is_primitive(type_name: &str) -> bool {
    let type_name = type_name.trim();
    type_name.eq_ignore_ascii_case("null") || lookup(type_name).is_some()
}
