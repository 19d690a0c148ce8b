//! API description types and data structures

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Out-of-band annotations attached to operations, parameters, models and groups
pub type VendorExtensions = BTreeMap<String, serde_json::Value>;

/// Semantic type of a property or parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticType {
    #[default]
    String,
    Integer,
    Long,
    Number,
    Float,
    Double,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Email,
    Uuid,
    Object,
    Array,
    #[serde(other)]
    Other,
}

impl SemanticType {
    /// Canonical type name, suitable as input to the type mapper
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Integer => "integer",
            SemanticType::Long => "long",
            SemanticType::Number => "number",
            SemanticType::Float => "float",
            SemanticType::Double => "double",
            SemanticType::Decimal => "decimal",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::DateTime => "date-time",
            SemanticType::Email => "email",
            SemanticType::Uuid => "uuid",
            SemanticType::Object => "object",
            SemanticType::Array => "array",
            SemanticType::Other => "other",
        }
    }

    /// Number, float, double and decimal
    pub fn is_decimal(&self) -> bool {
        matches!(
            self,
            SemanticType::Number | SemanticType::Float | SemanticType::Double | SemanticType::Decimal
        )
    }

    /// Integer and long
    pub fn is_integral(&self) -> bool {
        matches!(self, SemanticType::Integer | SemanticType::Long)
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation constraints declared on a property or parameter
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Minimum value, kept verbatim so malformed numbers can be skipped later
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum: Option<String>,

    /// Maximum value, kept verbatim
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub maximum: Option<String>,

    /// Minimum length for strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    /// Maximum length for strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Pattern for strings (regex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Minimum item count for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u32>,

    /// Maximum item count for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
}

/// A named attribute of a model
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,

    /// Semantic type driving pattern derivation
    #[serde(default, rename = "type")]
    pub kind: SemanticType,

    /// Declared type name (e.g. "int64", "Pet"), fed to the type mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Format hint (e.g. "date-time", "email")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default)]
    pub is_model: bool,

    #[serde(default)]
    pub is_array: bool,

    #[serde(default)]
    pub is_enum: bool,

    /// Name of the referenced type, when this property points at another model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_type: Option<String>,

    /// Element description for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,

    /// Nested properties for models and arrays of models
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<Property>,

    #[serde(
        default,
        deserialize_with = "lenient_enum_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub enum_values: Option<Vec<String>>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, flatten)]
    pub constraints: Constraints,
}

impl Property {
    /// Create a property with the given name and semantic type
    pub fn new(name: impl Into<String>, kind: SemanticType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    /// A leaf that is neither a model nor an array
    pub fn is_primitive(&self) -> bool {
        !self.is_model && !self.is_array && self.vars.is_empty()
    }

    /// Type name handed to the type mapper
    pub fn type_name(&self) -> &str {
        self.data_type.as_deref().unwrap_or_else(|| self.kind.as_str())
    }
}

/// One named, typed input to an operation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(default, rename = "type")]
    pub kind: SemanticType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub is_model: bool,

    #[serde(default)]
    pub is_array: bool,

    #[serde(default)]
    pub is_enum: bool,

    /// Nested properties when the parameter is itself a structured model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<Property>,

    #[serde(
        default,
        deserialize_with = "lenient_enum_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub enum_values: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Constraints, including the optional caller-supplied pattern override
    #[serde(default, flatten)]
    pub constraints: Constraints,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vendor_extensions: VendorExtensions,
}

impl Parameter {
    /// Create a parameter with the given name and semantic type
    pub fn new(name: impl Into<String>, kind: SemanticType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

/// A named, structured data type
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,

    /// Display title, defaults to the model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub vars: Vec<Property>,

    /// Names of the properties that must be present
    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vendor_extensions: VendorExtensions,
}

impl Model {
    /// Title to display, falling back to the model name
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.name,
        }
    }
}

/// A consumed media type
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaType {
    pub media_type: String,

    #[serde(default)]
    pub is_json: bool,

    #[serde(default)]
    pub is_xml: bool,
}

impl MediaType {
    /// Build a media type, flagging JSON and XML variants from the name
    pub fn from_name(media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        let lower = media_type.to_ascii_lowercase();
        Self {
            is_json: lower.contains("json"),
            is_xml: lower.contains("xml"),
            media_type,
        }
    }
}

/// Authentication method declared by an operation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthMethod {
    pub name: String,

    /// Name of the key parameter (API key schemes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_param_name: Option<String>,

    #[serde(default)]
    pub is_key_in_query: bool,

    #[serde(default)]
    pub is_key_in_header: bool,
}

impl AuthMethod {
    /// Key name carried in the query string, if any
    pub fn query_key(&self) -> Option<&str> {
        if !self.is_key_in_query {
            return None;
        }
        self.key_param_name.as_deref().filter(|key| !key.is_empty())
    }
}

/// One callable API action bound to a path template
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,

    /// URL path template, may contain `{name}` placeholders
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(default)]
    pub params: Vec<Parameter>,

    #[serde(default)]
    pub consumes: Vec<MediaType>,

    #[serde(default)]
    pub auth_methods: Vec<AuthMethod>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vendor_extensions: VendorExtensions,
}

impl Operation {
    pub fn new(operation_id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            path: path.into(),
            ..Default::default()
        }
    }
}

/// A batch of operations processed together
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationGroup {
    pub name: String,

    #[serde(default)]
    pub operations: Vec<Operation>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vendor_extensions: VendorExtensions,
}

/// Complete API description: models plus grouped operations
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescription {
    #[serde(default)]
    pub models: Vec<Model>,

    #[serde(default)]
    pub operation_groups: Vec<OperationGroup>,
}

impl ApiDescription {
    /// Append another description, preserving order
    pub fn extend(&mut self, other: ApiDescription) {
        self.models.extend(other.models);
        self.operation_groups.extend(other.operation_groups);
    }

    /// Find a model by name
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }

    pub fn operation_count(&self) -> usize {
        self.operation_groups
            .iter()
            .map(|group| group.operations.len())
            .sum()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Integer(i) => i.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}

fn lenient_enum_values<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };

    match value {
        serde_json::Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    serde_json::Value::String(s) => values.push(s),
                    other => {
                        warn!("Ignoring enum values containing a non-string entry: {}", other);
                        return Ok(None);
                    }
                }
            }
            Ok(Some(values))
        }
        serde_json::Value::Null => Ok(None),
        other => {
            warn!("Ignoring enum values that are not a list: {}", other);
            Ok(None)
        }
    }
}
