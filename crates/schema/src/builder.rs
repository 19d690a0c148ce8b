//! JSON Schema synthesis for models

use crate::error::SchemaGenerationError;
use crate::overrides::PropertyOverrides;
use crate::types::{canonicalize, is_primitive};
use serde_json::{json, Map, Number, Value};
use tracing::{debug, error, warn};
use wafgen_model::{Model, Property};

pub const JSON_SCHEMA_DRAFT7: &str = "http://json-schema.org/draft-07/schema#";
pub const DOCUMENT_TITLE: &str = "OpenAPI Schema Definitions";
pub const DOCUMENT_DESCRIPTION: &str = "JSON Schema definitions generated from OpenAPI specification";

const DEFINITIONS_PREFIX: &str = "#/definitions/";

pub type Result<T> = std::result::Result<T, SchemaGenerationError>;

/// Combined document plus the names of models that had to be left out
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub document: Value,
    pub generated: usize,
    pub skipped: Vec<String>,
}

/// Builds JSON Schema definitions from models
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    overrides: PropertyOverrides,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom override registry instead of the built-in one
    pub fn with_overrides(overrides: PropertyOverrides) -> Self {
        Self { overrides }
    }

    pub fn overrides_mut(&mut self) -> &mut PropertyOverrides {
        &mut self.overrides
    }

    /// Build the schema object for a single model
    pub fn build_model_schema(&self, model: &Model) -> Result<Map<String, Value>> {
        if model.name.trim().is_empty() {
            return Err(SchemaGenerationError::new("Model has no name"));
        }

        debug!("Building schema for model: {}", model.name);

        let mut schema = Map::new();
        schema.insert("title".to_string(), json!(model.display_title()));
        if let Some(description) = non_empty(model.description.as_deref()) {
            schema.insert("description".to_string(), json!(description));
        }
        schema.insert("type".to_string(), json!("object"));

        if !model.vars.is_empty() {
            let mut properties = Map::new();
            for property in &model.vars {
                let node = self.build_property_schema(property).map_err(|e| {
                    SchemaGenerationError::with_cause(
                        format!("Failed to process property of model {}", model.name),
                        e,
                    )
                })?;
                properties.insert(property.name.clone(), Value::Object(node));
            }
            schema.insert("properties".to_string(), Value::Object(properties));
        }

        if !model.required.is_empty() {
            schema.insert("required".to_string(), json!(model.required));
        }

        Ok(schema)
    }

    /// Look a model up by name and build its schema
    pub fn build_model_schema_by_name(
        &self,
        models: &[Model],
        name: &str,
    ) -> Result<Map<String, Value>> {
        let model = models
            .iter()
            .find(|model| model.name == name)
            .ok_or_else(|| SchemaGenerationError::new(format!("Model not found: {name}")))?;
        self.build_model_schema(model)
    }

    /// Build the root document holding every model under `definitions`
    ///
    /// Models that fail are logged and omitted.
    pub fn build_document(&self, models: &[Model]) -> SchemaDocument {
        let mut definitions = Map::new();
        let mut skipped = Vec::new();

        for model in models {
            match self.build_model_schema(model) {
                Ok(schema) => {
                    definitions.insert(model.name.clone(), Value::Object(schema));
                }
                Err(e) => {
                    error!("Skipping schema for model {:?}: {}", model.name, e);
                    skipped.push(model.name.clone());
                }
            }
        }

        let generated = definitions.len();
        let mut root = Map::new();
        root.insert("$schema".to_string(), json!(JSON_SCHEMA_DRAFT7));
        root.insert("title".to_string(), json!(DOCUMENT_TITLE));
        root.insert("description".to_string(), json!(DOCUMENT_DESCRIPTION));
        root.insert("type".to_string(), json!("object"));
        root.insert("definitions".to_string(), Value::Object(definitions));

        SchemaDocument {
            document: Value::Object(root),
            generated,
            skipped,
        }
    }

    /// Build the schema node of one property
    pub fn build_property_schema(&self, property: &Property) -> Result<Map<String, Value>> {
        if property.name.trim().is_empty() {
            return Err(SchemaGenerationError::new("Property has no name"));
        }

        if let Some(apply) = self.overrides.find(&property.name) {
            debug!("Applying schema override for property: {}", property.name);
            return Ok(apply(property));
        }

        let mut node = Map::new();
        self.apply_property_type(property, &mut node);

        if let Some(description) = non_empty(property.description.as_deref()) {
            node.insert("description".to_string(), json!(description));
        }
        if let Some(format) = non_empty(property.format.as_deref()) {
            if !node.contains_key("$ref") {
                node.insert("format".to_string(), json!(format));
            }
        }

        apply_constraints(property, &mut node);

        if let Some(complex_type) = non_empty(property.complex_type.as_deref()) {
            if is_primitive(complex_type) {
                let schema_type = canonicalize(Some(complex_type));
                if property.is_array {
                    update_items(&mut node, |items| schema_type.apply_to(items));
                } else {
                    schema_type.apply_to(&mut node);
                }
            } else if property.is_array {
                node.insert("type".to_string(), json!("array"));
                update_items(&mut node, |items| set_reference(items, complex_type));
            } else {
                set_reference(&mut node, complex_type);
            }
        }

        if let Some(values) = property.enum_values.as_ref().filter(|v| !v.is_empty()) {
            node.insert("enum".to_string(), json!(values));
        }

        Ok(node)
    }

    fn apply_property_type(&self, property: &Property, node: &mut Map<String, Value>) {
        if property.is_array {
            node.insert("type".to_string(), json!("array"));
            let mut items = Map::new();
            self.apply_item_type(property, &mut items);
            node.insert("items".to_string(), Value::Object(items));
            return;
        }

        canonicalize(Some(property.type_name())).apply_to(node);
    }

    fn apply_item_type(&self, property: &Property, items: &mut Map<String, Value>) {
        if let Some(item) = property.items.as_deref() {
            if let Some(complex_type) = non_empty(item.complex_type.as_deref()) {
                if is_primitive(complex_type) {
                    canonicalize(Some(complex_type)).apply_to(items);
                } else {
                    set_reference(items, complex_type);
                }
                return;
            }

            if item.is_array {
                items.insert("type".to_string(), json!("array"));
                let mut nested = Map::new();
                self.apply_item_type(item, &mut nested);
                items.insert("items".to_string(), Value::Object(nested));
                return;
            }

            canonicalize(Some(item.type_name())).apply_to(items);
            return;
        }

        let element_type = property
            .data_type
            .as_deref()
            .and_then(|data_type| {
                data_type
                    .strip_prefix("array[")
                    .and_then(|rest| rest.strip_suffix(']'))
            });
        canonicalize(element_type).apply_to(items);
    }
}

fn apply_constraints(property: &Property, node: &mut Map<String, Value>) {
    let constraints = &property.constraints;

    if let Some(minimum) = constraints.minimum.as_deref() {
        match parse_number(minimum) {
            Some(value) => {
                node.insert("minimum".to_string(), value);
            }
            None => warn!("Invalid minimum value on {}: {}", property.name, minimum),
        }
    }

    if let Some(maximum) = constraints.maximum.as_deref() {
        match parse_number(maximum) {
            Some(value) => {
                node.insert("maximum".to_string(), value);
            }
            None => warn!("Invalid maximum value on {}: {}", property.name, maximum),
        }
    }

    if let Some(min_length) = constraints.min_length {
        node.insert("minLength".to_string(), json!(min_length));
    }
    if let Some(max_length) = constraints.max_length {
        node.insert("maxLength".to_string(), json!(max_length));
    }
    if let Some(pattern) = constraints.pattern.as_deref() {
        node.insert("pattern".to_string(), json!(pattern));
    }
    if let Some(min_items) = constraints.min_items {
        node.insert("minItems".to_string(), json!(min_items));
    }
    if let Some(max_items) = constraints.max_items {
        node.insert("maxItems".to_string(), json!(max_items));
    }
    if constraints.unique_items == Some(true) {
        node.insert("uniqueItems".to_string(), json!(true));
    }
    if let Some(multiple_of) = constraints.multiple_of.and_then(Number::from_f64) {
        node.insert("multipleOf".to_string(), Value::Number(multiple_of));
    }
    if constraints.exclusive_minimum == Some(true) {
        node.insert("exclusiveMinimum".to_string(), json!(true));
    }
    if constraints.exclusive_maximum == Some(true) {
        node.insert("exclusiveMaximum".to_string(), json!(true));
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn set_reference(node: &mut Map<String, Value>, type_name: &str) {
    node.insert(
        "$ref".to_string(),
        json!(format!("{DEFINITIONS_PREFIX}{type_name}")),
    );
    node.remove("type");
    node.remove("format");
}

fn update_items(node: &mut Map<String, Value>, update: impl FnOnce(&mut Map<String, Value>)) {
    if let Some(Value::Object(items)) = node.get_mut("items") {
        update(items);
        return;
    }
    let mut items = Map::new();
    update(&mut items);
    node.insert("items".to_string(), Value::Object(items));
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wafgen_model::{Constraints, SemanticType};

    fn pet() -> Model {
        let mut id = Property::new("id", SemanticType::Long);
        id.data_type = Some("int64".to_string());

        let mut name = Property::new("name", SemanticType::String);
        name.required = true;
        name.constraints.min_length = Some(1);

        let mut category = Property::new("category", SemanticType::Object);
        category.is_model = true;
        category.complex_type = Some("Category".to_string());
        category.format = Some("ignored".to_string());

        let mut status = Property::new("status", SemanticType::String);
        status.is_enum = true;
        status.enum_values = Some(vec!["available".to_string(), "sold".to_string()]);

        let mut photo_urls = Property::new("photoUrls", SemanticType::Array);
        photo_urls.is_array = true;
        photo_urls.complex_type = Some("Photo".to_string());

        Model {
            name: "Pet".to_string(),
            description: Some("A pet for sale".to_string()),
            vars: vec![id, name, category, status, photo_urls],
            required: vec!["name".to_string(), "photoUrls".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_build_model_schema() {
        let schema = SchemaBuilder::new().build_model_schema(&pet()).unwrap();

        assert_eq!(
            Value::Object(schema),
            json!({
                "title": "Pet",
                "description": "A pet for sale",
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string", "minLength": 1},
                    "category": {"$ref": "#/definitions/Category"},
                    "status": {"type": "string", "enum": ["available", "sold"]},
                    "photoUrls": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["name", "photoUrls"]
            })
        );
    }

    #[test]
    fn test_reference_has_no_type_or_format() {
        let mut other = Property::new("other", SemanticType::Object);
        other.complex_type = Some("Other".to_string());
        other.data_type = Some("date-time".to_string());

        let node = SchemaBuilder::new().build_property_schema(&other).unwrap();
        assert_eq!(Value::Object(node), json!({"$ref": "#/definitions/Other"}));
    }

    #[test]
    fn test_primitive_complex_type_is_applied_directly() {
        let mut when = Property::new("when", SemanticType::String);
        when.complex_type = Some("date".to_string());

        let node = SchemaBuilder::new().build_property_schema(&when).unwrap();
        assert_eq!(
            Value::Object(node),
            json!({"type": "string", "format": "date"})
        );
    }

    #[test]
    fn test_array_items() {
        let builder = SchemaBuilder::new();

        let mut tags = Property::new("tags", SemanticType::Array);
        tags.is_array = true;
        tags.complex_type = Some("Tag".to_string());
        tags.constraints = Constraints {
            min_items: Some(1),
            unique_items: Some(true),
            ..Default::default()
        };
        let node = builder.build_property_schema(&tags).unwrap();
        assert_eq!(
            Value::Object(node),
            json!({
                "type": "array",
                "items": {"$ref": "#/definitions/Tag"},
                "minItems": 1,
                "uniqueItems": true
            })
        );

        let mut ids = Property::new("ids", SemanticType::Array);
        ids.is_array = true;
        ids.data_type = Some("array[int32]".to_string());
        let node = builder.build_property_schema(&ids).unwrap();
        assert_eq!(
            Value::Object(node),
            json!({"type": "array", "items": {"type": "integer"}})
        );

        let mut emails = Property::new("emails", SemanticType::Array);
        emails.is_array = true;
        emails.items = Some(Box::new(Property::new("item", SemanticType::Email)));
        let node = builder.build_property_schema(&emails).unwrap();
        assert_eq!(
            Value::Object(node),
            json!({"type": "array", "items": {"type": "string", "format": "email"}})
        );

        let mut days = Property::new("days", SemanticType::Array);
        days.is_array = true;
        days.complex_type = Some("date".to_string());
        let node = builder.build_property_schema(&days).unwrap();
        assert_eq!(
            Value::Object(node),
            json!({"type": "array", "items": {"type": "string", "format": "date"}})
        );
    }

    #[test]
    fn test_numeric_constraints() {
        let mut price = Property::new("price", SemanticType::Number);
        price.constraints = Constraints {
            minimum: Some("0.5".to_string()),
            maximum: Some("lots".to_string()),
            multiple_of: Some(0.5),
            exclusive_minimum: Some(true),
            exclusive_maximum: Some(false),
            unique_items: Some(false),
            ..Default::default()
        };

        let node = SchemaBuilder::new().build_property_schema(&price).unwrap();
        assert_eq!(
            Value::Object(node),
            json!({
                "type": "number",
                "minimum": 0.5,
                "multipleOf": 0.5,
                "exclusiveMinimum": true
            })
        );
    }

    #[test]
    fn test_model_errors() {
        let builder = SchemaBuilder::new();

        let err = builder.build_model_schema(&Model::default()).unwrap_err();
        assert_eq!(err.message(), "Model has no name");

        let broken = Model {
            name: "Broken".to_string(),
            vars: vec![Property::default()],
            ..Default::default()
        };
        let err = builder.build_model_schema(&broken).unwrap_err();
        assert!(err.message().contains("Broken"));
        assert!(std::error::Error::source(&err).is_some());

        let err = builder
            .build_model_schema_by_name(&[pet()], "Missing")
            .unwrap_err();
        assert_eq!(err.to_string(), "Model not found: Missing");
    }

    #[test]
    fn test_document_skips_failing_models() {
        let broken = Model {
            name: "Broken".to_string(),
            vars: vec![Property::default()],
            ..Default::default()
        };
        let empty = Model {
            name: "Empty".to_string(),
            title: Some("Nothing here".to_string()),
            ..Default::default()
        };

        let result = SchemaBuilder::new().build_document(&[pet(), broken, empty]);
        assert_eq!(result.generated, 2);
        assert_eq!(result.skipped, vec!["Broken".to_string()]);

        let document = result.document;
        assert_eq!(document["$schema"], json!(JSON_SCHEMA_DRAFT7));
        assert_eq!(document["title"], json!(DOCUMENT_TITLE));
        assert_eq!(document["type"], json!("object"));

        let definitions = document["definitions"].as_object().unwrap();
        let names: Vec<_> = definitions.keys().cloned().collect();
        assert_eq!(names, vec!["Pet".to_string(), "Empty".to_string()]);
        assert_eq!(
            definitions["Empty"],
            json!({"title": "Nothing here", "type": "object"})
        );
    }

    #[test]
    fn test_custom_override() {
        fn opaque(_: &Property) -> Map<String, Value> {
            let mut node = Map::new();
            node.insert("type".to_string(), json!("object"));
            node
        }

        let mut builder = SchemaBuilder::new();
        builder.overrides_mut().register("metadata", opaque);

        let mut metadata = Property::new("metadata", SemanticType::String);
        metadata.constraints.max_length = Some(3);
        let node = builder.build_property_schema(&metadata).unwrap();
        assert_eq!(Value::Object(node), json!({"type": "object"}));

        let mut overrides = PropertyOverrides::empty();
        overrides.register("metadata", opaque);
        let builder = SchemaBuilder::with_overrides(overrides);

        let node = builder.build_property_schema(&metadata).unwrap();
        assert_eq!(Value::Object(node), json!({"type": "object"}));

        // photoUrls is only special in the default registry
        let mut photo_urls = Property::new("photoUrls", SemanticType::String);
        photo_urls.constraints.max_length = Some(3);
        let node = builder.build_property_schema(&photo_urls).unwrap();
        assert_eq!(
            Value::Object(node),
            json!({"type": "string", "maxLength": 3})
        );
    }
}
