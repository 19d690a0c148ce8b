//! Flattening of structured parameters into dotted leaf names

use crate::pattern::resolve_pattern;
use serde::Serialize;
use tracing::debug;
use wafgen_model::{Property, SemanticType};

/// One flattened leaf as handed to downstream rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SemanticType,
    pub required: bool,
    pub is_array: bool,
    pub pattern: String,
}

impl From<&Property> for FlatProperty {
    fn from(property: &Property) -> Self {
        Self {
            name: property.name.clone(),
            kind: property.kind,
            required: property.required,
            is_array: property.is_array,
            pattern: resolve_pattern(property),
        }
    }
}

/// Expand `property` into leaves named `prefix + path`
///
/// Arrays of primitives stay a single leaf. Models contribute `name.` to the
/// prefix; arrays of models contribute `name.<index>.` per element.
pub fn flatten(property: &Property, prefix: &str) -> Vec<Property> {
    if property.is_array && is_primitive_array(property) {
        return vec![renamed(property, prefix)];
    }

    if property.is_model {
        debug!("Flattening model property: {}", property.name);
        let nested_prefix = format!("{prefix}{}.", property.name);
        return property
            .vars
            .iter()
            .flat_map(|var| flatten(var, &nested_prefix))
            .collect();
    }

    if property.is_array {
        debug!("Flattening array of model property: {}", property.name);
        return property
            .vars
            .iter()
            .enumerate()
            .flat_map(|(index, var)| flatten(var, &format!("{prefix}{}.{index}.", property.name)))
            .collect();
    }

    vec![renamed(property, prefix)]
}

/// Flatten every nested property of a structured value under `name.`
pub fn flatten_all(name: &str, vars: &[Property]) -> Vec<Property> {
    let prefix = format!("{name}.");
    vars.iter().flat_map(|var| flatten(var, &prefix)).collect()
}

fn is_primitive_array(property: &Property) -> bool {
    match property.vars.first() {
        None => true,
        Some(first) => first.is_primitive(),
    }
}

fn renamed(property: &Property, prefix: &str) -> Property {
    let mut leaf = property.clone();
    leaf.name = format!("{prefix}{}", property.name);
    leaf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Property {
        Property::new(name, SemanticType::String)
    }

    fn model(name: &str, vars: Vec<Property>) -> Property {
        let mut property = Property::new(name, SemanticType::Object);
        property.is_model = true;
        property.vars = vars;
        property
    }

    fn array(name: &str, vars: Vec<Property>) -> Property {
        let mut property = Property::new(name, SemanticType::Array);
        property.is_array = true;
        property.vars = vars;
        property
    }

    fn names(leaves: &[Property]) -> Vec<&str> {
        leaves.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_nested_model() {
        let root = model("root", vec![model("nested", vec![leaf("p")])]);
        let leaves = flatten(&root, "prefix.");
        assert_eq!(names(&leaves), vec!["prefix.root.nested.p"]);
    }

    #[test]
    fn test_array_of_models() {
        let arr = array("arr", vec![model("m", vec![leaf("p")])]);
        let leaves = flatten(&arr, "prefix.");
        assert_eq!(names(&leaves), vec!["prefix.arr.0.m.p"]);

        let arr = array("arr", vec![model("a", vec![leaf("x")]), model("b", vec![leaf("y"), leaf("z")])]);
        let leaves = flatten(&arr, "");
        assert_eq!(names(&leaves), vec!["arr.0.a.x", "arr.1.b.y", "arr.1.b.z"]);
    }

    #[test]
    fn test_primitive_arrays_are_single_leaves() {
        let tags = array("tags", vec![leaf("item")]);
        let leaves = flatten(&tags, "body.");
        assert_eq!(names(&leaves), vec!["body.tags"]);
        assert_eq!(leaves[0].vars.len(), 1);

        let ids = array("ids", Vec::new());
        assert_eq!(names(&flatten(&ids, "body.")), vec!["body.ids"]);
    }

    #[test]
    fn test_primitive_leaf_and_order() {
        let body = model(
            "pet",
            vec![leaf("name"), model("category", vec![leaf("id"), leaf("label")]), leaf("status")],
        );
        let leaves = flatten_all("body", &body.vars);
        assert_eq!(
            names(&leaves),
            vec!["body.name", "body.category.id", "body.category.label", "body.status"]
        );
        assert_eq!(names(&flatten(&leaf("q"), "")), vec!["q"]);
    }

    #[test]
    fn test_flat_property_carries_pattern() {
        let mut count = Property::new("body.count", SemanticType::Integer);
        count.required = true;
        let flat = FlatProperty::from(&count);
        assert_eq!(flat.pattern, "^[0-9]{1,19}$");

        let mut code = leaf("body.code");
        code.constraints.pattern = Some("^[A-Z]{2}$".to_string());
        assert_eq!(FlatProperty::from(&code).pattern, "^[A-Z]{2}$");

        let value = serde_json::to_value(FlatProperty::from(&code)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "body.code",
                "type": "string",
                "required": false,
                "isArray": false,
                "pattern": "^[A-Z]{2}$"
            })
        );
    }
}
