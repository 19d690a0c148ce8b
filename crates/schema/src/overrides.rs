//! Per-property-name schema overrides

use serde_json::{json, Map, Value};
use wafgen_model::Property;

/// Replaces the schema node built for a property
pub type OverrideFn = fn(&Property) -> Map<String, Value>;

/// Ordered registry of property-name overrides; the first matching name wins
#[derive(Clone)]
pub struct PropertyOverrides {
    entries: Vec<(String, OverrideFn)>,
}

impl Default for PropertyOverrides {
    fn default() -> Self {
        let mut overrides = Self::empty();
        overrides.register("photoUrls", string_array);
        overrides
    }
}

impl std::fmt::Debug for PropertyOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}

impl PropertyOverrides {
    /// Registry without the built-in overrides
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, apply: OverrideFn) {
        self.entries.push((name.into(), apply));
    }

    pub fn find(&self, name: &str) -> Option<OverrideFn> {
        self.entries
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|(_, apply)| *apply)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn string_array(_property: &Property) -> Map<String, Value> {
    let mut node = Map::new();
    node.insert("type".to_string(), json!("array"));
    node.insert("items".to_string(), json!({"type": "string"}));
    node
}
