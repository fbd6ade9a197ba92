//! Output layers
//!
//! A layer is a named category of findings that downstream tooling stores and
//! renders separately. Layers are plain strings kept in a registry that is
//! filled at startup, so a new rule can introduce a new layer by registering
//! it next to the rule.

use serde::Serialize;

/// Catch-all layer for tag combinations that are wrong
pub const WAYPROBLEMS: &str = "wayproblems";
/// Road number (`ref`) problems
pub const REF: &str = "ref";
/// Findings specific to footways and sidewalks
pub const FOOTWAY: &str = "footway";
/// Findings specific to cycling infrastructure
pub const CYCLING: &str = "cycling";
/// Values too unusual to classify
pub const STRANGE: &str = "strange";
/// Tags that restate a default
pub const REDUNDANT: &str = "redundant";

/// Registered layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerInfo {
    pub name: String,
    pub description: String,
}

/// String-keyed set of known layers, in registration order
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: Vec<LayerInfo>,
}

impl LayerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every layer used by the built-in rules
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(WAYPROBLEMS, "Tag combinations that cannot be right");
        registry.register(REF, "Missing, misplaced or malformed road numbers");
        registry.register(FOOTWAY, "Footway and sidewalk tagging");
        registry.register(CYCLING, "Cycleway and bicycle tagging");
        registry.register(STRANGE, "Values outside the recognized vocabulary");
        registry.register(REDUNDANT, "Tags that restate the default");
        registry
    }

    /// Register a layer; returns false if the name was already known
    pub fn register(&mut self, name: &str, description: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.layers.push(LayerInfo {
            name: name.to_string(),
            description: description.to_string(),
        });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&LayerInfo> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerInfo> {
        self.layers.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
