//! Diagnostic types for checker results

use crate::feature::{Feature, Provenance};
use crate::finding::Finding;
use serde::{Deserialize, Serialize};

/// Coarse classification used when rendering a layer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Definite problem
    #[default]
    Default,
    /// Advisory - the tag restates a default
    Redundant,
    /// Road number problem
    Ref,
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Style::Default => write!(f, "default"),
            Style::Redundant => write!(f, "redundant"),
            Style::Ref => write!(f, "ref"),
        }
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "problem" | "wp" => Ok(Style::Default),
            "redundant" | "advisory" => Ok(Style::Redundant),
            "ref" => Ok(Style::Ref),
            _ => Err(format!("Unknown style: {}", s)),
        }
    }
}

/// A finding bound to the feature it was found on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule ID that produced this diagnostic
    pub rule_id: String,
    /// Output layer
    pub layer: String,
    pub style: Style,
    /// Human-readable message
    pub message: String,
    /// Offending key
    pub key: Option<String>,
    /// Offending value, verbatim
    pub value: Option<String>,
    /// Way id
    pub feature_id: i64,
    /// Who last touched the way
    pub provenance: Provenance,
}

impl Diagnostic {
    /// Create a diagnostic from a rule finding
    pub fn from_finding(rule_id: &str, finding: &Finding, feature: &Feature) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            layer: finding.layer.to_string(),
            style: finding.style,
            message: finding.message(),
            key: finding.kind.key().map(String::from),
            value: finding.kind.value().map(String::from),
            feature_id: feature.id,
            provenance: feature.provenance.clone(),
        }
    }

    /// Replace the style (configured per rule)
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_redundant(&self) -> bool {
        self.style == Style::Redundant
    }
}
