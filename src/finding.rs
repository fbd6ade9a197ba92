//! Structured rule findings and their message rendering
//!
//! Rules never format messages themselves. They describe what they found
//! (which tag, which kind of problem, which bound or context) and
//! [`Finding::message`] renders the human-readable text. Every rendered
//! message contains the offending value exactly as it appeared in the tag.

use crate::diagnostic::Style;
use crate::layer;
use std::fmt;

/// A `key=value` pair quoted in a finding
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagPair {
    pub key: String,
    pub value: String,
}

impl TagPair {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for TagPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// What a rule found
#[derive(Debug, Clone, PartialEq)]
pub enum FindingKind {
    /// The tag restates the default, optionally for a given context
    Redundant {
        tag: TagPair,
        context: Option<TagPair>,
    },
    /// The tag cannot be right, optionally in a given context
    Broken {
        tag: TagPair,
        context: Option<TagPair>,
    },
    /// Two tags cannot both hold
    Conflict { tag: TagPair, other: TagPair },
    /// The tag is legal but hints at a misclassification
    Suspicious { tag: TagPair, context: TagPair },
    /// The tag is meaningless for this road class
    Misplaced { tag: TagPair, class: String },
    /// A tag the context calls for is absent
    Missing { key: String, context: TagPair },
    /// Several tags should be collapsed into one
    Simplify {
        tags: Vec<TagPair>,
        suggestion: &'static str,
    },
    /// The tag is not used in the target regulatory model
    NotInUse { tag: TagPair },
    /// The tag contradicts the road traffic regulations
    NotConform { tag: TagPair },
    /// The tag belongs on a node rather than on a way
    NodeTag { tag: TagPair },
    /// The value is outside the key's vocabulary
    UnknownValue { tag: TagPair },
    /// One token of a delimited value is outside the vocabulary
    UnknownToken { tag: TagPair, token: String },
    NotAnInteger { tag: TagPair },
    NotANumber { tag: TagPair },
    TooHigh { tag: TagPair, max: String },
    TooLow { tag: TagPair, min: String },
    /// A total disagrees with the sum of its parts
    SumMismatch {
        total: TagPair,
        parts: Vec<TagPair>,
        sum: i64,
    },
    /// A per-lane value has a different number of lanes than the lane count
    TokenCount {
        tag: TagPair,
        tokens: usize,
        count: TagPair,
    },
}

impl FindingKind {
    /// The tag the finding is primarily about, if any
    pub fn subject(&self) -> Option<&TagPair> {
        match self {
            FindingKind::Redundant { tag, .. }
            | FindingKind::Broken { tag, .. }
            | FindingKind::Conflict { tag, .. }
            | FindingKind::Suspicious { tag, .. }
            | FindingKind::Misplaced { tag, .. }
            | FindingKind::NotInUse { tag }
            | FindingKind::NotConform { tag }
            | FindingKind::NodeTag { tag }
            | FindingKind::UnknownValue { tag }
            | FindingKind::UnknownToken { tag, .. }
            | FindingKind::NotAnInteger { tag }
            | FindingKind::NotANumber { tag }
            | FindingKind::TooHigh { tag, .. }
            | FindingKind::TooLow { tag, .. }
            | FindingKind::TokenCount { tag, .. } => Some(tag),
            FindingKind::SumMismatch { total, .. } => Some(total),
            FindingKind::Simplify { tags, .. } => tags.first(),
            FindingKind::Missing { .. } => None,
        }
    }

    /// Key the finding is about; for missing tags this is the absent key
    pub fn key(&self) -> Option<&str> {
        match self {
            FindingKind::Missing { key, .. } => Some(key.as_str()),
            other => other.subject().map(|t| t.key.as_str()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.subject().map(|t| t.value.as_str())
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::Redundant { tag, context: None } => write!(f, "{tag} is redundant"),
            FindingKind::Redundant {
                tag,
                context: Some(ctx),
            } => write!(f, "{ctx} with {tag} is redundant"),
            FindingKind::Broken { tag, context: None } => write!(f, "{tag} is broken"),
            FindingKind::Broken {
                tag,
                context: Some(ctx),
            } => write!(f, "{ctx} with {tag} is broken"),
            FindingKind::Conflict { tag, other } => write!(f, "{tag} conflicts with {other}"),
            FindingKind::Suspicious { tag, context } => {
                write!(f, "{context} with {tag} is suspicious")
            }
            FindingKind::Misplaced { tag, class } => {
                write!(f, "{tag} is not applicable on highway={class}")
            }
            FindingKind::Missing { key, context } => write!(f, "{context} without {key} tag"),
            FindingKind::Simplify { tags, suggestion } => {
                let joined: Vec<String> = tags.iter().map(ToString::to_string).collect();
                write!(f, "{} should be {suggestion}", joined.join(" and "))
            }
            FindingKind::NotInUse { tag } => write!(f, "{tag} is not in use"),
            FindingKind::NotConform { tag } => write!(f, "{tag} is not StVO conform"),
            FindingKind::NodeTag { tag } => write!(f, "{tag} belongs on a node, not on a way"),
            FindingKind::UnknownValue { tag } => write!(f, "{tag} is not a recognized value"),
            FindingKind::UnknownToken { tag, token } => {
                write!(f, "{tag} contains unrecognized token '{token}'")
            }
            FindingKind::NotAnInteger { tag } => write!(f, "{tag} is not an integer"),
            FindingKind::NotANumber { tag } => write!(f, "{tag} is not a number"),
            FindingKind::TooHigh { tag, max } => {
                write!(f, "{tag} is implausibly high (maximum {max})")
            }
            FindingKind::TooLow { tag, min } => {
                write!(f, "{tag} is implausibly low (minimum {min})")
            }
            FindingKind::SumMismatch { total, parts, sum } => {
                let joined: Vec<String> = parts.iter().map(ToString::to_string).collect();
                write!(f, "{total} does not match {} = {sum}", joined.join(" + "))
            }
            FindingKind::TokenCount { tag, tokens, count } => {
                write!(f, "{tag} describes {tokens} lanes but {count}")
            }
        }
    }
}

/// One finding produced by a rule, not yet tied to a feature
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Layer the finding is reported in
    pub layer: &'static str,
    pub style: Style,
    pub kind: FindingKind,
    /// Short explanation appended to the message
    pub hint: Option<&'static str>,
}

impl Finding {
    pub fn new(layer: &'static str, style: Style, kind: FindingKind) -> Self {
        Self {
            layer,
            style,
            kind,
            hint: None,
        }
    }

    /// Hard problem in the catch-all layer
    pub fn problem(kind: FindingKind) -> Self {
        Self::new(layer::WAYPROBLEMS, Style::Default, kind)
    }

    /// Advisory finding in the redundant layer
    pub fn redundant(kind: FindingKind) -> Self {
        Self::new(layer::REDUNDANT, Style::Redundant, kind)
    }

    /// Unrecognized value in the strange layer
    pub fn strange(kind: FindingKind) -> Self {
        Self::new(layer::STRANGE, Style::Default, kind)
    }

    /// Road number finding in the ref layer
    pub fn reference(kind: FindingKind) -> Self {
        Self::new(layer::REF, Style::Ref, kind)
    }

    /// Move the finding to another layer, keeping its style
    pub fn in_layer(mut self, layer: &'static str) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Rendered, human-readable message
    pub fn message(&self) -> String {
        match self.hint {
            Some(hint) => format!("{} - {}", self.kind, hint),
            None => self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redundant_rendering() {
        let plain = FindingKind::Redundant {
            tag: TagPair::new("oneway", "no"),
            context: None,
        };
        assert_eq!(plain.to_string(), "oneway=no is redundant");

        let in_context = FindingKind::Redundant {
            tag: TagPair::new("foot", "yes"),
            context: Some(TagPair::new("highway", "footway")),
        };
        assert_eq!(
            in_context.to_string(),
            "highway=footway with foot=yes is redundant"
        );
    }

    #[test]
    fn test_message_with_hint() {
        let finding = Finding::problem(FindingKind::Misplaced {
            tag: TagPair::new("maxspeed", "30"),
            class: "living_street".to_string(),
        })
        .with_hint("neither numeric nor walk is correct");
        assert_eq!(
            finding.message(),
            "maxspeed=30 is not applicable on highway=living_street - neither numeric nor walk is correct"
        );
    }

    #[test]
    fn test_sum_mismatch_names_both_sides() {
        let kind = FindingKind::SumMismatch {
            total: TagPair::new("lanes", "4"),
            parts: vec![
                TagPair::new("lanes:forward", "2"),
                TagPair::new("lanes:backward", "1"),
            ],
            sum: 3,
        };
        assert_eq!(
            kind.to_string(),
            "lanes=4 does not match lanes:forward=2 + lanes:backward=1 = 3"
        );
    }

    #[test]
    fn test_token_count() {
        let kind = FindingKind::TokenCount {
            tag: TagPair::new("turn:lanes", "left|through"),
            tokens: 2,
            count: TagPair::new("lanes", "3"),
        };
        assert_eq!(
            kind.to_string(),
            "turn:lanes=left|through describes 2 lanes but lanes=3"
        );
    }

    #[test]
    fn test_key_and_value() {
        let missing = FindingKind::Missing {
            key: "bicycle".to_string(),
            context: TagPair::new("highway", "footway"),
        };
        assert_eq!(missing.key(), Some("bicycle"));
        assert_eq!(missing.value(), None);

        let unknown = FindingKind::UnknownValue {
            tag: TagPair::new("sidewalk", "Both "),
        };
        assert_eq!(unknown.key(), Some("sidewalk"));
        assert_eq!(unknown.value(), Some("Both "));
        assert!(unknown.to_string().contains("sidewalk=Both "));
    }

    #[test]
    fn test_constructors_pick_layer_and_style() {
        let tag = TagPair::new("ref", "A7");
        let finding = Finding::reference(FindingKind::UnknownValue { tag: tag.clone() });
        assert_eq!(finding.layer, layer::REF);
        assert_eq!(finding.style, Style::Ref);

        let moved = Finding::problem(FindingKind::UnknownValue { tag }).in_layer(layer::CYCLING);
        assert_eq!(moved.layer, layer::CYCLING);
        assert_eq!(moved.style, Style::Default);
    }
}
