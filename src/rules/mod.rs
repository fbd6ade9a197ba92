//! Built-in rule catalog
//!
//! Rules are grouped by topic, one module per topic. Each module exposes a
//! `rules()` list; [`builtin_rules`] concatenates them in a fixed order.
//! Rules are independent: none reads another rule's output.

mod access;
mod classes;
mod construction;
mod defaults;
mod dimensions;
mod lanes;
mod overtaking;
mod reference;
mod roundabout;
mod sidewalk;
mod speed;
mod stray;
mod structure;

use crate::finding::{Finding, FindingKind, TagPair};
use crate::rule::{Rule, RuleContext};
use crate::vocabulary::Vocabulary;

/// Get all built-in rules
pub fn builtin_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(reference::rules());
    rules.extend(speed::rules());
    rules.extend(dimensions::rules());
    rules.extend(lanes::rules());
    rules.extend(sidewalk::rules());
    rules.extend(access::rules());
    rules.extend(construction::rules());
    rules.extend(classes::rules());
    rules.extend(roundabout::rules());
    rules.extend(stray::rules());
    rules.extend(overtaking::rules());
    rules.extend(structure::rules());
    rules.extend(defaults::rules());
    rules
}

/// Bounds check for an already parsed integer
fn int_bounds(tag: TagPair, n: i64, min: i64, max: i64) -> Option<Finding> {
    if n < min {
        Some(Finding::problem(FindingKind::TooLow {
            tag,
            min: min.to_string(),
        }))
    } else if n > max {
        Some(Finding::problem(FindingKind::TooHigh {
            tag,
            max: max.to_string(),
        }))
    } else {
        None
    }
}

/// Bounds check for an already parsed decimal
fn float_bounds(tag: TagPair, n: f64, min: f64, max: f64) -> Option<Finding> {
    if n < min {
        Some(Finding::problem(FindingKind::TooLow {
            tag,
            min: min.to_string(),
        }))
    } else if n > max {
        Some(Finding::problem(FindingKind::TooHigh {
            tag,
            max: max.to_string(),
        }))
    } else {
        None
    }
}

/// Vocabulary check over several keys, reported into the strange layer
fn unknown_values(ctx: &RuleContext<'_>, keys: &[&str], vocabulary: &Vocabulary) -> Vec<Finding> {
    keys.iter()
        .filter_map(|key| {
            let value = ctx.tags.get(key)?;
            if vocabulary.contains(value) {
                return None;
            }
            Some(Finding::strange(FindingKind::UnknownValue {
                tag: TagPair::new(key, value),
            }))
        })
        .collect()
}

/// Truthy value is redundant, falsy value is broken, both in the class context
fn default_permission(ctx: &RuleContext<'_>, key: &str) -> Option<Finding> {
    let tag = ctx.tag(key)?;
    let context = Some(ctx.class_tag());
    if ctx.tags.is_truthy(key) {
        Some(Finding::redundant(FindingKind::Redundant { tag, context }))
    } else if ctx.tags.is_falsy(key) {
        Some(Finding::problem(FindingKind::Broken { tag, context }))
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerRegistry;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_unique() {
        let mut seen = HashSet::new();
        for rule in builtin_rules() {
            assert!(seen.insert(rule.id), "duplicate rule id {}", rule.id);
        }
    }

    #[test]
    fn test_rules_documented_and_layered() {
        let registry = LayerRegistry::standard();
        for rule in builtin_rules() {
            assert!(!rule.description.is_empty(), "{} lacks a description", rule.id);
            assert!(!rule.layers.is_empty(), "{} declares no layer", rule.id);
            for layer in rule.layers {
                assert!(registry.contains(layer), "{} uses unknown layer {layer}", rule.id);
            }
        }
    }

    #[test]
    fn test_int_bounds() {
        let tag = TagPair::new("lanes", "0");
        assert!(matches!(
            int_bounds(tag.clone(), 0, 1, 8).map(|f| f.kind),
            Some(FindingKind::TooLow { .. })
        ));
        assert!(int_bounds(tag.clone(), 4, 1, 8).is_none());
        assert!(matches!(
            int_bounds(tag, 9, 1, 8).map(|f| f.kind),
            Some(FindingKind::TooHigh { .. })
        ));
    }

    #[test]
    fn test_float_bounds_renders_bound() {
        let finding = float_bounds(TagPair::new("maxheight", "1.2"), 1.2, 1.8, 6.0).unwrap();
        assert_eq!(
            finding.message(),
            "maxheight=1.2 is implausibly low (minimum 1.8)"
        );
    }
}
