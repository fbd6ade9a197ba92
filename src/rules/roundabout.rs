//! Roundabout rules

use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "roundabout-name",
            Topic::Roundabout,
            &[layer::WAYPROBLEMS],
            roundabout_name,
        )
        .with_description("Roundabouts carry no street name"),
        Rule::new(
            "roundabout-ref",
            Topic::Roundabout,
            &[layer::WAYPROBLEMS],
            roundabout_ref,
        )
        .with_description("Roundabouts carry no road number"),
        Rule::new(
            "roundabout-oneway",
            Topic::Roundabout,
            &[layer::REDUNDANT],
            roundabout_oneway,
        )
        .with_description("Roundabouts are oneway by definition"),
    ]
}

fn roundabout() -> TagPair {
    TagPair::new("junction", "roundabout")
}

fn suspicious_on_roundabout(ctx: &RuleContext<'_>, key: &str) -> Vec<Finding> {
    if !ctx.tags.has_value("junction", "roundabout") {
        return Vec::new();
    }

    ctx.tag(key)
        .map(|tag| {
            Finding::problem(FindingKind::Suspicious {
                tag,
                context: roundabout(),
            })
            .with_hint("most likely an error")
        })
        .into_iter()
        .collect()
}

fn roundabout_name(ctx: &RuleContext<'_>) -> Vec<Finding> {
    suspicious_on_roundabout(ctx, "name")
}

fn roundabout_ref(ctx: &RuleContext<'_>) -> Vec<Finding> {
    suspicious_on_roundabout(ctx, "ref")
}

fn roundabout_oneway(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.tags.has_value("junction", "roundabout") {
        return Vec::new();
    }

    ctx.tag("oneway")
        .map(|tag| {
            Finding::redundant(FindingKind::Redundant {
                tag,
                context: Some(roundabout()),
            })
        })
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{messages, run};

    #[test]
    fn test_roundabout_name_and_ref() {
        let pairs = [
            ("highway", "primary"),
            ("junction", "roundabout"),
            ("name", "Kreisel"),
            ("ref", "B 3"),
        ];
        assert_eq!(
            messages(&run(roundabout_name, &pairs)),
            vec!["junction=roundabout with name=Kreisel is suspicious - most likely an error"]
        );
        assert_eq!(run(roundabout_ref, &pairs).len(), 1);
        assert!(run(roundabout_name, &[("highway", "primary"), ("name", "Hauptstr")]).is_empty());
    }

    #[test]
    fn test_roundabout_oneway_any_value() {
        for value in ["yes", "no", "-1"] {
            let found = run(
                roundabout_oneway,
                &[
                    ("highway", "tertiary"),
                    ("junction", "roundabout"),
                    ("oneway", value),
                ],
            );
            assert_eq!(
                messages(&found),
                vec![format!("junction=roundabout with oneway={value} is redundant")]
            );
        }
    }
}
