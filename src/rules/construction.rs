//! Construction and proposed ways

use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::HIGHWAY_CLASSES;

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "construction-missing-class",
            Topic::Construction,
            &[layer::WAYPROBLEMS],
            construction_missing_class,
        )
        .with_description("highway=construction names the class being built"),
        Rule::new(
            "construction-class-value",
            Topic::Construction,
            &[layer::STRANGE],
            construction_class_value,
        )
        .with_description("The class under construction is a known highway class"),
        Rule::new(
            "construction-on-open-road",
            Topic::Construction,
            &[layer::WAYPROBLEMS],
            construction_on_open_road,
        )
        .with_description("A road under construction is tagged highway=construction"),
        Rule::new(
            "proposed-missing-class",
            Topic::Construction,
            &[layer::WAYPROBLEMS],
            proposed_missing_class,
        )
        .with_description("highway=proposed names the planned class"),
        Rule::new(
            "proposed-class-value",
            Topic::Construction,
            &[layer::STRANGE],
            proposed_class_value,
        )
        .with_description("The planned class is a known highway class"),
    ]
}

/// `highway=<state>` without a `<state>=<class>` refinement
fn missing_class(ctx: &RuleContext<'_>, state: &str) -> Vec<Finding> {
    if !ctx.is_class(state) || ctx.tags.has(state) {
        return Vec::new();
    }

    vec![Finding::problem(FindingKind::Missing {
        key: state.to_string(),
        context: ctx.class_tag(),
    })]
}

/// `<state>=<class>` naming something that is not a buildable class
fn class_value(ctx: &RuleContext<'_>, state: &str) -> Vec<Finding> {
    if !ctx.is_class(state) {
        return Vec::new();
    }
    let Some(value) = ctx.tags.get(state) else {
        return Vec::new();
    };
    if HIGHWAY_CLASSES.contains(value) && !matches!(value, "construction" | "proposed") {
        return Vec::new();
    }

    vec![Finding::strange(FindingKind::UnknownValue {
        tag: TagPair::new(state, value),
    })]
}

fn construction_missing_class(ctx: &RuleContext<'_>) -> Vec<Finding> {
    missing_class(ctx, "construction")
}

fn construction_class_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    class_value(ctx, "construction")
}

fn construction_on_open_road(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if ctx.is_class("construction") || !ctx.tags.is_truthy("construction") {
        return Vec::new();
    }

    ctx.tag("construction")
        .map(|tag| {
            Finding::problem(FindingKind::Suspicious {
                tag,
                context: ctx.class_tag(),
            })
            .with_hint("use highway=construction with construction=<class>")
        })
        .into_iter()
        .collect()
}

fn proposed_missing_class(ctx: &RuleContext<'_>) -> Vec<Finding> {
    missing_class(ctx, "proposed")
}

fn proposed_class_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    class_value(ctx, "proposed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{messages, run};

    #[test]
    fn test_construction_missing_class() {
        let found = run(construction_missing_class, &[("highway", "construction")]);
        assert_eq!(
            messages(&found),
            vec!["highway=construction without construction tag"]
        );
        assert!(run(
            construction_missing_class,
            &[("highway", "construction"), ("construction", "primary")]
        )
        .is_empty());
    }

    #[test]
    fn test_construction_class_value() {
        let found = run(
            construction_class_value,
            &[("highway", "construction"), ("construction", "Primary")],
        );
        assert_eq!(
            messages(&found),
            vec!["construction=Primary is not a recognized value"]
        );

        let found = run(
            construction_class_value,
            &[("highway", "construction"), ("construction", "construction")],
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_construction_on_open_road() {
        let found = run(
            construction_on_open_road,
            &[("highway", "secondary"), ("construction", "yes")],
        );
        assert_eq!(
            messages(&found),
            vec!["highway=secondary with construction=yes is suspicious - use highway=construction with construction=<class>"]
        );
        assert!(run(
            construction_on_open_road,
            &[("highway", "secondary"), ("construction", "no")]
        )
        .is_empty());
    }

    #[test]
    fn test_proposed() {
        assert_eq!(run(proposed_missing_class, &[("highway", "proposed")]).len(), 1);
        assert!(run(
            proposed_class_value,
            &[("highway", "proposed"), ("proposed", "motorway")]
        )
        .is_empty());
        let found = run(
            proposed_class_value,
            &[("highway", "proposed"), ("proposed", "bus_stop")],
        );
        assert_eq!(messages(&found), vec!["proposed=bus_stop is not a recognized value"]);
    }
}
