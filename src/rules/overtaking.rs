//! Overtaking restrictions

use super::unknown_values;
use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::OVERTAKING_VALUES;

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "overtaking-value",
            Topic::Overtaking,
            &[layer::STRANGE],
            overtaking_value,
        )
        .with_description("Overtaking tags use known values"),
        Rule::new(
            "overtaking-default",
            Topic::Overtaking,
            &[layer::REDUNDANT],
            overtaking_default,
        )
        .with_description("Overtaking is allowed unless signposted"),
        Rule::new(
            "overtaking-both-directions",
            Topic::Overtaking,
            &[layer::WAYPROBLEMS],
            overtaking_both_directions,
        )
        .with_description("A restriction in both directions is tagged overtaking=no"),
        Rule::new(
            "overtaking-oneway-backward",
            Topic::Overtaking,
            &[layer::WAYPROBLEMS],
            overtaking_oneway_backward,
        )
        .with_description("A oneway road has no backward overtaking restriction"),
    ]
}

fn overtaking_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    unknown_values(
        ctx,
        &["overtaking", "overtaking:forward", "overtaking:backward"],
        &OVERTAKING_VALUES,
    )
}

fn overtaking_default(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.tags.has_value("overtaking", "yes") {
        return Vec::new();
    }

    vec![Finding::redundant(FindingKind::Redundant {
        tag: TagPair::new("overtaking", "yes"),
        context: None,
    })]
}

fn overtaking_both_directions(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.tags.has_value("overtaking:forward", "no")
        || !ctx.tags.has_value("overtaking:backward", "no")
    {
        return Vec::new();
    }

    vec![Finding::problem(FindingKind::Simplify {
        tags: vec![
            TagPair::new("overtaking:forward", "no"),
            TagPair::new("overtaking:backward", "no"),
        ],
        suggestion: "overtaking=no",
    })]
}

fn overtaking_oneway_backward(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.tags.has_value("oneway", "yes") {
        return Vec::new();
    }

    let backward = ctx.tag("overtaking:backward").or_else(|| {
        ctx.tag("overtaking")
            .filter(|tag| matches!(tag.value.as_str(), "backward" | "both"))
    });

    backward
        .map(|tag| {
            Finding::problem(FindingKind::Conflict {
                tag,
                other: TagPair::new("oneway", "yes"),
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
    fn test_overtaking_value() {
        assert!(run(overtaking_value, &[("highway", "primary"), ("overtaking", "caution")]).is_empty());
        let found = run(
            overtaking_value,
            &[("highway", "primary"), ("overtaking:forward", "hgv")],
        );
        assert_eq!(
            messages(&found),
            vec!["overtaking:forward=hgv is not a recognized value"]
        );
    }

    #[test]
    fn test_overtaking_default() {
        assert_eq!(
            messages(&run(overtaking_default, &[("highway", "primary"), ("overtaking", "yes")])),
            vec!["overtaking=yes is redundant"]
        );
    }

    #[test]
    fn test_both_directions() {
        let found = run(
            overtaking_both_directions,
            &[
                ("highway", "primary"),
                ("overtaking:forward", "no"),
                ("overtaking:backward", "no"),
            ],
        );
        assert_eq!(
            messages(&found),
            vec!["overtaking:forward=no and overtaking:backward=no should be overtaking=no"]
        );
    }

    #[test]
    fn test_oneway_backward() {
        let found = run(
            overtaking_oneway_backward,
            &[
                ("highway", "primary"),
                ("oneway", "yes"),
                ("overtaking", "both"),
            ],
        );
        assert_eq!(
            messages(&found),
            vec!["overtaking=both conflicts with oneway=yes"]
        );
        assert!(run(
            overtaking_oneway_backward,
            &[("highway", "primary"), ("oneway", "yes"), ("overtaking", "forward")]
        )
        .is_empty());
    }
}
