//! Sidewalk and segregation rules

use super::unknown_values;
use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::{
    SEGREGATED_CLASSES, SEGREGATED_VALUES, SIDEWALK_EXCLUDED_CLASSES, SIDEWALK_SIDE_VALUES,
    SIDEWALK_VALUES,
};

const SIDE_KEYS: [&str; 3] = ["sidewalk:left", "sidewalk:right", "sidewalk:both"];

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("sidewalk-value", Topic::Sidewalk, &[layer::STRANGE], sidewalk_value)
            .with_description("Sidewalk tags use known values"),
        Rule::new(
            "sidewalk-misplaced",
            Topic::Sidewalk,
            &[layer::FOOTWAY],
            sidewalk_misplaced,
        )
        .with_description("Footways, paths and tracks do not have sidewalks of their own"),
        Rule::new(
            "sidewalk-side-conflict",
            Topic::Sidewalk,
            &[layer::FOOTWAY],
            sidewalk_side_conflict,
        )
        .with_description("sidewalk=both|left|right|no agrees with the per-side sidewalk tags"),
        Rule::new(
            "segregated-misplaced",
            Topic::Sidewalk,
            &[layer::CYCLING],
            segregated_misplaced,
        )
        .with_description("segregated only applies to footways, cycleways, paths and bridleways"),
        Rule::new(
            "segregated-value",
            Topic::Sidewalk,
            &[layer::STRANGE],
            segregated_value,
        )
        .with_description("segregated is yes or no"),
        Rule::new(
            "path-segregated-missing",
            Topic::Sidewalk,
            &[layer::CYCLING],
            path_segregated_missing,
        )
        .with_description("Shared foot and cycle paths state whether they are segregated"),
    ]
}

fn sidewalk_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let mut findings = unknown_values(ctx, &["sidewalk"], &SIDEWALK_VALUES);
    findings.extend(unknown_values(ctx, &SIDE_KEYS, &SIDEWALK_SIDE_VALUES));
    findings
}

fn sidewalk_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !SIDEWALK_EXCLUDED_CLASSES.contains(ctx.highway) {
        return Vec::new();
    }

    std::iter::once("sidewalk")
        .chain(SIDE_KEYS)
        .filter_map(|key| ctx.tag(key))
        .map(|tag| {
            Finding::problem(FindingKind::Misplaced {
                tag,
                class: ctx.highway.to_string(),
            })
            .in_layer(layer::FOOTWAY)
        })
        .collect()
}

/// Whether `sidewalk=<value>` puts a sidewalk on the left and right side
fn implied_sides(value: &str) -> Option<(bool, bool)> {
    match value {
        "both" => Some((true, true)),
        "left" => Some((true, false)),
        "right" => Some((false, true)),
        "no" => Some((false, false)),
        _ => None,
    }
}

fn sidewalk_side_conflict(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(overall) = ctx.tag("sidewalk") else {
        return Vec::new();
    };
    let Some((left, right)) = implied_sides(&overall.value) else {
        return Vec::new();
    };

    SIDE_KEYS
        .into_iter()
        .filter_map(|key| {
            let side = ctx.tag(key)?;
            let stated = match side.value.as_str() {
                "yes" => true,
                "no" => false,
                _ => return None,
            };
            let implied = match key {
                "sidewalk:left" => left,
                "sidewalk:right" => right,
                _ if left == right => left,
                _ => !stated,
            };
            (stated != implied).then(|| {
                Finding::problem(FindingKind::Conflict {
                    tag: side,
                    other: overall.clone(),
                })
                .in_layer(layer::FOOTWAY)
            })
        })
        .collect()
}

fn segregated_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    match ctx.tag("segregated") {
        Some(tag) if !SEGREGATED_CLASSES.contains(ctx.highway) => {
            vec![Finding::problem(FindingKind::Misplaced {
                tag,
                class: ctx.highway.to_string(),
            })
            .in_layer(layer::CYCLING)]
        }
        _ => Vec::new(),
    }
}

fn segregated_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    unknown_values(ctx, &["segregated"], &SEGREGATED_VALUES)
}

fn path_segregated_missing(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let shared = matches!(ctx.highway, "path" | "cycleway" | "footway")
        && ctx.tags.has_value("foot", "designated")
        && ctx.tags.has_value("bicycle", "designated");
    if !shared || ctx.tags.has("segregated") {
        return Vec::new();
    }

    vec![Finding::problem(FindingKind::Missing {
        key: "segregated".to_string(),
        context: TagPair::new("highway", ctx.highway),
    })
    .in_layer(layer::CYCLING)]
}
