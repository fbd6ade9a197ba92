//! Class-specific rules for service roads, tracks, footways, living streets,
//! cycleways, bridleways and paths

use super::{default_permission, unknown_values};
use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::{
    CYCLEWAY_SELF_VALUES, CYCLEWAY_VALUES, FOOTWAY_REFINABLE_CLASSES, FOOTWAY_VALUES,
    SERVICE_VALUES, TRACKTYPE_VALUES,
};

const CYCLEWAY_KEYS: [&str; 4] = ["cycleway", "cycleway:left", "cycleway:right", "cycleway:both"];

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("service-name", Topic::Classes, &[layer::WAYPROBLEMS], service_name)
            .with_description("Service roads are private and carry no street name"),
        Rule::new("service-value", Topic::Classes, &[layer::STRANGE], service_value)
            .with_description("service=* uses a known value"),
        Rule::new(
            "service-misplaced",
            Topic::Classes,
            &[layer::WAYPROBLEMS],
            service_misplaced,
        )
        .with_description("service=* only refines highway=service"),
        Rule::new(
            "track-suspicious",
            Topic::Classes,
            &[layer::WAYPROBLEMS],
            track_suspicious,
        )
        .with_description("Tracks have neither street names nor speed limits"),
        Rule::new("tracktype-value", Topic::Classes, &[layer::STRANGE], tracktype_value)
            .with_description("tracktype is grade1 to grade5"),
        Rule::new(
            "tracktype-misplaced",
            Topic::Classes,
            &[layer::WAYPROBLEMS],
            tracktype_misplaced,
        )
        .with_description("tracktype only applies to highway=track"),
        Rule::new(
            "footway-bicycle-missing",
            Topic::Classes,
            &[layer::FOOTWAY],
            footway_bicycle_missing,
        )
        .with_description("Footways state whether cycling is allowed"),
        Rule::new("footway-foot", Topic::Classes, &[layer::FOOTWAY], footway_foot)
            .with_description("foot=yes on a footway is redundant, foot=no is broken"),
        Rule::new("footway-value", Topic::Classes, &[layer::FOOTWAY], footway_value)
            .with_description("footway=* uses a known value"),
        Rule::new(
            "footway-misplaced",
            Topic::Classes,
            &[layer::FOOTWAY],
            footway_misplaced,
        )
        .with_description("footway=* only refines footways and paths"),
        Rule::new(
            "living-street-access",
            Topic::Classes,
            &[layer::WAYPROBLEMS, layer::REDUNDANT],
            living_street_access,
        )
        .with_description("Living streets have walking pace and are open to all traffic"),
        Rule::new(
            "cycleway-access",
            Topic::Classes,
            &[layer::CYCLING, layer::WAYPROBLEMS],
            cycleway_access,
        )
        .with_description("Cycleways are for bicycles only"),
        Rule::new("cycleway-value", Topic::Classes, &[layer::CYCLING], cycleway_value)
            .with_description("cycleway=* and its per-side variants use known values"),
        Rule::new(
            "cycleway-tag-misplaced",
            Topic::Classes,
            &[layer::CYCLING],
            cycleway_tag_misplaced,
        )
        .with_description("cycleway=* describes lanes on roads, not the cycleway itself"),
        Rule::new(
            "bridleway-horse",
            Topic::Classes,
            &[layer::WAYPROBLEMS, layer::REDUNDANT],
            bridleway_horse,
        )
        .with_description("horse=yes on a bridleway is redundant, horse=no is broken"),
        Rule::new(
            "path-motor-vehicle",
            Topic::Classes,
            &[layer::WAYPROBLEMS],
            path_motor_vehicle,
        )
        .with_description("Paths are not open to motor vehicles"),
    ]
}

/// Tag meaningful only on one class, found on another
fn misplaced_unless(ctx: &RuleContext<'_>, key: &str, class: &str) -> Vec<Finding> {
    match ctx.tag(key) {
        Some(tag) if !ctx.is_class(class) => vec![Finding::problem(FindingKind::Misplaced {
            tag,
            class: ctx.highway.to_string(),
        })],
        _ => Vec::new(),
    }
}

fn service_name(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("service") {
        return Vec::new();
    }

    ctx.tag("name")
        .map(|tag| {
            Finding::problem(FindingKind::Suspicious {
                tag,
                context: ctx.class_tag(),
            })
            .with_hint("either public, e.g. not service, or name tag abuse")
        })
        .into_iter()
        .collect()
}

fn service_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    unknown_values(ctx, &["service"], &SERVICE_VALUES)
}

fn service_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    misplaced_unless(ctx, "service", "service")
}

fn track_suspicious(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("track") {
        return Vec::new();
    }

    ["name", "maxspeed"]
        .into_iter()
        .filter_map(|key| ctx.tag(key))
        .map(|tag| {
            Finding::problem(FindingKind::Suspicious {
                tag,
                context: ctx.class_tag(),
            })
            .with_hint("probably not a track")
        })
        .collect()
}

fn tracktype_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    unknown_values(ctx, &["tracktype"], &TRACKTYPE_VALUES)
}

fn tracktype_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    misplaced_unless(ctx, "tracktype", "track")
}

fn footway_bicycle_missing(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("footway") || ctx.tags.has("bicycle") {
        return Vec::new();
    }

    vec![Finding::problem(FindingKind::Missing {
        key: "bicycle".to_string(),
        context: ctx.class_tag(),
    })
    .in_layer(layer::FOOTWAY)
    .with_hint("state bicycle=yes or bicycle=no")]
}

fn footway_foot(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("footway") {
        return Vec::new();
    }

    default_permission(ctx, "foot")
        .map(|finding| finding.in_layer(layer::FOOTWAY))
        .into_iter()
        .collect()
}

fn footway_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    unknown_values(ctx, &["footway"], &FOOTWAY_VALUES)
        .into_iter()
        .map(|finding| finding.in_layer(layer::FOOTWAY))
        .collect()
}

fn footway_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    match ctx.tag("footway") {
        Some(tag) if !FOOTWAY_REFINABLE_CLASSES.contains(ctx.highway) => {
            vec![Finding::problem(FindingKind::Misplaced {
                tag,
                class: ctx.highway.to_string(),
            })
            .in_layer(layer::FOOTWAY)]
        }
        _ => Vec::new(),
    }
}

fn living_street_access(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("living_street") {
        return Vec::new();
    }

    let mut findings: Vec<Finding> = ctx
        .tag("maxspeed")
        .map(|tag| {
            Finding::problem(FindingKind::Misplaced {
                tag,
                class: ctx.highway.to_string(),
            })
            .with_hint("neither numeric nor walk is correct")
        })
        .into_iter()
        .collect();

    findings.extend(
        ["bicycle", "foot", "vehicle"]
            .into_iter()
            .filter_map(|key| default_permission(ctx, key)),
    );
    findings
}

fn cycleway_access(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("cycleway") {
        return Vec::new();
    }

    let context = Some(ctx.class_tag());
    let mut broken = Vec::new();
    let mut findings = Vec::new();

    if let Some(tag) = ctx.tag("bicycle") {
        if ctx.tags.is_truthy("bicycle") {
            findings.push(
                Finding::redundant(FindingKind::Redundant {
                    tag,
                    context: context.clone(),
                })
                .in_layer(layer::CYCLING),
            );
        } else if ctx.tags.is_falsy("bicycle") {
            broken.push(Finding::problem(FindingKind::Broken {
                tag,
                context: context.clone(),
            }));
        }
    }

    let vehicle_hint = match ctx.tags.get("vehicle") {
        Some("yes") => Some("not a cycleway then"),
        Some("no") => Some("bicycle is a vehicle"),
        _ => None,
    };
    if let (Some(hint), Some(tag)) = (vehicle_hint, ctx.tag("vehicle")) {
        broken.push(Finding::problem(FindingKind::Broken { tag, context }).with_hint(hint));
    }

    // Broken cycleways show up in the cycling layer and the catch-all layer
    for finding in broken {
        findings.push(finding.clone().in_layer(layer::CYCLING));
        findings.push(finding);
    }
    findings
}

fn cycleway_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    unknown_values(ctx, &CYCLEWAY_KEYS, &CYCLEWAY_VALUES)
        .into_iter()
        .map(|finding| finding.in_layer(layer::CYCLING))
        .collect()
}

fn cycleway_tag_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("cycleway") {
        return Vec::new();
    }

    CYCLEWAY_KEYS
        .into_iter()
        .filter_map(|key| ctx.tag(key))
        .filter(|tag| !(tag.key == "cycleway" && CYCLEWAY_SELF_VALUES.contains(&tag.value)))
        .map(|tag| {
            Finding::problem(FindingKind::Misplaced {
                tag,
                class: ctx.highway.to_string(),
            })
            .in_layer(layer::CYCLING)
        })
        .collect()
}

fn bridleway_horse(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("bridleway") {
        return Vec::new();
    }
    default_permission(ctx, "horse").into_iter().collect()
}

fn path_motor_vehicle(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.is_class("path") || !ctx.tags.is_truthy("motor_vehicle") {
        return Vec::new();
    }

    ctx.tag("motor_vehicle")
        .map(|tag| {
            Finding::problem(FindingKind::Broken {
                tag,
                context: Some(TagPair::new("highway", "path")),
            })
        })
        .into_iter()
        .collect()
}
