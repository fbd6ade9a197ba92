//! Access permission rules
//!
//! The checks follow the German road traffic regulations (StVO): vehicle
//! includes bicycles, motor_vehicle splits into motorcycle, motorcar and hgv,
//! and public roads are open to everyone unless signposted otherwise.

use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::{
    ACCESS_MODES, ACCESS_VALUES, MOTOR_VEHICLE_HIGHWAYS, PUBLIC_HIGHWAYS, RESTRICTIVE_ACCESS,
};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "public-restrictive-access",
            Topic::Access,
            &[layer::WAYPROBLEMS],
            public_restrictive_access,
        )
        .with_description("Public roads carry no permissive, private or customers access"),
        Rule::new("access-value", Topic::Access, &[layer::STRANGE], access_value)
            .with_description("Access tags use known values"),
        Rule::new("goods-not-used", Topic::Access, &[layer::WAYPROBLEMS], goods_not_used)
            .with_description("goods is not distinguished from hgv"),
        Rule::new(
            "access-not-conform",
            Topic::Access,
            &[layer::WAYPROBLEMS, layer::REDUNDANT],
            access_not_conform,
        )
        .with_description("access=no and access=destination have no traffic sign equivalent"),
        Rule::new(
            "vehicle-hierarchy",
            Topic::Access,
            &[layer::WAYPROBLEMS, layer::REDUNDANT],
            vehicle_hierarchy,
        )
        .with_description("vehicle and motor_vehicle do not restate or invert each other"),
        Rule::new(
            "motor-vehicle-hierarchy",
            Topic::Access,
            &[layer::WAYPROBLEMS, layer::REDUNDANT],
            motor_vehicle_hierarchy,
        )
        .with_description("motor_vehicle and its sub-modes do not restate or invert each other"),
        Rule::new(
            "motorway-access",
            Topic::Access,
            &[layer::WAYPROBLEMS, layer::REDUNDANT],
            motorway_access,
        )
        .with_description("Motorways are closed to bicycles, pedestrians, horses and mopeds"),
        Rule::new(
            "use-sidepath-misplaced",
            Topic::Access,
            &[layer::CYCLING],
            use_sidepath_misplaced,
        )
        .with_description("bicycle=use_sidepath only applies to roads with motor traffic"),
    ]
}

fn public_restrictive_access(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !PUBLIC_HIGHWAYS.contains(ctx.highway) {
        return Vec::new();
    }

    ACCESS_MODES
        .values()
        .iter()
        .filter(|key| ctx.tags.in_set(key, &RESTRICTIVE_ACCESS))
        .filter_map(|key| ctx.tag(key))
        .map(|tag| {
            Finding::problem(FindingKind::Conflict {
                tag,
                other: ctx.class_tag(),
            })
            .with_hint("public highway cant have restrictive access tags")
        })
        .collect()
}

fn access_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    ACCESS_MODES
        .values()
        .iter()
        .filter_map(|key| {
            let value = ctx.tags.get(key)?;
            let known = value
                .split(';')
                .map(str::trim)
                .all(|part| ACCESS_VALUES.contains(part));
            (!known).then(|| {
                Finding::strange(FindingKind::UnknownValue {
                    tag: TagPair::new(key, value),
                })
            })
        })
        .collect()
}

fn goods_not_used(ctx: &RuleContext<'_>) -> Vec<Finding> {
    ctx.tag("goods")
        .map(|tag| {
            Finding::problem(FindingKind::NotInUse { tag })
                .with_hint("no distinction between goods and hgv in Germany")
        })
        .into_iter()
        .collect()
}

fn access_not_conform(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(tag) = ctx.tag("access") else {
        return Vec::new();
    };

    let finding = if ctx.tags.is_falsy("access") {
        Finding::problem(FindingKind::NotConform { tag })
            .with_hint("probably motor_vehicle=no or vehicle=no")
    } else if ctx.tags.has_value("access", "destination") {
        Finding::problem(FindingKind::NotConform { tag })
            .with_hint("probably vehicle=destination or motor_vehicle=destination")
    } else if ctx.tags.is_truthy("access") {
        Finding::redundant(FindingKind::Redundant { tag, context: None })
    } else {
        return Vec::new();
    };
    vec![finding]
}

/// General mode truthy with a sub-mode either inverted or restated
fn hierarchy(
    ctx: &RuleContext<'_>,
    parent: &str,
    child: &str,
    suggestion: &'static str,
) -> Option<Finding> {
    if !ctx.tags.is_truthy(parent) {
        return None;
    }
    let parent_tag = ctx.tag(parent)?;
    let child_tag = ctx.tag(child)?;

    if ctx.tags.is_falsy(child) {
        Some(Finding::problem(FindingKind::Simplify {
            tags: vec![parent_tag, child_tag],
            suggestion,
        }))
    } else if ctx.tags.is_truthy(child) {
        Some(Finding::redundant(FindingKind::Redundant {
            tag: child_tag,
            context: Some(parent_tag),
        }))
    } else {
        None
    }
}

fn vehicle_hierarchy(ctx: &RuleContext<'_>) -> Vec<Finding> {
    hierarchy(ctx, "vehicle", "motor_vehicle", "bicycle")
        .into_iter()
        .collect()
}

fn motor_vehicle_hierarchy(ctx: &RuleContext<'_>) -> Vec<Finding> {
    [
        ("motorcycle", "motorcar + hgv"),
        ("motorcar", "motorcycle"),
        ("hgv", "motorcar"),
    ]
    .into_iter()
    .filter_map(|(child, suggestion)| hierarchy(ctx, "motor_vehicle", child, suggestion))
    .collect()
}

fn motorway_access(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !matches!(ctx.highway, "motorway" | "motorway_link") {
        return Vec::new();
    }

    ["bicycle", "foot", "horse", "mofa", "moped"]
        .into_iter()
        .filter_map(|key| {
            let tag = ctx.tag(key)?;
            let context = Some(ctx.class_tag());
            if ctx.tags.is_truthy(key) {
                Some(Finding::problem(FindingKind::Broken { tag, context }))
            } else if ctx.tags.is_falsy(key) {
                Some(Finding::redundant(FindingKind::Redundant { tag, context }))
            } else {
                None
            }
        })
        .collect()
}

fn use_sidepath_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.tags.has_value("bicycle", "use_sidepath") || MOTOR_VEHICLE_HIGHWAYS.contains(ctx.highway)
    {
        return Vec::new();
    }

    vec![Finding::problem(FindingKind::Misplaced {
        tag: TagPair::new("bicycle", "use_sidepath"),
        class: ctx.highway.to_string(),
    })
    .in_layer(layer::CYCLING)]
}
