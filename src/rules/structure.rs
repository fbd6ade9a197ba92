//! Bridges, tunnels, embankments, cuttings and layers

use super::{int_bounds, unknown_values};
use crate::finding::{Finding, FindingKind};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::tags::parse_int;
use crate::vocabulary::{BRIDGE_VALUES, EARTHWORK_VALUES, TUNNEL_VALUES};

/// Structures a single way segment cannot be at once
const EXCLUSIVE: [(&str, &str); 4] = [
    ("bridge", "tunnel"),
    ("embankment", "cutting"),
    ("bridge", "cutting"),
    ("tunnel", "embankment"),
];

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "structure-exclusive",
            Topic::Structure,
            &[layer::WAYPROBLEMS],
            structure_exclusive,
        )
        .with_description("A way is not a bridge and a tunnel, nor an embankment and a cutting"),
        Rule::new(
            "structure-value",
            Topic::Structure,
            &[layer::STRANGE],
            structure_value,
        )
        .with_description("Bridge, tunnel, embankment and cutting tags use known values"),
        Rule::new("layer-value", Topic::Structure, &[layer::WAYPROBLEMS], layer_value)
            .with_description("layer is an integer within bounds"),
    ]
}

/// Present and not explicitly negated
fn is_set(ctx: &RuleContext<'_>, key: &str) -> bool {
    ctx.tags.has(key) && !ctx.tags.is_falsy(key)
}

fn structure_exclusive(ctx: &RuleContext<'_>) -> Vec<Finding> {
    EXCLUSIVE
        .into_iter()
        .filter(|(a, b)| is_set(ctx, a) && is_set(ctx, b))
        .filter_map(|(a, b)| {
            Some(Finding::problem(FindingKind::Conflict {
                tag: ctx.tag(a)?,
                other: ctx.tag(b)?,
            }))
        })
        .collect()
}

fn structure_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let mut findings = unknown_values(ctx, &["bridge"], &BRIDGE_VALUES);
    findings.extend(unknown_values(ctx, &["tunnel"], &TUNNEL_VALUES));
    findings.extend(unknown_values(ctx, &["embankment", "cutting"], &EARTHWORK_VALUES));
    findings
}

fn layer_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(tag) = ctx.tag("layer") else {
        return Vec::new();
    };

    let t = ctx.thresholds;
    match parse_int(&tag.value) {
        Ok(n) => int_bounds(tag, n, t.layer_min, t.layer_max).into_iter().collect(),
        Err(_) => vec![Finding::problem(FindingKind::NotAnInteger { tag })],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{messages, run};

    #[test]
    fn test_bridge_and_tunnel() {
        let found = run(
            structure_exclusive,
            &[("highway", "primary"), ("bridge", "yes"), ("tunnel", "culvert")],
        );
        assert_eq!(
            messages(&found),
            vec!["bridge=yes conflicts with tunnel=culvert"]
        );
    }

    #[test]
    fn test_negated_structure_is_absent() {
        let found = run(
            structure_exclusive,
            &[("highway", "primary"), ("bridge", "yes"), ("tunnel", "no")],
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_earthworks() {
        let found = run(
            structure_exclusive,
            &[
                ("highway", "primary"),
                ("embankment", "yes"),
                ("cutting", "left"),
                ("tunnel", "yes"),
            ],
        );
        assert_eq!(
            messages(&found),
            vec![
                "embankment=yes conflicts with cutting=left",
                "tunnel=yes conflicts with embankment=yes",
            ]
        );
    }

    #[test]
    fn test_structure_value() {
        let found = run(
            structure_value,
            &[("highway", "primary"), ("bridge", "viaduct"), ("tunnel", "tube")],
        );
        assert_eq!(messages(&found), vec!["tunnel=tube is not a recognized value"]);
    }

    #[test]
    fn test_layer_value() {
        assert!(run(layer_value, &[("highway", "primary"), ("layer", "-1")]).is_empty());
        assert_eq!(
            messages(&run(layer_value, &[("highway", "primary"), ("layer", "1.5")])),
            vec!["layer=1.5 is not an integer"]
        );
        assert_eq!(
            messages(&run(layer_value, &[("highway", "primary"), ("layer", "7")])),
            vec!["layer=7 is implausibly high (maximum 5)"]
        );
    }
}
