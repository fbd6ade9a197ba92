//! Road number rules

use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::{REF_ALLOWED, REF_REQUIRED};
use regex::Regex;
use std::sync::LazyLock;

/// German road number: network prefix, space, number, optional letter suffix
static REF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(A|B|L|K|S|St|Kr|KrS) [1-9][0-9]{0,3}[a-z]?$").expect("valid ref pattern")
});

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("ref-missing", Topic::Reference, &[layer::REF], ref_missing)
            .with_description("Motorways down to secondary roads carry a road number"),
        Rule::new("ref-not-allowed", Topic::Reference, &[layer::REF], ref_not_allowed)
            .with_description("Only motorways down to tertiary roads carry a road number"),
        Rule::new("ref-format", Topic::Reference, &[layer::REF], ref_format)
            .with_description("Road numbers follow the 'B 27' pattern, several joined by ';'"),
        Rule::new(
            "ref-prefix-mismatch",
            Topic::Reference,
            &[layer::REF],
            ref_prefix_mismatch,
        )
        .with_description("Motorways are numbered 'A', trunk and primary roads 'B'"),
    ]
}

fn ref_parts(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim)
}

fn ref_missing(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !REF_REQUIRED.contains(ctx.highway)
        || ctx.tags.has_value("junction", "roundabout")
        || ctx.tags.has("ref")
    {
        return Vec::new();
    }

    vec![Finding::reference(FindingKind::Missing {
        key: "ref".to_string(),
        context: ctx.class_tag(),
    })]
}

fn ref_not_allowed(ctx: &RuleContext<'_>) -> Vec<Finding> {
    match ctx.tag("ref") {
        Some(tag) if !REF_ALLOWED.contains(ctx.highway) => {
            vec![Finding::reference(FindingKind::Misplaced {
                tag,
                class: ctx.highway.to_string(),
            })]
        }
        _ => Vec::new(),
    }
}

fn ref_format(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(value) = ctx.tags.get("ref") else {
        return Vec::new();
    };
    if !REF_ALLOWED.contains(ctx.highway) {
        return Vec::new();
    }

    match ref_parts(value).find(|part| !REF_PATTERN.is_match(part)) {
        Some(part) => vec![Finding::reference(FindingKind::UnknownToken {
            tag: TagPair::new("ref", value),
            token: part.to_string(),
        })],
        None => Vec::new(),
    }
}

fn ref_prefix_mismatch(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(value) = ctx.tags.get("ref") else {
        return Vec::new();
    };

    let prefix = match ctx.highway {
        "motorway" | "motorway_link" => "A ",
        "trunk" | "trunk_link" | "primary" | "primary_link" => "B ",
        _ => return Vec::new(),
    };

    // Malformed parts are reported by ref-format
    let mismatch = ref_parts(value)
        .filter(|part| REF_PATTERN.is_match(part))
        .any(|part| !part.starts_with(prefix));

    if mismatch {
        vec![Finding::reference(FindingKind::Conflict {
            tag: TagPair::new("ref", value),
            other: ctx.class_tag(),
        })]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{messages, run};

    #[test]
    fn test_ref_missing() {
        let found = run(ref_missing, &[("highway", "primary")]);
        assert_eq!(messages(&found), vec!["highway=primary without ref tag"]);
        assert_eq!(found[0].layer, layer::REF);

        assert!(run(ref_missing, &[("highway", "primary"), ("ref", "B 3")]).is_empty());
        assert!(run(ref_missing, &[("highway", "tertiary")]).is_empty());
    }

    #[test]
    fn test_ref_missing_skips_roundabout() {
        let found = run(
            ref_missing,
            &[("highway", "secondary"), ("junction", "roundabout")],
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_ref_not_allowed() {
        let found = run(ref_not_allowed, &[("highway", "residential"), ("ref", "K 12")]);
        assert_eq!(
            messages(&found),
            vec!["ref=K 12 is not applicable on highway=residential"]
        );
        assert!(run(ref_not_allowed, &[("highway", "tertiary"), ("ref", "K 12")]).is_empty());
    }

    #[test]
    fn test_ref_format() {
        assert!(run(ref_format, &[("highway", "primary"), ("ref", "B 27a")]).is_empty());
        assert!(run(ref_format, &[("highway", "primary"), ("ref", "B 27;B 3")]).is_empty());
        assert!(run(ref_format, &[("highway", "secondary"), ("ref", "St 2045")]).is_empty());

        let found = run(ref_format, &[("highway", "primary"), ("ref", "B 27;B3")]);
        assert_eq!(
            messages(&found),
            vec!["ref=B 27;B3 contains unrecognized token 'B3'"]
        );
    }

    #[test]
    fn test_ref_prefix_mismatch() {
        let found = run(ref_prefix_mismatch, &[("highway", "motorway"), ("ref", "B 5")]);
        assert_eq!(
            messages(&found),
            vec!["ref=B 5 conflicts with highway=motorway"]
        );
        assert!(run(ref_prefix_mismatch, &[("highway", "motorway"), ("ref", "A 5")]).is_empty());
        assert!(run(ref_prefix_mismatch, &[("highway", "secondary"), ("ref", "B 5")]).is_empty());
        // malformed parts are left to ref-format
        assert!(run(ref_prefix_mismatch, &[("highway", "trunk"), ("ref", "A5")]).is_empty());
    }
}
