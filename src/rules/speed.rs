//! Speed limit rules

use super::int_bounds;
use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::tags::parse_int;
use crate::vocabulary::{MAXSPEED_SYMBOLIC, UNLIMITED_SPEED_HIGHWAYS};

const MAXSPEED_KEYS: [&str; 3] = ["maxspeed", "maxspeed:forward", "maxspeed:backward"];

/// Keys naming the legal basis of a speed limit
const SOURCE_KEYS: [&str; 2] = ["source:maxspeed", "maxspeed:type"];

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "maxspeed-value",
            Topic::Speed,
            &[layer::WAYPROBLEMS, layer::STRANGE],
            maxspeed_value,
        )
        .with_description("Speed limits are whole km/h within bounds or a known symbolic value"),
        Rule::new(
            "maxspeed-none-misplaced",
            Topic::Speed,
            &[layer::WAYPROBLEMS],
            maxspeed_none_misplaced,
        )
        .with_description("Only motorways and trunk roads can be without speed limit"),
        Rule::new(
            "maxspeed-source-conflict",
            Topic::Speed,
            &[layer::WAYPROBLEMS],
            maxspeed_source_conflict,
        )
        .with_description("A speed limit agrees with the zone or road type it is derived from"),
    ]
}

/// Limit implied by a legal basis, where one is implied at all
fn implied_maxspeed(source: &str) -> Option<&'static str> {
    match source {
        "DE:urban" => Some("50"),
        "DE:rural" => Some("100"),
        "DE:zone:30" | "DE:zone30" => Some("30"),
        "DE:zone:20" | "DE:zone20" => Some("20"),
        "DE:bicycle_road" => Some("30"),
        "DE:living_street" => Some("walk"),
        "DE:motorway" => Some("none"),
        _ => None,
    }
}

fn maxspeed_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let t = ctx.thresholds;
    MAXSPEED_KEYS
        .iter()
        .filter_map(|key| {
            let value = ctx.tags.get(key)?;
            if MAXSPEED_SYMBOLIC.contains(value) {
                return None;
            }

            let tag = TagPair::new(key, value);
            match parse_int(value) {
                Ok(n) => int_bounds(tag, n, t.maxspeed_min, t.maxspeed_max),
                Err(_) if value.starts_with(|c: char| c.is_ascii_digit()) => {
                    Some(Finding::problem(FindingKind::NotAnInteger { tag }))
                }
                Err(_) => Some(Finding::strange(FindingKind::UnknownValue { tag })),
            }
        })
        .collect()
}

fn maxspeed_none_misplaced(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.tags.has_value("maxspeed", "none") || UNLIMITED_SPEED_HIGHWAYS.contains(ctx.highway) {
        return Vec::new();
    }

    vec![Finding::problem(FindingKind::Misplaced {
        tag: TagPair::new("maxspeed", "none"),
        class: ctx.highway.to_string(),
    })]
}

fn maxspeed_source_conflict(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(maxspeed) = ctx.tag("maxspeed") {
        for key in SOURCE_KEYS {
            let Some(source) = ctx.tags.get(key) else {
                continue;
            };
            if implied_maxspeed(source).is_some_and(|implied| implied != maxspeed.value) {
                findings.push(Finding::problem(FindingKind::Conflict {
                    tag: maxspeed.clone(),
                    other: TagPair::new(key, source),
                }));
            }
        }
    }

    if let (Some(source), Some(kind)) = (ctx.tag("source:maxspeed"), ctx.tag("maxspeed:type")) {
        let source_limit = implied_maxspeed(&source.value);
        let kind_limit = implied_maxspeed(&kind.value);
        if source_limit.is_some() && kind_limit.is_some() && source_limit != kind_limit {
            findings.push(Finding::problem(FindingKind::Conflict {
                tag: source,
                other: kind,
            }));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{messages, run};
    use crate::thresholds::Thresholds;

    #[test]
    fn test_maxspeed_valid() {
        assert!(run(maxspeed_value, &[("highway", "primary"), ("maxspeed", "70")]).is_empty());
        assert!(run(maxspeed_value, &[("highway", "primary"), ("maxspeed", "DE:rural")]).is_empty());
        assert!(run(maxspeed_value, &[("highway", "motorway"), ("maxspeed", "none")]).is_empty());
    }

    #[test]
    fn test_maxspeed_not_integer() {
        let found = run(maxspeed_value, &[("highway", "primary"), ("maxspeed", "50 mph")]);
        assert_eq!(messages(&found), vec!["maxspeed=50 mph is not an integer"]);
        assert_eq!(found[0].layer, layer::WAYPROBLEMS);
    }

    #[test]
    fn test_maxspeed_unknown_symbolic() {
        let found = run(maxspeed_value, &[("highway", "primary"), ("maxspeed", "DE:city")]);
        assert_eq!(messages(&found), vec!["maxspeed=DE:city is not a recognized value"]);
        assert_eq!(found[0].layer, layer::STRANGE);
    }

    #[test]
    fn test_maxspeed_bounds() {
        let found = run(
            maxspeed_value,
            &[("highway", "primary"), ("maxspeed:forward", "250")],
        );
        assert_eq!(
            messages(&found),
            vec![format!(
                "maxspeed:forward=250 is implausibly high (maximum {})",
                Thresholds::default().maxspeed_max
            )]
        );

        let found = run(maxspeed_value, &[("highway", "primary"), ("maxspeed", "0")]);
        assert!(matches!(found[0].kind, FindingKind::TooLow { .. }));
    }

    #[test]
    fn test_maxspeed_none_misplaced() {
        let found = run(
            maxspeed_none_misplaced,
            &[("highway", "residential"), ("maxspeed", "none")],
        );
        assert_eq!(
            messages(&found),
            vec!["maxspeed=none is not applicable on highway=residential"]
        );
        assert!(run(
            maxspeed_none_misplaced,
            &[("highway", "motorway"), ("maxspeed", "none")]
        )
        .is_empty());
    }

    #[test]
    fn test_source_conflict() {
        let found = run(
            maxspeed_source_conflict,
            &[
                ("highway", "residential"),
                ("maxspeed", "30"),
                ("source:maxspeed", "DE:urban"),
            ],
        );
        assert_eq!(
            messages(&found),
            vec!["maxspeed=30 conflicts with source:maxspeed=DE:urban"]
        );

        assert!(run(
            maxspeed_source_conflict,
            &[
                ("highway", "residential"),
                ("maxspeed", "30"),
                ("source:maxspeed", "DE:zone:30"),
            ],
        )
        .is_empty());

        // signposted limits imply nothing
        assert!(run(
            maxspeed_source_conflict,
            &[
                ("highway", "residential"),
                ("maxspeed", "40"),
                ("source:maxspeed", "sign"),
            ],
        )
        .is_empty());
    }

    #[test]
    fn test_source_and_type_disagree() {
        let found = run(
            maxspeed_source_conflict,
            &[
                ("highway", "tertiary"),
                ("source:maxspeed", "DE:urban"),
                ("maxspeed:type", "DE:rural"),
            ],
        );
        assert_eq!(
            messages(&found),
            vec!["source:maxspeed=DE:urban conflicts with maxspeed:type=DE:rural"]
        );
    }

    #[test]
    fn test_zone_spellings_agree() {
        assert!(run(
            maxspeed_source_conflict,
            &[
                ("highway", "residential"),
                ("maxspeed", "30"),
                ("source:maxspeed", "DE:zone:30"),
                ("maxspeed:type", "DE:zone30"),
            ],
        )
        .is_empty());

        for value in ["DE:zone30", "DE:zone20"] {
            assert!(run(maxspeed_value, &[("highway", "residential"), ("maxspeed", value)]).is_empty());
        }
    }
}
