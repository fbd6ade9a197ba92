//! Height, width and weight limits

use super::float_bounds;
use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::tags::parse_float;
use crate::thresholds::Thresholds;
use crate::vocabulary::DIMENSION_SYMBOLIC;

pub(super) fn rules() -> Vec<Rule> {
    vec![Rule::new(
        "dimension-value",
        Topic::Dimensions,
        &[layer::WAYPROBLEMS],
        dimension_value,
    )
    .with_description("Height, width and weight limits are plain decimals within bounds")]
}

/// Bounds for a dimension key
fn bounds(key: &str, t: &Thresholds) -> (f64, f64) {
    match key {
        "maxwidth" => (t.maxwidth_min, t.maxwidth_max),
        "maxweight" => (t.maxweight_min, t.maxweight_max),
        _ => (t.maxheight_min, t.maxheight_max),
    }
}

fn dimension_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    ["maxheight", "maxheight:physical", "maxwidth", "maxweight"]
        .into_iter()
        .filter_map(|key| {
            let value = ctx.tags.get(key)?;
            if DIMENSION_SYMBOLIC.contains(value) {
                return None;
            }

            let tag = TagPair::new(key, value);
            match parse_float(value) {
                Ok(n) => {
                    let (min, max) = bounds(key, ctx.thresholds);
                    float_bounds(tag, n, min, max)
                }
                Err(_) => Some(Finding::problem(FindingKind::NotANumber { tag })),
            }
        })
        .collect()
}
