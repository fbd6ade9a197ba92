//! Lane counts and per-lane values

use super::int_bounds;
use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::tags::parse_int;
use crate::vocabulary::TURN_LANE_TOKENS;

const COUNT_KEYS: [&str; 4] = ["lanes", "lanes:forward", "lanes:backward", "lanes:both_ways"];

const TURN_KEYS: [&str; 4] = [
    "turn:lanes",
    "turn:lanes:forward",
    "turn:lanes:backward",
    "turn:lanes:both_ways",
];

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("lanes-value", Topic::Lanes, &[layer::WAYPROBLEMS], lanes_value)
            .with_description("Lane counts are integers within bounds"),
        Rule::new(
            "lanes-direction-sum",
            Topic::Lanes,
            &[layer::WAYPROBLEMS],
            lanes_direction_sum,
        )
        .with_description("lanes equals the sum of the per-direction lane counts"),
        Rule::new(
            "lanes-token-count",
            Topic::Lanes,
            &[layer::WAYPROBLEMS],
            lanes_token_count,
        )
        .with_description("Per-lane values list one entry per lane"),
        Rule::new(
            "turn-lanes-value",
            Topic::Lanes,
            &[layer::STRANGE],
            turn_lanes_value,
        )
        .with_description("Turn lanes only use known turn indications"),
        Rule::new(
            "oneway-backward-lanes",
            Topic::Lanes,
            &[layer::WAYPROBLEMS],
            oneway_backward_lanes,
        )
        .with_description("A oneway road has no backward lanes"),
    ]
}

fn lanes_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let t = ctx.thresholds;
    COUNT_KEYS
        .iter()
        .filter_map(|key| {
            let tag = ctx.tag(key)?;
            match parse_int(&tag.value) {
                Ok(n) => int_bounds(tag, n, t.lanes_min, t.lanes_max),
                Err(_) => Some(Finding::problem(FindingKind::NotAnInteger { tag })),
            }
        })
        .collect()
}

/// Parsed lane count; absent and malformed both yield `None`
fn count(ctx: &RuleContext<'_>, key: &str) -> Option<(TagPair, i64)> {
    let tag = ctx.tag(key)?;
    let n = parse_int(&tag.value).ok()?;
    Some((tag, n))
}

fn lanes_direction_sum(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let (Some(total), Some(forward), Some(backward)) = (
        count(ctx, "lanes"),
        count(ctx, "lanes:forward"),
        count(ctx, "lanes:backward"),
    ) else {
        return Vec::new();
    };

    let mut parts = vec![forward, backward];
    if ctx.tags.has("lanes:both_ways") {
        match count(ctx, "lanes:both_ways") {
            Some(both) => parts.push(both),
            None => return Vec::new(),
        }
    }

    let sum: i64 = parts.iter().map(|(_, n)| n).sum();
    if sum == total.1 {
        return Vec::new();
    }

    vec![Finding::problem(FindingKind::SumMismatch {
        total: total.0,
        parts: parts.into_iter().map(|(tag, _)| tag).collect(),
        sum,
    })]
}

/// Lane count key a per-lane key is measured against
fn count_key_for(key: &str) -> Option<&'static str> {
    [
        (":lanes:forward", "lanes:forward"),
        (":lanes:backward", "lanes:backward"),
        (":lanes:both_ways", "lanes:both_ways"),
        (":lanes", "lanes"),
    ]
    .into_iter()
    .find(|(suffix, _)| key.ends_with(suffix))
    .map(|(_, count_key)| count_key)
}

fn lanes_token_count(ctx: &RuleContext<'_>) -> Vec<Finding> {
    ctx.tags
        .iter()
        .filter_map(|(key, value)| {
            let (count_tag, n) = count(ctx, count_key_for(key)?)?;
            let tokens = value.split('|').count();
            if usize::try_from(n).is_ok_and(|n| n == tokens) {
                return None;
            }
            Some(Finding::problem(FindingKind::TokenCount {
                tag: TagPair::new(key, value),
                tokens,
                count: count_tag,
            }))
        })
        .collect()
}

fn turn_lanes_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    TURN_KEYS
        .iter()
        .filter_map(|key| {
            let value = ctx.tags.get(key)?;
            let token = value
                .split('|')
                .flat_map(|lane| lane.split(';'))
                .map(str::trim)
                .find(|token| !TURN_LANE_TOKENS.contains(token))?;
            Some(Finding::strange(FindingKind::UnknownToken {
                tag: TagPair::new(key, value),
                token: token.to_string(),
            }))
        })
        .collect()
}

fn oneway_backward_lanes(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !ctx.tags.has_value("oneway", "yes") {
        return Vec::new();
    }

    ["lanes:backward", "turn:lanes:backward"]
        .into_iter()
        .filter_map(|key| ctx.tag(key))
        .map(|tag| {
            Finding::problem(FindingKind::Conflict {
                tag,
                other: TagPair::new("oneway", "yes"),
            })
        })
        .collect()
}
