//! Tags that describe a point feature and were put on a way

use crate::finding::{Finding, FindingKind};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::POINT_KEYS;

pub(super) fn rules() -> Vec<Rule> {
    vec![Rule::new(
        "point-tag-on-way",
        Topic::Stray,
        &[layer::WAYPROBLEMS],
        point_tag_on_way,
    )
    .with_description("Crossings, barriers, kerbs and traffic signals are mapped on nodes")]
}

fn point_tag_on_way(ctx: &RuleContext<'_>) -> Vec<Finding> {
    POINT_KEYS
        .values()
        .iter()
        .filter_map(|key| ctx.tag(key))
        .map(|tag| Finding::problem(FindingKind::NodeTag { tag }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{messages, run};

    #[test]
    fn test_point_tags() {
        let found = run(
            point_tag_on_way,
            &[
                ("highway", "residential"),
                ("traffic_calming", "bump"),
                ("barrier", "gate"),
            ],
        );
        assert_eq!(
            messages(&found),
            vec![
                "traffic_calming=bump belongs on a node, not on a way",
                "barrier=gate belongs on a node, not on a way",
            ]
        );
    }

    #[test]
    fn test_footway_crossing_refinement_is_not_a_point_tag() {
        assert!(run(point_tag_on_way, &[("highway", "footway"), ("footway", "crossing")]).is_empty());
    }
}
