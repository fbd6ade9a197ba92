//! Tags restating what a way is anyway

use super::unknown_values;
use crate::finding::{Finding, FindingKind, TagPair};
use crate::layer;
use crate::rule::{Rule, RuleContext, Topic};
use crate::vocabulary::ONEWAY_VALUES;

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("falsy-default", Topic::Defaults, &[layer::REDUNDANT], falsy_default)
            .with_description("Negating a structure or state a way does not have is redundant"),
        Rule::new("oneway-value", Topic::Defaults, &[layer::STRANGE], oneway_value)
            .with_description("oneway uses a known value"),
        Rule::new(
            "motorway-oneway",
            Topic::Defaults,
            &[layer::REDUNDANT],
            motorway_oneway,
        )
        .with_description("Motorways are oneway by definition"),
    ]
}

fn falsy_default(ctx: &RuleContext<'_>) -> Vec<Finding> {
    ["tunnel", "bridge", "construction", "embankment", "cutting", "oneway"]
        .into_iter()
        .filter(|key| ctx.tags.is_falsy(key))
        .filter_map(|key| ctx.tag(key))
        .map(|tag| Finding::redundant(FindingKind::Redundant { tag, context: None }))
        .collect()
}

fn oneway_value(ctx: &RuleContext<'_>) -> Vec<Finding> {
    unknown_values(ctx, &["oneway"], &ONEWAY_VALUES)
}

fn motorway_oneway(ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !matches!(ctx.highway, "motorway" | "motorway_link") || !ctx.tags.has_value("oneway", "yes")
    {
        return Vec::new();
    }

    vec![Finding::redundant(FindingKind::Redundant {
        tag: TagPair::new("oneway", "yes"),
        context: Some(ctx.class_tag()),
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Style;
    use crate::rules::testing::{messages, run};

    #[test]
    fn test_oneway_no_redundant() {
        let found = run(falsy_default, &[("highway", "residential"), ("oneway", "no")]);
        assert_eq!(messages(&found), vec!["oneway=no is redundant"]);
        assert_eq!(found[0].style, Style::Redundant);
        assert_eq!(found[0].layer, layer::REDUNDANT);
    }

    #[test]
    fn test_falsy_spellings_kept_verbatim() {
        let found = run(
            falsy_default,
            &[("highway", "primary"), ("bridge", "false"), ("tunnel", "0")],
        );
        assert_eq!(
            messages(&found),
            vec!["tunnel=0 is redundant", "bridge=false is redundant"]
        );
    }

    #[test]
    fn test_oneway_value() {
        assert!(run(oneway_value, &[("highway", "primary"), ("oneway", "-1")]).is_empty());
        assert_eq!(
            messages(&run(oneway_value, &[("highway", "primary"), ("oneway", "1")])),
            vec!["oneway=1 is not a recognized value"]
        );
    }

    #[test]
    fn test_motorway_oneway() {
        assert_eq!(
            messages(&run(motorway_oneway, &[("highway", "motorway"), ("oneway", "yes")])),
            vec!["highway=motorway with oneway=yes is redundant"]
        );
        assert!(run(motorway_oneway, &[("highway", "primary"), ("oneway", "yes")]).is_empty());
    }
}
