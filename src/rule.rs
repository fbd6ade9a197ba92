//! Rule definition

use crate::finding::{Finding, TagPair};
use crate::tags::TagView;
use crate::thresholds::Thresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Road numbers
    Reference,
    /// Speed limits
    Speed,
    /// Height, width and weight limits
    Dimensions,
    /// Lane counts and per-lane values
    Lanes,
    /// Sidewalks and segregation
    Sidewalk,
    /// Access permissions by transport mode
    Access,
    /// Construction and proposed ways
    Construction,
    /// Class-specific checks (track, footway, cycleway, ...)
    Classes,
    Roundabout,
    /// Point tags on ways
    Stray,
    Overtaking,
    /// Bridge, tunnel, embankment, cutting, layer
    Structure,
    /// Tags restating defaults
    Defaults,
}

impl Topic {
    pub const ALL: [Topic; 13] = [
        Topic::Reference,
        Topic::Speed,
        Topic::Dimensions,
        Topic::Lanes,
        Topic::Sidewalk,
        Topic::Access,
        Topic::Construction,
        Topic::Classes,
        Topic::Roundabout,
        Topic::Stray,
        Topic::Overtaking,
        Topic::Structure,
        Topic::Defaults,
    ];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::Reference => "reference",
            Topic::Speed => "speed",
            Topic::Dimensions => "dimensions",
            Topic::Lanes => "lanes",
            Topic::Sidewalk => "sidewalk",
            Topic::Access => "access",
            Topic::Construction => "construction",
            Topic::Classes => "classes",
            Topic::Roundabout => "roundabout",
            Topic::Stray => "stray",
            Topic::Overtaking => "overtaking",
            Topic::Structure => "structure",
            Topic::Defaults => "defaults",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Topic::ALL
            .into_iter()
            .find(|t| t.to_string() == lower)
            .ok_or_else(|| format!("Unknown topic: {}", s))
    }
}

/// What a rule gets to look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub tags: TagView<'a>,
    /// Value of the classification tag, already accepted by the gate
    pub highway: &'a str,
    pub thresholds: &'a Thresholds,
}

impl<'a> RuleContext<'a> {
    pub fn new(tags: TagView<'a>, highway: &'a str, thresholds: &'a Thresholds) -> Self {
        Self {
            tags,
            highway,
            thresholds,
        }
    }

    /// `highway=<class>` for quoting in findings
    pub fn class_tag(&self) -> TagPair {
        TagPair::new("highway", self.highway)
    }

    /// `key=<value>` of a present tag
    pub fn tag(&self, key: &str) -> Option<TagPair> {
        self.tags.get(key).map(|v| TagPair::new(key, v))
    }

    pub fn is_class(&self, class: &str) -> bool {
        self.highway == class
    }
}

/// Pure check: tags in, findings out
pub type CheckFn = fn(&RuleContext<'_>) -> Vec<Finding>;

/// A rule in the catalog
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique rule identifier (e.g., "ref-missing")
    pub id: &'static str,

    pub topic: Topic,

    /// One-line description
    pub description: &'static str,

    /// Every layer the rule may report into
    pub layers: &'static [&'static str],

    /// Whether this rule is enabled by default
    pub enabled: bool,

    check: CheckFn,
}

impl Rule {
    pub fn new(
        id: &'static str,
        topic: Topic,
        layers: &'static [&'static str],
        check: CheckFn,
    ) -> Self {
        Self {
            id,
            topic,
            description: "",
            layers,
            enabled: true,
            check,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Ship the rule disabled by default
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn reports_into(&self, layer: &str) -> bool {
        self.layers.contains(&layer)
    }

    /// Run the check
    pub fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        (self.check)(ctx)
    }
}
