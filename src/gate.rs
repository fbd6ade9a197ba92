//! Feature admission
//!
//! Only ways whose `highway` value is a recognized road or path class are
//! checked. Anything else yields no diagnostics at all.

use crate::tags::TagView;
use crate::vocabulary::{Vocabulary, HIGHWAY_CLASSES};

/// Key holding the classification of a way
pub const CLASSIFICATION_KEY: &str = "highway";

/// Decides whether a feature is in scope
#[derive(Debug, Clone, Copy)]
pub struct FeatureGate {
    key: &'static str,
    classes: &'static Vocabulary,
}

impl Default for FeatureGate {
    fn default() -> Self {
        Self::new(CLASSIFICATION_KEY, &HIGHWAY_CLASSES)
    }
}

impl FeatureGate {
    pub fn new(key: &'static str, classes: &'static Vocabulary) -> Self {
        Self { key, classes }
    }

    /// Classification value of an admitted feature, `None` for rejected ones
    pub fn classify<'a>(&self, tags: &TagView<'a>) -> Option<&'a str> {
        tags.get(self.key).filter(|class| self.classes.contains(class))
    }

    pub fn accepts(&self, tags: &TagView<'_>) -> bool {
        self.classify(tags).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::Tags;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_accepts_known_classes() {
        let gate = FeatureGate::default();
        for class in ["motorway", "residential", "footway", "construction"] {
            let t = tags(&[("highway", class)]);
            assert_eq!(gate.classify(&TagView::new(&t)), Some(class));
        }
    }

    #[test]
    fn test_rejects_unclassified_and_point_classes() {
        let gate = FeatureGate::default();
        let cases: [&[(&str, &str)]; 4] = [
            &[],
            &[("name", "Hauptstrasse")],
            &[("highway", "bus_stop")],
            &[("highway", "Residential")],
        ];
        for pairs in cases {
            let t = tags(pairs);
            assert!(!gate.accepts(&TagView::new(&t)), "accepted {pairs:?}");
        }
    }
}
