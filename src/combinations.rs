//! Access combination statistics
//!
//! Counts how often each combination of access-related values occurs on
//! admitted ways. Useful to find which combinations deserve a rule.

use crate::feature::Feature;
use crate::finding::TagPair;
use crate::gate::FeatureGate;
use crate::vocabulary::{Vocabulary, COMBINATION_KEYS};
use std::collections::HashMap;
use std::fmt;

/// One distinct combination and how often it was seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    /// Present keys in collection order
    pub tags: Vec<TagPair>,
    pub count: usize,
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.tags.iter().map(ToString::to_string).collect();
        write!(f, "{:>8} {}", self.count, joined.join(" "))
    }
}

/// Accumulates combinations over a stream of features
#[derive(Debug)]
pub struct AccessCombinations {
    gate: FeatureGate,
    keys: &'static Vocabulary,
    counts: HashMap<Vec<TagPair>, usize>,
    total: usize,
}

impl Default for AccessCombinations {
    fn default() -> Self {
        Self::new(FeatureGate::default())
    }
}

impl AccessCombinations {
    pub fn new(gate: FeatureGate) -> Self {
        Self {
            gate,
            keys: &COMBINATION_KEYS,
            counts: HashMap::new(),
            total: 0,
        }
    }

    /// Count one feature; returns false when the gate rejects it
    pub fn add(&mut self, feature: &Feature) -> bool {
        let view = feature.tags();
        if !self.gate.accepts(&view) {
            return false;
        }

        let combination: Vec<TagPair> = self
            .keys
            .values()
            .iter()
            .filter_map(|key| view.get(key).map(|value| TagPair::new(key, value)))
            .collect();

        *self.counts.entry(combination).or_default() += 1;
        self.total += 1;
        true
    }

    /// Features counted so far
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct combinations
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Combinations by descending count, ties in lexical order
    pub fn sorted(&self) -> Vec<Combination> {
        let mut combinations: Vec<Combination> = self
            .counts
            .iter()
            .map(|(tags, &count)| Combination {
                tags: tags.clone(),
                count,
            })
            .collect();
        combinations.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tags.cmp(&b.tags)));
        combinations
    }
}

impl Extend<Feature> for AccessCombinations {
    fn extend<T: IntoIterator<Item = Feature>>(&mut self, iter: T) {
        for feature in iter {
            self.add(&feature);
        }
    }
}
