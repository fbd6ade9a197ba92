//! Core checking engine

use crate::config::Config;
use crate::diagnostic::{Diagnostic, Style};
use crate::feature::Feature;
use crate::gate::FeatureGate;
use crate::layer::LayerRegistry;
use crate::rule::{Rule, RuleContext};
use crate::rules::builtin_rules;
use crate::sink::{deliver, Delivery, DiagnosticSink, SinkError};
use crate::source::SourceError;
use crate::tags::Tags;
use crate::thresholds::Thresholds;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Engine error
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rule '{rule}' reports into unregistered layer '{layer}'")]
    UnknownLayer { rule: String, layer: String },

    #[error("configuration names unknown rule '{0}'")]
    UnknownRule(String),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Per-rule timing statistics
#[derive(Debug, Clone, Default)]
pub struct RuleTiming {
    /// Rule ID
    pub rule_id: String,
    /// Total time spent on this rule
    pub total_time: Duration,
    /// Number of features the rule was evaluated on
    pub evaluation_count: usize,
    /// Number of findings produced
    pub match_count: usize,
}

impl RuleTiming {
    pub fn new(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            ..Default::default()
        }
    }

    /// Average time per evaluation
    pub fn avg_time(&self) -> Duration {
        if self.evaluation_count > 0 {
            self.total_time / self.evaluation_count as u32
        } else {
            Duration::ZERO
        }
    }
}

/// Counts of a checking run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Features delivered by the source
    pub features_read: usize,

    /// Features whose classification tag the gate rejected
    pub skipped_by_gate: usize,

    /// Features the rules ran on
    pub evaluated: usize,

    /// Evaluated features with at least one diagnostic
    pub with_findings: usize,

    /// Input records the source could not turn into features
    pub malformed_records: usize,

    /// Features whose diagnostics were dropped for lack of geometry
    pub geometry_failures: usize,

    /// Recorded diagnostics per layer
    pub per_layer: BTreeMap<String, usize>,

    /// Recorded diagnostics per style
    pub per_style: BTreeMap<Style, usize>,

    /// Processing duration
    pub duration: Duration,

    /// Per-rule timing statistics (rule_id -> timing)
    pub rule_timings: HashMap<String, RuleTiming>,
}

impl RunSummary {
    /// Diagnostics handed to the sink
    pub fn diagnostics(&self) -> usize {
        self.per_layer.values().sum()
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: RunSummary) {
        self.features_read += other.features_read;
        self.skipped_by_gate += other.skipped_by_gate;
        self.evaluated += other.evaluated;
        self.with_findings += other.with_findings;
        self.malformed_records += other.malformed_records;
        self.geometry_failures += other.geometry_failures;
        self.duration += other.duration;

        for (layer, count) in other.per_layer {
            *self.per_layer.entry(layer).or_default() += count;
        }
        for (style, count) in other.per_style {
            *self.per_style.entry(style).or_default() += count;
        }

        for (rule_id, timing) in other.rule_timings {
            let entry = self
                .rule_timings
                .entry(rule_id)
                .or_insert_with(|| RuleTiming::new(&timing.rule_id));
            entry.total_time += timing.total_time;
            entry.evaluation_count += timing.evaluation_count;
            entry.match_count += timing.match_count;
        }
    }

    /// Get rule timings sorted by total time (descending)
    pub fn sorted_timings(&self) -> Vec<&RuleTiming> {
        let mut timings: Vec<_> = self.rule_timings.values().collect();
        timings.sort_by(|a, b| {
            b.total_time
                .cmp(&a.total_time)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        timings
    }

    /// Format timing statistics as a string
    pub fn format_timings(&self) -> String {
        let timings = self.sorted_timings();
        if timings.is_empty() {
            return "No timing data available".to_string();
        }

        let mut output = String::from("Rule Timing Statistics:\n");
        output.push_str(&format!(
            "{:<32} {:>12} {:>12} {:>10} {:>10}\n",
            "Rule ID", "Total", "Avg", "Evals", "Matches"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for timing in timings {
            let total_ms = timing.total_time.as_secs_f64() * 1000.0;
            let avg_us = timing.avg_time().as_secs_f64() * 1_000_000.0;
            output.push_str(&format!(
                "{:<32} {:>10.2}ms {:>10.2}µs {:>10} {:>10}\n",
                timing.rule_id, total_ms, avg_us, timing.evaluation_count, timing.match_count
            ));
        }

        output
    }

    fn record_delivery(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            *self.per_layer.entry(diagnostic.layer.clone()).or_default() += 1;
            *self.per_style.entry(diagnostic.style).or_default() += 1;
        }
    }
}

/// Result of running the active rules on one gated feature
struct Evaluation {
    diagnostics: Vec<Diagnostic>,
    /// (elapsed, findings) per active rule; empty unless timing
    samples: Vec<(Duration, usize)>,
}

/// The checking engine
///
/// Holds the rule catalog, the layer registry and the gate. Evaluation of a
/// feature reads nothing but the feature, so batches are spread over a rayon
/// pool; delivery to the sink happens on the calling thread in input order.
pub struct Engine {
    config: Config,
    rules: Vec<Rule>,
    /// Indices into `rules` selected by the configuration
    active: Vec<usize>,
    registry: LayerRegistry,
    gate: FeatureGate,
    thresholds: Thresholds,
}

impl Engine {
    /// Engine with the built-in catalog and the standard layers
    pub fn new(config: Config) -> Result<Self, EngineError> {
        Self::with_rules(config, builtin_rules(), LayerRegistry::standard())
    }

    /// Engine with a custom catalog and registry
    pub fn with_rules(
        config: Config,
        rules: Vec<Rule>,
        registry: LayerRegistry,
    ) -> Result<Self, EngineError> {
        for rule in &rules {
            if let Some(layer) = rule.layers.iter().find(|l| !registry.contains(l)) {
                return Err(EngineError::UnknownLayer {
                    rule: rule.id.to_string(),
                    layer: layer.to_string(),
                });
            }
        }

        if let Some(unknown) = config
            .referenced_rule_ids()
            .find(|id| !rules.iter().any(|r| r.id == *id))
        {
            return Err(EngineError::UnknownRule(unknown.to_string()));
        }

        let active = rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| {
                rule.enabled
                    && config.is_rule_enabled(rule.id)
                    && config.is_topic_enabled(rule.topic)
            })
            .map(|(i, _)| i)
            .collect();
        let thresholds = config.resolved_thresholds();

        Ok(Self {
            config,
            rules,
            active,
            registry,
            gate: FeatureGate::default(),
            thresholds,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &FeatureGate {
        &self.gate
    }

    /// Full catalog, including rules the configuration switched off
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Rules that run on every gated feature
    pub fn active_rules(&self) -> impl Iterator<Item = &Rule> {
        self.active.iter().map(|&i| &self.rules[i])
    }

    pub fn is_active(&self, rule_id: &str) -> bool {
        self.active_rules().any(|r| r.id == rule_id)
    }

    /// Evaluate one feature; empty when the gate rejects it
    pub fn evaluate(&self, feature: &Feature) -> Vec<Diagnostic> {
        self.evaluate_feature(feature, false)
            .map(|e| e.diagnostics)
            .unwrap_or_default()
    }

    /// Evaluate a bare tag set as feature 0
    pub fn check_tags(&self, tags: &Tags) -> Vec<Diagnostic> {
        self.evaluate(&Feature::new(0).with_tags(tags.clone()))
    }

    fn evaluate_feature(&self, feature: &Feature, timing: bool) -> Option<Evaluation> {
        let view = feature.tags();
        let highway = self.gate.classify(&view)?;
        let ctx = RuleContext::new(view, highway, &self.thresholds);

        let mut diagnostics = Vec::new();
        let mut samples = Vec::with_capacity(if timing { self.active.len() } else { 0 });

        for rule in self.active_rules() {
            let start = timing.then(Instant::now);
            let findings = rule.check(&ctx);
            if let Some(start) = start {
                samples.push((start.elapsed(), findings.len()));
            }

            let style = self.config.get_style_override(rule.id);
            diagnostics.extend(findings.iter().map(|finding| {
                let diagnostic = Diagnostic::from_finding(rule.id, finding, feature);
                match style {
                    Some(style) => diagnostic.with_style(style),
                    None => diagnostic,
                }
            }));
        }

        Some(Evaluation {
            diagnostics,
            samples,
        })
    }

    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = if self.config.engine.jobs > 0 {
            self.config.engine.jobs
        } else {
            num_cpus::get()
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("cannot build thread pool ({}), checking serially", e);
                None
            }
        }
    }

    /// Check every feature of a source and hand the diagnostics to a sink
    ///
    /// Record errors from the source are logged and counted; any other source
    /// error ends the run after the sink has been finished, so diagnostics
    /// recorded so far are kept.
    pub fn run<I, S>(&self, features: I, sink: &mut S) -> Result<RunSummary, EngineError>
    where
        I: IntoIterator<Item = Result<Feature, SourceError>>,
        S: DiagnosticSink + ?Sized,
    {
        let start = Instant::now();
        let pool = if self.config.engine.parallel {
            self.build_pool()
        } else {
            None
        };
        let batch_size = self.config.engine.batch_size.max(1);

        log::info!(
            "checking with {} of {} rules, batches of {}",
            self.active.len(),
            self.rules.len(),
            batch_size
        );

        let mut summary = RunSummary::default();
        let mut features = features.into_iter();
        let mut batch = Vec::with_capacity(batch_size);

        loop {
            batch.clear();
            let mut fatal = None;
            for item in features.by_ref() {
                match item {
                    Ok(feature) => {
                        batch.push(feature);
                        if batch.len() == batch_size {
                            break;
                        }
                    }
                    Err(e) if e.is_record_error() => {
                        log::warn!("skipping input record: {}", e);
                        summary.malformed_records += 1;
                    }
                    Err(e) => {
                        fatal = Some(e);
                        break;
                    }
                }
            }

            if let Err(e) = self.process_batch(&batch, pool.as_ref(), sink, &mut summary) {
                if let Err(finish) = sink.finish() {
                    log::warn!("sink could not be finished after an error: {}", finish);
                }
                return Err(e);
            }

            if let Some(e) = fatal {
                sink.finish()?;
                return Err(e.into());
            }
            if batch.len() < batch_size {
                break;
            }
        }

        sink.finish()?;
        summary.duration = start.elapsed();

        log::info!(
            "checked {} of {} ways in {:.2?}: {} diagnostics on {} ways",
            summary.evaluated,
            summary.features_read,
            summary.duration,
            summary.diagnostics(),
            summary.with_findings
        );
        Ok(summary)
    }

    fn process_batch<S: DiagnosticSink + ?Sized>(
        &self,
        batch: &[Feature],
        pool: Option<&rayon::ThreadPool>,
        sink: &mut S,
        summary: &mut RunSummary,
    ) -> Result<(), EngineError> {
        if batch.is_empty() {
            return Ok(());
        }
        let timing = self.config.engine.timing;

        let evaluations: Vec<Option<Evaluation>> = match pool {
            Some(pool) => pool.install(|| {
                batch
                    .par_iter()
                    .map(|f| self.evaluate_feature(f, timing))
                    .collect()
            }),
            None => batch
                .iter()
                .map(|f| self.evaluate_feature(f, timing))
                .collect(),
        };

        for (feature, evaluation) in batch.iter().zip(evaluations) {
            summary.features_read += 1;
            let Some(evaluation) = evaluation else {
                summary.skipped_by_gate += 1;
                continue;
            };
            summary.evaluated += 1;

            for (rule, (elapsed, matches)) in self.active_rules().zip(&evaluation.samples) {
                let entry = summary
                    .rule_timings
                    .entry(rule.id.to_string())
                    .or_insert_with(|| RuleTiming::new(rule.id));
                entry.total_time += *elapsed;
                entry.evaluation_count += 1;
                entry.match_count += matches;
            }

            if evaluation.diagnostics.is_empty() {
                continue;
            }
            summary.with_findings += 1;

            match deliver(sink, feature, &evaluation.diagnostics)? {
                Delivery::Recorded(_) => summary.record_delivery(&evaluation.diagnostics),
                Delivery::Dropped => summary.geometry_failures += 1,
                Delivery::Empty => {}
            }
        }
        Ok(())
    }
}
