//! Waylint - tag consistency checker for road and path ways
//!
//! Reads ways exported from OpenStreetMap, runs a catalog of pure rules over
//! the tags of every road or path, and hands the resulting diagnostics to a
//! sink grouped into named layers.
//!
//! # Architecture
//!
//! ```text
//! Source -> Engine -> FeatureGate -> Rules -> Diagnostics -> Sink
//! ```
//!
//! Rules never touch the sink. They look at a [`rule::RuleContext`] and
//! return [`finding::Finding`]s; the engine binds them to the feature,
//! applies configured style overrides and delivers them in input order.
//!
//! # Example
//!
//! ```
//! use waylint::{Config, Engine, Feature};
//!
//! let engine = Engine::new(Config::default()).unwrap();
//! let way = Feature::new(1)
//!     .with_tag("highway", "residential")
//!     .with_tag("oneway", "no");
//!
//! let diagnostics = engine.evaluate(&way);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].message, "oneway=no is redundant");
//! ```

pub mod combinations;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod feature;
pub mod finding;
pub mod gate;
pub mod layer;
pub mod report;
pub mod rule;
pub mod rules;
pub mod sink;
pub mod source;
pub mod tags;
pub mod thresholds;
pub mod vocabulary;

// Re-export main types
pub use combinations::{AccessCombinations, Combination};
pub use config::Config;
pub use diagnostic::{Diagnostic, Style};
pub use engine::{Engine, EngineError, RuleTiming, RunSummary};
pub use feature::{Feature, GeometryError, LineString, Point, Provenance};
pub use finding::{Finding, FindingKind, TagPair};
pub use gate::FeatureGate;
pub use layer::{LayerInfo, LayerRegistry};
pub use report::SummaryReport;
pub use rule::{Rule, RuleContext, Topic};
pub use sink::{DiagnosticSink, JsonLinesSink, MemorySink, SinkError, SqliteSink, TextSink};
pub use source::{NdjsonSource, OsmXmlSource, SourceError, SourceFormat};
pub use tags::{TagView, Tags};
pub use thresholds::{ThresholdOverrides, Thresholds};
