//! Diagnostic sinks
//!
//! A sink receives every diagnostic together with the geometry of the way it
//! was found on. Sinks are driven from a single thread; they serialize their
//! own writes and need no locking.

mod json;
mod memory;
mod sqlite;
mod text;

pub use json::JsonLinesSink;
pub use memory::MemorySink;
pub use sqlite::SqliteSink;
pub use text::TextSink;

use crate::diagnostic::Diagnostic;
use crate::feature::{Feature, LineString};
use thiserror::Error;

/// Sink error
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Layer '{0}' is not registered with this sink")]
    UnknownLayer(String),
}

/// Receiver of categorized diagnostics
pub trait DiagnosticSink {
    /// Persist one diagnostic
    fn record(&mut self, diagnostic: &Diagnostic, geometry: &LineString) -> Result<(), SinkError>;

    /// Flush and commit; called once after the last feature
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn record(&mut self, diagnostic: &Diagnostic, geometry: &LineString) -> Result<(), SinkError> {
        (**self).record(diagnostic, geometry)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

/// Outcome of handing one feature's diagnostics to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Diagnostics recorded
    Recorded(usize),
    /// The feature had nothing to report
    Empty,
    /// Geometry unavailable; the feature's diagnostics were dropped
    Dropped,
}

/// Materialize the geometry once and record every diagnostic of a feature
///
/// A feature whose geometry cannot be derived is logged and skipped; only
/// sink failures are returned as errors.
pub fn deliver<S: DiagnosticSink + ?Sized>(
    sink: &mut S,
    feature: &Feature,
    diagnostics: &[Diagnostic],
) -> Result<Delivery, SinkError> {
    if diagnostics.is_empty() {
        return Ok(Delivery::Empty);
    }

    let geometry = match feature.geometry() {
        Ok(geometry) => geometry,
        Err(e) => {
            log::warn!(
                "way {}: {}, dropping {} diagnostics",
                feature.id,
                e,
                diagnostics.len()
            );
            return Ok(Delivery::Dropped);
        }
    };

    for diagnostic in diagnostics {
        log::debug!(" way {} {}", feature.id, diagnostic.message);
        sink.record(diagnostic, &geometry)?;
    }
    Ok(Delivery::Recorded(diagnostics.len()))
}
