//! In-memory sink

use super::{DiagnosticSink, SinkError};
use crate::diagnostic::Diagnostic;
use crate::feature::LineString;

/// Keeps every recorded diagnostic with its geometry
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<(Diagnostic, LineString)>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().map(|(d, _)| d)
    }

    pub fn records(&self) -> &[(Diagnostic, LineString)] {
        &self.records
    }

    /// Diagnostics in one layer
    pub fn in_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics().filter(move |d| d.layer == layer)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.records.into_iter().map(|(d, _)| d).collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&mut self, diagnostic: &Diagnostic, geometry: &LineString) -> Result<(), SinkError> {
        self.records.push((diagnostic.clone(), geometry.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}
