//! GeoJSON lines sink

use super::{DiagnosticSink, SinkError};
use crate::diagnostic::Diagnostic;
use crate::feature::LineString;
use serde::Serialize;
use std::io::Write;

/// Writes one GeoJSON `Feature` per diagnostic, one per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
    /// Pretty print with indentation (breaks the one-per-line framing)
    pub pretty: bool,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(Serialize)]
struct GeoJsonFeature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: GeoJsonGeometry,
    properties: GeoJsonProperties<'a>,
}

#[derive(Serialize)]
struct GeoJsonGeometry {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<[f64; 2]>,
}

#[derive(Serialize)]
struct GeoJsonProperties<'a> {
    id: i64,
    rule: &'a str,
    layer: &'a str,
    style: String,
    problem: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    user: &'a str,
    changeset: i64,
    timestamp: &'a str,
    version: u32,
}

impl<'a> GeoJsonFeature<'a> {
    fn new(d: &'a Diagnostic, geometry: &LineString) -> Self {
        Self {
            kind: "Feature",
            geometry: GeoJsonGeometry {
                kind: "LineString",
                coordinates: geometry.coordinates(),
            },
            properties: GeoJsonProperties {
                id: d.feature_id,
                rule: &d.rule_id,
                layer: &d.layer,
                style: d.style.to_string(),
                problem: &d.message,
                key: d.key.as_deref(),
                value: d.value.as_deref(),
                user: &d.provenance.user,
                changeset: d.provenance.changeset,
                timestamp: &d.provenance.timestamp,
                version: d.provenance.version,
            },
        }
    }
}

impl<W: Write> DiagnosticSink for JsonLinesSink<W> {
    fn record(&mut self, diagnostic: &Diagnostic, geometry: &LineString) -> Result<(), SinkError> {
        let feature = GeoJsonFeature::new(diagnostic, geometry);
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &feature)?;
        } else {
            serde_json::to_writer(&mut self.writer, &feature)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
