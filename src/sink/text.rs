//! Human-readable console sink

use super::{DiagnosticSink, SinkError};
use crate::diagnostic::{Diagnostic, Style};
use crate::feature::LineString;
use colored::*;
use std::io::Write;

/// One line per diagnostic: ` way <id> [<layer>] <message> (<rule>)`
pub struct TextSink<W: Write> {
    writer: W,
    /// Enable colored output
    pub colored: bool,
    /// Append author and changeset
    pub show_provenance: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            colored: true,
            show_provenance: false,
        }
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    pub fn with_provenance(mut self) -> Self {
        self.show_provenance = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn layer_str(&self, diag: &Diagnostic) -> ColoredString {
        let s = format!("[{}]", diag.layer);
        if !self.colored {
            return s.normal();
        }
        match diag.style {
            Style::Default => s.red().bold(),
            Style::Redundant => s.yellow(),
            Style::Ref => s.blue().bold(),
        }
    }

    /// Format a single diagnostic
    pub fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let rule = format!("({})", diag.rule_id);
        let mut line = format!(
            " way {} {} {} {}",
            diag.feature_id,
            self.layer_str(diag),
            diag.message,
            if self.colored {
                rule.dimmed().to_string()
            } else {
                rule
            }
        );
        if self.show_provenance {
            line.push_str(&format!(
                " by {} in changeset {}",
                diag.provenance.user, diag.provenance.changeset
            ));
        }
        line
    }
}

impl<W: Write> DiagnosticSink for TextSink<W> {
    fn record(&mut self, diagnostic: &Diagnostic, _geometry: &LineString) -> Result<(), SinkError> {
        let line = self.format_diagnostic(diagnostic);
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
