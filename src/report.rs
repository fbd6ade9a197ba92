//! Run summary rendering

use crate::diagnostic::Style;
use crate::engine::RunSummary;
use colored::*;

/// Renders a [`RunSummary`] for the console
#[derive(Debug, Clone)]
pub struct SummaryReport {
    /// Enable colored output
    pub colored: bool,
    /// Append the per-rule timing table
    pub show_timings: bool,
}

impl Default for SummaryReport {
    fn default() -> Self {
        Self {
            colored: true,
            show_timings: false,
        }
    }
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

impl SummaryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    pub fn with_timings(mut self) -> Self {
        self.show_timings = true;
        self
    }

    fn style_count(&self, style: Style, count: usize) -> String {
        let s = format!("{} {}", count, style);
        if !self.colored {
            return s;
        }
        match style {
            Style::Default => s.red().bold().to_string(),
            Style::Redundant => s.yellow().to_string(),
            Style::Ref => s.blue().bold().to_string(),
        }
    }

    pub fn format(&self, summary: &RunSummary) -> String {
        let mut output = format!(
            "\n{} read, {} checked, {} skipped",
            plural(summary.features_read, "way", "ways"),
            summary.evaluated,
            summary.skipped_by_gate
        );
        if summary.malformed_records > 0 {
            output.push_str(&format!(
                ", {}",
                plural(summary.malformed_records, "malformed record", "malformed records")
            ));
        }
        output.push_str(&format!(" in {:.2?}\n", summary.duration));

        let total = summary.diagnostics();
        if total == 0 {
            let clean = "No problems found";
            if self.colored {
                output.push_str(&format!("{}\n", clean.green().bold()));
            } else {
                output.push_str(clean);
                output.push('\n');
            }
        } else {
            let styles: Vec<String> = summary
                .per_style
                .iter()
                .map(|(&style, &count)| self.style_count(style, count))
                .collect();
            output.push_str(&format!(
                "{} on {} ({})\n",
                plural(total, "diagnostic", "diagnostics"),
                plural(summary.with_findings, "way", "ways"),
                styles.join(", ")
            ));

            for (layer, count) in &summary.per_layer {
                let name = if self.colored {
                    layer.bold().to_string()
                } else {
                    layer.clone()
                };
                output.push_str(&format!("  {:<20} {:>8}\n", name, count));
            }
        }

        if summary.geometry_failures > 0 {
            let note = format!(
                "{} dropped without geometry",
                plural(summary.geometry_failures, "way", "ways")
            );
            if self.colored {
                output.push_str(&format!("{}\n", note.yellow()));
            } else {
                output.push_str(&note);
                output.push('\n');
            }
        }

        if self.show_timings {
            output.push('\n');
            output.push_str(&summary.format_timings());
        }

        output
    }
}
