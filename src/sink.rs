//! Result sinks
//!
//! A `ResultSink` receives every settlement, every recovered lookup
//! failure and every accepted selection. `ConsoleSink` is the one the
//! binary uses: plain text for people, JSON lines for scripts.

use std::io::{self, Write};

use serde::Serialize;

use crate::query::coordinator::Settlement;
use crate::query::normalize::NormalizedQuery;
use crate::source::SourceError;
use crate::suggestion::SelectedItem;

pub trait ResultSink {
    /// A pipeline run produced its final visible list
    fn settled(&mut self, settlement: &Settlement);

    /// A remote lookup failed and was recovered locally
    fn lookup_failed(&mut self, _query: &NormalizedQuery, _error: &SourceError) {}

    /// The user accepted a suggestion
    fn selected(&mut self, _item: &SelectedItem) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes settlements to a terminal or pipe
pub struct ConsoleSink {
    format: OutputFormat,
    writer: Box<dyn Write>,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat, writer: Box<dyn Write>) -> Self {
        Self { format, writer }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, Box::new(io::stdout()))
    }

    fn emit(&mut self, line: String) {
        // Output is best effort; a closed pipe must not stop the input loop
        if let Err(e) = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush()) {
            log::warn!("Failed to write output: {}", e);
        }
    }

    fn emit_json<T: Serialize>(&mut self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => self.emit(line),
            Err(e) => log::warn!("Failed to serialize output: {}", e),
        }
    }
}

impl ResultSink for ConsoleSink {
    fn settled(&mut self, settlement: &Settlement) {
        match self.format {
            OutputFormat::Text => self.emit(render_settlement(settlement)),
            OutputFormat::Json => self.emit_json(settlement),
        }
    }

    fn lookup_failed(&mut self, query: &NormalizedQuery, error: &SourceError) {
        if self.format == OutputFormat::Text {
            log::info!("Lookup for '{}' failed: {}", query, error);
        }
    }

    fn selected(&mut self, item: &SelectedItem) {
        match self.format {
            OutputFormat::Text => self.emit(render_selection(item)),
            OutputFormat::Json => self.emit_json(item),
        }
    }
}

/// Human-readable form of a settlement
pub fn render_settlement(settlement: &Settlement) -> String {
    if settlement.suggestions.is_empty() {
        return format!("No suggestions for \"{}\"", settlement.query);
    }

    let mut lines = vec![format!(
        "Suggestions for \"{}\" ({}):",
        settlement.query,
        settlement.origin.label()
    )];
    for (i, suggestion) in settlement.suggestions.iter().enumerate() {
        lines.push(format!(
            "{:>3}. {} [{}]",
            i + 1,
            suggestion.primary_common_name,
            suggestion.kind
        ));
        if !suggestion.scientific_name.is_empty() {
            lines.push(format!("     {}", suggestion.scientific_name));
        }
        if !suggestion.additional_common_names.is_empty() {
            lines.push(format!(
                "     Also known as: {}",
                suggestion.additional_common_names.join(", ")
            ));
        }
    }
    lines.join("\n")
}

pub fn render_selection(item: &SelectedItem) -> String {
    format!("Selected {} ({}) as {}", item.label, item.id, item.kind)
}
