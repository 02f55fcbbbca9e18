//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! support for validation results and link outcomes.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use ediflow_core::LinkOutcome;
use ediflow_schemas::{ResultStatus, ScriptResult, ValidationErrors};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation result in its wire shape
    fn format_script_result(&self, result: &ScriptResult) -> Result<String>;

    /// Format the individual violations with their paths
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;

    /// Format the outcome of linking one document
    fn format_link_outcome(&self, outcome: &LinkOutcome) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_script_result(&self, result: &ScriptResult) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_script_result_human(result)),
            _ => self.format(result),
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_errors_human(errors)),
            _ => self.format(errors),
        }
    }

    fn format_link_outcome(&self, outcome: &LinkOutcome) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_link_outcome_human(outcome)),
            _ => self.format(outcome),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Whether the output is meant for people rather than programs
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!("Outputting data: {}", formatted);
        self.writeln(formatted.trim_end())
    }

    /// Write a validation result
    pub fn script_result(&mut self, result: &ScriptResult) -> Result<()> {
        let formatted = self.format.format_script_result(result)?;

        if self.is_human() && self.use_color {
            let line = if result.success {
                formatted.green().to_string()
            } else {
                formatted.red().to_string()
            };
            return self.writeln(&line);
        }

        self.writeln(formatted.trim_end())
    }

    /// Write the individual violations of an invalid payload
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        if errors.is_empty() {
            return Ok(());
        }
        let formatted = self.format.format_validation_errors(errors)?;
        self.writeln(formatted.trim_end())
    }

    /// Write the outcome of a link run
    pub fn link_outcome(&mut self, outcome: &LinkOutcome) -> Result<()> {
        let formatted = self.format.format_link_outcome(outcome)?;

        if self.is_human() && self.use_color {
            let line = match outcome {
                LinkOutcome::Linked { .. } => formatted.green().to_string(),
                LinkOutcome::WriteFailed { .. } => formatted.red().to_string(),
                _ => formatted.yellow().to_string(),
            };
            return self.writeln(&line);
        }

        self.writeln(formatted.trim_end())
    }
}

/// Format a validation result for human reading
fn format_script_result_human(result: &ScriptResult) -> String {
    let marker = if result.status == ResultStatus::Valid { "✓" } else { "✗" };
    if result.error_message.is_empty() {
        format!("{} {}", marker, result.status)
    } else {
        format!("{} {}: {}", marker, result.status, result.error_message)
    }
}

/// Format violations for human reading, one per line
fn format_validation_errors_human(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, error)| format!("  {}. {} [{}] {}", i + 1, error.path, error.rule, error.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a link outcome for human reading
fn format_link_outcome_human(outcome: &LinkOutcome) -> String {
    match outcome {
        LinkOutcome::Linked { update } => format!(
            "✓ Linked {}: {} = {}",
            update.record_id, update.field, update.value
        ),
        LinkOutcome::Unlinked { candidates_checked } => format!(
            "• No matching record among {} candidate(s), field left blank",
            candidates_checked
        ),
        LinkOutcome::Skipped { reason } => {
            let reason = match reason {
                ediflow_core::SkipReason::MissingTargetKey => "document has no reference key",
                ediflow_core::SkipReason::MissingOwnerId => "document has no owner",
            };
            format!("• Skipped: {}", reason)
        }
        LinkOutcome::WriteFailed { update, message } => format!(
            "✗ Matched {} but could not set {} on {}: {}",
            update.value, update.field, update.record_id, message
        ),
    }
}
