//! Core diagnostic types

use rowan::{TextRange, TextSize};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::rules::RuleCategory;

/// Represents a diagnostic message from analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that generated this diagnostic
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Human-readable message, with `format_args` already substituted
    pub message: String,
    /// Primary location in the source file
    pub location: Location,
    /// Arguments substituted into the rule's message template
    pub format_args: Vec<String>,
    /// Secondary locations (e.g. the other half of a simplifiable chain)
    pub additional_locations: Vec<Location>,
    /// Marks text that becomes redundant once the primary diagnostic is fixed
    pub fade_out: bool,
    /// Optional error code
    pub code: Option<String>,
    /// Category of the reporting rule
    pub category: Option<RuleCategory>,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span in bytes (zero for insertion points)
    pub length: usize,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            format_args: Vec::new(),
            additional_locations: Vec::new(),
            fade_out: false,
            code: None,
            category: None,
        }
    }

    pub fn with_format_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.format_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add a secondary location
    pub fn with_additional_location(mut self, location: Location) -> Self {
        self.additional_locations.push(location);
        self
    }

    /// Mark this diagnostic as a fade-out companion
    pub fn with_fade_out(mut self) -> Self {
        self.fade_out = true;
        self
    }

    /// Set the category for this diagnostic
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the error code for this diagnostic
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Primary span as a text range
    pub fn range(&self) -> TextRange {
        self.location.range()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            line: 0,
            column: 0,
            end_line: 0,
            end_column: 0,
            offset: 0,
            length: 0,
        }
    }
}

impl Location {
    pub fn range(&self) -> TextRange {
        TextRange::at(
            TextSize::from(self.offset as u32),
            TextSize::from(self.length as u32),
        )
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.rule_id, self.message
        )
    }
}
