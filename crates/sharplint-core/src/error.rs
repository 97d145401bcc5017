//! Error types for analysis and fix operations
//!
//! Shape mismatches and semantic "unknown" answers are not errors: extractors
//! return `None` and analyzers abstain. The variants below cover failures the
//! caller has to see.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sharplint operations
#[derive(Debug, Error)]
pub enum SharplintError {
    /// Source text could not be parsed into a usable tree
    #[error("Parse error: {message} at {location}")]
    ParseError {
        message: String,
        location: Box<crate::diagnostics::Location>,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule registration or execution errors
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// A caller broke an API precondition, e.g. a foreign node or rule id
    #[error("Contract violation: {message}")]
    ContractViolation { message: String },

    /// A fix was requested explicitly but its shape no longer matches
    #[error("Fix for '{rule_id}' is not applicable: {reason}")]
    FixNotApplicable { rule_id: String, reason: String },

    /// The run was cancelled before it produced a result
    #[error("Operation cancelled")]
    Cancelled,

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Rule,
    Contract,
    FixNotApplicable,
    Cancelled,
    Io,
    Internal,
}

impl SharplintError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SharplintError::ParseError { .. } => ErrorKind::Parse,
            SharplintError::ConfigError { .. } => ErrorKind::Config,
            SharplintError::RuleError { .. } => ErrorKind::Rule,
            SharplintError::ContractViolation { .. } => ErrorKind::Contract,
            SharplintError::FixNotApplicable { .. } => ErrorKind::FixNotApplicable,
            SharplintError::Cancelled => ErrorKind::Cancelled,
            SharplintError::IoError { .. } => ErrorKind::Io,
            SharplintError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (processing of other rules can continue)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Rule | ErrorKind::FixNotApplicable
        )
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, location: crate::diagnostics::Location) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Box::new(location),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create a contract violation
    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::ContractViolation {
            message: message.into(),
        }
    }

    pub fn fix_not_applicable(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FixNotApplicable {
            rule_id: rule_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for SharplintError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
