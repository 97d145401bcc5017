//! Sharplint Core
//!
//! Core building blocks of the sharplint analyzer for a C#-like language.
//! This crate provides the lossless syntax tree, immutable documents with
//! structural edits, diagnostics, the semantic oracle boundary and the
//! configuration shared by all rules.

pub mod cancel;
pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod result;
pub mod rules;
pub mod semantic;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use config::{AnalyzerOptions, ConfigLoader, RuleSeverity, RulesConfiguration};
pub use cst::rewrite::TriviaPolicy;
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken, parse_source};
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticSink, Location, Severity, SourceMap,
};
pub use document::Document;
pub use error::{ErrorKind, SharplintError};
pub use result::{Result, ResultExt};
pub use rules::{RuleCategory, RuleMetadata};
pub use semantic::{
    ConversionKind, NoSemantics, SemanticModel, SemanticOracle, SymbolHandle, SymbolKind,
    TypeHandle, TypeKind,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
