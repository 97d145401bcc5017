//! Diagnostics produced by analyzers
//!
//! A [`Diagnostic`] names its rule, its severity and a primary [`Location`]
//! that is always a sub-span of the analysed node. Analyzers hand diagnostics
//! to a [`DiagnosticSink`]; the engine collects them concurrently in a
//! [`DiagnosticCollector`] and sorts them before returning.

mod sink;
mod source_map;
mod types;

pub use sink::{DiagnosticCollector, DiagnosticSink, sort_diagnostics};
pub use source_map::SourceMap;
pub use types::{Diagnostic, Location, Severity};
