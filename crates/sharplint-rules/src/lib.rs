//! Sharplint Rules
//!
//! Built-in analyzers, their code fixes and the refactorings, together with
//! the engines that run them over a [`sharplint_core::Document`].

pub mod analyzers;
pub mod engine;
pub mod fixes;
pub mod negation;
pub mod refactorings;
pub mod shape;

pub use analyzers::{AnalysisContext, Analyzer, builtin_analyzers};
pub use engine::{
    AnalysisEngine, FixAllResult, FixEngine, FixPreview, RegisteredRule, RuleCatalogEntry,
    RuleRegistry, unified_diff,
};
pub use fixes::{CodeFix, CodeFixProvider, FixContext, FixOutcome, builtin_fix_providers};
pub use refactorings::{Refactoring, builtin_refactorings};
pub use shape::{Shape, ShapeInfo, ShapeKind};

/// Shared registry with every built-in rule
pub fn builtin_registry() -> sharplint_core::Result<std::sync::Arc<RuleRegistry>> {
    RuleRegistry::builtin().map(std::sync::Arc::new)
}
