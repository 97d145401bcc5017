//! Code fixes
//!
//! A [`CodeFixProvider`] turns a diagnostic back into an edit. Providers never
//! trust the diagnostic span on its own: they locate the anchor node from the
//! span, re-run the analyzer's detection function on it and only then build
//! the replacement. If the tree moved on since the diagnostic was computed,
//! the fix comes back as [`FixOutcome::NotApplicable`] instead of an edit.
//!
//! Every fix maps one [`Document`] snapshot to a new one; the input snapshot
//! is never touched.

mod branching;
mod formatting;
mod linq;
mod ordering;
mod redundancy;

pub use branching::SimplifyCodeBranchingFix;
pub use formatting::{AddEmptyLineBetweenDeclarationsFix, PlaceBinaryOperatorAtLineStartFix};
pub use linq::{CallThenByInsteadOfOrderByFix, SimplifyLinqMethodChainFix};
pub use ordering::{
    DefaultLabelShouldBeLastFix, ReorderModifiersFix, ReorderTypeParameterConstraintsFix,
};
pub use redundancy::{
    AddArgumentListToObjectCreationFix, RemoveEmptyElseClauseFix, RemoveRedundantAsOperatorFix,
    RemoveRedundantCastFix, UseIsOperatorInsteadOfAsFix, UseMethodGroupInsteadOfLambdaFix,
};

use std::sync::Arc;

use rowan::{GreenNode, TextRange};
use sharplint_core::cst::{SyntaxElement, SyntaxKind, SyntaxNode, covering_node_of_kind};
use sharplint_core::{
    AnalyzerOptions, Diagnostic, Document, Result, SemanticOracle, SharplintError,
};

/// Builds edits for the diagnostics of one or more rules
pub trait CodeFixProvider: Send + Sync {
    /// Rule IDs whose diagnostics this provider can fix
    fn fixable_rule_ids(&self) -> &'static [&'static str];

    /// Title shown for the fix
    fn title(&self) -> &'static str;

    /// Key under which fix-all groups this fix with others
    fn equivalence_key(&self, diagnostic: &Diagnostic) -> String {
        diagnostic.rule_id.clone()
    }

    /// Build the fix for the diagnostic in `ctx`
    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome>;

    /// [`CodeFixProvider::build_fix`] behind the rule ID contract check
    fn provide_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let rule_id = &ctx.diagnostic().rule_id;
        if !self.fixable_rule_ids().contains(&rule_id.as_str()) {
            return Err(SharplintError::contract_violation(format!(
                "fix '{}' does not handle diagnostics of rule '{}'",
                self.title(),
                rule_id
            )));
        }
        self.build_fix(ctx)
    }
}

/// Inputs of a single fix
pub struct FixContext<'a> {
    document: &'a Document,
    diagnostic: &'a Diagnostic,
    root: SyntaxNode,
    oracle: &'a dyn SemanticOracle,
    options: &'a AnalyzerOptions,
}

impl<'a> FixContext<'a> {
    pub fn new(
        document: &'a Document,
        diagnostic: &'a Diagnostic,
        oracle: &'a dyn SemanticOracle,
        options: &'a AnalyzerOptions,
    ) -> Self {
        Self {
            document,
            diagnostic,
            root: document.syntax(),
            oracle,
            options,
        }
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        self.diagnostic
    }

    /// Red root of the document; nodes found through it belong to the document
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn oracle(&self) -> &dyn SemanticOracle {
        self.oracle
    }

    pub fn options(&self) -> &AnalyzerOptions {
        self.options
    }

    /// Primary span, or `None` when it no longer fits in the document
    pub fn span(&self) -> Option<TextRange> {
        let range = self.diagnostic.location.range();
        self.root.text_range().contains_range(range).then_some(range)
    }

    /// Element covering the primary span
    pub fn anchor(&self) -> Option<SyntaxElement> {
        Some(self.root.covering_element(self.span()?))
    }

    /// Innermost node of `kind` covering the primary span
    pub fn node_of_kind(&self, kind: SyntaxKind) -> Option<SyntaxNode> {
        covering_node_of_kind(&self.root, self.span()?, kind)
    }

    /// Innermost node of any of `kinds` covering the primary span
    pub fn node_of_kinds(&self, kinds: &[SyntaxKind]) -> Option<SyntaxNode> {
        let start = match self.anchor()? {
            rowan::NodeOrToken::Node(node) => node,
            rowan::NodeOrToken::Token(token) => token.parent()?,
        };
        start.ancestors().find(|node| kinds.contains(&node.kind()))
    }
}

/// A built fix: the new snapshot plus what the formatter should look at
#[derive(Debug, Clone)]
pub struct CodeFix {
    pub title: String,
    pub equivalence_key: String,
    pub document: Document,
    /// Ranges of the new subtrees in the new document
    pub format_ranges: Vec<TextRange>,
}

impl CodeFix {
    pub fn new(
        title: impl Into<String>,
        equivalence_key: impl Into<String>,
        document: Document,
    ) -> Self {
        Self {
            title: title.into(),
            equivalence_key: equivalence_key.into(),
            document,
            format_ranges: Vec::new(),
        }
    }

    pub fn with_format_range(mut self, range: TextRange) -> Self {
        self.format_ranges.push(range);
        self
    }
}

/// Result of asking a provider for a fix
#[derive(Debug, Clone)]
pub enum FixOutcome {
    Applied(CodeFix),
    /// The shape is gone; the diagnostic is stale
    NotApplicable { reason: String },
}

impl FixOutcome {
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self::NotApplicable {
            reason: reason.into(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The fix, if one was built
    pub fn into_fix(self) -> Option<CodeFix> {
        match self {
            Self::Applied(fix) => Some(fix),
            Self::NotApplicable { .. } => None,
        }
    }
}

/// Replace `target` with `replacement`, marking the new subtree for formatting
fn replace(
    provider: &dyn CodeFixProvider,
    ctx: &FixContext<'_>,
    target: &SyntaxNode,
    replacement: GreenNode,
) -> Result<FixOutcome> {
    let range = TextRange::at(target.text_range().start(), replacement.text_len());
    let document = ctx.document().replace_node(target, replacement)?;
    Ok(applied(provider, ctx, document).with_format_range(range).into())
}

/// A [`CodeFix`] titled and keyed by `provider`
fn applied(provider: &dyn CodeFixProvider, ctx: &FixContext<'_>, document: Document) -> CodeFix {
    CodeFix::new(
        provider.title(),
        provider.equivalence_key(ctx.diagnostic()),
        document,
    )
}

impl From<CodeFix> for FixOutcome {
    fn from(fix: CodeFix) -> Self {
        Self::Applied(fix)
    }
}

/// Every built-in fix provider
pub fn builtin_fix_providers() -> Vec<Arc<dyn CodeFixProvider>> {
    vec![
        Arc::new(UseIsOperatorInsteadOfAsFix),
        Arc::new(RemoveRedundantAsOperatorFix),
        Arc::new(RemoveRedundantCastFix),
        Arc::new(RemoveEmptyElseClauseFix),
        Arc::new(UseMethodGroupInsteadOfLambdaFix),
        Arc::new(SimplifyLinqMethodChainFix),
        Arc::new(CallThenByInsteadOfOrderByFix),
        Arc::new(SimplifyCodeBranchingFix),
        Arc::new(AddArgumentListToObjectCreationFix),
        Arc::new(AddEmptyLineBetweenDeclarationsFix),
        Arc::new(PlaceBinaryOperatorAtLineStartFix),
        Arc::new(DefaultLabelShouldBeLastFix),
        Arc::new(ReorderModifiersFix),
        Arc::new(ReorderTypeParameterConstraintsFix),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use sharplint_core::{Document, SemanticModel};

    use super::{CodeFixProvider, FixContext, FixOutcome};
    use crate::analyzers::Analyzer;
    use crate::analyzers::test_support::{all_rules, run};

    /// Text after applying the fix for the first diagnostic of `analyzer`
    pub(crate) fn fixed(
        analyzer: &dyn Analyzer,
        provider: &dyn CodeFixProvider,
        source: &str,
    ) -> Option<String> {
        let diagnostics = run(analyzer, source);
        let diagnostic = diagnostics.iter().find(|d| !d.fade_out)?;
        let document = Document::parse("test.cs", source);
        let oracle = SemanticModel::for_document(&document);
        let options = all_rules();
        let ctx = FixContext::new(&document, diagnostic, &oracle, &options);
        match provider.provide_fix(&ctx).unwrap() {
            FixOutcome::Applied(fix) => Some(fix.document.text()),
            FixOutcome::NotApplicable { .. } => None,
        }
    }

    /// Like [`fixed`], failing the test when no fix was produced
    pub(crate) fn fix(
        analyzer: &dyn Analyzer,
        provider: &dyn CodeFixProvider,
        source: &str,
    ) -> String {
        fixed(analyzer, provider, source).unwrap_or_else(|| panic!("no fix for {source:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::{Location, SemanticModel, Severity};

    fn diagnostic(rule_id: &str, offset: usize, length: usize) -> Diagnostic {
        Diagnostic::new(
            rule_id,
            Severity::Hint,
            "test",
            Location {
                file: "test.cs".into(),
                line: 1,
                column: offset + 1,
                end_line: 1,
                end_column: offset + length + 1,
                offset,
                length,
            },
        )
    }

    #[test]
    fn foreign_rule_is_a_contract_violation() {
        let document = Document::parse("test.cs", "class C { }");
        let oracle = SemanticModel::for_document(&document);
        let options = AnalyzerOptions::default();
        let diagnostic = diagnostic("style/reorder-modifiers", 0, 5);
        let ctx = FixContext::new(&document, &diagnostic, &oracle, &options);
        let err = RemoveEmptyElseClauseFix.provide_fix(&ctx).unwrap_err();
        assert_eq!(err.kind(), sharplint_core::ErrorKind::Contract);
    }

    #[test]
    fn span_past_the_end_is_not_applicable() {
        let document = Document::parse("test.cs", "class C { }");
        let oracle = SemanticModel::for_document(&document);
        let options = AnalyzerOptions::default();
        let diagnostic = diagnostic(crate::analyzers::REMOVE_EMPTY_ELSE_CLAUSE, 40, 8);
        let ctx = FixContext::new(&document, &diagnostic, &oracle, &options);
        assert!(ctx.anchor().is_none());
        let outcome = RemoveEmptyElseClauseFix.provide_fix(&ctx).unwrap();
        assert!(!outcome.is_applied());
    }

    #[test]
    fn every_builtin_rule_has_one_provider() {
        let providers = builtin_fix_providers();
        let analyzers = crate::analyzers::builtin_analyzers();
        for analyzer in &analyzers {
            let id = analyzer.metadata().id.as_str();
            let count = providers
                .iter()
                .filter(|p| p.fixable_rule_ids().contains(&id))
                .count();
            assert_eq!(count, 1, "{id}");
        }
    }
}
