//! Built-in analyzers
//!
//! An analyzer subscribes to a set of node kinds and is called once for
//! every node of those kinds. It inspects the node (through the shape
//! extractors, trivia helpers and the semantic oracle) and reports zero or
//! more diagnostics through its [`AnalysisContext`].
//!
//! Detection logic lives in `pub(crate)` functions so the matching fix
//! provider can re-run exactly the same check on the node it is handed.
//!
//! Analyzers are grouped by family:
//! - [`redundancy`]: structural and oracle-backed simplifications
//! - [`linq`]: method chain rules
//! - [`branching`]: control flow rewrites
//! - [`formatting`]: trivia and layout checks
//! - [`ordering`]: labels, modifiers and constraint clauses

pub mod branching;
pub mod formatting;
pub mod linq;
pub mod ordering;
pub mod redundancy;

use std::sync::Arc;

use rowan::TextRange;
use sharplint_core::cst::trivia;
use sharplint_core::cst::{SyntaxKind, SyntaxNode};
use sharplint_core::{
    AnalyzerOptions, CancellationToken, Diagnostic, DiagnosticSink, RuleMetadata,
    SemanticOracle, Severity, SourceMap,
};

pub use branching::SimplifyCodeBranching;
pub use formatting::{AddEmptyLineBetweenDeclarations, PlaceBinaryOperatorAtLineStart};
pub use linq::{CallThenByInsteadOfOrderBy, SimplifyLinqMethodChain};
pub use ordering::{DefaultLabelShouldBeLast, ReorderModifiers, ReorderTypeParameterConstraints};
pub use redundancy::{
    AddArgumentListToObjectCreation, RemoveEmptyElseClause, RemoveRedundantAsOperator,
    RemoveRedundantCast, UseIsOperatorInsteadOfAs, UseMethodGroupInsteadOfLambda,
};

/// Rule ID for `x as T == null` checks that should use `is`
pub const USE_IS_OPERATOR_INSTEAD_OF_AS: &str = "style/use-is-operator-instead-of-as";

/// Rule ID for `as` conversions to the expression's own type
pub const REMOVE_REDUNDANT_AS_OPERATOR: &str = "complexity/remove-redundant-as-operator";

/// Rule ID for casts to the expression's own type
pub const REMOVE_REDUNDANT_CAST: &str = "complexity/remove-redundant-cast";

/// Rule ID for `else { }`
pub const REMOVE_EMPTY_ELSE_CLAUSE: &str = "complexity/remove-empty-else-clause";

/// Rule ID for `x => M(x)`
pub const USE_METHOD_GROUP_INSTEAD_OF_LAMBDA: &str = "complexity/use-method-group-instead-of-lambda";

/// Rule ID for `Where(p).Any()` and friends
pub const SIMPLIFY_LINQ_METHOD_CHAIN: &str = "complexity/simplify-linq-method-chain";

/// Rule ID for `OrderBy(a).OrderBy(b)`
pub const CALL_THEN_BY_INSTEAD_OF_ORDER_BY: &str = "suspicious/call-then-by-instead-of-order-by";

/// Rule ID for empty `if` branches and `while (true)` loops with a break condition
pub const SIMPLIFY_CODE_BRANCHING: &str = "complexity/simplify-code-branching";

/// Rule ID for `new Foo { ... }` without `()`
pub const ADD_ARGUMENT_LIST_TO_OBJECT_CREATION: &str = "style/add-argument-list-to-object-creation";

/// Rule ID for member declarations on consecutive lines
pub const ADD_EMPTY_LINE_BETWEEN_DECLARATIONS: &str = "style/add-empty-line-between-declarations";

/// Rule ID for binary operators left at the end of a line
pub const PLACE_BINARY_OPERATOR_AT_LINE_START: &str = "style/place-binary-operator-at-line-start";

/// Rule ID for `default:` ahead of other case labels
pub const DEFAULT_LABEL_SHOULD_BE_LAST: &str = "style/default-label-should-be-last";

/// Rule ID for modifiers out of the configured order
pub const REORDER_MODIFIERS: &str = "style/reorder-modifiers";

/// Rule ID for `where` clauses out of type parameter order
pub const REORDER_TYPE_PARAMETER_CONSTRAINTS: &str = "style/reorder-type-parameter-constraints";

/// Analyzer struct holding its metadata, with `new` and `Default`
macro_rules! declare_analyzer {
    ($(#[$attr:meta])* $name:ident => $metadata:expr) => {
        $(#[$attr])*
        pub struct $name {
            metadata: sharplint_core::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self { metadata: $metadata }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

pub(crate) use declare_analyzer;

/// A diagnostic-producing check over syntax nodes
pub trait Analyzer: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Node kinds this analyzer is invoked for
    fn node_kinds(&self) -> &'static [SyntaxKind];

    /// Inspect one node; "does not apply" is silence, never a panic
    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>);
}

/// Everything an analyzer may consult or report to while it runs
pub struct AnalysisContext<'a> {
    root: &'a SyntaxNode,
    oracle: &'a dyn SemanticOracle,
    options: &'a AnalyzerOptions,
    sink: &'a dyn DiagnosticSink,
    cancel: &'a CancellationToken,
    source_map: &'a SourceMap,
    metadata: &'a RuleMetadata,
    severity: Severity,
}

impl<'a> AnalysisContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        root: &'a SyntaxNode,
        oracle: &'a dyn SemanticOracle,
        options: &'a AnalyzerOptions,
        sink: &'a dyn DiagnosticSink,
        cancel: &'a CancellationToken,
        source_map: &'a SourceMap,
        metadata: &'a RuleMetadata,
        severity: Severity,
    ) -> Self {
        Self {
            root,
            oracle,
            options,
            sink,
            cancel,
            source_map,
            metadata,
            severity,
        }
    }

    pub fn root(&self) -> &SyntaxNode {
        self.root
    }

    pub fn oracle(&self) -> &dyn SemanticOracle {
        self.oracle
    }

    pub fn options(&self) -> &AnalyzerOptions {
        self.options
    }

    pub fn cancel(&self) -> &CancellationToken {
        self.cancel
    }

    pub fn metadata(&self) -> &RuleMetadata {
        self.metadata
    }

    /// Report a diagnostic on `range`; returns false when it was suppressed
    pub fn report(&self, range: TextRange, args: &[String]) -> bool {
        self.report_with(range, args, &[])
    }

    /// Report a diagnostic with secondary locations
    pub fn report_with(&self, range: TextRange, args: &[String], additional: &[TextRange]) -> bool {
        if trivia::contains_directive_in(self.root, range) {
            tracing::trace!(rule = %self.metadata.id, ?range, "span crosses a directive");
            return false;
        }
        let mut diagnostic = Diagnostic::new(
            self.metadata.id.clone(),
            self.severity,
            self.metadata.format_message(args),
            self.source_map.location(range),
        )
        .with_format_args(args.iter().cloned())
        .with_category(self.metadata.category.clone());
        for extra in additional {
            diagnostic = diagnostic.with_additional_location(self.source_map.location(*extra));
        }
        self.sink.report(diagnostic);
        true
    }

    /// Report the companion diagnostic for text the fix will remove
    pub fn report_fade_out(&self, range: TextRange, args: &[String]) {
        if !self.options.fade_out || range.is_empty() {
            return;
        }
        let diagnostic = Diagnostic::new(
            self.metadata.fade_out_id(),
            Severity::Hint,
            self.metadata.format_message(args),
            self.source_map.location(range),
        )
        .with_format_args(args.iter().cloned())
        .with_fade_out()
        .with_category(self.metadata.category.clone());
        self.sink.report(diagnostic);
    }
}

/// Every built-in analyzer, in registration order
pub fn builtin_analyzers() -> Vec<Arc<dyn Analyzer>> {
    vec![
        Arc::new(UseIsOperatorInsteadOfAs::new()),
        Arc::new(RemoveRedundantAsOperator::new()),
        Arc::new(RemoveRedundantCast::new()),
        Arc::new(RemoveEmptyElseClause::new()),
        Arc::new(UseMethodGroupInsteadOfLambda::new()),
        Arc::new(SimplifyLinqMethodChain::new()),
        Arc::new(CallThenByInsteadOfOrderBy::new()),
        Arc::new(SimplifyCodeBranching::new()),
        Arc::new(AddArgumentListToObjectCreation::new()),
        Arc::new(AddEmptyLineBetweenDeclarations::new()),
        Arc::new(PlaceBinaryOperatorAtLineStart::new()),
        Arc::new(DefaultLabelShouldBeLast::new()),
        Arc::new(ReorderModifiers::new()),
        Arc::new(ReorderTypeParameterConstraints::new()),
    ]
}

/// True when a comment inside `node` lies outside every `kept` subtree
///
/// Rewrites that rebuild a node from some of its parts use this to abstain
/// rather than silently drop a comment.
pub(crate) fn drops_comments(node: &SyntaxNode, kept: &[&SyntaxNode]) -> bool {
    let kept: Vec<TextRange> = kept.iter().map(|part| part.text_range()).collect();
    drops_comments_outside(node, &kept)
}

/// [`drops_comments`] for kept parts given as ranges
pub(crate) fn drops_comments_outside(node: &SyntaxNode, kept: &[TextRange]) -> bool {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind().is_comment_like())
        .any(|comment| {
            let range = comment.text_range();
            !kept.iter().any(|part| part.contains_range(range))
        })
}

#[cfg(test)]
pub(crate) mod test_support {
    use sharplint_core::{
        AnalyzerOptions, CancellationToken, Diagnostic, DiagnosticCollector, Document,
        SemanticModel,
    };

    use super::{AnalysisContext, Analyzer};

    /// Options with every rule switched on
    pub(crate) fn all_rules() -> AnalyzerOptions {
        let mut options = AnalyzerOptions::default();
        options.rules.all = Some(true);
        options
    }

    /// Run one analyzer over a source text with the reference oracle
    pub(crate) fn run(analyzer: &dyn Analyzer, source: &str) -> Vec<Diagnostic> {
        run_with(analyzer, source, &all_rules())
    }

    pub(crate) fn run_with(
        analyzer: &dyn Analyzer,
        source: &str,
        options: &AnalyzerOptions,
    ) -> Vec<Diagnostic> {
        let document = Document::parse("test.cs", source);
        let oracle = SemanticModel::for_document(&document);
        let root = document.syntax();
        let source_map = document.source_map();
        let sink = DiagnosticCollector::new();
        let cancel = CancellationToken::new();
        let metadata = analyzer.metadata();
        let ctx = AnalysisContext::new(
            &root,
            &oracle,
            options,
            &sink,
            &cancel,
            &source_map,
            metadata,
            metadata.severity,
        );
        for node in root.descendants() {
            if analyzer.node_kinds().contains(&node.kind()) {
                analyzer.analyze(&node, &ctx);
            }
        }
        sink.into_sorted()
    }

    /// Text under each primary span
    pub(crate) fn spans(source: &str, diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics
            .iter()
            .filter(|d| !d.fade_out)
            .map(|d| source[d.location.offset..d.location.offset + d.location.length].to_string())
            .collect()
    }
}
