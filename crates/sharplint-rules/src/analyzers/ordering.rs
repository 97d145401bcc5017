//! Ordering rules
//!
//! `default:` among case labels, modifier keywords and `where` clauses all
//! have a conventional order. The fixes permute existing nodes and tokens
//! in place, so the trivia between them never moves.

use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::trivia;
use sharplint_core::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use sharplint_core::{AnalyzerOptions, RuleCategory, RuleMetadata, Severity};

use super::{
    AnalysisContext, Analyzer, DEFAULT_LABEL_SHOULD_BE_LAST, REORDER_MODIFIERS,
    REORDER_TYPE_PARAMETER_CONSTRAINTS, declare_analyzer,
};
use crate::shape::{ConstraintClauseOrderInfo, ModifierListInfo, ShapeInfo};

// ============================================================================
// default-label-should-be-last
// ============================================================================

declare_analyzer!(
    /// `default:` followed by more labels in the same switch section
    DefaultLabelShouldBeLast => RuleMetadata::new(
        DEFAULT_LABEL_SHOULD_BE_LAST,
        "Default label should be the last label in a switch section",
        Severity::Info,
        RuleCategory::Style,
    )
    .with_tags(&["readability"])
);

/// The `default:` label and the last label it should trade places with
pub(crate) fn misplaced_default(node: &SyntaxNode) -> Option<(SyntaxNode, SyntaxNode)> {
    let section = ast::SwitchSection::cast(node.clone())?;
    let labels: Vec<SyntaxNode> = section.labels().collect();
    let default = labels.iter().find(|l| l.kind() == SyntaxKind::DefaultLabel)?;
    let last = labels.last()?;
    if default == last {
        return None;
    }
    let span = default.text_range().cover(last.text_range());
    let directive_between = node
        .descendants_with_tokens()
        .any(|e| e.kind() == SyntaxKind::Directive && span.contains_range(e.text_range()));
    if directive_between {
        return None;
    }
    Some((default.clone(), last.clone()))
}

impl Analyzer for DefaultLabelShouldBeLast {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::SwitchSection]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some((default, _)) = misplaced_default(node) {
            ctx.report(default.text_range(), &[]);
        }
    }
}

// ============================================================================
// reorder-modifiers
// ============================================================================

declare_analyzer!(
    /// Modifiers written out of the configured order
    ReorderModifiers => RuleMetadata::new(
        REORDER_MODIFIERS,
        "Reorder modifiers",
        Severity::Info,
        RuleCategory::Style,
    )
    .with_description("Modifiers follow the order given by the `modifier_order` option.")
    .with_tags(&["readability"])
);

pub(crate) const MEMBER_KINDS: &[SyntaxKind] = &[
    SyntaxKind::ClassDecl,
    SyntaxKind::StructDecl,
    SyntaxKind::InterfaceDecl,
    SyntaxKind::MethodDecl,
    SyntaxKind::ConstructorDecl,
    SyntaxKind::PropertyDecl,
    SyntaxKind::FieldDecl,
];

/// A modifier list together with its tokens in the configured order
#[derive(Debug, Clone)]
pub(crate) struct ModifierOrder {
    pub(crate) info: ModifierListInfo,
    pub(crate) sorted: Vec<SyntaxToken>,
    /// First token standing where another one belongs
    pub(crate) first_misplaced: SyntaxToken,
}

pub(crate) fn misordered_modifiers(
    node: &SyntaxNode,
    options: &AnalyzerOptions,
) -> Option<ModifierOrder> {
    let info = ModifierListInfo::of(node)?;
    let modifiers = info.modifiers();
    let mut sorted = modifiers.to_vec();
    // Stable: modifiers missing from the order keep their relative position
    sorted.sort_by_key(|token| options.modifier_rank(token.text()));
    let position = modifiers.iter().zip(&sorted).position(|(a, b)| a != b)?;
    if trivia::contains_directives(info.list().syntax()) {
        return None;
    }
    let first_misplaced = modifiers[position].clone();
    Some(ModifierOrder {
        info,
        sorted,
        first_misplaced,
    })
}

impl Analyzer for ReorderModifiers {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        MEMBER_KINDS
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(order) = misordered_modifiers(node, ctx.options()) {
            ctx.report(order.first_misplaced.text_range(), &[]);
        }
    }
}

// ============================================================================
// reorder-type-parameter-constraints
// ============================================================================

declare_analyzer!(
    /// `where` clauses out of type parameter order
    ReorderTypeParameterConstraints => RuleMetadata::new(
        REORDER_TYPE_PARAMETER_CONSTRAINTS,
        "Reorder type parameter constraints",
        Severity::Info,
        RuleCategory::Style,
    )
    .with_tags(&["readability"])
);

pub(crate) const GENERIC_KINDS: &[SyntaxKind] = &[
    SyntaxKind::ClassDecl,
    SyntaxKind::StructDecl,
    SyntaxKind::InterfaceDecl,
    SyntaxKind::MethodDecl,
];

/// Constraint clauses out of order, with the index of the first misplaced one
pub(crate) fn misordered_constraints(
    node: &SyntaxNode,
) -> Option<(ConstraintClauseOrderInfo, usize)> {
    let info = ConstraintClauseOrderInfo::of(node)?;
    let first = info.first_out_of_order()?;
    let clauses = info.clauses();
    let span = clauses
        .first()?
        .syntax()
        .text_range()
        .cover(clauses.last()?.syntax().text_range());
    if trivia::contains_directive_in(node, span) {
        return None;
    }
    Some((info, first))
}

impl Analyzer for ReorderTypeParameterConstraints {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        GENERIC_KINDS
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some((info, first)) = misordered_constraints(node) {
            let clause = &info.clauses()[first];
            let name = clause.type_parameter_name().unwrap_or_default();
            ctx.report(clause.syntax().text_range(), &[name]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{run, run_with, spans};

    #[test]
    fn default_label_first() {
        let analyzer = DefaultLabelShouldBeLast::new();
        let source = "class C { void M(int n) { switch (n) { default: case 1: Go(); break; case 2: case 3: break; } } }";
        let diagnostics = run(&analyzer, source);
        assert_eq!(spans(source, &diagnostics), vec!["default:"]);
    }

    #[test]
    fn default_label_alone_or_last() {
        let analyzer = DefaultLabelShouldBeLast::new();
        let source = "class C { void M(int n) { switch (n) { case 1: default: break; } switch (n) { default: break; } } }";
        assert!(run(&analyzer, source).is_empty());
    }

    #[test]
    fn modifiers_out_of_order() {
        let analyzer = ReorderModifiers::new();
        let source = "class C { static public void M() { } public static void N() { } readonly private int f; }";
        let diagnostics = run(&analyzer, source);
        assert_eq!(spans(source, &diagnostics), vec!["static", "readonly"]);
    }

    #[test]
    fn modifier_order_comes_from_options() {
        let analyzer = ReorderModifiers::new();
        let source = "class C { static public void M() { } public static void N() { } }";
        let mut options = crate::analyzers::test_support::all_rules();
        options.modifier_order = vec!["static".to_string(), "public".to_string()];
        let diagnostics = run_with(&analyzer, source, &options);
        assert_eq!(spans(source, &diagnostics), vec!["public"]);
        assert_eq!(diagnostics[0].location.offset, source.rfind("public").unwrap());
    }

    #[test]
    fn constraints_out_of_order() {
        let analyzer = ReorderTypeParameterConstraints::new();
        let source = "class C<T, U> where U : class where T : struct { void M<A, B>() where A : new() where B : class { } }";
        let diagnostics = run(&analyzer, source);
        assert_eq!(spans(source, &diagnostics), vec!["where U : class"]);
    }
}
