//! Layout checks
//!
//! Both rules only look at trivia: a blank line between member
//! declarations, and the line break around a binary operator.

use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::trivia;
use sharplint_core::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use sharplint_core::{RuleCategory, RuleMetadata, Severity};

use super::{
    ADD_EMPTY_LINE_BETWEEN_DECLARATIONS, AnalysisContext, Analyzer,
    PLACE_BINARY_OPERATOR_AT_LINE_START, declare_analyzer,
};

// ============================================================================
// add-empty-line-between-declarations
// ============================================================================

declare_analyzer!(
    /// Member declarations separated by a single line break
    AddEmptyLineBetweenDeclarations => RuleMetadata::new(
        ADD_EMPTY_LINE_BETWEEN_DECLARATIONS,
        "Add empty line between declarations",
        Severity::Info,
        RuleCategory::Style,
    )
    .with_tags(&["formatting"])
    .not_recommended()
);

fn is_multi_line(node: &SyntaxNode) -> bool {
    node.text().contains_char('\n')
}

/// Line breaks between adjacent members that should be doubled
///
/// Only pairs where at least one member spans several lines count; runs of
/// one-line fields stay compact.
pub(crate) fn declaration_gaps(container: &SyntaxNode) -> Vec<SyntaxToken> {
    let members: Vec<SyntaxNode> = container
        .children()
        .filter(|child| ast::MemberDecl::can_cast(child.kind()))
        .collect();

    let mut gaps = Vec::new();
    for pair in members.windows(2) {
        let [first, second] = pair else { continue };
        if first.next_sibling().as_ref() != Some(second) {
            continue;
        }
        if !is_multi_line(first) && !is_multi_line(second) {
            continue;
        }
        let (Some(last), Some(next)) = (first.last_token(), second.first_token()) else {
            continue;
        };
        let between = trivia::trivia_between(&last, &next);
        if !trivia::is_whitespace_only(&between) || trivia::line_break_count(&between) != 1 {
            continue;
        }
        if let Some(newline) = between.into_iter().find(|t| t.kind() == SyntaxKind::Newline) {
            gaps.push(newline);
        }
    }
    gaps
}

impl Analyzer for AddEmptyLineBetweenDeclarations {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[
            SyntaxKind::CompilationUnit,
            SyntaxKind::NamespaceDecl,
            SyntaxKind::ClassDecl,
            SyntaxKind::StructDecl,
            SyntaxKind::InterfaceDecl,
        ]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        for newline in declaration_gaps(node) {
            if ctx.cancel().is_cancelled() {
                return;
            }
            ctx.report(newline.text_range(), &[]);
        }
    }
}

// ============================================================================
// place-binary-operator-at-line-start
// ============================================================================

declare_analyzer!(
    /// `a &&` at a line end, continued with `b` on the next line
    PlaceBinaryOperatorAtLineStart => RuleMetadata::new(
        PLACE_BINARY_OPERATOR_AT_LINE_START,
        "Place binary operator at the start of the line",
        Severity::Info,
        RuleCategory::Style,
    )
    .with_tags(&["formatting"])
    .not_recommended()
);

/// A binary expression broken after its operator
#[derive(Debug, Clone)]
pub(crate) struct TrailingOperator {
    pub(crate) left: SyntaxNode,
    pub(crate) operator: SyntaxToken,
    pub(crate) right: SyntaxNode,
    /// Newline token following the operator
    pub(crate) newline: SyntaxToken,
    /// Whitespace that indents the continuation line
    pub(crate) indent: Option<SyntaxToken>,
}

pub(crate) fn trailing_operator(node: &SyntaxNode) -> Option<TrailingOperator> {
    let binary = ast::BinaryExpr::cast(node.clone())?;
    let operator = binary.op_token()?;
    let left = binary.lhs()?;
    let right = binary.rhs()?;

    let before = trivia::sibling_trivia_before(&operator.clone().into());
    if !trivia::is_whitespace_only(&before) || trivia::line_break_count(&before) != 0 {
        return None;
    }
    let after = trivia::sibling_trivia_after(&operator.clone().into());
    if !trivia::is_whitespace_only(&after) || trivia::line_break_count(&after) != 1 {
        return None;
    }
    let mut newline = None;
    let mut indent = None;
    for token in after {
        match token.kind() {
            SyntaxKind::Newline => newline = Some(token),
            SyntaxKind::Whitespace if newline.is_some() => indent = Some(token),
            _ => {}
        }
    }
    Some(TrailingOperator {
        left,
        operator,
        right,
        newline: newline?,
        indent,
    })
}

impl Analyzer for PlaceBinaryOperatorAtLineStart {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::BinaryExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(found) = trailing_operator(node) {
            ctx.report(found.operator.text_range(), &[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::run;

    #[test]
    fn multi_line_members_need_a_blank_line() {
        let analyzer = AddEmptyLineBetweenDeclarations::new();
        let source = "class C
{
    int a;
    int b;
    void M()
    {
    }
    void N() { }

    void O() { }
}
";
        let diagnostics = run(&analyzer, source);
        // `int b;` → `M` and `M` → `N`; the one-line pairs stay compact
        assert_eq!(diagnostics.len(), 2);
        for diagnostic in &diagnostics {
            let location = &diagnostic.location;
            assert_eq!(&source[location.offset..location.offset + location.length], "\n");
        }
        assert_eq!(diagnostics[0].location.line, 4);
        assert_eq!(diagnostics[1].location.line, 7);
    }

    #[test]
    fn comments_between_members_are_left_alone() {
        let analyzer = AddEmptyLineBetweenDeclarations::new();
        let source = "class C\n{\n    void M()\n    {\n    }\n    // next\n    void N() { }\n}\n";
        assert!(run(&analyzer, source).is_empty());
    }

    #[test]
    fn operator_at_line_end() {
        let analyzer = PlaceBinaryOperatorAtLineStart::new();
        let source = "class C\n{\n    bool M() => a &&\n        b;\n    bool N() => a\n        && b;\n}\n";
        let diagnostics = run(&analyzer, source);
        assert_eq!(diagnostics.len(), 1);
        let location = &diagnostics[0].location;
        assert_eq!(&source[location.offset..location.offset + location.length], "&&");
    }

    #[test]
    fn operator_with_comment_is_left_alone() {
        let analyzer = PlaceBinaryOperatorAtLineStart::new();
        let source = "class C\n{\n    bool M() => a && // why\n        b;\n}\n";
        assert!(run(&analyzer, source).is_empty());
    }

    #[test]
    fn trailing_operator_parts() {
        let source = "class C\n{\n    int M() => 1 +\n        2;\n}\n";
        let node = crate::shape::tests::node(source, SyntaxKind::BinaryExpr);
        let found = trailing_operator(&node).unwrap();
        assert_eq!(found.left.text(), "1");
        assert_eq!(found.right.text(), "2");
        assert_eq!(found.indent.unwrap().text(), "        ");
        assert_eq!(found.newline.text(), "\n");
    }
}
