//! Control flow simplification
//!
//! Two shapes are reported under one rule:
//! - `if (c) { } else S`, which reads better as `if (!c) S`
//! - `if (c) break;` as the first or last statement of `while (true)` or
//!   `do … while (true)`, where the break condition belongs in the loop header

use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::{SyntaxKind, SyntaxNode, contains_errors};
use sharplint_core::{RuleCategory, RuleMetadata, Severity};

use super::{AnalysisContext, Analyzer, SIMPLIFY_CODE_BRANCHING, declare_analyzer, drops_comments};
use crate::shape::{BreakIfInfo, IfElseInfo, IfStatementChainInfo, ShapeInfo};

declare_analyzer!(
    /// Empty `if` branches and infinite loops guarded by a break condition
    SimplifyCodeBranching => RuleMetadata::new(
        SIMPLIFY_CODE_BRANCHING,
        "Simplify code branching",
        Severity::Info,
        RuleCategory::Complexity,
    )
    .with_description(
        "An empty 'if' branch followed by 'else' is an inverted condition, and \
         a 'while (true)' loop whose first or last statement breaks out is a \
         loop with a condition.",
    )
    .with_tags(&["simplification"])
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopKind {
    While,
    Do,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreakPosition {
    First,
    Last,
}

/// `if (c) break;` at one end of an infinite loop body
#[derive(Debug, Clone)]
pub(crate) struct LoopBreak {
    pub(crate) break_if: BreakIfInfo,
    pub(crate) loop_statement: SyntaxNode,
    pub(crate) condition: SyntaxNode,
    pub(crate) body: ast::Block,
    pub(crate) kind: LoopKind,
    pub(crate) position: BreakPosition,
}

#[derive(Debug, Clone)]
pub(crate) enum CodeBranching {
    /// `if (c) { } else S`
    EmptyIf(IfElseInfo),
    LoopBreak(LoopBreak),
}

pub(crate) fn code_branching(node: &SyntaxNode) -> Option<CodeBranching> {
    if let Some(info) = empty_if(node) {
        return Some(CodeBranching::EmptyIf(info));
    }
    loop_break(node).map(CodeBranching::LoopBreak)
}

fn empty_if(node: &SyntaxNode) -> Option<IfElseInfo> {
    let info = IfElseInfo::of(node)?;
    if info.is_else_if() || !in_statement_list(node) {
        return None;
    }
    let then_block = ast::Block::cast(info.then_branch().clone())?;
    if !then_block.is_empty() || drops_comments(node, &[info.condition(), info.else_statement()]) {
        return None;
    }
    Some(info)
}

/// True when the `if` cannot pick up a dangling `else` once its own is gone:
/// the chain it belongs to sits directly in a statement list
fn in_statement_list(node: &SyntaxNode) -> bool {
    IfStatementChainInfo::of(node)
        .and_then(|chain| chain.anchor().parent())
        .is_some_and(|parent| {
            matches!(parent.kind(), SyntaxKind::Block | SyntaxKind::SwitchSection)
        })
}

fn loop_break(node: &SyntaxNode) -> Option<LoopBreak> {
    let break_if = BreakIfInfo::of(node)?;
    let body = ast::Block::cast(node.parent()?)?;
    let loop_statement = body.syntax().parent()?;
    let (kind, condition) = loop_parts(&loop_statement, body.syntax())?;
    if !is_true_literal(&condition) || contains_errors(&loop_statement) {
        return None;
    }

    let statements: Vec<SyntaxNode> = body.statements().collect();
    let position = if statements.first() == Some(node) {
        BreakPosition::First
    } else if statements.last() == Some(node) {
        BreakPosition::Last
    } else {
        return None;
    };

    if drops_comments(node, &[break_if.condition()])
        || drops_comments(&loop_statement, &[body.syntax()])
    {
        return None;
    }
    // The loop header cannot see locals declared in the body
    if refers_to_locals_of(break_if.condition(), body.syntax()) {
        return None;
    }
    // `continue` skips a trailing check but not a loop condition
    if position == BreakPosition::Last && continues(&loop_statement, body.syntax()) {
        return None;
    }

    Some(LoopBreak {
        break_if,
        loop_statement,
        condition,
        body,
        kind,
        position,
    })
}

/// Loop kind and condition, when `body` is the loop's body
fn loop_parts(statement: &SyntaxNode, body: &SyntaxNode) -> Option<(LoopKind, SyntaxNode)> {
    let mut children = statement.children();
    match statement.kind() {
        SyntaxKind::WhileStmt => {
            let condition = children.next()?;
            (children.next().as_ref() == Some(body)).then_some((LoopKind::While, condition))
        }
        SyntaxKind::DoStmt => {
            if children.next().as_ref() != Some(body) {
                return None;
            }
            Some((LoopKind::Do, children.next()?))
        }
        _ => None,
    }
}

fn is_true_literal(condition: &SyntaxNode) -> bool {
    let mut current = condition.clone();
    while let Some(inner) = ast::ParenExpr::cast(current.clone()).and_then(|paren| paren.expr()) {
        current = inner;
    }
    ast::Literal::cast(current).and_then(|literal| literal.kind()) == Some(SyntaxKind::TrueKw)
}

/// Any name in `condition` that a declaration inside `body` introduces
fn refers_to_locals_of(condition: &SyntaxNode, body: &SyntaxNode) -> bool {
    let locals: Vec<String> = body
        .descendants()
        .filter(|node| {
            matches!(
                node.kind(),
                SyntaxKind::VariableDeclarator | SyntaxKind::DeclarationPattern
            )
        })
        .filter_map(|node| {
            node.children_with_tokens()
                .filter_map(|element| element.into_token())
                .find(|token| token.kind() == SyntaxKind::Ident)
        })
        .map(|token| token.text().to_string())
        .collect();
    if locals.is_empty() {
        return false;
    }
    condition
        .descendants()
        .filter_map(ast::NameRef::cast)
        .filter_map(|name| name.text())
        .any(|name| locals.contains(&name))
}

fn is_loop(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::WhileStmt | SyntaxKind::DoStmt | SyntaxKind::ForStmt | SyntaxKind::ForeachStmt
    )
}

/// A `continue` in `body` that targets `loop_statement`
fn continues(loop_statement: &SyntaxNode, body: &SyntaxNode) -> bool {
    body.descendants()
        .filter(|node| node.kind() == SyntaxKind::ContinueStmt)
        .any(|statement| {
            statement.ancestors().find(|ancestor| is_loop(ancestor.kind())).as_ref()
                == Some(loop_statement)
        })
}

impl Analyzer for SimplifyCodeBranching {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::IfStmt]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        match code_branching(node) {
            Some(CodeBranching::EmptyIf(info)) => {
                ctx.report(info.anchor().text_range(), &[]);
            }
            Some(CodeBranching::LoopBreak(found)) => {
                tracing::trace!(kind = ?found.kind, position = ?found.position, "loop break");
                ctx.report(found.break_if.anchor().text_range(), &[]);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{run, spans};

    fn method(body: &str) -> String {
        format!("class C {{ void M(bool a, bool done) {{ {body} }} }}")
    }

    #[test]
    fn empty_if_branch() {
        let analyzer = SimplifyCodeBranching::new();
        let source = method("if (a) { } else { Go(); }");
        let diagnostics = run(&analyzer, &source);
        assert_eq!(spans(&source, &diagnostics), vec!["if (a) { } else { Go(); }"]);
        assert_eq!(diagnostics[0].message, "Simplify code branching");
    }

    #[test]
    fn empty_if_at_the_end_of_an_else_chain() {
        let analyzer = SimplifyCodeBranching::new();
        let source = method("if (done) { Stop(); } else if (a) { } else { Go(); }");
        assert_eq!(spans(&source, &run(&analyzer, &source)), vec!["if (a) { } else { Go(); }"]);
    }

    #[test]
    fn empty_if_negatives() {
        let analyzer = SimplifyCodeBranching::new();
        for body in [
            "if (a) { } else if (done) { Go(); }",
            "if (a) { /* why */ } else { Go(); }",
            "if (a) { } // note\n else { Go(); }",
            "if (a) { Stop(); } else { Go(); }",
            "if (done) if (a) { } else { Go(); } else { Stop(); }",
            "while (done) if (a) { } else { Go(); }",
        ] {
            assert!(run(&analyzer, &method(body)).is_empty(), "{body}");
        }
    }

    #[test]
    fn break_at_either_end_of_an_infinite_loop() {
        let analyzer = SimplifyCodeBranching::new();
        for (body, expected) in [
            ("while (true) { if (done) break; Step(); }", "if (done) break;"),
            ("while (true) { Step(); if (done) { break; } }", "if (done) { break; }"),
            ("do { if (done) break; Step(); } while (true);", "if (done) break;"),
            ("do { Step(); if (done) break; } while ((true));", "if (done) break;"),
        ] {
            let source = method(body);
            assert_eq!(spans(&source, &run(&analyzer, &source)), vec![expected], "{body}");
        }
    }

    #[test]
    fn loop_break_negatives() {
        let analyzer = SimplifyCodeBranching::new();
        for body in [
            "while (a) { if (done) break; Step(); }",
            "while (true) { Step(); if (done) break; Step(); }",
            "while (true) { if (a) continue; if (done) break; }",
            "while (true) { if (done /* why */) break; Step(); }",
            "while /* forever */ (true) { if (done) break; }",
            "for (;;) { if (done) break; }",
            "while (true) { var line = Read(); if (line == null) break; }",
            "while (true) { Step(); if (Next() is string s && s.Length == 0) break; }",
            "do { int left = Step(); if (left == 0) break; } while (true);",
        ] {
            assert!(run(&analyzer, &method(body)).is_empty(), "{body}");
        }
    }

    #[test]
    fn locals_of_other_scopes_do_not_block() {
        let analyzer = SimplifyCodeBranching::new();
        let source =
            method("var line = Read(); while (true) { Use(line); if (line == null) break; }");
        assert_eq!(run(&analyzer, &source).len(), 1);
    }

    #[test]
    fn nested_continue_does_not_block() {
        let analyzer = SimplifyCodeBranching::new();
        let source =
            method("while (true) { foreach (var x in xs) { continue; } if (done) break; }");
        assert_eq!(run(&analyzer, &source).len(), 1);
    }
}
