//! Fix for `simplify-code-branching`

use rowan::NodeOrToken;
use sharplint_core::cst::ast::AstNode;
use sharplint_core::cst::{GreenElement, GreenNode, SyntaxKind, SyntaxNode, make, rewrite, trivia};
use sharplint_core::{Result, TriviaPolicy};

use super::{CodeFixProvider, FixContext, FixOutcome, replace};
use crate::analyzers::SIMPLIFY_CODE_BRANCHING;
use crate::analyzers::branching::{
    BreakPosition, CodeBranching, LoopBreak, LoopKind, code_branching,
};
use crate::negation::negate;
use crate::shape::{IfElseInfo, ShapeInfo};

/// Inverts empty `if` branches and moves break conditions into loop headers
///
/// | before | after |
/// |---|---|
/// | `if (c) { } else S` | `if (!c) S` |
/// | `while (true) { if (c) break; … }` | `while (!c) { … }` |
/// | `while (true) { …; if (c) break; }` | `do { … } while (!c);` |
/// | `do { if (c) break; … } while (true);` | `while (!c) { … }` |
/// | `do { …; if (c) break; } while (true);` | `do { … } while (!c);` |
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifyCodeBranchingFix;

impl CodeFixProvider for SimplifyCodeBranchingFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[SIMPLIFY_CODE_BRANCHING]
    }

    fn title(&self) -> &'static str {
        "Simplify code branching"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some(statement) = ctx.node_of_kind(SyntaxKind::IfStmt) else {
            return Ok(FixOutcome::not_applicable("no 'if' statement at the diagnostic"));
        };
        match code_branching(&statement) {
            Some(CodeBranching::EmptyIf(info)) => {
                replace(self, ctx, info.anchor(), inverted_if(&info))
            }
            Some(CodeBranching::LoopBreak(found)) => {
                let replacement = conditional_loop(&found)?;
                replace(self, ctx, &found.loop_statement, replacement)
            }
            None => Ok(FixOutcome::not_applicable("branching is already simple")),
        }
    }
}

/// `if (!c) S`, built from `if (c) { } else S`
fn inverted_if(info: &IfElseInfo) -> GreenNode {
    let condition = info.condition();
    let then_branch = info.then_branch();
    let then_end = then_branch.text_range().end();
    make::rebuild(info.anchor(), |child| match child {
        NodeOrToken::Node(node) if node == condition => Some(vec![NodeOrToken::Node(negate(node))]),
        NodeOrToken::Node(node) if node == then_branch => {
            Some(vec![NodeOrToken::Node(make::green(info.else_statement()))])
        }
        // Whitespace before `else` and the clause itself
        _ if child.text_range().start() >= then_end => Some(Vec::new()),
        _ => None,
    })
}

/// The loop with its break condition moved into the header
fn conditional_loop(found: &LoopBreak) -> Result<GreenNode> {
    let body = found.body.syntax();
    let rest = body_without(body, found.break_if.anchor())?;
    let condition = negate(found.break_if.condition());

    let green = match (found.kind, found.position) {
        // The loop keeps its form and only the condition changes
        (LoopKind::While, BreakPosition::First) | (LoopKind::Do, BreakPosition::Last) => {
            make::rebuild(&found.loop_statement, |child| match child {
                NodeOrToken::Node(node) if *node == found.condition => {
                    Some(vec![NodeOrToken::Node(condition.clone())])
                }
                NodeOrToken::Node(node) if node == body => {
                    Some(vec![NodeOrToken::Node(rest.clone())])
                }
                _ => None,
            })
        }
        (LoopKind::While, BreakPosition::Last) => {
            let mut children = vec![make::keyword(SyntaxKind::DoKw)];
            children.extend(separated_body(body, rest));
            children.push(make::space());
            children.extend(loop_header(condition));
            children.push(make::keyword(SyntaxKind::Semicolon));
            make::node(SyntaxKind::DoStmt, children)
        }
        (LoopKind::Do, BreakPosition::First) => {
            let mut children = loop_header(condition);
            children.extend(separated_body(body, rest));
            make::node(SyntaxKind::WhileStmt, children)
        }
    };
    Ok(green)
}

/// `while (condition)`
fn loop_header(condition: GreenNode) -> Vec<GreenElement> {
    vec![
        make::keyword(SyntaxKind::WhileKw),
        make::space(),
        make::keyword(SyntaxKind::LParen),
        NodeOrToken::Node(condition),
        make::keyword(SyntaxKind::RParen),
    ]
}

/// The new body behind the trivia that preceded the old one, so brace
/// placement survives
fn separated_body(body: &SyntaxNode, rest: GreenNode) -> Vec<GreenElement> {
    let before = trivia::sibling_trivia_before(&NodeOrToken::Node(body.clone()));
    if before.is_empty() {
        vec![make::space(), NodeOrToken::Node(rest)]
    } else {
        trivia::with_leading_trivia(&before, NodeOrToken::Node(rest))
    }
}

/// Green copy of `body` with the statement `removed` taken out
fn body_without(body: &SyntaxNode, removed: &SyntaxNode) -> Result<GreenNode> {
    let detached = SyntaxNode::new_root(make::green(body));
    let statement = detached
        .children_with_tokens()
        .nth(removed.index())
        .and_then(|element| element.into_node())
        .ok_or_else(|| {
            sharplint_core::SharplintError::internal_error("loop body lost its statement")
        })?;
    rewrite::remove_node(&statement, TriviaPolicy::KeepNone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::SimplifyCodeBranching;
    use crate::fixes::test_support::{fix, fixed};

    fn method(body: &str) -> String {
        format!("class C {{ void M(bool a, bool done) {{ {body} }} }}")
    }

    fn simplified(body: &str) -> String {
        fix(&SimplifyCodeBranching::new(), &SimplifyCodeBranchingFix, &method(body))
    }

    #[test]
    fn empty_if_is_inverted() {
        assert_eq!(
            simplified("if (a) { } else { Go(); }"),
            method("if (!a) { Go(); }")
        );
        assert_eq!(
            simplified("if (x != null) { } else { Go(); }"),
            method("if (x == null) { Go(); }")
        );
        assert_eq!(
            simplified("if (a && done) { } else Go();"),
            method("if (!a || !done) Go();")
        );
    }

    #[test]
    fn break_moves_into_the_loop_header() {
        for (before, after) in [
            ("while (true) { if (done) break; Step(); }", "while (!done) { Step(); }"),
            ("while (true) { Step(); if (done) { break; } }", "do { Step(); } while (!done);"),
            ("do { if (done) break; Step(); } while (true);", "while (!done) { Step(); }"),
            ("do { Step(); if (done) break; } while ((true));", "do { Step(); } while (!done);"),
            ("while (true) { if (a == done) break; Step(); }", "while (a != done) { Step(); }"),
        ] {
            assert_eq!(simplified(before), method(after), "{before}");
        }
    }

    #[test]
    fn multi_line_loop_keeps_its_layout() {
        let source = "class C\n{\n    void M(bool done)\n    {\n        while (true)\n        {\n            if (done)\n                break;\n            Step();\n        }\n    }\n}\n";
        insta::assert_snapshot!(
            fix(&SimplifyCodeBranching::new(), &SimplifyCodeBranchingFix, source),
            @r"
        class C
        {
            void M(bool done)
            {
                while (!done)
                {
                    Step();
                }
            }
        }
        "
        );
    }

    #[test]
    fn body_locals_keep_the_loop_as_is() {
        let source = method("while (true) { var line = Read(); if (line == null) break; }");
        assert!(fixed(&SimplifyCodeBranching::new(), &SimplifyCodeBranchingFix, &source).is_none());
    }

    #[test]
    fn unchanged_code_has_no_fix() {
        assert!(
            fixed(
                &SimplifyCodeBranching::new(),
                &SimplifyCodeBranchingFix,
                &method("if (a) { Go(); } else { Stop(); }")
            )
            .is_none()
        );
    }
}
