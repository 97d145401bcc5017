//! `if (c) A else B` → `if (!c) B else A`

use rowan::NodeOrToken;
use sharplint_core::cst::ast::AstNode;
use sharplint_core::cst::{GreenNode, SyntaxNode, make};
use sharplint_core::{Document, Result};

use super::{Refactoring, replace};
use crate::fixes::FixOutcome;
use crate::negation::negate;
use crate::shape::{IfElseInfo, ShapeInfo};

#[derive(Debug, Clone, Copy, Default)]
pub struct InvertIf;

fn invertible(node: &SyntaxNode) -> Option<IfElseInfo> {
    IfElseInfo::of(node).filter(|info| !info.is_else_if())
}

/// The statement with its condition negated and its branches exchanged
///
/// Trivia around both branches stays in place; only the statements move.
fn inverted(info: &IfElseInfo) -> GreenNode {
    let then_branch = info.then_branch();
    let else_statement = info.else_statement();
    let else_clause = info.else_clause().syntax();

    let clause = make::rebuild(else_clause, |child| match child {
        NodeOrToken::Node(node) if node == else_statement => {
            Some(vec![NodeOrToken::Node(make::green(then_branch))])
        }
        _ => None,
    });
    make::rebuild(info.anchor(), |child| match child {
        NodeOrToken::Node(node) if node == info.condition() => {
            Some(vec![NodeOrToken::Node(negate(node))])
        }
        NodeOrToken::Node(node) if node == then_branch => {
            Some(vec![NodeOrToken::Node(make::green(else_statement))])
        }
        NodeOrToken::Node(node) if node == else_clause => {
            Some(vec![NodeOrToken::Node(clause.clone())])
        }
        _ => None,
    })
}

impl Refactoring for InvertIf {
    fn id(&self) -> &'static str {
        "refactoring/invert-if"
    }

    fn title(&self) -> &'static str {
        "Invert if"
    }

    fn is_applicable(&self, node: &SyntaxNode) -> bool {
        invertible(node).is_some()
    }

    fn apply(&self, document: &Document, node: &SyntaxNode) -> Result<FixOutcome> {
        match invertible(node) {
            Some(info) => replace(self, document, info.anchor(), inverted(&info)),
            None => Ok(FixOutcome::not_applicable("not an if statement with a plain else")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refactorings::test_support::refactored;
    use sharplint_core::cst::SyntaxKind;

    fn method(body: &str) -> String {
        format!("class C {{ void M(int n) {{ {body} }} }}")
    }

    fn invert(body: &str) -> Option<String> {
        refactored(&InvertIf, &method(body), SyntaxKind::IfStmt)
    }

    #[test]
    fn branches_trade_places() {
        assert_eq!(
            invert("if (n > 0) { Up(); } else { Down(); }"),
            Some(method("if (n <= 0) { Down(); } else { Up(); }"))
        );
        assert_eq!(
            invert("if (Ready()) Go(); else Wait();"),
            Some(method("if (!Ready()) Wait(); else Go();"))
        );
    }

    #[test]
    fn comments_travel_with_their_branch() {
        assert_eq!(
            invert("if (n == 0) { /* zero */ } else { Other(); }"),
            Some(method("if (n != 0) { Other(); } else { /* zero */ }"))
        );
    }

    #[test]
    fn else_if_and_missing_else_are_not_applicable() {
        assert_eq!(invert("if (n == 0) { A(); } else if (n == 1) { B(); }"), None);
        assert_eq!(invert("if (n == 0) { A(); }"), None);
    }

    #[test]
    fn inverting_twice_restores_the_branches() {
        let once = invert("if (n > 0) { Up(); } else { Down(); }").unwrap();
        let twice = refactored(&InvertIf, &once, SyntaxKind::IfStmt).unwrap();
        assert_eq!(twice, method("if (n > 0) { Up(); } else { Down(); }"));
    }
}
