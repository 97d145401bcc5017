//! `a op b` → `b op' a`

use rowan::NodeOrToken;
use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::{GreenNode, SyntaxKind, SyntaxNode, SyntaxToken, make};
use sharplint_core::{Document, Result};

use super::{Refactoring, replace};
use crate::fixes::FixOutcome;
use crate::negation::{binary_precedence, precedence};

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapBinaryOperands;

/// Operator that keeps the meaning once the operands are exchanged
fn swapped_operator(op: SyntaxKind) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    let swapped = match op {
        EqEq | BangEq | Star | Amp | Pipe | Caret | AmpAmp | PipePipe => op,
        Lt => Gt,
        Gt => Lt,
        LtEq => GtEq,
        GtEq => LtEq,
        _ => return None,
    };
    Some(swapped)
}

struct Operands {
    lhs: SyntaxNode,
    operator: SyntaxToken,
    /// Operator written after the exchange
    op: SyntaxKind,
    rhs: SyntaxNode,
}

fn operands(node: &SyntaxNode) -> Option<Operands> {
    let binary = ast::BinaryExpr::cast(node.clone())?;
    let operator = binary.op_token()?;
    let op = swapped_operator(operator.kind())?;
    Some(Operands {
        lhs: binary.lhs()?,
        operator,
        op,
        rhs: binary.rhs()?,
    })
}

fn swapped(node: &SyntaxNode, parts: &Operands) -> GreenNode {
    // Operators are left-associative: the new right operand needs parentheses
    // when it binds no tighter than the operator itself
    let new_rhs = if precedence(&parts.lhs) <= binary_precedence(parts.op) {
        make::paren_expr(make::green(&parts.lhs))
    } else {
        make::green(&parts.lhs)
    };
    let new_lhs = make::green(&parts.rhs);
    make::rebuild(node, |child| match child {
        NodeOrToken::Node(child) if *child == parts.lhs => {
            Some(vec![NodeOrToken::Node(new_lhs.clone())])
        }
        NodeOrToken::Node(child) if *child == parts.rhs => {
            Some(vec![NodeOrToken::Node(new_rhs.clone())])
        }
        NodeOrToken::Token(token) if *token == parts.operator && token.kind() != parts.op => {
            Some(vec![make::keyword(parts.op)])
        }
        _ => None,
    })
}

impl Refactoring for SwapBinaryOperands {
    fn id(&self) -> &'static str {
        "refactoring/swap-binary-operands"
    }

    fn title(&self) -> &'static str {
        "Swap operands"
    }

    fn is_applicable(&self, node: &SyntaxNode) -> bool {
        operands(node).is_some()
    }

    fn apply(&self, document: &Document, node: &SyntaxNode) -> Result<FixOutcome> {
        match operands(node) {
            Some(parts) => replace(self, document, node, swapped(node, &parts)),
            None => Ok(FixOutcome::not_applicable("operator is not symmetric")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refactorings::test_support::refactored;

    fn swap(expr: &str) -> Option<String> {
        let source = format!("class C {{ bool M(int a, int b, int c) => {expr}; }}");
        refactored(&SwapBinaryOperands, &source, SyntaxKind::BinaryExpr).map(|text| {
            let start = text.find("=> ").unwrap() + 3;
            let end = text.rfind("; }").unwrap();
            text[start..end].to_string()
        })
    }

    #[test]
    fn symmetric_operators_keep_their_token() {
        assert_eq!(swap("a == b").as_deref(), Some("b == a"));
        assert_eq!(swap("a != null").as_deref(), Some("null != a"));
        assert_eq!(swap("a * b").as_deref(), Some("b * a"));
    }

    #[test]
    fn relational_operators_flip() {
        assert_eq!(swap("a < b").as_deref(), Some("b > a"));
        assert_eq!(swap("a >= b").as_deref(), Some("b <= a"));
    }

    #[test]
    fn left_operand_of_the_same_precedence_is_parenthesized() {
        assert_eq!(swap("a == b == c").as_deref(), Some("c == (a == b)"));
        assert_eq!(swap("a + b == c").as_deref(), Some("c == a + b"));
    }

    #[test]
    fn asymmetric_operators_are_not_applicable() {
        assert_eq!(swap("a - b"), None);
        assert_eq!(swap("a ?? b"), None);
    }
}
