//! Logical negation of boolean expressions
//!
//! [`negate`] produces the simplest expression equivalent to `!(expr)` that
//! the rewriters know how to build: comparisons flip their operator, `&&` and
//! `||` go through De Morgan, `!e` loses its `!` and null patterns toggle
//! `not`. Whatever else is left gets a plain `!` prefix.
//!
//! Rewrites reuse the original children wherever possible, so interior
//! trivia survives a negation.

use rowan::NodeOrToken;
use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::{GreenNode, SyntaxKind, SyntaxNode, make};

/// Binding power of operator-free expressions
const PRIMARY: u8 = 30;

/// Binding power of a binary operator, higher binds tighter
pub(crate) fn binary_precedence(op: SyntaxKind) -> u8 {
    use SyntaxKind::*;
    match op {
        QuestionQuestion => 5,
        PipePipe => 7,
        AmpAmp => 9,
        Pipe => 11,
        Caret => 13,
        Amp => 15,
        EqEq | BangEq => 17,
        Lt | Gt | LtEq | GtEq => 19,
        Plus | Minus => 21,
        Star | Slash | Percent => 23,
        _ => PRIMARY,
    }
}

/// Binding power of the outermost operator of an expression
pub(crate) fn precedence(expr: &SyntaxNode) -> u8 {
    match expr.kind() {
        SyntaxKind::LambdaExpr => 0,
        SyntaxKind::AssignmentExpr => 1,
        SyntaxKind::ConditionalExpr => 3,
        SyntaxKind::BinaryExpr => ast::BinaryExpr::cast(expr.clone())
            .and_then(|binary| binary.op_kind())
            .map_or(PRIMARY, binary_precedence),
        SyntaxKind::AsExpr | SyntaxKind::IsExpr | SyntaxKind::IsPatternExpr => 19,
        _ => PRIMARY,
    }
}

fn green_precedence(expr: &GreenNode) -> u8 {
    precedence(&SyntaxNode::new_root(expr.clone()))
}

/// Wrap `expr` in parentheses when it binds looser than `min`
fn parenthesize_below(expr: GreenNode, min: u8) -> GreenNode {
    if green_precedence(&expr) < min {
        make::paren_expr(expr)
    } else {
        expr
    }
}

/// Operator equivalent to `!(a op b)` for comparisons
fn inverted_comparison(op: SyntaxKind) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    let inverted = match op {
        EqEq => BangEq,
        BangEq => EqEq,
        Lt => GtEq,
        GtEq => Lt,
        Gt => LtEq,
        LtEq => Gt,
        _ => return None,
    };
    Some(inverted)
}

/// Green expression equivalent to `!(expr)`
pub fn negate(expr: &SyntaxNode) -> GreenNode {
    match expr.kind() {
        SyntaxKind::ParenExpr => negate_parenthesized(expr),
        SyntaxKind::Literal => negate_literal(expr),
        SyntaxKind::PrefixExpr => negate_prefix(expr),
        SyntaxKind::BinaryExpr => negate_binary(expr),
        SyntaxKind::IsPatternExpr => negate_null_pattern(expr),
        _ => None,
    }
    .unwrap_or_else(|| make::logical_not(make::green(expr)))
}

fn negate_parenthesized(expr: &SyntaxNode) -> Option<GreenNode> {
    let inner = ast::ParenExpr::cast(expr.clone())?.expr()?;
    let negated = negate(&inner);
    Some(make::rebuild(expr, |child| match child {
        NodeOrToken::Node(node) if *node == inner => Some(vec![NodeOrToken::Node(negated.clone())]),
        _ => None,
    }))
}

fn negate_literal(expr: &SyntaxNode) -> Option<GreenNode> {
    let flipped = match ast::Literal::cast(expr.clone())?.kind()? {
        SyntaxKind::TrueKw => SyntaxKind::FalseKw,
        SyntaxKind::FalseKw => SyntaxKind::TrueKw,
        _ => return None,
    };
    let text = flipped.keyword_text()?;
    Some(make::literal(flipped, text))
}

/// `!e` becomes `e`, dropping redundant parentheses around `e`
fn negate_prefix(expr: &SyntaxNode) -> Option<GreenNode> {
    let prefix = ast::PrefixExpr::cast(expr.clone())?;
    if prefix.op_token()?.kind() != SyntaxKind::Bang {
        return None;
    }
    let operand = prefix.operand()?;
    let unwrapped = match ast::ParenExpr::cast(operand.clone()) {
        Some(paren) => paren.expr().unwrap_or(operand),
        None => operand,
    };
    Some(make::green(&unwrapped))
}

fn negate_binary(expr: &SyntaxNode) -> Option<GreenNode> {
    let binary = ast::BinaryExpr::cast(expr.clone())?;
    let op = binary.op_token()?;

    if let Some(inverted) = inverted_comparison(op.kind()) {
        return Some(make::rebuild(expr, |child| match child {
            NodeOrToken::Token(token) if *token == op => Some(vec![make::keyword(inverted)]),
            _ => None,
        }));
    }

    let dual = match op.kind() {
        SyntaxKind::AmpAmp => SyntaxKind::PipePipe,
        SyntaxKind::PipePipe => SyntaxKind::AmpAmp,
        _ => return None,
    };
    let lhs = binary.lhs()?;
    let rhs = binary.rhs()?;
    // Left-associative: the right operand needs parentheses at equal precedence too
    let new_lhs = parenthesize_below(negate(&lhs), binary_precedence(dual));
    let new_rhs = parenthesize_below(negate(&rhs), binary_precedence(dual) + 1);
    Some(make::rebuild(expr, |child| match child {
        NodeOrToken::Token(token) if *token == op => Some(vec![make::keyword(dual)]),
        NodeOrToken::Node(node) if *node == lhs => Some(vec![NodeOrToken::Node(new_lhs.clone())]),
        NodeOrToken::Node(node) if *node == rhs => Some(vec![NodeOrToken::Node(new_rhs.clone())]),
        _ => None,
    }))
}

/// `x is null` and `x is not null` toggle into each other
fn negate_null_pattern(expr: &SyntaxNode) -> Option<GreenNode> {
    let pattern = ast::IsPatternExpr::cast(expr.clone())?.pattern()?;
    let is_null_constant = |node: &SyntaxNode| {
        node.kind() == SyntaxKind::ConstantPattern
            && node
                .children()
                .find_map(ast::Literal::cast)
                .is_some_and(|literal| literal.is_null())
    };
    let replacement = match pattern.kind() {
        SyntaxKind::ConstantPattern if is_null_constant(&pattern) => make::node(
            SyntaxKind::NotPattern,
            vec![
                make::keyword(SyntaxKind::NotKw),
                make::space(),
                NodeOrToken::Node(make::green(&pattern)),
            ],
        ),
        SyntaxKind::NotPattern => {
            let inner = pattern.children().next()?;
            if !is_null_constant(&inner) {
                return None;
            }
            make::green(&inner)
        }
        _ => return None,
    };
    Some(make::rebuild(expr, |child| match child {
        NodeOrToken::Node(node) if *node == pattern => {
            Some(vec![NodeOrToken::Node(replacement.clone())])
        }
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::parse_source;

    fn negated(expr: &str) -> String {
        let source = format!("class C {{ bool M() => {expr}; }}");
        let root = parse_source(&source).syntax();
        let arrow = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ArrowClause)
            .unwrap();
        let body = arrow.children().find(|n| n.kind().is_expression()).unwrap();
        assert_eq!(body.text(), expr, "parsed a different expression");
        SyntaxNode::new_root(negate(&body)).text().to_string()
    }

    #[test]
    fn comparisons_flip() {
        assert_eq!(negated("a == b"), "a != b");
        assert_eq!(negated("a != null"), "a == null");
        assert_eq!(negated("count < 3"), "count >= 3");
        assert_eq!(negated("count >= 3"), "count < 3");
        assert_eq!(negated("count > limit"), "count <= limit");
    }

    #[test]
    fn simple_forms() {
        assert_eq!(negated("true"), "false");
        assert_eq!(negated("!ok"), "ok");
        assert_eq!(negated("!(a && b)"), "a && b");
        assert_eq!(negated("Check(x)"), "!Check(x)");
        assert_eq!(negated("x.IsValid"), "!x.IsValid");
        assert_eq!(negated("a ?? b"), "!(a ?? b)");
        assert_eq!(negated("x is string"), "!(x is string)");
    }

    #[test]
    fn de_morgan() {
        assert_eq!(negated("a && b"), "!a || !b");
        assert_eq!(negated("a || b == c"), "!a && b != c");
        assert_eq!(negated("a && b || c"), "(!a || !b) && !c");
        assert_eq!(negated("a || b && c"), "!a && (!b || !c)");
        assert_eq!(negated("(a || b)"), "(!a && !b)");
    }

    #[test]
    fn null_patterns_toggle() {
        assert_eq!(negated("x is null"), "x is not null");
        assert_eq!(negated("x is not null"), "x is null");
        assert_eq!(negated("x is not 0"), "!(x is not 0)");
    }

    #[test]
    fn interior_trivia_survives() {
        assert_eq!(negated("a  ==  /* b */ b"), "a  !=  /* b */ b");
    }

    #[test]
    fn negation_reparses() {
        for expr in ["a && b || c", "x is null", "!(a || b)", "a == b && c > d"] {
            let text = negated(expr);
            let source = format!("class C {{ bool M() => {text}; }}");
            assert!(parse_source(&source).ok(), "{text}");
        }
    }

    #[test]
    fn precedence_table() {
        let root = parse_source("class C { bool M() => a + b * c; }").syntax();
        let sum = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::BinaryExpr)
            .unwrap();
        assert_eq!(precedence(&sum), binary_precedence(SyntaxKind::Plus));
        assert!(binary_precedence(SyntaxKind::AmpAmp) > binary_precedence(SyntaxKind::PipePipe));
    }
}
