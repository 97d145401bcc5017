//! Green-tree construction
//!
//! Builders for replacement subtrees. Every builder produces exactly the
//! shape the parser would produce for the same text, so a rewritten tree and
//! a re-parse of its text agree node for node.
//!
//! Builders take owned [`GreenNode`]s; use [`green`] to lift a node out of an
//! existing tree (the subtree is shared, not copied).

use rowan::{GreenNode, GreenToken, NodeOrToken};

use super::{GreenElement, SharpLanguage, SyntaxElement, SyntaxKind, SyntaxNode};
use rowan::Language;

/// Green subtree of an existing node
pub fn green(node: &SyntaxNode) -> GreenNode {
    node.green().into_owned()
}

/// Green copy of a red element; the underlying data is shared
pub fn element(element: &SyntaxElement) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    }
}

/// Rebuild `node` with the same kind, replacing selected direct children
///
/// `replace` returns the elements standing in for a child, or `None` to keep
/// the child as it is. Returning an empty vector drops the child.
pub fn rebuild(
    node: &SyntaxNode,
    mut replace: impl FnMut(&SyntaxElement) -> Option<Vec<GreenElement>>,
) -> GreenNode {
    let mut children = Vec::new();
    for child in node.children_with_tokens() {
        match replace(&child) {
            Some(elements) => children.extend(elements),
            None => children.push(element(&child)),
        }
    }
    GreenNode::new(node.green().kind(), children)
}

/// Kind tag of a green node
pub fn kind_of(node: &GreenNode) -> SyntaxKind {
    SharpLanguage::kind_from_raw(node.kind())
}

pub fn token(kind: SyntaxKind, text: &str) -> GreenToken {
    GreenToken::new(kind.into(), text)
}

/// Token with its canonical keyword or punctuation text
pub fn keyword(kind: SyntaxKind) -> GreenElement {
    let text = kind.keyword_text().unwrap_or_else(|| punct_text(kind));
    NodeOrToken::Token(token(kind, text))
}

pub fn space() -> GreenElement {
    NodeOrToken::Token(token(SyntaxKind::Whitespace, " "))
}

pub fn whitespace(text: &str) -> GreenElement {
    NodeOrToken::Token(token(SyntaxKind::Whitespace, text))
}

pub fn newline(text: &str) -> GreenElement {
    NodeOrToken::Token(token(SyntaxKind::Newline, text))
}

pub fn node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

/// Text of punctuation tokens the builders emit
pub fn punct_text(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        LBracket => "[",
        RBracket => "]",
        Semicolon => ";",
        Comma => ",",
        Dot => ".",
        QuestionDot => "?.",
        Colon => ":",
        Bang => "!",
        Eq => "=",
        EqEq => "==",
        BangEq => "!=",
        Lt => "<",
        Gt => ">",
        LtEq => "<=",
        GtEq => ">=",
        AmpAmp => "&&",
        PipePipe => "||",
        Amp => "&",
        Pipe => "|",
        Caret => "^",
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        QuestionQuestion => "??",
        FatArrow => "=>",
        _ => "",
    }
}

/// True for expressions that bind at least as tightly as a unary operator
pub fn is_unary_or_primary(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Literal
            | SyntaxKind::NameRef
            | SyntaxKind::ThisExpr
            | SyntaxKind::BaseExpr
            | SyntaxKind::ParenExpr
            | SyntaxKind::MemberAccessExpr
            | SyntaxKind::InvocationExpr
            | SyntaxKind::ElementAccessExpr
            | SyntaxKind::ObjectCreationExpr
            | SyntaxKind::TypeofExpr
            | SyntaxKind::PostfixExpr
            | SyntaxKind::PrefixExpr
            | SyntaxKind::CastExpr
    )
}

/// `( inner )`
pub fn paren_expr(inner: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ParenExpr,
        vec![
            keyword(SyntaxKind::LParen),
            NodeOrToken::Node(inner),
            keyword(SyntaxKind::RParen),
        ],
    )
}

/// Wrap in parentheses unless the expression is already unary or primary
pub fn parenthesize_for_unary(expr: GreenNode) -> GreenNode {
    if is_unary_or_primary(kind_of(&expr)) {
        expr
    } else {
        paren_expr(expr)
    }
}

/// `!operand`, parenthesizing the operand when needed
pub fn logical_not(operand: GreenNode) -> GreenNode {
    node(
        SyntaxKind::PrefixExpr,
        vec![
            keyword(SyntaxKind::Bang),
            NodeOrToken::Node(parenthesize_for_unary(operand)),
        ],
    )
}

/// `expr is Type`
pub fn is_type(expr: GreenNode, ty: GreenNode) -> GreenNode {
    node(
        SyntaxKind::IsExpr,
        vec![
            NodeOrToken::Node(expr),
            space(),
            keyword(SyntaxKind::IsKw),
            space(),
            NodeOrToken::Node(ty),
        ],
    )
}

/// `lhs op rhs` with single spaces around the operator
pub fn binary(lhs: GreenNode, op: SyntaxKind, rhs: GreenNode) -> GreenNode {
    node(
        SyntaxKind::BinaryExpr,
        vec![
            NodeOrToken::Node(lhs),
            space(),
            keyword(op),
            space(),
            NodeOrToken::Node(rhs),
        ],
    )
}

pub fn literal(kind: SyntaxKind, text: &str) -> GreenNode {
    node(SyntaxKind::Literal, vec![NodeOrToken::Token(token(kind, text))])
}

pub fn name_ref(name: &str) -> GreenNode {
    node(
        SyntaxKind::NameRef,
        vec![NodeOrToken::Token(token(SyntaxKind::Ident, name))],
    )
}

/// `()`
pub fn empty_arg_list() -> GreenNode {
    node(
        SyntaxKind::ArgList,
        vec![keyword(SyntaxKind::LParen), keyword(SyntaxKind::RParen)],
    )
}

/// `receiver.name`
pub fn member_access(receiver: GreenNode, name: GreenNode) -> GreenNode {
    node(
        SyntaxKind::MemberAccessExpr,
        vec![
            NodeOrToken::Node(receiver),
            keyword(SyntaxKind::Dot),
            NodeOrToken::Node(name),
        ],
    )
}

/// `callee(args)`
pub fn invocation(callee: GreenNode, arg_list: GreenNode) -> GreenNode {
    node(
        SyntaxKind::InvocationExpr,
        vec![NodeOrToken::Node(callee), NodeOrToken::Node(arg_list)],
    )
}
