//! Trivia handling
//!
//! Utilities for inspecting and moving trivia (whitespace, newlines,
//! comments, preprocessor directives). Analyzers use them to abstain from
//! regions whose layout carries meaning; fixes use them to move trivia
//! explicitly when a construct is rebuilt.
//!
//! # Example
//!
//! ```rust
//! use sharplint_core::cst::{parse_source, trivia::TriviaInfo, SyntaxKind};
//!
//! let parse = parse_source("class C {\n    // note\n    int x; // trailing\n}\n");
//! let field = parse
//!     .syntax()
//!     .descendants()
//!     .find(|n| n.kind() == SyntaxKind::FieldDecl)
//!     .unwrap();
//!
//! let info = TriviaInfo::of(&field);
//! assert!(info.has_comments());
//! assert!(info.leading.iter().any(|t| t.text() == "// note"));
//! assert!(info.trailing.iter().any(|t| t.text() == "// trailing"));
//! ```

use super::{GreenElement, SyntaxKind, SyntaxNode, SyntaxToken, TextRange};
use rowan::{Direction, GreenToken, NodeOrToken};

/// Trivia around and inside a node
#[derive(Debug, Clone, PartialEq)]
pub struct TriviaInfo {
    /// Trivia run immediately before the node
    pub leading: Vec<SyntaxToken>,
    /// Trivia after the node up to and including the first newline
    pub trailing: Vec<SyntaxToken>,
    /// Trivia between the node's own tokens
    pub interior: Vec<SyntaxToken>,
}

impl TriviaInfo {
    pub fn of(node: &SyntaxNode) -> Self {
        Self {
            leading: leading_trivia(node),
            trailing: trailing_trivia(node),
            interior: interior_trivia(node),
        }
    }

    /// Check if this has any trivia
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty() && self.interior.is_empty()
    }

    /// Check if any comment or directive is attached to the node
    pub fn has_comments(&self) -> bool {
        has_comments(&self.leading) || has_comments(&self.trailing) || has_comments(&self.interior)
    }

    /// Check if a preprocessor directive is attached to the node
    pub fn has_directives(&self) -> bool {
        self.leading
            .iter()
            .chain(&self.trailing)
            .chain(&self.interior)
            .any(|t| t.kind() == SyntaxKind::Directive)
    }
}

/// Trivia tokens immediately preceding the node's first token
pub fn leading_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    let Some(first) = node.first_token() else {
        return Vec::new();
    };
    leading_trivia_of_token(&first)
}

/// Trivia tokens immediately preceding a token, in source order
pub fn leading_trivia_of_token(token: &SyntaxToken) -> Vec<SyntaxToken> {
    let mut trivia: Vec<SyntaxToken> = Vec::new();
    let mut current = token.prev_token();
    while let Some(prev) = current {
        if !prev.kind().is_trivia() {
            break;
        }
        current = prev.prev_token();
        trivia.push(prev);
    }
    trivia.reverse();
    trivia
}

/// Trivia after the node's last token, up to and including the first newline
pub fn trailing_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    let Some(last) = node.last_token() else {
        return Vec::new();
    };
    trailing_trivia_of_token(&last)
}

/// Trivia after a token, up to and including the first newline
pub fn trailing_trivia_of_token(token: &SyntaxToken) -> Vec<SyntaxToken> {
    let mut trivia = Vec::new();
    let mut current = token.next_token();
    while let Some(next) = current {
        if !next.kind().is_trivia() {
            break;
        }
        let newline = next.kind() == SyntaxKind::Newline;
        current = next.next_token();
        trivia.push(next);
        if newline {
            break;
        }
    }
    trivia
}

/// Trivia between the node's first and last significant token
pub fn interior_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind().is_trivia())
        .collect()
}

/// All trivia between two tokens (exclusive)
pub fn trivia_between(first: &SyntaxToken, second: &SyntaxToken) -> Vec<SyntaxToken> {
    let mut trivia = Vec::new();
    let mut current = first.next_token();
    while let Some(token) = current {
        if token == *second {
            break;
        }
        if !token.kind().is_trivia() {
            break;
        }
        current = token.next_token();
        trivia.push(token);
    }
    trivia
}

/// Check if any token in the slice is a comment or directive
pub fn has_comments(tokens: &[SyntaxToken]) -> bool {
    tokens.iter().any(|t| t.kind().is_comment_like())
}

/// Check if the slice contains only spaces, tabs and newlines
pub fn is_whitespace_only(tokens: &[SyntaxToken]) -> bool {
    tokens
        .iter()
        .all(|t| matches!(t.kind(), SyntaxKind::Whitespace | SyntaxKind::Newline))
}

/// Number of line breaks in the slice
pub fn line_break_count(tokens: &[SyntaxToken]) -> usize {
    tokens
        .iter()
        .filter(|t| t.kind() == SyntaxKind::Newline)
        .count()
}

/// Check if the node contains a comment or directive anywhere inside it
pub fn contains_comments(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .any(|token| token.kind().is_comment_like())
}

/// Check if a preprocessor directive occurs in `range` under `root`
///
/// Directives are the one kind of trivia an edit can never move safely;
/// analyzers abstain from regions that contain one.
pub fn contains_directive_in(root: &SyntaxNode, range: TextRange) -> bool {
    root.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::Directive)
        .any(|token| {
            let directive = token.text_range();
            directive.start() < range.end() && range.start() < directive.end()
        })
}

/// Check if the node contains a preprocessor directive
pub fn contains_directives(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .any(|element| element.kind() == SyntaxKind::Directive)
}

/// Convert trivia tokens into green elements, preserving their text
pub fn to_green(tokens: &[SyntaxToken]) -> Vec<GreenElement> {
    tokens
        .iter()
        .map(|token| NodeOrToken::Token(GreenToken::new(token.kind().into(), token.text())))
        .collect()
}

fn element_siblings(element: &super::SyntaxElement, direction: Direction) -> Vec<super::SyntaxElement> {
    match element {
        NodeOrToken::Node(node) => node.siblings_with_tokens(direction).collect(),
        NodeOrToken::Token(token) => token.siblings_with_tokens(direction).collect(),
    }
}

/// Sibling trivia tokens directly before the element in its parent
pub fn sibling_trivia_before(element: &super::SyntaxElement) -> Vec<SyntaxToken> {
    let mut trivia: Vec<SyntaxToken> = element_siblings(element, Direction::Prev)
        .into_iter()
        .skip(1)
        .map_while(|sibling| sibling.into_token().filter(|t| t.kind().is_trivia()))
        .collect();
    trivia.reverse();
    trivia
}

/// Sibling trivia tokens directly after the element in its parent
pub fn sibling_trivia_after(element: &super::SyntaxElement) -> Vec<SyntaxToken> {
    element_siblings(element, Direction::Next)
        .into_iter()
        .skip(1)
        .map_while(|sibling| sibling.into_token().filter(|t| t.kind().is_trivia()))
        .collect()
}

/// Prefix a replacement element with trivia taken from the old tree
pub fn with_leading_trivia(trivia: &[SyntaxToken], element: GreenElement) -> Vec<GreenElement> {
    let mut elements = to_green(trivia);
    elements.push(element);
    elements
}

/// Suffix a replacement element with trivia taken from the old tree
pub fn with_trailing_trivia(element: GreenElement, trivia: &[SyntaxToken]) -> Vec<GreenElement> {
    let mut elements = vec![element];
    elements.extend(to_green(trivia));
    elements
}
