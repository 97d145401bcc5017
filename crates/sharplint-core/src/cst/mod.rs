//! Concrete Syntax Tree (CST)
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments,
//! and preprocessor directives, enabling:
//! - Precise diagnostics anchored on exact sub-spans
//! - Code fixes that preserve formatting and comments
//! - Error recovery: malformed input still yields a complete tree
//!
//! ## Architecture
//!
//! The CST uses Rowan's green/red tree pattern:
//!
//! - **Green Tree**: Immutable, position-independent storage
//!   - Stores actual source text with trivia
//!   - Cheap to clone (uses Arc internally) and `Send + Sync`
//!   - Edits rebuild only the path from the edited node to the root
//!
//! - **Red Tree**: Dynamically constructed view with parent pointers
//!   - Created on-demand for traversal, one per thread
//!   - Provides the typed AST API in [`ast`]
//!
//! ## Trivia Handling
//!
//! Trivia tokens are stored in the tree as siblings of significant tokens.
//! Composite nodes never start or end with trivia, so the whitespace and
//! comments around a node belong to its parent:
//! - **Leading trivia**: the trivia run right before a node's first token
//! - **Trailing trivia**: the trivia after its last token, up to and
//!   including the first line break
//!
//! This enables lossless representation: `parse(source).text() == source`
//!
//! ## Example
//!
//! ```rust
//! use sharplint_core::cst::{parse_source, SyntaxKind};
//!
//! let source = "class C { int x; } // done\n";
//! let parse = parse_source(source);
//! assert_eq!(parse.syntax().text().to_string(), source);
//!
//! let class = parse.syntax().first_child().unwrap();
//! assert_eq!(class.kind(), SyntaxKind::ClassDecl);
//! ```

mod language;
mod lexer;
mod parser;
mod syntax_kind;

pub mod ast;
pub mod make;
pub mod rewrite;
pub mod trivia;

pub use language::{SharpLanguage, SyntaxElement, SyntaxNode, SyntaxNodeChildren, SyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use parser::{Parse, ParseError, parse_source};
pub use syntax_kind::SyntaxKind;

/// Green element (node or token) used when building replacement subtrees
pub type GreenElement = rowan::NodeOrToken<rowan::GreenNode, rowan::GreenToken>;

pub use rowan::{GreenNode, GreenToken, TextRange, TextSize};

/// True when the subtree contains a missing-token marker or an error node
pub fn contains_errors(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .any(|element| element.kind() == SyntaxKind::Error)
}

/// Innermost node of the given kind that covers `range`
pub fn covering_node_of_kind(
    root: &SyntaxNode,
    range: TextRange,
    kind: SyntaxKind,
) -> Option<SyntaxNode> {
    let element = root.covering_element(range);
    let start = match element {
        rowan::NodeOrToken::Node(node) => node,
        rowan::NodeOrToken::Token(token) => token.parent()?,
    };
    start.ancestors().find(|node| node.kind() == kind)
}

/// Text of a node without any trivia, collapsing the significant tokens
///
/// Two subtrees with equal `significant_text` are structurally equivalent
/// for the purposes of the analyzers (comments and layout are ignored).
pub fn significant_text(node: &SyntaxNode) -> String {
    let mut text = String::new();
    let mut previous_word = false;
    for token in node
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
    {
        let word = token
            .text()
            .chars()
            .next()
            .is_some_and(|c| c == '_' || c.is_alphanumeric() || c == '@');
        if word && previous_word {
            text.push(' ');
        }
        text.push_str(token.text());
        previous_word = token
            .text()
            .chars()
            .last()
            .is_some_and(|c| c == '_' || c.is_alphanumeric());
    }
    text
}
