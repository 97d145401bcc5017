//! Recursive-descent parser producing a lossless Rowan green tree
//!
//! The parser never fails: malformed input produces `Error` nodes (unexpected
//! tokens) and zero-width `Error` tokens (missing tokens) so that every
//! source text maps to a tree whose text equals the input.
//!
//! Trivia placement follows one rule: pending trivia is flushed into the
//! currently open node *before* a new node starts, and nodes are closed
//! *before* the trivia following their last token is emitted. Every
//! composite node therefore spans exactly from its first to its last
//! significant token, and surrounding whitespace and comments belong to the
//! parent. Structural edits rely on this.

mod declarations;
mod expressions;
mod statements;
mod types;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::lexer::{CstToken, lex_with_trivia};
use super::{SyntaxKind, SyntaxNode};

/// A syntax error found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// Result of parsing a source text
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build a fresh red root over the green tree
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn into_green(self) -> GreenNode {
        self.green
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// True when neither the lexer nor the parser reported anything
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a compilation unit
pub fn parse_source(source: &str) -> Parse {
    let (tokens, lexer_errors) = lex_with_trivia(source);
    let mut parser = Parser::new(&tokens, source.len());
    parser.compilation_unit();

    let mut errors: Vec<ParseError> = lexer_errors
        .into_iter()
        .map(|e| ParseError {
            message: e.message,
            range: to_range(e.span.start, e.span.end),
        })
        .collect();
    errors.extend(parser.errors);
    errors.sort_by_key(|e| e.range.start());

    tracing::trace!(errors = errors.len(), "parsed compilation unit");

    Parse {
        green: parser.builder.finish(),
        errors,
    }
}

fn to_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Predefined type keywords that are lexed as identifiers
pub(crate) const PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long",
    "ulong", "short", "ushort", "object", "string", "nint", "nuint", "dynamic",
];

pub(super) struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    source_len: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken], source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn compilation_unit(&mut self) {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());
        while !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::UsingKw) {
                self.using_directive();
            } else {
                self.member_declaration();
            }
        }
        self.eat_trivia();
        self.builder.finish_node();
    }

    // ------------------------------------------------------------------
    // Token lookahead (trivia is skipped transparently)
    // ------------------------------------------------------------------

    /// Index of the first significant token at or after `idx`
    fn significant_from(&self, mut idx: usize) -> usize {
        while idx < self.tokens.len() && self.tokens[idx].kind.is_trivia() {
            idx += 1;
        }
        idx
    }

    /// Index of the n-th significant token from the current position
    fn nth_index(&self, n: usize) -> usize {
        let mut idx = self.significant_from(self.pos);
        for _ in 0..n {
            idx = self.significant_from(idx + 1);
        }
        idx
    }

    fn kind_at(&self, idx: usize) -> SyntaxKind {
        self.tokens
            .get(idx)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn text_at(&self, idx: usize) -> &str {
        self.tokens.get(idx).map(|t| t.text.as_str()).unwrap_or("")
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.kind_at(self.nth_index(n))
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn current_text(&self) -> &str {
        self.text_at(self.nth_index(0))
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Identifier with the given text, used for contextual keywords
    fn at_contextual(&self, text: &str) -> bool {
        self.at(SyntaxKind::Ident) && self.current_text() == text
    }

    // ------------------------------------------------------------------
    // Tree building
    // ------------------------------------------------------------------

    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), &token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), &token.text);
            self.pos += 1;
        }
    }

    /// Bump the current token under a different kind (contextual keywords)
    fn bump_remap(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(kind.into(), &token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if self.at(kind) {
            self.bump();
        } else {
            self.error(format!("expected {kind}, found {}", self.current()));
            self.missing();
        }
    }

    /// Zero-width marker for a token that should have been here
    fn missing(&mut self) {
        self.builder.token(SyntaxKind::Error.into(), "");
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn error(&mut self, message: impl Into<String>) {
        let idx = self.nth_index(0);
        let range = match self.tokens.get(idx) {
            Some(token) => to_range(token.span.start, token.span.end),
            None => to_range(self.source_len, self.source_len),
        };
        self.errors.push(ParseError {
            message: message.into(),
            range,
        });
    }

    /// Wrap the current token in an `Error` node and move past it
    fn error_and_bump(&mut self, message: &str) {
        self.error(message);
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }
}
