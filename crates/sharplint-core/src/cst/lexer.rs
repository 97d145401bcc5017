//! CST-aware lexer that preserves all trivia
//!
//! Every byte of the input ends up in exactly one token, so the parser can
//! build a tree whose text is identical to the source. Whitespace, newlines,
//! comments and preprocessor lines are emitted as trivia tokens.

use crate::cst::SyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: SyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// This enables lossless round-tripping: `parse(source).text() == source`
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut lexer = Lexer::new(input);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
    /// True while only whitespace has been seen since the last newline
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
            at_line_start: true,
        }
    }

    fn run(&mut self) {
        while let Some(current) = self.peek() {
            let start = self.pos;
            let kind = match current {
                '\n' => {
                    self.bump();
                    SyntaxKind::Newline
                }
                '\r' => {
                    self.bump();
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    SyntaxKind::Newline
                }
                c if c.is_whitespace() => {
                    self.eat_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                    SyntaxKind::Whitespace
                }
                '#' if self.at_line_start => {
                    self.eat_while(|c| c != '\n' && c != '\r');
                    SyntaxKind::Directive
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    self.eat_while(|c| c != '\n' && c != '\r');
                    SyntaxKind::LineComment
                }
                '/' if self.peek_nth(1) == Some('*') => self.block_comment(start),
                '"' => self.string(start, false),
                '@' if self.peek_nth(1) == Some('"') => {
                    self.bump();
                    self.string(start, true)
                }
                '$' if self.peek_nth(1) == Some('"') => {
                    self.bump();
                    self.string(start, false)
                }
                '$' if self.peek_nth(1) == Some('@') && self.peek_nth(2) == Some('"') => {
                    self.bump();
                    self.bump();
                    self.string(start, true)
                }
                '\'' => self.char_literal(start),
                c if c.is_ascii_digit() => self.number(),
                c if c == '_' || c.is_alphabetic() => {
                    self.eat_while(|c| c == '_' || c.is_alphanumeric());
                    let text = &self.input[start..self.pos];
                    SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Ident)
                }
                '@' if self.peek_nth(1).is_some_and(|c| c == '_' || c.is_alphabetic()) => {
                    // Verbatim identifier such as `@class`
                    self.bump();
                    self.eat_while(|c| c == '_' || c.is_alphanumeric());
                    SyntaxKind::Ident
                }
                _ => self.punct(start),
            };

            let text = &self.input[start..self.pos];
            self.at_line_start = match kind {
                SyntaxKind::Newline => true,
                SyntaxKind::Whitespace => self.at_line_start,
                _ => false,
            };
            self.tokens
                .push(CstToken::new(kind, text, start..self.pos));
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn block_comment(&mut self, start: usize) -> SyntaxKind {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
                None => {
                    self.errors
                        .push(LexerError::new("Unterminated block comment", start..self.pos));
                    break;
                }
            }
        }
        SyntaxKind::BlockComment
    }

    fn string(&mut self, start: usize, verbatim: bool) -> SyntaxKind {
        // Opening quote
        self.bump();
        loop {
            match self.bump() {
                Some('"') if verbatim && self.peek() == Some('"') => {
                    self.bump();
                }
                Some('"') => break,
                Some('\\') if !verbatim => {
                    self.bump();
                }
                Some('\n') if !verbatim => {
                    self.pos -= 1;
                    self.errors
                        .push(LexerError::new("Unterminated string literal", start..self.pos));
                    break;
                }
                Some(_) => {}
                None => {
                    self.errors
                        .push(LexerError::new("Unterminated string literal", start..self.pos));
                    break;
                }
            }
        }
        SyntaxKind::StringLiteral
    }

    fn char_literal(&mut self, start: usize) -> SyntaxKind {
        self.bump();
        loop {
            match self.bump() {
                Some('\'') => break,
                Some('\\') => {
                    self.bump();
                }
                Some('\n') | None => {
                    self.errors
                        .push(LexerError::new("Unterminated character literal", start..self.pos));
                    break;
                }
                Some(_) => {}
            }
        }
        SyntaxKind::CharLiteral
    }

    fn number(&mut self) -> SyntaxKind {
        let mut kind = SyntaxKind::IntLiteral;
        if self.peek() == Some('0') && matches!(self.peek_nth(1), Some('x' | 'X')) {
            self.bump();
            self.bump();
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                kind = SyntaxKind::RealLiteral;
                self.bump();
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                kind = SyntaxKind::RealLiteral;
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        // Suffixes: L, U, UL, f, d, m
        while let Some(c) = self.peek() {
            match c {
                'l' | 'L' | 'u' | 'U' => {
                    self.bump();
                }
                'f' | 'F' | 'd' | 'D' | 'm' | 'M' => {
                    kind = SyntaxKind::RealLiteral;
                    self.bump();
                }
                _ => break,
            }
        }
        kind
    }

    fn punct(&mut self, start: usize) -> SyntaxKind {
        let Some(current) = self.bump() else {
            return SyntaxKind::Error;
        };
        let next = self.peek();
        let two = |lexer: &mut Self, kind: SyntaxKind| {
            lexer.bump();
            kind
        };
        match (current, next) {
            ('(', _) => SyntaxKind::LParen,
            (')', _) => SyntaxKind::RParen,
            ('{', _) => SyntaxKind::LBrace,
            ('}', _) => SyntaxKind::RBrace,
            ('[', _) => SyntaxKind::LBracket,
            (']', _) => SyntaxKind::RBracket,
            (';', _) => SyntaxKind::Semicolon,
            (',', _) => SyntaxKind::Comma,
            ('.', _) => SyntaxKind::Dot,
            (':', _) => SyntaxKind::Colon,
            ('~', _) => SyntaxKind::Tilde,
            ('^', _) => SyntaxKind::Caret,
            ('%', _) => SyntaxKind::Percent,
            ('?', Some('.')) => two(self, SyntaxKind::QuestionDot),
            ('?', Some('?')) => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    SyntaxKind::QuestionQuestionEq
                } else {
                    SyntaxKind::QuestionQuestion
                }
            }
            ('?', _) => SyntaxKind::Question,
            ('=', Some('=')) => two(self, SyntaxKind::EqEq),
            ('=', Some('>')) => two(self, SyntaxKind::FatArrow),
            ('=', _) => SyntaxKind::Eq,
            ('!', Some('=')) => two(self, SyntaxKind::BangEq),
            ('!', _) => SyntaxKind::Bang,
            ('<', Some('=')) => two(self, SyntaxKind::LtEq),
            ('<', _) => SyntaxKind::Lt,
            ('>', Some('=')) => two(self, SyntaxKind::GtEq),
            ('>', _) => SyntaxKind::Gt,
            ('+', Some('+')) => two(self, SyntaxKind::PlusPlus),
            ('+', Some('=')) => two(self, SyntaxKind::PlusEq),
            ('+', _) => SyntaxKind::Plus,
            ('-', Some('-')) => two(self, SyntaxKind::MinusMinus),
            ('-', Some('=')) => two(self, SyntaxKind::MinusEq),
            ('-', _) => SyntaxKind::Minus,
            ('*', Some('=')) => two(self, SyntaxKind::StarEq),
            ('*', _) => SyntaxKind::Star,
            ('/', Some('=')) => two(self, SyntaxKind::SlashEq),
            ('/', _) => SyntaxKind::Slash,
            ('&', Some('&')) => two(self, SyntaxKind::AmpAmp),
            ('&', _) => SyntaxKind::Amp,
            ('|', Some('|')) => two(self, SyntaxKind::PipePipe),
            ('|', _) => SyntaxKind::Pipe,
            (other, _) => {
                self.errors.push(LexerError::new(
                    format!("Unexpected character '{other}'"),
                    start..self.pos,
                ));
                SyntaxKind::Error
            }
        }
    }
}
