//! Type syntax and the speculative scanners used for disambiguation

use super::{PREDEFINED_TYPES, Parser};
use crate::cst::SyntaxKind;

impl Parser<'_> {
    /// Type in a declaration position, where `T?` is always nullable
    pub(super) fn type_(&mut self) {
        self.type_impl(true);
    }

    /// Type after `as`/`is`/`typeof`, where `T ? a : b` must stay a conditional
    pub(super) fn type_in_expression(&mut self) {
        self.type_impl(false);
    }

    fn type_impl(&mut self, declaration: bool) {
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::Ident | SyntaxKind::VoidKw => {
                self.start_node(SyntaxKind::NamedType);
                self.bump();
                if self.at(SyntaxKind::Lt) {
                    self.type_arg_list();
                }
                while self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Ident {
                    self.bump();
                    self.bump();
                    if self.at(SyntaxKind::Lt) {
                        self.type_arg_list();
                    }
                }
                self.finish_node();
            }
            _ => {
                self.error(format!("expected type, found {}", self.current()));
                self.missing();
                return;
            }
        }

        loop {
            if self.at(SyntaxKind::LBracket) && self.nth(1) == SyntaxKind::RBracket {
                self.start_node_at(checkpoint, SyntaxKind::ArrayType);
                self.bump();
                self.bump();
                self.finish_node();
            } else if self.at(SyntaxKind::Question) && self.question_is_nullable(declaration) {
                self.start_node_at(checkpoint, SyntaxKind::NullableType);
                self.bump();
                self.finish_node();
            } else {
                break;
            }
        }
    }

    fn question_is_nullable(&self, declaration: bool) -> bool {
        match self.nth(1) {
            SyntaxKind::RParen
            | SyntaxKind::Comma
            | SyntaxKind::Semicolon
            | SyntaxKind::Gt
            | SyntaxKind::RBracket
            | SyntaxKind::LBracket
            | SyntaxKind::LBrace
            | SyntaxKind::Eq
            | SyntaxKind::QuestionQuestion
            | SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::Eof => true,
            SyntaxKind::Ident => declaration,
            _ => false,
        }
    }

    pub(super) fn type_arg_list(&mut self) {
        self.start_node(SyntaxKind::TypeArgList);
        self.bump();
        loop {
            self.type_();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::Gt);
        self.finish_node();
    }

    // ------------------------------------------------------------------
    // Speculative scanning: no tree is built, indices address `self.tokens`
    // ------------------------------------------------------------------

    /// Scan a type starting at the significant token `idx`.
    ///
    /// Returns the index of the first significant token after the type.
    pub(super) fn scan_type(&self, idx: usize) -> Option<usize> {
        let mut i = self.significant_from(idx);
        if !matches!(self.kind_at(i), SyntaxKind::Ident | SyntaxKind::VoidKw) {
            return None;
        }
        i = self.significant_from(i + 1);
        if self.kind_at(i) == SyntaxKind::Lt {
            i = self.scan_type_args(i)?;
        }
        while self.kind_at(i) == SyntaxKind::Dot {
            let name = self.significant_from(i + 1);
            if self.kind_at(name) != SyntaxKind::Ident {
                break;
            }
            i = self.significant_from(name + 1);
            if self.kind_at(i) == SyntaxKind::Lt {
                i = self.scan_type_args(i)?;
            }
        }
        loop {
            match self.kind_at(i) {
                SyntaxKind::LBracket => {
                    let close = self.significant_from(i + 1);
                    if self.kind_at(close) != SyntaxKind::RBracket {
                        break;
                    }
                    i = self.significant_from(close + 1);
                }
                SyntaxKind::Question => i = self.significant_from(i + 1),
                _ => break,
            }
        }
        Some(i)
    }

    /// Scan `<T, U>` starting at the `<` index
    pub(super) fn scan_type_args(&self, lt: usize) -> Option<usize> {
        let mut i = self.significant_from(lt + 1);
        loop {
            i = self.scan_type(i)?;
            match self.kind_at(i) {
                SyntaxKind::Comma => i = self.significant_from(i + 1),
                SyntaxKind::Gt => return Some(self.significant_from(i + 1)),
                _ => return None,
            }
        }
    }

    /// Whether the single-token type at `idx` is a predefined keyword type
    pub(super) fn is_predefined_type_at(&self, idx: usize) -> bool {
        self.kind_at(idx) == SyntaxKind::Ident && PREDEFINED_TYPES.contains(&self.text_at(idx))
    }

    /// `Type name` followed by `=`, `;` or `,` starts a local declaration
    pub(super) fn at_local_declaration(&self) -> bool {
        let start = self.nth_index(0);
        if self.kind_at(start) != SyntaxKind::Ident {
            return false;
        }
        let Some(end) = self.scan_type(start) else {
            return false;
        };
        if self.kind_at(end) != SyntaxKind::Ident {
            return false;
        }
        let after = self.significant_from(end + 1);
        matches!(
            self.kind_at(after),
            SyntaxKind::Eq | SyntaxKind::Semicolon | SyntaxKind::Comma | SyntaxKind::InKw
        )
    }
}
