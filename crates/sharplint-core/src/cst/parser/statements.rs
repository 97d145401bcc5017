//! Statement parsing

use super::Parser;
use super::expressions::can_start_expression;
use crate::cst::SyntaxKind;

impl Parser<'_> {
    pub(super) fn block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.statement();
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    pub(super) fn statement(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.block(),
            SyntaxKind::Semicolon => {
                self.start_node(SyntaxKind::EmptyStmt);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IfKw => self.if_statement(),
            SyntaxKind::WhileKw => self.while_statement(),
            SyntaxKind::DoKw => self.do_statement(),
            SyntaxKind::ForKw => self.for_statement(),
            SyntaxKind::ForeachKw => self.foreach_statement(),
            SyntaxKind::SwitchKw => self.switch_statement(),
            SyntaxKind::BreakKw => self.keyword_statement(SyntaxKind::BreakStmt, false),
            SyntaxKind::ContinueKw => self.keyword_statement(SyntaxKind::ContinueStmt, false),
            SyntaxKind::ReturnKw => self.keyword_statement(SyntaxKind::ReturnStmt, true),
            SyntaxKind::ThrowKw => self.keyword_statement(SyntaxKind::ThrowStmt, true),
            SyntaxKind::TryKw => self.try_statement(),
            SyntaxKind::ConstKw => {
                self.start_node(SyntaxKind::LocalDeclStmt);
                self.modifier_list();
                self.variable_declaration();
                self.expect(SyntaxKind::Semicolon);
                self.finish_node();
            }
            _ if self.at_local_declaration() => {
                self.start_node(SyntaxKind::LocalDeclStmt);
                self.variable_declaration();
                self.expect(SyntaxKind::Semicolon);
                self.finish_node();
            }
            kind if can_start_expression(kind) => {
                self.start_node(SyntaxKind::ExprStmt);
                self.expr();
                self.expect(SyntaxKind::Semicolon);
                self.finish_node();
            }
            _ => self.error_and_bump("expected statement"),
        }
    }

    fn variable_declaration(&mut self) {
        self.start_node(SyntaxKind::VariableDecl);
        self.type_();
        self.variable_declarators();
        self.finish_node();
    }

    /// `(` condition `)`
    fn parenthesized_condition(&mut self) {
        self.expect(SyntaxKind::LParen);
        self.expr();
        self.expect(SyntaxKind::RParen);
    }

    fn if_statement(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        self.bump();
        self.parenthesized_condition();
        self.embedded_statement();
        if self.at(SyntaxKind::ElseKw) {
            self.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.embedded_statement();
            self.finish_node();
        }
        self.finish_node();
    }

    /// Statement in an `if`/loop body; a missing body becomes an error marker
    fn embedded_statement(&mut self) {
        if self.at(SyntaxKind::Eof) || self.at(SyntaxKind::RBrace) {
            self.error("expected statement");
            self.missing();
        } else {
            self.statement();
        }
    }

    fn while_statement(&mut self) {
        self.start_node(SyntaxKind::WhileStmt);
        self.bump();
        self.parenthesized_condition();
        self.embedded_statement();
        self.finish_node();
    }

    fn do_statement(&mut self) {
        self.start_node(SyntaxKind::DoStmt);
        self.bump();
        self.embedded_statement();
        self.expect(SyntaxKind::WhileKw);
        self.parenthesized_condition();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    fn for_statement(&mut self) {
        self.start_node(SyntaxKind::ForStmt);
        self.bump();
        self.expect(SyntaxKind::LParen);
        if self.at_local_declaration() {
            self.variable_declaration();
        } else {
            self.expression_list(SyntaxKind::Semicolon);
        }
        self.expect(SyntaxKind::Semicolon);
        if !self.at(SyntaxKind::Semicolon) {
            self.expr();
        }
        self.expect(SyntaxKind::Semicolon);
        self.expression_list(SyntaxKind::RParen);
        self.expect(SyntaxKind::RParen);
        self.embedded_statement();
        self.finish_node();
    }

    fn expression_list(&mut self, terminator: SyntaxKind) {
        if self.at(terminator) {
            return;
        }
        loop {
            self.expr();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
    }

    fn foreach_statement(&mut self) {
        self.start_node(SyntaxKind::ForeachStmt);
        self.bump();
        self.expect(SyntaxKind::LParen);
        self.type_();
        self.expect(SyntaxKind::Ident);
        self.expect(SyntaxKind::InKw);
        self.expr();
        self.expect(SyntaxKind::RParen);
        self.embedded_statement();
        self.finish_node();
    }

    fn at_switch_label(&self) -> bool {
        self.at(SyntaxKind::CaseKw)
            || (self.at(SyntaxKind::DefaultKw) && self.nth(1) == SyntaxKind::Colon)
    }

    fn switch_statement(&mut self) {
        self.start_node(SyntaxKind::SwitchStmt);
        self.bump();
        self.parenthesized_condition();
        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at_switch_label() {
                self.switch_section();
            } else {
                self.error_and_bump("expected 'case' or 'default'");
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn switch_section(&mut self) {
        self.start_node(SyntaxKind::SwitchSection);
        while self.at_switch_label() {
            if self.at(SyntaxKind::CaseKw) {
                self.start_node(SyntaxKind::CaseLabel);
                self.bump();
                self.expr();
                self.expect(SyntaxKind::Colon);
                self.finish_node();
            } else {
                self.start_node(SyntaxKind::DefaultLabel);
                self.bump();
                self.expect(SyntaxKind::Colon);
                self.finish_node();
            }
        }
        while !self.at_switch_label()
            && !self.at(SyntaxKind::RBrace)
            && !self.at(SyntaxKind::Eof)
        {
            self.statement();
        }
        self.finish_node();
    }

    fn keyword_statement(&mut self, kind: SyntaxKind, allows_expression: bool) {
        self.start_node(kind);
        self.bump();
        if allows_expression && !self.at(SyntaxKind::Semicolon) {
            self.expr();
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    fn try_statement(&mut self) {
        self.start_node(SyntaxKind::TryStmt);
        self.bump();
        self.block();
        while self.at(SyntaxKind::CatchKw) {
            self.start_node(SyntaxKind::CatchClause);
            self.bump();
            if self.eat(SyntaxKind::LParen) {
                self.type_();
                if self.at(SyntaxKind::Ident) {
                    self.bump();
                }
                self.expect(SyntaxKind::RParen);
            }
            self.block();
            self.finish_node();
        }
        if self.at(SyntaxKind::FinallyKw) {
            self.start_node(SyntaxKind::FinallyClause);
            self.bump();
            self.block();
            self.finish_node();
        }
        self.finish_node();
    }
}
