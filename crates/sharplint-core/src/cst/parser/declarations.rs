//! Namespaces, type declarations and members

use super::Parser;
use crate::cst::SyntaxKind;

impl Parser<'_> {
    pub(super) fn using_directive(&mut self) {
        self.start_node(SyntaxKind::UsingDirective);
        self.bump();
        self.eat(SyntaxKind::StaticKw);
        self.qualified_name();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// Any declaration that can appear in a namespace or type body
    pub(super) fn member_declaration(&mut self) {
        if self.at(SyntaxKind::NamespaceKw) {
            self.namespace_declaration();
            return;
        }

        let checkpoint = self.checkpoint();
        let has_modifiers = self.modifier_list();

        match self.current() {
            SyntaxKind::ClassKw => self.type_declaration(checkpoint, SyntaxKind::ClassDecl),
            SyntaxKind::StructKw => self.type_declaration(checkpoint, SyntaxKind::StructDecl),
            SyntaxKind::InterfaceKw => {
                self.type_declaration(checkpoint, SyntaxKind::InterfaceDecl)
            }
            SyntaxKind::Ident if self.nth(1) == SyntaxKind::LParen => {
                self.constructor_declaration(checkpoint)
            }
            SyntaxKind::Ident | SyntaxKind::VoidKw => self.typed_member(checkpoint),
            _ if has_modifiers => {
                // Dangling modifiers: keep them in an erroneous field node
                self.start_node_at(checkpoint, SyntaxKind::FieldDecl);
                self.error("expected member declaration after modifiers");
                self.missing();
                self.finish_node();
            }
            _ => self.error_and_bump("expected declaration"),
        }
    }

    fn namespace_declaration(&mut self) {
        self.start_node(SyntaxKind::NamespaceDecl);
        self.bump();
        self.qualified_name();
        if self.eat(SyntaxKind::Semicolon) {
            // File-scoped namespace: members follow as siblings
            self.finish_node();
            return;
        }
        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::UsingKw) {
                self.using_directive();
            } else {
                self.member_declaration();
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn qualified_name(&mut self) {
        self.start_node(SyntaxKind::NamedType);
        self.expect(SyntaxKind::Ident);
        while self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Ident {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    /// Returns true when at least one modifier was consumed
    pub(super) fn modifier_list(&mut self) -> bool {
        if !self.current().is_modifier() {
            return false;
        }
        self.start_node(SyntaxKind::ModifierList);
        while self.current().is_modifier() {
            self.bump();
        }
        self.finish_node();
        true
    }

    fn type_declaration(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.start_node_at(checkpoint, kind);
        self.bump();
        self.expect(SyntaxKind::Ident);
        if self.at(SyntaxKind::Lt) {
            self.type_parameter_list();
        }
        if self.at(SyntaxKind::Colon) {
            self.base_list();
        }
        self.constraint_clauses();

        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.member_declaration();
        }
        self.expect(SyntaxKind::RBrace);
        self.eat(SyntaxKind::Semicolon);
        self.finish_node();
    }

    fn base_list(&mut self) {
        self.start_node(SyntaxKind::BaseList);
        self.bump();
        self.type_();
        while self.eat(SyntaxKind::Comma) {
            self.type_();
        }
        self.finish_node();
    }

    fn type_parameter_list(&mut self) {
        self.start_node(SyntaxKind::TypeParameterList);
        self.bump();
        loop {
            self.start_node(SyntaxKind::TypeParameter);
            if self.at(SyntaxKind::InKw) || self.at_contextual("out") {
                self.bump();
            }
            self.expect(SyntaxKind::Ident);
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::Gt);
        self.finish_node();
    }

    fn constraint_clauses(&mut self) {
        while self.at_contextual("where") && self.nth(1) == SyntaxKind::Ident {
            self.start_node(SyntaxKind::ConstraintClause);
            self.bump_remap(SyntaxKind::WhereKw);
            self.bump();
            self.expect(SyntaxKind::Colon);
            loop {
                self.type_constraint();
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            self.finish_node();
        }
    }

    fn type_constraint(&mut self) {
        self.start_node(SyntaxKind::TypeConstraint);
        match self.current() {
            SyntaxKind::ClassKw | SyntaxKind::StructKw => {
                self.bump();
                // `class?`
                if self.at(SyntaxKind::Question) {
                    self.bump();
                }
            }
            SyntaxKind::NewKw => {
                self.bump();
                self.expect(SyntaxKind::LParen);
                self.expect(SyntaxKind::RParen);
            }
            _ => self.type_(),
        }
        self.finish_node();
    }

    fn constructor_declaration(&mut self, checkpoint: rowan::Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::ConstructorDecl);
        self.bump();
        self.parameter_list();
        if self.eat(SyntaxKind::Colon) {
            // `: base(...)` / `: this(...)`
            self.expr();
        }
        self.member_body();
        self.finish_node();
    }

    /// Members that start with a type: methods, properties and fields
    fn typed_member(&mut self, checkpoint: rowan::Checkpoint) {
        let type_checkpoint = self.checkpoint();
        self.type_();

        if !self.at(SyntaxKind::Ident) {
            self.start_node_at(checkpoint, SyntaxKind::FieldDecl);
            self.error("expected member name");
            self.missing();
            self.eat(SyntaxKind::Semicolon);
            self.finish_node();
            return;
        }

        match self.nth(1) {
            SyntaxKind::LParen | SyntaxKind::Lt => {
                self.start_node_at(checkpoint, SyntaxKind::MethodDecl);
                self.bump();
                if self.at(SyntaxKind::Lt) {
                    self.type_parameter_list();
                }
                self.parameter_list();
                self.constraint_clauses();
                self.member_body();
                self.finish_node();
            }
            SyntaxKind::LBrace | SyntaxKind::FatArrow => {
                self.start_node_at(checkpoint, SyntaxKind::PropertyDecl);
                self.bump();
                if self.at(SyntaxKind::FatArrow) {
                    self.arrow_clause();
                    self.expect(SyntaxKind::Semicolon);
                } else {
                    self.accessor_list();
                    if self.at(SyntaxKind::Eq) {
                        self.equals_value();
                        self.expect(SyntaxKind::Semicolon);
                    }
                }
                self.finish_node();
            }
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::FieldDecl);
                self.start_node_at(type_checkpoint, SyntaxKind::VariableDecl);
                self.variable_declarators();
                self.finish_node();
                self.expect(SyntaxKind::Semicolon);
                self.finish_node();
            }
        }
    }

    /// Block, `=> expr;` or a bare `;`
    fn member_body(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.block(),
            SyntaxKind::FatArrow => {
                self.arrow_clause();
                self.expect(SyntaxKind::Semicolon);
            }
            _ => self.expect(SyntaxKind::Semicolon),
        }
    }

    fn arrow_clause(&mut self) {
        self.start_node(SyntaxKind::ArrowClause);
        self.bump();
        self.expr();
        self.finish_node();
    }

    pub(super) fn parameter_list(&mut self) {
        self.start_node(SyntaxKind::ParameterList);
        self.expect(SyntaxKind::LParen);
        if !self.at(SyntaxKind::RParen) {
            loop {
                self.parameter();
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::RParen);
        self.finish_node();
    }

    fn parameter(&mut self) {
        self.start_node(SyntaxKind::Parameter);
        if self.at(SyntaxKind::ThisKw) {
            self.bump();
        }
        while matches!(self.current_text(), "ref" | "out" | "params" | "in")
            && self.nth(1) == SyntaxKind::Ident
        {
            self.bump();
        }
        self.type_();
        self.expect(SyntaxKind::Ident);
        if self.at(SyntaxKind::Eq) {
            self.equals_value();
        }
        self.finish_node();
    }

    fn accessor_list(&mut self) {
        self.start_node(SyntaxKind::AccessorList);
        self.bump();
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.start_node(SyntaxKind::Accessor);
            self.modifier_list();
            match self.current_text() {
                "get" => self.bump_remap(SyntaxKind::GetKw),
                "set" | "init" => self.bump_remap(SyntaxKind::SetKw),
                _ => {
                    self.error("expected 'get' or 'set'");
                    self.start_node(SyntaxKind::Error);
                    self.bump();
                    self.finish_node();
                    self.finish_node();
                    continue;
                }
            }
            self.member_body();
            self.finish_node();
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    /// `= expr` or `= { ... }`
    pub(super) fn equals_value(&mut self) {
        self.start_node(SyntaxKind::EqualsValue);
        self.bump();
        if self.at(SyntaxKind::LBrace) {
            self.initializer();
        } else {
            self.expr();
        }
        self.finish_node();
    }

    /// One or more `name [= value]` separated by commas
    pub(super) fn variable_declarators(&mut self) {
        loop {
            self.start_node(SyntaxKind::VariableDeclarator);
            self.expect(SyntaxKind::Ident);
            if self.at(SyntaxKind::Eq) {
                self.equals_value();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
    }
}
