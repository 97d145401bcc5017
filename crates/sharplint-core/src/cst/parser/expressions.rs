//! Expression parsing (precedence climbing over Rowan checkpoints)

use super::Parser;
use crate::cst::SyntaxKind;

/// Binding power of `is`/`as`, shared with the relational operators
const RELATIONAL_BP: u8 = 19;
/// Binding power of `?:`
const CONDITIONAL_BP: u8 = 3;

/// (left binding power, right binding power, node kind) for infix operators
fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8, SyntaxKind)> {
    use SyntaxKind::*;
    let power = match kind {
        Eq | PlusEq | MinusEq | StarEq | SlashEq | QuestionQuestionEq => (1, 1, AssignmentExpr),
        QuestionQuestion => (5, 5, BinaryExpr),
        PipePipe => (7, 8, BinaryExpr),
        AmpAmp => (9, 10, BinaryExpr),
        Pipe => (11, 12, BinaryExpr),
        Caret => (13, 14, BinaryExpr),
        Amp => (15, 16, BinaryExpr),
        EqEq | BangEq => (17, 18, BinaryExpr),
        Lt | Gt | LtEq | GtEq => (RELATIONAL_BP, RELATIONAL_BP + 1, BinaryExpr),
        Plus | Minus => (21, 22, BinaryExpr),
        Star | Slash | Percent => (23, 24, BinaryExpr),
        _ => return None,
    };
    Some(power)
}

/// Tokens that can begin an expression
pub(super) fn can_start_expression(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        Ident
            | IntLiteral
            | RealLiteral
            | StringLiteral
            | CharLiteral
            | NullKw
            | TrueKw
            | FalseKw
            | DefaultKw
            | ThisKw
            | BaseKw
            | NewKw
            | TypeofKw
            | LParen
            | Bang
            | Minus
            | Plus
            | Tilde
            | PlusPlus
            | MinusMinus
    )
}

impl Parser<'_> {
    /// Full expression, including assignment
    pub(super) fn expr(&mut self) {
        self.expr_bp(0);
    }

    fn expr_bp(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        if !self.unary_expr() {
            self.error(format!("expected expression, found {}", self.current()));
            self.missing();
            return;
        }

        loop {
            let op = self.current();
            match op {
                SyntaxKind::AsKw => {
                    if RELATIONAL_BP < min_bp {
                        break;
                    }
                    self.start_node_at(checkpoint, SyntaxKind::AsExpr);
                    self.bump();
                    self.type_in_expression();
                    self.finish_node();
                }
                SyntaxKind::IsKw => {
                    if RELATIONAL_BP < min_bp {
                        break;
                    }
                    let kind = self.is_expression_kind();
                    self.start_node_at(checkpoint, kind);
                    self.bump();
                    if kind == SyntaxKind::IsExpr {
                        self.type_in_expression();
                    } else {
                        self.pattern();
                    }
                    self.finish_node();
                }
                SyntaxKind::Question => {
                    if CONDITIONAL_BP < min_bp {
                        break;
                    }
                    self.start_node_at(checkpoint, SyntaxKind::ConditionalExpr);
                    self.bump();
                    self.expr();
                    self.expect(SyntaxKind::Colon);
                    self.expr_bp(CONDITIONAL_BP);
                    self.finish_node();
                }
                _ => {
                    let Some((lbp, rbp, kind)) = infix_binding_power(op) else {
                        break;
                    };
                    if lbp < min_bp {
                        break;
                    }
                    self.start_node_at(checkpoint, kind);
                    self.bump();
                    if kind == SyntaxKind::AssignmentExpr && self.at(SyntaxKind::LBrace) {
                        self.initializer();
                    } else {
                        self.expr_bp(rbp);
                    }
                    self.finish_node();
                }
            }
        }
    }

    /// Decide between `x is T` and the pattern forms, looking past `is`
    fn is_expression_kind(&self) -> SyntaxKind {
        let after_is = self.nth_index(1);
        match self.kind_at(after_is) {
            SyntaxKind::Ident if self.text_at(after_is) == "not" => SyntaxKind::IsPatternExpr,
            kind if kind.is_literal() => SyntaxKind::IsPatternExpr,
            SyntaxKind::Ident => match self.scan_type(after_is) {
                Some(end) if self.kind_at(end) == SyntaxKind::Ident => SyntaxKind::IsPatternExpr,
                _ => SyntaxKind::IsExpr,
            },
            _ => SyntaxKind::IsExpr,
        }
    }

    fn pattern(&mut self) {
        if self.at_contextual("not") {
            self.start_node(SyntaxKind::NotPattern);
            self.bump_remap(SyntaxKind::NotKw);
            self.pattern();
            self.finish_node();
        } else if self.current().is_literal() {
            self.start_node(SyntaxKind::ConstantPattern);
            self.literal();
            self.finish_node();
        } else {
            self.start_node(SyntaxKind::DeclarationPattern);
            self.type_in_expression();
            if self.at(SyntaxKind::Ident) {
                self.bump();
            }
            self.finish_node();
        }
    }

    fn unary_expr(&mut self) -> bool {
        match self.current() {
            SyntaxKind::Bang
            | SyntaxKind::Minus
            | SyntaxKind::Plus
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                self.start_node(SyntaxKind::PrefixExpr);
                self.bump();
                if !self.unary_expr() {
                    self.error("expected operand");
                    self.missing();
                }
                self.finish_node();
                true
            }
            SyntaxKind::LParen if self.at_cast() => {
                self.start_node(SyntaxKind::CastExpr);
                self.bump();
                self.type_();
                self.expect(SyntaxKind::RParen);
                if !self.unary_expr() {
                    self.error("expected cast operand");
                    self.missing();
                }
                self.finish_node();
                true
            }
            _ => self.postfix_expr(),
        }
    }

    /// `(Type)` followed by something that can only be a cast operand
    fn at_cast(&self) -> bool {
        let open = self.nth_index(0);
        let type_start = self.significant_from(open + 1);
        let Some(close) = self.scan_type(type_start) else {
            return false;
        };
        if self.kind_at(close) != SyntaxKind::RParen {
            return false;
        }
        let simple_name = self.significant_from(type_start + 1) == close;
        let after = self.kind_at(self.significant_from(close + 1));

        let operand_start = matches!(
            after,
            SyntaxKind::Ident
                | SyntaxKind::IntLiteral
                | SyntaxKind::RealLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::NullKw
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::DefaultKw
                | SyntaxKind::ThisKw
                | SyntaxKind::BaseKw
                | SyntaxKind::NewKw
                | SyntaxKind::TypeofKw
                | SyntaxKind::LParen
                | SyntaxKind::Bang
                | SyntaxKind::Tilde
        );
        if operand_start {
            return true;
        }
        // `(int)-x` is a cast, `(x)-y` is a subtraction
        let keyword_type = !simple_name || self.is_predefined_type_at(type_start);
        keyword_type
            && matches!(
                after,
                SyntaxKind::Minus | SyntaxKind::Plus | SyntaxKind::PlusPlus | SyntaxKind::MinusMinus
            )
    }

    fn postfix_expr(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.primary_expr() {
            return false;
        }
        loop {
            match self.current() {
                SyntaxKind::Dot | SyntaxKind::QuestionDot => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberAccessExpr);
                    self.bump();
                    if self.at(SyntaxKind::Ident) {
                        self.name_ref();
                    } else {
                        self.error("expected member name");
                        self.missing();
                    }
                    self.finish_node();
                }
                SyntaxKind::LParen => {
                    self.start_node_at(checkpoint, SyntaxKind::InvocationExpr);
                    self.arg_list(SyntaxKind::RParen);
                    self.finish_node();
                }
                SyntaxKind::LBracket => {
                    self.start_node_at(checkpoint, SyntaxKind::ElementAccessExpr);
                    self.arg_list(SyntaxKind::RBracket);
                    self.finish_node();
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.start_node_at(checkpoint, SyntaxKind::PostfixExpr);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
        true
    }

    fn primary_expr(&mut self) -> bool {
        match self.current() {
            kind if kind.is_literal() => self.literal(),
            SyntaxKind::DefaultKw => self.literal(),
            SyntaxKind::Ident if self.nth(1) == SyntaxKind::FatArrow => self.simple_lambda(),
            SyntaxKind::Ident => self.name_ref(),
            SyntaxKind::ThisKw => {
                self.start_node(SyntaxKind::ThisExpr);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::BaseKw => {
                self.start_node(SyntaxKind::BaseExpr);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::LParen if self.at_parenthesized_lambda() => self.parenthesized_lambda(),
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.expr();
                self.expect(SyntaxKind::RParen);
                self.finish_node();
            }
            SyntaxKind::NewKw => self.object_creation(),
            SyntaxKind::TypeofKw => {
                self.start_node(SyntaxKind::TypeofExpr);
                self.bump();
                self.expect(SyntaxKind::LParen);
                self.type_();
                self.expect(SyntaxKind::RParen);
                self.finish_node();
            }
            _ => return false,
        }
        true
    }

    fn literal(&mut self) {
        self.start_node(SyntaxKind::Literal);
        self.bump();
        self.finish_node();
    }

    /// Identifier with optional generic arguments (`Cast<int>`)
    fn name_ref(&mut self) {
        self.start_node(SyntaxKind::NameRef);
        self.bump();
        if self.at_generic_arguments() {
            self.type_arg_list();
        }
        self.finish_node();
    }

    /// `<...>` followed by `(` after a name is a generic argument list
    fn at_generic_arguments(&self) -> bool {
        let lt = self.nth_index(0);
        if self.kind_at(lt) != SyntaxKind::Lt {
            return false;
        }
        matches!(
            self.scan_type_args(lt).map(|after| self.kind_at(after)),
            Some(SyntaxKind::LParen)
        )
    }

    fn at_parenthesized_lambda(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.nth_index(0);
        loop {
            match self.kind_at(i) {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let after = self.significant_from(i + 1);
                        return self.kind_at(after) == SyntaxKind::FatArrow;
                    }
                }
                SyntaxKind::Eof | SyntaxKind::Semicolon | SyntaxKind::LBrace => return false,
                _ => {}
            }
            i = self.significant_from(i + 1);
        }
    }

    fn simple_lambda(&mut self) {
        self.start_node(SyntaxKind::LambdaExpr);
        self.start_node(SyntaxKind::Parameter);
        self.bump();
        self.finish_node();
        self.expect(SyntaxKind::FatArrow);
        self.lambda_body();
        self.finish_node();
    }

    fn parenthesized_lambda(&mut self) {
        self.start_node(SyntaxKind::LambdaExpr);
        self.start_node(SyntaxKind::ParameterList);
        self.bump();
        if !self.at(SyntaxKind::RParen) {
            loop {
                self.start_node(SyntaxKind::Parameter);
                // Explicitly typed parameter: `int x`
                if self.nth(1) != SyntaxKind::Comma && self.nth(1) != SyntaxKind::RParen {
                    self.type_();
                }
                self.expect(SyntaxKind::Ident);
                self.finish_node();
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::RParen);
        self.finish_node();
        self.expect(SyntaxKind::FatArrow);
        self.lambda_body();
        self.finish_node();
    }

    fn lambda_body(&mut self) {
        if self.at(SyntaxKind::LBrace) {
            self.block();
        } else {
            self.expr();
        }
    }

    fn object_creation(&mut self) {
        self.start_node(SyntaxKind::ObjectCreationExpr);
        self.bump();
        if !self.at(SyntaxKind::LParen) && !self.at(SyntaxKind::LBrace) {
            self.type_();
        }
        if self.at(SyntaxKind::LParen) {
            self.arg_list(SyntaxKind::RParen);
        }
        if self.at(SyntaxKind::LBrace) {
            self.initializer();
        }
        self.finish_node();
    }

    pub(super) fn initializer(&mut self) {
        self.start_node(SyntaxKind::InitializerExpr);
        self.bump();
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::LBrace) {
                self.initializer();
            } else if can_start_expression(self.current()) {
                self.expr();
            } else {
                self.error_and_bump("expected initializer element");
                continue;
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    /// `(args)` or `[args]`; the opening token is the current one
    fn arg_list(&mut self, close: SyntaxKind) {
        self.start_node(SyntaxKind::ArgList);
        self.bump();
        if !self.at(close) {
            loop {
                self.argument();
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        }
        self.expect(close);
        self.finish_node();
    }

    fn argument(&mut self) {
        self.start_node(SyntaxKind::Argument);
        if self.at(SyntaxKind::Ident) && self.nth(1) == SyntaxKind::Colon {
            // Named argument
            self.bump();
            self.bump();
        }
        if matches!(self.current_text(), "ref" | "out" | "in")
            && can_start_expression(self.nth(1))
        {
            self.bump();
        }
        self.expr();
        self.finish_node();
    }
}
