//! Fixes for the redundancy analyzers

use rowan::{NodeOrToken, TextRange};
use sharplint_core::cst::ast::AstNode;
use sharplint_core::cst::{SyntaxKind, make};
use sharplint_core::{Result, TriviaPolicy};

use super::{CodeFixProvider, FixContext, FixOutcome, applied, replace};
use crate::analyzers::redundancy::{
    as_null_check, empty_else_of, method_group, missing_argument_list, redundant_as, redundant_cast,
};
use crate::analyzers::{
    ADD_ARGUMENT_LIST_TO_OBJECT_CREATION, REMOVE_EMPTY_ELSE_CLAUSE, REMOVE_REDUNDANT_AS_OPERATOR,
    REMOVE_REDUNDANT_CAST, USE_IS_OPERATOR_INSTEAD_OF_AS, USE_METHOD_GROUP_INSTEAD_OF_LAMBDA,
};
use crate::shape::ShapeInfo;

/// `x as T == null` → `!(x is T)`, `x as T != null` → `x is T`
#[derive(Debug, Clone, Copy, Default)]
pub struct UseIsOperatorInsteadOfAsFix;

impl CodeFixProvider for UseIsOperatorInsteadOfAsFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[USE_IS_OPERATOR_INSTEAD_OF_AS]
    }

    fn title(&self) -> &'static str {
        "Use 'is' operator"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some(node) = ctx.node_of_kinds(&[SyntaxKind::BinaryExpr, SyntaxKind::IsPatternExpr])
        else {
            return Ok(FixOutcome::not_applicable("no null check at the diagnostic"));
        };
        let Some(info) = as_null_check(&node) else {
            return Ok(FixOutcome::not_applicable("not an 'as' null check"));
        };
        let as_expression = info.as_expression();
        let is = make::is_type(
            make::green(as_expression.expression()),
            make::green(as_expression.ty()),
        );
        let replacement = if info.null_check().is_check_not_null() {
            is
        } else {
            make::logical_not(is)
        };
        replace(self, ctx, info.anchor(), replacement)
    }
}

/// `x as T` → `x`
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveRedundantAsOperatorFix;

impl CodeFixProvider for RemoveRedundantAsOperatorFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[REMOVE_REDUNDANT_AS_OPERATOR]
    }

    fn title(&self) -> &'static str {
        "Remove 'as' operator"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let info = ctx
            .node_of_kind(SyntaxKind::AsExpr)
            .and_then(|node| redundant_as(&node, ctx.oracle()));
        match info {
            Some(info) => replace(self, ctx, info.anchor(), make::green(info.expression())),
            None => Ok(FixOutcome::not_applicable("'as' conversion is no longer redundant")),
        }
    }
}

/// `(T)x` → `x`
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveRedundantCastFix;

impl CodeFixProvider for RemoveRedundantCastFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[REMOVE_REDUNDANT_CAST]
    }

    fn title(&self) -> &'static str {
        "Remove cast"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let info = ctx
            .node_of_kind(SyntaxKind::CastExpr)
            .and_then(|node| redundant_cast(&node, ctx.oracle()));
        match info {
            Some(info) => replace(self, ctx, info.anchor(), make::green(info.expression())),
            None => Ok(FixOutcome::not_applicable("cast is no longer redundant")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveEmptyElseClauseFix;

impl CodeFixProvider for RemoveEmptyElseClauseFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[REMOVE_EMPTY_ELSE_CLAUSE]
    }

    fn title(&self) -> &'static str {
        "Remove empty 'else' clause"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some(clause) = ctx
            .node_of_kind(SyntaxKind::IfStmt)
            .and_then(|node| empty_else_of(&node))
        else {
            return Ok(FixOutcome::not_applicable("'else' clause is not empty"));
        };
        let document = ctx
            .document()
            .remove_node(clause.syntax(), TriviaPolicy::KeepNone)?;
        Ok(applied(self, ctx, document).into())
    }
}

/// `x => M(x)` → `M`
#[derive(Debug, Clone, Copy, Default)]
pub struct UseMethodGroupInsteadOfLambdaFix;

impl CodeFixProvider for UseMethodGroupInsteadOfLambdaFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[USE_METHOD_GROUP_INSTEAD_OF_LAMBDA]
    }

    fn title(&self) -> &'static str {
        "Use method group"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let candidate = ctx
            .node_of_kind(SyntaxKind::LambdaExpr)
            .and_then(|node| method_group(&node, ctx.oracle()));
        match candidate {
            Some(candidate) => replace(
                self,
                ctx,
                candidate.lambda.anchor(),
                make::green(&candidate.callee),
            ),
            None => Ok(FixOutcome::not_applicable("lambda does not forward to a method")),
        }
    }
}

/// `new Foo { ... }` → `new Foo() { ... }`
#[derive(Debug, Clone, Copy, Default)]
pub struct AddArgumentListToObjectCreationFix;

impl CodeFixProvider for AddArgumentListToObjectCreationFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[ADD_ARGUMENT_LIST_TO_OBJECT_CREATION]
    }

    fn title(&self) -> &'static str {
        "Add argument list"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some(ty) = ctx
            .node_of_kind(SyntaxKind::ObjectCreationExpr)
            .and_then(|node| missing_argument_list(&node))
        else {
            return Ok(FixOutcome::not_applicable("object creation has an argument list"));
        };
        let arguments = make::empty_arg_list();
        let range = TextRange::at(ty.text_range().end(), arguments.text_len());
        let document = ctx
            .document()
            .insert_after(&NodeOrToken::Node(ty), vec![NodeOrToken::Node(arguments)])?;
        Ok(applied(self, ctx, document).with_format_range(range).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{
        AddArgumentListToObjectCreation, RemoveEmptyElseClause, RemoveRedundantAsOperator,
        RemoveRedundantCast, UseIsOperatorInsteadOfAs, UseMethodGroupInsteadOfLambda,
    };
    use crate::fixes::test_support::fix;

    fn method(body: &str) -> String {
        format!("class C {{ void M(object o, string s, int n) {{ {body} }} }}")
    }

    #[test]
    fn as_null_check_becomes_type_test() {
        let analyzer = UseIsOperatorInsteadOfAs::new();
        let provider = UseIsOperatorInsteadOfAsFix;
        assert_eq!(
            fix(&analyzer, &provider, &method("if (o as string == null) { }")),
            method("if (!(o is string)) { }")
        );
        assert_eq!(
            fix(&analyzer, &provider, &method("if (o as string != null) { }")),
            method("if (o is string) { }")
        );
        assert_eq!(
            fix(&analyzer, &provider, &method("if (o as string is not null) { }")),
            method("if (o is string) { }")
        );
        assert_eq!(
            fix(&analyzer, &provider, &method("if (o as string is null) { }")),
            method("if (!(o is string)) { }")
        );
    }

    #[test]
    fn redundant_conversions_are_removed() {
        assert_eq!(
            fix(
                &RemoveRedundantAsOperator::new(),
                &RemoveRedundantAsOperatorFix,
                &method("var t = s as string;")
            ),
            method("var t = s;")
        );
        assert_eq!(
            fix(&RemoveRedundantCast::new(), &RemoveRedundantCastFix, &method("var a = (int)n;")),
            method("var a = n;")
        );
    }

    #[test]
    fn empty_else_is_removed_with_its_whitespace() {
        let source = method("if (n > 0) { M(o, s, n); } else { }");
        assert_eq!(
            fix(&RemoveEmptyElseClause::new(), &RemoveEmptyElseClauseFix, &source),
            method("if (n > 0) { M(o, s, n); }")
        );
    }

    #[test]
    fn lambda_becomes_method_group() {
        let source = "class C { bool Check(int x) => x > 0; void M(List<int> items) { var a = items.Where(x => Check(x)); } }";
        assert_eq!(
            fix(
                &UseMethodGroupInsteadOfLambda::new(),
                &UseMethodGroupInsteadOfLambdaFix,
                source,
            ),
            "class C { bool Check(int x) => x > 0; void M(List<int> items) { var a = items.Where(Check); } }"
        );
    }

    #[test]
    fn argument_list_is_inserted_after_the_type() {
        let source = "class Foo { public int A; } class C { object M() => new Foo { A = 1 }; }";
        assert_eq!(
            fix(
                &AddArgumentListToObjectCreation::new(),
                &AddArgumentListToObjectCreationFix,
                source,
            ),
            "class Foo { public int A; } class C { object M() => new Foo() { A = 1 }; }"
        );
    }
}
