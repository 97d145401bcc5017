//! Fixes for the LINQ chain analyzers

use rowan::NodeOrToken;
use sharplint_core::cst::ast::AstNode;
use sharplint_core::cst::trivia;
use sharplint_core::cst::{SyntaxKind, make};
use sharplint_core::Result;

use super::{CodeFixProvider, FixContext, FixOutcome, applied, replace};
use crate::analyzers::linq::{linq_chain, repeated_order_by};
use crate::analyzers::{CALL_THEN_BY_INSTEAD_OF_ORDER_BY, SIMPLIFY_LINQ_METHOD_CHAIN};
use crate::shape::ShapeInfo;

/// `source.Where(p).Any()` → `source.Any(p)`
///
/// The combined call is rebuilt from its parts: the receiver of `Where`, the
/// outer method name and the surviving argument list. The trivia around the
/// two dots and before the argument list is carried over explicitly so line
/// breaks in a fluent chain keep their place.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifyLinqMethodChainFix;

impl CodeFixProvider for SimplifyLinqMethodChainFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[SIMPLIFY_LINQ_METHOD_CHAIN]
    }

    fn title(&self) -> &'static str {
        "Combine 'Where' with the following call"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some(chain) = ctx
            .node_of_kind(SyntaxKind::InvocationExpr)
            .and_then(|node| linq_chain(&node, ctx.oracle()))
        else {
            return Ok(FixOutcome::not_applicable("method chain cannot be combined"));
        };
        let [before_dot, after_dot, before_arguments] = chain.kept_trivia();

        let mut access = vec![NodeOrToken::Node(make::green(chain.inner.receiver()))];
        access.extend(trivia::to_green(&before_dot));
        access.push(make::keyword(SyntaxKind::Dot));
        access.extend(trivia::to_green(&after_dot));
        access.push(NodeOrToken::Node(make::green(chain.outer.name().syntax())));

        let mut invocation = vec![NodeOrToken::Node(make::node(
            SyntaxKind::MemberAccessExpr,
            access,
        ))];
        invocation.extend(trivia::to_green(&before_arguments));
        invocation.push(NodeOrToken::Node(make::green(chain.surviving_arguments())));

        replace(
            self,
            ctx,
            chain.outer.anchor(),
            make::node(SyntaxKind::InvocationExpr, invocation),
        )
    }
}

/// `OrderBy(a).OrderBy(b)` → `OrderBy(a).ThenBy(b)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CallThenByInsteadOfOrderByFix;

impl CodeFixProvider for CallThenByInsteadOfOrderByFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[CALL_THEN_BY_INSTEAD_OF_ORDER_BY]
    }

    fn title(&self) -> &'static str {
        "Call 'ThenBy'"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some((call, replacement)) = ctx
            .node_of_kind(SyntaxKind::InvocationExpr)
            .and_then(|node| repeated_order_by(&node, ctx.oracle()))
        else {
            return Ok(FixOutcome::not_applicable("sequence is no longer ordered twice"));
        };
        let Some(ident) = call.name().ident_token() else {
            return Ok(FixOutcome::not_applicable("method name is missing"));
        };
        let document = ctx
            .document()
            .replace_token(&ident, make::token(SyntaxKind::Ident, replacement))?;
        Ok(applied(self, ctx, document).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{CallThenByInsteadOfOrderBy, SimplifyLinqMethodChain};
    use crate::fixes::test_support::{fix, fixed};

    const ITEM: &str = "class Item { public bool IsValid { get; set; } public int Rank { get; set; } }";

    fn with_items(body: &str) -> String {
        format!("{ITEM}\nclass C {{ void M(List<Item> items) {{ {body} }} }}")
    }

    #[test]
    fn where_folds_into_the_terminal_call() {
        let analyzer = SimplifyLinqMethodChain::new();
        let provider = SimplifyLinqMethodChainFix;
        assert_eq!(
            fix(
                &analyzer,
                &provider,
                &with_items("var a = items.Where(x => x.IsValid).Any(x => x.IsValid);")
            ),
            with_items("var a = items.Any(x => x.IsValid);")
        );
        assert_eq!(
            fix(
                &analyzer,
                &provider,
                &with_items("var a = items.Where(x => x.IsValid).FirstOrDefault();")
            ),
            with_items("var a = items.FirstOrDefault(x => x.IsValid);")
        );
    }

    #[test]
    fn fluent_layout_is_kept() {
        let analyzer = SimplifyLinqMethodChain::new();
        let source =
            with_items("var a = items\n            .Where(x => x.IsValid)\n            .Any();");
        insta::assert_snapshot!(fix(&analyzer, &SimplifyLinqMethodChainFix, &source), @r"
        class Item { public bool IsValid { get; set; } public int Rank { get; set; } }
        class C { void M(List<Item> items) { var a = items
                    .Any(x => x.IsValid); } }
        ");
    }

    #[test]
    fn order_by_becomes_then_by() {
        let analyzer = CallThenByInsteadOfOrderBy::new();
        let provider = CallThenByInsteadOfOrderByFix;
        assert_eq!(
            fix(
                &analyzer,
                &provider,
                &with_items(
                    "var a = items.OrderBy(x => x.Rank).OrderByDescending(x => x.IsValid);"
                )
            ),
            with_items("var a = items.OrderBy(x => x.Rank).ThenByDescending(x => x.IsValid);")
        );
        let single = with_items("var a = items.OrderBy(x => x.Rank);");
        assert!(fixed(&analyzer, &provider, &single).is_none());
    }
}
