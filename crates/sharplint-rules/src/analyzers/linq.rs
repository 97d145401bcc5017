//! LINQ method chain rules
//!
//! Both rules look at an invocation whose receiver is another invocation,
//! `source.Inner(...).Outer(...)`, and only fire when the oracle confirms
//! that both calls bind to `System.Linq.Enumerable` extension methods. A
//! user-defined `Where` or `OrderBy` never matches.

use rowan::{NodeOrToken, TextRange};
use sharplint_core::cst::ast::AstNode;
use sharplint_core::cst::trivia;
use sharplint_core::cst::{SyntaxKind, SyntaxNode, SyntaxToken, significant_text};
use sharplint_core::semantic::library::{self, LinqArgument};
use sharplint_core::{
    RuleCategory, RuleMetadata, SemanticOracle, Severity, SymbolHandle, TypeHandle,
};

use super::{
    AnalysisContext, Analyzer, CALL_THEN_BY_INSTEAD_OF_ORDER_BY, SIMPLIFY_LINQ_METHOD_CHAIN,
    declare_analyzer, drops_comments_outside,
};
use crate::shape::{ExtractOptions, MemberInvocationInfo, ShapeInfo, SingleParameterLambdaInfo};

/// Terminal methods with a predicate overload
const PREDICATE_TERMINALS: &[&str] = &[
    "Any",
    "Count",
    "First",
    "FirstOrDefault",
    "Last",
    "LastOrDefault",
    "Single",
    "SingleOrDefault",
];

const ORDERING_METHODS: &[&str] = &["OrderBy", "OrderByDescending", "ThenBy", "ThenByDescending"];

fn is_enumerable_extension(symbol: &SymbolHandle) -> bool {
    symbol.is_method() && symbol.is_extension && symbol.is_declared_in(library::ENUMERABLE)
}

/// `Func<T, bool>`
fn is_predicate_type(oracle: &dyn SemanticOracle, ty: &TypeHandle) -> bool {
    oracle.is_constructed_from(ty, library::FUNC2)
        && ty
            .type_args()
            .get(1)
            .is_some_and(|result| result.definition() == library::BOOLEAN)
}

/// Resolve an invocation to a LINQ extension method
fn enumerable_method(oracle: &dyn SemanticOracle, invocation: &SyntaxNode) -> Option<SymbolHandle> {
    oracle
        .symbol_of(invocation)
        .filter(is_enumerable_extension)
}

/// Trivia tokens between the previous sibling and `token`
fn trivia_before(token: &SyntaxToken) -> Vec<SyntaxToken> {
    trivia::sibling_trivia_before(&NodeOrToken::Token(token.clone()))
}

fn trivia_after(token: &SyntaxToken) -> Vec<SyntaxToken> {
    trivia::sibling_trivia_after(&NodeOrToken::Token(token.clone()))
}

/// Trivia between a member access and the argument list of its invocation
fn trivia_before_arguments(call: &MemberInvocationInfo) -> Vec<SyntaxToken> {
    trivia::sibling_trivia_after(&NodeOrToken::Node(call.member_access().clone()))
}

fn range_of(tokens: &[SyntaxToken]) -> Option<TextRange> {
    let first = tokens.first()?.text_range();
    let last = tokens.last()?.text_range();
    Some(first.cover(last))
}

// ============================================================================
// simplify-linq-method-chain
// ============================================================================

declare_analyzer!(
    /// `Where(p).Any()` and `Where(p).Any(p)` folded into `Any(p)`
    SimplifyLinqMethodChain => RuleMetadata::new(
        SIMPLIFY_LINQ_METHOD_CHAIN,
        "Simplify LINQ method chain",
        Severity::Info,
        RuleCategory::Complexity,
    )
    .with_message("Combine 'Where' and '{0}'")
    .with_description(
        "A 'Where' filter followed by a terminal method that accepts the same \
         predicate can be replaced by the terminal method alone.",
    )
    .with_tags(&["linq", "simplification"])
);

/// `source.Where(p).Outer(...)` where the two calls can be combined
#[derive(Debug, Clone)]
pub(crate) struct LinqChain {
    pub(crate) outer: MemberInvocationInfo,
    pub(crate) inner: MemberInvocationInfo,
}

impl LinqChain {
    /// `.Any(...)`, from the outer dot to the end of the call
    pub(crate) fn primary_span(&self) -> TextRange {
        TextRange::new(
            self.outer.dot().text_range().start(),
            self.outer.anchor().text_range().end(),
        )
    }

    /// `.Where(...)`, the text that disappears
    pub(crate) fn fade_out_span(&self) -> TextRange {
        TextRange::new(
            self.inner.dot().text_range().start(),
            self.inner.anchor().text_range().end(),
        )
    }

    /// The argument list that survives: the predicate of `Where` when the
    /// outer call has none, otherwise the outer call's own
    pub(crate) fn surviving_arguments(&self) -> &SyntaxNode {
        if self.outer.arguments().is_empty() {
            self.inner.arg_list().syntax()
        } else {
            self.outer.arg_list().syntax()
        }
    }

    /// Trivia kept by the combined call, in output order
    pub(crate) fn kept_trivia(&self) -> [Vec<SyntaxToken>; 3] {
        [
            trivia_before(self.inner.dot()),
            trivia_after(self.outer.dot()),
            trivia_before_arguments(&self.outer),
        ]
    }

    fn kept_ranges(&self) -> Vec<TextRange> {
        let mut kept = vec![
            self.inner.receiver().text_range(),
            self.outer.name().syntax().text_range(),
            self.surviving_arguments().text_range(),
        ];
        kept.extend(self.kept_trivia().iter().filter_map(|run| range_of(run)));
        kept
    }
}

/// Two predicate arguments with the same parameter and an equivalent body
fn same_predicate(first: &SyntaxNode, second: &SyntaxNode) -> bool {
    let options = ExtractOptions::exact();
    let (Some(a), Some(b)) = (
        SingleParameterLambdaInfo::extract(first, options),
        SingleParameterLambdaInfo::extract(second, options),
    ) else {
        return false;
    };
    a.has_expression_body()
        && b.has_expression_body()
        && a.parameter_name() == b.parameter_name()
        && significant_text(a.body()) == significant_text(b.body())
}

pub(crate) fn linq_chain(node: &SyntaxNode, oracle: &dyn SemanticOracle) -> Option<LinqChain> {
    let options = ExtractOptions::exact();
    let outer = MemberInvocationInfo::extract(node, options)?;
    if !PREDICATE_TERMINALS.contains(&outer.name_text()) {
        return None;
    }
    let inner = outer.inner(options)?;
    if inner.name_text() != "Where" || inner.name().type_arg_list().is_some() {
        return None;
    }
    let [predicate] = inner.arguments() else {
        return None;
    };
    if predicate.name().is_some() || predicate.has_modifier() {
        return None;
    }
    match outer.arguments() {
        [] => {
            let overload = library::linq_method(outer.name_text(), 1)?;
            if overload.argument != LinqArgument::Predicate {
                return None;
            }
        }
        [argument] => {
            if !same_predicate(&predicate.expr()?, &argument.expr()?) {
                return None;
            }
        }
        _ => return None,
    }

    let where_method = enumerable_method(oracle, inner.anchor())?;
    enumerable_method(oracle, outer.anchor())?;
    let parameter = where_method.call_site_parameters().first()?;
    if !is_predicate_type(oracle, parameter) {
        return None;
    }

    let chain = LinqChain { outer, inner };
    if drops_comments_outside(chain.outer.anchor(), &chain.kept_ranges()) {
        return None;
    }
    Some(chain)
}

impl Analyzer for SimplifyLinqMethodChain {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::InvocationExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        let Some(chain) = linq_chain(node, ctx.oracle()) else {
            return;
        };
        let args = [chain.outer.name_text().to_string()];
        let fade_out = chain.fade_out_span();
        if ctx.report_with(chain.primary_span(), &args, &[fade_out]) {
            ctx.report_fade_out(fade_out, &args);
        }
    }
}

// ============================================================================
// call-then-by-instead-of-order-by
// ============================================================================

declare_analyzer!(
    /// `OrderBy(a).OrderBy(b)` discards the first ordering
    CallThenByInsteadOfOrderBy => RuleMetadata::new(
        CALL_THEN_BY_INSTEAD_OF_ORDER_BY,
        "Call 'ThenBy' instead of 'OrderBy'",
        Severity::Warning,
        RuleCategory::Suspicious,
    )
    .with_message("Call '{0}' instead of '{1}'")
    .with_description(
        "Ordering an already ordered sequence again replaces the first ordering; \
         'ThenBy' adds a secondary key instead.",
    )
    .with_tags(&["linq"])
);

/// An `OrderBy` call on an ordered sequence, with the method to call instead
pub(crate) fn repeated_order_by(
    node: &SyntaxNode,
    oracle: &dyn SemanticOracle,
) -> Option<(MemberInvocationInfo, &'static str)> {
    let options = ExtractOptions::exact();
    let outer = MemberInvocationInfo::extract(node, options)?;
    let replacement = match outer.name_text() {
        "OrderBy" => "ThenBy",
        "OrderByDescending" => "ThenByDescending",
        _ => return None,
    };
    if outer.arguments().len() != 1 {
        return None;
    }
    let inner = outer.inner(options)?;
    if !ORDERING_METHODS.contains(&inner.name_text()) {
        return None;
    }
    enumerable_method(oracle, inner.anchor())?;
    enumerable_method(oracle, outer.anchor())?;
    Some((outer, replacement))
}

impl Analyzer for CallThenByInsteadOfOrderBy {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::InvocationExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some((call, replacement)) = repeated_order_by(node, ctx.oracle()) {
            let args = [replacement.to_string(), call.name_text().to_string()];
            ctx.report(call.name().syntax().text_range(), &args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{all_rules, run, run_with, spans};

    const ITEM: &str = "class Item { public bool IsValid { get; set; } public int Rank { get; set; } }";

    fn with_items(body: &str) -> String {
        format!("{ITEM}\nclass C {{ void M(List<Item> items) {{ {body} }} }}")
    }

    #[test]
    fn where_then_terminal() {
        let analyzer = SimplifyLinqMethodChain::new();
        let source = with_items(
            "var a = items.Where(x => x.IsValid).Any(); \
             var b = items.Where(x => x.IsValid).FirstOrDefault(x => x.IsValid);",
        );
        let diagnostics = run(&analyzer, &source);
        assert_eq!(
            spans(&source, &diagnostics),
            vec![".Any()", ".FirstOrDefault(x => x.IsValid)"]
        );
        assert_eq!(diagnostics[0].message, "Combine 'Where' and 'Any'");

        let fade_outs: Vec<_> = diagnostics.iter().filter(|d| d.fade_out).collect();
        assert_eq!(fade_outs.len(), 2);
        assert_eq!(fade_outs[0].rule_id, "complexity/simplify-linq-method-chain-fade-out");
        assert_eq!(fade_outs[0].severity, Severity::Hint);
        let offset = fade_outs[0].location.offset;
        assert_eq!(
            &source[offset..offset + fade_outs[0].location.length],
            ".Where(x => x.IsValid)"
        );
    }

    #[test]
    fn fade_out_follows_options() {
        let analyzer = SimplifyLinqMethodChain::new();
        let source = with_items("var a = items.Where(x => x.IsValid).Count();");
        let mut options = all_rules();
        options.fade_out = false;
        let diagnostics = run_with(&analyzer, &source, &options);
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].fade_out);
    }

    #[test]
    fn chain_negatives() {
        let analyzer = SimplifyLinqMethodChain::new();
        for body in [
            // different predicates
            "var a = items.Where(x => x.IsValid).Any(x => !x.IsValid);",
            // different parameter names
            "var a = items.Where(x => x.IsValid).Any(y => y.IsValid);",
            // no predicate overload
            "var a = items.Where(x => x.IsValid).ToList();",
            // comment would be lost
            "var a = items.Where(x => x.IsValid) /* filtered */ .Any();",
            // conditional access
            "var a = items?.Where(x => x.IsValid)?.Any();",
        ] {
            assert!(run(&analyzer, &with_items(body)).is_empty(), "{body}");
        }
    }

    #[test]
    fn user_defined_where_is_ignored() {
        let analyzer = SimplifyLinqMethodChain::new();
        let source = "class Bag {
    public Bag Where(Func<int, bool> p) => this;
    public bool Any() => true;
}
class C { bool M(Bag bag) => bag.Where(x => x > 0).Any(); }";
        assert!(run(&analyzer, source).is_empty());
    }

    #[test]
    fn order_by_twice() {
        let analyzer = CallThenByInsteadOfOrderBy::new();
        let source = with_items(
            "var a = items.OrderBy(x => x.Rank).OrderByDescending(x => x.IsValid); \
             var b = items.OrderBy(x => x.Rank).ThenBy(x => x.IsValid);",
        );
        let diagnostics = run(&analyzer, &source);
        assert_eq!(spans(&source, &diagnostics), vec!["OrderByDescending"]);
        assert_eq!(
            diagnostics[0].message,
            "Call 'ThenByDescending' instead of 'OrderByDescending'"
        );
    }
}
