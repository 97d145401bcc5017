//! Redundant syntax detection
//!
//! Structural simplifications (`x as T == null`, empty `else`, missing `()`
//! on object creation) and the oracle-backed ones that need type or symbol
//! information (identity `as` and casts, lambdas that only forward their
//! parameter).

use rowan::TextRange;
use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::trivia;
use sharplint_core::cst::{SyntaxKind, SyntaxNode, rewrite};
use sharplint_core::{RuleCategory, RuleMetadata, SemanticOracle, Severity, TriviaPolicy};

use super::{
    ADD_ARGUMENT_LIST_TO_OBJECT_CREATION, AnalysisContext, Analyzer, REMOVE_EMPTY_ELSE_CLAUSE,
    REMOVE_REDUNDANT_AS_OPERATOR, REMOVE_REDUNDANT_CAST, USE_IS_OPERATOR_INSTEAD_OF_AS,
    USE_METHOD_GROUP_INSTEAD_OF_LAMBDA, declare_analyzer, drops_comments,
};
use crate::shape::{
    AsExpressionInfo, AsNullCheckInfo, CastExpressionInfo, ExtractOptions, ShapeInfo,
    SingleParameterLambdaInfo,
};

// ============================================================================
// use-is-operator-instead-of-as
// ============================================================================

declare_analyzer!(
    /// `x as T == null` and `x as T is not null` written as type tests
    UseIsOperatorInsteadOfAs => RuleMetadata::new(
        USE_IS_OPERATOR_INSTEAD_OF_AS,
        "Use 'is' operator instead of 'as' operator",
        Severity::Info,
        RuleCategory::Style,
    )
    .with_description(
        "A null check on the result of an 'as' conversion only asks whether the \
         value has the target type; 'is' says that directly.",
    )
    .with_tags(&["simplification"])
);

/// `x as T` compared with `null` where the comparison can become `x is T`
pub(crate) fn as_null_check(node: &SyntaxNode) -> Option<AsNullCheckInfo> {
    let info = AsNullCheckInfo::of(node)?;
    let as_expression = info.as_expression();
    // `x as int? != null` has no `is` equivalent with the same spelling
    if as_expression.ty().kind() == SyntaxKind::NullableType {
        return None;
    }
    if drops_comments(node, &[as_expression.expression(), as_expression.ty()]) {
        return None;
    }
    Some(info)
}

impl Analyzer for UseIsOperatorInsteadOfAs {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::BinaryExpr, SyntaxKind::IsPatternExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(info) = as_null_check(node) {
            ctx.report(info.anchor().text_range(), &[]);
        }
    }
}

// ============================================================================
// remove-redundant-as-operator
// ============================================================================

declare_analyzer!(
    /// `x as T` where `x` already has type `T`
    RemoveRedundantAsOperator => RuleMetadata::new(
        REMOVE_REDUNDANT_AS_OPERATOR,
        "Remove redundant 'as' operator",
        Severity::Hint,
        RuleCategory::Complexity,
    )
    .with_tags(&["redundancy"])
);

pub(crate) fn redundant_as(
    node: &SyntaxNode,
    oracle: &dyn SemanticOracle,
) -> Option<AsExpressionInfo> {
    let info = AsExpressionInfo::extract(node, ExtractOptions::exact())?;
    let target = oracle.resolve_type(info.ty())?;
    if target.is_error() || !oracle.classify_conversion(info.expression(), &target).is_identity() {
        return None;
    }
    if drops_comments(node, &[info.expression()]) {
        return None;
    }
    Some(info)
}

/// ` as T`, the text the fix removes
pub(crate) fn redundant_as_span(info: &AsExpressionInfo) -> TextRange {
    TextRange::new(
        info.expression().text_range().end(),
        info.anchor().text_range().end(),
    )
}

impl Analyzer for RemoveRedundantAsOperator {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::AsExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(info) = redundant_as(node, ctx.oracle()) {
            ctx.report(redundant_as_span(&info), &[]);
        }
    }
}

// ============================================================================
// remove-redundant-cast
// ============================================================================

declare_analyzer!(
    /// `(T)x` where `x` already has type `T`
    RemoveRedundantCast => RuleMetadata::new(
        REMOVE_REDUNDANT_CAST,
        "Remove redundant cast",
        Severity::Hint,
        RuleCategory::Complexity,
    )
    .with_tags(&["redundancy"])
);

pub(crate) fn redundant_cast(
    node: &SyntaxNode,
    oracle: &dyn SemanticOracle,
) -> Option<CastExpressionInfo> {
    let info = CastExpressionInfo::extract(node, ExtractOptions::exact())?;
    let target = oracle.resolve_type(info.ty())?;
    if target.is_error() || !oracle.classify_conversion(info.expression(), &target).is_identity() {
        return None;
    }
    if drops_comments(node, &[info.expression()]) {
        return None;
    }
    Some(info)
}

/// `(T)`, from the open to the close parenthesis
pub(crate) fn redundant_cast_span(info: &CastExpressionInfo) -> TextRange {
    TextRange::new(
        info.open_paren().text_range().start(),
        info.close_paren().text_range().end(),
    )
}

impl Analyzer for RemoveRedundantCast {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::CastExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(info) = redundant_cast(node, ctx.oracle()) {
            ctx.report(redundant_cast_span(&info), &[]);
        }
    }
}

// ============================================================================
// remove-empty-else-clause
// ============================================================================

declare_analyzer!(
    /// `else { }`
    RemoveEmptyElseClause => RuleMetadata::new(
        REMOVE_EMPTY_ELSE_CLAUSE,
        "Remove empty 'else' clause",
        Severity::Hint,
        RuleCategory::Complexity,
    )
    .with_tags(&["redundancy"])
);

fn empty_else(node: &SyntaxNode) -> Option<ast::ElseClause> {
    let clause = ast::ElseClause::cast(node.clone())?;
    let block = ast::Block::cast(clause.statement()?)?;
    if !block.is_empty() || trivia::contains_comments(node) {
        return None;
    }
    if sharplint_core::cst::contains_errors(node) {
        return None;
    }
    Some(clause)
}

/// The empty `else` of an `if` statement
pub(crate) fn empty_else_of(statement: &SyntaxNode) -> Option<ast::ElseClause> {
    let clause = ast::IfStmt::cast(statement.clone())?.else_clause()?;
    empty_else(clause.syntax())
}

/// ` else { }`, the clause plus the whitespace the fix drops with it
fn empty_else_span(clause: &ast::ElseClause) -> Option<TextRange> {
    rewrite::removed_range(clause.syntax(), TriviaPolicy::KeepNone).ok()
}

impl Analyzer for RemoveEmptyElseClause {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    // The removed whitespace belongs to the `if`, so the `if` is the trigger
    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::IfStmt]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(span) = empty_else_of(node).as_ref().and_then(empty_else_span) {
            ctx.report(span, &[]);
        }
    }
}

// ============================================================================
// use-method-group-instead-of-lambda
// ============================================================================

declare_analyzer!(
    /// `x => M(x)` where `M` is a method group
    UseMethodGroupInsteadOfLambda => RuleMetadata::new(
        USE_METHOD_GROUP_INSTEAD_OF_LAMBDA,
        "Use method group instead of anonymous function",
        Severity::Info,
        RuleCategory::Complexity,
    )
    .with_tags(&["simplification"])
);

/// A lambda whose body only forwards its parameter to a method
#[derive(Debug, Clone)]
pub(crate) struct MethodGroupCandidate {
    pub(crate) lambda: SingleParameterLambdaInfo,
    pub(crate) callee: SyntaxNode,
}

pub(crate) fn method_group(
    node: &SyntaxNode,
    oracle: &dyn SemanticOracle,
) -> Option<MethodGroupCandidate> {
    let lambda = SingleParameterLambdaInfo::extract(node, ExtractOptions::exact())?;
    let parameter = lambda.parameter_name();
    let invocation = ast::InvocationExpr::cast(lambda.body().clone())?;

    let [argument] = <[ast::Argument; 1]>::try_from(invocation.arguments()).ok()?;
    if argument.name().is_some() || argument.has_modifier() {
        return None;
    }
    let forwarded = ast::NameRef::cast(argument.expr()?)?;
    if forwarded.text()? != parameter || forwarded.type_arg_list().is_some() {
        return None;
    }

    let callee = invocation.callee()?;
    match callee.kind() {
        SyntaxKind::NameRef => {}
        SyntaxKind::MemberAccessExpr => {
            if ast::MemberAccessExpr::cast(callee.clone())?.is_conditional() {
                return None;
            }
        }
        _ => return None,
    }
    // `x => x.Items.Add(x)` needs the parameter to build the method group
    if references(&callee, parameter) {
        return None;
    }

    let symbol = oracle.symbol_of(invocation.syntax())?;
    if !symbol.is_method() || symbol.is_extension {
        return None;
    }
    if drops_comments(node, &[&callee]) {
        return None;
    }
    Some(MethodGroupCandidate { lambda, callee })
}

fn references(node: &SyntaxNode, name: &str) -> bool {
    node.descendants()
        .filter_map(ast::NameRef::cast)
        .any(|name_ref| name_ref.text().as_deref() == Some(name))
}

impl Analyzer for UseMethodGroupInsteadOfLambda {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::LambdaExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(candidate) = method_group(node, ctx.oracle()) {
            ctx.report(candidate.lambda.anchor().text_range(), &[]);
        }
    }
}

// ============================================================================
// add-argument-list-to-object-creation
// ============================================================================

declare_analyzer!(
    /// `new Foo { A = 1 }` spelled `new Foo() { A = 1 }`
    AddArgumentListToObjectCreation => RuleMetadata::new(
        ADD_ARGUMENT_LIST_TO_OBJECT_CREATION,
        "Add argument list to object creation expression",
        Severity::Hint,
        RuleCategory::Style,
    )
    .with_tags(&["formatting"])
    .not_recommended()
);

/// The created type when the expression has an initializer but no `()`
pub(crate) fn missing_argument_list(node: &SyntaxNode) -> Option<SyntaxNode> {
    let creation = ast::ObjectCreationExpr::cast(node.clone())?;
    if creation.arg_list().is_some() || creation.initializer().is_none() {
        return None;
    }
    let ty = creation.ty()?;
    if sharplint_core::cst::contains_errors(&ty) {
        return None;
    }
    Some(ty)
}

impl Analyzer for AddArgumentListToObjectCreation {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::ObjectCreationExpr]
    }

    fn analyze(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) {
        if let Some(ty) = missing_argument_list(node) {
            // Zero-width: the fix inserts `()` at this point
            ctx.report(TextRange::empty(ty.text_range().end()), &[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{run, spans};

    fn method(body: &str) -> String {
        format!("class C {{ void M(object o, string s, int n) {{ {body} }} }}")
    }

    #[test]
    fn as_null_checks() {
        let analyzer = UseIsOperatorInsteadOfAs::new();
        let source = method("if (o as string == null) { } if (o as string is not null) { }");
        let diagnostics = run(&analyzer, &source);
        assert_eq!(
            spans(&source, &diagnostics),
            vec!["o as string == null", "o as string is not null"]
        );
        assert_eq!(diagnostics[0].message, "Use 'is' operator instead of 'as' operator");
    }

    #[test]
    fn as_null_check_negatives() {
        let analyzer = UseIsOperatorInsteadOfAs::new();
        for body in [
            "if ((o as int?) == null) { }",
            "if (o as /* keep */ string == null) { }",
            "if (o == null) { }",
            "var t = o as string;",
        ] {
            assert!(run(&analyzer, &method(body)).is_empty(), "{body}");
        }
    }

    #[test]
    fn redundant_as_reports_the_tail() {
        let analyzer = RemoveRedundantAsOperator::new();
        let source = method("var t = s as string; var u = o as string;");
        let diagnostics = run(&analyzer, &source);
        assert_eq!(spans(&source, &diagnostics), vec![" as string"]);
    }

    #[test]
    fn redundant_cast_reports_the_parentheses() {
        let analyzer = RemoveRedundantCast::new();
        let source = method("var a = (int)n; var b = (long)n; var c = (string)o;");
        let diagnostics = run(&analyzer, &source);
        assert_eq!(spans(&source, &diagnostics), vec!["(int)"]);
    }

    #[test]
    fn unknown_types_abstain() {
        let cast = RemoveRedundantCast::new();
        assert!(run(&cast, &method("var a = (Missing)unknown;")).is_empty());
        let as_operator = RemoveRedundantAsOperator::new();
        assert!(run(&as_operator, &method("var a = unknown as string;")).is_empty());
    }

    #[test]
    fn empty_else() {
        let analyzer = RemoveEmptyElseClause::new();
        let source = method("if (n > 0) { M(o, s, n); } else { }");
        let diagnostics = run(&analyzer, &source);
        assert_eq!(spans(&source, &diagnostics), vec![" else { }"]);

        let multi_line = method("if (n > 0)\n{\n    M(o, s, n);\n}\nelse\n{\n}\n");
        let diagnostics = run(&analyzer, &multi_line);
        assert_eq!(spans(&multi_line, &diagnostics), vec!["\nelse\n{\n}"]);

        for body in [
            "if (n > 0) { } else { /* nothing */ }",
            "if (n > 0) { } else { n++; }",
            "if (n > 0) { } else if (n < 0) { }",
        ] {
            assert!(run(&analyzer, &method(body)).is_empty(), "{body}");
        }
    }

    #[test]
    fn method_group_candidates() {
        let analyzer = UseMethodGroupInsteadOfLambda::new();
        let source = "class C {
    bool Check(int x) => x > 0;
    void M(List<int> items) {
        var a = items.Where(x => Check(x));
        var b = items.Where(x => Check(x + 1));
        var c = items.Where(x => x.Equals(x));
        var d = items.Select((x) => this.Check(x));
    }
}";
        let diagnostics = run(&analyzer, source);
        assert_eq!(
            spans(source, &diagnostics),
            vec!["x => Check(x)", "(x) => this.Check(x)"]
        );
    }

    #[test]
    fn object_creation_span_is_empty() {
        let analyzer = AddArgumentListToObjectCreation::new();
        let source = "class C { object M() => new Foo { A = 1 }; object N() => new Foo() { A = 1 }; }";
        let diagnostics = run(&analyzer, source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.length, 0);
        assert_eq!(
            diagnostics[0].location.offset,
            source.find("new Foo").unwrap() + "new Foo".len()
        );
    }
}
