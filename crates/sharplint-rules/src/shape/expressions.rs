//! Expression shapes: `as`, `is`, casts, binary operators and null checks

use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use super::{ExtractOptions, ShapeInfo, accepts, anchor_identity, walk_down};

/// `expression as Type`
#[derive(Debug, Clone)]
pub struct AsExpressionInfo {
    anchor: SyntaxNode,
    expression: SyntaxNode,
    as_token: SyntaxToken,
    ty: SyntaxNode,
}

impl AsExpressionInfo {
    pub fn expression(&self) -> &SyntaxNode {
        &self.expression
    }

    pub fn as_token(&self) -> &SyntaxToken {
        &self.as_token
    }

    pub fn ty(&self) -> &SyntaxNode {
        &self.ty
    }
}

impl ShapeInfo for AsExpressionInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let anchor = walk_down(node, options);
        let expr = ast::AsExpr::cast(anchor.clone())?;
        let info = Self {
            expression: expr.expr()?,
            as_token: expr.as_token()?,
            ty: expr.ty()?,
            anchor,
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// `expression is Type`
#[derive(Debug, Clone)]
pub struct IsExpressionInfo {
    anchor: SyntaxNode,
    expression: SyntaxNode,
    ty: SyntaxNode,
}

impl IsExpressionInfo {
    pub fn expression(&self) -> &SyntaxNode {
        &self.expression
    }

    pub fn ty(&self) -> &SyntaxNode {
        &self.ty
    }
}

impl ShapeInfo for IsExpressionInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let anchor = walk_down(node, options);
        let expr = ast::IsExpr::cast(anchor.clone())?;
        let info = Self {
            expression: expr.expr()?,
            ty: expr.ty()?,
            anchor,
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// `(Type)expression`
#[derive(Debug, Clone)]
pub struct CastExpressionInfo {
    anchor: SyntaxNode,
    open_paren: SyntaxToken,
    ty: SyntaxNode,
    close_paren: SyntaxToken,
    expression: SyntaxNode,
}

impl CastExpressionInfo {
    pub fn open_paren(&self) -> &SyntaxToken {
        &self.open_paren
    }

    pub fn ty(&self) -> &SyntaxNode {
        &self.ty
    }

    pub fn close_paren(&self) -> &SyntaxToken {
        &self.close_paren
    }

    pub fn expression(&self) -> &SyntaxNode {
        &self.expression
    }
}

impl ShapeInfo for CastExpressionInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let anchor = walk_down(node, options);
        let cast = ast::CastExpr::cast(anchor.clone())?;
        let info = Self {
            open_paren: cast.l_paren_token()?,
            ty: cast.ty()?,
            close_paren: cast.r_paren_token()?,
            expression: cast.expr()?,
            anchor,
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// `left op right`; the operands are walked down when the options say so
#[derive(Debug, Clone)]
pub struct BinaryExpressionInfo {
    anchor: SyntaxNode,
    left: SyntaxNode,
    operator: SyntaxToken,
    right: SyntaxNode,
}

impl BinaryExpressionInfo {
    pub fn left(&self) -> &SyntaxNode {
        &self.left
    }

    pub fn operator(&self) -> &SyntaxToken {
        &self.operator
    }

    pub fn operator_kind(&self) -> SyntaxKind {
        self.operator.kind()
    }

    pub fn right(&self) -> &SyntaxNode {
        &self.right
    }
}

impl ShapeInfo for BinaryExpressionInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let anchor = walk_down(node, options);
        let binary = ast::BinaryExpr::cast(anchor.clone())?;
        let info = Self {
            left: walk_down(&binary.lhs()?, options),
            operator: binary.op_token()?,
            right: walk_down(&binary.rhs()?, options),
            anchor,
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// How a null check is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullCheckStyle {
    /// `x == null` or `null == x`
    EqualsToNull,
    /// `x != null` or `null != x`
    NotEqualsToNull,
    /// `x is null`
    IsNull,
    /// `x is not null`
    IsNotNull,
}

impl NullCheckStyle {
    pub fn is_check_not_null(self) -> bool {
        matches!(self, Self::NotEqualsToNull | Self::IsNotNull)
    }

    fn bit(self) -> u8 {
        match self {
            Self::EqualsToNull => 1,
            Self::NotEqualsToNull => 2,
            Self::IsNull => 4,
            Self::IsNotNull => 8,
        }
    }
}

/// Set of accepted null check styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NullCheckStyles(u8);

impl NullCheckStyles {
    pub const NONE: Self = Self(0);
    pub const COMPARISON: Self = Self(1 | 2);
    pub const PATTERN: Self = Self(4 | 8);
    pub const CHECK_NULL: Self = Self(1 | 4);
    pub const CHECK_NOT_NULL: Self = Self(2 | 8);
    pub const ALL: Self = Self(1 | 2 | 4 | 8);

    pub fn contains(self, style: NullCheckStyle) -> bool {
        self.0 & style.bit() != 0
    }
}

impl std::ops::BitOr for NullCheckStyles {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<NullCheckStyle> for NullCheckStyles {
    fn from(style: NullCheckStyle) -> Self {
        Self(style.bit())
    }
}

/// `x == null`, `x != null`, `x is null` or `x is not null`
#[derive(Debug, Clone)]
pub struct NullCheckInfo {
    anchor: SyntaxNode,
    expression: SyntaxNode,
    style: NullCheckStyle,
}

impl NullCheckInfo {
    /// Extract only the styles in `allowed`
    pub fn extract_with_styles(
        node: &SyntaxNode,
        options: ExtractOptions,
        allowed: NullCheckStyles,
    ) -> Option<Self> {
        let anchor = walk_down(node, options);
        let (expression, style) = match anchor.kind() {
            SyntaxKind::BinaryExpr => {
                let binary = BinaryExpressionInfo::extract(&anchor, options)?;
                let style = match binary.operator_kind() {
                    SyntaxKind::EqEq => NullCheckStyle::EqualsToNull,
                    SyntaxKind::BangEq => NullCheckStyle::NotEqualsToNull,
                    _ => return None,
                };
                let expression = match (is_null(binary.left()), is_null(binary.right())) {
                    (false, true) => binary.left().clone(),
                    (true, false) => binary.right().clone(),
                    _ => return None,
                };
                (expression, style)
            }
            SyntaxKind::IsPatternExpr => {
                let expr = ast::IsPatternExpr::cast(anchor.clone())?;
                let style = match null_pattern(&expr.pattern()?)? {
                    false => NullCheckStyle::IsNull,
                    true => NullCheckStyle::IsNotNull,
                };
                (walk_down(&expr.expr()?, options), style)
            }
            _ => return None,
        };
        if !allowed.contains(style) || !accepts(&anchor, options) {
            return None;
        }
        Some(Self {
            anchor,
            expression,
            style,
        })
    }

    /// The checked expression (never the `null` literal)
    pub fn expression(&self) -> &SyntaxNode {
        &self.expression
    }

    pub fn style(&self) -> NullCheckStyle {
        self.style
    }

    pub fn is_check_not_null(&self) -> bool {
        self.style.is_check_not_null()
    }
}

impl ShapeInfo for NullCheckInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        Self::extract_with_styles(node, options, NullCheckStyles::ALL)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// A null check whose operand is an `as` expression: `x as T == null`
#[derive(Debug, Clone)]
pub struct AsNullCheckInfo {
    anchor: SyntaxNode,
    null_check: NullCheckInfo,
    as_expression: AsExpressionInfo,
}

impl AsNullCheckInfo {
    pub fn null_check(&self) -> &NullCheckInfo {
        &self.null_check
    }

    pub fn as_expression(&self) -> &AsExpressionInfo {
        &self.as_expression
    }
}

impl ShapeInfo for AsNullCheckInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let null_check = NullCheckInfo::extract(node, options)?;
        let as_expression = AsExpressionInfo::extract(null_check.expression(), options)?;
        Some(Self {
            anchor: null_check.anchor.clone(),
            null_check,
            as_expression,
        })
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

anchor_identity!(
    AsExpressionInfo,
    IsExpressionInfo,
    CastExpressionInfo,
    BinaryExpressionInfo,
    NullCheckInfo,
    AsNullCheckInfo,
);

fn is_null(expr: &SyntaxNode) -> bool {
    ast::Literal::cast(expr.clone()).is_some_and(|literal| literal.is_null())
}

/// `Some(negated)` when the pattern is `null` or `not null`
fn null_pattern(pattern: &SyntaxNode) -> Option<bool> {
    let constant_is_null = |constant: &SyntaxNode| {
        constant.kind() == SyntaxKind::ConstantPattern
            && constant.children().next().as_ref().is_some_and(is_null)
    };
    match pattern.kind() {
        SyntaxKind::ConstantPattern => constant_is_null(pattern).then_some(false),
        SyntaxKind::NotPattern => pattern
            .children()
            .next()
            .filter(|inner| constant_is_null(inner))
            .map(|_| true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::tests::node;

    fn in_method(body: &str) -> String {
        format!("class C {{ void M() {{ {body} }} }}")
    }

    #[test]
    fn as_expression_parts() {
        let anchor = node(&in_method("var s = o as string;"), SyntaxKind::AsExpr);
        let info = AsExpressionInfo::of(&anchor).unwrap();
        assert_eq!(info.expression().text(), "o");
        assert_eq!(info.ty().text(), "string");
        assert_eq!(info.as_token().kind(), SyntaxKind::AsKw);
    }

    #[test]
    fn extraction_is_idempotent() {
        let anchor = node(&in_method("var s = o as string;"), SyntaxKind::AsExpr);
        let first = AsExpressionInfo::of(&anchor).unwrap();
        let second = AsExpressionInfo::of(&anchor).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.expression(), second.expression());
        assert_eq!(first.ty(), second.ty());
    }

    #[test]
    fn cast_parts() {
        let anchor = node(&in_method("var n = (long)count;"), SyntaxKind::CastExpr);
        let info = CastExpressionInfo::of(&anchor).unwrap();
        assert_eq!(info.ty().text(), "long");
        assert_eq!(info.expression().text(), "count");
        assert_eq!(info.open_paren().kind(), SyntaxKind::LParen);
        assert_eq!(info.close_paren().kind(), SyntaxKind::RParen);
    }

    #[test]
    fn binary_operands_walk_down() {
        let anchor = node(&in_method("var b = (a) == ((c));"), SyntaxKind::BinaryExpr);
        let info = BinaryExpressionInfo::of(&anchor).unwrap();
        assert_eq!(info.left().text(), "a");
        assert_eq!(info.right().text(), "c");
        assert_eq!(info.operator_kind(), SyntaxKind::EqEq);

        let exact = BinaryExpressionInfo::extract(&anchor, ExtractOptions::exact()).unwrap();
        assert_eq!(exact.right().text(), "((c))");
    }

    #[test]
    fn null_check_styles() {
        let cases = [
            ("var b = x == null;", NullCheckStyle::EqualsToNull),
            ("var b = null != x;", NullCheckStyle::NotEqualsToNull),
            ("var b = x is null;", NullCheckStyle::IsNull),
            ("var b = x is not null;", NullCheckStyle::IsNotNull),
        ];
        for (body, style) in cases {
            let source = in_method(body);
            let anchor = node(&source, SyntaxKind::VariableDeclarator)
                .descendants()
                .find(|n| matches!(n.kind(), SyntaxKind::BinaryExpr | SyntaxKind::IsPatternExpr))
                .unwrap();
            let info = NullCheckInfo::of(&anchor).unwrap();
            assert_eq!(info.style(), style, "{body}");
            assert_eq!(info.expression().text(), "x");
        }
    }

    #[test]
    fn null_check_style_mask() {
        let anchor = node(&in_method("var b = x is null;"), SyntaxKind::IsPatternExpr);
        let options = ExtractOptions::default();
        assert!(
            NullCheckInfo::extract_with_styles(&anchor, options, NullCheckStyles::COMPARISON)
                .is_none()
        );
        assert!(
            NullCheckInfo::extract_with_styles(&anchor, options, NullCheckStyles::CHECK_NULL)
                .is_some()
        );
    }

    #[test]
    fn null_check_rejects_other_comparisons() {
        let anchor = node(&in_method("var b = x == y;"), SyntaxKind::BinaryExpr);
        assert!(NullCheckInfo::of(&anchor).is_none());
        let both = node(&in_method("var b = null == null;"), SyntaxKind::BinaryExpr);
        assert!(NullCheckInfo::of(&both).is_none());
        let declaration = node(&in_method("var b = x is string s;"), SyntaxKind::IsPatternExpr);
        assert!(NullCheckInfo::of(&declaration).is_none());
    }

    #[test]
    fn as_null_check_sees_through_parentheses() {
        let anchor = node(&in_method("var b = (x as string) != null;"), SyntaxKind::BinaryExpr);
        let info = AsNullCheckInfo::of(&anchor).unwrap();
        assert!(info.null_check().is_check_not_null());
        assert_eq!(info.as_expression().ty().text(), "string");
        assert_eq!(info.anchor(), &anchor);

        assert!(AsNullCheckInfo::extract(&anchor, ExtractOptions::exact()).is_none());
    }
}
