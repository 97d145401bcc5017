//! Syntax shape extractors
//!
//! A shape is a named decomposition of a syntax node: `x as T == null` is an
//! [`AsNullCheckInfo`] whose parts are the null check and the inner `as`
//! expression. Extraction is a pure function of the node. It either succeeds
//! with every part present or returns `None`; there is no partially filled
//! shape.
//!
//! Every shape implements [`ShapeInfo`]. [`Shape`] is the closed sum over all
//! of them, for callers that dispatch on the kind of shape at runtime.
//!
//! Two shapes compare equal when they wrap the same anchor node, so a pass can
//! deduplicate by identity without comparing the parts.

mod declarations;
mod expressions;
mod invocations;
mod statements;

pub use declarations::{ConstraintClauseOrderInfo, ModifierListInfo};
pub use expressions::{
    AsExpressionInfo, AsNullCheckInfo, BinaryExpressionInfo, CastExpressionInfo,
    IsExpressionInfo, NullCheckInfo, NullCheckStyle, NullCheckStyles,
};
pub use invocations::{MemberInvocationInfo, SingleParameterLambdaInfo};
pub use statements::{BreakIfInfo, IfElseInfo, IfStatementChainInfo};

use sharplint_core::cst::{SyntaxKind, SyntaxNode, contains_errors};

/// Options shared by every extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// See through `( expr )` wrappers around the candidate and its operands
    pub walk_down_parentheses: bool,
    /// Accept nodes containing missing-token markers or error nodes
    pub allow_missing: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            walk_down_parentheses: true,
            allow_missing: false,
        }
    }
}

impl ExtractOptions {
    /// Options that take the candidate node literally
    pub fn exact() -> Self {
        Self {
            walk_down_parentheses: false,
            ..Self::default()
        }
    }
}

/// A decomposition of a syntax node into named parts
pub trait ShapeInfo: Sized {
    /// Match `node` against this shape
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self>;

    /// The node the shape was extracted from
    fn anchor(&self) -> &SyntaxNode;

    /// [`ShapeInfo::extract`] with default options
    fn of(node: &SyntaxNode) -> Option<Self> {
        Self::extract(node, ExtractOptions::default())
    }
}

/// Equality and hashing by anchor identity
macro_rules! anchor_identity {
    ($($name:ident),* $(,)?) => {
        $(
            impl PartialEq for $name {
                fn eq(&self, other: &Self) -> bool {
                    self.anchor == other.anchor
                }
            }

            impl Eq for $name {}

            impl std::hash::Hash for $name {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    self.anchor.hash(state);
                }
            }
        )*
    };
}

pub(crate) use anchor_identity;

/// Strip `( … )` wrappers when the options ask for it
pub(crate) fn walk_down(node: &SyntaxNode, options: ExtractOptions) -> SyntaxNode {
    let mut current = node.clone();
    if !options.walk_down_parentheses {
        return current;
    }
    while current.kind() == SyntaxKind::ParenExpr {
        match current.children().find(|n| n.kind().is_expression()) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// The missing-token check applied to every successful extraction
pub(crate) fn accepts(node: &SyntaxNode, options: ExtractOptions) -> bool {
    options.allow_missing || !contains_errors(node)
}

/// Kinds of shape, the tag of [`Shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    AsExpression,
    IsExpression,
    CastExpression,
    BinaryExpression,
    NullCheck,
    AsNullCheck,
    MemberInvocation,
    SingleParameterLambda,
    IfElse,
    IfStatementChain,
    BreakIf,
    ModifierList,
    ConstraintClauseOrder,
}

impl ShapeKind {
    pub const ALL: &'static [ShapeKind] = &[
        ShapeKind::AsExpression,
        ShapeKind::IsExpression,
        ShapeKind::CastExpression,
        ShapeKind::BinaryExpression,
        ShapeKind::NullCheck,
        ShapeKind::AsNullCheck,
        ShapeKind::MemberInvocation,
        ShapeKind::SingleParameterLambda,
        ShapeKind::IfElse,
        ShapeKind::IfStatementChain,
        ShapeKind::BreakIf,
        ShapeKind::ModifierList,
        ShapeKind::ConstraintClauseOrder,
    ];
}

/// Any supported shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    AsExpression(AsExpressionInfo),
    IsExpression(IsExpressionInfo),
    CastExpression(CastExpressionInfo),
    BinaryExpression(BinaryExpressionInfo),
    NullCheck(NullCheckInfo),
    AsNullCheck(AsNullCheckInfo),
    MemberInvocation(MemberInvocationInfo),
    SingleParameterLambda(SingleParameterLambdaInfo),
    IfElse(IfElseInfo),
    IfStatementChain(IfStatementChainInfo),
    BreakIf(BreakIfInfo),
    ModifierList(ModifierListInfo),
    ConstraintClauseOrder(ConstraintClauseOrderInfo),
}

impl Shape {
    /// Extract the shape of the given kind
    pub fn extract(kind: ShapeKind, node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let shape = match kind {
            ShapeKind::AsExpression => Self::AsExpression(ShapeInfo::extract(node, options)?),
            ShapeKind::IsExpression => Self::IsExpression(ShapeInfo::extract(node, options)?),
            ShapeKind::CastExpression => Self::CastExpression(ShapeInfo::extract(node, options)?),
            ShapeKind::BinaryExpression => {
                Self::BinaryExpression(ShapeInfo::extract(node, options)?)
            }
            ShapeKind::NullCheck => Self::NullCheck(ShapeInfo::extract(node, options)?),
            ShapeKind::AsNullCheck => Self::AsNullCheck(ShapeInfo::extract(node, options)?),
            ShapeKind::MemberInvocation => {
                Self::MemberInvocation(ShapeInfo::extract(node, options)?)
            }
            ShapeKind::SingleParameterLambda => {
                Self::SingleParameterLambda(ShapeInfo::extract(node, options)?)
            }
            ShapeKind::IfElse => Self::IfElse(ShapeInfo::extract(node, options)?),
            ShapeKind::IfStatementChain => {
                Self::IfStatementChain(ShapeInfo::extract(node, options)?)
            }
            ShapeKind::BreakIf => Self::BreakIf(ShapeInfo::extract(node, options)?),
            ShapeKind::ModifierList => Self::ModifierList(ShapeInfo::extract(node, options)?),
            ShapeKind::ConstraintClauseOrder => {
                Self::ConstraintClauseOrder(ShapeInfo::extract(node, options)?)
            }
        };
        Some(shape)
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::AsExpression(_) => ShapeKind::AsExpression,
            Self::IsExpression(_) => ShapeKind::IsExpression,
            Self::CastExpression(_) => ShapeKind::CastExpression,
            Self::BinaryExpression(_) => ShapeKind::BinaryExpression,
            Self::NullCheck(_) => ShapeKind::NullCheck,
            Self::AsNullCheck(_) => ShapeKind::AsNullCheck,
            Self::MemberInvocation(_) => ShapeKind::MemberInvocation,
            Self::SingleParameterLambda(_) => ShapeKind::SingleParameterLambda,
            Self::IfElse(_) => ShapeKind::IfElse,
            Self::IfStatementChain(_) => ShapeKind::IfStatementChain,
            Self::BreakIf(_) => ShapeKind::BreakIf,
            Self::ModifierList(_) => ShapeKind::ModifierList,
            Self::ConstraintClauseOrder(_) => ShapeKind::ConstraintClauseOrder,
        }
    }

    pub fn anchor(&self) -> &SyntaxNode {
        match self {
            Self::AsExpression(it) => it.anchor(),
            Self::IsExpression(it) => it.anchor(),
            Self::CastExpression(it) => it.anchor(),
            Self::BinaryExpression(it) => it.anchor(),
            Self::NullCheck(it) => it.anchor(),
            Self::AsNullCheck(it) => it.anchor(),
            Self::MemberInvocation(it) => it.anchor(),
            Self::SingleParameterLambda(it) => it.anchor(),
            Self::IfElse(it) => it.anchor(),
            Self::IfStatementChain(it) => it.anchor(),
            Self::BreakIf(it) => it.anchor(),
            Self::ModifierList(it) => it.anchor(),
            Self::ConstraintClauseOrder(it) => it.anchor(),
        }
    }
}
