//! Rowan language implementation
//!
//! Connects [`SyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SyntaxKind;

/// Language marker for the sharplint syntax tree
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SharpLanguage;

impl Language for SharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Raw kinds only ever come from `kind_to_raw`, so an unknown value
        // means a foreign green node was spliced in.
        SyntaxKind::from_raw(raw.0).unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for a syntax node
pub type SyntaxNode = rowan::SyntaxNode<SharpLanguage>;

/// Type alias for a syntax token
pub type SyntaxToken = rowan::SyntaxToken<SharpLanguage>;

/// Type alias for either a node or token
pub type SyntaxElement = rowan::SyntaxElement<SharpLanguage>;

/// Iterator over the children of a node
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<SharpLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        let kinds = [
            SyntaxKind::Whitespace,
            SyntaxKind::Directive,
            SyntaxKind::AsKw,
            SyntaxKind::FatArrow,
            SyntaxKind::Ident,
            SyntaxKind::CompilationUnit,
            SyntaxKind::LambdaExpr,
        ];

        for kind in kinds {
            let raw = SharpLanguage::kind_to_raw(kind);
            assert_eq!(SharpLanguage::kind_from_raw(raw), kind);
        }
    }

    #[test]
    fn test_unknown_raw_maps_to_error() {
        assert_eq!(
            SharpLanguage::kind_from_raw(rowan::SyntaxKind(9999)),
            SyntaxKind::Error
        );
    }
}
