//! Refactorings
//!
//! Unlike code fixes, refactorings are not driven by a diagnostic: a client
//! asks for them on a node the user selected. They share the fix result type
//! so the same preview and apply paths serve both.

mod invert_if;
mod swap_operands;

pub use invert_if::InvertIf;
pub use swap_operands::SwapBinaryOperands;

use std::sync::Arc;

use rowan::{GreenNode, TextRange};
use sharplint_core::cst::SyntaxNode;
use sharplint_core::{Document, Result};

use crate::fixes::{CodeFix, FixOutcome};

/// A user-invoked rewrite of one node
pub trait Refactoring: Send + Sync {
    /// Identifier, `refactoring/<name>`
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// Whether [`Refactoring::apply`] would produce an edit for `node`
    fn is_applicable(&self, node: &SyntaxNode) -> bool;

    /// Rewrite `node`, which must belong to `document`
    fn apply(&self, document: &Document, node: &SyntaxNode) -> Result<FixOutcome>;
}

/// Replace `target` in `document`, marking the new subtree for formatting
fn replace(
    refactoring: &dyn Refactoring,
    document: &Document,
    target: &SyntaxNode,
    replacement: GreenNode,
) -> Result<FixOutcome> {
    let range = TextRange::at(target.text_range().start(), replacement.text_len());
    let document = document.replace_node(target, replacement)?;
    Ok(CodeFix::new(refactoring.title(), refactoring.id(), document)
        .with_format_range(range)
        .into())
}

/// Every built-in refactoring
pub fn builtin_refactorings() -> Vec<Arc<dyn Refactoring>> {
    vec![Arc::new(InvertIf), Arc::new(SwapBinaryOperands)]
}

#[cfg(test)]
pub(crate) mod test_support {
    use sharplint_core::cst::SyntaxKind;
    use sharplint_core::Document;

    use super::Refactoring;

    /// Apply `refactoring` to the first node of `kind`, returning the new text
    pub(crate) fn refactored(
        refactoring: &dyn Refactoring,
        source: &str,
        kind: SyntaxKind,
    ) -> Option<String> {
        let document = Document::parse("test.cs", source);
        let node = document.syntax().descendants().find(|n| n.kind() == kind)?;
        let outcome = refactoring.apply(&document, &node).unwrap();
        outcome.into_fix().map(|fix| fix.document.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::cst::SyntaxKind;
    use sharplint_core::ErrorKind;

    #[test]
    fn node_of_another_document_is_rejected() {
        let first = Document::parse("a.cs", "class C { bool M(int a, int b) => a == b; }");
        let second = Document::parse("b.cs", "class D { bool N(int x, int y) => x == y; }");
        let node = first
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::BinaryExpr)
            .unwrap();
        let err = SwapBinaryOperands.apply(&second, &node).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Contract);
    }

    #[test]
    fn refactoring_ids_are_unique() {
        let refactorings = builtin_refactorings();
        let mut ids: Vec<&str> = refactorings.iter().map(|r| r.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), refactorings.len());
    }
}
