//! Structural rewrite primitives
//!
//! Every function takes nodes of an existing tree and returns the green root
//! of a *new* tree. The input tree is never touched; only the green nodes on
//! the path from the edit to the root are rebuilt, everything else is shared.
//!
//! Because composite nodes never own their exterior trivia, replacing a node
//! keeps the whitespace and comments around it. [`TriviaPolicy`] only matters
//! when a node is removed outright.

use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange};

use super::{GreenElement, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::error::SharplintError;
use crate::result::Result;

/// What happens to the trivia next to a removed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriviaPolicy {
    /// Keep the surrounding trivia exactly as it is
    #[default]
    KeepExterior,
    /// Drop the adjacent whitespace-only run as well; comments always stay
    KeepNone,
}

/// Replace `target` with a new subtree, which may be of another kind
///
/// The replacement is spliced into the parent, so only the parent and its
/// ancestors have to keep their kinds. Replacing the root yields the
/// replacement itself.
pub fn replace_node(target: &SyntaxNode, replacement: GreenNode) -> GreenNode {
    match target.parent() {
        Some(parent) => {
            let green = parent
                .green()
                .replace_child(target.index(), NodeOrToken::Node(replacement));
            parent.replace_with(green)
        }
        None => replacement,
    }
}

/// Replace a single token, keeping its position in the parent
pub fn replace_token(target: &SyntaxToken, replacement: GreenToken) -> Result<GreenNode> {
    let parent = target
        .parent()
        .ok_or_else(|| SharplintError::contract_violation("token without a tree"))?;
    let green = parent
        .green()
        .replace_child(target.index(), NodeOrToken::Token(replacement));
    Ok(parent.replace_with(green))
}

/// Insert elements right after `anchor`, inside the anchor's parent
pub fn insert_after(anchor: &SyntaxElement, elements: Vec<GreenElement>) -> Result<GreenNode> {
    let (parent, index) = position_of(anchor)?;
    let green = parent.green().splice_children(index + 1..index + 1, elements);
    Ok(parent.replace_with(green))
}

/// Exchange two nodes that share a parent; trivia between them stays put
pub fn swap_siblings(first: &SyntaxNode, second: &SyntaxNode) -> Result<GreenNode> {
    let parent = parent_of(first)?;
    if second.parent().as_ref() != Some(&parent) {
        return Err(SharplintError::contract_violation(
            "swapped nodes must share a parent",
        ));
    }
    let green = parent
        .green()
        .replace_child(first.index(), NodeOrToken::Node(second.green().into_owned()))
        .replace_child(second.index(), NodeOrToken::Node(first.green().into_owned()));
    Ok(parent.replace_with(green))
}

/// Remove `target` from its parent
pub fn remove_node(target: &SyntaxNode, policy: TriviaPolicy) -> Result<GreenNode> {
    let parent = parent_of(target)?;
    let range = sibling_range(&parent, target.index(), policy);
    let green = parent.green().splice_children(range, Vec::new());
    Ok(parent.replace_with(green))
}

/// Text that [`remove_node`] takes out of the document for `target`
pub fn removed_range(target: &SyntaxNode, policy: TriviaPolicy) -> Result<TextRange> {
    let parent = parent_of(target)?;
    let range = sibling_range(&parent, target.index(), policy);
    let mut removed = parent
        .children_with_tokens()
        .skip(range.start)
        .take(range.len())
        .map(|element| element.text_range());
    let first = removed
        .next()
        .ok_or_else(|| SharplintError::internal_error("removal range is empty"))?;
    Ok(removed.fold(first, |covered, next| covered.cover(next)))
}

fn sibling_range(
    parent: &SyntaxNode,
    index: usize,
    policy: TriviaPolicy,
) -> std::ops::Range<usize> {
    match policy {
        TriviaPolicy::KeepExterior => index..index + 1,
        TriviaPolicy::KeepNone => removal_range(parent, index),
    }
}

/// Sibling range covering the node plus the whitespace that only served it
fn removal_range(parent: &SyntaxNode, index: usize) -> std::ops::Range<usize> {
    let kinds: Vec<SyntaxKind> = parent.children_with_tokens().map(|e| e.kind()).collect();
    let kind_at = |i: usize| kinds.get(i).copied();

    let mut start = index;
    while start > 0 && kind_at(start - 1) == Some(SyntaxKind::Whitespace) {
        start -= 1;
    }
    let mut end = index + 1;
    while kind_at(end) == Some(SyntaxKind::Whitespace) {
        end += 1;
    }

    let own_line = start > 0 && kind_at(start - 1) == Some(SyntaxKind::Newline);
    match kind_at(end) {
        Some(SyntaxKind::Newline) if own_line => start..end + 1,
        // Last thing in the parent: the line break before it goes instead
        None if own_line => start - 1..end,
        Some(SyntaxKind::Newline) | None => start..end,
        // Something (often a comment) follows on the same line
        Some(_) => index..end,
    }
}

fn parent_of(node: &SyntaxNode) -> Result<SyntaxNode> {
    node.parent()
        .ok_or_else(|| SharplintError::contract_violation("the root node cannot be spliced"))
}

fn position_of(element: &SyntaxElement) -> Result<(SyntaxNode, usize)> {
    let (parent, index) = match element {
        NodeOrToken::Node(node) => (node.parent(), node.index()),
        NodeOrToken::Token(token) => (token.parent(), token.index()),
    };
    let parent = parent
        .ok_or_else(|| SharplintError::contract_violation("the root node cannot be spliced"))?;
    Ok((parent, index))
}
