//! Immutable document snapshots
//!
//! A [`Document`] is a path plus the green root of its syntax tree. Every edit
//! returns a new snapshot; the old one stays valid and shares all untouched
//! subtrees with the new one. Documents are `Send + Sync`, so one snapshot can
//! be analyzed by many threads, each building its own red tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rowan::{GreenNode, GreenToken};

use crate::cst::rewrite::{self, TriviaPolicy};
use crate::cst::{GreenElement, SyntaxElement, SyntaxNode, SyntaxToken, parse_source};
use crate::diagnostics::SourceMap;
use crate::error::SharplintError;
use crate::result::Result;

#[derive(Debug, Clone)]
pub struct Document {
    path: Arc<PathBuf>,
    green: GreenNode,
}

impl Document {
    /// Parse source text into a document
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Self {
        let parse = parse_source(source);
        if !parse.ok() {
            tracing::debug!(errors = parse.errors().len(), "document parsed with errors");
        }
        Self {
            path: Arc::new(path.into()),
            green: parse.into_green(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Fresh red root; cheap, and local to the calling thread
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn text(&self) -> String {
        self.syntax().text().to_string()
    }

    pub fn source_map(&self) -> SourceMap {
        SourceMap::new(self.path.as_ref().clone(), &self.text())
    }

    /// Replace a node with a new subtree
    pub fn replace_node(&self, target: &SyntaxNode, replacement: GreenNode) -> Result<Self> {
        self.check_owner(target)?;
        Ok(self.with_green(rewrite::replace_node(target, replacement)))
    }

    /// Replace a token, e.g. an identifier being renamed
    pub fn replace_token(&self, target: &SyntaxToken, replacement: GreenToken) -> Result<Self> {
        self.check_owner_of_token(target)?;
        Ok(self.with_green(rewrite::replace_token(target, replacement)?))
    }

    /// Insert elements after a node or token
    pub fn insert_after(
        &self,
        anchor: &SyntaxElement,
        elements: Vec<GreenElement>,
    ) -> Result<Self> {
        match anchor {
            rowan::NodeOrToken::Node(node) => self.check_owner(node)?,
            rowan::NodeOrToken::Token(token) => self.check_owner_of_token(token)?,
        }
        Ok(self.with_green(rewrite::insert_after(anchor, elements)?))
    }

    pub fn remove_node(&self, target: &SyntaxNode, policy: TriviaPolicy) -> Result<Self> {
        self.check_owner(target)?;
        Ok(self.with_green(rewrite::remove_node(target, policy)?))
    }

    /// Exchange two sibling nodes
    pub fn swap_nodes(&self, first: &SyntaxNode, second: &SyntaxNode) -> Result<Self> {
        self.check_owner(first)?;
        self.check_owner(second)?;
        Ok(self.with_green(rewrite::swap_siblings(first, second)?))
    }

    fn with_green(&self, green: GreenNode) -> Self {
        Self {
            path: Arc::clone(&self.path),
            green,
        }
    }

    /// A node belongs to this snapshot when its root is this document's tree
    fn check_owner(&self, node: &SyntaxNode) -> Result<()> {
        let root = node.ancestors().last().unwrap_or_else(|| node.clone());
        self.check_root(&root)
    }

    fn check_owner_of_token(&self, token: &SyntaxToken) -> Result<()> {
        match token.parent() {
            Some(parent) => self.check_owner(&parent),
            None => Err(SharplintError::contract_violation("token without a tree")),
        }
    }

    /// Red roots of this snapshot share its green allocation; an equal tree
    /// parsed separately does not
    fn check_root(&self, root: &SyntaxNode) -> Result<()> {
        if std::ptr::eq(&*root.green(), &*self.green) {
            Ok(())
        } else {
            Err(SharplintError::contract_violation(format!(
                "node does not belong to document '{}'",
                self.path.display()
            )))
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.green == other.green
    }
}

impl Eq for Document {}
