//! Statement shapes: `if`/`else`, `else if` chains and `if (c) break;`

use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use super::{ExtractOptions, ShapeInfo, accepts, anchor_identity};

/// `if (condition) then else otherwise`; an `if` without `else` does not match
#[derive(Debug, Clone)]
pub struct IfElseInfo {
    anchor: SyntaxNode,
    if_token: SyntaxToken,
    condition: SyntaxNode,
    then_branch: SyntaxNode,
    else_clause: ast::ElseClause,
    else_statement: SyntaxNode,
}

impl IfElseInfo {
    pub fn if_token(&self) -> &SyntaxToken {
        &self.if_token
    }

    pub fn condition(&self) -> &SyntaxNode {
        &self.condition
    }

    pub fn then_branch(&self) -> &SyntaxNode {
        &self.then_branch
    }

    pub fn else_clause(&self) -> &ast::ElseClause {
        &self.else_clause
    }

    /// Statement after `else`
    pub fn else_statement(&self) -> &SyntaxNode {
        &self.else_statement
    }

    /// `else if (...)`
    pub fn is_else_if(&self) -> bool {
        self.else_statement.kind() == SyntaxKind::IfStmt
    }
}

impl ShapeInfo for IfElseInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let statement = ast::IfStmt::cast(node.clone())?;
        let else_clause = statement.else_clause()?;
        let info = Self {
            if_token: statement.if_token()?,
            condition: statement.condition()?,
            then_branch: statement.then_branch()?,
            else_statement: else_clause.statement()?,
            else_clause,
            anchor: node.clone(),
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// `if (a) … else if (b) … else …`, anchored on the head of the chain
#[derive(Debug, Clone)]
pub struct IfStatementChainInfo {
    anchor: SyntaxNode,
    ifs: Vec<ast::IfStmt>,
    final_else: Option<SyntaxNode>,
}

impl IfStatementChainInfo {
    /// Every `if` of the chain, head first
    pub fn ifs(&self) -> &[ast::IfStmt] {
        &self.ifs
    }

    /// Statement of the trailing plain `else`
    pub fn final_else(&self) -> Option<&SyntaxNode> {
        self.final_else.as_ref()
    }

    pub fn len(&self) -> usize {
        self.ifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ifs.is_empty()
    }
}

impl ShapeInfo for IfStatementChainInfo {
    /// Any `if` of the chain yields the whole chain
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let head = ast::IfStmt::cast(node.clone())?.chain_head();
        let mut ifs = vec![head.clone()];
        let mut final_else = None;
        loop {
            let Some(clause) = ifs.last().and_then(|last| last.else_clause()) else {
                break;
            };
            let statement = clause.statement()?;
            match ast::IfStmt::cast(statement.clone()) {
                Some(next) => ifs.push(next),
                None => {
                    final_else = Some(statement);
                    break;
                }
            }
        }
        let info = Self {
            anchor: head.syntax().clone(),
            ifs,
            final_else,
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// `if (condition) break;` or `if (condition) { break; }` without `else`
#[derive(Debug, Clone)]
pub struct BreakIfInfo {
    anchor: SyntaxNode,
    condition: SyntaxNode,
    break_statement: SyntaxNode,
}

impl BreakIfInfo {
    pub fn condition(&self) -> &SyntaxNode {
        &self.condition
    }

    pub fn break_statement(&self) -> &SyntaxNode {
        &self.break_statement
    }
}

impl ShapeInfo for BreakIfInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let statement = ast::IfStmt::cast(node.clone())?;
        if statement.else_clause().is_some() {
            return None;
        }
        let then_branch = statement.then_branch()?;
        let break_statement = match then_branch.kind() {
            SyntaxKind::BreakStmt => then_branch,
            SyntaxKind::Block => {
                let mut statements = ast::Block::cast(then_branch)?.statements();
                let only = statements.next()?;
                if statements.next().is_some() || only.kind() != SyntaxKind::BreakStmt {
                    return None;
                }
                only
            }
            _ => return None,
        };
        let info = Self {
            condition: statement.condition()?,
            break_statement,
            anchor: node.clone(),
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

anchor_identity!(IfElseInfo, IfStatementChainInfo, BreakIfInfo);
