//! Declaration shapes: modifier lists and `where` clause ordering

use sharplint_core::cst::ast::{self, AstNode, HasTypeParameters};
use sharplint_core::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use super::{ExtractOptions, ShapeInfo, accepts, anchor_identity};

/// Modifiers of a member declaration, anchored on the declaration
#[derive(Debug, Clone)]
pub struct ModifierListInfo {
    anchor: SyntaxNode,
    list: ast::ModifierList,
    modifiers: Vec<SyntaxToken>,
}

impl ModifierListInfo {
    pub fn list(&self) -> &ast::ModifierList {
        &self.list
    }

    /// Modifier tokens in source order
    pub fn modifiers(&self) -> &[SyntaxToken] {
        &self.modifiers
    }
}

impl ShapeInfo for ModifierListInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let member = ast::MemberDecl::cast(node.clone())?;
        let list = member.modifier_list()?;
        let modifiers: Vec<SyntaxToken> = list.modifiers().collect();
        if modifiers.is_empty() || !accepts(list.syntax(), options) {
            return None;
        }
        Some(Self {
            anchor: node.clone(),
            list,
            modifiers,
        })
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// Type parameters of a generic declaration and its `where` clauses
#[derive(Debug, Clone)]
pub struct ConstraintClauseOrderInfo {
    anchor: SyntaxNode,
    type_parameters: Vec<String>,
    clauses: Vec<ast::ConstraintClause>,
}

impl ConstraintClauseOrderInfo {
    pub fn type_parameters(&self) -> &[String] {
        &self.type_parameters
    }

    /// Clauses in source order
    pub fn clauses(&self) -> &[ast::ConstraintClause] {
        &self.clauses
    }

    /// Whether the clauses follow the type parameter order
    pub fn is_ordered(&self) -> bool {
        let ranks: Vec<usize> = self.clauses.iter().map(|c| self.rank(c)).collect();
        ranks.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Clauses in type parameter order; clauses naming no known parameter
    /// go last, keeping their relative order
    pub fn sorted(&self) -> Vec<ast::ConstraintClause> {
        let mut sorted = self.clauses.clone();
        sorted.sort_by_key(|clause| self.rank(clause));
        sorted
    }

    /// Index of the first clause standing out of order
    pub fn first_out_of_order(&self) -> Option<usize> {
        let sorted = self.sorted();
        self.clauses
            .iter()
            .zip(&sorted)
            .position(|(actual, expected)| actual != expected)
    }

    fn rank(&self, clause: &ast::ConstraintClause) -> usize {
        clause
            .type_parameter_name()
            .and_then(|name| self.type_parameters.iter().position(|p| *p == name))
            .unwrap_or(usize::MAX)
    }
}

impl ShapeInfo for ConstraintClauseOrderInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let (list, clauses) = match node.kind() {
            SyntaxKind::ClassDecl => parts(&ast::ClassDecl::cast(node.clone())?),
            SyntaxKind::StructDecl => parts(&ast::StructDecl::cast(node.clone())?),
            SyntaxKind::InterfaceDecl => parts(&ast::InterfaceDecl::cast(node.clone())?),
            SyntaxKind::MethodDecl => parts(&ast::MethodDecl::cast(node.clone())?),
            _ => return None,
        };
        let list = list?;
        if clauses.is_empty() {
            return None;
        }
        let mut accepted = accepts(list.syntax(), options);
        accepted &= clauses.iter().all(|c| accepts(c.syntax(), options));
        if !accepted {
            return None;
        }
        Some(Self {
            anchor: node.clone(),
            type_parameters: list.names(),
            clauses,
        })
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

fn parts<D: HasTypeParameters>(
    declaration: &D,
) -> (Option<ast::TypeParameterList>, Vec<ast::ConstraintClause>) {
    (
        declaration.type_parameter_list(),
        declaration.constraint_clauses(),
    )
}

anchor_identity!(ModifierListInfo, ConstraintClauseOrderInfo);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::tests::node;

    #[test]
    fn modifier_tokens_in_source_order() {
        let field = node("class C { static public readonly int x; }", SyntaxKind::FieldDecl);
        let info = ModifierListInfo::of(&field).unwrap();
        let texts: Vec<&str> = info.modifiers().iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["static", "public", "readonly"]);

        let bare = node("class C { int x; }", SyntaxKind::FieldDecl);
        assert!(ModifierListInfo::of(&bare).is_none());
    }

    #[test]
    fn constraint_order() {
        let source = "class C { void M<T1, T2>() where T2 : class where T1 : struct { } }";
        let method = node(source, SyntaxKind::MethodDecl);
        let info = ConstraintClauseOrderInfo::of(&method).unwrap();
        assert_eq!(info.type_parameters(), ["T1", "T2"]);
        assert!(!info.is_ordered());
        assert_eq!(info.first_out_of_order(), Some(0));
        let names: Vec<String> = info
            .sorted()
            .iter()
            .filter_map(|c| c.type_parameter_name())
            .collect();
        assert_eq!(names, vec!["T1", "T2"]);
    }

    #[test]
    fn unknown_parameters_sort_last() {
        let source = "class C<A, B> where X : class where B : class where A : class { }";
        let class = node(source, SyntaxKind::ClassDecl);
        let info = ConstraintClauseOrderInfo::of(&class).unwrap();
        let names: Vec<String> = info
            .sorted()
            .iter()
            .filter_map(|c| c.type_parameter_name())
            .collect();
        assert_eq!(names, vec!["A", "B", "X"]);

        let ordered = node(
            "class C<A, B> where A : class where B : class { }",
            SyntaxKind::ClassDecl,
        );
        let info = ConstraintClauseOrderInfo::of(&ordered).unwrap();
        assert!(info.is_ordered());
        assert_eq!(info.first_out_of_order(), None);
    }
}
