//! Typed AST layer over CST
//!
//! Thin, zero-cost wrappers over [`SyntaxNode`]s. Every wrapper is a checked
//! view: `cast` succeeds only for the matching node kind, and accessors return
//! `Option` because a tree produced from malformed input can miss any child.
//!
//! Declarations expose their shared structure through capability traits
//! ([`HasModifiers`], [`HasName`], [`HasTypeParameters`], [`HasBody`]) so that
//! analyzers can be written once for every declaration that carries, say, a
//! modifier list, instead of switching on the node kind.
//!
//! # Example
//!
//! ```rust
//! use sharplint_core::cst::{parse_source, ast::{AstNode, ClassDecl, HasModifiers, HasName}};
//!
//! let parse = parse_source("public sealed class Widget { }");
//! let class = ClassDecl::cast(parse.syntax().first_child().unwrap()).unwrap();
//!
//! assert_eq!(class.name().as_deref(), Some("Widget"));
//! assert_eq!(class.modifier_texts(), vec!["public", "sealed"]);
//! ```

use super::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// First child node of a specific kind
pub(crate) fn child_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// First direct token of a specific kind
pub(crate) fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    parent.children().filter_map(N::cast)
}

/// Direct child nodes that are expressions, in order
fn expression_children(parent: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + use<> {
    parent.children().filter(|n| n.kind().is_expression())
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

// ============================================================================
// Capabilities
// ============================================================================

/// Declarations that may carry a modifier list
pub trait HasModifiers: AstNode {
    fn modifier_list(&self) -> Option<ModifierList> {
        child(self.syntax())
    }

    fn modifiers(&self) -> Vec<SyntaxToken> {
        self.modifier_list()
            .map(|list| list.modifiers().collect())
            .unwrap_or_default()
    }

    fn modifier_texts(&self) -> Vec<String> {
        self.modifiers().iter().map(|t| t.text().to_string()).collect()
    }

    fn has_modifier(&self, kind: SyntaxKind) -> bool {
        self.modifiers().iter().any(|t| t.kind() == kind)
    }
}

/// Declarations introducing a name directly (not through declarators)
pub trait HasName: AstNode {
    fn name_token(&self) -> Option<SyntaxToken> {
        token_of_kind(self.syntax(), SyntaxKind::Ident)
    }

    fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }
}

/// Generic declarations: type parameters and their `where` clauses
pub trait HasTypeParameters: AstNode {
    fn type_parameter_list(&self) -> Option<TypeParameterList> {
        child(self.syntax())
    }

    fn constraint_clauses(&self) -> Vec<ConstraintClause> {
        children(self.syntax()).collect()
    }
}

/// Declarations whose body may be a block
pub trait HasBody: AstNode {
    fn body(&self) -> Option<Block> {
        child(self.syntax())
    }

    fn arrow_clause(&self) -> Option<SyntaxNode> {
        child_of_kind(self.syntax(), SyntaxKind::ArrowClause)
    }
}

macro_rules! impl_capabilities {
    ($name:ident: $($cap:ident),*) => {
        $(impl $cap for $name {})*
    };
}

// ============================================================================
// Compilation unit and namespaces
// ============================================================================

ast_node!(
    /// Root of a parsed file
    CompilationUnit => CompilationUnit
);

impl CompilationUnit {
    pub fn usings(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::UsingDirective)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDecl> + use<> {
        children(&self.syntax)
    }

    /// Every type declaration in the file, including nested ones
    pub fn type_declarations(&self) -> impl Iterator<Item = MemberDecl> + use<> {
        self.syntax.descendants().filter_map(MemberDecl::cast).filter(|m| {
            matches!(
                m,
                MemberDecl::Class(_) | MemberDecl::Struct(_) | MemberDecl::Interface(_)
            )
        })
    }
}

ast_node!(NamespaceDecl => NamespaceDecl);

impl NamespaceDecl {
    pub fn name(&self) -> Option<String> {
        child_of_kind(&self.syntax, SyntaxKind::NamedType).map(|n| super::significant_text(&n))
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDecl> + use<> {
        children(&self.syntax)
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(
    /// `class Name<T> : Base where T : ... { members }`
    ClassDecl => ClassDecl
);
ast_node!(StructDecl => StructDecl);
ast_node!(InterfaceDecl => InterfaceDecl);
ast_node!(
    /// Method with an optional block or expression body
    MethodDecl => MethodDecl
);
ast_node!(ConstructorDecl => ConstructorDecl);
ast_node!(PropertyDecl => PropertyDecl);
ast_node!(
    /// Field declaration; names live in the declarators
    FieldDecl => FieldDecl
);

impl_capabilities!(ClassDecl: HasModifiers, HasName, HasTypeParameters);
impl_capabilities!(StructDecl: HasModifiers, HasName, HasTypeParameters);
impl_capabilities!(InterfaceDecl: HasModifiers, HasName, HasTypeParameters);
impl_capabilities!(MethodDecl: HasModifiers, HasName, HasTypeParameters, HasBody);
impl_capabilities!(ConstructorDecl: HasModifiers, HasName, HasBody);
impl_capabilities!(PropertyDecl: HasModifiers, HasName);
impl_capabilities!(FieldDecl: HasModifiers);

macro_rules! type_decl_accessors {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn keyword_token(&self) -> Option<SyntaxToken> {
                    self.syntax
                        .children_with_tokens()
                        .filter_map(|e| e.into_token())
                        .find(|t| {
                            matches!(
                                t.kind(),
                                SyntaxKind::ClassKw | SyntaxKind::StructKw | SyntaxKind::InterfaceKw
                            )
                        })
                }

                pub fn base_list(&self) -> Option<SyntaxNode> {
                    child_of_kind(&self.syntax, SyntaxKind::BaseList)
                }

                pub fn members(&self) -> impl Iterator<Item = MemberDecl> + use<> {
                    children(&self.syntax)
                }

                pub fn l_brace_token(&self) -> Option<SyntaxToken> {
                    token_of_kind(&self.syntax, SyntaxKind::LBrace)
                }

                pub fn r_brace_token(&self) -> Option<SyntaxToken> {
                    token_of_kind(&self.syntax, SyntaxKind::RBrace)
                }
            }
        )*
    };
}

type_decl_accessors!(ClassDecl, StructDecl, InterfaceDecl);

impl MethodDecl {
    pub fn return_type(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        child(&self.syntax)
    }
}

impl ConstructorDecl {
    pub fn parameter_list(&self) -> Option<ParameterList> {
        child(&self.syntax)
    }
}

impl PropertyDecl {
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }

    pub fn accessor_list(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::AccessorList)
    }
}

impl FieldDecl {
    pub fn variable_decl(&self) -> Option<VariableDecl> {
        child(&self.syntax)
    }

    pub fn declarators(&self) -> Vec<SyntaxNode> {
        self.variable_decl()
            .map(|decl| decl.declarators().collect())
            .unwrap_or_default()
    }
}

/// Any declaration that can appear in a namespace or type body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberDecl {
    Namespace(NamespaceDecl),
    Class(ClassDecl),
    Struct(StructDecl),
    Interface(InterfaceDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Property(PropertyDecl),
    Field(FieldDecl),
}

impl AstNode for MemberDecl {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::NamespaceDecl || kind.is_member_declaration()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        let member = match node.kind() {
            SyntaxKind::NamespaceDecl => Self::Namespace(NamespaceDecl { syntax: node }),
            SyntaxKind::ClassDecl => Self::Class(ClassDecl { syntax: node }),
            SyntaxKind::StructDecl => Self::Struct(StructDecl { syntax: node }),
            SyntaxKind::InterfaceDecl => Self::Interface(InterfaceDecl { syntax: node }),
            SyntaxKind::MethodDecl => Self::Method(MethodDecl { syntax: node }),
            SyntaxKind::ConstructorDecl => Self::Constructor(ConstructorDecl { syntax: node }),
            SyntaxKind::PropertyDecl => Self::Property(PropertyDecl { syntax: node }),
            SyntaxKind::FieldDecl => Self::Field(FieldDecl { syntax: node }),
            _ => return None,
        };
        Some(member)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Namespace(it) => it.syntax(),
            Self::Class(it) => it.syntax(),
            Self::Struct(it) => it.syntax(),
            Self::Interface(it) => it.syntax(),
            Self::Method(it) => it.syntax(),
            Self::Constructor(it) => it.syntax(),
            Self::Property(it) => it.syntax(),
            Self::Field(it) => it.syntax(),
        }
    }
}

impl MemberDecl {
    /// Modifier list of the member, if it has one
    pub fn modifier_list(&self) -> Option<ModifierList> {
        child(self.syntax())
    }

    /// Declared name; fields report their first declarator
    pub fn name(&self) -> Option<String> {
        match self {
            Self::Namespace(it) => it.name(),
            Self::Class(it) => it.name(),
            Self::Struct(it) => it.name(),
            Self::Interface(it) => it.name(),
            Self::Method(it) => it.name(),
            Self::Constructor(it) => it.name(),
            Self::Property(it) => it.name(),
            Self::Field(it) => it
                .declarators()
                .first()
                .and_then(|d| token_of_kind(d, SyntaxKind::Ident))
                .map(|t| t.text().to_string()),
        }
    }
}

ast_node!(
    /// Run of modifier keywords in source order
    ModifierList => ModifierList
);

impl ModifierList {
    pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind().is_modifier())
    }
}

ast_node!(TypeParameterList => TypeParameterList);

impl TypeParameterList {
    pub fn type_parameters(&self) -> impl Iterator<Item = TypeParameter> + use<> {
        children(&self.syntax)
    }

    /// Type parameter names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.type_parameters().filter_map(|p| p.name()).collect()
    }
}

ast_node!(TypeParameter => TypeParameter);

impl TypeParameter {
    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, SyntaxKind::Ident).map(|t| t.text().to_string())
    }
}

ast_node!(
    /// `where T : constraint, ...`
    ConstraintClause => ConstraintClause
);

impl ConstraintClause {
    pub fn where_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::WhereKw)
    }

    /// Name of the constrained type parameter
    pub fn type_parameter_name(&self) -> Option<String> {
        token_of_kind(&self.syntax, SyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn constraints(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::TypeConstraint)
    }
}

ast_node!(ParameterList => ParameterList);

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + use<> {
        children(&self.syntax)
    }
}

ast_node!(Parameter => Parameter);

impl Parameter {
    /// The declared name is the last identifier (a type may precede it)
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident)
            .last()
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }

    /// `this` parameter of an extension method
    pub fn is_this(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::ThisKw).is_some()
    }
}

ast_node!(VariableDecl => VariableDecl);

impl VariableDecl {
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }

    pub fn declarators(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::VariableDeclarator)
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(Block => Block);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }

    pub fn is_empty(&self) -> bool {
        self.statements().next().is_none()
    }

    pub fn l_brace_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn r_brace_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::RBrace)
            .last()
    }
}

ast_node!(
    /// `if (condition) statement [else statement]`
    IfStmt => IfStmt
);

impl IfStmt {
    pub fn if_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::IfKw)
    }

    pub fn condition(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn then_branch(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_statement())
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        child(&self.syntax)
    }

    /// The `if` heading an `else if` chain, or itself
    pub fn chain_head(&self) -> IfStmt {
        let mut head = self.clone();
        while let Some(parent) = head
            .syntax
            .parent()
            .filter(|p| p.kind() == SyntaxKind::ElseClause)
            .and_then(|clause| clause.parent())
            .and_then(IfStmt::cast)
        {
            head = parent;
        }
        head
    }
}

ast_node!(ElseClause => ElseClause);

impl ElseClause {
    pub fn else_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::ElseKw)
    }

    pub fn statement(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_statement())
    }
}

ast_node!(SwitchStmt => SwitchStmt);

impl SwitchStmt {
    pub fn sections(&self) -> impl Iterator<Item = SwitchSection> + use<> {
        children(&self.syntax)
    }
}

ast_node!(SwitchSection => SwitchSection);

impl SwitchSection {
    /// `case` and `default` labels in source order
    pub fn labels(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.syntax.children().filter(|n| {
            matches!(n.kind(), SyntaxKind::CaseLabel | SyntaxKind::DefaultLabel)
        })
    }

    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }
}

ast_node!(ExprStmt => ExprStmt);

impl ExprStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }
}

ast_node!(ReturnStmt => ReturnStmt);

impl ReturnStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(
    /// `lhs op rhs`
    BinaryExpr => BinaryExpr
);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).nth(1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_punct())
    }

    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.op_token().map(|t| t.kind())
    }
}

ast_node!(PrefixExpr => PrefixExpr);

impl PrefixExpr {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_punct())
    }

    pub fn operand(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }
}

ast_node!(ParenExpr => ParenExpr);

impl ParenExpr {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }
}

ast_node!(
    /// `expr as Type`
    AsExpr => AsExpr
);

impl AsExpr {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn as_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::AsKw)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }
}

ast_node!(
    /// `expr is Type`
    IsExpr => IsExpr
);

impl IsExpr {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }
}

ast_node!(
    /// `expr is pattern`
    IsPatternExpr => IsPatternExpr
);

impl IsPatternExpr {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn pattern(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| {
            matches!(
                n.kind(),
                SyntaxKind::ConstantPattern
                    | SyntaxKind::NotPattern
                    | SyntaxKind::DeclarationPattern
            )
        })
    }
}

ast_node!(
    /// `(Type)expr`
    CastExpr => CastExpr
);

impl CastExpr {
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }

    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn l_paren_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::LParen)
    }

    pub fn r_paren_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::RParen)
    }
}

ast_node!(
    /// `receiver.Name` or `receiver?.Name`
    MemberAccessExpr => MemberAccessExpr
);

impl MemberAccessExpr {
    pub fn receiver(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn name_ref(&self) -> Option<NameRef> {
        self.syntax.children().nth(1).and_then(NameRef::cast)
    }

    pub fn is_conditional(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::QuestionDot).is_some()
    }
}

ast_node!(
    /// `callee(args)`
    InvocationExpr => InvocationExpr
);

impl InvocationExpr {
    pub fn callee(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).next()
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.syntax)
    }

    /// Callee as `receiver.Name`, the common method-call form
    pub fn member_access(&self) -> Option<MemberAccessExpr> {
        self.callee().and_then(MemberAccessExpr::cast)
    }

    /// Name of the invoked method, `Where` in `xs.Where(...)`
    pub fn method_name(&self) -> Option<String> {
        let callee = self.callee()?;
        let name = match MemberAccessExpr::cast(callee.clone()) {
            Some(access) => access.name_ref()?,
            None => NameRef::cast(callee)?,
        };
        name.text()
    }

    pub fn arguments(&self) -> Vec<Argument> {
        self.arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList => ArgList);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Argument> + use<> {
        children(&self.syntax)
    }
}

ast_node!(Argument => Argument);

impl Argument {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expression_children(&self.syntax).last()
    }

    /// Name of a named argument (`count: 3`)
    pub fn name(&self) -> Option<String> {
        let has_colon = token_of_kind(&self.syntax, SyntaxKind::Colon).is_some();
        if !has_colon {
            return None;
        }
        token_of_kind(&self.syntax, SyntaxKind::Ident).map(|t| t.text().to_string())
    }

    /// `ref`, `out` or `in` argument
    pub fn has_modifier(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| matches!(t.text(), "ref" | "out") || t.kind() == SyntaxKind::InKw)
    }
}

ast_node!(
    /// `x => body` or `(a, b) => body`
    LambdaExpr => LambdaExpr
);

impl LambdaExpr {
    pub fn parameters(&self) -> Vec<Parameter> {
        if let Some(single) = child::<Parameter>(&self.syntax) {
            return vec![single];
        }
        child::<ParameterList>(&self.syntax)
            .map(|list| list.parameters().collect())
            .unwrap_or_default()
    }

    pub fn is_parenthesized(&self) -> bool {
        child_of_kind(&self.syntax, SyntaxKind::ParameterList).is_some()
    }

    /// Block or expression after `=>`
    pub fn body(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| !matches!(n.kind(), SyntaxKind::Parameter | SyntaxKind::ParameterList))
            .last()
    }
}

ast_node!(
    /// `new Type(args) { initializer }`
    ObjectCreationExpr => ObjectCreationExpr
);

impl ObjectCreationExpr {
    pub fn new_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::NewKw)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_type())
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::InitializerExpr)
    }
}

ast_node!(NameRef => NameRef);

impl NameRef {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn text(&self) -> Option<String> {
        self.ident_token().map(|t| t.text().to_string())
    }

    pub fn type_arg_list(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::TypeArgList)
    }
}

ast_node!(Literal => Literal);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.token().map(|t| t.kind())
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Some(SyntaxKind::NullKw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_source;

    fn first<N: AstNode>(source: &str) -> N {
        parse_source(source)
            .syntax()
            .descendants()
            .find_map(N::cast)
            .expect("node of requested kind")
    }

    #[test]
    fn class_capabilities() {
        let class: ClassDecl =
            first("internal static class Box<T> where T : class { void M() { } }");
        assert_eq!(class.name().as_deref(), Some("Box"));
        assert!(class.has_modifier(SyntaxKind::StaticKw));
        assert_eq!(class.type_parameter_list().unwrap().names(), vec!["T"]);
        assert_eq!(class.constraint_clauses().len(), 1);
        assert_eq!(
            class.constraint_clauses()[0].type_parameter_name().as_deref(),
            Some("T")
        );
        assert_eq!(class.members().count(), 1);
    }

    #[test]
    fn method_without_modifiers() {
        let method: MethodDecl = first("class C { int Run(int a, string b) => a; }");
        assert!(method.modifier_list().is_none());
        assert!(method.modifiers().is_empty());
        assert_eq!(method.name().as_deref(), Some("Run"));
        let params: Vec<_> = method
            .parameter_list()
            .unwrap()
            .parameters()
            .filter_map(|p| p.name())
            .collect();
        assert_eq!(params, vec!["a", "b"]);
        assert!(method.body().is_none());
        assert!(method.arrow_clause().is_some());
    }

    #[test]
    fn field_names_come_from_declarators() {
        let member = first::<ClassDecl>("class C { private int a = 1, b; }")
            .members()
            .next()
            .unwrap();
        let MemberDecl::Field(field) = &member else {
            panic!("expected a field, got {member:?}");
        };
        assert_eq!(field.declarators().len(), 2);
        assert_eq!(member.name().as_deref(), Some("a"));
    }

    #[test]
    fn invocation_parts() {
        let call: InvocationExpr = first("class C { void M() { items.Where(x => x.Ok); } }");
        assert_eq!(call.method_name().as_deref(), Some("Where"));
        let receiver = call.member_access().unwrap().receiver().unwrap();
        assert_eq!(receiver.text().to_string(), "items");
        let args = call.arguments();
        assert_eq!(args.len(), 1);
        let lambda = LambdaExpr::cast(args[0].expr().unwrap()).unwrap();
        assert_eq!(lambda.parameters()[0].name().as_deref(), Some("x"));
        assert_eq!(lambda.body().unwrap().text().to_string(), "x.Ok");
        assert!(!lambda.is_parenthesized());
    }

    #[test]
    fn binary_operands() {
        let binary: BinaryExpr = first("class C { bool M() { return a + b == c; } }");
        assert_eq!(binary.op_kind(), Some(SyntaxKind::EqEq));
        assert_eq!(binary.lhs().unwrap().text().to_string(), "a + b");
        assert_eq!(binary.rhs().unwrap().text().to_string(), "c");
    }

    #[test]
    fn else_if_chain_head() {
        let source = "class C { void M() { if (a) { } else if (b) { } else { } } }";
        let parse = parse_source(source);
        let ifs: Vec<IfStmt> = parse.syntax().descendants().filter_map(IfStmt::cast).collect();
        assert_eq!(ifs.len(), 2);
        assert_eq!(ifs[1].chain_head(), ifs[0]);
        assert!(ifs[0].else_clause().unwrap().statement().is_some());
    }

    #[test]
    fn switch_labels() {
        let switch: SwitchStmt =
            first("class C { void M() { switch (x) { case 1: default: break; } } }");
        let section = switch.sections().next().unwrap();
        let kinds: Vec<_> = section.labels().map(|l| l.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::CaseLabel, SyntaxKind::DefaultLabel]);
        assert_eq!(section.statements().count(), 1);
    }
}
