//! Reference semantic model
//!
//! A single-file approximation of a compiler's semantic model. It knows the
//! types declared in the document, their members and base types, the locals
//! and parameters in scope at any expression, and the built-in library slice
//! from [`super::library`]. Anything it cannot prove comes back as `None`,
//! [`TypeHandle::error`] or [`ConversionKind::Unknown`].
//!
//! Query results are memoized per node in [`DashMap`]s, so one model can be
//! shared by all analysis threads of a snapshot.

use std::collections::{HashMap, HashSet};

use dashmap::DashMap;

use super::library::{self, LinqArgument, LinqMethod, LinqReturn};
use super::oracle::{
    ConversionKind, SemanticOracle, SymbolHandle, SymbolKind, TypeHandle, TypeKind,
};
use crate::cst::ast::{
    self, AstNode, HasModifiers, HasName, HasTypeParameters, InvocationExpr, LambdaExpr,
    MemberAccessExpr, MemberDecl, NameRef,
};
use crate::cst::{SyntaxKind, SyntaxNode, SyntaxToken, TextRange};
use crate::document::Document;

type CacheKey = (TextRange, SyntaxKind);

/// Upper bound on supertype traversal; declared hierarchies may be cyclic
const MAX_SUPERTYPES: usize = 64;

#[derive(Debug, Clone)]
struct DeclaredMember {
    name: String,
    kind: SymbolKind,
    is_static: bool,
    is_extension: bool,
    parameter_types: Vec<TypeHandle>,
    /// Return type of a method, value type of a field or property
    ty: Option<TypeHandle>,
}

#[derive(Debug, Clone)]
struct DeclaredType {
    definition: String,
    kind: TypeKind,
    type_parameters: Vec<String>,
    sealed: bool,
    bases: Vec<TypeHandle>,
    members: Vec<DeclaredMember>,
}

impl DeclaredType {
    /// The open type, with its own type parameters as arguments
    fn handle(&self) -> TypeHandle {
        let args = self
            .type_parameters
            .iter()
            .map(TypeHandle::type_parameter)
            .collect();
        TypeHandle::generic(self.definition.clone(), self.kind, args)
    }
}

/// Semantic model over one document snapshot
#[derive(Debug, Default)]
pub struct SemanticModel {
    types: HashMap<String, DeclaredType>,
    type_cache: DashMap<CacheKey, Option<TypeHandle>>,
    symbol_cache: DashMap<CacheKey, Option<SymbolHandle>>,
}

impl SemanticModel {
    pub fn for_document(document: &Document) -> Self {
        Self::build(&document.syntax())
    }

    /// Collect the declared types of a tree and resolve their signatures
    pub fn build(root: &SyntaxNode) -> Self {
        let mut model = Self::default();
        let declarations: Vec<SyntaxNode> = root
            .descendants()
            .filter(|n| {
                matches!(
                    n.kind(),
                    SyntaxKind::ClassDecl | SyntaxKind::StructDecl | SyntaxKind::InterfaceDecl
                )
            })
            .collect();

        for node in &declarations {
            if let Some(header) = type_header(node) {
                model.types.insert(header.definition.clone(), header);
            }
        }

        for node in &declarations {
            let Some(definition) = type_header(node).map(|h| h.definition) else {
                continue;
            };
            let bases = model.base_types(node);
            let members = model.declared_members(node);
            if let Some(declared) = model.types.get_mut(&definition) {
                declared.bases = bases;
                declared.members = members;
            }
        }

        tracing::debug!(types = model.types.len(), "semantic model built");
        model
    }

    fn base_types(&self, declaration: &SyntaxNode) -> Vec<TypeHandle> {
        ast::child_of_kind(declaration, SyntaxKind::BaseList)
            .map(|list| {
                list.children()
                    .filter(|n| n.kind().is_type())
                    .map(|ty| self.resolve_type(&ty).unwrap_or_else(TypeHandle::error))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn declared_members(&self, declaration: &SyntaxNode) -> Vec<DeclaredMember> {
        let mut members = Vec::new();
        for member in declaration.children().filter_map(MemberDecl::cast) {
            match member {
                MemberDecl::Method(method) => {
                    let Some(name) = method.name() else { continue };
                    let parameters: Vec<ast::Parameter> = method
                        .parameter_list()
                        .map(|list| list.parameters().collect())
                        .unwrap_or_default();
                    members.push(DeclaredMember {
                        name,
                        kind: SymbolKind::Method,
                        is_static: method.has_modifier(SyntaxKind::StaticKw),
                        is_extension: parameters.first().is_some_and(|p| p.is_this()),
                        parameter_types: parameters
                            .iter()
                            .map(|p| self.resolve_optional(p.ty()))
                            .collect(),
                        ty: Some(self.resolve_optional(method.return_type())),
                    });
                }
                MemberDecl::Property(property) => {
                    let Some(name) = property.name() else { continue };
                    members.push(DeclaredMember {
                        name,
                        kind: SymbolKind::Property,
                        is_static: property.has_modifier(SyntaxKind::StaticKw),
                        is_extension: false,
                        parameter_types: Vec::new(),
                        ty: Some(self.resolve_optional(property.ty())),
                    });
                }
                MemberDecl::Field(field) => {
                    let ty = self.resolve_optional(field.variable_decl().and_then(|d| d.ty()));
                    let is_static = field.has_modifier(SyntaxKind::StaticKw)
                        || field.has_modifier(SyntaxKind::ConstKw);
                    for declarator in field.declarators() {
                        let Some(name) = ident_text(&declarator) else { continue };
                        members.push(DeclaredMember {
                            name,
                            kind: SymbolKind::Field,
                            is_static,
                            is_extension: false,
                            parameter_types: Vec::new(),
                            ty: Some(ty.clone()),
                        });
                    }
                }
                _ => {}
            }
        }
        members
    }

    fn resolve_optional(&self, ty: Option<SyntaxNode>) -> TypeHandle {
        ty.and_then(|ty| self.resolve_type(&ty))
            .unwrap_or_else(TypeHandle::error)
    }

    // ------------------------------------------------------------------
    // Type syntax
    // ------------------------------------------------------------------

    fn resolve_type_syntax(&self, ty: &SyntaxNode) -> Option<TypeHandle> {
        match ty.kind() {
            SyntaxKind::NamedType => self.resolve_named_type(ty),
            SyntaxKind::ArrayType => {
                let element = ty.children().find(|n| n.kind().is_type())?;
                Some(TypeHandle::array(self.resolve_type(&element)?))
            }
            SyntaxKind::NullableType => {
                let inner = ty.children().find(|n| n.kind().is_type())?;
                let inner = self.resolve_type(&inner)?;
                if inner.is_value_type() {
                    Some(TypeHandle::generic(
                        library::NULLABLE,
                        TypeKind::Struct,
                        vec![inner],
                    ))
                } else {
                    Some(inner)
                }
            }
            _ => None,
        }
    }

    fn resolve_named_type(&self, ty: &SyntaxNode) -> Option<TypeHandle> {
        let segments: Vec<SyntaxToken> = ty
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::Ident | SyntaxKind::VoidKw))
            .collect();
        let last = segments.last()?;
        let name = last.text();

        let args: Vec<TypeHandle> = ty
            .children()
            .filter(|n| n.kind() == SyntaxKind::TypeArgList)
            .filter(|list| list.text_range().start() > last.text_range().start())
            .last()
            .map(|list| {
                list.children()
                    .filter(|n| n.kind().is_type())
                    .map(|arg| self.resolve_type(&arg).unwrap_or_else(TypeHandle::error))
                    .collect()
            })
            .unwrap_or_default();

        if segments.len() == 1 && args.is_empty() {
            if name == "var" && !self.types.contains_key("var") {
                return None;
            }
            if let Some(predefined) = library::predefined(name) {
                return Some(predefined);
            }
            if type_parameter_in_scope(ty, name) {
                return Some(TypeHandle::type_parameter(name));
            }
        }

        let definition = definition_for(name, args.len());
        if let Some(declared) = self.types.get(&definition) {
            return Some(TypeHandle::generic(definition, declared.kind, args));
        }
        Some(library::library_type(name, args).unwrap_or_else(TypeHandle::error))
    }

    // ------------------------------------------------------------------
    // Type hierarchy
    // ------------------------------------------------------------------

    /// Every supertype of `ty`, nearest first, ending with `object`
    pub fn supertypes(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        let mut seen: HashSet<TypeHandle> = HashSet::new();
        let mut queue = vec![ty.clone()];
        let mut result = Vec::new();
        while let Some(current) = queue.pop() {
            if result.len() >= MAX_SUPERTYPES {
                break;
            }
            for direct in self.direct_supertypes(&current) {
                if direct != *ty && seen.insert(direct.clone()) {
                    result.push(direct.clone());
                    queue.insert(0, direct);
                }
            }
        }
        if !ty.is_object() && ty.kind() != TypeKind::Error {
            result.retain(|t| !t.is_object());
            result.push(TypeHandle::named(library::OBJECT, TypeKind::Class));
        }
        result
    }

    fn direct_supertypes(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        match self.types.get(ty.definition()) {
            Some(declared) => declared
                .bases
                .iter()
                .map(|base| substitute(base, &declared.type_parameters, ty.type_args()))
                .collect(),
            None => library::library_supertypes(ty),
        }
    }

    fn derives_from(&self, ty: &TypeHandle, ancestor: &TypeHandle) -> bool {
        self.supertypes(ty).contains(ancestor)
    }

    fn is_sealed(&self, ty: &TypeHandle) -> bool {
        match self.types.get(ty.definition()) {
            Some(declared) => declared.sealed,
            None => ty.is_value_type() || library::is_sealed(ty.definition()),
        }
    }

    /// Element type `T` when `ty` is or implements `IEnumerable<T>`
    pub fn enumerable_element(&self, ty: &TypeHandle) -> Option<TypeHandle> {
        if ty.definition() == library::IENUMERABLE {
            return ty.type_args().first().cloned();
        }
        self.supertypes(ty)
            .into_iter()
            .find(|t| t.definition() == library::IENUMERABLE)
            .and_then(|t| t.type_args().first().cloned())
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn compute_type(&self, expr: &SyntaxNode) -> Option<TypeHandle> {
        match expr.kind() {
            SyntaxKind::Literal => literal_type(expr),
            SyntaxKind::ParenExpr | SyntaxKind::PostfixExpr => {
                self.type_of(&expression_child(expr, 0)?)
            }
            SyntaxKind::CastExpr | SyntaxKind::AsExpr | SyntaxKind::ObjectCreationExpr => {
                let ty = expr.children().find(|n| n.kind().is_type())?;
                self.resolve_type(&ty)
            }
            SyntaxKind::IsExpr | SyntaxKind::IsPatternExpr => library::predefined("bool"),
            SyntaxKind::TypeofExpr => library::library_type("Type", Vec::new()),
            SyntaxKind::ThisExpr | SyntaxKind::BaseExpr => self.enclosing_type(expr),
            SyntaxKind::BinaryExpr => self.binary_type(expr),
            SyntaxKind::PrefixExpr => {
                let bang = expr
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .any(|t| t.kind() == SyntaxKind::Bang);
                if bang {
                    library::predefined("bool")
                } else {
                    self.type_of(&expression_child(expr, 0)?)
                }
            }
            SyntaxKind::AssignmentExpr => self.type_of(&expression_child(expr, 0)?),
            SyntaxKind::ConditionalExpr => {
                let when_true = self.type_of(&expression_child(expr, 1)?)?;
                let when_false = self.type_of(&expression_child(expr, 2)?)?;
                (when_true == when_false).then_some(when_true)
            }
            SyntaxKind::NameRef | SyntaxKind::MemberAccessExpr => {
                let symbol = self.symbol_of(expr)?;
                match symbol.kind {
                    SymbolKind::Method | SymbolKind::Type => None,
                    _ => symbol.return_type,
                }
            }
            SyntaxKind::InvocationExpr => self.symbol_of(expr)?.return_type,
            SyntaxKind::ElementAccessExpr => {
                let receiver = self.type_of(&expression_child(expr, 0)?)?;
                if let Some(element) = receiver.element_type() {
                    return Some(element.clone());
                }
                match receiver.definition() {
                    library::STRING => library::predefined("char"),
                    library::LIST => receiver.type_args().first().cloned(),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn binary_type(&self, expr: &SyntaxNode) -> Option<TypeHandle> {
        let op = ast::BinaryExpr::cast(expr.clone())?.op_kind()?;
        match op {
            SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::Lt
            | SyntaxKind::Gt
            | SyntaxKind::LtEq
            | SyntaxKind::GtEq
            | SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe => library::predefined("bool"),
            SyntaxKind::QuestionQuestion => self.type_of(&expression_child(expr, 0)?),
            _ => {
                let lhs = self.type_of(&expression_child(expr, 0)?)?;
                let rhs = self.type_of(&expression_child(expr, 1)?)?;
                if op == SyntaxKind::Plus
                    && (lhs.definition() == library::STRING || rhs.definition() == library::STRING)
                {
                    return library::predefined("string");
                }
                if lhs.definition() == library::BOOLEAN && rhs.definition() == library::BOOLEAN {
                    return library::predefined("bool");
                }
                let promoted = library::promote(lhs.definition(), rhs.definition())?;
                Some(TypeHandle::named(promoted, TypeKind::Struct))
            }
        }
    }

    fn enclosing_type(&self, node: &SyntaxNode) -> Option<TypeHandle> {
        let declaration = node.ancestors().find(|a| {
            matches!(
                a.kind(),
                SyntaxKind::ClassDecl | SyntaxKind::StructDecl | SyntaxKind::InterfaceDecl
            )
        })?;
        let header = type_header(&declaration)?;
        self.types.get(&header.definition).map(DeclaredType::handle)
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    fn compute_symbol(&self, node: &SyntaxNode) -> Option<SymbolHandle> {
        match node.kind() {
            SyntaxKind::InvocationExpr => self.invoked_method(node),
            SyntaxKind::NameRef => self.resolve_simple_name(node),
            SyntaxKind::MemberAccessExpr => self.resolve_member_access(node),
            SyntaxKind::Parameter => {
                let parameter = ast::Parameter::cast(node.clone())?;
                let mut symbol = SymbolHandle::new(parameter.name()?, SymbolKind::Parameter);
                symbol.return_type = self.parameter_type(&parameter);
                Some(symbol)
            }
            _ => None,
        }
    }

    fn resolve_simple_name(&self, name_ref: &SyntaxNode) -> Option<SymbolHandle> {
        let parent = name_ref.parent()?;
        let is_first_child = parent.first_child().as_ref() == Some(name_ref);
        match parent.kind() {
            // `receiver.Name`: the name belongs to the member access
            SyntaxKind::MemberAccessExpr if !is_first_child => return self.symbol_of(&parent),
            SyntaxKind::InvocationExpr if is_first_child => return self.invoked_method(&parent),
            _ => {}
        }

        let name = NameRef::cast(name_ref.clone())?.text()?;
        if let Some(local) = self.lookup_local(name_ref, &name) {
            return Some(local);
        }
        if let Some(owner) = self.enclosing_type(name_ref)
            && let Some(member) = self.find_member(&owner, &name, |_| true)
        {
            return Some(member);
        }
        self.type_symbol(&name)
    }

    /// A name that denotes a type, used as a static receiver
    fn type_symbol(&self, name: &str) -> Option<SymbolHandle> {
        let ty = library::predefined(name)
            .or_else(|| {
                self.types
                    .get(name)
                    .map(|declared| TypeHandle::named(declared.definition.clone(), declared.kind))
            })
            .or_else(|| library::library_type(name, Vec::new()))?;
        let mut symbol = SymbolHandle::new(name, SymbolKind::Type);
        symbol.return_type = Some(ty);
        Some(symbol)
    }

    /// Receiver type of a member access, and whether it denotes a type
    fn receiver_type(&self, receiver: &SyntaxNode) -> Option<(TypeHandle, bool)> {
        if receiver.kind() == SyntaxKind::NameRef
            && let Some(symbol) = self.symbol_of(receiver)
            && symbol.kind == SymbolKind::Type
        {
            return symbol.return_type.map(|ty| (ty, true));
        }
        self.type_of(receiver).map(|ty| (ty, false))
    }

    fn resolve_member_access(&self, access: &SyntaxNode) -> Option<SymbolHandle> {
        if let Some(parent) = access.parent()
            && parent.kind() == SyntaxKind::InvocationExpr
            && parent.first_child().as_ref() == Some(access)
        {
            return self.invoked_method(&parent);
        }
        let access = MemberAccessExpr::cast(access.clone())?;
        let name = access.name_ref()?.text()?;
        let (receiver, is_static) = self.receiver_type(&access.receiver()?)?;
        if receiver.is_error() {
            return None;
        }
        if let Some(member) = self.find_member(&receiver, &name, |m| m.is_static == is_static) {
            return Some(member);
        }
        let ty = library::library_property(&receiver, &name)?;
        let mut symbol = SymbolHandle::new(name, SymbolKind::Property);
        symbol.containing_type = Some(receiver.definition().to_string());
        symbol.return_type = Some(ty);
        Some(symbol)
    }

    fn invoked_method(&self, invocation: &SyntaxNode) -> Option<SymbolHandle> {
        let invocation = InvocationExpr::cast(invocation.clone())?;
        let arguments = invocation.arguments();
        let arity = arguments.len();
        let callee = invocation.callee()?;

        if let Some(name_ref) = NameRef::cast(callee.clone()) {
            let name = name_ref.text()?;
            let owner = self.enclosing_type(invocation.syntax())?;
            return self.find_member(&owner, &name, |m| {
                m.kind == SymbolKind::Method && m.parameter_types.len() == arity
            });
        }

        let access = MemberAccessExpr::cast(callee)?;
        let name = access.name_ref()?.text()?;
        let (receiver, is_static) = self.receiver_type(&access.receiver()?)?;
        if receiver.is_error() {
            return None;
        }

        let declared = self.find_member(&receiver, &name, |m| {
            m.kind == SymbolKind::Method
                && m.is_static == is_static
                && !m.is_extension
                && m.parameter_types.len() == arity
        });
        if declared.is_some() || is_static {
            return declared;
        }
        if let Some(extension) = self.declared_extension(&name, arity) {
            return Some(extension);
        }

        let method = library::linq_method(&name, arity)?;
        let element = self.enumerable_element(&receiver)?;
        if method.requires_ordered && !self.is_ordered(&receiver) {
            return None;
        }
        Some(self.linq_symbol(method, element, &arguments))
    }

    fn is_ordered(&self, ty: &TypeHandle) -> bool {
        ty.definition() == library::IORDERED_ENUMERABLE
            || self
                .supertypes(ty)
                .iter()
                .any(|t| t.definition() == library::IORDERED_ENUMERABLE)
    }

    /// Extension method declared in this file, invoked with instance syntax
    fn declared_extension(&self, name: &str, arity: usize) -> Option<SymbolHandle> {
        let mut definitions: Vec<&String> = self.types.keys().collect();
        definitions.sort();
        definitions.into_iter().find_map(|definition| {
            let declared = &self.types[definition];
            declared
                .members
                .iter()
                .find(|m| m.is_extension && m.name == name && m.parameter_types.len() == arity + 1)
                .map(|m| {
                    let mut symbol = member_symbol(declared, &declared.handle(), m);
                    symbol.is_extension = true;
                    symbol
                })
        })
    }

    fn linq_symbol(
        &self,
        method: &LinqMethod,
        element: TypeHandle,
        arguments: &[ast::Argument],
    ) -> SymbolHandle {
        let sequence = |definition: &str, t: TypeHandle| {
            TypeHandle::generic(definition, TypeKind::Interface, vec![t])
        };
        let func = |input: TypeHandle, output: TypeHandle| {
            TypeHandle::generic(library::FUNC2, TypeKind::Class, vec![input, output])
        };
        let boolean = || TypeHandle::named(library::BOOLEAN, TypeKind::Struct);
        let selected = || {
            arguments
                .first()
                .and_then(|a| a.expr())
                .and_then(LambdaExpr::cast)
                .and_then(|lambda| lambda.body())
                .filter(|body| body.kind().is_expression())
                .and_then(|body| self.type_of(&body))
                .unwrap_or_else(TypeHandle::error)
        };

        let source = if method.requires_ordered {
            sequence(library::IORDERED_ENUMERABLE, element.clone())
        } else {
            sequence(library::IENUMERABLE, element.clone())
        };
        let mut parameter_types = vec![source];
        match method.argument {
            LinqArgument::None => {}
            LinqArgument::Predicate => parameter_types.push(func(element.clone(), boolean())),
            LinqArgument::KeySelector | LinqArgument::Selector => {
                parameter_types.push(func(element.clone(), selected()));
            }
        }

        let return_type = match method.returns {
            LinqReturn::Boolean => boolean(),
            LinqReturn::Int32 => TypeHandle::named(library::INT32, TypeKind::Struct),
            LinqReturn::Element => element,
            LinqReturn::Sequence => sequence(library::IENUMERABLE, element),
            LinqReturn::Ordered => sequence(library::IORDERED_ENUMERABLE, element),
            LinqReturn::List => TypeHandle::generic(library::LIST, TypeKind::Class, vec![element]),
            LinqReturn::Array => TypeHandle::array(element),
            LinqReturn::Projection => sequence(library::IENUMERABLE, selected()),
        };

        let mut symbol = SymbolHandle::new(method.name, SymbolKind::Method);
        symbol.containing_type = Some(library::ENUMERABLE.to_string());
        symbol.is_static = true;
        symbol.is_extension = true;
        symbol.parameter_types = parameter_types;
        symbol.return_type = Some(return_type);
        symbol
    }

    /// Member of `ty` or one of its supertypes
    fn find_member(
        &self,
        ty: &TypeHandle,
        name: &str,
        accept: impl Fn(&DeclaredMember) -> bool,
    ) -> Option<SymbolHandle> {
        std::iter::once(ty.clone())
            .chain(self.supertypes(ty))
            .find_map(|candidate| {
                let declared = self.types.get(candidate.definition())?;
                declared
                    .members
                    .iter()
                    .find(|m| m.name == name && accept(m))
                    .map(|m| member_symbol(declared, &candidate, m))
            })
    }

    // ------------------------------------------------------------------
    // Locals and parameters
    // ------------------------------------------------------------------

    /// Local, loop variable or parameter visible at `node`
    fn lookup_local(&self, node: &SyntaxNode, name: &str) -> Option<SymbolHandle> {
        let mut child = node.clone();
        for scope in node.ancestors().skip(1) {
            let found = match scope.kind() {
                SyntaxKind::Block | SyntaxKind::SwitchSection => {
                    self.local_in_statements(&scope, &child, name)
                }
                SyntaxKind::ForStmt => ast::child_of_kind(&scope, SyntaxKind::VariableDecl)
                    .and_then(|decl| self.local_in_declaration(&decl, name)),
                SyntaxKind::ForeachStmt if child.kind().is_statement() => {
                    self.foreach_variable(&scope, name)
                }
                SyntaxKind::CatchClause => self.catch_variable(&scope, name),
                SyntaxKind::LambdaExpr => LambdaExpr::cast(scope.clone()).and_then(|lambda| {
                    let parameter = lambda
                        .parameters()
                        .into_iter()
                        .find(|p| p.name().as_deref() == Some(name))?;
                    let mut symbol = SymbolHandle::new(name, SymbolKind::Parameter);
                    symbol.return_type = self.lambda_parameter_type(&lambda, &parameter);
                    Some(symbol)
                }),
                SyntaxKind::MethodDecl | SyntaxKind::ConstructorDecl => {
                    let parameter = ast::child_of_kind(&scope, SyntaxKind::ParameterList)
                        .and_then(ast::ParameterList::cast)
                        .and_then(|list| {
                            list.parameters().find(|p| p.name().as_deref() == Some(name))
                        });
                    parameter.map(|parameter| {
                        let mut symbol = SymbolHandle::new(name, SymbolKind::Parameter);
                        symbol.return_type = self.parameter_type(&parameter);
                        symbol
                    })
                }
                SyntaxKind::ClassDecl | SyntaxKind::StructDecl | SyntaxKind::InterfaceDecl => {
                    return None;
                }
                _ => None,
            };
            if found.is_some() {
                return found;
            }
            child = scope;
        }
        None
    }

    /// Declarations among the statements of `scope` that precede `child`
    fn local_in_statements(
        &self,
        scope: &SyntaxNode,
        child: &SyntaxNode,
        name: &str,
    ) -> Option<SymbolHandle> {
        scope
            .children()
            .take_while(|statement| statement.text_range().start() < child.text_range().start())
            .filter(|statement| statement.kind() == SyntaxKind::LocalDeclStmt)
            .filter_map(|statement| ast::child_of_kind(&statement, SyntaxKind::VariableDecl))
            .find_map(|decl| self.local_in_declaration(&decl, name))
    }

    fn local_in_declaration(&self, decl: &SyntaxNode, name: &str) -> Option<SymbolHandle> {
        let decl = ast::VariableDecl::cast(decl.clone())?;
        let declarator = decl
            .declarators()
            .find(|d| ident_text(d).as_deref() == Some(name))?;
        let ty = match decl.ty() {
            Some(ty) if is_var(&ty) => declarator
                .children()
                .find(|n| n.kind() == SyntaxKind::EqualsValue)
                .and_then(|value| expression_child(&value, 0))
                .and_then(|init| self.type_of(&init)),
            Some(ty) => self.resolve_type(&ty),
            None => None,
        };
        let mut symbol = SymbolHandle::new(name, SymbolKind::Local);
        symbol.return_type = ty;
        Some(symbol)
    }

    fn foreach_variable(&self, foreach: &SyntaxNode, name: &str) -> Option<SymbolHandle> {
        let variable = ast::token_of_kind(foreach, SyntaxKind::Ident)?;
        if variable.text() != name {
            return None;
        }
        let ty = foreach.children().find(|n| n.kind().is_type())?;
        let resolved = if is_var(&ty) {
            let collection = expression_child(foreach, 0)?;
            self.type_of(&collection)
                .and_then(|c| self.enumerable_element(&c))
        } else {
            self.resolve_type(&ty)
        };
        let mut symbol = SymbolHandle::new(name, SymbolKind::Local);
        symbol.return_type = resolved;
        Some(symbol)
    }

    fn catch_variable(&self, clause: &SyntaxNode, name: &str) -> Option<SymbolHandle> {
        let variable = ast::token_of_kind(clause, SyntaxKind::Ident)?;
        if variable.text() != name {
            return None;
        }
        let ty = clause.children().find(|n| n.kind().is_type())?;
        let mut symbol = SymbolHandle::new(name, SymbolKind::Local);
        symbol.return_type = self.resolve_type(&ty);
        Some(symbol)
    }

    fn parameter_type(&self, parameter: &ast::Parameter) -> Option<TypeHandle> {
        if let Some(ty) = parameter.ty() {
            return self.resolve_type(&ty);
        }
        let lambda = parameter
            .syntax()
            .ancestors()
            .find_map(LambdaExpr::cast)?;
        self.lambda_parameter_type(&lambda, parameter)
    }

    /// Explicit type, or the element type of the LINQ receiver
    fn lambda_parameter_type(
        &self,
        lambda: &LambdaExpr,
        parameter: &ast::Parameter,
    ) -> Option<TypeHandle> {
        if let Some(ty) = parameter.ty() {
            return self.resolve_type(&ty);
        }
        if lambda.parameters().len() != 1 {
            return None;
        }
        let invocation = lambda
            .syntax()
            .parent()
            .filter(|p| p.kind() == SyntaxKind::Argument)
            .and_then(|argument| argument.parent())
            .and_then(|list| list.parent())
            .and_then(InvocationExpr::cast)?;
        let access = invocation.member_access()?;
        let name = access.name_ref()?.text()?;
        if !library::is_linq_name(&name) {
            return None;
        }
        let receiver = self.type_of(&access.receiver()?)?;
        self.enumerable_element(&receiver)
    }

    // ------------------------------------------------------------------
    // Conversions
    // ------------------------------------------------------------------

    fn conversion(&self, source: &TypeHandle, target: &TypeHandle) -> ConversionKind {
        if source.is_error() || target.is_error() {
            return ConversionKind::Unknown;
        }
        if source == target {
            return ConversionKind::Identity;
        }
        if source.kind() == TypeKind::TypeParameter || target.kind() == TypeKind::TypeParameter {
            return ConversionKind::Unknown;
        }
        if library::is_numeric(source.definition()) && library::is_numeric(target.definition()) {
            return if library::is_implicit_numeric(source.definition(), target.definition()) {
                ConversionKind::ImplicitNumeric
            } else {
                ConversionKind::ExplicitNumeric
            };
        }
        if source.is_value_type() {
            return if self.derives_from(source, target) {
                ConversionKind::Boxing
            } else {
                ConversionKind::None
            };
        }
        if target.is_value_type() {
            return if self.derives_from(target, source) {
                ConversionKind::Unboxing
            } else {
                ConversionKind::None
            };
        }
        if self.derives_from(source, target) {
            return ConversionKind::ImplicitReference;
        }
        if self.derives_from(target, source) {
            return ConversionKind::ExplicitReference;
        }
        let interface_involved =
            source.kind() == TypeKind::Interface || target.kind() == TypeKind::Interface;
        let sealed_class = (source.kind() == TypeKind::Class && self.is_sealed(source))
            || (target.kind() == TypeKind::Class && self.is_sealed(target));
        if interface_involved && !sealed_class {
            ConversionKind::ExplicitReference
        } else {
            ConversionKind::None
        }
    }
}

impl SemanticOracle for SemanticModel {
    fn type_of(&self, expr: &SyntaxNode) -> Option<TypeHandle> {
        let key = (expr.text_range(), expr.kind());
        let cached = self.type_cache.get(&key).map(|entry| entry.value().clone());
        if let Some(ty) = cached {
            return ty;
        }
        let ty = self.compute_type(expr);
        tracing::trace!(
            kind = ?expr.kind(),
            ty = ?ty.as_ref().map(|t| t.display_name()),
            "type_of"
        );
        self.type_cache.insert(key, ty.clone());
        ty
    }

    fn symbol_of(&self, node: &SyntaxNode) -> Option<SymbolHandle> {
        let key = (node.text_range(), node.kind());
        let cached = self.symbol_cache.get(&key).map(|entry| entry.value().clone());
        if let Some(symbol) = cached {
            return symbol;
        }
        let symbol = self.compute_symbol(node);
        self.symbol_cache.insert(key, symbol.clone());
        symbol
    }

    fn classify_conversion(&self, expr: &SyntaxNode, target: &TypeHandle) -> ConversionKind {
        match self.type_of(expr) {
            Some(source) => self.conversion(&source, target),
            None if is_null_literal(expr) => {
                if target.is_reference_type() || target.definition() == library::NULLABLE {
                    ConversionKind::ImplicitReference
                } else {
                    ConversionKind::None
                }
            }
            None => ConversionKind::Unknown,
        }
    }

    fn resolve_type(&self, ty: &SyntaxNode) -> Option<TypeHandle> {
        self.resolve_type_syntax(ty)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn type_header(node: &SyntaxNode) -> Option<DeclaredType> {
    let (name, type_parameters, kind, sealed) = match MemberDecl::cast(node.clone())? {
        MemberDecl::Class(class) => (
            class.name()?,
            type_parameter_names(&class),
            TypeKind::Class,
            class.has_modifier(SyntaxKind::SealedKw) || class.has_modifier(SyntaxKind::StaticKw),
        ),
        MemberDecl::Struct(strukt) => (
            strukt.name()?,
            type_parameter_names(&strukt),
            TypeKind::Struct,
            true,
        ),
        MemberDecl::Interface(interface) => (
            interface.name()?,
            type_parameter_names(&interface),
            TypeKind::Interface,
            false,
        ),
        _ => return None,
    };
    Some(DeclaredType {
        definition: definition_for(&name, type_parameters.len()),
        kind,
        type_parameters,
        sealed,
        bases: Vec::new(),
        members: Vec::new(),
    })
}

fn type_parameter_names<N: HasTypeParameters>(declaration: &N) -> Vec<String> {
    declaration
        .type_parameter_list()
        .map(|list| list.names())
        .unwrap_or_default()
}

fn definition_for(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{name}`{arity}")
    }
}

fn type_parameter_in_scope(node: &SyntaxNode, name: &str) -> bool {
    node.ancestors().any(|scope| {
        ast::child_of_kind(&scope, SyntaxKind::TypeParameterList)
            .and_then(ast::TypeParameterList::cast)
            .is_some_and(|list| list.names().iter().any(|n| n == name))
    })
}

/// Replace type parameters by the corresponding arguments
fn substitute(ty: &TypeHandle, parameters: &[String], args: &[TypeHandle]) -> TypeHandle {
    if ty.kind() == TypeKind::TypeParameter
        && let Some(index) = parameters.iter().position(|p| p == ty.definition())
        && let Some(arg) = args.get(index)
    {
        return arg.clone();
    }
    if ty.type_args().is_empty() {
        return ty.clone();
    }
    let args = ty
        .type_args()
        .iter()
        .map(|arg| substitute(arg, parameters, args))
        .collect();
    TypeHandle::generic(ty.definition(), ty.kind(), args)
}

fn member_symbol(
    owner: &DeclaredType,
    owner_ty: &TypeHandle,
    member: &DeclaredMember,
) -> SymbolHandle {
    let subst = |ty: &TypeHandle| substitute(ty, &owner.type_parameters, owner_ty.type_args());
    SymbolHandle {
        name: member.name.clone(),
        kind: member.kind,
        containing_type: Some(owner.definition.clone()),
        is_static: member.is_static,
        is_extension: false,
        parameter_types: member.parameter_types.iter().map(subst).collect(),
        return_type: member.ty.as_ref().map(subst),
    }
}

fn literal_type(literal: &SyntaxNode) -> Option<TypeHandle> {
    let token = ast::Literal::cast(literal.clone())?.token()?;
    let text = token.text().to_ascii_lowercase();
    let alias = match token.kind() {
        SyntaxKind::IntLiteral => {
            if text.ends_with("ul") || text.ends_with("lu") {
                "ulong"
            } else if text.ends_with('l') {
                "long"
            } else if text.ends_with('u') {
                "uint"
            } else {
                "int"
            }
        }
        SyntaxKind::RealLiteral => {
            if text.ends_with('f') {
                "float"
            } else if text.ends_with('m') {
                "decimal"
            } else {
                "double"
            }
        }
        SyntaxKind::StringLiteral => "string",
        SyntaxKind::CharLiteral => "char",
        SyntaxKind::TrueKw | SyntaxKind::FalseKw => "bool",
        _ => return None,
    };
    library::predefined(alias)
}

fn is_null_literal(expr: &SyntaxNode) -> bool {
    let mut current = expr.clone();
    while current.kind() == SyntaxKind::ParenExpr {
        match expression_child(&current, 0) {
            Some(inner) => current = inner,
            None => return false,
        }
    }
    ast::Literal::cast(current).is_some_and(|literal| literal.is_null())
}

fn expression_child(node: &SyntaxNode, n: usize) -> Option<SyntaxNode> {
    node.children().filter(|c| c.kind().is_expression()).nth(n)
}

fn ident_text(node: &SyntaxNode) -> Option<String> {
    ast::token_of_kind(node, SyntaxKind::Ident).map(|t| t.text().to_string())
}

fn is_var(ty: &SyntaxNode) -> bool {
    ty.kind() == SyntaxKind::NamedType && crate::cst::significant_text(ty) == "var"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_source;

    fn model_and_root(source: &str) -> (SemanticModel, SyntaxNode) {
        let root = parse_source(source).syntax();
        (SemanticModel::build(&root), root)
    }

    fn node_with_text(root: &SyntaxNode, kind: SyntaxKind, text: &str) -> SyntaxNode {
        root.descendants()
            .find(|n| n.kind() == kind && n.text() == text)
            .unwrap_or_else(|| panic!("no {kind:?} with text {text:?}"))
    }

    fn type_name(model: &SemanticModel, node: &SyntaxNode) -> Option<String> {
        model.type_of(node).map(|t| t.display_name())
    }

    #[test]
    fn literals_and_locals() {
        let source = r#"
class C {
    void M(string name) {
        var count = 3;
        long total = count;
        var text = name + count;
        Use(count, total, text, 1.5f, 'c', true);
    }
}"#;
        let (model, root) = model_and_root(source);
        let call = node_with_text(
            &root,
            SyntaxKind::ArgList,
            "(count, total, text, 1.5f, 'c', true)",
        );
        let types: Vec<Option<String>> = call
            .descendants()
            .filter(|n| matches!(n.kind(), SyntaxKind::NameRef | SyntaxKind::Literal))
            .map(|n| type_name(&model, &n))
            .collect();
        let expected = ["int", "long", "string", "float", "char", "bool"];
        assert_eq!(
            types,
            expected.iter().map(|t| Some(t.to_string())).collect::<Vec<_>>()
        );
    }

    #[test]
    fn lambda_parameter_takes_sequence_element_type() {
        let source = r#"
using System.Collections.Generic;
class Item { public bool IsValid; }
class C {
    bool M(List<Item> items) => items.Where(x => x.IsValid).Any(x => x.IsValid);
}"#;
        let (model, root) = model_and_root(source);
        let body = node_with_text(&root, SyntaxKind::MemberAccessExpr, "x.IsValid");
        assert_eq!(type_name(&model, &body).as_deref(), Some("bool"));

        let any = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::InvocationExpr)
            .find(|n| n.text().to_string().ends_with("Any(x => x.IsValid)"))
            .unwrap();
        let symbol = model.symbol_of(&any).unwrap();
        assert!(symbol.is_declared_in(library::ENUMERABLE));
        assert!(symbol.is_extension);
        assert_eq!(symbol.call_site_parameters().len(), 1);
        assert!(model.is_constructed_from(&symbol.call_site_parameters()[0], library::FUNC2));
        assert_eq!(symbol.return_type.unwrap().display_name(), "bool");

        let receiver =
            node_with_text(&root, SyntaxKind::InvocationExpr, "items.Where(x => x.IsValid)");
        assert_eq!(
            type_name(&model, &receiver).as_deref(),
            Some("IEnumerable<Item>")
        );
    }

    #[test]
    fn order_by_then_by_requires_ordered_receiver() {
        let source = r#"
class C {
    void M(List<string> names) {
        var a = names.OrderBy(n => n.Length).ThenBy(n => n);
        var b = names.ThenBy(n => n);
    }
}"#;
        let (model, root) = model_and_root(source);
        let ordered = node_with_text(
            &root,
            SyntaxKind::InvocationExpr,
            "names.OrderBy(n => n.Length).ThenBy(n => n)",
        );
        assert_eq!(
            type_name(&model, &ordered).as_deref(),
            Some("IOrderedEnumerable<string>")
        );
        let invalid = node_with_text(&root, SyntaxKind::InvocationExpr, "names.ThenBy(n => n)");
        assert!(model.symbol_of(&invalid).is_none());
    }

    #[test]
    fn conversions() {
        let source = r#"
interface IShape { }
class Shape : IShape { }
sealed class Square : Shape { }
struct Point { }
class C {
    void M(string s, object o, int i, Shape shape, Point p) { }
}"#;
        let (model, root) = model_and_root(source);
        let param = |name: &str| {
            root.descendants()
                .filter(|n| n.kind() == SyntaxKind::Parameter)
                .find(|n| n.text().to_string().ends_with(name))
                .and_then(|n| ast::Parameter::cast(n)?.ty())
                .and_then(|ty| model.resolve_type(&ty))
                .unwrap()
        };
        let string = param("s");
        let object = param("o");
        let int = param("i");
        let shape = param("shape");
        let point = param("p");
        let square = TypeHandle::named("Square", TypeKind::Class);
        let ishape = TypeHandle::named("IShape", TypeKind::Interface);
        let long = library::predefined("long").unwrap();

        assert_eq!(model.conversion(&string, &string), ConversionKind::Identity);
        assert_eq!(model.conversion(&string, &object), ConversionKind::ImplicitReference);
        assert_eq!(model.conversion(&object, &string), ConversionKind::ExplicitReference);
        assert_eq!(model.conversion(&int, &long), ConversionKind::ImplicitNumeric);
        assert_eq!(model.conversion(&long, &int), ConversionKind::ExplicitNumeric);
        assert_eq!(model.conversion(&int, &object), ConversionKind::Boxing);
        assert_eq!(model.conversion(&object, &point), ConversionKind::Unboxing);
        assert_eq!(model.conversion(&square, &ishape), ConversionKind::ImplicitReference);
        assert_eq!(model.conversion(&shape, &square), ConversionKind::ExplicitReference);
        assert_eq!(model.conversion(&string, &shape), ConversionKind::None);
        assert_eq!(
            model.conversion(&TypeHandle::error(), &string),
            ConversionKind::Unknown
        );
    }

    #[test]
    fn generic_members_are_substituted() {
        let source = r#"
class Box<T> { public T Value; public T Get() => Value; }
class C {
    void M(Box<string> box) { var v = box.Value; var g = box.Get(); }
}"#;
        let (model, root) = model_and_root(source);
        let value = node_with_text(&root, SyntaxKind::MemberAccessExpr, "box.Value");
        assert_eq!(type_name(&model, &value).as_deref(), Some("string"));
        let get = node_with_text(&root, SyntaxKind::InvocationExpr, "box.Get()");
        assert_eq!(type_name(&model, &get).as_deref(), Some("string"));
    }

    #[test]
    fn unknown_names_are_unknown() {
        let (model, root) = model_and_root("class C { void M() { var x = Missing.Call(); } }");
        let call = node_with_text(&root, SyntaxKind::InvocationExpr, "Missing.Call()");
        assert!(model.type_of(&call).is_none());
        let unknown_type = parse_source("class C { Widget w; }").syntax();
        let model = SemanticModel::build(&unknown_type);
        let ty = unknown_type
            .descendants()
            .find(|n| n.kind() == SyntaxKind::NamedType)
            .unwrap();
        assert!(model.resolve_type(&ty).unwrap().is_error());
    }

    #[test]
    fn concurrent_queries_agree() {
        let source = "class C { int M(string s) { return s.Length + 1; } }";
        let green = parse_source(source).into_green();
        let model = SemanticModel::build(&SyntaxNode::new_root(green.clone()));
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let green = green.clone();
                let model = &model;
                scope.spawn(move || {
                    let root = SyntaxNode::new_root(green);
                    let sum = root
                        .descendants()
                        .find(|n| n.kind() == SyntaxKind::BinaryExpr)
                        .unwrap();
                    assert_eq!(model.type_of(&sum).unwrap().display_name(), "int");
                });
            }
        });
    }
}
