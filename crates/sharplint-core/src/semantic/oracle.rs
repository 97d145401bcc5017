//! Semantic oracle interface
//!
//! Everything the rules know about types and symbols comes through
//! [`SemanticOracle`]. Queries are pure with respect to one snapshot and may
//! run concurrently; `None` and [`ConversionKind::Unknown`] are ordinary
//! answers meaning "cannot tell", and callers abstain on them.

use std::fmt;

use crate::cst::SyntaxNode;

use super::library;

/// Broad classification of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Array,
    TypeParameter,
    /// The type could not be determined
    Error,
}

/// A resolved type, possibly constructed from a generic definition
///
/// `definition` is the metadata name of the type definition, such as
/// `System.String` or ``System.Collections.Generic.List`1``; arrays use
/// `[]` with the element as their single type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    definition: String,
    type_args: Vec<TypeHandle>,
    kind: TypeKind,
}

impl TypeHandle {
    pub fn named(definition: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            definition: definition.into(),
            type_args: Vec::new(),
            kind,
        }
    }

    pub fn generic(
        definition: impl Into<String>,
        kind: TypeKind,
        type_args: Vec<TypeHandle>,
    ) -> Self {
        Self {
            definition: definition.into(),
            type_args,
            kind,
        }
    }

    pub fn array(element: TypeHandle) -> Self {
        Self {
            definition: "[]".to_string(),
            type_args: vec![element],
            kind: TypeKind::Array,
        }
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        Self::named(name, TypeKind::TypeParameter)
    }

    pub fn error() -> Self {
        Self::named("?", TypeKind::Error)
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn type_args(&self) -> &[TypeHandle] {
        &self.type_args
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// True when this type or any of its arguments is unresolved
    pub fn is_error(&self) -> bool {
        self.kind == TypeKind::Error || self.type_args.iter().any(TypeHandle::is_error)
    }

    pub fn is_value_type(&self) -> bool {
        self.kind == TypeKind::Struct
    }

    pub fn is_reference_type(&self) -> bool {
        matches!(self.kind, TypeKind::Class | TypeKind::Interface | TypeKind::Array)
    }

    pub fn is_object(&self) -> bool {
        self.definition == library::OBJECT
    }

    /// Element type of an array
    pub fn element_type(&self) -> Option<&TypeHandle> {
        match self.kind {
            TypeKind::Array => self.type_args.first(),
            _ => None,
        }
    }

    /// Short display form: `string`, `List<int>`, `int[]`
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(element) = self.element_type() {
            return write!(f, "{element}[]");
        }
        if let Some(alias) = library::keyword_alias(&self.definition) {
            return f.write_str(alias);
        }
        let simple = self
            .definition
            .rsplit('.')
            .next()
            .unwrap_or(&self.definition);
        let simple = simple.split('`').next().unwrap_or(simple);
        f.write_str(simple)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Method,
    Property,
    Field,
    Local,
    Parameter,
    Type,
}

/// A resolved symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolHandle {
    pub name: String,
    pub kind: SymbolKind,
    /// Definition name of the declaring type, if any
    pub containing_type: Option<String>,
    pub is_static: bool,
    /// Extension method invoked with reduced (instance) syntax
    pub is_extension: bool,
    /// Parameter types; for extension methods the `this` parameter comes first
    pub parameter_types: Vec<TypeHandle>,
    /// Return type for methods, value type for everything else
    pub return_type: Option<TypeHandle>,
}

impl SymbolHandle {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            containing_type: None,
            is_static: false,
            is_extension: false,
            parameter_types: Vec::new(),
            return_type: None,
        }
    }

    pub fn is_method(&self) -> bool {
        self.kind == SymbolKind::Method
    }

    /// Parameters as written at the call site (without the `this` parameter)
    pub fn call_site_parameters(&self) -> &[TypeHandle] {
        if self.is_extension {
            self.parameter_types.get(1..).unwrap_or_default()
        } else {
            &self.parameter_types
        }
    }

    /// Check if this is a method declared on the given type definition
    pub fn is_declared_in(&self, definition: &str) -> bool {
        self.containing_type.as_deref() == Some(definition)
    }
}

/// How an expression converts to a target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    Identity,
    ImplicitReference,
    ExplicitReference,
    Boxing,
    Unboxing,
    ImplicitNumeric,
    ExplicitNumeric,
    /// No conversion exists
    None,
    /// The oracle cannot tell
    Unknown,
}

impl ConversionKind {
    pub fn is_identity(self) -> bool {
        self == Self::Identity
    }

    pub fn is_implicit(self) -> bool {
        matches!(
            self,
            Self::Identity | Self::ImplicitReference | Self::Boxing | Self::ImplicitNumeric
        )
    }
}

/// Read-only type and symbol queries against one snapshot
pub trait SemanticOracle: Send + Sync {
    /// Type of an expression node
    fn type_of(&self, expr: &SyntaxNode) -> Option<TypeHandle>;

    /// Symbol a node refers to (invocations, names, member accesses)
    fn symbol_of(&self, node: &SyntaxNode) -> Option<SymbolHandle>;

    /// Conversion from the expression's type to `target`
    fn classify_conversion(&self, expr: &SyntaxNode, target: &TypeHandle) -> ConversionKind;

    /// Type denoted by a type syntax node
    fn resolve_type(&self, ty: &SyntaxNode) -> Option<TypeHandle>;

    /// Check if `ty` is constructed from the open generic `open_generic`
    fn is_constructed_from(&self, ty: &TypeHandle, open_generic: &str) -> bool {
        ty.definition() == open_generic
    }
}

/// Oracle that knows nothing; every semantic rule abstains under it
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSemantics;

impl SemanticOracle for NoSemantics {
    fn type_of(&self, _expr: &SyntaxNode) -> Option<TypeHandle> {
        None
    }

    fn symbol_of(&self, _node: &SyntaxNode) -> Option<SymbolHandle> {
        None
    }

    fn classify_conversion(&self, _expr: &SyntaxNode, _target: &TypeHandle) -> ConversionKind {
        ConversionKind::Unknown
    }

    fn resolve_type(&self, _ty: &SyntaxNode) -> Option<TypeHandle> {
        None
    }
}
