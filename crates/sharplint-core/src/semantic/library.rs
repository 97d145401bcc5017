//! Built-in library knowledge for the reference model
//!
//! A deliberately small slice of the base class library: the predefined
//! aliases, the numeric conversion table, the generic collection types and
//! the `System.Linq.Enumerable` extension methods the rules care about.

use super::oracle::{TypeHandle, TypeKind};

pub const OBJECT: &str = "System.Object";
pub const STRING: &str = "System.String";
pub const BOOLEAN: &str = "System.Boolean";
pub const INT32: &str = "System.Int32";
pub const VOID: &str = "System.Void";
pub const VALUE_TYPE: &str = "System.ValueType";
pub const NULLABLE: &str = "System.Nullable`1";
pub const ENUMERABLE: &str = "System.Linq.Enumerable";
pub const IENUMERABLE: &str = "System.Collections.Generic.IEnumerable`1";
pub const IORDERED_ENUMERABLE: &str = "System.Linq.IOrderedEnumerable`1";
pub const LIST: &str = "System.Collections.Generic.List`1";
pub const FUNC2: &str = "System.Func`2";

/// Predefined keyword types and the runtime types they alias
const ALIASES: &[(&str, &str, TypeKind)] = &[
    ("object", OBJECT, TypeKind::Class),
    ("dynamic", OBJECT, TypeKind::Class),
    ("string", STRING, TypeKind::Class),
    ("bool", BOOLEAN, TypeKind::Struct),
    ("char", "System.Char", TypeKind::Struct),
    ("sbyte", "System.SByte", TypeKind::Struct),
    ("byte", "System.Byte", TypeKind::Struct),
    ("short", "System.Int16", TypeKind::Struct),
    ("ushort", "System.UInt16", TypeKind::Struct),
    ("int", INT32, TypeKind::Struct),
    ("uint", "System.UInt32", TypeKind::Struct),
    ("long", "System.Int64", TypeKind::Struct),
    ("ulong", "System.UInt64", TypeKind::Struct),
    ("nint", "System.IntPtr", TypeKind::Struct),
    ("nuint", "System.UIntPtr", TypeKind::Struct),
    ("float", "System.Single", TypeKind::Struct),
    ("double", "System.Double", TypeKind::Struct),
    ("decimal", "System.Decimal", TypeKind::Struct),
    ("void", VOID, TypeKind::Struct),
];

/// Runtime type for a predefined keyword type
pub fn predefined(alias: &str) -> Option<TypeHandle> {
    ALIASES
        .iter()
        .find(|(name, _, _)| *name == alias)
        .map(|(_, definition, kind)| TypeHandle::named(*definition, *kind))
}

/// Keyword spelling of a runtime type, used for display
pub fn keyword_alias(definition: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .filter(|(name, _, _)| *name != "dynamic")
        .find(|(_, def, _)| *def == definition)
        .map(|(name, _, _)| *name)
}

/// A generic or non-generic library type known by its simple name
struct LibraryType {
    name: &'static str,
    definition: &'static str,
    arity: usize,
    kind: TypeKind,
    /// Generic interfaces implemented, all taking the type's first argument
    interfaces: &'static [&'static str],
    sealed: bool,
}

const LIBRARY_TYPES: &[LibraryType] = &[
    LibraryType {
        name: "Object",
        definition: OBJECT,
        arity: 0,
        kind: TypeKind::Class,
        interfaces: &[],
        sealed: false,
    },
    LibraryType {
        name: "String",
        definition: STRING,
        arity: 0,
        kind: TypeKind::Class,
        interfaces: &[],
        sealed: true,
    },
    LibraryType {
        name: "Type",
        definition: "System.Type",
        arity: 0,
        kind: TypeKind::Class,
        interfaces: &[],
        sealed: false,
    },
    LibraryType {
        name: "Exception",
        definition: "System.Exception",
        arity: 0,
        kind: TypeKind::Class,
        interfaces: &[],
        sealed: false,
    },
    LibraryType {
        name: "IEnumerable",
        definition: IENUMERABLE,
        arity: 1,
        kind: TypeKind::Interface,
        interfaces: &[],
        sealed: false,
    },
    LibraryType {
        name: "IOrderedEnumerable",
        definition: IORDERED_ENUMERABLE,
        arity: 1,
        kind: TypeKind::Interface,
        interfaces: &[IENUMERABLE],
        sealed: false,
    },
    LibraryType {
        name: "ICollection",
        definition: "System.Collections.Generic.ICollection`1",
        arity: 1,
        kind: TypeKind::Interface,
        interfaces: &[IENUMERABLE],
        sealed: false,
    },
    LibraryType {
        name: "IList",
        definition: "System.Collections.Generic.IList`1",
        arity: 1,
        kind: TypeKind::Interface,
        interfaces: &["System.Collections.Generic.ICollection`1", IENUMERABLE],
        sealed: false,
    },
    LibraryType {
        name: "IReadOnlyList",
        definition: "System.Collections.Generic.IReadOnlyList`1",
        arity: 1,
        kind: TypeKind::Interface,
        interfaces: &[IENUMERABLE],
        sealed: false,
    },
    LibraryType {
        name: "List",
        definition: LIST,
        arity: 1,
        kind: TypeKind::Class,
        interfaces: &[
            "System.Collections.Generic.IList`1",
            "System.Collections.Generic.ICollection`1",
            "System.Collections.Generic.IReadOnlyList`1",
            IENUMERABLE,
        ],
        sealed: false,
    },
    LibraryType {
        name: "HashSet",
        definition: "System.Collections.Generic.HashSet`1",
        arity: 1,
        kind: TypeKind::Class,
        interfaces: &["System.Collections.Generic.ICollection`1", IENUMERABLE],
        sealed: false,
    },
    LibraryType {
        name: "Func",
        definition: FUNC2,
        arity: 2,
        kind: TypeKind::Class,
        interfaces: &[],
        sealed: true,
    },
    LibraryType {
        name: "Nullable",
        definition: NULLABLE,
        arity: 1,
        kind: TypeKind::Struct,
        interfaces: &[],
        sealed: true,
    },
];

/// Library type for a simple name and arity, e.g. `List` with one argument
pub fn library_type(name: &str, args: Vec<TypeHandle>) -> Option<TypeHandle> {
    LIBRARY_TYPES
        .iter()
        .find(|t| t.name == name && t.arity == args.len())
        .map(|t| TypeHandle::generic(t.definition, t.kind, args))
}

/// Check if a library type cannot be derived from
pub fn is_sealed(definition: &str) -> bool {
    LIBRARY_TYPES
        .iter()
        .find(|t| t.definition == definition)
        .is_some_and(|t| t.sealed)
        || is_numeric(definition)
        || definition == BOOLEAN
}

/// Library supertypes of a constructed library type, excluding `object`
pub fn library_supertypes(ty: &TypeHandle) -> Vec<TypeHandle> {
    if ty.kind() == TypeKind::Array {
        let element = ty.type_args().to_vec();
        return [
            "System.Collections.Generic.IList`1",
            "System.Collections.Generic.ICollection`1",
            "System.Collections.Generic.IReadOnlyList`1",
            IENUMERABLE,
        ]
        .iter()
        .map(|definition| TypeHandle::generic(*definition, TypeKind::Interface, element.clone()))
        .collect();
    }
    if ty.definition() == STRING {
        let char_type = TypeHandle::named("System.Char", TypeKind::Struct);
        return vec![TypeHandle::generic(IENUMERABLE, TypeKind::Interface, vec![char_type])];
    }
    if ty.kind() == TypeKind::Struct {
        return vec![TypeHandle::named(VALUE_TYPE, TypeKind::Class)];
    }
    let Some(library) = LIBRARY_TYPES.iter().find(|t| t.definition == ty.definition()) else {
        return Vec::new();
    };
    let first_arg: Vec<TypeHandle> = ty.type_args().iter().take(1).cloned().collect();
    library
        .interfaces
        .iter()
        .map(|definition| TypeHandle::generic(*definition, TypeKind::Interface, first_arg.clone()))
        .collect()
}

/// Instance properties of library types: `Length`, `Count`
pub fn library_property(ty: &TypeHandle, name: &str) -> Option<TypeHandle> {
    let int32 = || TypeHandle::named(INT32, TypeKind::Struct);
    match (ty.kind(), ty.definition(), name) {
        (TypeKind::Array, _, "Length") => Some(int32()),
        (_, STRING, "Length") => Some(int32()),
        (_, LIST, "Count") => Some(int32()),
        (_, "System.Collections.Generic.HashSet`1", "Count") => Some(int32()),
        (_, "System.Collections.Generic.ICollection`1", "Count") => Some(int32()),
        _ => None,
    }
}

// ============================================================================
// Numeric conversions
// ============================================================================

const NUMERIC: &[&str] = &[
    "System.SByte",
    "System.Byte",
    "System.Int16",
    "System.UInt16",
    "System.Int32",
    "System.UInt32",
    "System.Int64",
    "System.UInt64",
    "System.Char",
    "System.Single",
    "System.Double",
    "System.Decimal",
];

pub fn is_numeric(definition: &str) -> bool {
    NUMERIC.contains(&definition)
}

/// Implicit numeric conversions, source → targets
const IMPLICIT_NUMERIC: &[(&str, &[&str])] = &[
    (
        "System.SByte",
        &[
            "System.Int16",
            "System.Int32",
            "System.Int64",
            "System.Single",
            "System.Double",
            "System.Decimal",
        ],
    ),
    (
        "System.Byte",
        &[
            "System.Int16",
            "System.UInt16",
            "System.Int32",
            "System.UInt32",
            "System.Int64",
            "System.UInt64",
            "System.Single",
            "System.Double",
            "System.Decimal",
        ],
    ),
    (
        "System.Int16",
        &["System.Int32", "System.Int64", "System.Single", "System.Double", "System.Decimal"],
    ),
    (
        "System.UInt16",
        &[
            "System.Int32",
            "System.UInt32",
            "System.Int64",
            "System.UInt64",
            "System.Single",
            "System.Double",
            "System.Decimal",
        ],
    ),
    (
        "System.Int32",
        &["System.Int64", "System.Single", "System.Double", "System.Decimal"],
    ),
    (
        "System.UInt32",
        &["System.Int64", "System.UInt64", "System.Single", "System.Double", "System.Decimal"],
    ),
    ("System.Int64", &["System.Single", "System.Double", "System.Decimal"]),
    ("System.UInt64", &["System.Single", "System.Double", "System.Decimal"]),
    (
        "System.Char",
        &[
            "System.UInt16",
            "System.Int32",
            "System.UInt32",
            "System.Int64",
            "System.UInt64",
            "System.Single",
            "System.Double",
            "System.Decimal",
        ],
    ),
    ("System.Single", &["System.Double"]),
];

pub fn is_implicit_numeric(from: &str, to: &str) -> bool {
    IMPLICIT_NUMERIC
        .iter()
        .find(|(source, _)| *source == from)
        .is_some_and(|(_, targets)| targets.contains(&to))
}

/// Result type of binary numeric promotion
pub fn promote(lhs: &str, rhs: &str) -> Option<&'static str> {
    if !is_numeric(lhs) || !is_numeric(rhs) {
        return None;
    }
    const LADDER: &[&str] = &[
        "System.Int32",
        "System.UInt32",
        "System.Int64",
        "System.UInt64",
        "System.Single",
        "System.Double",
        "System.Decimal",
    ];
    let rank = |definition: &str| {
        LADDER
            .iter()
            .position(|d| *d == definition)
            .unwrap_or(0)
    };
    Some(LADDER[rank(lhs).max(rank(rhs))])
}

// ============================================================================
// System.Linq.Enumerable
// ============================================================================

/// What a LINQ method returns, in terms of the source element type `T`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinqReturn {
    Boolean,
    Int32,
    Element,
    Sequence,
    Ordered,
    List,
    Array,
    /// `IEnumerable<R>` where `R` is the selector's result
    Projection,
}

/// The second parameter of a LINQ method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinqArgument {
    None,
    /// `Func<T, bool>`
    Predicate,
    /// `Func<T, TKey>`
    KeySelector,
    /// `Func<T, TResult>`
    Selector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinqMethod {
    pub name: &'static str,
    pub argument: LinqArgument,
    pub returns: LinqReturn,
    /// Receiver must already be ordered (`ThenBy`)
    pub requires_ordered: bool,
}

const fn linq(
    name: &'static str,
    argument: LinqArgument,
    returns: LinqReturn,
) -> LinqMethod {
    LinqMethod {
        name,
        argument,
        returns,
        requires_ordered: false,
    }
}

const LINQ_METHODS: &[LinqMethod] = &[
    linq("Where", LinqArgument::Predicate, LinqReturn::Sequence),
    linq("Any", LinqArgument::None, LinqReturn::Boolean),
    linq("Any", LinqArgument::Predicate, LinqReturn::Boolean),
    linq("All", LinqArgument::Predicate, LinqReturn::Boolean),
    linq("Count", LinqArgument::None, LinqReturn::Int32),
    linq("Count", LinqArgument::Predicate, LinqReturn::Int32),
    linq("First", LinqArgument::None, LinqReturn::Element),
    linq("First", LinqArgument::Predicate, LinqReturn::Element),
    linq("FirstOrDefault", LinqArgument::None, LinqReturn::Element),
    linq("FirstOrDefault", LinqArgument::Predicate, LinqReturn::Element),
    linq("Last", LinqArgument::None, LinqReturn::Element),
    linq("Last", LinqArgument::Predicate, LinqReturn::Element),
    linq("LastOrDefault", LinqArgument::None, LinqReturn::Element),
    linq("LastOrDefault", LinqArgument::Predicate, LinqReturn::Element),
    linq("Single", LinqArgument::None, LinqReturn::Element),
    linq("Single", LinqArgument::Predicate, LinqReturn::Element),
    linq("SingleOrDefault", LinqArgument::None, LinqReturn::Element),
    linq("SingleOrDefault", LinqArgument::Predicate, LinqReturn::Element),
    linq("OrderBy", LinqArgument::KeySelector, LinqReturn::Ordered),
    linq("OrderByDescending", LinqArgument::KeySelector, LinqReturn::Ordered),
    LinqMethod {
        name: "ThenBy",
        argument: LinqArgument::KeySelector,
        returns: LinqReturn::Ordered,
        requires_ordered: true,
    },
    LinqMethod {
        name: "ThenByDescending",
        argument: LinqArgument::KeySelector,
        returns: LinqReturn::Ordered,
        requires_ordered: true,
    },
    linq("Select", LinqArgument::Selector, LinqReturn::Projection),
    linq("ToList", LinqArgument::None, LinqReturn::List),
    linq("ToArray", LinqArgument::None, LinqReturn::Array),
];

/// LINQ overload for a method name and argument count
pub fn linq_method(name: &str, argument_count: usize) -> Option<&'static LinqMethod> {
    LINQ_METHODS.iter().find(|m| {
        m.name == name
            && match m.argument {
                LinqArgument::None => argument_count == 0,
                _ => argument_count == 1,
            }
    })
}

/// Check if any LINQ overload has this name
pub fn is_linq_name(name: &str) -> bool {
    LINQ_METHODS.iter().any(|m| m.name == name)
}
