//! Semantic queries
//!
//! [`SemanticOracle`] is the boundary between the rules and whatever answers
//! type and symbol questions. [`SemanticModel`] is the in-crate reference
//! implementation used by the tests and by hosts without a compiler.

pub mod library;
mod model;
mod oracle;

pub use model::SemanticModel;
pub use oracle::{
    ConversionKind, NoSemantics, SemanticOracle, SymbolHandle, SymbolKind, TypeHandle, TypeKind,
};
