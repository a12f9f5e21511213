//! Quill Core
//!
//! The shared data model of the Quill symbol resolver.
//!
//! ## Modules
//!
//! - [`type_hash`]: Deterministic type identity ([`TypeHash`]) and built-in handles
//! - [`dispatch`]: Dispatch kinds and symbol keys
//! - [`types`]: Type and member descriptors
//! - [`type_system`]: The [`TypeSystem`] trait the algorithms query
//! - [`compat`]: The type compatibility oracle
//! - [`subst`]: Generic parameter substitution
//! - [`expr`]: Reduced, typed expressions
//! - [`syntax`]: Dispatch-style syntax nodes
//! - [`error`]: Error types

pub mod compat;
pub mod dispatch;
pub mod error;
pub mod expr;
mod span;
pub mod subst;
pub mod syntax;
pub mod type_hash;
pub mod type_system;
pub mod types;

#[cfg(test)]
mod test_support;

pub use compat::{
    convertible_position, convertible_types, is_appropriate, is_appropriate_expr,
    is_open_generic, normalize, satisfies_constraints,
};
pub use dispatch::{DispatchKind, MISSING_NAME, SymbolKey};
pub use error::{CompilationError, QuillError, RegistrationError, Result, SymbolError};
pub use expr::{Expr, Literal};
pub use span::Span;
pub use subst::{
    SubstitutionMap, substitute_member, substitute_method, substitute_params, substitute_signature,
    substitute_type,
};
pub use syntax::{CallNode, Node};
pub use type_hash::{TypeHash, hash_constants, primitives};
pub use type_system::TypeSystem;
pub use types::{
    FieldEntry, GenericConstraints, GenericParamInfo, MemberEntry, MethodEntry, MethodKind, Param,
    PropertyEntry, Signature, TypeEntry, TypeKind,
};
