//! Quill
//!
//! Scoped symbol resolution and overload dispatch.
//!
//! This crate re-exports the workspace crates and adds [`Context`], which
//! owns a type registry and a root scope and hands out reducers.
//!
//! ## Crates
//!
//! - [`quill_core`]: Type handles, symbol keys, expressions, errors and the compatibility oracle
//! - [`quill_registry`]: The type registry and chained symbol tables
//! - [`quill_compiler`]: Overload dispatch, generic inference and the reducer

mod context;

pub use context::{Context, ContextError};

pub use quill_compiler::{
    AmbiguityPolicy, CallSite, DispatchOptions, Reducer, ReducerOptions, RegistrationTable, Scope,
    SymbolDefinition, dispatch_member, dispatch_method, member_dispatch_definition,
};
pub use quill_core::{
    CallNode, CompilationError, DispatchKind, Expr, FieldEntry, GenericConstraints, Literal,
    MemberEntry, MethodEntry, Node, Param, PropertyEntry, QuillError, RegistrationError,
    Signature, Span, SubstitutionMap, SymbolError, SymbolKey, TypeEntry, TypeHash, TypeKind,
    TypeSystem, primitives,
};
pub use quill_registry::{SymbolTable, TypeRegistry};

pub use quill_compiler;
pub use quill_core;
pub use quill_registry;
