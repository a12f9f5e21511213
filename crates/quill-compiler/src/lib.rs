//! Quill Compiler
//!
//! Overload dispatch and expression reduction on top of the
//! [`quill_registry`] symbol table and type registry.
//!
//! ## Modules
//!
//! - [`overload`]: Method and constructor overload resolution
//! - [`template`]: Generic argument binding and inference
//! - [`member`]: Field and property access
//! - [`definition`]: Symbol definitions and the live-member fallback
//! - [`reducer`]: Syntax-to-expression reduction over a scope chain
//! - [`bootstrap`]: Root scope construction
//! - [`config`]: Dispatch and reducer options
//!
//! # Example
//!
//! ```
//! use quill_compiler::{Reducer, RegistrationTable};
//! use quill_core::{CallNode, Literal, MethodEntry, Node, Param, Span, TypeEntry, primitives};
//! use quill_registry::TypeRegistry;
//!
//! let mut types = TypeRegistry::with_builtins();
//! let math = types.register(TypeEntry::class("Math")).unwrap();
//! let abs = MethodEntry::static_fn(
//!     math,
//!     "abs",
//!     vec![Param::new("x", primitives::INT)],
//!     primitives::INT,
//! );
//!
//! let root = RegistrationTable::new()
//!     .with_function("abs", vec![abs])
//!     .install_root()
//!     .unwrap();
//!
//! let mut reducer = Reducer::new(&types, root);
//! let arg = Node::literal(Literal::Int(-3), Span::default());
//! let call = CallNode::method("abs", vec![arg], Span::default());
//! let expr = reducer.reduce_call(&call).unwrap();
//! assert_eq!(expr.ty(), primitives::INT);
//! ```

pub mod bootstrap;
pub mod config;
pub mod definition;
pub mod member;
pub mod overload;
pub mod reducer;
pub mod template;

pub use bootstrap::RegistrationTable;
pub use config::{AmbiguityPolicy, DEFAULT_MAX_SCOPE_DEPTH, DispatchOptions, ReducerOptions};
pub use definition::{CallSite, Scope, SymbolDefinition, member_dispatch_definition};
pub use member::dispatch_member;
pub use overload::{Candidate, dispatch_method, find_best_match, pack_variadic, rank_candidates};
pub use reducer::Reducer;
pub use template::{build_substitution_map, infer_substitution, specialize_method};
