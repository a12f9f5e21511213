//! Quill Registry
//!
//! Storage for the resolver: the [`TypeRegistry`] that answers
//! [`TypeSystem`](quill_core::TypeSystem) queries, and the lexically chained
//! [`SymbolTable`] that maps symbol keys to definitions.
//!
//! # Example
//!
//! ```
//! use quill_core::{DispatchKind, SymbolKey, TypeEntry};
//! use quill_registry::{SymbolTable, TypeRegistry};
//!
//! let mut types = TypeRegistry::with_builtins();
//! let widget = types.register(TypeEntry::class("Widget")).unwrap();
//!
//! let root = SymbolTable::root();
//! root.add(SymbolKey::member_of(DispatchKind::METHOD, widget, "draw"), 1).unwrap();
//! root.freeze();
//!
//! let query = SymbolKey::member_of(DispatchKind::METHOD, widget, "draw");
//! assert_eq!(root.resolve_match(&query, &types).map(|(_, v)| v), Some(1));
//! ```

mod symbol_table;
mod type_registry;

pub use symbol_table::SymbolTable;
pub use type_registry::TypeRegistry;
