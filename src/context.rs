//! Compilation context.
//!
//! A `Context` owns the type registry and the root registrations, and hands
//! out reducers once it is sealed.
//!
//! # Example
//!
//! ```
//! use quill::{CallNode, Context, MethodEntry, Node, Span, TypeEntry};
//!
//! let mut ctx = Context::new();
//! let point = ctx.register_type(TypeEntry::class("Point")).unwrap();
//! ctx.register_function(
//!     "origin",
//!     vec![MethodEntry::static_fn(point, "origin", vec![], point)],
//! )
//! .unwrap();
//! ctx.seal().unwrap();
//!
//! let call = CallNode::method("origin", vec![], Span::default());
//! let expr = ctx.compile(&Node::Call(call)).unwrap();
//! assert_eq!(expr.ty(), point);
//! ```

use std::rc::Rc;

use thiserror::Error;

use quill_compiler::{Reducer, ReducerOptions, RegistrationTable, Scope, SymbolDefinition};
use quill_core::{
    CompilationError, Expr, MethodEntry, Node, RegistrationError, SymbolError, SymbolKey,
    TypeEntry, TypeHash,
};
use quill_registry::TypeRegistry;

/// Owns the types and root symbols programs are compiled against.
///
/// Registration happens before [`seal`](Context::seal); reduction after.
pub struct Context {
    types: TypeRegistry,
    /// Pending registrations (consumed on seal)
    table: Option<RegistrationTable>,
    /// Frozen root scope (available after seal)
    root: Option<Rc<Scope>>,
    options: ReducerOptions,
}

impl Context {
    /// Create a context with the built-in types and the live-member fallback.
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::with_builtins(),
            table: Some(RegistrationTable::new().with_member_dispatch()),
            root: None,
            options: ReducerOptions::default(),
        }
    }

    /// Set the options reducers are created with.
    pub fn with_options(mut self, options: ReducerOptions) -> Self {
        self.options = options;
        self
    }

    /// The type registry.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    fn pending(&mut self) -> Result<&mut RegistrationTable, ContextError> {
        self.table.as_mut().ok_or(ContextError::AlreadySealed)
    }

    /// Register a type and bind its name as a value and as a constructor.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::AlreadySealed` after sealing, or the registry's
    /// error when the type is rejected.
    pub fn register_type(&mut self, entry: TypeEntry) -> Result<TypeHash, ContextError> {
        if self.root.is_some() {
            return Err(ContextError::AlreadySealed);
        }
        let name = entry.name.clone();
        let hash = self.types.register(entry)?;
        let table = std::mem::take(self.pending()?);
        self.table = Some(table.with_type(name, hash));
        Ok(hash)
    }

    /// Register an extension method, callable on any matching receiver.
    pub fn register_extension(&mut self, method: MethodEntry) -> Result<(), ContextError> {
        if self.root.is_some() {
            return Err(ContextError::AlreadySealed);
        }
        self.types.register_extension(method);
        Ok(())
    }

    /// Register a free function overload set under `name`.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        overloads: Vec<MethodEntry>,
    ) -> Result<(), ContextError> {
        let table = std::mem::take(self.pending()?);
        self.table = Some(table.with_function(name, overloads));
        Ok(())
    }

    /// Register an arbitrary definition.
    pub fn register(
        &mut self,
        key: SymbolKey,
        definition: SymbolDefinition,
    ) -> Result<(), ContextError> {
        self.pending()?.register(key, definition);
        Ok(())
    }

    /// Install the registrations into a frozen root scope.
    ///
    /// Sealing twice is a no-op.
    pub fn seal(&mut self) -> Result<(), ContextError> {
        let Some(table) = self.table.take() else {
            return Ok(());
        };
        let root = table.install_root()?;
        tracing::debug!(symbols = root.count(), types = self.types.len(), "context sealed");
        self.root = Some(root);
        Ok(())
    }

    /// Check if the context has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.root.is_some()
    }

    /// The root scope (available after sealing).
    pub fn root(&self) -> Option<&Rc<Scope>> {
        self.root.as_ref()
    }

    /// Create a reducer over the root scope.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::NotSealed` if the context has not been sealed.
    pub fn reducer(&self) -> Result<Reducer<'_>, ContextError> {
        let root = self.root.as_ref().ok_or(ContextError::NotSealed)?;
        Ok(Reducer::new(&self.types, Rc::clone(root)).with_options(self.options.clone()))
    }

    /// Reduce a single node with a fresh reducer.
    pub fn compile(&self, node: &Node) -> Result<Expr, ContextError> {
        Ok(self.reducer()?.reduce(node)?)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during context operations.
#[derive(Debug, Error)]
pub enum ContextError {
    /// Context is already sealed - cannot register more symbols
    #[error("context is already sealed - cannot register after seal()")]
    AlreadySealed,

    /// Context is not sealed - must call seal() before reducing
    #[error("context is not sealed - call seal() before reducer()")]
    NotSealed,

    /// A type was rejected by the registry
    #[error("failed to register type: {0}")]
    Registration(#[from] RegistrationError),

    /// The root registrations conflict
    #[error("failed to install root scope: {0}")]
    Symbol(#[from] SymbolError),

    /// Reduction failed
    #[error(transparent)]
    Compilation(#[from] CompilationError),
}
