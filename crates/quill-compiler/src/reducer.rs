//! Expression reducer.
//!
//! The [`Reducer`] turns syntax nodes into typed expressions by resolving
//! each form against the current scope chain.
//!
//! ## Algorithm
//!
//! For a call node:
//!
//! 1. Reduce the receiver (once)
//! 2. Build a key from the call's dispatch kind, the receiver's type and the name
//! 3. Ask the scope chain for the most specific matching definition
//! 4. On a miss, use the definition registered under the missing key
//! 5. With neither, report `UndefinedSymbol` at the call's span
//!
//! Bare identifiers are member reads without a receiver. Lambdas reduce their
//! body in a child scope that binds their parameters.

use std::rc::Rc;

use quill_core::{
    CallNode, CompilationError, DispatchKind, Expr, Node, Span, SymbolKey, TypeSystem,
};

use crate::config::ReducerOptions;
use crate::definition::{CallSite, Scope, SymbolDefinition};

/// Reduces syntax nodes against a scope chain.
pub struct Reducer<'t> {
    types: &'t dyn TypeSystem,
    scope: Rc<Scope>,
    options: ReducerOptions,
}

impl<'t> Reducer<'t> {
    /// Create a reducer whose current scope is `scope`.
    pub fn new(types: &'t dyn TypeSystem, scope: Rc<Scope>) -> Self {
        Self {
            types,
            scope,
            options: ReducerOptions::default(),
        }
    }

    /// Set the options.
    pub fn with_options(mut self, options: ReducerOptions) -> Self {
        self.options = options;
        self
    }

    /// The type system.
    pub fn types(&self) -> &'t dyn TypeSystem {
        self.types
    }

    /// The innermost scope.
    pub fn scope(&self) -> &Rc<Scope> {
        &self.scope
    }

    /// The options.
    pub fn options(&self) -> &ReducerOptions {
        &self.options
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    fn check_depth(&self, span: Span) -> Result<(), CompilationError> {
        let limit = self.options.max_scope_depth;
        if self.scope.depth() + 1 > limit {
            return Err(CompilationError::ScopeTooDeep { limit, span });
        }
        Ok(())
    }

    /// Enter an empty child scope.
    pub fn push_scope(&mut self, span: Span) -> Result<(), CompilationError> {
        self.check_depth(span)?;
        self.scope = Scope::child(&self.scope);
        tracing::debug!(depth = self.scope.depth(), "entered scope");
        Ok(())
    }

    /// Enter a child scope holding `entries`.
    ///
    /// Entries the enclosing chain already resolves to the same definition
    /// are not copied.
    pub fn push_scope_with(
        &mut self,
        entries: impl IntoIterator<Item = (SymbolKey, SymbolDefinition)>,
        span: Span,
    ) -> Result<(), CompilationError> {
        self.check_depth(span)?;
        self.scope = Scope::child_with_entries(&self.scope, entries)?;
        tracing::debug!(
            depth = self.scope.depth(),
            local = self.scope.count(),
            "entered scope"
        );
        Ok(())
    }

    /// Leave the innermost scope.
    pub fn pop_scope(&mut self) -> Result<(), CompilationError> {
        let parent = self
            .scope
            .parent()
            .cloned()
            .ok_or_else(|| CompilationError::internal("cannot leave the root scope"))?;
        self.scope = parent;
        tracing::debug!(depth = self.scope.depth(), "left scope");
        Ok(())
    }

    /// Run `f` in a fresh child scope, leaving it afterwards even on error.
    pub fn scoped<R>(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> Result<R, CompilationError>,
    ) -> Result<R, CompilationError> {
        self.push_scope(span)?;
        let result = f(self);
        self.pop_scope()?;
        result
    }

    /// Bind a definition in the innermost scope.
    pub fn define(
        &self,
        key: SymbolKey,
        definition: SymbolDefinition,
    ) -> Result<(), CompilationError> {
        self.scope.add(key, definition)?;
        Ok(())
    }

    // ========================================================================
    // Reduction
    // ========================================================================

    /// Reduce a node.
    pub fn reduce(&mut self, node: &Node) -> Result<Expr, CompilationError> {
        match node {
            Node::Literal { value, .. } => Ok(Expr::literal(value.clone())),
            Node::Symbol { name, span } => {
                self.reduce_call(&CallNode::member(name.clone(), *span))
            }
            Node::Call(call) => self.reduce_call(call),
            Node::Lambda { params, body, span } => self.scoped(*span, |reducer| {
                for param in params {
                    reducer.define(
                        SymbolKey::global(DispatchKind::MEMBER, param.name.clone()),
                        SymbolDefinition::parameter(param.name.clone(), param.data_type),
                    )?;
                }
                let body = reducer.reduce(body)?;
                Ok(Expr::lambda(params.clone(), body))
            }),
        }
    }

    /// Reduce several nodes in order.
    pub fn reduce_all(&mut self, nodes: &[Node]) -> Result<Vec<Expr>, CompilationError> {
        nodes.iter().map(|node| self.reduce(node)).collect()
    }

    /// Reduce a call's arguments.
    pub fn reduce_args(&mut self, call: &CallNode) -> Result<Vec<Expr>, CompilationError> {
        self.reduce_all(&call.args)
    }

    /// Resolve and reduce a call node.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn reduce_call(&mut self, call: &CallNode) -> Result<Expr, CompilationError> {
        let receiver = match &call.receiver {
            Some(node) => Some(self.reduce(node)?),
            None => None,
        };
        let receiver_type = receiver.as_ref().map(Expr::ty);
        let key = SymbolKey::new(call.kind, receiver_type, call.name.clone());

        let definition = match self.scope.resolve_match(&key, self.types) {
            Some((matched, definition)) => {
                tracing::trace!(%key, %matched, "resolved symbol");
                definition
            }
            None => match self.scope.try_resolve(&SymbolKey::missing()) {
                Some(fallback) => {
                    tracing::debug!(
                        %key,
                        span = %call.span,
                        "no symbol matched; using fallback"
                    );
                    fallback
                }
                None => {
                    return Err(CompilationError::UndefinedSymbol {
                        name: call.name.clone(),
                        span: call.span,
                    });
                }
            },
        };

        let site = CallSite { call, receiver };
        definition.reduce(&site, self)
    }
}
