//! Symbol definitions.
//!
//! A [`SymbolDefinition`] is what a symbol key resolves to: a shared
//! reduction function from a call site to an expression. Definitions may
//! capture registration-time data (an overload set, a constant) but carry no
//! mutable state. Two definitions are the same definition only when they
//! share one function object.

use std::fmt;
use std::rc::Rc;

use quill_core::{
    CallNode, CompilationError, DispatchKind, Expr, MethodEntry, TypeHash, TypeSystem,
    convertible_types,
};
use quill_registry::SymbolTable;

use crate::member::dispatch_member;
use crate::overload::dispatch_method;
use crate::reducer::Reducer;

/// A lexical scope of symbol definitions.
pub type Scope = SymbolTable<SymbolDefinition>;

/// The form being reduced, with its receiver already reduced.
#[derive(Debug)]
pub struct CallSite<'a> {
    /// The call node.
    pub call: &'a CallNode,
    /// The reduced receiver, if the form had one.
    pub receiver: Option<Expr>,
}

type ReduceFn = dyn Fn(&CallSite<'_>, &mut Reducer<'_>) -> Result<Expr, CompilationError>;

/// A shared reduction function.
#[derive(Clone)]
pub struct SymbolDefinition(Rc<ReduceFn>);

impl SymbolDefinition {
    /// Wrap a reduction function.
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(&CallSite<'_>, &mut Reducer<'_>) -> Result<Expr, CompilationError> + 'static,
    {
        Self(Rc::new(reduce))
    }

    /// Reduce a call site.
    pub fn reduce(
        &self,
        site: &CallSite<'_>,
        reducer: &mut Reducer<'_>,
    ) -> Result<Expr, CompilationError> {
        (self.0)(site, reducer)
    }

    /// Always reduces to `expr`.
    pub fn constant(expr: Expr) -> Self {
        Self::new(move |_, _| Ok(expr.clone()))
    }

    /// A bound parameter.
    pub fn parameter(name: impl Into<String>, ty: TypeHash) -> Self {
        Self::constant(Expr::parameter(name, ty))
    }

    /// The type `target` used as a value, typed by its static wrapper.
    pub fn type_reference(target: TypeHash) -> Self {
        Self::new(move |_, reducer| {
            let ty = reducer.types().static_wrapper(target)?;
            Ok(Expr::TypeRef { target, ty })
        })
    }

    /// A fixed overload set, dispatched against the call's arguments.
    ///
    /// A type-reference receiver selects static access.
    pub fn methods(overloads: Vec<MethodEntry>) -> Self {
        Self::new(move |site, reducer| {
            let receiver = match &site.receiver {
                Some(Expr::TypeRef { .. }) => None,
                other => other.clone(),
            };
            let args = reducer.reduce_args(site.call)?;
            let options = reducer.options().dispatch.clone();
            let arg_types = describe_args(reducer.types(), &args);
            dispatch_method(
                reducer.types(),
                receiver,
                &overloads,
                &site.call.type_args,
                args,
                site.call.span,
                &options,
            )?
            .ok_or_else(|| no_match(site.call, arg_types))
        })
    }

    /// The constructors of `target`.
    pub fn constructors(target: TypeHash) -> Self {
        Self::new(move |site, reducer| {
            let types = reducer.types();
            let overloads = types.constructors(target);
            let args = reducer.reduce_args(site.call)?;
            let options = reducer.options().dispatch.clone();
            let arg_types = describe_args(types, &args);
            dispatch_method(
                types,
                None,
                &overloads,
                &site.call.type_args,
                args,
                site.call.span,
                &options,
            )?
            .ok_or_else(|| no_match(site.call, arg_types))
        })
    }
}

impl PartialEq for SymbolDefinition {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SymbolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ptr = Rc::as_ptr(&self.0).cast::<()>();
        write!(f, "SymbolDefinition({ptr:p})")
    }
}

fn describe_args(types: &dyn TypeSystem, args: &[Expr]) -> String {
    args.iter()
        .map(|a| {
            types
                .type_name(a.ty())
                .unwrap_or_else(|| a.ty().to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn no_match(call: &CallNode, args: String) -> CompilationError {
    CompilationError::NoMatchingOverload {
        name: call.name.clone(),
        args,
        span: call.span,
    }
}

/// The stock fallback: search the receiver type's live members.
///
/// Register it under [`SymbolKey::missing`](quill_core::SymbolKey::missing).
///
/// ## Lookup
///
/// - Instance receiver: methods and members declared on any type the
///   receiver converts to (nearest first), plus extension methods
/// - Type-reference receiver: static methods and members of the referenced
///   type, and its constructors for constructor calls
/// - No receiver: extension methods called as plain functions
///
/// An empty name with arguments resolves to the default indexer. When
/// candidates exist but none applies the result is `NoMatchingOverload`;
/// when there are no candidates at all it is `UndefinedSymbol`.
pub fn member_dispatch_definition() -> SymbolDefinition {
    SymbolDefinition::new(|site, reducer| {
        let call = site.call;
        let types = reducer.types();
        let options = reducer.options().dispatch.clone();
        let args = reducer.reduce_args(call)?;

        let (receiver, owner, static_access) = match &site.receiver {
            Some(Expr::TypeRef { target, .. }) => (None, Some(*target), true),
            Some(expr) => (Some(expr.clone()), Some(expr.ty()), false),
            None => (None, None, false),
        };
        let mut search = owner
            .map(|o| convertible_types(types, o))
            .unwrap_or_default();
        // definitions carry unsubstituted members; their instances are searched instead
        search.retain(|&t| Some(t) == owner || types.generic_params(t).is_empty());

        let name = if call.name.is_empty() {
            search.iter().find_map(|&t| types.default_member(t))
        } else {
            Some(call.name.clone())
        };

        let wants = |flag: DispatchKind| call.kind.is_unknown() || call.kind.contains(flag);
        let arg_types = describe_args(types, &args);
        let mut saw_candidates = false;

        if let Some(name) = name.as_deref()
            && wants(DispatchKind::METHOD)
        {
            let mut methods: Vec<MethodEntry> = search
                .iter()
                .flat_map(|&t| types.methods(t, name))
                .collect();
            if !static_access {
                methods.extend(types.extension_methods(name));
            }
            if !methods.is_empty() {
                saw_candidates = true;
                let found = dispatch_method(
                    types,
                    receiver.clone(),
                    &methods,
                    &call.type_args,
                    args.clone(),
                    call.span,
                    &options,
                )?;
                if let Some(expr) = found {
                    return Ok(expr);
                }
            }
        }

        if let Some(target) = owner
            && static_access
            && wants(DispatchKind::CONSTRUCTOR)
        {
            let constructors = types.constructors(target);
            if !constructors.is_empty() {
                saw_candidates = true;
                let found = dispatch_method(
                    types,
                    None,
                    &constructors,
                    &call.type_args,
                    args.clone(),
                    call.span,
                    &options,
                )?;
                if let Some(expr) = found {
                    return Ok(expr);
                }
            }
        }

        if let Some(name) = name.as_deref()
            && wants(DispatchKind::MEMBER)
            && call.type_args.is_empty()
        {
            let members: Vec<_> = search
                .iter()
                .flat_map(|&t| types.members(t, name))
                .filter(|m| m.is_static() == static_access)
                .collect();
            if !members.is_empty() {
                saw_candidates = true;
                if let Some(expr) = dispatch_member(types, receiver, &members, args) {
                    return Ok(expr);
                }
            }
        }

        let name = name.unwrap_or_else(|| call.name.clone());
        if saw_candidates {
            Err(CompilationError::NoMatchingOverload {
                name,
                args: arg_types,
                span: call.span,
            })
        } else {
            tracing::debug!(%name, span = %call.span, "no live member found");
            Err(CompilationError::UndefinedSymbol {
                name,
                span: call.span,
            })
        }
    })
}
