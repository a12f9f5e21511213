//! Overload resolution for method and constructor calls.
//!
//! This module selects the member a call binds to from a set of same-named
//! candidates and emits the typed call expression.
//!
//! ## Algorithm
//!
//! 1. Materialize candidates (extension methods take the receiver as their first argument)
//! 2. Bind explicit type arguments, dropping candidates of the wrong generic arity
//! 3. Filter by receiver presence, arity and per-argument applicability
//! 4. Infer generic arguments for unbound generic candidates and re-check applicability
//! 5. Pack variadic tails into arrays
//! 6. Rank candidates and select the best match
//! 7. Emit a `Call` or `New` expression
//!
//! A call nothing applies to yields `Ok(None)`; the caller decides how to
//! report it. Malformed candidates are `Err`.

mod ranking;
mod variadic;

pub use ranking::{find_best_match, rank_candidates};
pub use variadic::{pack_variadic, rest_element};

use quill_core::{
    CompilationError, Expr, MethodEntry, MethodKind, Span, SubstitutionMap, TypeHash, TypeSystem,
    is_appropriate_expr, satisfies_constraints,
};

use crate::config::DispatchOptions;
use crate::template::{build_substitution_map, infer_substitution, specialize_method};

/// A member under consideration for one call.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Receiver the call would bind to; `None` for static calls and extensions.
    pub receiver: Option<Expr>,
    /// The (possibly specialized) member.
    pub method: MethodEntry,
    /// Generic bindings made so far.
    pub substitution: SubstitutionMap,
    /// Arguments, with the receiver prepended for extensions.
    pub args: Vec<Expr>,
    /// Whether the member is an extension method.
    pub is_extension: bool,
}

impl Candidate {
    fn new(method: &MethodEntry, receiver: Option<&Expr>, args: &[Expr]) -> Self {
        if method.is_extension {
            let mut all = Vec::with_capacity(args.len() + 1);
            all.extend(receiver.cloned());
            all.extend_from_slice(args);
            Self {
                receiver: None,
                method: method.clone(),
                substitution: SubstitutionMap::default(),
                args: all,
                is_extension: true,
            }
        } else {
            Self {
                receiver: receiver.cloned(),
                method: method.clone(),
                substitution: SubstitutionMap::default(),
                args: args.to_vec(),
                is_extension: false,
            }
        }
    }
}

/// Resolve a call among `members` and emit the call expression.
///
/// # Arguments
///
/// * `types` - Type system for compatibility queries and instantiation
/// * `receiver` - The reduced receiver, `None` for static calls
/// * `members` - Same-named candidates in declaration order
/// * `type_args` - Explicit generic arguments (empty if none were written)
/// * `args` - Reduced arguments
/// * `span` - Source location for diagnostics
/// * `options` - Dispatch options
///
/// # Returns
///
/// * `Ok(Some(expr))` - The call bound to the best candidate
/// * `Ok(None)` - No candidate accepts the arguments
/// * `Err(CompilationError)` - Malformed candidate or rejected ambiguity
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn dispatch_method<T: TypeSystem + ?Sized>(
    types: &T,
    receiver: Option<Expr>,
    members: &[MethodEntry],
    type_args: &[TypeHash],
    args: Vec<Expr>,
    span: Span,
    options: &DispatchOptions,
) -> Result<Option<Expr>, CompilationError> {
    let mut candidates: Vec<Candidate> = members
        .iter()
        .map(|m| Candidate::new(m, receiver.as_ref(), &args))
        .collect();

    if !type_args.is_empty() {
        candidates = bind_explicit(types, candidates, type_args)?;
    }

    let mut applicable = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !is_applicable(types, &candidate)? {
            tracing::trace!(
                method = %candidate.method.name,
                hash = %candidate.method.func_hash,
                "not applicable"
            );
            continue;
        }
        if !candidate.method.is_unbound_generic() {
            applicable.push(candidate);
            continue;
        }
        if let Some(inferred) = bind_inferred(types, candidate)? {
            applicable.push(inferred);
        }
    }

    for candidate in applicable.iter_mut().filter(|c| c.method.is_variadic) {
        let args = std::mem::take(&mut candidate.args);
        candidate.args = pack_variadic(types, &candidate.method, args)?;
    }

    let Some(best) = find_best_match(types, applicable, span, options)? else {
        return Ok(None);
    };
    Ok(Some(emit(types, best)))
}

/// Keep candidates whose generic arity matches and specialize them.
fn bind_explicit<T: TypeSystem + ?Sized>(
    types: &T,
    candidates: Vec<Candidate>,
    type_args: &[TypeHash],
) -> Result<Vec<Candidate>, CompilationError> {
    let mut bound = Vec::with_capacity(candidates.len());
    for mut candidate in candidates {
        let params = &candidate.method.generic_params;
        if params.len() != type_args.len() {
            continue;
        }
        if params
            .iter()
            .zip(type_args)
            .any(|(&param, &arg)| !satisfies_constraints(types, param, arg))
        {
            tracing::trace!(
                method = %candidate.method.name,
                "explicit type arguments violate constraints"
            );
            continue;
        }
        let map = build_substitution_map(&candidate.method.name, params, type_args)?;
        candidate.method = specialize_method(types, &candidate.method, &map)?;
        candidate.substitution = map;
        bound.push(candidate);
    }
    Ok(bound)
}

/// Infer, specialize and re-check an unbound generic candidate.
fn bind_inferred<T: TypeSystem + ?Sized>(
    types: &T,
    mut candidate: Candidate,
) -> Result<Option<Candidate>, CompilationError> {
    let Some(map) = infer_substitution(types, &candidate.method, &candidate.args) else {
        return Ok(None);
    };
    candidate.method = specialize_method(types, &candidate.method, &map)?;
    candidate.substitution = map;
    if is_applicable(types, &candidate)? {
        Ok(Some(candidate))
    } else {
        tracing::trace!(method = %candidate.method.name, "specialization no longer applicable");
        Ok(None)
    }
}

/// Whether the candidate accepts its receiver and arguments.
fn is_applicable<T: TypeSystem + ?Sized>(
    types: &T,
    candidate: &Candidate,
) -> Result<bool, CompilationError> {
    let method = &candidate.method;
    let receiver_ok = match method.kind {
        MethodKind::Instance => candidate.receiver.is_some(),
        MethodKind::Static | MethodKind::Constructor => candidate.receiver.is_none(),
    };
    if !receiver_ok {
        return Ok(false);
    }

    let args = &candidate.args;
    if method.params.is_empty() && args.is_empty() && !method.is_variadic {
        return Ok(true);
    }

    if !method.is_variadic {
        return Ok(method.params.len() == args.len()
            && method
                .params
                .iter()
                .zip(args)
                .all(|(p, a)| is_appropriate_expr(types, p.data_type, a)));
    }

    let (_, element) = rest_element(types, method)?;
    let fixed = method.params.len() - 1;
    if args.len() < fixed {
        return Ok(false);
    }
    let (prefix, tail) = args.split_at(fixed);
    Ok(method.params[..fixed]
        .iter()
        .zip(prefix)
        .all(|(p, a)| is_appropriate_expr(types, p.data_type, a))
        && tail.iter().all(|a| is_appropriate_expr(types, element, a)))
}

/// Give a lambda argument the delegate type of its parameter.
pub(crate) fn coerce_arg<T: TypeSystem + ?Sized>(types: &T, arg: Expr, param: TypeHash) -> Expr {
    if arg.is_lambda() && types.delegate_signature(param).is_some() {
        arg.bind_lambda(param)
    } else {
        arg
    }
}

fn emit<T: TypeSystem + ?Sized>(types: &T, candidate: Candidate) -> Expr {
    let Candidate {
        receiver,
        method,
        args,
        ..
    } = candidate;

    let args: Vec<Expr> = args
        .into_iter()
        .zip(&method.params)
        .map(|(arg, param)| coerce_arg(types, arg, param.data_type))
        .collect();
    let ty = method.return_type;

    if method.is_constructor() {
        Expr::New {
            constructor: method,
            args,
            ty,
        }
    } else {
        Expr::Call {
            receiver: receiver.map(Box::new),
            method,
            args,
            ty,
        }
    }
}
