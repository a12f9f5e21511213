//! Type compatibility oracle.
//!
//! Answers "may a value of type A stand where type B is expected?" for both
//! symbol matching and overload applicability. The oracle is a set of free
//! functions over a [`TypeSystem`]; it holds no state of its own.
//!
//! ## Algorithm
//!
//! [`convertible_types`] lists, in order and without duplicates:
//!
//! 1. The type itself
//! 2. Its ancestor chain, nearest first
//! 3. Contracts of the type and of each ancestor, each followed by the contracts it inherits
//! 4. The root object type, if the type is an interface
//! 5. For a concrete generic instance, the convertible types of its definition
//!
//! [`is_appropriate`] then checks membership in that list after normalizing
//! open generic instances (ones that mention generic parameters) to their
//! definitions.

use rustc_hash::FxHashSet;

use crate::{Expr, GenericConstraints, TypeHash, TypeSystem};

/// Ordered list of every type a value of `ty` is convertible to.
pub fn convertible_types<T: TypeSystem + ?Sized>(types: &T, ty: TypeHash) -> Vec<TypeHash> {
    let mut out = Vec::new();
    let mut seen = FxHashSet::default();
    collect_convertible(types, ty, &mut out, &mut seen);
    out
}

fn collect_convertible<T: TypeSystem + ?Sized>(
    types: &T,
    ty: TypeHash,
    out: &mut Vec<TypeHash>,
    seen: &mut FxHashSet<TypeHash>,
) {
    let chain_start = out.len();
    push_unique(out, seen, ty);

    // A malformed registry could loop; `seen` stops the walk.
    let mut current = types.base_type(ty);
    while let Some(base) = current {
        if !push_unique(out, seen, base) {
            break;
        }
        current = types.base_type(base);
    }

    let chain: Vec<TypeHash> = out[chain_start..].to_vec();
    for link in chain {
        for contract in types.interfaces(link) {
            collect_contract(types, contract, out, seen);
        }
    }

    if types.is_interface(ty) {
        push_unique(out, seen, types.object_type());
    }

    if let Some(definition) = types.generic_definition(ty)
        && !is_open_generic(types, ty)
    {
        collect_convertible(types, definition, out, seen);
    }
}

fn collect_contract<T: TypeSystem + ?Sized>(
    types: &T,
    contract: TypeHash,
    out: &mut Vec<TypeHash>,
    seen: &mut FxHashSet<TypeHash>,
) {
    if !push_unique(out, seen, contract) {
        return;
    }
    for inherited in types.interfaces(contract) {
        collect_contract(types, inherited, out, seen);
    }
}

fn push_unique(out: &mut Vec<TypeHash>, seen: &mut FxHashSet<TypeHash>, ty: TypeHash) -> bool {
    if seen.insert(ty) {
        out.push(ty);
        true
    } else {
        false
    }
}

/// How far `target` sits from `ty`; lower is more specific.
///
/// `convertible` must be `convertible_types(types, ty)`. The rank is the
/// position of `target` in it, or its length when `target` accepts `ty` only
/// through normalization of an open generic instance. `None` when a value of
/// `ty` may not stand where `target` is expected.
pub fn convertible_position<T: TypeSystem + ?Sized>(
    types: &T,
    convertible: &[TypeHash],
    ty: TypeHash,
    target: TypeHash,
) -> Option<usize> {
    if let Some(position) = convertible.iter().position(|&c| c == target) {
        return Some(position);
    }
    is_appropriate(types, target, ty).then_some(convertible.len())
}

/// Whether `ty` is a generic parameter or an instance mentioning one.
pub fn is_open_generic<T: TypeSystem + ?Sized>(types: &T, ty: TypeHash) -> bool {
    if types.is_generic_param(ty) {
        return true;
    }
    types
        .generic_args(ty)
        .into_iter()
        .any(|arg| is_open_generic(types, arg))
}

/// Map an open generic instance to its definition. Other types map to themselves.
pub fn normalize<T: TypeSystem + ?Sized>(types: &T, ty: TypeHash) -> TypeHash {
    match types.generic_definition(ty) {
        Some(definition) if is_open_generic(types, ty) => definition,
        _ => ty,
    }
}

/// Whether `arg` meets the constraints declared on generic parameter `param`.
pub fn satisfies_constraints<T: TypeSystem + ?Sized>(
    types: &T,
    param: TypeHash,
    arg: TypeHash,
) -> bool {
    let Some(info) = types.generic_param_info(param) else {
        return false;
    };

    let constraints = info.constraints;
    if constraints.contains(GenericConstraints::DEFAULT_CONSTRUCTOR)
        && !types.has_default_constructor(arg)
    {
        return false;
    }
    if constraints.contains(GenericConstraints::REFERENCE_TYPE) && types.is_value_type(arg) {
        return false;
    }
    if constraints.contains(GenericConstraints::VALUE_TYPE) && !types.is_value_type(arg) {
        return false;
    }

    info.bounds
        .iter()
        .filter(|&&bound| bound != param)
        .all(|&bound| is_appropriate(types, bound, arg))
}

/// Whether a value of type `arg` may be passed where `param` is expected.
pub fn is_appropriate<T: TypeSystem + ?Sized>(types: &T, param: TypeHash, arg: TypeHash) -> bool {
    if param == arg {
        return true;
    }
    if types.is_generic_param(param) {
        return satisfies_constraints(types, param, arg);
    }

    let target = normalize(types, param);
    convertible_types(types, arg)
        .into_iter()
        .any(|c| c == param || normalize(types, c) == target)
}

/// [`is_appropriate`] for an argument expression.
///
/// A lambda is appropriate for a delegate parameter when the arities match,
/// each lambda parameter type equals the delegate's (or the delegate's is a
/// generic parameter the lambda's satisfies), and the body's type is
/// appropriate for the delegate's return type.
pub fn is_appropriate_expr<T: TypeSystem + ?Sized>(types: &T, param: TypeHash, arg: &Expr) -> bool {
    let Expr::Lambda {
        params: lambda_params,
        body,
        ..
    } = arg
    else {
        return is_appropriate(types, param, arg.ty());
    };

    let Some(signature) = types.delegate_signature(param) else {
        return is_appropriate(types, param, arg.ty());
    };

    if signature.params.len() != lambda_params.len() {
        return false;
    }

    let params_match = signature
        .params
        .iter()
        .zip(lambda_params)
        .all(|(&expected, actual)| {
            expected == actual.data_type
                || (types.is_generic_param(expected)
                    && is_appropriate(types, expected, actual.data_type))
        });

    params_match && is_appropriate(types, signature.return_type, body.ty())
}
