//! Implicit generic argument inference.
//!
//! ## Algorithm
//!
//! 1. Pair each declared parameter type with its argument; for a variadic
//!    method, trailing arguments pair with the rest parameter's element type
//! 2. Walk each pair structurally:
//!    - a generic parameter binds to the argument type
//!    - an open generic instance (`List<T>`) finds the one concrete
//!      instance of the same definition among the argument's convertible
//!      types and pairs their generic arguments
//!    - a delegate parameter paired with a lambda pairs the delegate's
//!      parameter types with the lambda's and its return type with the body's
//! 3. Keep pairs keyed by the method's own generic parameters, deduplicated
//! 4. Reject the candidate if a parameter is bound twice to different types,
//!    left unbound, or bound to a type violating its constraints

use quill_core::{
    Expr, MethodEntry, SubstitutionMap, TypeHash, TypeSystem, convertible_types, is_open_generic,
    satisfies_constraints,
};

/// Infer the generic arguments of `method` from call arguments.
///
/// Returns `None` when inference cannot produce a complete, consistent binding.
pub fn infer_substitution<T: TypeSystem + ?Sized>(
    types: &T,
    method: &MethodEntry,
    args: &[Expr],
) -> Option<SubstitutionMap> {
    let mut pairs = Vec::new();
    let params = method.param_types();

    if method.is_variadic {
        let (&rest, fixed) = params.split_last()?;
        let element = types.element_type(rest)?;
        let (fixed_args, trailing) = args.split_at_checked(fixed.len())?;
        for (&param, arg) in fixed.iter().zip(fixed_args) {
            pair_expr(types, param, arg, &mut pairs);
        }
        for arg in trailing {
            pair_expr(types, element, arg, &mut pairs);
        }
    } else {
        for (&param, arg) in params.iter().zip(args) {
            pair_expr(types, param, arg, &mut pairs);
        }
    }

    pairs.retain(|(param, _)| method.generic_params.contains(param));
    pairs.dedup();

    let mut map = SubstitutionMap::default();
    for (param, bound) in pairs {
        match map.get(&param) {
            Some(&existing) if existing != bound => {
                tracing::trace!(
                    method = %method.name,
                    %param,
                    %existing,
                    %bound,
                    "conflicting inference"
                );
                return None;
            }
            Some(_) => {}
            None => {
                map.insert(param, bound);
            }
        }
    }

    for &param in &method.generic_params {
        match map.get(&param) {
            None => {
                tracing::trace!(method = %method.name, %param, "generic parameter not inferred");
                return None;
            }
            Some(&bound) if !satisfies_constraints(types, param, bound) => {
                tracing::trace!(
                    method = %method.name,
                    %param,
                    %bound,
                    "inferred type violates constraints"
                );
                return None;
            }
            Some(_) => {}
        }
    }

    Some(map)
}

fn pair_expr<T: TypeSystem + ?Sized>(
    types: &T,
    param: TypeHash,
    arg: &Expr,
    pairs: &mut Vec<(TypeHash, TypeHash)>,
) {
    if let Expr::Lambda {
        params: lambda_params,
        body,
        ..
    } = arg
        && let Some(signature) = types.delegate_signature(param)
    {
        for (&expected, actual) in signature.params.iter().zip(lambda_params) {
            pair_types(types, expected, actual.data_type, pairs);
        }
        pair_types(types, signature.return_type, body.ty(), pairs);
        return;
    }
    pair_types(types, param, arg.ty(), pairs);
}

fn pair_types<T: TypeSystem + ?Sized>(
    types: &T,
    param: TypeHash,
    arg: TypeHash,
    pairs: &mut Vec<(TypeHash, TypeHash)>,
) {
    if types.is_generic_param(param) {
        pairs.push((param, arg));
        return;
    }
    if !is_open_generic(types, param) {
        return;
    }
    let Some(definition) = types.generic_definition(param) else {
        return;
    };

    let mut matches = convertible_types(types, arg)
        .into_iter()
        .filter(|&c| !is_open_generic(types, c))
        .filter(|&c| types.generic_definition(c) == Some(definition));
    let (Some(concrete), None) = (matches.next(), matches.next()) else {
        return;
    };

    for (p, a) in types
        .generic_args(param)
        .into_iter()
        .zip(types.generic_args(concrete))
    {
        pair_types(types, p, a, pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{GenericConstraints, Param, Signature, TypeEntry, primitives};
    use quill_registry::TypeRegistry;

    fn fns() -> TypeHash {
        TypeHash::from_name("Fns")
    }

    #[test]
    fn infers_identity() {
        let mut types = TypeRegistry::with_builtins();
        let t = types
            .register_generic_param("id", "T", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let id = MethodEntry::static_fn(fns(), "id", vec![Param::new("x", t)], t)
            .with_generic_params(vec![t]);

        let map = infer_substitution(&types, &id, &[Expr::string("s")]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&t], primitives::STRING);
    }

    #[test]
    fn conflicting_bindings_fail() {
        let mut types = TypeRegistry::with_builtins();
        let t = types
            .register_generic_param("same", "T", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let same = MethodEntry::static_fn(
            fns(),
            "same",
            vec![Param::new("a", t), Param::new("b", t)],
            primitives::BOOL,
        )
        .with_generic_params(vec![t]);

        assert!(infer_substitution(&types, &same, &[Expr::int(1), Expr::int(2)]).is_some());
        assert!(infer_substitution(&types, &same, &[Expr::int(1), Expr::string("x")]).is_none());
    }

    #[test]
    fn unbound_parameter_fails() {
        let mut types = TypeRegistry::with_builtins();
        let t = types
            .register_generic_param("make", "T", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let make = MethodEntry::static_fn(fns(), "make", vec![], t).with_generic_params(vec![t]);
        assert!(infer_substitution(&types, &make, &[]).is_none());
    }

    #[test]
    fn infers_through_instances_and_bases() {
        let mut types = TypeRegistry::with_builtins();
        let t = types
            .register_generic_param("List", "T", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let list = types
            .register(TypeEntry::class("List").with_generic_params(vec![t]))
            .unwrap();
        let list_int = types.instantiate(list, &[primitives::INT]).unwrap();
        let numbers = types
            .register(TypeEntry::class("Numbers").with_base(list_int))
            .unwrap();

        let u = types
            .register_generic_param("first", "U", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let list_u = types.instantiate(list, &[u]).unwrap();
        let first = MethodEntry::static_fn(fns(), "first", vec![Param::new("xs", list_u)], u)
            .with_generic_params(vec![u]);

        let arg = Expr::parameter("xs", numbers);
        let map = infer_substitution(&types, &first, &[arg]).unwrap();
        assert_eq!(map[&u], primitives::INT);
    }

    #[test]
    fn infers_from_lambda_body() {
        let mut types = TypeRegistry::with_builtins();
        let a = types
            .register_generic_param("Func", "A", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let r = types
            .register_generic_param("Func", "R", 1, GenericConstraints::empty(), vec![])
            .unwrap();
        let signature = Signature::new(vec![a], r);
        let func = types
            .register(TypeEntry::delegate("Func", signature).with_generic_params(vec![a, r]))
            .unwrap();

        let x = types
            .register_generic_param("apply", "X", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let y = types
            .register_generic_param("apply", "Y", 1, GenericConstraints::empty(), vec![])
            .unwrap();
        let func_xy = types.instantiate(func, &[x, y]).unwrap();
        let apply = MethodEntry::static_fn(
            fns(),
            "apply",
            vec![Param::new("value", x), Param::new("f", func_xy)],
            y,
        )
        .with_generic_params(vec![x, y]);

        let lambda = Expr::lambda(vec![Param::new("n", primitives::INT)], Expr::string("n"));
        let map = infer_substitution(&types, &apply, &[Expr::int(3), lambda]).unwrap();
        assert_eq!(map[&x], primitives::INT);
        assert_eq!(map[&y], primitives::STRING);
    }

    #[test]
    fn variadic_tail_pairs_with_element() {
        let mut types = TypeRegistry::with_builtins();
        let t = types
            .register_generic_param("all", "T", 0, GenericConstraints::empty(), vec![])
            .unwrap();
        let rest = types.array_of(t).unwrap();
        let all = MethodEntry::static_fn(fns(), "all", vec![Param::new("items", rest)], rest)
            .with_generic_params(vec![t])
            .as_variadic();

        let map = infer_substitution(&types, &all, &[Expr::int(1), Expr::int(2)]).unwrap();
        assert_eq!(map[&t], primitives::INT);
        assert!(infer_substitution(&types, &all, &[Expr::int(1), Expr::float(2.0)]).is_none());
    }

    #[test]
    fn constraint_violation_fails() {
        let mut types = TypeRegistry::with_builtins();
        let t = types
            .register_generic_param("boxed", "T", 0, GenericConstraints::REFERENCE_TYPE, vec![])
            .unwrap();
        let boxed = MethodEntry::static_fn(fns(), "boxed", vec![Param::new("x", t)], t)
            .with_generic_params(vec![t]);
        assert!(infer_substitution(&types, &boxed, &[Expr::int(1)]).is_none());
    }
}
