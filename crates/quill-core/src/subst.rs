//! Generic parameter substitution.
//!
//! A [`SubstitutionMap`] maps generic parameter handles to concrete types.
//! Substitution walks into generic instance arguments and asks the type
//! system for the rewritten instance, so `List<T>` under `{T -> int}` becomes
//! the memoized `List<int>` handle.

use rustc_hash::FxHashMap;

use crate::{MemberEntry, MethodEntry, Param, RegistrationError, Signature, TypeHash, TypeSystem};

/// Generic parameter → bound type.
pub type SubstitutionMap = FxHashMap<TypeHash, TypeHash>;

/// Rewrite `ty` under `map`.
pub fn substitute_type<T: TypeSystem + ?Sized>(
    types: &T,
    ty: TypeHash,
    map: &SubstitutionMap,
) -> Result<TypeHash, RegistrationError> {
    if let Some(&bound) = map.get(&ty) {
        return Ok(bound);
    }

    if let Some(target) = types.static_target(ty) {
        let rewritten = substitute_type(types, target, map)?;
        return if rewritten == target {
            Ok(ty)
        } else {
            types.static_wrapper(rewritten)
        };
    }

    let Some(definition) = types.generic_definition(ty) else {
        return Ok(ty);
    };
    let args = types.generic_args(ty);
    let rewritten = args
        .iter()
        .map(|&arg| substitute_type(types, arg, map))
        .collect::<Result<Vec<_>, _>>()?;

    if rewritten == args {
        Ok(ty)
    } else {
        types.instantiate(definition, &rewritten)
    }
}

/// Rewrite the types of a parameter list.
pub fn substitute_params<T: TypeSystem + ?Sized>(
    types: &T,
    params: &[Param],
    map: &SubstitutionMap,
) -> Result<Vec<Param>, RegistrationError> {
    params
        .iter()
        .map(|p| Ok(Param::new(p.name.clone(), substitute_type(types, p.data_type, map)?)))
        .collect()
}

/// Rewrite a delegate signature.
pub fn substitute_signature<T: TypeSystem + ?Sized>(
    types: &T,
    signature: &Signature,
    map: &SubstitutionMap,
) -> Result<Signature, RegistrationError> {
    let params = signature
        .params
        .iter()
        .map(|&p| substitute_type(types, p, map))
        .collect::<Result<Vec<_>, _>>()?;
    let return_type = substitute_type(types, signature.return_type, map)?;
    Ok(Signature::new(params, return_type))
}

/// Rewrite a method's parameter and return types. Identity and generic shape are kept.
pub fn substitute_method<T: TypeSystem + ?Sized>(
    types: &T,
    method: &MethodEntry,
    map: &SubstitutionMap,
) -> Result<MethodEntry, RegistrationError> {
    let mut out = method.clone();
    out.params = substitute_params(types, &method.params, map)?;
    out.return_type = substitute_type(types, method.return_type, map)?;
    Ok(out)
}

/// Rewrite a field or property type (and indexer parameters).
pub fn substitute_member<T: TypeSystem + ?Sized>(
    types: &T,
    member: &MemberEntry,
    map: &SubstitutionMap,
) -> Result<MemberEntry, RegistrationError> {
    let mut out = member.clone();
    match &mut out {
        MemberEntry::Field(field) => {
            field.data_type = substitute_type(types, field.data_type, map)?;
        }
        MemberEntry::Property(property) => {
            property.data_type = substitute_type(types, property.data_type, map)?;
            property.index_params = substitute_params(types, &property.index_params, map)?;
        }
    }
    Ok(out)
}
