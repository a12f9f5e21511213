//! Binding generic method parameters.

use quill_core::{
    CompilationError, MethodEntry, RegistrationError, SubstitutionMap, TypeHash, TypeSystem,
    substitute_method,
};

/// Build a substitution map from generic parameters and explicit arguments.
///
/// # Errors
/// Returns an error if the number of arguments doesn't match the parameters.
pub fn build_substitution_map(
    name: &str,
    generic_params: &[TypeHash],
    type_args: &[TypeHash],
) -> Result<SubstitutionMap, CompilationError> {
    if generic_params.len() != type_args.len() {
        return Err(RegistrationError::GenericArgCountMismatch {
            name: name.to_string(),
            expected: generic_params.len(),
            got: type_args.len(),
        }
        .into());
    }

    Ok(generic_params
        .iter()
        .copied()
        .zip(type_args.iter().copied())
        .collect())
}

/// Produce the concrete version of a generic method under `map`.
///
/// Parameter and return types are rewritten, `generic_args` is filled in
/// declaration order and the method hash is derived from the unbound hash
/// and the arguments, so each specialization has its own identity.
pub fn specialize_method<T: TypeSystem + ?Sized>(
    types: &T,
    method: &MethodEntry,
    map: &SubstitutionMap,
) -> Result<MethodEntry, CompilationError> {
    let generic_args = method
        .generic_params
        .iter()
        .map(|param| map.get(param).copied().ok_or_else(|| unbound(method)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut specialized = substitute_method(types, method, map)?;
    specialized.func_hash = TypeHash::from_generic_instance(method.func_hash, &generic_args);
    specialized.generic_args = generic_args;
    Ok(specialized)
}

fn unbound(method: &MethodEntry) -> CompilationError {
    CompilationError::internal(format!(
        "generic parameter of '{}' left unbound during specialization",
        method.name
    ))
}
