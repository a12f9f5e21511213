//! Packing variadic arguments.

use quill_core::{CompilationError, Expr, MethodEntry, TypeHash, TypeSystem};

/// Element type of a variadic method's rest parameter.
///
/// # Errors
/// A variadic method with no parameters, or whose last parameter is not an
/// array, is malformed.
pub fn rest_element<T: TypeSystem + ?Sized>(
    types: &T,
    method: &MethodEntry,
) -> Result<(TypeHash, TypeHash), CompilationError> {
    let Some(rest) = method.params.last() else {
        return Err(CompilationError::internal(format!(
            "variadic '{}' declares no parameters",
            method.name
        )));
    };
    let element = types.element_type(rest.data_type).ok_or_else(|| {
        CompilationError::internal(format!(
            "variadic '{}' has a non-array rest parameter '{}'",
            method.name, rest.name
        ))
    })?;
    Ok((rest.data_type, element))
}

/// Collapse the trailing arguments into one array argument.
///
/// Each trailing argument is converted to the element type when its type
/// differs. The array is typed by the rest parameter.
pub fn pack_variadic<T: TypeSystem + ?Sized>(
    types: &T,
    method: &MethodEntry,
    mut args: Vec<Expr>,
) -> Result<Vec<Expr>, CompilationError> {
    let (array, element) = rest_element(types, method)?;
    let fixed = method.params.len() - 1;
    if args.len() < fixed {
        return Err(CompilationError::internal(format!(
            "variadic '{}' packed with {} argument(s), needs at least {fixed}",
            method.name,
            args.len()
        )));
    }

    let items = args
        .split_off(fixed)
        .into_iter()
        .map(|item| super::coerce_arg(types, item, element).convert_to(element))
        .collect();
    args.push(Expr::NewArray {
        element,
        items,
        ty: array,
    });
    Ok(args)
}
