//! The type system seam.
//!
//! Symbol matching and dispatch never touch registry storage directly. They
//! see types as [`TypeHash`] handles and ask a [`TypeSystem`] about them. The
//! trait is object safe; the compiler holds it as `&dyn TypeSystem`.
//!
//! Queries return owned data because an implementation may materialize
//! generic instances lazily behind interior mutability.

use crate::{
    GenericParamInfo, MemberEntry, MethodEntry, RegistrationError, Signature, TypeHash, TypeKind,
    primitives,
};

/// Read access to type descriptors, plus on-demand generic instantiation.
pub trait TypeSystem {
    /// The universal root type every type converts to.
    fn object_type(&self) -> TypeHash {
        primitives::OBJECT
    }

    /// Display name, `None` for an unknown handle.
    fn type_name(&self, ty: TypeHash) -> Option<String>;

    /// The nature of the type.
    fn kind(&self, ty: TypeHash) -> Option<TypeKind>;

    /// Direct base type. Generic parameters report the root object type.
    fn base_type(&self, ty: TypeHash) -> Option<TypeHash>;

    /// Directly implemented contracts. Generic parameters report their bounds.
    fn interfaces(&self, ty: TypeHash) -> Vec<TypeHash>;

    /// Definition this type instantiates, if it is a generic instance.
    fn generic_definition(&self, ty: TypeHash) -> Option<TypeHash>;

    /// Arguments of a generic instance (empty otherwise).
    fn generic_args(&self, ty: TypeHash) -> Vec<TypeHash>;

    /// Declared parameters of a generic definition (empty otherwise).
    fn generic_params(&self, ty: TypeHash) -> Vec<TypeHash>;

    /// Declaration info if `ty` is a generic parameter.
    fn generic_param_info(&self, ty: TypeHash) -> Option<GenericParamInfo>;

    /// Whether `ty` is a generic parameter.
    fn is_generic_param(&self, ty: TypeHash) -> bool {
        self.generic_param_info(ty).is_some()
    }

    /// Whether `ty` is an interface.
    fn is_interface(&self, ty: TypeHash) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Interface))
    }

    /// Whether `ty` has value semantics.
    fn is_value_type(&self, ty: TypeHash) -> bool;

    /// Whether `ty` can be constructed without arguments.
    fn has_default_constructor(&self, ty: TypeHash) -> bool;

    /// Call signature if `ty` is a delegate.
    fn delegate_signature(&self, ty: TypeHash) -> Option<Signature> {
        match self.kind(ty) {
            Some(TypeKind::Delegate(sig)) => Some(sig),
            _ => None,
        }
    }

    /// Wrapped type if `ty` is a static wrapper.
    fn static_target(&self, ty: TypeHash) -> Option<TypeHash> {
        match self.kind(ty) {
            Some(TypeKind::StaticWrapper { target }) => Some(target),
            _ => None,
        }
    }

    /// Name of the indexer that plain indexing on `ty` resolves to.
    fn default_member(&self, ty: TypeHash) -> Option<String>;

    /// Methods declared directly on `ty` with the given name.
    fn methods(&self, ty: TypeHash, name: &str) -> Vec<MethodEntry>;

    /// Constructors declared on `ty`.
    fn constructors(&self, ty: TypeHash) -> Vec<MethodEntry>;

    /// Fields and properties declared directly on `ty` with the given name.
    fn members(&self, ty: TypeHash, name: &str) -> Vec<MemberEntry>;

    /// Registered extension methods with the given name.
    fn extension_methods(&self, _name: &str) -> Vec<MethodEntry> {
        Vec::new()
    }

    /// Instantiate a generic definition with concrete arguments.
    ///
    /// Must be memoized: the same `(definition, args)` always yields the same handle.
    fn instantiate(
        &self,
        definition: TypeHash,
        args: &[TypeHash],
    ) -> Result<TypeHash, RegistrationError>;

    /// The static wrapper type of `target`, created on first request.
    fn static_wrapper(&self, target: TypeHash) -> Result<TypeHash, RegistrationError>;

    /// The array type with the given element type.
    fn array_of(&self, element: TypeHash) -> Result<TypeHash, RegistrationError> {
        self.instantiate(primitives::ARRAY, &[element])
    }

    /// Element type if `ty` is an array instance.
    fn element_type(&self, ty: TypeHash) -> Option<TypeHash> {
        if self.generic_definition(ty) == Some(primitives::ARRAY) {
            self.generic_args(ty).first().copied()
        } else {
            None
        }
    }
}
