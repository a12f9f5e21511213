//! Type descriptors.
//!
//! [`TypeEntry`] is the registry-side description of a type: its kind, its
//! place in the inheritance graph, its generic shape and its members. The
//! core algorithms never read entries directly; they go through the
//! [`TypeSystem`](crate::TypeSystem) trait.

mod members;

pub use members::{FieldEntry, MemberEntry, MethodEntry, MethodKind, Param, PropertyEntry};

use bitflags::bitflags;

use crate::TypeHash;

bitflags! {
    /// Constraints declared on a generic parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GenericConstraints: u8 {
        /// The argument must have a parameterless constructor.
        const DEFAULT_CONSTRUCTOR = 1 << 0;
        /// The argument must be a reference type.
        const REFERENCE_TYPE = 1 << 1;
        /// The argument must be a value type.
        const VALUE_TYPE = 1 << 2;
    }
}

/// Constraints that guarantee a parameterless constructor.
const DEFAULT_CONSTRUCTIBLE: GenericConstraints =
    GenericConstraints::DEFAULT_CONSTRUCTOR.union(GenericConstraints::VALUE_TYPE);

/// Declaration of a generic parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParamInfo {
    /// Name of the declaring type or method.
    pub owner: String,
    /// Position within the declaring parameter list.
    pub index: usize,
    /// Special constraints.
    pub constraints: GenericConstraints,
    /// Upper-bound contract types the argument must be convertible to.
    pub bounds: Vec<TypeHash>,
}

/// Call signature of a delegate type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Parameter types.
    pub params: Vec<TypeHash>,
    /// Return type.
    pub return_type: TypeHash,
}

impl Signature {
    /// Create a signature.
    pub fn new(params: Vec<TypeHash>, return_type: TypeHash) -> Self {
        Self {
            params,
            return_type,
        }
    }
}

/// The nature of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Reference type with single inheritance.
    Class,
    /// Value type.
    Value,
    /// Interface-like contract.
    Interface,
    /// Callable type with a fixed signature.
    Delegate(Signature),
    /// Placeholder for a generic argument.
    GenericParam(GenericParamInfo),
    /// The type of a type used as a value, giving access to its static members.
    StaticWrapper {
        /// The wrapped type.
        target: TypeHash,
    },
}

/// Registry entry for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    /// Display name.
    pub name: String,
    /// Identity hash.
    pub type_hash: TypeHash,
    /// Type kind.
    pub kind: TypeKind,

    // === Inheritance ===
    /// Base type (single inheritance).
    pub base: Option<TypeHash>,
    /// Directly implemented contracts.
    pub interfaces: Vec<TypeHash>,

    // === Generic shape ===
    /// Generic parameters (non-empty = generic definition).
    pub generic_params: Vec<TypeHash>,
    /// Definition this type instantiates.
    pub generic_definition: Option<TypeHash>,
    /// Arguments of the instantiation.
    pub generic_args: Vec<TypeHash>,

    // === Members ===
    /// Declared methods.
    pub methods: Vec<MethodEntry>,
    /// Declared constructors.
    pub constructors: Vec<MethodEntry>,
    /// Declared fields.
    pub fields: Vec<FieldEntry>,
    /// Declared properties.
    pub properties: Vec<PropertyEntry>,
    /// Name of the indexer that plain indexing resolves to.
    pub default_member: Option<String>,
}

impl TypeEntry {
    /// Create an entry with no base, contracts or members.
    pub fn new(name: impl Into<String>, type_hash: TypeHash, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            type_hash,
            kind,
            base: None,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            generic_definition: None,
            generic_args: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            default_member: None,
        }
    }

    /// A class whose hash is derived from its name.
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Class)
    }

    /// A value type whose hash is derived from its name.
    pub fn value(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Value)
    }

    /// An interface whose hash is derived from its name.
    pub fn interface(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Interface)
    }

    /// A delegate whose hash is derived from its name.
    pub fn delegate(name: impl Into<String>, signature: Signature) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Delegate(signature))
    }

    // === Builder Methods ===

    /// Set the base type.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented contract.
    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Declare generic parameters (makes this a generic definition).
    pub fn with_generic_params(mut self, params: Vec<TypeHash>) -> Self {
        self.generic_params = params;
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodEntry) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a constructor.
    pub fn with_constructor(mut self, constructor: MethodEntry) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldEntry) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a property.
    pub fn with_property(mut self, property: PropertyEntry) -> Self {
        self.properties.push(property);
        self
    }

    /// Name the default indexer.
    pub fn with_default_member(mut self, name: impl Into<String>) -> Self {
        self.default_member = Some(name.into());
        self
    }

    // === Query Methods ===

    /// Whether this is a generic definition.
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_params.is_empty()
    }

    /// Whether this is an instantiation of a generic definition.
    pub fn is_generic_instance(&self) -> bool {
        self.generic_definition.is_some()
    }

    /// Whether this is an interface.
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    /// Whether this is a value type.
    pub fn is_value_type(&self) -> bool {
        match &self.kind {
            TypeKind::Value => true,
            TypeKind::GenericParam(info) => {
                info.constraints.contains(GenericConstraints::VALUE_TYPE)
            }
            _ => false,
        }
    }

    /// Whether instances can be built without arguments.
    pub fn has_default_constructor(&self) -> bool {
        match &self.kind {
            TypeKind::Value => true,
            TypeKind::Class => {
                self.constructors.is_empty()
                    || self.constructors.iter().any(|c| c.params.is_empty())
            }
            TypeKind::GenericParam(info) => info.constraints.intersects(DEFAULT_CONSTRUCTIBLE),
            _ => false,
        }
    }

    /// Declaration info if this is a generic parameter.
    pub fn generic_param_info(&self) -> Option<&GenericParamInfo> {
        match &self.kind {
            TypeKind::GenericParam(info) => Some(info),
            _ => None,
        }
    }

    /// Call signature if this is a delegate.
    pub fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            TypeKind::Delegate(sig) => Some(sig),
            _ => None,
        }
    }

    /// Wrapped type if this is a static wrapper.
    pub fn static_target(&self) -> Option<TypeHash> {
        match self.kind {
            TypeKind::StaticWrapper { target } => Some(target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    #[test]
    fn class_without_constructors_is_default_constructible() {
        let point = TypeEntry::class("Point");
        assert!(point.has_default_constructor());

        let with_ctor = TypeEntry::class("Pair").with_constructor(MethodEntry::constructor(
            TypeHash::from_name("Pair"),
            "Pair",
            vec![Param::new("a", primitives::INT)],
        ));
        assert!(!with_ctor.has_default_constructor());
    }

    #[test]
    fn generic_definition_shape() {
        let t = TypeHash::from_generic_param("List", "T");
        let list = TypeEntry::class("List").with_generic_params(vec![t]);
        assert!(list.is_generic_definition());
        assert!(!list.is_generic_instance());
    }

    #[test]
    fn value_constrained_param_is_value_type() {
        let info = GenericParamInfo {
            owner: "Box".into(),
            index: 0,
            constraints: GenericConstraints::VALUE_TYPE,
            bounds: vec![],
        };
        let param = TypeEntry::new(
            "T",
            TypeHash::from_generic_param("Box", "T"),
            TypeKind::GenericParam(info),
        );
        assert!(param.is_value_type());
        assert!(param.has_default_constructor());
    }
}
