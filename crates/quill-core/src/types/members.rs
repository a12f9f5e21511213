//! Member descriptors: methods, constructors, fields and properties.

use crate::TypeHash;

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Declared parameter type.
    pub data_type: TypeHash,
}

impl Param {
    /// Create a parameter.
    pub fn new(name: impl Into<String>, data_type: TypeHash) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// The static/instance/constructor nature of a callable member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Needs a receiver.
    Instance,
    /// Called without a receiver.
    Static,
    /// Builds a new instance of the owner type. Called without a receiver.
    Constructor,
}

/// A callable member: method or constructor.
///
/// A method with declared `generic_params` but no `generic_args` is an
/// unbound generic method; specialization fills `generic_args` and rewrites
/// the parameter and return types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    /// Method name. Constructors use the owner's name.
    pub name: String,
    /// Declaring type.
    pub owner: TypeHash,
    /// Identity hash.
    pub func_hash: TypeHash,
    /// Static/instance/constructor nature.
    pub kind: MethodKind,
    /// Declared parameters. For variadic methods the last one is the array-typed rest parameter.
    pub params: Vec<Param>,
    /// Result type. Constructors return their owner.
    pub return_type: TypeHash,
    /// A static method whose first parameter stands in for the receiver.
    pub is_extension: bool,
    /// The trailing parameter accepts any number of trailing arguments.
    pub is_variadic: bool,
    /// Method-level generic parameters.
    pub generic_params: Vec<TypeHash>,
    /// Bound generic arguments (empty while unbound).
    pub generic_args: Vec<TypeHash>,
}

impl MethodEntry {
    fn new(
        name: String,
        owner: TypeHash,
        func_hash: TypeHash,
        kind: MethodKind,
        params: Vec<Param>,
        return_type: TypeHash,
    ) -> Self {
        Self {
            name,
            owner,
            func_hash,
            kind,
            params,
            return_type,
            is_extension: false,
            is_variadic: false,
            generic_params: Vec::new(),
            generic_args: Vec::new(),
        }
    }

    /// An instance method.
    pub fn instance(
        owner: TypeHash,
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: TypeHash,
    ) -> Self {
        let name = name.into();
        let hash = TypeHash::from_method(owner, &name, &param_types(&params));
        Self::new(name, owner, hash, MethodKind::Instance, params, return_type)
    }

    /// A static method.
    pub fn static_fn(
        owner: TypeHash,
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: TypeHash,
    ) -> Self {
        let name = name.into();
        let hash = TypeHash::from_method(owner, &name, &param_types(&params));
        Self::new(name, owner, hash, MethodKind::Static, params, return_type)
    }

    /// A constructor of `owner`.
    pub fn constructor(owner: TypeHash, owner_name: impl Into<String>, params: Vec<Param>) -> Self {
        let hash = TypeHash::from_constructor(owner, &param_types(&params));
        Self::new(
            owner_name.into(),
            owner,
            hash,
            MethodKind::Constructor,
            params,
            owner,
        )
    }

    /// Mark as an extension method (static, first parameter is the receiver).
    pub fn as_extension(mut self) -> Self {
        self.kind = MethodKind::Static;
        self.is_extension = true;
        self
    }

    /// Mark the trailing parameter as variadic.
    pub fn as_variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    /// Declare method-level generic parameters.
    pub fn with_generic_params(mut self, params: Vec<TypeHash>) -> Self {
        self.generic_params = params;
        self
    }

    /// Whether this is a generic method whose parameters are not yet bound.
    pub fn is_unbound_generic(&self) -> bool {
        !self.generic_params.is_empty() && self.generic_args.is_empty()
    }

    /// Whether the method is called without a receiver.
    pub fn is_static(&self) -> bool {
        !matches!(self.kind, MethodKind::Instance)
    }

    /// Whether this is a constructor.
    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, MethodKind::Constructor)
    }

    /// Declared parameter types, in order.
    pub fn param_types(&self) -> Vec<TypeHash> {
        param_types(&self.params)
    }
}

fn param_types(params: &[Param]) -> Vec<TypeHash> {
    params.iter().map(|p| p.data_type).collect()
}

/// A data field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Declaring type.
    pub owner: TypeHash,
    /// Field type.
    pub data_type: TypeHash,
    /// Static field (no receiver).
    pub is_static: bool,
}

impl FieldEntry {
    /// Create an instance field.
    pub fn new(owner: TypeHash, name: impl Into<String>, data_type: TypeHash) -> Self {
        Self {
            name: name.into(),
            owner,
            data_type,
            is_static: false,
        }
    }

    /// Mark as static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// A property, optionally indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Property name.
    pub name: String,
    /// Declaring type.
    pub owner: TypeHash,
    /// Property type.
    pub data_type: TypeHash,
    /// Index parameters; non-empty makes this an indexer.
    pub index_params: Vec<Param>,
    /// Static property (no receiver).
    pub is_static: bool,
}

impl PropertyEntry {
    /// Create a plain instance property.
    pub fn new(owner: TypeHash, name: impl Into<String>, data_type: TypeHash) -> Self {
        Self {
            name: name.into(),
            owner,
            data_type,
            index_params: Vec::new(),
            is_static: false,
        }
    }

    /// Create an indexer property.
    pub fn indexer(
        owner: TypeHash,
        name: impl Into<String>,
        data_type: TypeHash,
        index_params: Vec<Param>,
    ) -> Self {
        Self {
            index_params,
            ..Self::new(owner, name, data_type)
        }
    }

    /// Mark as static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// A field or property candidate for member dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberEntry {
    /// A data field.
    Field(FieldEntry),
    /// A property or indexer.
    Property(PropertyEntry),
}

impl MemberEntry {
    /// Member name.
    pub fn name(&self) -> &str {
        match self {
            MemberEntry::Field(f) => &f.name,
            MemberEntry::Property(p) => &p.name,
        }
    }

    /// Declaring type.
    pub fn owner(&self) -> TypeHash {
        match self {
            MemberEntry::Field(f) => f.owner,
            MemberEntry::Property(p) => p.owner,
        }
    }

    /// Value type of the member.
    pub fn data_type(&self) -> TypeHash {
        match self {
            MemberEntry::Field(f) => f.data_type,
            MemberEntry::Property(p) => p.data_type,
        }
    }

    /// Whether the member is accessed without a receiver.
    pub fn is_static(&self) -> bool {
        match self {
            MemberEntry::Field(f) => f.is_static,
            MemberEntry::Property(p) => p.is_static,
        }
    }

    /// Whether this is an indexer property.
    pub fn is_indexer(&self) -> bool {
        matches!(self, MemberEntry::Property(p) if !p.index_params.is_empty())
    }
}

impl From<FieldEntry> for MemberEntry {
    fn from(field: FieldEntry) -> Self {
        MemberEntry::Field(field)
    }
}

impl From<PropertyEntry> for MemberEntry {
    fn from(property: PropertyEntry) -> Self {
        MemberEntry::Property(property)
    }
}
