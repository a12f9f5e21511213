//! TypeRegistry - concrete type storage with on-demand generic instantiation.
//!
//! Registered types live in a plain map keyed by [`TypeHash`]. Generic
//! instances and static wrappers are materialized lazily the first time the
//! resolver asks for them and cached behind a `RefCell`, so the registry can
//! be shared as `&dyn TypeSystem` while still growing.
//!
//! # Instantiation
//!
//! `instantiate(List, [int])` is memoized on the instance hash, which is
//! derived from the definition and the arguments. Materialization happens in
//! two steps:
//!
//! 1. Insert a header entry (name, kind, definition, arguments)
//! 2. Substitute the definition's parameters through base, contracts,
//!    members and delegate signature, then replace the header
//!
//! The header is visible before its members are rewritten, so a definition
//! that mentions itself (`List<T> List<T>.clone()`) terminates.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use quill_core::{
    GenericConstraints, GenericParamInfo, MemberEntry, MethodEntry, Param, PropertyEntry,
    RegistrationError, SubstitutionMap, TypeEntry, TypeHash, TypeKind, TypeSystem, primitives,
    substitute_member, substitute_method, substitute_params, substitute_signature, substitute_type,
};

/// Type storage implementing [`TypeSystem`].
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Explicitly registered types.
    types: FxHashMap<TypeHash, TypeEntry>,
    /// Name index over registered types.
    by_name: FxHashMap<String, TypeHash>,
    /// Extension methods by name.
    extensions: FxHashMap<String, Vec<MethodEntry>>,
    /// Materialized generic instances and static wrappers.
    instances: RefCell<FxHashMap<TypeHash, TypeEntry>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in types.
    ///
    /// Registers `object`, `void`, `bool`, `int`, `float`, `string`, the
    /// lambda placeholder type and the `array<T>` definition.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        self.insert(TypeEntry::new("object", primitives::OBJECT, TypeKind::Class));
        let builtins = [
            ("void", primitives::VOID, TypeKind::Value),
            ("bool", primitives::BOOL, TypeKind::Value),
            ("int", primitives::INT, TypeKind::Value),
            ("float", primitives::FLOAT, TypeKind::Value),
            ("string", primitives::STRING, TypeKind::Value),
            ("lambda", primitives::LAMBDA, TypeKind::Class),
        ];
        for (name, hash, kind) in builtins {
            self.insert(TypeEntry::new(name, hash, kind).with_base(primitives::OBJECT));
        }

        let element = primitives::ARRAY_ELEMENT;
        let info = GenericParamInfo {
            owner: "array".to_string(),
            index: 0,
            constraints: GenericConstraints::empty(),
            bounds: Vec::new(),
        };
        let param = TypeEntry::new("T", element, TypeKind::GenericParam(info));
        self.types.insert(element, param);

        let array = primitives::ARRAY;
        self.insert(
            TypeEntry::new("array", array, TypeKind::Class)
                .with_base(primitives::OBJECT)
                .with_generic_params(vec![element])
                .with_property(PropertyEntry::new(array, "Length", primitives::INT))
                .with_property(PropertyEntry::indexer(
                    array,
                    "Item",
                    element,
                    vec![Param::new("index", primitives::INT)],
                ))
                .with_default_member("Item")
                .with_method(MethodEntry::instance(
                    array,
                    "push",
                    vec![Param::new("item", element)],
                    primitives::VOID,
                )),
        );
    }

    fn insert(&mut self, entry: TypeEntry) -> TypeHash {
        let hash = entry.type_hash;
        self.by_name.insert(entry.name.clone(), hash);
        self.types.insert(hash, entry);
        hash
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a type.
    ///
    /// Classes, value types and delegates without an explicit base derive
    /// from `object`.
    pub fn register(&mut self, mut entry: TypeEntry) -> Result<TypeHash, RegistrationError> {
        if self.contains(entry.type_hash) {
            return Err(RegistrationError::DuplicateType(entry.name));
        }
        for &base in entry.base.iter().chain(&entry.interfaces) {
            if !self.contains(base) {
                return Err(RegistrationError::TypeNotFound(base.to_string()));
            }
        }

        let derives_from_object = matches!(
            entry.kind,
            TypeKind::Class | TypeKind::Value | TypeKind::Delegate(_)
        );
        if entry.base.is_none() && derives_from_object && entry.type_hash != primitives::OBJECT {
            entry.base = Some(primitives::OBJECT);
        }

        tracing::trace!(name = %entry.name, hash = %entry.type_hash, "registered type");
        Ok(self.insert(entry))
    }

    /// Register a generic parameter declared by `owner`.
    pub fn register_generic_param(
        &mut self,
        owner: &str,
        name: &str,
        index: usize,
        constraints: GenericConstraints,
        bounds: Vec<TypeHash>,
    ) -> Result<TypeHash, RegistrationError> {
        let hash = TypeHash::from_generic_param(owner, name);
        if self.contains(hash) {
            return Err(RegistrationError::DuplicateType(format!("{owner}::{name}")));
        }
        let info = GenericParamInfo {
            owner: owner.to_string(),
            index,
            constraints,
            bounds,
        };
        let entry = TypeEntry::new(name, hash, TypeKind::GenericParam(info));
        self.types.insert(hash, entry);
        Ok(hash)
    }

    /// Register an extension method. The method is marked as an extension if it is not already.
    pub fn register_extension(&mut self, method: MethodEntry) {
        let method = if method.is_extension {
            method
        } else {
            method.as_extension()
        };
        self.extensions
            .entry(method.name.clone())
            .or_default()
            .push(method);
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Get a type entry, materialized or registered.
    pub fn get(&self, ty: TypeHash) -> Option<TypeEntry> {
        self.with_entry(ty, TypeEntry::clone)
    }

    /// Look up a registered type by name.
    pub fn lookup(&self, name: &str) -> Option<TypeHash> {
        self.by_name.get(name).copied()
    }

    /// Whether the handle names a known type.
    pub fn contains(&self, ty: TypeHash) -> bool {
        self.types.contains_key(&ty) || self.instances.borrow().contains_key(&ty)
    }

    /// Number of materialized instances and static wrappers.
    pub fn instance_count(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Run `f` against an entry. The instance cache borrow ends before this returns.
    fn with_entry<R>(&self, ty: TypeHash, f: impl FnOnce(&TypeEntry) -> R) -> Option<R> {
        if let Some(entry) = self.types.get(&ty) {
            return Some(f(entry));
        }
        self.instances.borrow().get(&ty).map(f)
    }

    fn display_name(&self, ty: TypeHash) -> String {
        self.with_entry(ty, |e| e.name.clone())
            .unwrap_or_else(|| ty.to_string())
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn materialize(
        &self,
        definition: TypeHash,
        args: &[TypeHash],
    ) -> Result<TypeHash, RegistrationError> {
        let hash = TypeHash::from_generic_instance(definition, args);
        if self.contains(hash) {
            return Ok(hash);
        }

        let def = self
            .get(definition)
            .ok_or_else(|| RegistrationError::TypeNotFound(definition.to_string()))?;
        if !def.is_generic_definition() {
            return Err(RegistrationError::NotAGenericDefinition(def.name));
        }
        if def.generic_params.len() != args.len() {
            return Err(RegistrationError::GenericArgCountMismatch {
                name: def.name,
                expected: def.generic_params.len(),
                got: args.len(),
            });
        }

        let arg_names: Vec<String> = args.iter().map(|&a| self.display_name(a)).collect();
        let name = format!("{}<{}>", def.name, arg_names.join(", "));

        let mut header = TypeEntry::new(name, hash, def.kind.clone());
        header.generic_definition = Some(definition);
        header.generic_args = args.to_vec();
        header.default_member = def.default_member.clone();
        self.instances.borrow_mut().insert(hash, header.clone());

        let map: SubstitutionMap = def
            .generic_params
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();
        let mut entry = header;

        entry.base = def
            .base
            .map(|base| substitute_type(self, base, &map))
            .transpose()?;
        entry.interfaces = def
            .interfaces
            .iter()
            .map(|&i| substitute_type(self, i, &map))
            .collect::<Result<_, _>>()?;
        if let TypeKind::Delegate(signature) = &def.kind {
            entry.kind = TypeKind::Delegate(substitute_signature(self, signature, &map)?);
        }

        for method in &def.methods {
            let mut method = substitute_method(self, method, &map)?;
            method.owner = hash;
            method.func_hash = TypeHash::from_method(hash, &method.name, &method.param_types());
            entry.methods.push(method);
        }
        for constructor in &def.constructors {
            let params = substitute_params(self, &constructor.params, &map)?;
            let mut rebuilt = MethodEntry::constructor(hash, entry.name.clone(), params);
            rebuilt.is_variadic = constructor.is_variadic;
            entry.constructors.push(rebuilt);
        }
        for field in &def.fields {
            if let MemberEntry::Field(mut field) =
                substitute_member(self, &MemberEntry::Field(field.clone()), &map)?
            {
                field.owner = hash;
                entry.fields.push(field);
            }
        }
        for property in &def.properties {
            if let MemberEntry::Property(mut property) =
                substitute_member(self, &MemberEntry::Property(property.clone()), &map)?
            {
                property.owner = hash;
                entry.properties.push(property);
            }
        }

        tracing::trace!(name = %entry.name, hash = %hash, "materialized generic instance");
        self.instances.borrow_mut().insert(hash, entry);
        Ok(hash)
    }
}

// ============================================================================
// TypeSystem
// ============================================================================

impl TypeSystem for TypeRegistry {
    fn type_name(&self, ty: TypeHash) -> Option<String> {
        self.with_entry(ty, |e| e.name.clone())
    }

    fn kind(&self, ty: TypeHash) -> Option<TypeKind> {
        self.with_entry(ty, |e| e.kind.clone())
    }

    fn base_type(&self, ty: TypeHash) -> Option<TypeHash> {
        self.with_entry(ty, |e| match e.kind {
            TypeKind::GenericParam(_) => Some(primitives::OBJECT),
            _ => e.base,
        })
        .flatten()
    }

    fn interfaces(&self, ty: TypeHash) -> Vec<TypeHash> {
        self.with_entry(ty, |e| match &e.kind {
            TypeKind::GenericParam(info) => info.bounds.clone(),
            _ => e.interfaces.clone(),
        })
        .unwrap_or_default()
    }

    fn generic_definition(&self, ty: TypeHash) -> Option<TypeHash> {
        self.with_entry(ty, |e| e.generic_definition).flatten()
    }

    fn generic_args(&self, ty: TypeHash) -> Vec<TypeHash> {
        self.with_entry(ty, |e| e.generic_args.clone())
            .unwrap_or_default()
    }

    fn generic_params(&self, ty: TypeHash) -> Vec<TypeHash> {
        self.with_entry(ty, |e| e.generic_params.clone())
            .unwrap_or_default()
    }

    fn generic_param_info(&self, ty: TypeHash) -> Option<GenericParamInfo> {
        self.with_entry(ty, |e| e.generic_param_info().cloned())
            .flatten()
    }

    fn is_value_type(&self, ty: TypeHash) -> bool {
        self.with_entry(ty, TypeEntry::is_value_type)
            .unwrap_or(false)
    }

    fn has_default_constructor(&self, ty: TypeHash) -> bool {
        self.with_entry(ty, TypeEntry::has_default_constructor)
            .unwrap_or(false)
    }

    fn default_member(&self, ty: TypeHash) -> Option<String> {
        self.with_entry(ty, |e| e.default_member.clone()).flatten()
    }

    fn methods(&self, ty: TypeHash, name: &str) -> Vec<MethodEntry> {
        self.with_entry(ty, |e| {
            e.methods
                .iter()
                .filter(|m| m.name == name)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }

    fn constructors(&self, ty: TypeHash) -> Vec<MethodEntry> {
        self.with_entry(ty, |e| e.constructors.clone())
            .unwrap_or_default()
    }

    fn members(&self, ty: TypeHash, name: &str) -> Vec<MemberEntry> {
        self.with_entry(ty, |e| {
            let fields = e
                .fields
                .iter()
                .filter(|f| f.name == name)
                .cloned()
                .map(MemberEntry::from);
            let properties = e
                .properties
                .iter()
                .filter(|p| p.name == name)
                .cloned()
                .map(MemberEntry::from);
            fields.chain(properties).collect()
        })
        .unwrap_or_default()
    }

    fn extension_methods(&self, name: &str) -> Vec<MethodEntry> {
        self.extensions.get(name).cloned().unwrap_or_default()
    }

    fn instantiate(
        &self,
        definition: TypeHash,
        args: &[TypeHash],
    ) -> Result<TypeHash, RegistrationError> {
        self.materialize(definition, args)
    }

    fn static_wrapper(&self, target: TypeHash) -> Result<TypeHash, RegistrationError> {
        let hash = TypeHash::from_static(target);
        if self.contains(hash) {
            return Ok(hash);
        }
        let name = self
            .type_name(target)
            .ok_or_else(|| RegistrationError::TypeNotFound(target.to_string()))?;
        let name = format!("static {name}");
        let kind = TypeKind::StaticWrapper { target };
        let entry = TypeEntry::new(name, hash, kind).with_base(primitives::OBJECT);
        self.instances.borrow_mut().insert(hash, entry);
        Ok(hash)
    }
}
