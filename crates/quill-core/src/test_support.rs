//! Minimal map-backed [`TypeSystem`] for unit tests in this crate.
//!
//! Instances must be added up front with [`MapTypes::add_instance`]; the
//! fixture never materializes new types.

use rustc_hash::FxHashMap;

use crate::{
    GenericConstraints, GenericParamInfo, MemberEntry, MethodEntry, RegistrationError, TypeEntry,
    TypeHash, TypeKind, TypeSystem, primitives,
};

pub(crate) struct MapTypes {
    entries: FxHashMap<TypeHash, TypeEntry>,
}

impl MapTypes {
    pub(crate) fn new() -> Self {
        let mut types = Self {
            entries: FxHashMap::default(),
        };
        types.add(TypeEntry::new("object", primitives::OBJECT, TypeKind::Class));
        for (name, hash) in [
            ("bool", primitives::BOOL),
            ("int", primitives::INT),
            ("float", primitives::FLOAT),
            ("string", primitives::STRING),
        ] {
            types.add(TypeEntry::new(name, hash, TypeKind::Value).with_base(primitives::OBJECT));
        }
        types
    }

    pub(crate) fn add(&mut self, entry: TypeEntry) -> TypeHash {
        let hash = entry.type_hash;
        self.entries.insert(hash, entry);
        hash
    }

    pub(crate) fn add_param(
        &mut self,
        owner: &str,
        name: &str,
        index: usize,
        constraints: GenericConstraints,
        bounds: Vec<TypeHash>,
    ) -> TypeHash {
        let info = GenericParamInfo {
            owner: owner.to_string(),
            index,
            constraints,
            bounds,
        };
        self.add(TypeEntry::new(
            name,
            TypeHash::from_generic_param(owner, name),
            TypeKind::GenericParam(info),
        ))
    }

    pub(crate) fn add_instance(&mut self, definition: TypeHash, args: &[TypeHash]) -> TypeHash {
        let def = &self.entries[&definition];
        let mut entry = TypeEntry::new(
            format!("{}<{}>", def.name, args.len()),
            TypeHash::from_generic_instance(definition, args),
            def.kind.clone(),
        );
        entry.base = def.base;
        entry.generic_definition = Some(definition);
        entry.generic_args = args.to_vec();
        self.add(entry)
    }
}

impl TypeSystem for MapTypes {
    fn type_name(&self, ty: TypeHash) -> Option<String> {
        self.entries.get(&ty).map(|e| e.name.clone())
    }

    fn kind(&self, ty: TypeHash) -> Option<TypeKind> {
        self.entries.get(&ty).map(|e| e.kind.clone())
    }

    fn base_type(&self, ty: TypeHash) -> Option<TypeHash> {
        let entry = self.entries.get(&ty)?;
        if entry.generic_param_info().is_some() {
            return Some(primitives::OBJECT);
        }
        entry.base
    }

    fn interfaces(&self, ty: TypeHash) -> Vec<TypeHash> {
        match self.entries.get(&ty) {
            Some(entry) => match entry.generic_param_info() {
                Some(info) => info.bounds.clone(),
                None => entry.interfaces.clone(),
            },
            None => Vec::new(),
        }
    }

    fn generic_definition(&self, ty: TypeHash) -> Option<TypeHash> {
        self.entries.get(&ty)?.generic_definition
    }

    fn generic_args(&self, ty: TypeHash) -> Vec<TypeHash> {
        self.entries
            .get(&ty)
            .map(|e| e.generic_args.clone())
            .unwrap_or_default()
    }

    fn generic_params(&self, ty: TypeHash) -> Vec<TypeHash> {
        self.entries
            .get(&ty)
            .map(|e| e.generic_params.clone())
            .unwrap_or_default()
    }

    fn generic_param_info(&self, ty: TypeHash) -> Option<GenericParamInfo> {
        self.entries.get(&ty)?.generic_param_info().cloned()
    }

    fn is_value_type(&self, ty: TypeHash) -> bool {
        self.entries.get(&ty).is_some_and(TypeEntry::is_value_type)
    }

    fn has_default_constructor(&self, ty: TypeHash) -> bool {
        self.entries
            .get(&ty)
            .is_some_and(TypeEntry::has_default_constructor)
    }

    fn default_member(&self, ty: TypeHash) -> Option<String> {
        self.entries.get(&ty)?.default_member.clone()
    }

    fn methods(&self, ty: TypeHash, name: &str) -> Vec<MethodEntry> {
        self.entries
            .get(&ty)
            .map(|e| {
                e.methods
                    .iter()
                    .filter(|m| m.name == name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn constructors(&self, ty: TypeHash) -> Vec<MethodEntry> {
        self.entries
            .get(&ty)
            .map(|e| e.constructors.clone())
            .unwrap_or_default()
    }

    fn members(&self, _ty: TypeHash, _name: &str) -> Vec<MemberEntry> {
        Vec::new()
    }

    fn instantiate(
        &self,
        definition: TypeHash,
        args: &[TypeHash],
    ) -> Result<TypeHash, RegistrationError> {
        let hash = TypeHash::from_generic_instance(definition, args);
        if self.entries.contains_key(&hash) {
            Ok(hash)
        } else {
            Err(RegistrationError::TypeNotFound(hash.to_string()))
        }
    }

    fn static_wrapper(&self, target: TypeHash) -> Result<TypeHash, RegistrationError> {
        Err(RegistrationError::TypeNotFound(target.to_string()))
    }
}
