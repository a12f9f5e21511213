//! Root scope construction.
//!
//! A [`RegistrationTable`] collects the definitions every program sees and
//! installs them into a frozen root [`Scope`]. Child scopes created by the
//! reducer layer on top of it.

use std::rc::Rc;

use quill_core::{DispatchKind, MethodEntry, SymbolError, SymbolKey, TypeHash};

use crate::definition::{Scope, SymbolDefinition, member_dispatch_definition};

/// Ordered registrations for a root scope.
#[derive(Debug, Clone, Default)]
pub struct RegistrationTable {
    entries: Vec<(SymbolKey, SymbolDefinition)>,
}

impl RegistrationTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a registration.
    pub fn register(&mut self, key: SymbolKey, definition: SymbolDefinition) {
        self.entries.push((key, definition));
    }

    /// Add a registration, builder style.
    pub fn with(mut self, key: SymbolKey, definition: SymbolDefinition) -> Self {
        self.register(key, definition);
        self
    }

    /// Register the live-member fallback under the missing key.
    pub fn with_member_dispatch(self) -> Self {
        self.with(SymbolKey::missing(), member_dispatch_definition())
    }

    /// Register a type by name: as a value (its type reference) and as a
    /// constructor call.
    pub fn with_type(self, name: impl Into<String>, target: TypeHash) -> Self {
        let name = name.into();
        self.with(
            SymbolKey::global(DispatchKind::MEMBER, name.clone()),
            SymbolDefinition::type_reference(target),
        )
        .with(
            SymbolKey::global(DispatchKind::CONSTRUCTOR, name),
            SymbolDefinition::constructors(target),
        )
    }

    /// Register a free function overload set.
    pub fn with_function(self, name: impl Into<String>, overloads: Vec<MethodEntry>) -> Self {
        self.with(
            SymbolKey::global(DispatchKind::METHOD, name),
            SymbolDefinition::methods(overloads),
        )
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &SymbolKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Build the root scope and freeze it.
    ///
    /// Fails with [`SymbolError::DuplicateKey`] if a key was registered twice.
    pub fn install_root(self) -> Result<Rc<Scope>, SymbolError> {
        let root = Scope::root();
        for (key, definition) in self.entries {
            root.add(key, definition)?;
        }
        root.freeze();
        tracing::debug!(entries = root.count(), "installed root scope");
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Expr;

    #[test]
    fn install_freezes_root() {
        let root = RegistrationTable::new()
            .with(
                SymbolKey::global(DispatchKind::MEMBER, "one"),
                SymbolDefinition::constant(Expr::int(1)),
            )
            .install_root()
            .unwrap();
        assert!(root.is_read_only());
        assert_eq!(root.count(), 1);
        assert_eq!(
            root.add(SymbolKey::missing(), member_dispatch_definition()),
            Err(SymbolError::ReadOnly)
        );
    }

    #[test]
    fn duplicate_registration_fails() {
        let key = SymbolKey::global(DispatchKind::MEMBER, "one");
        let err = RegistrationTable::new()
            .with(key.clone(), SymbolDefinition::constant(Expr::int(1)))
            .with(key.clone(), SymbolDefinition::constant(Expr::int(2)))
            .install_root()
            .unwrap_err();
        assert_eq!(err, SymbolError::DuplicateKey { key });
    }

    #[test]
    fn with_type_adds_value_and_constructor() {
        let table = RegistrationTable::new()
            .with_type("Point", TypeHash::from_name("Point"))
            .with_member_dispatch();
        assert_eq!(table.len(), 3);
        let kinds: Vec<_> = table.keys().map(SymbolKey::kind).collect();
        let expected = [
            DispatchKind::MEMBER,
            DispatchKind::CONSTRUCTOR,
            DispatchKind::UNKNOWN,
        ];
        assert_eq!(kinds, expected);
    }

    #[test]
    fn empty_table() {
        let table = RegistrationTable::new();
        assert!(table.is_empty());
        assert_eq!(table.install_root().unwrap().count(), 0);
    }
}
