//! Lexically chained symbol tables.
//!
//! A [`SymbolTable`] maps [`SymbolKey`]s to values (symbol definitions, in
//! the compiler) and links to an optional parent. Lookups walk from the
//! innermost table to the root, so inner entries shadow outer ones.
//!
//! # Fuzzy matching
//!
//! [`SymbolTable::match_entry`] answers a query key with the most specific
//! entry in one table:
//!
//! 1. Keep entries with the same name whose kind is the wildcard or covers the query kind
//! 2. Keep entries whose receiver type is absent, equal to the query's, a
//!    type the query's converts to, or (for two static wrappers) whose
//!    wrapped types are related the same way
//! 3. Rank by the position of the entry's receiver type in the query
//!    receiver's convertible types; absent receiver types rank last
//! 4. Break ties by insertion order
//!
//! [`SymbolTable::resolve_match`] applies this from the innermost table
//! outward and returns the first hit.
//!
//! # Mutability
//!
//! Tables are shared through `Rc` and mutated through `&self`. The root is
//! frozen once populated; a child stays mutable while its scope is built.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use quill_core::{
    SymbolError, SymbolKey, TypeHash, TypeSystem, convertible_position, convertible_types,
};

#[derive(Debug)]
struct Slot<V> {
    seq: u64,
    value: V,
}

/// One lexical scope of symbol definitions.
#[derive(Debug)]
pub struct SymbolTable<V> {
    entries: RefCell<FxHashMap<SymbolKey, Slot<V>>>,
    next_seq: Cell<u64>,
    parent: Option<Rc<SymbolTable<V>>>,
    read_only: Cell<bool>,
    /// Cached XOR of local key digests.
    local_hash: Cell<Option<u64>>,
    depth: usize,
}

impl<V: Clone> SymbolTable<V> {
    fn with_parent(parent: Option<Rc<Self>>) -> Self {
        let depth = parent.as_ref().map_or(0, |p| p.depth + 1);
        Self {
            entries: RefCell::new(FxHashMap::default()),
            next_seq: Cell::new(0),
            parent,
            read_only: Cell::new(false),
            local_hash: Cell::new(None),
            depth,
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a root table.
    pub fn root() -> Rc<Self> {
        Rc::new(Self::with_parent(None))
    }

    /// Create an empty child of `parent`.
    pub fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self::with_parent(Some(Rc::clone(parent))))
    }

    /// Create a child of `parent` holding `entries`.
    ///
    /// Entries the parent chain already resolves to an identical value are
    /// skipped.
    pub fn child_with_entries(
        parent: &Rc<Self>,
        entries: impl IntoIterator<Item = (SymbolKey, V)>,
    ) -> Result<Rc<Self>, SymbolError>
    where
        V: PartialEq,
    {
        let table = Self::with_parent(Some(Rc::clone(parent)));
        for (key, value) in entries {
            if parent.try_resolve(&key).as_ref() == Some(&value) {
                tracing::trace!(%key, "skipping entry inherited unchanged");
                continue;
            }
            table.add(key, value)?;
        }
        Ok(Rc::new(table))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    fn ensure_writable(&self) -> Result<(), SymbolError> {
        if self.read_only.get() {
            Err(SymbolError::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Add an entry to this table.
    ///
    /// Fails on a frozen table or when the key is already present locally.
    pub fn add(&self, key: SymbolKey, value: V) -> Result<(), SymbolError> {
        self.ensure_writable()?;
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(&key) {
            return Err(SymbolError::DuplicateKey { key });
        }
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        entries.insert(key, Slot { seq, value });
        self.local_hash.set(None);
        Ok(())
    }

    /// Remove a local entry. Returns whether it was present.
    pub fn remove(&self, key: &SymbolKey) -> Result<bool, SymbolError> {
        self.ensure_writable()?;
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.local_hash.set(None);
        }
        Ok(removed)
    }

    /// Remove every local entry.
    pub fn clear(&self) -> Result<(), SymbolError> {
        self.ensure_writable()?;
        self.entries.borrow_mut().clear();
        self.local_hash.set(None);
        Ok(())
    }

    /// Make this table read-only. Irreversible.
    pub fn freeze(&self) {
        self.read_only.set(true);
    }

    /// Whether the table rejects mutation.
    pub fn is_read_only(&self) -> bool {
        self.read_only.get()
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Number of local entries.
    pub fn count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Local keys in insertion order.
    pub fn keys(&self) -> Vec<SymbolKey> {
        let entries = self.entries.borrow();
        let mut keys: Vec<(u64, &SymbolKey)> = entries.iter().map(|(k, s)| (s.seq, k)).collect();
        keys.sort_unstable_by_key(|(seq, _)| *seq);
        keys.into_iter().map(|(_, k)| k.clone()).collect()
    }

    /// The enclosing table, `None` for the root.
    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Distance from the root (the root is 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Aggregate hash of every key in the chain.
    ///
    /// The local part is cached until this table is mutated; parents are
    /// consulted on every call, so their mutations are always reflected.
    pub fn chain_hash(&self) -> u64 {
        let local = match self.local_hash.get() {
            Some(hash) => hash,
            None => {
                let hash = self
                    .entries
                    .borrow()
                    .keys()
                    .fold(0u64, |acc, key| acc ^ key.digest());
                self.local_hash.set(Some(hash));
                hash
            }
        };
        match &self.parent {
            Some(parent) => local ^ parent.chain_hash().rotate_left(5),
            None => local,
        }
    }

    // ========================================================================
    // Exact resolution
    // ========================================================================

    /// Look up `key` from this table outward.
    pub fn try_resolve(&self, key: &SymbolKey) -> Option<V> {
        let mut table = Some(self);
        while let Some(current) = table {
            if let Some(slot) = current.entries.borrow().get(key) {
                return Some(slot.value.clone());
            }
            table = current.parent.as_deref();
        }
        None
    }

    /// Look up `key` from this table outward, failing if absent.
    pub fn resolve(&self, key: &SymbolKey) -> Result<V, SymbolError> {
        self.try_resolve(key)
            .ok_or_else(|| SymbolError::KeyNotFound { key: key.clone() })
    }

    /// Whether `key` resolves anywhere in the chain.
    pub fn exists_key(&self, key: &SymbolKey) -> bool {
        let mut table = Some(self);
        while let Some(current) = table {
            if current.entries.borrow().contains_key(key) {
                return true;
            }
            table = current.parent.as_deref();
        }
        false
    }

    // ========================================================================
    // Fuzzy resolution
    // ========================================================================

    /// Most specific local entry answering `query`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn match_entry<T: TypeSystem + ?Sized>(
        &self,
        query: &SymbolKey,
        types: &T,
    ) -> Option<(SymbolKey, V)> {
        let query_left = query.left_type();
        let convertible = query_left
            .map(|left| convertible_types(types, left))
            .unwrap_or_default();

        let entries = self.entries.borrow();
        let mut best: Option<((usize, u64), &SymbolKey, &Slot<V>)> = None;
        for (key, slot) in entries.iter() {
            if key.name() != query.name() || !key.kind().covers(query.kind()) {
                continue;
            }
            let left = key.left_type();
            let Some(rank) = left_type_rank(types, left, query_left, &convertible) else {
                continue;
            };
            let order = (rank, slot.seq);
            if best.is_none_or(|(current, _, _)| order < current) {
                best = Some((order, key, slot));
            }
        }

        best.map(|((rank, _), key, slot)| {
            tracing::trace!(
                query = %query,
                matched = %key,
                rank,
                depth = self.depth,
                "symbol matched"
            );
            (key.clone(), slot.value.clone())
        })
    }

    /// Most specific entry answering `query`, searching from this table outward.
    pub fn resolve_match<T: TypeSystem + ?Sized>(
        &self,
        query: &SymbolKey,
        types: &T,
    ) -> Option<(SymbolKey, V)> {
        let mut table = Some(self);
        while let Some(current) = table {
            if let Some(found) = current.match_entry(query, types) {
                return Some(found);
            }
            table = current.parent.as_deref();
        }
        None
    }
}

/// Rank of an entry's receiver type against a query's; lower is more specific.
///
/// `convertible` holds the convertible types of the query receiver.
fn left_type_rank<T: TypeSystem + ?Sized>(
    types: &T,
    entry: Option<TypeHash>,
    query: Option<TypeHash>,
    convertible: &[TypeHash],
) -> Option<usize> {
    let Some(entry) = entry else {
        return Some(usize::MAX);
    };
    let query = query?;
    if entry == query {
        return Some(0);
    }
    if let Some(rank) = convertible_position(types, convertible, query, entry) {
        return Some(rank);
    }

    let entry_target = types.static_target(entry)?;
    let query_target = types.static_target(query)?;
    if entry_target == query_target {
        return Some(convertible.len());
    }
    let wrapped = convertible_types(types, query_target);
    convertible_position(types, &wrapped, query_target, entry_target)
        .map(|position| convertible.len() + position)
}
