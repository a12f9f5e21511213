//! Dispatch kinds and symbol keys.
//!
//! A [`SymbolKey`] is the lookup identity of a registered symbol: what kind
//! of access it answers ([`DispatchKind`]), which receiver type it is bound
//! to (if any), and its name.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use xxhash_rust::xxh64::xxh64;

use crate::TypeHash;

bitflags! {
    /// The category of access being resolved.
    ///
    /// The four target flags can be combined; a key registered with
    /// `MEMBER | METHOD` answers both member reads and method calls. The empty
    /// set is the wildcard [`DispatchKind::UNKNOWN`], which answers anything.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DispatchKind: u8 {
        /// Field or property read.
        const MEMBER = 1 << 0;
        /// Method call.
        const METHOD = 1 << 1;
        /// Constructor call.
        const CONSTRUCTOR = 1 << 2;
        /// Literal reference.
        const LITERAL = 1 << 3;
        /// The call site carried explicit type arguments. Not part of key identity.
        const GENERIC = 1 << 4;

        /// Mask of the bits that take part in key equality and matching.
        const TARGET = Self::MEMBER.bits()
            | Self::METHOD.bits()
            | Self::CONSTRUCTOR.bits()
            | Self::LITERAL.bits();
    }
}

impl DispatchKind {
    /// The wildcard kind.
    pub const UNKNOWN: DispatchKind = DispatchKind::empty();

    /// The bits of this kind that take part in identity.
    #[inline]
    pub fn target(self) -> DispatchKind {
        self & DispatchKind::TARGET
    }

    /// Whether this is the wildcard kind.
    #[inline]
    pub fn is_unknown(self) -> bool {
        self.target().is_empty()
    }

    /// Whether an entry registered with this kind answers a query of `query` kind.
    #[inline]
    pub fn covers(self, query: DispatchKind) -> bool {
        self.is_unknown() || self.target().contains(query.target())
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("unknown");
        }
        let names = [
            (DispatchKind::MEMBER, "member"),
            (DispatchKind::METHOD, "method"),
            (DispatchKind::CONSTRUCTOR, "constructor"),
            (DispatchKind::LITERAL, "literal"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Name reserved for the [`SymbolKey::missing`] sentinel. Not a valid identifier.
pub const MISSING_NAME: &str = "\u{1}missing";

/// Lookup identity of a symbol: dispatch kind, optional receiver type, name.
///
/// Equality and hashing only look at the [`DispatchKind::TARGET`] bits of the
/// kind, so modifier bits such as [`DispatchKind::GENERIC`] never split a key.
#[derive(Debug, Clone)]
pub struct SymbolKey {
    kind: DispatchKind,
    left_type: Option<TypeHash>,
    name: String,
}

impl SymbolKey {
    /// Create a key.
    pub fn new(kind: DispatchKind, left_type: Option<TypeHash>, name: impl Into<String>) -> Self {
        Self {
            kind,
            left_type,
            name: name.into(),
        }
    }

    /// A global key (no receiver type).
    pub fn global(kind: DispatchKind, name: impl Into<String>) -> Self {
        Self::new(kind, None, name)
    }

    /// A key bound to a receiver type.
    pub fn member_of(kind: DispatchKind, left_type: TypeHash, name: impl Into<String>) -> Self {
        Self::new(kind, Some(left_type), name)
    }

    /// The fallback sentinel consulted when nothing else matches.
    pub fn missing() -> Self {
        Self::new(DispatchKind::UNKNOWN, None, MISSING_NAME)
    }

    /// Whether this is the [`SymbolKey::missing`] sentinel.
    pub fn is_missing(&self) -> bool {
        self.name == MISSING_NAME && self.left_type.is_none() && self.kind.is_unknown()
    }

    /// The dispatch kind, including modifier bits.
    pub fn kind(&self) -> DispatchKind {
        self.kind
    }

    /// The receiver type, `None` for global symbols.
    pub fn left_type(&self) -> Option<TypeHash> {
        self.left_type
    }

    /// The symbol name; empty for the unnamed/default dispatch.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable 64-bit digest of the key identity, used for chain hashes.
    pub fn digest(&self) -> u64 {
        let name = xxh64(self.name.as_bytes(), 0);
        let left = self.left_type.map_or(0, |t| t.0.rotate_left(17));
        name ^ left ^ (u64::from(self.kind.target().bits()) << 56)
    }
}

impl PartialEq for SymbolKey {
    fn eq(&self, other: &Self) -> bool {
        self.kind.target() == other.kind.target()
            && self.left_type == other.left_type
            && self.name == other.name
    }
}

impl Eq for SymbolKey {}

impl Hash for SymbolKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.target().hash(state);
        self.left_type.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing() {
            return f.write_str("<missing>");
        }
        match self.left_type {
            Some(left) => write!(f, "{} {}.{}", self.kind, left, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}
