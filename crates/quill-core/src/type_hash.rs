//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is the opaque handle the core uses for every type descriptor,
//! method and constructor. Hashes are computed from names and signatures, so
//! the same generic instantiation always yields the same handle no matter
//! which path created it.
//!
//! # Examples
//!
//! ```
//! use quill_core::TypeHash;
//!
//! let list = TypeHash::from_name("List");
//! assert_eq!(list, TypeHash::from_name("List"));
//!
//! let a = TypeHash::from_generic_instance(list, &[TypeHash::from_name("int")]);
//! let b = TypeHash::from_generic_instance(list, &[TypeHash::from_name("string")]);
//! assert_ne!(a, b);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
///
/// Different entity kinds (types, methods, constructors) never collide even
/// when they share a name.
pub mod hash_constants {
    /// Separator constant for path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method hashes.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for constructor hashes.
    pub const CONSTRUCTOR: u64 = 0x9a7f3d5e2b8c4601;

    /// Domain marker for generic parameter hashes.
    pub const GENERIC_PARAM: u64 = 0x1a095090689d4647;

    /// Domain marker for static wrapper types.
    pub const STATIC: u64 = 0x3e9f5d2a8c7b1403;

    /// Domain marker for built-in types.
    pub const BUILTIN: u64 = 0x5ea77ffbcdf5f302;

    /// Parameter position mixing constants, so that argument order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a type, method or constructor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of a generic instantiation from its definition and arguments.
    ///
    /// Argument order matters: `Map<int, string>` differs from `Map<string, int>`.
    #[inline]
    pub fn from_generic_instance(definition: TypeHash, args: &[TypeHash]) -> Self {
        TypeHash(mix(definition.0, args))
    }

    /// Create the hash of a generic parameter declared by `owner`.
    #[inline]
    pub fn from_generic_param(owner: &str, name: &str) -> Self {
        let qualified = format!("{owner}::{name}");
        TypeHash(hash_constants::GENERIC_PARAM ^ xxh64(qualified.as_bytes(), 0))
    }

    /// Create the hash of the static wrapper type of `target`.
    #[inline]
    pub fn from_static(target: TypeHash) -> Self {
        TypeHash(hash_constants::STATIC ^ target.0.wrapping_mul(hash_constants::SEP))
    }

    /// Create a method hash from owner type, name and parameter types.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, params: &[TypeHash]) -> Self {
        let seed = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        TypeHash(mix(seed, params))
    }

    /// Create a constructor hash from owner type and parameter types.
    #[inline]
    pub fn from_constructor(owner: TypeHash, params: &[TypeHash]) -> Self {
        TypeHash(mix(hash_constants::CONSTRUCTOR ^ owner.0, params))
    }

    /// Hash for a built-in type slot. Used for the well-known constants below.
    #[inline]
    pub const fn builtin(slot: u64) -> Self {
        TypeHash(hash_constants::BUILTIN ^ slot.wrapping_mul(hash_constants::SEP))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

fn mix(seed: u64, parts: &[TypeHash]) -> u64 {
    let mut hash = seed;
    for (i, part) in parts.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps position significant, unlike a plain XOR fold
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ part.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Well-known handles for the built-in types every registry provides.
pub mod primitives {
    use super::TypeHash;

    /// The universal root object type.
    pub const OBJECT: TypeHash = TypeHash::builtin(1);
    /// `void`, the result type of calls producing nothing.
    pub const VOID: TypeHash = TypeHash::builtin(2);
    /// `bool`
    pub const BOOL: TypeHash = TypeHash::builtin(3);
    /// `int` (64-bit signed integer)
    pub const INT: TypeHash = TypeHash::builtin(4);
    /// `float` (64-bit IEEE float)
    pub const FLOAT: TypeHash = TypeHash::builtin(5);
    /// `string`
    pub const STRING: TypeHash = TypeHash::builtin(6);
    /// The built-in `array<T>` generic definition.
    pub const ARRAY: TypeHash = TypeHash::builtin(7);
    /// The `T` parameter of `array<T>`.
    pub const ARRAY_ELEMENT: TypeHash = TypeHash::builtin(8);
    /// The type of an anonymous function before it is bound to a delegate.
    pub const LAMBDA: TypeHash = TypeHash::builtin(9);
}
