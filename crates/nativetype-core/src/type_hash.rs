//! Deterministic hash of type names.
//!
//! [`TypeHash`] is the key of the registry's name table. Hashes are computed
//! with XXHash64 from the exact (case-sensitive) name, so the same name
//! always produces the same hash and lookups need no string comparisons.
//!
//! # Examples
//!
//! ```
//! use nativetype_core::TypeHash;
//!
//! let a = TypeHash::from_name("INT32");
//! let b = TypeHash::from_name("INT32");
//! assert_eq!(a, b);
//! assert_ne!(a, TypeHash::from_name("int32"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain marker mixed into every type-name hash.
const TYPE_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// A deterministic 64-bit hash identifying a type name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(TYPE_DOMAIN ^ xxh64(name.as_bytes(), 0))
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
