//! TypeRegistry - the table of canonical built-in type descriptors.
//!
//! This module provides [`TypeRegistry`], which owns exactly one descriptor
//! instance per built-in kind and hands out that same instance for every
//! lookup. Because of this, identity ([`Type::ptr_eq`]) is a correct and
//! cheap equality check for built-in types obtained from one registry.
//!
//! # Lookup Paths
//!
//! - **By index**: the dense [`TypeIndex`] of the kind
//! - **By name**: the symbolic name (`"INT8"`), or an alias such as `"INT"`
//!   when aliases are enabled
//! - **By constant path**: `FFI::TYPE_INT8`, `FFI::Type::INT8` and
//!   `FFI::NativeType::INT8`
//!
//! All paths resolve to the identical instance.
//!
//! # Thread Safety
//!
//! The registry is fully built by its constructor and never mutated
//! afterwards, so it can be shared freely through `Arc`. [`TypeRegistry::global`]
//! publishes a default-configured registry exactly once.
//!
//! # Example
//!
//! ```
//! use nativetype_registry::TypeRegistry;
//! use nativetype_core::TypeKind;
//!
//! let registry = TypeRegistry::new();
//! let by_name = registry.lookup_by_name("UINT16").unwrap();
//! let by_index = registry.lookup_by_index(TypeKind::Uint16.index() as usize).unwrap();
//! assert!(by_name.ptr_eq(by_index));
//! ```

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;

use nativetype_core::{
    BuiltinType, FfiConfig, FfiError, FfiProperty, FfiResult, MarshalPolicy, QualifiedName, Type,
    TypeHash, TypeIndex, TypeKind,
};

const SIZE_T_KIND: TypeKind = if size_of::<usize>() == 8 {
    TypeKind::Uint64
} else {
    TypeKind::Uint32
};

/// C-style alias names and the kind each one denotes.
pub const ALIASES: [(&str, TypeKind); 14] = [
    ("CHAR", TypeKind::Int8),
    ("UCHAR", TypeKind::Uint8),
    ("SHORT", TypeKind::Int16),
    ("USHORT", TypeKind::Uint16),
    ("INT", TypeKind::Int32),
    ("UINT", TypeKind::Uint32),
    ("LONG_LONG", TypeKind::Int64),
    ("ULONG_LONG", TypeKind::Uint64),
    ("FLOAT", TypeKind::Float32),
    ("DOUBLE", TypeKind::Float64),
    ("SIZE_T", SIZE_T_KIND),
    ("BUFFER_IN", TypeKind::Pointer),
    ("BUFFER_OUT", TypeKind::Pointer),
    ("BUFFER_INOUT", TypeKind::Pointer),
];

/// Prefix of the flat `FFI::TYPE_<NAME>` constants.
const FLAT_CONSTANT_PREFIX: &str = "TYPE_";

#[derive(Debug, Clone, Copy)]
struct NameEntry {
    name: &'static str,
    index: TypeIndex,
}

/// Immutable table of the canonical built-in type descriptors.
pub struct TypeRegistry {
    /// Canonical instances, position == type index.
    by_index: Vec<Type>,
    /// Name (canonical or alias) hash -> the name and its type index.
    by_name: FxHashMap<TypeHash, NameEntry>,
    /// Every accepted name, canonical names first.
    names: Vec<&'static str>,
    config: FfiConfig,
}

impl TypeRegistry {
    /// Build a registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&FfiConfig::default())
    }

    /// Build a registry; every built-in kind is instantiated exactly once.
    pub fn with_config(config: &FfiConfig) -> Self {
        let policy = MarshalPolicy::from_config(config);
        let mut by_index = Vec::with_capacity(TypeKind::BUILTINS.len());
        let mut by_name = FxHashMap::default();
        let mut names = Vec::new();

        let mut register = |name: &'static str, kind: TypeKind| {
            let entry = NameEntry {
                name,
                index: kind.index(),
            };
            by_name.insert(TypeHash::from_name(name), entry);
            names.push(name);
        };

        for builtin in BuiltinType::catalog(policy) {
            register(builtin.name(), builtin.kind());
            by_index.push(Type::Builtin(Arc::new(builtin)));
        }

        if config.is_enabled(FfiProperty::RegisterAliases) {
            for (alias, kind) in ALIASES {
                register(alias, kind);
            }
        }

        log::debug!(
            "type registry initialised: {} builtin types, {} names",
            by_index.len(),
            names.len()
        );

        Self {
            by_index,
            by_name,
            names,
            config: config.clone(),
        }
    }

    /// Process-wide registry with the default configuration.
    ///
    /// Built on first use; every caller observes the fully built table.
    pub fn global() -> &'static Arc<TypeRegistry> {
        static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new()))
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get the canonical descriptor for a name or alias.
    pub fn lookup_by_name(&self, name: &str) -> FfiResult<&Type> {
        self.entry(name)
            .and_then(|entry| self.by_index.get(entry.index as usize))
            .ok_or_else(|| FfiError::UnknownTypeName(name.to_string()))
    }

    /// Hash lookup, confirmed against the stored name.
    fn entry(&self, name: &str) -> Option<&NameEntry> {
        self.by_name
            .get(&TypeHash::from_name(name))
            .filter(|entry| entry.name == name)
    }

    /// Get the canonical descriptor for a type index.
    ///
    /// The MAPPED index has no canonical instance and fails like any other
    /// unknown index.
    pub fn lookup_by_index(&self, index: usize) -> FfiResult<&Type> {
        self.by_index
            .get(index)
            .ok_or(FfiError::UnknownTypeIndex(index))
    }

    /// Get the canonical descriptor for a kind.
    pub fn lookup_kind(&self, kind: TypeKind) -> FfiResult<&Type> {
        self.lookup_by_index(kind.index() as usize)
    }

    /// Resolve a script constant path such as `FFI::Type::INT8`.
    ///
    /// Accepted forms are `<NAME>`, `FFI::TYPE_<NAME>`, `FFI::Type::<NAME>`
    /// and `FFI::NativeType::<NAME>`.
    pub fn resolve(&self, path: &str) -> FfiResult<&Type> {
        let qualified = QualifiedName::from_qualified_string(path);
        let name = if qualified.is_global() {
            qualified.simple_name()
        } else if qualified.in_namespace(&["FFI"]) {
            qualified
                .simple_name()
                .strip_prefix(FLAT_CONSTANT_PREFIX)
                .ok_or_else(|| FfiError::UnknownTypeName(path.to_string()))?
        } else if qualified.in_namespace(&["FFI", "Type"])
            || qualified.in_namespace(&["FFI", "NativeType"])
        {
            qualified.simple_name()
        } else {
            return Err(FfiError::UnknownTypeName(path.to_string()));
        };
        self.lookup_by_name(name)
            .map_err(|_| FfiError::UnknownTypeName(path.to_string()))
    }

    /// Check whether a name or alias is known.
    pub fn contains_name(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Type index a name resolves to.
    pub fn index_of(&self, name: &str) -> Option<TypeIndex> {
        self.entry(name).map(|entry| entry.index)
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Canonical descriptors in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.by_index.iter()
    }

    /// Every accepted name, canonical names first, then aliases.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// Number of built-in types.
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn config(&self) -> &FfiConfig {
        &self.config
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &format!("<{} types>", self.by_index.len()))
            .field("names", &format!("<{} names>", self.names.len()))
            .field("config", &self.config)
            .finish()
    }
}
