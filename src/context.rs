//! The `FfiContext` facade used by the interpreter and call-marshaling code.

use std::sync::Arc;

use nativetype_core::{
    FfiConfig, FfiResult, MappedType, Pointer, Type, TypeIndex, TypeKind, Value,
};
use nativetype_registry::TypeRegistry;

/// Entry point to the native type layer.
///
/// Owns the registry of canonical built-in descriptors and the configuration
/// it was built from. Cloning shares the same registry, so descriptors
/// obtained through any clone are identical.
#[derive(Debug, Clone)]
pub struct FfiContext {
    registry: Arc<TypeRegistry>,
    config: FfiConfig,
}

impl FfiContext {
    /// Context backed by the process-wide default registry.
    pub fn new() -> Self {
        Self {
            registry: Arc::clone(TypeRegistry::global()),
            config: FfiConfig::default(),
        }
    }

    /// Context with its own registry built from `config`.
    pub fn with_config(config: FfiConfig) -> Self {
        let registry = Arc::new(TypeRegistry::with_config(&config));
        log::debug!("ffi context with private registry: {:?}", registry);
        Self { registry, config }
    }

    /// Context over an existing registry.
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        let config = registry.config().clone();
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &FfiConfig {
        &self.config
    }

    /// Canonical descriptor for a symbolic name or alias.
    pub fn lookup(&self, name: &str) -> FfiResult<&Type> {
        self.registry.lookup_by_name(name)
    }

    /// Canonical descriptor for a type index.
    pub fn lookup_index(&self, index: usize) -> FfiResult<&Type> {
        self.registry.lookup_by_index(index)
    }

    pub fn lookup_kind(&self, kind: TypeKind) -> FfiResult<&Type> {
        self.registry.lookup_kind(kind)
    }

    /// Resolve a script constant path (`FFI::Type::INT8`, `FFI::TYPE_INT8`, ...).
    pub fn resolve(&self, path: &str) -> FfiResult<&Type> {
        self.registry.resolve(path)
    }

    /// The value script code sees for a constant path.
    pub fn type_value(&self, path: &str) -> FfiResult<Value> {
        self.resolve(path).map(|ty| Value::Type(ty.clone()))
    }

    /// `FFI::Type::Mapped.new(delegate)`.
    ///
    /// The result is not interned: every call creates a new mapped type.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn mapped(&self, delegate: &Value) -> FfiResult<Type> {
        MappedType::from_value(delegate).map(Type::from)
    }

    /// `FFI::Pointer.new(address)`.
    pub fn pointer(&self, address: usize) -> Value {
        Value::Pointer(Pointer::new(address))
    }

    /// Name of the canonical type with this index, if any.
    pub fn type_name(&self, index: TypeIndex) -> Option<&'static str> {
        self.lookup_index(index as usize).ok().map(Type::name)
    }
}

impl Default for FfiContext {
    fn default() -> Self {
        Self::new()
    }
}
