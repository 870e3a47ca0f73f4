//! The polymorphic type descriptor handed to call-marshaling code.

use std::fmt;
use std::sync::Arc;

use crate::{BuiltinType, FfiResult, MappedType, NativeAllocation, TypeIndex, TypeKind, Value};

/// A native type descriptor: either a built-in kind or a mapped type.
///
/// Cloning is cheap and preserves identity; [`Type::ptr_eq`] tells whether
/// two handles share the same instance.
#[derive(Clone)]
pub enum Type {
    Builtin(Arc<BuiltinType>),
    Mapped(Arc<MappedType>),
}

impl Type {
    /// Kind tag of this descriptor (MAPPED for mapped types).
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Builtin(t) => t.kind(),
            Type::Mapped(_) => TypeKind::Mapped,
        }
    }

    /// Kind of the native slot this descriptor ultimately reads and writes.
    pub fn underlying_kind(&self) -> TypeKind {
        match self {
            Type::Builtin(t) => t.kind(),
            Type::Mapped(m) => m.underlying_kind(),
        }
    }

    /// Type index of the native representation.
    ///
    /// For a mapped type this is the index derived from its converter.
    pub fn type_index(&self) -> TypeIndex {
        self.underlying_kind().index()
    }

    pub fn size(&self) -> usize {
        match self {
            Type::Builtin(t) => t.size(),
            Type::Mapped(m) => m.size(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Type::Builtin(_))
    }

    pub fn as_builtin(&self) -> Option<&BuiltinType> {
        match self {
            Type::Builtin(t) => Some(t),
            Type::Mapped(_) => None,
        }
    }

    pub fn as_mapped(&self) -> Option<&MappedType> {
        match self {
            Type::Mapped(m) => Some(m),
            Type::Builtin(_) => None,
        }
    }

    /// Check whether both handles refer to the very same instance.
    pub fn ptr_eq(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Builtin(a), Type::Builtin(b)) => Arc::ptr_eq(a, b),
            (Type::Mapped(a), Type::Mapped(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Decode the value stored in `buffer`.
    ///
    /// # Safety
    ///
    /// Same contract as [`BuiltinType::read`] for the underlying kind.
    pub unsafe fn read(&self, buffer: *const u8) -> FfiResult<Value> {
        match self {
            Type::Builtin(t) => unsafe { t.read(buffer) },
            Type::Mapped(m) => unsafe { m.read(buffer) },
        }
    }

    /// Encode `value` into `buffer`.
    ///
    /// # Safety
    ///
    /// Same contract as [`BuiltinType::write`] for the underlying kind.
    pub unsafe fn write(&self, buffer: *mut u8, value: &Value) -> FfiResult<NativeAllocation> {
        match self {
            Type::Builtin(t) => unsafe { t.write(buffer, value) },
            Type::Mapped(m) => unsafe { m.write(buffer, value) },
        }
    }
}

impl From<BuiltinType> for Type {
    fn from(t: BuiltinType) -> Self {
        Type::Builtin(Arc::new(t))
    }
}

impl From<MappedType> for Type {
    fn from(m: MappedType) -> Self {
        Type::Mapped(Arc::new(m))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Builtin(a), Type::Builtin(b)) => a == b,
            (Type::Mapped(a), Type::Mapped(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Builtin(t) => write!(f, "Type::Builtin({})", t.name()),
            Type::Mapped(m) => write!(
                f,
                "Type::Mapped({} -> {})",
                m.converter().class_name(),
                m.underlying_kind()
            ),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<FFI::Type::{}>", self.name())
    }
}
