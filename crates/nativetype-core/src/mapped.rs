//! Mapped types: descriptors whose marshaling is delegated to a converter.
//!
//! A [`MappedType`] pairs a user [`DataConverter`] with the descriptor the
//! converter reports from `native_type`. The underlying descriptor moves the
//! bytes; the converter maps values:
//!
//! ```text
//!   write: value ── to_native ──▶ native value ── underlying.write ──▶ slot
//!   read:  slot ── underlying.read ──▶ native value ── from_native ──▶ value
//! ```
//!
//! Construction checks the contract in a fixed order and stops at the
//! first failure, so no half-validated mapped type can exist.

use std::sync::Arc;

use crate::converter::Capability;
use crate::{
    DataConverter, FfiError, FfiResult, NativeAllocation, Type, TypeIndex, TypeKind, Value,
};

/// A descriptor that routes marshaling through a data converter.
pub struct MappedType {
    converter: Arc<dyn DataConverter>,
    native: Type,
}

impl MappedType {
    /// Validate `converter` and wrap it.
    ///
    /// Checks, in order:
    /// 1. `native_type` is provided;
    /// 2. `native_type()` returns a type descriptor;
    /// 3. `to_native` is provided;
    /// 4. `from_native` is provided.
    ///
    /// Errors raised by `native_type()` itself are returned unchanged.
    pub fn new(converter: Arc<dyn DataConverter>) -> FfiResult<Self> {
        let class_name = converter.class_name().to_string();

        let result = validate(converter.as_ref());

        match result {
            Ok(native) => {
                log::trace!(
                    "mapped type for {} over {} ({} bytes)",
                    class_name,
                    native.underlying_kind(),
                    native.size()
                );
                Ok(Self { converter, native })
            }
            Err(err) => {
                log::debug!("rejected data converter {}: {}", class_name, err);
                Err(err)
            }
        }
    }

    /// Build a mapped type from a script value.
    ///
    /// Anything that is not a converter object has no `native_type` method.
    pub fn from_value(value: &Value) -> FfiResult<Self> {
        match value {
            Value::Converter(converter) => Self::new(Arc::clone(converter)),
            _ => Err(Capability::NativeType.missing()),
        }
    }

    pub fn converter(&self) -> &Arc<dyn DataConverter> {
        &self.converter
    }

    /// The descriptor reported by the converter's `native_type`.
    pub fn native_type(&self) -> &Type {
        &self.native
    }

    /// Kind of the native slot, looking through nested mapped types.
    pub fn underlying_kind(&self) -> TypeKind {
        self.native.underlying_kind()
    }

    /// Type index derived from the converter's `native_type`.
    pub fn type_index(&self) -> TypeIndex {
        self.underlying_kind().index()
    }

    pub fn size(&self) -> usize {
        self.native.size()
    }

    /// Forward to the converter's `to_native`.
    pub fn to_native(&self, value: Value) -> FfiResult<Value> {
        self.converter.to_native(value)
    }

    /// Forward to the converter's `from_native`.
    pub fn from_native(&self, value: Value) -> FfiResult<Value> {
        self.converter.from_native(value)
    }

    /// Read through the underlying descriptor, then `from_native`.
    ///
    /// # Safety
    ///
    /// Same contract as the underlying descriptor's `read`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub unsafe fn read(&self, buffer: *const u8) -> FfiResult<Value> {
        let raw = unsafe { self.native.read(buffer)? };
        self.from_native(raw)
    }

    /// `to_native`, then write through the underlying descriptor.
    ///
    /// # Safety
    ///
    /// Same contract as the underlying descriptor's `write`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub unsafe fn write(&self, buffer: *mut u8, value: &Value) -> FfiResult<NativeAllocation> {
        let native = self.to_native(value.clone())?;
        unsafe { self.native.write(buffer, &native) }
    }
}

fn validate(converter: &dyn DataConverter) -> FfiResult<Type> {
    let caps = converter.capabilities();
    if !caps.contains(Capability::NativeType.flag()) {
        return Err(Capability::NativeType.missing());
    }
    let native = match converter.native_type()? {
        Value::Type(native) => native,
        other => {
            return Err(FfiError::InvalidNativeType {
                found: other.type_name(),
            });
        }
    };
    for capability in [Capability::ToNative, Capability::FromNative] {
        if !caps.contains(capability.flag()) {
            return Err(capability.missing());
        }
    }
    Ok(native)
}

/// Equal when both map the same native kind through the same converter.
impl PartialEq for MappedType {
    fn eq(&self, other: &Self) -> bool {
        self.underlying_kind() == other.underlying_kind()
            && Arc::ptr_eq(&self.converter, &other.converter)
    }
}

impl std::fmt::Debug for MappedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedType")
            .field("converter", &self.converter.class_name())
            .field("native", &self.native)
            .finish()
    }
}
