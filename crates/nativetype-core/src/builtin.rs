//! Built-in native type descriptors.
//!
//! A [`BuiltinType`] knows how to move a [`Value`] in and out of a single
//! native slot of its kind:
//!
//! | Kind                 | Slot contents                             |
//! |----------------------|-------------------------------------------|
//! | INT*/UINT*/LONG/ULONG| two's complement / plain native integer   |
//! | FLOAT32/FLOAT64      | IEEE-754 binary32 / binary64              |
//! | BOOL                 | one unsigned byte, nonzero is true        |
//! | POINTER              | machine-word address                      |
//! | STRING               | machine-word address of a C string        |
//! | VOID                 | nothing; read and write fail              |
//!
//! # String slots
//!
//! STRING is the one kind whose access goes through two memory regions.
//! The slot holds an address, and the characters live at that address:
//!
//! ```text
//!   slot (size_of::<usize>())        secondary region
//!  ┌──────────────────────────┐     ┌───┬───┬───┬───┬────┐
//!  │ address ─────────────────┼────▶│ t │ e │ s │ t │ \0 │
//!  └──────────────────────────┘     └───┴───┴───┴───┴────┘
//! ```
//!
//! A read dereferences the address and copies bytes up to the terminator.
//! A write allocates the secondary region and returns it to the caller as a
//! [`NativeAllocation`]; this crate never frees it behind the caller's back.

use std::ffi::{CStr, CString, c_char, c_long, c_ulong};

use crate::memory::{load, store};
use crate::{FfiError, FfiResult, MarshalPolicy, NativeAllocation, Pointer, TypeKind, Value};

/// Descriptor for one of the built-in native kinds.
///
/// Equality is by kind: two independently created descriptors of the same
/// kind compare equal.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinType {
    kind: TypeKind,
    size: usize,
    policy: MarshalPolicy,
}

impl BuiltinType {
    /// Create a descriptor with the default marshaling policy.
    pub fn new(kind: TypeKind) -> FfiResult<Self> {
        Self::with_policy(kind, MarshalPolicy::default())
    }

    /// Create a descriptor with an explicit marshaling policy.
    ///
    /// Fails for [`TypeKind::Mapped`], which has no built-in layout.
    pub fn with_policy(kind: TypeKind, policy: MarshalPolicy) -> FfiResult<Self> {
        let size = kind
            .fixed_size()
            .ok_or(FfiError::NoBuiltinLayout { kind })?;
        Ok(Self { kind, size, policy })
    }

    /// One descriptor per entry of [`TypeKind::BUILTINS`], in index order.
    pub fn catalog(policy: MarshalPolicy) -> [BuiltinType; 16] {
        TypeKind::BUILTINS.map(|kind| Self {
            kind,
            size: kind.slot_size(),
            policy,
        })
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Native byte size of the slot.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn policy(&self) -> MarshalPolicy {
        self.policy
    }

    /// Decode the value stored in `buffer`.
    ///
    /// # Safety
    ///
    /// `buffer` must be valid for reads of [`size`](Self::size) bytes. For
    /// STRING, the slot must hold null or the address of a readable
    /// NUL-terminated byte sequence.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub unsafe fn read(&self, buffer: *const u8) -> FfiResult<Value> {
        let value = unsafe {
            match self.kind {
                TypeKind::Void => return Err(FfiError::VoidAccess { op: "read" }),
                TypeKind::Int8 => Value::Integer(load::<i8>(buffer) as i128),
                TypeKind::Uint8 => Value::Integer(load::<u8>(buffer) as i128),
                TypeKind::Int16 => Value::Integer(load::<i16>(buffer) as i128),
                TypeKind::Uint16 => Value::Integer(load::<u16>(buffer) as i128),
                TypeKind::Int32 => Value::Integer(load::<i32>(buffer) as i128),
                TypeKind::Uint32 => Value::Integer(load::<u32>(buffer) as i128),
                TypeKind::Int64 => Value::Integer(load::<i64>(buffer) as i128),
                TypeKind::Uint64 => Value::Integer(load::<u64>(buffer) as i128),
                TypeKind::Long => Value::Integer(load::<c_long>(buffer) as i128),
                TypeKind::Ulong => Value::Integer(load::<c_ulong>(buffer) as i128),
                TypeKind::Float32 => Value::Float(load::<f32>(buffer) as f64),
                TypeKind::Float64 => Value::Float(load::<f64>(buffer)),
                TypeKind::Bool => Value::Bool(load::<u8>(buffer) != 0),
                TypeKind::Pointer => Value::Pointer(Pointer::new(load::<usize>(buffer))),
                TypeKind::String => self.read_string(buffer)?,
                TypeKind::Mapped => unreachable!("built-in descriptor of kind MAPPED"),
            }
        };
        Ok(value)
    }

    /// Encode `value` into `buffer`.
    ///
    /// The returned allocation is empty for every kind but STRING.
    ///
    /// Integers outside the slot's range fail unless the policy wraps.
    /// Floats are rounded to the slot's precision, and integers written to
    /// a float slot are rounded to the nearest representable value. A
    /// finite float that would become infinite in a FLOAT32 slot fails
    /// with [`FfiError::FloatOutOfRange`]; infinities and NaN pass through.
    ///
    /// # Safety
    ///
    /// `buffer` must be valid for writes of [`size`](Self::size) bytes.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub unsafe fn write(&self, buffer: *mut u8, value: &Value) -> FfiResult<NativeAllocation> {
        match self.kind {
            TypeKind::Void => Err(FfiError::VoidAccess { op: "write" }),
            kind if kind.is_integer() => {
                let v = self.checked_integer(value)?;
                unsafe { self.store_integer(buffer, v) };
                Ok(NativeAllocation::none())
            }
            TypeKind::Float32 => {
                let v = self.float_operand(value)?;
                let narrowed = v as f32;
                if v.is_finite() && narrowed.is_infinite() {
                    return Err(FfiError::FloatOutOfRange {
                        kind: self.kind,
                        value: v,
                    });
                }
                unsafe { store(buffer, narrowed) };
                Ok(NativeAllocation::none())
            }
            TypeKind::Float64 => {
                let v = self.float_operand(value)?;
                unsafe { store(buffer, v) };
                Ok(NativeAllocation::none())
            }
            TypeKind::Bool => {
                unsafe { store(buffer, value.is_truthy() as u8) };
                Ok(NativeAllocation::none())
            }
            TypeKind::Pointer => {
                let address = match value {
                    Value::Pointer(p) => p.address(),
                    Value::Nil => 0,
                    other => return Err(self.mismatch("pointer or nil", other)),
                };
                unsafe { store(buffer, address) };
                Ok(NativeAllocation::none())
            }
            TypeKind::String => unsafe { self.write_string(buffer, value) },
            _ => unreachable!("built-in descriptor of kind {}", self.kind),
        }
    }

    /// Second-level read: follow the slot's address to the characters.
    unsafe fn read_string(&self, buffer: *const u8) -> FfiResult<Value> {
        let address = unsafe { load::<usize>(buffer) };
        if address == 0 {
            return if self.policy.null_string_is_nil {
                Ok(Value::Nil)
            } else {
                Err(FfiError::NullString)
            };
        }
        let chars = unsafe { CStr::from_ptr(address as *const c_char) };
        Ok(Value::String(chars.to_string_lossy().into_owned()))
    }

    /// Second-level write: copy the characters out, store their address.
    unsafe fn write_string(&self, buffer: *mut u8, value: &Value) -> FfiResult<NativeAllocation> {
        let text = match value {
            Value::String(s) | Value::Symbol(s) => s.as_str(),
            Value::Nil => {
                unsafe { store(buffer, 0usize) };
                return Ok(NativeAllocation::none());
            }
            other => return Err(self.mismatch("string", other)),
        };
        let chars = CString::new(text).map_err(|e| FfiError::InteriorNul {
            position: e.nul_position(),
        })?;
        unsafe { store(buffer, chars.as_ptr() as usize) };
        Ok(NativeAllocation::string(chars))
    }

    fn checked_integer(&self, value: &Value) -> FfiResult<i128> {
        let v = match value {
            Value::Integer(v) => *v,
            other => return Err(self.mismatch("integer", other)),
        };
        if !self.policy.wrap_integers {
            // Integer kinds always have a range
            let (min, max) = self.kind.integer_range().unwrap_or((i128::MIN, i128::MAX));
            if v < min || v > max {
                return Err(FfiError::OutOfRange {
                    kind: self.kind,
                    value: v,
                });
            }
        }
        Ok(v)
    }

    /// `as` truncates to the slot width, which is the wrapping behaviour.
    unsafe fn store_integer(&self, buffer: *mut u8, v: i128) {
        unsafe {
            match self.kind {
                TypeKind::Int8 => store(buffer, v as i8),
                TypeKind::Uint8 => store(buffer, v as u8),
                TypeKind::Int16 => store(buffer, v as i16),
                TypeKind::Uint16 => store(buffer, v as u16),
                TypeKind::Int32 => store(buffer, v as i32),
                TypeKind::Uint32 => store(buffer, v as u32),
                TypeKind::Int64 => store(buffer, v as i64),
                TypeKind::Uint64 => store(buffer, v as u64),
                TypeKind::Long => store(buffer, v as c_long),
                TypeKind::Ulong => store(buffer, v as c_ulong),
                _ => unreachable!("{} is not an integer kind", self.kind),
            }
        }
    }

    fn float_operand(&self, value: &Value) -> FfiResult<f64> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => Err(self.mismatch("float", other)),
        }
    }

    fn mismatch(&self, expected: &'static str, found: &Value) -> FfiError {
        FfiError::TypeMismatch {
            kind: self.kind,
            expected,
            found: found.type_name(),
        }
    }
}

impl PartialEq for BuiltinType {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for BuiltinType {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBuffer;

    fn builtin(kind: TypeKind) -> BuiltinType {
        BuiltinType::new(kind).unwrap()
    }

    fn round_trip(ty: &BuiltinType, value: Value) -> Value {
        let mut buffer = MemoryBuffer::new(ty.size());
        unsafe {
            let _alloc = ty.write(buffer.as_mut_ptr(), &value).unwrap();
            ty.read(buffer.as_ptr()).unwrap()
        }
    }

    #[test]
    fn sizes_match_platform_layout() {
        assert_eq!(builtin(TypeKind::Int8).size(), 1);
        assert_eq!(builtin(TypeKind::Int16).size(), 2);
        assert_eq!(builtin(TypeKind::Int32).size(), 4);
        assert_eq!(builtin(TypeKind::Int64).size(), 8);
        assert_eq!(builtin(TypeKind::Float32).size(), 4);
        assert_eq!(builtin(TypeKind::Float64).size(), 8);
        assert_eq!(builtin(TypeKind::Void).size(), 0);
        assert_eq!(builtin(TypeKind::Long).size(), size_of::<c_long>());
        assert_eq!(builtin(TypeKind::Pointer).size(), size_of::<*const u8>());
    }

    #[test]
    fn mapped_kind_is_not_builtin() {
        let err = BuiltinType::new(TypeKind::Mapped).unwrap_err();
        assert_eq!(
            err,
            FfiError::NoBuiltinLayout {
                kind: TypeKind::Mapped
            }
        );
        assert_eq!(err.to_string(), "MAPPED has no built-in layout");
    }

    #[test]
    fn catalog_is_in_index_order() {
        let catalog = BuiltinType::catalog(MarshalPolicy::default());
        for (position, ty) in catalog.iter().enumerate() {
            assert_eq!(ty.kind().index() as usize, position);
            assert_eq!(Some(ty.size()), ty.kind().fixed_size());
            assert_eq!(*ty, builtin(ty.kind()));
        }
    }

    #[test]
    fn int8_round_trip_exhaustive() {
        let ty = builtin(TypeKind::Int8);
        for v in i8::MIN..=i8::MAX {
            assert_eq!(round_trip(&ty, Value::from(v)), Value::from(v));
        }
    }

    #[test]
    fn uint8_round_trip_exhaustive() {
        let ty = builtin(TypeKind::Uint8);
        for v in u8::MIN..=u8::MAX {
            assert_eq!(round_trip(&ty, Value::from(v)), Value::from(v));
        }
    }

    #[test]
    fn integer_boundaries() {
        for kind in TypeKind::BUILTINS.into_iter().filter(|k| k.is_integer()) {
            let ty = builtin(kind);
            let (min, max) = kind.integer_range().unwrap();
            for v in [min, min + 1, 0, max - 1, max] {
                assert_eq!(round_trip(&ty, Value::Integer(v)), Value::Integer(v), "{kind}");
            }
        }
    }

    #[test]
    fn sampled_wide_integers() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let i64_ty = builtin(TypeKind::Int64);
        let u64_ty = builtin(TypeKind::Uint64);
        let i16_ty = builtin(TypeKind::Int16);
        for _ in 0..1000 {
            let a = rng.i64(..);
            let b = rng.u64(..);
            let c = rng.i16(..);
            assert_eq!(round_trip(&i64_ty, Value::from(a)), Value::from(a));
            assert_eq!(round_trip(&u64_ty, Value::from(b)), Value::from(b));
            assert_eq!(round_trip(&i16_ty, Value::from(c)), Value::from(c));
        }
    }

    #[test]
    fn integer_slot_layout_is_native_endian() {
        let ty = builtin(TypeKind::Int32);
        let mut buffer = MemoryBuffer::new(4);
        unsafe {
            let _ = ty.write(buffer.as_mut_ptr(), &Value::from(-2i32)).unwrap();
        }
        assert_eq!(buffer.as_bytes(), (-2i32).to_ne_bytes());
    }

    #[test]
    fn write_out_of_range_fails() {
        let ty = builtin(TypeKind::Uint8);
        let mut buffer = MemoryBuffer::new(1);
        let err = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Integer(256)) }.unwrap_err();
        assert_eq!(
            err,
            FfiError::OutOfRange {
                kind: TypeKind::Uint8,
                value: 256
            }
        );
        let err = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Integer(-1)) }.unwrap_err();
        assert!(matches!(err, FfiError::OutOfRange { value: -1, .. }));
    }

    #[test]
    fn wrapping_policy_truncates() {
        let policy = MarshalPolicy {
            wrap_integers: true,
            ..MarshalPolicy::default()
        };
        let ty = BuiltinType::with_policy(TypeKind::Uint8, policy).unwrap();
        assert_eq!(round_trip(&ty, Value::Integer(256)), Value::Integer(0));
        assert_eq!(round_trip(&ty, Value::Integer(-1)), Value::Integer(255));

        let ty = BuiltinType::with_policy(TypeKind::Int8, policy).unwrap();
        assert_eq!(round_trip(&ty, Value::Integer(200)), Value::Integer(-56));
    }

    #[test]
    fn integer_write_rejects_other_shapes() {
        let ty = builtin(TypeKind::Int32);
        let mut buffer = MemoryBuffer::new(4);
        let err = unsafe { ty.write(buffer.as_mut_ptr(), &Value::from("1")) }.unwrap_err();
        assert_eq!(
            err,
            FfiError::TypeMismatch {
                kind: TypeKind::Int32,
                expected: "integer",
                found: "string"
            }
        );
    }

    #[test]
    fn reads_float32() {
        let ty = builtin(TypeKind::Float32);
        let mut buffer = MemoryBuffer::new(4);
        buffer.put(0, 1.25f32);
        assert_eq!(unsafe { ty.read(buffer.as_ptr()) }.unwrap(), Value::Float(1.25));
    }

    #[test]
    fn reads_float64() {
        let ty = builtin(TypeKind::Float64);
        let mut buffer = MemoryBuffer::new(8);
        buffer.put(0, 1e-10f64);
        assert_eq!(unsafe { ty.read(buffer.as_ptr()) }.unwrap(), Value::Float(1e-10));
    }

    #[test]
    fn writes_float32() {
        let ty = builtin(TypeKind::Float32);
        let mut buffer = MemoryBuffer::new(4);
        let _ = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Float(3.75)) }.unwrap();
        assert_eq!(buffer.get::<f32>(0), 3.75);
    }

    #[test]
    fn writes_float64() {
        let ty = builtin(TypeKind::Float64);
        let mut buffer = MemoryBuffer::new(8);
        let _ = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Float(1e-12)) }.unwrap();
        assert_eq!(buffer.get::<f64>(0), 1e-12);
    }

    #[test]
    fn float32_overflow_fails() {
        let ty = builtin(TypeKind::Float32);
        let mut buffer = MemoryBuffer::new(ty.size());
        let err = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Float(1e300)) }.unwrap_err();
        assert_eq!(
            err,
            FfiError::FloatOutOfRange {
                kind: TypeKind::Float32,
                value: 1e300
            }
        );
        assert_eq!(err.class_name(), "RangeError");

        let value = round_trip(&ty, Value::Float(f64::INFINITY));
        assert_eq!(value, Value::Float(f64::INFINITY));
        let value = round_trip(&ty, Value::Float(f64::NAN));
        assert!(value.as_float().is_some_and(f64::is_nan));
    }

    #[test]
    fn float64_keeps_extremes() {
        let ty = builtin(TypeKind::Float64);
        assert_eq!(round_trip(&ty, Value::Float(f64::MAX)), Value::Float(f64::MAX));
    }

    #[test]
    fn float_write_accepts_integers() {
        let ty = builtin(TypeKind::Float64);
        assert_eq!(round_trip(&ty, Value::Integer(3)), Value::Float(3.0));
    }

    #[test]
    fn bool_read_maps_nonzero_to_true() {
        let ty = builtin(TypeKind::Bool);
        let mut buffer = MemoryBuffer::new(1);
        for raw in 0u8..=255 {
            buffer.put(0, raw);
            let value = unsafe { ty.read(buffer.as_ptr()) }.unwrap();
            assert_eq!(value, Value::Bool(raw != 0));
        }
    }

    #[test]
    fn bool_write_uses_truthiness() {
        let ty = builtin(TypeKind::Bool);
        assert_eq!(round_trip(&ty, Value::Bool(true)), Value::Bool(true));
        assert_eq!(round_trip(&ty, Value::Bool(false)), Value::Bool(false));
        assert_eq!(round_trip(&ty, Value::Nil), Value::Bool(false));
        assert_eq!(round_trip(&ty, Value::Integer(0)), Value::Bool(true));
    }

    #[test]
    fn reads_pointer() {
        let ty = builtin(TypeKind::Pointer);
        let mut buffer = MemoryBuffer::new(ty.size());
        buffer.put(0, 12usize);
        let value = unsafe { ty.read(buffer.as_ptr()) }.unwrap();
        assert_eq!(value.as_pointer().map(|p| p.address()), Some(12));
    }

    #[test]
    fn writes_pointer() {
        let ty = builtin(TypeKind::Pointer);
        let mut buffer = MemoryBuffer::new(ty.size());
        let _ = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Pointer(Pointer::new(15))) }
            .unwrap();
        assert_eq!(buffer.get::<usize>(0), 15);

        let _ = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Nil) }.unwrap();
        assert_eq!(buffer.get::<usize>(0), 0);
    }

    #[test]
    fn pointer_round_trip() {
        let ty = builtin(TypeKind::Pointer);
        assert_eq!(
            round_trip(&ty, Value::Pointer(Pointer::new(15))),
            Value::Pointer(Pointer::new(15))
        );

        let mut buffer = MemoryBuffer::new(ty.size());
        buffer.put(0, 12usize);
        let value = unsafe { ty.read(buffer.as_ptr()) }.unwrap();
        assert_eq!(value.as_pointer(), Some(Pointer::new(12)));
    }

    #[test]
    fn reads_string_through_slot_address() {
        let ty = builtin(TypeKind::String);
        let chars = CString::new("test").unwrap();
        let mut buffer = MemoryBuffer::new(ty.size());
        buffer.put(0, chars.as_ptr() as usize);
        let value = unsafe { ty.read(buffer.as_ptr()) }.unwrap();
        assert_eq!(value, Value::from("test"));
    }

    #[test]
    fn writes_string_to_secondary_allocation() {
        let ty = builtin(TypeKind::String);
        let mut buffer = MemoryBuffer::new(ty.size());
        let alloc = unsafe { ty.write(buffer.as_mut_ptr(), &Value::from("test")) }.unwrap();
        let address = buffer.get::<usize>(0);
        assert_eq!(address, alloc.as_ptr() as usize);
        let chars = unsafe { CStr::from_ptr(address as *const c_char) };
        assert_eq!(chars.to_bytes_with_nul(), b"test\0");
    }

    #[test]
    fn string_round_trip() {
        let ty = builtin(TypeKind::String);
        assert_eq!(round_trip(&ty, Value::from("test")), Value::from("test"));
        assert_eq!(round_trip(&ty, Value::from("")), Value::from(""));
        assert_eq!(round_trip(&ty, Value::symbol("sym")), Value::from("sym"));
    }

    #[test]
    fn string_with_interior_nul_fails() {
        let ty = builtin(TypeKind::String);
        let mut buffer = MemoryBuffer::new(ty.size());
        let err = unsafe { ty.write(buffer.as_mut_ptr(), &Value::from("te\0st")) }.unwrap_err();
        assert_eq!(err, FfiError::InteriorNul { position: 2 });
    }

    #[test]
    fn null_string_slot() {
        let ty = builtin(TypeKind::String);
        let buffer = MemoryBuffer::new(ty.size());
        assert_eq!(unsafe { ty.read(buffer.as_ptr()) }.unwrap(), Value::Nil);

        let strict = MarshalPolicy {
            null_string_is_nil: false,
            ..MarshalPolicy::default()
        };
        let ty = BuiltinType::with_policy(TypeKind::String, strict).unwrap();
        assert_eq!(
            unsafe { ty.read(buffer.as_ptr()) }.unwrap_err(),
            FfiError::NullString
        );
    }

    #[test]
    fn nil_string_writes_null() {
        let ty = builtin(TypeKind::String);
        let mut buffer = MemoryBuffer::new(ty.size());
        buffer.put(0, usize::MAX);
        let alloc = unsafe { ty.write(buffer.as_mut_ptr(), &Value::Nil) }.unwrap();
        assert!(alloc.is_empty());
        assert_eq!(buffer.get::<usize>(0), 0);
    }

    #[test]
    fn non_utf8_string_decodes_lossily() {
        let ty = builtin(TypeKind::String);
        let bytes: &[u8] = b"ab\xffc\0";
        let mut buffer = MemoryBuffer::new(ty.size());
        buffer.put(0, bytes.as_ptr() as usize);
        let value = unsafe { ty.read(buffer.as_ptr()) }.unwrap();
        assert_eq!(value, Value::from("ab\u{fffd}c"));
    }

    #[test]
    fn void_read_and_write_fail() {
        let ty = builtin(TypeKind::Void);
        let mut buffer = MemoryBuffer::new(8);
        assert_eq!(
            unsafe { ty.read(buffer.as_ptr()) }.unwrap_err(),
            FfiError::VoidAccess { op: "read" }
        );
        assert_eq!(
            unsafe { ty.write(buffer.as_mut_ptr(), &Value::Nil) }.unwrap_err(),
            FfiError::VoidAccess { op: "write" }
        );
    }

    #[test]
    fn equality_is_by_kind() {
        assert_eq!(builtin(TypeKind::Void), builtin(TypeKind::Void));
        assert_ne!(builtin(TypeKind::Int8), builtin(TypeKind::Uint8));
        let wrapping = MarshalPolicy {
            wrap_integers: true,
            ..MarshalPolicy::default()
        };
        assert_eq!(
            BuiltinType::with_policy(TypeKind::Int8, wrapping).unwrap(),
            builtin(TypeKind::Int8)
        );
    }
}
