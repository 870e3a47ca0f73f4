//! Native type descriptors for a dynamic-language runtime.
//!
//! This crate lets script-level code describe, read, and write values that
//! live in raw native memory. It re-exports the descriptor model from
//! `nativetype-core`, the canonical registry from `nativetype-registry`, and
//! adds [`FfiContext`], the facade the interpreter talks to.
//!
//! # Example
//!
//! ```
//! use nativetype::{FfiContext, MemoryBuffer, Value};
//!
//! let ffi = FfiContext::new();
//! let int32 = ffi.resolve("FFI::Type::INT32").unwrap();
//! let mut buffer = MemoryBuffer::new(int32.size());
//! unsafe {
//!     let _ = int32.write(buffer.as_mut_ptr(), &Value::Integer(42)).unwrap();
//!     assert_eq!(int32.read(buffer.as_ptr()).unwrap(), Value::Integer(42));
//! }
//! ```

mod context;
pub use context::FfiContext;

pub use nativetype_core::{
    BuiltinType, Capability, ConverterCaps, ConverterObject, DataConverter, FfiConfig, FfiError,
    FfiProperty, FfiResult, MappedType, MarshalPolicy, MemoryBuffer, NativeAllocation, Pointer,
    QualifiedName, Type, TypeHash, TypeIndex, TypeKind, Value,
};
pub use nativetype_registry::{ALIASES, TypeRegistry};
