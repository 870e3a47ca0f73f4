//! Core of the native type layer.
//!
//! This crate describes how script values are laid out in raw native memory.
//! It includes:
//! - Type kinds and their dense type indices ([`TypeKind`])
//! - Built-in descriptors for fixed-width integers, floats, booleans,
//!   pointers, C strings and void ([`BuiltinType`])
//! - Mapped descriptors that delegate marshaling to a user
//!   [`DataConverter`] ([`MappedType`])
//! - The polymorphic descriptor handed to call-marshaling code ([`Type`])
//! - Script-level values ([`Value`], [`Pointer`]) and errors ([`FfiError`])
//!
//! # Example
//!
//! ```
//! use nativetype_core::{BuiltinType, MemoryBuffer, TypeKind, Value};
//!
//! let int16 = BuiltinType::new(TypeKind::Int16).unwrap();
//! let mut buffer = MemoryBuffer::new(int16.size());
//! unsafe {
//!     let _ = int16.write(buffer.as_mut_ptr(), &Value::Integer(-7)).unwrap();
//!     assert_eq!(int16.read(buffer.as_ptr()).unwrap(), Value::Integer(-7));
//! }
//! ```

mod builtin;
mod config;
mod converter;
mod descriptor;
mod error;
mod kind;
mod mapped;
mod memory;
mod pointer;
mod qualified_name;
mod type_hash;
mod value;

pub use builtin::BuiltinType;
pub use config::{FfiConfig, FfiProperty, MarshalPolicy};
pub use converter::{Capability, ConverterCaps, ConverterObject, DataConverter};
pub use descriptor::Type;
pub use error::{FfiError, FfiResult};
pub use kind::{TypeIndex, TypeKind};
pub use mapped::MappedType;
pub use memory::{MemoryBuffer, NativeAllocation};
pub use pointer::Pointer;
pub use qualified_name::QualifiedName;
pub use type_hash::TypeHash;
pub use value::Value;
