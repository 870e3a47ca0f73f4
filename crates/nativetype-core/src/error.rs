//! Error type for native type descriptors.
//!
//! ## Error Taxonomy
//!
//! ```text
//! FfiError
//! ├── UnknownTypeName / UnknownTypeIndex  - registry lookups
//! ├── MissingCapability                   - incomplete data converter
//! ├── InvalidNativeType                   - malformed data converter
//! ├── VoidAccess                          - read/write through VOID
//! ├── NoBuiltinLayout                     - built-in descriptor for MAPPED
//! ├── TypeMismatch / OutOfRange           - value does not fit the slot
//! ├── FloatOutOfRange                     - float overflows FLOAT32
//! ├── InteriorNul / NullString            - C string marshaling
//! └── Converter                           - raised by a data converter
//! ```
//!
//! Every variant maps onto a script-level exception class through
//! [`FfiError::class_name`], and its `Display` text is the message script
//! code sees.

use thiserror::Error;

use crate::TypeKind;
use crate::converter::Capability;

/// Errors raised by the native type layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FfiError {
    /// No built-in type has this name.
    #[error("no such type: {0}")]
    UnknownTypeName(String),

    /// No built-in type has this index.
    #[error("no such type index: {0}")]
    UnknownTypeIndex(usize),

    /// A data converter lacks one of its required operations.
    #[error("{capability} method not implemented")]
    MissingCapability { capability: Capability },

    /// A data converter's `native_type` returned something other than a type.
    #[error("native_type did not return instance of FFI::Type (got {found})")]
    InvalidNativeType { found: &'static str },

    /// MAPPED was asked for a built-in descriptor.
    #[error("{kind} has no built-in layout")]
    NoBuiltinLayout { kind: TypeKind },
    /// `read` or `write` was called on the VOID type.
    #[error("cannot {op} a value of type VOID")]
    VoidAccess { op: &'static str },

    /// The value's shape cannot be stored in a slot of this kind.
    #[error("wrong argument type {found} for {kind} (expected {expected})")]
    TypeMismatch {
        kind: TypeKind,
        expected: &'static str,
        found: &'static str,
    },

    /// An integer does not fit the slot's width.
    #[error("integer {value} too big to convert to {kind}")]
    OutOfRange { kind: TypeKind, value: i128 },

    /// A finite float becomes infinite when narrowed to the slot width.
    #[error("float {value} out of range for {kind}")]
    FloatOutOfRange { kind: TypeKind, value: f64 },
    /// A string destined for a C string slot contains a NUL byte.
    #[error("string contains null byte at position {position}")]
    InteriorNul { position: usize },

    /// A STRING slot held a null address and the policy forbids it.
    #[error("cannot read a string from a null pointer")]
    NullString,

    /// An error raised by user data-converter code.
    #[error("{message}")]
    Converter { class: String, message: String },
}

impl FfiError {
    /// Convenience constructor for errors raised by converter code.
    pub fn converter(class: impl Into<String>, message: impl Into<String>) -> Self {
        FfiError::Converter {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Name of the script-level exception class this error surfaces as.
    pub fn class_name(&self) -> &str {
        match self {
            FfiError::UnknownTypeName(_) | FfiError::UnknownTypeIndex(_) => "TypeError",
            FfiError::MissingCapability { .. } => "NoMethodError",
            FfiError::InvalidNativeType { .. } => "TypeError",
            FfiError::NoBuiltinLayout { .. } => "ArgumentError",
            FfiError::VoidAccess { .. } => "ArgumentError",
            FfiError::TypeMismatch { .. } => "TypeError",
            FfiError::OutOfRange { .. } | FfiError::FloatOutOfRange { .. } => "RangeError",
            FfiError::InteriorNul { .. } => "ArgumentError",
            FfiError::NullString => "NullPointerError",
            FfiError::Converter { class, .. } => class,
        }
    }
}

/// Result alias used throughout the crate.
pub type FfiResult<T> = Result<T, FfiError>;
