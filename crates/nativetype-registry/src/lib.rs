//! Type registry crate.
//!
//! Holds the one canonical descriptor per built-in native kind and resolves
//! names, aliases, indices and script constant paths to it.

mod registry;

pub use registry::{ALIASES, TypeRegistry};

// Re-export core types for convenience
pub use nativetype_core::{FfiConfig, FfiError, FfiProperty, Type, TypeIndex, TypeKind};
