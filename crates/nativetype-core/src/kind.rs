//! Native type kinds and their dense type indices.

use std::ffi::{c_long, c_ulong};
use std::fmt;
use std::mem::size_of;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Dense integer index of a type kind.
///
/// This is the discriminant of [`TypeKind`] and the key the registry uses
/// for index lookups.
pub type TypeIndex = u8;

/// Tag for every kind of native type descriptor.
///
/// The discriminant doubles as the type index, so the order here is part of
/// the public contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum TypeKind {
    Void = 0,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Long,
    Ulong,
    Float32,
    Float64,
    Pointer,
    Bool,
    String,
    Mapped,
}

impl TypeKind {
    /// Every kind that has a canonical built-in descriptor, in index order.
    pub const BUILTINS: [TypeKind; 16] = [
        TypeKind::Void,
        TypeKind::Int8,
        TypeKind::Uint8,
        TypeKind::Int16,
        TypeKind::Uint16,
        TypeKind::Int32,
        TypeKind::Uint32,
        TypeKind::Int64,
        TypeKind::Uint64,
        TypeKind::Long,
        TypeKind::Ulong,
        TypeKind::Float32,
        TypeKind::Float64,
        TypeKind::Pointer,
        TypeKind::Bool,
        TypeKind::String,
    ];

    /// Get the stable symbolic name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            TypeKind::Void => "VOID",
            TypeKind::Int8 => "INT8",
            TypeKind::Uint8 => "UINT8",
            TypeKind::Int16 => "INT16",
            TypeKind::Uint16 => "UINT16",
            TypeKind::Int32 => "INT32",
            TypeKind::Uint32 => "UINT32",
            TypeKind::Int64 => "INT64",
            TypeKind::Uint64 => "UINT64",
            TypeKind::Long => "LONG",
            TypeKind::Ulong => "ULONG",
            TypeKind::Float32 => "FLOAT32",
            TypeKind::Float64 => "FLOAT64",
            TypeKind::Pointer => "POINTER",
            TypeKind::Bool => "BOOL",
            TypeKind::String => "STRING",
            TypeKind::Mapped => "MAPPED",
        }
    }

    /// Look up a kind by its canonical symbolic name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::BUILTINS
            .iter()
            .copied()
            .chain(std::iter::once(TypeKind::Mapped))
            .find(|kind| kind.name() == name)
    }

    /// Get the dense type index of this kind.
    #[inline]
    pub fn index(self) -> TypeIndex {
        self.into()
    }

    /// Get the kind for a type index, if one exists.
    pub fn from_index(index: usize) -> Option<Self> {
        let index = TypeIndex::try_from(index).ok()?;
        TypeKind::try_from(index).ok()
    }

    /// Native byte size of this kind on the current platform.
    ///
    /// Returns `None` for [`TypeKind::Mapped`]: a mapped type takes its
    /// size from the descriptor its converter reports.
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            TypeKind::Mapped => None,
            kind => Some(kind.slot_size()),
        }
    }

    /// Slot width for the built-in kinds. MAPPED has no slot of its own.
    pub(crate) const fn slot_size(self) -> usize {
        match self {
            TypeKind::Void | TypeKind::Mapped => 0,
            TypeKind::Int8 | TypeKind::Uint8 => 1,
            TypeKind::Int16 | TypeKind::Uint16 => 2,
            TypeKind::Int32 | TypeKind::Uint32 | TypeKind::Float32 => 4,
            TypeKind::Int64 | TypeKind::Uint64 | TypeKind::Float64 => 8,
            TypeKind::Long => size_of::<c_long>(),
            TypeKind::Ulong => size_of::<c_ulong>(),
            TypeKind::Pointer | TypeKind::String => size_of::<usize>(),
            TypeKind::Bool => size_of::<bool>(),
        }
    }

    /// Check if this is one of the fixed-width integer kinds.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            TypeKind::Int8
                | TypeKind::Uint8
                | TypeKind::Int16
                | TypeKind::Uint16
                | TypeKind::Int32
                | TypeKind::Uint32
                | TypeKind::Int64
                | TypeKind::Uint64
                | TypeKind::Long
                | TypeKind::Ulong
        )
    }

    /// Check if this is a signed integer kind.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            TypeKind::Int8 | TypeKind::Int16 | TypeKind::Int32 | TypeKind::Int64 | TypeKind::Long
        )
    }

    /// Check if this is a floating point kind.
    pub const fn is_float(self) -> bool {
        matches!(self, TypeKind::Float32 | TypeKind::Float64)
    }

    /// Inclusive value range of an integer kind.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        if !self.is_integer() {
            return None;
        }
        let bits = self.fixed_size()? as u32 * 8;
        if self.is_signed() {
            let half = 1i128 << (bits - 1);
            Some((-half, half - 1))
        } else {
            Some((0, (1i128 << bits) - 1))
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
