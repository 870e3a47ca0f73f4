//! Raw memory helpers shared by the descriptors.
//!
//! Slots are accessed with unaligned native-endian loads and stores, so a
//! buffer handed in by the call-marshaling layer needs no particular
//! alignment.

use std::ffi::{CString, c_char};
use std::ptr;

/// Load a `T` from the start of `buffer`.
///
/// # Safety
///
/// `buffer` must be valid for reads of `size_of::<T>()` bytes.
#[inline]
pub(crate) unsafe fn load<T: Copy>(buffer: *const u8) -> T {
    unsafe { ptr::read_unaligned(buffer.cast::<T>()) }
}

/// Store a `T` at the start of `buffer`.
///
/// # Safety
///
/// `buffer` must be valid for writes of `size_of::<T>()` bytes.
#[inline]
pub(crate) unsafe fn store<T: Copy>(buffer: *mut u8, value: T) {
    unsafe { ptr::write_unaligned(buffer.cast::<T>(), value) }
}

/// Secondary memory created by a descriptor `write`.
///
/// Only STRING writes produce one: the slot receives the address of a
/// NUL-terminated copy of the string, and that copy lives exactly as long
/// as this value. Keep it alive for as long as native code may read the
/// slot, or hand ownership over with [`NativeAllocation::into_raw`].
#[derive(Debug, Default)]
#[must_use = "dropping the allocation frees memory the written slot points at"]
pub struct NativeAllocation {
    string: Option<CString>,
}

impl NativeAllocation {
    /// An allocation that owns nothing.
    pub const fn none() -> Self {
        Self { string: None }
    }

    pub(crate) fn string(string: CString) -> Self {
        Self {
            string: Some(string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.string.is_none()
    }

    /// Address written into the slot, or null.
    pub fn as_ptr(&self) -> *const c_char {
        self.string.as_ref().map_or(ptr::null(), |s| s.as_ptr())
    }

    /// Release ownership; the memory stays valid until [`free_raw`].
    ///
    /// Returns null when the allocation is empty.
    ///
    /// [`free_raw`]: NativeAllocation::free_raw
    pub fn into_raw(self) -> *mut c_char {
        self.string.map_or(ptr::null_mut(), CString::into_raw)
    }

    /// Free memory previously released with [`NativeAllocation::into_raw`].
    ///
    /// # Safety
    ///
    /// `raw` must be null or a pointer returned by `into_raw` that has not
    /// been freed yet.
    pub unsafe fn free_raw(raw: *mut c_char) {
        if !raw.is_null() {
            drop(unsafe { CString::from_raw(raw) });
        }
    }
}

/// A zeroed, heap-allocated native buffer.
///
/// Stands in for memory owned by the call-marshaling layer: a fixed-length
/// region whose pointer can be handed to descriptor `read`/`write`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBuffer {
    bytes: Box<[u8]>,
}

impl MemoryBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn fits<T>(&self, offset: usize) -> bool {
        offset
            .checked_add(size_of::<T>())
            .is_some_and(|end| end <= self.bytes.len())
    }

    /// Store a raw `T` at `offset`, bypassing any descriptor.
    ///
    /// # Panics
    ///
    /// If the value does not fit inside the buffer.
    pub fn put<T: Copy>(&mut self, offset: usize, value: T) {
        assert!(
            self.fits::<T>(offset),
            "store of {} bytes at {} overruns buffer of {}",
            size_of::<T>(),
            offset,
            self.bytes.len()
        );
        // SAFETY: bounds checked above
        unsafe { store(self.bytes.as_mut_ptr().add(offset), value) }
    }

    /// Load a raw `T` from `offset`, bypassing any descriptor.
    ///
    /// # Panics
    ///
    /// If the value does not fit inside the buffer.
    pub fn get<T: Copy>(&self, offset: usize) -> T {
        assert!(
            self.fits::<T>(offset),
            "load of {} bytes at {} overruns buffer of {}",
            size_of::<T>(),
            offset,
            self.bytes.len()
        );
        // SAFETY: bounds checked above
        unsafe { load(self.bytes.as_ptr().add(offset)) }
    }
}
