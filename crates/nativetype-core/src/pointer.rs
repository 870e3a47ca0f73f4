//! Script-visible wrapper around a native address.

use std::fmt;

/// A native address as seen by script code.
///
/// The address is opaque data: nothing in this crate dereferences it.
/// Equality is by address value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer {
    address: usize,
}

impl Pointer {
    /// The null address.
    pub const NULL: Pointer = Pointer { address: 0 };

    /// Wrap an address verbatim.
    pub const fn new(address: usize) -> Self {
        Self { address }
    }

    /// Create a null pointer.
    pub const fn null() -> Self {
        Self::NULL
    }

    /// Get the wrapped address.
    pub const fn address(&self) -> usize {
        self.address
    }

    /// Check whether this is the null address.
    pub const fn is_null(&self) -> bool {
        self.address == 0
    }
}

impl From<usize> for Pointer {
    fn from(address: usize) -> Self {
        Self::new(address)
    }
}

impl<T> From<*const T> for Pointer {
    fn from(ptr: *const T) -> Self {
        Self::new(ptr as usize)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<FFI::Pointer address={:#x}>", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_address_verbatim() {
        assert_eq!(Pointer::new(12).address(), 12);
        assert_eq!(Pointer::from(15usize).address(), 15);
        // No alignment or reachability checks
        assert_eq!(Pointer::new(0x3).address(), 0x3);
    }

    #[test]
    fn equality_is_by_address() {
        assert_eq!(Pointer::new(12), Pointer::new(12));
        assert_ne!(Pointer::new(12), Pointer::new(15));
    }

    #[test]
    fn null_pointer() {
        assert!(Pointer::null().is_null());
        assert!(Pointer::default().is_null());
        assert!(!Pointer::new(1).is_null());
    }

    #[test]
    fn from_raw_pointer() {
        let value = 7u32;
        let ptr = Pointer::from(&value as *const u32);
        assert_eq!(ptr.address(), &value as *const u32 as usize);
    }

    #[test]
    fn display() {
        assert_eq!(
            Pointer::new(255).to_string(),
            "#<FFI::Pointer address=0xff>"
        );
    }
}
