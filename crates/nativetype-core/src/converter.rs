//! The data-converter capability contract.
//!
//! A data converter is a user object that teaches a [`MappedType`] how to
//! turn script values into native values and back. It must provide three
//! operations:
//!
//! - `native_type` - the [`Type`] describing the native representation
//! - `to_native` - script value to native value
//! - `from_native` - native value to script value
//!
//! Which operations an object provides is declared up front through
//! [`DataConverter::capabilities`], so a mapped type can check the contract
//! before it ever calls into the object.
//!
//! [`MappedType`]: crate::MappedType
//! [`Type`]: crate::Type

use std::fmt;

use crate::{FfiError, FfiResult, Value};

bitflags::bitflags! {
    /// Set of operations a data converter provides.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConverterCaps: u8 {
        const NATIVE_TYPE = 0x01;
        const TO_NATIVE = 0x02;
        const FROM_NATIVE = 0x04;
    }
}

/// A single data-converter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    NativeType,
    ToNative,
    FromNative,
}

impl Capability {
    /// The order in which a mapped type verifies the contract.
    pub const CHECK_ORDER: [Capability; 3] = [
        Capability::NativeType,
        Capability::ToNative,
        Capability::FromNative,
    ];

    /// Script-visible method name.
    pub const fn method_name(self) -> &'static str {
        match self {
            Capability::NativeType => "native_type",
            Capability::ToNative => "to_native",
            Capability::FromNative => "from_native",
        }
    }

    pub const fn flag(self) -> ConverterCaps {
        match self {
            Capability::NativeType => ConverterCaps::NATIVE_TYPE,
            Capability::ToNative => ConverterCaps::TO_NATIVE,
            Capability::FromNative => ConverterCaps::FROM_NATIVE,
        }
    }

    pub(crate) fn missing(self) -> FfiError {
        FfiError::MissingCapability { capability: self }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method_name())
    }
}

/// User object implementing custom marshaling.
///
/// Every operation defaults to a missing-capability error; implement the
/// ones listed in [`capabilities`](DataConverter::capabilities). Errors
/// returned from these methods reach the caller unchanged.
pub trait DataConverter: Send + Sync {
    /// Operations this object provides.
    fn capabilities(&self) -> ConverterCaps;

    /// Describe the native representation. Must return a [`Value::Type`].
    fn native_type(&self) -> FfiResult<Value> {
        Err(Capability::NativeType.missing())
    }

    fn to_native(&self, value: Value) -> FfiResult<Value> {
        let _ = value;
        Err(Capability::ToNative.missing())
    }

    fn from_native(&self, value: Value) -> FfiResult<Value> {
        let _ = value;
        Err(Capability::FromNative.missing())
    }

    /// Class name used in diagnostics.
    fn class_name(&self) -> &str {
        "DataConverter"
    }
}

type NativeTypeFn = Box<dyn Fn() -> FfiResult<Value> + Send + Sync>;
type ConvertFn = Box<dyn Fn(Value) -> FfiResult<Value> + Send + Sync>;

/// A converter assembled from closures, one per operation.
///
/// This is how script-defined classes reach the contract: each method the
/// class defines becomes a closure, and the capability set is exactly the
/// closures that were installed.
///
/// ```
/// use nativetype_core::{ConverterObject, DataConverter, ConverterCaps, Value};
///
/// let converter = ConverterObject::new("Flags")
///     .with_to_native(|v| Ok(v))
///     .with_from_native(|v| Ok(v));
/// assert_eq!(
///     converter.capabilities(),
///     ConverterCaps::TO_NATIVE | ConverterCaps::FROM_NATIVE
/// );
/// ```
pub struct ConverterObject {
    class_name: String,
    native_type: Option<NativeTypeFn>,
    to_native: Option<ConvertFn>,
    from_native: Option<ConvertFn>,
}

impl ConverterObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            native_type: None,
            to_native: None,
            from_native: None,
        }
    }

    pub fn with_native_type<F>(mut self, f: F) -> Self
    where
        F: Fn() -> FfiResult<Value> + Send + Sync + 'static,
    {
        self.native_type = Some(Box::new(f));
        self
    }

    pub fn with_to_native<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> FfiResult<Value> + Send + Sync + 'static,
    {
        self.to_native = Some(Box::new(f));
        self
    }

    pub fn with_from_native<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> FfiResult<Value> + Send + Sync + 'static,
    {
        self.from_native = Some(Box::new(f));
        self
    }
}

impl DataConverter for ConverterObject {
    fn capabilities(&self) -> ConverterCaps {
        let mut caps = ConverterCaps::empty();
        caps.set(ConverterCaps::NATIVE_TYPE, self.native_type.is_some());
        caps.set(ConverterCaps::TO_NATIVE, self.to_native.is_some());
        caps.set(ConverterCaps::FROM_NATIVE, self.from_native.is_some());
        caps
    }

    fn native_type(&self) -> FfiResult<Value> {
        match &self.native_type {
            Some(f) => f(),
            None => Err(Capability::NativeType.missing()),
        }
    }

    fn to_native(&self, value: Value) -> FfiResult<Value> {
        match &self.to_native {
            Some(f) => f(value),
            None => Err(Capability::ToNative.missing()),
        }
    }

    fn from_native(&self, value: Value) -> FfiResult<Value> {
        match &self.from_native {
            Some(f) => f(value),
            None => Err(Capability::FromNative.missing()),
        }
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }
}

impl fmt::Debug for ConverterObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterObject")
            .field("class_name", &self.class_name)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
