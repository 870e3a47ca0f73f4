//! Script-level values exchanged with native type descriptors.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{DataConverter, Pointer, Type};

/// A script-level value.
///
/// Descriptors decode native slots into values and encode values back.
/// Integers are held as `i128` so every native integer kind, including
/// the full UINT64 range, round-trips without loss.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(String),
    /// Interned name such as `:success`
    Symbol(String),
    Pointer(Pointer),
    /// A type descriptor as a first-class value
    Type(Type),
    /// A user object implementing the data-converter contract
    Converter(Arc<dyn DataConverter>),
    /// Opaque host object
    Native(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Get a human-readable name for this value's shape.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Pointer(_) => "pointer",
            Value::Type(_) => "type",
            Value::Converter(_) => "converter",
            Value::Native(_) => "native",
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Script truthiness: only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<Pointer> {
        match self {
            Value::Pointer(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Integer(v) => write!(f, "Integer({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Symbol(s) => write!(f, "Symbol(:{})", s),
            Value::Pointer(p) => write!(f, "Pointer({:#x})", p.address()),
            Value::Type(t) => write!(f, "Type({})", t.name()),
            Value::Converter(c) => write!(f, "Converter({})", c.class_name()),
            Value::Native(_) => write!(f, "Native(...)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pointer(a), Value::Pointer(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Converter(a), Value::Converter(b)) => Arc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(v as i128)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize, i128);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Pointer> for Value {
    fn from(v: Pointer) -> Self {
        Value::Pointer(v)
    }
}

impl From<Type> for Value {
    fn from(v: Type) -> Self {
        Value::Type(v)
    }
}
