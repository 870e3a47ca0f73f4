use std::fmt;

/// A `::`-separated constant path as written in script code.
///
/// Used to resolve constants such as `FFI::Type::INT8` to the descriptor
/// they name.
///
/// # Examples
///
/// ```
/// use nativetype_core::QualifiedName;
///
/// let name = QualifiedName::from_qualified_string("FFI::NativeType::UINT16");
/// assert_eq!(name.simple_name(), "UINT16");
/// assert_eq!(name.namespace_string(), "FFI::NativeType");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Last path segment (e.g. "INT8", "TYPE_INT8")
    pub name: String,
    /// Leading segments (e.g. ["FFI", "Type"]); empty for a bare name
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a name with no namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Parse a qualified string (e.g. "FFI::Type::INT8").
    ///
    /// Leading "::" is normalized: "::FFI::TYPE_INT8" == "FFI::TYPE_INT8".
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts: Vec<&str> = s.split("::").filter(|p| !p.is_empty()).collect();
        match parts.pop() {
            None => Self::global(""),
            Some(name) => Self {
                name: name.to_string(),
                namespace: parts.into_iter().map(str::to_string).collect(),
            },
        }
    }

    /// Check if this name has no namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Check whether the namespace is exactly the given segments.
    pub fn in_namespace(&self, segments: &[&str]) -> bool {
        self.namespace.len() == segments.len()
            && self.namespace.iter().zip(segments).all(|(a, b)| a == b)
    }

    /// Get the namespace as a joined string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join("::")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_qualified_string(&s)
    }
}
