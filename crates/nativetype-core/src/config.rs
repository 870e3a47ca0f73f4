//! Configuration properties for the native type layer.

use rustc_hash::FxHashMap;

/// Tunable properties, stored as integers in the engine-property style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfiProperty {
    /// Nonzero: integer writes truncate to the slot width instead of failing.
    IntegerOverflowWraps,
    /// Nonzero: reading a null STRING slot yields nil instead of failing.
    NullStringIsNil,
    /// Nonzero: the registry also answers to C-style alias names.
    RegisterAliases,
}

impl FfiProperty {
    pub const ALL: [FfiProperty; 3] = [
        FfiProperty::IntegerOverflowWraps,
        FfiProperty::NullStringIsNil,
        FfiProperty::RegisterAliases,
    ];

    pub fn default_value(&self) -> usize {
        match self {
            FfiProperty::IntegerOverflowWraps => 0,
            FfiProperty::NullStringIsNil => 1,
            FfiProperty::RegisterAliases => 1,
        }
    }
}

/// A set of property values. Unset properties read as their default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FfiConfig {
    properties: FxHashMap<FfiProperty, usize>,
}

impl FfiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, property: FfiProperty, value: usize) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: FfiProperty, value: usize) {
        self.properties.insert(property, value);
    }

    pub fn get(&self, property: FfiProperty) -> usize {
        self.properties
            .get(&property)
            .copied()
            .unwrap_or_else(|| property.default_value())
    }

    pub fn is_enabled(&self, property: FfiProperty) -> bool {
        self.get(property) != 0
    }

    /// Restore a property to its default.
    pub fn reset(&mut self, property: FfiProperty) {
        self.properties.remove(&property);
    }
}

/// Marshaling rules baked into each built-in descriptor at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarshalPolicy {
    pub wrap_integers: bool,
    pub null_string_is_nil: bool,
}

impl MarshalPolicy {
    pub fn from_config(config: &FfiConfig) -> Self {
        Self {
            wrap_integers: config.is_enabled(FfiProperty::IntegerOverflowWraps),
            null_string_is_nil: config.is_enabled(FfiProperty::NullStringIsNil),
        }
    }
}

impl Default for MarshalPolicy {
    fn default() -> Self {
        Self::from_config(&FfiConfig::default())
    }
}
