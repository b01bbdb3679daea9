// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property values and the Unanimous/Mixed aggregate used by selection proxies.

use std::fmt;

/// Absolute tolerance used when comparing float properties
pub const FLOAT_EPSILON: f32 = 1e-5;

/// Compare two floats within [`FLOAT_EPSILON`]
pub fn is_same_float(a: f32, b: f32) -> bool {
    (a - b).abs() < FLOAT_EPSILON
}

/// Type tag of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Boolean flag
    Bool,
    /// Text
    Text,
    /// 32-bit float
    Float,
}

/// A property value read from or written to an inspectable object
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean flag
    Bool(bool),
    /// Text
    Text(String),
    /// 32-bit float
    Float(f32),
}

impl PropertyValue {
    /// Type tag of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Text(_) => PropertyKind::Text,
            PropertyValue::Float(_) => PropertyKind::Float,
        }
    }

    /// Equality under the property's rule: exact for bools and text,
    /// within [`FLOAT_EPSILON`] for floats. Values of different kinds never match.
    pub fn is_same_as(&self, other: &PropertyValue) -> bool {
        match (self, other) {
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            (PropertyValue::Text(a), PropertyValue::Text(b)) => a == b,
            (PropertyValue::Float(a), PropertyValue::Float(b)) => is_same_float(*a, *b),
            _ => false,
        }
    }

    /// Get the flag, if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Get the number, if this is a float
    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Text(v) => write!(f, "'{v}'"),
            PropertyValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// Aggregate of one property across a selection.
///
/// `Mixed` is a separate case rather than an in-band value, so it can never be
/// confused with `false`, `0.0` or an empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Mirrored<T> {
    /// Every selected object holds this value
    Unanimous(T),
    /// The selected objects disagree
    Mixed,
}

impl<T> Mirrored<T> {
    /// The unanimous value, or `None` when mixed
    pub fn value(&self) -> Option<&T> {
        match self {
            Mirrored::Unanimous(v) => Some(v),
            Mirrored::Mixed => None,
        }
    }

    /// Whether the selection disagrees
    pub fn is_mixed(&self) -> bool {
        matches!(self, Mirrored::Mixed)
    }

    /// Convert the unanimous value, keeping `Mixed` as is
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mirrored<U> {
        match self {
            Mirrored::Unanimous(v) => Mirrored::Unanimous(f(v)),
            Mirrored::Mixed => Mirrored::Mixed,
        }
    }

    /// Fold values with `same`: unanimous if every value matches the first.
    /// Returns `None` for an empty input.
    pub fn from_values<I>(values: I, same: impl Fn(&T, &T) -> bool) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter();
        let first = values.next()?;
        for value in values {
            if !same(&first, &value) {
                return Some(Mirrored::Mixed);
            }
        }
        Some(Mirrored::Unanimous(first))
    }
}

impl Mirrored<PropertyValue> {
    /// Aggregate property values using [`PropertyValue::is_same_as`]
    pub fn from_properties<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = PropertyValue>,
    {
        Self::from_values(values, PropertyValue::is_same_as)
    }

    /// View as a flag; a non-bool value reads as mixed
    pub fn to_bool(&self) -> Mirrored<bool> {
        match self.value().and_then(PropertyValue::as_bool) {
            Some(v) => Mirrored::Unanimous(v),
            None => Mirrored::Mixed,
        }
    }

    /// View as text; a non-text value reads as mixed
    pub fn to_text(&self) -> Mirrored<String> {
        match self.value().and_then(PropertyValue::as_text) {
            Some(v) => Mirrored::Unanimous(v.to_string()),
            None => Mirrored::Mixed,
        }
    }

    /// View as a float; a non-float value reads as mixed
    pub fn to_float(&self) -> Mirrored<f32> {
        match self.value().and_then(PropertyValue::as_float) {
            Some(v) => Mirrored::Unanimous(v),
            None => Mirrored::Mixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_tolerance() {
        assert!(PropertyValue::Float(1.0).is_same_as(&PropertyValue::Float(1.0 + FLOAT_EPSILON / 2.0)));
        assert!(!PropertyValue::Float(1.0).is_same_as(&PropertyValue::Float(1.001)));
        assert!(!PropertyValue::Float(0.0).is_same_as(&PropertyValue::Bool(false)));
    }

    #[test]
    fn test_unanimous_and_mixed() {
        let unanimous = Mirrored::<PropertyValue>::from_properties(vec![5.0_f32.into(), 5.0_f32.into(), 5.0_f32.into()]);
        assert_eq!(unanimous, Some(Mirrored::Unanimous(PropertyValue::Float(5.0))));

        let mixed = Mirrored::<PropertyValue>::from_properties(vec![true.into(), false.into(), true.into()]);
        assert_eq!(mixed, Some(Mirrored::Mixed));

        assert_eq!(Mirrored::<PropertyValue>::from_properties(Vec::new()), None);
    }

    #[test]
    fn test_mixed_is_distinct_from_defaults() {
        let mixed: Mirrored<PropertyValue> = Mirrored::Mixed;
        assert_ne!(mixed.to_bool(), Mirrored::Unanimous(false));
        assert_ne!(mixed.to_text(), Mirrored::Unanimous(String::new()));
        assert_ne!(mixed.to_float(), Mirrored::Unanimous(0.0));
        assert!(mixed.to_float().is_mixed());
    }
}
