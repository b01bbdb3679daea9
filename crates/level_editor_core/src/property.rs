// SPDX-License-Identifier: MIT OR Apache-2.0
//! Inspectable objects: named, typed, validated properties with change notification.

use crate::error::{EditError, Result};
use crate::notify::{ChangeNotifier, ChangeOrigin, PropertyChanged};
use crate::value::{is_same_float, PropertyKind, PropertyValue};

/// Extra validation applied to a property on top of its type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Any value of the right type
    None,
    /// Text that is not empty or whitespace
    NonEmptyText,
    /// A finite float
    Finite,
    /// A finite, non-zero float
    FiniteNonZero,
}

/// Static description of one property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name, as used by notifications and edits
    pub name: &'static str,
    /// Stored type
    pub kind: PropertyKind,
    /// Validation rule
    pub constraint: Constraint,
}

impl PropertyDescriptor {
    /// Describe a property with no constraint beyond its type
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            constraint: Constraint::None,
        }
    }

    /// Attach a validation rule
    pub const fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Check only that `value` has the stored type
    pub fn check_kind(&self, value: &PropertyValue) -> Result<()> {
        if value.kind() != self.kind {
            return Err(EditError::TypeMismatch {
                property: self.name,
                expected: self.kind,
                actual: value.kind(),
            });
        }
        Ok(())
    }

    /// Check `value` against the type and constraint
    pub fn validate(&self, value: &PropertyValue) -> Result<()> {
        self.check_kind(value)?;

        let reason = match (self.constraint, value) {
            (Constraint::NonEmptyText, PropertyValue::Text(text)) if text.trim().is_empty() => {
                Some("must not be empty")
            }
            (Constraint::Finite, PropertyValue::Float(v)) if !v.is_finite() => Some("must be finite"),
            (Constraint::FiniteNonZero, PropertyValue::Float(v)) if !v.is_finite() => {
                Some("must be finite")
            }
            (Constraint::FiniteNonZero, PropertyValue::Float(v)) if is_same_float(*v, 0.0) => {
                Some("must not be zero")
            }
            _ => None,
        };

        match reason {
            Some(reason) => Err(EditError::Rejected {
                property: self.name,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Look up a descriptor by name
pub fn find_descriptor(
    descriptors: &'static [PropertyDescriptor],
    property: &str,
) -> Result<&'static PropertyDescriptor> {
    descriptors
        .iter()
        .find(|d| d.name == property)
        .ok_or_else(|| EditError::UnknownProperty(property.to_string()))
}

/// An object whose properties can be read, validated and written by name.
///
/// Implementors supply raw storage; [`Inspectable::set`] adds validation, the
/// no-op check and change notification on top.
pub trait Inspectable {
    /// Properties this object exposes
    fn properties(&self) -> &'static [PropertyDescriptor];

    /// Read a property
    fn get(&self, property: &str) -> Option<PropertyValue>;

    /// Write a property without validation or notification
    fn store(&mut self, property: &'static str, value: PropertyValue) -> Result<()>;

    /// Identity reported in change events
    fn origin(&self) -> ChangeOrigin;

    /// This object's notifier
    fn notifier_mut(&mut self) -> &mut ChangeNotifier;

    /// Validate a proposed value without writing it
    fn validate(&self, property: &str, value: &PropertyValue) -> Result<&'static PropertyDescriptor> {
        let descriptor = find_descriptor(self.properties(), property)?;
        descriptor.validate(value)?;
        Ok(descriptor)
    }

    /// Validate and store `value`, notifying listeners only if it differs from
    /// the current value. Returns whether anything changed.
    fn set(&mut self, property: &str, value: PropertyValue) -> Result<bool> {
        let descriptor = self.validate(property, &value)?;
        store_if_changed(self, descriptor, value)
    }

    /// Put back a value this object held before. Only the type is checked:
    /// constraints apply to new edits, not to restoring earlier state.
    fn restore(&mut self, property: &str, value: PropertyValue) -> Result<bool> {
        let descriptor = find_descriptor(self.properties(), property)?;
        descriptor.check_kind(&value)?;
        store_if_changed(self, descriptor, value)
    }
}

fn store_if_changed<T: Inspectable + ?Sized>(
    object: &mut T,
    descriptor: &'static PropertyDescriptor,
    value: PropertyValue,
) -> Result<bool> {
    if let Some(current) = object.get(descriptor.name) {
        if current.is_same_as(&value) {
            return Ok(false);
        }
    }

    object.store(descriptor.name, value)?;
    let event = PropertyChanged {
        origin: object.origin(),
        property: descriptor.name,
    };
    object.notifier_mut().notify(&event);
    Ok(true)
}
