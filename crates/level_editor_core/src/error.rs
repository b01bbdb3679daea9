// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for editing operations.

use crate::components::ComponentKind;
use crate::entity::EntityId;
use crate::value::PropertyKind;
use thiserror::Error;

/// Errors raised by property edits, history replay and proxy construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The target does not expose a property with this name
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// The proposed value has the wrong type for the property
    #[error("Type mismatch for '{property}': expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        /// Property being written
        property: &'static str,
        /// Type the property stores
        expected: PropertyKind,
        /// Type of the rejected value
        actual: PropertyKind,
    },

    /// The proposed value failed validation
    #[error("Rejected value for '{property}': {reason}")]
    Rejected {
        /// Property being written
        property: &'static str,
        /// Why the value was refused
        reason: &'static str,
    },

    /// Entity not found in the scene
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity has no component of the requested kind
    #[error("Entity {entity:?} has no {kind:?} component")]
    ComponentMissing {
        /// Entity that was searched
        entity: EntityId,
        /// Kind that was requested
        kind: ComponentKind,
    },

    /// Entity already owns a component of this kind
    #[error("Entity {entity:?} already has a {kind:?} component")]
    DuplicateComponent {
        /// Entity that was modified
        entity: EntityId,
        /// Kind that was added twice
        kind: ComponentKind,
    },

    /// A selection proxy was requested over zero objects
    #[error("Selection is empty")]
    EmptySelection,

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for editing operations
pub type Result<T> = std::result::Result<T, EditError>;
