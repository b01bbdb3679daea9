// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edit-transaction engine for the level editor.
//!
//! This crate provides the editing core behind the inspector:
//! - Undo/redo history of named, reversible actions
//! - Entities and components with typed, validated properties
//! - Change notification on every property write
//! - Selection proxies that edit N entities as one
//!
//! ## Architecture
//!
//! An [`EditSession`] owns the [`Scene`] and a [`HistoryStack`]. Selection
//! proxies hold entity ids, not references, and write through the session so
//! that one gesture over many entities records exactly one [`PropertyEdit`].

pub mod commands;
pub mod components;
pub mod config;
pub mod entity;
pub mod error;
pub mod history;
pub mod logging;
pub mod notify;
pub mod property;
pub mod proxy;
pub mod session;
pub mod value;

pub use commands::{PropertyEdit, TargetKind};
pub use components::{Component, ComponentData, ComponentKind, Script, Transform};
pub use config::{ConfigError, EditorConfig};
pub use entity::{EntityId, GameEntity, Scene};
pub use error::{EditError, Result};
pub use history::{FnAction, HistoryStack, ReversibleAction};
pub use notify::{ChangeNotifier, PropertyChanged, SubscriptionId};
pub use property::{Inspectable, PropertyDescriptor};
pub use proxy::{ComponentProxy, EntityProxy, UpdateGuard};
pub use session::EditSession;
pub use value::{Mirrored, PropertyKind, PropertyValue, FLOAT_EPSILON};
