// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session state.
//!
//! An [`EditSession`] owns the loaded scene and its undo/redo history. Every
//! recorded action replays against the session's scene.

use crate::commands::{PropertyEdit, TargetKind};
use crate::components::{ComponentData, ComponentKind};
use crate::config::EditorConfig;
use crate::entity::{EntityId, Scene};
use crate::error::{EditError, Result};
use crate::history::{FnAction, HistoryStack};
use crate::proxy::{ComponentProxy, EntityProxy};
use crate::value::PropertyValue;

/// Main editing session
#[derive(Debug)]
pub struct EditSession {
    /// Loaded scene
    pub scene: Scene,

    /// Undo/redo history
    pub history: HistoryStack<Scene>,

    config: EditorConfig,
}

impl EditSession {
    /// Create a session with an empty scene
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(),
            history: HistoryStack::with_max_depth(config.history_depth),
            config,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the scene. History from the previous scene is discarded.
    pub fn load(&mut self, scene: Scene) {
        self.scene = scene;
        self.history.reset();
        tracing::info!("Loaded scene with {} entities", self.scene.len());
    }

    /// Drop the scene and its history
    pub fn unload(&mut self) {
        self.scene = Scene::new();
        self.history.reset();
        tracing::info!("Unloaded scene");
    }

    /// Undo the most recent action
    pub fn undo(&mut self) -> Result<bool> {
        self.history.undo(&mut self.scene)
    }

    /// Redo the most recently undone action
    pub fn redo(&mut self) -> Result<bool> {
        self.history.redo(&mut self.scene)
    }

    /// Set one property on one entity with undo support.
    /// Returns `Ok(false)` if the value is unchanged; nothing is recorded then.
    pub fn set_property(
        &mut self,
        id: EntityId,
        target: TargetKind,
        property: &str,
        value: PropertyValue,
    ) -> Result<bool> {
        let object = target.resolve_mut(&mut self.scene, id)?;
        let descriptor = object.validate(property, &value).inspect_err(|e| {
            tracing::warn!("Rejected edit of {target:?}.{property} on {id:?}: {e}");
        })?;
        let before = object
            .get(descriptor.name)
            .ok_or_else(|| EditError::UnknownProperty(descriptor.name.to_string()))?;

        if !object.set(descriptor.name, value.clone())? {
            return Ok(false);
        }

        self.history.record(PropertyEdit::new(
            &self.scene,
            target,
            descriptor.name,
            vec![(id, before)],
            value,
        ));
        Ok(true)
    }

    /// Rename an entity with undo support
    pub fn rename_entity(&mut self, id: EntityId, name: impl Into<String>) -> Result<bool> {
        self.set_property(id, TargetKind::Entity, "name", PropertyValue::Text(name.into()))
    }

    /// Enable or disable an entity with undo support
    pub fn set_entity_enabled(&mut self, id: EntityId, enabled: bool) -> Result<bool> {
        self.set_property(id, TargetKind::Entity, "is_enabled", PropertyValue::Bool(enabled))
    }

    /// Attach a component with undo support
    pub fn add_component(&mut self, id: EntityId, data: impl Into<ComponentData>) -> Result<()> {
        let data = data.into();
        let kind = data.kind();
        let entity = self.scene.entity_mut(id)?;
        entity.add_component(data.clone())?;
        let label = format!("Add {} to {}", kind.display_name(), entity.name());

        self.history.record(FnAction::new(
            label,
            move |scene: &mut Scene| scene.entity_mut(id)?.remove_component(kind).map(|_| ()),
            move |scene: &mut Scene| scene.entity_mut(id)?.add_component(data.clone()),
        ));
        Ok(())
    }

    /// Detach a component with undo support. The transform cannot be removed.
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> Result<()> {
        let entity = self.scene.entity_mut(id)?;
        let data = entity.remove_component(kind)?;
        let label = format!("Remove {} from {}", kind.display_name(), entity.name());

        self.history.record(FnAction::new(
            label,
            move |scene: &mut Scene| scene.entity_mut(id)?.add_component(data.clone()),
            move |scene: &mut Scene| scene.entity_mut(id)?.remove_component(kind).map(|_| ()),
        ));
        Ok(())
    }

    /// Build a proxy over the given entities
    pub fn select(&mut self, ids: Vec<EntityId>) -> Result<EntityProxy> {
        EntityProxy::new(&mut self.scene, ids)
    }

    /// Build a proxy over one component kind of the given entities
    pub fn select_component(
        &mut self,
        ids: Vec<EntityId>,
        kind: ComponentKind,
    ) -> Result<ComponentProxy> {
        ComponentProxy::new(&mut self.scene, ids, kind)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
