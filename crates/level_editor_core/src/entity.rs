// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene entities.
//!
//! A [`GameEntity`] owns its own property state and a list of components; it is
//! the single source of truth that selection proxies read from and write to.

use crate::components::{Component, ComponentData, ComponentKind, Transform};
use crate::error::{EditError, Result};
use crate::notify::{ChangeNotifier, ChangeOrigin, PropertyChanged};
use crate::property::{Constraint, Inspectable, PropertyDescriptor};
use crate::value::{PropertyKind, PropertyValue};
use indexmap::IndexMap;
use uuid::Uuid;

/// Property name reported when a component is attached or detached.
/// Listeners bound to a component should treat it as a reason to re-bind.
pub const COMPONENTS_CHANGED: &str = "components";

/// Unique identifier for entities in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// An entity in the scene
#[derive(Debug)]
pub struct GameEntity {
    id: EntityId,
    name: String,
    is_enabled: bool,
    components: Vec<Component>,
    notifier: ChangeNotifier,
}

impl GameEntity {
    /// Properties exposed by every entity
    pub const PROPERTIES: &'static [PropertyDescriptor] = &[
        PropertyDescriptor::new("name", PropertyKind::Text).with_constraint(Constraint::NonEmptyText),
        PropertyDescriptor::new("is_enabled", PropertyKind::Bool),
    ];

    /// Create an enabled entity with a default transform
    pub fn new(name: impl Into<String>) -> Self {
        let id = EntityId::new();
        Self {
            id,
            name: name.into(),
            is_enabled: true,
            components: vec![Component::new(id, Transform::default())],
            notifier: ChangeNotifier::new(),
        }
    }

    /// Entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entity is enabled
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Attached components
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Find a component by kind; `None` when absent
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    /// Find a component by kind for writing
    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.kind() == kind)
    }

    /// Find a component by kind, or `ComponentMissing`
    pub fn require_component(&self, kind: ComponentKind) -> Result<&Component> {
        let entity = self.id;
        self.component(kind)
            .ok_or(EditError::ComponentMissing { entity, kind })
    }

    /// Find a component by kind for writing, or `ComponentMissing`
    pub fn require_component_mut(&mut self, kind: ComponentKind) -> Result<&mut Component> {
        let entity = self.id;
        self.component_mut(kind)
            .ok_or(EditError::ComponentMissing { entity, kind })
    }

    /// Whether a component of `kind` is attached
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.component(kind).is_some()
    }

    /// Attach a component. Each kind may appear at most once.
    pub fn add_component(&mut self, data: impl Into<ComponentData>) -> Result<()> {
        let data = data.into();
        let kind = data.kind();
        if self.has_component(kind) {
            return Err(EditError::DuplicateComponent {
                entity: self.id,
                kind,
            });
        }
        self.components.push(Component::new(self.id, data));
        self.notify_components_changed(kind);
        Ok(())
    }

    /// Detach a component and return its payload. The transform is mandatory.
    pub fn remove_component(&mut self, kind: ComponentKind) -> Result<ComponentData> {
        if kind == ComponentKind::Transform {
            return Err(EditError::InvalidOperation(
                "Transform component cannot be removed".to_string(),
            ));
        }
        let index = self
            .components
            .iter()
            .position(|c| c.kind() == kind)
            .ok_or(EditError::ComponentMissing {
                entity: self.id,
                kind,
            })?;
        let removed = self.components.remove(index).data().clone();
        self.notify_components_changed(kind);
        Ok(removed)
    }

    fn notify_components_changed(&mut self, kind: ComponentKind) {
        let event = PropertyChanged {
            origin: ChangeOrigin {
                entity: self.id,
                component: Some(kind),
            },
            property: COMPONENTS_CHANGED,
        };
        self.notifier.notify(&event);
    }
}

impl Inspectable for GameEntity {
    fn properties(&self) -> &'static [PropertyDescriptor] {
        Self::PROPERTIES
    }

    fn get(&self, property: &str) -> Option<PropertyValue> {
        match property {
            "name" => Some(PropertyValue::Text(self.name.clone())),
            "is_enabled" => Some(PropertyValue::Bool(self.is_enabled)),
            _ => None,
        }
    }

    fn store(&mut self, property: &'static str, value: PropertyValue) -> Result<()> {
        match (property, value) {
            ("name", PropertyValue::Text(name)) => self.name = name,
            ("is_enabled", PropertyValue::Bool(flag)) => self.is_enabled = flag,
            (property, value) => {
                return Err(EditError::InvalidOperation(format!(
                    "Cannot store {value} in entity.{property}"
                )))
            }
        }
        Ok(())
    }

    fn origin(&self) -> ChangeOrigin {
        ChangeOrigin {
            entity: self.id,
            component: None,
        }
    }

    fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }
}

/// Scene data containing all entities
#[derive(Debug, Default)]
pub struct Scene {
    entities: IndexMap<EntityId, GameEntity>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the scene
    pub fn add_entity(&mut self, entity: GameEntity) -> EntityId {
        let id = entity.id();
        self.entities.insert(id, entity);
        id
    }

    /// Create and add an entity with the given name
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        self.add_entity(GameEntity::new(name))
    }

    /// Get an entity by ID
    pub fn get(&self, id: &EntityId) -> Option<&GameEntity> {
        self.entities.get(id)
    }

    /// Get a mutable reference to an entity by ID
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut GameEntity> {
        self.entities.get_mut(id)
    }

    /// Get an entity, or `EntityNotFound`
    pub fn entity(&self, id: EntityId) -> Result<&GameEntity> {
        self.get(&id).ok_or(EditError::EntityNotFound(id))
    }

    /// Get an entity for writing, or `EntityNotFound`
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut GameEntity> {
        self.get_mut(&id).ok_or(EditError::EntityNotFound(id))
    }

    /// Remove an entity from the scene
    pub fn remove(&mut self, id: &EntityId) -> Option<GameEntity> {
        self.entities.shift_remove(id)
    }

    /// Iterate over entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &GameEntity> {
        self.entities.values()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Script;

    #[test]
    fn test_new_entity_has_transform() {
        let entity = GameEntity::new("Cube");
        assert!(entity.is_enabled());
        assert!(entity.has_component(ComponentKind::Transform));
        assert!(entity.component(ComponentKind::Script).is_none());
    }

    #[test]
    fn test_component_add_remove() {
        let mut entity = GameEntity::new("Player");
        entity.add_component(Script::new("PlayerController")).unwrap();
        assert!(matches!(
            entity.add_component(Script::new("Other")),
            Err(EditError::DuplicateComponent { .. })
        ));

        let removed = entity.remove_component(ComponentKind::Script).unwrap();
        assert_eq!(removed, ComponentData::Script(Script::new("PlayerController")));
        assert!(entity.remove_component(ComponentKind::Transform).is_err());
        assert!(matches!(
            entity.remove_component(ComponentKind::Script),
            Err(EditError::ComponentMissing { .. })
        ));
    }

    #[test]
    fn test_entity_properties() {
        let mut entity = GameEntity::new("Cube");
        assert_eq!(entity.set("name", "Crate".into()), Ok(true));
        assert_eq!(entity.set("is_enabled", true.into()), Ok(false));
        assert_eq!(entity.set("is_enabled", false.into()), Ok(true));
        assert_eq!(entity.name(), "Crate");
        assert!(!entity.is_enabled());
        assert!(entity.set("name", "".into()).is_err());
        assert_eq!(entity.name(), "Crate");
    }

    #[test]
    fn test_scene_lookup() {
        let mut scene = Scene::new();
        let id = scene.spawn("Light");
        assert_eq!(scene.entity(id).map(GameEntity::name), Ok("Light"));
        assert!(scene.remove(&id).is_some());
        assert_eq!(scene.entity(id).err(), Some(EditError::EntityNotFound(id)));
    }

    #[test]
    fn test_component_changes_are_notified() {
        let mut entity = GameEntity::new("Door");
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&seen);
        entity
            .notifier_mut()
            .subscribe(move |e| sink.borrow_mut().push((e.property, e.origin.component)));

        entity.add_component(Script::new("DoorController")).unwrap();
        entity.remove_component(ComponentKind::Script).unwrap();
        assert!(entity.remove_component(ComponentKind::Script).is_err());

        let expected = vec![
            (COMPONENTS_CHANGED, Some(ComponentKind::Script)),
            (COMPONENTS_CHANGED, Some(ComponentKind::Script)),
        ];
        assert_eq!(*seen.borrow(), expected);
    }
}
