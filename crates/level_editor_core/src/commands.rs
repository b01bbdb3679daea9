// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property edit actions.
//!
//! One user edit gesture produces one [`PropertyEdit`], however many entities
//! it touched. Undo writes each entity's own prior value back; redo writes the
//! single new value to all of them.

use crate::components::ComponentKind;
use crate::entity::{EntityId, Scene};
use crate::error::Result;
use crate::history::ReversibleAction;
use crate::property::{find_descriptor, Inspectable, PropertyDescriptor};
use crate::value::PropertyValue;

/// Which object on each entity an edit addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// The entity's own properties
    Entity,
    /// A component attached to the entity
    Component(ComponentKind),
}

impl TargetKind {
    /// Properties exposed by this target
    pub fn properties(&self) -> &'static [PropertyDescriptor] {
        match self {
            TargetKind::Entity => crate::entity::GameEntity::PROPERTIES,
            TargetKind::Component(kind) => kind.properties(),
        }
    }

    /// Find the target object on entity `id`
    pub fn resolve<'a>(&self, scene: &'a Scene, id: EntityId) -> Result<&'a dyn Inspectable> {
        let entity = scene.entity(id)?;
        match self {
            TargetKind::Entity => Ok(entity),
            TargetKind::Component(kind) => Ok(entity.require_component(*kind)?),
        }
    }

    /// Find the target object on entity `id` for writing
    pub fn resolve_mut<'a>(
        &self,
        scene: &'a mut Scene,
        id: EntityId,
    ) -> Result<&'a mut dyn Inspectable> {
        let entity = scene.entity_mut(id)?;
        match self {
            TargetKind::Entity => Ok(entity),
            TargetKind::Component(kind) => Ok(entity.require_component_mut(*kind)?),
        }
    }
}

/// Write `property` on each listed entity, all or nothing.
///
/// Every target is resolved and every value validated before the first write,
/// so a missing entity or a rejected value leaves the scene untouched.
/// Returns how many targets actually changed.
pub fn write_all(
    scene: &mut Scene,
    target: TargetKind,
    property: &str,
    writes: &[(EntityId, &PropertyValue)],
) -> Result<usize> {
    for (id, value) in writes {
        target.resolve(scene, *id)?.validate(property, value)?;
    }

    let mut changed = 0;
    for (id, value) in writes {
        if target.resolve_mut(scene, *id)?.set(property, (*value).clone())? {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Write back values the targets held before, all or nothing.
///
/// Like [`write_all`], but values are only checked for type. History replay
/// goes through here so that a value the object once held, such as a name
/// given at creation, can always be restored.
pub fn restore_all(
    scene: &mut Scene,
    target: TargetKind,
    property: &str,
    writes: &[(EntityId, &PropertyValue)],
) -> Result<usize> {
    for (id, value) in writes {
        let object = target.resolve(scene, *id)?;
        find_descriptor(object.properties(), property)?.check_kind(value)?;
    }

    let mut changed = 0;
    for (id, value) in writes {
        if target.resolve_mut(scene, *id)?.restore(property, (*value).clone())? {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Command to edit one property on one or more entities
#[derive(Debug, Clone)]
pub struct PropertyEdit {
    label: String,
    target: TargetKind,
    property: &'static str,
    before: Vec<(EntityId, PropertyValue)>,
    after: PropertyValue,
}

impl PropertyEdit {
    /// Create an edit. `before` holds each entity's own value prior to the
    /// edit; the label is built from the scene's current entity names.
    pub fn new(
        scene: &Scene,
        target: TargetKind,
        property: &'static str,
        before: Vec<(EntityId, PropertyValue)>,
        after: PropertyValue,
    ) -> Self {
        let label = describe_edit(scene, target, property, &before, &after);
        Self {
            label,
            target,
            property,
            before,
            after,
        }
    }

    /// Edited target
    pub fn target(&self) -> TargetKind {
        self.target
    }

    /// Edited property
    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Per-entity values before the edit
    pub fn before(&self) -> &[(EntityId, PropertyValue)] {
        &self.before
    }

    /// Value written to every entity
    pub fn after(&self) -> &PropertyValue {
        &self.after
    }
}

impl ReversibleAction<Scene> for PropertyEdit {
    fn label(&self) -> &str {
        &self.label
    }

    fn undo(&self, scene: &mut Scene) -> Result<()> {
        let writes: Vec<_> = self.before.iter().map(|(id, value)| (*id, value)).collect();
        restore_all(scene, self.target, self.property, &writes)?;
        Ok(())
    }

    fn redo(&self, scene: &mut Scene) -> Result<()> {
        let writes: Vec<_> = self.before.iter().map(|(id, _)| (*id, &self.after)).collect();
        restore_all(scene, self.target, self.property, &writes)?;
        Ok(())
    }
}

/// Build the history label for a property edit
fn describe_edit(
    scene: &Scene,
    target: TargetKind,
    property: &str,
    before: &[(EntityId, PropertyValue)],
    after: &PropertyValue,
) -> String {
    let single = match before {
        [(id, old)] => Some((scene.get(id).map_or("<missing>", |e| e.name()), old)),
        _ => None,
    };
    let count = before.len();

    match (target, property, single) {
        (TargetKind::Entity, "name", Some((_, old))) => format!("Rename entity {old} to {after}"),
        (TargetKind::Entity, "name", None) => format!("Rename {count} entities to {after}"),
        (TargetKind::Entity, "is_enabled", single) => {
            let verb = if after.as_bool() == Some(true) { "Enable" } else { "Disable" };
            match single {
                Some((name, _)) => format!("{verb} {name}"),
                None => format!("{verb} {count} entities"),
            }
        }
        (TargetKind::Entity, _, Some((name, _))) => format!("Set {property} of {name} to {after}"),
        (TargetKind::Entity, _, None) => format!("Set {property} to {after} on {count} entities"),
        (TargetKind::Component(kind), _, Some((name, _))) => {
            format!("Set {}.{property} of {name} to {after}", kind.display_name())
        }
        (TargetKind::Component(kind), _, None) => {
            format!("Set {}.{property} to {after} on {count} entities", kind.display_name())
        }
    }
}
