// SPDX-License-Identifier: MIT OR Apache-2.0
//! Multi-selection proxies.
//!
//! A proxy presents one property set for N selected entities. Each mirrored
//! property is either [`Mirrored::Unanimous`] or [`Mirrored::Mixed`]. Writing
//! through the proxy fans the value out to every target and records a single
//! [`PropertyEdit`] whose undo restores each target's own prior value.
//!
//! Proxies listen to their targets. A change that did not come from the proxy
//! (an undo, another tool) marks the property stale so the UI knows to call
//! `refresh`. Changes the proxy makes itself are ignored while an
//! [`UpdateGuard`] is held.
//!
//! Listeners are tied to the proxy's lifetime: dropping a proxy retires them
//! without touching the scene. Attaching or detaching a component on a
//! selected entity marks the proxy stale too, and the next `refresh` binds to
//! the current components.

mod component;
mod entity;

pub use component::ComponentProxy;
pub use entity::EntityProxy;

use crate::commands::{write_all, PropertyEdit, TargetKind};
use crate::entity::{EntityId, Scene, COMPONENTS_CHANGED};
use crate::error::{EditError, Result};
use crate::history::HistoryStack;
use crate::notify::SubscriptionId;
use crate::property::{find_descriptor, Inspectable};
use crate::value::{Mirrored, PropertyValue};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared between a proxy and the listeners it registers on its targets
#[derive(Debug)]
struct Feedback {
    updates_enabled: Cell<bool>,
    stale: RefCell<Vec<&'static str>>,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            updates_enabled: Cell::new(true),
            stale: RefCell::new(Vec::new()),
        }
    }
}

impl Feedback {
    fn suspend(self: &Rc<Self>) -> UpdateGuard {
        let previous = self.updates_enabled.replace(false);
        UpdateGuard {
            feedback: Rc::clone(self),
            previous,
        }
    }

    fn on_target_changed(&self, property: &'static str) {
        if !self.updates_enabled.get() {
            return;
        }
        let mut stale = self.stale.borrow_mut();
        if !stale.contains(&property) {
            stale.push(property);
        }
    }
}

/// Scoped token that keeps a proxy from reacting to its targets.
///
/// Dropping the guard restores the previous state, including on early return.
#[derive(Debug)]
pub struct UpdateGuard {
    feedback: Rc<Feedback>,
    previous: bool,
}

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        self.feedback.updates_enabled.set(self.previous);
    }
}

/// Mirrored state of one target kind over a fixed selection
#[derive(Debug)]
struct MirrorSet {
    target: TargetKind,
    selection: Vec<EntityId>,
    values: IndexMap<&'static str, Mirrored<PropertyValue>>,
    feedback: Rc<Feedback>,
    subscriptions: Vec<(EntityId, TargetKind, SubscriptionId)>,
}

impl MirrorSet {
    fn new(scene: &mut Scene, target: TargetKind, selection: Vec<EntityId>) -> Result<Self> {
        if selection.is_empty() {
            return Err(EditError::EmptySelection);
        }
        for id in &selection {
            target.resolve(scene, *id)?;
        }

        let mut mirror = Self {
            target,
            selection,
            values: IndexMap::new(),
            feedback: Rc::new(Feedback::default()),
            subscriptions: Vec::new(),
        };
        mirror.attach(scene)?;
        mirror.refresh(scene)?;
        Ok(mirror)
    }

    fn attach(&mut self, scene: &mut Scene) -> Result<()> {
        for id in &self.selection {
            let subscription = self
                .target
                .resolve_mut(scene, *id)?
                .notifier_mut()
                .subscribe_weak(&self.feedback, |feedback, event| {
                    feedback.on_target_changed(event.property);
                });
            self.subscriptions.push((*id, self.target, subscription));

            // A re-attached component has a fresh notifier; the owner reports the swap
            if let TargetKind::Component(kind) = self.target {
                let subscription = scene.entity_mut(*id)?.notifier_mut().subscribe_weak(
                    &self.feedback,
                    move |feedback, event| {
                        if event.property == COMPONENTS_CHANGED && event.origin.component == Some(kind) {
                            feedback.on_target_changed(event.property);
                        }
                    },
                );
                self.subscriptions.push((*id, TargetKind::Entity, subscription));
            }
        }
        Ok(())
    }

    fn detach(&mut self, scene: &mut Scene) {
        for (id, target, subscription) in self.subscriptions.drain(..) {
            if let Ok(object) = target.resolve_mut(scene, id) {
                object.notifier_mut().unsubscribe(subscription);
            }
        }
    }

    fn refresh(&mut self, scene: &mut Scene) -> Result<()> {
        if self.components_changed() {
            tracing::debug!("Re-binding {:?} listeners after component change", self.target);
            self.detach(scene);
            self.attach(scene)?;
        }

        let _guard = self.feedback.suspend();

        let mut values = IndexMap::new();
        for descriptor in self.target.properties() {
            let mut current = Vec::with_capacity(self.selection.len());
            for id in &self.selection {
                let value = self
                    .target
                    .resolve(scene, *id)?
                    .get(descriptor.name)
                    .ok_or_else(|| EditError::UnknownProperty(descriptor.name.to_string()))?;
                current.push(value);
            }
            if let Some(mirrored) = Mirrored::<PropertyValue>::from_properties(current) {
                values.insert(descriptor.name, mirrored);
            }
        }

        self.values = values;
        self.feedback.stale.borrow_mut().clear();
        Ok(())
    }

    fn components_changed(&self) -> bool {
        self.feedback.stale.borrow().contains(&COMPONENTS_CHANGED)
    }

    fn get(&self, property: &str) -> Result<&Mirrored<PropertyValue>> {
        self.values
            .get(property)
            .ok_or_else(|| EditError::UnknownProperty(property.to_string()))
    }

    fn set_mirrored(
        &mut self,
        scene: &mut Scene,
        history: &mut HistoryStack<Scene>,
        property: &str,
        value: PropertyValue,
    ) -> Result<bool> {
        let descriptor = find_descriptor(self.target.properties(), property)?;
        if let Err(e) = descriptor.validate(&value) {
            tracing::warn!("Rejected edit of {:?}.{property}: {e}", self.target);
            return Err(e);
        }

        let mut before = Vec::with_capacity(self.selection.len());
        for id in &self.selection {
            let old = self
                .target
                .resolve(scene, *id)?
                .get(descriptor.name)
                .ok_or_else(|| EditError::UnknownProperty(descriptor.name.to_string()))?;
            before.push((*id, old));
        }

        if before.iter().all(|(_, old)| old.is_same_as(&value)) {
            return Ok(false);
        }

        {
            let _guard = self.feedback.suspend();
            let writes: Vec<_> = self.selection.iter().map(|id| (*id, &value)).collect();
            let changed = write_all(scene, self.target, descriptor.name, &writes)?;
            tracing::debug!(
                "Fan-out {:?}.{} = {value} to {changed}/{} targets",
                self.target,
                descriptor.name,
                self.selection.len()
            );
            self.values
                .insert(descriptor.name, Mirrored::Unanimous(value.clone()));
        }

        history.record(PropertyEdit::new(
            scene,
            self.target,
            descriptor.name,
            before,
            value,
        ));
        Ok(true)
    }

    fn stale_properties(&self) -> Vec<&'static str> {
        self.feedback.stale.borrow().clone()
    }

    fn is_stale(&self) -> bool {
        !self.feedback.stale.borrow().is_empty()
    }

    fn updates_enabled(&self) -> bool {
        self.feedback.updates_enabled.get()
    }
}
