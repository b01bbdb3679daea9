// SPDX-License-Identifier: MIT OR Apache-2.0
//! Component-level proxy.

use super::MirrorSet;
use crate::commands::TargetKind;
use crate::components::ComponentKind;
use crate::entity::{EntityId, Scene};
use crate::error::Result;
use crate::session::EditSession;
use crate::value::{Mirrored, PropertyValue};

/// Mirrors one component kind across a selection of entities that all have it
#[derive(Debug)]
pub struct ComponentProxy {
    kind: ComponentKind,
    mirror: MirrorSet,
}

impl ComponentProxy {
    /// Build a proxy over the `kind` component of every selected entity.
    ///
    /// Fails with `EmptySelection` for an empty selection and with
    /// `ComponentMissing` if any selected entity lacks the component.
    pub fn new(scene: &mut Scene, selection: Vec<EntityId>, kind: ComponentKind) -> Result<Self> {
        let mirror = MirrorSet::new(scene, TargetKind::Component(kind), selection)?;
        Ok(Self { kind, mirror })
    }

    /// Mirrored component kind
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Entities whose components are mirrored
    pub fn selection(&self) -> &[EntityId] {
        &self.mirror.selection
    }

    /// Mirrored value of `property`
    pub fn get(&self, property: &str) -> Result<&Mirrored<PropertyValue>> {
        self.mirror.get(property)
    }

    /// Mirrored value of a float property
    pub fn float(&self, property: &str) -> Result<Mirrored<f32>> {
        Ok(self.get(property)?.to_float())
    }

    /// Mirrored value of a text property
    pub fn text(&self, property: &str) -> Result<Mirrored<String>> {
        Ok(self.get(property)?.to_text())
    }

    /// Write `value` to every selected component and record one undoable edit.
    /// Returns `Ok(false)` when every component already holds the value.
    pub fn set_mirrored(
        &mut self,
        session: &mut EditSession,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<bool> {
        self.mirror
            .set_mirrored(&mut session.scene, &mut session.history, property, value.into())
    }

    /// Re-read every mirrored property from the components, re-binding to
    /// them first if a component was attached or detached since the last refresh
    pub fn refresh(&mut self, scene: &mut Scene) -> Result<()> {
        self.mirror.refresh(scene)
    }

    /// Whether a selected entity gained or lost this component kind since the
    /// last refresh
    pub fn components_changed(&self) -> bool {
        self.mirror.components_changed()
    }

    /// Whether a component changed behind the proxy's back since the last refresh
    pub fn is_stale(&self) -> bool {
        self.mirror.is_stale()
    }

    /// Properties changed behind the proxy's back since the last refresh
    pub fn stale_properties(&self) -> Vec<&'static str> {
        self.mirror.stale_properties()
    }

    /// Whether the proxy is currently reacting to component changes
    pub fn updates_enabled(&self) -> bool {
        self.mirror.updates_enabled()
    }

    /// Unregister the proxy's listeners from its components
    pub fn detach(&mut self, scene: &mut Scene) {
        self.mirror.detach(scene);
    }
}
