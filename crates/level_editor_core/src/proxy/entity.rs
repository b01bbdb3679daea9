// SPDX-License-Identifier: MIT OR Apache-2.0
//! Entity-level proxy.

use super::{ComponentProxy, MirrorSet};
use crate::commands::TargetKind;
use crate::components::ComponentKind;
use crate::entity::{EntityId, Scene};
use crate::error::Result;
use crate::session::EditSession;
use crate::value::{Mirrored, PropertyValue};
use indexmap::IndexMap;

/// Mirrors the entity properties of a selection, plus one [`ComponentProxy`]
/// for every component kind that all selected entities have.
///
/// The selection is fixed; a new selection means a new proxy.
#[derive(Debug)]
pub struct EntityProxy {
    mirror: MirrorSet,
    components: IndexMap<ComponentKind, ComponentProxy>,
}

impl EntityProxy {
    /// Build a proxy over `selection` and compute its initial state.
    ///
    /// Fails with `EmptySelection` for an empty selection and with
    /// `EntityNotFound` if any id is not in the scene.
    pub fn new(scene: &mut Scene, selection: Vec<EntityId>) -> Result<Self> {
        let mirror = MirrorSet::new(scene, TargetKind::Entity, selection)?;
        let components = shared_components(scene, &mirror.selection)?;

        tracing::debug!(
            "Selection proxy over {} entities, shared components {:?}",
            mirror.selection.len(),
            components.keys().collect::<Vec<_>>()
        );
        Ok(Self { mirror, components })
    }

    /// Selected entities, in selection order
    pub fn selection(&self) -> &[EntityId] {
        &self.mirror.selection
    }

    /// Mirrored value of an entity property
    pub fn get(&self, property: &str) -> Result<&Mirrored<PropertyValue>> {
        self.mirror.get(property)
    }

    /// Mirrored entity name
    pub fn name(&self) -> Mirrored<String> {
        self.mirror
            .get("name")
            .map_or(Mirrored::Mixed, Mirrored::<PropertyValue>::to_text)
    }

    /// Mirrored enabled flag
    pub fn is_enabled(&self) -> Mirrored<bool> {
        self.mirror
            .get("is_enabled")
            .map_or(Mirrored::Mixed, Mirrored::<PropertyValue>::to_bool)
    }

    /// Write `value` to every selected entity and record one undoable edit.
    /// Returns `Ok(false)` when every entity already holds the value.
    pub fn set_mirrored(
        &mut self,
        session: &mut EditSession,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<bool> {
        self.mirror
            .set_mirrored(&mut session.scene, &mut session.history, property, value.into())
    }

    /// Rename every selected entity
    pub fn set_name(&mut self, session: &mut EditSession, name: impl Into<String>) -> Result<bool> {
        self.set_mirrored(session, "name", name.into())
    }

    /// Enable or disable every selected entity
    pub fn set_enabled(&mut self, session: &mut EditSession, enabled: bool) -> Result<bool> {
        self.set_mirrored(session, "is_enabled", enabled)
    }

    /// Proxy for a component kind shared by the whole selection
    pub fn component(&self, kind: ComponentKind) -> Option<&ComponentProxy> {
        self.components.get(&kind)
    }

    /// Mutable proxy for a component kind shared by the whole selection
    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut ComponentProxy> {
        self.components.get_mut(&kind)
    }

    /// Component kinds shared by the whole selection
    pub fn component_kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    /// Re-read entity and component properties from the scene. After a
    /// component was attached or detached the shared component set is rebuilt.
    pub fn refresh(&mut self, scene: &mut Scene) -> Result<()> {
        if self.components_changed() {
            for proxy in self.components.values_mut() {
                proxy.detach(scene);
            }
            self.components = shared_components(scene, &self.mirror.selection)?;
        } else {
            for proxy in self.components.values_mut() {
                proxy.refresh(scene)?;
            }
        }
        self.mirror.refresh(scene)
    }

    /// Whether a selected entity gained or lost a component since the last refresh
    pub fn components_changed(&self) -> bool {
        self.mirror.components_changed() || self.components.values().any(ComponentProxy::components_changed)
    }

    /// Whether anything changed behind the proxy's back since the last refresh
    pub fn is_stale(&self) -> bool {
        self.mirror.is_stale() || self.components.values().any(ComponentProxy::is_stale)
    }

    /// Entity properties changed behind the proxy's back since the last refresh
    pub fn stale_properties(&self) -> Vec<&'static str> {
        self.mirror.stale_properties()
    }

    /// Whether the proxy is currently reacting to entity changes
    pub fn updates_enabled(&self) -> bool {
        self.mirror.updates_enabled()
    }

    /// Unregister all listeners, including those of the component proxies
    pub fn detach(&mut self, scene: &mut Scene) {
        self.mirror.detach(scene);
        for proxy in self.components.values_mut() {
            proxy.detach(scene);
        }
    }
}

/// One component proxy per kind that every entity in `selection` has
fn shared_components(
    scene: &mut Scene,
    selection: &[EntityId],
) -> Result<IndexMap<ComponentKind, ComponentProxy>> {
    let mut components = IndexMap::new();
    for kind in ComponentKind::ALL {
        let shared = selection
            .iter()
            .all(|id| scene.get(id).is_some_and(|e| e.has_component(kind)));
        if shared {
            components.insert(kind, ComponentProxy::new(scene, selection.to_vec(), kind)?);
        }
    }
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Script;
    use crate::error::EditError;
    use crate::property::Inspectable;

    fn spawn_all(session: &mut EditSession, names: &[&str]) -> Vec<EntityId> {
        names.iter().map(|n| session.scene.spawn(*n)).collect()
    }

    fn set_x(session: &mut EditSession, id: EntityId, x: f32) {
        session
            .scene
            .entity_mut(id)
            .unwrap()
            .require_component_mut(ComponentKind::Transform)
            .unwrap()
            .set("position.x", x.into())
            .unwrap();
    }

    fn x_of(session: &EditSession, id: EntityId) -> f32 {
        let entity = session.scene.entity(id).unwrap();
        let transform = entity.component(ComponentKind::Transform).unwrap();
        transform.as_transform().unwrap().position[0]
    }

    fn enabled_flags(session: &EditSession, ids: &[EntityId]) -> Vec<bool> {
        ids.iter()
            .map(|id| session.scene.entity(*id).unwrap().is_enabled())
            .collect()
    }

    #[test]
    fn test_empty_selection_rejected() {
        let mut session = EditSession::default();
        assert!(matches!(
            EntityProxy::new(&mut session.scene, Vec::new()),
            Err(EditError::EmptySelection)
        ));
    }

    #[test]
    fn test_unknown_entity_rejected() {
        let mut session = EditSession::default();
        let ghost = EntityId::new();
        assert_eq!(
            EntityProxy::new(&mut session.scene, vec![ghost]).err(),
            Some(EditError::EntityNotFound(ghost))
        );
    }

    #[test]
    fn test_unanimous_goes_mixed_after_out_of_band_change() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["A", "B", "C"]);
        for id in &ids {
            set_x(&mut session, *id, 5.0);
        }

        let mut proxy = EntityProxy::new(&mut session.scene, ids.clone()).unwrap();
        let transform = proxy.component(ComponentKind::Transform).unwrap();
        assert_eq!(transform.float("position.x").unwrap(), Mirrored::Unanimous(5.0));
        assert!(!proxy.is_stale());

        set_x(&mut session, ids[1], 7.0);
        assert!(proxy.is_stale());

        proxy.refresh(&mut session.scene).unwrap();
        let transform = proxy.component(ComponentKind::Transform).unwrap();
        let mirrored = transform.float("position.x").unwrap();
        assert_eq!(mirrored, Mirrored::Mixed);
        assert_ne!(mirrored, Mirrored::Unanimous(5.0));
        assert_ne!(mirrored, Mirrored::Unanimous(7.0));
        assert_ne!(mirrored, Mirrored::Unanimous(0.0));
        assert!(!proxy.is_stale());
    }

    #[test]
    fn test_mixed_flags_set_and_undo_per_entity() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["A", "B", "C"]);
        session.set_entity_enabled(ids[1], false).unwrap();
        session.history.reset();

        let mut proxy = EntityProxy::new(&mut session.scene, ids.clone()).unwrap();
        assert_eq!(proxy.is_enabled(), Mirrored::Mixed);

        assert_eq!(proxy.set_enabled(&mut session, false), Ok(true));
        assert_eq!(enabled_flags(&session, &ids), vec![false, false, false]);
        assert_eq!(proxy.is_enabled(), Mirrored::Unanimous(false));
        assert_eq!(session.history.undo_depth(), 1);
        assert_eq!(session.history.undo_label(), Some("Disable 3 entities"));
        assert!(!proxy.is_stale());

        assert_eq!(session.undo(), Ok(true));
        assert_eq!(enabled_flags(&session, &ids), vec![true, false, true]);

        assert_eq!(session.redo(), Ok(true));
        assert_eq!(enabled_flags(&session, &ids), vec![false, false, false]);
    }

    #[test]
    fn test_writing_current_value_is_a_noop() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["Same", "Same"]);
        let events = std::rc::Rc::new(std::cell::Cell::new(0));
        for id in &ids {
            let counter = std::rc::Rc::clone(&events);
            session
                .scene
                .entity_mut(*id)
                .unwrap()
                .notifier_mut()
                .subscribe(move |_| counter.set(counter.get() + 1));
        }

        let mut proxy = EntityProxy::new(&mut session.scene, ids).unwrap();
        assert_eq!(proxy.name(), Mirrored::Unanimous("Same".to_string()));
        assert_eq!(proxy.set_name(&mut session, "Same"), Ok(false));
        assert_eq!(proxy.set_enabled(&mut session, true), Ok(false));

        assert_eq!(events.get(), 0);
        assert!(!session.history.can_undo());
    }

    #[test]
    fn test_rename_rejects_empty_name() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["A", "B"]);
        let mut proxy = EntityProxy::new(&mut session.scene, ids.clone()).unwrap();

        assert!(matches!(
            proxy.set_name(&mut session, "   "),
            Err(EditError::Rejected { property: "name", .. })
        ));
        assert!(matches!(
            proxy.set_mirrored(&mut session, "name", 3.0_f32),
            Err(EditError::TypeMismatch { .. })
        ));
        assert!(matches!(
            proxy.set_mirrored(&mut session, "colour", true),
            Err(EditError::UnknownProperty(_))
        ));
        assert_eq!(proxy.name(), Mirrored::Mixed);
        assert!(!session.history.can_undo());
    }

    #[test]
    fn test_shared_components_only() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["A", "B"]);
        session
            .scene
            .entity_mut(ids[0])
            .unwrap()
            .add_component(Script::new("Door"))
            .unwrap();

        let proxy = EntityProxy::new(&mut session.scene, ids.clone()).unwrap();
        assert_eq!(proxy.component_kinds().collect::<Vec<_>>(), vec![ComponentKind::Transform]);
        assert!(proxy.component(ComponentKind::Script).is_none());

        session
            .scene
            .entity_mut(ids[1])
            .unwrap()
            .add_component(Script::new("Door"))
            .unwrap();
        let proxy = EntityProxy::new(&mut session.scene, ids).unwrap();
        let script = proxy.component(ComponentKind::Script).unwrap();
        assert_eq!(script.text("name").unwrap(), Mirrored::Unanimous("Door".to_string()));
    }

    #[test]
    fn test_component_edit_is_one_action() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["A", "B", "C"]);
        for (id, x) in ids.iter().zip([1.0, 2.0, 3.0]) {
            set_x(&mut session, *id, x);
        }

        let mut proxy = EntityProxy::new(&mut session.scene, ids.clone()).unwrap();
        let transform = proxy.component_mut(ComponentKind::Transform).unwrap();
        assert_eq!(transform.set_mirrored(&mut session, "position.x", 10.0_f32), Ok(true));
        assert_eq!(session.history.undo_depth(), 1);
        assert!(ids.iter().all(|id| x_of(&session, *id) == 10.0));

        session.undo().unwrap();
        let xs: Vec<_> = ids.iter().map(|id| x_of(&session, *id)).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert!(proxy.is_stale());
        assert!(proxy.stale_properties().is_empty());
    }

    #[test]
    fn test_undo_sequence_reverse_chronological() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["A", "B"]);
        let mut proxy = EntityProxy::new(&mut session.scene, ids.clone()).unwrap();

        let names = |session: &EditSession| -> Vec<String> {
            ids.iter()
                .map(|id| session.scene.entity(*id).unwrap().name().to_string())
                .collect()
        };

        proxy.set_name(&mut session, "Wall").unwrap();
        proxy.set_enabled(&mut session, false).unwrap();
        proxy.set_name(&mut session, "Floor").unwrap();
        assert_eq!(session.history.undo_depth(), 3);

        session.undo().unwrap();
        assert_eq!(names(&session), vec!["Wall", "Wall"]);
        assert_eq!(enabled_flags(&session, &ids), vec![false, false]);

        session.undo().unwrap();
        assert_eq!(names(&session), vec!["Wall", "Wall"]);
        assert_eq!(enabled_flags(&session, &ids), vec![true, true]);

        session.undo().unwrap();
        assert_eq!(names(&session), vec!["A", "B"]);
        assert_eq!(session.undo(), Ok(false));

        proxy.refresh(&mut session.scene).unwrap();
        assert_eq!(proxy.name(), Mirrored::Mixed);
        assert_eq!(proxy.is_enabled(), Mirrored::Unanimous(true));
    }

    #[test]
    fn test_detach_stops_listening() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["A", "B"]);
        let mut proxy = EntityProxy::new(&mut session.scene, ids.clone()).unwrap();
        // Entity properties, plus component swaps for the Transform sub-proxy
        assert_eq!(
            session.scene.entity_mut(ids[0]).unwrap().notifier_mut().listener_count(),
            2
        );

        proxy.detach(&mut session.scene);
        assert_eq!(
            session.scene.entity_mut(ids[0]).unwrap().notifier_mut().listener_count(),
            0
        );
        session.rename_entity(ids[0], "Moved").unwrap();
        assert!(!proxy.is_stale());
        assert_eq!(session.history.undo_label(), Some("Rename entity 'A' to 'Moved'"));
    }

    fn listener_counts(session: &mut EditSession, id: EntityId) -> (usize, usize) {
        let entity = session.scene.entity_mut(id).unwrap();
        let own = entity.notifier_mut().listener_count();
        let transform = entity
            .require_component_mut(ComponentKind::Transform)
            .unwrap()
            .notifier_mut()
            .listener_count();
        (own, transform)
    }

    #[test]
    fn test_dropped_proxies_release_listeners() {
        let mut session = EditSession::default();
        let id = session.scene.spawn("A");

        for _ in 0..1000 {
            let proxy = session.select(vec![id]).unwrap();
            drop(proxy);
        }
        assert_eq!(listener_counts(&mut session, id), (0, 0));

        let kept = session.select(vec![id]).unwrap();
        assert_eq!(listener_counts(&mut session, id), (2, 1));

        session.rename_entity(id, "B").unwrap();
        assert!(kept.is_stale());
        drop(kept);
        assert_eq!(listener_counts(&mut session, id), (0, 0));
    }

    #[test]
    fn test_undo_restores_names_that_new_edits_would_reject() {
        let mut session = EditSession::default();
        let ids = spawn_all(&mut session, &["", "B"]);
        let mut proxy = session.select(ids.clone()).unwrap();

        assert_eq!(proxy.set_name(&mut session, "Wall"), Ok(true));
        assert_eq!(session.undo(), Ok(true));
        assert_eq!(session.history.undo_depth(), 0);

        let names: Vec<_> = ids
            .iter()
            .map(|id| session.scene.entity(*id).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["", "B"]);

        assert_eq!(session.redo(), Ok(true));
        proxy.refresh(&mut session.scene).unwrap();
        assert_eq!(proxy.name(), Mirrored::Unanimous("Wall".to_string()));
    }

    #[test]
    fn test_component_swap_keeps_out_of_band_detection() {
        let mut session = EditSession::default();
        let id = session.scene.spawn("Door");
        session.add_component(id, Script::new("DoorController")).unwrap();
        let script = TargetKind::Component(ComponentKind::Script);

        let mut proxy = session.select(vec![id]).unwrap();
        assert!(proxy.component(ComponentKind::Script).is_some());

        session.remove_component(id, ComponentKind::Script).unwrap();
        assert!(proxy.is_stale());
        assert!(proxy.components_changed());
        proxy.refresh(&mut session.scene).unwrap();
        assert!(proxy.component(ComponentKind::Script).is_none());
        assert!(!proxy.is_stale());

        session.undo().unwrap();
        assert!(proxy.components_changed());
        proxy.refresh(&mut session.scene).unwrap();
        assert!(!proxy.is_stale());
        let scripts = proxy.component(ComponentKind::Script).unwrap();
        assert_eq!(
            scripts.text("name").unwrap(),
            Mirrored::Unanimous("DoorController".to_string())
        );

        session
            .set_property(id, script, "name", "LockedDoor".into())
            .unwrap();
        assert!(proxy.is_stale());
        assert!(!proxy.components_changed());
    }

    #[test]
    fn test_component_proxy_rebinds_after_swap() {
        let mut session = EditSession::default();
        let id = session.scene.spawn("Door");
        session.add_component(id, Script::new("DoorController")).unwrap();
        let mut scripts = session.select_component(vec![id], ComponentKind::Script).unwrap();

        session.remove_component(id, ComponentKind::Script).unwrap();
        session.undo().unwrap();
        assert!(scripts.components_changed());
        scripts.refresh(&mut session.scene).unwrap();
        assert!(!scripts.is_stale());

        let target = TargetKind::Component(ComponentKind::Script);
        session.set_property(id, target, "name", "Gate".into()).unwrap();
        assert!(scripts.is_stale());
        assert_eq!(scripts.stale_properties(), vec!["name"]);
    }
}
