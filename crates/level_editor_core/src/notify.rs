// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property change notification.
//!
//! Any object that wants to be watched owns a [`ChangeNotifier`]. Listeners
//! register a closure and get back a [`SubscriptionId`] that must be handed to
//! [`ChangeNotifier::unsubscribe`] when the listener goes away, or subscribe
//! with [`ChangeNotifier::subscribe_weak`] to tie the listener to an owner.

use crate::components::ComponentKind;
use crate::entity::EntityId;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Where a change happened: an entity, or one of its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeOrigin {
    /// Owning entity
    pub entity: EntityId,
    /// Component kind, `None` for the entity's own properties
    pub component: Option<ComponentKind>,
}

/// "Property X changed" event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChanged {
    /// Object that changed
    pub origin: ChangeOrigin,
    /// Name of the property that changed
    pub property: &'static str,
}

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

struct Listener {
    id: SubscriptionId,
    callback: Box<dyn FnMut(&PropertyChanged)>,
    alive: Option<Box<dyn Fn() -> bool>>,
}

impl Listener {
    fn is_alive(&self) -> bool {
        self.alive.as_ref().map_or(true, |alive| alive())
    }
}

/// Synchronous, ordered fan-out of property change events
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Listener>,
}

impl ChangeNotifier {
    /// Create a notifier with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in subscription order.
    pub fn subscribe(&mut self, listener: impl FnMut(&PropertyChanged) + 'static) -> SubscriptionId {
        self.push(Box::new(listener), None)
    }

    /// Register a listener that lives as long as `owner`. Once the last strong
    /// reference to `owner` is dropped the listener stops running and is
    /// discarded on the next subscribe or notify.
    pub fn subscribe_weak<T: 'static>(
        &mut self,
        owner: &Rc<T>,
        mut listener: impl FnMut(&T, &PropertyChanged) + 'static,
    ) -> SubscriptionId {
        let target = Rc::downgrade(owner);
        let liveness: Weak<T> = Weak::clone(&target);
        let callback = move |event: &PropertyChanged| {
            if let Some(owner) = target.upgrade() {
                listener(&owner, event);
            }
        };
        self.push(Box::new(callback), Some(Box::new(move || liveness.strong_count() > 0)))
    }

    fn push(
        &mut self,
        callback: Box<dyn FnMut(&PropertyChanged)>,
        alive: Option<Box<dyn Fn() -> bool>>,
    ) -> SubscriptionId {
        self.prune();
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.listeners.push(Listener { id, callback, alive });
        id
    }

    fn prune(&mut self) {
        self.listeners.retain(Listener::is_alive);
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Invoke every live listener with `event`
    pub fn notify(&mut self, event: &PropertyChanged) {
        self.prune();
        for listener in &mut self.listeners {
            (listener.callback)(event);
        }
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().filter(|l| l.is_alive()).count()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
