//! Synchronous change notifications for an editing surface.
//!
//! Listeners are called in subscription order on the emitting thread,
//! before `emit` returns. Each subscription is an RAII handle: dropping it
//! removes the listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A change observed on an editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A different document (or none) is now attached.
    DocumentReplaced,
    /// The attached document's text changed.
    ContentChanged,
    /// The set of selections changed.
    SelectionChanged,
}

type Listener = Rc<dyn Fn(SurfaceEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Fan-out point for `SurfaceEvent`s.
#[derive(Default)]
pub struct EventHub {
    registry: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` until the returned handle is dropped.
    pub fn subscribe(&self, listener: impl Fn(SurfaceEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(listener)));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Delivers `event` to every listener registered when the call starts.
    ///
    /// The registry is not borrowed while listeners run, so a listener may
    /// emit, subscribe, or drop subscriptions re-entrantly.
    pub fn emit(&self, event: SurfaceEvent) {
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Handle keeping one listener registered.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}
