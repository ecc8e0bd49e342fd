//! Input events and a minimal listener registry.
//!
//! [`EventTarget`] stands in for the window and canvas the viewer listens
//! on. Listeners are plain closures keyed by [`ListenerId`], so unmounting
//! can remove exactly what mounting added and tests can count what is
//! left.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Keyboard keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other,
}

/// An input event delivered to an [`EventTarget`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    KeyDown(Key),
    Resize { width: u32, height: u32 },
}

/// Event type a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    KeyDown,
    Resize,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerDown { .. } => EventKind::PointerDown,
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::PointerUp => EventKind::PointerUp,
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::Resize { .. } => EventKind::Resize,
        }
    }
}

/// Handle returned by [`EventTarget::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Arc<dyn Fn(&InputEvent) + Send + Sync>;

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// A named source of input events with registered listeners.
pub struct EventTarget {
    name: String,
    registrations: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("name", &self.name)
            .field("listeners", &self.total_listener_count())
            .finish()
    }
}

impl EventTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registrations: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn registrations(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `listener` for events of `kind`.
    pub fn add_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations().push(Registration {
            id,
            kind,
            listener: Arc::new(listener),
        });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered here.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut registrations = self.registrations();
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() != before
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registrations()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    pub fn total_listener_count(&self) -> usize {
        self.registrations().len()
    }

    /// Deliver `event` to every listener of its kind, in registration
    /// order. Returns how many listeners ran.
    ///
    /// Listeners run outside the registry lock and may add or remove
    /// listeners themselves.
    pub fn dispatch(&self, event: &InputEvent) -> usize {
        let kind = event.kind();
        let listeners: Vec<Listener> = self
            .registrations()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.listener.clone())
            .collect();

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn dispatch_reaches_only_matching_kind() {
        let target = EventTarget::new("canvas");
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        target.add_listener(EventKind::KeyDown, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(target.dispatch(&InputEvent::PointerUp), 0);
        assert_eq!(target.dispatch(&InputEvent::KeyDown(Key::ArrowUp)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_listener_by_id() {
        let target = EventTarget::new("window");
        let a = target.add_listener(EventKind::Resize, |_| {});
        let _b = target.add_listener(EventKind::Resize, |_| {});
        assert_eq!(target.listener_count(EventKind::Resize), 2);

        assert!(target.remove_listener(a));
        assert!(!target.remove_listener(a));
        assert_eq!(target.listener_count(EventKind::Resize), 1);
    }

    #[test]
    fn listener_may_remove_itself_during_dispatch() {
        let target = Arc::new(EventTarget::new("canvas"));
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let t = target.clone();
        let s = slot.clone();
        let id = target.add_listener(EventKind::PointerUp, move |_| {
            if let Some(id) = s.lock().unwrap().take() {
                t.remove_listener(id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        assert_eq!(target.dispatch(&InputEvent::PointerUp), 1);
        assert_eq!(target.total_listener_count(), 0);
    }
}
