//! Pointer and keyboard events, and the keyboard subscription bus.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

/// Pointer event on the drawing surface. Positions are surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Enter,
    Escape,
    Backspace,
    /// Printable input, possibly more than one char (IME commits).
    Character(String),
}

impl Key {
    /// Parse a key name as reported by windowing toolkits ("Delete", "Enter", ...).
    /// Anything else that is non-empty is treated as character input.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "Delete" | "Del" => Some(Key::Delete),
            "Enter" | "Return" => Some(Key::Enter),
            "Escape" | "Esc" => Some(Key::Escape),
            "Backspace" => Some(Key::Backspace),
            "" => None,
            other => Some(Key::Character(other.to_string())),
        }
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

#[derive(Debug, Default)]
struct BusInner {
    next_id: u64,
    queues: BTreeMap<u64, VecDeque<KeyEvent>>,
}

/// Global keyboard event source.
///
/// Every subscriber gets its own queue; events published while nobody is
/// subscribed are dropped.
#[derive(Debug, Clone, Default)]
pub struct KeyboardBus {
    inner: Rc<RefCell<BusInner>>,
}

impl KeyboardBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new subscription. It stays registered until dropped.
    pub fn subscribe(&self) -> KeySubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.queues.insert(id, VecDeque::new());
        log::debug!("Keyboard subscriber {id} registered");
        KeySubscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Queue an event for every current subscriber.
    pub fn publish(&self, event: KeyEvent) {
        for queue in self.inner.borrow_mut().queues.values_mut() {
            queue.push_back(event.clone());
        }
    }

    /// Convenience for publishing a key press.
    pub fn press(&self, key: Key) {
        self.publish(KeyEvent::Pressed(key));
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().queues.len()
    }
}

/// Handle to a keyboard subscription. Unsubscribes when dropped.
#[derive(Debug)]
pub struct KeySubscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl KeySubscription {
    /// Take every event queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<KeyEvent> {
        let Some(bus) = self.bus.upgrade() else {
            return Vec::new();
        };
        let mut inner = bus.borrow_mut();
        inner
            .queues
            .get_mut(&self.id)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().queues.remove(&self.id);
            log::debug!("Keyboard subscriber {} removed", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Delete"), Some(Key::Delete));
        assert_eq!(Key::from_name("Return"), Some(Key::Enter));
        assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("a"), Some(Key::Character("a".to_string())));
        assert_eq!(Key::from_name(""), None);
    }

    #[test]
    fn test_pointer_position() {
        let event = PointerEvent::Up {
            position: Point::new(3.0, 4.0),
        };
        assert_eq!(event.position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_subscription_receives_in_order() {
        let bus = KeyboardBus::new();
        let sub = bus.subscribe();
        bus.press(Key::Delete);
        bus.publish(KeyEvent::Released(Key::Delete));

        assert_eq!(
            sub.drain(),
            vec![KeyEvent::Pressed(Key::Delete), KeyEvent::Released(Key::Delete)]
        );
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_events_before_subscribe_are_not_seen() {
        let bus = KeyboardBus::new();
        bus.press(Key::Delete);
        let sub = bus.subscribe();
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = KeyboardBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(first);
        assert_eq!(bus.subscriber_count(), 1);
        bus.press(Key::Escape);
        assert_eq!(second.drain(), vec![KeyEvent::Pressed(Key::Escape)]);
    }

    #[test]
    fn test_subscription_outlives_bus() {
        let bus = KeyboardBus::new();
        let sub = bus.subscribe();
        drop(bus);
        assert!(sub.drain().is_empty());
    }
}
