//! Synchronous in-process publish/subscribe.
//!
//! Both orchestrators announce collisions and run completions here so
//! that autoplay logic and the presentation layer can react without the
//! engine knowing about them. Delivery is synchronous, in registration
//! order, on the publisher's call stack; handlers must not re-enter the
//! bus they are being called from.

use crate::CollisionOutcome;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    CollisionDetected,
    ReactionCompleted,
}

/// A tagged engine event carrying the originating outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
    CollisionDetected(CollisionOutcome),
    ReactionCompleted(CollisionOutcome),
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::CollisionDetected(_) => EventKind::CollisionDetected,
            EngineEvent::ReactionCompleted(_) => EventKind::ReactionCompleted,
        }
    }

    pub fn outcome(&self) -> &CollisionOutcome {
        match self {
            EngineEvent::CollisionDetected(o) => o,
            EngineEvent::ReactionCompleted(o) => o,
        }
    }
}

/// Token returned by [`EventBus::on`], used to unsubscribe.
pub type HandlerId = usize;

type Handler = Box<dyn FnMut(&EngineEvent)>;

#[derive(Default)]
pub struct EventBus {
    // One flat list keeps registration order across kinds.
    handlers: Vec<(EventKind, HandlerId, Handler)>,
    next_id: HandlerId,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> HandlerId
    where
        F: FnMut(&EngineEvent) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers.push((kind, id, Box::new(handler)));
        id
    }

    /// Unregister a handler. Returns false if the id was not subscribed
    /// to this kind.
    pub fn off(&mut self, kind: EventKind, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(k, i, _)| !(*k == kind && *i == id));
        self.handlers.len() != before
    }

    /// Deliver an event to all matching handlers, in registration order.
    pub fn publish(&mut self, event: &EngineEvent) {
        let kind = event.kind();
        for (k, _, handler) in self.handlers.iter_mut() {
            if *k == kind {
                handler(event);
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::cell::RefCell;

    fn reacted_event() -> EngineEvent {
        EngineEvent::CollisionDetected(CollisionOutcome::Reacted {
            draw: 0.1,
            probability: 0.9,
            time: 1.0,
        })
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.on(EventKind::CollisionDetected, move |_| {
                log.borrow_mut().push(tag);
            });
        }
        bus.publish(&reacted_event());
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_kind_filtering() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        {
            let hits = Rc::clone(&hits);
            bus.on(EventKind::ReactionCompleted, move |_| {
                *hits.borrow_mut() += 1;
            });
        }
        bus.publish(&reacted_event());
        assert_eq!(*hits.borrow(), 0);

        let completed = EngineEvent::ReactionCompleted(CollisionOutcome::Missed { time: 2.0 });
        bus.publish(&completed);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let id = {
            let hits = Rc::clone(&hits);
            bus.on(EventKind::CollisionDetected, move |_| {
                *hits.borrow_mut() += 1;
            })
        };
        bus.publish(&reacted_event());
        assert!(bus.off(EventKind::CollisionDetected, id));
        assert!(!bus.off(EventKind::CollisionDetected, id));
        bus.publish(&reacted_event());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_event_accessors() {
        let event = reacted_event();
        assert_eq!(event.kind(), EventKind::CollisionDetected);
        assert!(event.outcome().reacted());
    }
}
