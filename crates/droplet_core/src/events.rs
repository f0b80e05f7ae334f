//! Host change notifications
//!
//! A scroll host publishes property changes (content offset, content inset)
//! to observers registered per event kind. Delivery is synchronous and on the
//! host's own context, so an observer that writes back to the host will see
//! its own write re-delivered before the write call returns.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::geometry::{EdgeInsets, Point};

new_key_type! {
    /// Handle returned by a subscription, used to unsubscribe
    pub struct SubscriptionId;
}

/// Kind of host property change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    ContentOffset,
    ContentInset,
}

/// A host property change with its new value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    ContentOffsetChanged(Point),
    ContentInsetChanged(EdgeInsets),
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::ContentOffsetChanged(_) => HostEventKind::ContentOffset,
            HostEvent::ContentInsetChanged(_) => HostEventKind::ContentInset,
        }
    }
}

/// Observer callback
pub type HostHandler = Rc<dyn Fn(&HostEvent)>;

struct Subscription {
    kind: HostEventKind,
    handler: HostHandler,
}

/// Fans host events out to subscribers
///
/// Handlers may subscribe, unsubscribe, or trigger nested notifications while
/// being notified: the subscriber list is snapshotted before dispatch and no
/// internal borrow is held while a handler runs.
#[derive(Default)]
pub struct HostNotifier {
    subscriptions: RefCell<SlotMap<SubscriptionId, Subscription>>,
}

impl HostNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event
    pub fn subscribe(&self, kind: HostEventKind, handler: HostHandler) -> SubscriptionId {
        self.subscriptions
            .borrow_mut()
            .insert(Subscription { kind, handler })
    }

    /// Remove a handler. Returns false if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscriptions.borrow_mut().remove(id).is_some()
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.borrow().is_empty()
    }

    /// Deliver an event to every subscriber of its kind
    pub fn notify(&self, event: &HostEvent) {
        let kind = event.kind();
        let handlers: SmallVec<[HostHandler; 4]> = self
            .subscriptions
            .borrow()
            .values()
            .filter(|sub| sub.kind == kind)
            .map(|sub| sub.handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }
}
