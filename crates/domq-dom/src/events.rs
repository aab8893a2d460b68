//! DOM Events
//!
//! Listener registry and dispatch. Dispatch is split in two steps:
//! the document snapshots the listeners along the propagation path into an
//! [`EventPath`], then the path is run after the caller released its borrow
//! of the document. Listeners are therefore free to mutate the document.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::NodeId;

type Listener = Rc<RefCell<dyn FnMut(&Event)>>;

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A dispatched event
#[derive(Debug)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub bubbles: bool,
    pub cancelable: bool,
    current_target: Cell<NodeId>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Non-bubbling event
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            bubbles: false,
            cancelable: false,
            current_target: Cell::new(target),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Bubbling, cancelable event (the shape of a `click`)
    pub fn bubbling(event_type: &str, target: NodeId) -> Self {
        Self {
            bubbles: true,
            cancelable: true,
            ..Self::new(event_type, target)
        }
    }

    /// Node whose listener is currently running
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    /// Stop the event from reaching further ancestors
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Cancel the default action (only for cancelable events)
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

struct Registration {
    id: ListenerId,
    node: NodeId,
    event_type: String,
    listener: Listener,
}

/// Per-document listener storage
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, node: NodeId, event_type: &str, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.registrations.push(Registration {
            id,
            node,
            event_type: event_type.to_string(),
            listener,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub(crate) fn count(&self, node: NodeId) -> usize {
        self.registrations.iter().filter(|r| r.node == node).count()
    }

    /// Listeners for `event_type` on `node`, in registration order
    pub(crate) fn collect(&self, node: NodeId, event_type: &str, out: &mut Vec<(NodeId, Listener)>) {
        out.extend(
            self.registrations
                .iter()
                .filter(|r| r.node == node && r.event_type == event_type)
                .map(|r| (node, Rc::clone(&r.listener))),
        );
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.registrations.len())
            .finish()
    }
}

/// Snapshot of the listeners an event will visit
pub struct EventPath {
    entries: Vec<(NodeId, Listener)>,
}

impl EventPath {
    pub(crate) fn new(entries: Vec<(NodeId, Listener)>) -> Self {
        Self { entries }
    }

    /// Number of listeners on the path
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the listeners. Returns `false` if the default action was prevented.
    pub fn dispatch(self, event: &Event) -> bool {
        let mut current = NodeId::NONE;
        for (node, listener) in self.entries {
            if node != current {
                // stopPropagation still lets the remaining listeners of the
                // current node run
                if event.propagation_stopped() {
                    break;
                }
                current = node;
                event.current_target.set(node);
            }
            // A listener that re-entrantly triggers its own event is skipped
            // on the inner dispatch.
            match listener.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(event),
                Err(_) => tracing::trace!(?node, "skipping re-entrant listener"),
            }
        }
        !event.default_prevented()
    }
}
