//! Events emitted by child view-models and the forwarding handles that carry
//! them to the reconciler's shared event stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::SearchScope;

/// Where a selection or child action wants to go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum Navigation {
    /// Thread opened on a status
    Context { status_id: String },
    Profile { account_id: String },
    TagTimeline { name: String },
    SearchScope { scope: SearchScope },
    Url { url: String },
}

/// Event published on the reconciler's event stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CollectionItemEvent {
    Navigation(Navigation),
    /// Open the composer replying to a status
    Reply { status_id: String },
    Share { url: String },
}

/// Sending half handed to a child view-model.
///
/// Events only reach the sink while the matching [`ForwardingSubscription`]
/// is alive.
#[derive(Debug, Clone)]
pub struct EventForwarder {
    sink: broadcast::Sender<CollectionItemEvent>,
    active: Arc<AtomicBool>,
}

impl EventForwarder {
    /// Forward an event. Returns true if it was delivered to at least one
    /// listener.
    pub fn send(&self, event: CollectionItemEvent) -> bool {
        if !self.active.load(Ordering::Acquire) {
            tracing::trace!(?event, "Dropping event from released view-model");
            return false;
        }
        self.sink.send(event).is_ok()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Owner side of a forwarding link. Dropping it releases the link.
#[derive(Debug)]
pub struct ForwardingSubscription {
    active: Arc<AtomicBool>,
}

impl ForwardingSubscription {
    /// Link a new forwarder to `sink`.
    pub fn new(sink: broadcast::Sender<CollectionItemEvent>) -> (Self, EventForwarder) {
        let active = Arc::new(AtomicBool::new(true));
        let forwarder = EventForwarder {
            sink,
            active: Arc::clone(&active),
        };
        (Self { active }, forwarder)
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for ForwardingSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
