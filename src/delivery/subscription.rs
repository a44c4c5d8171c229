// ABOUTME: Subscription handle returned by the dispatcher
// ABOUTME: Tracks topic, id and the shared active flag checked before each delivery

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::protocol::messages::Event;

/// Callback invoked for every event on a subscribed topic
pub type Handler = Arc<dyn Fn(Event) + Send + Sync + 'static>;

/// Identifier unique within one dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

#[derive(Debug)]
pub(crate) struct SubscriptionState {
    active: AtomicBool,
}

impl SubscriptionState {
    pub(crate) fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Returns whether this call flipped the flag
    pub(crate) fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }
}

/// Handle to a live (or former) subscription
///
/// Dropping the handle does not unsubscribe; pass it to
/// [`Dispatcher::unsubscribe`](crate::Dispatcher::unsubscribe) or shut the
/// dispatcher down.
#[derive(Debug)]
pub struct Subscription {
    pub(crate) id: SubscriptionId,
    pub(crate) topic: String,
    pub(crate) state: Arc<SubscriptionState>,
}

impl Subscription {
    /// Subscription id
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Topic this subscription listens to
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// False once unsubscribed or the dispatcher has shut down
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
