// ABOUTME: Routing table from topic name to subscription queues
// ABOUTME: Read-locked on delivery, each subscription drained by its own task

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::delivery::subscription::{Handler, Subscription, SubscriptionId, SubscriptionState};
use crate::protocol::messages::Event;

struct Slot {
    id: SubscriptionId,
    state: Arc<SubscriptionState>,
    queue: mpsc::Sender<Event>,
}

/// Per-topic lock held across `watch`/`unwatch`; the flag says whether the
/// transport is currently publishing the topic
pub(crate) type WatchGate = Arc<tokio::sync::Mutex<bool>>;

pub(crate) struct SubscriptionTable {
    topics: RwLock<HashMap<String, Vec<Slot>>>,
    gates: Mutex<HashMap<String, WatchGate>>,
    next_id: AtomicU64,
    queue_depth: usize,
}

impl SubscriptionTable {
    /// `queue_depth` must be non-zero; `ClientConfig::validate` enforces it
    pub(crate) fn new(queue_depth: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            queue_depth,
        }
    }

    /// Gate serialising watch state changes for `topic`
    ///
    /// Slots must only be added or removed while the gate is held, so the
    /// slot count and the watched flag never disagree.
    pub(crate) fn gate(&self, topic: &str) -> WatchGate {
        Arc::clone(self.gates.lock().entry(topic.to_string()).or_default())
    }

    /// Topics that ever had a gate, i.e. every topic subscribed so far
    pub(crate) fn gated_topics(&self) -> Vec<String> {
        self.gates.lock().keys().cloned().collect()
    }

    /// Register a handler and spawn its worker on `runtime`
    pub(crate) fn insert(&self, runtime: &Handle, topic: &str, handler: Handler) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let state = Arc::new(SubscriptionState::new());
        let (tx, rx) = mpsc::channel(self.queue_depth);

        spawn_worker(runtime, id, topic.to_string(), Arc::clone(&state), handler, rx);

        self.topics
            .write()
            .entry(topic.to_string())
            .or_default()
            .push(Slot {
                id,
                state: Arc::clone(&state),
                queue: tx,
            });

        Subscription {
            id,
            topic: topic.to_string(),
            state,
        }
    }

    /// Detach a subscription
    pub(crate) fn remove(&self, topic: &str, id: SubscriptionId) {
        let mut topics = self.topics.write();
        if let Some(slots) = topics.get_mut(topic) {
            slots.retain(|slot| slot.id != id);
            if slots.is_empty() {
                topics.remove(topic);
            }
        }
    }

    /// Whether any subscription is attached to `topic`
    pub(crate) fn has_listeners(&self, topic: &str) -> bool {
        self.topics.read().contains_key(topic)
    }

    /// Queue an event for every active subscription on its topic
    pub(crate) fn dispatch(&self, event: Event) -> usize {
        let topics = self.topics.read();
        let Some(slots) = topics.get(&event.topic) else {
            log::debug!("Dropping event for {}: no subscribers", event.topic);
            return 0;
        };

        let mut queued = 0;
        for slot in slots.iter().filter(|slot| slot.state.is_active()) {
            match slot.queue.try_send(event.clone()) {
                Ok(()) => queued += 1,
                Err(TrySendError::Full(_)) => {
                    log::warn!(
                        "Event queue full for {} on {}, dropping event",
                        slot.id,
                        event.topic
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    log::warn!(
                        "Worker for {} on {} has stopped, dropping event",
                        slot.id,
                        event.topic
                    );
                }
            }
        }
        queued
    }

    /// Deactivate and detach every subscription on `topic`
    pub(crate) fn clear_topic(&self, topic: &str) {
        if let Some(slots) = self.topics.write().remove(topic) {
            for slot in slots {
                slot.state.deactivate();
            }
        }
    }

    /// Number of attached subscriptions
    pub(crate) fn len(&self) -> usize {
        self.topics.read().values().map(Vec::len).sum()
    }
}

fn spawn_worker(
    runtime: &Handle,
    id: SubscriptionId,
    topic: String,
    state: Arc<SubscriptionState>,
    handler: Handler,
    mut rx: mpsc::Receiver<Event>,
) {
    runtime.spawn(async move {
        while let Some(event) = rx.recv().await {
            if !state.is_active() {
                log::trace!("Discarding event for inactive {} on {}", id, topic);
                continue;
            }
            if panic::catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                log::warn!("Handler for {} on {} panicked, event dropped", id, topic);
            }
        }
        log::debug!("Worker for {} on {} finished", id, topic);
    });
}
