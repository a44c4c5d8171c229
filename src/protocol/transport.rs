// ABOUTME: Transport contract between the dispatcher and the authoring tool
// ABOUTME: Request/response send plus an event sink for pushed notifications

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::delivery::table::SubscriptionTable;
use crate::error::TransportError;
use crate::protocol::messages::{Call, Event, Reply};

/// Connection to the authoring tool
///
/// The dispatcher depends only on this contract; the wire protocol behind it
/// is up to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one call and wait for its reply
    async fn send(&self, call: Call) -> Result<Reply, TransportError>;

    /// Register the sink that receives pushed events
    ///
    /// Called once by the dispatcher when it is created.
    fn on_event(&self, sink: EventSink);

    /// Ask the tool to start publishing a topic
    async fn watch(&self, _topic: &str, _options: &Value) -> Result<(), TransportError> {
        Ok(())
    }

    /// Ask the tool to stop publishing a topic
    async fn unwatch(&self, _topic: &str) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Entry point for events pushed by a transport
///
/// Delivery never blocks: each subscription has its own bounded queue.
#[derive(Clone)]
pub struct EventSink {
    table: Arc<SubscriptionTable>,
}

impl EventSink {
    pub(crate) fn new(table: Arc<SubscriptionTable>) -> Self {
        Self { table }
    }

    /// Route an event to every active subscription on its topic
    ///
    /// Returns how many subscriptions it was queued for.
    pub fn deliver(&self, event: Event) -> usize {
        self.table.dispatch(event)
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("subscriptions", &self.table.len())
            .finish()
    }
}
