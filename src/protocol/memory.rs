// ABOUTME: In-memory transport that answers calls from scripted responders
// ABOUTME: Records sent calls and watched topics, and can emit events on demand

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::error::TransportError;
use crate::protocol::messages::{empty_object, Call, Event, Reply};
use crate::protocol::transport::{EventSink, Transport};

/// Produces the reply for a call
pub type Responder = Arc<dyn Fn(&Call) -> Reply + Send + Sync + 'static>;

/// Transport that never leaves the process
///
/// Calls without a responder are answered with `{}`.
pub struct MemoryTransport {
    responders: RwLock<HashMap<String, Responder>>,
    fallback: RwLock<Option<Responder>>,
    latency: RwLock<Option<Duration>>,
    sent: Mutex<Vec<Call>>,
    watched: Mutex<BTreeSet<String>>,
    sink: Mutex<Option<EventSink>>,
    closed: RwLock<bool>,
}

impl MemoryTransport {
    /// Create a transport with no responders
    pub fn new() -> Self {
        Self {
            responders: RwLock::new(HashMap::new()),
            fallback: RwLock::new(None),
            latency: RwLock::new(None),
            sent: Mutex::new(Vec::new()),
            watched: Mutex::new(BTreeSet::new()),
            sink: Mutex::new(None),
            closed: RwLock::new(false),
        }
    }

    /// Create a transport that answers every call with its own arguments
    pub fn echo() -> Self {
        let transport = Self::new();
        transport.respond_to_all(|call| Reply::Result(call.args.clone()));
        transport
    }

    /// Answer calls to `uri` with `responder`
    pub fn respond_to<F>(&self, uri: &str, responder: F)
    where
        F: Fn(&Call) -> Reply + Send + Sync + 'static,
    {
        self.responders
            .write()
            .insert(uri.to_string(), Arc::new(responder));
    }

    /// Answer calls that have no specific responder
    pub fn respond_to_all<F>(&self, responder: F)
    where
        F: Fn(&Call) -> Reply + Send + Sync + 'static,
    {
        *self.fallback.write() = Some(Arc::new(responder));
    }

    /// Delay every reply by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write() = latency;
    }

    /// Make every following call fail with [`TransportError::Closed`]
    pub fn close(&self) {
        *self.closed.write() = true;
    }

    /// Calls received so far, oldest first
    pub fn sent(&self) -> Vec<Call> {
        self.sent.lock().clone()
    }

    /// Topics the dispatcher currently asks to be published
    pub fn watched(&self) -> Vec<String> {
        self.watched.lock().iter().cloned().collect()
    }

    /// Push an event as if the authoring tool had published it
    ///
    /// Returns how many subscriptions it was queued for; 0 when no
    /// dispatcher is attached.
    pub fn emit(&self, topic: &str, payload: Value) -> usize {
        let sink = self.sink.lock().clone();
        match sink {
            Some(sink) => sink.deliver(Event::new(topic, payload)),
            None => {
                log::debug!("No dispatcher attached, dropping event for {}", topic);
                0
            }
        }
    }

    fn reply_for(&self, call: &Call) -> Reply {
        let responder = self
            .responders
            .read()
            .get(&call.uri)
            .cloned()
            .or_else(|| self.fallback.read().clone());

        match responder {
            Some(responder) => responder(call),
            None => Reply::Result(empty_object()),
        }
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, call: Call) -> Result<Reply, TransportError> {
        if *self.closed.read() {
            return Err(TransportError::Closed);
        }

        self.sent.lock().push(call.clone());

        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        Ok(self.reply_for(&call))
    }

    fn on_event(&self, sink: EventSink) {
        *self.sink.lock() = Some(sink);
    }

    async fn watch(&self, topic: &str, _options: &Value) -> Result<(), TransportError> {
        if *self.closed.read() {
            return Err(TransportError::Closed);
        }
        self.watched.lock().insert(topic.to_string());
        Ok(())
    }

    async fn unwatch(&self, topic: &str) -> Result<(), TransportError> {
        self.watched.lock().remove(topic);
        Ok(())
    }
}
