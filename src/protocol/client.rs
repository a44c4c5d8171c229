// ABOUTME: Dispatcher that validates WAAPI calls and subscriptions against the catalog
// ABOUTME: Forwards calls to the transport and attaches handlers to the event table

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;

use crate::catalog::{self, Registry};
use crate::config::ClientConfig;
use crate::delivery::table::SubscriptionTable;
use crate::delivery::Subscription;
use crate::error::{Error, TransportError};
use crate::protocol::messages::{empty_object, Call, Event, Reply};
use crate::protocol::transport::{EventSink, Transport};

/// Request/response and publish/subscribe façade over a [`Transport`]
///
/// Cheap to clone; clones share the registry, transport and subscriptions.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    transport: Arc<dyn Transport>,
    subscriptions: Arc<SubscriptionTable>,
    config: ClientConfig,
}

impl Dispatcher {
    /// Create a dispatcher and register its event sink with the transport
    pub fn new(
        registry: Arc<Registry>,
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> Result<Self, Error> {
        config.validate()?;

        let subscriptions = Arc::new(SubscriptionTable::new(config.event_queue_depth));
        transport.on_event(EventSink::new(Arc::clone(&subscriptions)));

        log::debug!(
            "Dispatcher ready: {} catalog entries, timeout {:?}",
            registry.len(),
            config.call_timeout()
        );

        Ok(Self {
            registry,
            transport,
            subscriptions,
            config,
        })
    }

    /// Create a dispatcher over the embedded WAAPI catalog
    pub fn with_seed_catalog(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> Result<Self, Error> {
        Self::new(catalog::global()?, transport, config)
    }

    /// Catalog this dispatcher validates against
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Call a remote function with arguments and no options
    pub async fn call<A: Serialize>(&self, uri: &str, args: A) -> Result<Value, Error> {
        self.call_with_options(uri, args, Value::Null).await
    }

    /// Call a remote function and deserialize its result
    pub async fn call_as<R, A>(&self, uri: &str, args: A) -> Result<R, Error>
    where
        R: DeserializeOwned,
        A: Serialize,
    {
        let result = self.call(uri, args).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Call a remote function with arguments and options
    ///
    /// Nothing reaches the transport unless the function is registered,
    /// callable and both payloads serialize to JSON objects.
    pub async fn call_with_options<A, O>(
        &self,
        uri: &str,
        args: A,
        options: O,
    ) -> Result<Value, Error>
    where
        A: Serialize,
        O: Serialize,
    {
        let target = self.resolve_function(uri)?;
        let args = to_object(uri, args)?;
        let options = to_object(uri, options)?;

        let call = Call::new(target.clone(), args).with_options(options);
        log::debug!("Calling {}", target);

        let reply = match self.config.call_timeout() {
            Some(after) => tokio::time::timeout(after, self.transport.send(call))
                .await
                .map_err(|_| TransportError::Timeout {
                    uri: target.clone(),
                    after,
                })??,
            None => self.transport.send(call).await?,
        };

        match reply {
            Reply::Result(value) => Ok(value),
            Reply::Error(remote) => {
                log::debug!("{} failed remotely: {}", target, remote);
                Err(Error::Remote(remote))
            }
        }
    }

    /// Subscribe a handler to a topic
    ///
    /// Handlers run on tasks of the current Tokio runtime; polling this
    /// outside one fails with [`Error::Runtime`].
    pub async fn subscribe<F>(&self, topic: &str, handler: F) -> Result<Subscription, Error>
    where
        F: Fn(Event) + Send + Sync + 'static,
    {
        self.subscribe_with_options(topic, Value::Null, handler).await
    }

    /// Subscribe a handler to a topic, passing subscription options to the tool
    pub async fn subscribe_with_options<O, F>(
        &self,
        topic: &str,
        options: O,
        handler: F,
    ) -> Result<Subscription, Error>
    where
        O: Serialize,
        F: Fn(Event) + Send + Sync + 'static,
    {
        self.registry.lookup_topic(topic)?;
        let options = to_object(topic, options)?;
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;

        let gate = self.subscriptions.gate(topic);
        let mut watched = gate.lock().await;

        let subscription = self
            .subscriptions
            .insert(&runtime, topic, Arc::new(handler));

        if !*watched {
            if let Err(e) = self.transport.watch(topic, &options).await {
                subscription.state.deactivate();
                self.subscriptions.remove(topic, subscription.id);
                return Err(e.into());
            }
            *watched = true;
        }

        log::debug!("Subscribed {} to {}", subscription.id, topic);
        Ok(subscription)
    }

    /// Detach a subscription; calling it again is a no-op
    ///
    /// The handler stops being invoked as soon as this is called, even while
    /// the transport is still being told to stop publishing.
    pub async fn unsubscribe(&self, subscription: &Subscription) -> Result<(), Error> {
        if !subscription.state.deactivate() {
            return Ok(());
        }

        let topic = subscription.topic();
        let gate = self.subscriptions.gate(topic);
        let mut watched = gate.lock().await;

        self.subscriptions.remove(topic, subscription.id);
        log::debug!("Unsubscribed {} from {}", subscription.id, topic);

        if *watched && !self.subscriptions.has_listeners(topic) {
            self.transport.unwatch(topic).await?;
            *watched = false;
        }
        Ok(())
    }

    /// Tear the session down: deactivate every subscription and stop watching topics
    ///
    /// All topics are unwatched even if some fail; the first failure is returned.
    pub async fn shutdown(&self) -> Result<(), Error> {
        let topics = self.subscriptions.gated_topics();
        log::info!("Shutting down dispatcher, releasing {} topics", topics.len());

        let mut first_error = None;
        for topic in topics {
            let gate = self.subscriptions.gate(&topic);
            let mut watched = gate.lock().await;

            self.subscriptions.clear_topic(&topic);
            if !*watched {
                continue;
            }

            match self.transport.unwatch(&topic).await {
                Ok(()) => *watched = false,
                Err(e) => {
                    log::warn!("Failed to unwatch {}: {}", topic, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Number of subscriptions currently attached
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Name the call is actually forwarded under
    fn resolve_function(&self, uri: &str) -> Result<String, Error> {
        let function = self.registry.lookup_function(uri)?;
        if !function.deprecated {
            return Ok(function.qualified_name.clone());
        }

        let Some(replacement) = function.replacement.as_deref() else {
            return Err(Error::Withdrawn(uri.to_string()));
        };

        if self.config.follow_replacements {
            log::warn!("{} is deprecated, forwarding to {}", uri, replacement);
            Ok(replacement.to_string())
        } else {
            log::warn!("{} is deprecated in favor of {}", uri, replacement);
            Ok(function.qualified_name.clone())
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("catalog_entries", &self.registry.len())
            .field("subscriptions", &self.subscriptions.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Serialize a payload, mapping `null` to `{}` and rejecting non-objects
fn to_object<T: Serialize>(uri: &str, payload: T) -> Result<Value, Error> {
    match serde_json::to_value(payload)? {
        Value::Null => Ok(empty_object()),
        value @ Value::Object(_) => Ok(value),
        other => Err(Error::InvalidPayload {
            uri: uri.to_string(),
            reason: format!("expected a JSON object, got {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
