// ABOUTME: Protocol message type definitions and serialization
// ABOUTME: Call requests, replies, remote errors and pushed events

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request handed to the transport for one remote function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Qualified name of the function to invoke
    pub uri: String,
    /// Function arguments, always a JSON object
    pub args: Value,
    /// Call options (e.g. `return` field selection), always a JSON object
    pub options: Value,
}

impl Call {
    /// Create a call with empty options
    pub fn new(uri: impl Into<String>, args: Value) -> Self {
        Self {
            uri: uri.into(),
            args,
            options: empty_object(),
        }
    }

    /// Replace the call options
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

/// Answer from the authoring tool to a [`Call`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Reply {
    /// Successful call result
    #[serde(rename = "result")]
    Result(Value),

    /// The tool rejected the call
    #[serde(rename = "error")]
    Error(RemoteError),
}

/// Error payload returned by the authoring tool, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{uri}: {message}")]
pub struct RemoteError {
    /// Error URI reported by the tool, e.g. `ak.wwise.invalid_arguments`
    pub uri: String,
    /// Human readable message
    #[serde(default)]
    pub message: String,
    /// Any additional structured details
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl RemoteError {
    /// Create a remote error without details
    pub fn new(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            message: message.into(),
            details: Value::Null,
        }
    }
}

/// Notification pushed by the authoring tool for a subscribed topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Qualified name of the topic
    pub topic: String,
    /// Event body
    pub payload: Value,
}

impl Event {
    /// Create an event
    pub fn new(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// `{}`
pub fn empty_object() -> Value {
    Value::Object(Map::new())
}
