// ABOUTME: Main library entry point for waapi-rs
// ABOUTME: Exports the catalog, dispatcher and transport API for WAAPI clients

//! # waapi-rs
//!
//! Client-side registry and dispatcher for the Wwise Authoring API (WAAPI).
//!
//! Remote functions and event topics are addressed by dotted qualified names
//! such as `ak.wwise.core.object.create`. The [`catalog`] holds those names in a
//! flat, read-only table; the [`Dispatcher`] validates calls and subscriptions
//! against it and hands them to a pluggable [`Transport`].

#![warn(missing_docs)]

/// Function and topic descriptors, name validation and the registry
pub mod catalog;
/// Dispatcher tunables
pub mod config;
/// Event fan-out to subscription handlers
pub mod delivery;
/// Messages, transport contract and the dispatcher
pub mod protocol;
/// Wwise SDK version metadata
pub mod version;

pub use catalog::{Descriptor, FunctionDescriptor, Registry, RegistryBuilder, TopicDescriptor};
pub use config::ClientConfig;
pub use delivery::Subscription;
pub use protocol::client::Dispatcher;
pub use protocol::messages::{Call, Event, RemoteError, Reply};
pub use protocol::transport::{EventSink, Transport};
pub use version::SdkVersion;

/// Result type for waapi operations
pub type Result<T> = std::result::Result<T, error::Error>;

/// Error types for waapi
pub mod error {
    use std::time::Duration;

    use thiserror::Error;

    use crate::protocol::messages::RemoteError;

    /// Error types for waapi operations
    #[derive(Error, Debug)]
    pub enum Error {
        /// A function or topic with this qualified name is already registered
        #[error("Duplicate qualified name: {0}")]
        DuplicateName(String),

        /// The qualified name is not a well-formed dotted identifier
        #[error("Invalid qualified name: {0:?}")]
        InvalidName(String),

        /// A deprecated function points at a replacement that cannot be called
        #[error("Function {name} names replacement {replacement}, which is not a callable function")]
        DanglingReplacement {
            /// Deprecated function
            name: String,
            /// Replacement it names
            replacement: String,
        },

        /// No function is registered under this name
        #[error("Unknown function: {0}")]
        UnknownFunction(String),

        /// No topic is registered under this name
        #[error("Unknown topic: {0}")]
        UnknownTopic(String),

        /// The function is deprecated and has no replacement to fall back on
        #[error("Function {0} is deprecated without a replacement")]
        Withdrawn(String),

        /// Arguments or options did not serialize to a JSON object
        #[error("Invalid payload for {uri}: {reason}")]
        InvalidPayload {
            /// Target of the call or subscription
            uri: String,
            /// What was wrong with it
            reason: String,
        },

        /// Connectivity or timeout failure reported by the transport
        #[error("Transport error: {0}")]
        Transport(#[from] TransportError),

        /// The authoring tool answered with an error payload
        #[error("Remote error: {0}")]
        Remote(RemoteError),

        /// Payload (de)serialization failed
        #[error("Serialization error: {0}")]
        Serialization(#[from] serde_json::Error),

        /// The embedded seed catalog could not be loaded
        #[error("Seed catalog error: {0}")]
        Seed(String),

        /// Subscribing needs a Tokio runtime to run handlers on
        #[error("No Tokio runtime: {0}")]
        Runtime(String),

        /// Configuration could not be read or is out of range
        #[error("Configuration error: {0}")]
        Config(String),
    }

    /// Failures of the transport collaborator
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum TransportError {
        /// No reply arrived within the configured per-call timeout
        #[error("call to {uri} timed out after {after:?}")]
        Timeout {
            /// Function that was called
            uri: String,
            /// Configured timeout
            after: Duration,
        },

        /// The connection to the authoring tool is gone
        #[error("connection closed")]
        Closed,

        /// The request could not be sent
        #[error("send failed: {0}")]
        Send(String),
    }

    impl Error {
        /// True for failures a caller may reasonably retry
        pub fn is_retryable(&self) -> bool {
            matches!(self, Error::Transport(_))
        }
    }
}
