// ABOUTME: Protocol layer for the Wwise Authoring API
// ABOUTME: Message types, transport contract, dispatcher and in-memory transport

/// Catalog-validated dispatcher
pub mod client;
/// In-process transport for tests and offline tooling
pub mod memory;
/// Protocol message type definitions and serialization
pub mod messages;
/// Transport contract
pub mod transport;

pub use messages::{Call, Event, RemoteError, Reply};
