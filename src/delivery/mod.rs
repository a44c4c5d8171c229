// ABOUTME: Event fan-out from the transport to subscription handlers
// ABOUTME: One bounded queue and worker task per subscription

/// Subscription handles and handler type
pub mod subscription;
/// Topic to subscription routing table
pub(crate) mod table;

pub use subscription::{Handler, Subscription, SubscriptionId};
