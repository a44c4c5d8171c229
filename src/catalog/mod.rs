// ABOUTME: Catalog of WAAPI remote functions and event topics
// ABOUTME: Descriptors, qualified-name rules, the read-only registry and its seed

/// Function and topic descriptor types
pub mod descriptor;
/// Qualified-name validation helpers
pub mod name;
/// Registry and registry builder
pub mod registry;
/// Embedded seed catalog and the process-wide registry
pub mod seed;

pub use descriptor::{Descriptor, FunctionDescriptor, TopicDescriptor};
pub use registry::{Registry, RegistryBuilder};
pub use seed::global;
