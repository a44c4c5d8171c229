// Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use waapi::catalog::{FunctionDescriptor, Registry, TopicDescriptor};

pub const CREATE: &str = "ak.wwise.core.object.create";
pub const GET: &str = "ak.wwise.core.object.get";
pub const GET_TYPES: &str = "ak.wwise.core.object.getTypes";
pub const PLUGIN_GET_LIST: &str = "ak.wwise.core.plugin.getList";
pub const RETIRED: &str = "ak.wwise.core.legacy.retired";
pub const CREATED: &str = "ak.wwise.core.object.created";
pub const NAME_CHANGED: &str = "ak.wwise.core.object.nameChanged";

pub fn test_registry() -> Arc<Registry> {
    let registry = Registry::builder()
        .with(FunctionDescriptor::new(
            CREATE,
            "Creates an object of type 'type', as a child of 'parent'.",
        ))
        .and_then(|b| b.with(FunctionDescriptor::new(GET, "Performs a query.")))
        .and_then(|b| {
            b.with(FunctionDescriptor::new(
                GET_TYPES,
                "Retrieves the list of all object types.",
            ))
        })
        .and_then(|b| {
            b.with(
                FunctionDescriptor::new(PLUGIN_GET_LIST, "Retrieves the list of all object types.")
                    .deprecated(Some(GET_TYPES)),
            )
        })
        .and_then(|b| {
            b.with(FunctionDescriptor::new(RETIRED, "Gone for good.").deprecated(None))
        })
        .and_then(|b| b.with(TopicDescriptor::new(CREATED, "Sent when an object is created.")))
        .and_then(|b| {
            b.with(TopicDescriptor::new(
                NAME_CHANGED,
                "Sent when an object is renamed.",
            ))
        })
        .and_then(|b| b.build())
        .expect("test registry is valid");

    Arc::new(registry)
}
