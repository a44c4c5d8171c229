// ABOUTME: Basic example wiring the bundled WAAPI catalog to an in-memory transport
// ABOUTME: Calls a function, subscribes to a topic and receives one pushed event

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use waapi::protocol::memory::MemoryTransport;
use waapi::{ClientConfig, Dispatcher, Reply, SdkVersion};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("WAAPI catalog for Wwise SDK {}", SdkVersion::current());

    let transport = Arc::new(MemoryTransport::new());
    transport.respond_to("ak.wwise.core.getInfo", |_| {
        Reply::Result(json!({ "displayName": "Wwise", "version": { "displayName": "v2016.2.4" } }))
    });

    let dispatcher = Dispatcher::with_seed_catalog(transport.clone(), ClientConfig::default())?;
    println!(
        "{} catalog entries under ak.wwise.core.object",
        dispatcher.registry().namespace("ak.wwise.core.object").len()
    );

    let info = dispatcher.call("ak.wwise.core.getInfo", json!({})).await?;
    println!("getInfo -> {info}");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let subscription = dispatcher
        .subscribe("ak.wwise.core.object.created", move |event| {
            let _ = tx.send(event);
        })
        .await?;

    transport.emit(
        "ak.wwise.core.object.created",
        json!({ "object": { "name": "Footstep", "type": "Sound" } }),
    );

    if let Ok(Some(event)) = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await {
        println!("{} -> {}", event.topic, event.payload);
    }

    dispatcher.unsubscribe(&subscription).await?;
    dispatcher.shutdown().await?;

    Ok(())
}
