mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use serde::Deserialize;
use serde_json::json;
use waapi::error::{Error, TransportError};
use waapi::protocol::memory::MemoryTransport;
use waapi::{ClientConfig, Dispatcher, RemoteError, Reply};

fn dispatcher_with(transport: &Arc<MemoryTransport>, config: ClientConfig) -> Dispatcher {
    Dispatcher::new(test_registry(), transport.clone(), config).unwrap()
}

#[tokio::test]
async fn test_call_forwards_payload_and_returns_response() {
    let transport = Arc::new(MemoryTransport::new());
    transport.respond_to(CREATE, |_| {
        Reply::Result(json!({ "id": "{6A4C2A5E-0000}", "name": "Hello" }))
    });
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let args = json!({
        "parent": "\\Actor-Mixer Hierarchy\\Default Work Unit",
        "type": "Sound",
        "name": "Hello"
    });
    let result = dispatcher.call(CREATE, args.clone()).await.unwrap();

    assert_eq!(result, json!({ "id": "{6A4C2A5E-0000}", "name": "Hello" }));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].uri, CREATE);
    assert_eq!(sent[0].args, args);
    assert_eq!(sent[0].options, json!({}));
}

#[tokio::test]
async fn test_call_with_options_forwards_options() {
    let transport = Arc::new(MemoryTransport::echo());
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    dispatcher
        .call_with_options(
            GET,
            json!({ "from": { "ofType": ["Event"] } }),
            json!({ "return": ["id", "name"] }),
        )
        .await
        .unwrap();

    assert_eq!(transport.sent()[0].options, json!({ "return": ["id", "name"] }));
}

#[tokio::test]
async fn test_unknown_function_performs_no_io() {
    let transport = Arc::new(MemoryTransport::echo());
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let err = dispatcher
        .call("ak.wwise.core.object.explode", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownFunction(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_calling_a_topic_is_an_unknown_function() {
    let transport = Arc::new(MemoryTransport::echo());
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let err = dispatcher.call(CREATED, json!({})).await.unwrap_err();
    assert!(matches!(err, Error::UnknownFunction(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_withdrawn_function_performs_no_io() {
    let transport = Arc::new(MemoryTransport::echo());
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let err = dispatcher.call(RETIRED, json!({})).await.unwrap_err();

    assert!(matches!(err, Error::Withdrawn(name) if name == RETIRED));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_deprecated_function_forwarded_under_own_name() {
    let transport = Arc::new(MemoryTransport::echo());
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    dispatcher.call(PLUGIN_GET_LIST, json!({})).await.unwrap();

    assert_eq!(transport.sent()[0].uri, PLUGIN_GET_LIST);
}

#[tokio::test]
async fn test_deprecated_function_follows_replacement_when_configured() {
    let transport = Arc::new(MemoryTransport::echo());
    let config = ClientConfig {
        follow_replacements: true,
        ..ClientConfig::default()
    };
    let dispatcher = dispatcher_with(&transport, config);

    dispatcher.call(PLUGIN_GET_LIST, json!({})).await.unwrap();

    assert_eq!(transport.sent()[0].uri, GET_TYPES);
}

#[tokio::test]
async fn test_remote_error_surfaced_verbatim() {
    let transport = Arc::new(MemoryTransport::new());
    let remote = RemoteError {
        uri: "ak.wwise.invalid_arguments".to_string(),
        message: "Missing argument 'parent'".to_string(),
        details: json!({ "procedureUri": CREATE }),
    };
    let reply = remote.clone();
    transport.respond_to(CREATE, move |_| Reply::Error(reply.clone()));
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let err = dispatcher.call(CREATE, json!({})).await.unwrap_err();

    match err {
        Error::Remote(got) => assert_eq!(got, remote),
        other => panic!("Expected Error::Remote, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_call_timeout_surfaces_as_transport_error() {
    let transport = Arc::new(MemoryTransport::echo());
    transport.set_latency(Some(Duration::from_secs(30)));
    let config = ClientConfig::default().with_call_timeout(Some(Duration::from_millis(100)));
    let dispatcher = dispatcher_with(&transport, config);

    let err = dispatcher.call(GET, json!({})).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { uri, after })
            if uri == GET && after == Duration::from_millis(100)
    ));
}

#[tokio::test]
async fn test_closed_transport_reports_transport_error() {
    let transport = Arc::new(MemoryTransport::echo());
    transport.close();
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let err = dispatcher.call(GET, json!({})).await.unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Closed)));
}

#[tokio::test]
async fn test_non_object_payload_rejected_before_io() {
    let transport = Arc::new(MemoryTransport::echo());
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let err = dispatcher.call(GET, json!(["not", "an", "object"])).await.unwrap_err();

    assert!(matches!(err, Error::InvalidPayload { .. }));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_unit_args_sent_as_empty_object() {
    let transport = Arc::new(MemoryTransport::echo());
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    dispatcher.call(GET_TYPES, ()).await.unwrap();

    assert_eq!(transport.sent()[0].args, json!({}));
}

#[tokio::test]
async fn test_call_as_deserializes_result() {
    #[derive(Debug, Deserialize)]
    struct Created {
        id: String,
        name: String,
    }

    let transport = Arc::new(MemoryTransport::new());
    transport.respond_to(CREATE, |call| {
        Reply::Result(json!({ "id": "{1}", "name": call.args["name"] }))
    });
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let created: Created = dispatcher
        .call_as(CREATE, json!({ "name": "Footstep" }))
        .await
        .unwrap();

    assert_eq!(created.id, "{1}");
    assert_eq!(created.name, "Footstep");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_complete_independently() {
    let transport = Arc::new(MemoryTransport::echo());
    transport.set_latency(Some(Duration::from_millis(5)));
    let dispatcher = dispatcher_with(&transport, ClientConfig::default());

    let names = [CREATE, GET, GET_TYPES];
    let calls = (0..120).map(|i| {
        let dispatcher = dispatcher.clone();
        let uri = names[i % names.len()];
        tokio::spawn(async move {
            let args = json!({ "request": i, "uri": uri });
            let result = dispatcher.call(uri, args.clone()).await;
            (args, result)
        })
    });

    for joined in futures::future::join_all(calls).await {
        let (args, result) = joined.unwrap();
        assert_eq!(result.unwrap(), args);
    }

    assert_eq!(transport.sent().len(), 120);
}
