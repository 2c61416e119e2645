//! Bridge protocol tests over the in-process channel transport.
//!
//! Absence checks (`nothing was posted`) run on a paused clock: the timeout
//! only fires once every spawned task has gone idle, so a missing response
//! is asserted deterministically.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use framebridge_core::protocol::origin::TrustedOrigin;
use framebridge_core::BridgeError;
use framebridge_host::bridge::{Deliver, ExtensionsBridge};
use framebridge_host::obs::BridgeMetrics;
use framebridge_host::transport::channel::{ChannelFrame, ChannelTransport};
use framebridge_host::transport::{HostTransport, IncomingMessage};

const EDITOR: &str = "https://editor.unlayer.com";
const SETTLE: Duration = Duration::from_millis(250);

fn bridge_over(transport: &Arc<ChannelTransport>) -> (ExtensionsBridge, Arc<BridgeMetrics>) {
    let metrics = Arc::new(BridgeMetrics::default());
    let bridge = ExtensionsBridge::new(
        Arc::clone(transport) as Arc<dyn HostTransport>,
        TrustedOrigin::new(EDITOR).unwrap(),
        Arc::clone(&metrics),
    );
    (bridge, metrics)
}

fn msg(origin: &str, data: Value) -> IncomingMessage {
    IncomingMessage {
        origin: origin.into(),
        data,
    }
}

#[tokio::test(start_paused = true)]
async fn untrusted_origin_is_ignored() {
    let transport = Arc::new(ChannelTransport::new());
    let (frame, mut posted) = ChannelFrame::new(format!("{EDITOR}/editor"));
    transport.attach_frame(frame);
    let (bridge, metrics) = bridge_over(&transport);

    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
    let _reg = bridge.register_callback_listener(
        "selectImage",
        Arc::new(move |params, deliver| {
            let _ = seen_tx.send(params);
            deliver.deliver(json!("picked"));
        }),
    );
    assert_eq!(transport.subscriber_count(), 1);

    transport.inject(msg(
        "https://evil.example",
        json!({ "action": "selectImage", "requestId": 1 }),
    ));

    assert!(timeout(SETTLE, posted.recv()).await.is_err());
    assert!(seen_rx.try_recv().is_err());
    assert_eq!(metrics.ignored.value(&[("reason", "origin")]), 1);
    assert_eq!(metrics.requests.value(&[("action", "selectImage")]), 0);
}

#[tokio::test(start_paused = true)]
async fn other_actions_do_not_invoke_the_handler() {
    let transport = Arc::new(ChannelTransport::new());
    let (frame, mut posted) = ChannelFrame::new(format!("{EDITOR}/editor"));
    transport.attach_frame(frame);
    let (bridge, metrics) = bridge_over(&transport);

    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
    let _reg = bridge.register_callback_listener(
        "getFields",
        Arc::new(move |params, deliver| {
            let _ = seen_tx.send(params);
            deliver.deliver(json!([]));
        }),
    );

    transport.inject(msg(EDITOR, json!({ "action": "selectImage", "requestId": 1 })));
    // Not a request at all: replies share the channel and must be skipped.
    transport.inject(msg(
        EDITOR,
        json!({ "isResponse": true, "requestId": 1, "value": null }),
    ));

    assert!(timeout(SETTLE, posted.recv()).await.is_err());
    assert!(seen_rx.try_recv().is_err());
    assert_eq!(metrics.ignored.value(&[("reason", "action")]), 1);
    assert_eq!(metrics.ignored.value(&[("reason", "envelope")]), 1);
}

#[tokio::test(start_paused = true)]
async fn callback_response_reaches_every_editor_frame() {
    let transport = Arc::new(ChannelTransport::new());
    let (editor_a, mut rx_a) = ChannelFrame::new(format!("{EDITOR}/editor/a"));
    let (editor_b, mut rx_b) = ChannelFrame::new(format!("{EDITOR}/editor/b"));
    let (evil, mut rx_evil) = ChannelFrame::new("https://evil.example/y");
    let (loading, mut rx_loading) = ChannelFrame::inaccessible(format!("{EDITOR}/editor/c"));
    transport.attach_frame(editor_a);
    transport.attach_frame(editor_b);
    transport.attach_frame(evil);
    transport.attach_frame(loading);
    let (bridge, metrics) = bridge_over(&transport);

    let _reg = bridge.register_callback_listener(
        "selectImage",
        Arc::new(|params, deliver| {
            deliver.deliver(json!({ "echo": params["foo"] }));
        }),
    );

    transport.inject(msg(
        EDITOR,
        json!({ "action": "selectImage", "requestId": 7, "foo": 1 }),
    ));

    let expected = json!({ "isResponse": true, "requestId": 7, "value": { "echo": 1 } });
    assert_eq!(rx_a.recv().await.unwrap(), expected);
    assert_eq!(rx_b.recv().await.unwrap(), expected);

    // Untrusted and inaccessible frames never hear the reply, and each
    // eligible frame hears it exactly once.
    assert!(timeout(SETTLE, rx_evil.recv()).await.is_err());
    assert!(timeout(SETTLE, rx_loading.recv()).await.is_err());
    assert!(timeout(SETTLE, rx_a.recv()).await.is_err());

    assert_eq!(metrics.requests.value(&[("action", "selectImage")]), 1);
    assert_eq!(
        metrics.responses_posted.value(&[("action", "selectImage")]),
        2
    );
}

#[tokio::test]
async fn concurrent_requests_correlate_by_request_id() {
    let transport = Arc::new(ChannelTransport::new());
    let (frame, mut posted) = ChannelFrame::new(format!("{EDITOR}/editor"));
    transport.attach_frame(frame);
    let (bridge, _metrics) = bridge_over(&transport);

    let (tx1, rx1) = oneshot::channel::<Value>();
    let (tx2, rx2) = oneshot::channel::<Value>();
    let pending: Arc<Mutex<HashMap<u64, oneshot::Receiver<Value>>>> =
        Arc::new(Mutex::new(HashMap::from([(1, rx1), (2, rx2)])));

    let _reg = bridge.register_promise_listener(
        "compute",
        Arc::new(move |params| {
            let pending = Arc::clone(&pending);
            Box::pin(async move {
                let id = params["requestId"]
                    .as_u64()
                    .ok_or_else(|| BridgeError::BadEnvelope("missing requestId".into()))?;
                let rx = pending
                    .lock()
                    .unwrap()
                    .remove(&id)
                    .ok_or_else(|| BridgeError::Internal("unknown request".into()))?;
                rx.await
                    .map_err(|_| BridgeError::Internal("resolver dropped".into()))
            })
        }),
    );

    transport.inject(msg(EDITOR, json!({ "action": "compute", "requestId": 1 })));
    transport.inject(msg(EDITOR, json!({ "action": "compute", "requestId": 2 })));

    // Resolve in reverse order; correlation must follow the ids, not the
    // arrival order.
    tx2.send(json!("second")).unwrap();
    let first_reply = posted.recv().await.unwrap();
    assert_eq!(
        first_reply,
        json!({ "isResponse": true, "requestId": 2, "value": "second" })
    );

    tx1.send(json!("first")).unwrap();
    let second_reply = posted.recv().await.unwrap();
    assert_eq!(
        second_reply,
        json!({ "isResponse": true, "requestId": 1, "value": "first" })
    );
}

#[tokio::test(start_paused = true)]
async fn rejected_promise_sends_no_response_but_is_observable() {
    let transport = Arc::new(ChannelTransport::new());
    let (frame, mut posted) = ChannelFrame::new(format!("{EDITOR}/editor"));
    transport.attach_frame(frame);
    let (bridge, metrics) = bridge_over(&transport);

    let _reg = bridge.register_promise_listener(
        "getFields",
        Arc::new(|_params| {
            Box::pin(async { Err(BridgeError::Collaborator("fields backend down".into())) })
        }),
    );

    transport.inject(msg(EDITOR, json!({ "action": "getFields", "requestId": 9 })));

    assert!(timeout(SETTLE, posted.recv()).await.is_err());
    assert_eq!(metrics.handler_failures.value(&[("action", "getFields")]), 1);
    assert_eq!(metrics.responses_posted.value(&[("action", "getFields")]), 0);
}

#[tokio::test(start_paused = true)]
async fn destructor_stops_future_requests_but_not_inflight_delivery() {
    let transport = Arc::new(ChannelTransport::new());
    let (frame, mut posted) = ChannelFrame::new(format!("{EDITOR}/editor"));
    transport.attach_frame(frame);
    let (bridge, metrics) = bridge_over(&transport);

    let slot: Arc<Mutex<Option<Deliver>>> = Arc::new(Mutex::new(None));
    let stash = Arc::clone(&slot);
    let (ran_tx, mut ran_rx) = mpsc::unbounded_channel();
    let reg = bridge.register_callback_listener(
        "selectImage",
        Arc::new(move |_params, deliver| {
            *stash.lock().unwrap() = Some(deliver);
            let _ = ran_tx.send(());
        }),
    );

    transport.inject(msg(EDITOR, json!({ "action": "selectImage", "requestId": 7 })));
    ran_rx.recv().await.unwrap();

    assert_eq!(transport.subscriber_count(), 1);
    assert_eq!(
        metrics.listeners_active.value(&[("action", "selectImage")]),
        1
    );
    reg.destroy();
    assert_eq!(transport.subscriber_count(), 0);
    assert_eq!(
        metrics.listeners_active.value(&[("action", "selectImage")]),
        0
    );

    // Arrives after destroy: no listener left to accept it.
    transport.inject(msg(EDITOR, json!({ "action": "selectImage", "requestId": 8 })));

    // The request accepted before destroy still answers.
    let deliver = slot.lock().unwrap().take().unwrap();
    deliver.deliver(json!("late"));
    let reply = posted.recv().await.unwrap();
    assert_eq!(reply["requestId"], 7);
    assert_eq!(reply["value"], "late");

    assert!(timeout(SETTLE, posted.recv()).await.is_err());
    assert_eq!(metrics.requests.value(&[("action", "selectImage")]), 1);
}

#[tokio::test(start_paused = true)]
async fn undelivered_response_is_counted_not_retried() {
    let transport = Arc::new(ChannelTransport::new());
    // Only a foreign frame is attached; the reply has nowhere to go.
    let (evil, mut rx_evil) = ChannelFrame::new("https://evil.example/y");
    transport.attach_frame(evil);
    let (bridge, metrics) = bridge_over(&transport);

    let _reg = bridge.register_callback_listener(
        "selectImage",
        Arc::new(|_params, deliver| deliver.deliver(json!("picked"))),
    );

    transport.inject(msg(EDITOR, json!({ "action": "selectImage", "requestId": 3 })));

    assert!(timeout(SETTLE, rx_evil.recv()).await.is_err());
    assert_eq!(metrics.undelivered.value(&[("action", "selectImage")]), 1);
    assert_eq!(
        metrics.responses_posted.value(&[("action", "selectImage")]),
        0
    );
}

#[tokio::test]
async fn each_registration_owns_one_subscription() {
    let transport = Arc::new(ChannelTransport::new());
    let (bridge, _metrics) = bridge_over(&transport);

    let a = bridge.register_callback_listener("a", Arc::new(|_p, d| d.deliver(json!(null))));
    let b = bridge.register_callback_listener("b", Arc::new(|_p, d| d.deliver(json!(null))));
    assert_eq!(transport.subscriber_count(), 2);

    a.destroy();
    assert_eq!(transport.subscriber_count(), 1);
    b.destroy();
    assert_eq!(transport.subscriber_count(), 0);
}
