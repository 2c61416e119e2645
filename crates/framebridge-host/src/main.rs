//! framebridge dev harness.
//!
//! Wires the channel transport, the dummy collaborators, and a simulated
//! editor frame, then drives one request/response round trip so the whole
//! path can be observed from logs.

use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use framebridge_host::bridge::ExtensionsBridge;
use framebridge_host::listeners::{Extensions, ACTION_GET_FIELDS};
use framebridge_host::obs::BridgeMetrics;
use framebridge_host::transport::channel::{ChannelFrame, ChannelTransport};
use framebridge_host::transport::{HostTransport, IncomingMessage};
use framebridge_host::config;

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("framebridge.yaml").expect("config load failed");
    let origin = cfg
        .editor
        .trusted_origin()
        .expect("editor.origin must be a valid origin");

    let transport = Arc::new(ChannelTransport::new());
    let (frame, mut posted) = ChannelFrame::new(format!("{}/editor", cfg.editor.origin));
    transport.attach_frame(frame);

    let metrics = Arc::new(BridgeMetrics::default());
    let bridge = ExtensionsBridge::new(
        Arc::clone(&transport) as Arc<dyn HostTransport>,
        origin,
        Arc::clone(&metrics),
    );

    let extensions = Extensions::with_dummies(cfg.gallery.page_size);
    let listeners = extensions.register_listeners(&bridge);
    tracing::info!(
        origin = %cfg.editor.origin,
        actions = ?listeners.actions(),
        "framebridge harness ready"
    );

    transport.inject(IncomingMessage {
        origin: cfg.editor.origin.clone(),
        data: json!({ "action": ACTION_GET_FIELDS, "requestId": 1 }),
    });

    let reply = posted.recv().await.expect("no reply posted");
    tracing::info!(%reply, "editor frame received");

    print!("{}", metrics.render());
}
