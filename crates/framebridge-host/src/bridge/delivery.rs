//! Response delivery to embedded editor frames.
//!
//! The host cannot tell which frame element issued a given request, so a
//! reply is posted to every frame whose source sits under the trusted
//! origin and whose content window is reachable. Known gap: when several
//! editor instances share the page, all of them receive a reply meant for
//! one. Existing embeds rely on this, so it stays; a per-frame session
//! token in the request envelope would be required to do better.

use std::sync::Arc;

use serde_json::Value;

use framebridge_core::protocol::envelope::ResponseEnvelope;
use framebridge_core::protocol::origin::TrustedOrigin;

use crate::obs::BridgeMetrics;
use crate::transport::HostTransport;

/// Single-use delivery handle for one accepted request.
///
/// Owns everything needed to answer, so it can be moved into whatever task
/// or UI flow eventually produces the result. Survives its registration:
/// destroying a listener does not recall handles already given out.
pub struct Deliver {
    transport: Arc<dyn HostTransport>,
    origin: Arc<TrustedOrigin>,
    metrics: Arc<BridgeMetrics>,
    action: Arc<str>,
    request_id: u64,
}

impl Deliver {
    pub(crate) fn new(
        transport: Arc<dyn HostTransport>,
        origin: Arc<TrustedOrigin>,
        metrics: Arc<BridgeMetrics>,
        action: Arc<str>,
        request_id: u64,
    ) -> Self {
        Self {
            transport,
            origin,
            metrics,
            action,
            request_id,
        }
    }

    /// Correlation id of the originating request.
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Send `value` back to the editor, correlated to the originating
    /// request. Consumes the handle: one request, one reply.
    pub fn deliver(self, value: Value) {
        let response = ResponseEnvelope::reply(self.request_id, value);
        broadcast(
            self.transport.as_ref(),
            &self.origin,
            &self.metrics,
            &self.action,
            &response,
        );
    }
}

/// Serialize once, post to every eligible frame.
fn broadcast(
    transport: &dyn HostTransport,
    origin: &TrustedOrigin,
    metrics: &BridgeMetrics,
    action: &str,
    response: &ResponseEnvelope,
) {
    let payload = match serde_json::to_value(response) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(action, error = %e, "response encode failed");
            return;
        }
    };

    let mut posted: u64 = 0;
    for frame in transport.frames() {
        if !origin.matches_frame_source(frame.source()) {
            continue;
        }
        if frame.post(payload.clone()) {
            posted += 1;
        }
    }

    if posted == 0 {
        metrics.undelivered.inc(&[("action", action)]);
        tracing::warn!(
            action,
            request_id = response.request_id,
            "no editor frame available for reply"
        );
    } else {
        metrics.responses_posted.add(&[("action", action)], posted);
        tracing::debug!(
            action,
            request_id = response.request_id,
            frames = posted,
            "response delivered"
        );
    }
}
