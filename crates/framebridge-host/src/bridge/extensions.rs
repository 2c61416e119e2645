use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use framebridge_core::protocol::envelope;
use framebridge_core::protocol::origin::TrustedOrigin;
use framebridge_core::Result;

use crate::obs::BridgeMetrics;
use crate::transport::{HostTransport, Subscription, SubscriptionId};

use super::delivery::Deliver;

/// Callback-style handler.
///
/// Receives the full request payload and a delivery handle it is expected
/// to fire exactly once with the result. The closure itself should return
/// promptly; long work belongs in a spawned task that carries the handle.
pub type CallbackHandler = Arc<dyn Fn(Value, Deliver) + Send + Sync>;

/// Promise-style handler: receives the full request payload and resolves to
/// the result value. A failed resolution leaves the request unanswered.
pub type PromiseHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Host side of the editor extensions protocol.
///
/// Filters inbound messages by trusted origin and action, invokes the bound
/// handler, and multicasts the result back to eligible editor frames.
pub struct ExtensionsBridge {
    transport: Arc<dyn HostTransport>,
    origin: Arc<TrustedOrigin>,
    metrics: Arc<BridgeMetrics>,
}

impl ExtensionsBridge {
    pub fn new(
        transport: Arc<dyn HostTransport>,
        origin: TrustedOrigin,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        Self {
            transport,
            origin: Arc::new(origin),
            metrics,
        }
    }

    pub fn trusted_origin(&self) -> &TrustedOrigin {
        &self.origin
    }

    pub fn metrics(&self) -> Arc<BridgeMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Bind `handler` to `action` and start accepting requests.
    ///
    /// Messages from other origins, non-request payloads, and other actions
    /// are dropped silently; they may legitimately belong to another
    /// listener on the same channel. Registration cannot fail.
    pub fn register_callback_listener(
        &self,
        action: &str,
        handler: CallbackHandler,
    ) -> ListenerRegistration {
        let Subscription { id, mut rx } = self.transport.subscribe();
        let action: Arc<str> = Arc::from(action);
        self.metrics
            .listeners_active
            .inc(&[("action", action.as_ref())]);

        let transport = Arc::clone(&self.transport);
        let origin = Arc::clone(&self.origin);
        let metrics = Arc::clone(&self.metrics);
        let bound_action = Arc::clone(&action);

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if !origin.accepts_sender(&msg.origin) {
                    metrics.ignored.inc(&[("reason", "origin")]);
                    tracing::debug!(origin = %msg.origin, "dropping message from untrusted origin");
                    continue;
                }
                let header = match envelope::parse_request(&msg.data) {
                    Ok(h) => h,
                    Err(e) => {
                        metrics.ignored.inc(&[("reason", "envelope")]);
                        tracing::debug!(error = %e, "ignoring non-request payload");
                        continue;
                    }
                };
                if header.action != *bound_action {
                    metrics.ignored.inc(&[("reason", "action")]);
                    continue;
                }

                metrics.requests.inc(&[("action", bound_action.as_ref())]);
                tracing::debug!(
                    action = %bound_action,
                    request_id = header.request_id,
                    "request accepted"
                );

                let deliver = Deliver::new(
                    Arc::clone(&transport),
                    Arc::clone(&origin),
                    Arc::clone(&metrics),
                    Arc::clone(&bound_action),
                    header.request_id,
                );
                handler(msg.data, deliver);
            }
        });

        ListenerRegistration {
            action,
            id,
            transport: Arc::clone(&self.transport),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Bind a promise-style handler to `action`.
    ///
    /// Adapter over [`register_callback_listener`]: each accepted request
    /// spawns its own completion, so concurrent requests resolve
    /// independently and may answer out of order. A failed resolution sends
    /// no reply (the wire protocol has no error envelope) and is surfaced
    /// through an error event and the failure counter instead.
    ///
    /// [`register_callback_listener`]: ExtensionsBridge::register_callback_listener
    pub fn register_promise_listener(
        &self,
        action: &str,
        handler: PromiseHandler,
    ) -> ListenerRegistration {
        let bound_action: Arc<str> = Arc::from(action);
        let metrics = Arc::clone(&self.metrics);

        let callback: CallbackHandler = Arc::new(move |params, deliver| {
            let fut = handler(params);
            let action = Arc::clone(&bound_action);
            let metrics = Arc::clone(&metrics);
            tokio::spawn(async move {
                match fut.await {
                    Ok(value) => deliver.deliver(value),
                    Err(e) => {
                        metrics
                            .handler_failures
                            .inc(&[("action", action.as_ref())]);
                        tracing::error!(
                            action = %action,
                            request_id = deliver.request_id(),
                            error = %e,
                            "extension handler failed; request left unanswered"
                        );
                    }
                }
            });
        });

        self.register_callback_listener(action, callback)
    }
}

/// Handle for one live action binding.
///
/// Dropping the handle leaves the listener attached, mirroring the page
/// lifetime of a message listener; call [`destroy`] to detach it. Detaching
/// only stops acceptance of later messages: completions already in flight
/// still deliver their responses.
///
/// [`destroy`]: ListenerRegistration::destroy
pub struct ListenerRegistration {
    action: Arc<str>,
    id: SubscriptionId,
    transport: Arc<dyn HostTransport>,
    metrics: Arc<BridgeMetrics>,
}

impl ListenerRegistration {
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Remove the transport subscription backing this binding.
    pub fn destroy(self) {
        self.transport.unsubscribe(self.id);
        self.metrics
            .listeners_active
            .dec(&[("action", self.action.as_ref())]);
        tracing::debug!(action = %self.action, "listener destroyed");
    }
}
