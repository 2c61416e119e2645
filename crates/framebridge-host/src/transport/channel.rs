//! In-process channel transport.
//!
//! Backs the dev harness and tests; production embeds bind [`HostTransport`]
//! to the real host page instead. Subscribers and frames live in `DashMap`
//! registries keyed by monotonically assigned ids.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;

use super::{FrameHandle, HostTransport, IncomingMessage, Subscription, SubscriptionId};

/// Inbound queue depth per subscriber.
const SUBSCRIBER_QUEUE: usize = 1024;

/// Identifier for an attached frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Channel-backed [`HostTransport`] implementation.
#[derive(Default)]
pub struct ChannelTransport {
    subscribers: DashMap<SubscriptionId, mpsc::Sender<IncomingMessage>>,
    frames: DashMap<FrameId, Arc<dyn FrameHandle>>,
    next_id: AtomicU64,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a frame to the simulated document.
    pub fn attach_frame(&self, frame: Arc<dyn FrameHandle>) -> FrameId {
        let id = FrameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.frames.insert(id, frame);
        id
    }

    /// Detach a frame, as if its element were removed from the document.
    pub fn detach_frame(&self, id: FrameId) {
        self.frames.remove(&id);
    }

    /// Number of live message listeners.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Inject an inbound message, as if the host page received it.
    ///
    /// Lossy fan-out: a subscriber with a full queue misses the message,
    /// matching the drop-on-backpressure behavior of the outbound path.
    pub fn inject(&self, msg: IncomingMessage) {
        for entry in self.subscribers.iter() {
            let _ = entry.value().try_send(msg.clone());
        }
    }
}

impl HostTransport for ChannelTransport {
    fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE);
        self.subscribers.insert(id, tx);
        Subscription { id, rx }
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(&id);
    }

    fn frames(&self) -> Vec<Arc<dyn FrameHandle>> {
        self.frames.iter().map(|e| Arc::clone(e.value())).collect()
    }
}

/// Frame whose posted messages land on an mpsc queue.
///
/// `inaccessible` builds a frame element without a reachable content
/// window: it is enumerated like any other frame but refuses posts.
pub struct ChannelFrame {
    source: String,
    accessible: bool,
    tx: mpsc::UnboundedSender<Value>,
}

impl ChannelFrame {
    pub fn new(source: impl Into<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<Value>) {
        Self::build(source, true)
    }

    pub fn inaccessible(source: impl Into<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<Value>) {
        Self::build(source, false)
    }

    fn build(
        source: impl Into<String>,
        accessible: bool,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Value>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                source: source.into(),
                accessible,
                tx,
            }),
            rx,
        )
    }
}

impl FrameHandle for ChannelFrame {
    fn source(&self) -> &str {
        &self.source
    }

    fn post(&self, data: Value) -> bool {
        if !self.accessible {
            return false;
        }
        self.tx.send(data).is_ok()
    }
}
