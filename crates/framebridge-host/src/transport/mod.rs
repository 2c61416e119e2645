//! Host message transport abstraction.
//!
//! The host page owns two capabilities the bridge consumes: a stream of
//! inbound cross-document messages and the live set of frames a reply can
//! be posted to. Both are modelled as an injected trait object rather than
//! ambient global state, so tests substitute a fake transport and multiple
//! bridges never collide.
//!
//! Posting carries no target-origin restriction: trust is enforced on what
//! the bridge *acts upon*, not on who may receive a reply.

pub mod channel;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

/// One inbound cross-document message.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Origin of the sending window.
    pub origin: String,
    /// Structured message payload.
    pub data: Value,
}

/// Identifier for a live transport subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A live subscription; messages arrive on `rx` until unsubscribed.
pub struct Subscription {
    pub id: SubscriptionId,
    pub rx: mpsc::Receiver<IncomingMessage>,
}

/// A frame element that may receive posted messages.
pub trait FrameHandle: Send + Sync {
    /// Source URL the frame element points at.
    fn source(&self) -> &str;

    /// Post a structured message into the frame.
    ///
    /// Returns false when the frame has no accessible content window (not
    /// yet loaded, or detached); delivery skips such frames.
    fn post(&self, data: Value) -> bool;
}

/// Message transport owned by the host page.
pub trait HostTransport: Send + Sync {
    /// Register a listener for inbound messages.
    fn subscribe(&self) -> Subscription;

    /// Remove a listener; messages arriving afterwards are no longer seen.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Enumerate the frames currently attached to the document.
    fn frames(&self) -> Vec<Arc<dyn FrameHandle>>;
}
