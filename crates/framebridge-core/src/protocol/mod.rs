//! Wire protocol for the editor extensions channel.
//!
//! Requests and responses share one cross-document channel; `envelope`
//! defines both shapes and how a request is recognized, `origin` defines
//! which senders are trusted and which frames are delivery candidates.
//!
//! All parsing is panic-free: malformed payloads are reported as
//! `BridgeError` so the host can drop them without crashing.

pub mod envelope;
pub mod origin;
