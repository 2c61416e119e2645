//! framebridge core: transport-agnostic wire contracts and error types.
//!
//! This crate defines the envelopes exchanged with the embedded editor and
//! the trust rules applied to them. It intentionally carries no transport or
//! runtime dependencies so the same contracts can back the host runtime,
//! test harnesses, and SDK tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `BridgeError`/`Result` so hostile or
//! malformed traffic from the frame never crashes the host page.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{BridgeError, Result};
