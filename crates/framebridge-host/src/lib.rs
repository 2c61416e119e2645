//! framebridge host library entry.
//!
//! This crate wires the message transport, the extensions bridge, the
//! action registrar, and the collaborator contracts into the host-side
//! runtime. It is intended to be consumed by the harness binary (`main.rs`)
//! and by integration tests.

pub mod bridge;
pub mod collaborators;
pub mod config;
pub mod listeners;
pub mod obs;
pub mod transport;
