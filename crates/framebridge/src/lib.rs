//! Top-level facade crate for framebridge.
//!
//! Re-exports the wire contracts and the host runtime so embedders can depend on a single crate.

pub mod core {
    pub use framebridge_core::*;
}

pub mod host {
    pub use framebridge_host::*;
}
