//! Extensions bridge: request/response protocol over the host transport.
//!
//! One registration owns one transport subscription and one action binding.
//! The promise-style surface is an adapter over the callback path, so the
//! origin/action filtering exists exactly once.

pub mod delivery;
pub mod extensions;

pub use delivery::Deliver;
pub use extensions::{CallbackHandler, ExtensionsBridge, ListenerRegistration, PromiseHandler};
