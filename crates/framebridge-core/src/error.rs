//! Shared error type across framebridge crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type used by core and the host runtime.
///
/// The wire protocol itself has no error envelope: a request whose handler
/// fails is simply left unanswered. These variants therefore only travel
/// host-side, through logs and collaborator results.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Inbound payload is not a request envelope (or is malformed).
    #[error("bad envelope: {0}")]
    BadEnvelope(String),
    /// Configuration failed to parse or validate.
    #[error("config: {0}")]
    Config(String),
    /// A backing collaborator (gallery, fields, picker) failed.
    #[error("collaborator: {0}")]
    Collaborator(String),
    /// Internal host-side failure.
    #[error("internal: {0}")]
    Internal(String),
}
