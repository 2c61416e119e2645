//! Trust rules for the embedded editor origin.
//!
//! Inbound requests are accepted only on an exact origin match. Delivery
//! candidates are matched by source-URL prefix instead, since a frame's
//! source carries a path while a message's origin does not.

use crate::error::{BridgeError, Result};

/// The single origin authorized to issue requests to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedOrigin(String);

impl TrustedOrigin {
    /// Validate and wrap an origin string (`scheme://host[:port]`, no path).
    pub fn new(origin: &str) -> Result<Self> {
        let rest = origin
            .strip_prefix("https://")
            .or_else(|| origin.strip_prefix("http://"))
            .ok_or_else(|| {
                BridgeError::Config(format!("editor origin must be http(s): {origin}"))
            })?;
        if rest.is_empty() {
            return Err(BridgeError::Config("editor origin missing host".into()));
        }
        if rest.contains('/') {
            return Err(BridgeError::Config(format!(
                "editor origin must not carry a path: {origin}"
            )));
        }
        Ok(Self(origin.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a message from `origin` may be acted upon (exact match).
    pub fn accepts_sender(&self, origin: &str) -> bool {
        self.0 == origin
    }

    /// Whether a frame with this source URL is a delivery candidate.
    pub fn matches_frame_source(&self, source: &str) -> bool {
        source.starts_with(&self.0)
    }
}

impl std::fmt::Display for TrustedOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
