//! Request/response envelopes (JSON).
//!
//! A request carries its action-specific parameters flattened at the top
//! level next to `action`/`requestId`, so the header is parsed leniently and
//! handlers receive the whole payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// Header fields of an inbound request envelope.
///
/// Unknown fields are the action-specific parameters and must be tolerated;
/// handlers pick out the ones they care about from the raw payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestHeader {
    /// Registered operation this request targets.
    pub action: String,
    /// Sender-chosen correlation id, copied verbatim onto the reply.
    #[serde(rename = "requestId")]
    pub request_id: u64,
}

/// Outbound reply, correlated to its request by `request_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Always true; distinguishes replies from requests on the shared channel.
    #[serde(rename = "isResponse")]
    pub is_response: bool,
    #[serde(rename = "requestId")]
    pub request_id: u64,
    /// Handler result, opaque to the protocol layer.
    pub value: Value,
}

impl ResponseEnvelope {
    /// Build the reply for a handled request.
    pub fn reply(request_id: u64, value: Value) -> Self {
        Self {
            is_response: true,
            request_id,
            value,
        }
    }
}

/// Parse the request header out of an inbound payload.
///
/// Replies and unrelated messages ride the same channel as requests;
/// anything flagged `isResponse` or missing the `action`/`requestId` pair is
/// rejected here and dropped by the caller.
pub fn parse_request(data: &Value) -> Result<RequestHeader> {
    if data.get("isResponse").and_then(Value::as_bool) == Some(true) {
        return Err(BridgeError::BadEnvelope("reply on request channel".into()));
    }
    RequestHeader::deserialize(data)
        .map_err(|e| BridgeError::BadEnvelope(format!("invalid request envelope: {e}")))
}
