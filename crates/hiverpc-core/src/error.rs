//! Transport and encoder error types.

use thiserror::Error;

/// Error codes that make a failed round eligible for endpoint failover.
///
/// Matching is by substring: a reqwest timeout surfaces as `timeout`, a DNS
/// failure as `ENOTFOUND`, a refused connection as `ECONNREFUSED`, and a
/// node with a locked block log reports `database lock` in its error body.
pub const FAILOVER_CODES: &[&str] = &["timeout", "ENOTFOUND", "ECONNREFUSED", "database lock"];

/// Errors that can occur during an RPC round-trip or while encoding
/// an operation.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection-level failure carrying a failure code.
    #[error("network error [{code}]: {message}")]
    Network { code: String, message: String },

    /// Non-2xx HTTP response, converted with status and body text.
    /// Carries no failure code — the fetch driver treats it as
    /// "node unreachable" once the round budget lapses.
    #[error("HTTP {status}: {text}")]
    HttpStatus { status: u16, text: String },

    /// The failover round budget was exhausted on an eligible error.
    #[error("[{code}] tried {threshold} times with {}", .endpoints.join(","))]
    FailoverExhausted {
        code: String,
        threshold: u32,
        endpoints: Vec<String>,
    },

    /// Response body could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operation builder was given a property name with no declared
    /// wire type. Caller programming error — never retried.
    #[error("unknown witness property: {name}")]
    UnknownProperty { name: String },

    /// A property value could not be coerced to its declared wire type.
    #[error("invalid value for witness property {name}: {reason}")]
    InvalidProperty { name: String, reason: String },

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl RpcError {
    /// The failure code attached to this error, if any.
    ///
    /// Only connection-level errors carry one; a codeless error means the
    /// node is down or misbehaving in a way the transport could not name.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Network { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns `true` if this error's code matches one of the known
    /// failover-triggering conditions.
    pub fn is_failover_code(&self) -> bool {
        match self.code() {
            Some(code) => FAILOVER_CODES.iter().any(|fe| code.contains(fe)),
            None => false,
        }
    }
}
