//! Public / community Hive API nodes.
//!
//! These are free, no-API-key endpoints run by witnesses and community
//! members. Individually they go down, lag, or rate-limit — which is
//! exactly what the failover driver is for.

use std::sync::Arc;
use std::time::Duration;

use hiverpc_core::fetch::FetchConfig;
use hiverpc_http::FailoverClient;

/// Well-known public API nodes, in default rotation order.
pub const PUBLIC_NODES: &[&str] = &[
    "https://api.hive.blog",
    "https://api.openhive.network",
    "https://api.deathwing.me",
    "https://rpc.ausbit.dev",
    "https://anyx.io",
    "https://techcoderx.com",
];

/// Conservative policy for shared community infrastructure: generous round
/// budget, full rotation through the list before giving up.
pub fn conservative_config() -> FetchConfig {
    FetchConfig {
        round_timeout: Duration::from_secs(10),
        failover_threshold: PUBLIC_NODES.len() as u32,
        log_failover: true,
        backoff: Arc::new(hiverpc_core::fetch::default_backoff),
        attempt_timeout: Some(Arc::new(|tries| {
            // Escalate from 5s up to 30s as a node keeps stalling.
            Duration::from_secs((5 + u64::from(tries) * 5).min(30))
        })),
    }
}

/// A failover client over all public nodes.
pub fn failover_client() -> FailoverClient {
    FailoverClient::new(
        PUBLIC_NODES.iter().map(|s| s.to_string()).collect(),
        conservative_config(),
    )
}
