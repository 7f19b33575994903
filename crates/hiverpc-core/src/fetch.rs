//! Resilient fetch driver: timeout-based retry with endpoint failover.
//!
//! One call to [`fetch`] drives a single JSON-RPC request to completion.
//! Failed attempts are retried against the same endpoint with backoff until
//! the round budget lapses, after which the driver rotates to the next
//! endpoint in the caller's list. The loop runs until a response arrives or
//! a fatal error is raised — there is no attempt cap beyond the
//! timeout/threshold policy.
//!
//! The retry state machine (round timer, attempt counter, round counter) is
//! an explicit [`RoundState`] value rather than mutable captures, and the
//! only suspension points are the backoff sleep and the transport call, so
//! tests can run under `tokio::time::pause` with mock transports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use crate::error::RpcError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};
use crate::rotation::next_node;

/// One HTTP round-trip to a single endpoint.
///
/// Implementations perform exactly one POST and classify the outcome: a
/// non-2xx status becomes [`RpcError::HttpStatus`], connection-level
/// failures become code-bearing [`RpcError::Network`] values. No retrying
/// happens below this trait — that is the driver's job.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send_once(
        &self,
        endpoint: &str,
        req: &JsonRpcRequest,
        timeout: Option<Duration>,
    ) -> Result<JsonRpcResponse, RpcError>;
}

/// Backoff schedule: attempt counter within the current round → sleep.
pub type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Per-attempt timeout schedule, allowing escalating timeouts.
pub type AttemptTimeoutFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Default backoff: `min((tries * 10)^2 ms, 10s)`.
pub fn default_backoff(tries: u32) -> Duration {
    let ms = (u64::from(tries) * 10).pow(2).min(10_000);
    Duration::from_millis(ms)
}

/// Driver policy knobs.
#[derive(Clone)]
pub struct FetchConfig {
    /// Budget for one failover round. Once elapsed time exceeds this, the
    /// driver stops retrying the current endpoint and rotates.
    /// `Duration::ZERO` means the round never times out — retry the same
    /// endpoint forever.
    pub round_timeout: Duration,
    /// Number of failover rounds allowed on an eligible error before the
    /// driver gives up with [`RpcError::FailoverExhausted`].
    pub failover_threshold: u32,
    /// Emit a log notice on every endpoint switch.
    pub log_failover: bool,
    /// Sleep schedule between attempts within a round.
    pub backoff: BackoffFn,
    /// Optional per-attempt timeout handed to the transport.
    pub attempt_timeout: Option<AttemptTimeoutFn>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            round_timeout: Duration::from_secs(1),
            failover_threshold: 3,
            log_failover: true,
            backoff: Arc::new(default_backoff),
            attempt_timeout: None,
        }
    }
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("round_timeout", &self.round_timeout)
            .field("failover_threshold", &self.failover_threshold)
            .field("log_failover", &self.log_failover)
            .finish_non_exhaustive()
    }
}

/// Retry-loop state for the current failover round.
#[derive(Debug)]
struct RoundState {
    started: Instant,
    tries: u32,
    round: u32,
}

impl RoundState {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            tries: 0,
            round: 0,
        }
    }

    /// Elapsed time exceeded the round budget (ZERO never expires).
    fn expired(&self, round_timeout: Duration) -> bool {
        !round_timeout.is_zero() && self.started.elapsed() > round_timeout
    }

    /// Start a fresh round against a new endpoint.
    fn reset(&mut self) {
        self.started = Instant::now();
        self.tries = 0;
    }
}

/// A decoded response together with the endpoint that produced it.
///
/// Callers should re-pin subsequent requests to `endpoint` — failover may
/// have moved away from the address the call started on.
#[derive(Debug)]
pub struct FetchOutcome {
    pub response: JsonRpcResponse,
    pub endpoint: String,
}

/// Drive `req` against `endpoint`, failing over through `all_endpoints`
/// per `config`.
///
/// Fatal outcomes are exhausting the failover-round budget on an eligible
/// error, and any error that is not failover-eligible (or no alternate
/// endpoint exists); everything else is retried.
pub async fn fetch(
    transport: &dyn Transport,
    endpoint: &str,
    all_endpoints: &[String],
    req: &JsonRpcRequest,
    config: &FetchConfig,
) -> Result<FetchOutcome, RpcError> {
    let mut current = endpoint.to_string();
    let mut state = RoundState::new();

    loop {
        let attempt_timeout = config.attempt_timeout.as_ref().map(|f| f(state.tries));
        match transport.send_once(&current, req, attempt_timeout).await {
            Ok(response) => {
                return Ok(FetchOutcome {
                    response,
                    endpoint: current,
                })
            }
            Err(error) => {
                if state.expired(config.round_timeout) {
                    if error.code().is_none() && all_endpoints.len() > 1 {
                        // No code to classify — the node is down or replying
                        // garbage. Switch without consuming the round budget.
                        current = rotate(&current, all_endpoints, config.log_failover);
                        state.reset();
                        continue;
                    }
                    if error.is_failover_code() && all_endpoints.len() > 1 {
                        if state.round < config.failover_threshold {
                            state.round += 1;
                            current = rotate(&current, all_endpoints, config.log_failover);
                            state.reset();
                            continue;
                        }
                        return Err(RpcError::FailoverExhausted {
                            code: error.code().unwrap_or_default().to_string(),
                            threshold: config.failover_threshold,
                            endpoints: all_endpoints.to_vec(),
                        });
                    }
                    tracing::error!(error = %error, endpoint = %current, "not failing over");
                    return Err(error);
                }
                sleep((config.backoff)(state.tries)).await;
                state.tries += 1;
            }
        }
    }
}

fn rotate(current: &str, all_endpoints: &[String], log_failover: bool) -> String {
    let target = next_node(current, all_endpoints);
    if log_failover {
        tracing::info!(from = %current, to = %target, "switched Hive RPC node");
    }
    target.to_string()
}
