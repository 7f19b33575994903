//! HTTP transport backed by `reqwest`, and the failover client built on it.
//!
//! The transport performs exactly one POST per call — every request is an
//! independent round-trip, no long-lived connection state. All retry and
//! failover behavior lives in `hiverpc_core::fetch`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use hiverpc_core::error::RpcError;
use hiverpc_core::fetch::{fetch, FetchConfig, Transport};
use hiverpc_core::request::{JsonRpcRequest, JsonRpcResponse};

/// Single-shot HTTP POST transport.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .build()
            .expect("failed to build reqwest client");
        Self { http }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a reqwest failure to a code-bearing network error.
///
/// The codes feed the driver's failover classification, so they must stay
/// within the known set for eligible conditions.
fn classify(e: reqwest::Error) -> RpcError {
    let code = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        connect_code(&e)
    } else {
        "request"
    };
    RpcError::Network {
        code: code.into(),
        message: e.to_string(),
    }
}

/// Distinguish DNS failures from refused connections by walking the error
/// source chain down to the underlying `io::Error`, rather than matching
/// on any one layer's debug formatting.
fn connect_code(e: &(dyn std::error::Error + 'static)) -> &'static str {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return "ECONNREFUSED";
            }
        }
        // Resolver failures have no dedicated io::ErrorKind; they surface
        // as "dns error" (hyper) or "failed to lookup address" (libc).
        let text = err.to_string().to_lowercase();
        if text.contains("dns") || text.contains("lookup") {
            return "ENOTFOUND";
        }
        current = err.source();
    }
    "ECONNREFUSED"
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_once(
        &self,
        endpoint: &str,
        req: &JsonRpcRequest,
        timeout: Option<Duration>,
    ) -> Result<JsonRpcResponse, RpcError> {
        tracing::debug!(endpoint, method = %req.method, "dispatching request");
        let mut builder = self.http.post(endpoint).json(req);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let resp = builder.send().await.map_err(classify)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(RpcError::HttpStatus { status, text });
        }

        // A body that is not valid JSON-RPC carries no failure code, which
        // sends the driver down the node-unreachable rotation path.
        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| RpcError::Other(format!("invalid JSON-RPC body: {e}")))
    }
}

/// A client pinned to one node of a read-only endpoint list.
///
/// Every request runs through the failover driver; when a different node
/// ends up answering, the client re-pins to it so subsequent calls keep
/// session affinity with the node that is actually up.
pub struct FailoverClient {
    transport: Box<dyn Transport>,
    endpoints: Vec<String>,
    current: Mutex<String>,
    config: FetchConfig,
    next_id: AtomicU64,
}

impl FailoverClient {
    /// Create a client over `endpoints`, pinned initially to the first.
    ///
    /// Panics if `endpoints` is empty.
    pub fn new(endpoints: Vec<String>, config: FetchConfig) -> Self {
        Self::with_transport(Box::new(HttpTransport::new()), endpoints, config)
    }

    /// Create a client with a custom transport (used by tests).
    pub fn with_transport(
        transport: Box<dyn Transport>,
        endpoints: Vec<String>,
        config: FetchConfig,
    ) -> Self {
        assert!(!endpoints.is_empty(), "at least one endpoint is required");
        let current = endpoints[0].clone();
        Self {
            transport,
            endpoints,
            current: Mutex::new(current),
            config,
            next_id: AtomicU64::new(1),
        }
    }

    /// The endpoint the client is currently pinned to.
    pub fn current_node(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    /// The configured endpoint list, in rotation order.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Send one request through the failover driver and re-pin to the
    /// endpoint that answered.
    pub async fn send(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, RpcError> {
        let pinned = self.current_node();
        let outcome = fetch(
            self.transport.as_ref(),
            &pinned,
            &self.endpoints,
            req,
            &self.config,
        )
        .await?;
        if outcome.endpoint != pinned {
            *self.current.lock().unwrap() = outcome.endpoint.clone();
        }
        Ok(outcome.response)
    }

    /// Call a method and deserialize its result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, params);
        let resp = self.send(&req).await?;
        serde_json::from_value(resp.into_result()?).map_err(RpcError::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiverpc_core::request::RpcId;
    use serde_json::json;
    use std::sync::Arc;

    /// Fails with a connection-refused code everywhere except `healthy`.
    struct MockTransport {
        healthy: String,
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_once(
            &self,
            endpoint: &str,
            req: &JsonRpcRequest,
            _timeout: Option<Duration>,
        ) -> Result<JsonRpcResponse, RpcError> {
            if endpoint == self.healthy {
                Ok(JsonRpcResponse {
                    jsonrpc: "2.0".into(),
                    id: req.id.clone(),
                    result: Some(json!({"head_block_number": 42})),
                    error: None,
                })
            } else {
                Err(RpcError::Network {
                    code: "ECONNREFUSED".into(),
                    message: "mock".into(),
                })
            }
        }
    }

    fn fast_config() -> FetchConfig {
        FetchConfig {
            round_timeout: Duration::from_millis(5),
            backoff: Arc::new(|_| Duration::from_millis(10)),
            ..FetchConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn client_repins_after_failover() {
        let endpoints: Vec<String> = vec!["https://a".into(), "https://b".into()];
        let client = FailoverClient::with_transport(
            Box::new(MockTransport {
                healthy: "https://b".into(),
            }),
            endpoints,
            fast_config(),
        );
        assert_eq!(client.current_node(), "https://a");

        let result: Value = client
            .call("condenser_api.get_dynamic_global_properties", json!([]))
            .await
            .unwrap();
        assert_eq!(result["head_block_number"], 42);
        assert_eq!(client.current_node(), "https://b");

        // Subsequent calls start from the pinned node.
        let _: Value = client
            .call("condenser_api.get_dynamic_global_properties", json!([]))
            .await
            .unwrap();
        assert_eq!(client.current_node(), "https://b");
    }

    #[derive(Debug)]
    struct ConnectFailure {
        message: &'static str,
        source: Option<std::io::Error>,
    }

    impl std::fmt::Display for ConnectFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for ConnectFailure {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.source
                .as_ref()
                .map(|e| e as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn refused_connection_classified_by_io_error_kind() {
        let err = ConnectFailure {
            message: "client error (Connect)",
            source: Some(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "tcp connect error",
            )),
        };
        assert_eq!(connect_code(&err), "ECONNREFUSED");
    }

    #[test]
    fn resolver_failure_classified_as_enotfound() {
        let err = ConnectFailure {
            message: "client error (Connect)",
            source: Some(std::io::Error::other(
                "failed to lookup address information: Name or service not known",
            )),
        };
        assert_eq!(connect_code(&err), "ENOTFOUND");
    }

    #[test]
    fn hyper_dns_error_classified_as_enotfound() {
        let err = ConnectFailure {
            message: "dns error",
            source: None,
        };
        assert_eq!(connect_code(&err), "ENOTFOUND");
    }

    #[test]
    fn unrecognized_connect_error_falls_back_to_econnrefused() {
        let err = ConnectFailure {
            message: "client error (Connect)",
            source: Some(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )),
        };
        assert_eq!(connect_code(&err), "ECONNREFUSED");
    }

    #[tokio::test(start_paused = true)]
    async fn call_assigns_increasing_request_ids() {
        struct IdEcho;

        #[async_trait]
        impl Transport for IdEcho {
            async fn send_once(
                &self,
                _endpoint: &str,
                req: &JsonRpcRequest,
                _timeout: Option<Duration>,
            ) -> Result<JsonRpcResponse, RpcError> {
                let RpcId::Number(n) = &req.id else {
                    return Err(RpcError::Other("unexpected id".into()));
                };
                Ok(JsonRpcResponse {
                    jsonrpc: "2.0".into(),
                    id: req.id.clone(),
                    result: Some(json!(*n)),
                    error: None,
                })
            }
        }

        let client = FailoverClient::with_transport(
            Box::new(IdEcho),
            vec!["https://a".into()],
            fast_config(),
        );
        let first: u64 = client.call("m", json!([])).await.unwrap();
        let second: u64 = client.call("m", json!([])).await.unwrap();
        assert_eq!(second, first + 1);
    }
}
