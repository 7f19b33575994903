//! hiverpc-core — resilient transport core for a Hive JSON-RPC client.
//!
//! # Overview
//!
//! Hive full nodes are interchangeable, individually unreliable, and — for
//! one operation — inconsistent in their JSON encoding. This crate covers
//! the pieces a client needs to cope with all three:
//!
//! - [`fetch`] module — the retrying/failing-over request driver and its
//!   [`Transport`] trait
//! - [`rotation`] module — deterministic endpoint rotation
//! - [`request`] module — JSON-RPC 2.0 wire types
//! - [`chain`] module — the `witness_set_properties` binary encoder, the
//!   operation catalog and the account-history bitmask filter
//! - [`RpcError`] — structured error taxonomy with failover classification

pub mod chain;
pub mod error;
pub mod fetch;
pub mod request;
pub mod rotation;

pub use chain::{build_witness_set_properties, make_bitmask_filter, OPERATION_ORDERS};
pub use error::{RpcError, FAILOVER_CODES};
pub use fetch::{fetch, FetchConfig, FetchOutcome, Transport};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use rotation::next_node;
