//! hiverpc-http — reqwest-backed transport and failover client.

pub mod client;

pub use client::{FailoverClient, HttpTransport};
