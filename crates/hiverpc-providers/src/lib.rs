//! hiverpc-providers — pre-configured endpoint profiles for public Hive
//! API nodes.
//!
//! # Quick start
//! ```rust,no_run
//! use hiverpc_providers::public;
//!
//! let client = public::failover_client();
//! ```

pub mod public;
