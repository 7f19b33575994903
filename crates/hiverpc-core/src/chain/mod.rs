//! Chain-side encoders.
//!
//! Everything a transport client must know about Hive's own data formats:
//! the typed binary serializer for `witness_set_properties`, the operation
//! catalog, and the account-history bitmask filter.

pub mod filter;
pub mod serializer;
pub mod witness;

pub use filter::{make_bitmask_filter, operation_order, OPERATION_ORDERS};
pub use serializer::WireType;
pub use witness::{build_witness_set_properties, WitnessProperties, WitnessSetPropertiesOp};
