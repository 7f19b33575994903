//! Builder for the `witness_set_properties` operation.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::chain::serializer::WireType;
use crate::error::RpcError;

/// Declared wire type for each witness property name.
fn wire_type_of(name: &str) -> Option<WireType> {
    match name {
        "key" | "new_signing_key" => Some(WireType::PublicKey),
        "account_subsidy_budget" | "account_subsidy_decay" | "maximum_block_size" => {
            Some(WireType::UInt32)
        }
        "hbd_interest_rate" => Some(WireType::UInt16),
        "url" => Some(WireType::String),
        "hbd_exchange_rate" => Some(WireType::Price),
        "account_creation_fee" => Some(WireType::Asset),
        _ => None,
    }
}

/// Payload of a `witness_set_properties` operation.
///
/// `props` holds `(name, hex)` pairs sorted lexicographically by name —
/// hived treats the sequence as order-sensitive for hashing in some
/// versions, so the order must not depend on caller iteration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WitnessProperties {
    pub extensions: Vec<Value>,
    pub owner: String,
    pub props: Vec<(String, String)>,
}

/// The full operation tuple. Serializes as
/// `["witness_set_properties", {extensions, owner, props}]`, ready to be
/// embedded verbatim as a JSON-RPC parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WitnessSetPropertiesOp(pub &'static str, pub WitnessProperties);

/// Encode a set of named witness properties into a well-formed
/// `witness_set_properties` operation.
///
/// Fails with [`RpcError::UnknownProperty`] when a name has no declared
/// wire type, and [`RpcError::InvalidProperty`] when a value cannot be
/// coerced to its layout. Pure: the same input always yields byte-identical
/// hex output.
pub fn build_witness_set_properties(
    owner: impl Into<String>,
    props: &Map<String, Value>,
) -> Result<WitnessSetPropertiesOp, RpcError> {
    let mut encoded: Vec<(String, String)> = Vec::with_capacity(props.len());
    for (name, value) in props {
        let wire_type = wire_type_of(name).ok_or_else(|| RpcError::UnknownProperty {
            name: name.clone(),
        })?;
        encoded.push((name.clone(), wire_type.encode_hex(name, value)?));
    }
    encoded.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(WitnessSetPropertiesOp(
        "witness_set_properties",
        WitnessProperties {
            extensions: Vec::new(),
            owner: owner.into(),
            props: encoded,
        },
    ))
}
