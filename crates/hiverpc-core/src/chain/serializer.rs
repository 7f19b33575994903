//! Typed field encoder for witness properties.
//!
//! `witness_set_properties` is the one operation hived stores as raw
//! serialized bytes instead of native JSON values, so each property must be
//! binary-encoded (little-endian, protocol layout) and rendered as lowercase
//! hex before it is embedded in the JSON-RPC request. Byte order and field
//! widths here must match hived exactly or the operation is rejected.

use serde_json::Value;

use crate::error::RpcError;

/// Protocol-defined binary layout for a single property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// 33-byte compressed public key.
    PublicKey,
    /// Little-endian u16.
    UInt16,
    /// Little-endian u32.
    UInt32,
    /// Varint length prefix + UTF-8 bytes.
    String,
    /// Asset base followed by asset quote.
    Price,
    /// i64 amount + u8 precision + NUL-padded 7-byte symbol.
    Asset,
}

impl WireType {
    /// Encode `value` into its canonical on-wire bytes.
    ///
    /// `name` is only used to build a useful [`RpcError::InvalidProperty`].
    pub fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>, RpcError> {
        let mut buf = Vec::new();
        self.write(&mut buf, value)
            .map_err(|reason| RpcError::InvalidProperty {
                name: name.to_string(),
                reason,
            })?;
        Ok(buf)
    }

    /// Encode `value` and render the buffer as a lowercase hex string —
    /// the form hived expects inside JSON.
    pub fn encode_hex(&self, name: &str, value: &Value) -> Result<String, RpcError> {
        Ok(hex::encode(self.encode(name, value)?))
    }

    fn write(&self, buf: &mut Vec<u8>, value: &Value) -> Result<(), String> {
        match self {
            Self::PublicKey => {
                let s = value.as_str().ok_or("expected a public key string")?;
                buf.extend_from_slice(&decode_public_key(s)?);
            }
            Self::UInt16 => {
                let n = as_uint(value)?;
                let n = u16::try_from(n).map_err(|_| format!("{n} out of range for u16"))?;
                buf.extend_from_slice(&n.to_le_bytes());
            }
            Self::UInt32 => {
                let n = as_uint(value)?;
                let n = u32::try_from(n).map_err(|_| format!("{n} out of range for u32"))?;
                buf.extend_from_slice(&n.to_le_bytes());
            }
            Self::String => {
                let s = value.as_str().ok_or("expected a string")?;
                write_varint(buf, s.len() as u64);
                buf.extend_from_slice(s.as_bytes());
            }
            Self::Price => {
                let base = value.get("base").ok_or("price is missing `base`")?;
                let quote = value.get("quote").ok_or("price is missing `quote`")?;
                Self::Asset.write(buf, base)?;
                Self::Asset.write(buf, quote)?;
            }
            Self::Asset => {
                let s = value.as_str().ok_or("expected an asset string")?;
                write_asset(buf, s)?;
            }
        }
        Ok(())
    }
}

/// Unsigned LEB128, as used by hived for length prefixes.
fn write_varint(buf: &mut Vec<u8>, mut n: u64) {
    loop {
        let mut byte = (n & 0x7f) as u8;
        n >>= 7;
        if n != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if n == 0 {
            break;
        }
    }
}

fn as_uint(value: &Value) -> Result<u64, String> {
    value
        .as_u64()
        .ok_or_else(|| "expected an unsigned integer".to_string())
}

/// Decode the 33 key bytes from the `STM…` base58 form.
///
/// The trailing 4-byte RIPEMD-160 checksum is dropped, not verified — key
/// management lives outside this crate; only shape is validated here.
fn decode_public_key(key: &str) -> Result<[u8; 33], String> {
    if key.len() <= 3 || !key.chars().take(3).all(|c| c.is_ascii_uppercase()) {
        return Err(format!("malformed public key: {key}"));
    }
    let raw = bs58::decode(&key[3..])
        .into_vec()
        .map_err(|e| format!("invalid base58 in public key: {e}"))?;
    if raw.len() != 37 {
        return Err(format!("public key payload is {} bytes, expected 37", raw.len()));
    }
    let mut out = [0u8; 33];
    out.copy_from_slice(&raw[..33]);
    Ok(out)
}

/// Precision for the chain's known asset symbols.
fn symbol_precision(symbol: &str) -> Result<u8, String> {
    match symbol {
        "HIVE" | "HBD" | "TESTS" | "TBD" | "STEEM" | "SBD" => Ok(3),
        "VESTS" => Ok(6),
        other => Err(format!("unknown asset symbol: {other}")),
    }
}

/// Serialize an asset from its string form, e.g. `"3.000 HIVE"`:
/// i64 amount in smallest units (LE), precision byte, symbol name padded
/// with NULs to 7 bytes.
fn write_asset(buf: &mut Vec<u8>, asset: &str) -> Result<(), String> {
    let (amount_str, symbol) = asset
        .split_once(' ')
        .ok_or_else(|| format!("malformed asset: {asset}"))?;
    let precision = symbol_precision(symbol)?;

    let (integral, fraction) = match amount_str.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount_str, ""),
    };
    if fraction.len() > precision as usize {
        return Err(format!(
            "asset {asset} has more than {precision} decimal places"
        ));
    }
    let negative = integral.starts_with('-');
    let integral = integral.trim_start_matches('-');
    let mut units = String::with_capacity(integral.len() + precision as usize);
    units.push_str(integral);
    units.push_str(fraction);
    for _ in fraction.len()..precision as usize {
        units.push('0');
    }
    let mut amount: i64 = units
        .parse()
        .map_err(|_| format!("malformed asset amount: {amount_str}"))?;
    if negative {
        amount = -amount;
    }

    buf.extend_from_slice(&amount.to_le_bytes());
    buf.push(precision);
    let mut name = [0u8; 7];
    let sym = symbol.as_bytes();
    name[..sym.len()].copy_from_slice(sym);
    buf.extend_from_slice(&name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uint16_little_endian() {
        let hex = WireType::UInt16
            .encode_hex("hbd_interest_rate", &json!(1000))
            .unwrap();
        assert_eq!(hex, "e803");
    }

    #[test]
    fn uint32_little_endian() {
        let hex = WireType::UInt32
            .encode_hex("maximum_block_size", &json!(65536))
            .unwrap();
        assert_eq!(hex, "00000100");
    }

    #[test]
    fn uint16_rejects_out_of_range() {
        let err = WireType::UInt16
            .encode_hex("hbd_interest_rate", &json!(100_000))
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidProperty { .. }));
    }

    #[test]
    fn string_varint_prefixed() {
        let hex = WireType::String.encode_hex("url", &json!("http://x")).unwrap();
        assert_eq!(hex, "08687474703a2f2f78");
    }

    #[test]
    fn long_string_uses_multibyte_varint() {
        let long = "a".repeat(200);
        let bytes = WireType::String.encode("url", &json!(long)).unwrap();
        // 200 = 0xc8 0x01 in LEB128
        assert_eq!(&bytes[..2], &[0xc8, 0x01]);
        assert_eq!(bytes.len(), 202);
    }

    #[test]
    fn asset_amount_precision_symbol() {
        let hex = WireType::Asset
            .encode_hex("account_creation_fee", &json!("3.000 HIVE"))
            .unwrap();
        assert_eq!(hex, "b80b0000000000000348495645000000");
    }

    #[test]
    fn vests_have_six_decimals() {
        let bytes = WireType::Asset
            .encode("fee", &json!("1.000000 VESTS"))
            .unwrap();
        assert_eq!(&bytes[..8], &1_000_000i64.to_le_bytes());
        assert_eq!(bytes[8], 6);
    }

    #[test]
    fn asset_rejects_unknown_symbol() {
        let err = WireType::Asset
            .encode_hex("account_creation_fee", &json!("3.000 DOGE"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown asset symbol"));
    }

    #[test]
    fn asset_rejects_excess_precision() {
        let err = WireType::Asset
            .encode_hex("account_creation_fee", &json!("3.0001 HIVE"))
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidProperty { .. }));
    }

    #[test]
    fn price_is_base_then_quote() {
        let price = json!({"base": "1.000 HBD", "quote": "2.000 HIVE"});
        let hex = WireType::Price.encode_hex("hbd_exchange_rate", &price).unwrap();
        assert_eq!(
            hex,
            "e8030000000000000348424400000000d00700000000000003\
             48495645000000"
        );
    }

    #[test]
    fn public_key_strips_prefix_and_checksum() {
        // 33 key bytes + 4 checksum bytes, round-tripped through base58.
        let mut payload = vec![0x02u8];
        payload.extend(std::iter::repeat(0xab).take(32));
        payload.extend_from_slice(&[1, 2, 3, 4]);
        let key = format!("STM{}", bs58::encode(&payload).into_string());

        let bytes = WireType::PublicKey.encode("key", &json!(key)).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0x02);
        assert_eq!(bytes[32], 0xab);
    }

    #[test]
    fn public_key_rejects_short_payload() {
        let key = format!("STM{}", bs58::encode(b"short").into_string());
        let err = WireType::PublicKey.encode("key", &json!(key)).unwrap_err();
        assert!(err.to_string().contains("expected 37"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let price = json!({"base": "1.000 HBD", "quote": "2.000 HIVE"});
        let a = WireType::Price.encode_hex("hbd_exchange_rate", &price).unwrap();
        let b = WireType::Price.encode_hex("hbd_exchange_rate", &price).unwrap();
        assert_eq!(a, b);
    }
}
