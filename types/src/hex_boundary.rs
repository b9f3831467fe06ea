//! Hex lives only at the edge of this crate. Everything internal is raw
//! bytes; these helpers are the single place `0x`-prefixed, mixed-case hex
//! strings get turned into bytes (and back), so that every later comparison
//! is a byte equality rather than a string compare.

use serde::{de::Error as _, Deserialize, Deserializer};

pub trait ToHexBytes {
    fn as_hex_bytes(&self) -> &[u8];
}

pub trait FromHexBytes: Sized {
    fn from_hex_bytes(bytes: &[u8]) -> Option<Self>;
}

/// Decode a `0x`-prefixed (or bare) hex string, case-insensitively, into bytes.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s))
}

pub fn encode_hex_0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// `serde` deserializer for any fixed-size type implementing [`FromHexBytes`],
/// reading a JSON hex string. Mirrors the custom `deserialize_hex` pattern
/// bridge/relayer `Log` types in this corpus use for `0x`-prefixed fields.
pub fn deserialize_fixed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromHexBytes,
{
    let s = String::deserialize(deserializer)?;
    let bytes = decode_hex(&s).map_err(D::Error::custom)?;
    T::from_hex_bytes(&bytes).ok_or_else(|| D::Error::custom("wrong byte length for field"))
}

/// `serde` deserializer for a `Vec<u8>` hex field (`data`, dynamic `bytes`).
pub fn deserialize_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    decode_hex(&s).map_err(D::Error::custom)
}

/// `serde` deserializer for a `Vec<T>` of hex-encoded fixed-size fields (topics).
pub fn deserialize_fixed_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromHexBytes,
{
    let strings = Vec::<String>::deserialize(deserializer)?;
    strings
        .iter()
        .map(|s| {
            let bytes = decode_hex(s).map_err(D::Error::custom)?;
            T::from_hex_bytes(&bytes).ok_or_else(|| D::Error::custom("wrong byte length in list"))
        })
        .collect()
}

/// `serde` deserializer for a hex-encoded integer status field (`"0x1"`),
/// decoded to a plain `u64` since receipt status never exceeds one byte in
/// practice but the wire format is an arbitrary-width hex integer.
pub fn deserialize_hex_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let trimmed = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(&s);
    u64::from_str_radix(trimmed, 16).map_err(D::Error::custom)
}
