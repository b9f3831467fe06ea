use alloy_rlp::{Encodable, RlpEncodableWrapper};
use std::fmt;

use crate::hex_boundary::{FromHexBytes, ToHexBytes};

/// A 32-byte value: node hashes, topics, `receiptsRoot`-style commitments.
#[derive(Default, PartialEq, Eq, Hash, Clone, Copy, RlpEncodableWrapper)]
pub struct H256(pub [u8; 32]);

/// A 20-byte Ethereum address.
#[derive(Default, PartialEq, Eq, Hash, Clone, Copy, RlpEncodableWrapper)]
pub struct H160(pub [u8; 20]);

/// A 256-bit unsigned integer, stored big-endian. RLP-encodes with leading
/// zero bytes stripped, matching Ethereum's canonical scalar encoding; ABI
/// encoding (`to_abi_word`) always emits the full 32 bytes.
#[derive(Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct U256(pub [u8; 32]);

impl H256 {
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn from_slice(slice: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..slice.len().min(32)].copy_from_slice(&slice[..slice.len().min(32)]);
        Self(bytes)
    }
}

impl H160 {
    pub fn zero() -> Self {
        Self([0u8; 20])
    }

    pub fn from_slice(slice: &[u8]) -> Self {
        let mut bytes = [0u8; 20];
        bytes[..slice.len().min(20)].copy_from_slice(&slice[..slice.len().min(20)]);
        Self(bytes)
    }
}

impl U256 {
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn from_slice(slice: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..slice.len().min(32)].copy_from_slice(&slice[..slice.len().min(32)]);
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl From<u64> for U256 {
    fn from(x: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&x.to_be_bytes());
        Self(bytes)
    }
}

impl From<u8> for U256 {
    fn from(x: u8) -> Self {
        U256::from(x as u64)
    }
}

// RLP encodes a scalar with leading zero bytes stripped, same as `U256` in
// the teacher crate; only used when a `U256` is placed in an RLP structure
// (not part of the ABI encoder, which always wants the full 32 bytes).
impl Encodable for U256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        let mut start = 0;
        while start < 32 && self.0[start] == 0 {
            start += 1;
        }
        alloy_rlp::Encodable::encode(&self.0[start..], out);
    }

    fn length(&self) -> usize {
        let mut start = 0;
        while start < 32 && self.0[start] == 0 {
            start += 1;
        }
        self.0[start..].length()
    }
}

impl ToHexBytes for H256 {
    fn as_hex_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl ToHexBytes for H160 {
    fn as_hex_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromHexBytes for H256 {
    fn from_hex_bytes(bytes: &[u8]) -> Option<Self> {
        (bytes.len() == 32).then(|| H256::from_slice(bytes))
    }
}

impl FromHexBytes for H160 {
    fn from_hex_bytes(bytes: &[u8]) -> Option<Self> {
        (bytes.len() == 20).then(|| H160::from_slice(bytes))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256(0x{})", hex::encode(self.0))
    }
}

impl fmt::Debug for H160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H160(0x{})", hex::encode(self.0))
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256(0x{})", hex::encode(self.0))
    }
}

impl serde::Serialize for H256 {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(self.0)))
    }
}

impl serde::Serialize for H160 {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(self.0)))
    }
}
