use crate::H256;

/// Keccak-256 over arbitrary bytes. This is the pre-standardisation variant
/// Ethereum uses (not NIST SHA3-256) — `keccak-hash` implements exactly that.
pub fn keccak256(data: &[u8]) -> H256 {
    H256(keccak_hash::keccak(data).0)
}
