/// Errors from the RLP codec, the node model, and the Patricia trie (§7:
/// `KeyNotFound`, `InvalidProof`, `MalformedRlp`, `InvalidNode`).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrieError {
    #[error("key is not part of the trie")]
    KeyNotFound,

    #[error("proof is invalid: {0}")]
    InvalidProof(String),

    #[error("malformed rlp: {0}")]
    MalformedRlp(String),

    #[error("encoded bytes do not conform to any canonical node shape: {0}")]
    InvalidNode(String),
}

/// Errors from the ABI encoder and event encoder (§7: `UnsupportedType`,
/// `TypeMismatch`).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    #[error("unsupported abi type: {0}")]
    UnsupportedType(String),

    #[error("type mismatch for parameter {index}: expected {expected}, got {actual}")]
    TypeMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("malformed event signature: {0}")]
    MalformedSignature(String),
}
