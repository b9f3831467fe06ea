//! Shared primitives, codecs, and event/receipt types for cross-chain event
//! proofs: nibble paths and RLP for the trie crate, Ethereum ABI/event
//! encoding, and the receipt/log shapes a relayer deserialises off the wire.

pub mod abi;
pub mod error;
pub mod event;
pub mod hash;
pub mod hex_boundary;
pub mod nibble;
pub mod primitives;
pub mod receipt;
pub mod rlp;

pub use error::{EventError, TrieError};
pub use hash::keccak256;
pub use nibble::NibblePath;
pub use primitives::{H160, H256, U256};
