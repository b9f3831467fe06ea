//! Solidity event encoding: `topic0` from the event signature, indexed
//! parameters as further topics, and everything else packed into `data` the
//! same way [`crate::abi::encode_params`] packs a plain call.

use crate::abi::{encode_params, encode_topic_value, AbiValue};
use crate::error::EventError;
use crate::hash::keccak256;
use crate::primitives::{H160, H256};

/// The seven Solidity value types this encoder knows how to pack — the hard
/// contract named by the event encoder's supported type list.
const SUPPORTED_TYPES: &[&str] = &["string", "uint256", "uint8", "int256", "address", "bool", "bytes"];

/// The emitting contract, topics, and data of a log entry, ready to compare
/// against what a node reports for a transaction's receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEvent {
    pub address: H160,
    pub topics: Vec<H256>,
    pub data: Vec<u8>,
}

/// `keccak256` of the canonical signature string, e.g.
/// `"Transfer(address,address,uint256)"` — always `topics[0]` for a
/// non-anonymous event. Whitespace is stripped first, so
/// `"Transfer(address, address, uint256)"` and `"Transfer(address,address,uint256)"`
/// hash identically.
pub fn topic0(signature: &str) -> H256 {
    let canonical: String = signature.chars().filter(|c| !c.is_whitespace()).collect();
    keccak256(canonical.as_bytes())
}

/// Parse `"Name(type1,type2,...)"` into the event name and its declared
/// parameter types, rejecting anything that doesn't match that shape.
pub fn parse_signature(signature: &str) -> Result<(&str, Vec<&str>), EventError> {
    let open = signature
        .find('(')
        .ok_or_else(|| EventError::MalformedSignature(signature.to_string()))?;
    if !signature.ends_with(')') {
        return Err(EventError::MalformedSignature(signature.to_string()));
    }
    let name = &signature[..open];
    if name.is_empty() {
        return Err(EventError::MalformedSignature(signature.to_string()));
    }
    let inner = &signature[open + 1..signature.len() - 1];
    let types = if inner.is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(str::trim).collect()
    };
    Ok((name, types))
}

/// Encode a full event: `contract` is the emitting address, `signature`
/// determines `topic0`, `values` are the parameters in declaration order,
/// and `indexed` marks which of them went into `indexed` slots in the
/// Solidity source. `indexed` and `values` must be the same length. Any
/// declared type outside [`SUPPORTED_TYPES`] is rejected before values are
/// even consulted. Indexed dynamic values (`string`/`bytes`) are rejected,
/// matching this encoder's abridged ABI support.
pub fn encode_event(
    contract: H160,
    signature: &str,
    values: &[AbiValue],
    indexed: &[bool],
) -> Result<EncodedEvent, EventError> {
    let (_name, declared_types) = parse_signature(signature)?;
    if declared_types.len() != values.len() || values.len() != indexed.len() {
        return Err(EventError::MalformedSignature(format!(
            "signature declares {} params, got {} values / {} indexed flags",
            declared_types.len(),
            values.len(),
            indexed.len()
        )));
    }
    for declared in &declared_types {
        if !SUPPORTED_TYPES.contains(declared) {
            return Err(EventError::UnsupportedType((*declared).to_string()));
        }
    }
    for (i, (value, declared)) in values.iter().zip(declared_types.iter()).enumerate() {
        if value.type_name() != *declared {
            return Err(EventError::TypeMismatch {
                index: i,
                expected: (*declared).to_string(),
                actual: value.type_name().to_string(),
            });
        }
    }

    let mut topics = vec![topic0(signature)];
    let mut non_indexed = Vec::new();
    for (value, is_indexed) in values.iter().zip(indexed.iter()) {
        if *is_indexed {
            let word = encode_topic_value(value)?;
            topics.push(H256(word));
        } else {
            non_indexed.push(value.clone());
        }
    }

    Ok(EncodedEvent {
        address: contract,
        topics,
        data: encode_params(&non_indexed),
    })
}
