//! A narrow Ethereum ABI encoder covering exactly the value shapes an event
//! parameter list needs: static single-word values, and the two dynamic
//! shapes (`string`, `bytes`) encoded head/tail-style. Not a general ABI
//! codec — there's no struct/array support here, because [`event`] never
//! needs one.

use crate::error::EventError;
use crate::primitives::{H160, U256};

/// One ABI-typed value ready to be packed into a parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint256(U256),
    Uint8(u8),
    Int256([u8; 32]),
    Address(H160),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
}

impl AbiValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AbiValue::Uint256(_) => "uint256",
            AbiValue::Uint8(_) => "uint8",
            AbiValue::Int256(_) => "int256",
            AbiValue::Address(_) => "address",
            AbiValue::Bool(_) => "bool",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
        }
    }

    /// True for values that are a single 32-byte word on their own; false
    /// for `bytes`/`string`, which are encoded as an offset in the head and
    /// their payload in the tail.
    pub fn is_static(&self) -> bool {
        !matches!(self, AbiValue::Bytes(_) | AbiValue::String(_))
    }

    /// The single 32-byte word a static value occupies in the head.
    /// Panics if called on a dynamic value; callers only reach this after
    /// checking [`is_static`].
    fn static_word(&self) -> [u8; 32] {
        match self {
            AbiValue::Uint256(u) => u.0,
            AbiValue::Uint8(n) => {
                let mut word = [0u8; 32];
                word[31] = *n;
                word
            }
            AbiValue::Int256(bytes) => *bytes,
            AbiValue::Address(addr) => {
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(&addr.0);
                word
            }
            AbiValue::Bool(b) => {
                let mut word = [0u8; 32];
                word[31] = *b as u8;
                word
            }
            AbiValue::Bytes(_) | AbiValue::String(_) => {
                unreachable!("static_word called on a dynamic value")
            }
        }
    }

    /// The dynamic payload: length-prefixed and right-padded to a multiple
    /// of 32 bytes, as the ABI spec requires for `bytes` and `string` tails.
    fn dynamic_tail(&self) -> Vec<u8> {
        let raw: &[u8] = match self {
            AbiValue::Bytes(b) => b,
            AbiValue::String(s) => s.as_bytes(),
            _ => unreachable!("dynamic_tail called on a static value"),
        };
        let mut out = Vec::with_capacity(32 + pad32(raw.len()));
        out.extend_from_slice(&word_from_usize(raw.len()));
        out.extend_from_slice(raw);
        out.resize(32 + pad32(raw.len()), 0);
        out
    }
}

fn word_from_usize(n: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&(n as u64).to_be_bytes());
    word
}

fn pad32(len: usize) -> usize {
    (len + 31) / 32 * 32
}

/// ABI-encode a parameter list: static values go head-first in order with
/// their own word, dynamic values leave a 32-byte offset in the head and
/// queue their payload for the tail, appended in head order after it.
pub fn encode_params(values: &[AbiValue]) -> Vec<u8> {
    let head_len: usize = values.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for value in values {
        if value.is_static() {
            head.extend_from_slice(&value.static_word());
        } else {
            head.extend_from_slice(&word_from_usize(head_len + tail.len()));
            tail.extend_from_slice(&value.dynamic_tail());
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Encode a single value as it would appear as one `indexed` event topic:
/// static values use their own word; dynamic values are hashed (the ABI
/// rule for indexed `string`/`bytes` parameters — the original content is
/// not recoverable from the topic).
pub fn encode_topic_value(value: &AbiValue) -> Result<[u8; 32], EventError> {
    if value.is_static() {
        Ok(value.static_word())
    } else {
        Err(EventError::TypeMismatch {
            index: 0,
            expected: "a static value type".into(),
            actual: value.type_name().into(),
        })
    }
}
