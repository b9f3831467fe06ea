//! The receipt/log shapes a relayer decodes off the wire, and the matcher
//! that checks whether an encoded event was actually emitted by a given
//! transaction. Field names mirror the JSON-RPC `eth_getTransactionReceipt`
//! response this corpus's bridge types already model.

use serde::Deserialize;

use crate::event::EncodedEvent;
use crate::hex_boundary::{deserialize_bytes, deserialize_fixed, deserialize_fixed_vec, deserialize_hex_u64};
use crate::primitives::{H160, H256};

/// One entry of `receipt.logs`. Matching is always done against the raw
/// bytes decoded here, never against the original hex string, so it is
/// case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedLog {
    #[serde(deserialize_with = "deserialize_fixed")]
    pub address: H160,
    #[serde(deserialize_with = "deserialize_fixed_vec")]
    pub topics: Vec<H256>,
    #[serde(deserialize_with = "deserialize_bytes")]
    pub data: Vec<u8>,
    /// Geth's "this log was reorged out" flag. A removed log never matches.
    #[serde(default)]
    pub removed: bool,
}

impl DecodedLog {
    /// Whether this log is exactly the encoding of `event`, emitted by
    /// `event`'s own contract address, and not itself reorged out.
    pub fn matches(&self, event: &EncodedEvent) -> bool {
        !self.removed
            && self.address == event.address
            && self.topics == event.topics
            && self.data == event.data
    }
}

/// The subset of `eth_getTransactionReceipt` needed to locate a matching log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedReceipt {
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub status: u64,
    #[serde(default)]
    pub logs: Vec<DecodedLog>,
}

impl DecodedReceipt {
    /// A zero status means the transaction reverted; nothing it logged
    /// counts as having happened.
    pub fn succeeded(&self) -> bool {
        self.status != 0
    }

    /// Find the log matching `event` — but only if exactly one such log
    /// exists. Zero matches and more-than-one matches both report "not
    /// found", since an ambiguous match is as useless to a relayer as no
    /// match at all: `(false, DecodedLog::default())`.
    pub fn find_in(&self, event: &EncodedEvent) -> (bool, DecodedLog) {
        if !self.succeeded() {
            return (false, DecodedLog::default());
        }
        let mut matches = self.logs.iter().filter(|log| log.matches(event));
        match (matches.next(), matches.next()) {
            (Some(log), None) => (true, log.clone()),
            _ => (false, DecodedLog::default()),
        }
    }

    pub fn is_found_in(&self, event: &EncodedEvent) -> bool {
        self.find_in(event).0
    }
}
