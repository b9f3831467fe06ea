//! RLP encoding reuses `alloy_rlp`'s `Encodable`/`Header`/`BufMut` machinery,
//! the same way the teacher crate encodes receipts and log entries. Decoding
//! has no equivalent in the teacher (it only ever encodes), so `RlpItem` and
//! `decode` below are new, hand-written against the RLP spec directly.

use alloy_rlp::{BufMut, Encodable, Header, EMPTY_LIST_CODE, EMPTY_STRING_CODE};

use crate::error::TrieError;

/// Encode a single byte string as a top-level RLP item.
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.length());
    data.encode(&mut out);
    out
}

/// Encode a list of already-RLP-encoded items as a single RLP list item.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(|i| i.len()).sum();
    let mut out = Vec::with_capacity(payload_len + 9);
    Header {
        list: true,
        payload_length: payload_len,
    }
    .encode(&mut out);
    for item in items {
        out.put_slice(item);
    }
    out
}

/// A decoded RLP item: either a byte string or a list of items, with no
/// further type information (RLP itself carries none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    String(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    pub fn as_string(&self) -> Result<&[u8], TrieError> {
        match self {
            RlpItem::String(s) => Ok(s),
            RlpItem::List(_) => Err(TrieError::MalformedRlp("expected string item, got list".into())),
        }
    }

    pub fn as_list(&self) -> Result<&[RlpItem], TrieError> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::String(_) => Err(TrieError::MalformedRlp("expected list item, got string".into())),
        }
    }
}

/// Decode exactly one RLP item from `input`, requiring that the item consume
/// the entire slice with nothing left over. Canonical-encoding rules are
/// enforced: no non-minimal length prefixes, no single byte < 0x80 wrapped
/// in a length-one string encoding.
pub fn decode(input: &[u8]) -> Result<RlpItem, TrieError> {
    let (item, rest) = decode_item(input)?;
    if !rest.is_empty() {
        return Err(TrieError::MalformedRlp("trailing bytes after top-level item".into()));
    }
    Ok(item)
}

fn decode_item(input: &[u8]) -> Result<(RlpItem, &[u8]), TrieError> {
    let prefix = *input
        .first()
        .ok_or_else(|| TrieError::MalformedRlp("empty input".into()))?;

    match prefix {
        0x00..=0x7F => Ok((RlpItem::String(vec![prefix]), &input[1..])),

        EMPTY_STRING_CODE..=0xB7 => {
            let len = (prefix - EMPTY_STRING_CODE) as usize;
            let (payload, rest) = take(input, 1, len)?;
            if len == 1 && payload[0] < 0x80 {
                return Err(TrieError::MalformedRlp("non-canonical single-byte string encoding".into()));
            }
            Ok((RlpItem::String(payload.to_vec()), rest))
        }

        0xB8..=0xBF => {
            let len_of_len = (prefix - 0xB7) as usize;
            let (len_bytes, after_len) = take(input, 1, len_of_len)?;
            let len = be_len(len_bytes)?;
            if len <= 55 {
                return Err(TrieError::MalformedRlp("non-canonical long-string length".into()));
            }
            let (payload, rest) = take(after_len, 0, len)?;
            Ok((RlpItem::String(payload.to_vec()), rest))
        }

        EMPTY_LIST_CODE..=0xF7 => {
            let len = (prefix - EMPTY_LIST_CODE) as usize;
            let (payload, rest) = take(input, 1, len)?;
            Ok((RlpItem::List(decode_list_payload(payload)?), rest))
        }

        0xF8..=0xFF => {
            let len_of_len = (prefix - 0xF7) as usize;
            let (len_bytes, after_len) = take(input, 1, len_of_len)?;
            let len = be_len(len_bytes)?;
            if len <= 55 {
                return Err(TrieError::MalformedRlp("non-canonical long-list length".into()));
            }
            let (payload, rest) = take(after_len, 0, len)?;
            Ok((RlpItem::List(decode_list_payload(payload)?), rest))
        }
    }
}

fn decode_list_payload(mut payload: &[u8]) -> Result<Vec<RlpItem>, TrieError> {
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (item, rest) = decode_item(payload)?;
        items.push(item);
        payload = rest;
    }
    Ok(items)
}

/// Splits `input` into (header-skip discarded, `len`-byte payload, remainder),
/// where `header_skip` bytes (the prefix already consumed by the caller) are
/// dropped from the front first.
fn take(input: &[u8], header_skip: usize, len: usize) -> Result<(&[u8], &[u8]), TrieError> {
    let body = &input[header_skip..];
    if body.len() < len {
        return Err(TrieError::MalformedRlp("item length exceeds remaining input".into()));
    }
    Ok((&body[..len], &body[len..]))
}

fn be_len(bytes: &[u8]) -> Result<usize, TrieError> {
    if bytes.is_empty() || bytes[0] == 0 {
        return Err(TrieError::MalformedRlp("non-canonical length-of-length encoding".into()));
    }
    if bytes.len() > std::mem::size_of::<usize>() {
        return Err(TrieError::MalformedRlp("length-of-length too large".into()));
    }
    let mut buf = [0u8; std::mem::size_of::<usize>()];
    buf[std::mem::size_of::<usize>() - bytes.len()..].copy_from_slice(bytes);
    Ok(usize::from_be_bytes(buf))
}
