/// An ordered sequence of values in `[0, 15]`, half of a byte. Keys into the
/// trie are paths of nibbles, not bytes, so that a branch node can fan out
/// 16-ways per nibble rather than 256-ways per byte. Immutable value type;
/// every operation returns a new `NibblePath`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NibblePath {
    nibbles: Vec<u8>,
}

impl NibblePath {
    /// `from_bytes([0xAB, 0xCD]) == [0xA, 0xB, 0xC, 0xD]`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut nibbles = Vec::with_capacity(bytes.len() * 2);
        for b in bytes {
            nibbles.push(b >> 4);
            nibbles.push(b & 0x0F);
        }
        NibblePath { nibbles }
    }

    pub fn from_nibbles(nibbles: Vec<u8>) -> Self {
        debug_assert!(nibbles.iter().all(|n| *n < 16));
        NibblePath { nibbles }
    }

    pub fn is_empty(&self) -> bool {
        self.nibbles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nibbles.len()
    }

    pub fn at(&self, i: usize) -> u8 {
        self.nibbles[i]
    }

    /// First nibble. Panics on an empty path; callers must check `is_empty`
    /// first, same as the trie's own traversal does before calling this.
    pub fn head(&self) -> u8 {
        self.nibbles[0]
    }

    /// All but the first nibble. Panics on an empty path.
    pub fn tail(&self) -> NibblePath {
        self.drop_first(1)
    }

    pub fn drop_first(&self, n: usize) -> NibblePath {
        NibblePath {
            nibbles: self.nibbles[n.min(self.nibbles.len())..].to_vec(),
        }
    }

    /// The first `n` nibbles.
    pub fn take(&self, n: usize) -> NibblePath {
        NibblePath {
            nibbles: self.nibbles[..n.min(self.nibbles.len())].to_vec(),
        }
    }

    pub fn starts_with(&self, other: &NibblePath) -> bool {
        self.len() >= other.len() && self.nibbles[..other.len()] == other.nibbles[..]
    }

    /// Length of the longest common prefix shared with `other`.
    pub fn prefix_matching_length(&self, other: &NibblePath) -> usize {
        self.nibbles
            .iter()
            .zip(other.nibbles.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn concat(&self, other: &NibblePath) -> NibblePath {
        let mut nibbles = self.nibbles.clone();
        nibbles.extend_from_slice(&other.nibbles);
        NibblePath { nibbles }
    }

    /// Pack the nibble path back into bytes, assuming even length (used to
    /// recover the original key bytes after a full root-to-leaf walk).
    pub fn to_bytes(&self) -> Vec<u8> {
        debug_assert_eq!(self.nibbles.len() % 2, 0);
        self.nibbles
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect()
    }

    /// Ethereum's hex-prefix compaction: one prefix nibble carrying
    /// `(is_leaf ? 2 : 0) | (odd_len ? 1 : 0)`, followed by the path nibbles,
    /// packed into bytes with a zero padding nibble when needed.
    pub fn to_hex_prefix(&self, is_leaf: bool) -> Vec<u8> {
        let odd = self.nibbles.len() % 2 != 0;
        let mut padded = Vec::with_capacity(self.nibbles.len() + 2);
        padded.push(((is_leaf as u8) << 1) | (odd as u8));
        if !odd {
            padded.push(0);
        }
        padded.extend_from_slice(&self.nibbles);

        padded
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect()
    }

    /// Inverse of [`to_hex_prefix`]: recovers the nibble path and the leaf
    /// flag from compacted bytes. An empty `bytes` is treated as the
    /// (empty path, extension) encoding, matching how `to_hex_prefix` of an
    /// empty non-leaf path produces a single `0x00` byte, never zero bytes.
    pub fn from_hex_prefix(bytes: &[u8]) -> Option<(NibblePath, bool)> {
        let first = *bytes.first()?;
        let prefix_nibble = first >> 4;
        let is_leaf = (prefix_nibble & 0b10) != 0;
        let odd = (prefix_nibble & 0b01) != 0;
        if prefix_nibble > 3 {
            return None;
        }

        let mut nibbles = Vec::with_capacity(bytes.len() * 2);
        if odd {
            nibbles.push(first & 0x0F);
        }
        for b in &bytes[1..] {
            nibbles.push(b >> 4);
            nibbles.push(b & 0x0F);
        }

        Some((NibblePath { nibbles }, is_leaf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn hex_prefix_roundtrips_for_any_path(nibbles in prop::collection::vec(0u8..16, 0..20), is_leaf in any::<bool>()) {
            let path = NibblePath::from_nibbles(nibbles);
            let encoded = path.to_hex_prefix(is_leaf);
            let (decoded, got_leaf) = NibblePath::from_hex_prefix(&encoded).unwrap();
            prop_assert_eq!(decoded, path);
            prop_assert_eq!(got_leaf, is_leaf);
        }

        #[test]
        fn from_bytes_is_always_even_length(bytes in prop::collection::vec(any::<u8>(), 0..20)) {
            let path = NibblePath::from_bytes(&bytes);
            prop_assert_eq!(path.len() % 2, 0);
            prop_assert_eq!(path.to_bytes(), bytes);
        }
    }

    #[test]
    fn from_bytes_splits_nibbles() {
        let path = NibblePath::from_bytes(&hex!("abcd"));
        assert_eq!(path.nibbles, vec![0xA, 0xB, 0xC, 0xD]);
    }

    #[test]
    fn encode_leaf_node_nibble() {
        let path = NibblePath::from_nibbles(hex!("0604060f").to_vec());
        let encoded = path.to_hex_prefix(true);
        assert_eq!(encoded, hex!("20646f").to_vec());
    }

    #[test]
    fn hex_prefix_roundtrip_even_leaf() {
        let path = NibblePath::from_nibbles(vec![1, 2, 3, 4]);
        let encoded = path.to_hex_prefix(true);
        let (decoded, is_leaf) = NibblePath::from_hex_prefix(&encoded).unwrap();
        assert!(is_leaf);
        assert_eq!(decoded, path);
    }

    #[test]
    fn hex_prefix_roundtrip_odd_extension() {
        let path = NibblePath::from_nibbles(vec![1, 2, 3]);
        let encoded = path.to_hex_prefix(false);
        let (decoded, is_leaf) = NibblePath::from_hex_prefix(&encoded).unwrap();
        assert!(!is_leaf);
        assert_eq!(decoded, path);
    }

    #[test]
    fn hex_prefix_roundtrip_empty_path() {
        for is_leaf in [true, false] {
            let path = NibblePath::from_nibbles(vec![]);
            let encoded = path.to_hex_prefix(is_leaf);
            let (decoded, got_leaf) = NibblePath::from_hex_prefix(&encoded).unwrap();
            assert_eq!(got_leaf, is_leaf);
            assert_eq!(decoded, path);
        }
    }

    #[test]
    fn prefix_matching_length_stops_at_divergence() {
        let a = NibblePath::from_nibbles(vec![1, 2, 3, 9]);
        let b = NibblePath::from_nibbles(vec![1, 2, 3, 4]);
        assert_eq!(a.prefix_matching_length(&b), 3);
    }

    #[test]
    fn starts_with() {
        let a = NibblePath::from_nibbles(vec![1, 2, 3, 4]);
        let b = NibblePath::from_nibbles(vec![1, 2]);
        assert!(a.starts_with(&b));
        assert!(!b.starts_with(&a));
    }
}
