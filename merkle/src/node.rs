use std::rc::Rc;

use types::error::TrieError;
use types::hash::keccak256;
use types::nibble::NibblePath;
use types::rlp::{decode, encode_bytes, encode_list, RlpItem};
use types::H256;

/// A node of the Merkle-Patricia trie. Immutable; `put` builds new nodes and
/// shares unchanged subtrees via `Rc` rather than mutating in place.
///
/// `Hashed` never comes out of `put` — it only appears when a proof is
/// decoded independently of the tree that produced it, standing in for a
/// child the proof did not need to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Empty,
    Leaf {
        path: NibblePath,
        value: Vec<u8>,
    },
    Extension {
        path: NibblePath,
        child: Rc<Node>,
    },
    Branch {
        children: [Rc<Node>; 16],
        value: Option<Vec<u8>>,
    },
    Hashed(H256),
}

impl Node {
    pub fn empty_branch() -> [Rc<Node>; 16] {
        std::array::from_fn(|_| Rc::new(Node::Empty))
    }

    /// The node's own canonical RLP encoding (a list for Leaf/Extension/
    /// Branch, the single byte `0x80` for Empty). Hashing and child-ref
    /// resolution both start from this.
    pub fn encoded(&self) -> Vec<u8> {
        match self {
            Node::Empty => encode_bytes(&[]),
            Node::Leaf { path, value } => {
                let path_item = encode_bytes(&path.to_hex_prefix(true));
                let value_item = encode_bytes(value);
                encode_list(&[path_item, value_item])
            }
            Node::Extension { path, child } => {
                let path_item = encode_bytes(&path.to_hex_prefix(false));
                let child_item = child.as_ref_bytes();
                encode_list(&[path_item, child_item])
            }
            Node::Branch { children, value } => {
                let mut items: Vec<Vec<u8>> = children.iter().map(|c| c.as_ref_bytes()).collect();
                items.push(encode_bytes(value.as_deref().unwrap_or(&[])));
                encode_list(&items)
            }
            Node::Hashed(h) => encode_bytes(&h.0),
        }
    }

    pub fn hash(&self) -> H256 {
        keccak256(&self.encoded())
    }

    /// The RLP item this node contributes to its parent's child-ref slot:
    /// its own encoding inlined if that encoding is under 32 bytes, else the
    /// 32-byte keccak hash of that encoding.
    pub fn as_ref_bytes(&self) -> Vec<u8> {
        if matches!(self, Node::Empty) {
            return encode_bytes(&[]);
        }
        let encoded = self.encoded();
        if encoded.len() < 32 {
            encoded
        } else {
            encode_bytes(&keccak256(&encoded).0)
        }
    }

    /// Decode a node from its own top-level RLP encoding, e.g. one opened
    /// RLP item out of a merkle proof.
    pub fn create_from_rlp(bytes: &[u8]) -> Result<Node, TrieError> {
        let item = decode(bytes)?;
        Node::from_item(&item)
    }

    fn from_item(item: &RlpItem) -> Result<Node, TrieError> {
        match item {
            RlpItem::String(s) => {
                if s.is_empty() {
                    Ok(Node::Empty)
                } else if s.len() == 32 {
                    Ok(Node::Hashed(H256::from_slice(s)))
                } else {
                    Err(TrieError::InvalidNode(format!(
                        "bare string item of length {} is neither empty nor a hash",
                        s.len()
                    )))
                }
            }
            RlpItem::List(items) => match items.len() {
                2 => {
                    let path_bytes = items[0].as_string()?;
                    let (path, is_leaf) = NibblePath::from_hex_prefix(path_bytes)
                        .ok_or_else(|| TrieError::InvalidNode("empty hex-prefix path item".into()))?;
                    if is_leaf {
                        Ok(Node::Leaf {
                            path,
                            value: items[1].as_string()?.to_vec(),
                        })
                    } else {
                        Ok(Node::Extension {
                            path,
                            child: Rc::new(Node::from_item(&items[1])?),
                        })
                    }
                }
                17 => {
                    let mut children = Node::empty_branch();
                    for (i, child) in children.iter_mut().enumerate() {
                        *child = Rc::new(Node::from_item(&items[i])?);
                    }
                    let value_bytes = items[16].as_string()?;
                    let value = if value_bytes.is_empty() {
                        None
                    } else {
                        Some(value_bytes.to_vec())
                    };
                    Ok(Node::Branch { children, value })
                }
                n => Err(TrieError::InvalidNode(format!(
                    "list node has {} items, expected 2 or 17",
                    n
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_node_hash_matches_empty_rlp_string() {
        let hash = Node::Empty.hash();
        assert_eq!(hash, keccak256(&[0x80]));
    }

    #[test]
    fn leaf_roundtrips_through_rlp() {
        let leaf = Node::Leaf {
            path: NibblePath::from_bytes(b"cat"),
            value: b"meow".to_vec(),
        };
        let encoded = leaf.encoded();
        let decoded = Node::create_from_rlp(&encoded).unwrap();
        assert_eq!(decoded, leaf);
    }

    #[test]
    fn branch_with_inline_leaf_children_roundtrips() {
        let mut children = Node::empty_branch();
        children[0] = Rc::new(Node::Leaf {
            path: NibblePath::from_bytes(&[0xAB]),
            value: b"x".to_vec(),
        });
        let branch = Node::Branch {
            children,
            value: None,
        };
        let encoded = branch.encoded();
        let decoded = Node::create_from_rlp(&encoded).unwrap();
        assert_eq!(decoded, branch);
    }

    #[test]
    fn large_child_hashes_instead_of_inlining() {
        let big_value = vec![0x11u8; 64];
        let leaf = Node::Leaf {
            path: NibblePath::from_bytes(b"longvalue"),
            value: big_value,
        };
        assert!(leaf.encoded().len() >= 32);
        let branch_child_ref = leaf.as_ref_bytes();
        // A hashed ref RLP-encodes as a 32-byte string: 0xa0 prefix + 32 bytes.
        assert_eq!(branch_child_ref.len(), 33);
        assert_eq!(branch_child_ref[0], 0xa0);
    }
}
