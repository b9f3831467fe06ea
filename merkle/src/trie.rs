use std::rc::Rc;

use types::error::TrieError;
use types::nibble::NibblePath;
use types::H256;

use crate::node::Node;

/// An insertion-ordered mapping from a node's hash to its RLP encoding, as
/// produced by [`PatriciaTrie::generate_merkle_proof`] and consumed by
/// [`PatriciaTrie::verify_merkle_proof`]. Every node visited while walking
/// towards a key is deposited here keyed by its own Keccak hash, regardless
/// of whether its parent happens to reference it inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofStore {
    entries: Vec<(H256, Vec<u8>)>,
}

impl ProofStore {
    fn new() -> Self {
        ProofStore { entries: Vec::new() }
    }

    fn insert(&mut self, hash: H256, encoded: Vec<u8>) {
        if self.get(&hash).is_none() {
            self.entries.push((hash, encoded));
        }
    }

    pub fn get(&self, hash: &H256) -> Option<&Vec<u8>> {
        self.entries.iter().find(|(h, _)| h == hash).map(|(_, bytes)| bytes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An immutable-per-version Merkle-Patricia trie. `put` never mutates a node
/// in place; it returns a tree that shares every untouched subtree with the
/// version it was built from via `Rc`.
#[derive(Debug, Clone)]
pub struct PatriciaTrie {
    root: Rc<Node>,
}

impl Default for PatriciaTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PatriciaTrie {
    pub fn new() -> Self {
        PatriciaTrie {
            root: Rc::new(Node::Empty),
        }
    }

    pub fn root_hash(&self) -> H256 {
        self.root.hash()
    }

    pub fn put(&mut self, key: &[u8], value: Vec<u8>) {
        let path = NibblePath::from_bytes(key);
        self.root = insert(&self.root, path, value);
    }

    /// The value stored at `key`, or an empty byte sequence if `key` is
    /// absent — "absent" and "present with an explicitly empty value" are
    /// not distinguished, matching how an empty RLP string already stands
    /// for "no value" on a branch node.
    pub fn get(&self, key: &[u8]) -> Vec<u8> {
        let path = NibblePath::from_bytes(key);
        get_rec(&self.root, &path)
    }

    /// Walk from the root towards `key`, depositing every visited node's
    /// encoding into a [`ProofStore`] keyed by its own hash. Only supports
    /// proofs of inclusion: fails with [`TrieError::KeyNotFound`] if `key`
    /// is not actually in the trie.
    pub fn generate_merkle_proof(&self, key: &[u8]) -> Result<ProofStore, TrieError> {
        let mut store = ProofStore::new();
        let mut node = self.root.clone();
        let mut remaining = NibblePath::from_bytes(key);

        loop {
            store.insert(node.hash(), node.encoded());
            match node.as_ref() {
                Node::Empty => return Err(TrieError::KeyNotFound),
                Node::Leaf { path, .. } => {
                    return if &remaining == path {
                        Ok(store)
                    } else {
                        Err(TrieError::KeyNotFound)
                    };
                }
                Node::Extension { path, child } => {
                    if !remaining.starts_with(path) {
                        return Err(TrieError::KeyNotFound);
                    }
                    remaining = remaining.drop_first(path.len());
                    node = child.clone();
                }
                Node::Branch { children, value } => {
                    if remaining.is_empty() {
                        return if value.is_some() {
                            Ok(store)
                        } else {
                            Err(TrieError::KeyNotFound)
                        };
                    }
                    let nibble = remaining.head();
                    remaining = remaining.tail();
                    node = children[nibble as usize].clone();
                }
                Node::Hashed(_) => unreachable!("a live trie never stores a Hashed placeholder"),
            }
        }
    }

    /// Verify that `proof` opens `root_hash` to `expected_value` at `key`.
    /// Fails if any node the walk needs is missing from `proof`, if a node
    /// doesn't decode, or if the key diverges from what the proof describes
    /// — this only certifies inclusion, mirroring `generate_merkle_proof`.
    pub fn verify_merkle_proof(
        root_hash: H256,
        key: &[u8],
        expected_value: &[u8],
        proof: &ProofStore,
    ) -> Result<bool, TrieError> {
        let root_bytes = proof
            .get(&root_hash)
            .ok_or_else(|| TrieError::InvalidProof("referenced node is missing from the proof store".into()))?;
        let mut node = Node::create_from_rlp(root_bytes)?;
        let mut remaining = NibblePath::from_bytes(key);

        loop {
            match node {
                Node::Empty => return Err(TrieError::InvalidProof("key diverges at an empty node".into())),
                Node::Leaf { path, value } => {
                    return if remaining == path {
                        Ok(value == expected_value)
                    } else {
                        Err(TrieError::InvalidProof("key diverges at a leaf".into()))
                    };
                }
                Node::Extension { path, child } => {
                    if !remaining.starts_with(&path) {
                        return Err(TrieError::InvalidProof("key diverges inside an extension".into()));
                    }
                    remaining = remaining.drop_first(path.len());
                    node = resolve_ref(&child, proof)?;
                }
                Node::Branch { children, value } => {
                    if remaining.is_empty() {
                        return match value {
                            Some(v) => Ok(v == expected_value),
                            None => Err(TrieError::InvalidProof("branch has no terminal value for this key".into())),
                        };
                    }
                    let nibble = remaining.head();
                    remaining = remaining.tail();
                    node = resolve_ref(&children[nibble as usize], proof)?;
                }
                Node::Hashed(h) => {
                    let bytes = proof
                        .get(&h)
                        .ok_or_else(|| TrieError::InvalidProof("referenced node is missing from the proof store".into()))?;
                    node = Node::create_from_rlp(bytes)?;
                }
            }
        }
    }
}

/// Resolve one child reference during verification. An inline child was
/// already fully decoded by `create_from_rlp`, so it is used directly — no
/// further proof-store lookup, matching how `ref(node)` lets encoding
/// shorter than 32 bytes skip the hash entirely. Only a genuinely
/// out-of-line (`Hashed`) reference consumes a proof-store entry.
fn resolve_ref(child: &Rc<Node>, proof: &ProofStore) -> Result<Node, TrieError> {
    match child.as_ref() {
        Node::Hashed(h) => {
            let bytes = proof
                .get(h)
                .ok_or_else(|| TrieError::InvalidProof("referenced node is missing from the proof store".into()))?;
            Node::create_from_rlp(bytes)
        }
        other => Ok(other.clone()),
    }
}

fn get_rec(node: &Node, path: &NibblePath) -> Vec<u8> {
    match node {
        Node::Empty => Vec::new(),
        Node::Leaf { path: lp, value } => {
            if path == lp {
                value.clone()
            } else {
                Vec::new()
            }
        }
        Node::Extension { path: ep, child } => {
            if path.starts_with(ep) {
                get_rec(child, &path.drop_first(ep.len()))
            } else {
                Vec::new()
            }
        }
        Node::Branch { children, value } => {
            if path.is_empty() {
                value.clone().unwrap_or_default()
            } else {
                get_rec(&children[path.head() as usize], &path.tail())
            }
        }
        Node::Hashed(_) => unreachable!("a live trie never stores a Hashed placeholder"),
    }
}

fn insert(node: &Rc<Node>, path: NibblePath, value: Vec<u8>) -> Rc<Node> {
    match node.as_ref() {
        Node::Empty => Rc::new(Node::Leaf { path, value }),

        Node::Leaf { path: lp, value: lv } => {
            if &path == lp {
                return Rc::new(Node::Leaf { path, value });
            }
            let common = path.prefix_matching_length(lp);
            let remaining_old = lp.drop_first(common);
            let remaining_new = path.drop_first(common);

            let mut children = Node::empty_branch();
            let mut branch_value = None;

            if remaining_old.is_empty() {
                branch_value = Some(lv.clone());
            } else {
                children[remaining_old.head() as usize] = Rc::new(Node::Leaf {
                    path: remaining_old.tail(),
                    value: lv.clone(),
                });
            }

            if remaining_new.is_empty() {
                branch_value = Some(value);
            } else {
                children[remaining_new.head() as usize] = Rc::new(Node::Leaf {
                    path: remaining_new.tail(),
                    value,
                });
            }

            let branch = Rc::new(Node::Branch {
                children,
                value: branch_value,
            });
            if common > 0 {
                Rc::new(Node::Extension {
                    path: path.take(common),
                    child: branch,
                })
            } else {
                branch
            }
        }

        Node::Extension { path: ep, child } => {
            let common = path.prefix_matching_length(ep);

            if common == ep.len() {
                let new_child = insert(child, path.drop_first(common), value);
                return Rc::new(Node::Extension {
                    path: ep.clone(),
                    child: new_child,
                });
            }

            let remaining_old = ep.drop_first(common);
            let remaining_new = path.drop_first(common);

            let old_branch_entry = if remaining_old.len() == 1 {
                child.clone()
            } else {
                Rc::new(Node::Extension {
                    path: remaining_old.tail(),
                    child: child.clone(),
                })
            };

            let mut children = Node::empty_branch();
            let mut branch_value = None;
            children[remaining_old.head() as usize] = old_branch_entry;

            if remaining_new.is_empty() {
                branch_value = Some(value);
            } else {
                children[remaining_new.head() as usize] = Rc::new(Node::Leaf {
                    path: remaining_new.tail(),
                    value,
                });
            }

            let branch = Rc::new(Node::Branch {
                children,
                value: branch_value,
            });
            if common > 0 {
                Rc::new(Node::Extension {
                    path: path.take(common),
                    child: branch,
                })
            } else {
                branch
            }
        }

        Node::Branch { children, value: branch_value } => {
            if path.is_empty() {
                return Rc::new(Node::Branch {
                    children: children.clone(),
                    value: Some(value),
                });
            }
            let nibble = path.head() as usize;
            let mut new_children = children.clone();
            new_children[nibble] = insert(&children[nibble], path.tail(), value);
            Rc::new(Node::Branch {
                children: new_children,
                value: branch_value.clone(),
            })
        }

        Node::Hashed(_) => unreachable!("a live trie never stores a Hashed placeholder"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::hash::keccak256;

    #[test]
    fn empty_trie_root_matches_keccak_of_empty_rlp_string() {
        let trie = PatriciaTrie::new();
        assert_eq!(trie.root_hash(), keccak256(&[0x80]));
    }

    #[test]
    fn put_then_get_roundtrips() {
        let mut trie = PatriciaTrie::new();
        trie.put(b"cat", b"meow".to_vec());
        trie.put(b"catalog", b"books".to_vec());
        trie.put(b"dog", b"woof".to_vec());

        assert_eq!(trie.get(b"cat"), b"meow".to_vec());
        assert_eq!(trie.get(b"catalog"), b"books".to_vec());
        assert_eq!(trie.get(b"dog"), b"woof".to_vec());
        assert_eq!(trie.get(b"catfish"), Vec::<u8>::new());
    }

    #[test]
    fn overwrite_existing_key() {
        let mut trie = PatriciaTrie::new();
        trie.put(b"key", b"v1".to_vec());
        trie.put(b"key", b"v2".to_vec());
        assert_eq!(trie.get(b"key"), b"v2".to_vec());
    }

    #[test]
    fn root_hash_is_independent_of_insertion_order() {
        let mut a = PatriciaTrie::new();
        a.put(b"cat", b"1".to_vec());
        a.put(b"dog", b"2".to_vec());
        a.put(b"catalog", b"3".to_vec());

        let mut b = PatriciaTrie::new();
        b.put(b"catalog", b"3".to_vec());
        b.put(b"dog", b"2".to_vec());
        b.put(b"cat", b"1".to_vec());

        assert_eq!(a.root_hash(), b.root_hash());
    }

    #[test]
    fn proof_verifies_membership() {
        let mut trie = PatriciaTrie::new();
        for (k, v) in [("cat", "1"), ("catalog", "2"), ("dog", "3"), ("do", "4")] {
            trie.put(k.as_bytes(), v.as_bytes().to_vec());
        }
        let root = trie.root_hash();

        for (k, v) in [("cat", "1"), ("catalog", "2"), ("dog", "3"), ("do", "4")] {
            let proof = trie.generate_merkle_proof(k.as_bytes()).unwrap();
            let result =
                PatriciaTrie::verify_merkle_proof(root, k.as_bytes(), v.as_bytes(), &proof).unwrap();
            assert!(result);
        }
    }

    #[test]
    fn proof_rejects_wrong_expected_value() {
        let mut trie = PatriciaTrie::new();
        trie.put(b"cat", b"1".to_vec());
        let root = trie.root_hash();
        let proof = trie.generate_merkle_proof(b"cat").unwrap();
        let result = PatriciaTrie::verify_merkle_proof(root, b"cat", b"not-1", &proof).unwrap();
        assert!(!result);
    }

    #[test]
    fn proof_generation_fails_for_absent_key() {
        let mut trie = PatriciaTrie::new();
        trie.put(b"cat", b"1".to_vec());
        trie.put(b"dog", b"2".to_vec());
        assert!(trie.generate_merkle_proof(b"bird").is_err());
    }

    #[test]
    fn tampered_root_hash_is_rejected() {
        let mut trie = PatriciaTrie::new();
        trie.put(b"cat", b"1".to_vec());
        let proof = trie.generate_merkle_proof(b"cat").unwrap();

        let wrong_root = keccak256(b"not the root");
        assert!(PatriciaTrie::verify_merkle_proof(wrong_root, b"cat", b"1", &proof).is_err());
    }

    #[test]
    fn tampering_with_a_stored_node_breaks_verification() {
        let mut trie = PatriciaTrie::new();
        for i in 0u32..40 {
            trie.put(&i.to_be_bytes(), vec![i as u8; 40]);
        }
        let root = trie.root_hash();
        let mut proof = trie.generate_merkle_proof(&17u32.to_be_bytes()).unwrap();
        let (_, bytes) = proof.entries.first_mut().unwrap();
        bytes[0] ^= 0xFF;

        let result = PatriciaTrie::verify_merkle_proof(root, &17u32.to_be_bytes(), &[17u8; 40], &proof);
        assert!(result.is_err() || result == Ok(false));
    }

    #[test]
    fn large_trie_forces_hashed_child_refs_in_proof() {
        let mut trie = PatriciaTrie::new();
        for i in 0u32..256 {
            trie.put(&i.to_be_bytes(), vec![i as u8; 40]);
        }
        let root = trie.root_hash();
        for i in [0u32, 17, 255] {
            let key = i.to_be_bytes();
            let proof = trie.generate_merkle_proof(&key).unwrap();
            assert!(proof.len() > 1);
            let result = PatriciaTrie::verify_merkle_proof(root, &key, &vec![i as u8; 40], &proof).unwrap();
            assert!(result);
        }
    }
}
