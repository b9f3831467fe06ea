use std::collections::BTreeMap;

use merkle_generator::PatriciaTrie;
use proptest::prelude::*;

fn build_trie(entries: &BTreeMap<Vec<u8>, Vec<u8>>) -> PatriciaTrie {
    let mut trie = PatriciaTrie::new();
    for (k, v) in entries {
        trie.put(k, v.clone());
    }
    trie
}

proptest! {
    /// Every key put into the trie comes back out of `get` unchanged.
    #[test]
    fn put_then_get_roundtrips(entries in prop::collection::btree_map(
        prop::collection::vec(any::<u8>(), 1..8),
        prop::collection::vec(1u8..=255, 1..16),
        1..40,
    )) {
        let trie = build_trie(&entries);
        for (k, v) in &entries {
            prop_assert_eq!(trie.get(k), v.clone());
        }
    }

    /// The root hash depends only on the final key/value set, not the order
    /// keys were inserted in.
    #[test]
    fn root_hash_is_order_independent(
        entries in prop::collection::btree_map(
            prop::collection::vec(any::<u8>(), 1..8),
            prop::collection::vec(1u8..=255, 1..16),
            1..40,
        ),
        seed in any::<u64>(),
    ) {
        let forward = build_trie(&entries);

        let mut shuffled: Vec<_> = entries.iter().collect();
        // Deterministic pseudo-shuffle from the proptest-supplied seed, since
        // this crate never reaches for `rand::random`/`Math.random`-style
        // ambient randomness inside library code.
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        let mut reordered = PatriciaTrie::new();
        for (k, v) in shuffled {
            reordered.put(k, v.clone());
        }

        prop_assert_eq!(forward.root_hash(), reordered.root_hash());
    }

    /// Every key actually in the trie yields a proof that verifies to its
    /// real value, and to no other value.
    #[test]
    fn proofs_verify_present_keys_and_reject_wrong_values(
        entries in prop::collection::btree_map(
            prop::collection::vec(any::<u8>(), 1..8),
            prop::collection::vec(1u8..=255, 1..16),
            1..40,
        ),
    ) {
        let trie = build_trie(&entries);
        let root = trie.root_hash();

        for (k, v) in &entries {
            let proof = trie.generate_merkle_proof(k).unwrap();
            prop_assert!(PatriciaTrie::verify_merkle_proof(root, k, v, &proof).unwrap());

            let mut wrong = v.clone();
            wrong.push(0xFF);
            prop_assert!(!PatriciaTrie::verify_merkle_proof(root, k, &wrong, &proof).unwrap());
        }
    }

    /// Proof generation refuses to manufacture a proof for a key that was
    /// never inserted.
    #[test]
    fn proof_generation_fails_for_keys_not_in_the_trie(
        entries in prop::collection::btree_map(
            prop::collection::vec(any::<u8>(), 1..8),
            prop::collection::vec(1u8..=255, 1..16),
            1..40,
        ),
        probe in prop::collection::vec(any::<u8>(), 1..8),
    ) {
        prop_assume!(!entries.contains_key(&probe));
        let trie = build_trie(&entries);
        prop_assert!(trie.generate_merkle_proof(&probe).is_err());
    }
}
