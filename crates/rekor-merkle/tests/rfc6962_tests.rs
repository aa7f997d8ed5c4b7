//! RFC 6962 Merkle tree test suite
//!
//! Proofs are generated by a reference tree built from the recursive RFC 6962
//! definitions and checked against the iterative verifiers.

mod common;

use common::ReferenceTree;
use rekor_merkle::{
    consistency_proof_size, inclusion_proof_size, verify_consistency, verify_inclusion, Error,
    LogHasher, Rfc6962Hasher, Root,
};
use rekor_types::Sha256Hash;
use rstest::rstest;
use sha2::{Digest, Sha384};

const MAX_SIZE: u64 = 40;

fn flip_bit(hash: &Sha256Hash, bit: usize) -> Sha256Hash {
    let mut bytes = *hash.as_bytes();
    bytes[bit / 8] ^= 1 << (bit % 8);
    Sha256Hash::from_bytes(bytes)
}

// ==== Inclusion ====

#[test]
fn test_inclusion_all_sizes() {
    let hasher = Rfc6962Hasher;
    let tree = ReferenceTree::new(&hasher, MAX_SIZE);

    for size in 1..=MAX_SIZE {
        let root = tree.root(size);
        for index in 0..size {
            let proof = tree.inclusion_proof(index, size);
            assert_eq!(Some(proof.len()), inclusion_proof_size(index, size));

            let result = verify_inclusion(&hasher, &tree.leaf(index), index, size, &proof, &root);
            assert!(
                result.is_ok(),
                "leaf {} of {} should verify: {:?}",
                index,
                size,
                result
            );
        }
    }
}

#[test]
fn test_inclusion_bit_flips() {
    let hasher = Rfc6962Hasher;
    let tree = ReferenceTree::new(&hasher, 8);

    for size in 1..=8 {
        let root = tree.root(size);
        for index in 0..size {
            let leaf = tree.leaf(index);
            let proof = tree.inclusion_proof(index, size);

            for position in 0..proof.len() {
                for bit in 0..256 {
                    let mut tampered = proof.clone();
                    tampered[position] = flip_bit(&proof[position], bit);
                    let err = verify_inclusion(&hasher, &leaf, index, size, &tampered, &root)
                        .unwrap_err();
                    assert!(matches!(err, Error::RootMismatch { .. }));
                }
            }

            for bit in 0..256 {
                let err = verify_inclusion(&hasher, &leaf, index, size, &proof, &flip_bit(&root, bit))
                    .unwrap_err();
                assert!(matches!(
                    err,
                    Error::RootMismatch {
                        root: Root::Inclusion,
                        ..
                    }
                ));
            }
        }
    }
}

#[test]
fn test_inclusion_wrong_leaf() {
    let hasher = Rfc6962Hasher;
    let tree = ReferenceTree::new(&hasher, 7);
    let proof = tree.inclusion_proof(3, 7);

    let err = verify_inclusion(&hasher, &tree.leaf(4), 3, 7, &proof, &tree.root(7)).unwrap_err();
    assert!(matches!(err, Error::RootMismatch { .. }));
}

#[test]
fn test_inclusion_single_leaf() {
    let leaf = Rfc6962Hasher.hash_leaf(b"single leaf");
    assert!(verify_inclusion(&Rfc6962Hasher, &leaf, 0, 1, &[], &leaf).is_ok());
}

#[test]
fn test_inclusion_four_leaves() {
    let hasher = Rfc6962Hasher;
    let leaves: Vec<_> = (0..4)
        .map(|i| hasher.hash_leaf(format!("leaf {}", i).as_bytes()))
        .collect();

    let h01 = hasher.hash_children(&leaves[0], &leaves[1]);
    let h23 = hasher.hash_children(&leaves[2], &leaves[3]);
    let root = hasher.hash_children(&h01, &h23);

    assert!(verify_inclusion(&hasher, &leaves[0], 0, 4, &[leaves[1], h23], &root).is_ok());
    assert!(verify_inclusion(&hasher, &leaves[1], 1, 4, &[leaves[0], h23], &root).is_ok());
    assert!(verify_inclusion(&hasher, &leaves[2], 2, 4, &[leaves[3], h01], &root).is_ok());
    assert!(verify_inclusion(&hasher, &leaves[3], 3, 4, &[leaves[2], h01], &root).is_ok());
}

#[rstest]
#[case(5, 3)]
#[case(1, 1)]
#[case(0, 0)]
#[case(u64::MAX, 10)]
fn test_inclusion_invalid_index(#[case] index: u64, #[case] size: u64) {
    let leaf = Rfc6962Hasher.hash_leaf(b"test");
    let err = verify_inclusion(&Rfc6962Hasher, &leaf, index, size, &[], &leaf).unwrap_err();
    assert!(matches!(err, Error::InvalidIndex(_)));
}

#[rstest]
#[case(0, 1, 1)]
#[case(2, 5, 0)]
#[case(2, 5, 4)]
#[case(6, 7, 3)]
fn test_inclusion_wrong_proof_length(#[case] index: u64, #[case] size: u64, #[case] len: usize) {
    let hasher = Rfc6962Hasher;
    let tree = ReferenceTree::new(&hasher, size);
    let filler = vec![tree.leaf(0); len];

    let err = verify_inclusion(&hasher, &tree.leaf(index), index, size, &filler, &tree.root(size))
        .unwrap_err();
    assert!(matches!(err, Error::MalformedProof(_)));
}

// ==== Consistency ====

#[test]
fn test_consistency_all_sizes() {
    let hasher = Rfc6962Hasher;
    let tree = ReferenceTree::new(&hasher, MAX_SIZE);

    for last in 1..=MAX_SIZE {
        let new_root = tree.root(last);
        for first in 1..=last {
            let proof = tree.consistency_proof(first, last);
            assert_eq!(Some(proof.len()), consistency_proof_size(first, last));

            let result = verify_consistency(&hasher, first, last, &proof, &tree.root(first), &new_root);
            assert!(
                result.is_ok(),
                "{} -> {} should verify: {:?}",
                first,
                last,
                result
            );
        }
    }
}

#[test]
fn test_consistency_bit_flips() {
    let hasher = Rfc6962Hasher;
    let tree = ReferenceTree::new(&hasher, 9);

    for last in 2..=9 {
        for first in 1..last {
            let proof = tree.consistency_proof(first, last);
            let (old_root, new_root) = (tree.root(first), tree.root(last));

            for position in 0..proof.len() {
                for bit in (0..256).step_by(7) {
                    let mut tampered = proof.clone();
                    tampered[position] = flip_bit(&proof[position], bit);
                    let err =
                        verify_consistency(&hasher, first, last, &tampered, &old_root, &new_root)
                            .unwrap_err();
                    assert!(matches!(err, Error::RootMismatch { .. }));
                }
            }

            let err = verify_consistency(
                &hasher,
                first,
                last,
                &proof,
                &old_root,
                &flip_bit(&new_root, 0),
            )
            .unwrap_err();
            assert!(matches!(err, Error::RootMismatch { root: Root::New, .. }));
        }
    }
}

#[test]
fn test_consistency_same_size() {
    let root = Rfc6962Hasher.hash_leaf(b"test");
    assert!(verify_consistency(&Rfc6962Hasher, 5, 5, &[], &root, &root).is_ok());

    let other = Rfc6962Hasher.hash_leaf(b"other");
    let err = verify_consistency(&Rfc6962Hasher, 5, 5, &[], &root, &other).unwrap_err();
    assert!(matches!(err, Error::RootMismatch { .. }));

    let err = verify_consistency(&Rfc6962Hasher, 5, 5, &[root], &root, &root).unwrap_err();
    assert!(matches!(err, Error::MalformedProof(_)));
}

#[test]
fn test_consistency_one_hash_short() {
    let hasher = Rfc6962Hasher;
    let tree = ReferenceTree::new(&hasher, 7);
    let proof = tree.consistency_proof(4, 7);
    assert_eq!(proof.len(), 1);

    let err = verify_consistency(&hasher, 4, 7, &proof[..0], &tree.root(4), &tree.root(7))
        .unwrap_err();
    assert!(matches!(err, Error::MalformedProof(_)));

    let proof = tree.consistency_proof(3, 7);
    let err = verify_consistency(
        &hasher,
        3,
        7,
        &proof[..proof.len() - 1],
        &tree.root(3),
        &tree.root(7),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MalformedProof(_)));
}

#[test]
fn test_consistency_empty_old_tree() {
    let root = Rfc6962Hasher.hash_leaf(b"test");
    let empty_root = Sha256Hash::from_bytes([0u8; 32]);
    assert!(verify_consistency(&Rfc6962Hasher, 0, 1, &[], &empty_root, &root).is_ok());

    let err = verify_consistency(&Rfc6962Hasher, 0, 1, &[root], &empty_root, &root).unwrap_err();
    assert!(matches!(err, Error::MalformedProof(_)));
}

#[test]
fn test_consistency_shrinking_tree() {
    let root = Rfc6962Hasher.hash_leaf(b"test");
    let err = verify_consistency(&Rfc6962Hasher, 2, 1, &[], &root, &root).unwrap_err();
    assert!(matches!(err, Error::MalformedProof(_)));
}

// ==== Pluggable hasher ====

/// SHA-384 variant of the RFC 6962 hasher with different prefixes
struct Sha384Hasher;

impl LogHasher for Sha384Hasher {
    type Hash = [u8; 48];

    fn hash_leaf(&self, data: &[u8]) -> [u8; 48] {
        let mut hasher = Sha384::new();
        hasher.update([0x10]);
        hasher.update(data);
        to_array(&hasher.finalize())
    }

    fn hash_children(&self, left: &[u8; 48], right: &[u8; 48]) -> [u8; 48] {
        let mut hasher = Sha384::new();
        hasher.update([0x11]);
        hasher.update(left);
        hasher.update(right);
        to_array(&hasher.finalize())
    }

    fn size(&self) -> usize {
        48
    }
}

fn to_array(digest: &[u8]) -> [u8; 48] {
    let mut bytes = [0u8; 48];
    bytes.copy_from_slice(digest);
    bytes
}

#[test]
fn test_alternate_hasher() {
    let hasher = Sha384Hasher;
    let tree = ReferenceTree::new(&hasher, 13);

    for index in 0..13 {
        let proof = tree.inclusion_proof(index, 13);
        assert!(verify_inclusion(&hasher, &tree.leaf(index), index, 13, &proof, &tree.root(13)).is_ok());
    }

    let proof = tree.consistency_proof(6, 13);
    assert!(verify_consistency(&hasher, 6, 13, &proof, &tree.root(6), &tree.root(13)).is_ok());

    // Same leaf data, different primitive: the roots disagree
    let sha256_tree = ReferenceTree::new(&Rfc6962Hasher, 13);
    assert_ne!(sha256_tree.root(13).as_bytes()[..], tree.root(13)[..32]);
}
