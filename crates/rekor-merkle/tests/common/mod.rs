//! Reference RFC 6962 tree used to generate proofs for the tests
//!
//! Builds roots and proofs straight from the recursive definitions in
//! RFC 6962 section 2.1, independent of the verifier's iterative walks.

#![allow(dead_code)]

use rekor_merkle::LogHasher;

pub struct ReferenceTree<'h, H: LogHasher> {
    hasher: &'h H,
    leaves: Vec<H::Hash>,
}

impl<'h, H: LogHasher> ReferenceTree<'h, H> {
    /// Tree of `size` leaves with data `"leaf 0"`, `"leaf 1"`, ...
    pub fn new(hasher: &'h H, size: u64) -> Self {
        let leaves = (0..size)
            .map(|i| hasher.hash_leaf(format!("leaf {}", i).as_bytes()))
            .collect();
        Self { hasher, leaves }
    }

    pub fn leaf(&self, index: u64) -> H::Hash {
        self.leaves[index as usize]
    }

    /// MTH of the first `size` leaves
    pub fn root(&self, size: u64) -> H::Hash {
        self.mth(&self.leaves[..size as usize])
    }

    /// PATH(index, D[size])
    pub fn inclusion_proof(&self, index: u64, size: u64) -> Vec<H::Hash> {
        self.path(index as usize, &self.leaves[..size as usize])
    }

    /// PROOF(first, D[last])
    pub fn consistency_proof(&self, first: u64, last: u64) -> Vec<H::Hash> {
        if first == 0 {
            return Vec::new();
        }
        self.subproof(first as usize, &self.leaves[..last as usize], true)
    }

    fn mth(&self, leaves: &[H::Hash]) -> H::Hash {
        if leaves.len() == 1 {
            return leaves[0];
        }
        let k = split_point(leaves.len());
        let left = self.mth(&leaves[..k]);
        let right = self.mth(&leaves[k..]);
        self.hasher.hash_children(&left, &right)
    }

    fn path(&self, m: usize, leaves: &[H::Hash]) -> Vec<H::Hash> {
        if leaves.len() == 1 {
            return Vec::new();
        }
        let k = split_point(leaves.len());
        if m < k {
            let mut proof = self.path(m, &leaves[..k]);
            proof.push(self.mth(&leaves[k..]));
            proof
        } else {
            let mut proof = self.path(m - k, &leaves[k..]);
            proof.push(self.mth(&leaves[..k]));
            proof
        }
    }

    fn subproof(&self, m: usize, leaves: &[H::Hash], complete: bool) -> Vec<H::Hash> {
        let n = leaves.len();
        if m == n {
            return if complete {
                Vec::new()
            } else {
                vec![self.mth(leaves)]
            };
        }
        let k = split_point(n);
        if m <= k {
            let mut proof = self.subproof(m, &leaves[..k], complete);
            proof.push(self.mth(&leaves[k..]));
            proof
        } else {
            let mut proof = self.subproof(m - k, &leaves[k..], false);
            proof.push(self.mth(&leaves[..k]));
            proof
        }
    }
}

/// Largest power of two strictly less than `n`
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k * 2 < n {
        k *= 2;
    }
    k
}
