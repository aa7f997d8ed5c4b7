//! Merkle proof verification
//!
//! Inclusion proofs are checked by walking the audit path from the leaf up to
//! the root. Consistency proofs follow the algorithm of
//! https://github.com/transparency-dev/merkle, which rebuilds the old and the
//! new root from a shared seed.

use crate::error::{Error, Result, Root};
use crate::hasher::{bit_length, LogHasher};

/// Number of audit-path hashes for leaf `index` in a tree of `size` leaves
///
/// Leaves on the right edge of a tree whose size is not a power of two are
/// promoted past some levels, so their paths are shorter. Returns `None` when
/// `index` does not lie inside the tree.
pub fn inclusion_proof_size(index: u64, size: u64) -> Option<usize> {
    if index >= size {
        return None;
    }
    let (inner, border) = decompose_inclusion_proof(index, size);
    Some(inner + border)
}

/// Number of hashes in a consistency proof from `first_size` to `last_size`
///
/// Returns `None` for size pairs that never have a valid proof.
pub fn consistency_proof_size(first_size: u64, last_size: u64) -> Option<usize> {
    if first_size > last_size {
        return None;
    }
    if first_size == 0 || first_size == last_size {
        return Some(0);
    }

    let shift = first_size.trailing_zeros() as usize;
    let (inner, border) = decompose_inclusion_proof(first_size - 1, last_size);
    let start = usize::from(!first_size.is_power_of_two());
    Some(start + inner - shift + border)
}

/// Recompute the root implied by an inclusion proof
///
/// The proof is checked for shape first: `index` must lie inside the tree
/// and `audit_path` must have exactly [`inclusion_proof_size`] entries.
pub fn root_from_inclusion_proof<H: LogHasher>(
    hasher: &H,
    leaf_hash: &H::Hash,
    index: u64,
    tree_size: u64,
    audit_path: &[H::Hash],
) -> Result<H::Hash> {
    if tree_size == 0 {
        return Err(Error::InvalidIndex("tree size is zero".to_string()));
    }

    let expected = inclusion_proof_size(index, tree_size).ok_or_else(|| {
        Error::InvalidIndex(format!("leaf index {} >= tree size {}", index, tree_size))
    })?;
    if audit_path.len() != expected {
        return Err(Error::MalformedProof(format!(
            "expected {} proof hashes for leaf {} in tree of size {}, got {}",
            expected,
            index,
            tree_size,
            audit_path.len()
        )));
    }

    let mut hash = *leaf_hash;
    let mut index = index;
    let mut last_node = tree_size - 1;
    let mut siblings = audit_path.iter();

    while last_node > 0 {
        if index % 2 == 1 {
            let sibling = siblings.next().ok_or_else(short_path)?;
            hash = hasher.hash_children(sibling, &hash);
        } else if index < last_node {
            let sibling = siblings.next().ok_or_else(short_path)?;
            hash = hasher.hash_children(&hash, sibling);
        }
        // else: rightmost node of an odd level, promoted as is
        index >>= 1;
        last_node >>= 1;
    }

    Ok(hash)
}

/// Verify that `leaf_hash` sits at `index` in the tree with root `root`
pub fn verify_inclusion<H: LogHasher>(
    hasher: &H,
    leaf_hash: &H::Hash,
    index: u64,
    tree_size: u64,
    audit_path: &[H::Hash],
    root: &H::Hash,
) -> Result<()> {
    let computed = root_from_inclusion_proof(hasher, leaf_hash, index, tree_size, audit_path)?;
    tracing::debug!(
        index,
        tree_size,
        computed = %hex::encode(computed.as_ref()),
        "recomputed inclusion root"
    );
    check_root(Root::Inclusion, root, &computed)
}

/// Verify that the tree of `first_size` leaves with root `old_root` is a
/// prefix of the tree of `last_size` leaves with root `new_root`
pub fn verify_consistency<H: LogHasher>(
    hasher: &H,
    first_size: u64,
    last_size: u64,
    proof: &[H::Hash],
    old_root: &H::Hash,
    new_root: &H::Hash,
) -> Result<()> {
    if first_size > last_size {
        return Err(Error::MalformedProof(format!(
            "first size {} > last size {}",
            first_size, last_size
        )));
    }

    if first_size == last_size {
        if !proof.is_empty() {
            return Err(Error::MalformedProof(
                "proof must be empty for equal tree sizes".to_string(),
            ));
        }
        return check_root(Root::New, old_root, new_root);
    }

    // The empty tree is a prefix of every tree
    if first_size == 0 {
        if !proof.is_empty() {
            return Err(Error::MalformedProof(
                "proof must be empty when the first tree is empty".to_string(),
            ));
        }
        return Ok(());
    }

    if proof.is_empty() {
        return Err(Error::MalformedProof(
            "empty proof for different tree sizes".to_string(),
        ));
    }

    let shift = first_size.trailing_zeros() as usize;
    let (inner, border) = decompose_inclusion_proof(first_size - 1, last_size);
    let inner = inner - shift;

    // A power-of-two first tree is itself a complete subtree of the last
    // one, so its root seeds the chain and is not repeated in the proof.
    let (seed, start) = if first_size.is_power_of_two() {
        (old_root, 0)
    } else {
        (&proof[0], 1)
    };

    let expected = start + inner + border;
    if proof.len() != expected {
        return Err(Error::MalformedProof(format!(
            "expected {} proof hashes for sizes {} -> {}, got {}",
            expected,
            first_size,
            last_size,
            proof.len()
        )));
    }

    let path = &proof[start..];
    let mask = (first_size - 1) >> shift;

    let old = chain_inner_right(hasher, seed, &path[..inner], mask);
    let old = chain_border_right(hasher, &old, &path[inner..]);
    check_root(Root::Old, old_root, &old)?;

    let new = chain_inner(hasher, seed, &path[..inner], mask);
    let new = chain_border_right(hasher, &new, &path[inner..]);
    tracing::debug!(
        first_size,
        last_size,
        computed = %hex::encode(new.as_ref()),
        "recomputed consistency roots"
    );
    check_root(Root::New, new_root, &new)
}

fn check_root<T: AsRef<[u8]> + Eq>(root: Root, expected: &T, actual: &T) -> Result<()> {
    if expected != actual {
        return Err(Error::RootMismatch {
            root,
            expected: hex::encode(expected.as_ref()),
            actual: hex::encode(actual.as_ref()),
        });
    }
    Ok(())
}

fn short_path() -> Error {
    Error::MalformedProof("audit path ended early".to_string())
}

/// Split the audit path of `index` into (inner, border) lengths
///
/// Inner levels are those below the point where the paths to `index` and to
/// the last leaf diverge; border levels are above it, where only the left
/// siblings of the right border contribute a hash.
fn decompose_inclusion_proof(index: u64, size: u64) -> (usize, usize) {
    let inner = inner_proof_size(index, size);
    let border = index.checked_shr(inner as u32).unwrap_or(0).count_ones() as usize;
    (inner, border)
}

fn inner_proof_size(index: u64, size: u64) -> usize {
    bit_length(index ^ (size - 1)) as usize
}

/// Chain the inner path, placing each hash by the bits of `index`
fn chain_inner<H: LogHasher>(hasher: &H, seed: &H::Hash, proof: &[H::Hash], index: u64) -> H::Hash {
    let mut hash = *seed;
    for (i, p) in proof.iter().enumerate() {
        if (index >> i) & 1 == 0 {
            hash = hasher.hash_children(&hash, p);
        } else {
            hash = hasher.hash_children(p, &hash);
        }
    }
    hash
}

/// Chain only the left siblings of the inner path
fn chain_inner_right<H: LogHasher>(
    hasher: &H,
    seed: &H::Hash,
    proof: &[H::Hash],
    index: u64,
) -> H::Hash {
    let mut hash = *seed;
    for (i, p) in proof.iter().enumerate() {
        if (index >> i) & 1 == 1 {
            hash = hasher.hash_children(p, &hash);
        }
    }
    hash
}

fn chain_border_right<H: LogHasher>(hasher: &H, seed: &H::Hash, proof: &[H::Hash]) -> H::Hash {
    let mut hash = *seed;
    for p in proof {
        hash = hasher.hash_children(p, &hash);
    }
    hash
}
