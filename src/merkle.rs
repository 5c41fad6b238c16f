//! Incremental Merkle accumulator with inclusion proofs.
//!
//! The tree is binary, zero-padded and conceptually complete: any missing
//! right sibling is substituted with the precomputed default for its level
//! (`zero[0]` is a fixed domain-separated constant, `zero[i] =
//! hash(zero[i-1], zero[i-1])`). A tree is built once from an ordered leaf
//! sequence and is read-only afterwards; root and paths are pure functions
//! of that sequence.
//!
//! The node combiner is pluggable through [`PairHasher`]. The default is
//! the MiMC sponge, which is what deployed trees and their circuit
//! counterparts were built with; [`PoseidonHasher`] produces the same tree
//! shape over the Poseidon two-to-one hash.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::fr::Fr;
use crate::mimc::MimcSponge;
use crate::poseidon;
use crate::types::CoreError;

/// Level-zero default leaf: a fixed keccak256 digest of the protocol's
/// domain tag, reduced mod p. Deployed trees depend on this exact value.
pub static ZERO_VALUE: Lazy<Fr> = Lazy::new(|| {
    Fr::from_dec_str(
        "21663839004416932945382355908790599225266501822907911457504978515578255421292",
    )
    .expect("zero-value literal parses")
});

/// Two-to-one node combiner for Merkle trees.
pub trait PairHasher {
    fn hash_pair(&self, left: &Fr, right: &Fr) -> Fr;
}

impl PairHasher for MimcSponge {
    #[inline]
    fn hash_pair(&self, left: &Fr, right: &Fr) -> Fr {
        self.hash2(left, right)
    }
}

/// Node combiner over the Poseidon two-to-one hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct PoseidonHasher;

impl PairHasher for PoseidonHasher {
    #[inline]
    fn hash_pair(&self, left: &Fr, right: &Fr) -> Fr {
        poseidon::hash2(left, right)
    }
}

/// A fixed-depth zero-padded Merkle tree over field-element leaves.
pub struct MerkleTree<H: PairHasher> {
    hasher: H,
    levels: usize,
    /// `zeros[L]` is the root of an empty subtree of height `L`.
    zeros: Vec<Fr>,
    /// `layers[0]` holds the leaves; `layers[L]` the nodes at height `L`.
    layers: Vec<Vec<Fr>>,
}

/// An authentication path: sibling values bottom-up plus left/right
/// indicators (0 = the node is the left child at that level).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    pub elements: Vec<Fr>,
    pub indices: Vec<u8>,
}

impl MerkleTree<MimcSponge> {
    /// Build a tree with the default MiMC node combiner.
    pub fn new(leaves: &[Fr], levels: usize) -> Result<Self, CoreError> {
        Self::with_hasher(leaves, levels, MimcSponge::new())
    }
}

impl<H: PairHasher> MerkleTree<H> {
    /// Build a tree of the given depth over an ordered leaf sequence.
    ///
    /// Fails with [`CoreError::CapacityExceeded`] when the leaves do not
    /// fit in `2^levels` slots.
    pub fn with_hasher(leaves: &[Fr], levels: usize, hasher: H) -> Result<Self, CoreError> {
        let capacity = 1usize
            .checked_shl(levels as u32)
            .unwrap_or(usize::MAX);
        if leaves.len() > capacity {
            return Err(CoreError::CapacityExceeded { leaves: leaves.len(), capacity });
        }

        let mut zeros = Vec::with_capacity(levels + 1);
        zeros.push(ZERO_VALUE.clone());
        for level in 1..=levels {
            let node = hasher.hash_pair(&zeros[level - 1], &zeros[level - 1]);
            zeros.push(node);
        }

        let mut layers = Vec::with_capacity(levels + 1);
        layers.push(leaves.to_vec());
        for level in 1..=levels {
            let below = &layers[level - 1];
            let mut nodes = Vec::with_capacity(below.len().div_ceil(2));
            for pair in below.chunks(2) {
                let right = pair.get(1).unwrap_or(&zeros[level - 1]);
                nodes.push(hasher.hash_pair(&pair[0], right));
            }
            layers.push(nodes);
        }

        debug!(leaves = leaves.len(), levels, "built merkle tree");
        Ok(Self { hasher, levels, zeros, layers })
    }

    /// Tree depth.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of leaves.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// The tree root; for an empty tree this is the default root
    /// `zeros[levels]`.
    pub fn root(&self) -> Fr {
        self.layers[self.levels]
            .first()
            .cloned()
            .unwrap_or_else(|| self.zeros[self.levels].clone())
    }

    /// Authentication path for the first leaf equal to `leaf`.
    ///
    /// Fails with [`CoreError::LeafNotFound`] when no leaf matches.
    /// Duplicate leaf values resolve to the lowest index; callers that
    /// need a specific occurrence must keep leaves distinct.
    pub fn path(&self, leaf: &Fr) -> Result<MerklePath, CoreError> {
        let mut index = self.layers[0]
            .iter()
            .position(|l| l == leaf)
            .ok_or(CoreError::LeafNotFound)?;

        let mut elements = Vec::with_capacity(self.levels);
        let mut indices = Vec::with_capacity(self.levels);
        for level in 0..self.levels {
            let sibling_index = index ^ 1;
            let sibling = self.layers[level]
                .get(sibling_index)
                .unwrap_or(&self.zeros[level]);
            elements.push(sibling.clone());
            indices.push((index % 2) as u8);
            index >>= 1;
        }

        Ok(MerklePath { elements, indices })
    }

    /// Replay a path from a leaf to the root it implies.
    pub fn compute_root(&self, leaf: &Fr, path: &MerklePath) -> Fr {
        let mut node = leaf.clone();
        for (sibling, bit) in path.elements.iter().zip(&path.indices) {
            node = if *bit == 0 {
                self.hasher.hash_pair(&node, sibling)
            } else {
                self.hasher.hash_pair(sibling, &node)
            };
        }
        node
    }

    /// Check that a path proves `leaf` under this tree's root.
    pub fn verify(&self, leaf: &Fr, path: &MerklePath) -> bool {
        path.elements.len() == self.levels && self.compute_root(leaf, path) == self.root()
    }
}
