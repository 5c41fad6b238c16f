//! MiMC Feistel sponge over BN254.
//!
//! A 220-round Feistel network with the x^5 round function, run in sponge
//! mode: each absorbed element is added to the left half, then the whole
//! state is passed through the network. Round constants are derived by
//! iterating keccak256 from the ASCII seed `"mimcsponge"` and reducing each
//! digest modulo p; the first and last constants are pinned to zero.
//!
//! The construction predates the Poseidon hash in this codebase and is kept
//! because deployed trees were built with it; [`crate::merkle::MerkleTree`]
//! uses it as the default node combiner.

use sha3::{Digest, Keccak256};

use crate::fr::Fr;

/// Feistel rounds per permutation call.
pub const ROUNDS: usize = 220;

/// Seed of the keccak256 constant chain.
const SEED: &[u8] = b"mimcsponge";

/// The MiMC sponge with its derived round-constant table.
pub struct MimcSponge {
    cts: Vec<Fr>,
}

impl MimcSponge {
    /// Derive the round constants and build a sponge instance.
    pub fn new() -> Self {
        let mut cts = Vec::with_capacity(ROUNDS);
        cts.push(Fr::zero());

        let mut digest: [u8; 32] = Keccak256::digest(SEED).into();
        for _ in 1..ROUNDS {
            digest = Keccak256::digest(digest).into();
            cts.push(Fr::from_bytes_be(&digest));
        }
        cts[ROUNDS - 1] = Fr::zero();

        Self { cts }
    }

    /// One pass of the Feistel network over the `(left, right)` state.
    ///
    /// All rounds but the last swap the halves; the last round only updates
    /// the right half, which keeps the network its own inverse under key
    /// reversal.
    pub fn feistel(&self, left: &Fr, right: &Fr, key: &Fr) -> (Fr, Fr) {
        let mut xl = left.clone();
        let mut xr = right.clone();

        for (i, c) in self.cts.iter().enumerate() {
            let mut t = xl.add(key);
            if i > 0 {
                t += c;
            }
            let t5 = t.pow5();

            if i < ROUNDS - 1 {
                let next_l = xr.add(&t5);
                xr = xl;
                xl = next_l;
            } else {
                xr = xr.add(&t5);
            }
        }

        (xl, xr)
    }

    /// Absorb a sequence of elements and squeeze one, the sponge hash.
    pub fn multi_hash(&self, inputs: &[Fr], key: &Fr) -> Fr {
        let mut left = Fr::zero();
        let mut right = Fr::zero();

        for input in inputs {
            left += input;
            let (l, r) = self.feistel(&left, &right, key);
            left = l;
            right = r;
        }

        left
    }

    /// Two-to-one compression with a zero key, the Merkle node combiner.
    #[inline]
    pub fn hash2(&self, left: &Fr, right: &Fr) -> Fr {
        self.multi_hash(&[left.clone(), right.clone()], &Fr::zero())
    }
}

impl Default for MimcSponge {
    fn default() -> Self {
        Self::new()
    }
}
