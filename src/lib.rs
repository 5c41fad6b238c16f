//! Cyclone Core - BN254 field-level cryptographic primitives
//!
//! This crate provides the field arithmetic, permutation and hash/cipher
//! constructions shared by the Cyclone privacy protocol and its external
//! circuit evaluator. Every output is bit-compatible with the circuit side:
//! the same inputs must hash, encrypt and accumulate to identical field
//! elements on both.
//!
//! # Components
//!
//! - `fr` - BN254 scalar-field arithmetic on canonical representatives
//! - `params` - embedded Poseidon round-constant and mixing-matrix tables
//! - `poseidon` - the permutation and the fixed-arity hash built on it
//! - `cipher` - keyed, nonce-based duplex cipher with an integrity check
//! - `mimc` - MiMC Feistel sponge (legacy tree combiner)
//! - `merkle` - zero-padded Merkle accumulator with inclusion proofs
//! - `types` - common error type

pub mod fr;
pub mod params;
pub mod poseidon;
pub mod cipher;
pub mod mimc;
pub mod merkle;
pub mod types;

// Re-exports for convenience
pub use fr::{Fr, MODULUS, MODULUS_DEC};
pub use merkle::{MerklePath, MerkleTree, PairHasher, PoseidonHasher, ZERO_VALUE};
pub use mimc::MimcSponge;
pub use poseidon::{hash, hash2, permute};
pub use types::CoreError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cipher::{decrypt, encrypt, verify};
    pub use crate::fr::Fr;
    pub use crate::merkle::{MerklePath, MerkleTree, PairHasher, PoseidonHasher};
    pub use crate::mimc::MimcSponge;
    pub use crate::poseidon::{hash, hash2, permute};
    pub use crate::types::CoreError;
}
