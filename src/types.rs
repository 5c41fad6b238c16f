//! Common error types for the Cyclone cryptographic core.
//!
//! Every failure here is an argument or configuration error surfaced
//! synchronously to the caller; nothing is transient, so there is no
//! retry policy anywhere in the crate.

/// Errors produced by the cryptographic core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The permutation was invoked with a state width that has no entry in
    /// the round-constant / mixing-matrix tables. Indicates a configuration
    /// or version mismatch, not bad data.
    UnsupportedWidth(usize),
    /// More leaves were supplied than the declared tree depth can hold.
    CapacityExceeded {
        /// Number of leaves supplied
        leaves: usize,
        /// Maximum for the requested depth
        capacity: usize,
    },
    /// A Merkle path was requested for a leaf value absent from the tree.
    LeafNotFound,
    /// Modular inverse of zero.
    DivisionByZero,
    /// A ciphertext's length does not frame the claimed plaintext length.
    CiphertextLength {
        /// Length implied by the plaintext length argument
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
}

impl core::fmt::Display for CoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedWidth(t) => {
                write!(f, "unsupported permutation width {} (supported: 2..=9)", t)
            }
            Self::CapacityExceeded { leaves, capacity } => {
                write!(f, "tree is full: {} leaves exceed capacity {}", leaves, capacity)
            }
            Self::LeafNotFound => write!(f, "leaf value is not present in the tree"),
            Self::DivisionByZero => write!(f, "division by zero in the field"),
            Self::CiphertextLength { expected, actual } => {
                write!(f, "ciphertext length {} does not match expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for CoreError {}
