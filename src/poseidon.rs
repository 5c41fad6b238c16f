//! Poseidon permutation and fixed-arity hash over BN254.
//!
//! The permutation alternates 8 full rounds with a width-dependent number
//! of partial rounds (full / partial / full). Every round adds a row of
//! constants, applies the x^5 S-box (to the whole state in full rounds, to
//! slot 0 only in partial rounds), then mixes with the fixed matrix. The
//! S-box sits *before* the matrix multiply in every round, including
//! partial ones; external circuit evaluations of the same construction
//! depend on this exact ordering.

use crate::fr::Fr;
use crate::params;
use crate::types::CoreError;

/// Apply the full Poseidon permutation to a state of width `2..=9`.
///
/// The state is consumed and the permuted state returned; each call owns
/// its state, so concurrent calls need no synchronization.
pub fn permute(mut state: Vec<Fr>) -> Result<Vec<Fr>, CoreError> {
    let t = state.len();
    let tables = params::for_width(t)?;
    let r_p = params::partial_rounds(t);
    let half_full = params::FULL_ROUNDS / 2;

    for r in 0..params::FULL_ROUNDS + r_p {
        // constants first, then the nonlinear layer
        for (i, slot) in state.iter_mut().enumerate() {
            *slot += &tables.round_constants[r * t + i];
        }

        if r < half_full || r >= half_full + r_p {
            for slot in state.iter_mut() {
                *slot = slot.pow5();
            }
        } else {
            state[0] = state[0].pow5();
        }

        let mut mixed = vec![Fr::zero(); t];
        for (i, out) in mixed.iter_mut().enumerate() {
            for (j, slot) in state.iter().enumerate() {
                *out += &(&tables.matrix[i][j] * slot);
            }
        }
        state = mixed;
    }

    Ok(state)
}

/// Hash 1..=8 field elements to a single field element.
///
/// The initial state is `[0, inputs...]` (width `n + 1`, slot 0 being the
/// capacity); the output is slot 0 of the permuted state. Deterministic
/// and stateless.
pub fn hash(inputs: &[Fr]) -> Result<Fr, CoreError> {
    let t = inputs.len() + 1;
    if inputs.is_empty() || t > params::MAX_WIDTH {
        return Err(CoreError::UnsupportedWidth(t));
    }

    let mut state = Vec::with_capacity(t);
    state.push(Fr::zero());
    state.extend(inputs.iter().cloned());

    let mut permuted = permute(state)?;
    Ok(permuted.swap_remove(0))
}

/// Two-to-one compression, the Merkle node combiner.
pub fn hash2(left: &Fr, right: &Fr) -> Fr {
    // width 3 always has a table entry
    hash(&[left.clone(), right.clone()]).expect("width 3 is a supported width")
}
