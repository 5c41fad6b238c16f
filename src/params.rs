//! Poseidon parameter tables for BN254.
//!
//! Round constants and mixing matrices are consumed verbatim from an
//! embedded data file (`poseidon_bn254.json`), one entry per supported
//! state width t = 2..=9. The values were produced by the Grain-LFSR
//! reference pipeline (`generate_parameters_grain.sage 1 0 254 t 8 R_P p`)
//! and must never be derived or altered here: any deviation breaks
//! compatibility with external circuit evaluation.
//!
//! The tables are parsed once on first use and are immutable for the rest
//! of the process.

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::debug;

use crate::fr::Fr;
use crate::types::CoreError;

/// Number of full rounds, identical for every width.
pub const FULL_ROUNDS: usize = 8;

/// Partial-round counts for widths 2..=9.
pub const PARTIAL_ROUNDS: [usize; 8] = [56, 57, 56, 60, 60, 63, 64, 63];

/// Smallest supported permutation width.
pub const MIN_WIDTH: usize = 2;

/// Largest supported permutation width.
pub const MAX_WIDTH: usize = 9;

/// Parameter set for one permutation width.
#[derive(Debug)]
pub struct WidthParams {
    /// `(FULL_ROUNDS + R_P) * t` constants, added row by row before each
    /// nonlinear layer.
    pub round_constants: Vec<Fr>,
    /// `t x t` mixing matrix, applied as `state'[i] = sum_j m[i][j] * state[j]`.
    pub matrix: Vec<Vec<Fr>>,
}

#[derive(Deserialize)]
struct RawTables {
    c: Vec<Vec<String>>,
    m: Vec<Vec<Vec<String>>>,
}

static TABLES: Lazy<Vec<WidthParams>> = Lazy::new(|| {
    let raw: RawTables = serde_json::from_str(include_str!("poseidon_bn254.json"))
        .expect("embedded parameter file is well-formed");
    assert_eq!(raw.c.len(), MAX_WIDTH - MIN_WIDTH + 1);
    assert_eq!(raw.m.len(), MAX_WIDTH - MIN_WIDTH + 1);

    let parse = |s: &String| Fr::from_dec_str(s).expect("parameter literal parses");

    let mut tables = Vec::with_capacity(raw.c.len());
    for (idx, (c, m)) in raw.c.iter().zip(raw.m.iter()).enumerate() {
        let t = MIN_WIDTH + idx;
        assert_eq!(c.len(), (FULL_ROUNDS + PARTIAL_ROUNDS[idx]) * t);
        assert_eq!(m.len(), t);

        let round_constants = c.iter().map(parse).collect();
        let matrix = m
            .iter()
            .map(|row| {
                assert_eq!(row.len(), t);
                row.iter().map(parse).collect()
            })
            .collect();

        tables.push(WidthParams { round_constants, matrix });
    }

    debug!(widths = tables.len(), "loaded poseidon parameter tables");
    tables
});

/// Look up the parameter set for a state width.
///
/// Fails with [`CoreError::UnsupportedWidth`] outside `2..=9`; that is a
/// configuration mismatch with the constant tables, not a data error.
pub fn for_width(t: usize) -> Result<&'static WidthParams, CoreError> {
    if !(MIN_WIDTH..=MAX_WIDTH).contains(&t) {
        return Err(CoreError::UnsupportedWidth(t));
    }
    Ok(&TABLES[t - MIN_WIDTH])
}

/// Partial-round count for a supported width.
#[inline]
pub fn partial_rounds(t: usize) -> usize {
    PARTIAL_ROUNDS[t - MIN_WIDTH]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_widths_load() {
        for t in MIN_WIDTH..=MAX_WIDTH {
            let params = for_width(t).unwrap();
            assert_eq!(
                params.round_constants.len(),
                (FULL_ROUNDS + partial_rounds(t)) * t
            );
            assert_eq!(params.matrix.len(), t);
            for row in &params.matrix {
                assert_eq!(row.len(), t);
            }
        }
    }

    #[test]
    fn test_unsupported_widths_rejected() {
        assert_eq!(for_width(0).unwrap_err(), CoreError::UnsupportedWidth(0));
        assert_eq!(for_width(1).unwrap_err(), CoreError::UnsupportedWidth(1));
        assert_eq!(for_width(10).unwrap_err(), CoreError::UnsupportedWidth(10));
    }

    #[test]
    fn test_first_round_constant_matches_reference() {
        // first t=3 constant of the circomlib-compatible table
        let params = for_width(3).unwrap();
        assert_eq!(
            params.round_constants[0],
            Fr::from_hex_str("0x0ee9a592ba9a9518d05986d656f40c2114c4993c11bb29938d21d47304cd8e6e")
                .unwrap()
        );
    }

    #[test]
    fn test_matrix_entry_matches_reference() {
        let params = for_width(3).unwrap();
        assert_eq!(
            params.matrix[0][0],
            Fr::from_hex_str("0x109b7f411ba0e4c9b2b70caf5c36a7b194be7c11ad24378bfedb68592ba8118b")
                .unwrap()
        );
    }
}
