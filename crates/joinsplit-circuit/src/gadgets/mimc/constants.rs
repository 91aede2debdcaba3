//! mimc round constants
//!
//! c_0 = 0. the chain starts at keccak256("clearmatics_mt_seed"), read as a
//! big-endian integer, and every later constant hashes the 32 big-endian
//! bytes of the previous unreduced one. the seed itself is not used.

use ff::PrimeField;
use sha3::{Digest, Keccak256};

use crate::field;

/// the constant chain is fixed for this many rounds
pub const MAX_ROUNDS: usize = 91;

pub const ROUND_CONSTANT_SEED: &[u8] = b"clearmatics_mt_seed";

/// first `rounds` constants, reduced into the field
pub fn round_constants<F: PrimeField>(rounds: usize) -> Vec<F> {
    let mut constants = Vec::with_capacity(rounds);
    if rounds == 0 {
        return constants;
    }
    constants.push(F::ZERO);

    let mut state: [u8; 32] = Keccak256::digest(ROUND_CONSTANT_SEED).into();
    for _ in 1..rounds {
        state = Keccak256::digest(state).into();
        constants.push(field::from_be_bytes_mod(&state));
    }
    constants
}
