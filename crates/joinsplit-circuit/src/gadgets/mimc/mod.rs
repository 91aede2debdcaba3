//! mimc gadgets over the circuit field
//!
//! - round: `msg' = (msg + key + c)^e` by square-and-multiply
//! - permutation: `rounds` rounds, key added to the last result
//! - mp: miyaguchi-preneel compression `H(x, y) = E_y(x) + x + y`, the merkle
//!   tree hash
//! - input hasher: merkle-damgard over mp, binding a list of field elements
//!
//! the additions after the last round ride in the C term of the last round's
//! final constraint, so they cost nothing.

pub mod constants;
pub mod input_hasher;
pub mod mp;
pub mod permutation;
pub mod round;

pub use constants::{round_constants, MAX_ROUNDS};
pub use input_hasher::MimcInputHasher;
pub use mp::MimcMp;
pub use permutation::MimcPermutation;
pub use round::MimcRound;

/// exponent and round count of a mimc instance
pub trait MimcParams: Clone + Copy + std::fmt::Debug + Default + Send + Sync + 'static {
    /// odd, with gcd(e, p - 1) = 1 in the circuit field
    const EXPONENT: u64;
    const ROUNDS: usize;
}

/// exponent 7, 91 rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MimcE7R91;

impl MimcParams for MimcE7R91 {
    const EXPONENT: u64 = 7;
    const ROUNDS: usize = 91;
}

/// exponent 17, 65 rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MimcE17R65;

impl MimcParams for MimcE17R65 {
    const EXPONENT: u64 = 17;
    const ROUNDS: usize = 65;
}

/// constraints per round: bitlen(e) + hamming_weight(e) - 2
pub const fn constraints_per_round(exponent: u64) -> usize {
    let bitlen = (u64::BITS - exponent.leading_zeros()) as usize;
    bitlen + exponent.count_ones() as usize - 2
}
