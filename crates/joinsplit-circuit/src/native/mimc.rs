//! native mimc

use ff::PrimeField;

use crate::gadgets::mimc::constants::round_constants;
use crate::gadgets::mimc::input_hasher::input_hasher_iv;
use crate::gadgets::mimc::MimcParams;

/// E_key(msg): `ROUNDS` rounds of `msg = (msg + key + c)^e`, then `+ key`
pub fn encrypt<F: PrimeField, P: MimcParams>(msg: F, key: F) -> F {
    let exponent = [P::EXPONENT];
    round_constants::<F>(P::ROUNDS)
        .into_iter()
        .fold(msg, |acc, c| (acc + key + c).pow_vartime(exponent))
        + key
}

/// miyaguchi-preneel, `x` left and `y` right node
pub fn mp<F: PrimeField, P: MimcParams>(x: F, y: F) -> F {
    encrypt::<F, P>(x, y) + x + y
}

/// merkle-damgard over `mp`, closed by the input length
pub fn input_hash<F: PrimeField, P: MimcParams>(values: &[F]) -> F {
    let cur = values
        .iter()
        .fold(input_hasher_iv::<F>(), |cur, m| mp::<F, P>(cur, *m));
    mp::<F, P>(cur, F::from(values.len() as u64))
}
