//! native blake2s prfs
//!
//! each prf hashes one 512-bit block `x || y`. the first bits of `x` are a
//! tag, the rest a truncated secret:
//!
//! | prf      | x                              | y     |
//! |----------|--------------------------------|-------|
//! | addr     | `1100 ‖ a_sk[..252]`           | 0^256 |
//! | nf       | `1110 ‖ a_sk[..252]`           | rho   |
//! | pk (h_i) | `0 ‖ i ‖ 00 ‖ a_sk[..253 - w]` | h_sig |
//! | rho      | `0 ‖ i ‖ 10 ‖ phi[..253 - w]`  | h_sig |
//!
//! `i` is written msb first on `w = index_bits(max(N, M))` bits.

use blake2::{Blake2s256, Digest};

use crate::error::{Error, Result};
use crate::params::DIGEST_BITS;
use crate::types::Bits256;

/// tag and truncated secret, `DIGEST_BITS` long
pub(crate) fn tagged<T: Copy>(tag: &[T], secret: &[T]) -> Vec<T> {
    let mut x = Vec::with_capacity(DIGEST_BITS);
    x.extend_from_slice(tag);
    x.extend_from_slice(&secret[..DIGEST_BITS - tag.len()]);
    x
}

pub(crate) const ADDR_TAG: [bool; 4] = [true, true, false, false];
pub(crate) const NF_TAG: [bool; 4] = [true, true, true, false];

/// `0 ‖ index ‖ suffix`, index msb first on `index_bits` bits
pub(crate) fn indexed_tag(index: usize, index_bits: usize, suffix: [bool; 2]) -> Result<Vec<bool>> {
    if index_bits == 0 || index_bits > DIGEST_BITS - 3 || index >> index_bits != 0 {
        return Err(Error::ValueOutOfRange(format!(
            "note index {index} does not fit in {index_bits} bits"
        )));
    }
    let mut tag = vec![false];
    tag.extend((0..index_bits).rev().map(|b| (index >> b) & 1 == 1));
    tag.extend_from_slice(&suffix);
    Ok(tag)
}

pub(crate) const PK_SUFFIX: [bool; 2] = [false, false];
pub(crate) const RHO_SUFFIX: [bool; 2] = [true, false];

fn hash_block(x: &[bool], y: &Bits256) -> Bits256 {
    let mut x_bytes = [0u8; 32];
    for (i, _) in x.iter().enumerate().filter(|(_, bit)| **bit) {
        x_bytes[i / 8] |= 0x80 >> (i % 8);
    }
    let mut hasher = Blake2s256::new();
    hasher.update(x_bytes);
    hasher.update(y.as_bytes());
    Bits256::from(<[u8; 32]>::from(hasher.finalize()))
}

/// address key a_pk of a spending key
pub fn addr(a_sk: &Bits256) -> Bits256 {
    hash_block(&tagged(&ADDR_TAG, &a_sk.to_bits()), &Bits256::ZERO)
}

/// nullifier of a note with nullifier seed `rho`
pub fn nf(a_sk: &Bits256, rho: &Bits256) -> Bits256 {
    hash_block(&tagged(&NF_TAG, &a_sk.to_bits()), rho)
}

/// authentication tag h_i binding input `index` to h_sig
pub fn pk(a_sk: &Bits256, h_sig: &Bits256, index: usize, index_bits: usize) -> Result<Bits256> {
    let tag = indexed_tag(index, index_bits, PK_SUFFIX)?;
    Ok(hash_block(&tagged(&tag, &a_sk.to_bits()), h_sig))
}

/// nullifier seed of output `index`
pub fn rho(phi: &Bits256, h_sig: &Bits256, index: usize, index_bits: usize) -> Result<Bits256> {
    let tag = indexed_tag(index, index_bits, RHO_SUFFIX)?;
    Ok(hash_block(&tagged(&tag, &phi.to_bits()), h_sig))
}
