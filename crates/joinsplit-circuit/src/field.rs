//! conversions between bit strings, byte strings and field elements
//!
//! bit strings are big-endian throughout: index 0 is the most significant bit.

use ff::{PrimeField, PrimeFieldBits};

use crate::error::{Error, Result};

/// number of bits a field element can hold without wrapping
pub fn capacity<F: PrimeField>() -> usize {
    F::CAPACITY as usize
}

/// pack big-endian bits into a field element, reducing mod p
pub fn pack_bits<F: PrimeField>(bits: &[bool]) -> F {
    bits.iter().fold(F::ZERO, |acc, &bit| {
        let acc = acc.double();
        if bit {
            acc + F::ONE
        } else {
            acc
        }
    })
}

/// big-endian integer mod p
pub fn from_be_bytes_mod<F: PrimeField>(bytes: &[u8]) -> F {
    let base = F::from(256);
    bytes
        .iter()
        .fold(F::ZERO, |acc, &b| acc * base + F::from(u64::from(b)))
}

/// the low `n` bits of `value`, big-endian. fails if `value >= 2^n`
pub fn unpack_bits<F: PrimeFieldBits>(value: &F, n: usize) -> Result<Vec<bool>> {
    let le = value.to_le_bits();
    if le.iter().skip(n).any(|b| *b) {
        return Err(Error::ValueOutOfRange(format!(
            "field element does not fit in {n} bits"
        )));
    }
    let mut bits: Vec<bool> = le.iter().take(n).map(|b| *b).collect();
    bits.resize(n, false);
    bits.reverse();
    Ok(bits)
}

/// 64 big-endian bits of `value`
pub fn u64_to_bits(value: u64) -> Vec<bool> {
    (0..64).rev().map(|i| (value >> i) & 1 == 1).collect()
}

pub fn bits_to_u64(bits: &[bool]) -> u64 {
    bits.iter().fold(0u64, |acc, &b| (acc << 1) | u64::from(b))
}

/// big-endian bits of a byte string, most significant bit of byte 0 first
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// inverse of `bytes_to_bits`, `bits.len()` must be a multiple of 8
pub fn bits_to_bytes(bits: &[bool]) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(Error::shape("byte-aligned bit string", bits.len().next_multiple_of(8), bits.len()));
    }
    Ok(bits
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | u8::from(b)))
        .collect())
}
