//! native note commitment

use blake2::{Blake2s256, Digest};
use ff::PrimeField;

use crate::types::{Bits256, Note};

/// blake2s(r ‖ a_pk ‖ rho ‖ value_be64)
pub fn note_commitment_digest(note: &Note) -> Bits256 {
    Bits256::from(<[u8; 32]>::from(Blake2s256::digest(note.commitment_preimage())))
}

/// the commitment digest as a big-endian integer mod p, the tree leaf
pub fn note_commitment<F: PrimeField>(note: &Note) -> F {
    note_commitment_digest(note).to_field()
}
