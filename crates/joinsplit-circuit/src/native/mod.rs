//! out-of-circuit reference implementations
//!
//! every gadget in this crate has a native twin here computing the same
//! function on plain values. tests pin gadgets against them and callers use
//! them to build witnesses (a_pk, nullifiers, commitments, merkle paths).

pub mod commitment;
pub mod merkle;
pub mod mimc;
pub mod prf;

pub use commitment::{note_commitment, note_commitment_digest};
pub use merkle::{compute_root, MerkleTree};
