//! circuit gadgets
//!
//! a gadget is built in three steps, always in this order:
//! 1. its constructor allocates every wire it owns (and those of its
//!    sub-gadgets), failing on malformed shapes before any constraint exists
//! 2. `generate_constraints` emits its constraints
//! 3. `generate_witness` assigns its wires, reading input wires that the
//!    caller has already assigned
//!
//! parents visit children in the same order in both passes, so a constraint
//! system built once per shape can be re-assigned for every transaction.

use ff::PrimeField;

use crate::constraint::ConstraintSystem;
use crate::error::Result;

pub mod binary;
pub mod blake2s;
pub mod boolean;
pub mod commitment;
pub mod merkle;
pub mod mimc;
pub mod note;
pub mod packing;
pub mod prf;

pub use binary::{Add32, Xor32};
pub use blake2s::Blake2s;
pub use boolean::{AllocatedBit, Bit, BooleanBits, Word32};
pub use commitment::NoteCommitment;
pub use merkle::{MerkleAuthenticator, MerklePath, MerkleSelector};
pub use mimc::{MimcE17R65, MimcE7R91, MimcInputHasher, MimcMp, MimcParams, MimcPermutation};
pub use note::{InputNoteGadget, InputNoteWitness, NoteGadget, OutputNoteGadget};
pub use packing::Packing;
pub use prf::Prf;

/// two-pass circuit component
pub trait Gadget<F: PrimeField> {
    /// values the caller supplies for the wires this gadget owns.
    /// `()` when everything is derived from already-assigned inputs
    type Witness: ?Sized;

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>);

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, witness: &Self::Witness) -> Result<()>;
}
