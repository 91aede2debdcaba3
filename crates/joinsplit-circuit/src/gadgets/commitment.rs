//! note commitment `cm = blake2s(r ‖ a_pk ‖ rho ‖ value_be64) mod p`
//!
//! 104 bytes, two compressions. the digest is packed big-endian into a
//! single field element with one linear constraint.

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, Variable};
use crate::error::{Error, Result};
use crate::gadgets::blake2s::Blake2s;
use crate::gadgets::boolean::Bit;
use crate::gadgets::packing::Packing;
use crate::gadgets::Gadget;
use crate::params::{DIGEST_BITS, VALUE_BITS};

#[derive(Debug, Clone)]
pub struct NoteCommitment {
    hash: Blake2s,
    packing: Packing,
}

impl NoteCommitment {
    /// `result` receives the packed commitment and is assigned by this gadget
    pub fn new<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        r: &[Bit],
        a_pk: &[Bit],
        rho: &[Bit],
        value: &[Bit],
        result: Variable,
    ) -> Result<Self> {
        for (what, bits, expected) in [
            ("commitment r", r, DIGEST_BITS),
            ("commitment a_pk", a_pk, DIGEST_BITS),
            ("commitment rho", rho, DIGEST_BITS),
            ("commitment value", value, VALUE_BITS),
        ] {
            if bits.len() != expected {
                return Err(Error::shape(what, expected, bits.len()));
            }
        }

        let input: Vec<Bit> = [r, a_pk, rho, value].concat();
        let hash = Blake2s::new(cs, &input)?;
        let packing = Packing::new(hash.digest().to_vec(), result);
        Ok(Self { hash, packing })
    }

    pub fn digest(&self) -> &[Bit] {
        self.hash.digest()
    }

    pub fn result(&self) -> Variable {
        self.packing.packed()
    }
}

impl<F: PrimeField> Gadget<F> for NoteCommitment {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("note_commitment", |cs| {
            self.hash.generate_constraints(cs);
            self.packing.generate_constraints(cs);
        });
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        self.hash.generate_witness(cs, &())?;
        self.packing.generate_witness(cs, &())
    }
}
