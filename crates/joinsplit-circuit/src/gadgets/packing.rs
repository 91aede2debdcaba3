//! packing bit strings into field elements

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::Result;
use crate::gadgets::boolean::Bit;
use crate::gadgets::Gadget;

/// sum of bits[i] * 2^i
pub fn lc_le<F: PrimeField>(bits: &[Bit]) -> LinearCombination<F> {
    let mut coeff = F::ONE;
    let mut lc = LinearCombination::zero();
    for bit in bits {
        lc = lc + &bit.lc::<F>().scale(coeff);
        coeff = coeff.double();
    }
    lc
}

/// sum of bits[i] * 2^(n-1-i), bits[0] most significant
pub fn lc_be<F: PrimeField>(bits: &[Bit]) -> LinearCombination<F> {
    let mut coeff = F::ONE;
    let mut lc = LinearCombination::zero();
    for bit in bits.iter().rev() {
        lc = lc + &bit.lc::<F>().scale(coeff);
        coeff = coeff.double();
    }
    lc
}

/// constrains `packed` to the big-endian packing of `bits` (mod p)
#[derive(Debug, Clone)]
pub struct Packing {
    bits: Vec<Bit>,
    packed: Variable,
}

impl Packing {
    /// `packed` is owned by this gadget: its witness pass assigns it
    pub fn new(bits: Vec<Bit>, packed: Variable) -> Self {
        Self { bits, packed }
    }

    pub fn packed(&self) -> Variable {
        self.packed
    }
}

impl<F: PrimeField> Gadget<F> for Packing {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.enforce_equal(lc_be(&self.bits), self.packed.into());
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        let value = lc_be::<F>(&self.bits).evaluate(cs)?;
        cs.set(self.packed, value)
    }
}
