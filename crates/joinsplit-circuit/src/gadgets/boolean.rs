//! known-boolean wires
//!
//! an `AllocatedBit` can only be minted inside this crate, by a gadget that
//! either emits its booleanity constraint or derives it from known-boolean
//! inputs. xor, rotation and 32-bit addition only take `Bit`s, so a wire
//! nobody constrained to {0, 1} cannot reach them.

use std::ops::Not;

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::{Error, Result};
use crate::gadgets::packing::lc_le;
use crate::gadgets::Gadget;

/// private wire known to carry 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocatedBit(Variable);

impl AllocatedBit {
    pub(crate) fn alloc<F: PrimeField>(cs: &mut ConstraintSystem<F>) -> Self {
        Self(cs.alloc_aux())
    }

    pub fn variable(&self) -> Variable {
        self.0
    }

    /// x * (1 - x) = 0
    pub(crate) fn enforce_boolean<F: PrimeField>(&self, cs: &mut ConstraintSystem<F>) {
        cs.enforce(
            self.0.into(),
            LinearCombination::from(Variable::One) - self.0,
            LinearCombination::zero(),
        );
    }

    pub(crate) fn assign<F: PrimeField>(&self, cs: &mut ConstraintSystem<F>, value: bool) -> Result<()> {
        cs.set(self.0, if value { F::ONE } else { F::ZERO })
    }

    pub fn value<F: PrimeField>(&self, cs: &ConstraintSystem<F>) -> Result<bool> {
        let v = cs.value(self.0)?;
        if v == F::ZERO {
            Ok(false)
        } else if v == F::ONE {
            Ok(true)
        } else {
            Err(Error::ValueOutOfRange(format!("non-boolean value on {:?}", self.0)))
        }
    }
}

/// boolean value on a circuit wire, possibly a compile-time constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Constant(bool),
    Is(AllocatedBit),
    /// negation of an allocated bit, costs nothing
    Not(AllocatedBit),
}

impl Not for Bit {
    type Output = Bit;

    fn not(self) -> Bit {
        match self {
            Bit::Constant(b) => Bit::Constant(!b),
            Bit::Is(x) => Bit::Not(x),
            Bit::Not(x) => Bit::Is(x),
        }
    }
}

impl From<AllocatedBit> for Bit {
    fn from(bit: AllocatedBit) -> Self {
        Bit::Is(bit)
    }
}

impl Bit {
    pub fn as_constant(&self) -> Option<bool> {
        match self {
            Bit::Constant(b) => Some(*b),
            _ => None,
        }
    }

    pub fn lc<F: PrimeField>(&self) -> LinearCombination<F> {
        match self {
            Bit::Constant(false) => LinearCombination::zero(),
            Bit::Constant(true) => Variable::One.into(),
            Bit::Is(x) => x.variable().into(),
            Bit::Not(x) => LinearCombination::from(Variable::One) - x.variable(),
        }
    }

    pub fn value<F: PrimeField>(&self, cs: &ConstraintSystem<F>) -> Result<bool> {
        match self {
            Bit::Constant(b) => Ok(*b),
            Bit::Is(x) => x.value(cs),
            Bit::Not(x) => Ok(!x.value(cs)?),
        }
    }

    pub fn constants(bits: &[bool]) -> Vec<Bit> {
        bits.iter().map(|&b| Bit::Constant(b)).collect()
    }

    pub fn values<F: PrimeField>(bits: &[Bit], cs: &ConstraintSystem<F>) -> Result<Vec<bool>> {
        bits.iter().map(|b| b.value(cs)).collect()
    }
}

/// freshly allocated private bits, each booleanity constrained
#[derive(Debug, Clone)]
pub struct BooleanBits {
    bits: Vec<AllocatedBit>,
}

impl BooleanBits {
    pub fn new<F: PrimeField>(cs: &mut ConstraintSystem<F>, n: usize) -> Self {
        Self {
            bits: (0..n).map(|_| AllocatedBit::alloc(cs)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> Vec<Bit> {
        self.bits.iter().copied().map(Bit::Is).collect()
    }

    pub fn allocated(&self) -> &[AllocatedBit] {
        &self.bits
    }
}

impl<F: PrimeField> Gadget<F> for BooleanBits {
    type Witness = [bool];

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        for bit in &self.bits {
            bit.enforce_boolean(cs);
        }
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, values: &[bool]) -> Result<()> {
        if values.len() != self.bits.len() {
            return Err(Error::shape("boolean bits", self.bits.len(), values.len()));
        }
        for (bit, &value) in self.bits.iter().zip(values) {
            bit.assign(cs, value)?;
        }
        Ok(())
    }
}

/// 32-bit word, least significant bit first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word32 {
    bits: [Bit; 32],
}

impl Word32 {
    pub fn constant(value: u32) -> Self {
        Self {
            bits: std::array::from_fn(|i| Bit::Constant((value >> i) & 1 == 1)),
        }
    }

    pub fn from_bits_le(bits: [Bit; 32]) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[Bit; 32] {
        &self.bits
    }

    /// rotate right, a relabeling of wires
    pub fn rotr(&self, by: usize) -> Self {
        Self {
            bits: std::array::from_fn(|i| self.bits[(i + by) % 32]),
        }
    }

    pub fn as_constant(&self) -> Option<u32> {
        self.bits.iter().enumerate().try_fold(0u32, |acc, (i, bit)| {
            bit.as_constant().map(|b| acc | (u32::from(b) << i))
        })
    }

    pub fn value<F: PrimeField>(&self, cs: &ConstraintSystem<F>) -> Result<u32> {
        self.bits.iter().enumerate().try_fold(0u32, |acc, (i, bit)| {
            Ok(acc | (u32::from(bit.value(cs)?) << i))
        })
    }

    /// sum of bit_i * 2^i
    pub fn lc<F: PrimeField>(&self) -> LinearCombination<F> {
        lc_le(&self.bits)
    }
}
