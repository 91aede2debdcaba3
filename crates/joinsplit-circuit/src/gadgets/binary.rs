//! bitwise gadgets over 32-bit words
//!
//! - xor: one constraint per output bit, `(2a) * b = a + b - out`. bits with a
//!   constant operand fold to the other operand or its negation for free
//! - xor with rotation: xor followed by relabeling the output wires
//! - add32: 33 boolean result bits and one linear sum check, the carry bit is
//!   dropped

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::Result;
use crate::gadgets::boolean::{AllocatedBit, Bit, Word32};
use crate::gadgets::packing::lc_le;
use crate::gadgets::Gadget;

/// out = rotr(a ^ b, rotation)
#[derive(Debug, Clone)]
pub struct Xor32 {
    /// operand pairs that needed a fresh output wire
    allocated: Vec<(Bit, Bit, AllocatedBit)>,
    out: Word32,
}

impl Xor32 {
    pub fn new<F: PrimeField>(cs: &mut ConstraintSystem<F>, a: &Word32, b: &Word32) -> Self {
        Self::with_rotation(cs, a, b, 0)
    }

    pub fn with_rotation<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        a: &Word32,
        b: &Word32,
        rotation: usize,
    ) -> Self {
        let mut allocated = Vec::new();
        let mut bits = [Bit::Constant(false); 32];
        for (i, out) in bits.iter_mut().enumerate() {
            *out = xor_bit(cs, a.bits()[i], b.bits()[i], &mut allocated);
        }
        Self {
            allocated,
            out: Word32::from_bits_le(bits).rotr(rotation),
        }
    }

    pub fn output(&self) -> Word32 {
        self.out
    }

    /// number of constraints this gadget emits
    pub fn num_constraints(&self) -> usize {
        self.allocated.len()
    }
}

fn xor_bit<F: PrimeField>(
    cs: &mut ConstraintSystem<F>,
    a: Bit,
    b: Bit,
    allocated: &mut Vec<(Bit, Bit, AllocatedBit)>,
) -> Bit {
    match (a, b) {
        (Bit::Constant(c), other) | (other, Bit::Constant(c)) => {
            if c {
                !other
            } else {
                other
            }
        }
        (Bit::Is(x), Bit::Is(y)) | (Bit::Not(x), Bit::Not(y)) if x == y => Bit::Constant(false),
        (Bit::Is(x), Bit::Not(y)) | (Bit::Not(x), Bit::Is(y)) if x == y => Bit::Constant(true),
        _ => {
            let out = AllocatedBit::alloc(cs);
            allocated.push((a, b, out));
            Bit::Is(out)
        }
    }
}

impl<F: PrimeField> Gadget<F> for Xor32 {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        for (a, b, out) in &self.allocated {
            let la = a.lc::<F>();
            let lb = b.lc::<F>();
            cs.enforce(
                la.clone().scale(F::ONE.double()),
                lb.clone(),
                la + &lb - out.variable(),
            );
        }
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        for (a, b, out) in &self.allocated {
            let value = a.value(cs)? ^ b.value(cs)?;
            out.assign(cs, value)?;
        }
        Ok(())
    }
}

/// out = a + b mod 2^32
#[derive(Debug, Clone)]
pub struct Add32 {
    a: Word32,
    b: Word32,
    /// 33 sum bits, none when both operands are constant
    sum: Option<[AllocatedBit; 33]>,
    out: Word32,
}

impl Add32 {
    pub fn new<F: PrimeField>(cs: &mut ConstraintSystem<F>, a: &Word32, b: &Word32) -> Self {
        if let (Some(x), Some(y)) = (a.as_constant(), b.as_constant()) {
            return Self {
                a: *a,
                b: *b,
                sum: None,
                out: Word32::constant(x.wrapping_add(y)),
            };
        }
        let sum: [AllocatedBit; 33] = std::array::from_fn(|_| AllocatedBit::alloc(cs));
        let out = Word32::from_bits_le(std::array::from_fn(|i| Bit::Is(sum[i])));
        Self {
            a: *a,
            b: *b,
            sum: Some(sum),
            out,
        }
    }

    pub fn output(&self) -> Word32 {
        self.out
    }

    pub fn num_constraints(&self) -> usize {
        self.sum.map_or(0, |s| s.len() + 1)
    }
}

impl<F: PrimeField> Gadget<F> for Add32 {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        let Some(sum) = &self.sum else {
            return;
        };
        for bit in sum {
            bit.enforce_boolean(cs);
        }
        let sum_bits: Vec<Bit> = sum.iter().copied().map(Bit::Is).collect();
        cs.enforce(
            self.a.lc::<F>() + self.b.lc::<F>(),
            LinearCombination::from(Variable::One),
            lc_le(&sum_bits),
        );
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        let Some(sum) = &self.sum else {
            return Ok(());
        };
        let total = u64::from(self.a.value(cs)?) + u64::from(self.b.value(cs)?);
        for (i, bit) in sum.iter().enumerate() {
            bit.assign(cs, (total >> i) & 1 == 1)?;
        }
        Ok(())
    }
}
