//! blake2s mixing function G: 6 additions and 4 xor-rotations

use ff::PrimeField;

use crate::constraint::ConstraintSystem;
use crate::error::Result;
use crate::gadgets::binary::{Add32, Xor32};
use crate::gadgets::boolean::Word32;
use crate::gadgets::Gadget;

const R1: usize = 16;
const R2: usize = 12;
const R3: usize = 8;
const R4: usize = 7;

#[derive(Debug, Clone)]
enum Step {
    Add(Add32),
    Xor(Xor32),
}

#[derive(Debug, Clone)]
pub struct GPrimitive {
    /// sub-gadgets in evaluation order
    steps: Vec<Step>,
    out: [Word32; 4],
}

impl GPrimitive {
    #[allow(clippy::too_many_arguments)]
    pub fn new<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        a: &Word32,
        b: &Word32,
        c: &Word32,
        d: &Word32,
        x: &Word32,
        y: &Word32,
    ) -> Self {
        let mut steps = Vec::with_capacity(10);

        let a = add(cs, &mut steps, a, b);
        let a = add(cs, &mut steps, &a, x);
        let d = xor_rot(cs, &mut steps, d, &a, R1);
        let c = add(cs, &mut steps, c, &d);
        let b = xor_rot(cs, &mut steps, b, &c, R2);

        let a = add(cs, &mut steps, &a, &b);
        let a = add(cs, &mut steps, &a, y);
        let d = xor_rot(cs, &mut steps, &d, &a, R3);
        let c = add(cs, &mut steps, &c, &d);
        let b = xor_rot(cs, &mut steps, &b, &c, R4);

        Self {
            steps,
            out: [a, b, c, d],
        }
    }

    /// updated (a, b, c, d)
    pub fn output(&self) -> [Word32; 4] {
        self.out
    }
}

fn add<F: PrimeField>(
    cs: &mut ConstraintSystem<F>,
    steps: &mut Vec<Step>,
    lhs: &Word32,
    rhs: &Word32,
) -> Word32 {
    let gadget = Add32::new(cs, lhs, rhs);
    let out = gadget.output();
    steps.push(Step::Add(gadget));
    out
}

fn xor_rot<F: PrimeField>(
    cs: &mut ConstraintSystem<F>,
    steps: &mut Vec<Step>,
    lhs: &Word32,
    rhs: &Word32,
    rotation: usize,
) -> Word32 {
    let gadget = Xor32::with_rotation(cs, lhs, rhs, rotation);
    let out = gadget.output();
    steps.push(Step::Xor(gadget));
    out
}

impl<F: PrimeField> Gadget<F> for GPrimitive {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        for step in &self.steps {
            match step {
                Step::Add(g) => g.generate_constraints(cs),
                Step::Xor(g) => g.generate_constraints(cs),
            }
        }
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        for step in &self.steps {
            match step {
                Step::Add(g) => g.generate_witness(cs, &())?,
                Step::Xor(g) => g.generate_witness(cs, &())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasta_curves::Fp;

    fn g_native(v: [u32; 4], x: u32, y: u32) -> [u32; 4] {
        let [mut a, mut b, mut c, mut d] = v;
        a = a.wrapping_add(b).wrapping_add(x);
        d = (d ^ a).rotate_right(16);
        c = c.wrapping_add(d);
        b = (b ^ c).rotate_right(12);
        a = a.wrapping_add(b).wrapping_add(y);
        d = (d ^ a).rotate_right(8);
        c = c.wrapping_add(d);
        b = (b ^ c).rotate_right(7);
        [a, b, c, d]
    }

    #[test]
    fn test_constant_g_matches_native() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let v = [0x6a09_e667, 0x510e_527f, 0x3c6e_f372, 0x1f83_d9ab];
        let words = v.map(Word32::constant);
        let g = GPrimitive::new(
            &mut cs,
            &words[0],
            &words[1],
            &words[2],
            &words[3],
            &Word32::constant(0xdead_beef),
            &Word32::constant(7),
        );
        g.generate_constraints(&mut cs);
        assert_eq!(cs.num_constraints(), 0);

        let expected = g_native(v, 0xdead_beef, 7);
        let got = g.output().map(|w| w.as_constant().unwrap());
        assert_eq!(got, expected);
    }
}
