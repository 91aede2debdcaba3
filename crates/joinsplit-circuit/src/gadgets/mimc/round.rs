//! single mimc round, `result = (msg + key + c)^e [+ add]`

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::{Error, Result};
use crate::gadgets::Gadget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Square,
    /// multiply by the round base t
    Multiply,
}

#[derive(Debug, Clone)]
pub struct MimcRound<F> {
    /// t = msg + key + c
    base: LinearCombination<F>,
    /// added to the final product inside the last constraint
    add_to_result: Option<LinearCombination<F>>,
    /// one wire per square / multiply, the last one is the result
    ops: Vec<(Op, Variable)>,
}

impl<F: PrimeField> MimcRound<F> {
    pub fn new(
        cs: &mut ConstraintSystem<F>,
        msg: &LinearCombination<F>,
        key: &LinearCombination<F>,
        constant: F,
        exponent: u64,
        add_to_result: Option<LinearCombination<F>>,
    ) -> Result<Self> {
        if exponent < 3 || exponent % 2 == 0 {
            return Err(Error::InvalidParams(format!(
                "mimc exponent {exponent} is not odd and > 1"
            )));
        }
        let base = msg.clone() + key + LinearCombination::constant(constant);

        // square-and-multiply from the bit below the msb
        let bitlen = u64::BITS - exponent.leading_zeros();
        let mut ops = Vec::new();
        for i in (0..bitlen - 1).rev() {
            ops.push((Op::Square, cs.alloc_aux()));
            if (exponent >> i) & 1 == 1 {
                ops.push((Op::Multiply, cs.alloc_aux()));
            }
        }

        Ok(Self {
            base,
            add_to_result,
            ops,
        })
    }

    pub fn result(&self) -> Variable {
        self.ops.last().map_or(Variable::One, |(_, var)| *var)
    }

    pub fn num_constraints(&self) -> usize {
        self.ops.len()
    }
}

impl<F: PrimeField> Gadget<F> for MimcRound<F> {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        let mut acc = self.base.clone();
        let last = self.ops.len() - 1;
        for (i, (op, var)) in self.ops.iter().enumerate() {
            let rhs = match op {
                Op::Square => acc.clone(),
                Op::Multiply => self.base.clone(),
            };
            let mut out = LinearCombination::from(*var);
            if i == last {
                if let Some(add) = &self.add_to_result {
                    out = out - add;
                }
            }
            cs.enforce(acc, rhs, out);
            acc = (*var).into();
        }
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        let t = self.base.evaluate(cs)?;
        let mut acc = t;
        let last = self.ops.len() - 1;
        for (i, (op, var)) in self.ops.iter().enumerate() {
            acc = match op {
                Op::Square => acc.square(),
                Op::Multiply => acc * t,
            };
            let mut value = acc;
            if i == last {
                if let Some(add) = &self.add_to_result {
                    value += add.evaluate(cs)?;
                }
            }
            cs.set(*var, value)?;
        }
        Ok(())
    }
}
