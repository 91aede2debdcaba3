//! mimc permutation E_key(msg)

use std::marker::PhantomData;

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::Result;
use crate::gadgets::mimc::constants::{round_constants, MAX_ROUNDS};
use crate::gadgets::mimc::round::MimcRound;
use crate::gadgets::mimc::MimcParams;
use crate::gadgets::Gadget;

#[derive(Debug, Clone)]
pub struct MimcPermutation<F, P> {
    rounds: Vec<MimcRound<F>>,
    _params: PhantomData<P>,
}

impl<F: PrimeField, P: MimcParams> MimcPermutation<F, P> {
    const PARAMS_OK: () = assert!(
        P::ROUNDS >= 1 && P::ROUNDS <= MAX_ROUNDS && P::EXPONENT >= 3 && P::EXPONENT % 2 == 1,
        "mimc needs 1..=91 rounds and an odd exponent > 1"
    );

    /// `rounds(msg, key) + key + add_to_result`
    pub fn new(
        cs: &mut ConstraintSystem<F>,
        msg: &LinearCombination<F>,
        key: &LinearCombination<F>,
        add_to_result: Option<&LinearCombination<F>>,
    ) -> Result<Self> {
        let () = Self::PARAMS_OK;

        let constants = round_constants::<F>(P::ROUNDS);
        let mut rounds: Vec<MimcRound<F>> = Vec::with_capacity(P::ROUNDS);
        for (i, constant) in constants.into_iter().enumerate() {
            let input = rounds
                .last()
                .map_or_else(|| msg.clone(), |r| r.result().into());
            let add = (i + 1 == P::ROUNDS).then(|| match add_to_result {
                Some(extra) => key.clone() + extra,
                None => key.clone(),
            });
            rounds.push(MimcRound::new(cs, &input, key, constant, P::EXPONENT, add)?);
        }

        Ok(Self {
            rounds,
            _params: PhantomData,
        })
    }

    pub fn result(&self) -> Variable {
        self.rounds
            .last()
            .map_or(Variable::One, MimcRound::result)
    }
}

impl<F: PrimeField, P: MimcParams> Gadget<F> for MimcPermutation<F, P> {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        for round in &self.rounds {
            round.generate_constraints(cs);
        }
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        for round in &self.rounds {
            round.generate_witness(cs, &())?;
        }
        Ok(())
    }
}
