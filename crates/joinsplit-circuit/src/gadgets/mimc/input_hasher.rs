//! merkle-damgard hash of field elements over mimc mp
//!
//! `cur = IV; cur = H(cur, m) for each m; out = H(cur, len)`, with
//! `IV = keccak256("clearmatics_hash_seed") mod p`. the final length block
//! keeps the construction open to variable-length inputs.

use ff::PrimeField;
use sha3::{Digest, Keccak256};

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::Result;
use crate::field;
use crate::gadgets::mimc::mp::MimcMp;
use crate::gadgets::mimc::MimcParams;
use crate::gadgets::Gadget;

pub const INPUT_HASHER_SEED: &[u8] = b"clearmatics_hash_seed";

pub fn input_hasher_iv<F: PrimeField>() -> F {
    field::from_be_bytes_mod(&Keccak256::digest(INPUT_HASHER_SEED))
}

#[derive(Debug, Clone)]
pub struct MimcInputHasher<F, P> {
    compressions: Vec<MimcMp<F, P>>,
}

impl<F: PrimeField, P: MimcParams> MimcInputHasher<F, P> {
    pub fn new(cs: &mut ConstraintSystem<F>, inputs: &[LinearCombination<F>]) -> Result<Self> {
        let mut compressions: Vec<MimcMp<F, P>> = Vec::with_capacity(inputs.len() + 1);
        let mut current = LinearCombination::constant(input_hasher_iv::<F>());
        for input in inputs {
            let mp = MimcMp::new(cs, &current, input)?;
            current = mp.result().into();
            compressions.push(mp);
        }
        let length = LinearCombination::constant(F::from(inputs.len() as u64));
        compressions.push(MimcMp::new(cs, &current, &length)?);
        Ok(Self { compressions })
    }

    pub fn result(&self) -> Variable {
        self.compressions
            .last()
            .map_or(Variable::One, MimcMp::result)
    }
}

impl<F: PrimeField, P: MimcParams> Gadget<F> for MimcInputHasher<F, P> {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("mimc_input_hasher", |cs| {
            for mp in &self.compressions {
                mp.generate_constraints(cs);
            }
        });
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        for mp in &self.compressions {
            mp.generate_witness(cs, &())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gadgets::mimc::MimcE7R91;
    use crate::native;
    use pasta_curves::Fp;

    fn fp(s: &str) -> Fp {
        Fp::from_str_vartime(s).unwrap()
    }

    #[test]
    fn test_iv() {
        assert_eq!(
            input_hasher_iv::<Fp>(),
            fp("13196537064117388418196223856311987714388543839552400408340921397545324034315")
        );
    }

    #[test]
    fn test_hasher_vector() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let vars: Vec<Variable> = (0..3).map(|_| cs.alloc_aux()).collect();
        let inputs: Vec<LinearCombination<Fp>> = vars.iter().map(|v| (*v).into()).collect();
        let hasher = MimcInputHasher::<Fp, MimcE7R91>::new(&mut cs, &inputs).unwrap();
        hasher.generate_constraints(&mut cs);
        for (i, var) in vars.iter().enumerate() {
            cs.set(*var, Fp::from(i as u64 + 1)).unwrap();
        }
        hasher.generate_witness(&mut cs, &()).unwrap();

        assert!(cs.is_satisfied());
        let expected =
            fp("18849839687358523908966708928445411361864042634473851997324708195399678991136");
        assert_eq!(cs.value(hasher.result()).unwrap(), expected);
        assert_eq!(
            native::mimc::input_hash::<Fp, MimcE7R91>(&[Fp::from(1), Fp::from(2), Fp::from(3)]),
            expected
        );
    }

    #[test]
    fn test_empty_input() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let hasher = MimcInputHasher::<Fp, MimcE7R91>::new(&mut cs, &[]).unwrap();
        hasher.generate_constraints(&mut cs);
        hasher.generate_witness(&mut cs, &()).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(
            cs.value(hasher.result()).unwrap(),
            fp("1774907750276832575360008238017203616605520721672269452646591450215140912832")
        );
    }
}
