//! miyaguchi-preneel compression over the mimc permutation

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::Result;
use crate::gadgets::mimc::permutation::MimcPermutation;
use crate::gadgets::mimc::MimcParams;
use crate::gadgets::Gadget;

/// H(x, y) = E_y(x) + x + y
#[derive(Debug, Clone)]
pub struct MimcMp<F, P> {
    permutation: MimcPermutation<F, P>,
}

impl<F: PrimeField, P: MimcParams> MimcMp<F, P> {
    /// `x` is the message (left node), `y` the key (right node)
    pub fn new(
        cs: &mut ConstraintSystem<F>,
        x: &LinearCombination<F>,
        y: &LinearCombination<F>,
    ) -> Result<Self> {
        let feed_forward = x.clone() + y;
        Ok(Self {
            permutation: MimcPermutation::new(cs, x, y, Some(&feed_forward))?,
        })
    }

    pub fn result(&self) -> Variable {
        self.permutation.result()
    }
}

impl<F: PrimeField, P: MimcParams> Gadget<F> for MimcMp<F, P> {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        self.permutation.generate_constraints(cs);
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        self.permutation.generate_witness(cs, &())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gadgets::mimc::{MimcE17R65, MimcE7R91};
    use ff::Field;
    use pasta_curves::Fp;

    fn mp_gadget<P: MimcParams>(x: u64, y: u64) -> (ConstraintSystem<Fp>, Variable) {
        let mut cs = ConstraintSystem::<Fp>::new();
        let xv = cs.alloc_aux();
        let yv = cs.alloc_aux();
        let mp = MimcMp::<Fp, P>::new(&mut cs, &xv.into(), &yv.into()).unwrap();
        mp.generate_constraints(&mut cs);
        cs.set(xv, Fp::from(x)).unwrap();
        cs.set(yv, Fp::from(y)).unwrap();
        mp.generate_witness(&mut cs, &()).unwrap();
        (cs, mp.result())
    }

    fn fp(s: &str) -> Fp {
        Fp::from_str_vartime(s).unwrap()
    }

    #[test]
    fn test_mp_e7_vectors() {
        let (cs, out) = mp_gadget::<MimcE7R91>(1, 2);
        assert!(cs.is_satisfied());
        assert_eq!(
            cs.value(out).unwrap(),
            fp("1848166160496606813545947948251882309993101381909339525339230012032237779637")
        );

        let (cs, out) = mp_gadget::<MimcE7R91>(0, 0);
        assert!(cs.is_satisfied());
        assert_eq!(
            cs.value(out).unwrap(),
            fp("10829299682061478972497720617349406185103319027208840323643162964510149382901")
        );
    }

    #[test]
    fn test_mp_e17_vectors() {
        let (cs, out) = mp_gadget::<MimcE17R65>(1, 2);
        assert!(cs.is_satisfied());
        assert_eq!(
            cs.value(out).unwrap(),
            fp("707303554551773451021565956255768561746509193612978205446222399103223777457")
        );

        let (cs, out) = mp_gadget::<MimcE17R65>(0, 0);
        assert_eq!(
            cs.value(out).unwrap(),
            fp("10378828527991796257271994583110085449135703138450872126691820147418963277350")
        );
    }

    #[test]
    fn test_mp_not_symmetric() {
        let (cs_a, a) = mp_gadget::<MimcE7R91>(1, 2);
        let (cs_b, b) = mp_gadget::<MimcE7R91>(2, 1);
        assert_ne!(cs_a.value(a).unwrap(), cs_b.value(b).unwrap());
    }

    #[test]
    fn test_mp_wrong_result() {
        let (mut cs, out) = mp_gadget::<MimcE7R91>(1, 2);
        let value = cs.value(out).unwrap();
        cs.set(out, value + Fp::ONE).unwrap();
        assert_eq!(cs.which_is_unsatisfied(), Some(cs.num_constraints() - 1));
    }
}
