//! joinsplit circuit: a constraint system built once per shape, assigned
//! once per transaction

use ff::PrimeFieldBits;
use pasta_curves::Fp;
use tracing::{debug, info};

use crate::constraint::ConstraintSystem;
use crate::error::{Error, Result};
use crate::gadgets::mimc::{MimcE7R91, MimcParams};
use crate::gadgets::Gadget;
use crate::joinsplit::{JoinSplitGadget, JoinSplitWitness};
use crate::layout::{PublicInputLayout, PublicValues};
use crate::params::{CircuitParams, ZETH_MERKLE_TREE_DEPTH, ZETH_NUM_JS_INPUTS, ZETH_NUM_JS_OUTPUTS};

/// 2 inputs, 2 outputs, depth 32 over pallas' base field
pub type ZethCircuit =
    JoinSplitCircuit<Fp, MimcE7R91, ZETH_NUM_JS_INPUTS, ZETH_NUM_JS_OUTPUTS, ZETH_MERKLE_TREE_DEPTH>;

#[derive(Debug, Clone)]
pub struct JoinSplitCircuit<F, P, const N: usize, const M: usize, const DEPTH: usize> {
    cs: ConstraintSystem<F>,
    gadget: JoinSplitGadget<F, P, N, M, DEPTH>,
}

impl<F: PrimeFieldBits, P: MimcParams, const N: usize, const M: usize, const DEPTH: usize>
    JoinSplitCircuit<F, P, N, M, DEPTH>
{
    pub fn new() -> Result<Self> {
        let mut cs = ConstraintSystem::new();
        let gadget = JoinSplitGadget::new(&mut cs)?;
        gadget.generate_constraints(&mut cs);
        info!(
            inputs = N,
            outputs = M,
            depth = DEPTH,
            constraints = cs.num_constraints(),
            public = cs.num_inputs(),
            private = cs.num_aux(),
            "joinsplit circuit built"
        );
        Ok(Self { cs, gadget })
    }

    /// the dimensions this circuit was compiled for
    pub const fn params() -> CircuitParams {
        CircuitParams {
            num_inputs: N,
            num_outputs: M,
            tree_depth: DEPTH,
        }
    }

    /// fails unless `params` is valid and matches the compiled dimensions
    pub fn check_params(params: &CircuitParams) -> Result<()> {
        params.validate()?;
        if *params != Self::params() {
            return Err(Error::InvalidParams(format!(
                "configured {params:?}, compiled {:?}",
                Self::params()
            )));
        }
        Ok(())
    }

    pub fn constraint_system(&self) -> &ConstraintSystem<F> {
        &self.cs
    }

    pub fn layout(&self) -> &PublicInputLayout {
        self.gadget.layout()
    }

    /// assign a transaction, returning the packed public inputs. does not
    /// check satisfiability
    pub fn assign(&mut self, witness: &JoinSplitWitness<F>) -> Result<Vec<F>> {
        self.cs.reset_assignment();
        self.gadget.generate_witness(&mut self.cs, witness)?;
        debug!("joinsplit witness assigned");
        self.cs.primary_input()
    }

    pub fn is_satisfied(&self) -> bool {
        self.cs.is_satisfied()
    }

    pub fn check(&self) -> Result<()> {
        self.cs.check()
    }

    /// decoded public inputs of the current assignment
    pub fn public_values(&self) -> Result<PublicValues<F>> {
        self.layout().decode(&self.cs.primary_input()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params() {
        assert_eq!(ZethCircuit::params(), CircuitParams::zeth());
        ZethCircuit::check_params(&CircuitParams::default()).unwrap();

        let other = CircuitParams {
            tree_depth: 16,
            ..CircuitParams::zeth()
        };
        assert!(matches!(
            ZethCircuit::check_params(&other),
            Err(Error::InvalidParams(_))
        ));
        let invalid = CircuitParams {
            num_inputs: 9,
            ..CircuitParams::zeth()
        };
        assert!(ZethCircuit::check_params(&invalid).is_err());
    }

    #[test]
    fn test_small_circuit_shape() {
        let circuit = JoinSplitCircuit::<Fp, MimcE7R91, 1, 1, 1>::new().unwrap();
        let cs = circuit.constraint_system();
        // root, cm, nf head, h_sig head, h head, one residual
        assert_eq!(cs.num_inputs(), 6);
        assert_eq!(circuit.layout().num_elements(), 6);
        assert!(!circuit.is_satisfied());
    }
}
