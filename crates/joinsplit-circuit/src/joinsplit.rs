//! joinsplit statement
//!
//! proves, for `N` spent and `M` created notes:
//! - every spent note with nonzero value sits under `root` and belongs to
//!   the holder of `a_sk`
//! - the published nullifiers and auth tags are the prf outputs of those keys
//! - every created note commits to the published `cm` with `rho` derived
//!   from `phi` and `h_sig`
//! - `Σ in + vpub_in = Σ out + vpub_out`
//!
//! public wires are allocated before anything else, in the order fixed by
//! `PublicInputLayout`.

use ff::PrimeField;
use tracing::debug;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::{Error, Result};
use crate::field;
use crate::gadgets::boolean::BooleanBits;
use crate::gadgets::mimc::MimcParams;
use crate::gadgets::note::{InputNoteGadget, InputNoteWitness, OutputNoteGadget};
use crate::gadgets::packing::{lc_be, Packing};
use crate::gadgets::prf::Prf;
use crate::gadgets::Gadget;
use crate::layout::{PublicBits, PublicInputLayout};
use crate::params::{self, DIGEST_BITS, MAX_JS_INPUTS, MAX_JS_OUTPUTS, MAX_TREE_DEPTH, VALUE_BITS};
use crate::types::{Bits256, Note};

/// everything the prover knows about one joinsplit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSplitWitness<F> {
    pub root: F,
    pub inputs: Vec<InputNoteWitness<F>>,
    /// the `rho` of each output is derived in the circuit and not read here
    pub outputs: Vec<Note>,
    pub vpub_in: u64,
    pub vpub_out: u64,
    pub h_sig: Bits256,
    pub phi: Bits256,
}

#[derive(Debug, Clone)]
pub struct JoinSplitGadget<F, P, const N: usize, const M: usize, const DEPTH: usize> {
    layout: PublicInputLayout,
    root: Variable,
    h_sig: BooleanBits,
    phi: BooleanBits,
    vpub_in: BooleanBits,
    vpub_out: BooleanBits,
    inputs: Vec<InputNoteGadget<F, P>>,
    auth_tags: Vec<Prf>,
    rhos: Vec<Prf>,
    outputs: Vec<OutputNoteGadget>,
    packings: Vec<Packing>,
}

impl<F: PrimeField, P: MimcParams, const N: usize, const M: usize, const DEPTH: usize>
    JoinSplitGadget<F, P, N, M, DEPTH>
{
    const PARAMS_OK: () = assert!(
        N >= 1
            && N <= MAX_JS_INPUTS
            && M >= 1
            && M <= MAX_JS_OUTPUTS
            && DEPTH >= 1
            && DEPTH <= MAX_TREE_DEPTH,
        "joinsplit dimensions out of range"
    );

    /// allocates all wires, public ones first. `cs` must be empty
    pub fn new(cs: &mut ConstraintSystem<F>) -> Result<Self> {
        let () = Self::PARAMS_OK;

        let layout = PublicInputLayout::new(N, M, field::capacity::<F>())?;
        let public = cs.alloc_inputs(layout.num_elements())?;
        let root = public[0];

        let h_sig = BooleanBits::new(cs, DIGEST_BITS);
        let phi = BooleanBits::new(cs, DIGEST_BITS);
        let vpub_in = BooleanBits::new(cs, VALUE_BITS);
        let vpub_out = BooleanBits::new(cs, VALUE_BITS);

        let index_bits = params::index_bits(N.max(M));
        let inputs = (0..N)
            .map(|_| InputNoteGadget::new(cs, DEPTH, root))
            .collect::<Result<Vec<_>>>()?;
        let auth_tags = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| Prf::auth_tag(cs, &input.a_sk_bits(), &h_sig.bits(), i, index_bits))
            .collect::<Result<Vec<_>>>()?;
        let rhos = (0..M)
            .map(|j| Prf::rho(cs, &phi.bits(), &h_sig.bits(), j, index_bits))
            .collect::<Result<Vec<_>>>()?;
        let outputs = rhos
            .iter()
            .zip(&public[1..=M])
            .map(|(rho, cm)| OutputNoteGadget::new(cs, rho.output(), *cm))
            .collect::<Result<Vec<_>>>()?;

        let bits = PublicBits {
            nullifiers: inputs.iter().map(|n| n.nullifier_bits().to_vec()).collect(),
            h_sig: h_sig.bits(),
            auth_tags: auth_tags.iter().map(|h| h.output().to_vec()).collect(),
            vpub_in: vpub_in.bits(),
            vpub_out: vpub_out.bits(),
        };
        let packings = layout
            .packed_elements(&bits)?
            .into_iter()
            .map(|(element, bits)| Packing::new(bits, public[element]))
            .collect();

        debug!(
            inputs = N,
            outputs = M,
            depth = DEPTH,
            public = cs.num_inputs(),
            private = cs.num_aux(),
            "joinsplit wires allocated"
        );

        Ok(Self {
            layout,
            root,
            h_sig,
            phi,
            vpub_in,
            vpub_out,
            inputs,
            auth_tags,
            rhos,
            outputs,
            packings,
        })
    }

    pub fn layout(&self) -> &PublicInputLayout {
        &self.layout
    }

    fn value_in(&self) -> LinearCombination<F> {
        self.inputs
            .iter()
            .fold(lc_be(&self.vpub_in.bits()), |acc, input| acc + input.packed_value())
    }

    fn value_out(&self) -> LinearCombination<F> {
        self.outputs
            .iter()
            .fold(lc_be(&self.vpub_out.bits()), |acc, output| acc + output.packed_value::<F>())
    }
}

impl<F: PrimeField, P: MimcParams, const N: usize, const M: usize, const DEPTH: usize> Gadget<F>
    for JoinSplitGadget<F, P, N, M, DEPTH>
{
    type Witness = JoinSplitWitness<F>;

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("joinsplit", |cs| {
            self.h_sig.generate_constraints(cs);
            self.phi.generate_constraints(cs);
            self.vpub_in.generate_constraints(cs);
            self.vpub_out.generate_constraints(cs);
            for input in &self.inputs {
                input.generate_constraints(cs);
            }
            for tag in &self.auth_tags {
                tag.generate_constraints(cs);
            }
            for rho in &self.rhos {
                rho.generate_constraints(cs);
            }
            for output in &self.outputs {
                output.generate_constraints(cs);
            }
            cs.namespace("conservation", |cs| {
                cs.enforce_equal(self.value_in(), self.value_out());
            });
            cs.namespace("public_inputs", |cs| {
                for packing in &self.packings {
                    packing.generate_constraints(cs);
                }
            });
        });
        debug!(
            constraints = cs.num_constraints(),
            "joinsplit constraints generated"
        );
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, w: &JoinSplitWitness<F>) -> Result<()> {
        if w.inputs.len() != N {
            return Err(Error::shape("joinsplit inputs", N, w.inputs.len()));
        }
        if w.outputs.len() != M {
            return Err(Error::shape("joinsplit outputs", M, w.outputs.len()));
        }

        cs.set(self.root, w.root)?;
        self.h_sig.generate_witness(cs, &w.h_sig.to_bits())?;
        self.phi.generate_witness(cs, &w.phi.to_bits())?;
        self.vpub_in.generate_witness(cs, &field::u64_to_bits(w.vpub_in))?;
        self.vpub_out.generate_witness(cs, &field::u64_to_bits(w.vpub_out))?;
        for (input, witness) in self.inputs.iter().zip(&w.inputs) {
            input.generate_witness(cs, witness)?;
        }
        for tag in &self.auth_tags {
            tag.generate_witness(cs, &())?;
        }
        for rho in &self.rhos {
            rho.generate_witness(cs, &())?;
        }
        for (output, note) in self.outputs.iter().zip(&w.outputs) {
            output.generate_witness(cs, note)?;
        }
        for packing in &self.packings {
            packing.generate_witness(cs, &())?;
        }
        Ok(())
    }
}
