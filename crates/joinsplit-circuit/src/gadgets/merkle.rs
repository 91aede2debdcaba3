//! merkle membership over mimc mp
//!
//! address bit `i` picks the side at level `i`, leaf level first. a set bit
//! means the running node is the right child.

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::{Error, Result};
use crate::gadgets::boolean::Bit;
use crate::gadgets::mimc::{MimcMp, MimcParams};
use crate::gadgets::Gadget;
use crate::params;

/// orders (input, sibling) into (left, right), 2 constraints
#[derive(Debug, Clone)]
pub struct MerkleSelector<F> {
    input: LinearCombination<F>,
    sibling: Variable,
    is_right: Bit,
    left: Variable,
    right: Variable,
}

impl<F: PrimeField> MerkleSelector<F> {
    pub fn new(
        cs: &mut ConstraintSystem<F>,
        input: LinearCombination<F>,
        sibling: Variable,
        is_right: Bit,
    ) -> Self {
        Self {
            input,
            sibling,
            is_right,
            left: cs.alloc_aux(),
            right: cs.alloc_aux(),
        }
    }

    pub fn left(&self) -> Variable {
        self.left
    }

    pub fn right(&self) -> Variable {
        self.right
    }
}

impl<F: PrimeField> Gadget<F> for MerkleSelector<F> {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        // is_right * (sibling - input) = left - input
        cs.enforce(
            self.is_right.lc(),
            LinearCombination::from(self.sibling) - &self.input,
            LinearCombination::from(self.left) - &self.input,
        );
        // is_right * (input - sibling) = right - sibling
        cs.enforce(
            self.is_right.lc(),
            self.input.clone() - self.sibling,
            LinearCombination::from(self.right) - self.sibling,
        );
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        let input = self.input.evaluate(cs)?;
        let sibling = cs.value(self.sibling)?;
        let (left, right) = if self.is_right.value(cs)? {
            (sibling, input)
        } else {
            (input, sibling)
        };
        cs.set(self.left, left)?;
        cs.set(self.right, right)
    }
}

/// root of a leaf under a private authentication path
#[derive(Debug, Clone)]
pub struct MerklePath<F, P> {
    siblings: Vec<Variable>,
    levels: Vec<(MerkleSelector<F>, MimcMp<F, P>)>,
}

impl<F: PrimeField, P: MimcParams> MerklePath<F, P> {
    /// allocates `depth` sibling wires; `address` must hold `depth` bits
    pub fn new(
        cs: &mut ConstraintSystem<F>,
        depth: usize,
        leaf: LinearCombination<F>,
        address: &[Bit],
    ) -> Result<Self> {
        params::check_tree_depth(depth)?;
        if address.len() != depth {
            return Err(Error::shape("merkle address bits", depth, address.len()));
        }

        let siblings: Vec<Variable> = (0..depth).map(|_| cs.alloc_aux()).collect();
        let mut levels: Vec<(MerkleSelector<F>, MimcMp<F, P>)> = Vec::with_capacity(depth);
        let mut node = leaf;
        for (sibling, is_right) in siblings.iter().zip(address) {
            let selector = MerkleSelector::new(cs, node, *sibling, *is_right);
            let hash = MimcMp::new(cs, &selector.left().into(), &selector.right().into())?;
            node = hash.result().into();
            levels.push((selector, hash));
        }

        Ok(Self { siblings, levels })
    }

    /// computed root
    pub fn root(&self) -> Variable {
        self.levels
            .last()
            .map_or(Variable::One, |(_, hash)| hash.result())
    }
}

impl<F: PrimeField, P: MimcParams> Gadget<F> for MerklePath<F, P> {
    /// sibling values, leaf level first
    type Witness = [F];

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("merkle_path", |cs| {
            for (selector, hash) in &self.levels {
                selector.generate_constraints(cs);
                hash.generate_constraints(cs);
            }
        });
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, path: &[F]) -> Result<()> {
        if path.len() != self.siblings.len() {
            return Err(Error::shape("merkle path", self.siblings.len(), path.len()));
        }
        for (var, value) in self.siblings.iter().zip(path) {
            cs.set(*var, *value)?;
        }
        for (selector, hash) in &self.levels {
            selector.generate_witness(cs, &())?;
            hash.generate_witness(cs, &())?;
        }
        Ok(())
    }
}

/// path root must equal `root` whenever `enforce` is set
#[derive(Debug, Clone)]
pub struct MerkleAuthenticator<F, P> {
    path: MerklePath<F, P>,
    root: Variable,
    enforce: Bit,
}

impl<F: PrimeField, P: MimcParams> MerkleAuthenticator<F, P> {
    pub fn new(
        cs: &mut ConstraintSystem<F>,
        depth: usize,
        leaf: LinearCombination<F>,
        address: &[Bit],
        root: Variable,
        enforce: Bit,
    ) -> Result<Self> {
        Ok(Self {
            path: MerklePath::new(cs, depth, leaf, address)?,
            root,
            enforce,
        })
    }

    pub fn computed_root(&self) -> Variable {
        self.path.root()
    }
}

impl<F: PrimeField, P: MimcParams> Gadget<F> for MerkleAuthenticator<F, P> {
    type Witness = [F];

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        self.path.generate_constraints(cs);
        cs.namespace("merkle_authenticator", |cs| {
            cs.enforce(
                self.enforce.lc(),
                LinearCombination::from(self.path.root()) - self.root,
                LinearCombination::zero(),
            );
        });
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, path: &[F]) -> Result<()> {
        self.path.generate_witness(cs, path)
    }
}
