//! note gadgets
//!
//! `NoteGadget` holds what every note carries privately: 64 value bits
//! (msb first) and a 256-bit trapdoor. the input note proves ownership and
//! membership of a spent note and exposes its nullifier; the output note
//! binds a created note to its public commitment.

use ff::PrimeField;

use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::{Error, Result};
use crate::field;
use crate::gadgets::boolean::{AllocatedBit, Bit, BooleanBits};
use crate::gadgets::commitment::NoteCommitment;
use crate::gadgets::merkle::MerkleAuthenticator;
use crate::gadgets::mimc::MimcParams;
use crate::gadgets::packing::lc_be;
use crate::gadgets::prf::Prf;
use crate::gadgets::Gadget;
use crate::params::{self, DIGEST_BITS, VALUE_BITS};
use crate::types::{Bits256, Note};

#[derive(Debug, Clone)]
pub struct NoteGadget {
    value: BooleanBits,
    r: BooleanBits,
}

impl NoteGadget {
    pub fn new<F: PrimeField>(cs: &mut ConstraintSystem<F>) -> Self {
        Self {
            value: BooleanBits::new(cs, VALUE_BITS),
            r: BooleanBits::new(cs, DIGEST_BITS),
        }
    }

    pub fn value_bits(&self) -> Vec<Bit> {
        self.value.bits()
    }

    pub fn r_bits(&self) -> Vec<Bit> {
        self.r.bits()
    }

    /// value as a field element, below 2^64 by construction
    pub fn packed_value<F: PrimeField>(&self) -> LinearCombination<F> {
        lc_be(&self.value.bits())
    }
}

impl<F: PrimeField> Gadget<F> for NoteGadget {
    /// only `value` and `r` are read
    type Witness = Note;

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        self.value.generate_constraints(cs);
        self.r.generate_constraints(cs);
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, note: &Note) -> Result<()> {
        self.value.generate_witness(cs, &field::u64_to_bits(note.value))?;
        self.r.generate_witness(cs, &note.r.to_bits())
    }
}

/// witness of one spent note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputNoteWitness<F> {
    pub a_sk: Bits256,
    /// `a_pk` is re-derived from `a_sk` in the circuit
    pub note: Note,
    /// leaf position, bit `i` selects the side at level `i`
    pub address: u64,
    /// siblings, leaf level first
    pub path: Vec<F>,
}

/// spent note: owned by `a_sk`, under `root` unless its value is zero
#[derive(Debug, Clone)]
pub struct InputNoteGadget<F, P> {
    note: NoteGadget,
    a_sk: BooleanBits,
    rho: BooleanBits,
    address: BooleanBits,
    /// value != 0
    enforce: AllocatedBit,
    a_pk: Prf,
    cm: Variable,
    commitment: NoteCommitment,
    nullifier: Prf,
    authenticator: MerkleAuthenticator<F, P>,
}

impl<F: PrimeField, P: MimcParams> InputNoteGadget<F, P> {
    /// `depth` must lie in `1..=MAX_TREE_DEPTH`
    pub fn new(cs: &mut ConstraintSystem<F>, depth: usize, root: Variable) -> Result<Self> {
        params::check_tree_depth(depth)?;
        let note = NoteGadget::new(cs);
        let a_sk = BooleanBits::new(cs, DIGEST_BITS);
        let rho = BooleanBits::new(cs, DIGEST_BITS);
        let address = BooleanBits::new(cs, depth);
        let enforce = AllocatedBit::alloc(cs);

        let a_pk = Prf::addr(cs, &a_sk.bits())?;
        let cm = cs.alloc_aux();
        let commitment = NoteCommitment::new(
            cs,
            &note.r_bits(),
            a_pk.output(),
            &rho.bits(),
            &note.value_bits(),
            cm,
        )?;
        let nullifier = Prf::nullifier(cs, &a_sk.bits(), &rho.bits())?;
        let authenticator = MerkleAuthenticator::new(
            cs,
            depth,
            cm.into(),
            &address.bits(),
            root,
            Bit::Is(enforce),
        )?;

        Ok(Self {
            note,
            a_sk,
            rho,
            address,
            enforce,
            a_pk,
            cm,
            commitment,
            nullifier,
            authenticator,
        })
    }

    pub fn a_sk_bits(&self) -> Vec<Bit> {
        self.a_sk.bits()
    }

    pub fn nullifier_bits(&self) -> &[Bit] {
        self.nullifier.output()
    }

    pub fn commitment(&self) -> Variable {
        self.cm
    }

    pub fn packed_value(&self) -> LinearCombination<F> {
        self.note.packed_value()
    }
}

impl<F: PrimeField, P: MimcParams> Gadget<F> for InputNoteGadget<F, P> {
    type Witness = InputNoteWitness<F>;

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("input_note", |cs| {
            self.note.generate_constraints(cs);
            self.a_sk.generate_constraints(cs);
            self.rho.generate_constraints(cs);
            self.address.generate_constraints(cs);
            self.enforce.enforce_boolean(cs);
            // value * (1 - enforce) = 0
            cs.enforce(
                self.note.packed_value(),
                LinearCombination::from(Variable::One) - self.enforce.variable(),
                LinearCombination::zero(),
            );
            self.a_pk.generate_constraints(cs);
            self.commitment.generate_constraints(cs);
            self.nullifier.generate_constraints(cs);
            self.authenticator.generate_constraints(cs);
        });
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, w: &InputNoteWitness<F>) -> Result<()> {
        let depth = self.address.len();
        if w.address >> depth != 0 {
            return Err(Error::ValueOutOfRange(format!(
                "address {} outside a tree of depth {depth}",
                w.address
            )));
        }
        let address: Vec<bool> = (0..depth).map(|i| (w.address >> i) & 1 == 1).collect();

        self.note.generate_witness(cs, &w.note)?;
        self.a_sk.generate_witness(cs, &w.a_sk.to_bits())?;
        self.rho.generate_witness(cs, &w.note.rho.to_bits())?;
        self.address.generate_witness(cs, &address)?;
        self.enforce.assign(cs, w.note.value != 0)?;
        self.a_pk.generate_witness(cs, &())?;
        self.commitment.generate_witness(cs, &())?;
        self.nullifier.generate_witness(cs, &())?;
        self.authenticator.generate_witness(cs, &w.path)
    }
}

/// created note, committed to a public variable
#[derive(Debug, Clone)]
pub struct OutputNoteGadget {
    note: NoteGadget,
    a_pk: BooleanBits,
    commitment: NoteCommitment,
}

impl OutputNoteGadget {
    /// `rho` comes from the output's rho prf, `cm` is the public commitment
    pub fn new<F: PrimeField>(cs: &mut ConstraintSystem<F>, rho: &[Bit], cm: Variable) -> Result<Self> {
        let note = NoteGadget::new(cs);
        let a_pk = BooleanBits::new(cs, DIGEST_BITS);
        let commitment =
            NoteCommitment::new(cs, &note.r_bits(), &a_pk.bits(), rho, &note.value_bits(), cm)?;
        Ok(Self {
            note,
            a_pk,
            commitment,
        })
    }

    pub fn packed_value<F: PrimeField>(&self) -> LinearCombination<F> {
        self.note.packed_value()
    }
}

impl<F: PrimeField> Gadget<F> for OutputNoteGadget {
    /// `rho` is derived in the circuit, the note's own field is not read
    type Witness = Note;

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("output_note", |cs| {
            self.note.generate_constraints(cs);
            self.a_pk.generate_constraints(cs);
            self.commitment.generate_constraints(cs);
        });
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, note: &Note) -> Result<()> {
        self.note.generate_witness(cs, note)?;
        self.a_pk.generate_witness(cs, &note.a_pk.to_bits())?;
        self.commitment.generate_witness(cs, &())
    }
}
