//! shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Once;

use joinsplit_circuit::gadgets::mimc::MimcE7R91;
use joinsplit_circuit::gadgets::note::InputNoteWitness;
use joinsplit_circuit::native::{self, MerkleTree};
use joinsplit_circuit::params::index_bits;
use joinsplit_circuit::{Bits256, JoinSplitCircuit, JoinSplitWitness, Note, PublicValues};
use pasta_curves::Fp;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// shallow tree, the hashes dominate synthesis time anyway
pub const DEPTH: usize = 4;

pub type Circuit<const N: usize, const M: usize> = JoinSplitCircuit<Fp, MimcE7R91, N, M, DEPTH>;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "joinsplit_circuit=info".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// a note to spend
#[derive(Debug, Clone)]
pub struct Spend {
    pub a_sk: Bits256,
    pub note: Note,
    /// `None` for a dummy that is not in the tree
    pub address: Option<u64>,
}

pub struct Fixture {
    pub tree: MerkleTree<Fp, MimcE7R91>,
    pub rng: ChaCha20Rng,
}

impl Fixture {
    pub fn new(seed: u64) -> Self {
        Self::with_depth(seed, DEPTH)
    }

    pub fn with_depth(seed: u64, depth: usize) -> Self {
        let mut fixture = Self {
            tree: MerkleTree::new(depth).unwrap(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        };
        // unrelated commitments so the spent leaves are not at address 0
        for _ in 0..3 {
            let leaf = Fp::from(fixture.rng.gen::<u64>());
            fixture.tree.insert(leaf).unwrap();
        }
        fixture
    }

    pub fn random(&mut self) -> Bits256 {
        Bits256::random(&mut self.rng)
    }

    /// a note owned by a fresh key, committed to the tree
    pub fn funded(&mut self, value: u64) -> Spend {
        let a_sk = self.random();
        let note = Note {
            a_pk: native::prf::addr(&a_sk),
            value,
            rho: self.random(),
            r: self.random(),
        };
        let address = self.tree.insert(native::note_commitment(&note)).unwrap();
        Spend {
            a_sk,
            note,
            address: Some(address),
        }
    }

    /// a note of the given value that was never committed
    pub fn uncommitted(&mut self, value: u64) -> Spend {
        let a_sk = self.random();
        Spend {
            a_sk,
            note: Note {
                a_pk: native::prf::addr(&a_sk),
                value,
                rho: self.random(),
                r: self.random(),
            },
            address: None,
        }
    }

    pub fn dummy(&mut self) -> Spend {
        self.uncommitted(0)
    }

    pub fn output(&mut self, value: u64) -> Note {
        Note {
            a_pk: self.random(),
            value,
            rho: Bits256::ZERO,
            r: self.random(),
        }
    }

    /// witness against the current root. paths are taken now, so every
    /// commitment must already be in the tree
    pub fn witness(
        &mut self,
        spends: &[Spend],
        outputs: &[Note],
        vpub_in: u64,
        vpub_out: u64,
    ) -> JoinSplitWitness<Fp> {
        let inputs = spends
            .iter()
            .map(|spend| match spend.address {
                Some(address) => InputNoteWitness {
                    a_sk: spend.a_sk,
                    note: spend.note,
                    address,
                    path: self.tree.path(address).unwrap(),
                },
                None => InputNoteWitness {
                    a_sk: spend.a_sk,
                    note: spend.note,
                    address: self.rng.gen_range(0..1u64 << self.tree.depth()),
                    path: (0..self.tree.depth())
                        .map(|_| Fp::from(self.rng.gen::<u64>()))
                        .collect(),
                },
            })
            .collect();
        JoinSplitWitness {
            root: self.tree.root(),
            inputs,
            outputs: outputs.to_vec(),
            vpub_in,
            vpub_out,
            h_sig: self.random(),
            phi: self.random(),
        }
    }
}

/// public inputs computed with the native prfs and commitment
pub fn expected_public(witness: &JoinSplitWitness<Fp>) -> PublicValues<Fp> {
    let n = witness.inputs.len();
    let m = witness.outputs.len();
    let w = index_bits(n.max(m));
    PublicValues {
        root: witness.root,
        commitments: witness
            .outputs
            .iter()
            .enumerate()
            .map(|(j, note)| {
                let rho = native::prf::rho(&witness.phi, &witness.h_sig, j, w).unwrap();
                native::note_commitment(&Note { rho, ..*note })
            })
            .collect(),
        nullifiers: witness
            .inputs
            .iter()
            .map(|input| native::prf::nf(&input.a_sk, &input.note.rho))
            .collect(),
        h_sig: witness.h_sig,
        auth_tags: witness
            .inputs
            .iter()
            .enumerate()
            .map(|(i, input)| native::prf::pk(&input.a_sk, &witness.h_sig, i, w).unwrap())
            .collect(),
        vpub_in: witness.vpub_in,
        vpub_out: witness.vpub_out,
    }
}
