//! hash gadgets against independent references

mod common;

use blake2::{Blake2s256, Digest};
use joinsplit_circuit::field;
use joinsplit_circuit::gadgets::boolean::{Bit, BooleanBits};
use joinsplit_circuit::gadgets::mimc::{MimcE17R65, MimcE7R91, MimcInputHasher, MimcMp, MimcParams};
use joinsplit_circuit::gadgets::{Blake2s, Gadget, MerklePath};
use joinsplit_circuit::native::{self, MerkleTree};
use joinsplit_circuit::{ConstraintSystem, LinearCombination, Variable};
use pasta_curves::Fp;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn blake2s_gadget(data: &[u8]) -> (Vec<u8>, usize) {
    let mut cs = ConstraintSystem::<Fp>::new();
    let input = BooleanBits::new(&mut cs, data.len() * 8);
    let hash = Blake2s::new(&mut cs, &input.bits()).unwrap();
    input.generate_constraints(&mut cs);
    hash.generate_constraints(&mut cs);
    input
        .generate_witness(&mut cs, &field::bytes_to_bits(data))
        .unwrap();
    hash.generate_witness(&mut cs, &()).unwrap();
    cs.check().unwrap();
    let digest = field::bits_to_bytes(&Bit::values(hash.digest(), &cs).unwrap()).unwrap();
    (digest, hash.num_blocks())
}

#[test]
fn test_blake2s_lengths() {
    common::init_tracing();
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    for len in [1usize, 31, 63, 64, 65, 129] {
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data);
        let (digest, blocks) = blake2s_gadget(&data);
        assert_eq!(digest, Blake2s256::digest(&data).to_vec(), "len {len}");
        assert_eq!(blocks, len.div_ceil(64));
    }
}

fn mp_matches_native<P: MimcParams>(rng: &mut ChaCha20Rng) {
    let mut cs = ConstraintSystem::<Fp>::new();
    let x = cs.alloc_aux();
    let y = cs.alloc_aux();
    let mp = MimcMp::<Fp, P>::new(&mut cs, &x.into(), &y.into()).unwrap();
    mp.generate_constraints(&mut cs);

    let (xv, yv) = (Fp::from(rng.gen::<u64>()), Fp::from(rng.gen::<u64>()));
    cs.set(x, xv).unwrap();
    cs.set(y, yv).unwrap();
    mp.generate_witness(&mut cs, &()).unwrap();
    assert!(cs.is_satisfied());
    assert_eq!(cs.value(mp.result()).unwrap(), native::mimc::mp::<Fp, P>(xv, yv));
}

#[test]
fn test_mimc_instances() {
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    for _ in 0..4 {
        mp_matches_native::<MimcE7R91>(&mut rng);
        mp_matches_native::<MimcE17R65>(&mut rng);
    }
}

#[test]
fn test_input_hasher_matches_native() {
    let values: Vec<Fp> = (10..15u64).map(Fp::from).collect();
    let mut cs = ConstraintSystem::<Fp>::new();
    let vars: Vec<Variable> = values.iter().map(|_| cs.alloc_aux()).collect();
    let inputs: Vec<LinearCombination<Fp>> = vars.iter().map(|v| (*v).into()).collect();
    let hasher = MimcInputHasher::<Fp, MimcE17R65>::new(&mut cs, &inputs).unwrap();
    hasher.generate_constraints(&mut cs);
    for (var, value) in vars.iter().zip(&values) {
        cs.set(*var, *value).unwrap();
    }
    hasher.generate_witness(&mut cs, &()).unwrap();
    cs.check().unwrap();
    assert_eq!(
        cs.value(hasher.result()).unwrap(),
        native::mimc::input_hash::<Fp, MimcE17R65>(&values)
    );
}

#[test]
fn test_merkle_path_matches_tree() {
    const DEPTH: usize = common::DEPTH;
    let mut tree = MerkleTree::<Fp, MimcE7R91>::new(DEPTH).unwrap();
    for i in 0..11u64 {
        tree.insert(Fp::from(i * i + 1)).unwrap();
    }

    let mut cs = ConstraintSystem::<Fp>::new();
    let leaf = cs.alloc_aux();
    let address = BooleanBits::new(&mut cs, DEPTH);
    let path = MerklePath::<Fp, MimcE7R91>::new(&mut cs, DEPTH, leaf.into(), &address.bits()).unwrap();
    address.generate_constraints(&mut cs);
    path.generate_constraints(&mut cs);

    for index in [0u64, 5, 10] {
        cs.reset_assignment();
        cs.set(leaf, tree.leaf(index).unwrap()).unwrap();
        let bits: Vec<bool> = (0..DEPTH).map(|i| (index >> i) & 1 == 1).collect();
        address.generate_witness(&mut cs, &bits).unwrap();
        path.generate_witness(&mut cs, &tree.path(index).unwrap()).unwrap();
        cs.check().unwrap();
        assert_eq!(cs.value(path.root()).unwrap(), tree.root());
    }
}
