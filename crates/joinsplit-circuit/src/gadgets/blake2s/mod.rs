//! blake2s-256 gadget
//!
//! unkeyed, 32-byte digest, parameter block word 0 = 0x01010020. input and
//! output are big-endian bit strings (msb of byte 0 first). message words are
//! read little-endian from the byte string, so moving between the two views
//! only relabels wires.
//!
//! cost is ~27k constraints per compression; constant parts of the message
//! (domain tags, padding) fold away in xor and add32.

use ff::PrimeField;
use tracing::trace;

use crate::constraint::ConstraintSystem;
use crate::error::{Error, Result};
use crate::gadgets::boolean::{Bit, Word32};
use crate::gadgets::Gadget;

pub mod compression;
pub mod g;

pub use compression::{Blake2sCompression, IV};

pub const BLOCK_BYTES: usize = 64;
pub const DIGEST_BYTES: usize = 32;

/// digest length 32, no key, fanout 1, depth 1
const PARAM_WORD0: u32 = 0x0101_0000 | DIGEST_BYTES as u32;

#[derive(Debug, Clone)]
pub struct Blake2s {
    blocks: Vec<Blake2sCompression>,
    digest: Vec<Bit>,
}

impl Blake2s {
    /// hash `input`, a whole number of bytes
    pub fn new<F: PrimeField>(cs: &mut ConstraintSystem<F>, input: &[Bit]) -> Result<Self> {
        if input.len() % 8 != 0 {
            return Err(Error::shape(
                "blake2s input bits",
                input.len().next_multiple_of(8),
                input.len(),
            ));
        }
        let len_bytes = input.len() / 8;
        let num_blocks = len_bytes.div_ceil(BLOCK_BYTES).max(1);
        trace!(bytes = len_bytes, blocks = num_blocks, "blake2s gadget");

        let mut h: [Word32; 8] = IV.map(Word32::constant);
        h[0] = Word32::constant(IV[0] ^ PARAM_WORD0);

        let mut blocks = Vec::with_capacity(num_blocks);
        for block in 0..num_blocks {
            let start = block * BLOCK_BYTES * 8;
            let m: [Word32; 16] = std::array::from_fn(|j| {
                Word32::from_bits_le(std::array::from_fn(|k| {
                    let bit = start + 8 * (4 * j + k / 8) + 7 - k % 8;
                    input.get(bit).copied().unwrap_or(Bit::Constant(false))
                }))
            });
            let last = block + 1 == num_blocks;
            let t = if last { len_bytes } else { (block + 1) * BLOCK_BYTES };
            let compression = Blake2sCompression::new(cs, &h, &m, t as u64, last);
            h = compression.output();
            blocks.push(compression);
        }

        let digest = (0..DIGEST_BYTES * 8)
            .map(|i| {
                let (byte, k) = (i / 8, i % 8);
                h[byte / 4].bits()[8 * (byte % 4) + 7 - k]
            })
            .collect();

        Ok(Self { blocks, digest })
    }

    /// 256 digest bits, msb of byte 0 first
    pub fn digest(&self) -> &[Bit] {
        &self.digest
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }
}

impl<F: PrimeField> Gadget<F> for Blake2s {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("blake2s", |cs| {
            for block in &self.blocks {
                block.generate_constraints(cs);
            }
        });
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        for block in &self.blocks {
            block.generate_witness(cs, &())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::gadgets::boolean::BooleanBits;
    use blake2::{Blake2s256, Digest};
    use pasta_curves::Fp;

    fn hash_private(data: &[u8]) -> (ConstraintSystem<Fp>, Blake2s) {
        let mut cs = ConstraintSystem::<Fp>::new();
        let input = BooleanBits::new(&mut cs, data.len() * 8);
        let hash = Blake2s::new(&mut cs, &input.bits()).unwrap();
        input.generate_constraints(&mut cs);
        hash.generate_constraints(&mut cs);
        input.generate_witness(&mut cs, &field::bytes_to_bits(data)).unwrap();
        hash.generate_witness(&mut cs, &()).unwrap();
        (cs, hash)
    }

    fn digest_bytes(cs: &ConstraintSystem<Fp>, hash: &Blake2s) -> Vec<u8> {
        field::bits_to_bytes(&Bit::values(hash.digest(), cs).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_input_is_constant() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let hash = Blake2s::new(&mut cs, &[]).unwrap();
        hash.generate_constraints(&mut cs);
        assert_eq!(cs.num_constraints(), 0);
        assert_eq!(hash.num_blocks(), 1);
        assert_eq!(
            hex::encode(digest_bytes(&cs, &hash)),
            "69217a3079908094e11121d042354a7c1f55b6482ca1a51e1b250dfd1ed0eef9"
        );
    }

    #[test]
    fn test_single_block_vector() {
        let data: Vec<u8> = (0u8..64).collect();
        let (cs, hash) = hash_private(&data);
        assert!(cs.is_satisfied());
        assert_eq!(
            hex::encode(digest_bytes(&cs, &hash)),
            "56f34e8b96557e90c1f24b52d0c89d51086acf1b00f634cf1dde9233b8eaaa3e"
        );
    }

    #[test]
    fn test_two_blocks_match_reference() {
        let data: Vec<u8> = (0u8..104).collect();
        let (cs, hash) = hash_private(&data);
        assert_eq!(hash.num_blocks(), 2);
        assert!(cs.is_satisfied());
        let got = digest_bytes(&cs, &hash);
        assert_eq!(got, Blake2s256::digest(&data).to_vec());
        assert_eq!(
            hex::encode(got),
            "e4bfe80d58c91994613909dc4b1a12496896c004af7b5701483de45d2823d78e"
        );
    }

    #[test]
    fn test_tampered_digest_unsatisfied() {
        let (mut cs, hash) = hash_private(&[0u8; 64]);
        assert_eq!(
            hex::encode(digest_bytes(&cs, &hash)),
            "ae09db7cd54f42b490ef09b6bc541af688e4959bb8c53f359a6f56e38ab454a3"
        );
        let (Bit::Is(bit) | Bit::Not(bit)) = hash.digest()[0] else {
            panic!("digest bit should be allocated");
        };
        let flipped = !bit.value(&cs).unwrap();
        bit.assign(&mut cs, flipped).unwrap();
        assert!(!cs.is_satisfied());
    }

    #[test]
    fn test_rejects_partial_byte() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let err = Blake2s::new(&mut cs, &Bit::constants(&[true; 9])).unwrap_err();
        assert_eq!(err, Error::shape("blake2s input bits", 16, 9));
        assert_eq!(cs.num_constraints(), 0);
    }
}
