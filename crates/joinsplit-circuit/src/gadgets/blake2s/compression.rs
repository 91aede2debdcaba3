//! blake2s compression function (rfc 7693, section 3.2)

use ff::PrimeField;

use crate::constraint::ConstraintSystem;
use crate::error::Result;
use crate::gadgets::binary::Xor32;
use crate::gadgets::blake2s::g::GPrimitive;
use crate::gadgets::boolean::Word32;
use crate::gadgets::Gadget;

pub const IV: [u32; 8] = [
    0x6A09_E667, 0xBB67_AE85, 0x3C6E_F372, 0xA54F_F53A,
    0x510E_527F, 0x9B05_688C, 0x1F83_D9AB, 0x5BE0_CD19,
];

pub const ROUNDS: usize = 10;

pub const SIGMA: [[usize; 16]; ROUNDS] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

/// working-vector indices (a, b, c, d) of the 8 G calls in a round
const MIX: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

/// h' = F(h, m, t, last)
#[derive(Debug, Clone)]
pub struct Blake2sCompression {
    mixes: Vec<GPrimitive>,
    /// h[i] ^ v[i] and then ^ v[i + 8], per output word
    finals: Vec<Xor32>,
    out: [Word32; 8],
}

impl Blake2sCompression {
    /// `t` is the byte count up to and including this block
    pub fn new<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        h: &[Word32; 8],
        m: &[Word32; 16],
        t: u64,
        last: bool,
    ) -> Self {
        let mut v: [Word32; 16] = std::array::from_fn(|i| {
            if i < 8 {
                h[i]
            } else {
                Word32::constant(IV[i - 8])
            }
        });
        v[12] = Word32::constant(IV[4] ^ t as u32);
        v[13] = Word32::constant(IV[5] ^ (t >> 32) as u32);
        if last {
            v[14] = Word32::constant(!IV[6]);
        }

        let mut mixes = Vec::with_capacity(ROUNDS * MIX.len());
        for sigma in &SIGMA {
            for (j, [a, b, c, d]) in MIX.iter().copied().enumerate() {
                let g = GPrimitive::new(
                    cs,
                    &v[a],
                    &v[b],
                    &v[c],
                    &v[d],
                    &m[sigma[2 * j]],
                    &m[sigma[2 * j + 1]],
                );
                [v[a], v[b], v[c], v[d]] = g.output();
                mixes.push(g);
            }
        }

        let mut finals = Vec::with_capacity(16);
        let mut out = [Word32::constant(0); 8];
        for (i, word) in out.iter_mut().enumerate() {
            let lo = Xor32::new(cs, &h[i], &v[i]);
            let hi = Xor32::new(cs, &lo.output(), &v[i + 8]);
            *word = hi.output();
            finals.push(lo);
            finals.push(hi);
        }

        Self { mixes, finals, out }
    }

    pub fn output(&self) -> [Word32; 8] {
        self.out
    }
}

impl<F: PrimeField> Gadget<F> for Blake2sCompression {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        for g in &self.mixes {
            g.generate_constraints(cs);
        }
        for xor in &self.finals {
            xor.generate_constraints(cs);
        }
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        for g in &self.mixes {
            g.generate_witness(cs, &())?;
        }
        for xor in &self.finals {
            xor.generate_witness(cs, &())?;
        }
        Ok(())
    }
}
