//! public input layout of the joinsplit statement
//!
//! elements are emitted as
//! `[root, cm[0..M], nf_head[0..N], h_sig_head, h_head[0..N], residual[0..k]]`.
//! a digest head is its leading `capacity` bits packed msb first. whatever
//! does not fit goes to a residual pool
//! `vpub_in ‖ vpub_out ‖ h_sig_res ‖ nf_res[0..N] ‖ h_res[0..N]`
//! which is cut into `capacity`-bit chunks, the last one possibly shorter.
//!
//! the gadget and `encode` both walk `packed_elements`, so they cannot
//! disagree on where a bit lands.

use std::ops::Range;

use ff::{PrimeField, PrimeFieldBits};

use crate::error::{Error, Result};
use crate::field;
use crate::params::{DIGEST_BITS, VALUE_BITS};
use crate::types::Bits256;

/// what a public element (or part of one) carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicEntry {
    Root,
    Commitment(usize),
    Nullifier(usize),
    HSig,
    AuthTag(usize),
    VpubIn,
    VpubOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// a whole field element
    Field { element: usize },
    /// a bit string split into an optional head element and a residual range
    Bits {
        head: Option<(usize, usize)>,
        residual: Range<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub label: PublicEntry,
    pub slot: Slot,
}

/// bit strings feeding the packed elements, msb first. `T` is `bool`
/// natively and a circuit bit inside the gadget
#[derive(Debug, Clone)]
pub struct PublicBits<T> {
    pub nullifiers: Vec<Vec<T>>,
    pub h_sig: Vec<T>,
    pub auth_tags: Vec<Vec<T>>,
    pub vpub_in: Vec<T>,
    pub vpub_out: Vec<T>,
}

impl<T> PublicBits<T> {
    fn source(&self, label: PublicEntry) -> Option<&[T]> {
        match label {
            PublicEntry::Nullifier(i) => self.nullifiers.get(i).map(Vec::as_slice),
            PublicEntry::HSig => Some(&self.h_sig),
            PublicEntry::AuthTag(i) => self.auth_tags.get(i).map(Vec::as_slice),
            PublicEntry::VpubIn => Some(&self.vpub_in),
            PublicEntry::VpubOut => Some(&self.vpub_out),
            PublicEntry::Root | PublicEntry::Commitment(_) => None,
        }
    }
}

/// decoded public inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicValues<F> {
    pub root: F,
    pub commitments: Vec<F>,
    pub nullifiers: Vec<Bits256>,
    pub h_sig: Bits256,
    pub auth_tags: Vec<Bits256>,
    pub vpub_in: u64,
    pub vpub_out: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicInputLayout {
    num_inputs: usize,
    num_outputs: usize,
    capacity: usize,
    entries: Vec<LayoutEntry>,
    residual_bits: usize,
}

impl PublicInputLayout {
    pub fn new(num_inputs: usize, num_outputs: usize, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidParams("field capacity of 0 bits".into()));
        }
        let head_bits = capacity.min(DIGEST_BITS);
        let res = DIGEST_BITS - head_bits;
        let head = |element: usize| (head_bits > 0).then_some((element, head_bits));

        let nf_start = 1 + num_outputs;
        let h_sig_element = nf_start + num_inputs;
        let h_start = h_sig_element + 1;
        // residual pool offsets
        let h_sig_res = 2 * VALUE_BITS;
        let nf_res = h_sig_res + res;
        let h_res = nf_res + num_inputs * res;
        let residual_bits = h_res + num_inputs * res;

        let mut entries = vec![LayoutEntry {
            label: PublicEntry::Root,
            slot: Slot::Field { element: 0 },
        }];
        entries.extend((0..num_outputs).map(|j| LayoutEntry {
            label: PublicEntry::Commitment(j),
            slot: Slot::Field { element: 1 + j },
        }));
        entries.extend((0..num_inputs).map(|i| LayoutEntry {
            label: PublicEntry::Nullifier(i),
            slot: Slot::Bits {
                head: head(nf_start + i),
                residual: nf_res + i * res..nf_res + (i + 1) * res,
            },
        }));
        entries.push(LayoutEntry {
            label: PublicEntry::HSig,
            slot: Slot::Bits {
                head: head(h_sig_element),
                residual: h_sig_res..h_sig_res + res,
            },
        });
        entries.extend((0..num_inputs).map(|i| LayoutEntry {
            label: PublicEntry::AuthTag(i),
            slot: Slot::Bits {
                head: head(h_start + i),
                residual: h_res + i * res..h_res + (i + 1) * res,
            },
        }));
        entries.push(LayoutEntry {
            label: PublicEntry::VpubIn,
            slot: Slot::Bits {
                head: None,
                residual: 0..VALUE_BITS,
            },
        });
        entries.push(LayoutEntry {
            label: PublicEntry::VpubOut,
            slot: Slot::Bits {
                head: None,
                residual: VALUE_BITS..2 * VALUE_BITS,
            },
        });

        Ok(Self {
            num_inputs,
            num_outputs,
            capacity,
            entries,
            residual_bits,
        })
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// index of the first residual element
    pub fn residual_offset(&self) -> usize {
        2 + self.num_outputs + 2 * self.num_inputs
    }

    pub fn residual_bits(&self) -> usize {
        self.residual_bits
    }

    /// pool bit range of each residual element
    pub fn residual_chunks(&self) -> Vec<Range<usize>> {
        (0..self.residual_bits.div_ceil(self.capacity))
            .map(|c| c * self.capacity..((c + 1) * self.capacity).min(self.residual_bits))
            .collect()
    }

    pub fn num_elements(&self) -> usize {
        self.residual_offset() + self.residual_chunks().len()
    }

    /// every bit-packed element as (element index, bits msb first),
    /// heads first, then residual chunks
    pub fn packed_elements<T: Copy>(&self, bits: &PublicBits<T>) -> Result<Vec<(usize, Vec<T>)>> {
        self.check_counts("public nullifiers", bits.nullifiers.len(), self.num_inputs)?;
        self.check_counts("public auth tags", bits.auth_tags.len(), self.num_inputs)?;

        let mut out = Vec::new();
        let mut pool: Vec<Option<T>> = vec![None; self.residual_bits];
        for entry in &self.entries {
            let Slot::Bits { head, residual } = &entry.slot else {
                continue;
            };
            let source = bits
                .source(entry.label)
                .ok_or(Error::shape("public bit source", 1, 0))?;
            let head_bits = head.map_or(0, |(_, n)| n);
            if source.len() != head_bits + residual.len() {
                return Err(Error::shape(
                    "public bit source",
                    head_bits + residual.len(),
                    source.len(),
                ));
            }
            if let Some((element, n)) = head {
                out.push((*element, source[..*n].to_vec()));
            }
            for (slot, bit) in pool[residual.clone()].iter_mut().zip(&source[head_bits..]) {
                *slot = Some(*bit);
            }
        }

        let pool: Vec<T> = pool.into_iter().flatten().collect();
        if pool.len() != self.residual_bits {
            return Err(Error::shape("residual pool", self.residual_bits, pool.len()));
        }
        let offset = self.residual_offset();
        out.extend(
            self.residual_chunks()
                .into_iter()
                .enumerate()
                .map(|(c, range)| (offset + c, pool[range].to_vec())),
        );
        Ok(out)
    }

    fn check_counts(&self, what: &'static str, actual: usize, expected: usize) -> Result<()> {
        if actual != expected {
            return Err(Error::shape(what, expected, actual));
        }
        Ok(())
    }

    pub fn encode<F: PrimeField>(&self, values: &PublicValues<F>) -> Result<Vec<F>> {
        self.check_counts("public commitments", values.commitments.len(), self.num_outputs)?;
        let bits = PublicBits {
            nullifiers: values.nullifiers.iter().map(Bits256::to_bits).collect(),
            h_sig: values.h_sig.to_bits(),
            auth_tags: values.auth_tags.iter().map(Bits256::to_bits).collect(),
            vpub_in: field::u64_to_bits(values.vpub_in),
            vpub_out: field::u64_to_bits(values.vpub_out),
        };

        let mut out = vec![F::ZERO; self.num_elements()];
        out[0] = values.root;
        out[1..=self.num_outputs].copy_from_slice(&values.commitments);
        for (element, bits) in self.packed_elements(&bits)? {
            out[element] = field::pack_bits(&bits);
        }
        Ok(out)
    }

    /// inverse of `encode`; rejects elements wider than their slot
    pub fn decode<F: PrimeFieldBits>(&self, elements: &[F]) -> Result<PublicValues<F>> {
        if elements.len() != self.num_elements() {
            return Err(Error::shape("public inputs", self.num_elements(), elements.len()));
        }
        let offset = self.residual_offset();
        let mut pool = Vec::with_capacity(self.residual_bits);
        for (c, range) in self.residual_chunks().into_iter().enumerate() {
            pool.extend(field::unpack_bits(&elements[offset + c], range.len())?);
        }

        let mut values = PublicValues {
            root: elements[0],
            commitments: elements[1..=self.num_outputs].to_vec(),
            ..PublicValues::default()
        };
        for entry in &self.entries {
            let Slot::Bits { head, residual } = &entry.slot else {
                continue;
            };
            let mut bits = match head {
                Some((element, n)) => field::unpack_bits(&elements[*element], *n)?,
                None => Vec::new(),
            };
            bits.extend_from_slice(&pool[residual.clone()]);
            match entry.label {
                PublicEntry::Nullifier(_) => values.nullifiers.push(Bits256::from_bits(&bits)?),
                PublicEntry::HSig => values.h_sig = Bits256::from_bits(&bits)?,
                PublicEntry::AuthTag(_) => values.auth_tags.push(Bits256::from_bits(&bits)?),
                PublicEntry::VpubIn => values.vpub_in = field::bits_to_u64(&bits),
                PublicEntry::VpubOut => values.vpub_out = field::bits_to_u64(&bits),
                PublicEntry::Root | PublicEntry::Commitment(_) => {}
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;
    use pasta_curves::Fp;
    use proptest::prelude::*;

    #[test]
    fn test_zeth_shape() {
        let layout = PublicInputLayout::new(2, 2, 254).unwrap();
        // root, 2 cm, 2 nf, h_sig, 2 h
        assert_eq!(layout.residual_offset(), 8);
        // 64 + 64 + 2 * (1 + 2 + 2)
        assert_eq!(layout.residual_bits(), 138);
        assert_eq!(layout.residual_chunks(), vec![0..138]);
        assert_eq!(layout.num_elements(), 9);
        assert_eq!(
            layout.entries()[3],
            LayoutEntry {
                label: PublicEntry::Nullifier(0),
                slot: Slot::Bits {
                    head: Some((3, 254)),
                    residual: 130..132,
                },
            }
        );
    }

    #[test]
    fn test_small_capacity_chunks() {
        let layout = PublicInputLayout::new(1, 1, 100).unwrap();
        // 128 + 3 * 156
        assert_eq!(layout.residual_bits(), 596);
        assert_eq!(layout.residual_chunks().len(), 6);
        assert_eq!(layout.residual_chunks()[5], 500..596);
    }

    #[test]
    fn test_decode_rejects_wide_elements() {
        let layout = PublicInputLayout::new(2, 2, 254).unwrap();
        let mut elements = layout.encode(&sample()).unwrap();
        elements[3] = -Fp::ONE;
        assert!(matches!(layout.decode(&elements), Err(Error::ValueOutOfRange(_))));
        assert!(layout.decode(&elements[..8]).is_err());
    }

    #[test]
    fn test_encode_checks_counts() {
        let layout = PublicInputLayout::new(2, 2, 254).unwrap();
        let mut values = sample();
        values.nullifiers.pop();
        assert_eq!(
            layout.encode(&values).unwrap_err(),
            Error::shape("public nullifiers", 2, 1)
        );
    }

    fn sample() -> PublicValues<Fp> {
        PublicValues {
            root: Fp::from(1),
            commitments: vec![Fp::from(2), Fp::from(3)],
            nullifiers: vec![Bits256::from([0xff; 32]), Bits256::from([0x01; 32])],
            h_sig: Bits256::from([0x80; 32]),
            auth_tags: vec![Bits256::from([0x7f; 32]), Bits256::ZERO],
            vpub_in: 5,
            vpub_out: u64::MAX,
        }
    }

    fn arb_bits256() -> impl Strategy<Value = Bits256> {
        any::<[u8; 32]>().prop_map(Bits256::from)
    }

    proptest! {
        #[test]
        fn prop_encode_decode(
            n in 1usize..=4,
            m in 1usize..=4,
            capacity in prop_oneof![Just(254usize), 64usize..=254],
            seed in any::<u64>(),
            digests in prop::collection::vec(arb_bits256(), 9),
            vpub_in in any::<u64>(),
            vpub_out in any::<u64>(),
        ) {
            let layout = PublicInputLayout::new(n, m, capacity).unwrap();
            let values = PublicValues {
                root: Fp::from(seed),
                commitments: (0..m).map(|j| Fp::from(seed ^ j as u64)).collect(),
                nullifiers: digests[..n].to_vec(),
                h_sig: digests[8],
                auth_tags: digests[4..4 + n].to_vec(),
                vpub_in,
                vpub_out,
            };
            let elements = layout.encode(&values).unwrap();
            prop_assert_eq!(elements.len(), layout.num_elements());
            prop_assert_eq!(layout.decode(&elements).unwrap(), values);
        }
    }
}
