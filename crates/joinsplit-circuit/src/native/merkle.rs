//! in-memory append-only commitment tree over mimc mp
//!
//! empty leaves are zero and an empty subtree hashes to
//! `empty[l + 1] = mp(empty[l], empty[l])`. only the occupied prefix of each
//! level is materialised.

use std::marker::PhantomData;

use ff::PrimeField;

use crate::error::{Error, Result};
use crate::gadgets::mimc::MimcParams;
use crate::native::mimc::mp;
use crate::params::check_tree_depth;

#[derive(Debug, Clone)]
pub struct MerkleTree<F, P> {
    depth: usize,
    leaves: Vec<F>,
    /// empty subtree root per level, leaf level first
    empty: Vec<F>,
    _params: PhantomData<P>,
}

impl<F: PrimeField, P: MimcParams> MerkleTree<F, P> {
    pub fn new(depth: usize) -> Result<Self> {
        check_tree_depth(depth)?;
        let mut empty = Vec::with_capacity(depth + 1);
        empty.push(F::ZERO);
        for level in 0..depth {
            empty.push(mp::<F, P>(empty[level], empty[level]));
        }
        Ok(Self {
            depth,
            leaves: Vec::new(),
            empty,
            _params: PhantomData,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// append a leaf, returning its address
    pub fn insert(&mut self, leaf: F) -> Result<u64> {
        if self.leaves.len() as u64 >= 1u64 << self.depth {
            return Err(Error::ValueOutOfRange(format!(
                "tree of depth {} is full",
                self.depth
            )));
        }
        self.leaves.push(leaf);
        Ok(self.leaves.len() as u64 - 1)
    }

    pub fn leaf(&self, address: u64) -> Option<F> {
        usize::try_from(address).ok().and_then(|i| self.leaves.get(i).copied())
    }

    pub fn root(&self) -> F {
        let mut layer = self.leaves.clone();
        for level in 0..self.depth {
            layer = self.parents(&layer, level);
        }
        layer.first().copied().unwrap_or(self.empty[self.depth])
    }

    /// siblings of `address` from the leaf level up
    pub fn path(&self, address: u64) -> Result<Vec<F>> {
        if address >= 1u64 << self.depth {
            return Err(Error::ValueOutOfRange(format!(
                "address {address} outside a tree of depth {}",
                self.depth
            )));
        }
        let mut index = address as usize;
        let mut layer = self.leaves.clone();
        let mut path = Vec::with_capacity(self.depth);
        for level in 0..self.depth {
            path.push(layer.get(index ^ 1).copied().unwrap_or(self.empty[level]));
            layer = self.parents(&layer, level);
            index >>= 1;
        }
        Ok(path)
    }

    fn parents(&self, layer: &[F], level: usize) -> Vec<F> {
        layer
            .chunks(2)
            .map(|pair| {
                let right = pair.get(1).copied().unwrap_or(self.empty[level]);
                mp::<F, P>(pair[0], right)
            })
            .collect()
    }
}

/// root reached from `leaf` at `address` along `path` (leaf level first)
pub fn compute_root<F: PrimeField, P: MimcParams>(leaf: F, address: u64, path: &[F]) -> F {
    path.iter().enumerate().fold(leaf, |node, (level, sibling)| {
        if (address >> level) & 1 == 1 {
            mp::<F, P>(*sibling, node)
        } else {
            mp::<F, P>(node, *sibling)
        }
    })
}
