//! blake2s prfs over one 512-bit block `x ‖ y`
//!
//! `x` opens with a constant tag, so the leading bits of the first message
//! words fold away. bit layouts match `native::prf`.

use ff::PrimeField;

use crate::constraint::ConstraintSystem;
use crate::error::{Error, Result};
use crate::gadgets::blake2s::Blake2s;
use crate::gadgets::boolean::Bit;
use crate::gadgets::Gadget;
use crate::native::prf::{indexed_tag, tagged, ADDR_TAG, NF_TAG, PK_SUFFIX, RHO_SUFFIX};
use crate::params::DIGEST_BITS;

#[derive(Debug, Clone)]
pub struct Prf {
    hash: Blake2s,
}

impl Prf {
    fn check(what: &'static str, bits: &[Bit]) -> Result<()> {
        if bits.len() != DIGEST_BITS {
            return Err(Error::shape(what, DIGEST_BITS, bits.len()));
        }
        Ok(())
    }

    fn block<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        tag: &[bool],
        secret: &[Bit],
        y: &[Bit],
    ) -> Result<Self> {
        let mut input = tagged(&Bit::constants(tag), secret);
        input.extend_from_slice(y);
        Ok(Self {
            hash: Blake2s::new(cs, &input)?,
        })
    }

    /// a_pk = blake2s(1100 ‖ a_sk[..252] ‖ 0^256)
    pub fn addr<F: PrimeField>(cs: &mut ConstraintSystem<F>, a_sk: &[Bit]) -> Result<Self> {
        Self::check("prf addr a_sk", a_sk)?;
        Self::block(cs, &ADDR_TAG, a_sk, &[Bit::Constant(false); DIGEST_BITS])
    }

    /// nf = blake2s(1110 ‖ a_sk[..252] ‖ rho)
    pub fn nullifier<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        a_sk: &[Bit],
        rho: &[Bit],
    ) -> Result<Self> {
        Self::check("prf nf a_sk", a_sk)?;
        Self::check("prf nf rho", rho)?;
        Self::block(cs, &NF_TAG, a_sk, rho)
    }

    /// h_i = blake2s(0 ‖ i ‖ 00 ‖ a_sk[..253 - w] ‖ h_sig)
    pub fn auth_tag<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        a_sk: &[Bit],
        h_sig: &[Bit],
        index: usize,
        index_bits: usize,
    ) -> Result<Self> {
        Self::check("prf pk a_sk", a_sk)?;
        Self::check("prf pk h_sig", h_sig)?;
        let tag = indexed_tag(index, index_bits, PK_SUFFIX)?;
        Self::block(cs, &tag, a_sk, h_sig)
    }

    /// rho_i = blake2s(0 ‖ i ‖ 10 ‖ phi[..253 - w] ‖ h_sig)
    pub fn rho<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        phi: &[Bit],
        h_sig: &[Bit],
        index: usize,
        index_bits: usize,
    ) -> Result<Self> {
        Self::check("prf rho phi", phi)?;
        Self::check("prf rho h_sig", h_sig)?;
        let tag = indexed_tag(index, index_bits, RHO_SUFFIX)?;
        Self::block(cs, &tag, phi, h_sig)
    }

    /// 256 output bits, msb first
    pub fn output(&self) -> &[Bit] {
        self.hash.digest()
    }
}

impl<F: PrimeField> Gadget<F> for Prf {
    type Witness = ();

    fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) {
        cs.namespace("prf", |cs| self.hash.generate_constraints(cs));
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<F>, _: &()) -> Result<()> {
        self.hash.generate_witness(cs, &())
    }
}
