//! plaintext values fed to the circuit

use std::fmt;
use std::str::FromStr;

use ff::PrimeField;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field;
use crate::params::DIGEST_BITS;

/// 256-bit string: keys, rho, phi, h_sig, trapdoors and digests.
/// serialized as lowercase hex
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bits256([u8; 32]);

impl Bits256 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// big-endian bits, msb of byte 0 first
    pub fn to_bits(&self) -> Vec<bool> {
        field::bytes_to_bits(&self.0)
    }

    pub fn from_bits(bits: &[bool]) -> Result<Self> {
        if bits.len() != DIGEST_BITS {
            return Err(Error::shape("bits256", DIGEST_BITS, bits.len()));
        }
        let bytes = field::bits_to_bytes(bits)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// big-endian integer mod p
    pub fn to_field<F: PrimeField>(&self) -> F {
        field::from_be_bytes_mod(&self.0)
    }
}

impl From<[u8; 32]> for Bits256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Bits256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Bits256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits256({self})")
    }
}

impl FromStr for Bits256 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }
}

impl TryFrom<String> for Bits256 {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Bits256> for String {
    fn from(bits: Bits256) -> Self {
        bits.to_string()
    }
}

/// shielded note plaintext
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// recipient address key
    pub a_pk: Bits256,
    pub value: u64,
    /// nullifier seed
    pub rho: Bits256,
    /// commitment trapdoor
    pub r: Bits256,
}

impl Note {
    /// `r || a_pk || rho || value_be64`, the commitment preimage
    pub fn commitment_preimage(&self) -> [u8; 104] {
        let mut out = [0u8; 104];
        out[..32].copy_from_slice(self.r.as_bytes());
        out[32..64].copy_from_slice(self.a_pk.as_bytes());
        out[64..96].copy_from_slice(self.rho.as_bytes());
        out[96..].copy_from_slice(&self.value.to_be_bytes());
        out
    }

    /// zero-value note with random rho and trapdoor
    pub fn dummy<R: RngCore + ?Sized>(a_pk: Bits256, rng: &mut R) -> Self {
        Self {
            a_pk,
            value: 0,
            rho: Bits256::random(rng),
            r: Bits256::random(rng),
        }
    }
}
