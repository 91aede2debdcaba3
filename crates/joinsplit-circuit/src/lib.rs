//! R1CS statement of a shielded joinsplit transfer
//!
//! a prover spending `N` notes and creating `M` notes shows, without
//! revealing which notes, who receives them or how much:
//! - each spent note is in the commitment tree and owned by the prover
//! - its nullifier is correctly derived
//! - value is conserved, including the public in/out amounts
//! - each created note is committed correctly
//!
//! ## layers
//!
//! - `gadgets::binary`: xor and 32-bit addition over known-boolean wires
//! - `gadgets::blake2s`, `gadgets::mimc`: hash compressions
//! - `gadgets::merkle`: selector, path and authenticator over mimc
//! - `gadgets::prf`, `gadgets::commitment`: key, nullifier, tag and
//!   commitment derivations over blake2s
//! - `gadgets::note`: base, input and output notes
//! - `joinsplit`: the statement, `circuit`: build once, assign per transaction
//!
//! every gadget has a native twin in `native`, used to build witnesses.
//! proving and verifying is left to a backend reading `ConstraintSystem`.
//!
//! ## example
//!
//! ```ignore
//! let mut circuit = JoinSplitCircuit::<Fp, MimcE7R91, 2, 2, 32>::new()?;
//! let public = circuit.assign(&witness)?;
//! circuit.check()?;
//! ```

pub mod circuit;
pub mod constraint;
pub mod error;
pub mod field;
pub mod gadgets;
pub mod joinsplit;
pub mod layout;
pub mod native;
pub mod params;
pub mod types;

pub use circuit::{JoinSplitCircuit, ZethCircuit};
pub use constraint::{Constraint, ConstraintSystem, LinearCombination, Variable};
pub use error::{Error, Result};
pub use gadgets::Gadget;
pub use joinsplit::{JoinSplitGadget, JoinSplitWitness};
pub use layout::{PublicInputLayout, PublicValues};
pub use params::CircuitParams;
pub use types::{Bits256, Note};
