//! circuit dimensions and their bounds

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// upper bound on spent notes per joinsplit
pub const MAX_JS_INPUTS: usize = 4;
/// upper bound on created notes per joinsplit
pub const MAX_JS_OUTPUTS: usize = 4;
/// upper bound on the note commitment tree depth
pub const MAX_TREE_DEPTH: usize = 32;

pub const ZETH_NUM_JS_INPUTS: usize = 2;
pub const ZETH_NUM_JS_OUTPUTS: usize = 2;
pub const ZETH_MERKLE_TREE_DEPTH: usize = 32;

/// bit length of note values and public values
pub const VALUE_BITS: usize = 64;
/// bit length of digests, keys, rho, phi, h_sig and trapdoors
pub const DIGEST_BITS: usize = 256;

/// bits used to write a note index into the auth-tag and rho prf tags
pub const fn index_bits(n: usize) -> usize {
    let mut bits = 1;
    while (1usize << bits) < n {
        bits += 1;
    }
    bits
}

/// rejects a tree depth outside `1..=MAX_TREE_DEPTH`
pub fn check_tree_depth(depth: usize) -> Result<()> {
    if depth == 0 || depth > MAX_TREE_DEPTH {
        return Err(Error::InvalidParams(format!(
            "tree depth {depth} outside 1..={MAX_TREE_DEPTH}"
        )));
    }
    Ok(())
}

/// runtime description of a compiled circuit's dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitParams {
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub tree_depth: usize,
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self::zeth()
    }
}

impl CircuitParams {
    /// 2 inputs, 2 outputs, depth 32
    pub const fn zeth() -> Self {
        Self {
            num_inputs: ZETH_NUM_JS_INPUTS,
            num_outputs: ZETH_NUM_JS_OUTPUTS,
            tree_depth: ZETH_MERKLE_TREE_DEPTH,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.num_inputs >= 1
            && self.num_inputs <= MAX_JS_INPUTS
            && self.num_outputs >= 1
            && self.num_outputs <= MAX_JS_OUTPUTS
            && self.tree_depth >= 1
            && self.tree_depth <= MAX_TREE_DEPTH
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_inputs == 0 || self.num_inputs > MAX_JS_INPUTS {
            return Err(Error::InvalidParams(format!(
                "num_inputs {} outside 1..={MAX_JS_INPUTS}",
                self.num_inputs
            )));
        }
        if self.num_outputs == 0 || self.num_outputs > MAX_JS_OUTPUTS {
            return Err(Error::InvalidParams(format!(
                "num_outputs {} outside 1..={MAX_JS_OUTPUTS}",
                self.num_outputs
            )));
        }
        check_tree_depth(self.tree_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_bits() {
        assert_eq!(index_bits(1), 1);
        assert_eq!(index_bits(2), 1);
        assert_eq!(index_bits(3), 2);
        assert_eq!(index_bits(4), 2);
        assert_eq!(index_bits(5), 3);
    }

    #[test]
    fn test_validate() {
        assert!(CircuitParams::zeth().validate().is_ok());
        assert!(CircuitParams::zeth().is_valid());

        let too_many = CircuitParams { num_inputs: MAX_JS_INPUTS + 1, ..CircuitParams::zeth() };
        assert!(matches!(too_many.validate(), Err(Error::InvalidParams(_))));
        assert!(!too_many.is_valid());

        let no_outputs = CircuitParams { num_outputs: 0, ..CircuitParams::zeth() };
        assert!(no_outputs.validate().is_err());

        let deep = CircuitParams { tree_depth: 33, ..CircuitParams::zeth() };
        assert!(deep.validate().is_err());
    }

    #[test]
    fn test_check_tree_depth() {
        assert!(check_tree_depth(1).is_ok());
        assert!(check_tree_depth(MAX_TREE_DEPTH).is_ok());
        for depth in [0, MAX_TREE_DEPTH + 1, 65, usize::MAX] {
            assert!(matches!(check_tree_depth(depth), Err(Error::InvalidParams(_))), "{depth}");
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&CircuitParams::zeth()).unwrap();
        assert_eq!(json, r#"{"num_inputs":2,"num_outputs":2,"tree_depth":32}"#);
        let back: CircuitParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CircuitParams::zeth());
    }
}
