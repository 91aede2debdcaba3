//! rank-1 constraint system over a prime field
//!
//! every constraint has the shape A * B = C where A, B and C are linear
//! combinations of variables:
//! - `Variable::One` is the constant wire and always carries 1
//! - public (primary) inputs are allocated before any private (auxiliary)
//!   variable, the order a verification key is built against
//! - variables and constraints are append-only
//!
//! the system also holds the assignment: gadgets write witness values into
//! it during their witness pass and `check` reports the first constraint the
//! assignment violates.

use std::collections::HashMap;
use std::ops::{Add, Sub};

use blake2::{Blake2s256, Digest};
use ff::PrimeField;
use tracing::warn;

use crate::error::{Error, Result};

/// wire index into the assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    /// constant one wire
    One,
    /// public input, in allocation order
    Input(usize),
    /// private witness, in allocation order
    Aux(usize),
}

/// sparse linear combination of variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearCombination<F> {
    terms: Vec<(Variable, F)>,
}

impl<F: PrimeField> Default for LinearCombination<F> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<F: PrimeField> From<Variable> for LinearCombination<F> {
    fn from(var: Variable) -> Self {
        Self::zero() + var
    }
}

impl<F: PrimeField> LinearCombination<F> {
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// `value * ONE`
    pub fn constant(value: F) -> Self {
        if bool::from(value.is_zero()) {
            Self::zero()
        } else {
            Self::zero() + (value, Variable::One)
        }
    }

    pub fn terms(&self) -> &[(Variable, F)] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// multiply every coefficient by `factor`
    pub fn scale(mut self, factor: F) -> Self {
        for (_, coeff) in self.terms.iter_mut() {
            *coeff *= factor;
        }
        self
    }

    /// evaluate against the current assignment
    pub fn evaluate(&self, cs: &ConstraintSystem<F>) -> Result<F> {
        self.terms.iter().try_fold(F::ZERO, |acc, (var, coeff)| {
            Ok(acc + cs.value(*var)? * coeff)
        })
    }
}

impl<F: PrimeField> Add<(F, Variable)> for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, (coeff, var): (F, Variable)) -> Self {
        self.terms.push((var, coeff));
        self
    }
}

impl<F: PrimeField> Sub<(F, Variable)> for LinearCombination<F> {
    type Output = Self;

    fn sub(mut self, (coeff, var): (F, Variable)) -> Self {
        self.terms.push((var, -coeff));
        self
    }
}

impl<F: PrimeField> Add<Variable> for LinearCombination<F> {
    type Output = Self;

    fn add(self, var: Variable) -> Self {
        self + (F::ONE, var)
    }
}

impl<F: PrimeField> Sub<Variable> for LinearCombination<F> {
    type Output = Self;

    fn sub(self, var: Variable) -> Self {
        self - (F::ONE, var)
    }
}

impl<'a, F: PrimeField> Add<&'a LinearCombination<F>> for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, other: &'a LinearCombination<F>) -> Self {
        self.terms.extend_from_slice(&other.terms);
        self
    }
}

impl<'a, F: PrimeField> Sub<&'a LinearCombination<F>> for LinearCombination<F> {
    type Output = Self;

    fn sub(mut self, other: &'a LinearCombination<F>) -> Self {
        self.terms
            .extend(other.terms.iter().map(|(var, coeff)| (*var, -*coeff)));
        self
    }
}

impl<F: PrimeField> Add<LinearCombination<F>> for LinearCombination<F> {
    type Output = Self;

    fn add(self, other: LinearCombination<F>) -> Self {
        self + &other
    }
}

impl<F: PrimeField> Sub<LinearCombination<F>> for LinearCombination<F> {
    type Output = Self;

    fn sub(self, other: LinearCombination<F>) -> Self {
        self - &other
    }
}

/// A * B = C
#[derive(Debug, Clone)]
pub struct Constraint<F> {
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
    namespace: usize,
}

impl<F: PrimeField> Constraint<F> {
    /// check against the assignment, failing on unassigned wires
    pub fn is_satisfied(&self, cs: &ConstraintSystem<F>) -> Result<bool> {
        let a = self.a.evaluate(cs)?;
        let b = self.b.evaluate(cs)?;
        let c = self.c.evaluate(cs)?;
        Ok(a * b == c)
    }
}

/// constraint system plus its (partial) assignment
#[derive(Debug, Clone)]
pub struct ConstraintSystem<F> {
    inputs: Vec<Option<F>>,
    aux: Vec<Option<F>>,
    constraints: Vec<Constraint<F>>,
    /// interned namespace paths, 0 is the root
    namespaces: Vec<String>,
    namespace_ids: HashMap<String, usize>,
    stack: Vec<usize>,
}

impl<F: PrimeField> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> ConstraintSystem<F> {
    pub fn new() -> Self {
        let mut namespace_ids = HashMap::new();
        namespace_ids.insert(String::new(), 0);
        Self {
            inputs: Vec::new(),
            aux: Vec::new(),
            constraints: Vec::new(),
            namespaces: vec![String::new()],
            namespace_ids,
            stack: Vec::new(),
        }
    }

    /// allocate a public input wire
    pub fn alloc_input(&mut self) -> Result<Variable> {
        if !self.aux.is_empty() {
            return Err(Error::PublicAfterPrivate);
        }
        self.inputs.push(None);
        Ok(Variable::Input(self.inputs.len() - 1))
    }

    /// allocate multiple public input wires
    pub fn alloc_inputs(&mut self, n: usize) -> Result<Vec<Variable>> {
        (0..n).map(|_| self.alloc_input()).collect()
    }

    /// allocate a private wire
    pub fn alloc_aux(&mut self) -> Variable {
        self.aux.push(None);
        Variable::Aux(self.aux.len() - 1)
    }

    /// add A * B = C under the current namespace
    pub fn enforce(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
    ) {
        let namespace = self.current_namespace();
        self.constraints.push(Constraint { a, b, c, namespace });
    }

    /// lhs * ONE = rhs
    pub fn enforce_equal(&mut self, lhs: LinearCombination<F>, rhs: LinearCombination<F>) {
        self.enforce(lhs, Variable::One.into(), rhs);
    }

    pub fn set(&mut self, var: Variable, value: F) -> Result<()> {
        let slot = match var {
            Variable::One => return Err(Error::ConstantWire(var)),
            Variable::Input(i) => self.inputs.get_mut(i),
            Variable::Aux(i) => self.aux.get_mut(i),
        };
        match slot {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(Error::Unassigned(var)),
        }
    }

    pub fn value(&self, var: Variable) -> Result<F> {
        let slot = match var {
            Variable::One => return Ok(F::ONE),
            Variable::Input(i) => self.inputs.get(i),
            Variable::Aux(i) => self.aux.get(i),
        };
        slot.copied().flatten().ok_or(Error::Unassigned(var))
    }

    /// forget every assigned value, keeping variables and constraints
    pub fn reset_assignment(&mut self) {
        self.inputs.iter_mut().for_each(|v| *v = None);
        self.aux.iter_mut().for_each(|v| *v = None);
    }

    pub fn push_namespace(&mut self, name: &str) {
        let parent = &self.namespaces[self.current_namespace()];
        let path = if parent.is_empty() {
            name.to_string()
        } else {
            format!("{parent}/{name}")
        };
        let id = match self.namespace_ids.get(&path) {
            Some(&id) => id,
            None => {
                let id = self.namespaces.len();
                self.namespaces.push(path.clone());
                self.namespace_ids.insert(path, id);
                id
            }
        };
        self.stack.push(id);
    }

    pub fn pop_namespace(&mut self) {
        self.stack.pop();
    }

    /// run `f` with `name` pushed onto the namespace path
    pub fn namespace<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push_namespace(name);
        let out = f(self);
        self.pop_namespace();
        out
    }

    fn current_namespace(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    /// number of public inputs, excluding the one wire
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_aux(&self) -> usize {
        self.aux.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    /// namespace path of the gadget that emitted constraint `index`
    pub fn annotation(&self, index: usize) -> Option<&str> {
        self.constraints
            .get(index)
            .map(|c| self.namespaces[c.namespace].as_str())
    }

    /// public inputs in allocation order, excluding the one wire
    pub fn primary_input(&self) -> Result<Vec<F>> {
        (0..self.inputs.len())
            .map(|i| self.value(Variable::Input(i)))
            .collect()
    }

    pub fn auxiliary_input(&self) -> Result<Vec<F>> {
        (0..self.aux.len())
            .map(|i| self.value(Variable::Aux(i)))
            .collect()
    }

    /// index of the first violated constraint, unassigned wires count as violations
    pub fn which_is_unsatisfied(&self) -> Option<usize> {
        self.constraints
            .iter()
            .position(|c| !matches!(c.is_satisfied(self), Ok(true)))
    }

    pub fn is_satisfied(&self) -> bool {
        self.which_is_unsatisfied().is_none()
    }

    /// check every constraint against the assignment
    pub fn check(&self) -> Result<()> {
        for (index, constraint) in self.constraints.iter().enumerate() {
            if !constraint.is_satisfied(self)? {
                let annotation = self.namespaces[constraint.namespace].clone();
                warn!(index, %annotation, "constraint unsatisfied");
                return Err(Error::Unsatisfied { index, annotation });
            }
        }
        Ok(())
    }

    /// blake2s digest of the constraint matrices and public prefix length
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Blake2s256::new();
        hasher.update((self.inputs.len() as u64).to_le_bytes());
        hasher.update((self.aux.len() as u64).to_le_bytes());
        for constraint in &self.constraints {
            for lc in [&constraint.a, &constraint.b, &constraint.c] {
                hasher.update((lc.terms.len() as u64).to_le_bytes());
                for (var, coeff) in &lc.terms {
                    let (tag, index) = match var {
                        Variable::One => (0u8, 0usize),
                        Variable::Input(i) => (1, *i),
                        Variable::Aux(i) => (2, *i),
                    };
                    hasher.update([tag]);
                    hasher.update((index as u64).to_le_bytes());
                    hasher.update(coeff.to_repr().as_ref());
                }
            }
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;
    use pasta_curves::Fp;

    #[test]
    fn test_mul_constraint() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let a = cs.alloc_aux();
        let b = cs.alloc_aux();
        let c = cs.alloc_aux();

        // a * b = c
        cs.enforce(a.into(), b.into(), c.into());

        cs.set(a, Fp::from(6)).unwrap();
        cs.set(b, Fp::from(7)).unwrap();
        cs.set(c, Fp::from(42)).unwrap();
        assert!(cs.is_satisfied());

        cs.set(c, Fp::from(43)).unwrap();
        assert_eq!(cs.which_is_unsatisfied(), Some(0));
    }

    #[test]
    fn test_linear_constraint() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let x = cs.alloc_aux();
        let y = cs.alloc_aux();

        // 3x + 5 = y
        let lhs = LinearCombination::zero() + (Fp::from(3), x) + (Fp::from(5), Variable::One);
        cs.enforce_equal(lhs, y.into());

        cs.set(x, Fp::from(4)).unwrap();
        cs.set(y, Fp::from(17)).unwrap();
        assert!(cs.check().is_ok());

        cs.set(y, Fp::from(18)).unwrap();
        assert!(matches!(cs.check(), Err(Error::Unsatisfied { index: 0, .. })));
    }

    #[test]
    fn test_sub_lc() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let x = cs.alloc_aux();
        cs.set(x, Fp::from(9)).unwrap();

        let lc = LinearCombination::from(x) - &LinearCombination::constant(Fp::from(4));
        assert_eq!(lc.evaluate(&cs).unwrap(), Fp::from(5));
        assert_eq!(lc.scale(Fp::from(2)).evaluate(&cs).unwrap(), Fp::from(10));
        assert!(LinearCombination::<Fp>::constant(Fp::ZERO).is_zero());
    }

    #[test]
    fn test_public_before_private() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let p = cs.alloc_input().unwrap();
        assert_eq!(p, Variable::Input(0));
        let _w = cs.alloc_aux();
        assert_eq!(cs.alloc_input(), Err(Error::PublicAfterPrivate));
        assert_eq!(cs.num_inputs(), 1);
        assert_eq!(cs.num_aux(), 1);
    }

    #[test]
    fn test_unassigned_and_constant_wire() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let a = cs.alloc_aux();
        cs.enforce_equal(a.into(), a.into());

        assert_eq!(cs.value(a), Err(Error::Unassigned(a)));
        assert_eq!(cs.check(), Err(Error::Unassigned(a)));
        assert!(!cs.is_satisfied());
        assert_eq!(cs.set(Variable::One, Fp::ONE), Err(Error::ConstantWire(Variable::One)));
        assert_eq!(cs.value(Variable::One), Ok(Fp::ONE));
    }

    #[test]
    fn test_public_inputs_and_reset() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let p = cs.alloc_inputs(2).unwrap();
        cs.set(p[0], Fp::from(42)).unwrap();
        cs.set(p[1], Fp::from(100)).unwrap();
        assert_eq!(cs.primary_input().unwrap(), vec![Fp::from(42), Fp::from(100)]);

        cs.reset_assignment();
        assert!(cs.primary_input().is_err());
    }

    #[test]
    fn test_namespace_annotation() {
        let mut cs = ConstraintSystem::<Fp>::new();
        let a = cs.alloc_aux();
        cs.namespace("note", |cs| {
            cs.namespace("value", |cs| cs.enforce_equal(a.into(), a.into()));
            cs.enforce_equal(a.into(), a.into());
        });
        cs.enforce_equal(a.into(), a.into());

        assert_eq!(cs.annotation(0), Some("note/value"));
        assert_eq!(cs.annotation(1), Some("note"));
        assert_eq!(cs.annotation(2), Some(""));
        assert_eq!(cs.annotation(3), None);
    }

    #[test]
    fn test_fingerprint() {
        let build = |coeff: u64| {
            let mut cs = ConstraintSystem::<Fp>::new();
            let x = cs.alloc_input().unwrap();
            let y = cs.alloc_aux();
            cs.enforce(x.into(), y.into(), LinearCombination::constant(Fp::from(coeff)));
            cs
        };
        assert_eq!(build(3).fingerprint(), build(3).fingerprint());
        assert_ne!(build(3).fingerprint(), build(4).fingerprint());
    }
}
