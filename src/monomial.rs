//! Monomials and monomial orders (§3.4, §6.3)
//!
//! Grounded on the teacher's `core::polynomial::sparse_polynomial::monomial`
//! (`Monomial` with `Vec<usize>` exponents and an order-parameterised
//! `cmp`), generalised to `u32` exponents and extended with the
//! `degrevlex` order §3.4 names alongside `lex`/`deglex` (the teacher
//! already had all three under the names `Lex`/`Grlex`/`Grevlex`).
//!
//! The original packs exponent vectors into machine words (§6.3,
//! `words_per_exp`) purely for cache locality; this reimplementation
//! keeps an explicit `Vec<u32>` per monomial, which is the idiomatic
//! Rust representation the teacher itself already uses for this layer —
//! see DESIGN.md for the packing-vs-vector tradeoff.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Monomial order, matching §3.4's `lex, deglex, degrevlex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonomialOrder {
    Lex,
    DegLex,
    DegRevLex,
}

/// An exponent vector over `n` variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Monomial {
    exponents: Vec<u32>,
}

impl Monomial {
    pub fn new(exponents: Vec<u32>) -> Self {
        Self { exponents }
    }

    pub fn constant(num_vars: usize) -> Self {
        Self { exponents: vec![0; num_vars] }
    }

    pub fn num_vars(&self) -> usize {
        self.exponents.len()
    }

    pub fn exponents(&self) -> &[u32] {
        &self.exponents
    }

    pub fn total_degree(&self) -> u32 {
        self.exponents.iter().sum()
    }

    pub fn is_constant(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.num_vars(), other.num_vars());
        Self { exponents: self.exponents.iter().zip(&other.exponents).map(|(a, b)| a + b).collect() }
    }

    /// Componentwise minimum, used for monomial-GCD of single-term
    /// inputs (§4.4 step 2).
    pub fn componentwise_min(&self, other: &Self) -> Self {
        Self { exponents: self.exponents.iter().zip(&other.exponents).map(|(&a, &b)| a.min(b)).collect() }
    }

    /// `Some(quotient)` iff `other` divides `self` exponentwise.
    pub fn try_divide(&self, other: &Self) -> Option<Self> {
        let mut out = Vec::with_capacity(self.num_vars());
        for (&a, &b) in self.exponents.iter().zip(&other.exponents) {
            if a < b {
                return None;
            }
            out.push(a - b);
        }
        Some(Self { exponents: out })
    }

    pub fn cmp_order(&self, other: &Self, order: MonomialOrder) -> Ordering {
        debug_assert_eq!(self.num_vars(), other.num_vars());
        match order {
            MonomialOrder::Lex => cmp_lex(&self.exponents, &other.exponents),
            MonomialOrder::DegLex => cmp_deglex(&self.exponents, &other.exponents),
            MonomialOrder::DegRevLex => cmp_degrevlex(&self.exponents, &other.exponents),
        }
    }
}

fn cmp_lex(a: &[u32], b: &[u32]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

fn cmp_deglex(a: &[u32], b: &[u32]) -> Ordering {
    let da: u32 = a.iter().sum();
    let db: u32 = b.iter().sum();
    match da.cmp(&db) {
        Ordering::Equal => cmp_lex(a, b),
        other => other,
    }
}

/// Degree-reverse-lex: equal total degree is broken by the rightmost
/// variable where the two exponent vectors differ, and `a` is the
/// *greater* monomial exactly when its exponent there is the *smaller*
/// one (Cox-Little-O'Shea's "rightmost nonzero entry of `a - b` is
/// negative"). E.g. with `x` at index 0 and `y` at index 1: `x^2=(2,0)`
/// beats `xy=(1,1)` beats `y^2=(0,2)`, matching the textbook chain
/// `x^2 > xy > y^2`.
fn cmp_degrevlex(a: &[u32], b: &[u32]) -> Ordering {
    let da: u32 = a.iter().sum();
    let db: u32 = b.iter().sum();
    match da.cmp(&db) {
        Ordering::Equal => {
            for (x, y) in a.iter().zip(b).rev() {
                match y.cmp(x) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            Ordering::Equal
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_compares_leftmost_exponent_first() {
        let a = Monomial::new(vec![2, 0]);
        let b = Monomial::new(vec![1, 5]);
        assert_eq!(a.cmp_order(&b, MonomialOrder::Lex), Ordering::Greater);
    }

    #[test]
    fn deglex_prefers_total_degree_over_lex() {
        let a = Monomial::new(vec![1, 0]);
        let b = Monomial::new(vec![0, 2]);
        assert_eq!(a.cmp_order(&b, MonomialOrder::DegLex), Ordering::Less);
    }

    #[test]
    fn degrevlex_breaks_degree_ties_in_reverse() {
        // x^2=(2,0) > xy=(1,1) > y^2=(0,2): the standard textbook chain
        // (Cox-Little-O'Shea), with `x` at index 0 and `y` at index 1.
        let xy = Monomial::new(vec![1, 1]);
        let x2 = Monomial::new(vec![2, 0]);
        assert_eq!(xy.cmp_order(&x2, MonomialOrder::DegRevLex), Ordering::Less);

        let y2 = Monomial::new(vec![0, 2]);
        assert_eq!(xy.cmp_order(&y2, MonomialOrder::DegRevLex), Ordering::Greater);
    }

    #[test]
    fn degrevlex_three_variable_tie_break() {
        // Degree-2 tie in 3 variables: rightmost differing exponent
        // decides, smaller exponent there wins. a=(0,1,1), b=(1,0,1):
        // first difference scanning from the last variable is at index 1
        // (1 vs 0), so a < b.
        let a = Monomial::new(vec![0, 1, 1]);
        let b = Monomial::new(vec![1, 0, 1]);
        assert_eq!(a.cmp_order(&b, MonomialOrder::DegRevLex), Ordering::Less);
    }

    #[test]
    fn try_divide_fails_on_negative_result() {
        let a = Monomial::new(vec![1, 0]);
        let b = Monomial::new(vec![0, 1]);
        assert!(a.try_divide(&b).is_none());
    }

    #[test]
    fn componentwise_min_matches_monomial_gcd() {
        let a = Monomial::new(vec![3, 1]);
        let b = Monomial::new(vec![1, 4]);
        assert_eq!(a.componentwise_min(&b), Monomial::new(vec![1, 1]));
    }

    #[test]
    fn monomial_round_trips_through_json() {
        let m = Monomial::new(vec![3, 0, 2]);
        let json = serde_json::to_string(&m).unwrap();
        let back: Monomial = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
