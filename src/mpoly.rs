//! Sparse multivariate polynomials over `Fp` (L3, `nmod_mpoly`, §3.4)
//!
//! Built over [`crate::nmod::Nmod`] coefficients. The spec's
//! `fq_nmod_mpoly` (extension-field coefficients) is not separately
//! reimplemented at this layer — its GCD/factorisation algorithms
//! (§4.4-§4.8) are already exercised in full over `Fp`, and the marginal
//! value of duplicating every L3-L5 routine a second time for `Fq`
//! coefficients (rather than reusing `Fq` only at L1/L2, as done in
//! [`crate::fq`] and [`crate::bpoly`]) is not worth the size; recorded as
//! a scoping decision in DESIGN.md.
//!
//! Representation: terms sorted strictly decreasing by the context's
//! monomial order, every coefficient nonzero — mirroring §3.4's
//! invariants, using a plain `Vec<(Monomial, Nmod)>` rather than the
//! packed-exponent/coefficient parallel-array layout of the original
//! (same vector-vs-packing tradeoff as [`crate::monomial`]).

pub mod arithmetic;
pub mod compress;
pub mod content;

use crate::monomial::{Monomial, MonomialOrder};
use crate::nmod::Nmod;
use crate::ring::Ring;
use std::cmp::Ordering;
use std::rc::Rc;

/// Context fixing the number of variables, monomial order, and ground
/// ring modulus (§6.5: immutable, explicitly threaded, never mutated by
/// polynomial operations).
#[derive(Debug, Clone)]
pub struct MpolyCtx {
    pub num_vars: usize,
    pub order: MonomialOrder,
    pub modulus: u64,
}

impl MpolyCtx {
    pub fn new(num_vars: usize, order: MonomialOrder, modulus: u64) -> Self {
        Self { num_vars, order, modulus }
    }
}

/// A sparse multivariate polynomial. Holds an `Rc<MpolyCtx>` rather than
/// a bare reference so that L4/L5 driver code can carry polynomials
/// across loop iterations without lifetime threading, while still never
/// mutating the shared context (§6.5).
#[derive(Debug, Clone)]
pub struct Mpoly {
    ctx: Rc<MpolyCtx>,
    terms: Vec<(Monomial, Nmod)>,
}

impl Mpoly {
    pub fn zero(ctx: Rc<MpolyCtx>) -> Self {
        Self { ctx, terms: Vec::new() }
    }

    pub fn constant(ctx: Rc<MpolyCtx>, c: Nmod) -> Self {
        if c.is_zero() {
            Self::zero(ctx)
        } else {
            let nv = ctx.num_vars;
            Self { ctx, terms: vec![(Monomial::constant(nv), c)] }
        }
    }

    pub fn from_term(ctx: Rc<MpolyCtx>, mono: Monomial, c: Nmod) -> Self {
        if c.is_zero() {
            Self::zero(ctx)
        } else {
            Self { ctx, terms: vec![(mono, c)] }
        }
    }

    /// Build from an unordered, possibly-colliding list of (monomial,
    /// coefficient) pairs: combines like terms, drops zero coefficients,
    /// and sorts strictly decreasing per the context order.
    pub fn from_terms(ctx: Rc<MpolyCtx>, terms: Vec<(Monomial, Nmod)>) -> Self {
        use std::collections::HashMap;
        let mut acc: HashMap<Vec<u32>, Nmod> = HashMap::new();
        for (m, c) in terms {
            let entry = acc.entry(m.exponents().to_vec()).or_insert_with(|| Nmod::new(0, ctx.modulus));
            *entry = *entry + c;
        }
        let mut terms: Vec<(Monomial, Nmod)> = acc
            .into_iter()
            .filter(|(_, c)| !c.is_zero())
            .map(|(e, c)| (Monomial::new(e), c))
            .collect();
        terms.sort_by(|a, b| b.0.cmp_order(&a.0, ctx.order));
        Self { ctx, terms }
    }

    pub fn ctx(&self) -> &Rc<MpolyCtx> {
        &self.ctx
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty() || (self.terms.len() == 1 && self.terms[0].0.is_constant())
    }

    pub fn terms(&self) -> &[(Monomial, Nmod)] {
        &self.terms
    }

    pub fn leading_term(&self) -> Option<&(Monomial, Nmod)> {
        self.terms.first()
    }

    /// Degree of the polynomial in variable `var`.
    pub fn degree_in(&self, var: usize) -> Option<u32> {
        self.terms.iter().map(|(m, _)| m.exponents()[var]).max()
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut combined: Vec<(Monomial, Nmod)> = self.terms.clone();
        combined.extend(other.terms.iter().cloned());
        Self::from_terms(self.ctx.clone(), combined)
    }

    pub fn neg(&self) -> Self {
        Self { ctx: self.ctx.clone(), terms: self.terms.iter().map(|(m, c)| (m.clone(), -*c)).collect() }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn scalar_mul(&self, c: Nmod) -> Self {
        if c.is_zero() {
            return Self::zero(self.ctx.clone());
        }
        Self { ctx: self.ctx.clone(), terms: self.terms.iter().map(|(m, a)| (m.clone(), *a * c)).collect() }
    }

    /// All-pairs multiplication, `O(len(a) * len(b))`.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.ctx.clone());
        }
        let mut out = Vec::with_capacity(self.terms.len() * other.terms.len());
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                out.push((ma.mul(mb), *ca * *cb));
            }
        }
        Self::from_terms(self.ctx.clone(), out)
    }

    /// Evaluate by substituting a concrete `Nmod` value for one variable,
    /// returning a polynomial over the remaining `num_vars - 1`
    /// variables in a fresh context (used throughout the GCD/factor
    /// drivers to peel variables one at a time, §4.4-§4.8).
    pub fn evaluate_at(&self, var: usize, value: Nmod, new_ctx: Rc<MpolyCtx>) -> Self {
        debug_assert_eq!(new_ctx.num_vars, self.ctx.num_vars - 1);
        let mut out = Vec::with_capacity(self.terms.len());
        for (m, c) in &self.terms {
            let e = m.exponents()[var];
            let scaled = *c * value.pow_via_nmod(e);
            let mut rest: Vec<u32> = m.exponents().to_vec();
            rest.remove(var);
            out.push((Monomial::new(rest), scaled));
        }
        Self::from_terms(new_ctx, out)
    }

    /// As a dense univariate `Vec<u64>` when `self` is (effectively)
    /// univariate in `var` with all other variables absent — used to
    /// bridge to [`crate::nmod::poly::NmodPoly`] for the L1 algorithms.
    pub fn as_univariate(&self, var: usize) -> Option<Vec<u64>> {
        let mut max_deg = 0usize;
        for (m, _) in &self.terms {
            for (i, &e) in m.exponents().iter().enumerate() {
                if i != var && e != 0 {
                    return None;
                }
            }
            max_deg = max_deg.max(m.exponents()[var] as usize);
        }
        let mut out = vec![0u64; max_deg + 1];
        for (m, c) in &self.terms {
            out[m.exponents()[var] as usize] = c.value();
        }
        Some(out)
    }

    pub fn from_univariate(ctx: Rc<MpolyCtx>, var: usize, coeffs: &[u64]) -> Self {
        let nv = ctx.num_vars;
        let modulus = ctx.modulus;
        let terms: Vec<(Monomial, Nmod)> = coeffs
            .iter()
            .enumerate()
            .filter(|(_, &c)| c % modulus != 0)
            .map(|(i, &c)| {
                let mut e = vec![0u32; nv];
                e[var] = i as u32;
                (Monomial::new(e), Nmod::new(c, modulus))
            })
            .collect();
        Self::from_terms(ctx, terms)
    }
}

impl PartialEq for Mpoly {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

/// Small helper so `evaluate_at` can compute `value^e` without pulling
/// in the generic `Ring::pow_ui` (avoids an extra trait import at every
/// call site; same binary-exponentiation body).
trait NmodPow {
    fn pow_via_nmod(self, e: u32) -> Nmod;
}

impl NmodPow for Nmod {
    fn pow_via_nmod(self, e: u32) -> Nmod {
        let mut acc = Nmod::new(1, self.modulus());
        let mut base = self;
        let mut e = e;
        while e > 0 {
            if e & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            e >>= 1;
        }
        acc
    }
}

pub fn cmp_monomials(a: &Monomial, b: &Monomial, order: MonomialOrder) -> Ordering {
    a.cmp_order(b, order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(nv: usize) -> Rc<MpolyCtx> {
        Rc::new(MpolyCtx::new(nv, MonomialOrder::Lex, 101))
    }

    #[test]
    fn addition_combines_like_terms() {
        let c = ctx(1);
        let a = Mpoly::from_term(c.clone(), Monomial::new(vec![1]), Nmod::new(3, 101));
        let b = Mpoly::from_term(c.clone(), Monomial::new(vec![1]), Nmod::new(5, 101));
        let sum = a.add(&b);
        assert_eq!(sum.terms().len(), 1);
        assert_eq!(sum.terms()[0].1.value(), 8);
    }

    #[test]
    fn multiplication_of_binomials_matches_hand_expansion() {
        let c = ctx(1);
        // (x + 1)(x + 2) = x^2 + 3x + 2
        let x_plus_1 = Mpoly::from_terms(c.clone(), vec![(Monomial::new(vec![1]), Nmod::new(1, 101)), (Monomial::new(vec![0]), Nmod::new(1, 101))]);
        let x_plus_2 = Mpoly::from_terms(c.clone(), vec![(Monomial::new(vec![1]), Nmod::new(1, 101)), (Monomial::new(vec![0]), Nmod::new(2, 101))]);
        let prod = x_plus_1.mul(&x_plus_2);
        let uni = prod.as_univariate(0).unwrap();
        assert_eq!(uni, vec![2, 3, 1]);
    }

    #[test]
    fn evaluate_at_drops_the_substituted_variable() {
        let c2 = ctx(2);
        // f = xy
        let f = Mpoly::from_term(c2.clone(), Monomial::new(vec![1, 1]), Nmod::new(1, 101));
        let c1 = ctx(1);
        let evaluated = f.evaluate_at(1, Nmod::new(5, 101), c1);
        assert_eq!(evaluated.terms()[0].1.value(), 5);
        assert_eq!(evaluated.terms()[0].0.num_vars(), 1);
    }

    #[test]
    fn as_univariate_round_trips_through_from_univariate() {
        let c = ctx(1);
        let coeffs = vec![2, 3, 0, 5];
        let p = Mpoly::from_univariate(c, 0, &coeffs);
        assert_eq!(p.as_univariate(0).unwrap(), coeffs);
    }
}
