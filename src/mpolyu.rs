//! Univariate-in-one-variable wrappers over `Mpoly` coefficients
//! (L4, `mpolyu`/`mpolyv`, §3.5)
//!
//! Views a multivariate polynomial as dense-in-its-degree-range or
//! sparse-in-its-degree-range univariate in a single "main" variable,
//! with `Mpoly` coefficients drawn from the remaining variables. The
//! Brown and Zippel GCD drivers (§4.3-§4.5) build these to peel the
//! outermost variable off a multivariate problem and recurse on the
//! coefficient ring.

use crate::mpoly::{Mpoly, MpolyCtx};
use crate::monomial::Monomial;
use std::rc::Rc;

/// Sparse univariate-in-`main_var` polynomial: nonzero-degree terms
/// paired with an `Mpoly` coefficient over the remaining variables,
/// sorted by strictly decreasing degree (mirrors `mpolyu`, §3.5).
#[derive(Debug, Clone)]
pub struct Mpolyu {
    main_var: usize,
    /// Context of the *coefficients* (one fewer variable than the
    /// original polynomial this was built from).
    coeff_ctx: Rc<MpolyCtx>,
    terms: Vec<(u32, Mpoly)>,
}

impl Mpolyu {
    pub fn zero(main_var: usize, coeff_ctx: Rc<MpolyCtx>) -> Self {
        Self { main_var, coeff_ctx, terms: Vec::new() }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn main_var(&self) -> usize {
        self.main_var
    }

    pub fn coeff_ctx(&self) -> &Rc<MpolyCtx> {
        &self.coeff_ctx
    }

    pub fn terms(&self) -> &[(u32, Mpoly)] {
        &self.terms
    }

    pub fn degree(&self) -> Option<u32> {
        self.terms.first().map(|(d, _)| *d)
    }

    /// Split a full `Mpoly` into its view as univariate-in-`main_var`,
    /// projecting the remaining variables into a fresh, one-smaller
    /// context (`coeff_ctx`).
    pub fn from_mpoly(f: &Mpoly, main_var: usize) -> Self {
        let orig_ctx = f.ctx();
        let coeff_ctx = Rc::new(MpolyCtx::new(orig_ctx.num_vars - 1, orig_ctx.order, orig_ctx.modulus));
        use std::collections::HashMap;
        let mut buckets: HashMap<u32, Vec<(Monomial, crate::nmod::Nmod)>> = HashMap::new();
        for (m, c) in f.terms() {
            let deg = m.exponents()[main_var];
            let mut rest = m.exponents().to_vec();
            rest.remove(main_var);
            buckets.entry(deg).or_default().push((Monomial::new(rest), *c));
        }
        let mut terms: Vec<(u32, Mpoly)> = buckets
            .into_iter()
            .map(|(deg, ts)| (deg, Mpoly::from_terms(coeff_ctx.clone(), ts)))
            .collect();
        terms.sort_by(|a, b| b.0.cmp(&a.0));
        Self { main_var, coeff_ctx, terms }
    }

    /// Recombine into a full `Mpoly` over `orig_ctx` (one more variable
    /// than `coeff_ctx`).
    pub fn to_mpoly(&self, orig_ctx: Rc<MpolyCtx>) -> Mpoly {
        let mut all_terms = Vec::new();
        for (deg, coeff) in &self.terms {
            for (m, c) in coeff.terms() {
                let mut exps = m.exponents().to_vec();
                exps.insert(self.main_var, *deg);
                all_terms.push((Monomial::new(exps), *c));
            }
        }
        Mpoly::from_terms(orig_ctx, all_terms)
    }

    pub fn leading_coeff(&self) -> Option<&Mpoly> {
        self.terms.first().map(|(_, c)| c)
    }

    /// Evaluate every coefficient's remaining variables are untouched;
    /// this substitutes a concrete value for the main variable itself,
    /// collapsing back to a plain `Mpoly` over `coeff_ctx`.
    pub fn evaluate_main_var(&self, value: crate::nmod::Nmod) -> Mpoly {
        let mut acc = Mpoly::zero(self.coeff_ctx.clone());
        for (deg, coeff) in &self.terms {
            let scalar = pow(value, *deg);
            acc = acc.add(&coeff.scalar_mul(scalar));
        }
        acc
    }
}

fn pow(base: crate::nmod::Nmod, e: u32) -> crate::nmod::Nmod {
    let mut acc = crate::nmod::Nmod::new(1, base.modulus());
    let mut b = base;
    let mut e = e;
    while e > 0 {
        if e & 1 == 1 {
            acc = acc * b;
        }
        b = b * b;
        e >>= 1;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::MonomialOrder;
    use crate::nmod::Nmod;

    #[test]
    fn round_trips_through_from_mpoly_and_to_mpoly() {
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, 101));
        // f = x^2*y + x*y^2 + 3
        let f = Mpoly::from_terms(
            ctx.clone(),
            vec![
                (Monomial::new(vec![2, 1]), Nmod::new(1, 101)),
                (Monomial::new(vec![1, 2]), Nmod::new(1, 101)),
                (Monomial::new(vec![0, 0]), Nmod::new(3, 101)),
            ],
        );
        let u = Mpolyu::from_mpoly(&f, 0);
        let back = u.to_mpoly(ctx);
        assert_eq!(back, f);
    }

    #[test]
    fn evaluate_main_var_matches_mpoly_evaluate_at() {
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, 101));
        let f = Mpoly::from_terms(
            ctx.clone(),
            vec![
                (Monomial::new(vec![2, 1]), Nmod::new(1, 101)),
                (Monomial::new(vec![0, 1]), Nmod::new(2, 101)),
            ],
        );
        let u = Mpolyu::from_mpoly(&f, 0);
        let expected = f.evaluate_at(0, Nmod::new(3, 101), u.coeff_ctx().clone());
        let got = u.evaluate_main_var(Nmod::new(3, 101));
        assert_eq!(got, expected);
    }
}
