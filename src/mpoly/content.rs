//! Content extraction (§4.8 step 1: "divide out the content with respect
//! to each variable before factoring/gcd-ing the primitive part").
//!
//! Grounded on the teacher's `sparse_polynomial::polynomial` gcd path,
//! which already peels a greatest common monomial factor before running
//! Euclidean elimination; generalised here to a genuine polynomial
//! content (the gcd of all coefficients when the polynomial is viewed as
//! univariate in one variable over the remaining ones).

use super::{Mpoly, MpolyCtx};
use crate::monomial::Monomial;
use crate::nmod::Nmod;
use std::rc::Rc;

impl Mpoly {
    /// The content of `self` with respect to `var`: the GCD, over
    /// `Fp` (a field), of... well, over a field every nonzero scalar is
    /// a unit, so the only nontrivial "content" a field-coefficient
    /// polynomial can carry with respect to one variable is its common
    /// monomial factor in the *other* variables. This returns that
    /// common factor, i.e. `gcd` of the terms' projections onto the
    /// non-`var` exponents, represented as a single-term `Mpoly`.
    pub fn content_except(&self, var: usize) -> Mpoly {
        if self.is_zero() {
            return self.clone();
        }
        let mut min_exp: Option<Monomial> = None;
        for (m, _) in self.terms() {
            let mut projected = m.exponents().to_vec();
            projected[var] = 0;
            let projected = Monomial::new(projected);
            min_exp = Some(match min_exp {
                None => projected,
                Some(acc) => acc.componentwise_min(&projected),
            });
        }
        let mono = min_exp.unwrap_or_else(|| Monomial::constant(self.ctx().num_vars));
        Mpoly::from_term(self.ctx().clone(), mono, Nmod::new(1, self.ctx().modulus))
    }

    /// Divide out a monomial content, returning the primitive part.
    /// Panics if `content` does not exactly divide every term (an
    /// invariant violation, §7 — callers only ever pass a content they
    /// just computed from `self`).
    pub fn divide_by_monomial(&self, content: &Monomial) -> Mpoly {
        let terms = self
            .terms()
            .iter()
            .map(|(m, c)| {
                let q = m.try_divide(content).expect("content must divide every term");
                (q, *c)
            })
            .collect();
        Mpoly::from_terms(self.ctx().clone(), terms)
    }

    /// Overall greatest common monomial factor across every variable at
    /// once (used to strip "trivial" shared factors before dispatching
    /// into the GCD algorithms proper, §4.4's monomial-gcd fast path).
    pub fn monomial_content(&self) -> Monomial {
        let mut acc: Option<Monomial> = None;
        for (m, _) in self.terms() {
            acc = Some(match acc {
                None => m.clone(),
                Some(a) => a.componentwise_min(m),
            });
        }
        acc.unwrap_or_else(|| Monomial::constant(self.ctx().num_vars))
    }

    /// Makes the polynomial monic with respect to its monomial order's
    /// leading coefficient (normalises an associate, analogous to
    /// `NmodPoly::make_monic`, since `Fp` is a field and every nonzero
    /// scalar is a unit).
    pub fn make_monic(&self) -> Option<Mpoly> {
        let (_, lc) = self.leading_term()?;
        let inv = lc.inverse().ok()?;
        Some(self.scalar_mul(inv))
    }
}

pub fn context_dropping(ctx: &Rc<MpolyCtx>, var: usize) -> Rc<MpolyCtx> {
    Rc::new(MpolyCtx::new(ctx.num_vars - 1, ctx.order, ctx.modulus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpoly::Mpoly;
    use crate::monomial::MonomialOrder;

    fn ctx() -> Rc<MpolyCtx> {
        Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, 101))
    }

    #[test]
    fn monomial_content_extracts_shared_power_of_a_variable() {
        let c = ctx();
        // f = x^2*y + x^2*y^2  -> shared factor x^2*y
        let f = Mpoly::from_terms(
            c.clone(),
            vec![
                (Monomial::new(vec![2, 1]), Nmod::new(1, 101)),
                (Monomial::new(vec![2, 2]), Nmod::new(1, 101)),
            ],
        );
        let content = f.monomial_content();
        assert_eq!(content, Monomial::new(vec![2, 1]));
        let primitive = f.divide_by_monomial(&content);
        assert!(primitive.terms().iter().any(|(m, _)| m.exponents() == &[0, 0]));
    }

    #[test]
    fn make_monic_normalises_leading_coefficient_to_one() {
        let c = ctx();
        let f = Mpoly::from_term(c, Monomial::new(vec![1, 0]), Nmod::new(7, 101));
        let monic = f.make_monic().unwrap();
        assert_eq!(monic.leading_term().unwrap().1.value(), 1);
    }
}
