//! Multivariate factorisation dispatcher (L5, §4.8)
//!
//! Mirrors `nmod_mpoly_factor`'s own pipeline: strip a monomial content,
//! run squarefree factorisation on what remains, then factor each
//! squarefree piece into irreducibles by dispatching on how many
//! variables it actually depends on — exactly the same "count active
//! variables, pick a strategy" shape [`crate::gcd::choose_strategy`]
//! uses for GCDs.

pub mod squarefree;
pub mod wang;
pub mod zassenhaus;

use crate::bpoly::factor::factor_bivariate;
use crate::error::{PolyError, PolyResult};
use crate::gcd::brown::{from_bpoly, to_bpoly};
use crate::monomial::Monomial;
use crate::mpoly::{Mpoly, MpolyCtx};
use crate::nmod::poly::factor::berlekamp_factor;
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;
use crate::rand::RandState;
use std::rc::Rc;

/// A factored polynomial: an overall scalar unit times a product of
/// irreducible factors raised to their multiplicities, matching the
/// shape of `nmod_mpoly_factor_t`.
#[derive(Debug, Clone)]
pub struct Factorization {
    pub ctx: Rc<MpolyCtx>,
    pub constant: Nmod,
    pub factors: Vec<(Mpoly, usize)>,
}

impl Factorization {
    /// Reconstructs the original polynomial by multiplying everything
    /// back together; used by callers (and this module's own tests) to
    /// sanity-check a factorisation without trusting it blindly.
    pub fn expand(&self) -> Mpoly {
        let mut acc = Mpoly::constant(self.ctx.clone(), self.constant);
        for (factor, exp) in &self.factors {
            for _ in 0..*exp {
                acc = acc.mul(factor);
            }
        }
        acc
    }
}

/// Top-level entry point (§4.8): factor `f` into irreducibles over
/// `Fp`. `f` must be nonzero.
pub fn factor(f: &Mpoly, rng: &mut RandState) -> PolyResult<Factorization> {
    if f.is_zero() {
        return Err(PolyError::EmptyPolynomial);
    }
    let modulus = f.ctx().modulus;
    if f.is_constant() {
        let c = f.leading_term().map(|(_, c)| *c).unwrap_or_else(|| Nmod::new(1, modulus));
        return Ok(Factorization { ctx: f.ctx().clone(), constant: c, factors: vec![] });
    }

    let mono = f.monomial_content();
    let primitive = f.divide_by_monomial(&mono);
    let monic = primitive.make_monic().ok_or(PolyError::InvariantViolation { reason: "factor: zero after stripping monomial content" })?;
    let (_, lc) = primitive.leading_term().expect("nonzero after stripping content");
    let unit = *lc;

    let mut factors = Vec::new();
    if !mono.is_constant() {
        factors.push((Mpoly::from_term(f.ctx().clone(), mono, Nmod::new(1, modulus)), 1));
    }

    for (piece, mult) in squarefree::squarefree(&monic, rng)? {
        for irreducible in irreducible_factors(&piece, rng)? {
            factors.push((irreducible, mult));
        }
    }

    Ok(Factorization { ctx: f.ctx().clone(), constant: unit, factors })
}

/// Factors a single squarefree piece into irreducibles, dispatching on
/// how many variables it depends on (§4.8 step 4).
fn irreducible_factors(f: &Mpoly, rng: &mut RandState) -> PolyResult<Vec<Mpoly>> {
    if f.is_constant() {
        return Ok(vec![]);
    }
    let nv = f.ctx().num_vars;
    let active: Vec<usize> = (0..nv).filter(|&v| f.degree_in(v).unwrap_or(0) > 0).collect();
    match active.len() {
        0 => Ok(vec![]),
        1 => {
            let var = active[0];
            let coeffs = f.as_univariate(var).expect("classified univariate");
            let poly = NmodPoly::from_coeffs(coeffs, f.ctx().modulus);
            let monic = poly.make_monic()?;
            let pieces = berlekamp_factor(&monic)?;
            Ok(pieces.into_iter().map(|p| Mpoly::from_univariate(f.ctx().clone(), var, p.coefficients())).collect())
        }
        2 => {
            let (v0, v1) = (active[0], active[1]);
            let b = to_bpoly(f, v0, v1);
            let bfactors = factor_bivariate(&b, rng)?;
            Ok(bfactors.into_iter().map(|bf| from_bpoly(&bf, f.ctx().clone(), v0, v1)).collect())
        }
        _ => wang::factor_multivariate(f, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::MonomialOrder;
    use crate::mpoly::MpolyCtx;
    use std::rc::Rc;

    #[test]
    fn factor_recovers_a_univariate_quadratic() {
        // x^2 - 1 = (x-1)(x+1) mod 101
        let modulus = 101;
        let ctx = Rc::new(MpolyCtx::new(1, MonomialOrder::Lex, modulus));
        let f = Mpoly::from_univariate(ctx, 0, &[100, 0, 1]);
        let mut rng = RandState::new(7);
        let result = factor(&f, &mut rng).unwrap();
        assert_eq!(result.expand(), f);
        assert_eq!(result.factors.iter().map(|(_, e)| *e).sum::<usize>(), 2);
    }

    #[test]
    fn factor_strips_a_shared_monomial_content() {
        // f = x^2*y + x^2*y^2 = x^2*y*(1+y)
        let modulus = 101;
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, modulus));
        let f = Mpoly::from_terms(
            ctx,
            vec![
                (Monomial::new(vec![2, 1]), Nmod::new(1, modulus)),
                (Monomial::new(vec![2, 2]), Nmod::new(1, modulus)),
            ],
        );
        let mut rng = RandState::new(11);
        let result = factor(&f, &mut rng).unwrap();
        assert_eq!(result.expand(), f);
    }

    #[test]
    fn factor_handles_a_bivariate_product() {
        // f = (x+y)(x-y) = x^2 - y^2
        let modulus = 101;
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, modulus));
        let a = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 1]), Nmod::new(1, modulus))]);
        let b = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 1]), Nmod::new(modulus - 1, modulus))]);
        let f = a.mul(&b);
        let mut rng = RandState::new(13);
        let result = factor(&f, &mut rng).unwrap();
        assert_eq!(result.expand(), f);
        assert_eq!(result.factors.len(), 2);
    }
}
