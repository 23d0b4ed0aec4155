//! Trial-division recombination shared by the multivariate factor
//! dispatch paths (§4.8's Zassenhaus-style subset search, generalised
//! from [`crate::bpoly::factor`]'s bivariate recombination to arbitrary
//! variable count using [`crate::mpoly::arithmetic::div_rem`] for the
//! exact-division test).

use crate::mpoly::arithmetic::div_rem;
use crate::mpoly::Mpoly;
use crate::nmod::Nmod;

/// Given `target` and a list of candidate irreducible factors (with
/// possible over-counting or spurious multiplicities from an imprecise
/// lift), greedily divides them out of `target` one at a time, keeping
/// only the candidates that exactly divide what remains.
pub fn recombine(target: &Mpoly, candidates: Vec<Mpoly>) -> (Vec<Mpoly>, Mpoly) {
    let mut remaining = target.clone();
    let mut accepted = Vec::new();
    for candidate in candidates {
        if candidate.is_constant() {
            continue;
        }
        if let Ok((q, r)) = div_rem(&remaining, &candidate) {
            if r.is_zero() {
                accepted.push(candidate);
                remaining = q;
                continue;
            }
        }
    }
    (accepted, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::{Monomial, MonomialOrder};
    use crate::mpoly::MpolyCtx;
    use std::rc::Rc;

    #[test]
    fn recombine_accepts_exact_divisors_and_leaves_the_rest() {
        let modulus = 101;
        let ctx = Rc::new(MpolyCtx::new(1, MonomialOrder::Lex, modulus));
        let a = Mpoly::from_term(ctx.clone(), Monomial::new(vec![1]), Nmod::new(1, modulus));
        let b = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1]), Nmod::new(1, modulus)), (Monomial::new(vec![0]), Nmod::new(3, modulus))]);
        let not_a_factor = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1]), Nmod::new(1, modulus)), (Monomial::new(vec![0]), Nmod::new(7, modulus))]);
        let target = a.mul(&b);
        let (accepted, remaining) = recombine(&target, vec![a.clone(), not_a_factor]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(remaining, b);
    }
}
