//! Multivariate division with respect to a single divisor (§3.4)
//!
//! Standard leading-term reduction: repeatedly cancel the dividend's
//! current leading term (per the context's monomial order) against the
//! divisor's, accumulating the quotient term, until what remains is no
//! longer divisible by the divisor's leading monomial. Grounded on the
//! teacher's `sparse_polynomial::polynomial` division loop, generalised
//! from a single-variable remainder check to full multivariate
//! leading-monomial divisibility.

use super::Mpoly;
use crate::error::{PolyError, PolyResult};

/// `(quotient, remainder)` such that `whole == divisor * quotient +
/// remainder`, with every term of `remainder` not divisible by
/// `divisor`'s leading monomial.
pub fn div_rem(whole: &Mpoly, divisor: &Mpoly) -> PolyResult<(Mpoly, Mpoly)> {
    if divisor.is_zero() {
        return Err(PolyError::DivisionByZero);
    }
    let ctx = whole.ctx().clone();
    let (lead_mono, lead_coeff) = divisor.leading_term().unwrap();
    let lead_inv = lead_coeff.inverse()?;

    let mut remainder_terms = whole.terms().to_vec();
    let mut quotient_terms: Vec<(crate::monomial::Monomial, crate::nmod::Nmod)> = Vec::new();

    'outer: loop {
        for idx in 0..remainder_terms.len() {
            let (m, c) = &remainder_terms[idx];
            if let Some(q_mono) = m.try_divide(lead_mono) {
                let q_coeff = *c * lead_inv;
                quotient_terms.push((q_mono.clone(), q_coeff));
                let subtrahend = divisor.scalar_mul(q_coeff).terms().iter().map(|(dm, dc)| (dm.mul(&q_mono), *dc)).collect::<Vec<_>>();
                let mut combined = remainder_terms;
                combined.extend(subtrahend.into_iter().map(|(m, c)| (m, -c)));
                remainder_terms = Mpoly::from_terms(ctx.clone(), combined).terms().to_vec();
                continue 'outer;
            }
        }
        break;
    }

    let quotient = Mpoly::from_terms(ctx.clone(), quotient_terms);
    let remainder = Mpoly::from_terms(ctx, remainder_terms);
    Ok((quotient, remainder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::{Monomial, MonomialOrder};
    use crate::mpoly::MpolyCtx;
    use crate::nmod::Nmod;
    use std::rc::Rc;

    #[test]
    fn div_rem_round_trips_on_an_exact_multivariate_division() {
        let modulus = 101;
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, modulus));
        let a = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 1]), Nmod::new(1, modulus))]); // x + y
        let b = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 0]), Nmod::new(2, modulus))]); // x + 2
        let product = a.mul(&b);
        let (q, r) = div_rem(&product, &b).unwrap();
        assert!(r.is_zero());
        assert_eq!(q, a);
    }
}
