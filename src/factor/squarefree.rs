//! Multivariate squarefree factorisation (§4.8 step 2)
//!
//! Generalises Musser's algorithm (already implemented per-variable at
//! L1 in [`crate::nmod::poly::factor::squarefree`]) to a multivariate
//! polynomial by differentiating with respect to one variable at a time
//! and using multivariate GCDs in place of the univariate ones; the
//! characteristic-`p` twist still applies whenever every partial
//! derivative vanishes (the polynomial is then a perfect `p`-th power of
//! its exponents, grounded on `original_source/nmod_mpoly_factor`'s
//! `_squarefree` per SPEC_FULL.md).

use crate::error::PolyResult;
use crate::gcd::mpoly_gcd;
use crate::monomial::Monomial;
use crate::mpoly::Mpoly;
use crate::nmod::Nmod;
use crate::rand::RandState;

pub fn squarefree(f: &Mpoly, rng: &mut RandState) -> PolyResult<Vec<(Mpoly, usize)>> {
    if f.is_zero() {
        return Ok(vec![]);
    }
    if f.is_constant() {
        return Ok(vec![(f.clone(), 1)]);
    }
    let var = (0..f.ctx().num_vars).find(|&v| f.degree_in(v).unwrap_or(0) > 0);
    let Some(var) = var else {
        return Ok(vec![(f.clone(), 1)]);
    };
    let deriv = partial_derivative(f, var);
    if deriv.is_zero() {
        let p = f.ctx().modulus as usize;
        let root = p_th_root(f, p);
        let mut sub = squarefree(&root, rng)?;
        for (_, e) in sub.iter_mut() {
            *e *= p;
        }
        return Ok(sub);
    }
    let g = mpoly_gcd(f, &deriv, rng)?;
    let (mut h, _) = exact_divide(f, &g)?;
    let mut current_g = g;
    let mut result = Vec::new();
    let mut i = 1usize;
    while !h.is_constant() {
        let s = mpoly_gcd(&current_g, &h, rng)?;
        let (factor, _) = exact_divide(&h, &s)?;
        if !factor.is_constant() {
            result.push((factor, i));
        }
        let (new_g, _) = exact_divide(&current_g, &s)?;
        current_g = new_g;
        h = s;
        i += 1;
        if i > 10_000 {
            break;
        }
    }
    if !current_g.is_constant() {
        let mut tail = squarefree(&current_g, rng)?;
        for (factor, e) in tail.drain(..) {
            result.push((factor, e * i));
        }
    }
    if result.is_empty() {
        result.push((Mpoly::constant(f.ctx().clone(), Nmod::new(1, f.ctx().modulus)), 1));
    }
    Ok(result)
}

fn partial_derivative(f: &Mpoly, var: usize) -> Mpoly {
    let terms = f
        .terms()
        .iter()
        .filter(|(m, _)| m.exponents()[var] > 0)
        .map(|(m, c)| {
            let e = m.exponents()[var];
            let mut exps = m.exponents().to_vec();
            exps[var] = e - 1;
            let scalar = Nmod::new(e as u64, f.ctx().modulus);
            (Monomial::new(exps), *c * scalar)
        })
        .collect();
    Mpoly::from_terms(f.ctx().clone(), terms)
}

fn p_th_root(f: &Mpoly, p: usize) -> Mpoly {
    let terms = f
        .terms()
        .iter()
        .map(|(m, c)| {
            let exps: Vec<u32> = m.exponents().iter().map(|&e| {
                debug_assert_eq!(e as usize % p, 0);
                e / p as u32
            }).collect();
            (Monomial::new(exps), *c)
        })
        .collect();
    Mpoly::from_terms(f.ctx().clone(), terms)
}

/// Exact division used by the squarefree peeling loop (divisors here are
/// always genuine factors, constructed from a just-computed GCD, so a
/// nonzero remainder is an invariant violation rather than a possible
/// outcome).
fn exact_divide(whole: &Mpoly, divisor: &Mpoly) -> PolyResult<(Mpoly, Mpoly)> {
    crate::mpoly::arithmetic::div_rem(whole, divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::MonomialOrder;
    use crate::mpoly::MpolyCtx;
    use std::rc::Rc;

    #[test]
    fn squarefree_detects_a_repeated_multivariate_factor() {
        let modulus = 101;
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, modulus));
        let a = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 1]), Nmod::new(1, modulus))]); // x + y
        let squared = a.mul(&a);
        let mut rng = RandState::new(3);
        let factors = squarefree(&squared, &mut rng).unwrap();
        assert!(factors.iter().any(|(_, e)| *e == 2));
    }
}
