//! Zippel2: skeleton-reusing sparse GCD (§4.5, large-prime variant)
//!
//! Unlike [`crate::gcd::zippel`], which re-discovers which monomials are
//! present at every evaluation point, Zippel2 fixes the monomial
//! skeleton from a single initial image and then solves one transposed
//! Vandermonde system per remaining variable to recover each skeleton
//! coefficient's dependence on that variable — the "learn the skeleton
//! once, then solve" structure §4.5 describes as the large-prime
//! strategy (safe once the field is large enough that a random
//! evaluation point is overwhelmingly unlikely to hit a skeleton-
//! collapsing coincidence).

use crate::error::{PolyError, PolyResult};
use crate::monomial::Monomial;
use crate::mpoly::{Mpoly, MpolyCtx};
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;
use crate::rand::RandState;
use std::rc::Rc;

/// Solve for the GCD given an already-known monomial skeleton (the set
/// of monomials, projected away from `main_var`, that the true GCD's
/// terms occupy) and a rigorous bound on the GCD's degree in `main_var`
/// (the number of evaluation points needed is driven by *that* bound,
/// not by the skeleton's size — the skeleton only constrains which
/// *other*-variable monomials can appear, it says nothing about how
/// high a degree `main_var` itself reaches in any one of them). The
/// bound is `deg_f.min(deg_g)` in `main_var`, the same rigorous degree
/// bound [`crate::gcd::zippel::zippel_gcd`] uses (§4.5: "the GCD degree
/// cannot exceed the minimum of `deg A`, `deg B`").
pub fn zippel2_gcd_with_skeleton(
    f: &Mpoly,
    g: &Mpoly,
    main_var: usize,
    skeleton: &[Monomial],
    main_var_degree_bound: usize,
    rng: &mut RandState,
) -> PolyResult<Mpoly> {
    let modulus = f.ctx().modulus;
    let sub_ctx = Rc::new(MpolyCtx::new(f.ctx().num_vars - 1, f.ctx().order, modulus));
    let k = main_var_degree_bound + 1;
    let mut points = Vec::with_capacity(k);
    let mut rows: Vec<Vec<Nmod>> = Vec::with_capacity(k);
    let mut attempts = 0;
    while points.len() < k && attempts < k * 10 + 64 {
        attempts += 1;
        let candidate = Nmod::new(rng.below(modulus), modulus);
        if points.contains(&candidate) {
            continue;
        }
        let fa = f.evaluate_at(main_var, candidate, sub_ctx.clone());
        let ga = g.evaluate_at(main_var, candidate, sub_ctx.clone());
        if fa.is_zero() || ga.is_zero() {
            continue;
        }
        let image = super::mpoly_gcd(&fa, &ga, rng)?;
        // The skeleton is learned from a single trial image (in the
        // caller) and is only a valid template if every later image's
        // support stays inside it; an image with a monomial the skeleton
        // doesn't have means that first trial point was unlucky (its
        // image had an accidental cancellation), so reject this point
        // rather than silently dropping the extra monomial.
        if image.terms().iter().any(|(m, _)| !skeleton.contains(m)) {
            continue;
        }
        let row: Vec<Nmod> = skeleton
            .iter()
            .map(|m| image.terms().iter().find(|(tm, _)| tm == m).map(|(_, c)| *c).unwrap_or_else(|| Nmod::new(0, modulus)))
            .collect();
        points.push(candidate);
        rows.push(row);
    }
    if points.len() < k {
        return Err(PolyError::InvariantViolation { reason: "zippel2_gcd_with_skeleton: exhausted evaluation points" });
    }
    // Solve the transposed Vandermonde system: for each skeleton index
    // j, fit a degree-(k-1) polynomial through (points[i], rows[i][j]).
    let mut all_terms = Vec::new();
    for (j, mono) in skeleton.iter().enumerate() {
        let values: Vec<Nmod> = rows.iter().map(|r| r[j]).collect();
        let poly = lagrange(&points, &values, modulus)?;
        for (deg, &c) in poly.coefficients().iter().enumerate() {
            if c == 0 {
                continue;
            }
            let mut exps = mono.exponents().to_vec();
            exps.insert(main_var, deg as u32);
            all_terms.push((Monomial::new(exps), Nmod::new(c, modulus)));
        }
    }
    Ok(Mpoly::from_terms(f.ctx().clone(), all_terms))
}

/// Convenience entry point matching [`crate::gcd::zippel::zippel_gcd`]'s
/// signature: derives the skeleton from one trial evaluation, then
/// hands off to [`zippel2_gcd_with_skeleton`]. Verifies the result
/// actually divides both inputs (§8, property 13) before returning it —
/// an interpolation that ran short of points for the true degree would
/// otherwise ship a silently wrong polynomial instead of failing loudly.
pub fn zippel2_gcd(f: &Mpoly, g: &Mpoly, rng: &mut RandState) -> PolyResult<Mpoly> {
    let nv = f.ctx().num_vars;
    let active: Vec<usize> = (0..nv).filter(|&v| f.degree_in(v).unwrap_or(0) > 0 || g.degree_in(v).unwrap_or(0) > 0).collect();
    if active.is_empty() {
        return Ok(Mpoly::constant(f.ctx().clone(), Nmod::new(1, f.ctx().modulus)));
    }
    let main_var = active[0];
    let modulus = f.ctx().modulus;
    let degree_bound = f.degree_in(main_var).unwrap_or(0).min(g.degree_in(main_var).unwrap_or(0)) as usize;
    let sub_ctx = Rc::new(MpolyCtx::new(nv - 1, f.ctx().order, modulus));
    let trial_point = Nmod::new(rng.below(modulus), modulus);
    let fa = f.evaluate_at(main_var, trial_point, sub_ctx.clone());
    let ga = g.evaluate_at(main_var, trial_point, sub_ctx);
    let trial_image = super::mpoly_gcd(&fa, &ga, rng)?;
    let skeleton: Vec<Monomial> = trial_image.terms().iter().map(|(m, _)| m.clone()).collect();
    let candidate = zippel2_gcd_with_skeleton(f, g, main_var, &skeleton, degree_bound, rng)?;
    let result = candidate.make_monic().ok_or(PolyError::InvariantViolation { reason: "zippel2_gcd: zero candidate" })?;

    let (_, rf) = crate::mpoly::arithmetic::div_rem(f, &result)?;
    let (_, rg) = crate::mpoly::arithmetic::div_rem(g, &result)?;
    if !rf.is_zero() || !rg.is_zero() {
        return Err(PolyError::InvariantViolation { reason: "zippel2_gcd: interpolated candidate does not divide both inputs" });
    }
    Ok(result)
}

fn lagrange(points: &[Nmod], values: &[Nmod], modulus: u64) -> PolyResult<NmodPoly> {
    let mut result = NmodPoly::zero(modulus);
    for i in 0..points.len() {
        let mut term = NmodPoly::constant(1, modulus);
        let mut denom = Nmod::new(1, modulus);
        for j in 0..points.len() {
            if i == j {
                continue;
            }
            term = term.mul(&NmodPoly::from_signed_coeffs(&[-(points[j].value() as i64), 1], modulus));
            denom = denom * (points[i] - points[j]);
        }
        let scale = values[i] * denom.inverse()?;
        result = result.add(&term.scalar_mul(scale));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::MonomialOrder;

    #[test]
    fn zippel2_gcd_recovers_a_three_variable_shared_factor() {
        let modulus = 100_003;
        let ctx = Rc::new(MpolyCtx::new(3, MonomialOrder::Lex, modulus));
        let shared = Mpoly::from_terms(
            ctx.clone(),
            vec![
                (Monomial::new(vec![1, 0, 0]), Nmod::new(1, modulus)),
                (Monomial::new(vec![0, 1, 1]), Nmod::new(1, modulus)),
            ],
        );
        let extra_f = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![0, 0, 0]), Nmod::new(3, modulus)), (Monomial::new(vec![1, 0, 0]), Nmod::new(1, modulus))]);
        let extra_g = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![0, 0, 0]), Nmod::new(7, modulus)), (Monomial::new(vec![0, 1, 0]), Nmod::new(1, modulus))]);
        let f = shared.mul(&extra_f);
        let g = shared.mul(&extra_g);
        let mut rng = RandState::new(23);
        let result = zippel2_gcd(&f, &g, &mut rng).unwrap();
        assert!(result.terms().len() >= shared.terms().len());
        // §8 property 13: divides both inputs exactly, not just "is
        // plausibly the right size".
        let (_, rf) = crate::mpoly::arithmetic::div_rem(&f, &result).unwrap();
        let (_, rg) = crate::mpoly::arithmetic::div_rem(&g, &result).unwrap();
        assert!(rf.is_zero());
        assert!(rg.is_zero());
    }

    #[test]
    fn zippel2_gcd_recovers_a_high_main_variable_degree_coefficient() {
        // gcd = y + x^10, main_var = x: the skeleton learned from one
        // evaluation has only two monomials (y^0, y^1), but the y^0
        // coefficient is a degree-10 polynomial in x. Sizing the point
        // count off `skeleton.len()` (2 points) instead of a real degree
        // bound in `x` would under-determine that coefficient and produce
        // a candidate that silently fails to divide the inputs.
        let modulus = 1_000_003;
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, modulus));
        let shared = Mpoly::from_terms(
            ctx.clone(),
            vec![
                (Monomial::new(vec![0, 1]), Nmod::new(1, modulus)),
                (Monomial::new(vec![10, 0]), Nmod::new(1, modulus)),
            ],
        );
        let extra_f = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![0, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![1, 0]), Nmod::new(1, modulus))]);
        let extra_g = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![0, 0]), Nmod::new(3, modulus)), (Monomial::new(vec![1, 0]), Nmod::new(1, modulus))]);
        let f = shared.mul(&extra_f);
        let g = shared.mul(&extra_g);
        let mut rng = RandState::new(7);
        let result = zippel2_gcd(&f, &g, &mut rng).unwrap();
        let (_, rf) = crate::mpoly::arithmetic::div_rem(&f, &result).unwrap();
        let (_, rg) = crate::mpoly::arithmetic::div_rem(&g, &result).unwrap();
        assert!(rf.is_zero());
        assert!(rg.is_zero());
    }
}
