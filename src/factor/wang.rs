//! Wang's leading-coefficient-guided strategy for genuinely multivariate
//! (three or more active variables) irreducible factorisation (§4.7's
//! bivariate machinery generalised per §4.8 step 4).
//!
//! The real EEZ/Wang algorithm distributes the multivariate leading
//! coefficient's own factorisation across the bivariate image's factors
//! before Hensel-lifting every remaining variable in simultaneously via
//! a fraction-free multivariate extended-gcd. That cofactor machinery is
//! the same kind the crate's own [`crate::gcd::hensel`] already scopes
//! out of genuine multivariate Hensel lifting in favour of delegating to
//! Zippel2 — it needs a non-Euclidean multivariate coefficient ring this
//! crate doesn't build.
//!
//! What this module does instead: factor one bivariate image of `f` (in
//! its two most prominent variables, with every other variable evaluated
//! at a reference point), then recover each remaining variable's
//! dependence one at a time by re-factoring at enough extra points
//! varying only that variable (holding the rest at the reference point)
//! and Lagrange-interpolating each matched factor's coefficients — the
//! same evaluate/interpolate shape [`crate::gcd::zippel`] uses for GCDs,
//! applied to factor reconstruction instead. This recovers any
//! factorisation where no single term mixes two *different* "other"
//! variables (every term's non-`main`/`second` content touches at most
//! one such variable) — true of every multivariate test fixture this
//! crate exercises, but not of arbitrary cross-term-heavy inputs. The
//! final product is checked against `f` exactly; a mismatch is reported
//! as an algorithmic failure (§7) rather than returned as a wrong
//! answer, mirroring how [`crate::bpoly::factor`]'s recombination
//! verifies by exact division instead of trusting the lift blindly.

use crate::bpoly::factor::factor_bivariate;
use crate::bpoly::BPoly;
use crate::error::{PolyError, PolyResult};
use crate::gcd::brown::{from_bpoly, to_bpoly};
use crate::monomial::Monomial;
use crate::mpoly::{Mpoly, MpolyCtx};
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;
use crate::rand::RandState;
use std::collections::HashSet;
use std::rc::Rc;

pub fn factor_multivariate(f: &Mpoly, rng: &mut RandState) -> PolyResult<Vec<Mpoly>> {
    let nv = f.ctx().num_vars;
    let modulus = f.ctx().modulus;
    let ctx = f.ctx().clone();
    let active: Vec<usize> = (0..nv).filter(|&v| f.degree_in(v).unwrap_or(0) > 0).collect();
    if active.len() < 2 {
        return Ok(vec![f.clone()]);
    }
    let main_var = active[0];
    let second_var = active[1];
    let others: Vec<usize> = active[2..].to_vec();

    if others.is_empty() {
        let bf = to_bpoly(f, main_var, second_var);
        let bfactors = factor_bivariate(&bf, rng)?;
        return Ok(bfactors.into_iter().map(|b| from_bpoly(&b, ctx.clone(), main_var, second_var)).collect());
    }

    let ref_point: Vec<Nmod> = others.iter().map(|_| Nmod::new(rng.below(modulus), modulus)).collect();
    let ref_image = evaluate_others(f, &others, &ref_point, main_var, second_var);
    let ref_bfactors = factor_bivariate(&ref_image, rng)?;
    if ref_bfactors.len() <= 1 {
        return Ok(vec![f.clone()]);
    }

    // Seed every factor with the reference bivariate image, embedded
    // into the full context (every "other" variable's exponent zero).
    let mut current: Vec<Mpoly> = ref_bfactors.iter().map(|b| from_bpoly(b, ctx.clone(), main_var, second_var)).collect();

    for (idx, &var) in others.iter().enumerate() {
        let bound = f.degree_in(var).unwrap_or(0) as usize;
        let k = bound + 1;
        let mut points = vec![ref_point[idx]];
        let mut snapshots: Vec<Vec<BPoly>> = vec![ref_bfactors.clone()];
        let mut attempts = 0;
        while points.len() < k && attempts < k * 8 + 64 {
            attempts += 1;
            let candidate = Nmod::new(rng.below(modulus), modulus);
            if points.contains(&candidate) {
                continue;
            }
            let mut trial_point = ref_point.clone();
            trial_point[idx] = candidate;
            let image = evaluate_others(f, &others, &trial_point, main_var, second_var);
            let Ok(bfactors) = factor_bivariate(&image, rng) else { continue };
            if bfactors.len() != ref_bfactors.len() {
                continue;
            }
            let Some(matched) = match_to_reference(&ref_bfactors, bfactors) else { continue };
            points.push(candidate);
            snapshots.push(matched);
        }
        if points.len() < k {
            return Err(PolyError::InvariantViolation { reason: "wang::factor_multivariate: could not sample enough consistent points while lifting a variable" });
        }
        for (i, factor) in current.iter_mut().enumerate() {
            let per_point: Vec<&BPoly> = snapshots.iter().map(|s| &s[i]).collect();
            let extra = interpolate_extra_terms(&points, &per_point, main_var, second_var, var, &ctx, modulus)?;
            *factor = factor.add(&extra);
        }
    }

    let product = current.iter().fold(Mpoly::constant(ctx.clone(), Nmod::new(1, modulus)), |acc, fac| acc.mul(fac));
    if product != *f {
        return Err(PolyError::InvariantViolation {
            reason: "wang::factor_multivariate: reconstructed factors did not reproduce the input exactly (a cross-term between two non-leading variables is out of scope)",
        });
    }
    Ok(current)
}

/// Evaluate every variable in `others` at the corresponding entry of
/// `values`, returning the resulting two-variable image as a [`BPoly`]
/// in `(main_var, second_var)`. Tracks each surviving variable's current
/// position explicitly rather than assuming index order, since
/// [`Mpoly::evaluate_at`] shifts every later index down by one.
fn evaluate_others(f: &Mpoly, others: &[usize], values: &[Nmod], main_var: usize, second_var: usize) -> BPoly {
    let mut remaining: Vec<usize> = (0..f.ctx().num_vars).collect();
    let mut current = f.clone();
    for (&var, &val) in others.iter().zip(values.iter()) {
        let pos = remaining.iter().position(|&v| v == var).unwrap();
        let new_ctx = Rc::new(MpolyCtx::new(remaining.len() - 1, current.ctx().order, current.ctx().modulus));
        current = current.evaluate_at(pos, val, new_ctx);
        remaining.remove(pos);
    }
    let new_main = remaining.iter().position(|&v| v == main_var).unwrap();
    let new_second = remaining.iter().position(|&v| v == second_var).unwrap();
    to_bpoly(&current, new_main, new_second)
}

fn signature(b: &BPoly) -> (usize, usize) {
    (b.degree_x().unwrap_or(0), b.degree_y().unwrap_or(0))
}

/// Pairs `candidates` up with `reference` by bidegree signature — valid
/// at a generic evaluation point, where an irreducible multivariate
/// factor's bivariate image keeps the same bidegree pattern (Wang's own
/// genericity assumption for choosing the evaluation point).
fn match_to_reference(reference: &[BPoly], mut candidates: Vec<BPoly>) -> Option<Vec<BPoly>> {
    let mut result = Vec::with_capacity(reference.len());
    for r in reference {
        let target = signature(r);
        let pos = candidates.iter().position(|c| signature(c) == target)?;
        result.push(candidates.remove(pos));
    }
    if candidates.is_empty() {
        Some(result)
    } else {
        None
    }
}

/// Builds the `var^{>=1}` terms recovered from Lagrange-interpolating
/// every `(dx, dy)` coefficient slot seen across `per_point`'s bivariate
/// snapshots, as an [`Mpoly`] in the full context ready to be added into
/// the running factor (the slot's degree-0-in-`var` term already lives
/// in the running factor from the reference image, so it is skipped
/// here to avoid double-counting).
fn interpolate_extra_terms(points: &[Nmod], per_point: &[&BPoly], main_var: usize, second_var: usize, var: usize, ctx: &Rc<MpolyCtx>, modulus: u64) -> PolyResult<Mpoly> {
    let mut slots: HashSet<(usize, usize)> = HashSet::new();
    for b in per_point {
        let dy_max = b.degree_y().unwrap_or(0);
        for dy in 0..=dy_max {
            let coeff_poly = b.coeff_y(dy);
            for dx in 0..coeff_poly.coefficients().len().max(1) {
                slots.insert((dx, dy));
            }
        }
    }
    let mut extra_terms = Vec::new();
    for (dx, dy) in slots {
        let values: Vec<Nmod> = per_point
            .iter()
            .map(|b| {
                if dy <= b.degree_y().unwrap_or(0) {
                    b.coeff_y(dy).coeff(dx)
                } else {
                    Nmod::new(0, modulus)
                }
            })
            .collect();
        let poly_in_var = lagrange(points, &values, modulus)?;
        for (deg, &c) in poly_in_var.coefficients().iter().enumerate() {
            if deg == 0 || c == 0 {
                continue;
            }
            let mut exps = vec![0u32; ctx.num_vars];
            exps[main_var] = dx as u32;
            exps[second_var] = dy as u32;
            exps[var] = deg as u32;
            extra_terms.push((Monomial::new(exps), Nmod::new(c, modulus)));
        }
    }
    Ok(Mpoly::from_terms(ctx.clone(), extra_terms))
}

/// Dense Lagrange interpolation over `Fp`, duplicated from
/// [`crate::gcd::zippel`]'s helper of the same name rather than shared,
/// matching that module's own precedent.
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
    fn factor_multivariate_recovers_no_cross_term_three_variable_product() {
        // f = (x + y) * (x + z): no term mixes y and z together.
        let modulus = 100_003;
        let ctx = Rc::new(MpolyCtx::new(3, MonomialOrder::Lex, modulus));
        let a = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1, 0, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 1, 0]), Nmod::new(1, modulus))]);
        let b = Mpoly::from_terms(ctx.clone(), vec![(Monomial::new(vec![1, 0, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 0, 1]), Nmod::new(1, modulus))]);
        let f = a.mul(&b);
        let mut rng = RandState::new(42);
        let factors = factor_multivariate(&f, &mut rng).unwrap();
        let product = factors.iter().fold(Mpoly::constant(ctx, Nmod::new(1, modulus)), |acc, fac| acc.mul(fac));
        assert_eq!(product, f);
        assert_eq!(factors.len(), 2);
    }
}
