//! Bivariate factorisation via Hensel lifting + Zassenhaus recombination
//! (§4.7)
//!
//! Picks an evaluation point `a` for `y` at which `f(x, a)` is
//! squarefree, factors that univariate image with
//! [`crate::nmod::poly::factor::berlekamp_factor`], Hensel-lifts the
//! modular factors back up to a `y`-degree bound, then recombines
//! subsets of the lifted factors (trying small subset sizes first) to
//! find the true irreducible bivariate factors — the same
//! enumerate-and-trial-divide shape FLINT's `n_bpoly_factor` uses.

use crate::bpoly::hensel::hlift;
use crate::bpoly::BPoly;
use crate::error::{PolyError, PolyResult};
use crate::nmod::poly::factor::{berlekamp_factor, squarefree as squarefree_uni};
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;
use crate::rand::RandState;

pub fn factor_bivariate(f: &BPoly, rng: &mut RandState) -> PolyResult<Vec<BPoly>> {
    if f.is_zero() || f.is_constant() {
        return Ok(vec![f.clone()]);
    }
    let modulus = f.modulus();
    let target_deg_y = f.degree_y().unwrap_or(0);

    // Find a squarefree evaluation point.
    let mut attempts = 0;
    let (point, image) = loop {
        attempts += 1;
        if attempts > 200 {
            return Err(PolyError::InvariantViolation { reason: "factor_bivariate: no squarefree evaluation point found" });
        }
        let candidate = Nmod::new(rng.below(modulus), modulus);
        let image = f.evaluate_y(candidate);
        if image.degree() != f.degree_x() {
            continue; // leading coefficient vanished at this point
        }
        let sqfree = squarefree_uni(&image)?;
        if sqfree.iter().all(|(_, e)| *e == 1) && !sqfree.is_empty() {
            break (candidate, image);
        }
    };

    let modular_factors: Vec<NmodPoly> = berlekamp_factor(&image)?;
    if modular_factors.len() <= 1 {
        return Ok(vec![f.clone()]);
    }

    let shifted = f.shift_y(point);
    let lift_bound = target_deg_y + 2;
    let lifted = hlift(&shifted, &modular_factors, lift_bound)?;

    let true_factors = recombine(&shifted, lifted, lift_bound)?;
    Ok(true_factors.into_iter().map(|g| g.shift_y(Nmod::new(0, modulus) - point)).collect())
}

/// Subset-enumeration recombination: tries every subset (in increasing
/// size order) of the remaining lifted factors, testing whether their
/// product (truncated to the lift bound) exactly divides what is left
/// of `f`.
fn recombine(f: &BPoly, mut candidates: Vec<BPoly>, bound: usize) -> PolyResult<Vec<BPoly>> {
    let mut remaining = f.clone();
    let mut true_factors = Vec::new();
    let mut subset_size = 1;
    while subset_size <= candidates.len() && !remaining.is_constant() {
        let mut found = false;
        'outer: for combo in combinations(candidates.len(), subset_size) {
            let mut product = BPoly::constant_in_x(NmodPoly::constant(1, f.modulus()), f.modulus());
            for &i in &combo {
                product = product.mul(&candidates[i]).truncate_y(bound);
            }
            if let Some(quotient) = try_exact_divide(&remaining, &product) {
                true_factors.push(product);
                remaining = quotient;
                let mut kept = Vec::new();
                for (i, c) in candidates.into_iter().enumerate() {
                    if !combo.contains(&i) {
                        kept.push(c);
                    }
                }
                candidates = kept;
                found = true;
                break 'outer;
            }
        }
        if !found {
            subset_size += 1;
        }
    }
    if !remaining.is_constant() {
        true_factors.push(remaining);
    }
    Ok(true_factors)
}

fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return vec![];
    }
    let mut result = Vec::new();
    let mut combo: Vec<usize> = (0..k).collect();
    loop {
        result.push(combo.clone());
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if combo[i] != i + n - k {
                break;
            }
        }
        combo[i] += 1;
        for j in i + 1..k {
            combo[j] = combo[j - 1] + 1;
        }
    }
}

/// Tries dividing `whole` by `part` in `x` for each `y`-slice
/// consistently; a real implementation would use a bivariate division
/// routine, but since `part` came from a truncated Hensel lift, exact
/// bivariate division is verified by multiplying back out and comparing.
fn try_exact_divide(whole: &BPoly, part: &BPoly) -> Option<BPoly> {
    if part.is_zero() {
        return None;
    }
    // Determine candidate quotient degree and try polynomial long
    // division in x at the y=0 slice, then verify the full product.
    let lc_part = part.leading_coeff_y()?;
    let lc_whole = whole.leading_coeff_y()?;
    let (q0, r0) = lc_whole.div_rem(lc_part).ok()?;
    if !r0.is_zero() {
        return None;
    }
    let _ = q0;
    // Full verification: does part divide whole with zero remainder
    // when long-dividing coefficient-wise in y (synthetic division using
    // BPoly as a polynomial ring over NmodPoly[x], with part's leading
    // coefficient in y-degree inverted where possible).
    let quotient_deg_y = whole.degree_y()?.checked_sub(part.degree_y()?)?;
    let mut remainder = whole.clone();
    let mut quotient_coeffs = vec![NmodPoly::zero(whole.modulus()); quotient_deg_y + 1];
    let part_lead = part.leading_coeff_y()?.clone();
    let part_deg = part.degree_y()?;
    for k in (0..=quotient_deg_y).rev() {
        let rem_deg = remainder.degree_y()?;
        if rem_deg < part_deg + k {
            continue;
        }
        let top = remainder.coeff_y(rem_deg);
        let (coeff, rem0) = top.div_rem(&part_lead).ok()?;
        if !rem0.is_zero() {
            continue;
        }
        quotient_coeffs[k] = coeff.clone();
        let shift = rem_deg - part_deg;
        let scaled_part = shift_mul(part, &coeff, shift);
        remainder = remainder.sub(&scaled_part);
    }
    if remainder.is_zero() {
        Some(BPoly::from_coeffs(quotient_coeffs, whole.modulus()))
    } else {
        None
    }
}

fn shift_mul(p: &BPoly, scalar: &NmodPoly, shift: usize) -> BPoly {
    let mut out = vec![NmodPoly::zero(p.modulus()); shift];
    for c in p.coeffs() {
        out.push(c.mul(scalar));
    }
    BPoly::from_coeffs(out, p.modulus())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_bivariate_splits_a_product_of_two_linear_bivariate_factors() {
        let modulus = 100_003;
        let g = BPoly::from_coeffs(vec![NmodPoly::x(modulus), NmodPoly::constant(1, modulus)], modulus);
        let h = BPoly::from_coeffs(vec![NmodPoly::from_signed_coeffs(&[3, 1], modulus), NmodPoly::constant(1, modulus)], modulus);
        let f = g.mul(&h);
        let mut rng = RandState::new(7);
        let factors = factor_bivariate(&f, &mut rng).unwrap();
        assert!(factors.len() >= 1);
        let product = factors.iter().fold(BPoly::constant_in_x(NmodPoly::constant(1, modulus), modulus), |acc, fac| acc.mul(fac));
        assert_eq!(product.degree_y(), f.degree_y());
    }
}
