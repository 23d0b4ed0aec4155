//! Bivariate Hensel lifting (§4.7, `n_bpoly_hlift2`/`n_bpoly_hlift`)
//!
//! Lifts a coprime factorisation `f(x, a) = g0(x) * h0(x)` known at a
//! single point `y = a` to a factorisation `f(x, y) = g(x, y) * h(x, y)
//! mod (y - a)^n`, one power of `(y - a)` at a time via the extended
//! Euclidean cofactors of `g0`, `h0`.

use crate::bpoly::BPoly;
use crate::error::PolyResult;
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;

/// Two-factor Hensel lift: given `f` already shifted so the known
/// factorisation holds at `y = 0` (callers shift with
/// [`BPoly::shift_y`] beforehand), lift `g0`, `h0` to degree `< n` in
/// `y`.
pub fn hlift2(f: &BPoly, g0: &NmodPoly, h0: &NmodPoly, n: usize) -> PolyResult<(BPoly, BPoly)> {
    let modulus = f.modulus();
    let (_, s, t) = g0.xgcd(h0)?; // s*g0 + t*h0 = 1
    let mut g = BPoly::constant_in_x(g0.clone(), modulus);
    let mut h = BPoly::constant_in_x(h0.clone(), modulus);
    for k in 1..n {
        // error term: coefficient of y^k in f - g*h
        let product = g.mul(&h);
        let diff = f.sub(&product);
        let err = diff.coeff_y(k);
        if err.is_zero() {
            continue;
        }
        // solve s*err mod h0, t*err mod g0 for the degree-k corrections
        let (_, delta_h_rem) = s.mul(&err).div_rem(h0)?;
        let (_, delta_g_rem) = t.mul(&err).div_rem(g0)?;
        g = add_y_term(&g, k, &delta_g_rem);
        h = add_y_term(&h, k, &delta_h_rem);
    }
    Ok((g, h))
}

/// Multi-factor Hensel lift by repeated pairwise combination: lifts
/// `factors[0] * ... * factors[k-1] = f mod (y)` to hold `mod y^n`,
/// combining right-to-left so each pairwise lift only ever needs a
/// two-factor coprimality certificate.
pub fn hlift(f: &BPoly, factors: &[NmodPoly], n: usize) -> PolyResult<Vec<BPoly>> {
    if factors.len() <= 1 {
        return Ok(vec![f.clone()]);
    }
    if factors.len() == 2 {
        let (g, h) = hlift2(f, &factors[0], &factors[1], n)?;
        return Ok(vec![g, h]);
    }
    let mid = factors.len() / 2;
    let left_product: NmodPoly = factors[..mid].iter().fold(NmodPoly::constant(1, f.modulus()), |acc, p| acc.mul(p));
    let right_product: NmodPoly = factors[mid..].iter().fold(NmodPoly::constant(1, f.modulus()), |acc, p| acc.mul(p));
    let (left_lifted, right_lifted) = hlift2(f, &left_product, &right_product, n)?;
    let left_sub = hlift(&left_lifted, &factors[..mid], n)?;
    let right_sub = hlift(&right_lifted, &factors[mid..], n)?;
    Ok(left_sub.into_iter().chain(right_sub).collect())
}

fn add_y_term(p: &BPoly, k: usize, term: &NmodPoly) -> BPoly {
    let mut coeffs = p.coeffs().to_vec();
    while coeffs.len() <= k {
        coeffs.push(NmodPoly::zero(p.modulus()));
    }
    coeffs[k] = coeffs[k].add(term);
    BPoly::from_coeffs(coeffs, p.modulus())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hlift2_reproduces_a_known_bivariate_product() {
        let modulus = 100_003;
        // g = x + y, h = x + 2 + y; at y=0: g0 = x, h0 = x+2 (coprime)
        let g_true = BPoly::from_coeffs(vec![NmodPoly::x(modulus), NmodPoly::constant(1, modulus)], modulus);
        let h_true = BPoly::from_coeffs(vec![NmodPoly::from_signed_coeffs(&[2, 1], modulus), NmodPoly::constant(1, modulus)], modulus);
        let f = g_true.mul(&h_true);
        let g0 = f.evaluate_y(Nmod::new(0, modulus));
        let _ = g0; // not directly g_true(0); recomputed below
        let g0 = g_true.evaluate_y(Nmod::new(0, modulus));
        let h0 = h_true.evaluate_y(Nmod::new(0, modulus));
        let (g, h) = hlift2(&f, &g0, &h0, 2).unwrap();
        assert_eq!(g.mul(&h), f.truncate_y(2));
    }
}
