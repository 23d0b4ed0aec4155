//! Squarefree factorisation and Berlekamp factorisation over `Fp[x]`
//!
//! Grounded on the teacher's `finite_field::berlekamp` (Frobenius matrix +
//! null-space construction + subset splitting) and
//! `polynomial::algorithms::factorization` (Yun's algorithm), generalised
//! here with the characteristic-`p` perfect-power twist §4.8 describes
//! for Musser's algorithm: when `gcd(f, f') == f` (the derivative
//! vanishes identically), `f` is a perfect `p`-th power and the
//! recursion proceeds on the `p`-th root of the exponents, since the
//! naive Yun loop would otherwise never terminate in positive
//! characteristic.

use super::NmodPoly;
use crate::error::PolyResult;
use crate::nmod::Nmod;

/// Musser's squarefree factorisation over `Fp[x]` with the
/// characteristic-`p` twist (§4.8 step 2, restricted to one variable;
/// the multivariate generalisation lives in `factor::squarefree`).
pub fn squarefree(f: &NmodPoly) -> PolyResult<Vec<(NmodPoly, usize)>> {
    if f.is_zero() {
        return Ok(vec![]);
    }
    if f.is_constant() {
        return Ok(vec![(f.clone(), 1)]);
    }
    let p = f.modulus();
    let deriv = f.derivative();
    if deriv.is_zero() {
        // f(x) = g(x^p) for some g; take the p-th root of exponents.
        let root = p_th_root(f, p);
        let mut sub = squarefree(&root)?;
        for (_, e) in sub.iter_mut() {
            *e *= p as usize;
        }
        return Ok(sub);
    }
    let g = f.gcd(&deriv)?;
    let (mut h, _) = f.div_rem(&g)?;
    let mut current_g = g;
    let mut result = Vec::new();
    let mut i = 1usize;
    while !h.is_constant() {
        let s = current_g.gcd(&h)?;
        let (factor, _) = h.div_rem(&s)?;
        if !factor.is_constant() {
            result.push((factor, i));
        }
        let (new_g, _) = current_g.div_rem(&s)?;
        current_g = new_g;
        h = s;
        i += 1;
        if i > 10_000 {
            break;
        }
    }
    if !current_g.is_constant() {
        // Remaining content is itself a perfect p-th power (derivative
        // was lost along the way); recurse with the twist.
        let mut tail = squarefree(&current_g)?;
        for (factor, e) in tail.drain(..) {
            result.push((factor, e * i));
        }
    }
    if result.is_empty() {
        result.push((NmodPoly::constant(1, p), 1));
    }
    Ok(result)
}

/// Divide every exponent present in `f` by `p`, and raise the
/// corresponding coefficients to the `p`-th root (in `Fp`, the Frobenius
/// `c -> c^p` is the identity by Fermat's little theorem, so the root is
/// just the coefficient itself).
fn p_th_root(f: &NmodPoly, p: u64) -> NmodPoly {
    let mut out = vec![0u64; f.coefficients().len() / p as usize + 1];
    for (i, &c) in f.coefficients().iter().enumerate() {
        if c != 0 {
            debug_assert_eq!(i as u64 % p, 0, "derivative-free poly must only have exponents divisible by p");
            out[i / p as usize] = c;
        }
    }
    NmodPoly::from_coeffs(out, p)
}

/// Frobenius map `x -> x^p mod f`, via binary exponentiation.
fn frobenius_mod(f: &NmodPoly) -> PolyResult<NmodPoly> {
    let p = f.modulus();
    let x = NmodPoly::x(p);
    Ok(pow_mod(&x, p, f)?)
}

fn pow_mod(base: &NmodPoly, exp: u64, modulus_poly: &NmodPoly) -> PolyResult<NmodPoly> {
    let p = modulus_poly.modulus();
    let mut result = NmodPoly::constant(1, p);
    let mut b = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = result.mul(&b).div_rem(modulus_poly)?.1;
        }
        e >>= 1;
        if e > 0 {
            b = b.mul(&b).div_rem(modulus_poly)?.1;
        }
    }
    Ok(result)
}

/// The Berlekamp matrix `Q - I` represented as rows over `Z_p` (dense,
/// `deg(f)` by `deg(f)`).
fn berlekamp_q_minus_i(f: &NmodPoly) -> PolyResult<Vec<Vec<u64>>> {
    let p = f.modulus();
    let d = f.degree().unwrap();
    let x_p = frobenius_mod(f)?;
    let mut rows = Vec::with_capacity(d);
    let mut current = NmodPoly::constant(1, p);
    for i in 0..d {
        let mut row = vec![0u64; d];
        for (j, &c) in current.coefficients().iter().enumerate() {
            if j < d {
                row[j] = c;
            }
        }
        if row[i] >= 1 {
            row[i] = (row[i] + p - 1) % p;
        } else {
            row[i] = p - 1;
        }
        rows.push(row);
        if i + 1 < d {
            current = current.mul(&x_p).div_rem(f)?.1;
        }
    }
    Ok(rows)
}

/// Gaussian elimination over `Z_p` producing a basis of the null space.
fn null_space(mut rows: Vec<Vec<u64>>, p: u64) -> Vec<Vec<u64>> {
    let n = rows.len();
    if n == 0 {
        return vec![];
    }
    let m = rows[0].len();
    let mut pivot_col_of_row = vec![None; n];
    let mut row = 0;
    for col in 0..m {
        if row >= n {
            break;
        }
        let mut sel = None;
        for r in row..n {
            if rows[r][col] != 0 {
                sel = Some(r);
                break;
            }
        }
        let Some(sel) = sel else { continue };
        rows.swap(row, sel);
        let inv = Nmod::new(rows[row][col], p).inverse().unwrap().value();
        for c in 0..m {
            rows[row][c] = (rows[row][c] as u128 * inv as u128 % p as u128) as u64;
        }
        for r in 0..n {
            if r != row && rows[r][col] != 0 {
                let factor = rows[r][col];
                for c in 0..m {
                    let sub = (factor as u128 * rows[row][c] as u128 % p as u128) as u64;
                    rows[r][c] = (rows[r][c] + p - sub % p) % p;
                }
            }
        }
        pivot_col_of_row[row] = Some(col);
        row += 1;
    }
    let pivot_cols: Vec<usize> = pivot_col_of_row.iter().flatten().copied().collect();
    let free_cols: Vec<usize> = (0..m).filter(|c| !pivot_cols.contains(c)).collect();
    let mut basis = Vec::new();
    for &free in &free_cols {
        let mut vec = vec![0u64; m];
        vec[free] = 1;
        for (r, pc) in pivot_col_of_row.iter().enumerate() {
            if let Some(pc) = pc {
                let val = rows[r][free];
                if val != 0 {
                    vec[*pc] = (p - val) % p;
                }
            }
        }
        basis.push(vec);
    }
    basis
}

/// Berlekamp's algorithm: factor a squarefree `f` over `Fp[x]`.
pub fn berlekamp_factor(f: &NmodPoly) -> PolyResult<Vec<NmodPoly>> {
    let p = f.modulus();
    let monic = f.make_monic()?;
    match monic.degree() {
        None => return Ok(vec![]),
        Some(0) => return Ok(vec![]),
        Some(1) => return Ok(vec![monic]),
        _ => {}
    }
    let q_minus_i = berlekamp_q_minus_i(&monic)?;
    let basis = null_space(q_minus_i, p);
    let mut factors = vec![monic];
    for v in &basis {
        if factors.len() == basis.len() {
            break;
        }
        let vpoly = NmodPoly::from_coeffs(v.clone(), p);
        let mut next_round = Vec::new();
        for factor in factors.drain(..) {
            if factor.degree() == Some(1) || factor.degree() == Some(0) {
                next_round.push(factor);
                continue;
            }
            let mut remaining = factor.clone();
            for c in 0..p {
                if remaining.degree().map_or(false, |d| d <= 1) {
                    break;
                }
                let shifted = vpoly.sub(&NmodPoly::constant(c, p));
                let g = remaining.gcd(&shifted)?;
                if !g.is_constant() && g.degree() != remaining.degree() {
                    let (q, _) = remaining.div_rem(&g)?;
                    next_round.push(g);
                    remaining = q;
                }
            }
            next_round.push(remaining);
        }
        factors = next_round;
    }
    Ok(factors.into_iter().filter(|f| !f.is_constant()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squarefree_detects_repeated_linear_factor() {
        let m = 101;
        let x_minus_1 = NmodPoly::from_signed_coeffs(&[-1, 1], m);
        let squared = x_minus_1.mul(&x_minus_1);
        let factors = squarefree(&squared).unwrap();
        assert!(factors.iter().any(|(_, e)| *e == 2));
    }

    #[test]
    fn squarefree_passes_through_already_squarefree_input() {
        let m = 97;
        let f = NmodPoly::from_signed_coeffs(&[-1, 0, 1], m); // x^2 - 1
        let factors = squarefree(&f).unwrap();
        assert!(factors.iter().all(|(_, e)| *e == 1));
    }

    #[test]
    fn berlekamp_splits_product_of_distinct_linears() {
        let m = 7;
        let f = NmodPoly::from_signed_coeffs(&[-1, 1], m).mul(&NmodPoly::from_signed_coeffs(&[-2, 1], m));
        let factors = berlekamp_factor(&f).unwrap();
        assert_eq!(factors.len(), 2);
        for factor in &factors {
            assert_eq!(factor.degree(), Some(1));
        }
    }

    #[test]
    fn berlekamp_reports_irreducible_quadratic_as_single_factor() {
        // x^2 + 1 is irreducible over F3 (no root: 0,1,2 -> 1,2,2).
        let m = 3;
        let f = NmodPoly::from_signed_coeffs(&[1, 0, 1], m);
        let factors = berlekamp_factor(&f).unwrap();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].degree(), Some(2));
    }
}
