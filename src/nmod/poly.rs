//! Dense univariate polynomials over `Fp` (L1, `n_poly`/`nmod_poly`, §4.1)
//!
//! Grounded on the teacher's `finite_field::poly` (`PolyZp`) for the
//! representation and basic arithmetic, extended with the series
//! operations (`mullow`, `inv_series`, `div_series`, `log_series`,
//! `atan_series`, `pow_ui_trunc`, `reverse`) §4.1 names explicitly, and
//! with `gcd`/`xgcd` grounded on the teacher's `finite_field::gcd`.

pub mod factor;

use super::Nmod;
use crate::error::{PolyError, PolyResult};
use serde::{Deserialize, Serialize};

/// Dense univariate polynomial over `Z_p`, coefficients ascending
/// (index `i` = coefficient of `x^i`). Leading coefficient is nonzero
/// except for the zero polynomial (empty `coeffs`), matching the
/// teacher's `PolyZp` invariant.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NmodPoly {
    coeffs: Vec<u64>,
    modulus: u64,
}

impl NmodPoly {
    #[inline]
    pub fn from_coeffs(mut coeffs: Vec<u64>, modulus: u64) -> Self {
        for c in coeffs.iter_mut() {
            *c %= modulus;
        }
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Self { coeffs, modulus }
    }

    pub fn from_signed_coeffs(coeffs: &[i64], modulus: u64) -> Self {
        let m = modulus as i64;
        let normalized: Vec<u64> = coeffs.iter().map(|&c| (((c % m) + m) % m) as u64).collect();
        Self::from_coeffs(normalized, modulus)
    }

    #[inline]
    pub fn zero(modulus: u64) -> Self {
        Self { coeffs: Vec::new(), modulus }
    }

    #[inline]
    pub fn constant(c: u64, modulus: u64) -> Self {
        Self::from_coeffs(vec![c], modulus)
    }

    #[inline]
    pub fn x(modulus: u64) -> Self {
        Self { coeffs: vec![0, 1], modulus }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    #[inline]
    pub fn degree(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    #[inline]
    pub fn leading_coeff(&self) -> Option<Nmod> {
        self.coeffs.last().map(|&c| Nmod::new(c, self.modulus))
    }

    #[inline]
    pub fn coeff(&self, i: usize) -> Nmod {
        Nmod::new(self.coeffs.get(i).copied().unwrap_or(0), self.modulus)
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    #[inline]
    pub fn coefficients(&self) -> &[u64] {
        &self.coeffs
    }

    pub fn add(&self, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.coeffs.get(i).copied().unwrap_or(0);
            let b = other.coeffs.get(i).copied().unwrap_or(0);
            out.push((a + b) % self.modulus);
        }
        Self::from_coeffs(out, self.modulus)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.coeffs.get(i).copied().unwrap_or(0);
            let b = other.coeffs.get(i).copied().unwrap_or(0);
            out.push(if a >= b { a - b } else { self.modulus - (b - a) });
        }
        Self::from_coeffs(out, self.modulus)
    }

    pub fn neg(&self) -> Self {
        Self::zero(self.modulus).sub(self)
    }

    pub fn scalar_mul(&self, c: Nmod) -> Self {
        let out: Vec<u64> = self.coeffs.iter().map(|&a| (Nmod::new(a, self.modulus) * c).value()).collect();
        Self::from_coeffs(out, self.modulus)
    }

    /// Full schoolbook multiplication, `O(n*m)`.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.modulus);
        }
        let out = mullow_coeffs(&self.coeffs, &other.coeffs, self.modulus, self.coeffs.len() + other.coeffs.len() - 1);
        Self::from_coeffs(out, self.modulus)
    }

    /// `mullow(a, b, n)`: the first `n` coefficients of `a*b` (§4.1).
    /// Schoolbook; the Kronecker fast-multiplication branch for `QQ`/CA
    /// coefficients mentioned in §4.1 is specific to the CA layer
    /// (`ca::poly::mullow`) and has no analogue over a prime field where
    /// every nonzero element is already a machine word.
    pub fn mullow(&self, other: &Self, n: usize) -> Self {
        if self.is_zero() || other.is_zero() || n == 0 {
            return Self::zero(self.modulus);
        }
        let out = mullow_coeffs(&self.coeffs, &other.coeffs, self.modulus, n);
        Self::from_coeffs(out, self.modulus)
    }

    /// `divrem(a, b)`: Euclidean division, `b` nonzero.
    pub fn div_rem(&self, other: &Self) -> PolyResult<(Self, Self)> {
        if other.is_zero() {
            return Err(PolyError::DivisionByZero);
        }
        let lc_inv = other.leading_coeff().unwrap().inverse()?;
        let mut rem = self.coeffs.clone();
        let db = other.degree().unwrap();
        let mut quo = vec![0u64; rem.len().saturating_sub(db)];
        while rem.len() > db {
            let da = rem.len() - 1;
            let lead = Nmod::new(*rem.last().unwrap(), self.modulus);
            if lead.is_zero() {
                rem.pop();
                continue;
            }
            let coeff = (lead * lc_inv).value();
            let shift = da - db;
            for (j, &bc) in other.coeffs.iter().enumerate() {
                let idx = shift + j;
                let sub = (coeff as u128 * bc as u128 % self.modulus as u128) as u64;
                rem[idx] = if rem[idx] >= sub { rem[idx] - sub } else { self.modulus - (sub - rem[idx]) };
            }
            quo[shift] = coeff;
            while rem.last() == Some(&0) {
                rem.pop();
            }
        }
        Ok((Self::from_coeffs(quo, self.modulus), Self::from_coeffs(rem, self.modulus)))
    }

    /// `gcd(a, b)`: Euclidean remainder sequence, monic result.
    pub fn gcd(&self, other: &Self) -> PolyResult<Self> {
        let (mut a, mut b) = (self.clone(), other.clone());
        while !b.is_zero() {
            let (_, r) = a.div_rem(&b)?;
            a = b;
            b = r;
        }
        a.make_monic()
    }

    /// `xgcd(a, b)`: extended Euclidean, returns `(g, s, t)` with
    /// `g = s*a + t*b`.
    pub fn xgcd(&self, other: &Self) -> PolyResult<(Self, Self, Self)> {
        let modulus = self.modulus;
        let (mut old_r, mut r) = (self.clone(), other.clone());
        let (mut old_s, mut s) = (Self::constant(1, modulus), Self::zero(modulus));
        let (mut old_t, mut t) = (Self::zero(modulus), Self::constant(1, modulus));
        while !r.is_zero() {
            let (q, rem) = old_r.div_rem(&r)?;
            old_r = r;
            r = rem;
            let new_s = old_s.sub(&q.mul(&s));
            old_s = s;
            s = new_s;
            let new_t = old_t.sub(&q.mul(&t));
            old_t = t;
            t = new_t;
        }
        if old_r.is_zero() {
            return Ok((old_r, old_s, old_t));
        }
        let lc_inv = old_r.leading_coeff().unwrap().inverse()?;
        Ok((old_r.scalar_mul(lc_inv), old_s.scalar_mul(lc_inv), old_t.scalar_mul(lc_inv)))
    }

    pub fn make_monic(&self) -> PolyResult<Self> {
        if self.is_zero() {
            return Err(PolyError::EmptyPolynomial);
        }
        let lc = self.leading_coeff().unwrap();
        if lc.is_one() {
            return Ok(self.clone());
        }
        Ok(self.scalar_mul(lc.inverse()?))
    }

    pub fn derivative(&self) -> Self {
        if self.coeffs.len() <= 1 {
            return Self::zero(self.modulus);
        }
        let out: Vec<u64> = self.coeffs[1..]
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let i1 = Nmod::new((i + 1) as u64, self.modulus);
                (Nmod::new(c, self.modulus) * i1).value()
            })
            .collect();
        Self::from_coeffs(out, self.modulus)
    }

    pub fn evaluate(&self, x: Nmod) -> Nmod {
        let mut acc = Nmod::new(0, self.modulus);
        for &c in self.coeffs.iter().rev() {
            acc = acc * x + Nmod::new(c, self.modulus);
        }
        acc
    }

    /// `inv_series(q, len)`: power-series inverse mod `x^len`. Schoolbook
    /// Newton-free recurrence (§4.1's Newton-doubling branch applies
    /// above `deg(q) >= 8` with a fast-multiplication backend; the prime
    /// field's `mullow` is already `O(n*m)` schoolbook so the doubling
    /// variant buys nothing here and is not duplicated — see DESIGN.md).
    /// Fails iff `q(0) == 0`.
    pub fn inv_series(&self, len: usize) -> PolyResult<Self> {
        let c0 = self.coeff(0);
        if c0.is_zero() {
            return Err(PolyError::InvalidEvaluationPoint { reason: "constant term is zero" });
        }
        let inv0 = c0.inverse()?;
        let mut out = vec![0u64; len];
        out[0] = inv0.value();
        for k in 1..len {
            // out[k] = -inv0 * sum_{i=1}^{k} q[i] * out[k-i]
            let mut acc = Nmod::new(0, self.modulus);
            for i in 1..=k {
                let qi = self.coeff(i);
                if qi.is_zero() {
                    continue;
                }
                acc = acc + qi * Nmod::new(out[k - i], self.modulus);
            }
            out[k] = (Nmod::new(0, self.modulus) - acc * inv0).value();
        }
        Ok(Self::from_coeffs(out, self.modulus))
    }

    /// `div_series(a, b, n) = a * inv_series(b, n) mod x^n`.
    pub fn div_series(&self, other: &Self, n: usize) -> PolyResult<Self> {
        let inv = other.inv_series(n)?;
        Ok(self.mullow(&inv, n))
    }

    /// `log_series(f, n)`: `log(f) = integral(f'/f)`, valid for `f(0) = 1`.
    pub fn log_series(&self, n: usize) -> PolyResult<Self> {
        if !self.coeff(0).is_one() {
            return Err(PolyError::InvalidEvaluationPoint { reason: "log_series requires f(0) = 1" });
        }
        if n == 0 {
            return Ok(Self::zero(self.modulus));
        }
        let deriv = self.derivative();
        let ratio = deriv.div_series(self, n.saturating_sub(1).max(1))?;
        integrate(&ratio, n, self.modulus)
    }

    /// `atan_series(f, n)`: `atan(f) = integral(f'/(1+f^2))`, valid for
    /// `f(0)` not equal to a square root of `-1` in the field (so that
    /// `1+f(0)^2 != 0`).
    pub fn atan_series(&self, n: usize) -> PolyResult<Self> {
        let one_plus_f2 = {
            let f2 = self.mullow(self, n.max(1));
            Self::constant(1, self.modulus).add(&f2)
        };
        if one_plus_f2.coeff(0).is_zero() {
            return Err(PolyError::InvalidEvaluationPoint { reason: "1 + f(0)^2 vanishes" });
        }
        if n == 0 {
            return Ok(Self::zero(self.modulus));
        }
        let deriv = self.derivative();
        let ratio = deriv.div_series(&one_plus_f2, n.saturating_sub(1).max(1))?;
        integrate(&ratio, n, self.modulus)
    }

    /// `pow_ui_trunc(f, exp, n)`: `f^exp mod x^n` via binary
    /// exponentiation, peeling a leading `x^r` factor first as §4.1
    /// describes so that `(x^r * g)^m = x^{rm} * g^m` is computed on the
    /// smaller `g`.
    pub fn pow_ui_trunc(&self, exp: u64, n: usize) -> Self {
        if n == 0 || exp == 0 {
            return if exp == 0 && n > 0 { Self::constant(1, self.modulus) } else { Self::zero(self.modulus) };
        }
        if self.is_zero() {
            return Self::zero(self.modulus);
        }
        let r = self.coeffs.iter().take_while(|&&c| c == 0).count();
        let rm = r as u64 * exp;
        if rm as usize >= n {
            return Self::zero(self.modulus);
        }
        let g = Self::from_coeffs(self.coeffs[r..].to_vec(), self.modulus);
        let trunc_n = n - rm as usize;
        let mut result = Self::constant(1, self.modulus);
        let mut base = g;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.mullow(&base, trunc_n);
            }
            e >>= 1;
            if e > 0 {
                base = base.mullow(&base, trunc_n);
            }
        }
        let mut out = vec![0u64; rm as usize];
        out.extend_from_slice(&result.coeffs);
        out.truncate(n);
        Self::from_coeffs(out, self.modulus)
    }

    /// `reverse(f, len, n)`: `res[i] = f[n-1-i]`, zero-padded if `n >
    /// len`. Supports the "in-place" contract trivially since Rust's
    /// `Vec` does not alias.
    pub fn reverse(&self, len: usize, n: usize) -> Self {
        let mut out = vec![0u64; n];
        for i in 0..n {
            if i < n && (n - 1 - i) < len {
                out[i] = self.coeffs.get(n - 1 - i).copied().unwrap_or(0);
            }
        }
        Self::from_coeffs(out, self.modulus)
    }
}

/// Naive convolution shared by `mul`/`mullow`.
fn mullow_coeffs(a: &[u64], b: &[u64], modulus: u64, n: usize) -> Vec<u64> {
    let mut acc = vec![0u128; n];
    for (i, &ai) in a.iter().enumerate() {
        if i >= n {
            break;
        }
        if ai == 0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            if i + j >= n {
                break;
            }
            acc[i + j] += ai as u128 * bj as u128;
        }
    }
    acc.iter().map(|&v| (v % modulus as u128) as u64).collect()
}

/// Term-by-term antiderivative with zero constant term: if `ratio =
/// sum r_i x^i` (valid for `i` in `0..n-1`), returns `sum r_i/(i+1)
/// x^{i+1}` truncated to `n` terms.
fn integrate(ratio: &NmodPoly, n: usize, modulus: u64) -> PolyResult<NmodPoly> {
    let mut out = vec![0u64; n];
    for i in 0..n.saturating_sub(1) {
        let ri = ratio.coeff(i);
        if ri.is_zero() {
            continue;
        }
        let denom = Nmod::new((i + 1) as u64, modulus).inverse()?;
        out[i + 1] = (ri * denom).value();
    }
    Ok(NmodPoly::from_coeffs(out, modulus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmod::NmodCtx;

    #[test]
    fn mullow_matches_prefix_of_full_mul() {
        let m = 101;
        let a = NmodPoly::from_signed_coeffs(&[1, 2, 3], m);
        let b = NmodPoly::from_signed_coeffs(&[4, 5, 6, 7], m);
        let full = a.mul(&b);
        let low = a.mullow(&b, 3);
        assert_eq!(low.coefficients(), &full.coefficients()[..3]);
    }

    #[test]
    fn divrem_round_trips() {
        let m = 97;
        let a = NmodPoly::from_signed_coeffs(&[-1, 0, 1, 1], m); // x^3+x^2-1
        let b = NmodPoly::from_signed_coeffs(&[1, 1], m); // x+1
        let (q, r) = a.div_rem(&b).unwrap();
        let recon = q.mul(&b).add(&r);
        assert_eq!(recon, a);
    }

    #[test]
    fn inv_series_satisfies_defining_identity() {
        let m = 101;
        let a = NmodPoly::from_signed_coeffs(&[1, 2, 3, 4], m);
        let n = 6;
        let inv = a.inv_series(n).unwrap();
        let prod = a.mullow(&inv, n);
        let mut expected = vec![0u64; n];
        expected[0] = 1;
        assert_eq!(prod.coefficients(), &expected[..]);
    }

    #[test]
    fn xgcd_satisfies_bezout_identity() {
        let ctx = NmodCtx::new(13).unwrap();
        let _ = ctx;
        let m = 13;
        let a = NmodPoly::from_signed_coeffs(&[-1, 0, 1], m); // x^2 - 1
        let b = NmodPoly::from_signed_coeffs(&[-1, 1], m); // x - 1
        let (g, s, t) = a.xgcd(&b).unwrap();
        let recon = s.mul(&a).add(&t.mul(&b));
        assert_eq!(recon, g);
    }

    #[test]
    fn pow_ui_trunc_matches_binomial_expansion() {
        // (1+x)^5 mod x^4 = 1 + 5x + 10x^2 + 10x^3, per spec scenario (e).
        let m = 1_000_000_007;
        let f = NmodPoly::from_signed_coeffs(&[1, 1], m);
        let truncated = f.pow_ui_trunc(5, 4);
        assert_eq!(truncated.coefficients(), &[1, 5, 10, 10]);
    }

    #[test]
    fn reverse_is_involutive_on_full_length() {
        let m = 101;
        let a = NmodPoly::from_signed_coeffs(&[1, 2, 3, 4], m);
        let len = a.coefficients().len();
        let r = a.reverse(len, len);
        let rr = r.reverse(len, len);
        assert_eq!(rr, a);
    }

    #[test]
    fn log_series_derivative_law() {
        // log(1+x) has derivative 1/(1+x); check mullow(log', 1+x) == 1 (mod x^n)
        let m = 1_000_000_007;
        let f = NmodPoly::from_signed_coeffs(&[1, 1], m);
        let n = 5;
        let l = f.log_series(n).unwrap();
        let ld = l.derivative();
        let prod = ld.mullow(&f, n - 1);
        let mut expected = vec![0u64; n - 1];
        expected[0] = 1;
        assert_eq!(prod.coefficients(), &expected[..]);
    }
}
