//! Bivariate packed polynomials over `Fp` (L2, `n_bpoly`, §3.3)
//!
//! A bivariate polynomial represented as `coeffs[i]` = the coefficient of
//! `y^i`, itself a dense [`NmodPoly`] in `x`. Grounded on the teacher's
//! `sparse_polynomial` two-variable specialisation collapsed to the
//! dense-in-`y` packed layout §3.3 calls for — the outer variable is kept
//! dense (a plain `Vec`) since Brown's and the Hensel-lifting algorithms
//! both iterate every power of `y` up to a known bound.

pub mod factor;
pub mod gcd;
pub mod hensel;

use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;

#[derive(Debug, Clone, PartialEq)]
pub struct BPoly {
    /// `coeffs[i]` is the coefficient of `y^i`.
    coeffs: Vec<NmodPoly>,
    modulus: u64,
}

impl BPoly {
    pub fn zero(modulus: u64) -> Self {
        Self { coeffs: Vec::new(), modulus }
    }

    pub fn from_coeffs(mut coeffs: Vec<NmodPoly>, modulus: u64) -> Self {
        while coeffs.last().map_or(false, |c| c.is_zero()) {
            coeffs.pop();
        }
        Self { coeffs, modulus }
    }

    pub fn constant_in_x(p: NmodPoly, modulus: u64) -> Self {
        if p.is_zero() {
            Self::zero(modulus)
        } else {
            Self { coeffs: vec![p], modulus }
        }
    }

    pub fn y(modulus: u64) -> Self {
        Self { coeffs: vec![NmodPoly::zero(modulus), NmodPoly::constant(Nmod::new(1, modulus))], modulus }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    pub fn degree_y(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn degree_x(&self) -> Option<usize> {
        self.coeffs.iter().filter_map(|c| c.degree()).max()
    }

    pub fn coeff_y(&self, i: usize) -> NmodPoly {
        self.coeffs.get(i).cloned().unwrap_or_else(|| NmodPoly::zero(self.modulus))
    }

    pub fn coeffs(&self) -> &[NmodPoly] {
        &self.coeffs
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn leading_coeff_y(&self) -> Option<&NmodPoly> {
        self.coeffs.last()
    }

    pub fn add(&self, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            out.push(self.coeff_y(i).add(&other.coeff_y(i)));
        }
        Self::from_coeffs(out, self.modulus)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            out.push(self.coeff_y(i).sub(&other.coeff_y(i)));
        }
        Self::from_coeffs(out, self.modulus)
    }

    pub fn neg(&self) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|c| c.neg()).collect(), self.modulus)
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.modulus);
        }
        let n = self.coeffs.len() + other.coeffs.len() - 1;
        let mut out = vec![NmodPoly::zero(self.modulus); n];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] = out[i + j].add(&a.mul(b));
            }
        }
        Self::from_coeffs(out, self.modulus)
    }

    /// Evaluate at a concrete value of `y`, collapsing to a univariate
    /// polynomial in `x` (Horner in the outer variable).
    pub fn evaluate_y(&self, value: Nmod) -> NmodPoly {
        let mut acc = NmodPoly::zero(self.modulus);
        for c in self.coeffs.iter().rev() {
            acc = acc.scalar_mul(value).add(c);
        }
        acc
    }

    /// Shift `y -> y + a`, used by the Hensel lifters to recentre a
    /// factorisation known at `y = a` onto `y = 0` (Taylor-shift via
    /// repeated synthetic evaluation of the coefficient array, the same
    /// technique `NmodPoly::evaluate` uses one variable down).
    pub fn shift_y(&self, a: Nmod) -> Self {
        // Horner-style Taylor shift: build up coeffs_shifted such that
        // sum coeffs_shifted[i] (y')^i = sum coeffs[i] (y' + a)^i.
        let n = self.coeffs.len();
        if n == 0 {
            return self.clone();
        }
        let mut table = self.coeffs.clone();
        for i in 1..n {
            for j in (i..n).rev() {
                let shifted = table[j].scalar_mul(a);
                table[j - 1] = table[j - 1].add(&shifted);
            }
        }
        Self::from_coeffs(table, self.modulus)
    }

    pub fn truncate_y(&self, n: usize) -> Self {
        let mut c = self.coeffs.clone();
        c.truncate(n);
        Self::from_coeffs(c, self.modulus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_y_matches_hand_expansion() {
        // f = x + y + x*y, evaluate at y = 2: x + 2 + 2x = 3x + 2
        let modulus = 101;
        let coeff0 = NmodPoly::from_signed_coeffs(&[0, 1], modulus); // x
        let coeff1 = NmodPoly::from_signed_coeffs(&[1, 1], modulus); // 1 + x
        let f = BPoly::from_coeffs(vec![coeff0, coeff1], modulus);
        let evaluated = f.evaluate_y(Nmod::new(2, modulus));
        assert_eq!(evaluated.coefficients(), &[2, 3]);
    }

    #[test]
    fn shift_y_matches_evaluate_y_at_the_shift_point() {
        let modulus = 101;
        let coeff0 = NmodPoly::from_signed_coeffs(&[1], modulus);
        let coeff1 = NmodPoly::from_signed_coeffs(&[0, 1], modulus);
        let coeff2 = NmodPoly::from_signed_coeffs(&[2], modulus);
        let f = BPoly::from_coeffs(vec![coeff0, coeff1, coeff2], modulus);
        let shifted = f.shift_y(Nmod::new(3, modulus));
        // constant-in-y term of the shifted polynomial equals f evaluated at y=3
        assert_eq!(shifted.coeff_y(0), f.evaluate_y(Nmod::new(3, modulus)));
    }
}
