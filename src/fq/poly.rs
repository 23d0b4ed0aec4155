//! Dense univariate polynomials over `Fq` (L1, `n_fq_poly`, §4.1)
//!
//! Parallel structure to [`crate::nmod::poly::NmodPoly`], generalised to
//! `Fq` coefficients. Because `Fq` multiplication needs the extension
//! context for reduction, every arithmetic method here takes `&FqCtx`
//! explicitly rather than relying on `Ring`'s context-free operators —
//! the same context-threading discipline §5/§6.5 require of the core.

pub mod factor;

use super::{FqCtx, FqElem};
use crate::error::{PolyError, PolyResult};

/// Dense univariate polynomial over `Fq`, coefficients ascending.
#[derive(Clone, PartialEq, Debug)]
pub struct FqPoly {
    coeffs: Vec<FqElem>,
}

impl FqPoly {
    pub fn from_coeffs(mut coeffs: Vec<FqElem>) -> Self {
        while coeffs.last().map_or(false, |c| c.is_zero()) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn constant(c: FqElem) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self { coeffs: vec![c] }
        }
    }

    pub fn x(ctx: &FqCtx) -> Self {
        Self { coeffs: vec![ctx.zero(), ctx.one()] }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    pub fn degree(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn leading_coeff(&self) -> Option<&FqElem> {
        self.coeffs.last()
    }

    pub fn coeff(&self, ctx: &FqCtx, i: usize) -> FqElem {
        self.coeffs.get(i).cloned().unwrap_or_else(|| ctx.zero())
    }

    pub fn coefficients(&self) -> &[FqElem] {
        &self.coeffs
    }

    pub fn add(&self, ctx: &FqCtx, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.coeff(ctx, i);
            let b = other.coeff(ctx, i);
            out.push(ctx.add(&a, &b));
        }
        Self::from_coeffs(out)
    }

    pub fn sub(&self, ctx: &FqCtx, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.coeff(ctx, i);
            let b = other.coeff(ctx, i);
            out.push(ctx.sub(&a, &b));
        }
        Self::from_coeffs(out)
    }

    pub fn neg(&self, ctx: &FqCtx) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|c| ctx.neg(c)).collect())
    }

    pub fn scalar_mul(&self, ctx: &FqCtx, c: &FqElem) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|a| ctx.mul(a, c)).collect())
    }

    pub fn mul(&self, ctx: &FqCtx, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        self.mullow(ctx, other, self.coeffs.len() + other.coeffs.len() - 1)
    }

    /// `mullow(a, b, n)` (§4.1).
    pub fn mullow(&self, ctx: &FqCtx, other: &Self, n: usize) -> Self {
        if self.is_zero() || other.is_zero() || n == 0 {
            return Self::zero();
        }
        let mut acc = vec![ctx.zero(); n];
        for (i, ai) in self.coeffs.iter().enumerate() {
            if i >= n || ai.is_zero() {
                continue;
            }
            for (j, bj) in other.coeffs.iter().enumerate() {
                if i + j >= n {
                    break;
                }
                let term = ctx.mul(ai, bj);
                acc[i + j] = ctx.add(&acc[i + j], &term);
            }
        }
        Self::from_coeffs(acc)
    }

    pub fn div_rem(&self, ctx: &FqCtx, other: &Self) -> PolyResult<(Self, Self)> {
        if other.is_zero() {
            return Err(PolyError::DivisionByZero);
        }
        let lc_inv = ctx.inv(other.leading_coeff().unwrap())?;
        let db = other.degree().unwrap();
        let mut rem = self.coeffs.clone();
        let mut quo = vec![ctx.zero(); rem.len().saturating_sub(db)];
        while rem.len() > db {
            let da = rem.len() - 1;
            if rem.last().unwrap().is_zero() {
                rem.pop();
                continue;
            }
            let coeff = ctx.mul(rem.last().unwrap(), &lc_inv);
            let shift = da - db;
            for (j, bc) in other.coeffs.iter().enumerate() {
                let term = ctx.mul(&coeff, bc);
                rem[shift + j] = ctx.sub(&rem[shift + j], &term);
            }
            quo[shift] = coeff;
            while rem.last().map_or(false, |c| c.is_zero()) {
                rem.pop();
            }
        }
        Ok((Self::from_coeffs(quo), Self::from_coeffs(rem)))
    }

    pub fn gcd(&self, ctx: &FqCtx) -> GcdBuilder<'_> {
        GcdBuilder { ctx, lhs: self }
    }

    pub fn make_monic(&self, ctx: &FqCtx) -> PolyResult<Self> {
        if self.is_zero() {
            return Err(PolyError::EmptyPolynomial);
        }
        let lc = self.leading_coeff().unwrap().clone();
        let inv = ctx.inv(&lc)?;
        Ok(self.scalar_mul(ctx, &inv))
    }

    pub fn derivative(&self, ctx: &FqCtx) -> Self {
        if self.coeffs.len() <= 1 {
            return Self::zero();
        }
        let mut out = Vec::with_capacity(self.coeffs.len() - 1);
        for (i, c) in self.coeffs[1..].iter().enumerate() {
            let scalar = ctx.from_base(crate::nmod::Nmod::new((i + 1) as u64, ctx.characteristic()));
            out.push(ctx.mul(c, &scalar));
        }
        Self::from_coeffs(out)
    }

    pub fn evaluate(&self, ctx: &FqCtx, x: &FqElem) -> FqElem {
        let mut acc = ctx.zero();
        for c in self.coeffs.iter().rev() {
            acc = ctx.add(&ctx.mul(&acc, x), c);
        }
        acc
    }
}

/// Small helper type so `poly.gcd(ctx).with(&other)` reads naturally
/// while keeping the context argument out of the common-case call sites.
pub struct GcdBuilder<'a> {
    ctx: &'a FqCtx,
    lhs: &'a FqPoly,
}

impl<'a> GcdBuilder<'a> {
    pub fn with(self, other: &FqPoly) -> PolyResult<FqPoly> {
        let (mut a, mut b) = (self.lhs.clone(), other.clone());
        while !b.is_zero() {
            let (_, r) = a.div_rem(self.ctx, &b)?;
            a = b;
            b = r;
        }
        a.make_monic(self.ctx)
    }

    pub fn extended(self, other: &FqPoly) -> PolyResult<(FqPoly, FqPoly, FqPoly)> {
        let ctx = self.ctx;
        let (mut old_r, mut r) = (self.lhs.clone(), other.clone());
        let (mut old_s, mut s) = (FqPoly::constant(ctx.one()), FqPoly::zero());
        let (mut old_t, mut t) = (FqPoly::zero(), FqPoly::constant(ctx.one()));
        while !r.is_zero() {
            let (q, rem) = old_r.div_rem(ctx, &r)?;
            old_r = r;
            r = rem;
            let new_s = old_s.sub(ctx, &q.mul(ctx, &s));
            old_s = s;
            s = new_s;
            let new_t = old_t.sub(ctx, &q.mul(ctx, &t));
            old_t = t;
            t = new_t;
        }
        if old_r.is_zero() {
            return Ok((old_r, old_s, old_t));
        }
        let inv = ctx.inv(old_r.leading_coeff().unwrap())?;
        Ok((old_r.scalar_mul(ctx, &inv), old_s.scalar_mul(ctx, &inv), old_t.scalar_mul(ctx, &inv)))
    }
}

impl FqPoly {
    /// `inv_series(q, len)`, schoolbook recurrence generalised from
    /// [`crate::nmod::poly::NmodPoly::inv_series`].
    pub fn inv_series(&self, ctx: &FqCtx, len: usize) -> PolyResult<Self> {
        let c0 = self.coeff(ctx, 0);
        if c0.is_zero() {
            return Err(PolyError::InvalidEvaluationPoint { reason: "constant term is zero" });
        }
        let inv0 = ctx.inv(&c0)?;
        let mut out = vec![ctx.zero(); len];
        out[0] = inv0.clone();
        for k in 1..len {
            let mut acc = ctx.zero();
            for i in 1..=k {
                let qi = self.coeff(ctx, i);
                if qi.is_zero() {
                    continue;
                }
                let term = ctx.mul(&qi, &out[k - i]);
                acc = ctx.add(&acc, &term);
            }
            out[k] = ctx.neg(&ctx.mul(&acc, &inv0));
        }
        Ok(Self::from_coeffs(out))
    }

    /// `pow_ui_trunc(f, exp, n)`, same leading-zero peel as the prime-
    /// field variant.
    pub fn pow_ui_trunc(&self, ctx: &FqCtx, exp: u64, n: usize) -> Self {
        if n == 0 {
            return Self::zero();
        }
        if exp == 0 {
            return Self::constant(ctx.one());
        }
        if self.is_zero() {
            return Self::zero();
        }
        let r = self.coeffs.iter().take_while(|c| c.is_zero()).count();
        let rm = r as u64 * exp;
        if rm as usize >= n {
            return Self::zero();
        }
        let g = Self::from_coeffs(self.coeffs[r..].to_vec());
        let trunc_n = n - rm as usize;
        let mut result = Self::constant(ctx.one());
        let mut base = g;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.mullow(ctx, &base, trunc_n);
            }
            e >>= 1;
            if e > 0 {
                base = base.mullow(ctx, &base, trunc_n);
            }
        }
        let mut out = vec![ctx.zero(); rm as usize];
        out.extend(result.coeffs);
        out.truncate(n);
        Self::from_coeffs(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmod::poly::NmodPoly;

    fn gf9() -> FqCtx {
        FqCtx::new(3, NmodPoly::from_signed_coeffs(&[1, 0, 1], 3)).unwrap()
    }

    #[test]
    fn divrem_round_trips_over_fq() {
        let ctx = gf9();
        let a_gen = ctx.generator();
        let a = FqPoly::from_coeffs(vec![ctx.one(), a_gen.clone(), ctx.one()]);
        let b = FqPoly::from_coeffs(vec![ctx.one(), ctx.one()]);
        let (q, r) = a.div_rem(&ctx, &b).unwrap();
        let recon = q.mul(&ctx, &b).add(&ctx, &r);
        assert_eq!(recon, a);
    }

    #[test]
    fn gcd_of_identical_polynomials_is_itself_monic() {
        let ctx = gf9();
        let a = FqPoly::from_coeffs(vec![ctx.one(), ctx.generator()]);
        let g = a.gcd(&ctx).with(&a).unwrap();
        let expected = a.make_monic(&ctx).unwrap();
        assert_eq!(g, expected);
    }

    #[test]
    fn inv_series_satisfies_defining_identity() {
        let ctx = gf9();
        let a = FqPoly::from_coeffs(vec![ctx.one(), ctx.generator(), ctx.one()]);
        let n = 5;
        let inv = a.inv_series(&ctx, n).unwrap();
        let prod = a.mullow(&ctx, &inv, n);
        let mut expected = vec![ctx.zero(); n];
        expected[0] = ctx.one();
        assert_eq!(prod.coefficients(), &expected[..]);
    }
}
