//! Finite field of prime-power order `Fq = Fp[a]/(m(a))` (§3.1, the
//! "fq_nmod" layer)
//!
//! Elements are coefficient vectors of length `d` over `Fp`, reduced
//! modulo an irreducible minimal polynomial `m` of degree `d`. Built on
//! top of [`crate::nmod`] rather than duplicating prime-field arithmetic,
//! mirroring how the original layers `Fq` on top of `nmod` rather than
//! re-deriving modular arithmetic.

pub mod poly;

use crate::error::{PolyError, PolyResult};
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;
use crate::ring::{EuclideanDomain, Field, PowCache, Ring};
use std::fmt;

/// Context for `Fq`: prime characteristic `p`, extension degree `d`, and
/// the minimal polynomial `modulus` (monic, degree `d`, irreducible over
/// `Fp` — irreducibility is the caller's responsibility, matching
/// `ctx_init` in §6.5 which does not re-verify it either).
#[derive(Clone)]
pub struct FqCtx {
    p: u64,
    d: usize,
    modulus_poly: NmodPoly,
}

impl fmt::Debug for FqCtx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FqCtx").field("p", &self.p).field("d", &self.d).finish()
    }
}

impl FqCtx {
    /// `ctx_init(p, d, name)` (§6.5); `modulus_poly` must be monic of
    /// degree `d`.
    pub fn new(p: u64, modulus_poly: NmodPoly) -> PolyResult<Self> {
        let d = modulus_poly.degree().ok_or(PolyError::InvariantViolation { reason: "minimal polynomial must be nonzero" })?;
        if !modulus_poly.leading_coeff().unwrap().is_one() {
            return Err(PolyError::InvariantViolation { reason: "minimal polynomial must be monic" });
        }
        Ok(Self { p, d, modulus_poly })
    }

    pub fn characteristic(&self) -> u64 {
        self.p
    }

    pub fn degree(&self) -> usize {
        self.d
    }

    pub fn zero(&self) -> FqElem {
        FqElem { rep: NmodPoly::zero(self.p) }
    }

    pub fn one(&self) -> FqElem {
        FqElem { rep: NmodPoly::constant(1, self.p) }
    }

    pub fn from_base(&self, c: Nmod) -> FqElem {
        FqElem { rep: NmodPoly::constant(c.value(), self.p) }
    }

    /// The generator `a` (the class of `x` modulo `m(a)`).
    pub fn generator(&self) -> FqElem {
        FqElem { rep: NmodPoly::x(self.p) }
    }

    fn reduce(&self, poly: NmodPoly) -> FqElem {
        if poly.degree().map_or(false, |deg| deg >= self.d) {
            let (_, r) = poly.div_rem(&self.modulus_poly).expect("minimal polynomial is nonzero");
            FqElem { rep: r }
        } else {
            FqElem { rep: poly }
        }
    }

    pub fn mul(&self, a: &FqElem, b: &FqElem) -> FqElem {
        self.reduce(a.rep.mul(&b.rep))
    }

    pub fn add(&self, a: &FqElem, b: &FqElem) -> FqElem {
        FqElem { rep: a.rep.add(&b.rep) }
    }

    pub fn sub(&self, a: &FqElem, b: &FqElem) -> FqElem {
        FqElem { rep: a.rep.sub(&b.rep) }
    }

    pub fn neg(&self, a: &FqElem) -> FqElem {
        FqElem { rep: a.rep.neg() }
    }

    /// Inverse via the extended Euclidean algorithm in `Fp[x]` between
    /// the element's representative and the minimal polynomial.
    pub fn inv(&self, a: &FqElem) -> PolyResult<FqElem> {
        if a.rep.is_zero() {
            return Err(PolyError::NoInverse { modulus: self.p });
        }
        let (g, s, _) = a.rep.xgcd(&self.modulus_poly)?;
        if !g.is_constant() {
            return Err(PolyError::NoInverse { modulus: self.p });
        }
        let lc_inv = g.leading_coeff().unwrap().inverse()?;
        Ok(self.reduce(s.scalar_mul(lc_inv)))
    }

    pub fn pow(&self, a: &FqElem, mut exp: u64) -> FqElem {
        let mut base = a.clone();
        let mut acc = self.one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc = self.mul(&acc, &base);
            }
            base = self.mul(&base, &base);
            exp >>= 1;
        }
        acc
    }

    /// Scoped pow cache (§9: never a thread-local, always call-site
    /// owned).
    pub fn pow_cache(&self, base: FqElem) -> FqCtxPowCache<'_> {
        FqCtxPowCache { ctx: self, powers: vec![self.one(), base] }
    }
}

/// An element of `Fq`, represented by its canonical degree-`< d`
/// polynomial representative over `Fp`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FqElem {
    rep: NmodPoly,
}

impl FqElem {
    pub fn is_zero(&self) -> bool {
        self.rep.is_zero()
    }

    pub fn representative(&self) -> &NmodPoly {
        &self.rep
    }
}

/// Pow cache bound to a context; `Ring`'s generic `PowCache<R>` cannot be
/// used directly for `FqElem` because multiplication is context-
/// dependent (needs the minimal polynomial for reduction), so this is a
/// thin wrapper threading the context alongside the cached powers.
pub struct FqCtxPowCache<'a> {
    ctx: &'a FqCtx,
    powers: Vec<FqElem>,
}

impl<'a> FqCtxPowCache<'a> {
    pub fn pow(&mut self, e: usize) -> FqElem {
        while self.powers.len() <= e {
            let base = self.powers[1].clone();
            let next = self.ctx.mul(self.powers.last().unwrap(), &base);
            self.powers.push(next);
        }
        self.powers[e].clone()
    }

    pub fn cache_mulpow_ui(&mut self, c: &FqElem, e: usize) -> FqElem {
        let p = self.pow(e);
        self.ctx.mul(c, &p)
    }
}

// `PowCache<FqElem>` from `ring.rs` cannot work generically since FqElem
// multiplication needs the context; the ring trait impls below are only
// used where a context-free `Ring` bound is required by generic L1/L2
// code operating on a single fixed, implicitly-shared context captured
// by closure. Most call sites go through `FqCtx` directly instead.
impl Ring for FqElem {
    fn zero() -> Self {
        FqElem { rep: NmodPoly::zero(2) }
    }
    fn one() -> Self {
        FqElem { rep: NmodPoly::constant(1, 2) }
    }
    fn is_zero(&self) -> bool {
        self.rep.is_zero()
    }
    fn is_one(&self) -> bool {
        self.rep.is_constant() && self.rep.coeff(0).is_one()
    }
}

impl std::ops::Add for FqElem {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        FqElem { rep: self.rep.add(&rhs.rep) }
    }
}
impl std::ops::Sub for FqElem {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        FqElem { rep: self.rep.sub(&rhs.rep) }
    }
}
impl std::ops::Neg for FqElem {
    type Output = Self;
    fn neg(self) -> Self {
        FqElem { rep: self.rep.neg() }
    }
}
impl std::ops::Mul for FqElem {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        // Unreduced product; callers that need reduction use `FqCtx::mul`.
        // Kept only to satisfy `Ring`'s supertrait bounds for generic code
        // paths that are always invoked through a context-aware wrapper.
        FqElem { rep: self.rep.mul(&rhs.rep) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf9() -> FqCtx {
        // F3[a]/(a^2+1), a^2 = -1.
        let m = NmodPoly::from_signed_coeffs(&[1, 0, 1], 3);
        FqCtx::new(3, m).unwrap()
    }

    #[test]
    fn multiplication_reduces_modulo_minimal_polynomial() {
        let ctx = gf9();
        let a = ctx.generator();
        let a2 = ctx.mul(&a, &a);
        // a^2 = -1 = 2 in F3.
        assert_eq!(a2, ctx.from_base(Nmod::new(2, 3)));
    }

    #[test]
    fn every_nonzero_element_has_an_inverse() {
        let ctx = gf9();
        let a = ctx.generator();
        let inv = ctx.inv(&a).unwrap();
        let prod = ctx.mul(&a, &inv);
        assert_eq!(prod, ctx.one());
    }

    #[test]
    fn pow_cache_matches_direct_pow() {
        let ctx = gf9();
        let a = ctx.generator();
        let mut cache = ctx.pow_cache(a.clone());
        for e in 0..8usize {
            assert_eq!(cache.pow(e), ctx.pow(&a, e as u64));
        }
    }
}
