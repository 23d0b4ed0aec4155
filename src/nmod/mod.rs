//! Prime field `Fp` (the "nmod" layer, §3.1)
//!
//! Grounded on the teacher's `core::polynomial::finite_field::element::Zp`:
//! same representation (`u64` value + `u64` modulus), same reduction and
//! inversion strategy via the extended Euclidean algorithm, widened here
//! with the explicit context object and pow cache the spec requires
//! (§6.1) and which the teacher's flat `Zp` does not carry.

pub mod poly;

use crate::error::{PolyError, PolyResult};
use crate::ring::{EuclideanDomain, Field, Ring};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trial-division primality test, same 6k±1 wheel as the teacher's
/// `finite_field::element::is_prime`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i.saturating_mul(i) <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Immutable context for a prime field, constructed once and threaded
/// explicitly (§6.5, §5). Carries the modulus and, lazily, a pow cache
/// keyed by the last base requested — the cache is context-scoped, never
/// a thread-local, per §9's explicit prohibition on reintroducing a
/// thread-local `pow_cache`.
#[derive(Clone)]
pub struct NmodCtx {
    modulus: u64,
}

impl fmt::Debug for NmodCtx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NmodCtx").field("modulus", &self.modulus).finish()
    }
}

impl NmodCtx {
    pub fn new(modulus: u64) -> PolyResult<Self> {
        if !is_prime(modulus) {
            return Err(PolyError::NonPrimeModulus { modulus });
        }
        Ok(Self { modulus })
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn zero(&self) -> Nmod {
        Nmod { value: 0, modulus: self.modulus }
    }

    pub fn one(&self) -> Nmod {
        Nmod { value: if self.modulus == 1 { 0 } else { 1 }, modulus: self.modulus }
    }

    pub fn elem(&self, value: u64) -> Nmod {
        Nmod::new(value, self.modulus)
    }

    /// Fresh pow cache rooted at `base`, scoped to this call (§9).
    ///
    /// Deliberately returns [`NmodPowCache`], not the generic
    /// `crate::ring::PowCache<Nmod>`: `PowCache::new` seeds its table from
    /// the bare `Nmod::one()`, which carries the placeholder modulus 2
    /// rather than this context's modulus (see the comment on `impl Ring
    /// for Nmod`). `NmodPowCache` seeds from `self.one()` instead,
    /// mirroring how `FqCtx::pow_cache` avoids the same trap for `FqElem`.
    pub fn pow_cache(&self, base: Nmod) -> NmodPowCache {
        debug_assert_eq!(base.modulus, self.modulus);
        NmodPowCache { powers: vec![self.one(), base] }
    }
}

/// Pow cache for `Nmod`, seeded with a modulus-correct identity (see
/// [`NmodCtx::pow_cache`]).
pub struct NmodPowCache {
    powers: Vec<Nmod>,
}

impl NmodPowCache {
    /// `base^e`, computed once and memoised.
    pub fn pow(&mut self, e: usize) -> Nmod {
        while self.powers.len() <= e {
            let base = self.powers[1];
            let next = *self.powers.last().unwrap() * base;
            self.powers.push(next);
        }
        self.powers[e]
    }

    /// `c * base^e` (`cache_mulpow_ui` in §6.1).
    pub fn cache_mulpow_ui(&mut self, c: &Nmod, e: usize) -> Nmod {
        *c * self.pow(e)
    }
}

/// Recursive extended Euclidean algorithm, same shape as the teacher's
/// standalone `finite_field::element::extended_gcd`.
fn extended_gcd(a: i64, b: i64) -> (i64, i64, i64) {
    if b == 0 {
        (a, 1, 0)
    } else {
        let (g, x1, y1) = extended_gcd(b, a % b);
        (g, y1, x1 - (a / b) * y1)
    }
}

/// An element of `Z_p`. Copy type, same shape as the teacher's `Zp`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nmod {
    value: u64,
    modulus: u64,
}

impl Nmod {
    #[inline]
    pub fn new(value: u64, modulus: u64) -> Self {
        Self { value: value % modulus, modulus }
    }

    /// Normalise a signed value into `[0, modulus)`.
    pub fn from_signed(value: i64, modulus: u64) -> Self {
        let m = modulus as i64;
        let v = ((value % m) + m) % m;
        Self { value: v as u64, modulus }
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Map to the symmetric range `[-p/2, p/2]`.
    pub fn to_symmetric(&self) -> i64 {
        let half = self.modulus / 2;
        if self.value > half {
            self.value as i64 - self.modulus as i64
        } else {
            self.value as i64
        }
    }

    pub fn inverse(&self) -> PolyResult<Self> {
        if self.value == 0 {
            return Err(PolyError::NoInverse { modulus: self.modulus });
        }
        let (g, x, _) = extended_gcd(self.value as i64, self.modulus as i64);
        if g != 1 {
            return Err(PolyError::NoInverse { modulus: self.modulus });
        }
        Ok(Self::from_signed(x, self.modulus))
    }
}

impl fmt::Debug for Nmod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (mod {})", self.value, self.modulus)
    }
}

impl fmt::Display for Nmod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::ops::Add for Nmod {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        debug_assert_eq!(self.modulus, rhs.modulus);
        Self::new(self.value + rhs.value, self.modulus)
    }
}

impl std::ops::Sub for Nmod {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        debug_assert_eq!(self.modulus, rhs.modulus);
        let v = if self.value >= rhs.value {
            self.value - rhs.value
        } else {
            self.modulus - (rhs.value - self.value)
        };
        Self { value: v, modulus: self.modulus }
    }
}

impl std::ops::Mul for Nmod {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        debug_assert_eq!(self.modulus, rhs.modulus);
        let v = (self.value as u128 * rhs.value as u128) % self.modulus as u128;
        Self { value: v as u64, modulus: self.modulus }
    }
}

impl std::ops::Neg for Nmod {
    type Output = Self;
    fn neg(self) -> Self {
        if self.value == 0 {
            self
        } else {
            Self { value: self.modulus - self.value, modulus: self.modulus }
        }
    }
}

impl Ring for Nmod {
    // `Ring::zero`/`one` are modulus-less by construction (the trait gives
    // no way to thread a modulus through a bare associated function) and
    // so are placeholders only, never correct for any `Nmod` whose modulus
    // isn't 2 — the same situation `FqElem`'s `Ring` impl documents for
    // itself. Every call site that actually needs a zero/one for a given
    // element goes through `NmodCtx::zero`/`one`/`elem`, or (for `pow_ui`
    // and the pow cache) the modulus-aware overrides below, never the bare
    // trait methods.
    fn zero() -> Self {
        Self { value: 0, modulus: 2 }
    }
    fn one() -> Self {
        Self { value: 1, modulus: 2 }
    }
    fn is_zero(&self) -> bool {
        self.value == 0
    }
    fn is_one(&self) -> bool {
        self.value == 1
    }

    /// Overrides the default `Ring::pow_ui`, which seeds its accumulator
    /// from the bare `Self::one()` (modulus 2) and would panic against
    /// `debug_assert_eq!` in `Mul` the moment it's multiplied against a
    /// real element of a different modulus. This binds the identity to
    /// `self.modulus` instead.
    fn pow_ui(&self, exp: u64) -> Self {
        let one = Self { value: if self.modulus == 1 { 0 } else { 1 }, modulus: self.modulus };
        if exp == 0 {
            return one;
        }
        let mut base = *self;
        let mut exp = exp;
        let mut acc = one;
        while exp > 1 {
            if exp & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            exp >>= 1;
        }
        acc * base
    }
}

impl EuclideanDomain for Nmod {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        (*self * other.inverse().expect("division by zero in Fp"), Self { value: 0, modulus: self.modulus })
    }
    fn abs(&self) -> Self {
        *self
    }
}

impl Field for Nmod {
    fn inv(&self) -> Option<Self> {
        self.inverse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_composite_modulus() {
        assert!(NmodCtx::new(10).is_err());
        assert!(NmodCtx::new(11).is_ok());
    }

    #[test]
    fn addition_wraps_mod_p() {
        let ctx = NmodCtx::new(7).unwrap();
        let a = ctx.elem(5);
        let b = ctx.elem(4);
        assert_eq!((a + b).value(), 2);
    }

    #[test]
    fn inverse_round_trips() {
        let ctx = NmodCtx::new(13).unwrap();
        for v in 1..13 {
            let a = ctx.elem(v);
            let inv = a.inverse().unwrap();
            assert_eq!((a * inv).value(), 1);
        }
    }

    #[test]
    fn to_symmetric_centers_around_zero() {
        let ctx = NmodCtx::new(7).unwrap();
        assert_eq!(ctx.elem(6).to_symmetric(), -1);
        assert_eq!(ctx.elem(3).to_symmetric(), 3);
    }

    #[test]
    fn pow_cache_matches_pow_ui() {
        let ctx = NmodCtx::new(101).unwrap();
        let base = ctx.elem(7);
        let mut cache = ctx.pow_cache(base);
        for e in 0..20usize {
            assert_eq!(cache.pow(e), base.pow_ui(e as u64));
        }
    }
}
