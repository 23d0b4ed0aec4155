//! Error types for domain violations and algorithmic failures
//!
//! Two tiers: a rich internal [`PolyError`] used with `?` throughout L0-L4,
//! and the coarse driver contract [`Code`] (success / failure / invariant
//! violation) that L5 dispatchers return to their callers.

use std::fmt;

/// Rich error type for polynomial and ground-ring operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PolyError {
    /// Modulus supplied to a prime-field context was not prime.
    NonPrimeModulus { modulus: u64 },
    /// Division where the divisor is the zero polynomial or element.
    DivisionByZero,
    /// No multiplicative inverse exists (element is a zero divisor).
    NoInverse { modulus: u64 },
    /// Operation received the zero polynomial where a nonzero one was required.
    EmptyPolynomial,
    /// Operands live over incompatible degrees/contexts.
    DegreeMismatch {
        expected: usize,
        got: usize,
        operation: &'static str,
    },
    /// An evaluation point produced a result with the wrong shape
    /// (e.g. dropped degree, wrong factor count).
    InvalidEvaluationPoint { reason: &'static str },
    /// An algorithm ran out of its evaluation-point or iteration budget.
    OutOfBudget { operation: &'static str },
    /// A three-valued CA truth value propagated as `T_UNKNOWN` to a point
    /// that required a definite answer.
    UnknownTruth { operation: &'static str },
    /// An input-invariant a valid caller must never violate was violated
    /// (non-monic leading coefficient after `make_monic`, unsorted
    /// monomials, mismatched context, ...).
    InvariantViolation { reason: &'static str },
}

impl fmt::Display for PolyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolyError::NonPrimeModulus { modulus } => {
                write!(f, "modulus {modulus} is not prime")
            }
            PolyError::DivisionByZero => write!(f, "division by zero"),
            PolyError::NoInverse { modulus } => {
                write!(f, "no inverse exists mod {modulus}")
            }
            PolyError::EmptyPolynomial => write!(f, "operation requires a nonzero polynomial"),
            PolyError::DegreeMismatch {
                expected,
                got,
                operation,
            } => write!(
                f,
                "degree mismatch in {operation}: expected {expected}, got {got}"
            ),
            PolyError::InvalidEvaluationPoint { reason } => {
                write!(f, "invalid evaluation point: {reason}")
            }
            PolyError::OutOfBudget { operation } => {
                write!(f, "{operation} exhausted its evaluation/iteration budget")
            }
            PolyError::UnknownTruth { operation } => {
                write!(f, "{operation}: three-valued truth was T_UNKNOWN")
            }
            PolyError::InvariantViolation { reason } => {
                write!(f, "invariant violation: {reason}")
            }
        }
    }
}

impl std::error::Error for PolyError {}

/// Result alias for the rich internal error type.
pub type PolyResult<T> = Result<T, PolyError>;

/// The coarse driver-facing return contract (§7): success, algorithmic
/// failure (retry with a different algorithm), or invariant violation
/// (do not retry the same algorithm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// `1`: success.
    Success,
    /// `0`: algorithmic failure, result is undefined, caller may retry
    /// with a different algorithm.
    Failure,
    /// `-1`: input-invariant violation; caller should not retry the same
    /// algorithm but may try another.
    InvariantViolation,
}

impl Code {
    /// The FLINT-style integer encoding used throughout the original.
    pub fn as_i32(self) -> i32 {
        match self {
            Code::Success => 1,
            Code::Failure => 0,
            Code::InvariantViolation => -1,
        }
    }
}

impl From<&PolyError> for Code {
    fn from(e: &PolyError) -> Self {
        match e {
            PolyError::InvariantViolation { .. } => Code::InvariantViolation,
            PolyError::UnknownTruth { .. } => Code::Failure,
            _ => Code::Failure,
        }
    }
}

impl From<PolyError> for Code {
    fn from(e: PolyError) -> Self {
        Code::from(&e)
    }
}

/// Append-only diagnostic sink threaded explicitly by dispatchers.
///
/// There is no global logger (§5 forbids global mutable state); callers
/// that want visibility into why `Brown` was skipped in favour of
/// `Zippel2`, or why an evaluation point was rejected, pass `Some(trace)`.
#[derive(Debug, Default, Clone)]
pub struct Trace(Vec<String>);

impl Trace {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn record(&mut self, msg: impl Into<String>) {
        self.0.push(msg.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_encoding_matches_flint_convention() {
        assert_eq!(Code::Success.as_i32(), 1);
        assert_eq!(Code::Failure.as_i32(), 0);
        assert_eq!(Code::InvariantViolation.as_i32(), -1);
    }

    #[test]
    fn invariant_violation_does_not_downgrade_to_failure() {
        let e = PolyError::InvariantViolation {
            reason: "unsorted monomials",
        };
        assert_eq!(Code::from(&e), Code::InvariantViolation);
    }

    #[test]
    fn trace_records_in_order() {
        let mut t = Trace::new();
        t.record("tried brown");
        t.record("tried zippel2");
        assert_eq!(t.lines(), &["tried brown", "tried zippel2"]);
    }
}
