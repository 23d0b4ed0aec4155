//! `polyca`: exact polynomial arithmetic, GCD, and factorisation over
//! rational/algebraic (`CA`), prime-field (`Fp`), and finite-field (`Fq`)
//! coefficients.
//!
//! The crate is layered bottom-up, each layer built only on the ones
//! below it:
//!
//! - [`ring`] — the abstract `Ring`/`EuclideanDomain`/`Field` contract
//!   every ground ring implements.
//! - [`nmod`], [`fq`], [`fq_default`] — the ground rings themselves: the
//!   prime field, a proper extension field, and a runtime-dispatching
//!   façade over the two.
//! - [`bpoly`] — dense bivariate polynomials, with Brown's GCD and
//!   Hensel-lifted bivariate factorisation.
//! - [`monomial`], [`mpoly`] — sparse multivariate polynomials over
//!   `Fp`, with content extraction and variable compression.
//! - [`mpolyu`] — a univariate-in-one-variable view over `Mpoly`
//!   coefficients, used to peel variables off during GCD/factor drivers.
//! - [`gcd`], [`factor`] — the multivariate GCD and factorisation
//!   dispatchers, each choosing among several backend algorithms by the
//!   shape of their input.
//! - [`ca`] — a parallel, independent layer: univariate polynomials over
//!   a small algebraic-number ring with three-valued equality, used
//!   where exactness over `Fp` isn't the point (root-finding,
//!   simplification).
//!
//! [`rand::RandState`] and [`error`] are threaded explicitly everywhere
//! randomness or fallibility crosses a module boundary; there is no
//! global mutable state anywhere in the crate (every context — `NmodCtx`,
//! `FqCtx`, `FqDefaultCtx`, `MpolyCtx` — is a plain immutable struct the
//! caller constructs once and passes down).

pub mod ca;
pub mod error;
pub mod rand;
pub mod ring;

pub mod nmod;
pub mod fq;
pub mod fq_default;

pub mod bpoly;
pub mod monomial;
pub mod mpoly;
pub mod mpolyu;

pub mod gcd;
pub mod factor;

pub use ca::poly::CaPoly;
pub use ca::{CaCtx, CaNumber, Truth};
pub use error::{Code, PolyError, PolyResult, Trace};
pub use factor::Factorization;
pub use fq_default::{FqDefaultCtx, FqDefaultElem};
pub use monomial::{Monomial, MonomialOrder};
pub use mpoly::{Mpoly, MpolyCtx};
pub use nmod::{Nmod, NmodCtx};
pub use rand::RandState;
