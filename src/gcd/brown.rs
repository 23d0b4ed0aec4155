//! Multivariate bridge to Brown's bivariate GCD (§4.3)
//!
//! Projects a (classified) two-active-variable [`Mpoly`] down to a
//! [`crate::bpoly::BPoly`], runs [`crate::bpoly::gcd::brown_gcd`], and
//! lifts the answer back. Genuinely more-than-two-variable inputs never
//! reach this module — [`crate::gcd::choose_strategy`] only selects it
//! when exactly two variables are active.

use crate::bpoly::BPoly;
use crate::error::PolyResult;
use crate::monomial::Monomial;
use crate::mpoly::{Mpoly, MpolyCtx};
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;
use crate::rand::RandState;
use std::rc::Rc;

pub fn brown_gcd_mpoly(f: &Mpoly, g: &Mpoly) -> PolyResult<Mpoly> {
    let nv = f.ctx().num_vars;
    let vars: Vec<usize> = (0..nv).filter(|&v| f.degree_in(v).unwrap_or(0) > 0 || g.degree_in(v).unwrap_or(0) > 0).collect();
    let (v0, v1) = (vars[0], vars.get(1).copied().unwrap_or(vars[0]));
    let bf = to_bpoly(f, v0, v1);
    let bg = to_bpoly(g, v0, v1);
    let mut rng = RandState::new(1);
    let result = crate::bpoly::gcd::brown_gcd(&bf, &bg, &mut rng)?;
    Ok(from_bpoly(&result, f.ctx().clone(), v0, v1))
}

pub fn to_bpoly(p: &Mpoly, v0: usize, v1: usize) -> BPoly {
    let modulus = p.ctx().modulus;
    let deg_y = p.degree_in(v1).unwrap_or(0) as usize;
    let mut coeffs = vec![NmodPoly::zero(modulus); deg_y + 1];
    for (m, c) in p.terms() {
        let dy = m.exponents()[v1] as usize;
        let dx = m.exponents()[v0] as usize;
        let mut row = coeffs[dy].coefficients().to_vec();
        while row.len() <= dx {
            row.push(0);
        }
        row[dx] = c.value();
        coeffs[dy] = NmodPoly::from_coeffs(row, modulus);
    }
    BPoly::from_coeffs(coeffs, modulus)
}

pub fn from_bpoly(b: &BPoly, ctx: Rc<MpolyCtx>, v0: usize, v1: usize) -> Mpoly {
    let mut terms = Vec::new();
    for (dy, coeff) in b.coeffs().iter().enumerate() {
        for (dx, &c) in coeff.coefficients().iter().enumerate() {
            if c == 0 {
                continue;
            }
            let mut exps = vec![0u32; ctx.num_vars];
            exps[v0] = dx as u32;
            exps[v1] = dy as u32;
            terms.push((Monomial::new(exps), Nmod::new(c, ctx.modulus)));
        }
    }
    Mpoly::from_terms(ctx, terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::MonomialOrder;

    #[test]
    fn to_bpoly_and_from_bpoly_round_trip() {
        let ctx = Rc::new(MpolyCtx::new(2, MonomialOrder::Lex, 101));
        let f = Mpoly::from_terms(
            ctx.clone(),
            vec![
                (Monomial::new(vec![2, 1]), Nmod::new(3, 101)),
                (Monomial::new(vec![0, 2]), Nmod::new(5, 101)),
            ],
        );
        let b = to_bpoly(&f, 0, 1);
        let back = from_bpoly(&b, ctx, 0, 1);
        assert_eq!(back, f);
    }
}
