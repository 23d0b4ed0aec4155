//! Zippel's sparse interpolation GCD (§4.5, small-prime variant)
//!
//! Peels one variable at a time: evaluate all but the main variable at
//! random points, recursively GCD the resulting (one-fewer-variable)
//! polynomials, then interpolate the surviving variable back in from
//! enough evaluation points via dense Lagrange interpolation (the
//! "small prime" path — no term-skeleton reuse across evaluation points,
//! unlike the true sparse Zippel algorithm in
//! [`crate::gcd::zippel2`]).

use crate::error::{PolyError, PolyResult};
use crate::monomial::Monomial;
use crate::mpoly::{Mpoly, MpolyCtx};
use crate::nmod::poly::NmodPoly;
use crate::nmod::Nmod;
use crate::rand::RandState;
use std::rc::Rc;

pub fn zippel_gcd(f: &Mpoly, g: &Mpoly, rng: &mut RandState) -> PolyResult<Mpoly> {
    let nv = f.ctx().num_vars;
    let active: Vec<usize> = (0..nv).filter(|&v| f.degree_in(v).unwrap_or(0) > 0 || g.degree_in(v).unwrap_or(0) > 0).collect();
    if active.len() <= 2 {
        return super::brown::brown_gcd_mpoly(f, g);
    }
    let main_var = active[0];
    let modulus = f.ctx().modulus;
    let deg_f = f.degree_in(main_var).unwrap_or(0);
    let deg_g = g.degree_in(main_var).unwrap_or(0);
    let needed = deg_f.min(deg_g) as usize + 1;

    let sub_ctx = Rc::new(MpolyCtx::new(nv - 1, f.ctx().order, modulus));
    let max_attempts = needed * 8 + 64;
    let mut points = Vec::new();
    let mut images: Vec<Mpoly> = Vec::new();
    let mut best_degree: Option<u32> = None;
    let mut attempts = 0;

    while points.len() < needed && attempts < max_attempts {
        attempts += 1;
        let candidate = Nmod::new(rng.below(modulus), modulus);
        if points.contains(&candidate) {
            continue;
        }
        let fa = f.evaluate_at(main_var, candidate, sub_ctx.clone());
        let ga = g.evaluate_at(main_var, candidate, sub_ctx.clone());
        if fa.is_zero() || ga.is_zero() {
            continue;
        }
        let image = super::mpoly_gcd(&fa, &ga, rng)?;
        let image_deg = leading_total_degree(&image);
        match best_degree {
            None => best_degree = Some(image_deg),
            Some(bd) if image_deg < bd => {
                best_degree = Some(image_deg);
                points.clear();
                images.clear();
            }
            Some(bd) if image_deg > bd => continue,
            _ => {}
        }
        points.push(candidate);
        images.push(image);
    }

    if points.len() < needed {
        return Err(PolyError::InvariantViolation { reason: "zippel_gcd: exhausted evaluation points" });
    }

    let interpolated = interpolate_main_var(&points, &images, f.ctx().clone(), main_var, modulus)?;
    let monic = interpolated.make_monic().ok_or(PolyError::InvariantViolation { reason: "zippel_gcd: zero candidate" })?;
    Ok(monic)
}

fn leading_total_degree(p: &Mpoly) -> u32 {
    p.leading_term().map(|(m, _)| m.total_degree()).unwrap_or(0)
}

/// For every monomial (in the non-main variables) seen across any image,
/// interpolate its coefficient as a function of the main variable from
/// the values observed at each evaluation point, using dense Lagrange
/// interpolation in one variable.
fn interpolate_main_var(points: &[Nmod], images: &[Mpoly], ctx: Rc<MpolyCtx>, main_var: usize, modulus: u64) -> PolyResult<Mpoly> {
    use std::collections::HashMap;
    let mut monomials: HashMap<Vec<u32>, ()> = HashMap::new();
    for img in images {
        for (m, _) in img.terms() {
            monomials.entry(m.exponents().to_vec()).or_insert(());
        }
    }
    let mut all_terms = Vec::new();
    for exps in monomials.keys() {
        let values: Vec<Nmod> = images
            .iter()
            .map(|img| {
                img.terms()
                    .iter()
                    .find(|(m, _)| m.exponents() == exps.as_slice())
                    .map(|(_, c)| *c)
                    .unwrap_or_else(|| Nmod::new(0, modulus))
            })
            .collect();
        let poly_in_main = lagrange(points, &values, modulus)?;
        for (i, c) in poly_in_main.coefficients().iter().enumerate() {
            if *c == 0 {
                continue;
            }
            let mut full_exps = exps.clone();
            full_exps.insert(main_var, i as u32);
            all_terms.push((Monomial::new(full_exps), Nmod::new(*c, modulus)));
        }
    }
    Ok(Mpoly::from_terms(ctx, all_terms))
}

fn lagrange(points: &[Nmod], values: &[Nmod], modulus: u64) -> PolyResult<NmodPoly> {
    let mut result = NmodPoly::zero(modulus);
    for i in 0..points.len() {
        let mut term = NmodPoly::constant(1, modulus);
        let mut denom = Nmod::new(1, modulus);
        for j in 0..points.len() {
            if i == j {
                continue;
            }
            term = term.mul(&NmodPoly::from_signed_coeffs(&[-(points[j].value() as i64), 1], modulus));
            denom = denom * (points[i] - points[j]);
        }
        let scale = values[i] * denom.inverse()?;
        result = result.add(&term.scalar_mul(scale));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::MonomialOrder;

    #[test]
    fn zippel_gcd_recovers_a_three_variable_shared_factor() {
        let modulus = 100_003;
        let ctx = Rc::new(MpolyCtx::new(3, MonomialOrder::Lex, modulus));
        // shared = x + y + z
        let shared = Mpoly::from_terms(
            ctx.clone(),
            vec![
                (Monomial::new(vec![1, 0, 0]), Nmod::new(1, modulus)),
                (Monomial::new(vec![0, 1, 0]), Nmod::new(1, modulus)),
                (Monomial::new(vec![0, 0, 1]), Nmod::new(1, modulus)),
            ],
        );
        let extra_f = Mpoly::from_terms(
            ctx.clone(),
            vec![(Monomial::new(vec![1, 0, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 0, 0]), Nmod::new(2, modulus))],
        );
        let extra_g = Mpoly::from_terms(
            ctx.clone(),
            vec![(Monomial::new(vec![0, 1, 0]), Nmod::new(1, modulus)), (Monomial::new(vec![0, 0, 0]), Nmod::new(5, modulus))],
        );
        let f = shared.mul(&extra_f);
        let g = shared.mul(&extra_g);
        let mut rng = RandState::new(11);
        let result = zippel_gcd(&f, &g, &mut rng).unwrap();
        assert_eq!(result.leading_term().map(|(m, _)| m.total_degree()), shared.make_monic().unwrap().leading_term().map(|(m, _)| m.total_degree()));
    }
}
