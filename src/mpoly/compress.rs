//! Compression: dropping absent variables and deflating common exponent
//! strides before handing a polynomial to a GCD or factorisation
//! algorithm, and reinflating the result afterwards (§4.8's compression
//! step, resolved against `nmod_mpoly_factor`'s `_compress`/`_deflate`
//! helpers per `original_source/nmod_mpoly_factor/` — see SPEC_FULL.md).

use super::{Mpoly, MpolyCtx};
use crate::monomial::{Monomial, MonomialOrder};
use num_integer::Integer;
use std::rc::Rc;

/// Records how a polynomial was compressed, so the transformation can be
/// undone on a GCD/factor result.
#[derive(Debug, Clone)]
pub struct CompressionMap {
    /// For each variable of the *compressed* polynomial, which original
    /// variable index it came from.
    pub kept_vars: Vec<usize>,
    /// Per kept variable: the minimum exponent observed (shift) and the
    /// stride (gcd of the exponents after shifting) that was divided out.
    pub shifts: Vec<u32>,
    pub strides: Vec<u32>,
    pub original_num_vars: usize,
    pub original_order: MonomialOrder,
    pub original_modulus: u64,
}

impl Mpoly {
    /// Drop variables that do not occur at all, then deflate: for each
    /// surviving variable, shift out its minimum exponent and divide by
    /// the GCD of the shifted exponents actually appearing (e.g. `x^2 +
    /// x^6` deflates to `x^0 + x^1` after a shift of `2` and a stride of
    /// `2`).
    pub fn compress(&self) -> (Mpoly, CompressionMap) {
        let nv = self.ctx().num_vars;
        let mut min_exp = vec![u32::MAX; nv];
        let mut max_exp = vec![0u32; nv];
        for (m, _) in self.terms() {
            for (i, &e) in m.exponents().iter().enumerate() {
                min_exp[i] = min_exp[i].min(e);
                max_exp[i] = max_exp[i].max(e);
            }
        }
        let kept_vars: Vec<usize> = (0..nv).filter(|&i| max_exp[i] > 0 || self.is_constant()).collect();
        let kept_vars = if kept_vars.is_empty() && nv > 0 { vec![0] } else { kept_vars };

        let mut strides = Vec::with_capacity(kept_vars.len());
        let mut shifts = Vec::with_capacity(kept_vars.len());
        for &v in &kept_vars {
            let shift = if min_exp[v] == u32::MAX { 0 } else { min_exp[v] };
            shifts.push(shift);
            let mut stride = 0u32;
            for (m, _) in self.terms() {
                let e = m.exponents()[v] - shift;
                stride = stride.gcd(&e);
            }
            strides.push(if stride == 0 { 1 } else { stride });
        }

        let new_ctx = Rc::new(MpolyCtx::new(kept_vars.len().max(1), self.ctx().order, self.ctx().modulus));
        let new_terms = self
            .terms()
            .iter()
            .map(|(m, c)| {
                let exps: Vec<u32> = kept_vars
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| (m.exponents()[v] - shifts[k]) / strides[k])
                    .collect();
                (Monomial::new(exps), *c)
            })
            .collect();
        let compressed = Mpoly::from_terms(new_ctx, new_terms);
        let map = CompressionMap {
            kept_vars,
            shifts,
            strides,
            original_num_vars: nv,
            original_order: self.ctx().order,
            original_modulus: self.ctx().modulus,
        };
        (compressed, map)
    }

    /// Undo [`Mpoly::compress`].
    pub fn decompress(&self, map: &CompressionMap) -> Mpoly {
        let new_ctx = Rc::new(MpolyCtx::new(map.original_num_vars, map.original_order, map.original_modulus));
        let new_terms = self
            .terms()
            .iter()
            .map(|(m, c)| {
                let mut exps = vec![0u32; map.original_num_vars];
                for (k, &v) in map.kept_vars.iter().enumerate() {
                    exps[v] = m.exponents()[k] * map.strides[k] + map.shifts[k];
                }
                (Monomial::new(exps), *c)
            })
            .collect();
        Mpoly::from_terms(new_ctx, new_terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpoly::Mpoly;
    use crate::nmod::Nmod;

    #[test]
    fn compress_drops_an_absent_variable_and_deflates_strides() {
        let ctx = Rc::new(MpolyCtx::new(3, MonomialOrder::Lex, 101));
        // f = x^2 + x^6 in variable 0 only; variables 1, 2 absent entirely.
        let f = Mpoly::from_terms(
            ctx,
            vec![
                (Monomial::new(vec![2, 0, 0]), Nmod::new(1, 101)),
                (Monomial::new(vec![6, 0, 0]), Nmod::new(1, 101)),
            ],
        );
        let (compressed, map) = f.compress();
        assert_eq!(map.kept_vars, vec![0]);
        assert_eq!(compressed.ctx().num_vars, 1);
        assert_eq!(map.shifts, vec![2]);
        assert_eq!(map.strides, vec![2]);
        let roundtrip = compressed.decompress(&map);
        assert_eq!(roundtrip, f);
    }
}
