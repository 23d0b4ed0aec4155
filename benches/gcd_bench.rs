//! Performance benchmarks for the multivariate GCD dispatcher
//!
//! Measures the dispatcher's behaviour across the shapes
//! `gcd::choose_strategy` distinguishes between: univariate, bivariate,
//! sparse (Zippel), and dense/high-variable-count (Hensel) inputs.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyca::gcd::mpoly_gcd;
use polyca::monomial::{Monomial, MonomialOrder};
use polyca::mpoly::{Mpoly, MpolyCtx};
use polyca::rand::RandState;
use std::rc::Rc;

const MODULUS: u64 = 1_000_003;

fn ctx(num_vars: usize) -> Rc<MpolyCtx> {
    Rc::new(MpolyCtx::new(num_vars, MonomialOrder::Lex, MODULUS))
}

fn mono(exps: &[u32]) -> Monomial {
    Monomial::new(exps.to_vec())
}

fn bench_univariate(c: &mut Criterion) {
    let mut group = c.benchmark_group("univariate_gcd");
    let ring = ctx(1);

    group.bench_function("dense_degree_32", |b| {
        let f = Mpoly::from_univariate(ring.clone(), 0, &(0..33).map(|i| (i + 1) as u64).collect::<Vec<_>>());
        let g = Mpoly::from_univariate(ring.clone(), 0, &(0..17).map(|i| (2 * i + 1) as u64).collect::<Vec<_>>());
        let mut rng = RandState::new(1);
        b.iter(|| mpoly_gcd(black_box(&f), black_box(&g), &mut rng))
    });

    group.finish();
}

fn bench_bivariate(c: &mut Criterion) {
    let mut group = c.benchmark_group("bivariate_gcd");
    let ring = ctx(2);

    // gcd((x - y)(x + y), (x - y)(x + 2y)) = x - y, up to associates.
    let shared = Mpoly::from_terms(ring.clone(), vec![(mono(&[1, 0]), 1.into()), (mono(&[0, 1]), (MODULUS - 1).into())]);
    let extra_f = Mpoly::from_terms(ring.clone(), vec![(mono(&[1, 0]), 1.into()), (mono(&[0, 1]), 1.into())]);
    let extra_g = Mpoly::from_terms(ring.clone(), vec![(mono(&[1, 0]), 1.into()), (mono(&[0, 1]), 2.into())]);
    let f = shared.mul(&extra_f);
    let g = shared.mul(&extra_g);

    group.bench_function("difference_of_squares_family", |b| {
        let mut rng = RandState::new(2);
        b.iter(|| mpoly_gcd(black_box(&f), black_box(&g), &mut rng))
    });

    group.finish();
}

fn bench_sparse_zippel(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_gcd");

    for nv in [3usize, 4, 5] {
        group.bench_with_input(BenchmarkId::new("zippel_shared_factor", nv), &nv, |b, &nv| {
            let ring = ctx(nv);
            let mut shared_exps = vec![0u32; nv];
            shared_exps[0] = 1;
            let shared = Mpoly::from_term(ring.clone(), mono(&shared_exps), 1.into());
            let mut extra_f_exps = vec![0u32; nv];
            extra_f_exps[nv - 1] = 1;
            let extra_f = Mpoly::from_terms(ring.clone(), vec![(mono(&extra_f_exps), 1.into()), (mono(&vec![0u32; nv]), 3.into())]);
            let mut extra_g_exps = vec![0u32; nv];
            extra_g_exps[(nv - 1).min(1)] = 1;
            let extra_g = Mpoly::from_terms(ring.clone(), vec![(mono(&extra_g_exps), 1.into()), (mono(&vec![0u32; nv]), 7.into())]);
            let f = shared.mul(&extra_f);
            let g = shared.mul(&extra_g);
            let mut rng = RandState::new(3);
            b.iter(|| mpoly_gcd(black_box(&f), black_box(&g), &mut rng))
        });
    }

    group.finish();
}

fn bench_edge_cases(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcd_edge_cases");
    let ring = ctx(2);
    let p = Mpoly::from_terms(ring.clone(), vec![(mono(&[1, 0]), 1.into()), (mono(&[0, 1]), 1.into())]);

    group.bench_function("with_zero", |b| {
        let zero = Mpoly::zero(ring.clone());
        let mut rng = RandState::new(4);
        b.iter(|| mpoly_gcd(black_box(&p), black_box(&zero), &mut rng))
    });

    group.bench_function("identical_polynomial", |b| {
        let mut rng = RandState::new(5);
        b.iter(|| mpoly_gcd(black_box(&p), black_box(&p), &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_univariate, bench_bivariate, bench_sparse_zippel, bench_edge_cases);
criterion_main!(benches);
