use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crmcore::prelude::*;

const PRIORS: [f64; 6] = [0.05, 0.1, 0.2, 0.3, 0.5, 0.7];

/// Cohorts of three, escalating one level per cohort with a toxicity in every third cohort
fn patients(n: usize) -> (Vec<i32>, Vec<i32>) {
    let levels = (0..n).map(|i| ((i / 3) % PRIORS.len()) as i32 + 1).collect();
    let outcomes = (0..n).map(|i| if i % 9 == 8 { 1 } else { 0 }).collect();
    (levels, outcomes)
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    for n in [1, 6, 24, 96] {
        let (levels, outcomes) = patients(n);
        for model in [1, 2] {
            group.bench_with_input(
                BenchmarkId::new(if model == 1 { "tanh" } else { "logistic" }, n),
                &(levels.clone(), outcomes.clone()),
                |b, (levels, outcomes)| {
                    b.iter(|| {
                        crm(
                            black_box(model),
                            black_box(0.2),
                            black_box(&PRIORS),
                            1.0,
                            3.0,
                            levels,
                            outcomes,
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn benchmark_quadrature(c: &mut Criterion) {
    let quadrature = Quadrature::default();
    c.bench_function("quadrature_exponential", |b| {
        b.iter(|| quadrature.integrate(0.0, |x| black_box(x) * (-x).exp()))
    });
}

criterion_group!(benches, benchmark_recommend, benchmark_quadrature);
criterion_main!(benches);
