//! Benchmarks for one LIA iteration.
//!
//! Run with: `cargo bench --bench lia_step_bench`
//!
//! Measures the flux sweep, the head sweep and a full iteration on square
//! grids of growing size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lia_rs::{CellInputs, LiaDomain, LiaParams, StructuredGrid, compute_dt};

/// Square grid with a sloping bed and a wave on the surface.
fn create_domain(n: usize) -> LiaDomain {
    let grid = StructuredGrid::new(n, n, 10.0).unwrap();
    let n_cells = n * n;
    let mut elevation = Vec::with_capacity(n_cells);
    let mut head = Vec::with_capacity(n_cells);
    for j in 0..n {
        for i in 0..n {
            let x = i as f64 / n as f64;
            let y = j as f64 / n as f64;
            elevation.push(0.5 * x);
            head.push(2.0 + 0.2 * (6.0 * x).sin() * (4.0 * y).cos());
        }
    }
    let inputs = CellInputs::new(elevation, head, vec![0.035; n_cells]);
    LiaDomain::build(&grid, &inputs).unwrap()
}

fn params(domain: &LiaDomain) -> LiaParams {
    LiaParams {
        theta: 0.7,
        dt: compute_dt(domain.nodes(), domain.dx(), 0.5, 1e-4),
        dx: domain.dx(),
    }
}

fn bench_flux_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("flux_sweep");

    for &n in &[32, 64, 128, 256] {
        let mut domain = create_domain(n);
        let p = params(&domain);
        group.throughput(Throughput::Elements(domain.n_faces() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| domain.update_fluxes(black_box(&p)));
        });
    }

    group.finish();
}

fn bench_head_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("head_sweep");

    for &n in &[32, 64, 128, 256] {
        let mut domain = create_domain(n);
        let p = params(&domain);
        domain.update_fluxes(&p);
        group.throughput(Throughput::Elements(domain.n_cells() as u64));
        // Alternate sign so heads stay bounded over many samples
        let mut sign = 1.0;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                sign = -sign;
                black_box(domain.update_heads(sign * p.dt, None, 0.0))
            });
        });
    }

    group.finish();
}

fn bench_full_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_iteration");
    group.sample_size(30);

    for &n in &[32, 64, 128, 256] {
        let mut domain = create_domain(n);
        group.throughput(Throughput::Elements(domain.n_cells() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let p = params(&domain);
                domain.update_fluxes(&p);
                black_box(domain.update_heads(p.dt, None, 0.0))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flux_sweep, bench_head_sweep, bench_full_iteration);
criterion_main!(benches);
