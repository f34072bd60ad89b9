
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use stormlab::loss::{DEFAULT_FOOTPRINT_COEFF, storm_loss_total};
use stormlab::storm::Storm;
use stormlab::types::LatLon;
use stormlab::vulnerability::VulnerabilityParams;

use fixtures::{LARGE, MEDIUM, SMALL, build_simulation, make_portfolio};

// ── Group 1: storm_loss — portfolio size scaling ────────────────────────────

fn bench_storm_loss(c: &mut Criterion) {
    let storm = Storm { wind_mph: 140.0, center: LatLon::new(27.0, -82.5) };
    let vulnerability = VulnerabilityParams::default();

    let mut group = c.benchmark_group("storm_loss");
    for &property_count in &[100usize, 500, 1_000, 5_000, 10_000] {
        group.throughput(Throughput::Elements(property_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(property_count),
            &property_count,
            |b, &pc| {
                let portfolio = make_portfolio(pc);
                b.iter(|| {
                    storm_loss_total(&portfolio, &storm, &vulnerability, DEFAULT_FOOTPRINT_COEFF)
                })
            },
        );
    }
    group.finish();
}

// ── Group 2: full_run — end-to-end serial simulation ────────────────────────

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    for (name, scenario) in [("small", &SMALL), ("medium", &MEDIUM), ("large", &LARGE)] {
        if name == "large" {
            group.sample_size(10);
        }
        group.throughput(Throughput::Elements(scenario.years as u64));
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_batched(
                || build_simulation(scenario, 42),
                |sim| sim.run().expect("bench run succeeds"),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

// ── Group 3: full_run_parallel — rayon across years ─────────────────────────

fn bench_full_run_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run_parallel");
    group.sample_size(10);
    for (name, scenario) in [("medium", &MEDIUM), ("large", &LARGE)] {
        group.throughput(Throughput::Elements(scenario.years as u64));
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_batched(
                || build_simulation(scenario, 42),
                |sim| sim.run_parallel().expect("bench run succeeds"),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_storm_loss, bench_full_run, bench_full_run_parallel);
criterion_main!(benches);
