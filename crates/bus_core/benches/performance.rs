//! Performance benchmarks for bus_core using Criterion.rs.

use bus_core::distributions::{ServiceTime, TruncatedNormal};
use bus_core::rng::SimRng;
use bus_core::scenario::ScenarioParams;
use bus_core::simulation::BusSimulation;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_simulation_run(c: &mut Criterion) {
    // (name, vehicles, horizon in minutes)
    let scenarios = vec![
        ("small", 2, 120.0),
        ("medium", 5, 480.0),
        ("day", 10, 1440.0),
    ];

    let mut group = c.benchmark_group("simulation_run");
    group.sample_size(20);
    for (name, vehicles, horizon) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(vehicles, horizon),
            |b, &(vehicles, horizon)| {
                b.iter(|| {
                    let params = ScenarioParams::default()
                        .with_seed(42)
                        .with_vehicles(vehicles)
                        .with_horizon_min(horizon);
                    let mut sim = BusSimulation::new(params).expect("valid params");
                    black_box(sim.run().expect("run"));
                });
            },
        );
    }
    group.finish();
}

fn bench_reneging_day(c: &mut Criterion) {
    c.bench_function("reneging_time_varying_day", |b| {
        b.iter(|| {
            let params = ScenarioParams::default()
                .with_seed(42)
                .with_vehicles(3)
                .with_time_varying_demand(true)
                .with_reneging(true);
            let mut sim = BusSimulation::new(params).expect("valid params");
            black_box(sim.run().expect("run"));
        });
    });
}

fn bench_duration_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("duration_sampling");

    let transit = TruncatedNormal::new(2.0, 0.5);
    group.bench_function("transit", |b| {
        let mut rng = SimRng::seeded(42);
        b.iter(|| black_box(transit.sample(rng.inner())));
    });

    let boarding = ServiceTime::boarding();
    group.bench_function("boarding_50", |b| {
        let mut rng = SimRng::seeded(42);
        b.iter(|| black_box(boarding.duration(rng.inner(), 50)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_simulation_run,
    bench_reneging_day,
    bench_duration_sampling
);
criterion_main!(benches);
