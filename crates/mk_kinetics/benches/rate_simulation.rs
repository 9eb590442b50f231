use std::rc::Rc;
use std::cell::RefCell;
use std::hint::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;

use mk_chem::ReactionType;
use mk_kinetics::BallisticEngine;
use mk_kinetics::EventBus;
use mk_kinetics::PopulationRateSimulator;

fn run_population(pairs: u32, ticks: usize) {
    let events = Rc::new(RefCell::new(EventBus::new()));
    let mut sim = PopulationRateSimulator::with_seed(
        BallisticEngine::default(), events, 42);
    sim.initialize_simulation("CH3Br", "OH-", pairs, 350.0, ReactionType::Sn2)
        .expect("spawn failed");
    for _ in 0..ticks {
        sim.update(black_box(0.016));
    }
}

fn bench_population_sizes(c: &mut Criterion) {
    c.bench_function("rate_10_pairs_1000_ticks", |b| {
        b.iter(|| run_population(10, 1000))
    });
    c.bench_function("rate_50_pairs_1000_ticks", |b| {
        b.iter(|| run_population(50, 1000))
    });
    c.bench_function("rate_100_pairs_1000_ticks", |b| {
        b.iter(|| run_population(100, 1000))
    });
}

criterion_group!(benches, bench_population_sizes);
criterion_main!(benches);
