//! Criterion benchmarks for the nursery simulations.
//!
//! Three benchmark groups:
//! - `buffer`: personal inventory runs, 60 s steps, from a newborn and an adult
//! - `trough`: shared trough, 1 s ticks, one baby and a mixed group of ten
//! - `threshold`: 50-probe hand-feed bisection over the buffer simulation

use criterion::{Criterion, criterion_group, criterion_main};
use nursery_core::buffer::{BufferRequest, buffer_time};
use nursery_core::settings::ServerSettings;
use nursery_core::species::CreatureInstance;
use nursery_core::test_utils::*;
use nursery_core::threshold::solve_hand_feed_threshold;
use nursery_core::trough::{TroughSetup, simulate_trough};

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer");
    group.sample_size(50);

    let settings = ServerSettings::default();
    let model = carnivore_model(&settings);
    let food = raw_meat();

    group.bench_function("newborn_100_items", |b| {
        let request = BufferRequest::new(100.0, 0.0);
        b.iter(|| buffer_time(&model, &food, &settings, &request));
    });

    // Slow eater: the run is dominated by spoilage across 50 stacks.
    group.bench_function("adult_1000_items_consolidated", |b| {
        let request = BufferRequest::new(1000.0, 1.0).with_consolidation(3600.0);
        b.iter(|| buffer_time(&model, &food, &settings, &request));
    });

    group.finish();
}

fn bench_trough(c: &mut Criterion) {
    let mut group = c.benchmark_group("trough");
    group.sample_size(20);

    let catalog = reference_catalog();
    let settings = ServerSettings::default();

    group.bench_function("one_baby_5_stacks", |b| {
        let setup = TroughSetup::new()
            .with_creature(baby_carnivore(0.1))
            .with_stacks(raw_meat_id(), 5.0);
        b.iter(|| simulate_trough(&catalog, &settings, &setup));
    });

    group.bench_function("ten_creatures_mixed_food", |b| {
        let setup = TroughSetup::new()
            .with_creature(baby_carnivore(0.05).with_quantity(6))
            .with_creature(CreatureInstance::new(herbivore_id(), 0.2).with_quantity(4))
            .with_stacks(raw_meat_id(), 20.0)
            .with_stacks(cooked_meat_id(), 10.0)
            .with_stacks(berries_id(), 8.0);
        b.iter(|| simulate_trough(&catalog, &settings, &setup));
    });

    group.finish();
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold");
    group.sample_size(30);

    let settings = ServerSettings::default();
    let model = carnivore_model(&settings);
    let food = raw_meat();

    group.bench_function("carnivore_raw_meat", |b| {
        b.iter(|| solve_hand_feed_threshold(&model, &food, 1.0, &settings, 500.0));
    });

    group.finish();
}

criterion_group!(benches, bench_buffer, bench_trough, bench_threshold);
criterion_main!(benches);
