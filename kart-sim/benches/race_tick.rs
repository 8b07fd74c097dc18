// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for full race ticks
//!
//! One tick runs all seven systems over the player and the AI roster.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kart_sim::ecs::components::AiBehavior;
use kart_sim::race::simulate_seeds;
use kart_sim::{blueprint::presets, DriverIntent, PartCatalog, Race, RaceConfig, Track};

fn bundled_race(roster_size: usize) -> Race {
    let config = RaceConfig::default().with_roster(vec![AiBehavior::Clean; roster_size]);
    Race::bundled(config).expect("bundled assets load")
}

/// Benchmark: single ticks with growing AI rosters
fn bench_race_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("race_tick");

    for roster_size in [5, 20, 50].iter() {
        group.throughput(Throughput::Elements(*roster_size as u64 + 1));
        group.bench_with_input(
            BenchmarkId::new("step", roster_size),
            roster_size,
            |b, &size| {
                b.iter_batched(
                    || {
                        let mut race = bundled_race(size);
                        race.set_player_intent(DriverIntent::full_throttle());
                        race
                    },
                    |mut race| {
                        for _ in 0..120 {
                            black_box(race.step());
                        }
                        race
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark: headless batch of whole races
fn bench_seed_batch(c: &mut Criterion) {
    let catalog = PartCatalog::bundled().expect("bundled catalog");
    let track = Track::bundled().expect("bundled track");
    let blueprint = presets::wedge_glide_v1().expect("bundled preset");
    let config = RaceConfig::default();
    let seeds: Vec<u32> = (1..=8).collect();

    c.bench_function("seed_batch_8x600", |b| {
        b.iter(|| {
            black_box(
                simulate_seeds(
                    &config,
                    &catalog,
                    &track,
                    &blueprint,
                    &seeds,
                    600,
                    DriverIntent::full_throttle(),
                )
                .expect("batch runs"),
            )
        });
    });
}

criterion_group!(race_benches, bench_race_tick, bench_seed_batch);
criterion_main!(race_benches);
