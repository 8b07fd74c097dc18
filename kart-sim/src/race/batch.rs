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
//! Headless batches of independent races
//!
//! Each race is single-threaded; with the `parallel` feature the races of a
//! batch run on the rayon pool.

use super::{Race, RaceConfig, RaceError, Standing};
use crate::blueprint::Blueprint;
use crate::catalog::PartLookup;
use crate::systems::DriverIntent;
use crate::track::Track;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of one headless race
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRun {
    /// Seed the race ran with
    pub seed: u32,
    /// Ticks simulated
    pub ticks: u64,
    /// Whether the player finished before the tick budget ran out
    pub complete: bool,
    /// Simulated seconds
    pub time: f64,
    /// Player's fastest lap
    pub best_lap: Option<f64>,
    /// Final standings
    pub standings: Vec<Standing>,
}

/// Run one race per seed with a fixed player intent
///
/// Each race stops at completion or after `max_ticks`. Results come back in
/// seed order.
pub fn simulate_seeds<L: PartLookup + Sync + ?Sized>(
    config: &RaceConfig,
    parts: &L,
    track: &Track,
    blueprint: &Blueprint,
    seeds: &[u32],
    max_ticks: u64,
    intent: DriverIntent,
) -> Result<Vec<SeedRun>, RaceError> {
    let run = |&seed: &u32| -> Result<SeedRun, RaceError> {
        let config = config.clone().with_seed(seed);
        let mut race = Race::new(config, parts, track.clone(), blueprint)?;
        race.set_player_intent(intent);
        while race.tick_count() < max_ticks && race.step() {}

        let best_lap = race
            .snapshot(race.player())
            .and_then(|snapshot| snapshot.best_lap);
        Ok(SeedRun {
            seed,
            ticks: race.tick_count(),
            complete: race.is_complete(),
            time: race.time(),
            best_lap,
            standings: race.standings(),
        })
    };

    #[cfg(feature = "parallel")]
    {
        seeds.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(run).collect()
    }
}
