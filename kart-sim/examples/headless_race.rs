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
//! Headless race on the bundled track
//!
//! Runs the bundled preset around the bundled track at full throttle with
//! light steering toward the next checkpoint, then prints the standings.
//!
//! ```text
//! RUST_LOG=debug cargo run --example headless_race
//! ```

use kart_sim::math::{wrap_angle, yaw_toward};
use kart_sim::{DriverIntent, Race, RaceConfig, RaceError};

/// Ten simulated minutes at 120 Hz
const TICK_LIMIT: u64 = 72_000;

fn main() -> Result<(), RaceError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Kart Sim - Headless Race");
    println!("========================\n");

    let mut race = Race::bundled(RaceConfig::default())?;
    println!(
        "Track: {} ({} laps, {} nodes)",
        race.track().name,
        race.track().laps,
        race.track().nodes.len()
    );
    println!(
        "Build: mass {:.1}, drag {:.3}, {} parts\n",
        race.assembly().base_mass,
        race.assembly().base_drag,
        race.assembly().resolved_parts
    );

    while race.tick_count() < TICK_LIMIT {
        let intent = steer_toward_checkpoint(&race);
        race.set_player_intent(intent);
        if !race.step() {
            break;
        }
        if race.tick_count() % 1200 == 0 {
            if let Some(player) = race.snapshot(race.player()) {
                println!(
                    "t={:6.1}s  lap {}/{}  checkpoint {}  speed {:5.1}",
                    race.time(),
                    player.lap,
                    player.total_laps,
                    player.checkpoint,
                    player.speed
                );
            }
        }
    }

    println!(
        "\nFinished: {} after {:.1}s ({} ticks)",
        race.is_complete(),
        race.time(),
        race.tick_count()
    );
    println!("Ghost frames: {}", race.ghost().len());
    println!("\nStandings:");
    for row in race.standings() {
        println!("  {}. {:<8} lap {}  progress {:.1}", row.place, row.name, row.lap, row.progress);
    }

    Ok(())
}

fn steer_toward_checkpoint(race: &Race) -> DriverIntent {
    let Some(player) = race.snapshot(race.player()) else {
        return DriverIntent::default();
    };
    let Some((_, target)) = race.track().checkpoint(player.checkpoint) else {
        return DriverIntent::full_throttle();
    };
    let error = wrap_angle(yaw_toward(player.position, target) - player.rotation.y);

    DriverIntent {
        forward: true,
        left: error < -0.1,
        right: error > 0.1,
        ..Default::default()
    }
}
