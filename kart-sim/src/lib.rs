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
//! # Kart Sim
//!
//! Deterministic race-phase simulation core for a voxel kart racer, built on
//! a small ECS (Entity Component System).
//!
//! ## Features
//!
//! - **ECS Architecture**: typed component storages, tag sets and staged systems
//! - **Vehicle Assembly**: voxel blueprints resolved against a part catalog into mass, drag, wheels and aero
//! - **Fixed-Step Dynamics**: engine, brakes, steering, aero, power-ups, walls, hazards and laps at 120 Hz
//! - **AI Drivers**: node-following opponents with per-car personalities
//! - **Replays**: ring-buffered recording and best-lap ghosts
//! - **Parallel Batches**: optional Rayon integration for running many headless races
//!
//! Given the same track, blueprint, seed and inputs, two races produce the
//! same state tick for tick.
//!
//! ## Example
//!
//! ```rust
//! use kart_sim::{DriverIntent, Race, RaceConfig};
//!
//! let mut race = Race::bundled(RaceConfig::default()).unwrap();
//! race.set_player_intent(DriverIntent::full_throttle());
//! for _ in 0..120 {
//!     race.step();
//! }
//!
//! let player = race.snapshot(race.player()).unwrap();
//! assert!(player.speed > 0.0);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Heading and vector helpers
pub mod math;

/// Deterministic pseudorandom numbers
pub mod rng;

/// Part catalog loading and lookup
pub mod catalog;

/// Track description loading
pub mod track;

/// Voxel vehicle blueprints
pub mod blueprint;

/// Blueprint to physical vehicle conversion
pub mod assembly;

/// Per-tick race systems
pub mod systems;

/// Replay recording
pub mod replay;

/// Race orchestration
pub mod race;

pub use blueprint::Blueprint;
pub use catalog::PartCatalog;
pub use ecs::{Entity, World};
pub use race::{Race, RaceConfig, RaceError};
pub use rng::Random;
pub use systems::DriverIntent;
pub use track::Track;
