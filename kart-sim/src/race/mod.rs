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
//! Race orchestration
//!
//! [`Race`] owns everything one race needs: the entity store, the system
//! schedule, the track, the PRNG, the player recorder and the ghost. Hosts
//! feed it a [`DriverIntent`] and either call [`Race::step`] for exactly one
//! tick or [`Race::advance`] with wall-clock time.

mod batch;
mod config;
mod snapshot;

pub use batch::{simulate_seeds, SeedRun};
pub use config::{GridLayout, RaceConfig};
pub use snapshot::{CarInfo, CarSnapshot, PowerUpSnapshot, Standing};

use crate::assembly::VehicleAssembly;
use crate::blueprint::{Blueprint, BlueprintError};
use crate::catalog::{CatalogError, PartCatalog, PartLookup};
use crate::ecs::components::{
    AiBehavior, AiController, Armor, LapCounter, PlayerInput, PowerUp, RigidBody, Transform,
};
use crate::ecs::{Entity, Scheduler, StepContext, World};
use crate::replay::{Recorder, ReplayFrame};
use crate::rng::Random;
use crate::systems::{race_scheduler, DriverIntent};
use crate::track::{Track, TrackError};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while setting up a race
#[derive(Debug, Error)]
pub enum RaceError {
    /// The part catalog could not be loaded
    #[error("part catalog: {0}")]
    Catalog(#[from] CatalogError),
    /// The track could not be loaded or is unusable
    #[error("track: {0}")]
    Track(#[from] TrackError),
    /// The blueprint could not be loaded
    #[error("blueprint: {0}")]
    Blueprint(#[from] BlueprintError),
    /// The race configuration is unusable
    #[error("invalid race config: {0}")]
    InvalidConfig(String),
}

/// What the player recorder is doing after [`Race::toggle_replay`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayMode {
    /// Recording is frozen and the buffer holds the replay
    Playback,
    /// Buffer cleared and recording again
    Live,
}

/// One race: player plus AI roster on a single track
pub struct Race {
    config: RaceConfig,
    track: Track,
    assembly: VehicleAssembly,
    world: World,
    scheduler: Scheduler,
    rng: Random,
    cars: Vec<CarInfo>,
    player: Entity,
    recorder: Recorder,
    intent: DriverIntent,
    time: f64,
    tick_count: u64,
    accumulator: f64,
    running: bool,
    complete: bool,
    last_player_lap: u32,
    best_lap: f64,
    ghost: Vec<ReplayFrame>,
    reported_invalid: HashSet<Entity>,
}

impl Race {
    /// Set up a race and spawn every car on the grid
    ///
    /// The blueprint is assembled once against `parts`; every car, player
    /// and AI alike, drives the same build.
    pub fn new<L: PartLookup + ?Sized>(
        config: RaceConfig,
        parts: &L,
        track: Track,
        blueprint: &Blueprint,
    ) -> Result<Self, RaceError> {
        config.validate().map_err(RaceError::InvalidConfig)?;
        track.validate()?;
        let assembly = VehicleAssembly::from_blueprint(blueprint, parts);

        let mut race = Race {
            scheduler: race_scheduler(config.bounds),
            rng: Random::new(config.seed_override.unwrap_or(track.seed)),
            recorder: Recorder::with_capacity(Entity::new(0), config.replay_capacity),
            config,
            track,
            assembly,
            world: World::new(),
            cars: Vec::new(),
            player: Entity::new(0),
            intent: DriverIntent::default(),
            time: 0.0,
            tick_count: 0,
            accumulator: 0.0,
            running: false,
            complete: false,
            last_player_lap: 0,
            best_lap: f64::INFINITY,
            ghost: Vec::new(),
            reported_invalid: HashSet::new(),
        };
        race.initialize();
        Ok(race)
    }

    /// Parse the catalog, track and blueprint, then set up the race
    pub fn from_sources(
        config: RaceConfig,
        catalog_csv: &str,
        track_json: &str,
        blueprint_json: &str,
    ) -> Result<Self, RaceError> {
        let catalog = PartCatalog::parse_csv(catalog_csv)?;
        let track = Track::from_json(track_json)?;
        let blueprint = Blueprint::deserialize(blueprint_json)?;
        Self::new(config, &catalog, track, &blueprint)
    }

    /// Race on the bundled track with the bundled catalog and preset
    pub fn bundled(config: RaceConfig) -> Result<Self, RaceError> {
        let catalog = PartCatalog::bundled()?;
        let track = Track::bundled()?;
        let blueprint = crate::blueprint::presets::wedge_glide_v1()?;
        Self::new(config, &catalog, track, &blueprint)
    }

    fn initialize(&mut self) {
        self.world = World::new();
        self.scheduler = race_scheduler(self.config.bounds);
        self.rng = Random::new(self.seed());
        self.cars.clear();
        self.intent = DriverIntent::default();
        self.time = 0.0;
        self.tick_count = 0;
        self.accumulator = 0.0;
        self.complete = false;
        self.last_player_lap = 0;
        self.best_lap = f64::INFINITY;
        self.ghost.clear();
        self.reported_invalid.clear();

        self.player = self.spawn_car(0, None);
        self.cars.push(CarInfo {
            entity: self.player,
            name: "Player".to_string(),
            is_player: true,
            behavior: None,
        });
        let roster = self.config.roster.clone();
        for (i, behavior) in roster.into_iter().enumerate() {
            let entity = self.spawn_car(i + 1, Some(behavior));
            self.cars.push(CarInfo {
                entity,
                name: format!("AI {}", i + 1),
                is_player: false,
                behavior: Some(behavior),
            });
        }

        self.recorder = Recorder::with_capacity(self.player, self.config.replay_capacity);
        self.running = true;
        log::info!(
            "Race started on '{}': {} cars, {} laps, seed {}",
            self.track.name,
            self.cars.len(),
            self.track.laps,
            self.seed()
        );
    }

    fn spawn_car(&mut self, grid_index: usize, behavior: Option<AiBehavior>) -> Entity {
        let role = if behavior.is_some() { "ai" } else { "player" };
        let entity = self.world.create_entity_with_tags(&["car", role]);
        let position = self.track.start.position + self.config.grid.slot(grid_index);
        let assembly = &self.assembly;

        self.world
            .add_component(entity, Transform::new(position, self.track.start_yaw()));
        self.world.add_component(
            entity,
            RigidBody::new(assembly.base_mass, assembly.base_drag),
        );
        self.world.add_component(entity, assembly.wheels.clone());
        self.world.add_component(entity, assembly.aero);
        self.world.add_component(entity, Armor::default());
        self.world.add_component(entity, assembly.ballast);
        self.world.add_component(entity, PowerUp::new());
        self.world.add_component(entity, PlayerInput::default());
        self.world.add_component(entity, LapCounter::new(self.track.laps));

        if let Some(behavior) = behavior {
            let node_count = u32::try_from(self.track.nodes.len()).unwrap_or(u32::MAX);
            let target_node = self.rng.next_int(node_count) as usize;
            let seed = self.rng.next_int(10_000);
            let cooldown = self.rng.next_range(2.0, 4.0);
            self.world.add_component(
                entity,
                AiController {
                    behavior,
                    target_node,
                    aggression: behavior.aggression(),
                    seed,
                    cooldown,
                },
            );
        }

        log::debug!("Spawned {role} {entity} at {position}");
        entity
    }

    /// Driving intent applied to the player from the next tick on
    pub fn set_player_intent(&mut self, intent: DriverIntent) {
        self.intent = intent;
    }

    /// Run exactly one tick
    ///
    /// Returns `false` without doing anything when the race is stopped or
    /// complete.
    pub fn step(&mut self) -> bool {
        if !self.running || self.complete {
            return false;
        }

        let dt = self.config.fixed_dt;
        self.time += dt;
        self.tick_count += 1;
        let mut ctx = StepContext::new(dt, &self.track, &mut self.rng, self.intent);
        self.scheduler.run(&mut self.world, &mut ctx);

        self.report_invalid_state();
        self.recorder.capture(self.time, &self.world);
        self.update_player_progress();
        true
    }

    /// Feed `elapsed` seconds of wall-clock time through the fixed step
    ///
    /// Runs at most `max_substeps` ticks; any backlog beyond that is
    /// dropped. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }
        let dt = self.config.fixed_dt;
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= dt && steps < self.config.max_substeps {
            if !self.step() {
                self.accumulator = 0.0;
                return steps;
            }
            self.accumulator -= dt;
            steps += 1;
        }
        if self.accumulator >= dt {
            log::debug!(
                "Dropping {:.3}s of simulation backlog",
                self.accumulator
            );
            self.accumulator = 0.0;
        }
        steps
    }

    fn report_invalid_state(&mut self) {
        for info in &self.cars {
            let transform_ok = self
                .world
                .get_component::<Transform>(info.entity)
                .map_or(true, Transform::is_valid);
            let body_ok = self
                .world
                .get_component::<RigidBody>(info.entity)
                .map_or(true, RigidBody::is_valid);
            if !(transform_ok && body_ok) && self.reported_invalid.insert(info.entity) {
                log::warn!(
                    "{} ({}) has non-finite state at t={:.3}",
                    info.name,
                    info.entity,
                    self.time
                );
            }
        }
    }

    fn update_player_progress(&mut self) {
        let Some(lap) = self.world.get_component::<LapCounter>(self.player).copied() else {
            return;
        };

        if lap.lap > self.last_player_lap {
            let completed = self.last_player_lap;
            let frames = self.recorder.frames_for_lap(completed);
            if lap.best_lap > 0.0 && lap.best_lap < self.best_lap && !frames.is_empty() {
                self.best_lap = lap.best_lap;
                log::debug!(
                    "New ghost from lap {}: {:.2}s, {} frames",
                    completed + 1,
                    lap.best_lap,
                    frames.len()
                );
                self.ghost = frames;
            }
            self.last_player_lap = lap.lap;
        }

        if lap.is_finished() {
            self.complete = true;
            self.running = false;
            log::info!(
                "Race complete after {:.2}s ({} ticks)",
                self.time,
                self.tick_count
            );
        }
    }

    /// Stop ticking; takes effect before the next tick
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resume a stopped race; a completed race stays complete
    pub fn resume(&mut self) {
        self.running = !self.complete;
    }

    /// Whether ticks currently run
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the player has finished all laps
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Tear everything down and start again from the grid
    ///
    /// The PRNG is reseeded, so a restarted race replays exactly like a
    /// fresh one given the same inputs.
    pub fn restart(&mut self) {
        log::debug!("Restarting race");
        self.initialize();
    }

    /// Simulated seconds since the start
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Ticks run since the start
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Race configuration
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Seed the random stream starts from on every (re)start
    pub fn seed(&self) -> u32 {
        self.config.seed_override.unwrap_or(self.track.seed)
    }

    /// Track being raced
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Shared vehicle build
    pub fn assembly(&self) -> &VehicleAssembly {
        &self.assembly
    }

    /// Read-only access to the entity store
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The player car
    pub fn player(&self) -> Entity {
        self.player
    }

    /// Every car in grid order, player first
    pub fn cars(&self) -> &[CarInfo] {
        &self.cars
    }

    /// Copy of one car's state
    pub fn snapshot(&self, entity: Entity) -> Option<CarSnapshot> {
        CarSnapshot::capture(&self.world, entity)
    }

    /// Copies of every car's state in grid order
    pub fn snapshots(&self) -> Vec<CarSnapshot> {
        self.cars
            .iter()
            .filter_map(|info| self.snapshot(info.entity))
            .collect()
    }

    /// Cars ordered by progress, leader first
    pub fn standings(&self) -> Vec<Standing> {
        let mut rows: Vec<(f64, &CarInfo, u32)> = self
            .cars
            .iter()
            .filter_map(|info| {
                self.snapshot(info.entity)
                    .map(|snapshot| (snapshot.progress(), info, snapshot.lap))
            })
            .collect();
        rows.sort_by(|a, b| b.0.total_cmp(&a.0));

        rows.into_iter()
            .enumerate()
            .map(|(i, (progress, info, lap))| Standing {
                place: i + 1,
                entity: info.entity,
                name: info.name.clone(),
                progress,
                lap,
            })
            .collect()
    }

    /// Frames of the player's best lap so far
    pub fn ghost(&self) -> &[ReplayFrame] {
        &self.ghost
    }

    /// The player recorder
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Switch between live recording and frozen playback
    pub fn toggle_replay(&mut self) -> ReplayMode {
        if self.recorder.is_recording() {
            self.recorder.set_recording(false);
            ReplayMode::Playback
        } else {
            self.recorder.reset();
            ReplayMode::Live
        }
    }
}
