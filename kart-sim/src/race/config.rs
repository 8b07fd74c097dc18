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
//! Race configuration

use crate::ecs::components::AiBehavior;
use crate::replay::DEFAULT_REPLAY_CAPACITY;
use crate::systems::TrackBounds;
use glam::DVec3;

/// Starting grid placement
///
/// Car `i` (player is 0) starts at
/// `start + origin_offset + (i * lateral_spacing, 0, i * longitudinal_spacing)`,
/// in world axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Offset of grid slot 0 from the track start
    pub origin_offset: DVec3,
    /// Step along x per slot
    pub lateral_spacing: f64,
    /// Step along z per slot
    pub longitudinal_spacing: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout {
            origin_offset: DVec3::new(-6.0, 0.0, 0.0),
            lateral_spacing: 3.0,
            longitudinal_spacing: 2.0,
        }
    }
}

impl GridLayout {
    /// Offset of grid slot `index` from the track start
    pub fn slot(&self, index: usize) -> DVec3 {
        let i = index as f64;
        self.origin_offset
            + DVec3::new(i * self.lateral_spacing, 0.0, i * self.longitudinal_spacing)
    }
}

/// Race settings that are not part of the track or vehicle data
#[derive(Debug, Clone, PartialEq)]
pub struct RaceConfig {
    /// Length of one simulation tick in seconds
    pub fixed_dt: f64,
    /// Most ticks a single `advance` call may run
    pub max_substeps: u32,
    /// AI cars to spawn behind the player, in grid order
    pub roster: Vec<AiBehavior>,
    /// Starting grid placement
    pub grid: GridLayout,
    /// Arena walls
    pub bounds: TrackBounds,
    /// Frames kept by the player recorder
    pub replay_capacity: usize,
    /// Seed to use instead of the track's own
    pub seed_override: Option<u32>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            fixed_dt: 1.0 / 120.0,
            max_substeps: 8,
            roster: vec![
                AiBehavior::Clean,
                AiBehavior::Clean,
                AiBehavior::Clean,
                AiBehavior::Rammer,
                AiBehavior::Rammer,
            ],
            grid: GridLayout::default(),
            bounds: TrackBounds::default(),
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
            seed_override: None,
        }
    }
}

impl RaceConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tick length
    pub fn with_fixed_dt(mut self, dt: f64) -> Self {
        assert!(dt.is_finite() && dt > 0.0, "Fixed dt must be positive");
        self.fixed_dt = dt;
        self
    }

    /// Set the substep cap for `advance`
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        assert!(max_substeps >= 1, "Max substeps must be >= 1");
        self.max_substeps = max_substeps;
        self
    }

    /// Replace the AI roster
    pub fn with_roster(mut self, roster: Vec<AiBehavior>) -> Self {
        self.roster = roster;
        self
    }

    /// Replace the grid layout
    pub fn with_grid(mut self, grid: GridLayout) -> Self {
        self.grid = grid;
        self
    }

    /// Replace the arena walls
    pub fn with_bounds(mut self, bounds: TrackBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the replay buffer size
    pub fn with_replay_capacity(mut self, capacity: usize) -> Self {
        self.replay_capacity = capacity;
        self
    }

    /// Seed the race with `seed` instead of the track seed
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed_override = Some(seed);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(format!("fixed_dt must be positive, got {}", self.fixed_dt));
        }
        if self.max_substeps == 0 {
            return Err("max_substeps must be at least 1".to_string());
        }
        Ok(())
    }
}
