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
//! System execution framework
//!
//! Systems contain the logic that operates on entities and components.
//! Each fixed step, every system receives the world plus a [`StepContext`]
//! carrying the step length and the shared collaborators the race owns.

use crate::ecs::World;
use crate::rng::Random;
use crate::systems::DriverIntent;
use crate::track::Track;

/// Per-step collaborators handed to every system
///
/// The race owns the track and the random stream; systems borrow them for
/// the duration of one step instead of holding their own copies, so every
/// system that draws random numbers draws from the same seeded sequence.
pub struct StepContext<'a> {
    /// Fixed step length in seconds
    pub dt: f64,
    /// Track description
    pub track: &'a Track,
    /// Shared deterministic random stream
    pub rng: &'a mut Random,
    /// Latest human driving intent
    pub intent: DriverIntent,
}

impl<'a> StepContext<'a> {
    /// Build a context for one step
    pub fn new(dt: f64, track: &'a Track, rng: &'a mut Random, intent: DriverIntent) -> Self {
        StepContext {
            dt,
            track,
            rng,
            intent,
        }
    }
}

/// Trait for systems that operate on the ECS world
///
/// A system must finish all of its work inside `run`; the scheduler does
/// not start the next system until the previous one returns.
pub trait System: Send + Sync {
    /// Execute the system on the world for one fixed step
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>);

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
