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
//! Staged system scheduler
//!
//! Systems are grouped into stages that run in ascending order. Within a
//! stage, systems run in the order they were added. Every system runs to
//! completion before the next one starts; there is no parallelism inside a
//! step.

use crate::ecs::{StepContext, System, World};

/// Stage identifier for grouping systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageId(pub usize);

impl StageId {
    /// Create a new stage ID
    pub fn new(id: usize) -> Self {
        StageId(id)
    }
}

/// The race step, in execution order
pub mod stages {
    use super::StageId;

    /// Human intents become driving commands
    pub const INPUT: StageId = StageId(0);

    /// AI drivers write their driving commands
    pub const AI: StageId = StageId(1);

    /// Engine, brake, steering and integration
    pub const PHYSICS: StageId = StageId(2);

    /// Downforce and aerodynamic drag
    pub const AERODYNAMICS: StageId = StageId(3);

    /// Power-up timers, activation, mass/drag derivation and pickups
    pub const POWER_UP: StageId = StageId(4);

    /// Track bounds and hazards
    pub const COLLISION: StageId = StageId(5);

    /// Checkpoints and lap timing
    pub const LAP: StageId = StageId(6);
}

/// A system with metadata for scheduling
struct ScheduledSystem {
    system: Box<dyn System>,
    stage: StageId,
}

/// System scheduler with deterministic staged execution
///
/// # Examples
///
/// ```
/// use kart_sim::ecs::scheduler::{Scheduler, stages};
/// use kart_sim::ecs::{StepContext, System, World};
///
/// struct MySystem;
/// impl System for MySystem {
///     fn run(&mut self, _world: &mut World, _ctx: &mut StepContext<'_>) {}
/// }
///
/// let mut scheduler = Scheduler::new();
/// scheduler.add_system(MySystem, stages::PHYSICS);
/// assert_eq!(scheduler.system_count(), 1);
/// ```
pub struct Scheduler {
    systems: Vec<ScheduledSystem>,
    sorted: bool,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new() -> Self {
        Scheduler {
            systems: Vec::new(),
            sorted: true,
        }
    }

    /// Add a system to a specific stage
    pub fn add_system<S: System + 'static>(&mut self, system: S, stage: StageId) {
        self.systems.push(ScheduledSystem {
            system: Box::new(system),
            stage,
        });
        self.sorted = false;
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Get the number of stages in use
    pub fn stage_count(&self) -> usize {
        self.systems
            .iter()
            .map(|s| s.stage.0 + 1)
            .max()
            .unwrap_or(0)
    }

    /// System names in execution order
    pub fn system_names(&mut self) -> Vec<String> {
        self.sort();
        self.systems
            .iter()
            .map(|s| s.system.name().to_owned())
            .collect()
    }

    /// Run every system once, stage by stage
    pub fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        self.sort();
        for scheduled in &mut self.systems {
            scheduled.system.run(world, ctx);
        }
    }

    /// Clear all systems from the scheduler
    pub fn clear(&mut self) {
        self.systems.clear();
        self.sorted = true;
    }

    fn sort(&mut self) {
        if !self.sorted {
            // Stable, so insertion order holds within a stage
            self.systems.sort_by_key(|s| s.stage);
            self.sorted = true;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Random;
    use crate::systems::DriverIntent;
    use crate::track::test_support::straight_track;
    use std::sync::{Arc, Mutex};

    struct RecordingSystem {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSystem {
        fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            RecordingSystem {
                name: name.to_string(),
                log: Arc::clone(log),
            }
        }
    }

    impl System for RecordingSystem {
        fn run(&mut self, _world: &mut World, _ctx: &mut StepContext<'_>) {
            self.log.lock().unwrap().push(self.name.clone());
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn run_once(scheduler: &mut Scheduler) {
        let track = straight_track();
        let mut rng = Random::new(1);
        let mut world = World::new();
        let mut ctx = StepContext::new(1.0 / 120.0, &track, &mut rng, DriverIntent::default());
        scheduler.run(&mut world, &mut ctx);
    }

    #[test]
    fn test_stage_ordering() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(RecordingSystem::new("lap", &log), stages::LAP);
        scheduler.add_system(RecordingSystem::new("input", &log), stages::INPUT);
        scheduler.add_system(RecordingSystem::new("physics", &log), stages::PHYSICS);
        scheduler.add_system(RecordingSystem::new("physics-late", &log), stages::PHYSICS);

        assert_eq!(scheduler.stage_count(), 7);
        run_once(&mut scheduler);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["input", "physics", "physics-late", "lap"]
        );
        assert_eq!(
            scheduler.system_names(),
            vec!["input", "physics", "physics-late", "lap"]
        );
    }

    #[test]
    fn test_every_step_runs_every_system() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(RecordingSystem::new("a", &log), stages::AI);
        scheduler.add_system(RecordingSystem::new("b", &log), stages::COLLISION);

        run_once(&mut scheduler);
        run_once(&mut scheduler);

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_empty_scheduler() {
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.stage_count(), 0);
        run_once(&mut scheduler);
    }

    #[test]
    fn test_clear_scheduler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(RecordingSystem::new("test", &log), stages::PHYSICS);
        assert_eq!(scheduler.system_count(), 1);

        scheduler.clear();
        assert_eq!(scheduler.system_count(), 0);
    }
}
