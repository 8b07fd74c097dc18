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
//! Race simulation systems
//!
//! One system per concern, run every fixed step in this order:
//!
//! 1. [`InputSystem`]: human intent → driving commands
//! 2. [`AiSystem`]: AI driving commands
//! 3. [`PhysicsSystem`]: engine, brake, steering, integration, ground clamp
//! 4. [`AeroSystem`]: downforce and aerodynamic drag
//! 5. [`PowerUpSystem`]: power-up timers, activation, mass/drag, pickups
//! 6. [`CollisionSystem`]: track bounds and hazards
//! 7. [`LapSystem`]: checkpoints and lap timing
//!
//! Every system collects its view before touching components, then borrows
//! the individual storages it needs from `world.components`.

mod aero;
mod ai;
mod collision;
mod input;
mod lap;
mod physics;
mod power_up;

pub use aero::AeroSystem;
pub use ai::AiSystem;
pub use collision::{CollisionSystem, TrackBounds};
pub use input::InputSystem;
pub use lap::LapSystem;
pub use physics::PhysicsSystem;
pub use power_up::PowerUpSystem;

use crate::ecs::scheduler::stages;
use crate::ecs::Scheduler;

/// Abstract human driving intent, as produced by whatever input device the
/// host maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverIntent {
    /// Accelerate
    pub forward: bool,
    /// Brake / reverse
    pub back: bool,
    /// Steer toward decreasing yaw
    pub left: bool,
    /// Steer toward increasing yaw
    pub right: bool,
    /// Activate the held power-up
    pub use_power: bool,
}

impl DriverIntent {
    /// Full throttle, no steering
    pub fn full_throttle() -> Self {
        DriverIntent {
            forward: true,
            ..Default::default()
        }
    }
}

/// Scheduler with the race systems registered in their stages
pub fn race_scheduler(bounds: TrackBounds) -> Scheduler {
    let mut scheduler = Scheduler::new();
    scheduler.add_system(InputSystem, stages::INPUT);
    scheduler.add_system(AiSystem, stages::AI);
    scheduler.add_system(PhysicsSystem, stages::PHYSICS);
    scheduler.add_system(AeroSystem, stages::AERODYNAMICS);
    scheduler.add_system(PowerUpSystem, stages::POWER_UP);
    scheduler.add_system(CollisionSystem::new(bounds), stages::COLLISION);
    scheduler.add_system(LapSystem, stages::LAP);
    scheduler
}
