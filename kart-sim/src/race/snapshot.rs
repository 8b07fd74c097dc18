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
//! Read-only views of race state

use crate::ecs::components::{
    AiBehavior, Armor, LapCounter, PowerUp, PowerUpKind, RigidBody, Transform,
};
use crate::ecs::{Entity, World};
use glam::DVec3;
use serde::Serialize;

/// Power-up state as seen from outside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerUpSnapshot {
    /// Held or active kind
    pub kind: Option<PowerUpKind>,
    /// Whether the effect is running
    pub active: bool,
    /// Seconds of effect left
    pub timer: f64,
    /// Seconds until the next pickup or activation is allowed
    pub cooldown: f64,
}

/// Copy of one car's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarSnapshot {
    /// The car
    pub entity: Entity,
    /// World position
    pub position: DVec3,
    /// Euler rotation, only yaw is used
    pub rotation: DVec3,
    /// Linear velocity
    pub velocity: DVec3,
    /// Speed in units per second
    pub speed: f64,
    /// Current (power-up scaled) mass
    pub mass: f64,
    /// Current (power-up scaled) drag
    pub drag: f64,
    /// Whether the car is touching the ground
    pub on_ground: bool,
    /// Armor left
    pub integrity: f64,
    /// Completed laps
    pub lap: u32,
    /// Laps to finish
    pub total_laps: u32,
    /// Next checkpoint index
    pub checkpoint: usize,
    /// Time in the current lap
    pub lap_time: f64,
    /// Fastest completed lap
    pub best_lap: Option<f64>,
    /// Power-up state
    pub power_up: PowerUpSnapshot,
}

impl CarSnapshot {
    /// Capture `entity`, or `None` if it is not a fully assembled car
    pub fn capture(world: &World, entity: Entity) -> Option<Self> {
        let transform = world.get_component::<Transform>(entity)?;
        let body = world.get_component::<RigidBody>(entity)?;
        let armor = world.get_component::<Armor>(entity)?;
        let lap = world.get_component::<LapCounter>(entity)?;
        let power = world.get_component::<PowerUp>(entity)?;

        Some(CarSnapshot {
            entity,
            position: transform.position,
            rotation: transform.rotation,
            velocity: body.velocity,
            speed: body.speed(),
            mass: body.mass(),
            drag: body.drag(),
            on_ground: body.on_ground,
            integrity: armor.integrity(),
            lap: lap.lap,
            total_laps: lap.total_laps,
            checkpoint: lap.checkpoint,
            lap_time: lap.time,
            best_lap: lap.best_lap_time(),
            power_up: PowerUpSnapshot {
                kind: power.kind(),
                active: power.is_active(),
                timer: power.timer(),
                cooldown: power.remaining_cooldown(),
            },
        })
    }

    /// Ordering key for standings: laps, then checkpoints, then z
    pub fn progress(&self) -> f64 {
        f64::from(self.lap) * 1000.0 + self.checkpoint as f64 * 10.0 + self.position.z
    }
}

/// Roster entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarInfo {
    /// The car
    pub entity: Entity,
    /// Display name
    pub name: String,
    /// Whether this is the human car
    pub is_player: bool,
    /// AI personality, `None` for the player
    pub behavior: Option<AiBehavior>,
}

/// One row of the standings table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based place
    pub place: usize,
    /// The car
    pub entity: Entity,
    /// Display name
    pub name: String,
    /// Ordering key, see [`CarSnapshot::progress`]
    pub progress: f64,
    /// Completed laps
    pub lap: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::spawn_car;

    #[test]
    fn test_capture_car() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(1.0, 0.2, 3.0), 0.5);
        let snapshot = CarSnapshot::capture(&world, car).unwrap();
        assert_eq!(snapshot.entity, car);
        assert_eq!(snapshot.position, DVec3::new(1.0, 0.2, 3.0));
        assert_eq!(snapshot.rotation.y, 0.5);
        assert_eq!(snapshot.integrity, 100.0);
        assert_eq!(snapshot.lap, 0);
        assert_eq!(snapshot.best_lap, None);
        assert_eq!(snapshot.power_up.kind, None);
        assert!(!snapshot.power_up.active);
    }

    #[test]
    fn test_capture_requires_components() {
        let mut world = World::new();
        let bare = world.create_entity();
        world.add_component(bare, Transform::default());
        assert!(CarSnapshot::capture(&world, bare).is_none());
    }

    #[test]
    fn test_progress() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(0.0, 0.2, 12.5), 0.0);
        {
            let lap = world.get_component_mut::<LapCounter>(car).unwrap();
            lap.lap = 2;
            lap.checkpoint = 3;
        }
        let snapshot = CarSnapshot::capture(&world, car).unwrap();
        assert_eq!(snapshot.progress(), 2042.5);
    }
}
