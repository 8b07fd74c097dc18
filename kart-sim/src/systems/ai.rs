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
//! AI drivers
//!
//! Each AI car chases the track node it is targeting, and rolls for a
//! power-up use whenever its decision cooldown runs out. All randomness
//! comes from the race's shared stream, in a fixed per-car draw order:
//! steering noise first, then the power-up roll (only when eligible), then
//! the new cooldown (only when the roll succeeds).

use crate::ecs::{ComponentKind, Entity, StepContext, System, World};
use crate::math::{wrap_angle, yaw_toward};

const QUERY: [ComponentKind; 4] = [
    ComponentKind::Ai,
    ComponentKind::PlayerInput,
    ComponentKind::Transform,
    ComponentKind::RigidBody,
];

const STEER_GAIN: f64 = 1.2;
const STEER_NOISE: f64 = 0.05;
const CRUISE_THROTTLE: f64 = 0.3;
const CORNER_BRAKE: f64 = 0.4;
/// Positive heading error above which the AI brakes, in radians
const CORNER_ANGLE: f64 = 0.6;
/// Distance at which a node counts as reached
const NODE_REACHED: f64 = 6.0;
const POWER_USE_CHANCE: f64 = 0.7;
const POWER_COOLDOWN_MIN: f64 = 4.0;
const POWER_COOLDOWN_MAX: f64 = 7.0;

/// Steers, throttles and fires power-ups for every AI car
pub struct AiSystem;

impl System for AiSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        let entities: Vec<Entity> = world.view(&QUERY).collect();
        let node_count = ctx.track.nodes.len().max(1);
        let stores = &mut world.components;

        for entity in entities {
            let (Some(ai), Some(input), Some(transform), Some(body)) = (
                stores.ai.get_mut(entity),
                stores.inputs.get_mut(entity),
                stores.transforms.get(entity),
                stores.rigid_bodies.get(entity),
            ) else {
                continue;
            };

            let target = ctx.track.node(ai.target_node);
            let position = transform.position;
            let yaw_error = wrap_angle(yaw_toward(position, target) - transform.yaw());

            let noise = ctx.rng.next_range(-STEER_NOISE, STEER_NOISE);
            input.steer = (yaw_error * STEER_GAIN + noise).clamp(-1.0, 1.0);
            input.throttle = if body.speed() < ai.behavior.target_speed() {
                1.0
            } else {
                CRUISE_THROTTLE
            };
            input.brake = if yaw_error > CORNER_ANGLE {
                CORNER_BRAKE
            } else {
                0.0
            };

            if position.distance(target) < NODE_REACHED {
                ai.target_node = (ai.target_node + 1) % node_count;
            }

            ai.cooldown -= ctx.dt;
            let power_active = stores
                .power_ups
                .get(entity)
                .is_some_and(|power| power.is_active());
            if ai.cooldown <= 0.0 && !power_active && ctx.rng.next() > POWER_USE_CHANCE {
                input.use_power = true;
                ai.cooldown = ctx.rng.next_range(POWER_COOLDOWN_MIN, POWER_COOLDOWN_MAX);
            } else {
                input.use_power = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{AiBehavior, AiController, PlayerInput, RigidBody};
    use crate::rng::Random;
    use crate::systems::test_support::{run_system, spawn_car, DT};
    use crate::systems::DriverIntent;
    use crate::track::test_support::straight_track;
    use glam::DVec3;

    fn add_ai(world: &mut World, car: Entity, behavior: AiBehavior, cooldown: f64) {
        world.add_component(
            car,
            AiController {
                behavior,
                target_node: 0,
                aggression: behavior.aggression(),
                seed: 7,
                cooldown,
            },
        );
    }

    #[test]
    fn test_steers_toward_target() {
        let mut world = World::new();
        // Target node 0 is at (0, 0, 50); car sits to its left facing +z
        let car = spawn_car(&mut world, DVec3::new(-20.0, 0.2, 0.0), 0.0);
        add_ai(&mut world, car, AiBehavior::Clean, 5.0);
        let track = straight_track();
        let mut rng = Random::new(3);

        run_system(&mut AiSystem, &mut world, &track, &mut rng, DriverIntent::default());
        let input = world.get_component::<PlayerInput>(car).unwrap();
        // atan2(20, 50) ≈ 0.38 rad to the right
        assert!(input.steer > 0.3 && input.steer < 0.6);
        assert_eq!(input.throttle, 1.0);
        assert_eq!(input.brake, 0.0);
        assert!(!input.use_power);
    }

    fn sharp_turn_input(x: f64) -> PlayerInput {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(x, 0.2, 50.0), 0.0);
        add_ai(&mut world, car, AiBehavior::Clean, 5.0);
        let track = straight_track();
        let mut rng = Random::new(3);

        run_system(&mut AiSystem, &mut world, &track, &mut rng, DriverIntent::default());
        *world.get_component::<PlayerInput>(car).unwrap()
    }

    #[test]
    fn test_brakes_only_for_positive_heading_error() {
        // Target (0, 0, 50) lies a quarter turn to the right
        let right = sharp_turn_input(-60.0);
        assert_eq!(right.steer, 1.0);
        assert_eq!(right.brake, 0.4);

        // Same turn to the left: full opposite lock but no brake
        let left = sharp_turn_input(60.0);
        assert_eq!(left.steer, -1.0);
        assert_eq!(left.brake, 0.0);
    }

    #[test]
    fn test_cruise_above_target_speed() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(0.0, 0.2, 0.0), 0.0);
        add_ai(&mut world, car, AiBehavior::Clean, 5.0);
        world.get_component_mut::<RigidBody>(car).unwrap().velocity = DVec3::new(0.0, 0.0, 35.0);
        let track = straight_track();
        let mut rng = Random::new(3);

        run_system(&mut AiSystem, &mut world, &track, &mut rng, DriverIntent::default());
        assert_eq!(world.get_component::<PlayerInput>(car).unwrap().throttle, 0.3);

        // 35 is still below the rammer's target
        add_ai(&mut world, car, AiBehavior::Rammer, 5.0);
        run_system(&mut AiSystem, &mut world, &track, &mut rng, DriverIntent::default());
        assert_eq!(world.get_component::<PlayerInput>(car).unwrap().throttle, 1.0);
    }

    #[test]
    fn test_advances_and_wraps_target() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(0.0, 0.2, 98.0), 0.0);
        add_ai(&mut world, car, AiBehavior::Clean, 5.0);
        world.get_component_mut::<AiController>(car).unwrap().target_node = 1;
        let track = straight_track();
        let mut rng = Random::new(3);

        run_system(&mut AiSystem, &mut world, &track, &mut rng, DriverIntent::default());
        assert_eq!(world.get_component::<AiController>(car).unwrap().target_node, 0);
    }

    #[test]
    fn test_power_decision_draws() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(0.0, 0.2, 0.0), 0.0);
        add_ai(&mut world, car, AiBehavior::Clean, 0.0);
        let track = straight_track();

        let mut rng = Random::new(11);
        let mut mirror = rng.clone();
        run_system(&mut AiSystem, &mut world, &track, &mut rng, DriverIntent::default());

        mirror.next();
        let roll = mirror.next();
        let ai = world.get_component::<AiController>(car).unwrap();
        let input = world.get_component::<PlayerInput>(car).unwrap();
        if roll > 0.7 {
            let cooldown = mirror.next_range(4.0, 7.0);
            assert!(input.use_power);
            assert_eq!(ai.cooldown, cooldown);
        } else {
            assert!(!input.use_power);
            assert_eq!(ai.cooldown, -DT);
        }
        assert_eq!(rng, mirror);
    }

    #[test]
    fn test_no_power_roll_while_cooling_down() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(0.0, 0.2, 0.0), 0.0);
        add_ai(&mut world, car, AiBehavior::Rammer, 3.0);
        let track = straight_track();

        let mut rng = Random::new(11);
        let mut mirror = rng.clone();
        run_system(&mut AiSystem, &mut world, &track, &mut rng, DriverIntent::default());

        // Only the steering noise was drawn
        mirror.next();
        assert_eq!(rng, mirror);
        assert!((world.get_component::<AiController>(car).unwrap().cooldown - (3.0 - DT)).abs() < 1e-12);
    }
}
