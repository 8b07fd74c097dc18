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
//! Human input mapping

use crate::ecs::{ComponentKind, Entity, StepContext, System, World};

const QUERY: [ComponentKind; 3] = [
    ComponentKind::PlayerInput,
    ComponentKind::RigidBody,
    ComponentKind::Transform,
];

/// Brake multiplier while the car is off the ground
const AIRBORNE_BRAKE_SCALE: f64 = 0.5;

/// Writes the step's [`DriverIntent`](crate::systems::DriverIntent) into
/// every human-driven car
///
/// Cars with an AI controller are left to the AI system.
pub struct InputSystem;

impl System for InputSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        let entities: Vec<Entity> = world
            .view(&QUERY)
            .filter(|&entity| !world.has_kind(entity, ComponentKind::Ai))
            .collect();

        let intent = ctx.intent;
        let stores = &mut world.components;
        for entity in entities {
            let (Some(input), Some(body)) = (
                stores.inputs.get_mut(entity),
                stores.rigid_bodies.get(entity),
            ) else {
                continue;
            };

            input.throttle = if intent.forward { 1.0 } else { 0.0 };
            input.brake = if intent.back { 1.0 } else { 0.0 };
            input.steer = match (intent.left, intent.right) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            input.use_power = intent.use_power;
            if !body.on_ground {
                input.brake *= AIRBORNE_BRAKE_SCALE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{AiBehavior, AiController, PlayerInput, RigidBody};
    use crate::rng::Random;
    use crate::systems::test_support::{run_system, spawn_car};
    use crate::systems::DriverIntent;
    use crate::track::test_support::straight_track;
    use glam::DVec3;

    #[test]
    fn test_intent_mapping() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::ZERO, 0.0);
        let track = straight_track();
        let mut rng = Random::new(1);

        let intent = DriverIntent {
            forward: true,
            back: true,
            left: true,
            right: false,
            use_power: true,
        };
        run_system(&mut InputSystem, &mut world, &track, &mut rng, intent);

        let input = world.get_component::<PlayerInput>(car).unwrap();
        assert_eq!(input.throttle, 1.0);
        assert_eq!(input.brake, 1.0);
        assert_eq!(input.steer, -1.0);
        assert!(input.use_power);

        let both = DriverIntent {
            left: true,
            right: true,
            ..Default::default()
        };
        run_system(&mut InputSystem, &mut world, &track, &mut rng, both);
        let input = world.get_component::<PlayerInput>(car).unwrap();
        assert_eq!(input.steer, 0.0);
        assert_eq!(input.throttle, 0.0);
        assert!(!input.use_power);
    }

    #[test]
    fn test_airborne_brake_halved() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(0.0, 3.0, 0.0), 0.0);
        world.get_component_mut::<RigidBody>(car).unwrap().on_ground = false;
        let track = straight_track();
        let mut rng = Random::new(1);

        let intent = DriverIntent {
            back: true,
            ..Default::default()
        };
        run_system(&mut InputSystem, &mut world, &track, &mut rng, intent);
        assert_eq!(world.get_component::<PlayerInput>(car).unwrap().brake, 0.5);
    }

    #[test]
    fn test_ai_cars_ignored() {
        let mut world = World::new();
        let ai_car = spawn_car(&mut world, DVec3::ZERO, 0.0);
        world.add_component(
            ai_car,
            AiController {
                behavior: AiBehavior::Clean,
                target_node: 0,
                aggression: 0.6,
                seed: 1,
                cooldown: 2.0,
            },
        );
        let track = straight_track();
        let mut rng = Random::new(1);

        run_system(
            &mut InputSystem,
            &mut world,
            &track,
            &mut rng,
            DriverIntent::full_throttle(),
        );
        assert_eq!(world.get_component::<PlayerInput>(ai_car).unwrap().throttle, 0.0);
    }
}
