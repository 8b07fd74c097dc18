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
//! Vehicle dynamics
//!
//! Semi-implicit Euler: velocity is updated from the engine, brake and
//! linear drag first, then the position moves by the new velocity.

use crate::ecs::components::PowerUpKind;
use crate::ecs::{ComponentKind, Entity, StepContext, System, World};
use crate::math::forward_from_yaw;

const QUERY: [ComponentKind; 4] = [
    ComponentKind::Transform,
    ComponentKind::RigidBody,
    ComponentKind::PlayerInput,
    ComponentKind::PowerUp,
];

/// Engine force at full throttle
pub const ENGINE_FORCE: f64 = 1200.0;
/// Brake force at full brake
pub const BRAKE_FORCE: f64 = 600.0;
const LINEAR_DRAG: f64 = 0.6;
const STEER_RATE: f64 = 0.9;
const TOAD_STEER_RATE: f64 = 1.3;
const STEER_SCALE: f64 = 2.4;
/// Height at or below which the car counts as grounded
const GROUND_HEIGHT: f64 = 0.5;
const RIDE_HEIGHT_MIN: f64 = 0.2;
const RIDE_HEIGHT_MAX: f64 = 6.0;
const MAX_FALL_SPEED: f64 = 2.0;

/// Integrates every car's driving commands into motion
pub struct PhysicsSystem;

impl System for PhysicsSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        let entities: Vec<Entity> = world.view(&QUERY).collect();
        let dt = ctx.dt;
        let stores = &mut world.components;

        for entity in entities {
            let (Some(transform), Some(body), Some(input), Some(power)) = (
                stores.transforms.get_mut(entity),
                stores.rigid_bodies.get_mut(entity),
                stores.inputs.get(entity),
                stores.power_ups.get(entity),
            ) else {
                continue;
            };

            let forward = forward_from_yaw(transform.yaw());
            let force = ENGINE_FORCE * input.throttle - BRAKE_FORCE * input.brake;
            let acceleration = forward * (force / body.mass().max(1.0));
            let drag = body.velocity * (-LINEAR_DRAG * body.drag());
            body.velocity += (acceleration + drag) * dt;

            let rate = if power.is_active_kind(PowerUpKind::Toad) {
                TOAD_STEER_RATE
            } else {
                STEER_RATE
            };
            transform.rotation.y += input.steer * rate * dt * STEER_SCALE;

            transform.position += body.velocity * dt;
            body.on_ground = transform.position.y <= GROUND_HEIGHT;
            if body.on_ground {
                transform.position.y = transform.position.y.clamp(RIDE_HEIGHT_MIN, RIDE_HEIGHT_MAX);
                body.velocity.y = body.velocity.y.max(-MAX_FALL_SPEED);
            }
        }
    }
}
