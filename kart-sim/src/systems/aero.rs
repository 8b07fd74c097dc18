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
//! Aerodynamics

use crate::ecs::components::PowerUpKind;
use crate::ecs::{ComponentKind, Entity, StepContext, System, World};

const QUERY: [ComponentKind; 4] = [
    ComponentKind::Aero,
    ComponentKind::RigidBody,
    ComponentKind::Transform,
    ComponentKind::PowerUp,
];

const DOWNFORCE_FACTOR: f64 = 0.6;
const DRAG_FACTOR: f64 = 0.4;
const HORIZONTAL_DRAG_SCALE: f64 = 0.3;
const WINGS_DOWNFORCE_SCALE: f64 = 1.6;
const WINGS_DRAG_SCALE: f64 = 0.9;
/// Upward velocity gained per second with dragon wings active
const WINGS_LIFT: f64 = 4.0;

/// Applies downforce and speed-proportional drag
///
/// Horizontal drag is subtracted from both the x and z velocity components
/// regardless of their sign, so a component already pointing along -x or -z
/// grows in magnitude.
pub struct AeroSystem;

impl System for AeroSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        let entities: Vec<Entity> = world.view(&QUERY).collect();
        let dt = ctx.dt;
        let stores = &mut world.components;

        for entity in entities {
            let (Some(aero), Some(body), Some(power)) = (
                stores.aero.get(entity),
                stores.rigid_bodies.get_mut(entity),
                stores.power_ups.get(entity),
            ) else {
                continue;
            };

            let speed = body.speed();
            let mut downforce = aero.lift_coeff * speed * DOWNFORCE_FACTOR;
            let mut drag_force = aero.drag_coeff * speed * DRAG_FACTOR;
            if power.is_active_kind(PowerUpKind::DragonWings) {
                downforce *= WINGS_DOWNFORCE_SCALE;
                drag_force *= WINGS_DRAG_SCALE;
                body.velocity.y += WINGS_LIFT * dt;
            }

            body.velocity.y -= downforce * dt / body.mass().max(1.0);
            let horizontal = drag_force * dt * HORIZONTAL_DRAG_SCALE;
            body.velocity.x -= horizontal;
            body.velocity.z -= horizontal;
        }
    }
}
