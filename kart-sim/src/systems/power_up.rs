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
//! Power-up handling
//!
//! Per car, in order: cooldown and timer decay, activation on request,
//! mass/drag derivation for the rigid body, then pad pickup.

use crate::ecs::components::PowerUpKind;
use crate::ecs::{ComponentKind, Entity, StepContext, System, World};

const QUERY: [ComponentKind; 3] = [
    ComponentKind::PowerUp,
    ComponentKind::Transform,
    ComponentKind::PlayerInput,
];

/// Distance from a pad centre that grants a power-up
pub const PAD_RADIUS: f64 = 4.0;

/// Runs the power-up state machine and keeps rigid-body mass/drag in sync
pub struct PowerUpSystem;

impl System for PowerUpSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        let entities: Vec<Entity> = world.view(&QUERY).collect();
        let stores = &mut world.components;

        for entity in entities {
            let (Some(power), Some(transform), Some(input)) = (
                stores.power_ups.get_mut(entity),
                stores.transforms.get(entity),
                stores.inputs.get_mut(entity),
            ) else {
                continue;
            };

            power.tick(ctx.dt);
            if input.use_power {
                if let Some(kind) = power.try_activate() {
                    log::debug!("{entity} activated {}", kind.as_str());
                }
            }

            if let Some(body) = stores.rigid_bodies.get_mut(entity) {
                body.derive_from(power);
            }

            for pad in &ctx.track.item_pads {
                if transform.position.distance(pad.position) < PAD_RADIUS && power.can_pick_up() {
                    let kind = if ctx.rng.next() > 0.5 {
                        PowerUpKind::DragonWings
                    } else {
                        PowerUpKind::Toad
                    };
                    power.try_pick_up(kind);
                    input.use_power = false;
                    log::debug!("{entity} picked up {}", kind.as_str());
                }
            }
        }
    }
}
