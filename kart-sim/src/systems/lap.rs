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
//! Checkpoints and lap timing

use crate::ecs::{ComponentKind, Entity, StepContext, System, World};

const QUERY: [ComponentKind; 2] = [ComponentKind::Transform, ComponentKind::Lap];

/// Advances checkpoints and completes laps
///
/// Checkpoints must be reached in order. Reaching the last one wraps the
/// counter back to checkpoint 0 and completes the lap. A car that has
/// finished all its laps is left untouched.
pub struct LapSystem;

impl System for LapSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        let entities: Vec<Entity> = world.view(&QUERY).collect();
        let checkpoint_count = ctx.track.checkpoints.len();
        if checkpoint_count == 0 {
            return;
        }
        let stores = &mut world.components;

        for entity in entities {
            let (Some(transform), Some(lap)) =
                (stores.transforms.get(entity), stores.laps.get_mut(entity))
            else {
                continue;
            };
            if lap.is_finished() {
                continue;
            }

            lap.time += ctx.dt;
            let Some((checkpoint, node)) = ctx.track.checkpoint(lap.checkpoint) else {
                continue;
            };
            if transform.position.distance(node) < checkpoint.width {
                lap.checkpoint = (lap.checkpoint + 1) % checkpoint_count;
                if lap.checkpoint == 0 {
                    let lap_time = lap.time;
                    lap.complete_lap(lap_time);
                    log::info!(
                        "{entity} completed lap {}/{} in {:.2}s",
                        lap.lap,
                        lap.total_laps,
                        lap_time
                    );
                }
            }
        }
    }
}
