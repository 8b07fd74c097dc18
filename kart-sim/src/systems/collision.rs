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
//! Track bounds and hazards

use crate::ecs::{ComponentKind, Entity, StepContext, System, World};

const QUERY: [ComponentKind; 3] = [
    ComponentKind::Transform,
    ComponentKind::RigidBody,
    ComponentKind::Armor,
];

/// Velocity factor applied when bouncing off the arena wall
const WALL_RESTITUTION: f64 = -0.4;
const WALL_DAMAGE: f64 = 4.0;
/// Extra reach added to every hazard radius
const HAZARD_MARGIN: f64 = 2.0;
const HAZARD_DAMPING: f64 = 0.6;
const HAZARD_DAMAGE: f64 = 2.0;

/// Axis-aligned drivable area on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    /// Lowest x
    pub min_x: f64,
    /// Highest x
    pub max_x: f64,
    /// Lowest z
    pub min_z: f64,
    /// Highest z
    pub max_z: f64,
}

impl Default for TrackBounds {
    fn default() -> Self {
        TrackBounds {
            min_x: -40.0,
            max_x: 70.0,
            min_z: -60.0,
            max_z: 60.0,
        }
    }
}

impl TrackBounds {
    /// Whether `(x, z)` lies inside, edges included
    pub fn contains(&self, x: f64, z: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }
}

/// Bounces cars off the arena wall and damages them in hazards
///
/// Hazards are tested against the position after it has been pulled back
/// inside the bounds.
pub struct CollisionSystem {
    bounds: TrackBounds,
}

impl CollisionSystem {
    /// Create a collision system for the given arena
    pub fn new(bounds: TrackBounds) -> Self {
        CollisionSystem { bounds }
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(TrackBounds::default())
    }
}

impl System for CollisionSystem {
    fn run(&mut self, world: &mut World, ctx: &mut StepContext<'_>) {
        let entities: Vec<Entity> = world.view(&QUERY).collect();
        let bounds = self.bounds;
        let stores = &mut world.components;

        for entity in entities {
            let (Some(transform), Some(body), Some(armor)) = (
                stores.transforms.get_mut(entity),
                stores.rigid_bodies.get_mut(entity),
                stores.armor.get_mut(entity),
            ) else {
                continue;
            };

            let position = &mut transform.position;
            if !bounds.contains(position.x, position.z) {
                body.velocity *= WALL_RESTITUTION;
                armor.apply_damage(WALL_DAMAGE);
                position.x = position.x.clamp(bounds.min_x, bounds.max_x);
                position.z = position.z.clamp(bounds.min_z, bounds.max_z);
            }

            for hazard in &ctx.track.hazards {
                if position.distance(hazard.position) < hazard.radius + HAZARD_MARGIN {
                    body.velocity *= HAZARD_DAMPING;
                    armor.apply_damage(HAZARD_DAMAGE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Armor, RigidBody, Transform};
    use crate::rng::Random;
    use crate::systems::test_support::{run_system, spawn_car};
    use crate::systems::DriverIntent;
    use crate::track::test_support::straight_track;
    use crate::track::{Hazard, Track};
    use glam::DVec3;

    fn step(world: &mut World, track: &Track) {
        let mut rng = Random::new(1);
        run_system(
            &mut CollisionSystem::default(),
            world,
            track,
            &mut rng,
            DriverIntent::default(),
        );
    }

    #[test]
    fn test_wall_bounce() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(75.0, 1.0, -61.0), 0.0);
        world.get_component_mut::<RigidBody>(car).unwrap().velocity = DVec3::new(10.0, 0.0, -5.0);
        step(&mut world, &straight_track());

        let transform = world.get_component::<Transform>(car).unwrap();
        assert_eq!(transform.position, DVec3::new(70.0, 1.0, -60.0));
        let body = world.get_component::<RigidBody>(car).unwrap();
        assert_eq!(body.velocity, DVec3::new(-4.0, -0.0, 2.0));
        assert_eq!(world.get_component::<Armor>(car).unwrap().integrity(), 96.0);
    }

    #[test]
    fn test_inside_bounds_untouched() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(70.0, 0.2, 60.0), 0.0);
        world.get_component_mut::<RigidBody>(car).unwrap().velocity = DVec3::new(1.0, 0.0, 1.0);
        step(&mut world, &straight_track());

        assert_eq!(
            world.get_component::<RigidBody>(car).unwrap().velocity,
            DVec3::new(1.0, 0.0, 1.0)
        );
        assert_eq!(world.get_component::<Armor>(car).unwrap().integrity(), 100.0);
    }

    #[test]
    fn test_hazard_damage() {
        let mut track = straight_track();
        track.hazards.push(Hazard {
            kind: "oil".to_string(),
            position: DVec3::new(0.0, 0.0, 20.0),
            radius: 1.0,
        });

        let mut world = World::new();
        let near = spawn_car(&mut world, DVec3::new(0.0, 0.2, 22.5), 0.0);
        let far = spawn_car(&mut world, DVec3::new(0.0, 0.2, 23.5), 0.0);
        world.get_component_mut::<RigidBody>(near).unwrap().velocity = DVec3::new(0.0, 0.0, 10.0);
        step(&mut world, &track);

        assert_eq!(world.get_component::<Armor>(near).unwrap().integrity(), 98.0);
        assert_eq!(world.get_component::<Armor>(far).unwrap().integrity(), 100.0);
        assert!((world.get_component::<RigidBody>(near).unwrap().velocity.z - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_integrity_floors_at_zero() {
        let mut world = World::new();
        let car = spawn_car(&mut world, DVec3::new(-100.0, 0.2, 0.0), 0.0);
        world.add_component(car, Armor::new(5.0));
        step(&mut world, &straight_track());
        world.get_component_mut::<Transform>(car).unwrap().position.x = -100.0;
        step(&mut world, &straight_track());

        let armor = world.get_component::<Armor>(car).unwrap();
        assert_eq!(armor.integrity(), 0.0);
        assert!(world.is_entity_alive(car));
    }
}
