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
//! Vehicle assembly
//!
//! Turns a blueprint into the aggregate numbers the race needs. The
//! aggregation constants are gameplay tuning, not physics; changing them
//! changes how every existing blueprint drives.
//!
//! Part names that the catalog cannot resolve are skipped and contribute
//! nothing.

use crate::blueprint::Blueprint;
use crate::catalog::{Part, PartCategory, PartLookup};
use crate::ecs::components::{AeroSurface, Ballast, WheelState, Wheels};
use glam::DVec3;

/// Chassis mass every car starts with
pub const CHASSIS_MASS: f64 = 140.0;
/// Chassis drag every car starts with
pub const CHASSIS_DRAG: f64 = 0.8;

const AERO_BASE_DRAG: f64 = 0.2;
const AERO_BASE_LIFT: f64 = 1.2;
const AERO_BASE_PITCH: f64 = 0.4;
const AERO_BASE_YAW: f64 = 0.4;
const AERO_MIN_AREA: f64 = 1.0;

/// Aggregate vehicle properties derived from a blueprint
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleAssembly {
    /// Rigid-body base mass
    pub base_mass: f64,
    /// Rigid-body base drag
    pub base_drag: f64,
    /// Wheel layout
    pub wheels: Wheels,
    /// Aerodynamic aggregate
    pub aero: AeroSurface,
    /// Ballast summary
    pub ballast: Ballast,
    /// Parts that resolved in the catalog
    pub resolved_parts: usize,
    /// Parts that did not
    pub skipped_parts: usize,
}

impl VehicleAssembly {
    /// Assemble a blueprint against a part lookup
    pub fn from_blueprint<L: PartLookup + ?Sized>(blueprint: &Blueprint, parts: &L) -> Self {
        let mut mass = 0.0;
        let mut drag = 0.0;
        let mut wheels = Vec::new();

        let mut area = 0.0;
        let mut aero_drag = 0.0;
        let mut lift = 0.0;
        let mut pitch = 0.0;
        let mut yaw = 0.0;

        let mut ballast_mass = 0.0;
        let mut ballast_moment = DVec3::ZERO;

        let mut resolved_parts = 0;
        let mut skipped_parts = 0;

        for placed in &blueprint.parts {
            let Some(part) = parts.find_part(&placed.part_name) else {
                log::debug!("skipping unknown part {:?}", placed.part_name);
                skipped_parts += 1;
                continue;
            };
            resolved_parts += 1;
            mass += part.mass;
            drag += part.drag_coeff;

            let position = grid_position(placed.position);
            match part.category {
                PartCategory::Wheel => wheels.push(wheel_state(part, position.z)),
                PartCategory::Aero => {
                    area += part.projected_area();
                    aero_drag += part.drag_coeff;
                    lift += 0.6 + 0.5 * part.drag_coeff;
                    pitch += 0.1 + 0.05 * part.length_blocks;
                    yaw += 0.08 + 0.04 * part.width_blocks;
                }
                PartCategory::Ballast => {
                    ballast_mass += part.mass;
                    ballast_moment += position * part.mass;
                }
                _ => {}
            }
        }

        let ballast_position = if ballast_mass > 0.0 {
            ballast_moment / ballast_mass
        } else {
            DVec3::ZERO
        };

        VehicleAssembly {
            base_mass: CHASSIS_MASS + mass,
            base_drag: CHASSIS_DRAG + drag,
            wheels: Wheels { wheels },
            aero: AeroSurface {
                area: area.max(AERO_MIN_AREA),
                drag_coeff: AERO_BASE_DRAG + aero_drag,
                lift_coeff: AERO_BASE_LIFT + lift,
                pitch_stability: AERO_BASE_PITCH + pitch,
                yaw_stability: AERO_BASE_YAW + yaw,
            },
            ballast: Ballast {
                mass: ballast_mass,
                position: ballast_position,
            },
            resolved_parts,
            skipped_parts,
        }
    }
}

fn grid_position(position: [i32; 3]) -> DVec3 {
    DVec3::new(
        f64::from(position[0]),
        f64::from(position[1]),
        f64::from(position[2]),
    )
}

fn wheel_state(part: &Part, z: f64) -> WheelState {
    WheelState {
        radius: part.height_blocks / 2.0,
        grip: part.grip_coeff,
        drive: z >= 0.0,
        steer: z < 0.0,
        axle_offset: z,
    }
}

const STARTER_MASS: f64 = 120.0;
const STARTER_DRAG: f64 = 0.6;
const STARTER_CG_HEIGHT: f64 = 1.2;

/// Centre-of-gravity verdict shown while building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityHint {
    /// CG at or below 1.8
    Low,
    /// CG at or below 2.3
    Balanced,
    /// Anything higher
    High,
}

impl StabilityHint {
    fn from_cg_height(cg_height: f64) -> Self {
        if cg_height <= 1.8 {
            StabilityHint::Low
        } else if cg_height <= 2.3 {
            StabilityHint::Balanced
        } else {
            StabilityHint::High
        }
    }

    /// Short advice line
    pub fn message(&self) -> &'static str {
        match self {
            StabilityHint::Low => "CG low: launch ready",
            StabilityHint::Balanced => "CG balanced: mind ramps",
            StabilityHint::High => "High CG: add ballast low",
        }
    }
}

/// Build-phase readout for a blueprint
///
/// Uses the lighter build-phase starter chassis, so the mass here is not
/// the race's base mass.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildStats {
    /// Starter chassis plus parts
    pub mass: f64,
    /// Starter drag plus parts
    pub drag: f64,
    /// Mass-weighted height of the build
    pub cg_height: f64,
    /// Wheel spread along x
    pub track: f64,
    /// Wheel spread along z
    pub wheelbase: f64,
    /// Rough top speed estimate
    pub estimated_top_speed: f64,
    /// CG verdict
    pub stability: StabilityHint,
    /// Number of wheel parts
    pub wheel_count: usize,
}

impl BuildStats {
    /// Compute the readout; unknown parts are skipped as in assembly
    pub fn compute<L: PartLookup + ?Sized>(blueprint: &Blueprint, parts: &L) -> Self {
        let mut mass = STARTER_MASS;
        let mut drag = STARTER_DRAG;
        let mut weighted_y = STARTER_MASS * STARTER_CG_HEIGHT;
        let mut total_grip = 0.0;
        let mut wheel_positions = Vec::new();

        for placed in &blueprint.parts {
            let Some(part) = parts.find_part(&placed.part_name) else {
                continue;
            };
            let position = grid_position(placed.position);
            mass += part.mass;
            drag += part.drag_coeff;
            weighted_y += part.mass * position.y;
            if part.category == PartCategory::Wheel {
                wheel_positions.push(position);
                total_grip += part.grip_coeff;
            }
        }

        let (track, wheelbase) = if wheel_positions.len() >= 2 {
            let min = wheel_positions.iter().fold(DVec3::INFINITY, |acc, p| acc.min(*p));
            let max = wheel_positions
                .iter()
                .fold(DVec3::NEG_INFINITY, |acc, p| acc.max(*p));
            (max.x - min.x, max.z - min.z)
        } else {
            (0.0, 0.0)
        };

        let cg_height = weighted_y / mass;
        BuildStats {
            mass,
            drag,
            cg_height,
            track,
            wheelbase,
            estimated_top_speed: (46.0 - drag * 40.0 + total_grip * 5.0).clamp(24.0, 58.0),
            stability: StabilityHint::from_cg_height(cg_height),
            wheel_count: wheel_positions.len(),
        }
    }
}
