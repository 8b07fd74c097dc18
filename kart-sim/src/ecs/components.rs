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
//! Race components
//!
//! Every car entity carries `Transform`, `RigidBody`, `Wheels`,
//! `AeroSurface`, `Armor`, `Ballast`, `PowerUp`, `PlayerInput` and
//! `LapCounter`; AI cars additionally carry an `AiController`.
//!
//! Several components keep their fields private where a field is only
//! allowed to change in one way: rigid-body mass and drag are always derived
//! from the base values and the power-up state, armor integrity only goes
//! down, and a power-up can only be active while it holds a kind.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Position and orientation
///
/// Rotation is stored as Euler angles in radians; only the yaw (`rotation.y`)
/// is used by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// World-space position
    pub position: DVec3,
    /// Euler angles in radians
    pub rotation: DVec3,
}

impl Transform {
    /// Create a transform at `position` facing `yaw`
    pub fn new(position: DVec3, yaw: f64) -> Self {
        Transform {
            position,
            rotation: DVec3::new(0.0, yaw, 0.0),
        }
    }

    /// Heading angle around the vertical axis
    pub fn yaw(&self) -> f64 {
        self.rotation.y
    }

    /// Check if position and rotation are finite
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Linear/angular motion state plus mass and drag
///
/// `mass` and `drag` cannot be set directly: they are recomputed from
/// `base_mass`/`base_drag` and the current [`PowerUp`] by
/// [`RigidBody::derive_from`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// Linear velocity in units per second
    pub velocity: DVec3,
    /// Angular velocity; carried but not integrated
    pub angular_velocity: DVec3,
    /// Rotational inertia
    pub inertia: f64,
    /// Whether the car touched the ground on the last physics step
    pub on_ground: bool,
    mass: f64,
    drag: f64,
    base_mass: f64,
    base_drag: f64,
}

impl RigidBody {
    /// Create a body at rest with the given base mass and drag
    pub fn new(base_mass: f64, base_drag: f64) -> Self {
        RigidBody {
            velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            inertia: base_mass * 0.8,
            on_ground: true,
            mass: base_mass,
            drag: base_drag,
            base_mass,
            base_drag,
        }
    }

    /// Current (power-up scaled) mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Current (power-up scaled) drag
    pub fn drag(&self) -> f64 {
        self.drag
    }

    /// Mass as assembled from the blueprint
    pub fn base_mass(&self) -> f64 {
        self.base_mass
    }

    /// Drag as assembled from the blueprint
    pub fn base_drag(&self) -> f64 {
        self.base_drag
    }

    /// Recompute mass and drag from the base values and a power-up state
    pub fn derive_from(&mut self, power: &PowerUp) {
        let (mass_scale, drag_scale) = power.mass_drag_scale();
        self.mass = self.base_mass * mass_scale;
        self.drag = self.base_drag * drag_scale;
    }

    /// Magnitude of the velocity
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Check if velocity is finite
    pub fn is_valid(&self) -> bool {
        self.velocity.is_finite()
    }
}

/// One wheel derived from a wheel part at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelState {
    /// Half the part height, in blocks
    pub radius: f64,
    /// Grip coefficient of the part
    pub grip: f64,
    /// Driven wheel (placed at or behind the centre line)
    pub drive: bool,
    /// Steered wheel (placed ahead of the centre line)
    pub steer: bool,
    /// Placement z of the part
    pub axle_offset: f64,
}

/// Wheel layout of a car
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wheels {
    /// Wheels in blueprint order
    pub wheels: Vec<WheelState>,
}

/// Aggregated aerodynamic coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroSurface {
    /// Projected area, at least 1
    pub area: f64,
    /// Drag coefficient
    pub drag_coeff: f64,
    /// Lift (downforce) coefficient
    pub lift_coeff: f64,
    /// Pitch stability
    pub pitch_stability: f64,
    /// Yaw stability
    pub yaw_stability: f64,
}

/// Body integrity, worn down by walls and hazards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Armor {
    /// Maximum integrity
    pub durability: f64,
    integrity: f64,
}

impl Armor {
    /// Upper bound of integrity
    pub const MAX_INTEGRITY: f64 = 100.0;

    /// Create armor at full integrity
    pub fn new(durability: f64) -> Self {
        let durability = durability.clamp(0.0, Self::MAX_INTEGRITY);
        Armor {
            durability,
            integrity: durability,
        }
    }

    /// Remaining integrity in `[0, 100]`
    pub fn integrity(&self) -> f64 {
        self.integrity
    }

    /// Subtract `amount`, flooring at zero. Negative amounts are ignored.
    pub fn apply_damage(&mut self, amount: f64) {
        if amount > 0.0 {
            self.integrity = (self.integrity - amount).max(0.0);
        }
    }

    /// True once integrity reached zero
    pub fn is_wrecked(&self) -> bool {
        self.integrity <= 0.0
    }
}

impl Default for Armor {
    fn default() -> Self {
        Armor::new(Self::MAX_INTEGRITY)
    }
}

/// Ballast carried by the car
///
/// Its mass is already part of the rigid body's base mass; physics does not
/// read this component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ballast {
    /// Total ballast mass
    pub mass: f64,
    /// Mass-weighted centre of the ballast parts
    pub position: DVec3,
}

/// Kind of power-up a car can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    /// More downforce, less drag, a small vertical lift
    DragonWings,
    /// Lighter, less drag, sharper steering
    Toad,
}

impl PowerUpKind {
    /// Both kinds, in pickup order
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::DragonWings, PowerUpKind::Toad];

    /// How long the effect lasts once activated, in seconds
    pub fn active_duration(&self) -> f64 {
        match self {
            PowerUpKind::DragonWings => 3.0,
            PowerUpKind::Toad => 2.0,
        }
    }

    /// Cooldown started on activation, in seconds
    pub fn post_use_cooldown(&self) -> f64 {
        match self {
            PowerUpKind::DragonWings => 10.0,
            PowerUpKind::Toad => 12.0,
        }
    }

    /// Mass and drag multipliers while active
    pub fn mass_drag_scale(&self) -> (f64, f64) {
        match self {
            PowerUpKind::DragonWings => (1.0, 0.9),
            PowerUpKind::Toad => (0.7, 0.75),
        }
    }

    /// Name as shown to presentation layers
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::DragonWings => "dragonWings",
            PowerUpKind::Toad => "toad",
        }
    }
}

/// Power-up state machine
///
/// `Empty → Held → Active → Empty`. A held power-up is one that was picked
/// up but not used yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerUpState {
    /// Nothing held
    Empty,
    /// Picked up, waiting to be used
    Held(PowerUpKind),
    /// In effect for `timer` more seconds
    Active {
        /// Which power-up is running
        kind: PowerUpKind,
        /// Remaining active time, always positive
        timer: f64,
    },
}

/// Power-up slot of a car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    state: PowerUpState,
    remaining_cooldown: f64,
}

impl PowerUp {
    /// Cooldown applied when a pad grants a power-up
    pub const PICKUP_COOLDOWN: f64 = 1.5;

    /// Create an empty slot with no cooldown
    pub fn new() -> Self {
        PowerUp {
            state: PowerUpState::Empty,
            remaining_cooldown: 0.0,
        }
    }

    /// Current state
    pub fn state(&self) -> PowerUpState {
        self.state
    }

    /// Held or active kind, `None` when empty
    pub fn kind(&self) -> Option<PowerUpKind> {
        match self.state {
            PowerUpState::Empty => None,
            PowerUpState::Held(kind) | PowerUpState::Active { kind, .. } => Some(kind),
        }
    }

    /// Whether an effect is running
    pub fn is_active(&self) -> bool {
        matches!(self.state, PowerUpState::Active { .. })
    }

    /// Whether `kind` is the running effect
    pub fn is_active_kind(&self, kind: PowerUpKind) -> bool {
        matches!(self.state, PowerUpState::Active { kind: active, .. } if active == kind)
    }

    /// Remaining active time, zero when not active
    pub fn timer(&self) -> f64 {
        match self.state {
            PowerUpState::Active { timer, .. } => timer,
            _ => 0.0,
        }
    }

    /// Remaining cooldown in seconds, never negative
    pub fn remaining_cooldown(&self) -> f64 {
        self.remaining_cooldown
    }

    /// Decay cooldown and the active timer by `dt`
    ///
    /// An active effect whose timer reaches zero ends and empties the slot.
    pub fn tick(&mut self, dt: f64) {
        self.remaining_cooldown = (self.remaining_cooldown - dt).max(0.0);
        if let PowerUpState::Active { kind, timer } = self.state {
            let timer = timer - dt;
            self.state = if timer <= 0.0 {
                PowerUpState::Empty
            } else {
                PowerUpState::Active { kind, timer }
            };
        }
    }

    /// Activate the held power-up if the cooldown has run out
    ///
    /// Returns the kind that was activated.
    pub fn try_activate(&mut self) -> Option<PowerUpKind> {
        match self.state {
            PowerUpState::Held(kind) if self.remaining_cooldown <= 0.0 => {
                self.state = PowerUpState::Active {
                    kind,
                    timer: kind.active_duration(),
                };
                self.remaining_cooldown = kind.post_use_cooldown();
                Some(kind)
            }
            _ => None,
        }
    }

    /// Whether a pad may grant a power-up right now
    pub fn can_pick_up(&self) -> bool {
        matches!(self.state, PowerUpState::Empty) && self.remaining_cooldown <= 0.0
    }

    /// Take `kind` from a pad; rejected while holding one or cooling down
    pub fn try_pick_up(&mut self, kind: PowerUpKind) -> bool {
        if !self.can_pick_up() {
            return false;
        }
        self.state = PowerUpState::Held(kind);
        self.remaining_cooldown = Self::PICKUP_COOLDOWN;
        true
    }

    /// Mass and drag multipliers for the current state
    pub fn mass_drag_scale(&self) -> (f64, f64) {
        match self.state {
            PowerUpState::Active { kind, .. } => kind.mass_drag_scale(),
            _ => (1.0, 1.0),
        }
    }
}

impl Default for PowerUp {
    fn default() -> Self {
        PowerUp::new()
    }
}

/// Normalized driving commands
///
/// Written by exactly one of the input or AI systems, read by physics and
/// power-up handling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerInput {
    /// `[0, 1]`
    pub throttle: f64,
    /// `[0, 1]`
    pub brake: f64,
    /// `[-1, 1]`, positive turns toward increasing yaw
    pub steer: f64,
    /// Request to activate the held power-up
    pub use_power: bool,
}

/// AI driving personality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiBehavior {
    /// Races the line
    Clean,
    /// Drives faster; otherwise identical
    Rammer,
}

impl AiBehavior {
    /// Speed below which the AI keeps full throttle
    pub fn target_speed(&self) -> f64 {
        match self {
            AiBehavior::Clean => 32.0,
            AiBehavior::Rammer => 38.0,
        }
    }

    /// Aggression scalar stored on the controller
    pub fn aggression(&self) -> f64 {
        match self {
            AiBehavior::Clean => 0.6,
            AiBehavior::Rammer => 1.2,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            AiBehavior::Clean => "clean",
            AiBehavior::Rammer => "rammer",
        }
    }
}

/// AI steering state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiController {
    /// Driving personality
    pub behavior: AiBehavior,
    /// Index of the track node being steered toward
    pub target_node: usize,
    /// Aggression scalar
    pub aggression: f64,
    /// Per-car seed drawn at spawn
    pub seed: u32,
    /// Seconds until the next power-up decision
    pub cooldown: f64,
}

/// Lap and checkpoint progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapCounter {
    /// Completed laps
    pub lap: u32,
    /// Laps required to finish
    pub total_laps: u32,
    /// Index of the next checkpoint to reach
    pub checkpoint: usize,
    /// Elapsed time in the current lap
    pub time: f64,
    /// Fastest completed lap, `0.0` until one is completed
    pub best_lap: f64,
}

impl LapCounter {
    /// Fresh counter for a race of `total_laps`
    pub fn new(total_laps: u32) -> Self {
        LapCounter {
            lap: 0,
            total_laps,
            checkpoint: 0,
            time: 0.0,
            best_lap: 0.0,
        }
    }

    /// Whether all laps are done
    pub fn is_finished(&self) -> bool {
        self.lap >= self.total_laps
    }

    /// Fastest completed lap, if any
    pub fn best_lap_time(&self) -> Option<f64> {
        (self.best_lap > 0.0).then_some(self.best_lap)
    }

    /// Record a completed lap of `lap_time` seconds
    ///
    /// Does nothing once the counter is finished.
    pub fn complete_lap(&mut self, lap_time: f64) {
        if self.is_finished() {
            return;
        }
        self.best_lap = if self.best_lap == 0.0 {
            lap_time
        } else {
            self.best_lap.min(lap_time)
        };
        self.lap += 1;
        self.time = 0.0;
    }
}
