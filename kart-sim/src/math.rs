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
//! Heading helpers shared by the systems and the track
//!
//! Yaw is measured around +y with yaw 0 facing +z and positive yaw turning
//! toward +x, so `forward_from_yaw(yaw_toward(a, b))` points from `a` at `b`.

use glam::DVec3;
use std::f64::consts::{PI, TAU};

/// Unit forward vector for a heading
pub fn forward_from_yaw(yaw: f64) -> DVec3 {
    let (sin, cos) = yaw.sin_cos();
    DVec3::new(sin, 0.0, cos)
}

/// Heading of the horizontal part of `direction`
///
/// A zero (or purely vertical) direction yields heading 0 instead of NaN.
pub fn yaw_from_forward(direction: DVec3) -> f64 {
    let flat = DVec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
    if flat == DVec3::ZERO {
        0.0
    } else {
        flat.x.atan2(flat.z)
    }
}

/// Heading from `from` toward `to`
pub fn yaw_toward(from: DVec3, to: DVec3) -> f64 {
    yaw_from_forward(to - from)
}

/// Wrap an angle into `(-PI, PI]`
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
