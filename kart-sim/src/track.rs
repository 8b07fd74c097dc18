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
//! Track description
//!
//! A track is a closed polyline of nodes with checkpoints placed on some of
//! them, plus start pose, item pads and hazards. Ramps, rumble strips and the
//! finish line are carried for presentation; the simulation does not read
//! them.

use crate::math::yaw_from_forward;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Track shipped with the crate
pub const BUNDLED_TRACK_JSON: &str = include_str!("../assets/track.json");

/// Errors raised while loading a track
#[derive(Debug, Error)]
pub enum TrackError {
    /// Malformed JSON or wrong shape
    #[error("invalid track JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The node polyline is empty
    #[error("track has no nodes")]
    NoNodes,

    /// The checkpoint list is empty
    #[error("track has no checkpoints")]
    NoCheckpoints,

    /// A checkpoint references a node that does not exist
    #[error("checkpoint {checkpoint} references node {index} but the track has {nodes} nodes")]
    CheckpointOutOfRange {
        /// Position in the checkpoint list
        checkpoint: usize,
        /// Referenced node index
        index: usize,
        /// Node count
        nodes: usize,
    },

    /// A checkpoint trigger width is not a positive number
    #[error("checkpoint {checkpoint} has invalid width {width}")]
    InvalidWidth {
        /// Position in the checkpoint list
        checkpoint: usize,
        /// Offending width
        width: f64,
    },

    /// The race would have no laps
    #[error("track must have at least one lap")]
    ZeroLaps,
}

/// Start position and facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPose {
    /// Grid reference point
    pub position: DVec3,
    /// Facing direction; need not be normalized
    pub forward: DVec3,
}

/// Checkpoint trigger on a track node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Index into [`Track::nodes`]
    pub index: usize,
    /// Trigger radius around the node
    pub width: f64,
}

/// Two-point segment (finish line, rumble strip)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First end
    pub p1: DVec3,
    /// Second end
    pub p2: DVec3,
}

/// Launch ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Base centre
    pub position: DVec3,
    /// Run direction
    pub forward: DVec3,
    /// Lateral extent
    pub width: f64,
    /// Extent along `forward`
    pub length: f64,
    /// Lip height
    pub height: f64,
}

/// Damaging area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Free-form kind, e.g. `oil`
    #[serde(rename = "type")]
    pub kind: String,
    /// Centre
    pub position: DVec3,
    /// Radius; cars are affected within `radius + 2`
    pub radius: f64,
}

/// Power-up pad
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPad {
    /// Centre
    pub position: DVec3,
}

/// Complete track description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Display name
    pub name: String,
    /// Format version
    #[serde(default)]
    pub version: u32,
    /// Length unit label
    #[serde(default)]
    pub units: String,
    /// Seed for the race's random stream
    pub seed: u32,
    /// Laps to finish
    pub laps: u32,
    /// Start pose
    pub start: StartPose,
    /// Closed polyline
    pub nodes: Vec<DVec3>,
    /// Checkpoints in driving order; the last one closes the lap
    pub checkpoints: Vec<Checkpoint>,
    /// Finish line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_line: Option<Segment>,
    /// Ramps
    #[serde(default)]
    pub ramps: Vec<Ramp>,
    /// Rumble strips
    #[serde(default)]
    pub rumble_strips: Vec<Segment>,
    /// Hazards
    #[serde(default)]
    pub hazards: Vec<Hazard>,
    /// Item pads
    #[serde(default)]
    pub item_pads: Vec<ItemPad>,
}

impl Track {
    /// Parse and validate a track from JSON
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        let track: Track = serde_json::from_str(json)?;
        track.validate()?;
        Ok(track)
    }

    /// The track bundled with the crate
    pub fn bundled() -> Result<Self, TrackError> {
        Self::from_json(BUNDLED_TRACK_JSON)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, TrackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural invariants the systems rely on
    pub fn validate(&self) -> Result<(), TrackError> {
        if self.nodes.is_empty() {
            return Err(TrackError::NoNodes);
        }
        if self.checkpoints.is_empty() {
            return Err(TrackError::NoCheckpoints);
        }
        if self.laps == 0 {
            return Err(TrackError::ZeroLaps);
        }
        for (checkpoint, cp) in self.checkpoints.iter().enumerate() {
            if cp.index >= self.nodes.len() {
                return Err(TrackError::CheckpointOutOfRange {
                    checkpoint,
                    index: cp.index,
                    nodes: self.nodes.len(),
                });
            }
            if !(cp.width.is_finite() && cp.width > 0.0) {
                return Err(TrackError::InvalidWidth {
                    checkpoint,
                    width: cp.width,
                });
            }
        }
        Ok(())
    }

    /// Heading of the start pose
    pub fn start_yaw(&self) -> f64 {
        yaw_from_forward(self.start.forward)
    }

    /// Node at `index`, wrapping around the loop
    ///
    /// Returns the origin for a track without nodes.
    pub fn node(&self, index: usize) -> DVec3 {
        if self.nodes.is_empty() {
            return DVec3::ZERO;
        }
        self.nodes[index % self.nodes.len()]
    }

    /// Checkpoint at `index`, wrapping, with its node position
    pub fn checkpoint(&self, index: usize) -> Option<(Checkpoint, DVec3)> {
        if self.checkpoints.is_empty() {
            return None;
        }
        let cp = self.checkpoints[index % self.checkpoints.len()];
        Some((cp, self.node(cp.index)))
    }

    /// Total length of the closed loop
    pub fn loop_length(&self) -> f64 {
        let n = self.nodes.len();
        (0..n)
            .map(|i| self.nodes[i].distance(self.nodes[(i + 1) % n]))
            .sum()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::straight_track;
    use super::*;

    #[test]
    fn test_bundled_track() {
        let track = Track::bundled().unwrap();
        assert_eq!(track.nodes.len(), 12);
        assert_eq!(track.checkpoints.len(), 4);
        assert_eq!(track.laps, 3);
        assert_eq!(track.hazards[0].kind, "oil");
        assert_eq!(track.start_yaw(), 0.0);
        assert!(track.finish_line.is_some());
    }

    #[test]
    fn test_minimal_track_defaults() {
        let json = r#"{
            "name": "mini",
            "seed": 3,
            "laps": 1,
            "start": { "position": [0, 0, 0], "forward": [1, 0, 0] },
            "nodes": [[0, 0, 0], [10, 0, 0]],
            "checkpoints": [{ "index": 1, "width": 4 }]
        }"#;
        let track = Track::from_json(json).unwrap();
        assert!(track.item_pads.is_empty());
        assert!(track.hazards.is_empty());
        assert!((track.start_yaw() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Track::from_json("{ \"name\": "),
            Err(TrackError::Json(_))
        ));
        assert!(matches!(
            Track::from_json("{ \"name\": \"x\" }"),
            Err(TrackError::Json(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut track = straight_track();
        track.checkpoints[1].index = 9;
        assert!(matches!(
            track.validate(),
            Err(TrackError::CheckpointOutOfRange {
                checkpoint: 1,
                index: 9,
                nodes: 2
            })
        ));

        let mut track = straight_track();
        track.laps = 0;
        assert!(matches!(track.validate(), Err(TrackError::ZeroLaps)));

        let mut track = straight_track();
        track.checkpoints.clear();
        assert!(matches!(track.validate(), Err(TrackError::NoCheckpoints)));

        let mut track = straight_track();
        track.checkpoints[0].width = -1.0;
        assert!(matches!(track.validate(), Err(TrackError::InvalidWidth { .. })));

        let mut track = straight_track();
        track.nodes.clear();
        assert!(matches!(track.validate(), Err(TrackError::NoNodes)));
        assert_eq!(track.node(3), DVec3::ZERO);
    }

    #[test]
    fn test_wrapping_lookups() {
        let track = straight_track();
        assert_eq!(track.node(3), track.nodes[1]);
        let (cp, node) = track.checkpoint(2).unwrap();
        assert_eq!(cp.index, 0);
        assert_eq!(node, DVec3::new(0.0, 0.0, 50.0));
        assert!((track.loop_length() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_round_trip() {
        let track = Track::bundled().unwrap();
        let json = track.to_json().unwrap();
        assert_eq!(Track::from_json(&json).unwrap(), track);
    }

    #[test]
    fn test_degenerate_start_forward() {
        let mut track = straight_track();
        track.start.forward = DVec3::ZERO;
        assert_eq!(track.start_yaw(), 0.0);
    }
}
