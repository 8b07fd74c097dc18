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
//! Vehicle blueprints
//!
//! A blueprint is the build phase's output: an ordered list of placed parts
//! plus chassis tuning. It is stored as camelCase JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing a blueprint
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// Malformed JSON, wrong shape, or an invalid rotation value
    #[error("invalid blueprint JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rotation angle that is not a quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rotation must be 0, 90, 180 or 270 degrees, got {0}")]
pub struct InvalidRotation(pub u16);

/// Quarter-turn rotation about one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// 0°
    #[default]
    Deg0,
    /// 90°
    Deg90,
    /// 180°
    Deg180,
    /// 270°
    Deg270,
}

impl Rotation {
    /// Angle in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(InvalidRotation(other)),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// One placed part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintPart {
    /// Catalog name
    pub part_name: String,
    /// Grid cell
    pub position: [i32; 3],
    /// Per-axis rotation
    pub rotation: [Rotation; 3],
    /// Mirrored across the x axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrored: Option<bool>,
}

impl BlueprintPart {
    /// Unrotated, unmirrored placement
    pub fn new(part_name: impl Into<String>, position: [i32; 3]) -> Self {
        BlueprintPart {
            part_name: part_name.into(),
            position,
            rotation: [Rotation::Deg0; 3],
            mirrored: None,
        }
    }
}

/// Ballast placement in the tuning sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallastEntry {
    /// Grid cell
    pub position: [i32; 3],
    /// Number of blocks
    pub qty: u32,
}

/// Differential setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Differential {
    /// Wheels turn independently
    Open,
    /// Wheels are locked together
    #[default]
    Locked,
}

/// Chassis tuning sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tuning {
    /// Axle spacing
    pub wheelbase: f64,
    /// Wheel spacing
    pub track: f64,
    /// Front toe angle
    pub toe_front: f64,
    /// Rear toe angle
    pub toe_rear: f64,
    /// Ballast placements
    #[serde(default)]
    pub ballast: Vec<BallastEntry>,
    /// Differential
    pub diff: Differential,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            wheelbase: 8.0,
            track: 12.0,
            toe_front: -0.5,
            toe_rear: 0.0,
            ballast: Vec::new(),
            diff: Differential::Locked,
        }
    }
}

/// A complete vehicle description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Blueprint {
    /// Placed parts, in build order
    pub parts: Vec<BlueprintPart>,
    /// Tuning sheet
    #[serde(default)]
    pub tuning: Tuning,
}

impl Blueprint {
    /// Blueprint with the given parts and default tuning
    pub fn from_parts(parts: Vec<BlueprintPart>) -> Self {
        Blueprint {
            parts,
            tuning: Tuning::default(),
        }
    }

    /// Serialize to compact JSON
    pub fn serialize(&self) -> Result<String, BlueprintError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn serialize_pretty(&self) -> Result<String, BlueprintError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn deserialize(json: &str) -> Result<Self, BlueprintError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Ready-made blueprints
pub mod presets {
    use super::{Blueprint, BlueprintError};

    /// Raw JSON of the Wedge-Glide v1 preset
    pub const WEDGE_GLIDE_V1_JSON: &str = include_str!("../assets/wedge_glide_v1.blueprint.json");

    /// The Wedge-Glide v1 preset: a low wedge on four medium wheels
    pub fn wedge_glide_v1() -> Result<Blueprint, BlueprintError> {
        Blueprint::deserialize(WEDGE_GLIDE_V1_JSON)
    }

    /// Every preset, with its display name
    pub fn all() -> Result<Vec<(&'static str, Blueprint)>, BlueprintError> {
        Ok(vec![("Wedge-Glide v1", wedge_glide_v1()?)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip() {
        let preset = presets::wedge_glide_v1().unwrap();
        assert_eq!(preset.parts.len(), 46);
        assert_eq!(preset.tuning.diff, Differential::Locked);
        assert_eq!(preset.tuning.ballast.len(), 2);

        let json = preset.serialize().unwrap();
        let restored = Blueprint::deserialize(&json).unwrap();
        assert_eq!(restored.parts.len(), preset.parts.len());
        assert_eq!(restored.tuning, preset.tuning);
        assert_eq!(restored, preset);
    }

    #[test]
    fn test_rotation_validation() {
        let json = r#"{"parts":[{"partName":"Base Cube 1x1x1","position":[0,0,0],"rotation":[0,45,0]}],
                      "tuning":{"wheelbase":8,"track":12,"toeFront":0,"toeRear":0,"ballast":[],"diff":"open"}}"#;
        let err = Blueprint::deserialize(json).unwrap_err();
        assert!(err.to_string().contains("45"));

        assert_eq!(Rotation::try_from(270u16), Ok(Rotation::Deg270));
        assert_eq!(Rotation::try_from(1u16), Err(InvalidRotation(1)));
        assert_eq!(u16::from(Rotation::Deg90), 90);
    }

    #[test]
    fn test_mirrored_is_optional() {
        let part = BlueprintPart::new("Winglet 1x2", [1, 2, 3]);
        let json = serde_json::to_string(&part).unwrap();
        assert!(!json.contains("mirrored"));
        assert!(json.contains("\"partName\""));

        let mut mirrored = part.clone();
        mirrored.mirrored = Some(true);
        let restored: BlueprintPart =
            serde_json::from_str(&serde_json::to_string(&mirrored).unwrap()).unwrap();
        assert_eq!(restored.mirrored, Some(true));
    }

    #[test]
    fn test_malformed_blueprint() {
        assert!(Blueprint::deserialize("[1, 2").is_err());
        assert!(Blueprint::deserialize(r#"{"parts": 3}"#).is_err());
        assert!(Blueprint::deserialize(r#"{"parts": [], "tuning": {"diff": "welded"}}"#).is_err());
    }

    #[test]
    fn test_missing_tuning_defaults() {
        let bp = Blueprint::deserialize(r#"{"parts": []}"#).unwrap();
        assert!(bp.parts.is_empty());
        assert_eq!(bp.tuning, Tuning::default());
    }
}
