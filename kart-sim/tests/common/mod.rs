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
//! Shared fixtures for integration tests

#![allow(dead_code)]

use glam::DVec3;
use kart_sim::blueprint::BlueprintPart;
use kart_sim::track::{Checkpoint, StartPose};
use kart_sim::{Blueprint, PartCatalog, Race, RaceConfig, Track};

/// Out-and-back course along one line
///
/// Every node lies on the grid's centre line, so an AI car passes both
/// checkpoints whichever node it starts out targeting.
pub fn loop_track() -> Track {
    Track {
        name: "Test Loop".to_string(),
        version: 1,
        units: "meters".to_string(),
        seed: 7,
        laps: 1,
        start: StartPose {
            position: DVec3::new(10.5, 0.2, -50.0),
            forward: DVec3::new(0.0, 0.0, 1.0),
        },
        nodes: vec![
            DVec3::new(7.5, 0.0, 0.0),
            DVec3::new(7.5, 0.0, 45.0),
            DVec3::new(7.5, 0.0, 52.0),
            DVec3::new(7.5, 0.0, -20.0),
        ],
        checkpoints: vec![
            Checkpoint { index: 0, width: 12.0 },
            Checkpoint { index: 1, width: 12.0 },
        ],
        finish_line: None,
        ramps: Vec::new(),
        rumble_strips: Vec::new(),
        hazards: Vec::new(),
        item_pads: Vec::new(),
    }
}

/// Four small wheels on a single chassis block
pub fn light_blueprint() -> Blueprint {
    Blueprint::from_parts(vec![
        BlueprintPart::new("Small Wheel 1.5x", [-2, 0, 2]),
        BlueprintPart::new("Small Wheel 1.5x", [2, 0, 2]),
        BlueprintPart::new("Small Wheel 1.5x", [-2, 0, -2]),
        BlueprintPart::new("Small Wheel 1.5x", [2, 0, -2]),
        BlueprintPart::new("Base Cube 1x1x1", [0, 1, 0]),
    ])
}

pub fn catalog() -> PartCatalog {
    PartCatalog::bundled().expect("bundled catalog parses")
}

/// Light car on the test loop with the default roster
pub fn loop_race(config: RaceConfig) -> Race {
    Race::new(config, &catalog(), loop_track(), &light_blueprint()).expect("race sets up")
}
