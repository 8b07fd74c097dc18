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
//! Replay recording
//!
//! The recorder samples one car per step into a bounded ring buffer. The
//! race uses it both for instant replay and to cut best-lap ghosts.

use crate::ecs::components::{LapCounter, RigidBody, Transform};
use crate::ecs::{Entity, World};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default ring-buffer capacity: 50 seconds at 120 Hz
pub const DEFAULT_REPLAY_CAPACITY: usize = 6000;

/// One recorded sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Race time of the sample
    pub time: f64,
    /// Car position
    pub position: DVec3,
    /// Car velocity
    pub velocity: DVec3,
    /// Car heading
    pub yaw: f64,
    /// Completed laps when the sample was taken
    pub lap: u32,
}

/// Ring-buffered recorder for a single entity
#[derive(Debug, Clone)]
pub struct Recorder {
    target: Entity,
    frames: VecDeque<ReplayFrame>,
    capacity: usize,
    recording: bool,
}

impl Recorder {
    /// Record `target` with the default capacity
    pub fn new(target: Entity) -> Self {
        Self::with_capacity(target, DEFAULT_REPLAY_CAPACITY)
    }

    /// Record `target`, keeping at most `capacity` frames (at least one)
    pub fn with_capacity(target: Entity, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Recorder {
            target,
            frames: VecDeque::with_capacity(capacity),
            capacity,
            recording: true,
        }
    }

    /// Entity being recorded
    pub fn target(&self) -> Entity {
        self.target
    }

    /// Maximum number of frames kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sample the target at race time `time`
    ///
    /// Does nothing while recording is off or when the target lacks a
    /// transform or rigid body. A missing lap counter records lap 0.
    pub fn capture(&mut self, time: f64, world: &World) {
        if !self.recording {
            return;
        }
        let (Some(transform), Some(body)) = (
            world.get_component::<Transform>(self.target),
            world.get_component::<RigidBody>(self.target),
        ) else {
            return;
        };
        let lap = world
            .get_component::<LapCounter>(self.target)
            .map_or(0, |lap| lap.lap);

        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(ReplayFrame {
            time,
            position: transform.position,
            velocity: body.velocity,
            yaw: transform.yaw(),
            lap,
        });
    }

    /// Turn sampling on or off; frames are kept either way
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    /// Whether `capture` currently samples
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Drop all frames and resume recording
    pub fn reset(&mut self) {
        self.frames.clear();
        self.recording = true;
    }

    /// Recorded frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &ReplayFrame> + '_ {
        self.frames.iter()
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Copies of the frames tagged with `lap`
    pub fn frames_for_lap(&self, lap: u32) -> Vec<ReplayFrame> {
        self.frames
            .iter()
            .filter(|frame| frame.lap == lap)
            .copied()
            .collect()
    }

    /// Copies of every frame, oldest first
    pub fn snapshot(&self) -> Vec<ReplayFrame> {
        self.frames.iter().copied().collect()
    }

    /// Frames as a JSON array
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.frames)
    }
}
