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
//! Seeded xorshift32 random stream
//!
//! One instance is owned by the race and lent to the AI and power-up
//! systems each step, so a given seed replays the same race.

use rand::rand_core::impls;
use rand::{RngCore, SeedableRng};

/// Replacement state for a zero seed, which would otherwise stay zero forever
pub const ZERO_SEED_REPLACEMENT: u32 = 0x1234_5678;

/// Deterministic 32-bit xorshift generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Random {
    state: u32,
}

impl Random {
    /// Create a generator from `seed`
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed };
        Random { state }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`
    pub fn next(&mut self) -> f64 {
        f64::from(self.advance()) / 4_294_967_296.0
    }

    /// Uniform value in `[min, max)`
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next()
    }

    /// Uniform integer in `[0, max_exclusive)`; zero when `max_exclusive` is zero
    pub fn next_int(&mut self, max_exclusive: u32) -> u32 {
        (self.next() * f64::from(max_exclusive)).floor() as u32
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        items.get(self.next_int(len) as usize)
    }
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for Random {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Random::new(u32::from_le_bytes(seed))
    }
}
