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
//! Entity handles
//!
//! Entities are opaque identifiers that tie components together. The world
//! hands them out in increasing order starting at 1 and never reuses one,
//! so a stale handle can only ever miss, never alias a newer car.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Create an entity handle from a raw id
    pub fn new(id: u64) -> Self {
        Entity(id)
    }

    /// Get the raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_raw_roundtrip() {
        let entity = Entity::new(42);
        assert_eq!(entity.raw(), 42);
        assert_eq!(entity.to_string(), "Entity(42)");
    }

    #[test]
    fn test_entity_ordering() {
        assert!(Entity::new(1) < Entity::new(2));
        assert_eq!(Entity::new(7), Entity::new(7));
    }
}
