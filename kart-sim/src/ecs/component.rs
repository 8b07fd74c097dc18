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
//! Component storage and management
//!
//! Components are plain data records attached to entities. Every component
//! type has exactly one [`DenseStorage`] inside the world's
//! [`ComponentStores`], and a [`ComponentKind`] tag that names it in
//! view queries.

use crate::ecs::{ComponentStores, Entity};
use std::collections::HashMap;
use std::fmt;

/// Names one component storage in a view query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// [`crate::ecs::components::Transform`]
    Transform,
    /// [`crate::ecs::components::RigidBody`]
    RigidBody,
    /// [`crate::ecs::components::Wheels`]
    Wheels,
    /// [`crate::ecs::components::AeroSurface`]
    Aero,
    /// [`crate::ecs::components::Armor`]
    Armor,
    /// [`crate::ecs::components::Ballast`]
    Ballast,
    /// [`crate::ecs::components::PowerUp`]
    PowerUp,
    /// [`crate::ecs::components::PlayerInput`]
    PlayerInput,
    /// [`crate::ecs::components::AiController`]
    Ai,
    /// [`crate::ecs::components::LapCounter`]
    Lap,
}

impl ComponentKind {
    /// Every kind, in declaration order
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Transform,
        ComponentKind::RigidBody,
        ComponentKind::Wheels,
        ComponentKind::Aero,
        ComponentKind::Armor,
        ComponentKind::Ballast,
        ComponentKind::PowerUp,
        ComponentKind::PlayerInput,
        ComponentKind::Ai,
        ComponentKind::Lap,
    ];

    /// Stable key used in logs and debug output
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Transform => "transform",
            ComponentKind::RigidBody => "rigidBody",
            ComponentKind::Wheels => "wheel",
            ComponentKind::Aero => "aero",
            ComponentKind::Armor => "armor",
            ComponentKind::Ballast => "ballast",
            ComponentKind::PowerUp => "powerUp",
            ComponentKind::PlayerInput => "playerInput",
            ComponentKind::Ai => "ai",
            ComponentKind::Lap => "lap",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait that all components implement
///
/// Ties a component type to its kind tag and to its slot in
/// [`ComponentStores`], which is what lets the world offer typed
/// `add_component::<T>` / `get_component::<T>` without dynamic typing.
pub trait Component: Sized + 'static {
    /// Kind tag used by view queries
    const KIND: ComponentKind;

    /// Borrow this component's storage
    fn storage(stores: &ComponentStores) -> &DenseStorage<Self>;

    /// Mutably borrow this component's storage
    fn storage_mut(stores: &mut ComponentStores) -> &mut DenseStorage<Self>;
}

/// Dense, insertion-ordered component storage
///
/// Components live contiguously in a `Vec` with a sparse entity → index map
/// on the side. Unlike a swap-remove layout, removal shifts later entries
/// down so iteration order always matches insertion order; overwriting an
/// existing component keeps its slot.
#[derive(Debug, Clone)]
pub struct DenseStorage<T> {
    /// Mapping from Entity to dense array index
    entity_to_index: HashMap<Entity, usize>,
    /// Mapping from dense array index back to Entity
    index_to_entity: Vec<Entity>,
    components: Vec<T>,
}

impl<T> DenseStorage<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new storage with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        DenseStorage {
            entity_to_index: HashMap::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            components: Vec::with_capacity(capacity),
        }
    }

    /// Insert a component, overwriting in place if the entity already has one
    pub fn insert(&mut self, entity: Entity, component: T) {
        if let Some(&index) = self.entity_to_index.get(&entity) {
            self.components[index] = component;
        } else {
            let new_index = self.components.len();
            self.components.push(component);
            self.entity_to_index.insert(entity, new_index);
            self.index_to_entity.push(entity);

            debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
            debug_assert_eq!(self.entity_to_index.len(), self.components.len());
        }
    }

    /// Remove the component for the given entity
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.entity_to_index.remove(&entity)?;
        let component = self.components.remove(index);
        self.index_to_entity.remove(index);
        for shifted in &self.index_to_entity[index..] {
            if let Some(slot) = self.entity_to_index.get_mut(shifted) {
                *slot -= 1;
            }
        }

        debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
        debug_assert_eq!(self.entity_to_index.len(), self.components.len());

        Some(component)
    }

    /// Get a reference to the component for the given entity
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&self.components[*index])
    }

    /// Get a mutable reference to the component for the given entity
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&mut self.components[*index])
    }

    /// Check if an entity has this component
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Clear all components
    pub fn clear(&mut self) {
        self.entity_to_index.clear();
        self.index_to_entity.clear();
        self.components.clear();
    }

    /// Get the number of components stored
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Entities holding this component, in insertion order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.index_to_entity.iter().copied()
    }

    /// Entity/component pairs, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.index_to_entity.iter().copied().zip(self.components.iter())
    }
}

impl<T> Default for DenseStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
