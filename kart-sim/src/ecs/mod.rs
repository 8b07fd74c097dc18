//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational ECS architecture including:
//! - Entity management with never-reused ids and tags
//! - One typed, insertion-ordered storage per component kind
//! - View queries by component-kind intersection
//! - Staged, strictly sequential system execution

mod component;
pub mod components;
mod entity;
pub mod scheduler;
mod system;
mod world;

pub use component::{Component, ComponentKind, DenseStorage};
pub use entity::Entity;
pub use scheduler::{Scheduler, StageId};
pub use system::{StepContext, System};
pub use world::{ComponentStores, World};
