//! World management
//!
//! The World is the central container for all ECS data: entity lifetimes,
//! tags, one typed storage per component kind, and view queries over them.

use crate::ecs::component::{Component, ComponentKind, DenseStorage};
use crate::ecs::components::{
    AeroSurface, AiController, Armor, Ballast, LapCounter, PlayerInput, PowerUp, RigidBody,
    Transform, Wheels,
};
use crate::ecs::Entity;
use std::collections::{HashMap, HashSet};

macro_rules! component_stores {
    ($($field:ident: $ty:ty => $kind:ident),* $(,)?) => {
        /// One typed storage per component kind
        ///
        /// Fields are public so a system can borrow several storages mutably
        /// at once (disjoint field borrows) while it walks a view.
        #[derive(Debug, Default)]
        pub struct ComponentStores {
            $(
                #[doc = concat!("Storage for [`", stringify!($ty), "`]")]
                pub $field: DenseStorage<$ty>,
            )*
        }

        impl ComponentStores {
            /// Whether `entity` holds a component of `kind`
            pub fn contains(&self, kind: ComponentKind, entity: Entity) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.contains(entity),)*
                }
            }

            /// Entities holding `kind`, in insertion order
            pub fn entities(&self, kind: ComponentKind) -> Box<dyn Iterator<Item = Entity> + '_> {
                match kind {
                    $(ComponentKind::$kind => Box::new(self.$field.entities()),)*
                }
            }

            /// Number of components of `kind`
            pub fn len(&self, kind: ComponentKind) -> usize {
                match kind {
                    $(ComponentKind::$kind => self.$field.len(),)*
                }
            }

            /// Remove a component of `kind`; true if one was present
            pub fn remove(&mut self, kind: ComponentKind, entity: Entity) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.remove(entity).is_some(),)*
                }
            }

            /// Remove every component `entity` holds
            pub fn remove_all(&mut self, entity: Entity) {
                $(self.$field.remove(entity);)*
            }

            /// Drop every component of every kind
            pub fn clear(&mut self) {
                $(self.$field.clear();)*
            }
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn storage(stores: &ComponentStores) -> &DenseStorage<Self> {
                    &stores.$field
                }

                fn storage_mut(stores: &mut ComponentStores) -> &mut DenseStorage<Self> {
                    &mut stores.$field
                }
            }
        )*
    };
}

component_stores! {
    transforms: Transform => Transform,
    rigid_bodies: RigidBody => RigidBody,
    wheels: Wheels => Wheels,
    aero: AeroSurface => Aero,
    armor: Armor => Armor,
    ballast: Ballast => Ballast,
    power_ups: PowerUp => PowerUp,
    inputs: PlayerInput => PlayerInput,
    ai: AiController => Ai,
    laps: LapCounter => Lap,
}

/// The ECS world: entity ids, tags and component storages
#[derive(Debug)]
pub struct World {
    next_entity_id: u64,
    alive_entities: HashSet<Entity>,
    tags: HashMap<Entity, HashSet<String>>,
    /// Component storages, borrowed field by field inside systems
    pub components: ComponentStores,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            next_entity_id: 1,
            alive_entities: HashSet::new(),
            tags: HashMap::new(),
            components: ComponentStores::default(),
        }
    }

    /// Create a new entity
    ///
    /// Ids increase monotonically and are never handed out twice, even after
    /// [`World::clear`].
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.alive_entities.insert(entity);
        entity
    }

    /// Create a new entity carrying the given tags
    pub fn create_entity_with_tags(&mut self, tags: &[&str]) -> Entity {
        let entity = self.create_entity();
        for label in tags {
            self.tag(entity, label);
        }
        entity
    }

    /// Destroy an entity, dropping its components and tags
    ///
    /// Returns false if the entity was already gone.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.components.remove_all(entity);
        self.tags.remove(&entity);
        self.alive_entities.remove(&entity)
    }

    /// Check if an entity is alive
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        self.alive_entities.contains(&entity)
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.alive_entities.len()
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        self.alive_entities.clear();
        self.tags.clear();
        self.components.clear();
    }

    /// Attach a component, overwriting any existing one of the same type
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) {
        T::storage_mut(&mut self.components).insert(entity, component);
    }

    /// Borrow a component
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        T::storage(&self.components).get(entity)
    }

    /// Mutably borrow a component
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        T::storage_mut(&mut self.components).get_mut(entity)
    }

    /// Detach and return a component
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        T::storage_mut(&mut self.components).remove(entity)
    }

    /// Check whether an entity has a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        T::storage(&self.components).contains(entity)
    }

    /// Check whether an entity has a component of the given kind
    pub fn has_kind(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.components.contains(kind, entity)
    }

    /// Add a tag to an entity
    pub fn tag(&mut self, entity: Entity, label: &str) {
        self.tags.entry(entity).or_default().insert(label.to_owned());
    }

    /// Check whether an entity carries a tag
    pub fn has_tag(&self, entity: Entity, label: &str) -> bool {
        self.tags.get(&entity).is_some_and(|set| set.contains(label))
    }

    /// Entities holding every listed component kind
    ///
    /// Walks the first kind's storage in insertion order and keeps the
    /// entities present in all the others. An empty kind list yields
    /// nothing. The iterator borrows the world, so systems collect it before
    /// mutating components.
    pub fn view<'a>(&'a self, kinds: &'a [ComponentKind]) -> impl Iterator<Item = Entity> + 'a {
        let (first, rest) = match kinds.split_first() {
            Some((first, rest)) => (Some(*first), rest),
            None => (None, kinds),
        };
        first
            .into_iter()
            .flat_map(move |kind| self.components.entities(kind))
            .filter(move |&entity| rest.iter().all(|&kind| self.components.contains(kind, entity)))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_world_entity_lifecycle() {
        let mut world = World::new();

        let e1 = world.create_entity();
        let e2 = world.create_entity();

        assert_eq!(world.entity_count(), 2);
        assert!(world.is_entity_alive(e1));
        assert!(world.is_entity_alive(e2));

        assert!(world.destroy_entity(e1));
        assert!(!world.destroy_entity(e1));
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_entity_alive(e1));
        assert!(world.is_entity_alive(e2));
    }

    #[test]
    fn test_ids_never_reused() {
        let mut world = World::new();
        let e1 = world.create_entity();
        world.destroy_entity(e1);
        world.clear();
        let e2 = world.create_entity();
        assert_eq!(e1.raw(), 1);
        assert!(e2.raw() > e1.raw());
    }

    #[test]
    fn test_components_and_tags() {
        let mut world = World::new();
        let car = world.create_entity_with_tags(&["car", "player"]);

        world.add_component(car, Transform::new(DVec3::new(1.0, 0.0, 2.0), 0.5));
        world.add_component(car, Armor::default());
        assert!(world.has_component::<Transform>(car));
        assert!(world.has_kind(car, ComponentKind::Armor));
        assert!(!world.has_component::<AiController>(car));
        assert!(world.has_tag(car, "player"));
        assert!(!world.has_tag(car, "ai"));

        world.get_component_mut::<Transform>(car).unwrap().position.x = 5.0;
        assert_eq!(world.get_component::<Transform>(car).unwrap().position.x, 5.0);

        let removed = world.remove_component::<Armor>(car);
        assert!(removed.is_some());
        assert!(!world.has_component::<Armor>(car));

        world.destroy_entity(car);
        assert!(!world.has_component::<Transform>(car));
        assert!(!world.has_tag(car, "car"));
    }

    #[test]
    fn test_view_intersection() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();

        world.add_component(c, Transform::default());
        world.add_component(a, Transform::default());
        world.add_component(b, Transform::default());
        world.add_component(a, Armor::default());
        world.add_component(c, Armor::default());

        let both: Vec<Entity> = world
            .view(&[ComponentKind::Transform, ComponentKind::Armor])
            .collect();
        // First kind's insertion order
        assert_eq!(both, vec![c, a]);

        let flipped: Vec<Entity> = world
            .view(&[ComponentKind::Armor, ComponentKind::Transform])
            .collect();
        assert_eq!(flipped, vec![a, c]);
    }

    #[test]
    fn test_view_empty_cases() {
        let mut world = World::new();
        let a = world.create_entity();
        world.add_component(a, Transform::default());

        assert_eq!(world.view(&[]).count(), 0);
        assert_eq!(world.view(&[ComponentKind::Ai]).count(), 0);
        assert_eq!(
            world.view(&[ComponentKind::Transform, ComponentKind::Lap]).count(),
            0
        );
    }

    #[test]
    fn test_world_clear() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Armor::default());
        world.create_entity();

        assert_eq!(world.entity_count(), 2);
        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.components.len(ComponentKind::Armor), 0);
    }
}
