//! # Entity Management
//!
//! Entities are lightweight handles: an id, a data-type tag, and liveness
//! flags. They own no component data - all state lives in the component
//! arrays, keyed by the handle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for an entity.
///
/// Ids increase monotonically over the life of a repository and are never
/// reused, so a stale handle can never alias a newer entity. `-1` denotes
/// the invalid handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityId(i32);

impl EntityId {
    /// Invalid entity id.
    pub const INVALID: Self = Self(-1);

    /// Creates an entity id from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Checks if this id is the invalid sentinel.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// An entity row: pure handle data, no components.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Entity {
    /// The unique identifier for this entity.
    pub id: EntityId,
    /// Free-form type tag ("player", "enemy_bullet", ...). Used for unique
    /// entity lookup and scene files, never interpreted by the core.
    pub data_type: String,
    /// Whether this entity slot is currently alive.
    pub is_alive: bool,
    /// Whether this entity is registered as the singleton for its tag.
    pub is_unique: bool,
}

impl Entity {
    /// Creates a live entity.
    #[must_use]
    pub fn new(id: EntityId, data_type: &str, is_unique: bool) -> Self {
        Self {
            id,
            data_type: data_type.to_owned(),
            is_alive: true,
            is_unique,
        }
    }

    /// Creates a dead/empty entity slot.
    #[must_use]
    pub fn dead() -> Self {
        Self::default()
    }
}

/// Allocates and tracks entity handles.
///
/// Slots are pre-allocated and recycled through a free list (the handle ids
/// themselves are monotonic and never recycled). Unique entities are
/// singletons per data-type tag, looked up by name.
pub struct EntityRepository {
    /// All entity slots.
    slots: Vec<Entity>,
    /// Free list of slot indices for reuse.
    free_indices: Vec<usize>,
    /// Live id -> slot index.
    id_to_slot: HashMap<EntityId, usize>,
    /// Data-type tag -> unique entity id.
    unique_entities: HashMap<String, EntityId>,
    /// Next id to hand out.
    next_id: i32,
}

impl EntityRepository {
    /// Creates a repository with the given slot capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let slots = (0..capacity).map(|_| Entity::dead()).collect::<Vec<_>>();
        let free_indices: Vec<usize> = (0..capacity).rev().collect();

        Self {
            slots,
            free_indices,
            id_to_slot: HashMap::new(),
            unique_entities: HashMap::new(),
            next_id: 0,
        }
    }

    /// Returns the slot capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.id_to_slot.len()
    }

    /// Creates a new entity, returning its handle.
    ///
    /// A `unique` entity is the singleton for its `data_type`: if one
    /// already exists its handle is returned instead of creating a second.
    /// Returns [`EntityId::INVALID`] when every slot is occupied.
    pub fn create_entity(&mut self, data_type: &str, unique: bool) -> EntityId {
        if unique {
            if let Some(&existing) = self.unique_entities.get(data_type) {
                return existing;
            }
        }

        let Some(index) = self.free_indices.pop() else {
            tracing::warn!(
                capacity = self.slots.len(),
                "entity repository exhausted, cannot create '{data_type}'"
            );
            return EntityId::INVALID;
        };

        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        self.slots[index] = Entity::new(id, data_type, unique);
        self.id_to_slot.insert(id, index);
        if unique {
            self.unique_entities.insert(data_type.to_owned(), id);
        }

        id
    }

    /// Removes an entity, freeing its slot for reuse.
    ///
    /// Returns `false` if the handle was invalid or already removed.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(index) = self.id_to_slot.remove(&id) else {
            return false;
        };

        let entity = std::mem::replace(&mut self.slots[index], Entity::dead());
        if entity.is_unique {
            self.unique_entities.remove(&entity.data_type);
        }
        self.free_indices.push(index);

        true
    }

    /// Gets an entity by handle. `None` for invalid/stale/dead handles.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let index = *self.id_to_slot.get(&id)?;
        let entity = &self.slots[index];
        entity.is_alive.then_some(entity)
    }

    /// Gets a mutable entity by handle.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = *self.id_to_slot.get(&id)?;
        let entity = &mut self.slots[index];
        entity.is_alive.then_some(entity)
    }

    /// Checks if a handle refers to a live entity.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up the unique entity registered for a data-type tag.
    #[must_use]
    pub fn unique_entity(&self, data_type: &str) -> Option<EntityId> {
        self.unique_entities.get(data_type).copied()
    }

    /// Snapshot of every live entity handle.
    #[must_use]
    pub fn alive_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.id_to_slot.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Removes every entity and resets the free list.
    pub fn clear(&mut self) {
        let capacity = self.slots.len();
        for slot in &mut self.slots {
            *slot = Entity::dead();
        }
        self.free_indices = (0..capacity).rev().collect();
        self.id_to_slot.clear();
        self.unique_entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let mut repo = EntityRepository::with_capacity(8);

        let id = repo.create_entity("player", false);
        assert!(id.is_valid());
        assert!(repo.is_alive(id));
        assert_eq!(repo.get(id).unwrap().data_type, "player");
        assert_eq!(repo.entity_count(), 1);
    }

    #[test]
    fn test_remove_frees_slot_but_not_id() {
        let mut repo = EntityRepository::with_capacity(8);

        let a = repo.create_entity("a", false);
        assert!(repo.remove_entity(a));
        assert!(!repo.is_alive(a));
        assert!(repo.get(a).is_none());

        // The slot is recycled, the id is not.
        let b = repo.create_entity("b", false);
        assert_ne!(a, b);
        assert!(!repo.remove_entity(a), "double remove must fail");
    }

    #[test]
    fn test_unique_entity_is_singleton() {
        let mut repo = EntityRepository::with_capacity(8);

        let first = repo.create_entity("game_state", true);
        let second = repo.create_entity("game_state", true);
        assert_eq!(first, second);
        assert_eq!(repo.unique_entity("game_state"), Some(first));

        repo.remove_entity(first);
        assert_eq!(repo.unique_entity("game_state"), None);
    }

    #[test]
    fn test_exhaustion_returns_invalid() {
        let mut repo = EntityRepository::with_capacity(2);
        assert!(repo.create_entity("a", false).is_valid());
        assert!(repo.create_entity("b", false).is_valid());
        assert_eq!(repo.create_entity("c", false), EntityId::INVALID);
    }

    #[test]
    fn test_alive_ids_snapshot_sorted() {
        let mut repo = EntityRepository::with_capacity(8);
        let a = repo.create_entity("a", false);
        let b = repo.create_entity("b", false);
        let c = repo.create_entity("c", false);
        repo.remove_entity(b);

        assert_eq!(repo.alive_ids(), vec![a, c]);
    }
}
