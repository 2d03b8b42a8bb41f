//! # Component Storage
//!
//! One [`ComponentArray`] per component type: a growable slab of per-entity
//! component lists with free-list slot reuse.
//!
//! The storage strategy:
//! - Each registered entity owns exactly one slot, found through an
//!   entity -> index table in O(1)
//! - A slot holds an ordered list of components (an entity may carry several
//!   components of the same type, e.g. multiple colliders)
//! - Freed slots go back on a free list; registration pops the free list or
//!   doubles capacity when it is empty
//! - Slot indices are stable: growth appends, it never remaps live entities

use std::any::Any;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};

use super::component::Component;
use super::entity::EntityId;

/// Default slot capacity for a freshly constructed array.
pub const DEFAULT_CAPACITY: usize = 100;

/// Type-erased face of a [`ComponentArray`].
///
/// The registry stores one boxed `ComponentArrayOps` per component type and
/// recovers the typed array through the `Any` upcasts.
pub trait ComponentArrayOps: Any {
    /// Resets storage to `capacity` empty slots, dropping all existing data.
    ///
    /// The caller must not invoke this on a live registry - existing
    /// components are dropped without running their `finalize` hook.
    fn initialize(&mut self, capacity: usize);

    /// Finalizes every component and resets all bookkeeping.
    fn clear(&mut self);

    /// Finalizes and clears an entity's slot, returning it to the free list.
    fn delete_entity(&mut self, entity: EntityId);

    /// `true` when the entity has a slot in this array.
    fn has_entity(&self, entity: EntityId) -> bool;

    /// Serializes an entity's component list, or `None` if unregistered.
    fn save_entity(&self, entity: EntityId) -> Option<serde_json::Value>;

    /// Replaces an entity's component list from serialized data,
    /// registering the entity if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SceneData`] when the value does not decode as
    /// this component type.
    fn load_entity(&mut self, entity: EntityId, value: &serde_json::Value) -> CoreResult<()>;

    /// Stable component type name (scene file key).
    fn type_name(&self) -> &'static str;

    /// Upcast for typed recovery.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed recovery.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Free-list-backed storage for a single component type.
///
/// # Example
///
/// ```rust,ignore
/// let mut array: ComponentArray<Transform> = ComponentArray::new(100);
/// array.register_entity(player, 1);
/// let transform = array.component(player, 0).unwrap();
/// ```
pub struct ComponentArray<C: Component> {
    /// One component list per slot.
    slots: Vec<Vec<C>>,
    /// Entity -> slot index.
    entity_index: HashMap<EntityId, usize>,
    /// Indices of unused slots.
    free_indices: Vec<usize>,
}

impl<C: Component> ComponentArray<C> {
    /// Creates storage with the given slot capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut array = Self {
            slots: Vec::new(),
            entity_index: HashMap::new(),
            free_indices: Vec::new(),
        };
        ComponentArrayOps::initialize(&mut array, capacity);
        array
    }

    /// Returns the current slot capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of registered entities.
    #[inline]
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.entity_index.len()
    }

    /// Allocates a slot for `entity` and constructs `count` default
    /// components in it, running each component's `initialize` hook.
    ///
    /// Re-registering an entity already present is rejected: the first
    /// registration wins and a warning is logged.
    pub fn register_entity(&mut self, entity: EntityId, count: usize) {
        if self.entity_index.contains_key(&entity) {
            tracing::warn!(
                component = C::type_name(),
                "{entity} is already registered, ignoring re-registration"
            );
            return;
        }

        let index = self.allocate_slot(entity);
        let slot = &mut self.slots[index];
        slot.reserve(count);
        for _ in 0..count {
            let mut component = C::default();
            component.initialize(entity);
            slot.push(component);
        }
    }

    /// Appends one component to the entity's slot, registering the entity
    /// first when absent. Returns the component's index within the slot.
    pub fn add_component(&mut self, entity: EntityId, mut component: C) -> usize {
        let index = match self.entity_index.get(&entity) {
            Some(&index) => index,
            None => self.allocate_slot(entity),
        };

        component.initialize(entity);
        let slot = &mut self.slots[index];
        slot.push(component);
        slot.len() - 1
    }

    /// Gets one component of the entity. `None` when the entity is
    /// unregistered or the index is out of range - never panics.
    #[must_use]
    pub fn component(&self, entity: EntityId, index: usize) -> Option<&C> {
        let slot = *self.entity_index.get(&entity)?;
        self.slots[slot].get(index)
    }

    /// Mutable variant of [`Self::component`].
    pub fn component_mut(&mut self, entity: EntityId, index: usize) -> Option<&mut C> {
        let slot = *self.entity_index.get(&entity)?;
        self.slots[slot].get_mut(index)
    }

    /// Gets the entity's full component list. `None` when unregistered.
    #[must_use]
    pub fn components(&self, entity: EntityId) -> Option<&[C]> {
        let slot = *self.entity_index.get(&entity)?;
        Some(&self.slots[slot])
    }

    /// Mutable variant of [`Self::components`].
    pub fn components_mut(&mut self, entity: EntityId) -> Option<&mut [C]> {
        let slot = *self.entity_index.get(&entity)?;
        Some(&mut self.slots[slot])
    }

    /// Number of components in the entity's slot (0 when unregistered).
    #[must_use]
    pub fn component_count(&self, entity: EntityId) -> usize {
        self.components(entity).map_or(0, <[C]>::len)
    }

    /// Finalizes and removes one component from the entity's slot.
    pub fn remove_component(&mut self, entity: EntityId, index: usize) {
        let Some(&slot) = self.entity_index.get(&entity) else {
            return;
        };
        let list = &mut self.slots[slot];
        if index >= list.len() {
            return;
        }
        list[index].finalize();
        list.remove(index);
    }

    /// The slot index an entity occupies, if registered.
    ///
    /// Slot reuse after delete/register churn is part of the storage
    /// contract, so the index is observable.
    #[must_use]
    pub fn entity_slot(&self, entity: EntityId) -> Option<usize> {
        self.entity_index.get(&entity).copied()
    }

    /// Pops a free slot or grows the slab, then binds the entity to it.
    fn allocate_slot(&mut self, entity: EntityId) -> usize {
        let index = match self.free_indices.pop() {
            Some(index) => index,
            None => {
                self.grow();
                self.free_indices
                    .pop()
                    .unwrap_or_else(|| unreachable!("grow always refills the free list"))
            }
        };
        self.entity_index.insert(entity, index);
        index
    }

    /// Doubles capacity, appending the new indices to the free list.
    ///
    /// Existing slots keep their indices; only the slab tail moves.
    fn grow(&mut self) {
        let old = self.slots.len();
        let new = (old.max(1)) * 2;
        self.slots.resize_with(new, Vec::new);
        self.free_indices.extend((old..new).rev());
    }
}

impl<C: Component> Default for ComponentArray<C> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<C: Component> ComponentArrayOps for ComponentArray<C> {
    fn initialize(&mut self, capacity: usize) {
        self.slots.clear();
        self.entity_index.clear();
        self.slots.resize_with(capacity, Vec::new);
        self.free_indices = (0..capacity).rev().collect();
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            for component in slot.iter_mut() {
                component.finalize();
            }
            slot.clear();
        }
        let capacity = self.slots.len();
        self.entity_index.clear();
        self.free_indices = (0..capacity).rev().collect();
    }

    fn delete_entity(&mut self, entity: EntityId) {
        let Some(index) = self.entity_index.remove(&entity) else {
            return;
        };
        for component in self.slots[index].iter_mut() {
            component.finalize();
        }
        self.slots[index].clear();
        self.free_indices.push(index);
    }

    fn has_entity(&self, entity: EntityId) -> bool {
        self.entity_index.contains_key(&entity)
    }

    fn save_entity(&self, entity: EntityId) -> Option<serde_json::Value> {
        let slot = *self.entity_index.get(&entity)?;
        match serde_json::to_value(&self.slots[slot]) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(
                    component = C::type_name(),
                    "failed to serialize {entity}: {err}"
                );
                None
            }
        }
    }

    fn load_entity(&mut self, entity: EntityId, value: &serde_json::Value) -> CoreResult<()> {
        let loaded: Vec<C> =
            serde_json::from_value(value.clone()).map_err(|source| CoreError::SceneData {
                component: C::type_name(),
                source,
            })?;

        let index = match self.entity_index.get(&entity) {
            Some(&index) => index,
            None => self.allocate_slot(entity),
        };

        let slot = &mut self.slots[index];
        for component in slot.iter_mut() {
            component.finalize();
        }
        slot.clear();
        for mut component in loaded {
            component.initialize(entity);
            slot.push(component);
        }

        Ok(())
    }

    fn type_name(&self) -> &'static str {
        C::type_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
