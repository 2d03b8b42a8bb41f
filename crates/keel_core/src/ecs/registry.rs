//! # Component Registry
//!
//! Owns one [`ComponentArray`] per component type and maps entity handles
//! into them. The registry is a plain value owned by the scene and handed to
//! systems through their context - there is no global instance.

use std::any::TypeId;
use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

use super::component::Component;
use super::entity::EntityId;
use super::storage::{ComponentArray, ComponentArrayOps, DEFAULT_CAPACITY};

/// Lookup-by-type over every component array.
///
/// Arrays are created lazily on first use (or eagerly via
/// [`Self::register_array`]), each with the registry's default slot
/// capacity.
pub struct ComponentRegistry {
    /// Component type -> type-erased array.
    arrays: HashMap<TypeId, Box<dyn ComponentArrayOps>>,
    /// Slot capacity for newly created arrays.
    array_capacity: usize,
}

impl ComponentRegistry {
    /// Creates an empty registry with the default array capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_array_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty registry; new arrays start with `capacity` slots.
    #[must_use]
    pub fn with_array_capacity(capacity: usize) -> Self {
        Self {
            arrays: HashMap::new(),
            array_capacity: capacity.max(1),
        }
    }

    /// Ensures an array exists for component type `C`. Idempotent.
    pub fn register_array<C: Component>(&mut self) {
        let capacity = self.array_capacity;
        self.arrays
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(ComponentArray::<C>::new(capacity)));
    }

    /// Returns the typed array for `C`, if any component of that type was
    /// ever registered.
    #[must_use]
    pub fn array<C: Component>(&self) -> Option<&ComponentArray<C>> {
        self.arrays
            .get(&TypeId::of::<C>())
            .and_then(|ops| ops.as_any().downcast_ref())
    }

    /// Mutable variant of [`Self::array`], creating the array on first use.
    pub fn array_mut<C: Component>(&mut self) -> &mut ComponentArray<C> {
        self.register_array::<C>();
        self.arrays
            .get_mut(&TypeId::of::<C>())
            .and_then(|ops| ops.as_any_mut().downcast_mut())
            .unwrap_or_else(|| unreachable!("array registered on the line above"))
    }

    /// Registers `entity` into the `C` array with `count` default components.
    pub fn register_entity<C: Component>(&mut self, entity: EntityId, count: usize) {
        self.array_mut::<C>().register_entity(entity, count);
    }

    /// Appends a component to `entity`, auto-registering it when absent.
    /// Returns the component's index within the entity's slot.
    pub fn add_component<C: Component>(&mut self, entity: EntityId, component: C) -> usize {
        self.array_mut::<C>().add_component(entity, component)
    }

    /// Gets the first `C` component of `entity`.
    #[must_use]
    pub fn component<C: Component>(&self, entity: EntityId) -> Option<&C> {
        self.component_at::<C>(entity, 0)
    }

    /// Gets the `C` component of `entity` at `index`.
    #[must_use]
    pub fn component_at<C: Component>(&self, entity: EntityId, index: usize) -> Option<&C> {
        self.array::<C>()?.component(entity, index)
    }

    /// Mutable variant of [`Self::component`].
    pub fn component_mut<C: Component>(&mut self, entity: EntityId) -> Option<&mut C> {
        self.component_at_mut::<C>(entity, 0)
    }

    /// Mutable variant of [`Self::component_at`].
    pub fn component_at_mut<C: Component>(
        &mut self,
        entity: EntityId,
        index: usize,
    ) -> Option<&mut C> {
        self.arrays
            .get_mut(&TypeId::of::<C>())
            .and_then(|ops| ops.as_any_mut().downcast_mut::<ComponentArray<C>>())
            .and_then(|array| array.component_mut(entity, index))
    }

    /// Gets the full `C` component list of `entity`.
    #[must_use]
    pub fn components<C: Component>(&self, entity: EntityId) -> Option<&[C]> {
        self.array::<C>()?.components(entity)
    }

    /// Mutable variant of [`Self::components`].
    pub fn components_mut<C: Component>(&mut self, entity: EntityId) -> Option<&mut [C]> {
        self.arrays
            .get_mut(&TypeId::of::<C>())
            .and_then(|ops| ops.as_any_mut().downcast_mut::<ComponentArray<C>>())
            .and_then(|array| array.components_mut(entity))
    }

    /// `true` when `entity` carries at least one `C` component slot.
    #[must_use]
    pub fn has_component<C: Component>(&self, entity: EntityId) -> bool {
        self.array::<C>().is_some_and(|array| array.has_entity(entity))
    }

    /// Removes the entity from every array, finalizing its components.
    pub fn delete_entity(&mut self, entity: EntityId) {
        for ops in self.arrays.values_mut() {
            ops.delete_entity(entity);
        }
    }

    /// Finalizes and clears every array.
    pub fn clear(&mut self) {
        for ops in self.arrays.values_mut() {
            ops.clear();
        }
    }

    /// Serializes every component the entity carries, keyed by type name.
    #[must_use]
    pub fn save_entity(&self, entity: EntityId) -> Value {
        let mut object = Map::new();
        for ops in self.arrays.values() {
            if let Some(components) = ops.save_entity(entity) {
                object.insert(ops.type_name().to_owned(), components);
            }
        }
        Value::Object(object)
    }

    /// Restores an entity's components from [`Self::save_entity`] output.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SceneData`] for malformed component data and
    /// [`CoreError::UnknownComponentType`] for a type name no registered
    /// array answers to.
    pub fn load_entity(&mut self, entity: EntityId, value: &Value) -> CoreResult<()> {
        let Some(object) = value.as_object() else {
            return Err(CoreError::SceneFormat);
        };

        for (type_name, components) in object {
            let array = self
                .arrays
                .values_mut()
                .find(|ops| ops.type_name() == type_name)
                .ok_or_else(|| CoreError::UnknownComponentType(type_name.clone()))?;
            array.load_entity(entity, components)?;
        }

        Ok(())
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Default, Serialize, Deserialize)]
    struct Health {
        current: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Default, Serialize, Deserialize)]
    struct Score {
        points: u32,
    }

    impl Component for Score {
        fn type_name() -> &'static str {
            "Score"
        }
    }

    fn e(raw: i32) -> EntityId {
        EntityId::new(raw)
    }

    #[test]
    fn test_lookup_by_type() {
        let mut registry = ComponentRegistry::new();

        registry.register_entity::<Health>(e(1), 1);
        registry.add_component(e(1), Score { points: 3 });

        assert!(registry.component::<Health>(e(1)).is_some());
        assert_eq!(registry.component::<Score>(e(1)).unwrap().points, 3);
        assert!(registry.component::<Score>(e(2)).is_none());
        // An array that was never touched yields no components.
        assert!(registry.array::<Health>().is_some());
    }

    #[test]
    fn test_delete_entity_spans_arrays() {
        let mut registry = ComponentRegistry::new();
        registry.register_entity::<Health>(e(1), 1);
        registry.register_entity::<Score>(e(1), 1);

        registry.delete_entity(e(1));
        assert!(registry.component::<Health>(e(1)).is_none());
        assert!(registry.component::<Score>(e(1)).is_none());
    }

    #[test]
    fn test_save_load_entity() {
        let mut registry = ComponentRegistry::new();
        registry.register_entity::<Health>(e(1), 1);
        registry.component_mut::<Health>(e(1)).unwrap().current = 50.0;
        registry.add_component(e(1), Score { points: 9 });

        let saved = registry.save_entity(e(1));

        let mut restored = ComponentRegistry::new();
        restored.register_array::<Health>();
        restored.register_array::<Score>();
        restored.load_entity(e(7), &saved).unwrap();

        assert!((restored.component::<Health>(e(7)).unwrap().current - 50.0).abs() < f32::EPSILON);
        assert_eq!(restored.component::<Score>(e(7)).unwrap().points, 9);
    }

    #[test]
    fn test_load_unknown_type_errors() {
        let mut registry = ComponentRegistry::new();
        let value = serde_json::json!({ "Mystery": [] });
        let err = registry.load_entity(e(1), &value).unwrap_err();
        assert!(matches!(err, CoreError::UnknownComponentType(name) if name == "Mystery"));
    }
}
