//! # Scene
//!
//! The top-level owner of the ECS state: one entity repository and one
//! component registry. Systems never reach for a global - the scene is
//! constructed explicitly and lent out through
//! [`SystemContext`](crate::SystemContext) each frame.

use serde_json::Value;

use crate::config::EngineConfig;
use crate::ecs::{ComponentRegistry, EntityId, EntityRepository};
use crate::error::CoreResult;

/// A running world: entities plus their components.
///
/// # Example
///
/// ```rust,ignore
/// let mut scene = Scene::with_config(&EngineConfig::default());
/// let player = scene.spawn("player");
/// scene.components_mut().register_entity::<Transform>(player, 1);
/// ```
pub struct Scene {
    entities: EntityRepository,
    components: ComponentRegistry,
}

impl Scene {
    /// Creates a scene with default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Creates a scene sized from an [`EngineConfig`].
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            entities: EntityRepository::with_capacity(config.entity_capacity),
            components: ComponentRegistry::with_array_capacity(config.component_capacity),
        }
    }

    /// Spawns a new entity with the given data-type tag.
    pub fn spawn(&mut self, data_type: &str) -> EntityId {
        self.entities.create_entity(data_type, false)
    }

    /// Spawns (or fetches) the unique entity for a data-type tag.
    pub fn spawn_unique(&mut self, data_type: &str) -> EntityId {
        self.entities.create_entity(data_type, true)
    }

    /// Despawns an entity and finalizes every component it carried.
    ///
    /// Returns `false` for handles that were already gone.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.entities.remove_entity(entity) {
            return false;
        }
        self.components.delete_entity(entity);
        true
    }

    /// The entity repository.
    #[must_use]
    pub fn entities(&self) -> &EntityRepository {
        &self.entities
    }

    /// Mutable entity repository.
    pub fn entities_mut(&mut self) -> &mut EntityRepository {
        &mut self.entities
    }

    /// The component registry.
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Mutable component registry.
    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// Splits the scene into its two halves for a frame context.
    pub fn split_mut(&mut self) -> (&mut EntityRepository, &mut ComponentRegistry) {
        (&mut self.entities, &mut self.components)
    }

    /// Serializes one entity's components, keyed by component type name.
    #[must_use]
    pub fn save_entity(&self, entity: EntityId) -> Value {
        self.components.save_entity(entity)
    }

    /// Restores one entity's components from [`Self::save_entity`] output.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::CoreError`] for malformed or unknown component
    /// data.
    pub fn load_entity(&mut self, entity: EntityId, value: &Value) -> CoreResult<()> {
        self.components.load_entity(entity, value)
    }

    /// Removes every entity and component.
    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
