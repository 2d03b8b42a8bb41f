//! # Systems
//!
//! A system walks its subscribed entity set once per frame, in fixed
//! category order. The world reaches a system only through
//! [`SystemContext`] - an explicit borrow of the scene, never a global.
//!
//! ## Iteration stability
//!
//! The provided [`System::run`] snapshots the subscribed id list before
//! dispatching, so gameplay code may destroy entities mid-frame without
//! invalidating the iteration. A destroyed entity still finishes the
//! current frame and drops out of the roster at the top of the next.

use crate::scene::Scene;

use super::entity::{EntityId, EntityRepository};
use super::registry::ComponentRegistry;

/// Execution phases, in frame order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SystemCategory {
    /// Input sampling and mapping.
    Input,
    /// Gameplay state machine transitions.
    StateTransition,
    /// Position/velocity integration.
    Movement,
    /// Forces and physics bookkeeping.
    Physics,
    /// Collision detection and resolution.
    Collision,
    /// Render submission.
    Render,
    /// Post-render effects.
    PostRender,
}

impl SystemCategory {
    /// Every category, in execution order.
    pub const ALL: [Self; 7] = [
        Self::Input,
        Self::StateTransition,
        Self::Movement,
        Self::Physics,
        Self::Collision,
        Self::Render,
        Self::PostRender,
    ];
}

/// The world as one frame of one system sees it.
pub struct SystemContext<'a> {
    /// Entity repository of the running scene.
    pub entities: &'a mut EntityRepository,
    /// Component registry of the running scene.
    pub components: &'a mut ComponentRegistry,
    /// Seconds covered by this frame.
    pub delta_time: f32,
}

/// The entity set a system is subscribed to.
#[derive(Default)]
pub struct EntityRoster {
    ids: Vec<EntityId>,
}

impl EntityRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity; duplicates are ignored.
    pub fn subscribe(&mut self, entity: EntityId) {
        if entity.is_valid() && !self.ids.contains(&entity) {
            self.ids.push(entity);
        }
    }

    /// Removes an entity if present.
    pub fn unsubscribe(&mut self, entity: EntityId) {
        self.ids.retain(|id| *id != entity);
    }

    /// Drops every entity the repository no longer reports alive.
    pub fn prune_dead(&mut self, entities: &EntityRepository) {
        self.ids.retain(|id| entities.is_alive(*id));
    }

    /// Copies the current id list - the per-frame iteration snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.ids.clone()
    }

    /// Subscribed ids, in subscription order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Number of subscribed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// `true` when nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A frame system.
///
/// Implementors store an [`EntityRoster`] and expose it through
/// `roster`/`roster_mut`; the provided `run` prunes dead entities,
/// snapshots the roster, and dispatches [`System::update_entity`] per id.
/// Systems with a multi-phase protocol (the collision check) override
/// `run` wholesale.
pub trait System {
    /// The category this system runs in.
    fn category(&self) -> SystemCategory;

    /// One-time setup, before the first frame.
    fn initialize(&mut self, _ctx: &mut SystemContext<'_>) {}

    /// Teardown, after the last frame.
    fn finalize(&mut self) {}

    /// The subscribed entity set.
    fn roster(&self) -> &EntityRoster;

    /// Mutable access to the subscribed entity set.
    fn roster_mut(&mut self) -> &mut EntityRoster;

    /// Per-entity frame hook.
    fn update_entity(&mut self, _ctx: &mut SystemContext<'_>, _entity: EntityId) {}

    /// Runs one frame: prune dead entities, snapshot, dispatch per entity.
    fn run(&mut self, ctx: &mut SystemContext<'_>) {
        self.roster_mut().prune_dead(ctx.entities);
        let snapshot = self.roster().snapshot();
        for entity in snapshot {
            self.update_entity(ctx, entity);
        }
    }
}

/// Owns every system and runs them in category order.
pub struct SystemRunner {
    /// Registered systems, kept stably sorted by category.
    systems: Vec<Box<dyn System>>,
}

impl SystemRunner {
    /// Creates an empty runner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Registers a system.
    ///
    /// Systems of the same category run in registration order (the
    /// collision check system must be registered before the push-back
    /// system for the resolution data to be one frame fresh).
    pub fn register(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
        self.systems.sort_by_key(|s| s.category());
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Subscribes an entity to every system of one category.
    pub fn subscribe_to(&mut self, category: SystemCategory, entity: EntityId) {
        for system in &mut self.systems {
            if system.category() == category {
                system.roster_mut().subscribe(entity);
            }
        }
    }

    /// Subscribes an entity to every registered system.
    pub fn subscribe(&mut self, entity: EntityId) {
        for system in &mut self.systems {
            system.roster_mut().subscribe(entity);
        }
    }

    /// Runs every system's `initialize` hook.
    pub fn initialize_all(&mut self, scene: &mut Scene) {
        let (entities, components) = scene.split_mut();
        let mut ctx = SystemContext {
            entities,
            components,
            delta_time: 0.0,
        };
        for system in &mut self.systems {
            system.initialize(&mut ctx);
        }
    }

    /// Runs one frame: every system, category order, shared delta time.
    pub fn run_frame(&mut self, scene: &mut Scene, delta_time: f32) {
        let (entities, components) = scene.split_mut();
        let mut ctx = SystemContext {
            entities,
            components,
            delta_time,
        };
        for system in &mut self.systems {
            system.run(&mut ctx);
        }
    }

    /// Runs every system's `finalize` hook.
    pub fn finalize_all(&mut self) {
        for system in &mut self.systems {
            system.finalize();
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::scene::Scene;

    struct TraceSystem {
        category: SystemCategory,
        label: &'static str,
        trace: Rc<RefCell<Vec<&'static str>>>,
        roster: EntityRoster,
        visited: Rc<RefCell<Vec<EntityId>>>,
        despawn_on_visit: Option<EntityId>,
    }

    impl TraceSystem {
        fn new(
            category: SystemCategory,
            label: &'static str,
            trace: Rc<RefCell<Vec<&'static str>>>,
        ) -> Self {
            Self {
                category,
                label,
                trace,
                roster: EntityRoster::new(),
                visited: Rc::new(RefCell::new(Vec::new())),
                despawn_on_visit: None,
            }
        }
    }

    impl System for TraceSystem {
        fn category(&self) -> SystemCategory {
            self.category
        }

        fn roster(&self) -> &EntityRoster {
            &self.roster
        }

        fn roster_mut(&mut self) -> &mut EntityRoster {
            &mut self.roster
        }

        fn update_entity(&mut self, ctx: &mut SystemContext<'_>, entity: EntityId) {
            self.trace.borrow_mut().push(self.label);
            self.visited.borrow_mut().push(entity);
            if let Some(victim) = self.despawn_on_visit.take() {
                ctx.entities.remove_entity(victim);
            }
        }
    }

    #[test]
    fn test_category_order() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new();
        let entity = scene.spawn("probe");

        let mut runner = SystemRunner::new();
        // Registered out of order on purpose.
        runner.register(Box::new(TraceSystem::new(
            SystemCategory::Collision,
            "collision",
            Rc::clone(&trace),
        )));
        runner.register(Box::new(TraceSystem::new(
            SystemCategory::Input,
            "input",
            Rc::clone(&trace),
        )));
        runner.register(Box::new(TraceSystem::new(
            SystemCategory::Movement,
            "movement",
            Rc::clone(&trace),
        )));
        runner.subscribe(entity);

        runner.run_frame(&mut scene, 1.0 / 60.0);
        assert_eq!(*trace.borrow(), vec!["input", "movement", "collision"]);
    }

    #[test]
    fn test_snapshot_survives_mid_frame_despawn() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new();
        let a = scene.spawn("a");
        let b = scene.spawn("b");

        let mut system = TraceSystem::new(SystemCategory::Movement, "m", trace);
        // Visiting the first entity kills the second.
        system.despawn_on_visit = Some(b);
        let visited = Rc::clone(&system.visited);

        let mut runner = SystemRunner::new();
        runner.register(Box::new(system));
        runner.subscribe(a);
        runner.subscribe(b);

        // Frame 1: b dies mid-frame but the snapshot still contains it.
        runner.run_frame(&mut scene, 0.016);
        assert_eq!(*visited.borrow(), vec![a, b]);

        // Frame 2: the roster pruned b before dispatch.
        visited.borrow_mut().clear();
        runner.run_frame(&mut scene, 0.016);
        assert_eq!(*visited.borrow(), vec![a]);
    }

    #[test]
    fn test_roster_dedups() {
        let mut roster = EntityRoster::new();
        roster.subscribe(EntityId::new(1));
        roster.subscribe(EntityId::new(1));
        roster.subscribe(EntityId::INVALID);
        assert_eq!(roster.len(), 1);

        roster.unsubscribe(EntityId::new(1));
        assert!(roster.is_empty());
    }
}
