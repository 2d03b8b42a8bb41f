//! # KEEL Core Engine
//!
//! The ECS kernel of KEEL: a typed, free-list-backed component store keyed
//! by entity handles, plus the per-frame collision pipeline built on it.
//!
//! ## Architecture Rules
//!
//! 1. **Lookup misses return `Option`** - unknown entities and missing
//!    components are recoverable, never panics
//! 2. **One frame, one thread** - systems run in fixed category order on the
//!    main thread; entity lists are snapshotted before iteration
//! 3. **Slots are stable** - component storage grows by doubling, but an
//!    entity's slot index never changes while it is registered
//!
//! ## Example
//!
//! ```rust,ignore
//! use keel_core::{Scene, SystemRunner};
//!
//! let mut scene = Scene::new();
//! let player = scene.spawn("player");
//! scene.components_mut().register_entity::<Transform>(player, 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod components;
pub mod config;
pub mod ecs;
pub mod error;
pub mod scene;
pub mod systems;
pub mod time;

pub use components::{
    Collider, CollisionPushBackInfo, CollisionPushBackType, CollisionState, ContactInfo,
    Rigidbody, Transform,
};
pub use config::EngineConfig;
pub use ecs::{
    Component, ComponentArray, ComponentArrayOps, ComponentRegistry, Entity, EntityId,
    EntityRepository, EntityRoster, System, SystemCategory, SystemContext, SystemRunner,
};
pub use error::{CoreError, CoreResult};
pub use scene::Scene;
pub use systems::{CollisionCheckSystem, CollisionPushBackSystem, RigidbodyMovementSystem};
pub use time::FrameClock;
