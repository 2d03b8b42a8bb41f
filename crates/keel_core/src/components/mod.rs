//! # Built-in Components
//!
//! The component types the collision pipeline reads and writes. Gameplay
//! crates add their own types by implementing
//! [`Component`](crate::ecs::Component).

pub mod collider;
pub mod push_back;
pub mod rigidbody;
pub mod transform;

pub use collider::{Collider, CollisionState};
pub use push_back::{CollisionPushBackInfo, CollisionPushBackType, ContactInfo};
pub use rigidbody::Rigidbody;
pub use transform::Transform;
