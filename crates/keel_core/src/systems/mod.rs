//! # Frame Systems
//!
//! The built-in systems: rigidbody movement, the pairwise collision check,
//! and push-back resolution. Registration order matters inside a category -
//! the check system must precede the push-back system.

pub mod collision_check;
pub mod movement;
pub mod push_back;

pub use collision_check::{check_collision_pair, CollisionCheckSystem, PairTest};
pub use movement::RigidbodyMovementSystem;
pub use push_back::CollisionPushBackSystem;
