//! # KEEL Shared
//!
//! Math and geometry types used by every KEEL subsystem.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `keel_core` or any other engine crate
//! - Any GPU or window-related crate
//!
//! If you need engine types, you are in the wrong crate.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;
pub mod shape;

pub use math::{Axis, Mat4, Vec3};
pub use shape::{Aabb, Shape, Sphere};
