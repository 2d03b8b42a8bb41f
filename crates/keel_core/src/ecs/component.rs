//! # Component Contract
//!
//! Components are data containers attached to entities through a
//! [`ComponentArray`](super::storage::ComponentArray). The array owns their
//! lifetime: `initialize` runs when a component is constructed into a slot,
//! `finalize` runs before the slot is reused or cleared.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::entity::EntityId;

/// Contract every component type implements.
///
/// Components must be:
/// - `Default`: constructed in place on registration
/// - `Serialize + DeserializeOwned`: every component participates in scene
///   save/load (transient runtime state opts out per-field with
///   `#[serde(skip)]`)
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default, Serialize, Deserialize)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str {
///         "Health"
///     }
/// }
/// ```
pub trait Component: Default + Serialize + DeserializeOwned + 'static {
    /// Stable name used as the key in scene files and registry diagnostics.
    fn type_name() -> &'static str;

    /// Called once when the component is constructed into its slot,
    /// with the owning entity's handle.
    fn initialize(&mut self, _owner: EntityId) {}

    /// Called before the component is destroyed or its slot reused.
    fn finalize(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Default, Serialize, Deserialize)]
    struct Probe {
        owner: i32,
        finalized: bool,
    }

    impl Component for Probe {
        fn type_name() -> &'static str {
            "Probe"
        }

        fn initialize(&mut self, owner: EntityId) {
            self.owner = owner.raw();
        }

        fn finalize(&mut self) {
            self.finalized = true;
        }
    }

    #[test]
    fn test_lifecycle_hooks() {
        let mut probe = Probe::default();
        probe.initialize(EntityId::new(7));
        assert_eq!(probe.owner, 7);

        probe.finalize();
        assert!(probe.finalized);
    }
}
