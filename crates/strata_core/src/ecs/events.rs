//! # Structural Events
//!
//! Opt-in observers for tooling (inspectors, reactive layers). Listeners are
//! registered per world or per filter; a world without listeners pays one
//! empty-vector check per structural change.
//!
//! Notifications are fire-and-forget. The core never reads anything back
//! from a listener and never depends on one for correctness.

use super::entity::Entity;
use super::filter::FilterId;
use super::world::WorldId;

/// Handle returned when registering a listener, used to remove it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);

/// Observer of world-level structural changes.
///
/// Every method defaults to a no-op; implement only what you need.
pub trait WorldEventListener {
    /// An entity was created.
    fn on_entity_created(&mut self, _entity: Entity) {}

    /// A component was added to or removed from the entity.
    fn on_entity_changed(&mut self, _entity: Entity) {}

    /// An entity was destroyed (explicitly or by losing its last component).
    fn on_entity_destroyed(&mut self, _entity: Entity) {}

    /// A new filter was created and populated.
    fn on_filter_created(&mut self, _filter: FilterId) {}

    /// The entity table grew; every sparse array now has `new_size` slots.
    fn on_world_resized(&mut self, _new_size: usize) {}

    /// The world was destroyed.
    fn on_world_destroyed(&mut self, _world: WorldId) {}
}

/// Observer of one filter's applied membership changes.
///
/// Changes queued during iteration are reported when they are applied.
pub trait FilterEventListener {
    /// The entity started matching.
    fn on_entity_added(&mut self, _entity: Entity) {}

    /// The entity stopped matching.
    fn on_entity_removed(&mut self, _entity: Entity) {}
}
