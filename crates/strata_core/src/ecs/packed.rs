//! # Packed Entities
//!
//! Generation-stamped weak references. A packed entity never keeps its target
//! alive; unpacking simply reports whether the slot still holds the same
//! generation it was packed with.

use super::entity::Entity;
use super::world::{World, WorldId};

/// Entity index plus the generation it had when packed.
///
/// Safe to store across frames. Unpack before every use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedEntity {
    id: u32,
    generation: u32,
}

impl PackedEntity {
    pub(crate) const fn new(id: u32, generation: u32) -> Self {
        Self { id, generation }
    }

    /// Packed entity index.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self.id
    }

    /// Packed generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns the live entity if it has not been destroyed since packing.
    ///
    /// The returned entity is valid until the next structural change that
    /// could destroy it.
    #[inline]
    #[must_use]
    pub fn unpack(self, world: &World) -> Option<Entity> {
        let entity = Entity::from_raw(self.id);
        let valid = world.is_alive()
            && world.is_entity_alive(entity)
            && world.entity_generation(entity) == self.generation;
        valid.then_some(entity)
    }
}

/// [`PackedEntity`] that also remembers which world issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedEntityWithWorld {
    packed: PackedEntity,
    world: WorldId,
}

impl PackedEntityWithWorld {
    pub(crate) const fn new(packed: PackedEntity, world: WorldId) -> Self {
        Self { packed, world }
    }

    /// The world-less part of the reference.
    #[inline]
    #[must_use]
    pub const fn packed(self) -> PackedEntity {
        self.packed
    }

    /// The issuing world.
    #[inline]
    #[must_use]
    pub const fn world(self) -> WorldId {
        self.world
    }

    /// Returns the live entity if `world` issued this reference and the
    /// entity has not been destroyed since.
    #[inline]
    #[must_use]
    pub fn unpack(self, world: &World) -> Option<Entity> {
        if world.id() != self.world {
            return None;
        }
        self.packed.unpack(world)
    }

    /// Finds the issuing world among `worlds` and unpacks against it.
    #[must_use]
    pub fn unpack_world<'w>(self, worlds: &[&'w World]) -> Option<(&'w World, Entity)> {
        let world = worlds.iter().copied().find(|w| w.id() == self.world)?;
        let entity = self.packed.unpack(world)?;
        Some((world, entity))
    }
}
