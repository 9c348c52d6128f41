//! # Entity Management
//!
//! Entities are plain indices into the entity table. The table slot at that
//! index holds:
//! - A generation counter, bumped every time the slot's entity is destroyed
//! - The list of component pools currently holding data for the entity
//!
//! An entity is alive from `new_entity` until its last component is removed
//! (or it is deleted explicitly). Freshly created entities are alive with
//! zero components until their first component comes and goes.

use std::fmt;

use super::component::PoolIndex;

/// Entity identifier.
///
/// This is only an index: it carries no generation and does not detect
/// reuse. Hold a [`PackedEntity`](super::PackedEntity) across frames instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Creates an entity identifier from a raw index.
    #[inline]
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot marker: the entity is not in the unattached list.
const NOT_UNATTACHED: u32 = u32::MAX;

/// First generation of a never-destroyed slot.
pub(crate) const FIRST_GENERATION: u32 = 1;

/// Next generation after a destruction. Skips 0 on wraparound.
#[inline]
pub(crate) const fn next_generation(generation: u32) -> u32 {
    if generation == u32::MAX {
        FIRST_GENERATION
    } else {
        generation + 1
    }
}

/// One entity table slot.
struct EntitySlot {
    generation: u32,
    alive: bool,
    /// Attached pools, in attachment order.
    components: Vec<PoolIndex>,
    /// Position in `EntityTable::unattached`, `NOT_UNATTACHED` if absent.
    unattached: u32,
}

/// Result of allocating an entity slot.
pub(crate) struct Allocation {
    /// The new entity.
    pub entity: Entity,
    /// New table capacity, if the allocation had to grow the table.
    pub grown_to: Option<usize>,
}

/// Growable table of entity slots with a LIFO free-list.
pub(crate) struct EntityTable {
    /// Allocated slots (alive or recycled).
    slots: Vec<EntitySlot>,
    /// Current table capacity (world size). Every sparse array is this long.
    capacity: usize,
    /// Recycled slot indices, popped last-in first-out.
    recycled: Vec<u32>,
    /// Number of alive entities.
    alive_count: usize,
    /// Alive entities that have never had a component.
    unattached: Vec<Entity>,
    /// Initial capacity of each slot's component list.
    components_size: usize,
}

impl EntityTable {
    pub fn new(capacity: usize, recycled: usize, components_size: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            recycled: Vec::with_capacity(recycled),
            alive_count: 0,
            unattached: Vec::new(),
            components_size,
        }
    }

    /// Pops a recycled slot or appends a new one, growing the table if full.
    ///
    /// Generations are left untouched: they only move on destruction.
    pub fn allocate(&mut self) -> Allocation {
        self.alive_count += 1;

        if let Some(index) = self.recycled.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(!slot.alive && slot.components.is_empty());
            slot.alive = true;
            let entity = Entity(index);
            self.link_unattached(entity);
            return Allocation {
                entity,
                grown_to: None,
            };
        }

        let mut grown_to = None;
        if self.slots.len() == self.capacity {
            self.capacity *= 2;
            self.slots.reserve(self.capacity - self.slots.len());
            grown_to = Some(self.capacity);
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(EntitySlot {
            generation: FIRST_GENERATION,
            alive: true,
            components: Vec::with_capacity(self.components_size),
            unattached: NOT_UNATTACHED,
        });

        let entity = Entity(index);
        self.link_unattached(entity);
        Allocation { entity, grown_to }
    }

    /// Destroys the slot's entity: bumps the generation and recycles the index.
    pub fn release(&mut self, entity: Entity) {
        let slot = &mut self.slots[entity.slot()];
        debug_assert!(slot.alive && slot.components.is_empty());
        slot.alive = false;
        slot.generation = next_generation(slot.generation);
        self.alive_count -= 1;
        self.recycled.push(entity.0);
        self.unlink_unattached(entity);
    }

    fn link_unattached(&mut self, entity: Entity) {
        let pos = u32::try_from(self.unattached.len()).unwrap_or(NOT_UNATTACHED);
        self.slots[entity.slot()].unattached = pos;
        self.unattached.push(entity);
    }

    /// Swap-removes the entity from the unattached list, if it is there.
    fn unlink_unattached(&mut self, entity: Entity) {
        let pos = std::mem::replace(&mut self.slots[entity.slot()].unattached, NOT_UNATTACHED);
        if pos == NOT_UNATTACHED {
            return;
        }
        self.unattached.swap_remove(pos as usize);
        if let Some(&moved) = self.unattached.get(pos as usize) {
            self.slots[moved.slot()].unattached = pos;
        }
    }

    /// Alive entities that have not received a component yet.
    #[inline]
    pub fn unattached(&self) -> &[Entity] {
        &self.unattached
    }

    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slots.get(entity.slot()).is_some_and(|s| s.alive)
    }

    /// Generation of the slot, or 0 for a never-allocated index.
    #[inline]
    pub fn generation(&self, entity: Entity) -> u32 {
        self.slots.get(entity.slot()).map_or(0, |s| s.generation)
    }

    #[inline]
    pub fn component_count(&self, entity: Entity) -> usize {
        self.slots.get(entity.slot()).map_or(0, |s| s.components.len())
    }

    #[inline]
    pub fn components(&self, entity: Entity) -> &[PoolIndex] {
        match self.slots.get(entity.slot()) {
            Some(slot) => &slot.components,
            None => &[],
        }
    }

    #[inline]
    pub fn last_component(&self, entity: Entity) -> Option<PoolIndex> {
        self.slots[entity.slot()].components.last().copied()
    }

    pub fn attach(&mut self, entity: Entity, pool: PoolIndex) {
        let components = &mut self.slots[entity.slot()].components;
        let first = components.is_empty();
        components.push(pool);
        if first {
            self.unlink_unattached(entity);
        }
    }

    /// Removes `pool` from the entity's list, returning the remaining count.
    pub fn detach(&mut self, entity: Entity, pool: PoolIndex) -> usize {
        let components = &mut self.slots[entity.slot()].components;
        if let Some(pos) = components.iter().rposition(|&p| p == pool) {
            components.remove(pos);
        }
        components.len()
    }

    /// Number of allocated slots (alive and recycled).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Iterates allocated entities that are alive.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.alive)
            .map(|(i, _)| Entity(u32::try_from(i).unwrap_or(u32::MAX)))
    }
}
