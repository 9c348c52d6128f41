//! # Component Storage
//!
//! Sparse-set storage for a single component type.
//!
//! ```text
//! sparse:   [ -, 2, -, 0, 1, - ]      entity index -> dense index
//! dense:    [ C3, C4, C1 | R, R ]     live values | recycled, already reset
//! entities: [ 3,  4,  1  ]            dense index -> entity
//! ```
//!
//! - Add/Has/Get/Del are O(1)
//! - Removal swap-removes so live values stay contiguous
//! - The tail past the live values is the free-list of recycled slots.
//!   Values there were reset on removal and are handed out again by the next
//!   add without reallocating.

use std::any::{Any, TypeId};

use super::component::{Component, PoolIndex};
use super::entity::Entity;

/// Sparse slot sentinel: the entity holds no component of this type.
const NONE: u32 = u32::MAX;

/// Read-only, type-erased view of a component pool.
///
/// Used by tooling (inspectors, debuggers) that does not know component
/// types statically.
pub trait PoolView {
    /// Registration index of the pool in its world.
    fn index(&self) -> PoolIndex;

    /// Name of the stored component type.
    fn type_name(&self) -> &'static str;

    /// `TypeId` of the stored component type.
    fn component_type_id(&self) -> TypeId;

    /// Whether the entity holds a component of this type.
    fn has(&self, entity: Entity) -> bool;

    /// Number of live components.
    fn len(&self) -> usize;

    /// Whether the pool holds no live components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entity's component as `Any`, if present.
    fn get_raw(&self, entity: Entity) -> Option<&dyn Any>;
}

/// Mutating, type-erased pool operations used by the world.
///
/// Kept crate-private: every mutation must go through the world so entity
/// component lists and filters stay in sync.
pub(crate) trait ErasedPool {
    fn view(&self) -> &dyn PoolView;
    fn has(&self, entity: Entity) -> bool;
    fn insert(&mut self, entity: Entity) -> usize;
    fn remove(&mut self, entity: Entity) -> bool;
    fn copy_value(&mut self, src: Entity, dst: Entity);
    fn resize(&mut self, capacity: usize);
    fn get_raw_mut(&mut self, entity: Entity) -> Option<&mut dyn Any>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Storage for a single component type.
///
/// Obtained read-only through [`World::storage`](crate::World::storage) or
/// with mutable values through [`World::storage_mut`](crate::World::storage_mut).
/// Structural changes (add/remove) always go through the world.
///
/// # Type Parameters
///
/// * `T` - The component type to store
pub struct ComponentPool<T: Component> {
    /// Registration index.
    index: PoolIndex,
    /// Entity index -> dense index, `NONE` if absent. One entry per world slot.
    sparse: Vec<u32>,
    /// Live values followed by recycled, reset values.
    dense: Vec<T>,
    /// Dense index -> owning entity. Same length as the live region.
    entities: Vec<Entity>,
    /// Reset hook captured at pool creation.
    auto_reset: Option<fn(&mut T)>,
}

impl<T: Component> ComponentPool<T> {
    /// Creates an empty pool.
    ///
    /// # Arguments
    ///
    /// * `index` - Registration index in the owning world
    /// * `sparse_size` - Current world size (entity table capacity)
    /// * `dense_size` - Initial dense capacity
    pub(crate) fn new(index: PoolIndex, sparse_size: usize, dense_size: usize) -> Self {
        Self {
            index,
            sparse: vec![NONE; sparse_size],
            dense: Vec::with_capacity(dense_size),
            entities: Vec::with_capacity(dense_size),
            auto_reset: T::AUTO_RESET,
        }
    }

    /// Registration index of this pool.
    #[inline]
    #[must_use]
    pub fn index(&self) -> PoolIndex {
        self.index
    }

    /// Number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the pool holds no live components.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of recycled slots waiting for reuse.
    #[inline]
    #[must_use]
    pub fn recycled_count(&self) -> usize {
        self.dense.len() - self.entities.len()
    }

    /// Whether the entity holds a component of this type.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.sparse
            .get(entity.slot())
            .is_some_and(|&dense| dense != NONE)
    }

    /// Gets the entity's component.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let dense = self.dense_index(entity)?;
        Some(&self.dense[dense])
    }

    /// Gets the entity's component mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let dense = self.dense_index(entity)?;
        Some(&mut self.dense[dense])
    }

    /// Live component values, densely packed.
    ///
    /// `components()[i]` belongs to `entities()[i]`. The order changes on
    /// every removal.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[T] {
        &self.dense[..self.entities.len()]
    }

    /// Live component values, mutably.
    #[inline]
    pub fn components_mut(&mut self) -> &mut [T] {
        let len = self.entities.len();
        &mut self.dense[..len]
    }

    /// Owning entity of each live value.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Raw sparse map: entity index -> dense index, `u32::MAX` when absent.
    #[inline]
    #[must_use]
    pub fn raw_sparse(&self) -> &[u32] {
        &self.sparse
    }

    /// Iterates `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterates `(entity, component)` pairs mutably in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    #[inline]
    fn dense_index(&self, entity: Entity) -> Option<usize> {
        match self.sparse.get(entity.slot()) {
            Some(&dense) if dense != NONE => Some(dense as usize),
            _ => None,
        }
    }

    /// Dense index lookup without the presence check. Panics on a missing
    /// component instead of reporting it.
    #[inline]
    pub(crate) fn get_fast(&self, entity: Entity) -> &T {
        &self.dense[self.sparse[entity.slot()] as usize]
    }

    #[inline]
    pub(crate) fn get_fast_mut(&mut self, entity: Entity) -> &mut T {
        let dense = self.sparse[entity.slot()] as usize;
        &mut self.dense[dense]
    }

    fn reset_slot(&mut self, dense: usize) {
        let slot = &mut self.dense[dense];
        match self.auto_reset {
            Some(reset) => reset(slot),
            None => *slot = T::default(),
        }
    }

    /// Attaches a clean slot to the entity. The caller guarantees absence.
    fn insert_slot(&mut self, entity: Entity) -> usize {
        let dense = self.entities.len();
        if dense == self.dense.len() {
            let mut value = T::default();
            if let Some(reset) = self.auto_reset {
                reset(&mut value);
            }
            self.dense.push(value);
        }
        self.entities.push(entity);
        self.sparse[entity.slot()] = u32::try_from(dense).unwrap_or(NONE);
        dense
    }

    /// Swap-removes the entity's slot and resets the freed value.
    fn remove_slot(&mut self, entity: Entity) -> bool {
        let Some(dense) = self.dense_index(entity) else {
            return false;
        };
        let last = self.entities.len() - 1;

        self.dense.swap(dense, last);
        self.entities.swap_remove(dense);
        if dense < last {
            let moved = self.entities[dense];
            self.sparse[moved.slot()] = u32::try_from(dense).unwrap_or(NONE);
        }
        self.sparse[entity.slot()] = NONE;

        // The removed value now sits at the head of the recycled tail.
        self.reset_slot(last);
        true
    }
}

impl<T: Component> PoolView for ComponentPool<T> {
    fn index(&self) -> PoolIndex {
        self.index
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn component_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentPool::has(self, entity)
    }

    fn len(&self) -> usize {
        ComponentPool::len(self)
    }

    fn get_raw(&self, entity: Entity) -> Option<&dyn Any> {
        self.get(entity).map(|c| c as &dyn Any)
    }
}

impl<T: Component> ErasedPool for ComponentPool<T> {
    fn view(&self) -> &dyn PoolView {
        self
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentPool::has(self, entity)
    }

    fn insert(&mut self, entity: Entity) -> usize {
        self.insert_slot(entity)
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.remove_slot(entity)
    }

    fn copy_value(&mut self, src: Entity, dst: Entity) {
        let value = self.get_fast(src).clone();
        *self.get_fast_mut(dst) = value;
    }

    fn resize(&mut self, capacity: usize) {
        self.sparse.resize(capacity, NONE);
    }

    fn get_raw_mut(&mut self, entity: Entity) -> Option<&mut dyn Any> {
        self.get_mut(entity).map(|c| c as &mut dyn Any)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
