//! # Filters
//!
//! A filter is a live query: the set of entities holding every include type
//! and none of the exclude types. The world keeps it current as a side effect
//! of component adds and removes, touching only filters whose mask mentions
//! the changed type.
//!
//! ## Iteration and deferred membership
//!
//! While a filter is being iterated (`lock_depth > 0`), membership changes
//! are queued instead of applied, so the dense array a loop walks never moves
//! under it. When the outermost iteration ends the queue replays in arrival
//! order.
//!
//! ```text
//! lock ─► [e1, e2, e3]   del(e2, A)  ─► queued: Remove(e2)
//!                        add(e9, A)  ─► queued: Remove(e2), Add(e9)
//!                        del(e9, A)  ─► queued: Remove(e2), _   (cancels Add)
//! unlock ─► replay ─► [e1, e3]
//! ```
//!
//! Each entity has at most one live queued op. A per-entity position array
//! finds it in O(1); cancelling leaves a hole that replay skips.

use super::component::{Component, PoolIndex};
use super::entity::Entity;
use super::events::{FilterEventListener, ListenerId};
use super::world::{World, WorldId};

/// Sparse slot sentinel: the entity is not in the filter.
const NONE: u32 = u32::MAX;

/// Handle to a filter in a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FilterId {
    index: u32,
    world: WorldId,
}

impl FilterId {
    pub(crate) const fn new(index: u32, world: WorldId) -> Self {
        Self { index, world }
    }

    /// Registration index of the filter in its world.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// The world that issued this handle.
    #[inline]
    #[must_use]
    pub const fn world(self) -> WorldId {
        self.world
    }
}

/// Include/exclude pool sets identifying a filter.
///
/// Both sides are sorted so equal masks compare and hash equal regardless of
/// the order types were listed in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterMask {
    include: Vec<PoolIndex>,
    exclude: Vec<PoolIndex>,
}

impl FilterMask {
    pub(crate) fn new(mut include: Vec<PoolIndex>, mut exclude: Vec<PoolIndex>) -> Self {
        include.sort_unstable();
        exclude.sort_unstable();
        Self { include, exclude }
    }

    /// Pools an entity must hold.
    #[inline]
    #[must_use]
    pub fn include(&self) -> &[PoolIndex] {
        &self.include
    }

    /// Pools an entity must not hold.
    #[inline]
    #[must_use]
    pub fn exclude(&self) -> &[PoolIndex] {
        &self.exclude
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DelayedOp {
    Add(Entity),
    Remove(Entity),
}

impl DelayedOp {
    const fn entity(self) -> Entity {
        match self {
            Self::Add(e) | Self::Remove(e) => e,
        }
    }
}

/// Incrementally maintained set of entities matching a [`FilterMask`].
pub struct Filter {
    id: FilterId,
    mask: FilterMask,
    /// Matching entities, in insertion order modulo swap-removal.
    dense: Vec<Entity>,
    /// Entity index -> position in `dense`, `NONE` if absent.
    sparse: Vec<u32>,
    /// Nesting depth of active iterations.
    lock_depth: u32,
    /// Membership changes queued while locked. `None` marks a cancelled op.
    delayed: Vec<Option<DelayedOp>>,
    /// Entity index -> position of its live op in `delayed`, `NONE` if none.
    pending: Vec<u32>,
    /// Live (uncancelled) ops in `delayed`.
    pending_count: usize,
    listeners: Vec<(ListenerId, Box<dyn FilterEventListener>)>,
}

impl Filter {
    pub(crate) fn new(id: FilterId, mask: FilterMask, sparse_size: usize, dense_size: usize) -> Self {
        Self {
            id,
            mask,
            dense: Vec::with_capacity(dense_size),
            sparse: vec![NONE; sparse_size],
            lock_depth: 0,
            delayed: Vec::new(),
            pending: vec![NONE; sparse_size],
            pending_count: 0,
            listeners: Vec::new(),
        }
    }

    /// Handle of this filter.
    #[inline]
    #[must_use]
    pub fn id(&self) -> FilterId {
        self.id
    }

    /// The mask this filter matches.
    #[inline]
    #[must_use]
    pub fn mask(&self) -> &FilterMask {
        &self.mask
    }

    /// Currently matching entities.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.dense
    }

    /// Number of matching entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether no entity matches.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Whether the entity is in the applied membership set.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.sparse
            .get(entity.slot())
            .is_some_and(|&pos| pos != NONE)
    }

    /// Nesting depth of active iterations.
    #[inline]
    #[must_use]
    pub fn lock_depth(&self) -> u32 {
        self.lock_depth
    }

    /// Number of membership changes waiting for the iteration to end.
    #[inline]
    #[must_use]
    pub fn pending_ops(&self) -> usize {
        self.pending_count
    }

    pub(crate) fn add_entity(&mut self, entity: Entity) {
        if self.lock_depth > 0 {
            self.defer(DelayedOp::Add(entity));
        } else {
            self.apply_add(entity);
        }
    }

    pub(crate) fn remove_entity(&mut self, entity: Entity) {
        if self.lock_depth > 0 {
            self.defer(DelayedOp::Remove(entity));
        } else {
            self.apply_remove(entity);
        }
    }

    /// Queues an op. Per entity, transitions strictly alternate, so a pending
    /// op for the same entity is always the inverse and both are dropped.
    fn defer(&mut self, op: DelayedOp) {
        let slot = op.entity().slot();
        let pos = self.pending[slot];
        if pos == NONE {
            self.pending[slot] = u32::try_from(self.delayed.len()).unwrap_or(NONE);
            self.delayed.push(Some(op));
            self.pending_count += 1;
        } else {
            let cancelled = self.delayed[pos as usize].take();
            debug_assert_ne!(cancelled, Some(op));
            self.pending[slot] = NONE;
            self.pending_count -= 1;
        }
    }

    fn apply_add(&mut self, entity: Entity) {
        let pos = u32::try_from(self.dense.len()).unwrap_or(NONE);
        self.dense.push(entity);
        self.sparse[entity.slot()] = pos;
        for (_, listener) in &mut self.listeners {
            listener.on_entity_added(entity);
        }
    }

    fn apply_remove(&mut self, entity: Entity) {
        let pos = self.sparse[entity.slot()];
        if pos == NONE {
            return;
        }
        let pos = pos as usize;
        self.dense.swap_remove(pos);
        if let Some(&moved) = self.dense.get(pos) {
            self.sparse[moved.slot()] = u32::try_from(pos).unwrap_or(NONE);
        }
        self.sparse[entity.slot()] = NONE;
        for (_, listener) in &mut self.listeners {
            listener.on_entity_removed(entity);
        }
    }

    pub(crate) fn lock(&mut self) {
        self.lock_depth += 1;
    }

    /// Ends one iteration level; the outermost one replays queued changes.
    pub(crate) fn unlock(&mut self) {
        debug_assert!(self.lock_depth > 0, "unbalanced filter unlock");
        self.lock_depth = self.lock_depth.saturating_sub(1);
        if self.lock_depth == 0 && !self.delayed.is_empty() {
            let mut ops = std::mem::take(&mut self.delayed);
            for op in ops.drain(..).flatten() {
                self.pending[op.entity().slot()] = NONE;
                match op {
                    DelayedOp::Add(e) => self.apply_add(e),
                    DelayedOp::Remove(e) => self.apply_remove(e),
                }
            }
            self.pending_count = 0;
            // Hand the buffer back to keep its capacity.
            self.delayed = ops;
        }
    }

    pub(crate) fn resize(&mut self, capacity: usize) {
        self.sparse.resize(capacity, NONE);
        self.pending.resize(capacity, NONE);
    }

    pub(crate) fn add_listener(&mut self, id: ListenerId, listener: Box<dyn FilterEventListener>) {
        self.listeners.push((id, listener));
    }

    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn FilterEventListener>> {
        let pos = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(pos).1)
    }
}

/// Builder for a filter mask, started by [`World::filter`].
///
/// ```rust
/// use strata_core::{Component, World};
///
/// #[derive(Clone, Default)]
/// struct Position(f32);
/// impl Component for Position {}
///
/// #[derive(Clone, Default)]
/// struct Frozen;
/// impl Component for Frozen {}
///
/// let mut world = World::new();
/// let movable = world.filter::<Position>().exc::<Frozen>().end();
/// // Same mask, same filter.
/// assert_eq!(movable, world.filter::<Position>().exc::<Frozen>().end());
/// ```
#[must_use = "a filter is only created by `end()`"]
pub struct FilterBuilder<'w> {
    world: &'w mut World,
    include: Vec<PoolIndex>,
    exclude: Vec<PoolIndex>,
}

impl<'w> FilterBuilder<'w> {
    pub(crate) fn new(world: &'w mut World, first: PoolIndex) -> Self {
        Self {
            world,
            include: vec![first],
            exclude: Vec::new(),
        }
    }

    /// Requires entities to hold `T`.
    pub fn inc<T: Component>(mut self) -> Self {
        let pool = self.world.pool::<T>().index();
        #[cfg(feature = "checked")]
        self.validate::<T>(pool, true);
        self.include.push(pool);
        self
    }

    /// Requires entities not to hold `T`.
    pub fn exc<T: Component>(mut self) -> Self {
        let pool = self.world.pool::<T>().index();
        #[cfg(feature = "checked")]
        self.validate::<T>(pool, false);
        self.exclude.push(pool);
        self
    }

    /// Returns the filter for this mask, creating and populating it on first
    /// request.
    pub fn end(self) -> FilterId {
        self.world.register_filter(FilterMask::new(self.include, self.exclude))
    }

    #[cfg(feature = "checked")]
    fn validate<T: Component>(&self, pool: PoolIndex, including: bool) {
        use crate::error::{violation, EcsError};

        let (same_side, other_side) = if including {
            (&self.include, &self.exclude)
        } else {
            (&self.exclude, &self.include)
        };
        let name = std::any::type_name::<T>();
        if other_side.contains(&pool) {
            violation(EcsError::InvalidMask(name));
        }
        if same_side.contains(&pool) {
            violation(EcsError::DuplicateMaskType(name));
        }
    }
}
