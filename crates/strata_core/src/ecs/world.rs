//! # ECS World
//!
//! The central container: one entity table, one pool per component type,
//! one filter per distinct mask.
//!
//! Every structural change goes through the world so three views stay in
//! sync:
//! - the pool's sparse/dense arrays
//! - the entity's list of attached pools
//! - the membership of every filter whose mask mentions the pool
//!
//! Removing an entity's last component destroys it. `del_entity` is the same
//! thing applied to every attached component.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use super::component::{Component, PoolIndex};
use super::entity::{Entity, EntityTable};
use super::events::{FilterEventListener, ListenerId, WorldEventListener};
use super::filter::{Filter, FilterBuilder, FilterId, FilterMask};
use super::packed::{PackedEntity, PackedEntityWithWorld};
use super::pool::Pool;
use super::storage::{ComponentPool, ErasedPool, PoolView};
use crate::config::WorldConfig;
use crate::error::{violation, EcsError};

static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique world identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(u32);

impl WorldId {
    fn next() -> Self {
        Self(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ECS world.
///
/// Single-threaded: a world is `!Sync` in practice (listeners are plain
/// boxed trait objects) and every mutation takes `&mut self`.
///
/// # Example
///
/// ```rust
/// use strata_core::{Component, World};
///
/// #[derive(Clone, Default)]
/// struct Health(i32);
/// impl Component for Health {}
///
/// let mut world = World::new();
/// let health = world.pool::<Health>();
///
/// let e = world.new_entity();
/// health.add(&mut world, e).0 = 10;
/// assert_eq!(health.get(&world, e).0, 10);
///
/// // Last component gone, entity gone.
/// health.del(&mut world, e);
/// assert!(!world.is_entity_alive(e));
/// ```
pub struct World {
    id: WorldId,
    config: WorldConfig,
    entities: EntityTable,
    pools: Vec<Box<dyn ErasedPool>>,
    pool_lookup: HashMap<TypeId, PoolIndex>,
    filters: Vec<Filter>,
    filter_lookup: HashMap<FilterMask, u32>,
    /// Pool index -> filters including that pool.
    filters_by_include: Vec<Vec<u32>>,
    /// Pool index -> filters excluding that pool.
    filters_by_exclude: Vec<Vec<u32>>,
    listeners: Vec<(ListenerId, Box<dyn WorldEventListener>)>,
    next_listener: u32,
    destroyed: bool,
}

impl World {
    /// Creates a world with default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world pre-sized by `config`.
    ///
    /// # Panics
    ///
    /// In checked builds, panics if `config` fails [`WorldConfig::validate`].
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        #[cfg(feature = "checked")]
        if let Err(err) = config.validate() {
            violation(err);
        }

        let id = WorldId::next();
        tracing::debug!(world = %id, entities = config.entities, "world created");

        Self {
            id,
            entities: EntityTable::new(
                config.entities,
                config.recycled_entities,
                config.entity_components_size,
            ),
            pools: Vec::with_capacity(config.pools),
            pool_lookup: HashMap::with_capacity(config.pools),
            filters: Vec::with_capacity(config.filters),
            filter_lookup: HashMap::with_capacity(config.filters),
            filters_by_include: Vec::with_capacity(config.pools),
            filters_by_exclude: Vec::with_capacity(config.pools),
            listeners: Vec::new(),
            next_listener: 0,
            destroyed: false,
            config,
        }
    }

    /// Identifier stamped into every handle this world issues.
    #[inline]
    #[must_use]
    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Capacities this world was created with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Whether [`destroy`](Self::destroy) has not been called yet.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.destroyed
    }

    /// Destroys the world.
    ///
    /// Every alive entity is deleted highest index first, so pool, filter and
    /// entity listeners see every removal. Pools and filters are then dropped;
    /// every handle and packed entity issued by this world goes stale. Calling
    /// it again is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        let doomed: Vec<Entity> = self.entities.iter_alive().collect();
        for &entity in doomed.iter().rev() {
            self.del_entity(entity);
        }

        for (_, listener) in &mut self.listeners {
            listener.on_world_destroyed(self.id);
        }

        self.pools.clear();
        self.pool_lookup.clear();
        self.filters.clear();
        self.filter_lookup.clear();
        self.filters_by_include.clear();
        self.filters_by_exclude.clear();
        self.listeners.clear();
        self.destroyed = true;

        tracing::debug!(world = %self.id, "world destroyed");
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates an entity with no components.
    ///
    /// The entity is alive until its first component comes and goes (or it is
    /// deleted). Give it a component before relying on it: a zero-component
    /// entity is reported by [`check_for_leaked_entities`](Self::check_for_leaked_entities).
    pub fn new_entity(&mut self) -> Entity {
        self.ensure_usable();

        let allocation = self.entities.allocate();
        let entity = allocation.entity;

        if let Some(new_size) = allocation.grown_to {
            for pool in &mut self.pools {
                pool.resize(new_size);
            }
            for filter in &mut self.filters {
                filter.resize(new_size);
            }
            tracing::debug!(world = %self.id, new_size, "entity table grown");
            for (_, listener) in &mut self.listeners {
                listener.on_world_resized(new_size);
            }
        }

        for (_, listener) in &mut self.listeners {
            listener.on_entity_created(entity);
        }
        entity
    }

    /// Deletes an entity and all its components.
    ///
    /// Components go in reverse attachment order; the last removal destroys
    /// the entity, bumping its generation and recycling its index.
    ///
    /// # Panics
    ///
    /// In checked builds, panics if the entity is not alive. Unchecked builds
    /// ignore dead entities.
    pub fn del_entity(&mut self, entity: Entity) {
        self.ensure_usable();
        self.ensure_entity(entity);
        if !self.entities.is_alive(entity) {
            return;
        }

        if self.entities.component_count(entity) == 0 {
            self.destroy_entity(entity);
            return;
        }
        while let Some(pool) = self.entities.last_component(entity) {
            self.remove_component(pool, entity);
        }
    }

    /// Clones every component of `src` onto `dst`.
    ///
    /// Components `dst` lacks are added (filters update as usual); components
    /// it already has are overwritten. Components only `dst` has are kept.
    ///
    /// # Panics
    ///
    /// In checked builds, panics if either entity is dead or `src == dst`.
    pub fn copy_entity(&mut self, src: Entity, dst: Entity) {
        self.ensure_usable();
        self.ensure_entity(src);
        self.ensure_entity(dst);
        #[cfg(feature = "checked")]
        if src == dst {
            violation(EcsError::CopyOntoSelf(src.index()));
        }

        let count = self.entities.component_count(src);
        for i in 0..count {
            let pool = self.entities.components(src)[i];
            if !self.pools[usize::from(pool)].has(dst) {
                self.attach_component(pool, dst);
            }
            self.pools[usize::from(pool)].copy_value(src, dst);
        }
    }

    /// Adds a clean slot of `pool` to the entity and updates filters.
    fn attach_component(&mut self, pool: PoolIndex, entity: Entity) {
        self.pools[usize::from(pool)].insert(entity);
        self.entities.attach(entity, pool);
        self.on_entity_change(entity, pool, true);
        for (_, listener) in &mut self.listeners {
            listener.on_entity_changed(entity);
        }
    }

    /// Removes the entity's `pool` slot, destroying the entity if it was the
    /// last one.
    fn remove_component(&mut self, pool: PoolIndex, entity: Entity) {
        self.on_entity_change(entity, pool, false);
        self.pools[usize::from(pool)].remove(entity);
        let remaining = self.entities.detach(entity, pool);
        for (_, listener) in &mut self.listeners {
            listener.on_entity_changed(entity);
        }
        if remaining == 0 {
            self.destroy_entity(entity);
        }
    }

    fn destroy_entity(&mut self, entity: Entity) {
        self.entities.release(entity);
        for (_, listener) in &mut self.listeners {
            listener.on_entity_destroyed(entity);
        }
    }

    /// Re-evaluates the filters touching `pool` for one entity.
    ///
    /// Called after the pool insert on add and before the pool removal on
    /// del, so `pool` is always present while masks are tested.
    fn on_entity_change(&mut self, entity: Entity, pool: PoolIndex, added: bool) {
        let Self {
            pools,
            filters,
            filters_by_include,
            filters_by_exclude,
            ..
        } = self;
        let pools = &*pools;
        let pool_slot = usize::from(pool);

        for &index in &filters_by_include[pool_slot] {
            let filter = &mut filters[index as usize];
            if mask_compatible(filter.mask(), pools, entity) {
                if added {
                    filter.add_entity(entity);
                } else {
                    filter.remove_entity(entity);
                }
            }
        }
        for &index in &filters_by_exclude[pool_slot] {
            let filter = &mut filters[index as usize];
            if mask_compatible_without(filter.mask(), pools, entity, pool) {
                if added {
                    filter.remove_entity(entity);
                } else {
                    filter.add_entity(entity);
                }
            }
        }
    }

    // =========================================================================
    // Pools
    // =========================================================================

    /// Returns the handle of `T`'s pool, registering the pool on first use.
    ///
    /// # Panics
    ///
    /// Panics if the world already holds `PoolIndex::MAX + 1` pools, or (in
    /// checked builds) if the world is destroyed.
    pub fn pool<T: Component>(&mut self) -> Pool<T> {
        self.ensure_usable();
        if let Some(pool) = self.find_pool::<T>() {
            return pool;
        }

        let Ok(index) = PoolIndex::try_from(self.pools.len()) else {
            panic!("component pool limit reached registering {}", std::any::type_name::<T>());
        };
        self.pools.push(Box::new(ComponentPool::<T>::new(
            index,
            self.entities.capacity(),
            self.config.pool_dense_size,
        )));
        self.pool_lookup.insert(TypeId::of::<T>(), index);
        self.filters_by_include.push(Vec::new());
        self.filters_by_exclude.push(Vec::new());

        tracing::debug!(
            world = %self.id,
            index,
            component = std::any::type_name::<T>(),
            "pool registered"
        );
        Pool::new(index, self.id)
    }

    /// Returns the handle of `T`'s pool if it is already registered.
    #[must_use]
    pub fn find_pool<T: Component>(&self) -> Option<Pool<T>> {
        self.pool_lookup
            .get(&TypeId::of::<T>())
            .map(|&index| Pool::new(index, self.id))
    }

    /// Adds a default (or reset) `T` to the entity and returns it.
    ///
    /// # Panics
    ///
    /// In checked builds, panics if the entity is dead or already holds `T`.
    pub fn add<T: Component>(&mut self, pool: Pool<T>, entity: Entity) -> &mut T {
        self.ensure_usable();
        self.ensure_owned(pool.world());
        self.ensure_entity(entity);
        #[cfg(feature = "checked")]
        if self.storage(pool).has(entity) {
            violation(EcsError::DuplicateComponent {
                entity: entity.index(),
                component: std::any::type_name::<T>(),
            });
        }

        self.attach_component(pool.index(), entity);
        self.storage_mut(pool).get_fast_mut(entity)
    }

    /// Whether the entity holds `T`.
    #[inline]
    #[must_use]
    pub fn has<T: Component>(&self, pool: Pool<T>, entity: Entity) -> bool {
        self.storage(pool).has(entity)
    }

    /// The entity's `T`.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not hold `T`. Checked builds report it as
    /// [`EcsError::MissingComponent`].
    #[inline]
    #[must_use]
    pub fn get<T: Component>(&self, pool: Pool<T>, entity: Entity) -> &T {
        self.ensure_present(pool, entity);
        self.storage(pool).get_fast(entity)
    }

    /// The entity's `T`, mutably.
    ///
    /// # Panics
    ///
    /// Same as [`get`](Self::get).
    #[inline]
    pub fn get_mut<T: Component>(&mut self, pool: Pool<T>, entity: Entity) -> &mut T {
        self.ensure_present(pool, entity);
        self.storage_mut(pool).get_fast_mut(entity)
    }

    /// Removes `T` from the entity. No-op if absent.
    ///
    /// Destroys the entity if `T` was its last component.
    pub fn del<T: Component>(&mut self, pool: Pool<T>, entity: Entity) {
        self.ensure_usable();
        self.ensure_owned(pool.world());
        if self.storage(pool).has(entity) {
            self.remove_component(pool.index(), entity);
        }
    }

    /// Clones `src`'s `T` onto `dst`, adding it to `dst` if missing.
    ///
    /// # Panics
    ///
    /// In checked builds, panics if `src` lacks `T`, either entity is dead, or
    /// `src == dst`. Unchecked builds ignore a missing source.
    pub fn copy_component<T: Component>(&mut self, pool: Pool<T>, src: Entity, dst: Entity) {
        self.ensure_usable();
        self.ensure_entity(dst);
        self.ensure_present(pool, src);
        #[cfg(feature = "checked")]
        if src == dst {
            violation(EcsError::CopyOntoSelf(src.index()));
        }
        if !self.storage(pool).has(src) {
            return;
        }

        if !self.storage(pool).has(dst) {
            self.attach_component(pool.index(), dst);
        }
        let value = self.storage(pool).get_fast(src).clone();
        *self.storage_mut(pool).get_fast_mut(dst) = value;
    }

    /// Read-only access to `T`'s storage for dense iteration.
    #[must_use]
    pub fn storage<T: Component>(&self, pool: Pool<T>) -> &ComponentPool<T> {
        self.ensure_owned(pool.world());
        self.pools
            .get(usize::from(pool.index()))
            .and_then(|p| p.as_any().downcast_ref::<ComponentPool<T>>())
            .unwrap_or_else(|| self.foreign(pool.world()))
    }

    /// `T`'s storage with mutable component values.
    ///
    /// Membership cannot change through it; adds and removes go through the
    /// world.
    pub fn storage_mut<T: Component>(&mut self, pool: Pool<T>) -> &mut ComponentPool<T> {
        self.ensure_owned(pool.world());
        let (expected, found) = (self.id, pool.world());
        match self
            .pools
            .get_mut(usize::from(pool.index()))
            .and_then(|p| p.as_any_mut().downcast_mut::<ComponentPool<T>>())
        {
            Some(storage) => storage,
            None => violation(EcsError::ForeignHandle {
                expected: expected.raw(),
                found: found.raw(),
            }),
        }
    }

    #[cold]
    fn foreign(&self, found: WorldId) -> ! {
        violation(EcsError::ForeignHandle {
            expected: self.id.raw(),
            found: found.raw(),
        })
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Starts a filter mask including `T`.
    pub fn filter<T: Component>(&mut self) -> FilterBuilder<'_> {
        let first = self.pool::<T>().index();
        FilterBuilder::new(self, first)
    }

    /// Returns the filter for `mask`, creating and populating it if new.
    pub(crate) fn register_filter(&mut self, mask: FilterMask) -> FilterId {
        self.ensure_usable();
        if let Some(&index) = self.filter_lookup.get(&mask) {
            return FilterId::new(index, self.id);
        }

        let Ok(index) = u32::try_from(self.filters.len()) else {
            panic!("filter limit reached");
        };
        let id = FilterId::new(index, self.id);
        let mut filter = Filter::new(
            id,
            mask.clone(),
            self.entities.capacity(),
            self.config.pool_dense_size,
        );

        for entity in self.entities.iter_alive() {
            if self.entities.component_count(entity) > 0
                && mask_compatible(&mask, &self.pools, entity)
            {
                filter.add_entity(entity);
            }
        }

        for &pool in mask.include() {
            self.filters_by_include[usize::from(pool)].push(index);
        }
        for &pool in mask.exclude() {
            self.filters_by_exclude[usize::from(pool)].push(index);
        }
        tracing::debug!(
            world = %self.id,
            filter = index,
            matched = filter.len(),
            "filter created"
        );
        self.filters.push(filter);
        self.filter_lookup.insert(mask, index);

        for (_, listener) in &mut self.listeners {
            listener.on_filter_created(id);
        }
        id
    }

    /// The filter behind a handle.
    #[must_use]
    pub fn get_filter(&self, filter: FilterId) -> &Filter {
        self.ensure_usable();
        self.ensure_owned(filter.world());
        match self.filters.get(filter.index() as usize) {
            Some(f) => f,
            None => self.foreign(filter.world()),
        }
    }

    /// Entities currently matching the filter.
    #[inline]
    #[must_use]
    pub fn filter_entities(&self, filter: FilterId) -> &[Entity] {
        self.get_filter(filter).entities()
    }

    /// Number of entities currently matching the filter.
    #[inline]
    #[must_use]
    pub fn filter_len(&self, filter: FilterId) -> usize {
        self.get_filter(filter).len()
    }

    /// Calls `f` for each entity matching the filter when the call starts.
    ///
    /// `f` gets the whole world and may add, remove, or delete freely:
    /// membership changes to this filter are queued and applied after the
    /// outermost iteration over it ends. The pass therefore visits exactly
    /// the entities that matched on entry, including ones `f` deleted along
    /// the way; check [`is_entity_alive`](Self::is_entity_alive) before
    /// touching an entity another callback may have destroyed.
    ///
    /// ```rust
    /// use strata_core::{Component, World};
    ///
    /// #[derive(Clone, Default)]
    /// struct Ttl(u32);
    /// impl Component for Ttl {}
    ///
    /// let mut world = World::new();
    /// let ttl = world.pool::<Ttl>();
    /// for n in 0..3 {
    ///     let e = world.new_entity();
    ///     ttl.add(&mut world, e).0 = n;
    /// }
    ///
    /// let ticking = world.filter::<Ttl>().end();
    /// world.for_each(ticking, |world, e| {
    ///     if ttl.get(world, e).0 == 0 {
    ///         ttl.del(world, e);
    ///     } else {
    ///         ttl.get_mut(world, e).0 -= 1;
    ///     }
    /// });
    /// assert_eq!(world.filter_len(ticking), 2);
    /// ```
    pub fn for_each<F>(&mut self, filter: FilterId, mut f: F)
    where
        F: FnMut(&mut World, Entity),
    {
        let index = self.get_filter(filter).id().index() as usize;
        self.filters[index].lock();

        let mut position = 0;
        while let Some(&entity) = self
            .filters
            .get(index)
            .and_then(|flt| flt.entities().get(position))
        {
            f(self, entity);
            position += 1;
        }

        // Gone if `f` destroyed the world.
        if let Some(flt) = self.filters.get_mut(index) {
            flt.unlock();
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a world event listener.
    pub fn add_event_listener(&mut self, listener: Box<dyn WorldEventListener>) -> ListenerId {
        let id = self.next_listener_id();
        self.listeners.push((id, listener));
        id
    }

    /// Unregisters a world event listener, handing it back.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> Option<Box<dyn WorldEventListener>> {
        let pos = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(pos).1)
    }

    /// Registers a membership listener on one filter.
    pub fn add_filter_listener(
        &mut self,
        filter: FilterId,
        listener: Box<dyn FilterEventListener>,
    ) -> ListenerId {
        let index = self.get_filter(filter).id().index() as usize;
        let id = self.next_listener_id();
        self.filters[index].add_listener(id, listener);
        id
    }

    /// Unregisters a filter listener, handing it back.
    pub fn remove_filter_listener(
        &mut self,
        filter: FilterId,
        id: ListenerId,
    ) -> Option<Box<dyn FilterEventListener>> {
        let index = self.get_filter(filter).id().index() as usize;
        self.filters[index].remove_listener(id)
    }

    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    // =========================================================================
    // Packing
    // =========================================================================

    /// Captures the entity with its current generation.
    #[inline]
    #[must_use]
    pub fn pack(&self, entity: Entity) -> PackedEntity {
        PackedEntity::new(entity.index(), self.entities.generation(entity))
    }

    /// Same as [`pack`](Self::pack), also recording this world.
    #[inline]
    #[must_use]
    pub fn pack_with_world(&self, entity: Entity) -> PackedEntityWithWorld {
        PackedEntityWithWorld::new(self.pack(entity), self.id)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Current generation of the entity's slot (0 if never allocated).
    #[inline]
    #[must_use]
    pub fn entity_generation(&self, entity: Entity) -> u32 {
        self.entities.generation(entity)
    }

    /// Whether the entity is alive.
    #[inline]
    #[must_use]
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of components attached to the entity.
    #[inline]
    #[must_use]
    pub fn component_count(&self, entity: Entity) -> usize {
        self.entities.component_count(entity)
    }

    /// Pool indices attached to the entity, in attachment order.
    #[inline]
    #[must_use]
    pub fn entity_components(&self, entity: Entity) -> &[PoolIndex] {
        self.entities.components(entity)
    }

    /// Number of alive entities.
    #[inline]
    #[must_use]
    pub fn entities_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Number of allocated entity slots, alive or recycled.
    #[inline]
    #[must_use]
    pub fn allocated_entities_count(&self) -> usize {
        self.entities.len()
    }

    /// Current entity table capacity; the length of every sparse array.
    #[inline]
    #[must_use]
    pub fn world_size(&self) -> usize {
        self.entities.capacity()
    }

    /// Number of registered pools.
    #[inline]
    #[must_use]
    pub fn pools_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of distinct filters.
    #[inline]
    #[must_use]
    pub fn filters_count(&self) -> usize {
        self.filters.len()
    }

    /// Replaces the contents of `out` with every alive entity.
    pub fn all_entities(&self, out: &mut Vec<Entity>) -> usize {
        out.clear();
        out.extend(self.entities.iter_alive());
        out.len()
    }

    /// Replaces the contents of `out` with the type names of the entity's
    /// components, in attachment order.
    pub fn component_types(&self, entity: Entity, out: &mut Vec<&'static str>) -> usize {
        out.clear();
        out.extend(
            self.entities
                .components(entity)
                .iter()
                .map(|&pool| self.pools[usize::from(pool)].view().type_name()),
        );
        out.len()
    }

    /// Type-erased view of a pool, by registration index.
    #[must_use]
    pub fn pool_view(&self, pool: PoolIndex) -> Option<&dyn PoolView> {
        self.pools.get(usize::from(pool)).map(|p| p.view())
    }

    /// The entity's component in `pool` as `Any`.
    #[must_use]
    pub fn component_raw(&self, pool: PoolIndex, entity: Entity) -> Option<&dyn Any> {
        self.pool_view(pool)?.get_raw(entity)
    }

    /// The entity's component in `pool` as mutable `Any`.
    pub fn component_raw_mut(&mut self, pool: PoolIndex, entity: Entity) -> Option<&mut dyn Any> {
        self.pools.get_mut(usize::from(pool))?.get_raw_mut(entity)
    }

    /// Reports whether some entity is still alive with zero components.
    ///
    /// The table keeps those entities in a list that shrinks as they get
    /// their first component or are deleted, so the check is O(1). Always
    /// `false` in unchecked builds.
    pub fn check_for_leaked_entities(&self) -> bool {
        #[cfg(feature = "checked")]
        if let Some(&entity) = self.entities.unattached().first() {
            tracing::warn!(world = %self.id, %entity, "entity left alive without components");
            return true;
        }
        false
    }

    // =========================================================================
    // Checked-profile validation
    // =========================================================================

    #[inline]
    fn ensure_usable(&self) {
        #[cfg(feature = "checked")]
        if self.destroyed {
            violation(EcsError::WorldDestroyed(self.id.raw()));
        }
    }

    #[inline]
    fn ensure_entity(&self, _entity: Entity) {
        #[cfg(feature = "checked")]
        if !self.entities.is_alive(_entity) {
            violation(EcsError::EntityNotAlive(_entity.index()));
        }
    }

    #[inline]
    fn ensure_owned(&self, _issuer: WorldId) {
        #[cfg(feature = "checked")]
        if _issuer != self.id {
            self.foreign(_issuer);
        }
    }

    #[inline]
    fn ensure_present<T: Component>(&self, _pool: Pool<T>, _entity: Entity) {
        #[cfg(feature = "checked")]
        if !self.storage(_pool).has(_entity) {
            violation(EcsError::MissingComponent {
                entity: _entity.index(),
                component: std::any::type_name::<T>(),
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("alive", &!self.destroyed)
            .field("entities", &self.entities.alive_count())
            .field("pools", &self.pools.len())
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Entity holds every include and no exclude.
fn mask_compatible(mask: &FilterMask, pools: &[Box<dyn ErasedPool>], entity: Entity) -> bool {
    mask.include()
        .iter()
        .all(|&p| pools[usize::from(p)].has(entity))
        && !mask
            .exclude()
            .iter()
            .any(|&p| pools[usize::from(p)].has(entity))
}

/// Same as [`mask_compatible`] with `ignored` treated as absent.
fn mask_compatible_without(
    mask: &FilterMask,
    pools: &[Box<dyn ErasedPool>],
    entity: Entity,
    ignored: PoolIndex,
) -> bool {
    mask.include()
        .iter()
        .all(|&p| p != ignored && pools[usize::from(p)].has(entity))
        && !mask
            .exclude()
            .iter()
            .any(|&p| p != ignored && pools[usize::from(p)].has(entity))
}
