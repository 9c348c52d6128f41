//! Typed pool handles.

use std::fmt;
use std::marker::PhantomData;

use super::component::{Component, PoolIndex};
use super::entity::Entity;
use super::world::{World, WorldId};

/// Copyable handle to the pool of component type `T` in one world.
///
/// Obtained from [`World::pool`]. Holds no borrow, so it can be kept in a
/// system and used with `&mut World` inside filter iteration. Every method
/// delegates to the matching [`World`] method.
pub struct Pool<T: Component> {
    index: PoolIndex,
    world: WorldId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> Pool<T> {
    pub(crate) const fn new(index: PoolIndex, world: WorldId) -> Self {
        Self {
            index,
            world,
            _marker: PhantomData,
        }
    }

    /// Registration index of the pool.
    #[inline]
    #[must_use]
    pub const fn index(self) -> PoolIndex {
        self.index
    }

    /// The world that issued this handle.
    #[inline]
    #[must_use]
    pub const fn world(self) -> WorldId {
        self.world
    }

    /// See [`World::add`].
    #[inline]
    pub fn add(self, world: &mut World, entity: Entity) -> &mut T {
        world.add(self, entity)
    }

    /// See [`World::has`].
    #[inline]
    #[must_use]
    pub fn has(self, world: &World, entity: Entity) -> bool {
        world.has(self, entity)
    }

    /// See [`World::get`].
    #[inline]
    #[must_use]
    pub fn get(self, world: &World, entity: Entity) -> &T {
        world.get(self, entity)
    }

    /// See [`World::get_mut`].
    #[inline]
    pub fn get_mut(self, world: &mut World, entity: Entity) -> &mut T {
        world.get_mut(self, entity)
    }

    /// See [`World::del`].
    #[inline]
    pub fn del(self, world: &mut World, entity: Entity) {
        world.del(self, entity);
    }

    /// See [`World::copy_component`].
    #[inline]
    pub fn copy(self, world: &mut World, src: Entity, dst: Entity) {
        world.copy_component(self, src, dst);
    }
}

impl<T: Component> Clone for Pool<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Component> Copy for Pool<T> {}

impl<T: Component> PartialEq for Pool<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.world == other.world
    }
}

impl<T: Component> Eq for Pool<T> {}

impl<T: Component> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("component", &std::any::type_name::<T>())
            .field("index", &self.index)
            .field("world", &self.world)
            .finish()
    }
}
