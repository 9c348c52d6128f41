//! # System Context
//!
//! What every system sees: the default world, the named worlds, and the one
//! shared-data value. All systems get the same instances; nothing is copied
//! between phases or systems.

use strata_core::World;

/// Worlds and shared data handed to every system call.
pub struct SystemContext<S = ()> {
    world: World,
    /// Named worlds in registration order.
    named: Vec<(String, World)>,
    shared: S,
}

impl<S> SystemContext<S> {
    pub(crate) fn new(world: World, shared: S) -> Self {
        Self {
            world,
            named: Vec::new(),
            shared,
        }
    }

    /// The default world.
    #[inline]
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The default world, mutably.
    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// A named world.
    #[must_use]
    pub fn named_world(&self, name: &str) -> Option<&World> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, w)| w)
    }

    /// A named world, mutably.
    pub fn named_world_mut(&mut self, name: &str) -> Option<&mut World> {
        self.named
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, w)| w)
    }

    /// Named worlds in registration order.
    pub fn named_worlds(&self) -> impl Iterator<Item = (&str, &World)> {
        self.named.iter().map(|(n, w)| (n.as_str(), w))
    }

    /// The shared data.
    #[inline]
    #[must_use]
    pub fn shared(&self) -> &S {
        &self.shared
    }

    /// The shared data, mutably.
    #[inline]
    pub fn shared_mut(&mut self) -> &mut S {
        &mut self.shared
    }

    /// Splits the context into the default world, the named worlds and the
    /// shared data.
    #[must_use]
    pub fn into_parts(self) -> (World, Vec<(String, World)>, S) {
        (self.world, self.named, self.shared)
    }

    pub(crate) fn has_named_world(&self, name: &str) -> bool {
        self.named.iter().any(|(n, _)| n == name)
    }

    pub(crate) fn insert_named_world(&mut self, name: String, world: World) {
        self.named.push((name, world));
    }

    /// Runs the leak check on every world; reports the first leaking one.
    ///
    /// The default world is reported as `""`.
    #[cfg(feature = "checked")]
    pub(crate) fn find_leaking_world(&mut self) -> Option<String> {
        if self.world.check_for_leaked_entities() {
            return Some(String::new());
        }
        for (name, world) in &mut self.named {
            if world.check_for_leaked_entities() {
                return Some(name.clone());
            }
        }
        None
    }
}
