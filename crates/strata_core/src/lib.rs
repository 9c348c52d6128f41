//! # Strata Core
//!
//! Single-threaded Entity Component System runtime for real-time loops:
//! - O(1) component add/has/get/del on sparse-set pools
//! - Live filters kept current as components change
//! - Safe structural changes while iterating a filter
//! - Generation-checked weak entity references
//!
//! ## Build Profiles
//!
//! The default `checked` feature validates every precondition (double add,
//! missing get, bad filter mask, dead entity, foreign handle) and panics with
//! an [`EcsError`] message. Without it the checks compile away; the happy path
//! behaves identically.
//!
//! ## Example
//!
//! ```rust
//! use strata_core::{Component, World};
//!
//! #[derive(Clone, Default)]
//! struct Position(f32, f32);
//! impl Component for Position {}
//!
//! #[derive(Clone, Default)]
//! struct Velocity(f32, f32);
//! impl Component for Velocity {}
//!
//! let mut world = World::new();
//! let positions = world.pool::<Position>();
//! let velocities = world.pool::<Velocity>();
//!
//! let e = world.new_entity();
//! positions.add(&mut world, e);
//! velocities.add(&mut world, e).0 = 2.0;
//!
//! let moving = world.filter::<Position>().inc::<Velocity>().end();
//! world.for_each(moving, |world, e| {
//!     let &Velocity(dx, dy) = velocities.get(world, e);
//!     let p = positions.get_mut(world, e);
//!     p.0 += dx;
//!     p.1 += dy;
//! });
//! assert_eq!(positions.get(&world, e).0, 2.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::WorldConfig;
pub use ecs::{
    Component, ComponentPool, Entity, Filter, FilterBuilder, FilterEventListener, FilterId,
    FilterMask, ListenerId, PackedEntity, PackedEntityWithWorld, Pool, PoolIndex, PoolView, World,
    WorldEventListener, WorldId,
};
pub use error::{EcsError, EcsResult};
