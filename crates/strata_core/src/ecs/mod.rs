//! # Entity Component System
//!
//! A sparse-set ECS with incrementally maintained queries.
//!
//! ## Design Philosophy
//!
//! - Entities are plain indices; a generation counter per slot detects reuse
//! - Each component type lives in its own dense array, addressed through a
//!   sparse entity -> dense index table
//! - Filters are updated on every add/remove, never rebuilt
//! - Storage slots, entity ids and filter buffers are recycled, so a warmed
//!   up world stops allocating

mod component;
mod entity;
mod events;
mod filter;
mod packed;
mod pool;
mod storage;
mod world;

pub use component::{Component, PoolIndex};
pub use entity::Entity;
pub use events::{FilterEventListener, ListenerId, WorldEventListener};
pub use filter::{Filter, FilterBuilder, FilterId, FilterMask};
pub use packed::{PackedEntity, PackedEntityWithWorld};
pub use pool::Pool;
pub use storage::{ComponentPool, PoolView};
pub use world::{World, WorldId};
