//! # Strata Systems
//!
//! The execution layer on top of [`strata_core`]: an ordered pipeline of
//! systems with one shared-data value and any number of named worlds.
//!
//! A host calls [`SystemsPipeline::init`] once, [`SystemsPipeline::run`] once
//! per frame or tick, and [`SystemsPipeline::destroy`] at shutdown. Systems
//! run strictly in registration order within every phase.
//!
//! ## Example
//!
//! ```rust
//! use strata_core::{Component, World};
//! use strata_systems::{Phases, System, SystemContext, SystemsPipeline};
//!
//! #[derive(Clone, Default)]
//! struct Age(u32);
//! impl Component for Age {}
//!
//! struct Spawn;
//! impl System for Spawn {
//!     fn phases(&self) -> Phases {
//!         Phases::INIT
//!     }
//!
//!     fn init(&mut self, ctx: &mut SystemContext) {
//!         let world = ctx.world_mut();
//!         let age = world.pool::<Age>();
//!         let e = world.new_entity();
//!         age.add(world, e);
//!     }
//! }
//!
//! struct Grow;
//! impl System for Grow {
//!     fn phases(&self) -> Phases {
//!         Phases::RUN
//!     }
//!
//!     fn run(&mut self, ctx: &mut SystemContext) {
//!         let world = ctx.world_mut();
//!         let age = world.pool::<Age>();
//!         let aging = world.filter::<Age>().end();
//!         world.for_each(aging, |world, e| age.get_mut(world, e).0 += 1);
//!     }
//! }
//!
//! # fn main() -> strata_systems::PipelineResult<()> {
//! let mut pipeline = SystemsPipeline::new(World::new(), ());
//! pipeline.add(Spawn)?.add(Grow)?;
//! pipeline.init()?;
//! pipeline.run()?;
//! pipeline.destroy()?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod error;
pub mod pipeline;
pub mod system;

pub use context::SystemContext;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::SystemsPipeline;
pub use system::{Phase, Phases, System};
