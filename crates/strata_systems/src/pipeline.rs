//! # Systems Pipeline
//!
//! Ordered system registry driving the lifecycle:
//!
//! ```text
//! Registering ──init()──► Initialized ──destroy()──► Destroyed
//!      │                     │    ▲                      ▲
//!      │                     └────┘ run()                │
//!      └──init() errs──► Failed ──────destroy()──────────┘
//! ```
//!
//! A failed `init` leaves some systems initialized and others not, so
//! `Failed` refuses `run` and only allows `destroy`. Registration closes at
//! `init`. Each system's capabilities are read once in
//! `add` and cached as one index list per phase, so a phase only walks the
//! systems that take part in it.

use strata_core::World;

use crate::context::SystemContext;
use crate::error::{PipelineError, PipelineResult};
use crate::system::{Phase, System};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Registering,
    Initialized,
    Failed,
    Destroyed,
}

/// Ordered collection of systems sharing one context.
///
/// # Example
///
/// ```rust
/// use strata_core::World;
/// use strata_systems::{Phases, System, SystemContext, SystemsPipeline};
///
/// struct Counter;
///
/// impl System<u32> for Counter {
///     fn phases(&self) -> Phases {
///         Phases::RUN
///     }
///
///     fn run(&mut self, ctx: &mut SystemContext<u32>) {
///         *ctx.shared_mut() += 1;
///     }
/// }
///
/// # fn main() -> strata_systems::PipelineResult<()> {
/// let mut pipeline = SystemsPipeline::new(World::new(), 0u32);
/// pipeline.add(Counter)?;
/// pipeline.init()?;
/// pipeline.run()?;
/// pipeline.run()?;
/// pipeline.destroy()?;
/// assert_eq!(*pipeline.context().shared(), 2);
/// # Ok(())
/// # }
/// ```
pub struct SystemsPipeline<S = ()> {
    context: SystemContext<S>,
    systems: Vec<Box<dyn System<S>>>,
    /// Indices into `systems`, one list per [`Phase`].
    by_phase: [Vec<usize>; 5],
    stage: Stage,
}

impl<S> SystemsPipeline<S> {
    /// Creates a pipeline around the default world and the shared data.
    #[must_use]
    pub fn new(world: World, shared: S) -> Self {
        Self {
            context: SystemContext::new(world, shared),
            systems: Vec::new(),
            by_phase: Default::default(),
            stage: Stage::Registering,
        }
    }

    /// Registers a named world.
    ///
    /// # Errors
    ///
    /// [`PipelineError::DuplicateWorld`] if the name is taken,
    /// [`PipelineError::RegistrationClosed`] after `init`.
    pub fn add_world(&mut self, name: impl Into<String>, world: World) -> PipelineResult<&mut Self> {
        let name = name.into();
        if self.stage != Stage::Registering {
            return Err(PipelineError::RegistrationClosed(format!("world {name:?}")));
        }
        if self.context.has_named_world(&name) {
            return Err(PipelineError::DuplicateWorld(name));
        }
        tracing::debug!(world = %name, "named world registered");
        self.context.insert_named_world(name, world);
        Ok(self)
    }

    /// Appends a system.
    ///
    /// # Errors
    ///
    /// [`PipelineError::RegistrationClosed`] after `init`.
    pub fn add<Y>(&mut self, system: Y) -> PipelineResult<&mut Self>
    where
        Y: System<S> + 'static,
    {
        if self.stage != Stage::Registering {
            return Err(PipelineError::RegistrationClosed(format!(
                "system {}",
                system.name()
            )));
        }

        let index = self.systems.len();
        let phases = system.phases();
        for phase in Phase::ALL {
            if phases.contains(phase.bit()) {
                self.by_phase[phase.index()].push(index);
            }
        }
        self.systems.push(Box::new(system));
        Ok(self)
    }

    /// Runs `pre_init` on every system, then `init` on every system.
    ///
    /// # Errors
    ///
    /// [`PipelineError::AlreadyInitialized`] or
    /// [`PipelineError::AlreadyDestroyed`] on a second call, and (checked
    /// builds) [`PipelineError::LeakedEntity`] if a system leaves an entity
    /// without components. After an error the pipeline only accepts
    /// `destroy`.
    pub fn init(&mut self) -> PipelineResult<()> {
        match self.stage {
            Stage::Registering => {}
            Stage::Initialized => return Err(PipelineError::AlreadyInitialized),
            Stage::Failed => return Err(PipelineError::InitFailed),
            Stage::Destroyed => return Err(PipelineError::AlreadyDestroyed),
        }
        tracing::info!(systems = self.systems.len(), "pipeline init");

        let result = self
            .run_phase(Phase::PreInit)
            .and_then(|()| self.run_phase(Phase::Init));
        self.stage = if result.is_ok() {
            Stage::Initialized
        } else {
            Stage::Failed
        };
        result
    }

    /// Runs `run` on every system once.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NotInitialized`] before `init`,
    /// [`PipelineError::InitFailed`] after a failed `init`,
    /// [`PipelineError::AlreadyDestroyed`] after `destroy`, and (checked
    /// builds) [`PipelineError::LeakedEntity`].
    pub fn run(&mut self) -> PipelineResult<()> {
        match self.stage {
            Stage::Initialized => self.run_phase(Phase::Run),
            Stage::Registering => Err(PipelineError::NotInitialized),
            Stage::Failed => Err(PipelineError::InitFailed),
            Stage::Destroyed => Err(PipelineError::AlreadyDestroyed),
        }
    }

    /// Runs `destroy` on every system, then `post_destroy` on every system.
    ///
    /// Also tears down a pipeline whose `init` failed.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NotInitialized`] before `init`,
    /// [`PipelineError::AlreadyDestroyed`] on a second call.
    pub fn destroy(&mut self) -> PipelineResult<()> {
        match self.stage {
            Stage::Initialized | Stage::Failed => {}
            Stage::Registering => return Err(PipelineError::NotInitialized),
            Stage::Destroyed => return Err(PipelineError::AlreadyDestroyed),
        }
        self.stage = Stage::Destroyed;
        tracing::info!(systems = self.systems.len(), "pipeline destroy");

        self.run_phase(Phase::Destroy)?;
        self.run_phase(Phase::PostDestroy)
    }

    fn run_phase(&mut self, phase: Phase) -> PipelineResult<()> {
        let Self {
            context,
            systems,
            by_phase,
            ..
        } = self;

        for &index in &by_phase[phase.index()] {
            let system = &mut systems[index];
            match phase {
                Phase::PreInit => system.pre_init(context),
                Phase::Init => system.init(context),
                Phase::Run => system.run(context),
                Phase::Destroy => system.destroy(context),
                Phase::PostDestroy => system.post_destroy(context),
            }

            #[cfg(feature = "checked")]
            if matches!(phase, Phase::PreInit | Phase::Init | Phase::Run) {
                if let Some(world) = context.find_leaking_world() {
                    let system = system.name().to_string();
                    tracing::warn!(%system, %phase, world = %world, "leaked entity");
                    return Err(PipelineError::LeakedEntity { system, world });
                }
            }
        }
        Ok(())
    }

    /// The shared context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &SystemContext<S> {
        &self.context
    }

    /// The shared context, mutably.
    #[inline]
    pub fn context_mut(&mut self) -> &mut SystemContext<S> {
        &mut self.context
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn systems_count(&self) -> usize {
        self.systems.len()
    }

    /// Names of registered systems, in registration order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name())
    }

    /// Whether `init` has run, successfully or not.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.stage != Stage::Registering
    }

    /// Whether `init` returned an error.
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.stage == Stage::Failed
    }

    /// Whether `destroy` has run.
    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.stage == Stage::Destroyed
    }

    /// Drops the systems and hands the worlds and shared data back.
    #[must_use]
    pub fn into_context(self) -> SystemContext<S> {
        self.context
    }
}
