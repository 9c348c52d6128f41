//! # Systems
//!
//! A system is a unit of per-phase logic. It declares the phases it takes
//! part in once, through [`System::phases`]; the pipeline caches that and
//! never asks again.
//!
//! ```text
//! init():    pre_init(S1..Sn)  then  init(S1..Sn)
//! run():     run(S1..Sn)                             any number of times
//! destroy(): destroy(S1..Sn)   then  post_destroy(S1..Sn)
//! ```
//!
//! Every phase walks systems in registration order.

use std::fmt;
use std::ops::BitOr;

use crate::context::SystemContext;

/// One lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before any system's `init`.
    PreInit,
    /// One-time setup.
    Init,
    /// Per frame/tick.
    Run,
    /// Shutdown.
    Destroy,
    /// After every system's `destroy`.
    PostDestroy,
}

impl Phase {
    /// Every phase, in lifecycle order.
    pub const ALL: [Phase; 5] = [
        Phase::PreInit,
        Phase::Init,
        Phase::Run,
        Phase::Destroy,
        Phase::PostDestroy,
    ];

    /// Single-phase capability set.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> Phases {
        Phases(1 << self as u8)
    }

    /// Position in [`Phase::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::PreInit => "pre_init",
            Phase::Init => "init",
            Phase::Run => "run",
            Phase::Destroy => "destroy",
            Phase::PostDestroy => "post_destroy",
        };
        f.write_str(name)
    }
}

/// Set of phases a system takes part in.
///
/// ```rust
/// use strata_systems::Phases;
///
/// let caps = Phases::INIT | Phases::RUN;
/// assert!(caps.contains(Phases::RUN));
/// assert!(!caps.contains(Phases::DESTROY));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Phases(u8);

impl Phases {
    /// No phase.
    pub const NONE: Phases = Phases(0);
    /// [`Phase::PreInit`].
    pub const PRE_INIT: Phases = Phase::PreInit.bit();
    /// [`Phase::Init`].
    pub const INIT: Phases = Phase::Init.bit();
    /// [`Phase::Run`].
    pub const RUN: Phases = Phase::Run.bit();
    /// [`Phase::Destroy`].
    pub const DESTROY: Phases = Phase::Destroy.bit();
    /// [`Phase::PostDestroy`].
    pub const POST_DESTROY: Phases = Phase::PostDestroy.bit();
    /// Every phase.
    pub const ALL: Phases = Phases(0b1_1111);

    /// Whether every phase in `other` is in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Phases) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no phase is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Phases {
    type Output = Phases;

    fn bitor(self, rhs: Phases) -> Phases {
        Phases(self.0 | rhs.0)
    }
}

/// A unit of logic driven by a [`SystemsPipeline`](crate::SystemsPipeline).
///
/// Implement the phase methods you need and list them in [`phases`](Self::phases);
/// methods for undeclared phases are never called.
///
/// ```rust
/// use strata_systems::{Phases, System, SystemContext};
///
/// struct Tick;
///
/// impl System<u64> for Tick {
///     fn phases(&self) -> Phases {
///         Phases::RUN
///     }
///
///     fn run(&mut self, ctx: &mut SystemContext<u64>) {
///         *ctx.shared_mut() += 1;
///     }
/// }
/// ```
pub trait System<S = ()> {
    /// Phases this system takes part in. Read once, at registration.
    fn phases(&self) -> Phases;

    /// Name used in logs and errors.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Called once, before any system's `init`.
    fn pre_init(&mut self, _ctx: &mut SystemContext<S>) {}

    /// Called once at startup.
    fn init(&mut self, _ctx: &mut SystemContext<S>) {}

    /// Called on every pipeline run.
    fn run(&mut self, _ctx: &mut SystemContext<S>) {}

    /// Called once at shutdown.
    fn destroy(&mut self, _ctx: &mut SystemContext<S>) {}

    /// Called once, after every system's `destroy`.
    fn post_destroy(&mut self, _ctx: &mut SystemContext<S>) {}
}

/// Last path segment of a type name, generics left intact.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
