//! # Pipeline Lifecycle Tests
//!
//! Phase ordering, shared data, named worlds and phase-misuse errors.

use std::cell::RefCell;
use std::rc::Rc;

use strata_core::{Component, World};
use strata_systems::{PipelineError, Phases, System, SystemContext, SystemsPipeline};

type Log = Rc<RefCell<Vec<String>>>;

/// Records every phase call as "name.phase".
struct Recorder {
    label: &'static str,
    phases: Phases,
    log: Log,
}

impl Recorder {
    fn new(label: &'static str, phases: Phases, log: &Log) -> Self {
        Self {
            label,
            phases,
            log: Rc::clone(log),
        }
    }

    fn record(&self, phase: &str) {
        self.log.borrow_mut().push(format!("{}.{phase}", self.label));
    }
}

impl<S> System<S> for Recorder {
    fn phases(&self) -> Phases {
        self.phases
    }

    fn name(&self) -> &str {
        self.label
    }

    fn pre_init(&mut self, _ctx: &mut SystemContext<S>) {
        self.record("pre_init");
    }

    fn init(&mut self, _ctx: &mut SystemContext<S>) {
        self.record("init");
    }

    fn run(&mut self, _ctx: &mut SystemContext<S>) {
        self.record("run");
    }

    fn destroy(&mut self, _ctx: &mut SystemContext<S>) {
        self.record("destroy");
    }

    fn post_destroy(&mut self, _ctx: &mut SystemContext<S>) {
        self.record("post_destroy");
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

#[test]
fn init_then_runs_interleave_in_registration_order() {
    let log = Log::default();
    let mut pipeline = SystemsPipeline::new(World::new(), ());
    pipeline
        .add(Recorder::new("s1", Phases::INIT | Phases::RUN, &log))
        .unwrap()
        .add(Recorder::new("s2", Phases::RUN, &log))
        .unwrap();

    pipeline.init().unwrap();
    pipeline.run().unwrap();
    pipeline.run().unwrap();

    assert_eq!(
        entries(&log),
        ["s1.init", "s1.run", "s2.run", "s1.run", "s2.run"]
    );
}

#[test]
fn full_lifecycle_order() {
    let log = Log::default();
    let mut pipeline = SystemsPipeline::new(World::new(), ());
    pipeline
        .add(Recorder::new("a", Phases::ALL, &log))
        .unwrap()
        .add(Recorder::new("b", Phases::ALL, &log))
        .unwrap();

    pipeline.init().unwrap();
    pipeline.destroy().unwrap();

    assert_eq!(
        entries(&log),
        [
            "a.pre_init",
            "b.pre_init",
            "a.init",
            "b.init",
            "a.destroy",
            "b.destroy",
            "a.post_destroy",
            "b.post_destroy",
        ]
    );
    assert!(pipeline.is_destroyed());
}

#[test]
fn undeclared_phases_are_skipped() {
    let log = Log::default();
    let mut pipeline = SystemsPipeline::new(World::new(), ());
    pipeline
        .add(Recorder::new("quiet", Phases::NONE, &log))
        .unwrap()
        .add(Recorder::new("teardown", Phases::DESTROY, &log))
        .unwrap();

    pipeline.init().unwrap();
    pipeline.run().unwrap();
    pipeline.destroy().unwrap();

    assert_eq!(entries(&log), ["teardown.destroy"]);
    assert_eq!(pipeline.systems_count(), 2);
    assert_eq!(
        pipeline.system_names().collect::<Vec<_>>(),
        ["quiet", "teardown"]
    );
}

#[test]
fn phase_misuse_is_reported() {
    let log = Log::default();
    let mut pipeline = SystemsPipeline::new(World::new(), ());

    assert_eq!(pipeline.run(), Err(PipelineError::NotInitialized));
    assert_eq!(pipeline.destroy(), Err(PipelineError::NotInitialized));

    pipeline.init().unwrap();
    assert_eq!(pipeline.init(), Err(PipelineError::AlreadyInitialized));
    assert!(matches!(
        pipeline.add(Recorder::new("late", Phases::RUN, &log)),
        Err(PipelineError::RegistrationClosed(_))
    ));
    assert!(matches!(
        pipeline.add_world("late", World::new()),
        Err(PipelineError::RegistrationClosed(_))
    ));

    pipeline.destroy().unwrap();
    assert_eq!(pipeline.run(), Err(PipelineError::AlreadyDestroyed));
    assert_eq!(pipeline.destroy(), Err(PipelineError::AlreadyDestroyed));
    assert_eq!(pipeline.init(), Err(PipelineError::AlreadyDestroyed));
    assert!(entries(&log).is_empty());
}

// ============================================================================
// SHARED DATA AND WORLDS
// ============================================================================

#[derive(Default)]
struct Stats {
    spawned: u32,
    ticks: u32,
}

#[derive(Clone, Default)]
struct Health(i32);
impl Component for Health {}

#[derive(Clone, Default)]
struct Hit(i32);
impl Component for Hit {}

struct Spawner;

impl System<Stats> for Spawner {
    fn phases(&self) -> Phases {
        Phases::INIT
    }

    fn init(&mut self, ctx: &mut SystemContext<Stats>) {
        let world = ctx.world_mut();
        let health = world.pool::<Health>();
        for _ in 0..3 {
            let e = world.new_entity();
            health.add(world, e).0 = 10;
        }
        ctx.shared_mut().spawned += 3;
    }
}

/// Applies hits queued in the "events" world to the default world.
struct Damage;

impl System<Stats> for Damage {
    fn phases(&self) -> Phases {
        Phases::RUN
    }

    fn run(&mut self, ctx: &mut SystemContext<Stats>) {
        let mut total = 0;
        if let Some(events) = ctx.named_world_mut("events") {
            let hit = events.pool::<Hit>();
            let pending = events.filter::<Hit>().end();
            events.for_each(pending, |events, e| {
                total += hit.get(events, e).0;
                events.del_entity(e);
            });
        }

        let world = ctx.world_mut();
        let health = world.pool::<Health>();
        let alive = world.filter::<Health>().end();
        world.for_each(alive, |world, e| health.get_mut(world, e).0 -= total);
        ctx.shared_mut().ticks += 1;
    }
}

#[test]
fn systems_share_one_context() {
    let mut events = World::new();
    let hit = events.pool::<Hit>();
    let e = events.new_entity();
    hit.add(&mut events, e).0 = 4;

    let mut pipeline = SystemsPipeline::new(World::new(), Stats::default());
    pipeline
        .add_world("events", events)
        .unwrap()
        .add(Spawner)
        .unwrap()
        .add(Damage)
        .unwrap();

    pipeline.init().unwrap();
    pipeline.run().unwrap();
    pipeline.run().unwrap();
    pipeline.destroy().unwrap();

    let context = pipeline.into_context();
    assert_eq!(context.shared().spawned, 3);
    assert_eq!(context.shared().ticks, 2);
    assert_eq!(context.named_world("events").unwrap().entities_count(), 0);
    assert_eq!(context.named_worlds().count(), 1);

    let (mut world, _, _) = context.into_parts();
    let health = world.pool::<Health>();
    let mut alive = Vec::new();
    world.all_entities(&mut alive);
    assert_eq!(alive.len(), 3);
    for e in alive {
        assert_eq!(health.get(&world, e).0, 6);
    }
}

#[test]
fn duplicate_world_name_rejected() {
    let mut pipeline = SystemsPipeline::new(World::new(), ());
    pipeline.add_world("ui", World::new()).unwrap();
    assert_eq!(
        pipeline.add_world("ui", World::new()).err(),
        Some(PipelineError::DuplicateWorld("ui".to_string()))
    );
    assert!(pipeline.context().named_world("ui").is_some());
    assert!(pipeline.context().named_world("missing").is_none());
}

// ============================================================================
// LEAK DETECTION
// ============================================================================

/// Creates an entity and never gives it a component.
struct Leaky;

impl System for Leaky {
    fn phases(&self) -> Phases {
        Phases::RUN
    }

    fn run(&mut self, ctx: &mut SystemContext) {
        if let Some(scratch) = ctx.named_world_mut("scratch") {
            scratch.new_entity();
        }
    }
}

#[cfg(feature = "checked")]
#[test]
fn leaked_entity_names_system_and_world() {
    let mut pipeline = SystemsPipeline::new(World::new(), ());
    pipeline
        .add_world("scratch", World::new())
        .unwrap()
        .add(Leaky)
        .unwrap();
    pipeline.init().unwrap();

    assert_eq!(
        pipeline.run(),
        Err(PipelineError::LeakedEntity {
            system: "Leaky".to_string(),
            world: "scratch".to_string(),
        })
    );
}

/// Creates an unattached entity in the default world during pre-init.
#[cfg(feature = "checked")]
struct LeakOnPreInit;

#[cfg(feature = "checked")]
impl System for LeakOnPreInit {
    fn phases(&self) -> Phases {
        Phases::PRE_INIT
    }

    fn pre_init(&mut self, ctx: &mut SystemContext) {
        ctx.world_mut().new_entity();
    }
}

#[cfg(feature = "checked")]
#[test]
fn failed_init_refuses_run_but_allows_destroy() {
    let log = Log::default();
    let mut pipeline = SystemsPipeline::new(World::new(), ());
    pipeline
        .add(LeakOnPreInit)
        .unwrap()
        .add(Recorder::new("later", Phases::INIT | Phases::RUN | Phases::DESTROY, &log))
        .unwrap();

    assert_eq!(
        pipeline.init(),
        Err(PipelineError::LeakedEntity {
            system: "LeakOnPreInit".to_string(),
            world: String::new(),
        })
    );
    assert!(pipeline.is_failed());
    assert_eq!(pipeline.run(), Err(PipelineError::InitFailed));
    assert_eq!(pipeline.init(), Err(PipelineError::InitFailed));
    assert!(entries(&log).is_empty());

    pipeline.destroy().unwrap();
    assert_eq!(entries(&log), ["later.destroy"]);
    assert!(pipeline.is_destroyed());
    assert_eq!(pipeline.run(), Err(PipelineError::AlreadyDestroyed));
}

#[cfg(not(feature = "checked"))]
#[test]
fn leaks_not_tracked_without_checks() {
    let mut pipeline = SystemsPipeline::new(World::new(), ());
    pipeline
        .add_world("scratch", World::new())
        .unwrap()
        .add(Leaky)
        .unwrap();
    pipeline.init().unwrap();
    assert!(pipeline.run().is_ok());
}
