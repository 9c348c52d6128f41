//! # Filter Model Checks
//!
//! Drives a world through seeded random structural changes and compares
//! every filter against a brute-force scan after each step.
//!
//! Run with: cargo test -p strata_core --test filter_model

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::{Component, Entity, FilterId, Pool, World};

#[derive(Clone, Default)]
struct A(u32);
impl Component for A {}

#[derive(Clone, Default)]
struct B(u32);
impl Component for B {}

#[derive(Clone, Default)]
struct C(u32);
impl Component for C {}

/// Pool handles addressed by kind: 0 = A, 1 = B, 2 = C.
struct Pools {
    a: Pool<A>,
    b: Pool<B>,
    c: Pool<C>,
}

impl Pools {
    fn new(world: &mut World) -> Self {
        Self {
            a: world.pool::<A>(),
            b: world.pool::<B>(),
            c: world.pool::<C>(),
        }
    }

    fn has(&self, world: &World, kind: usize, e: Entity) -> bool {
        match kind {
            0 => self.a.has(world, e),
            1 => self.b.has(world, e),
            _ => self.c.has(world, e),
        }
    }

    /// Adds the component if missing, removes it otherwise.
    fn toggle(&self, world: &mut World, kind: usize, e: Entity) {
        if self.has(world, kind, e) {
            match kind {
                0 => self.a.del(world, e),
                1 => self.b.del(world, e),
                _ => self.c.del(world, e),
            }
        } else {
            match kind {
                0 => self.a.add(world, e).0 = 1,
                1 => self.b.add(world, e).0 = 1,
                _ => self.c.add(world, e).0 = 1,
            }
        }
    }
}

/// (include kinds, exclude kinds) per registered filter.
struct Masks(Vec<(FilterId, Vec<usize>, Vec<usize>)>);

impl Masks {
    fn register(world: &mut World) -> Self {
        Self(vec![
            (world.filter::<A>().end(), vec![0], vec![]),
            (world.filter::<A>().inc::<B>().end(), vec![0, 1], vec![]),
            (world.filter::<A>().exc::<B>().end(), vec![0], vec![1]),
            (world.filter::<C>().exc::<A>().exc::<B>().end(), vec![2], vec![0, 1]),
            (world.filter::<B>().inc::<C>().exc::<A>().end(), vec![1, 2], vec![0]),
        ])
    }

    fn assert_consistent(&self, world: &World, pools: &Pools) {
        let mut alive = Vec::new();
        world.all_entities(&mut alive);

        for (filter, include, exclude) in &self.0 {
            let mut expected: Vec<Entity> = alive
                .iter()
                .copied()
                .filter(|&e| {
                    include.iter().all(|&k| pools.has(world, k, e))
                        && !exclude.iter().any(|&k| pools.has(world, k, e))
                })
                .collect();
            let mut actual = world.filter_entities(*filter).to_vec();
            expected.sort_unstable();
            actual.sort_unstable();
            assert_eq!(actual, expected, "filter {include:?} / {exclude:?}");
        }
    }
}

fn random_alive(world: &World, rng: &mut ChaCha8Rng) -> Option<Entity> {
    let mut alive = Vec::new();
    if world.all_entities(&mut alive) == 0 {
        return None;
    }
    Some(alive[rng.gen_range(0..alive.len())])
}

#[test]
fn filters_match_brute_force_under_churn() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let mut world = World::new();
    let pools = Pools::new(&mut world);
    let masks = Masks::register(&mut world);

    for _ in 0..4_000 {
        match rng.gen_range(0..10) {
            0..=2 => {
                let e = world.new_entity();
                pools.toggle(&mut world, rng.gen_range(0..3), e);
            }
            3..=7 => {
                if let Some(e) = random_alive(&world, &mut rng) {
                    pools.toggle(&mut world, rng.gen_range(0..3), e);
                }
            }
            _ => {
                if let Some(e) = random_alive(&world, &mut rng) {
                    world.del_entity(e);
                }
            }
        }
        masks.assert_consistent(&world, &pools);
    }
    assert!(!world.check_for_leaked_entities());
}

#[test]
fn late_filters_match_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut world = World::new();
    let pools = Pools::new(&mut world);

    for _ in 0..500 {
        let e = world.new_entity();
        pools.toggle(&mut world, rng.gen_range(0..3), e);
        for _ in 0..rng.gen_range(0..3) {
            if !world.is_entity_alive(e) {
                break;
            }
            pools.toggle(&mut world, rng.gen_range(0..3), e);
        }
    }

    // Registered after the population exists: initial scan must be exact.
    let masks = Masks::register(&mut world);
    masks.assert_consistent(&world, &pools);
}

#[test]
fn iteration_sees_entry_snapshot_under_churn() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut world = World::new();
    let pools = Pools::new(&mut world);
    let masks = Masks::register(&mut world);

    for _ in 0..300 {
        let e = world.new_entity();
        pools.toggle(&mut world, rng.gen_range(0..3), e);
    }

    for round in 0..50 {
        let (filter, _, _) = &masks.0[round % masks.0.len()];
        let snapshot = world.filter_entities(*filter).to_vec();

        let mut visited = Vec::new();
        world.for_each(*filter, |world, e| {
            visited.push(e);
            for _ in 0..2 {
                if let Some(target) = random_alive(world, &mut rng) {
                    pools.toggle(world, rng.gen_range(0..3), target);
                }
            }
            if rng.gen_bool(0.1) {
                let spawned = world.new_entity();
                pools.toggle(world, rng.gen_range(0..3), spawned);
            }
        });

        assert_eq!(visited, snapshot);
        assert_eq!(world.get_filter(*filter).pending_ops(), 0);
        masks.assert_consistent(&world, &pools);
    }
}
