//! # World Lifecycle Tests
//!
//! End-to-end behavior of entities, pools, filters and packed references
//! through the public API.

use strata_core::{Component, Entity, World, WorldConfig};

#[derive(Clone, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Stunned;
impl Component for Stunned {}

#[derive(Clone, Debug, Default, PartialEq)]
struct Path {
    waypoints: Vec<(i32, i32)>,
    cleared: u32,
}

impl Path {
    fn reset(&mut self) {
        self.waypoints.clear();
        self.cleared += 1;
    }
}

impl Component for Path {
    const AUTO_RESET: Option<fn(&mut Self)> = Some(Self::reset);
}

// ============================================================================
// ENTITY LIFETIME
// ============================================================================

#[test]
fn alive_iff_components_after_first_add() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    let stunned = world.pool::<Stunned>();

    // Documented transient: alive with zero components right after creation.
    let e = world.new_entity();
    assert!(world.is_entity_alive(e));
    assert_eq!(world.component_count(e), 0);

    position.add(&mut world, e);
    stunned.add(&mut world, e);
    assert_eq!(world.component_count(e), 2);

    position.del(&mut world, e);
    assert!(world.is_entity_alive(e));
    stunned.del(&mut world, e);
    assert!(!world.is_entity_alive(e));
    assert_eq!(world.component_count(e), 0);
}

#[test]
fn has_tracks_add_del_parity() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    let stunned = world.pool::<Stunned>();
    let e = world.new_entity();
    stunned.add(&mut world, e);

    for round in 0..6 {
        if round % 2 == 0 {
            position.add(&mut world, e);
        } else {
            position.del(&mut world, e);
            position.del(&mut world, e);
        }
        assert_eq!(position.has(&world, e), round % 2 == 0);
    }
}

#[test]
fn removing_last_component_equals_deleting() {
    let mut world = World::new();
    let position = world.pool::<Position>();

    let a = world.new_entity();
    position.add(&mut world, a);
    let packed_a = world.pack(a);
    position.del(&mut world, a);

    let b = world.new_entity();
    position.add(&mut world, b);
    let packed_b = world.pack(b);
    world.del_entity(b);

    assert_eq!(packed_a.unpack(&world), None);
    assert_eq!(packed_b.unpack(&world), None);
    assert_eq!(world.entity_generation(a), world.entity_generation(b));
    assert_eq!(world.entities_count(), 0);

    // LIFO recycling: b went last, comes back first.
    assert_eq!(world.new_entity(), b);
    assert_eq!(world.new_entity(), a);
}

#[test]
fn pack_round_trip_and_staleness() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    let e = world.new_entity();
    position.add(&mut world, e).x = 3.0;

    let packed = world.pack(e);
    let unpacked = packed.unpack(&world).expect("freshly packed entity");
    assert_eq!(unpacked, e);
    assert_eq!(position.get(&world, unpacked).x, 3.0);

    world.del_entity(e);
    assert!(packed.unpack(&world).is_none());
}

// ============================================================================
// FILTERS
// ============================================================================

#[test]
fn include_exclude_scenario() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    let stunned = world.pool::<Stunned>();

    let e1 = world.new_entity();
    position.add(&mut world, e1);

    let with_position = world.filter::<Position>().end();
    let movable = world.filter::<Position>().exc::<Stunned>().end();
    assert_eq!(world.filter_entities(with_position), &[e1]);
    assert_eq!(world.filter_entities(movable), &[e1]);

    stunned.add(&mut world, e1);
    assert!(world.filter_entities(movable).is_empty());

    stunned.del(&mut world, e1);
    assert_eq!(world.filter_entities(movable), &[e1]);
}

#[test]
fn mutation_visible_only_after_iteration() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    let stunned = world.pool::<Stunned>();
    let movable = world.filter::<Position>().exc::<Stunned>().end();

    let spawned: Vec<Entity> = (0..5)
        .map(|i| {
            let e = world.new_entity();
            position.add(&mut world, e).x = i as f32;
            e
        })
        .collect();

    let mut first_pass = Vec::new();
    world.for_each(movable, |world, e| {
        first_pass.push(e);
        // Stun everyone, and spawn a newcomer that already qualifies.
        stunned.add(world, e);
        let fresh = world.new_entity();
        position.add(world, fresh);
        assert_eq!(world.filter_len(movable), 5);
    });
    assert_eq!(first_pass, spawned);

    let mut second_pass = Vec::new();
    world.for_each(movable, |_, e| second_pass.push(e));
    assert_eq!(second_pass.len(), 5);
    assert!(second_pass.iter().all(|e| !spawned.contains(e)));
}

#[test]
fn deleting_entities_while_iterating() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    let all = world.filter::<Position>().end();
    for _ in 0..8 {
        let e = world.new_entity();
        position.add(&mut world, e);
    }

    let mut visits = 0;
    world.for_each(all, |world, e| {
        visits += 1;
        if world.is_entity_alive(e) {
            world.del_entity(e);
        }
    });

    assert_eq!(visits, 8);
    assert_eq!(world.filter_len(all), 0);
    assert_eq!(world.entities_count(), 0);
}

// ============================================================================
// STORAGE
// ============================================================================

#[test]
fn auto_reset_hook_clears_recycled_slots() {
    let mut world = World::new();
    let path = world.pool::<Path>();
    let position = world.pool::<Position>();

    let e = world.new_entity();
    position.add(&mut world, e);
    path.add(&mut world, e).waypoints.extend([(1, 1), (2, 2)]);
    path.del(&mut world, e);

    let other = world.new_entity();
    position.add(&mut world, other);
    let recycled = path.add(&mut world, other);
    assert!(recycled.waypoints.is_empty());
    // Fresh slot reset once, removal reset again; Default never overwrote it.
    assert_eq!(recycled.cleared, 2);
}

#[test]
fn default_reset_clears_values() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    let e = world.new_entity();
    *position.add(&mut world, e) = Position { x: 4.0, y: 5.0 };
    world.del_entity(e);

    let e = world.new_entity();
    assert_eq!(position.add(&mut world, e), &Position::default());
}

#[test]
fn dense_storage_iteration() {
    let mut world = World::new();
    let position = world.pool::<Position>();
    for i in 0..4 {
        let e = world.new_entity();
        position.add(&mut world, e).x = i as f32;
    }

    for p in world.storage_mut(position).components_mut() {
        p.y = p.x * 2.0;
    }
    let storage = world.storage(position);
    assert_eq!(storage.len(), 4);
    for (e, p) in storage.iter() {
        assert_eq!(position.get(&world, e).y, p.x * 2.0);
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn world_from_toml_config() {
    let config = WorldConfig::from_toml_str(
        r#"
        entities = 4
        pool_dense_size = 2
        "#,
    )
    .expect("valid config");
    let mut world = World::with_config(config);
    assert_eq!(world.world_size(), 4);

    let position = world.pool::<Position>();
    for _ in 0..9 {
        let e = world.new_entity();
        position.add(&mut world, e);
    }
    assert_eq!(world.world_size(), 16);
    assert_eq!(world.storage(position).len(), 9);
}

#[test]
fn zero_capacity_config_rejected() {
    let err = WorldConfig::from_toml_str("filters = 0").unwrap_err();
    assert!(err.to_string().contains("filters"));
}
