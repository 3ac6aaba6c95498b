use super::{pool, spawn, Callback, Probe};
use crate::config::CollisionConfig;
use crate::debug::{CollisionDebugVisualizer, DebugPrimitive};
use crate::physics::{CellCoord, CollisionManager};

fn manager_with(config: CollisionConfig) -> CollisionManager {
    CollisionManager::new(config).unwrap()
}

fn manager() -> CollisionManager {
    manager_with(CollisionConfig::with_cell_size(10.0, 16))
}

#[test]
fn test_single_object_is_never_paired_with_itself() {
    let mut manager = manager();
    let mut objects = pool();
    let a = spawn(&mut objects, &mut manager, Probe::at(1.0, 1.0, 1.0, 5.0));

    let stats = manager.update(&mut objects);

    assert_eq!(stats.pair_tests, 0);
    assert!(objects[a].log.is_empty());
}

#[test]
fn test_same_cell_pair_is_tested_once() {
    let mut manager = manager();
    let mut objects = pool();
    let a = spawn(&mut objects, &mut manager, Probe::at(2.0, 2.0, 2.0, 1.0));
    let b = spawn(&mut objects, &mut manager, Probe::at(7.0, 7.0, 7.0, 1.0));

    let stats = manager.update(&mut objects);

    let cell = manager.grid().bucket(CellCoord::new(0, 0, 0)).unwrap();
    assert_eq!(cell.len(), 2);
    assert_eq!(manager.grid().cell_count(), 1);
    assert_eq!(stats.pair_tests, 1);
    assert_eq!(stats.overlaps, 0);
    assert!(!manager.is_colliding(a, b));
}

#[test]
fn test_overlap_across_cell_boundary_is_detected() {
    let mut manager = manager();
    let mut objects = pool();
    let a = spawn(&mut objects, &mut manager, Probe::at(5.5, 5.0, 5.0, 5.0));
    let b = spawn(&mut objects, &mut manager, Probe::at(14.5, 5.0, 5.0, 5.0));

    assert_eq!(manager.grid().cell_of(&objects[a].position), CellCoord::new(0, 0, 0));
    assert_eq!(manager.grid().cell_of(&objects[b].position), CellCoord::new(1, 0, 0));

    let stats = manager.update(&mut objects);

    // Tested once through the neighbor pass, not once from each side
    assert_eq!(stats.pair_tests, 1);
    assert!(manager.is_colliding(a, b));
    assert_eq!(objects[a].enters(), 1);
    assert_eq!(objects[b].enters(), 1);
}

#[test]
fn test_overlap_across_origin_with_negative_cells() {
    let mut manager = manager();
    let mut objects = pool();
    let a = spawn(&mut objects, &mut manager, Probe::at(-0.5, -0.5, -0.5, 1.0));
    let b = spawn(&mut objects, &mut manager, Probe::at(0.5, 0.5, 0.5, 1.0));

    manager.update(&mut objects);

    assert_eq!(manager.grid().cell_count(), 2);
    assert!(manager.is_colliding(a, b));
}

#[test]
fn test_diagonal_neighbor_is_searched() {
    let mut manager = manager();
    let mut objects = pool();
    let a = spawn(&mut objects, &mut manager, Probe::at(9.5, 9.5, 9.5, 1.0));
    let b = spawn(&mut objects, &mut manager, Probe::at(10.5, 10.5, 10.5, 1.0));

    manager.update(&mut objects);

    assert!(manager.is_colliding(a, b));
}

#[test]
fn test_wider_neighbor_radius_reaches_two_cells() {
    let mut near = manager();
    let mut wide = manager_with(CollisionConfig {
        neighbor_radius: 2,
        ..CollisionConfig::with_cell_size(10.0, 16)
    });

    let mut objects = pool();
    let a = objects.insert(Probe::at(9.0, 5.0, 5.0, 6.0));
    let b = objects.insert(Probe::at(21.0, 5.0, 5.0, 7.0));
    for manager in [&mut near, &mut wide] {
        manager.register_object(a);
        manager.register_object(b);
    }

    near.update(&mut objects);
    assert!(!near.is_colliding(a, b));

    wide.update(&mut objects);
    assert!(wide.is_colliding(a, b));
}

#[test]
fn test_distant_cells_are_skipped_when_nothing_can_touch() {
    let config = CollisionConfig {
        neighbor_radius: 2,
        ..CollisionConfig::with_cell_size(10.0, 16)
    };

    let mut skipping = manager_with(config.clone());
    let mut exhaustive = manager_with(CollisionConfig { skip_distant_cells: false, ..config });

    let mut objects = pool();
    let a = objects.insert(Probe::at(9.0, 5.0, 5.0, 1.0));
    let b = objects.insert(Probe::at(21.0, 5.0, 5.0, 1.0));
    for manager in [&mut skipping, &mut exhaustive] {
        manager.register_object(a);
        manager.register_object(b);
    }

    let skipped = skipping.update(&mut objects);
    assert_eq!(skipped.pair_tests, 0);
    assert_eq!(skipped.neighbor_cells_skipped, 1);

    let tested = exhaustive.update(&mut objects);
    assert_eq!(tested.pair_tests, 1);
    assert_eq!(tested.overlaps, 0);
}

#[test]
fn test_crowded_cell_skips_intra_cell_tests() {
    let mut manager = manager_with(CollisionConfig {
        max_objects_per_cell: 4,
        ..CollisionConfig::with_cell_size(10.0, 16)
    });
    let mut objects = pool();
    for i in 0..5 {
        spawn(&mut objects, &mut manager, Probe::at(1.0 + i as f32, 1.0, 1.0, 1.0));
    }

    let stats = manager.update(&mut objects);

    assert_eq!(stats.crowded_cells_skipped, 1);
    assert_eq!(stats.pair_tests, 0);
    assert_eq!(manager.pair_state_count(), 0);
}

#[test]
fn test_crowded_cell_keeps_overlap_episode_alive() {
    let mut manager = manager();
    let mut objects = pool();
    let a = spawn(&mut objects, &mut manager, Probe::at(0.5, 0.5, 0.5, 1.0));
    let b = spawn(&mut objects, &mut manager, Probe::at(1.5, 0.5, 0.5, 1.0));
    manager.update(&mut objects);

    // Twenty more objects push the bucket past the default cap of 20
    let fillers: Vec<_> = (0..20)
        .map(|i| {
            let x = 5.0 + (i % 5) as f32 * 0.8;
            let y = 5.0 + (i / 5) as f32 * 0.8;
            spawn(&mut objects, &mut manager, Probe::at(x, y, 8.0, 0.01))
        })
        .collect();

    let stats = manager.update(&mut objects);
    assert_eq!(stats.crowded_cells_skipped, 1);
    assert_eq!(stats.pair_tests, 0);
    assert_eq!(stats.exits, 0);
    assert_eq!(stats.stays, 1);
    assert!(manager.is_colliding(a, b));

    for filler in fillers {
        manager.unregister_object(filler);
        objects.remove(filler);
    }
    let stats = manager.update(&mut objects);
    assert_eq!(stats.crowded_cells_skipped, 0);
    assert_eq!(stats.enters, 0);

    assert_eq!(objects[a].enters(), 1);
    assert_eq!(objects[a].exits(), 0);
    assert_eq!(
        objects[a].log,
        vec![Callback::Enter(b), Callback::Stay(b), Callback::Stay(b)]
    );
}

#[test]
fn test_crowded_cell_still_exits_separated_pair() {
    let mut manager = manager_with(CollisionConfig {
        max_objects_per_cell: 2,
        ..CollisionConfig::with_cell_size(10.0, 16)
    });
    let mut objects = pool();
    let a = spawn(&mut objects, &mut manager, Probe::at(0.5, 0.5, 0.5, 1.0));
    let b = spawn(&mut objects, &mut manager, Probe::at(1.5, 0.5, 0.5, 1.0));
    manager.update(&mut objects);

    spawn(&mut objects, &mut manager, Probe::at(8.0, 8.0, 8.0, 0.1));
    objects[b].position.x = 6.0;
    let stats = manager.update(&mut objects);

    assert_eq!(stats.crowded_cells_skipped, 1);
    assert_eq!(stats.exits, 1);
    assert_eq!(objects[a].log, vec![Callback::Enter(b), Callback::Exit(b)]);
    assert!(!manager.is_colliding(a, b));
}

#[test]
fn test_bucket_at_cap_is_still_tested() {
    let mut manager = manager_with(CollisionConfig {
        max_objects_per_cell: 3,
        ..CollisionConfig::with_cell_size(10.0, 16)
    });
    let mut objects = pool();
    for i in 0..3 {
        spawn(&mut objects, &mut manager, Probe::at(1.0 + i as f32, 1.0, 1.0, 1.0));
    }

    let stats = manager.update(&mut objects);

    assert_eq!(stats.crowded_cells_skipped, 0);
    assert_eq!(stats.pair_tests, 3);
    assert_eq!(manager.pair_state_count(), 3);
}

#[test]
fn test_crowded_neighbor_skips_cross_cell_tests() {
    let mut manager = manager_with(CollisionConfig {
        max_objects_per_neighbor_cell: 2,
        ..CollisionConfig::with_cell_size(10.0, 16)
    });
    let mut objects = pool();
    for i in 0..3 {
        spawn(&mut objects, &mut manager, Probe::at(7.0 + i as f32, 5.0, 5.0, 0.4));
    }
    let outsider = spawn(&mut objects, &mut manager, Probe::at(10.5, 5.0, 5.0, 1.0));

    let stats = manager.update(&mut objects);

    assert_eq!(stats.neighbor_cells_skipped, 1);
    assert!(manager.touching(outsider).is_empty());
}

#[test]
fn test_debug_sink_receives_frame() {
    let mut manager = manager_with(CollisionConfig {
        debug_draw: true,
        ..CollisionConfig::with_cell_size(10.0, 16)
    })
    .with_debug_sink(Box::new(CollisionDebugVisualizer::new()));

    let mut objects = pool();
    spawn(&mut objects, &mut manager, Probe::at(1.0, 1.0, 1.0, 1.0));
    spawn(&mut objects, &mut manager, Probe::at(2.0, 1.0, 1.0, 1.0));

    manager.update(&mut objects);
    manager.update(&mut objects);

    let viz = manager
        .debug_sink()
        .and_then(|sink| sink.as_any().downcast_ref::<CollisionDebugVisualizer>())
        .unwrap();
    let shapes: Vec<_> = viz.shapes().collect();

    // One cell box and two spheres, and only from the latest frame
    assert_eq!(shapes.len(), 3);
    let boxes = shapes
        .iter()
        .filter(|s| matches!(s.primitive, DebugPrimitive::Box { .. }))
        .count();
    assert_eq!(boxes, 1);
}
