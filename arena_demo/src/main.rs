//! Headless arena driving the collision engine
//!
//! Usage: `arena_demo [config.toml|config.ron]`
//!
//! A player sits in the middle of a box arena shooting at wandering enemies,
//! enemies lob missiles back, and weapon pickups are scattered around. Every
//! frame the actors move, get (re)registered with the collision manager, and
//! react to whatever they hit through their collision callbacks.

mod actor;

use std::collections::BTreeMap;

use collision_engine::prelude::*;
use rand::prelude::*;

use crate::actor::{Actor, CallbackCounts};

const FRAMES: usize = 600;
const DT: f32 = 1.0 / 60.0;
const ARENA_HALF_EXTENT: f32 = 60.0;
const NUM_ENEMIES: usize = 40;
const NUM_PICKUPS: usize = 6;
const FIRE_INTERVAL: usize = 6;
const MISSILE_CHANCE: f64 = 0.002;
const BULLET_SPEED: f32 = 45.0;
const MISSILE_SPEED: f32 = 12.0;
const RNG_SEED: u64 = 0x5eed;

fn random_point(rng: &mut StdRng, half_extent: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-half_extent..half_extent),
        rng.gen_range(-half_extent..half_extent),
        rng.gen_range(-half_extent..half_extent),
    )
}

fn load_config() -> Result<CollisionConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading collision config from {}", path);
            Ok(CollisionConfig::load_from_file(&path)?)
        }
        None => Ok(CollisionConfig::with_cell_size(8.0, 256)),
    }
}

struct Arena {
    actors: ObjectPool<Actor>,
    collisions: CollisionManager,
    player: ObjectHandle,
    rng: StdRng,
    totals: BTreeMap<CollisionCategory, CallbackCounts>,
    destroyed: BTreeMap<CollisionCategory, u32>,
}

impl Arena {
    fn new(config: CollisionConfig) -> Result<Self, CollisionError> {
        let mut actors = ObjectPool::with_capacity_and_key(config.max_objects_hint);
        let collisions = CollisionManager::new(config)?;
        let mut rng = StdRng::seed_from_u64(RNG_SEED);

        let player = actors.insert(Actor::player(Vec3::zeros()));
        for _ in 0..NUM_ENEMIES {
            let position = random_point(&mut rng, ARENA_HALF_EXTENT);
            let velocity = random_point(&mut rng, 6.0);
            actors.insert(Actor::enemy(position, velocity));
        }
        for _ in 0..NUM_PICKUPS {
            actors.insert(Actor::weapon_pickup(random_point(&mut rng, ARENA_HALF_EXTENT * 0.5)));
        }

        Ok(Self {
            actors,
            collisions,
            player,
            rng,
            totals: BTreeMap::new(),
            destroyed: BTreeMap::new(),
        })
    }

    fn player_alive(&self) -> bool {
        self.actors.get(self.player).map_or(false, |p| !p.destroyed)
    }

    fn nearest_enemy(&self, from: Vec3) -> Option<Vec3> {
        self.actors
            .values()
            .filter(|a| a.kind == CollisionCategory::Enemy && !a.destroyed)
            .map(|a| a.position)
            .min_by(|a, b| (a - from).norm_squared().total_cmp(&(b - from).norm_squared()))
    }

    fn spawn_projectiles(&mut self, frame: usize) {
        let Some(player) = self.actors.get(self.player) else {
            return;
        };
        let player_position = player.position;
        let spread = 0.02 * player.weapon_level as f32;

        if frame % FIRE_INTERVAL == 0 {
            if let Some(target) = self.nearest_enemy(player_position) {
                if let Some(dir) = (target - player_position).try_normalize(f32::EPSILON) {
                    let jitter = random_point(&mut self.rng, spread + f32::EPSILON);
                    self.actors.insert(Actor::bullet(player_position, (dir + jitter) * BULLET_SPEED));
                }
            }
        }

        let launchers: Vec<Vec3> = self
            .actors
            .values()
            .filter(|a| a.kind == CollisionCategory::Enemy && !a.destroyed)
            .map(|a| a.position)
            .collect();
        for origin in launchers {
            if self.rng.gen_bool(MISSILE_CHANCE) {
                if let Some(dir) = (player_position - origin).try_normalize(f32::EPSILON) {
                    self.actors.insert(Actor::missile(origin, dir * MISSILE_SPEED));
                }
            }
        }
    }

    /// Unregister and drop everything flagged as destroyed
    fn sweep(&mut self) {
        let dead: Vec<ObjectHandle> = self
            .actors
            .iter()
            .filter(|(_, a)| a.destroyed)
            .map(|(handle, _)| handle)
            .collect();

        for handle in dead {
            self.collisions.unregister_object(handle);
            if let Some(actor) = self.actors.remove(handle) {
                *self.totals.entry(actor.kind).or_default() += actor.counts;
                *self.destroyed.entry(actor.kind).or_default() += 1;
            }
        }
    }

    fn step(&mut self, frame: usize) -> CollisionStats {
        self.spawn_projectiles(frame);

        for actor in self.actors.values_mut() {
            actor.advance(DT, ARENA_HALF_EXTENT);
        }
        self.sweep();

        // Registration is idempotent, so every live actor is offered each frame
        let handles: Vec<ObjectHandle> = self.actors.keys().collect();
        for handle in handles {
            self.collisions.register_object(handle);
        }

        let stats = self.collisions.update(&mut self.actors);
        self.sweep();
        stats
    }

    fn report(&mut self) {
        for actor in self.actors.values() {
            *self.totals.entry(actor.kind).or_default() += actor.counts;
        }

        for category in CollisionCategory::ALL {
            let counts = self.totals.get(&category).copied().unwrap_or_default();
            let destroyed = self.destroyed.get(&category).copied().unwrap_or_default();
            log::info!(
                "{:?}: {} enter, {} stay, {} exit, {} destroyed",
                category,
                counts.enters,
                counts.stays,
                counts.exits,
                destroyed
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    collision_engine::foundation::logging::init_with_default("info");

    println!("=== Collision Arena ===");

    let config = load_config()?;
    config.validate()?;
    log::info!(
        "Cell size {}, neighbor radius {}, skip distant cells {}",
        config.cell_size,
        config.neighbor_radius,
        config.skip_distant_cells
    );

    let mut arena = Arena::new(config)?;
    let mut frames_run = 0;
    let mut peak_tests = 0;

    for frame in 0..FRAMES {
        let stats = arena.step(frame);
        frames_run = frame + 1;
        peak_tests = peak_tests.max(stats.pair_tests);

        log::debug!(
            "Frame {}: {} objects in {} cells, {} tests, {} enter / {} stay / {} exit",
            frame,
            stats.objects_bucketed,
            stats.occupied_cells,
            stats.pair_tests,
            stats.enters,
            stats.stays,
            stats.exits
        );

        if !arena.player_alive() {
            log::info!("Player destroyed on frame {}", frame);
            break;
        }
    }

    println!("Simulated {} frames, peak {} pair tests in one frame", frames_run, peak_tests);
    if let Some(player) = arena.actors.get(arena.player) {
        println!("Player health {}, weapon level {}", player.health, player.weapon_level);
    }
    arena.report();

    Ok(())
}
