//! Per-frame collision pass and enter/stay/exit lifecycle tracking
//!
//! The manager owns three things: the registry of active handles, the spatial
//! hash grid, and the pair-state map. It owns no objects; those live in the
//! caller's [`ObjectPool`] and are borrowed for the duration of
//! [`CollisionManager::update`].
//!
//! One update runs, in order:
//! 1. clear the grid and re-bucket every registered object by its collider center
//! 2. test all pairs inside each bucket (skipping crowded buckets)
//! 3. test all pairs across each unordered pair of neighboring buckets
//! 4. feed every tested pair, in canonical pair order, through
//!    [`CollisionManager::process_collision`]
//! 5. settle colliding pairs the broad phase skipped: re-check them directly
//!    when both objects were bucketed, leave them untouched when one side sat
//!    the frame out
//!
//! Per pair the state machine is `NotColliding` (absent from the map) and
//! `Colliding` (present). Entering fires `on_collision_enter` on both objects,
//! staying fires `on_collision_stay`, leaving fires `on_collision_exit` and
//! erases the entry.

use crate::config::CollisionConfig;
use crate::debug::collision_debug::CollisionDebugSink;
use crate::error::CollisionError;
use crate::foundation::collections::{FxHashMap, FxHashSet, ObjectHandle, ObjectPool};
use crate::physics::collidable::{Collidable, CollisionContact};
use crate::physics::collision_pair::CollisionPair;
use crate::physics::spatial_hash::{GridEntry, SpatialHashGrid};

/// Lifecycle transition produced for a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionTransition {
    /// Started overlapping this frame
    Enter,
    /// Still overlapping
    Stay,
    /// Stopped overlapping this frame
    Exit,
}

/// Counters describing one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Objects placed into the grid
    pub objects_bucketed: usize,
    /// Registered objects left out (no collider, invalid collider, or removed from the pool)
    pub objects_excluded: usize,
    /// Non-empty buckets after the rebuild
    pub occupied_cells: usize,
    /// Buckets whose intra-cell tests were skipped for crowding
    pub crowded_cells_skipped: usize,
    /// Neighbor bucket pairs skipped for crowding or distance
    pub neighbor_cells_skipped: usize,
    /// Narrow-phase tests performed
    pub pair_tests: usize,
    /// Tests that found an overlap
    pub overlaps: usize,
    /// Enter transitions
    pub enters: usize,
    /// Stay transitions
    pub stays: usize,
    /// Exit transitions
    pub exits: usize,
}

impl CollisionStats {
    fn record(&mut self, transition: CollisionTransition) {
        match transition {
            CollisionTransition::Enter => self.enters += 1,
            CollisionTransition::Stay => self.stays += 1,
            CollisionTransition::Exit => self.exits += 1,
        }
    }
}

/// Persisted state of a colliding pair; presence in the map means colliding
#[derive(Debug, Clone, Copy)]
struct PairState {
    touching: bool,
}

/// A pair that went through the narrow phase this frame
#[derive(Debug, Clone, Copy)]
struct TestedPair {
    pair: CollisionPair,
    first: GridEntry,
    second: GridEntry,
    touching: bool,
}

fn contact_of(entry: &GridEntry) -> CollisionContact {
    CollisionContact {
        handle: entry.handle,
        category: entry.category,
        collider: entry.collider,
    }
}

/// Frame-driven collision manager with a spatial hash broad phase
pub struct CollisionManager {
    config: CollisionConfig,
    grid: SpatialHashGrid,

    /// Active handles in registration order, plus a set for idempotent add/remove
    registered: Vec<ObjectHandle>,
    registered_set: FxHashSet<ObjectHandle>,

    pair_states: FxHashMap<CollisionPair, PairState>,

    // Scratch buffers reused across frames
    entries: Vec<GridEntry>,
    bucketed: FxHashMap<ObjectHandle, GridEntry>,
    tested: Vec<TestedPair>,
    tested_set: FxHashSet<CollisionPair>,

    debug_sink: Option<Box<dyn CollisionDebugSink>>,
    last_stats: CollisionStats,
}

impl CollisionManager {
    /// Create a manager from a full configuration
    pub fn new(config: CollisionConfig) -> Result<Self, CollisionError> {
        config.validate()?;

        let capacity = config.max_objects_hint;
        let mut grid = SpatialHashGrid::new(config.cell_size)?;
        grid.reserve(capacity);

        log::debug!(
            "CollisionManager created: cell_size={}, capacity={}, neighbor_radius={}",
            config.cell_size,
            capacity,
            config.neighbor_radius
        );

        Ok(Self {
            config,
            grid,
            registered: Vec::with_capacity(capacity),
            registered_set: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
            pair_states: FxHashMap::default(),
            entries: Vec::with_capacity(capacity),
            bucketed: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            tested: Vec::new(),
            tested_set: FxHashSet::default(),
            debug_sink: None,
            last_stats: CollisionStats::default(),
        })
    }

    /// Attach a debug sink at construction time
    pub fn with_debug_sink(mut self, sink: Box<dyn CollisionDebugSink>) -> Self {
        self.debug_sink = Some(sink);
        self
    }

    /// Fix the cell size and capacity hint, and restore default guardrails
    ///
    /// Drops all buckets; registrations and pair state are kept.
    pub fn initialize(&mut self, cell_size: f32, max_objects_hint: usize) -> Result<(), CollisionError> {
        let defaults = CollisionConfig::default();
        let config = CollisionConfig {
            cell_size,
            max_objects_hint,
            neighbor_radius: defaults.neighbor_radius,
            skip_distant_cells: defaults.skip_distant_cells,
            ..self.config.clone()
        };
        config.validate()?;

        self.grid.set_cell_size(cell_size)?;
        self.grid.reserve(max_objects_hint);
        self.registered.reserve(max_objects_hint.saturating_sub(self.registered.len()));
        self.registered_set.reserve(max_objects_hint.saturating_sub(self.registered_set.len()));
        self.entries.reserve(max_objects_hint.saturating_sub(self.entries.len()));
        self.config = config;

        log::debug!("CollisionManager initialized: cell_size={}, capacity={}", cell_size, max_objects_hint);
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Change how many cells out the neighbor pass searches (1 or 2)
    pub fn set_neighbor_radius(&mut self, radius: u32) -> Result<(), CollisionError> {
        let config = CollisionConfig { neighbor_radius: radius, ..self.config.clone() };
        config.validate()?;
        if radius > 1 {
            log::warn!("Neighbor radius {} scans {} cells per bucket", radius, (2 * radius + 1).pow(3) - 1);
        }
        self.config = config;
        Ok(())
    }

    /// Toggle skipping of neighbor cells too far apart to contain touching objects
    pub fn set_skip_distant_cells(&mut self, skip: bool) {
        self.config.skip_distant_cells = skip;
    }

    /// Toggle debug drawing (only has an effect with a sink attached)
    pub fn set_debug_draw(&mut self, enabled: bool) {
        self.config.debug_draw = enabled;
    }

    /// Attach or detach the debug sink
    pub fn set_debug_sink(&mut self, sink: Option<Box<dyn CollisionDebugSink>>) {
        self.debug_sink = sink;
    }

    /// The attached debug sink
    pub fn debug_sink(&self) -> Option<&dyn CollisionDebugSink> {
        self.debug_sink.as_deref()
    }

    /// The attached debug sink, mutably
    pub fn debug_sink_mut(&mut self) -> Option<&mut (dyn CollisionDebugSink + 'static)> {
        self.debug_sink.as_deref_mut()
    }

    /// Add an object to the active set; returns false if it was already registered
    pub fn register_object(&mut self, handle: ObjectHandle) -> bool {
        if !self.registered_set.insert(handle) {
            return false;
        }
        self.registered.push(handle);
        true
    }

    /// Remove an object from the active set and forget every pair it was part of
    ///
    /// No exit callbacks fire for the purged pairs. Returns false if the handle
    /// was not registered.
    pub fn unregister_object(&mut self, handle: ObjectHandle) -> bool {
        let was_registered = self.registered_set.remove(&handle);
        if was_registered {
            self.registered.retain(|&h| h != handle);
        }

        let purged = self.purge_pairs_of(handle);
        if purged > 0 {
            log::debug!("Unregistered {:?}: purged {} pair states", handle, purged);
        }
        was_registered
    }

    fn purge_pairs_of(&mut self, handle: ObjectHandle) -> usize {
        let before = self.pair_states.len();
        self.pair_states.retain(|pair, _| !pair.contains(handle));
        before - self.pair_states.len()
    }

    /// Whether a handle is in the active set
    pub fn is_registered(&self, handle: ObjectHandle) -> bool {
        self.registered_set.contains(&handle)
    }

    /// Number of registered objects
    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Number of pairs currently colliding
    pub fn pair_state_count(&self) -> usize {
        self.pair_states.len()
    }

    /// Whether two objects are currently colliding
    pub fn is_colliding(&self, a: ObjectHandle, b: ObjectHandle) -> bool {
        self.pair_states
            .get(&CollisionPair::new(a, b))
            .is_some_and(|state| state.touching)
    }

    /// Objects currently colliding with `handle`, in handle order
    pub fn touching(&self, handle: ObjectHandle) -> Vec<ObjectHandle> {
        let mut others: Vec<ObjectHandle> = self
            .pair_states
            .iter()
            .filter(|(_, state)| state.touching)
            .filter_map(|(pair, _)| pair.other(handle))
            .collect();
        others.sort_unstable();
        others
    }

    /// The grid as of the last update
    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    /// Statistics from the last update
    pub fn last_stats(&self) -> CollisionStats {
        self.last_stats
    }

    /// Forget every registration, bucket and pair state (scene teardown)
    pub fn reset(&mut self) {
        self.registered.clear();
        self.registered_set.clear();
        self.grid.clear_all();
        self.pair_states.clear();
        self.entries.clear();
        self.bucketed.clear();
        self.tested.clear();
        self.tested_set.clear();
        self.last_stats = CollisionStats::default();
        log::debug!("CollisionManager reset");
    }

    /// Run one collision pass over the registered objects
    ///
    /// Callbacks fire synchronously on the objects in `objects`. Pairs are
    /// processed in ascending [`CollisionPair`] order and within a pair the
    /// lower handle is notified first, so identical input always produces the
    /// same callback sequence.
    pub fn update<T: Collidable>(&mut self, objects: &mut ObjectPool<T>) -> CollisionStats {
        let mut stats = CollisionStats::default();

        if let Some(sink) = self.debug_sink.as_deref_mut() {
            sink.begin_frame();
        }

        // Steps 1 & 2: full rebuild of the grid
        self.collect_entries(objects, &mut stats);
        self.grid.assign_objects_to_grid(self.entries.drain(..));
        stats.occupied_cells = self.grid.cell_count();

        // Steps 3 & 4: broad phase with narrow-phase tests
        let mut tested = std::mem::take(&mut self.tested);
        tested.clear();
        Self::generate_pairs(&self.grid, &self.config, &mut stats, &mut tested);
        tested.sort_unstable_by_key(|t| t.pair);

        // Step 5: lifecycle transitions
        self.tested_set.clear();
        for t in &tested {
            self.tested_set.insert(t.pair);
            if let Some(transition) = self.process_collision(objects, &t.first, &t.second, t.touching) {
                stats.record(transition);
            }
        }
        self.settle_untested_pairs(objects, &mut stats);

        if self.config.debug_draw {
            if let Some(sink) = self.debug_sink.as_deref_mut() {
                Self::emit_debug(sink, &self.grid, &self.pair_states, &tested);
            }
        }

        self.tested = tested;
        self.last_stats = stats;

        log::trace!(
            "Collision update: {} bucketed, {} excluded, {} cells, {} tests, {} overlaps, enter/stay/exit {}/{}/{}",
            stats.objects_bucketed,
            stats.objects_excluded,
            stats.occupied_cells,
            stats.pair_tests,
            stats.overlaps,
            stats.enters,
            stats.stays,
            stats.exits
        );

        stats
    }

    /// Snapshot every registered object's collider into the entry buffer
    fn collect_entries<T: Collidable>(&mut self, objects: &ObjectPool<T>, stats: &mut CollisionStats) {
        self.entries.clear();
        self.bucketed.clear();
        let mut stale = Vec::new();

        for &handle in &self.registered {
            let Some(object) = objects.get(handle) else {
                stale.push(handle);
                continue;
            };

            match object.collider() {
                Some(collider) if collider.is_valid() => {
                    let entry = GridEntry {
                        handle,
                        collider,
                        category: object.category(),
                        mask: object.collision_mask(),
                    };
                    self.entries.push(entry);
                    self.bucketed.insert(handle, entry);
                }
                Some(collider) => {
                    log::trace!("Excluding {:?}: invalid collider {:?}", handle, collider);
                    stats.objects_excluded += 1;
                }
                None => {
                    log::trace!("Excluding {:?}: no collider this frame", handle);
                    stats.objects_excluded += 1;
                }
            }
        }

        // Objects removed from the pool without unregistering
        for handle in stale {
            log::debug!("Dropping stale handle {:?}", handle);
            stats.objects_excluded += 1;
            self.unregister_object(handle);
        }

        stats.objects_bucketed = self.entries.len();
    }

    /// Intra-bucket and neighbor-bucket candidate generation
    fn generate_pairs(
        grid: &SpatialHashGrid,
        config: &CollisionConfig,
        stats: &mut CollisionStats,
        out: &mut Vec<TestedPair>,
    ) {
        for coord in grid.occupied_cells() {
            let Some(bucket) = grid.bucket(coord) else {
                continue;
            };
            let entries = bucket.entries();

            if entries.len() <= config.max_objects_per_cell {
                for (i, a) in entries.iter().enumerate() {
                    for b in &entries[i + 1..] {
                        Self::test_pair(a, b, stats, out);
                    }
                }
            } else {
                log::trace!("Skipping crowded cell {:?} ({} objects)", coord, entries.len());
                stats.crowded_cells_skipped += 1;
            }

            let crowded = entries.len() > config.max_objects_per_neighbor_cell;
            for neighbor in grid.adjacent_cells(coord, config.neighbor_radius) {
                // Each unordered bucket pair is handled from its lower coordinate only
                if neighbor <= coord {
                    continue;
                }
                let Some(other) = grid.bucket(neighbor) else {
                    continue;
                };

                if crowded || other.len() > config.max_objects_per_neighbor_cell {
                    stats.neighbor_cells_skipped += 1;
                    continue;
                }
                if config.skip_distant_cells
                    && grid.cell_gap(coord, neighbor) > bucket.max_radius() + other.max_radius()
                {
                    stats.neighbor_cells_skipped += 1;
                    continue;
                }

                for a in entries {
                    for b in other.entries() {
                        Self::test_pair(a, b, stats, out);
                    }
                }
            }
        }
    }

    fn test_pair(a: &GridEntry, b: &GridEntry, stats: &mut CollisionStats, out: &mut Vec<TestedPair>) {
        if a.handle == b.handle || !a.accepts(b) {
            return;
        }

        stats.pair_tests += 1;
        let touching = a.collider.fast_intersects(&b.collider);
        if touching {
            stats.overlaps += 1;
        }

        let (first, second) = if a.handle < b.handle { (*a, *b) } else { (*b, *a) };
        out.push(TestedPair {
            pair: CollisionPair::new(a.handle, b.handle),
            first,
            second,
            touching,
        });
    }

    /// Apply one frame's test result for a pair to its persisted state
    ///
    /// Fires the matching callback on both objects (lower handle first) and
    /// returns the transition, or `None` when the pair stays apart.
    pub fn process_collision<T: Collidable>(
        &mut self,
        objects: &mut ObjectPool<T>,
        a: &GridEntry,
        b: &GridEntry,
        is_touching: bool,
    ) -> Option<CollisionTransition> {
        if a.handle == b.handle {
            return None;
        }

        let (first, second) = if a.handle <= b.handle { (a, b) } else { (b, a) };
        let pair = CollisionPair::new(first.handle, second.handle);
        let first_contact = contact_of(first);
        let second_contact = contact_of(second);

        let was_touching = self.pair_states.get(&pair).is_some_and(|state| state.touching);

        let transition = match (was_touching, is_touching) {
            (false, true) => CollisionTransition::Enter,
            (true, true) => CollisionTransition::Stay,
            (true, false) => CollisionTransition::Exit,
            (false, false) => return None,
        };

        if transition == CollisionTransition::Exit {
            self.pair_states.remove(&pair);
        } else {
            self.pair_states.insert(pair, PairState { touching: true });
        }

        Self::dispatch(objects, transition, &first_contact, &second_contact);
        Some(transition)
    }

    /// Resolve colliding pairs the broad phase did not produce this frame
    ///
    /// Crowd guards and the neighbor radius can leave a colliding pair
    /// untested. When both objects were bucketed the pair is re-checked from
    /// this frame's snapshots, so a continuing overlap stays and only a real
    /// separation (or a layer mask that now rejects the pair) exits. When
    /// either side was excluded this frame the pair is left as it was and no
    /// callback fires.
    fn settle_untested_pairs<T: Collidable>(&mut self, objects: &mut ObjectPool<T>, stats: &mut CollisionStats) {
        let mut untested: Vec<CollisionPair> = self
            .pair_states
            .keys()
            .filter(|pair| !self.tested_set.contains(pair))
            .copied()
            .collect();
        untested.sort_unstable();

        for pair in untested {
            if !objects.contains_key(pair.first()) || !objects.contains_key(pair.second()) {
                log::debug!("Dropping pair state {:?}: participant no longer exists", pair);
                self.pair_states.remove(&pair);
                continue;
            }

            let snapshots = (
                self.bucketed.get(&pair.first()).copied(),
                self.bucketed.get(&pair.second()).copied(),
            );
            let (Some(first), Some(second)) = snapshots else {
                log::trace!("Holding pair state {:?}: participant excluded this frame", pair);
                continue;
            };

            let touching = first.accepts(&second) && first.collider.fast_intersects(&second.collider);
            if let Some(transition) = self.process_collision(objects, &first, &second, touching) {
                stats.record(transition);
            }
        }
    }

    fn dispatch<T: Collidable>(
        objects: &mut ObjectPool<T>,
        transition: CollisionTransition,
        first: &CollisionContact,
        second: &CollisionContact,
    ) {
        for (target, other) in [(first.handle, second), (second.handle, first)] {
            let Some(object) = objects.get_mut(target) else {
                continue;
            };
            match transition {
                CollisionTransition::Enter => object.on_collision_enter(other),
                CollisionTransition::Stay => object.on_collision_stay(other),
                CollisionTransition::Exit => object.on_collision_exit(other),
            }
        }
    }

    fn emit_debug(
        sink: &mut dyn CollisionDebugSink,
        grid: &SpatialHashGrid,
        pair_states: &FxHashMap<CollisionPair, PairState>,
        tested: &[TestedPair],
    ) {
        let colliding: FxHashSet<ObjectHandle> = pair_states
            .keys()
            .flat_map(|pair| [pair.first(), pair.second()])
            .collect();

        for coord in grid.occupied_cells() {
            let Some(bucket) = grid.bucket(coord) else {
                continue;
            };
            let (center, half_extents) = grid.cell_bounds(coord);
            sink.draw_cell(coord, center, half_extents, bucket.len());

            for entry in bucket.entries() {
                sink.draw_collider(entry.handle, &entry.collider, colliding.contains(&entry.handle));
            }
        }

        for t in tested.iter().filter(|t| t.touching) {
            sink.draw_contact(&t.first.collider, &t.second.collider);
        }
    }
}
