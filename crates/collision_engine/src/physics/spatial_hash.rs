//! Uniform spatial hash grid for broad-phase candidate generation
//!
//! Space is cut into cubes of `cell_size` world units. Each occupied cube is a
//! bucket holding the objects whose collider *center* lies inside it this
//! frame. The grid keeps no state between frames: the manager clears and
//! refills it on every update.
//!
//! Buckets live in a sparse map, so coordinates may be negative and unbounded.
//! The map key is the integer [`CellCoord`] itself; its hash is the classic
//! XOR of each axis multiplied by a large prime. That combined value is *not*
//! invertible (different coordinates can share it, and the original axes
//! cannot be recovered from it), so every bucket stores its coordinate and the
//! map compares coordinates, never hashes, for equality.

use std::hash::{Hash, Hasher};

use crate::error::CollisionError;
use crate::foundation::collections::{FxHashMap, ObjectHandle};
use crate::foundation::math::{floor_scaled, Vec3};
use crate::physics::collision::Collider;
use crate::physics::collision_layers::{CollisionCategory, CollisionLayers};

/// Prime multiplier for the X axis
pub const HASH_PRIME_X: i64 = 73_856_093;
/// Prime multiplier for the Y axis
pub const HASH_PRIME_Y: i64 = 19_349_663;
/// Prime multiplier for the Z axis
pub const HASH_PRIME_Z: i64 = 83_492_791;

/// Integer coordinate of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellCoord {
    /// Cell index along X
    pub x: i32,
    /// Cell index along Y
    pub y: i32,
    /// Cell index along Z
    pub z: i32,
}

impl CellCoord {
    /// Create a cell coordinate
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Combined spatial hash of the three axes
    pub fn spatial_hash(self) -> i64 {
        i64::from(self.x).wrapping_mul(HASH_PRIME_X)
            ^ i64::from(self.y).wrapping_mul(HASH_PRIME_Y)
            ^ i64::from(self.z).wrapping_mul(HASH_PRIME_Z)
    }

    /// Neighbor at the given offset, or `None` past the edge of the `i32` range
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }
}

impl Hash for CellCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(self.spatial_hash());
    }
}

/// One object as seen by the grid for the current frame
#[derive(Debug, Clone, Copy)]
pub struct GridEntry {
    /// Handle into the caller's object pool
    pub handle: ObjectHandle,
    /// Collider snapshot taken when the grid was rebuilt
    pub collider: Collider,
    /// Category of the object
    pub category: CollisionCategory,
    /// Layers the object accepts collisions from
    pub mask: CollisionLayers,
}

impl GridEntry {
    /// Layer filter check against another entry
    pub fn accepts(&self, other: &GridEntry) -> bool {
        CollisionLayers::should_collide(
            self.category.layer(),
            self.mask,
            other.category.layer(),
            other.mask,
        )
    }
}

/// A bucket: the objects centered in one cell this frame
#[derive(Debug, Clone)]
pub struct GridCell {
    coord: CellCoord,
    entries: Vec<GridEntry>,
    max_radius: f32,
}

impl GridCell {
    fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            entries: Vec::new(),
            max_radius: 0.0,
        }
    }

    fn push(&mut self, entry: GridEntry) {
        self.max_radius = self.max_radius.max(entry.collider.radius);
        self.entries.push(entry);
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.max_radius = 0.0;
    }

    /// The cell this bucket covers
    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Objects in this bucket, in insertion order
    pub fn entries(&self) -> &[GridEntry] {
        &self.entries
    }

    /// Number of objects in this bucket
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bucket is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest collider radius in this bucket
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }
}

/// Sparse uniform grid of buckets keyed by cell coordinate
pub struct SpatialHashGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cells: FxHashMap<CellCoord, GridCell>,
}

impl SpatialHashGrid {
    /// Create an empty grid with the given cell edge length
    pub fn new(cell_size: f32) -> Result<Self, CollisionError> {
        let mut grid = Self {
            cell_size: 1.0,
            inv_cell_size: 1.0,
            cells: FxHashMap::default(),
        };
        grid.set_cell_size(cell_size)?;
        Ok(grid)
    }

    /// Change the cell size; drops every bucket
    pub fn set_cell_size(&mut self, cell_size: f32) -> Result<(), CollisionError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        self.cell_size = cell_size;
        self.inv_cell_size = cell_size.recip();
        self.cells.clear();
        Ok(())
    }

    /// Reserve room for roughly `additional` more occupied cells
    pub fn reserve(&mut self, additional: usize) {
        self.cells.reserve(additional);
    }

    /// Edge length of one cell in world units
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing a world position
    pub fn cell_of(&self, position: &Vec3) -> CellCoord {
        let [x, y, z] = floor_scaled(position, self.inv_cell_size);
        CellCoord::new(x, y, z)
    }

    /// Empty every bucket, keeping their allocations for the next fill
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    /// Drop every bucket and its allocation
    pub fn clear_all(&mut self) {
        self.cells.clear();
    }

    /// Append one object to the bucket of the cell containing its center
    pub fn insert(&mut self, entry: GridEntry) -> CellCoord {
        let coord = self.cell_of(&entry.collider.position);
        self.cells
            .entry(coord)
            .or_insert_with(|| GridCell::new(coord))
            .push(entry);
        coord
    }

    /// Full rebuild: clear every bucket, then bucket every entry by its center
    pub fn assign_objects_to_grid<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = GridEntry>,
    {
        self.clear();
        for entry in entries {
            self.insert(entry);
        }
        // Buckets that stayed empty this frame are released
        self.cells.retain(|_, cell| !cell.is_empty());
    }

    /// Non-empty bucket at a coordinate
    pub fn bucket(&self, coord: CellCoord) -> Option<&GridCell> {
        self.cells.get(&coord).filter(|cell| !cell.is_empty())
    }

    /// Coordinates of all non-empty buckets, in ascending coordinate order
    pub fn occupied_cells(&self) -> Vec<CellCoord> {
        let mut coords: Vec<CellCoord> = self
            .cells
            .values()
            .filter(|cell| !cell.is_empty())
            .map(GridCell::coord)
            .collect();
        coords.sort_unstable();
        coords
    }

    /// Populated cells around `coord`, excluding `coord` itself
    ///
    /// With `radius == 1` this scans the 26 adjacent cells; in general the
    /// `(2r+1)^3 - 1` cells of the surrounding cube.
    pub fn adjacent_cells(&self, coord: CellCoord, radius: u32) -> Vec<CellCoord> {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        let mut neighbors = Vec::new();

        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    if let Some(neighbor) = coord.offset(dx, dy, dz) {
                        if self.bucket(neighbor).is_some() {
                            neighbors.push(neighbor);
                        }
                    }
                }
            }
        }

        neighbors
    }

    /// Shortest distance between any point of cell `a` and any point of cell `b`
    pub fn cell_gap(&self, a: CellCoord, b: CellCoord) -> f32 {
        let axis_gap = |p: i32, q: i32| -> f32 {
            let cells_between = (i64::from(p) - i64::from(q)).abs() - 1;
            if cells_between > 0 {
                cells_between as f32 * self.cell_size
            } else {
                0.0
            }
        };

        let gx = axis_gap(a.x, b.x);
        let gy = axis_gap(a.y, b.y);
        let gz = axis_gap(a.z, b.z);
        (gx * gx + gy * gy + gz * gz).sqrt()
    }

    /// World-space center and half extents of a cell
    pub fn cell_bounds(&self, coord: CellCoord) -> (Vec3, Vec3) {
        let half = self.cell_size * 0.5;
        let center = Vec3::new(
            coord.x as f32 * self.cell_size + half,
            coord.y as f32 * self.cell_size + half,
            coord.z as f32 * self.cell_size + half,
        );
        (center, Vec3::repeat(half))
    }

    /// Number of non-empty buckets
    pub fn cell_count(&self) -> usize {
        self.cells.values().filter(|cell| !cell.is_empty()).count()
    }

    /// Total objects across all buckets
    pub fn object_count(&self) -> usize {
        self.cells.values().map(GridCell::len).sum()
    }
}
