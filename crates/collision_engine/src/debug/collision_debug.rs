//! Collision-specific debug visualization
//!
//! The collision manager never reaches for a global renderer. Instead a
//! [`CollisionDebugSink`] can be attached to it; the manager reports buckets,
//! colliders and contacts to the sink during its update, and the sink decides
//! what to do with them. [`CollisionDebugVisualizer`] is the stock sink that
//! turns them into [`DebugShape`]s.

use std::any::Any;

use crate::debug::draw::{DebugDrawSystem, DebugShape};
use crate::foundation::collections::ObjectHandle;
use crate::foundation::math::{Vec3, Vec4};
use crate::physics::collision::Collider;
use crate::physics::spatial_hash::CellCoord;

/// Receiver for per-frame collision debug information
///
/// All drawing methods default to no-ops so a sink only implements what it
/// cares about.
pub trait CollisionDebugSink {
    /// Called once at the start of every manager update
    fn begin_frame(&mut self) {}

    /// An occupied grid cell
    fn draw_cell(&mut self, coord: CellCoord, center: Vec3, half_extents: Vec3, occupancy: usize) {
        let _ = (coord, center, half_extents, occupancy);
    }

    /// A collider that took part in this frame, and whether it overlaps anything
    fn draw_collider(&mut self, handle: ObjectHandle, collider: &Collider, is_colliding: bool) {
        let _ = (handle, collider, is_colliding);
    }

    /// A pair found overlapping this frame
    fn draw_contact(&mut self, a: &Collider, b: &Collider) {
        let _ = (a, b);
    }

    /// Downcast to Any for type-specific access
    fn as_any(&self) -> &dyn Any;

    /// Downcast to Any for mutable type-specific access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Color scheme for collision visualization
#[derive(Clone, Debug)]
pub struct CollisionDebugColors {
    /// Color for occupied grid cells
    pub cell: Vec4,

    /// Color for collision shapes (not colliding)
    pub shape_default: Vec4,

    /// Color for collision shapes (currently colliding)
    pub shape_colliding: Vec4,

    /// Color for lines joining overlapping centers
    pub contact: Vec4,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            cell: Vec4::new(0.5, 0.8, 1.0, 0.15),           // Light blue, transparent
            shape_default: Vec4::new(0.0, 1.0, 0.0, 0.3),   // Green, semi-transparent
            shape_colliding: Vec4::new(1.0, 0.0, 0.0, 0.5), // Red, semi-transparent
            contact: Vec4::new(1.0, 1.0, 0.0, 1.0),         // Yellow
        }
    }
}

/// Records collision debug output as debug shapes
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,

    /// Show occupied grid cells
    pub show_cells: bool,

    /// Show collider spheres
    pub show_shapes: bool,

    /// Show contact lines between overlapping pairs
    pub show_contacts: bool,
}

impl CollisionDebugVisualizer {
    /// Create a new collision debug visualizer
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: CollisionDebugColors::default(),
            show_cells: true,
            show_shapes: true,
            show_contacts: false,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Get all debug shapes for rendering
    pub fn shapes(&self) -> impl Iterator<Item = &DebugShape> {
        self.debug_draw.shapes()
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }

    /// Get reference to underlying debug draw system
    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }

    /// Get mutable reference to underlying debug draw system
    pub fn debug_draw_mut(&mut self) -> &mut DebugDrawSystem {
        &mut self.debug_draw
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionDebugSink for CollisionDebugVisualizer {
    fn begin_frame(&mut self) {
        // Everything the manager reports lives for exactly one frame
        self.debug_draw.clear();
    }

    fn draw_cell(&mut self, _coord: CellCoord, center: Vec3, half_extents: Vec3, _occupancy: usize) {
        if self.show_cells {
            self.debug_draw.draw_box(center, half_extents, self.colors.cell, 0.0);
        }
    }

    fn draw_collider(&mut self, _handle: ObjectHandle, collider: &Collider, is_colliding: bool) {
        if !self.show_shapes {
            return;
        }

        let color = if is_colliding {
            self.colors.shape_colliding
        } else {
            self.colors.shape_default
        };
        self.debug_draw.draw_sphere(collider.position, collider.radius, color, 0.0);
    }

    fn draw_contact(&mut self, a: &Collider, b: &Collider) {
        if self.show_contacts {
            self.debug_draw.draw_line(a.position, b.position, self.colors.contact, 0.0);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
