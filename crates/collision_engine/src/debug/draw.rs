//! Debug drawing primitives and system
//!
//! Shapes are only recorded here; whatever renderer the game uses reads them
//! back through [`DebugDrawSystem::shapes`] once per frame.

use crate::foundation::math::{Vec3, Vec4};

/// Geometry of a debug shape
#[derive(Clone, Debug, PartialEq)]
pub enum DebugPrimitive {
    /// Line segment from start to end
    Line {
        /// Segment start
        start: Vec3,
        /// Segment end
        end: Vec3,
    },

    /// Wireframe sphere
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },

    /// Axis-aligned wireframe box
    Box {
        /// Box center
        center: Vec3,
        /// Half the box size along each axis
        half_extents: Vec3,
    },
}

/// A primitive with a color and a lifetime
#[derive(Clone, Debug, PartialEq)]
pub struct DebugShape {
    /// What to draw
    pub primitive: DebugPrimitive,
    /// RGBA color
    pub color: Vec4,
    /// Seconds left before a temporary shape expires; 0.0 lasts one update
    pub duration: f32,
}

impl DebugShape {
    /// Create a shape
    pub fn new(primitive: DebugPrimitive, color: Vec4, duration: f32) -> Self {
        Self { primitive, color, duration }
    }

    /// Decrease duration by delta_time, returns true if expired
    fn tick(&mut self, delta_time: f32) -> bool {
        self.duration -= delta_time;
        self.duration <= 0.0
    }
}

/// Debug drawing system; shapes expire after their duration
pub struct DebugDrawSystem {
    shapes: Vec<DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            enabled: true,
        }
    }

    /// Queue a shape
    pub fn draw(&mut self, shape: DebugShape) {
        if self.enabled {
            self.shapes.push(shape);
        }
    }

    /// Draw a line segment
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.draw(DebugShape::new(DebugPrimitive::Line { start, end }, color, duration));
    }

    /// Draw a sphere
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::new(DebugPrimitive::Sphere { center, radius }, color, duration));
    }

    /// Draw an axis-aligned box
    pub fn draw_box(&mut self, center: Vec3, half_extents: Vec3, color: Vec4, duration: f32) {
        self.draw(DebugShape::new(DebugPrimitive::Box { center, half_extents }, color, duration));
    }

    /// Update shape lifetimes and remove expired shapes
    pub fn update(&mut self, delta_time: f32) {
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// All shapes for rendering, in draw order
    pub fn shapes(&self) -> impl Iterator<Item = &DebugShape> {
        let enabled = self.enabled;
        self.shapes.iter().filter(move |_| enabled)
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Drop every shape regardless of remaining duration
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();

        system.draw_sphere(Vec3::zeros(), 1.0, Vec4::new(1.0, 0.0, 0.0, 1.0), 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_zero_duration_lasts_one_update() {
        let mut system = DebugDrawSystem::new();

        system.draw_box(Vec3::repeat(5.0), Vec3::repeat(5.0), Vec4::new(1.0, 1.0, 1.0, 0.2), 0.0);
        assert_eq!(system.shapes().count(), 1);

        system.update(1.0 / 60.0);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_records_nothing() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;

        system.draw_line(Vec3::zeros(), Vec3::x(), Vec4::repeat(1.0), 1.0);
        assert_eq!(system.shape_count(), 0);
        assert_eq!(system.shapes().count(), 0);
    }
}
