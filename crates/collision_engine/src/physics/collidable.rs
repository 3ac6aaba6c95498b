//! The capability every object handed to the collision manager implements

use crate::foundation::collections::ObjectHandle;
use crate::physics::collision::Collider;
use crate::physics::collision_layers::{CollisionCategory, CollisionLayers};

/// Snapshot of the other participant, passed to every lifecycle callback
///
/// The collider is the one used for this frame's test, taken when the grid was
/// rebuilt. Callbacks that move or destroy objects do not change it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionContact {
    /// Handle of the other object
    pub handle: ObjectHandle,
    /// Category of the other object, for gameplay matching
    pub category: CollisionCategory,
    /// The other object's collider this frame
    pub collider: Collider,
}

/// An object that takes part in collision detection
///
/// The manager calls the three lifecycle callbacks from inside
/// [`CollisionManager::update`](crate::physics::CollisionManager::update) and
/// nowhere else. Within one pair the object with the lower handle is notified
/// first.
pub trait Collidable {
    /// Current world-space collider, or `None` to sit out this frame
    ///
    /// Owners must have synchronized the collider with their transform before
    /// the manager's update runs.
    fn collider(&self) -> Option<Collider>;

    /// Category used for layer filtering and by the other side's callbacks
    fn category(&self) -> CollisionCategory;

    /// Layers this object wants to hear about
    fn collision_mask(&self) -> CollisionLayers {
        CollisionLayers::all()
    }

    /// The pair started overlapping this frame
    fn on_collision_enter(&mut self, other: &CollisionContact);

    /// The pair was already overlapping and still is
    fn on_collision_stay(&mut self, other: &CollisionContact);

    /// The pair was overlapping last frame and no longer is
    fn on_collision_exit(&mut self, other: &CollisionContact);
}

impl<T: Collidable + ?Sized> Collidable for Box<T> {
    fn collider(&self) -> Option<Collider> {
        (**self).collider()
    }

    fn category(&self) -> CollisionCategory {
        (**self).category()
    }

    fn collision_mask(&self) -> CollisionLayers {
        (**self).collision_mask()
    }

    fn on_collision_enter(&mut self, other: &CollisionContact) {
        (**self).on_collision_enter(other);
    }

    fn on_collision_stay(&mut self, other: &CollisionContact) {
        (**self).on_collision_stay(other);
    }

    fn on_collision_exit(&mut self, other: &CollisionContact) {
        (**self).on_collision_exit(other);
    }
}
