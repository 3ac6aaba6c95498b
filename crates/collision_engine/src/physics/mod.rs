//! Physics module for collision detection
//!
//! Provides sphere colliders, a spatial hash broad phase and the collision
//! manager that turns per-frame overlap tests into enter/stay/exit callbacks.

pub mod collision;
pub mod collision_layers;
pub mod collidable;
pub mod collision_pair;
pub mod spatial_hash;
pub mod collision_manager;

#[cfg(test)]
mod tests;

pub use collision::Collider;
pub use collision_layers::{CollisionCategory, CollisionLayers};
pub use collidable::{Collidable, CollisionContact};
pub use collision_pair::CollisionPair;
pub use spatial_hash::{CellCoord, GridCell, GridEntry, SpatialHashGrid};
pub use collision_manager::{CollisionManager, CollisionStats, CollisionTransition};
