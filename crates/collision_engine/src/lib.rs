//! # Collision Engine
//!
//! Real-time collision detection for a 3D action game: sphere colliders, a
//! uniform spatial hash broad phase rebuilt every frame, and persistent pair
//! state that turns per-frame overlap tests into enter/stay/exit callbacks.
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! struct Ship {
//!     position: Vec3,
//!     hits: u32,
//! }
//!
//! impl Collidable for Ship {
//!     fn collider(&self) -> Option<Collider> {
//!         Some(Collider::new(self.position, 1.0))
//!     }
//!     fn category(&self) -> CollisionCategory {
//!         CollisionCategory::Enemy
//!     }
//!     fn on_collision_enter(&mut self, _other: &CollisionContact) {
//!         self.hits += 1;
//!     }
//!     fn on_collision_stay(&mut self, _other: &CollisionContact) {}
//!     fn on_collision_exit(&mut self, _other: &CollisionContact) {}
//! }
//!
//! fn main() -> Result<(), CollisionError> {
//!     let mut manager = CollisionManager::new(CollisionConfig::with_cell_size(10.0, 64))?;
//!     let mut ships: ObjectPool<Ship> = ObjectPool::with_key();
//!
//!     let a = ships.insert(Ship { position: Vec3::new(0.0, 0.0, 0.0), hits: 0 });
//!     let b = ships.insert(Ship { position: Vec3::new(1.5, 0.0, 0.0), hits: 0 });
//!     manager.register_object(a);
//!     manager.register_object(b);
//!
//!     manager.update(&mut ships);
//!     assert_eq!(ships[a].hits, 1);
//!     assert!(manager.is_colliding(a, b));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod debug;
pub mod physics;

mod error;

pub use error::CollisionError;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        CollisionError,
        config::{Config, ConfigError, CollisionConfig},
        debug::{CollisionDebugSink, CollisionDebugVisualizer},
        foundation::{
            collections::{ObjectHandle, ObjectPool},
            math::Vec3,
        },
        physics::{
            Collidable, Collider, CollisionCategory, CollisionContact, CollisionLayers,
            CollisionManager, CollisionStats,
        },
    };
}
