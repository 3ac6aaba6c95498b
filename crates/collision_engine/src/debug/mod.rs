//! Debug module for visualization and debugging tools

pub mod draw;
pub mod collision_debug;

pub use draw::{DebugDrawSystem, DebugPrimitive, DebugShape};
pub use collision_debug::{CollisionDebugColors, CollisionDebugSink, CollisionDebugVisualizer};
