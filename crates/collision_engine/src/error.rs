//! Error types for the collision engine
//!
//! Only setup can fail. The per-frame pass degrades instead of erroring:
//! objects with missing or invalid colliders are skipped for the frame.

use crate::config::ConfigError;

/// Errors raised while configuring the collision manager
#[derive(thiserror::Error, Debug)]
pub enum CollisionError {
    /// Cell size must be finite and strictly positive
    #[error("Invalid cell size: {0} (must be finite and > 0)")]
    InvalidCellSize(f32),

    /// Neighbor search radius outside the supported range
    #[error("Invalid neighbor radius: {0} (must be 1..={max})", max = crate::config::MAX_NEIGHBOR_RADIUS)]
    InvalidNeighborRadius(u32),

    /// An occupancy cap too small to ever test a pair
    #[error("Invalid cell cap {name} = {value}")]
    InvalidCellCap {
        /// Name of the offending config field
        name: &'static str,
        /// Rejected value
        value: usize,
    },

    /// Failed to load or parse a configuration file
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
