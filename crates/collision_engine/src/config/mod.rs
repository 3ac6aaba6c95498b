//! Configuration system
//!
//! Collision tuning is supplied once at startup, either built in code or loaded
//! from a `.toml` / `.ron` file through the [`Config`] trait.

pub use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::error::CollisionError;

/// Serialized formats understood by [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// Rusty Object Notation
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse configuration text in the given format
    fn from_str_with_format(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Render configuration text in the given format
    fn to_string_with_format(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_with_format(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Largest supported neighbor search radius, in cells
pub const MAX_NEIGHBOR_RADIUS: u32 = 2;

/// Tuning for the collision manager and its spatial hash grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of one grid cell in world units
    pub cell_size: f32,

    /// Expected number of simultaneously registered objects (capacity hint)
    pub max_objects_hint: usize,

    /// How many cells out from a bucket the neighbor pass looks (1 = the 26 adjacent cells)
    pub neighbor_radius: u32,

    /// Skip neighbor cells that are too far apart for any of their objects to touch
    pub skip_distant_cells: bool,

    /// Buckets holding more objects than this skip intra-cell testing
    pub max_objects_per_cell: usize,

    /// Cross-cell testing is skipped when either bucket holds more objects than this
    pub max_objects_per_neighbor_cell: usize,

    /// Emit collider and cell shapes to the debug sink, if one is attached
    pub debug_draw: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            max_objects_hint: 256,
            neighbor_radius: 1,
            skip_distant_cells: true,
            max_objects_per_cell: 20,
            max_objects_per_neighbor_cell: 15,
            debug_draw: false,
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Default guardrails with the given cell size and capacity hint
    pub fn with_cell_size(cell_size: f32, max_objects_hint: usize) -> Self {
        Self {
            cell_size,
            max_objects_hint,
            ..Self::default()
        }
    }

    /// Check every field, returning the first violation
    pub fn validate(&self) -> Result<(), CollisionError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CollisionError::InvalidCellSize(self.cell_size));
        }
        if self.neighbor_radius == 0 || self.neighbor_radius > MAX_NEIGHBOR_RADIUS {
            return Err(CollisionError::InvalidNeighborRadius(self.neighbor_radius));
        }
        if self.max_objects_per_cell < 2 {
            return Err(CollisionError::InvalidCellCap {
                name: "max_objects_per_cell",
                value: self.max_objects_per_cell,
            });
        }
        if self.max_objects_per_neighbor_cell == 0 {
            return Err(CollisionError::InvalidCellCap {
                name: "max_objects_per_neighbor_cell",
                value: self.max_objects_per_neighbor_cell,
            });
        }
        Ok(())
    }
}
