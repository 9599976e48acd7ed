// Data-driven cave configuration.
//
// All tunable generation parameters live in `CaveConfig`, which can be loaded
// from JSON (missing fields fall back to `Default`) or built in code. The
// generator never uses magic numbers for these values; it reads them from the
// config. `validate()` is the single gate that rejects bad parameters before
// any grid is allocated. Out-of-range values are reported, never clamped.
//
// See also: `error.rs` for `ConfigError`, `bake.rs` which validates the config
// at the start of every bake, `cavern_cli` which layers command-line flags
// over a loaded config.
//
// **Critical constraint: determinism.** With `use_random_seed == false`, the
// config fully determines the generated grid and mesh.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CaveError, ConfigError, Result};

/// Smallest accepted map width or height. Below this the neighbor count
/// degenerates into "every cell is border".
pub const MIN_DIMENSION: u32 = 3;

/// Largest accepted map width or height. Keeps the padded grid's node and
/// vertex counts inside `u32` and every coordinate inside `i32`.
pub const MAX_DIMENSION: u32 = 1 << 12;

/// Thickness of the forced-solid ring added around the smoothed grid.
pub const BORDER_SIZE: u32 = 1;

/// Number of smoothing passes run by a default bake.
pub const DEFAULT_SMOOTHING_PASSES: u32 = 5;

/// Complete cave generation profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Map width in cells, before padding.
    pub width: u32,
    /// Map height (depth axis) in cells, before padding.
    pub height: u32,
    /// Chance (0–100) that an interior cell starts solid.
    pub fill_percent: u32,
    /// Seed string, hashed to seed the PRNG. Ignored when `use_random_seed`.
    pub seed: String,
    /// Derive the seed from the wall clock instead of `seed`.
    pub use_random_seed: bool,
    /// World-space edge length of one grid cell.
    pub cell_size: f32,
    /// Cellular-automaton passes applied after the random fill.
    pub smoothing_passes: u32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            fill_percent: 47,
            seed: "cavern".to_string(),
            use_random_seed: false,
            cell_size: 1.0,
            smoothing_passes: DEFAULT_SMOOTHING_PASSES,
        }
    }
}

impl CaveConfig {
    /// Parse a config from JSON. Does not validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file. Does not validate.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject any parameter the generator cannot honor.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.width < MIN_DIMENSION {
            return Err(ConfigError::WidthTooSmall {
                value: self.width,
                min: MIN_DIMENSION,
            });
        }
        if self.height < MIN_DIMENSION {
            return Err(ConfigError::HeightTooSmall {
                value: self.height,
                min: MIN_DIMENSION,
            });
        }
        if self.width > MAX_DIMENSION {
            return Err(ConfigError::WidthTooLarge {
                value: self.width,
                max: MAX_DIMENSION,
            });
        }
        if self.height > MAX_DIMENSION {
            return Err(ConfigError::HeightTooLarge {
                value: self.height,
                max: MAX_DIMENSION,
            });
        }
        if self.fill_percent > 100 {
            return Err(ConfigError::FillPercentOutOfRange(self.fill_percent));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        Ok(())
    }
}
