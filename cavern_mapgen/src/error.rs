// Error types for cave configuration and baking.
//
// Configuration errors are the only recoverable failures in the pipeline:
// they are detected by `CaveConfig::validate()` before any grid is allocated
// and are never silently clamped. Broken invariants inside the mesher
// (impossible square configurations, unassigned vertex indices) are
// assertions, not variants here.

use std::path::PathBuf;

use thiserror::Error;

/// A rejected configuration parameter, carrying the offending value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("map width must be at least {min}, got {value}")]
    WidthTooSmall { value: u32, min: u32 },

    #[error("map height must be at least {min}, got {value}")]
    HeightTooSmall { value: u32, min: u32 },

    #[error("map width must be at most {max}, got {value}")]
    WidthTooLarge { value: u32, max: u32 },

    #[error("map height must be at most {max}, got {value}")]
    HeightTooLarge { value: u32, max: u32 },

    #[error("fill percent must be within 0..=100, got {0}")]
    FillPercentOutOfRange(u32),

    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),
}

/// Any failure surfaced by the cave generation entry points.
#[derive(Debug, Error)]
pub enum CaveError {
    #[error("invalid cave configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("malformed cave configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CaveError>;
