#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic terrain generation for Hillside worlds.
//!
//! Generation is a pure function of a validated [`GenerationConfig`] and an
//! injected random source: the same seed always reproduces the same
//! [`TerrainLayout`], which keeps worlds shareable and tests scriptable.

use hillside_core::{TerrainLayout, TileCoord, TileKind, TilePlacement};
use rand::Rng;
use thiserror::Error;

/// Lowest starting surface height, in tile units.
const SURFACE_BAND_LOW: i32 = 12;
/// Highest starting surface height, in tile units.
const SURFACE_BAND_HIGH: i32 = 15;
/// Lower bound of the re-rolled pipe placement interval.
const PIPE_INTERVAL_LOW: i64 = 100;
/// Upper bound of the re-rolled pipe placement interval.
const PIPE_INTERVAL_HIGH: i64 = 200;
/// Vertical offset of the lowest fill tile above the origin row.
const FILL_BASE_OFFSET: f32 = 1.0;

/// Errors reported when generation parameters fail validation.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    /// Terrain must span at least one tile column.
    #[error("terrain must span at least one tile column")]
    EmptyWorld,
    /// Tile side lengths must be strictly positive.
    #[error("tile length must be positive (received {tile_length})")]
    InvalidTileLength {
        /// Rejected tile length.
        tile_length: f32,
    },
}

/// Validated parameters accepted by [`generate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationConfig {
    columns: TileCoord,
    tile_length: f32,
}

impl GenerationConfig {
    /// Creates a generation configuration, failing fast on degenerate input.
    pub fn new(columns: TileCoord, tile_length: f32) -> Result<Self, GenerationError> {
        if columns.get() == 0 {
            return Err(GenerationError::EmptyWorld);
        }
        if !(tile_length > 0.0) {
            return Err(GenerationError::InvalidTileLength { tile_length });
        }
        Ok(Self {
            columns,
            tile_length,
        })
    }

    /// Number of tile columns the terrain spans.
    #[must_use]
    pub const fn columns(&self) -> TileCoord {
        self.columns
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }
}

/// Produces the complete tile layout for one world instance.
///
/// The layout consists of a bedrock row one tile below the origin, a random
/// surface walk, sparse pipes one tile above the surface, and interior fill
/// stacked beneath every surface tile.
pub fn generate(config: &GenerationConfig, rng: &mut impl Rng) -> TerrainLayout {
    let columns = config.columns().get();
    let tile = config.tile_length();
    let mut tiles = Vec::new();

    for column in 0..columns {
        tiles.push(TilePlacement::new(
            TileKind::Bedrock,
            column as f32 * tile,
            -tile,
        ));
    }

    // Random surface walk. The signed delta is drawn from a nested range, and
    // negative excursions fold back positive instead of clamping, which
    // occasionally produces a sudden ridge reflection.
    let mut height: i32 = rng.gen_range(SURFACE_BAND_LOW..=SURFACE_BAND_HIGH);
    for column in 0..columns {
        let low = rng.gen_range(-1..=0);
        let high = rng.gen_range(0..=1);
        height += rng.gen_range(low..=high);

        let surface_bottom = height.unsigned_abs() as f32 * tile;
        let left = column as f32 * tile;
        tiles.push(TilePlacement::new(TileKind::Grass, left, surface_bottom));

        // The interval re-rolls every column and the test runs against the
        // absolute coordinate, so spacing comes out irregular; the origin
        // column always qualifies.
        let x = column as i64 * tile as i64;
        if x % rng.gen_range(PIPE_INTERVAL_LOW..=PIPE_INTERVAL_HIGH) == 0 {
            tiles.push(TilePlacement::new(
                TileKind::Pipe,
                left,
                surface_bottom + tile,
            ));
        }

        let mut fill = FILL_BASE_OFFSET;
        while fill < surface_bottom {
            tiles.push(TilePlacement::new(TileKind::Dirt, left, fill));
            fill += tile;
        }
    }

    TerrainLayout::new(config.columns(), tile, tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_zero_columns() {
        assert_eq!(
            GenerationConfig::new(TileCoord::new(0), 48.0).unwrap_err(),
            GenerationError::EmptyWorld
        );
    }

    #[test]
    fn config_rejects_non_positive_tile_lengths() {
        assert!(matches!(
            GenerationConfig::new(TileCoord::new(70), 0.0).unwrap_err(),
            GenerationError::InvalidTileLength { .. }
        ));
        assert!(matches!(
            GenerationConfig::new(TileCoord::new(70), -4.0).unwrap_err(),
            GenerationError::InvalidTileLength { .. }
        ));
    }

    #[test]
    fn config_accepts_sane_dimensions() {
        let config = GenerationConfig::new(TileCoord::new(70), 48.0).expect("valid");
        assert_eq!(config.columns().get(), 70);
        assert_eq!(config.tile_length(), 48.0);
    }
}
