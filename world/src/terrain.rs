//! Installed terrain storage and the spatial collision index.

use std::collections::HashMap;

use hillside_core::{PipeSite, TerrainLayout, TileCoord, TilePlacement};

/// Axis-aligned box expressed by its lower-left corner and extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Aabb {
    pub(crate) left: f32,
    pub(crate) bottom: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Aabb {
    pub(crate) fn right(&self) -> f32 {
        self.left + self.width
    }

    pub(crate) fn top(&self) -> f32 {
        self.bottom + self.height
    }

    /// Strict overlap test; boxes that merely touch do not collide.
    pub(crate) fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.bottom < other.top()
            && other.bottom < self.top()
    }
}

/// Single solid box registered with the collision index.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SolidTile {
    pub(crate) bounds: Aabb,
    pub(crate) pipe: bool,
}

/// Spatial hash over tile boxes keyed by integer grid cells.
///
/// The hash is built once per terrain installation and never mutated
/// afterwards; physics for every entity queries it concurrently within a
/// frame without coordination.
#[derive(Clone, Debug)]
pub(crate) struct CollisionGrid {
    cell: f32,
    tiles: Vec<SolidTile>,
    buckets: HashMap<(i64, i64), Vec<u32>>,
}

impl CollisionGrid {
    pub(crate) fn new(tile_length: f32, placements: &[TilePlacement]) -> Self {
        let cell = if tile_length > 0.0 { tile_length } else { 1.0 };
        let mut grid = Self {
            cell,
            tiles: Vec::with_capacity(placements.len()),
            buckets: HashMap::new(),
        };

        for placement in placements {
            let bounds = Aabb {
                left: placement.left,
                bottom: placement.bottom,
                width: tile_length,
                height: tile_length,
            };
            let index = grid.tiles.len() as u32;
            grid.tiles.push(SolidTile {
                bounds,
                pipe: !placement.kind.is_terrain(),
            });
            for key in grid.covered_cells(&bounds) {
                grid.buckets.entry(key).or_default().push(index);
            }
        }

        grid
    }

    /// Collects the solid tiles whose boxes strictly overlap the probe.
    ///
    /// Pipe tiles participate only when `include_pipes` is set. Probes
    /// entirely outside the generated bounds find no buckets and therefore
    /// report no collision.
    pub(crate) fn overlapping(&self, probe: &Aabb, include_pipes: bool) -> Vec<SolidTile> {
        let mut candidates: Vec<u32> = Vec::new();
        for key in self.covered_cells(probe) {
            if let Some(bucket) = self.buckets.get(&key) {
                candidates.extend_from_slice(bucket);
            }
        }
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .filter_map(|index| self.tiles.get(index as usize).copied())
            .filter(|tile| include_pipes || !tile.pipe)
            .filter(|tile| tile.bounds.overlaps(probe))
            .collect()
    }

    fn covered_cells(&self, bounds: &Aabb) -> Vec<(i64, i64)> {
        let min_column = cell_floor(bounds.left, self.cell);
        let max_column = cell_last(bounds.right(), self.cell, min_column);
        let min_row = cell_floor(bounds.bottom, self.cell);
        let max_row = cell_last(bounds.top(), self.cell, min_row);

        let mut keys = Vec::new();
        for row in min_row..=max_row {
            for column in min_column..=max_column {
                keys.push((column, row));
            }
        }
        keys
    }
}

fn cell_floor(value: f32, cell: f32) -> i64 {
    (value / cell).floor() as i64
}

fn cell_last(edge: f32, cell: f32, lower: i64) -> i64 {
    // Boxes ending exactly on a cell boundary do not extend into the next cell.
    let last = (edge / cell).ceil() as i64 - 1;
    last.max(lower)
}

/// Terrain installed into a world: tile placements, their collision index
/// and the pipe sites available for teleportation.
#[derive(Clone, Debug)]
pub(crate) struct Terrain {
    columns: TileCoord,
    tile_length: f32,
    tiles: Vec<TilePlacement>,
    pipe_sites: Vec<PipeSite>,
    grid: CollisionGrid,
}

impl Terrain {
    pub(crate) fn empty(tile_length: f32) -> Self {
        Self {
            columns: TileCoord::new(0),
            tile_length,
            tiles: Vec::new(),
            pipe_sites: Vec::new(),
            grid: CollisionGrid::new(tile_length, &[]),
        }
    }

    pub(crate) fn from_layout(layout: &TerrainLayout) -> Self {
        let tile_length = layout.tile_length();
        let tiles = layout.tiles().to_vec();
        let pipe_sites = tiles
            .iter()
            .filter(|placement| !placement.kind.is_terrain())
            .map(|placement| {
                let column = if tile_length > 0.0 {
                    (placement.left / tile_length).floor().max(0.0) as u32
                } else {
                    0
                };
                PipeSite::new(TileCoord::new(column), placement.left, placement.bottom)
            })
            .collect();
        let grid = CollisionGrid::new(tile_length, &tiles);

        Self {
            columns: layout.columns(),
            tile_length,
            tiles,
            pipe_sites,
            grid,
        }
    }

    pub(crate) fn columns(&self) -> TileCoord {
        self.columns
    }

    pub(crate) fn tile_length(&self) -> f32 {
        self.tile_length
    }

    pub(crate) fn width(&self) -> f32 {
        self.columns.get() as f32 * self.tile_length
    }

    pub(crate) fn tiles(&self) -> &[TilePlacement] {
        &self.tiles
    }

    pub(crate) fn pipe_sites(&self) -> &[PipeSite] {
        &self.pipe_sites
    }

    pub(crate) fn grid(&self) -> &CollisionGrid {
        &self.grid
    }
}
