#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Elevation field computed from the distance to buildable and spawn ground.
//!
//! Build and spawn tiles anchor a flat plateau; terrain further away rises
//! along the configured height curve. The nearest-anchor search is a brute
//! force scan over every anchor, which stays cheap for arenas up to a few
//! hundred tiles per side.

use tower_arena_core::{ElevationSettings, GridError, TileCoord};
use tower_arena_world::Grid;

/// Heights and flat-anchor mask for every tile, in grid storage order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElevationField {
    width: u32,
    height: u32,
    heights: Vec<f32>,
    flat: Vec<bool>,
}

impl ElevationField {
    /// Computes the field for the current grid classification.
    #[must_use]
    pub fn compute(grid: &Grid, settings: &ElevationSettings) -> Self {
        let anchors: Vec<TileCoord> = grid
            .tiles()
            .iter()
            .filter(|tile| tile.kind().is_flat_anchor())
            .map(|tile| tile.coord())
            .collect();

        let capacity = grid.tiles().len();
        let mut heights = Vec::with_capacity(capacity);
        let mut flat = Vec::with_capacity(capacity);
        for tile in grid.tiles() {
            if tile.kind().is_flat_anchor() {
                heights.push(0.0);
                flat.push(true);
                continue;
            }

            let distance = nearest_anchor_distance(tile.coord(), &anchors);
            if distance <= settings.flat_radius {
                heights.push(0.0);
                flat.push(true);
            } else {
                heights.push(height_at_distance(distance, settings));
                flat.push(false);
            }
        }

        Self {
            width: grid.width(),
            height: grid.height(),
            heights,
            flat,
        }
    }

    /// Computed height of the tile at `coord`.
    #[must_use]
    pub fn height(&self, coord: TileCoord) -> Option<f32> {
        self.index(coord)
            .and_then(|index| self.heights.get(index))
            .copied()
    }

    /// Reports whether the tile at `coord` lies on a flat plateau.
    #[must_use]
    pub fn is_flat_anchored(&self, coord: TileCoord) -> bool {
        self.index(coord)
            .and_then(|index| self.flat.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Heights in grid storage order.
    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Largest computed height, zero for an empty field.
    #[must_use]
    pub fn peak(&self) -> f32 {
        self.heights.iter().copied().fold(0.0, f32::max)
    }

    /// Writes the field into the grid's tile elevations.
    pub fn apply(&self, grid: &mut Grid) -> Result<(), GridError> {
        let coords: Vec<TileCoord> = grid.tiles().iter().map(|tile| tile.coord()).collect();
        for (coord, height) in coords.into_iter().zip(self.heights.iter().copied()) {
            grid.set_elevation(coord, height)?;
        }

        tracing::debug!(
            target: "tower_arena::elevation",
            flat = self.flat.iter().filter(|flat| **flat).count(),
            peak = self.peak(),
            "elevation applied"
        );
        Ok(())
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        let x = u32::try_from(coord.x()).ok()?;
        let y = u32::try_from(coord.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        usize::try_from(u64::from(x) * u64::from(self.height) + u64::from(y)).ok()
    }
}

fn nearest_anchor_distance(coord: TileCoord, anchors: &[TileCoord]) -> f32 {
    anchors
        .iter()
        .map(|anchor| coord.distance(*anchor))
        .fold(f32::INFINITY, f32::min)
}

fn height_at_distance(distance: f32, settings: &ElevationSettings) -> f32 {
    let normalized = (distance / (2.0 * settings.flat_radius)).clamp(0.0, 1.0);
    let target = settings.height_curve.evaluate(normalized) * settings.max_height;
    lerp(0.0, target, settings.height_gradient)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
