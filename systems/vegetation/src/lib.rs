#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Vegetation scattering system emitting prop requests for decorated tiles.

use rand::Rng;
use tower_arena_core::{PropCategory, PropRequest, TileKind, VegetationSettings};
use tower_arena_world::{Grid, ANCHOR_COUNT};

/// Pure system deciding which prop decorates each tile.
#[derive(Debug, Default)]
pub struct VegetationScatterer;

impl VegetationScatterer {
    /// Creates a new vegetation scatterer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits at most one prop request per grass, rock or stone tile.
    ///
    /// Grass receives a bush with probability `bush_chance` and a tree
    /// otherwise; rock and stone tiles receive a boulder. The anchor is drawn
    /// uniformly from the tile's anchor set.
    pub fn scatter<R>(
        &self,
        grid: &Grid,
        settings: &VegetationSettings,
        rng: &mut R,
        out: &mut Vec<PropRequest>,
    ) where
        R: Rng + ?Sized,
    {
        let before = out.len();
        for tile in grid.tiles() {
            let category = match tile.kind() {
                TileKind::Grass if rng.gen::<f32>() < settings.bush_chance => PropCategory::Bush,
                TileKind::Grass => PropCategory::Tree,
                TileKind::Rock | TileKind::Stones => PropCategory::Rock,
                _ => continue,
            };
            let Some(anchor) = tile.anchor_world(rng.gen_range(0..ANCHOR_COUNT)) else {
                continue;
            };
            out.push(PropRequest {
                tile: tile.coord(),
                category,
                anchor,
            });
        }

        tracing::debug!(
            target: "tower_arena::vegetation",
            requested = out.len() - before,
            "vegetation scattered"
        );
    }
}
