#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Derives buildable ground from the carved path network.

use tower_arena_core::{BuildSettings, GridError, TileCoord, TileKind};
use tower_arena_world::Grid;

/// Pure system promoting grass that borders paths into build tiles.
#[derive(Debug, Default)]
pub struct BuildAreaDeriver {
    sources: Vec<TileCoord>,
}

impl BuildAreaDeriver {
    /// Creates a new build area deriver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Promotes every grass tile within Chebyshev `area_width` of a path tile
    /// and within `radius` of the grid center to [`TileKind::Build`].
    ///
    /// Path tiles are collected before any promotion so freshly created build
    /// tiles never act as sources. Returns the number of promoted tiles.
    pub fn derive(&mut self, grid: &mut Grid, settings: &BuildSettings) -> Result<u32, GridError> {
        self.sources.clear();
        self.sources.extend(
            grid.tiles()
                .iter()
                .filter(|tile| tile.kind() == TileKind::Path)
                .map(|tile| tile.coord()),
        );

        let center = grid.center();
        let reach = i32::try_from(settings.area_width).unwrap_or(i32::MAX);
        let mut promoted = 0;
        for source in &self.sources {
            for dx in -reach..=reach {
                for dy in -reach..=reach {
                    let neighbor = source.offset(dx, dy);
                    if !grid.contains(neighbor) || center.distance(neighbor) > settings.radius {
                        continue;
                    }
                    promoted +=
                        u32::from(grid.promote(neighbor, TileKind::Grass, TileKind::Build)?);
                }
            }
        }

        tracing::debug!(
            target: "tower_arena::build_areas",
            sources = self.sources.len(),
            promoted,
            "build areas derived"
        );
        Ok(promoted)
    }
}
