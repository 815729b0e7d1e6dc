#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Surface classification of the terrain left untouched by paths and build areas.

use rand::Rng;
use tower_arena_core::{GridError, TextureSettings, TileCoord, TileKind};
use tower_arena_system_elevation::ElevationField;
use tower_arena_world::Grid;

/// Pure system assigning grass, rock and stone surfaces from slope and height.
#[derive(Debug, Default)]
pub struct TextureClassifier {
    coords: Vec<TileCoord>,
}

impl TextureClassifier {
    /// Creates a new texture classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies every tile that is neither path, build ground, a terminal
    /// tile nor part of a flat plateau.
    pub fn classify<R>(
        &mut self,
        grid: &mut Grid,
        field: &ElevationField,
        settings: &TextureSettings,
        rng: &mut R,
    ) -> Result<(), GridError>
    where
        R: Rng + ?Sized,
    {
        self.coords.clear();
        self.coords
            .extend(grid.tiles().iter().map(|tile| tile.coord()));

        for &coord in &self.coords {
            let kind = grid.get(coord)?.kind();
            if preserved(kind) || field.is_flat_anchored(coord) {
                continue;
            }

            let elevation = field.height(coord).unwrap_or_default();
            let slope = steepest_slope(grid, field, coord, elevation);
            let classified = if slope > settings.steep_slope_threshold {
                TileKind::Rock
            } else if (settings.min_stone_height..=settings.max_stone_height).contains(&elevation)
                && rng.gen::<f32>() < settings.stone_probability
            {
                scatter_cluster(grid, coord, settings.stone_cluster_probability, rng)?;
                TileKind::Stones
            } else if rng.gen::<f32>() < settings.rock_randomness && kind != TileKind::Stones {
                TileKind::Rock
            } else {
                TileKind::Grass
            };
            grid.set_kind(coord, classified)?;
        }

        let count = |wanted: TileKind| {
            grid.tiles()
                .iter()
                .filter(|tile| tile.kind() == wanted)
                .count()
        };
        tracing::debug!(
            target: "tower_arena::texturing",
            rock = count(TileKind::Rock),
            stones = count(TileKind::Stones),
            grass = count(TileKind::Grass),
            "textures classified"
        );
        Ok(())
    }
}

fn preserved(kind: TileKind) -> bool {
    matches!(kind, TileKind::Path | TileKind::Build) || kind.is_terminal()
}

/// Largest absolute height difference against the in-bounds orthogonal neighbours.
fn steepest_slope(grid: &Grid, field: &ElevationField, coord: TileCoord, elevation: f32) -> f32 {
    coord
        .orthogonal_neighbors()
        .into_iter()
        .filter(|neighbor| grid.contains(*neighbor))
        .filter_map(|neighbor| field.height(neighbor))
        .map(|height| (height - elevation).abs())
        .fold(0.0, f32::max)
}

/// Spreads stones one hop into the orthogonal neighbourhood of `origin`.
fn scatter_cluster<R>(
    grid: &mut Grid,
    origin: TileCoord,
    probability: f32,
    rng: &mut R,
) -> Result<(), GridError>
where
    R: Rng + ?Sized,
{
    for neighbor in origin.orthogonal_neighbors() {
        let Some(kind) = grid.kind(neighbor) else {
            continue;
        };
        if preserved(kind) {
            continue;
        }
        if rng.gen::<f32>() < probability {
            grid.set_kind(neighbor, TileKind::Stones)?;
        }
    }
    Ok(())
}
