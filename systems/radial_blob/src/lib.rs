#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Carves the organic clearing surrounding the arena objective.

use rand::Rng;
use tower_arena_core::{BlobSettings, GridError, TileKind};
use tower_arena_world::Grid;

/// Bonus added to the inner half of the blob.
const CORE_BONUS: f32 = 0.3;
/// Bonus added between half and three quarters of the blob radius.
const RING_BONUS: f32 = 0.15;

/// Pure system scattering path tiles around the grid center.
#[derive(Debug, Default)]
pub struct RadialBlobGenerator;

impl RadialBlobGenerator {
    /// Creates a new blob generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Marks grass inside the `[min_radius, max_radius]` annulus as path with a
    /// probability that falls off toward the outer radius.
    ///
    /// Returns the number of tiles that changed.
    pub fn carve<R>(
        &self,
        grid: &mut Grid,
        settings: &BlobSettings,
        rng: &mut R,
    ) -> Result<u32, GridError>
    where
        R: Rng + ?Sized,
    {
        let center = grid.center();
        let reach = i32::try_from(settings.max_radius).unwrap_or(i32::MAX);
        let min_radius = settings.min_radius as f32;
        let max_radius = settings.max_radius as f32;
        let mut carved = 0;

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let coord = center.offset(dx, dy);
                if !grid.contains(coord) {
                    continue;
                }

                let distance = center.distance(coord);
                let jitter = rng.gen::<f32>();
                let roll = rng.gen::<f32>();
                let probability = inclusion_probability(distance, settings, jitter);
                let inside = (min_radius..=max_radius).contains(&distance);
                if inside && roll < probability * settings.density {
                    carved += u32::from(grid.promote(coord, TileKind::Grass, TileKind::Path)?);
                }
            }
        }

        tracing::debug!(
            target: "tower_arena::radial_blob",
            center = %center,
            carved,
            "radial blob carved"
        );
        Ok(carved)
    }
}

/// Probability that a tile at `distance` from the center joins the blob,
/// before density scaling.
fn inclusion_probability(distance: f32, settings: &BlobSettings, jitter: f32) -> f32 {
    let max_radius = settings.max_radius as f32;
    let falloff = inverse_lerp(max_radius, settings.min_radius as f32, distance);
    let mut probability = falloff * (1.0 - settings.irregularity * jitter);
    if distance < 0.5 * max_radius {
        probability += CORE_BONUS;
    } else if distance < 0.75 * max_radius {
        probability += RING_BONUS;
    }
    probability
}

/// Clamped position of `value` between `from` and `to`, zero for an empty range.
fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    if from == to {
        return 0.0;
    }
    ((value - from) / (to - from)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(irregularity: f32) -> BlobSettings {
        BlobSettings {
            min_radius: 2,
            max_radius: 6,
            irregularity,
            density: 1.0,
        }
    }

    #[test]
    fn inverse_lerp_runs_from_outer_to_inner_radius() {
        assert_eq!(inverse_lerp(6.0, 2.0, 6.0), 0.0);
        assert_eq!(inverse_lerp(6.0, 2.0, 2.0), 1.0);
        assert_eq!(inverse_lerp(6.0, 2.0, 4.0), 0.5);
        assert_eq!(inverse_lerp(6.0, 2.0, 0.0), 1.0);
        assert_eq!(inverse_lerp(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn bonuses_follow_radius_bands() {
        let settings = settings(0.0);
        assert!((inclusion_probability(2.0, &settings, 0.0) - 1.3).abs() < 1e-6);
        assert!((inclusion_probability(4.0, &settings, 0.0) - 0.65).abs() < 1e-6);
        assert!((inclusion_probability(5.0, &settings, 0.0) - 0.25).abs() < 1e-6);
        assert_eq!(inclusion_probability(6.0, &settings, 0.0), 0.0);
    }

    #[test]
    fn irregularity_scales_falloff_only() {
        let settings = settings(1.0);
        assert!((inclusion_probability(2.0, &settings, 1.0) - CORE_BONUS).abs() < 1e-6);
        assert!((inclusion_probability(4.0, &settings, 0.5) - 0.4).abs() < 1e-6);
    }
}
