//! Tuning surface consumed by every generation stage.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Slack applied to the spawn annulus to account for rounding candidates onto the grid.
const ROUNDING_SLACK: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Largest accepted grid width or height.
pub const MAX_GRID_SIDE: u32 = 200;

/// Largest accepted number of paths.
pub const MAX_PATHS: u32 = 10;

/// Largest accepted tile reach for path width, spawn disks, build halos and the blob.
pub const MAX_TILE_REACH: u32 = 10;

/// Aggregated configuration describing a single arena regeneration.
///
/// Every section falls back to its defaults when omitted, so partial TOML
/// documents are accepted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed for the single random generator shared by every stage.
    pub seed: u64,
    /// Grid dimensions and tile size.
    pub grid: GridSettings,
    /// Spawn placement and path carving.
    pub paths: PathSettings,
    /// Randomised curvature applied while walking toward the center.
    pub curvature: CurvatureSettings,
    /// Organic clearing carved around the objective.
    pub blob: BlobSettings,
    /// Buildable halo around the carved paths.
    pub build: BuildSettings,
    /// Flat zones and height falloff.
    pub elevation: ElevationSettings,
    /// Surface classification thresholds.
    pub texture: TextureSettings,
    /// Decorative prop scattering.
    pub vegetation: VegetationSettings,
}

impl GenerationConfig {
    /// Validates the configuration, rejecting values no stage can work with.
    ///
    /// Runs before the pipeline touches the grid so that an invalid request
    /// leaves the previous arena intact.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.paths.validate()?;
        self.curvature.validate()?;
        self.blob.validate()?;
        self.build.validate()?;
        self.elevation.validate()?;
        self.texture.validate()?;
        self.vegetation.validate()
    }
}

/// Grid dimensions and world-space tile size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Number of tile columns.
    pub width: u32,
    /// Number of tile rows.
    pub height: u32,
    /// Edge length of a tile in world units.
    pub tile_size: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            tile_size: 2.0,
        }
    }
}

impl GridSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        at_most("grid.width", self.width, MAX_GRID_SIDE)?;
        at_most("grid.height", self.height, MAX_GRID_SIDE)?;
        if !(self.tile_size > 0.0) || !self.tile_size.is_finite() {
            return Err(ConfigError::NonPositiveTileSize(self.tile_size));
        }
        Ok(())
    }
}

/// Spawn placement and path carving parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Number of spawn points, and therefore paths, to carve.
    pub count: u32,
    /// Tiles marked along +x and along +y at every walk step, counting the
    /// cursor itself; a width of 1 marks only the cursor.
    pub width: u32,
    /// Radius of the path disk carved around each spawn point.
    pub start_radius: u32,
    /// Minimum distance of a spawn point from the grid center.
    pub min_spawn_distance: f32,
    /// Maximum distance of a spawn point from the grid center.
    pub max_spawn_distance: f32,
    /// Minimum Euclidean distance between any two spawn points.
    pub min_separation: f32,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            count: 3,
            width: 2,
            start_radius: 2,
            min_spawn_distance: 10.0,
            max_spawn_distance: 20.0,
            min_separation: 7.0,
        }
    }
}

impl PathSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::NoPaths);
        }
        at_most("paths.count", self.count, MAX_PATHS)?;
        at_most("paths.width", self.width, MAX_TILE_REACH)?;
        at_most("paths.start_radius", self.start_radius, MAX_TILE_REACH)?;
        non_negative("paths.min_spawn_distance", self.min_spawn_distance)?;
        non_negative("paths.max_spawn_distance", self.max_spawn_distance)?;
        non_negative("paths.min_separation", self.min_separation)?;
        if self.min_spawn_distance > self.max_spawn_distance {
            return Err(ConfigError::SpawnDistanceInverted {
                min: self.min_spawn_distance,
                max: self.max_spawn_distance,
            });
        }
        if !self.separation_feasible() {
            return Err(ConfigError::PlacementInfeasible {
                count: self.count,
                separation: self.min_separation,
                max_distance: self.max_spawn_distance,
            });
        }
        Ok(())
    }

    /// Packing bound: disks of radius `separation / 2` around every spawn
    /// point are disjoint and must fit inside the spawn annulus grown by the
    /// same radius.
    fn separation_feasible(&self) -> bool {
        if self.count < 2 || self.min_separation <= 0.0 {
            return true;
        }

        let half = self.min_separation * 0.5;
        let outer = self.max_spawn_distance + ROUNDING_SLACK + half;
        let inner = (self.min_spawn_distance - ROUNDING_SLACK - half).max(0.0);
        let capacity = (outer * outer - inner * inner) / (half * half);
        self.count as f32 <= capacity
    }
}

/// Randomised curvature applied while walking toward the center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvatureSettings {
    /// Scale of the signed offset applied to a perturbed axis.
    pub intensity: f32,
    /// Probability that a walk step is perturbed at all.
    pub frequency: f32,
}

impl Default for CurvatureSettings {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            frequency: 0.1,
        }
    }
}

impl CurvatureSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        unit_range("curvature.intensity", self.intensity)?;
        unit_range("curvature.frequency", self.frequency)
    }
}

/// Organic clearing carved around the objective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobSettings {
    /// Inner radius; tiles closer to the center are never carved by the blob.
    pub min_radius: u32,
    /// Outer radius where the inclusion probability reaches zero.
    pub max_radius: u32,
    /// Shape irregularity; 0 keeps a clean ring, 1 frays it heavily.
    pub irregularity: f32,
    /// Multiplier applied to the inclusion probability.
    pub density: f32,
}

impl Default for BlobSettings {
    fn default() -> Self {
        Self {
            min_radius: 2,
            max_radius: 6,
            irregularity: 0.0,
            density: 1.0,
        }
    }
}

impl BlobSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        at_most("blob.max_radius", self.max_radius, MAX_TILE_REACH)?;
        if self.min_radius > self.max_radius {
            return Err(ConfigError::BlobRadiusInverted {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        unit_range("blob.irregularity", self.irregularity)?;
        unit_range("blob.density", self.density)
    }
}

/// Buildable halo around the carved paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Chebyshev reach of the halo around each path tile.
    pub area_width: u32,
    /// Euclidean distance from the center beyond which nothing becomes buildable.
    pub radius: f32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            area_width: 1,
            radius: 20.0,
        }
    }
}

impl BuildSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        at_most("build.area_width", self.area_width, MAX_TILE_REACH)?;
        non_negative("build.radius", self.radius)
    }
}

/// Flat zones and height falloff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationSettings {
    /// Distance around build and spawn tiles that stays at height zero.
    pub flat_radius: f32,
    /// Height reached at twice the flat radius.
    pub max_height: f32,
    /// Interpolation factor between flat ground and the full curve height.
    pub height_gradient: f32,
    /// Easing applied to the normalised distance.
    pub height_curve: HeightCurve,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            flat_radius: 3.0,
            max_height: 5.0,
            height_gradient: 1.0,
            height_curve: HeightCurve::default(),
        }
    }
}

impl ElevationSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.flat_radius > 0.0) || !self.flat_radius.is_finite() {
            return Err(ConfigError::NonPositiveFlatRadius(self.flat_radius));
        }
        non_negative("elevation.max_height", self.max_height)?;
        unit_range("elevation.height_gradient", self.height_gradient)?;
        self.height_curve.validate()
    }
}

/// Monotonic easing from normalised distance in `[0, 1]` to a height multiplier in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightCurve {
    /// Identity mapping.
    Linear,
    /// Quadratic ease-in.
    EaseIn,
    /// Quadratic ease-out.
    EaseOut,
    /// Hermite smoothstep.
    #[default]
    SmoothStep,
    /// Piecewise-linear curve through the provided keys.
    Keyframes {
        /// Keys sorted by strictly increasing time.
        points: Vec<CurveKey>,
    },
}

/// Single key of a [`HeightCurve::Keyframes`] curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Normalised distance in `[0, 1]`.
    pub time: f32,
    /// Height multiplier in `[0, 1]`.
    pub value: f32,
}

impl HeightCurve {
    /// Evaluates the curve, clamping the input to `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::Keyframes { points } => evaluate_keys(points, t),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let Self::Keyframes { points } = self else {
            return Ok(());
        };

        if points.len() < 2 {
            return Err(ConfigError::InvalidHeightCurve(
                "keyframe curves need at least two keys",
            ));
        }
        for key in points {
            let in_range = (0.0..=1.0).contains(&key.time) && (0.0..=1.0).contains(&key.value);
            if !in_range {
                return Err(ConfigError::InvalidHeightCurve(
                    "keys must lie within the unit square",
                ));
            }
        }
        for pair in points.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(ConfigError::InvalidHeightCurve(
                    "key times must be strictly increasing",
                ));
            }
            if pair[1].value < pair[0].value {
                return Err(ConfigError::InvalidHeightCurve(
                    "key values must not decrease",
                ));
            }
        }
        Ok(())
    }
}

fn evaluate_keys(points: &[CurveKey], t: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return t;
    };
    if t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }

    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if t <= to.time {
            let span = to.time - from.time;
            if span <= f32::EPSILON {
                return to.value;
            }
            let local = (t - from.time) / span;
            return from.value + (to.value - from.value) * local;
        }
    }
    last.value
}

/// Surface classification thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    /// Neighbour height difference above which a tile becomes rock.
    pub steep_slope_threshold: f32,
    /// Lowest elevation at which stones may appear.
    pub min_stone_height: f32,
    /// Highest elevation at which stones may appear.
    pub max_stone_height: f32,
    /// Chance of stones inside the stone height band.
    pub stone_probability: f32,
    /// Chance that each orthogonal neighbour of a stone tile also becomes stones.
    pub stone_cluster_probability: f32,
    /// Chance of rock on otherwise unremarkable ground.
    pub rock_randomness: f32,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            steep_slope_threshold: 1.5,
            min_stone_height: 3.0,
            max_stone_height: 4.8,
            stone_probability: 0.3,
            stone_cluster_probability: 0.5,
            rock_randomness: 0.2,
        }
    }
}

impl TextureSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("texture.steep_slope_threshold", self.steep_slope_threshold)?;
        non_negative("texture.min_stone_height", self.min_stone_height)?;
        non_negative("texture.max_stone_height", self.max_stone_height)?;
        if self.min_stone_height > self.max_stone_height {
            return Err(ConfigError::StoneBandInverted {
                min: self.min_stone_height,
                max: self.max_stone_height,
            });
        }
        unit_range("texture.stone_probability", self.stone_probability)?;
        unit_range(
            "texture.stone_cluster_probability",
            self.stone_cluster_probability,
        )?;
        unit_range("texture.rock_randomness", self.rock_randomness)
    }
}

/// Decorative prop scattering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationSettings {
    /// Chance that a grass tile receives a bush instead of a tree.
    pub bush_chance: f32,
}

impl Default for VegetationSettings {
    fn default() -> Self {
        Self { bush_chance: 0.2 }
    }
}

impl VegetationSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        unit_range("vegetation.bush_chance", self.bush_chance)
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn at_most(name: &'static str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::TooLarge { name, value, max })
    }
}

fn unit_range(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}
