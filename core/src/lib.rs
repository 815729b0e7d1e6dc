#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower Arena generator.
//!
//! This crate defines the vocabulary that connects the authoritative grid,
//! the pure generation systems and the host adapters. Systems read a
//! [`GenerationConfig`], mutate the grid stage by stage and report non-fatal
//! problems as [`GenerationWarning`] values. Everything the generator cannot
//! do itself (baking navigation meshes, instantiating props, placing
//! structures, registering enemy spawners) is expressed as a collaborator
//! trait that hosts implement.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;

pub use config::{
    BlobSettings, BuildSettings, CurvatureSettings, CurveKey, ElevationSettings,
    GenerationConfig, GridSettings, HeightCurve, PathSettings, TextureSettings,
    VegetationSettings, MAX_GRID_SIDE, MAX_PATHS, MAX_TILE_REACH,
};

/// Location of a single tile expressed as signed column and row indices.
///
/// Coordinates are signed so that generation stages can reason about
/// candidates that fall outside the grid before rejecting them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Euclidean distance between two coordinates measured in tiles.
    #[must_use]
    pub fn distance(self, other: TileCoord) -> f32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt() as f32
    }

    /// Chebyshev (king-move) distance between two coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Coordinates of the four orthogonal neighbours in east, west, north, south order.
    #[must_use]
    pub const fn orthogonal_neighbors(self) -> [TileCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Surface classification assigned to a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Default walkable ground that hosts trees and bushes.
    #[default]
    Grass,
    /// Carved enemy route leading toward the objective.
    Path,
    /// Flat ground adjacent to a path where structures may be built.
    Build,
    /// Steep or rugged ground decorated with rocks.
    Rock,
    /// Elevated ground scattered with stones.
    Stones,
    /// Tile hosting an enemy spawner. Terminal.
    EnemySpawn,
    /// Tile hosting the main tower. Terminal.
    MainTower,
}

impl TileKind {
    /// Reports whether the classification may never be overwritten once assigned.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::EnemySpawn | Self::MainTower)
    }

    /// Reports whether the tile anchors the flat terrain surrounding the routes.
    #[must_use]
    pub const fn is_flat_anchor(self) -> bool {
        matches!(self, Self::Build | Self::EnemySpawn)
    }
}

/// Opaque identifier of a structure placed by the structure collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(u32);

impl StructureId {
    /// Creates a new structure identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Axis-aligned world-space box enclosing the generated arena.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    min: Vec3,
    max: Vec3,
}

impl GridBounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Corner with the smallest components.
    #[must_use]
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Corner with the largest components.
    #[must_use]
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Extent of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Category of decorative prop requested from the prop collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropCategory {
    /// Low shrubbery placed on a minority of grass tiles.
    Bush,
    /// Trees placed on the remaining grass tiles.
    Tree,
    /// Boulders placed on rock and stone tiles.
    Rock,
}

/// Request asking the prop collaborator to decorate a tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropRequest {
    /// Tile being decorated.
    pub tile: TileCoord,
    /// Category of prop to instantiate.
    pub category: PropCategory,
    /// World-space anchor chosen from the tile's anchor set.
    pub anchor: Vec3,
}

/// Placement of the main tower at the arena's objective.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MainTowerPlacement {
    /// Tile occupied by the tower.
    pub tile: TileCoord,
    /// World-space position of the tile.
    pub position: Vec3,
    /// Horizontal unit direction the tower faces, if any spawner defines one.
    pub facing: Option<Vec3>,
}

/// Placement of an enemy spawner at the start of a carved path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawnerPlacement {
    /// Position of the spawner within the spawn record.
    pub index: usize,
    /// Tile occupied by the spawner.
    pub tile: TileCoord,
    /// World-space position of the tile.
    pub position: Vec3,
    /// Horizontal unit direction toward the objective, absent when the spawner sits on it.
    pub facing: Option<Vec3>,
}

/// Collaborator that bakes the navigation mesh consumed by enemy movement.
pub trait NavMeshBaker {
    /// Bakes the navigation data covering the provided bounds.
    fn bake(&mut self, bounds: GridBounds);
}

/// Collaborator that instantiates structures on the generated arena.
pub trait StructureSpawner {
    /// Instantiates the main tower.
    fn place_main_tower(&mut self, placement: MainTowerPlacement);

    /// Instantiates an enemy spawner structure.
    fn place_enemy_spawner(&mut self, placement: EnemySpawnerPlacement);
}

/// Collaborator that instantiates and scales decorative props.
pub trait PropSpawner {
    /// Instantiates a prop for the provided request.
    fn spawn_prop(&mut self, request: PropRequest);
}

/// Collaborator that registers spawn tiles with the wave system.
pub trait SpawnerRegistry {
    /// Registers the spawn tiles and returns how many spawners were accepted.
    fn register(&mut self, spawns: &[TileCoord], expected: usize) -> usize;
}

/// Collaborator that ignores every request.
///
/// Useful for headless generation and tests. The registry half accepts every
/// spawn tile it is handed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl NavMeshBaker for Detached {
    fn bake(&mut self, _bounds: GridBounds) {}
}

impl StructureSpawner for Detached {
    fn place_main_tower(&mut self, _placement: MainTowerPlacement) {}

    fn place_enemy_spawner(&mut self, _placement: EnemySpawnerPlacement) {}
}

impl PropSpawner for Detached {
    fn spawn_prop(&mut self, _request: PropRequest) {}
}

impl SpawnerRegistry for Detached {
    fn register(&mut self, spawns: &[TileCoord], _expected: usize) -> usize {
        spawns.len()
    }
}

/// Stages executed by the generation pipeline, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenerationStage {
    /// Tears down the previous grid and allocates a fresh Grass baseline.
    Clearing,
    /// Carves spawn-to-center paths.
    CarvingPaths,
    /// Carves the organic clearing around the objective.
    CarvingBlob,
    /// Promotes grass bordering the paths to buildable ground.
    DerivingBuildAreas,
    /// Assigns tile elevations.
    ComputingElevation,
    /// Classifies the remaining tiles into surface types.
    ClassifyingTextures,
    /// Hands the main tower and spawner structures to the host.
    SpawningStructures,
    /// Requests decorative props.
    ScatteringVegetation,
    /// Triggers the navigation mesh bake.
    BakingNavMesh,
    /// Hands the spawn record to the spawner registry.
    RegisteringSpawners,
}

impl GenerationStage {
    /// Every stage in execution order.
    pub const ALL: [GenerationStage; 10] = [
        Self::Clearing,
        Self::CarvingPaths,
        Self::CarvingBlob,
        Self::DerivingBuildAreas,
        Self::ComputingElevation,
        Self::ClassifyingTextures,
        Self::SpawningStructures,
        Self::ScatteringVegetation,
        Self::BakingNavMesh,
        Self::RegisteringSpawners,
    ];
}

/// Contract violations raised by grid accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside the allocated grid.
    #[error("coordinate {coord} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Offending coordinate.
        coord: TileCoord,
        /// Number of columns in the grid.
        width: u32,
        /// Number of rows in the grid.
        height: u32,
    },
    /// The tile carries a terminal classification and cannot change.
    #[error("tile {coord} is {current:?} and cannot become {requested:?}")]
    TerminalTileLocked {
        /// Offending coordinate.
        coord: TileCoord,
        /// Terminal classification currently held by the tile.
        current: TileKind,
        /// Classification that was requested.
        requested: TileKind,
    },
    /// A build-slot operation targeted a tile without a build slot.
    #[error("tile {coord} is {kind:?} and has no build slot")]
    NotBuildable {
        /// Offending coordinate.
        coord: TileCoord,
        /// Classification of the tile.
        kind: TileKind,
    },
    /// The build slot already holds a structure.
    #[error("build slot at {coord} already holds structure {}", .occupant.get())]
    SlotOccupied {
        /// Offending coordinate.
        coord: TileCoord,
        /// Structure currently occupying the slot.
        occupant: StructureId,
    },
}

/// Reasons a configuration is rejected before generation begins.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// One of the grid dimensions is zero.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid {
        /// Configured column count.
        width: u32,
        /// Configured row count.
        height: u32,
    },
    /// The tile size is zero, negative or not a number.
    #[error("tile size must be positive, got {0}")]
    NonPositiveTileSize(f32),
    /// No paths were requested.
    #[error("at least one path must be requested")]
    NoPaths,
    /// A value that must be finite and non-negative is negative, infinite or not a number.
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative {
        /// Configuration key.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A count or tile reach exceeds what the stages can iterate over.
    #[error("{name} must not exceed {max}, got {value}")]
    TooLarge {
        /// Configuration key.
        name: &'static str,
        /// Offending value.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// A value that must lie within `[0, 1]` does not.
    #[error("{name} must lie within [0, 1], got {value}")]
    OutOfUnitRange {
        /// Configuration key.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
    /// The spawn distance range is inverted.
    #[error("minimum spawn distance {min} exceeds maximum {max}")]
    SpawnDistanceInverted {
        /// Configured minimum distance.
        min: f32,
        /// Configured maximum distance.
        max: f32,
    },
    /// The blob radius range is inverted.
    #[error("minimum blob radius {min} exceeds maximum {max}")]
    BlobRadiusInverted {
        /// Configured minimum radius.
        min: u32,
        /// Configured maximum radius.
        max: u32,
    },
    /// The stone height band is inverted.
    #[error("minimum stone height {min} exceeds maximum {max}")]
    StoneBandInverted {
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
    /// The flat radius is zero, negative or not a number.
    #[error("flat radius must be positive, got {0}")]
    NonPositiveFlatRadius(f32),
    /// The height curve is not a monotonic mapping of `[0, 1]` onto `[0, 1]`.
    #[error("height curve is invalid: {0}")]
    InvalidHeightCurve(&'static str),
    /// The requested spawns cannot be separated inside the spawn annulus.
    #[error(
        "{count} spawn points cannot keep {separation} tiles apart within {max_distance} tiles of the center"
    )]
    PlacementInfeasible {
        /// Requested path count.
        count: u32,
        /// Configured minimum separation.
        separation: f32,
        /// Configured maximum spawn distance.
        max_distance: f32,
    },
}

/// Fatal generation failures.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// The configuration failed pre-flight validation; the grid was not touched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Non-fatal problems reported while the pipeline keeps running.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GenerationWarning {
    /// No start point satisfied the separation rules; the grid center was used.
    #[error("path {path}: no valid start point found, fell back to {fallback}")]
    PlacementDegraded {
        /// Index of the affected path.
        path: usize,
        /// Coordinate used instead.
        fallback: TileCoord,
    },
    /// The curved walk ran out of steps and finished without curvature.
    #[error("path {path}: curvature step budget exhausted at {cursor}")]
    WalkBudgetExhausted {
        /// Index of the affected path.
        path: usize,
        /// Cursor position when the budget ran out.
        cursor: TileCoord,
    },
    /// The spawner registry accepted a different number of spawners than configured.
    #[error("spawner registry accepted {registered} spawners, expected {expected}")]
    SpawnCountMismatch {
        /// Configured path count.
        expected: usize,
        /// Spawners accepted by the registry.
        registered: usize,
    },
    /// A stage hit a grid contract violation and stopped early.
    #[error("{stage:?} stopped early: {error}")]
    StageAborted {
        /// Stage that stopped.
        stage: GenerationStage,
        /// Violation that stopped it.
        error: GridError,
    },
}
