#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for Tower Arena.
//!
//! The [`Grid`] exclusively owns every [`Tile`]. Generation systems borrow it
//! mutably for the duration of a stage and go through its accessors, which
//! enforce bounds and the terminal-classification rule.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tower_arena_core::{GridBounds, GridError, StructureId, TileCoord, TileKind};

mod tile;

pub use tile::{BuildSlot, Tile, ANCHOR_COUNT};

/// Ordered list of enemy spawn tiles, in path-creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpawnRecord {
    spawns: Vec<TileCoord>,
}

impl SpawnRecord {
    /// Spawn tiles in the order their paths were carved.
    #[must_use]
    pub fn as_slice(&self) -> &[TileCoord] {
        &self.spawns
    }

    /// Iterator over the recorded spawn tiles.
    pub fn iter(&self) -> impl Iterator<Item = &TileCoord> {
        self.spawns.iter()
    }

    /// Number of recorded spawns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    /// Reports whether no spawn has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }
}

/// Rectangular tile grid owning every tile of the arena.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    width: u32,
    height: u32,
    tile_size: f32,
    tiles: Vec<Tile>,
    spawn_record: SpawnRecord,
}

impl Grid {
    /// Creates an uninitialized grid without tiles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates `width * height` grass tiles spaced `tile_size` apart.
    ///
    /// Tiles are stored column-major: the tile at `(x, y)` lives at index
    /// `x * height + y`.
    #[must_use]
    pub fn create(width: u32, height: u32, tile_size: f32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        let mut tiles = Vec::with_capacity(capacity);
        for x in 0..width {
            for y in 0..height {
                let coord = TileCoord::new(to_signed(x), to_signed(y));
                tiles.push(Tile::grass(coord, tile_size));
            }
        }

        Self {
            width,
            height,
            tile_size,
            tiles,
            spawn_record: SpawnRecord::default(),
        }
    }

    /// Drops every tile and the spawn record, returning to the uninitialized state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Reports whether the grid currently holds tiles.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.tiles.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Objective tile at the middle of the grid.
    #[must_use]
    pub fn center(&self) -> TileCoord {
        TileCoord::new(to_signed(self.width / 2), to_signed(self.height / 2))
    }

    /// Reports whether the coordinate lies within `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Every tile in storage order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Retrieves the tile at `coord`.
    pub fn get(&self, coord: TileCoord) -> Result<&Tile, GridError> {
        self.index(coord)
            .and_then(|index| self.tiles.get(index))
            .ok_or_else(|| self.out_of_bounds(coord))
    }

    /// Classification of the tile at `coord`, or `None` outside the grid.
    #[must_use]
    pub fn kind(&self, coord: TileCoord) -> Option<TileKind> {
        self.get(coord).ok().map(Tile::kind)
    }

    /// Reclassifies the tile at `coord`.
    ///
    /// Repeating the current classification is a no-op. Terminal tiles
    /// reject any other classification. Build tiles receive an empty build
    /// slot; every other classification drops it.
    pub fn set_kind(&mut self, coord: TileCoord, kind: TileKind) -> Result<(), GridError> {
        let tile = self.tile_mut(coord)?;
        let current = tile.kind();
        if current == kind {
            return Ok(());
        }
        if current.is_terminal() {
            return Err(GridError::TerminalTileLocked {
                coord,
                current,
                requested: kind,
            });
        }
        tile.reclassify(kind);
        Ok(())
    }

    /// Reclassifies the tile to `to` only if it currently is `from`.
    ///
    /// Returns whether the tile changed. Coordinates outside the grid fail
    /// with [`GridError::OutOfBounds`].
    pub fn promote(
        &mut self,
        coord: TileCoord,
        from: TileKind,
        to: TileKind,
    ) -> Result<bool, GridError> {
        if self.get(coord)?.kind() != from || from == to {
            return Ok(false);
        }
        self.set_kind(coord, to)?;
        Ok(true)
    }

    /// Writes the elevation of the tile at `coord`.
    pub fn set_elevation(&mut self, coord: TileCoord, elevation: f32) -> Result<(), GridError> {
        self.tile_mut(coord)?.set_elevation(elevation);
        Ok(())
    }

    /// Marks the tile as an enemy spawn and appends it to the spawn record.
    pub fn record_spawn(&mut self, coord: TileCoord) -> Result<(), GridError> {
        self.set_kind(coord, TileKind::EnemySpawn)?;
        self.spawn_record.spawns.push(coord);
        Ok(())
    }

    /// Spawn tiles recorded during path carving.
    #[must_use]
    pub const fn spawn_record(&self) -> &SpawnRecord {
        &self.spawn_record
    }

    /// Places a structure on the build slot at `coord`.
    pub fn occupy_build_slot(
        &mut self,
        coord: TileCoord,
        structure: StructureId,
    ) -> Result<(), GridError> {
        let tile = self.tile_mut(coord)?;
        let kind = tile.kind();
        let slot = tile
            .build_slot_mut()
            .ok_or(GridError::NotBuildable { coord, kind })?;
        if let Some(occupant) = slot.occupant() {
            return Err(GridError::SlotOccupied { coord, occupant });
        }
        slot.occupy(structure);
        Ok(())
    }

    /// Removes the structure from the build slot at `coord`, returning it.
    pub fn vacate_build_slot(&mut self, coord: TileCoord) -> Result<Option<StructureId>, GridError> {
        let tile = self.tile_mut(coord)?;
        let kind = tile.kind();
        let slot = tile
            .build_slot_mut()
            .ok_or(GridError::NotBuildable { coord, kind })?;
        Ok(slot.vacate())
    }

    /// World-space box enclosing every tile, assuming tiles are centered on their positions.
    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        let half = self.tile_size * 0.5;
        let (low, high) = self
            .tiles
            .iter()
            .map(Tile::elevation)
            .fold(None, |range: Option<(f32, f32)>, elevation| match range {
                None => Some((elevation, elevation)),
                Some((low, high)) => Some((low.min(elevation), high.max(elevation))),
            })
            .unwrap_or((0.0, 0.0));

        GridBounds::new(
            Vec3::new(-half, low, -half),
            Vec3::new(
                self.width as f32 * self.tile_size - half,
                high,
                self.height as f32 * self.tile_size - half,
            ),
        )
    }

    /// Path tile whose world position lies closest to `position`.
    #[must_use]
    pub fn closest_path_tile(&self, position: Vec3) -> Option<&Tile> {
        self.tiles
            .iter()
            .filter(|tile| tile.kind() == TileKind::Path)
            .map(|tile| (tile, tile.position().distance_squared(position)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(tile, _)| tile)
    }

    /// Captures a serialisable copy of the grid for downstream consumers.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            tile_size: self.tile_size,
            kinds: self.tiles.iter().map(Tile::kind).collect(),
            elevations: self.tiles.iter().map(Tile::elevation).collect(),
            spawns: self.spawn_record.as_slice().to_vec(),
        }
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        let x = u32::try_from(coord.x()).ok()?;
        let y = u32::try_from(coord.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = u64::from(x) * u64::from(self.height) + u64::from(y);
        usize::try_from(index).ok()
    }

    fn tile_mut(&mut self, coord: TileCoord) -> Result<&mut Tile, GridError> {
        let error = self.out_of_bounds(coord);
        match self.index(coord) {
            Some(index) => self.tiles.get_mut(index).ok_or(error),
            None => Err(error),
        }
    }

    fn out_of_bounds(&self, coord: TileCoord) -> GridError {
        GridError::OutOfBounds {
            coord,
            width: self.width,
            height: self.height,
        }
    }
}

/// Serialisable copy of a generated grid, in storage order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Edge length of a tile in world units.
    pub tile_size: f32,
    /// Tile classifications indexed by `x * height + y`.
    pub kinds: Vec<TileKind>,
    /// Tile elevations indexed by `x * height + y`.
    pub elevations: Vec<f32>,
    /// Spawn tiles in path-creation order.
    pub spawns: Vec<TileCoord>,
}

fn to_signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
