//! Per-tile state owned by the grid.

use glam::Vec3;
use tower_arena_core::{StructureId, TileCoord, TileKind};

/// Number of vegetation anchors carried by every tile.
pub const ANCHOR_COUNT: usize = 5;

/// Anchor layout expressed as fractions of the tile size, relative to the tile position.
const ANCHOR_LAYOUT: [(f32, f32); ANCHOR_COUNT] = [
    (0.0, 0.0),
    (-0.25, -0.25),
    (0.25, -0.25),
    (-0.25, 0.25),
    (0.25, 0.25),
];

/// Build capability attached to buildable tiles.
///
/// The slot only tracks whether a structure sits on the tile; the structure
/// itself is owned by the host's structure collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSlot {
    occupant: Option<StructureId>,
}

impl BuildSlot {
    /// Structure currently placed on the slot, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<StructureId> {
        self.occupant
    }

    /// Reports whether a structure sits on the slot.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub(crate) fn occupy(&mut self, structure: StructureId) {
        self.occupant = Some(structure);
    }

    pub(crate) fn vacate(&mut self) -> Option<StructureId> {
        self.occupant.take()
    }
}

/// Single cell of the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    coord: TileCoord,
    kind: TileKind,
    position: Vec3,
    build_slot: Option<BuildSlot>,
    anchors: [Vec3; ANCHOR_COUNT],
}

impl Tile {
    pub(crate) fn grass(coord: TileCoord, tile_size: f32) -> Self {
        let position = Vec3::new(
            coord.x() as f32 * tile_size,
            0.0,
            coord.y() as f32 * tile_size,
        );
        let anchors =
            ANCHOR_LAYOUT.map(|(dx, dz)| Vec3::new(dx * tile_size, 0.0, dz * tile_size));
        Self {
            coord,
            kind: TileKind::Grass,
            position,
            build_slot: None,
            anchors,
        }
    }

    /// Grid coordinate of the tile.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Current surface classification.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// World-space position; the vertical component is the elevation.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Height of the tile surface.
    #[must_use]
    pub const fn elevation(&self) -> f32 {
        self.position.y
    }

    /// Build capability, present only on [`TileKind::Build`] tiles.
    #[must_use]
    pub const fn build_slot(&self) -> Option<&BuildSlot> {
        self.build_slot.as_ref()
    }

    /// Vegetation anchors relative to the tile position.
    #[must_use]
    pub fn vegetation_anchors(&self) -> &[Vec3] {
        &self.anchors
    }

    /// World-space position of the anchor at `index`.
    #[must_use]
    pub fn anchor_world(&self, index: usize) -> Option<Vec3> {
        self.anchors.get(index).map(|offset| self.position + *offset)
    }

    pub(crate) fn reclassify(&mut self, kind: TileKind) {
        self.kind = kind;
        if kind == TileKind::Build {
            if self.build_slot.is_none() {
                self.build_slot = Some(BuildSlot::default());
            }
        } else {
            self.build_slot = None;
        }
    }

    pub(crate) fn set_elevation(&mut self, elevation: f32) {
        self.position.y = elevation;
    }

    pub(crate) fn build_slot_mut(&mut self) -> Option<&mut BuildSlot> {
        self.build_slot.as_mut()
    }
}
