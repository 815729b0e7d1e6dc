//! Text renderings of a generated arena.

use std::fmt::Write as _;

use serde::Serialize;
use tower_arena_core::{PropCategory, PropRequest, TileCoord, TileKind};
use tower_arena_system_generation::GenerationReport;
use tower_arena_world::{Grid, GridSnapshot};

use crate::host::RecordingHost;

/// Glyph used for each surface in the ASCII map.
const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Grass => '.',
        TileKind::Path => '#',
        TileKind::Build => 'b',
        TileKind::Rock => '^',
        TileKind::Stones => ':',
        TileKind::EnemySpawn => 'S',
        TileKind::MainTower => 'T',
    }
}

/// Draws the grid with `+y` pointing up; the main tower is overlaid as `T`.
pub(crate) fn ascii_map(grid: &Grid, host: &RecordingHost) -> String {
    let tower = host.main_tower().map(|placement| placement.tile);
    let mut map = String::new();
    for y in (0..signed(grid.height())).rev() {
        for x in 0..signed(grid.width()) {
            let coord = TileCoord::new(x, y);
            let symbol = if Some(coord) == tower {
                'T'
            } else {
                grid.kind(coord).map_or(' ', glyph)
            };
            map.push(symbol);
        }
        map.push('\n');
    }
    map
}

/// Human-readable summary of spawns, warnings and hand-offs.
pub(crate) fn summary(grid: &Grid, report: &GenerationReport, host: &RecordingHost) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "seed {} | {}x{} tiles of {} units",
        report.seed(),
        grid.width(),
        grid.height(),
        grid.tile_size()
    );

    if let Some(tower) = host.main_tower() {
        let _ = writeln!(text, "main tower at {}", tower.tile);
    }
    for spawner in host.spawners() {
        let _ = writeln!(text, "spawner {} at {}", spawner.index, spawner.tile);
    }
    let _ = writeln!(
        text,
        "registered {} of {} spawners",
        host.registered().len(),
        grid.spawn_record().len()
    );

    let _ = writeln!(
        text,
        "props: {} bushes, {} trees, {} rocks",
        host.prop_count(PropCategory::Bush),
        host.prop_count(PropCategory::Tree),
        host.prop_count(PropCategory::Rock)
    );
    if let Some(bounds) = host.baked_bounds() {
        let _ = writeln!(text, "navigation bounds {} .. {}", bounds.min(), bounds.max());
    }

    if report.warnings().is_empty() {
        let _ = writeln!(text, "no warnings");
    }
    for warning in report.warnings() {
        let _ = writeln!(text, "warning: {warning}");
    }
    text
}

/// JSON document describing the arena for downstream tooling.
#[derive(Debug, Serialize)]
pub(crate) struct ArenaDocument<'a> {
    seed: u64,
    grid: GridSnapshot,
    props: &'a [PropRequest],
    registered_spawners: usize,
    warnings: Vec<String>,
}

impl<'a> ArenaDocument<'a> {
    /// Collects the generated grid and report into a serialisable document.
    pub(crate) fn new(grid: &Grid, report: &'a GenerationReport) -> Self {
        Self {
            seed: report.seed(),
            grid: grid.snapshot(),
            props: report.props(),
            registered_spawners: report.registered_spawners(),
            warnings: report.warnings().iter().map(ToString::to_string).collect(),
        }
    }
}

fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
