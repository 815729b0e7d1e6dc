use std::collections::BTreeSet;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tower_arena_core::{PropCategory, PropRequest, TileCoord, TileKind, VegetationSettings};
use tower_arena_system_vegetation::VegetationScatterer;
use tower_arena_world::Grid;

fn scatter(grid: &Grid, bush_chance: f32, seed: u64) -> Vec<PropRequest> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut requests = Vec::new();
    VegetationScatterer::new().scatter(
        grid,
        &VegetationSettings { bush_chance },
        &mut rng,
        &mut requests,
    );
    requests
}

fn mixed_grid() -> Grid {
    let mut grid = Grid::create(6, 6, 2.0);
    grid.set_kind(TileCoord::new(0, 0), TileKind::Path).expect("inside");
    grid.set_kind(TileCoord::new(1, 0), TileKind::Build).expect("inside");
    grid.set_kind(TileCoord::new(2, 0), TileKind::Rock).expect("inside");
    grid.set_kind(TileCoord::new(3, 0), TileKind::Stones).expect("inside");
    grid.record_spawn(TileCoord::new(4, 0)).expect("inside");
    grid
}

#[test]
fn one_request_per_decorated_tile() {
    let grid = mixed_grid();
    let requests = scatter(&grid, 0.2, 5);

    assert_eq!(requests.len(), 36 - 3);
    let tiles: BTreeSet<_> = requests.iter().map(|request| request.tile).collect();
    assert_eq!(tiles.len(), requests.len(), "tile decorated twice");
    for skipped in [
        TileCoord::new(0, 0),
        TileCoord::new(1, 0),
        TileCoord::new(4, 0),
    ] {
        assert!(!tiles.contains(&skipped), "{skipped} should stay bare");
    }
}

#[test]
fn categories_follow_surface() {
    let grid = mixed_grid();
    for request in scatter(&grid, 0.5, 6) {
        let kind = grid.kind(request.tile).expect("request inside the grid");
        match request.category {
            PropCategory::Rock => {
                assert!(matches!(kind, TileKind::Rock | TileKind::Stones));
            }
            PropCategory::Bush | PropCategory::Tree => assert_eq!(kind, TileKind::Grass),
        }
    }
}

#[test]
fn bush_chance_extremes() {
    let grid = Grid::create(5, 5, 1.0);
    assert!(scatter(&grid, 0.0, 1)
        .iter()
        .all(|request| request.category == PropCategory::Tree));
    assert!(scatter(&grid, 1.0, 1)
        .iter()
        .all(|request| request.category == PropCategory::Bush));
}

#[test]
fn anchors_come_from_the_tile_anchor_set() {
    let mut grid = Grid::create(4, 4, 2.0);
    grid.set_elevation(TileCoord::new(2, 3), 1.5).expect("inside");

    for request in scatter(&grid, 0.2, 8) {
        let tile = grid.get(request.tile).expect("inside");
        let offset = request.anchor - tile.position();
        assert!(
            tile.vegetation_anchors()
                .iter()
                .any(|anchor| anchor.abs_diff_eq(offset, 1e-5)),
            "anchor {} not part of {}",
            request.anchor,
            request.tile
        );
        assert_eq!(request.anchor.y, tile.elevation());
    }
    assert_eq!(
        grid.get(TileCoord::new(2, 3)).expect("inside").position(),
        Vec3::new(4.0, 1.5, 6.0)
    );
}
