use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tower_arena_core::{BlobSettings, TileKind};
use tower_arena_system_radial_blob::RadialBlobGenerator;
use tower_arena_world::Grid;

fn carve(grid: &mut Grid, settings: &BlobSettings, seed: u64) -> u32 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    RadialBlobGenerator::new()
        .carve(grid, settings, &mut rng)
        .expect("blob stays within the grid")
}

#[test]
fn blob_fills_inner_band_and_leaves_the_hole() {
    let mut grid = Grid::create(30, 30, 1.0);
    let settings = BlobSettings::default();
    let carved = carve(&mut grid, &settings, 9);
    let center = grid.center();

    let mut counted = 0;
    for tile in grid.tiles() {
        let distance = center.distance(tile.coord());
        let is_path = tile.kind() == TileKind::Path;
        counted += u32::from(is_path);
        if distance < 2.0 || distance > 6.0 {
            assert!(!is_path, "{} carved outside the annulus", tile.coord());
        } else if distance < 3.0 {
            assert!(is_path, "{} inside the core band was skipped", tile.coord());
        }
    }
    assert_eq!(carved, counted);
}

#[test]
fn zero_density_carves_nothing() {
    let mut grid = Grid::create(20, 20, 1.0);
    let settings = BlobSettings {
        density: 0.0,
        ..BlobSettings::default()
    };
    assert_eq!(carve(&mut grid, &settings, 1), 0);
    assert!(grid.tiles().iter().all(|tile| tile.kind() == TileKind::Grass));
}

#[test]
fn blob_is_clipped_by_small_grids() {
    let mut grid = Grid::create(4, 4, 1.0);
    let settings = BlobSettings {
        min_radius: 0,
        max_radius: 10,
        irregularity: 0.0,
        density: 1.0,
    };
    let _ = carve(&mut grid, &settings, 5);
    assert_eq!(grid.tiles().len(), 16);
    assert_eq!(grid.kind(grid.center()), Some(TileKind::Path));
}

#[test]
fn blob_preserves_spawns() {
    let mut grid = Grid::create(20, 20, 1.0);
    let center = grid.center();
    let spawn = center.offset(2, 0);
    grid.record_spawn(spawn).expect("spawn inside the grid");

    let _ = carve(&mut grid, &BlobSettings::default(), 2);
    assert_eq!(grid.kind(spawn), Some(TileKind::EnemySpawn));
}

#[test]
fn identical_seeds_carve_identical_blobs() {
    let settings = BlobSettings {
        irregularity: 0.6,
        density: 0.8,
        ..BlobSettings::default()
    };
    let mut first = Grid::create(25, 25, 1.0);
    let mut second = Grid::create(25, 25, 1.0);
    let _ = carve(&mut first, &settings, 77);
    let _ = carve(&mut second, &settings, 77);
    assert_eq!(first.snapshot(), second.snapshot());
}
