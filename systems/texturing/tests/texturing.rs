use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tower_arena_core::{ElevationSettings, HeightCurve, TextureSettings, TileCoord, TileKind};
use tower_arena_system_elevation::ElevationField;
use tower_arena_system_texturing::TextureClassifier;
use tower_arena_world::Grid;

fn plateau_grid(size: u32) -> (Grid, ElevationField) {
    let mut grid = Grid::create(size, size, 1.0);
    let center = grid.center();
    grid.set_kind(center, TileKind::Build).expect("center inside");
    let settings = ElevationSettings {
        flat_radius: 2.0,
        max_height: 6.0,
        height_gradient: 1.0,
        height_curve: HeightCurve::Linear,
    };
    let field = ElevationField::compute(&grid, &settings);
    field.apply(&mut grid).expect("field matches the grid");
    (grid, field)
}

fn quiet() -> TextureSettings {
    TextureSettings {
        steep_slope_threshold: 100.0,
        min_stone_height: 3.0,
        max_stone_height: 4.8,
        stone_probability: 0.0,
        stone_cluster_probability: 0.0,
        rock_randomness: 0.0,
    }
}

fn classify(grid: &mut Grid, field: &ElevationField, settings: &TextureSettings, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    TextureClassifier::new()
        .classify(grid, field, settings, &mut rng)
        .expect("classification succeeds");
}

#[test]
fn zero_threshold_turns_every_slope_into_rock() {
    let (mut grid, field) = plateau_grid(15);
    let settings = TextureSettings {
        steep_slope_threshold: 0.0,
        ..quiet()
    };
    classify(&mut grid, &field, &settings, 1);

    for tile in grid.tiles() {
        let coord = tile.coord();
        if tile.kind() == TileKind::Build || field.is_flat_anchored(coord) {
            continue;
        }
        let elevation = tile.elevation();
        let sloped = coord.orthogonal_neighbors().into_iter().any(|neighbor| {
            grid.get(neighbor)
                .map(|other| other.elevation() != elevation)
                .unwrap_or(false)
        });
        let expected = if sloped { TileKind::Rock } else { TileKind::Grass };
        assert_eq!(tile.kind(), expected, "unexpected surface at {coord}");
    }
    assert_eq!(grid.kind(TileCoord::new(0, 0)), Some(TileKind::Grass));
}

#[test]
fn flat_and_reserved_tiles_keep_their_kind() {
    let (mut grid, field) = plateau_grid(15);
    grid.set_kind(TileCoord::new(0, 7), TileKind::Path)
        .expect("inside");
    let settings = TextureSettings {
        steep_slope_threshold: 0.0,
        rock_randomness: 1.0,
        ..quiet()
    };
    classify(&mut grid, &field, &settings, 2);

    let center = grid.center();
    assert_eq!(grid.kind(center), Some(TileKind::Build));
    assert_eq!(grid.kind(center.offset(1, 1)), Some(TileKind::Grass));
    assert_eq!(grid.kind(center.offset(2, 0)), Some(TileKind::Grass));
    assert_eq!(grid.kind(TileCoord::new(0, 7)), Some(TileKind::Path));
}

#[test]
fn rock_randomness_roughens_level_ground() {
    let (mut grid, field) = plateau_grid(15);
    let settings = TextureSettings {
        rock_randomness: 1.0,
        ..quiet()
    };
    classify(&mut grid, &field, &settings, 3);

    for tile in grid.tiles() {
        if !field.is_flat_anchored(tile.coord()) {
            assert_eq!(tile.kind(), TileKind::Rock, "{} stayed smooth", tile.coord());
        }
    }
}

#[test]
fn stones_appear_only_in_the_stone_band_or_beside_it() {
    let (mut grid, field) = plateau_grid(21);
    let settings = TextureSettings {
        stone_probability: 1.0,
        stone_cluster_probability: 1.0,
        ..quiet()
    };
    classify(&mut grid, &field, &settings, 4);

    let in_band = |coord: TileCoord| {
        field
            .height(coord)
            .map(|height| (3.0..=4.8).contains(&height))
            .unwrap_or(false)
    };
    let mut stones = 0;
    for tile in grid.tiles() {
        let coord = tile.coord();
        if in_band(coord) && !field.is_flat_anchored(coord) {
            assert_eq!(tile.kind(), TileKind::Stones, "{coord} missed the band");
        }
        if tile.kind() == TileKind::Stones {
            stones += 1;
            let near_band = in_band(coord)
                || coord
                    .orthogonal_neighbors()
                    .into_iter()
                    .any(|neighbor| in_band(neighbor));
            assert!(near_band, "{coord} is stone far from the band");
        }
    }
    assert!(stones > 0);
}

#[test]
fn cluster_stones_outside_the_band_revert_to_grass() {
    let (mut grid, field) = plateau_grid(21);
    let settings = TextureSettings {
        stone_probability: 1.0,
        stone_cluster_probability: 1.0,
        ..quiet()
    };
    let banded = TileCoord::new(13, 10);
    let above = TileCoord::new(14, 10);
    assert_eq!(field.height(banded), Some(4.5));
    assert_eq!(field.height(above), Some(6.0));

    classify(&mut grid, &field, &settings, 5);

    assert_eq!(grid.kind(banded), Some(TileKind::Stones));
    assert_eq!(grid.kind(above), Some(TileKind::Grass));
}

#[test]
fn identical_seeds_classify_identically() {
    let settings = TextureSettings::default();
    let (mut first, field) = plateau_grid(25);
    let (mut second, _) = plateau_grid(25);
    classify(&mut first, &field, &settings, 99);
    classify(&mut second, &field, &settings, 99);
    assert_eq!(first.snapshot(), second.snapshot());
}
