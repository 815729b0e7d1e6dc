//! Structure placements derived from the spawn record.

use glam::Vec3;
use tower_arena_core::{EnemySpawnerPlacement, GridError, MainTowerPlacement};
use tower_arena_world::Grid;

/// Main tower placement at the grid center, facing away from the average approach.
///
/// Enemies travel from every spawn toward the center; the tower turns to face
/// the direction they arrive from on average.
pub(crate) fn main_tower(grid: &Grid) -> Result<MainTowerPlacement, GridError> {
    let center = grid.get(grid.center())?;
    let position = center.position();

    let mut approach = Vec3::ZERO;
    for &spawn in grid.spawn_record().iter() {
        if let Some(direction) = horizontal_direction(grid.get(spawn)?.position(), position) {
            approach += direction;
        }
    }

    Ok(MainTowerPlacement {
        tile: center.coord(),
        position,
        facing: horizontal_direction(position, position - approach),
    })
}

/// One spawner placement per recorded spawn, each facing the grid center.
pub(crate) fn enemy_spawners(grid: &Grid) -> Result<Vec<EnemySpawnerPlacement>, GridError> {
    let target = grid.get(grid.center())?.position();
    grid.spawn_record()
        .iter()
        .enumerate()
        .map(|(index, &coord)| {
            let position = grid.get(coord)?.position();
            Ok(EnemySpawnerPlacement {
                index,
                tile: coord,
                position,
                facing: horizontal_direction(position, target),
            })
        })
        .collect()
}

/// Unit direction from `from` to `to` projected onto the ground plane.
fn horizontal_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    delta.try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_arena_core::TileCoord;

    fn approx(actual: Option<Vec3>, expected: Vec3) {
        let actual = actual.expect("facing should be defined");
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn horizontal_direction_ignores_height() {
        approx(
            horizontal_direction(Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, 0.0, 4.0)),
            Vec3::new(0.6, 0.0, 0.8),
        );
        assert_eq!(horizontal_direction(Vec3::ONE, Vec3::new(1.0, 9.0, 1.0)), None);
    }

    #[test]
    fn tower_faces_the_approach() {
        let mut grid = Grid::create(11, 11, 1.0);
        grid.record_spawn(TileCoord::new(0, 5)).expect("inside");

        let tower = main_tower(&grid).expect("center inside");
        assert_eq!(tower.tile, TileCoord::new(5, 5));
        approx(tower.facing, Vec3::new(-1.0, 0.0, 0.0));

        let spawners = enemy_spawners(&grid).expect("spawns inside");
        assert_eq!(spawners.len(), 1);
        assert_eq!(spawners[0].index, 0);
        approx(spawners[0].facing, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn opposing_spawns_leave_the_tower_unturned() {
        let mut grid = Grid::create(11, 11, 1.0);
        grid.record_spawn(TileCoord::new(0, 5)).expect("inside");
        grid.record_spawn(TileCoord::new(10, 5)).expect("inside");

        let tower = main_tower(&grid).expect("center inside");
        assert_eq!(tower.facing, None);
    }

    #[test]
    fn spawner_on_the_objective_has_no_facing() {
        let mut grid = Grid::create(5, 5, 2.0);
        let center = grid.center();
        grid.record_spawn(center).expect("inside");

        let spawners = enemy_spawners(&grid).expect("spawns inside");
        assert_eq!(spawners[0].facing, None);
        assert_eq!(main_tower(&grid).expect("center inside").facing, None);
    }
}
