//! Collaborators that record every hand-off from the generation pipeline.

use tower_arena_core::{
    EnemySpawnerPlacement, GridBounds, MainTowerPlacement, NavMeshBaker, PropCategory,
    PropRequest, PropSpawner, SpawnerRegistry, StructureSpawner, TileCoord,
};
use tower_arena_system_generation::Collaborators;

/// Headless stand-in for the engine side of the arena.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    nav_mesh: NavMeshLog,
    structures: StructureLog,
    props: PropLog,
    registry: RegistryLog,
}

impl RecordingHost {
    /// Borrows the host as the pipeline's collaborator set.
    pub(crate) fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            nav_mesh: &mut self.nav_mesh,
            structures: &mut self.structures,
            props: &mut self.props,
            registry: &mut self.registry,
        }
    }

    /// Main tower placement, if the structure stage ran.
    pub(crate) fn main_tower(&self) -> Option<&MainTowerPlacement> {
        self.structures.tower.as_ref()
    }

    /// Enemy spawners placed by the structure stage.
    pub(crate) fn spawners(&self) -> &[EnemySpawnerPlacement] {
        &self.structures.spawners
    }

    /// Number of props instantiated for `category`.
    pub(crate) fn prop_count(&self, category: PropCategory) -> usize {
        match category {
            PropCategory::Bush => self.props.bushes,
            PropCategory::Tree => self.props.trees,
            PropCategory::Rock => self.props.rocks,
        }
    }

    /// Bounds handed to the navigation bake.
    pub(crate) fn baked_bounds(&self) -> Option<GridBounds> {
        self.nav_mesh.bounds
    }

    /// Spawn tiles the registry accepted.
    pub(crate) fn registered(&self) -> &[TileCoord] {
        &self.registry.spawns
    }
}

#[derive(Debug, Default)]
struct NavMeshLog {
    bounds: Option<GridBounds>,
}

impl NavMeshBaker for NavMeshLog {
    fn bake(&mut self, bounds: GridBounds) {
        tracing::debug!(
            target: "tower_arena::host",
            min = %bounds.min(),
            max = %bounds.max(),
            "navigation mesh baked"
        );
        self.bounds = Some(bounds);
    }
}

#[derive(Debug, Default)]
struct StructureLog {
    tower: Option<MainTowerPlacement>,
    spawners: Vec<EnemySpawnerPlacement>,
}

impl StructureSpawner for StructureLog {
    fn place_main_tower(&mut self, placement: MainTowerPlacement) {
        tracing::debug!(
            target: "tower_arena::host",
            tile = %placement.tile,
            facing = ?placement.facing,
            "main tower placed"
        );
        self.tower = Some(placement);
    }

    fn place_enemy_spawner(&mut self, placement: EnemySpawnerPlacement) {
        tracing::debug!(
            target: "tower_arena::host",
            index = placement.index,
            tile = %placement.tile,
            facing = ?placement.facing,
            "enemy spawner placed"
        );
        self.spawners.push(placement);
    }
}

#[derive(Debug, Default)]
struct PropLog {
    bushes: usize,
    trees: usize,
    rocks: usize,
}

impl PropSpawner for PropLog {
    fn spawn_prop(&mut self, request: PropRequest) {
        tracing::trace!(
            target: "tower_arena::host",
            tile = %request.tile,
            category = ?request.category,
            "prop spawned"
        );
        let counter = match request.category {
            PropCategory::Bush => &mut self.bushes,
            PropCategory::Tree => &mut self.trees,
            PropCategory::Rock => &mut self.rocks,
        };
        *counter += 1;
    }
}

#[derive(Debug, Default)]
struct RegistryLog {
    spawns: Vec<TileCoord>,
}

impl SpawnerRegistry for RegistryLog {
    fn register(&mut self, spawns: &[TileCoord], expected: usize) -> usize {
        tracing::debug!(
            target: "tower_arena::host",
            expected,
            received = spawns.len(),
            "spawners registered"
        );
        self.spawns = spawns.to_vec();
        self.spawns.len()
    }
}
