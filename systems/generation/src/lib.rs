#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generation pipeline that drives every terrain stage in a fixed order.
//!
//! A regeneration clears the grid, carves paths and the central blob, derives
//! build areas, raises the terrain, classifies surfaces and finally hands
//! structures, props, the navigation bake and the spawn record to the host's
//! collaborators. Invalid configuration is rejected before anything is
//! touched; grid contract violations only stop the stage that raised them.

mod placement;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tower_arena_core::{
    Detached, GenerationConfig, GenerationError, GenerationStage, GenerationWarning, GridError,
    NavMeshBaker, PropRequest, PropSpawner, SpawnerRegistry, StructureSpawner,
};
use tower_arena_system_build_areas::BuildAreaDeriver;
use tower_arena_system_elevation::ElevationField;
use tower_arena_system_paths::PathCarver;
use tower_arena_system_radial_blob::RadialBlobGenerator;
use tower_arena_system_texturing::TextureClassifier;
use tower_arena_system_vegetation::VegetationScatterer;
use tower_arena_world::Grid;

/// Host services invoked by the final pipeline stages.
pub struct Collaborators<'a> {
    /// Receives the grid bounds once vegetation is placed.
    pub nav_mesh: &'a mut dyn NavMeshBaker,
    /// Instantiates the main tower and the enemy spawners.
    pub structures: &'a mut dyn StructureSpawner,
    /// Instantiates decorative props.
    pub props: &'a mut dyn PropSpawner,
    /// Receives the spawn record.
    pub registry: &'a mut dyn SpawnerRegistry,
}

impl std::fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Lifecycle of the generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeneratorState {
    /// No regeneration in progress.
    #[default]
    Idle,
    /// The given stage is executing.
    Running(GenerationStage),
}

/// Outcome of a completed regeneration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationReport {
    seed: u64,
    completed: Vec<GenerationStage>,
    warnings: Vec<GenerationWarning>,
    props: Vec<PropRequest>,
    registered_spawners: usize,
}

impl GenerationReport {
    /// Seed the random source was initialised with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Stages that ran to completion, in execution order.
    #[must_use]
    pub fn completed_stages(&self) -> &[GenerationStage] {
        &self.completed
    }

    /// Non-fatal problems encountered along the way.
    #[must_use]
    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }

    /// Prop requests handed to the prop collaborator.
    #[must_use]
    pub fn props(&self) -> &[PropRequest] {
        &self.props
    }

    /// Number of spawners the registry accepted.
    #[must_use]
    pub const fn registered_spawners(&self) -> usize {
        self.registered_spawners
    }

    /// Reports whether every stage ran to completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed.len() == GenerationStage::ALL.len()
    }
}

/// Owner of the arena grid and the stage systems that shape it.
#[derive(Debug, Default)]
pub struct Generator {
    grid: Grid,
    state: GeneratorState,
    field: ElevationField,
    paths: PathCarver,
    build_areas: BuildAreaDeriver,
    textures: TextureClassifier,
}

impl Generator {
    /// Creates a generator with an uninitialised grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid produced by the most recent regeneration.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for build-slot bookkeeping between regenerations.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GeneratorState {
        self.state
    }

    /// Elevation field computed by the most recent regeneration.
    #[must_use]
    pub const fn elevation(&self) -> &ElevationField {
        &self.field
    }

    /// Rebuilds the arena from scratch.
    ///
    /// The configuration is validated before the existing grid is discarded,
    /// so a rejected request leaves the previous arena intact.
    pub fn regenerate(
        &mut self,
        config: &GenerationConfig,
        mut collaborators: Collaborators<'_>,
    ) -> Result<GenerationReport, GenerationError> {
        if let Err(error) = config.validate() {
            tracing::warn!(target: "tower_arena::generation", %error, "configuration rejected");
            return Err(error.into());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut report = GenerationReport {
            seed: config.seed,
            ..GenerationReport::default()
        };

        for stage in GenerationStage::ALL {
            self.state = GeneratorState::Running(stage);
            match self.run_stage(stage, config, &mut rng, &mut collaborators, &mut report) {
                Ok(()) => report.completed.push(stage),
                Err(error) => {
                    let warning = GenerationWarning::StageAborted { stage, error };
                    tracing::warn!(target: "tower_arena::generation", %warning);
                    report.warnings.push(warning);
                }
            }
        }
        self.state = GeneratorState::Idle;

        tracing::info!(
            target: "tower_arena::generation",
            seed = config.seed,
            width = self.grid.width(),
            height = self.grid.height(),
            spawns = self.grid.spawn_record().len(),
            props = report.props.len(),
            warnings = report.warnings.len(),
            "arena generated"
        );
        Ok(report)
    }

    fn run_stage(
        &mut self,
        stage: GenerationStage,
        config: &GenerationConfig,
        rng: &mut ChaCha8Rng,
        collaborators: &mut Collaborators<'_>,
        report: &mut GenerationReport,
    ) -> Result<(), GridError> {
        match stage {
            GenerationStage::Clearing => {
                self.field = ElevationField::default();
                self.grid = Grid::create(
                    config.grid.width,
                    config.grid.height,
                    config.grid.tile_size,
                );
            }
            GenerationStage::CarvingPaths => {
                self.paths.carve(
                    &mut self.grid,
                    &config.paths,
                    &config.curvature,
                    rng,
                    &mut report.warnings,
                )?;
            }
            GenerationStage::CarvingBlob => {
                let _ = RadialBlobGenerator::new().carve(&mut self.grid, &config.blob, rng)?;
            }
            GenerationStage::DerivingBuildAreas => {
                let _ = self.build_areas.derive(&mut self.grid, &config.build)?;
            }
            GenerationStage::ComputingElevation => {
                self.field = ElevationField::compute(&self.grid, &config.elevation);
                self.field.apply(&mut self.grid)?;
            }
            GenerationStage::ClassifyingTextures => {
                self.textures
                    .classify(&mut self.grid, &self.field, &config.texture, rng)?;
            }
            GenerationStage::SpawningStructures => {
                let tower = placement::main_tower(&self.grid)?;
                let spawners = placement::enemy_spawners(&self.grid)?;
                collaborators.structures.place_main_tower(tower);
                for spawner in spawners {
                    collaborators.structures.place_enemy_spawner(spawner);
                }
            }
            GenerationStage::ScatteringVegetation => {
                VegetationScatterer::new().scatter(
                    &self.grid,
                    &config.vegetation,
                    rng,
                    &mut report.props,
                );
                for request in &report.props {
                    collaborators.props.spawn_prop(*request);
                }
            }
            GenerationStage::BakingNavMesh => {
                collaborators.nav_mesh.bake(self.grid.bounds());
            }
            GenerationStage::RegisteringSpawners => {
                let spawns = self.grid.spawn_record().as_slice();
                let expected = config.paths.count as usize;
                let registered = collaborators.registry.register(spawns, expected);
                report.registered_spawners = registered;
                if registered != expected {
                    let warning = GenerationWarning::SpawnCountMismatch {
                        expected,
                        registered,
                    };
                    tracing::warn!(target: "tower_arena::generation", %warning);
                    report.warnings.push(warning);
                }
            }
        }

        tracing::debug!(target: "tower_arena::generation", ?stage, "stage finished");
        Ok(())
    }
}

/// Generates an arena without any host collaborators attached.
pub fn generate(config: &GenerationConfig) -> Result<(Grid, GenerationReport), GenerationError> {
    let mut generator = Generator::new();
    let (mut nav_mesh, mut structures, mut props, mut registry) =
        (Detached, Detached, Detached, Detached);
    let report = generator.regenerate(
        config,
        Collaborators {
            nav_mesh: &mut nav_mesh,
            structures: &mut structures,
            props: &mut props,
            registry: &mut registry,
        },
    )?;
    Ok((generator.grid, report))
}
