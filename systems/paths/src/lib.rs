#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path carving system that links randomised spawn points to the objective.
//!
//! Each path starts from a point sampled inside the spawn annulus, clears a
//! disk around it, walks toward the grid center with occasional random
//! detours and finally turns its start tile into an enemy spawn.

use std::f32::consts::TAU;

use rand::Rng;
use tower_arena_core::{
    CurvatureSettings, GenerationWarning, GridError, PathSettings, TileCoord, TileKind,
};
use tower_arena_world::Grid;

/// Number of candidates sampled when looking for a spawn point.
pub const START_ATTEMPTS: usize = 100;

/// King-move directions the walk may be forced into after a repeated step.
const WALK_DIRECTIONS: [Step; 8] = [
    Step::new(-1, -1),
    Step::new(0, -1),
    Step::new(1, -1),
    Step::new(-1, 0),
    Step::new(1, 0),
    Step::new(-1, 1),
    Step::new(0, 1),
    Step::new(1, 1),
];

/// Single walk step with each axis in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Step {
    dx: i32,
    dy: i32,
}

impl Step {
    const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    fn toward(from: TileCoord, to: TileCoord) -> Self {
        Self::new((to.x() - from.x()).signum(), (to.y() - from.y()).signum())
    }

    fn clamped(self) -> Self {
        Self::new(self.dx.clamp(-1, 1), self.dy.clamp(-1, 1))
    }
}

/// Cursor state of the path currently being carved.
#[derive(Debug)]
struct PathState {
    cursor: TileCoord,
    target: TileCoord,
    last_step: Option<Step>,
    remaining: u32,
}

impl PathState {
    fn new(start: TileCoord, target: TileCoord) -> Self {
        Self {
            cursor: start,
            target,
            last_step: None,
            remaining: start.chebyshev_distance(target),
        }
    }

    fn arrived(&self) -> bool {
        self.cursor == self.target
    }

    fn advance(&mut self, step: Step) {
        self.cursor = self.cursor.offset(step.dx, step.dy);
        self.last_step = Some(step);
        self.remaining = self.cursor.chebyshev_distance(self.target);
    }
}

/// Pure system carving every configured path into the grid.
#[derive(Debug, Default)]
pub struct PathCarver {
    used_starts: Vec<TileCoord>,
    candidates: Vec<TileCoord>,
}

impl PathCarver {
    /// Creates a new path carver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Carves `paths.count` paths and records their spawn tiles.
    ///
    /// Placement problems never abort the stage: a path whose start cannot
    /// be placed falls back to the grid center and a
    /// [`GenerationWarning::PlacementDegraded`] is pushed to `out_warnings`.
    pub fn carve<R>(
        &mut self,
        grid: &mut Grid,
        paths: &PathSettings,
        curvature: &CurvatureSettings,
        rng: &mut R,
        out_warnings: &mut Vec<GenerationWarning>,
    ) -> Result<(), GridError>
    where
        R: Rng + ?Sized,
    {
        let center = grid.center();
        let walk_budget = walk_budget(grid);
        self.used_starts.clear();

        for path in 0..paths.count as usize {
            let start = match self.select_start(grid, paths, center, rng) {
                Some(start) => start,
                None => {
                    let warning = GenerationWarning::PlacementDegraded {
                        path,
                        fallback: center,
                    };
                    tracing::warn!(target: "tower_arena::paths", %warning);
                    out_warnings.push(warning);
                    center
                }
            };
            self.used_starts.push(start);

            let mut carved = carve_disk(grid, start, paths.start_radius)?;

            let mut state = PathState::new(start, center);
            let budget = walk_budget.saturating_add(state.remaining);
            let mut steps = 0_u32;
            let mut exhausted = false;
            while !state.arrived() {
                let step = if steps < budget {
                    let step = curved_step(&state, curvature, rng);
                    // Leaving the grid would break the carved chain.
                    if grid.contains(state.cursor.offset(step.dx, step.dy)) {
                        step
                    } else {
                        Step::toward(state.cursor, state.target)
                    }
                } else {
                    if !exhausted {
                        exhausted = true;
                        let warning = GenerationWarning::WalkBudgetExhausted {
                            path,
                            cursor: state.cursor,
                        };
                        tracing::warn!(target: "tower_arena::paths", %warning);
                        out_warnings.push(warning);
                    }
                    Step::toward(state.cursor, state.target)
                };
                state.advance(step);
                steps = steps.saturating_add(1);
                carved += carve_step(grid, state.cursor, paths.width)?;
            }

            grid.record_spawn(start)?;
            tracing::debug!(
                target: "tower_arena::paths",
                path,
                start = %start,
                steps,
                carved,
                "path carved"
            );
        }

        Ok(())
    }

    fn select_start<R>(
        &mut self,
        grid: &Grid,
        paths: &PathSettings,
        center: TileCoord,
        rng: &mut R,
    ) -> Option<TileCoord>
    where
        R: Rng + ?Sized,
    {
        self.candidates.clear();
        for _ in 0..START_ATTEMPTS {
            let angle = rng.gen_range(0.0..TAU);
            let distance = sample_between(rng, paths.min_spawn_distance, paths.max_spawn_distance);
            let candidate = center.offset(
                (angle.cos() * distance).round() as i32,
                (angle.sin() * distance).round() as i32,
            );

            let separated = self
                .used_starts
                .iter()
                .all(|used| used.distance(candidate) >= paths.min_separation);
            if grid.contains(candidate) && separated {
                self.candidates.push(candidate);
            }
        }

        if self.candidates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.candidates.len());
        self.candidates.get(index).copied()
    }
}

/// Steps granted to the curved walk before it is forced straight home.
fn walk_budget(grid: &Grid) -> u32 {
    grid.width().saturating_add(grid.height()).saturating_mul(4)
}

fn sample_between<R>(rng: &mut R, min: f32, max: f32) -> f32
where
    R: Rng + ?Sized,
{
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn curved_step<R>(state: &PathState, curvature: &CurvatureSettings, rng: &mut R) -> Step
where
    R: Rng + ?Sized,
{
    let mut step = Step::toward(state.cursor, state.target);
    if rng.gen::<f32>() >= curvature.frequency {
        return step;
    }

    let perturb_x = rng.gen_bool(0.5);
    let offset = perturbation(rng.gen_range(-1_i32..=1), curvature.intensity);
    if perturb_x {
        step.dx += offset;
    } else {
        step.dy += offset;
    }
    step = step.clamped();

    // A detour that repeats the previous step would only lengthen a straight run.
    if state.last_step == Some(step) {
        let choices: Vec<Step> = WALK_DIRECTIONS
            .iter()
            .copied()
            .filter(|candidate| Some(*candidate) != state.last_step)
            .collect();
        let index = rng.gen_range(0..choices.len());
        step = choices[index];
    }
    step
}

/// Signed axis offset of a detour; halves round away from zero, so the default
/// intensity of 0.5 already yields unit detours.
fn perturbation(direction: i32, intensity: f32) -> i32 {
    (direction as f32 * intensity).round() as i32
}

/// Turns every grass tile within `radius` of `center` into path.
fn carve_disk(grid: &mut Grid, center: TileCoord, radius: u32) -> Result<u32, GridError> {
    let reach = i32::try_from(radius).unwrap_or(i32::MAX);
    let mut carved = 0;
    for dx in -reach..=reach {
        for dy in -reach..=reach {
            let coord = center.offset(dx, dy);
            if center.distance(coord) <= radius as f32 {
                carved += mark_path(grid, coord)?;
            }
        }
    }
    Ok(carved)
}

/// Marks offsets `0..width` from the cursor along +x and +y, always including the cursor.
fn carve_step(grid: &mut Grid, cursor: TileCoord, width: u32) -> Result<u32, GridError> {
    let mut carved = mark_path(grid, cursor)?;
    for offset in 0..i32::try_from(width).unwrap_or(i32::MAX) {
        carved += mark_path(grid, cursor.offset(offset, 0))?;
        carved += mark_path(grid, cursor.offset(0, offset))?;
    }
    Ok(carved)
}

fn mark_path(grid: &mut Grid, coord: TileCoord) -> Result<u32, GridError> {
    if !grid.contains(coord) {
        return Ok(0);
    }
    let changed = grid.promote(coord, TileKind::Grass, TileKind::Path)?;
    Ok(u32::from(changed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toward_clamps_each_axis() {
        let step = Step::toward(TileCoord::new(0, 9), TileCoord::new(5, 5));
        assert_eq!(step, Step::new(1, -1));
        let still = Step::toward(TileCoord::new(5, 5), TileCoord::new(5, 5));
        assert_eq!(still, Step::new(0, 0));
    }

    #[test]
    fn path_state_tracks_remaining_distance() {
        let mut state = PathState::new(TileCoord::new(0, 2), TileCoord::new(3, 3));
        assert_eq!(state.remaining, 3);
        state.advance(Step::new(1, 1));
        assert_eq!(state.cursor, TileCoord::new(1, 3));
        assert_eq!(state.remaining, 2);
        assert_eq!(state.last_step, Some(Step::new(1, 1)));
        assert!(!state.arrived());
    }

    #[test]
    fn half_intensity_still_detours() {
        assert_eq!(perturbation(1, 0.5), 1);
        assert_eq!(perturbation(-1, 0.5), -1);
        assert_eq!(perturbation(0, 0.5), 0);
        assert_eq!(perturbation(1, 0.4), 0);
        assert_eq!(perturbation(-1, 1.0), -1);
    }

    #[test]
    fn disk_respects_euclidean_radius() {
        let mut grid = Grid::create(7, 7, 1.0);
        let carved = carve_disk(&mut grid, TileCoord::new(3, 3), 1).expect("in bounds");
        assert_eq!(carved, 5);
        assert_eq!(grid.kind(TileCoord::new(4, 4)), Some(TileKind::Grass));
        assert_eq!(grid.kind(TileCoord::new(3, 2)), Some(TileKind::Path));
    }

    #[test]
    fn disk_clips_at_grid_edges() {
        let mut grid = Grid::create(4, 4, 1.0);
        let carved = carve_disk(&mut grid, TileCoord::new(0, 0), 2).expect("clipped");
        assert_eq!(carved, 6);
    }

    #[test]
    fn step_marks_width_along_both_axes() {
        let mut grid = Grid::create(6, 6, 1.0);
        let carved = carve_step(&mut grid, TileCoord::new(2, 2), 3).expect("in bounds");
        assert_eq!(carved, 5);
        for coord in [
            TileCoord::new(2, 2),
            TileCoord::new(3, 2),
            TileCoord::new(4, 2),
            TileCoord::new(2, 3),
            TileCoord::new(2, 4),
        ] {
            assert_eq!(grid.kind(coord), Some(TileKind::Path), "{coord}");
        }
    }

    #[test]
    fn unit_width_marks_only_the_cursor() {
        let mut grid = Grid::create(4, 4, 1.0);
        let carved = carve_step(&mut grid, TileCoord::new(1, 1), 1).expect("in bounds");
        assert_eq!(carved, 1);
        assert_eq!(grid.kind(TileCoord::new(2, 1)), Some(TileKind::Grass));
        assert_eq!(grid.kind(TileCoord::new(1, 2)), Some(TileKind::Grass));
    }

    #[test]
    fn marking_never_downgrades_spawns() {
        let mut grid = Grid::create(3, 3, 1.0);
        grid.record_spawn(TileCoord::new(1, 1)).expect("spawn");
        assert_eq!(mark_path(&mut grid, TileCoord::new(1, 1)), Ok(0));
        assert_eq!(grid.kind(TileCoord::new(1, 1)), Some(TileKind::EnemySpawn));
    }
}
