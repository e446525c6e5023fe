use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion};
use rayon::prelude::*;
use reach_sampling::{OrientationSet, SpatialGrid};
use reach_types::{DensityField, Pose, ReachabilityStat};
use robot_kernel::{CollisionMode, IkSolver, Manipulator};
use tracing::{info, instrument};

use crate::config::{EvaluationMode, GenerateConfig, DENSITY_NORMALIZATION};

/// Output of the evaluation loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Poses with at least one IK solution, position-major.
    pub stats: Vec<ReachabilityStat>,
    /// Normalized density on the grid's lattice, clamped to `[0, 1]`.
    pub density: DensityField,
    /// Number of IK queries issued.
    pub queries: usize,
}

/// Result for a single spatial sample.
struct PositionResult {
    stats: Vec<ReachabilityStat>,
    solutions: u64,
}

fn evaluate_position<S: IkSolver + ?Sized>(
    solver: &S,
    manip: &Manipulator,
    position: Point3<f64>,
    rotations: &[UnitQuaternion<f64>],
) -> PositionResult {
    let translation = Translation3::from(position.coords);
    let mut stats = Vec::new();
    let mut solutions = 0u64;
    for rotation in rotations {
        let target = Isometry3::from_parts(translation, *rotation);
        let count = solver
            .find_ik_solutions(manip, &target, CollisionMode::IgnoreEnvironment)
            .map_or(0, |s| s.len());
        if count >= 1 {
            stats.push(ReachabilityStat {
                pose: Pose::from_isometry(&target),
                solutions: count as u32,
            });
            solutions += count as u64;
        }
    }
    PositionResult { stats, solutions }
}

fn progress_due(done: usize, interval: usize) -> bool {
    interval > 0 && done % interval == 0
}

/// Called before a position is evaluated, so the first line reads `0/total`.
fn report_progress(done: usize, total: usize, interval: usize) {
    if progress_due(done, interval) {
        info!("{}/{}", done, total);
    }
}

/// Query the solver at every inside position and orientation, scheduled
/// according to `config.mode`.
///
/// Targets are `(rotation, base_anchor + offset)` in the frame the solver
/// expects. A solver answer of `None` or an empty set counts as zero.
#[instrument(skip_all, fields(positions = grid.inside.len(), orientations = orientations.len()))]
pub fn evaluate<S: IkSolver + Sync + ?Sized>(
    solver: &S,
    manip: &Manipulator,
    grid: &SpatialGrid,
    orientations: &OrientationSet,
    base_anchor: Point3<f64>,
    config: &GenerateConfig,
) -> Evaluation {
    match config.mode {
        EvaluationMode::Sequential => {
            evaluate_sequential(solver, manip, grid, orientations, base_anchor, config)
        }
        EvaluationMode::Parallel => {
            let total = grid.inside.len();
            let done = AtomicUsize::new(0);
            let results: Vec<PositionResult> = grid
                .inside
                .par_iter()
                .map(|&idx| {
                    let n = done.fetch_add(1, Ordering::Relaxed);
                    report_progress(n, total, config.progress_interval);
                    evaluate_position(
                        solver,
                        manip,
                        base_anchor + grid.points[idx],
                        &orientations.rotations,
                    )
                })
                .collect();
            assemble(grid, orientations, results)
        }
    }
}

/// Same as [`evaluate`] but always on the calling thread, so the solver
/// need not be `Sync`. `config.mode` is ignored.
pub fn evaluate_sequential<S: IkSolver + ?Sized>(
    solver: &S,
    manip: &Manipulator,
    grid: &SpatialGrid,
    orientations: &OrientationSet,
    base_anchor: Point3<f64>,
    config: &GenerateConfig,
) -> Evaluation {
    let total = grid.inside.len();
    let results = grid
        .inside
        .iter()
        .enumerate()
        .map(|(n, &idx)| {
            report_progress(n, total, config.progress_interval);
            evaluate_position(
                solver,
                manip,
                base_anchor + grid.points[idx],
                &orientations.rotations,
            )
        })
        .collect();
    assemble(grid, orientations, results)
}

fn assemble(
    grid: &SpatialGrid,
    orientations: &OrientationSet,
    results: Vec<PositionResult>,
) -> Evaluation {
    let mut density = DensityField::zeros(grid.shape);
    let mut stats = Vec::new();
    let per_orientation = orientations.rotations.len().max(1) as f64;
    for (&idx, result) in grid.inside.iter().zip(results) {
        let mean = result.solutions as f64 / per_orientation;
        density.values[idx] = (mean / DENSITY_NORMALIZATION).clamp(0.0, 1.0);
        stats.extend(result.stats);
    }

    Evaluation {
        stats,
        density,
        queries: grid.inside.len() * orientations.rotations.len(),
    }
}
