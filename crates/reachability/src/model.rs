use std::path::PathBuf;
use std::time::Instant;

use file_format::{CacheKey, CacheMetadata, CacheStore};
use nalgebra::{Isometry3, Point3};
use reach_sampling::{sample_ball, sample_orientations, OrientationSet, SpatialGrid};
use reach_types::{ReachabilityData, TriangleMesh};
use robot_kernel::{IkSolver, Manipulator, RobotError, RotationSampler, Scene};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::{EvaluationMode, GenerateConfig};
use crate::error::ReachError;
use crate::evaluator::{evaluate, evaluate_sequential, Evaluation};
use crate::guard::RobotPoseGuard;

/// What a generation run did, for logs and `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub robot_name: String,
    pub robot_hash: String,
    pub manipulator: String,
    pub max_radius: f64,
    pub xyz_delta: f64,
    /// Positions inside the ball.
    pub positions: usize,
    pub orientations: usize,
    /// SO(3) grid level; `None` in translation-only mode.
    pub so3_level: Option<u32>,
    /// Realized mean angular resolution.
    pub quat_delta: f64,
    pub ik_queries: usize,
    pub reachable_poses: usize,
    pub total_solutions: u64,
    pub reachable_voxels: usize,
    pub seconds: f64,
}

/// Reachability of one manipulator of one robot.
#[derive(Debug, Clone)]
pub struct ReachabilityModel {
    robot_name: String,
    robot_hash: String,
    manipulator: Manipulator,
    data: Option<ReachabilityData>,
    metadata: Option<CacheMetadata>,
}

impl ReachabilityModel {
    /// Bind a model to `manip_name` on the scene's robot. No data yet.
    pub fn new<S: Scene + ?Sized>(scene: &S, manip_name: &str) -> Result<Self, ReachError> {
        let manipulator = scene
            .manipulator(manip_name)
            .ok_or_else(|| RobotError::ManipulatorNotFound {
                name: manip_name.to_string(),
            })?;
        Ok(Self {
            robot_name: scene.robot_name().to_string(),
            robot_hash: scene.robot_structure_hash(),
            manipulator,
            data: None,
            metadata: None,
        })
    }

    pub fn robot_name(&self) -> &str {
        &self.robot_name
    }

    pub fn robot_hash(&self) -> &str {
        &self.robot_hash
    }

    pub fn manipulator(&self) -> &Manipulator {
        &self.manipulator
    }

    /// True when a non-empty density field is loaded or generated.
    pub fn has(&self) -> bool {
        self.data.as_ref().is_some_and(ReachabilityData::has_data)
    }

    pub fn data(&self) -> Option<&ReachabilityData> {
        self.data.as_ref()
    }

    pub fn metadata(&self) -> Option<&CacheMetadata> {
        self.metadata.as_ref()
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.robot_hash, &self.manipulator.name)
    }

    /// Load cached data. Any failure leaves the model empty and returns `false`.
    pub fn load(&mut self, store: &CacheStore) -> bool {
        let key = self.cache_key();
        match store.load(&key) {
            Ok((data, metadata)) => {
                if metadata.robot_hash != self.robot_hash
                    || metadata.manipulator != self.manipulator.name
                {
                    warn!(
                        expected = %self.robot_hash,
                        found = %metadata.robot_hash,
                        "cache entry belongs to a different robot, ignoring"
                    );
                    return false;
                }
                self.data = Some(data);
                self.metadata = Some(metadata);
                self.has()
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %store.path_for(&key).display(), "no cached reachability");
                false
            }
            Err(e) => {
                warn!(path = %store.path_for(&key).display(), error = %e, "failed to load reachability cache");
                false
            }
        }
    }

    /// Persist the current data. Fails with [`ReachError::NoData`] when empty.
    pub fn save(&self, store: &CacheStore) -> Result<PathBuf, ReachError> {
        let data = self.data.as_ref().ok_or(ReachError::NoData)?;
        let metadata = match &self.metadata {
            Some(m) => m.clone(),
            None => CacheMetadata::new(
                &self.robot_name,
                &self.robot_hash,
                &self.manipulator.name,
                0.0,
                0.0,
            ),
        };
        Ok(store.save(&self.cache_key(), data, &metadata)?)
    }

    /// Base anchor of the manipulator with the robot at `scene`'s current pose.
    fn base_anchor<S: Scene + ?Sized>(&self, scene: &S) -> Result<Point3<f64>, ReachError> {
        let joint = self
            .manipulator
            .base_joint()
            .ok_or_else(|| RobotError::EmptyManipulator {
                name: self.manipulator.name.clone(),
            })?;
        Ok(scene
            .joint_anchor(joint)
            .ok_or(RobotError::JointNotFound { index: joint })?)
    }

    /// Compute reachability from scratch, replacing any held data.
    ///
    /// The robot sits at the identity transform for the duration and its
    /// previous transform is restored on every exit path. Positions are
    /// scheduled according to `config.mode`.
    #[instrument(skip_all, fields(robot = %self.robot_name, manip = %self.manipulator.name))]
    pub fn generate<S, I>(
        &mut self,
        scene: &mut S,
        solver: &I,
        sampler: &dyn RotationSampler,
        config: &GenerateConfig,
    ) -> Result<GenerationSummary, ReachError>
    where
        S: Scene + ?Sized,
        I: IkSolver + Sync + ?Sized,
    {
        self.generate_with(scene, sampler, config, |manip, grid, orientations, base| {
            evaluate(solver, manip, grid, orientations, base, config)
        })
    }

    /// [`generate`](Self::generate) on the calling thread only, for solvers
    /// that are not `Sync`. `config.mode` is ignored.
    #[instrument(skip_all, fields(robot = %self.robot_name, manip = %self.manipulator.name))]
    pub fn generate_sequential<S, I>(
        &mut self,
        scene: &mut S,
        solver: &I,
        sampler: &dyn RotationSampler,
        config: &GenerateConfig,
    ) -> Result<GenerationSummary, ReachError>
    where
        S: Scene + ?Sized,
        I: IkSolver + ?Sized,
    {
        if config.mode != EvaluationMode::Sequential {
            debug!("solver is not shareable across threads, evaluating sequentially");
        }
        self.generate_with(scene, sampler, config, |manip, grid, orientations, base| {
            evaluate_sequential(solver, manip, grid, orientations, base, config)
        })
    }

    fn generate_with<S, F>(
        &mut self,
        scene: &mut S,
        sampler: &dyn RotationSampler,
        config: &GenerateConfig,
        run: F,
    ) -> Result<GenerationSummary, ReachError>
    where
        S: Scene + ?Sized,
        F: FnOnce(&Manipulator, &SpatialGrid, &OrientationSet, Point3<f64>) -> Evaluation,
    {
        let started = Instant::now();
        let scene = RobotPoseGuard::new(scene, Isometry3::identity());

        let base_anchor = self.base_anchor(&*scene)?;
        let max_radius = match config.max_radius {
            Some(r) => r,
            None => {
                let tool = scene.end_effector_transform(&self.manipulator);
                (tool.translation.vector - base_anchor.coords).norm() + config.radius_margin
            }
        };

        let grid = sample_ball(max_radius, config.xyz_delta)?;
        let orientations = sample_orientations(sampler, config.quat_delta, config.translation_only)?;
        info!(
            radius = max_radius,
            xyz_samples = grid.inside.len(),
            quat_samples = orientations.len(),
            "computing reachability"
        );

        let evaluation = run(&self.manipulator, &grid, &orientations, base_anchor);
        drop(scene);

        let data = ReachabilityData {
            stats: evaluation.stats,
            density: evaluation.density,
            point_scale: grid.point_scale,
            xyz_delta: config.xyz_delta,
            quat_delta: orientations.mean_resolution,
        };
        let seconds = started.elapsed().as_secs_f64();

        let summary = GenerationSummary {
            robot_name: self.robot_name.clone(),
            robot_hash: self.robot_hash.clone(),
            manipulator: self.manipulator.name.clone(),
            max_radius,
            xyz_delta: config.xyz_delta,
            positions: grid.inside.len(),
            orientations: orientations.len(),
            so3_level: orientations.level,
            quat_delta: orientations.mean_resolution,
            ik_queries: evaluation.queries,
            reachable_poses: data.stats.len(),
            total_solutions: data.total_solutions(),
            reachable_voxels: data.density.nonzero_count(),
            seconds,
        };
        info!(
            reachable = summary.reachable_poses,
            voxels = summary.reachable_voxels,
            seconds,
            "reachability computed"
        );

        self.metadata = Some(CacheMetadata::new(
            &self.robot_name,
            &self.robot_hash,
            &self.manipulator.name,
            max_radius,
            seconds,
        ));
        self.data = Some(data);
        Ok(summary)
    }

    /// Robot triangulated at the identity transform, with the manipulator's
    /// base anchor in the same frame. Used to overlay the arm on a plot.
    pub fn robot_at_identity<S: Scene + ?Sized>(
        &self,
        scene: &mut S,
    ) -> Result<(TriangleMesh, Point3<f64>), ReachError> {
        let scene = RobotPoseGuard::new(scene, Isometry3::identity());
        let base = self.base_anchor(&*scene)?;
        Ok((scene.triangulate_robot(), base))
    }
}
