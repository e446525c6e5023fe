use serde::{Deserialize, Serialize};

use crate::field::{DensityField, PointScale};
use crate::pose::Pose;

/// One reachable end-effector pose and how many IK solutions reach it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachabilityStat {
    pub pose: Pose,
    pub solutions: u32,
}

/// Everything a reachability run produces and persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachabilityData {
    /// Reachable poses in evaluation order (position-major, orientation-minor).
    pub stats: Vec<ReachabilityStat>,
    /// Normalized per-voxel density.
    pub density: DensityField,
    /// Maps base-relative positions to voxel coordinates.
    pub point_scale: PointScale,
    /// Linear sampling step (meters).
    pub xyz_delta: f64,
    /// Realized mean angular resolution; 0 for translation-only runs.
    pub quat_delta: f64,
}

impl ReachabilityData {
    /// A model "has data" when its density field is non-empty.
    pub fn has_data(&self) -> bool {
        !self.density.is_empty()
    }

    /// Total number of IK solutions recorded across all stats.
    pub fn total_solutions(&self) -> u64 {
        self.stats.iter().map(|s| s.solutions as u64).sum()
    }
}
