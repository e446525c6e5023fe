use serde::{Deserialize, Serialize};

/// Divisor applied to the mean solution count per voxel before clamping.
pub const DENSITY_NORMALIZATION: f64 = 50.0;

/// How the position loop is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// One position after another on the calling thread.
    #[default]
    Sequential,
    /// Positions spread over the rayon pool. Output order is unchanged.
    Parallel,
}

/// Parameters for one reachability run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Radius of the sampled ball. Derived from the arm when `None`.
    pub max_radius: Option<f64>,
    /// Linear sampling step in meters.
    pub xyz_delta: f64,
    /// Requested angular resolution in radians.
    pub quat_delta: f64,
    /// Only evaluate the identity orientation.
    pub translation_only: bool,
    /// Log progress every this many positions.
    pub progress_interval: usize,
    pub mode: EvaluationMode,
    /// Added to the base-to-tool distance when the radius is derived.
    pub radius_margin: f64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            max_radius: None,
            xyz_delta: 0.04,
            quat_delta: 0.5,
            translation_only: false,
            progress_interval: 1000,
            mode: EvaluationMode::Sequential,
            radius_margin: 0.05,
        }
    }
}

impl GenerateConfig {
    /// Coarse settings for smoke runs: 10 cm lattice, identity orientation only.
    pub fn preview() -> Self {
        Self {
            xyz_delta: 0.1,
            translation_only: true,
            ..Self::default()
        }
    }

    pub fn with_max_radius(mut self, radius: f64) -> Self {
        self.max_radius = Some(radius);
        self
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }
}
