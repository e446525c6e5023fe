use nalgebra::UnitQuaternion;
use rayon::prelude::*;
use robot_kernel::RotationSampler;
use tracing::{info, instrument, warn};

use crate::error::SamplingError;

/// Nominal mean nearest-neighbour distance of the SO(3) grid per level.
/// Resolution roughly halves with each level.
pub const LEVEL_RESOLUTIONS: [f64; 3] = [0.5160220, 0.2523583, 0.120735];

/// Finest level the sampler is asked for. Level 3 already yields 36864
/// rotations; the nearest-neighbour scan is quadratic in that.
pub const MAX_SO3_LEVEL: u32 = 3;

/// Orientations used for one reachability run.
#[derive(Debug, Clone)]
pub struct OrientationSet {
    pub rotations: Vec<UnitQuaternion<f64>>,
    /// Sampling level, `None` in translation-only mode.
    pub level: Option<u32>,
    /// Realized mean nearest-neighbour distance; 0 for a single rotation.
    pub mean_resolution: f64,
}

impl OrientationSet {
    pub fn translation_only() -> Self {
        Self {
            rotations: vec![UnitQuaternion::identity()],
            level: None,
            mean_resolution: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}

/// Pick the SO(3) grid level for a requested angular resolution:
/// `max(0, floor(-0.5 - log2(quat_delta)))`, capped at [`MAX_SO3_LEVEL`].
pub fn select_level(quat_delta: f64) -> Result<u32, SamplingError> {
    if !quat_delta.is_finite() || quat_delta <= 0.0 {
        return Err(SamplingError::InvalidAngularDelta(quat_delta));
    }
    let raw = (-0.5 - quat_delta.log2()).floor().max(0.0);
    if raw > MAX_SO3_LEVEL as f64 {
        warn!(
            quat_delta,
            requested_level = raw,
            max_level = MAX_SO3_LEVEL,
            "angular resolution finer than supported, clamping level"
        );
        return Ok(MAX_SO3_LEVEL);
    }
    Ok(raw as u32)
}

/// Nominal resolution of `level`, extrapolated by halving past the table.
pub fn nominal_resolution(level: u32) -> f64 {
    match LEVEL_RESOLUTIONS.get(level as usize) {
        Some(r) => *r,
        None => {
            let last = LEVEL_RESOLUTIONS.len() - 1;
            LEVEL_RESOLUTIONS[last] / 2f64.powi((level as usize - last) as i32)
        }
    }
}

/// Angle between two rotations on S^3: `acos(min(1, |a . b|))`.
pub fn quat_distance(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>) -> f64 {
    a.coords.dot(&b.coords).abs().min(1.0).acos()
}

/// Mean over all samples of the distance to the nearest other sample.
///
/// Returns `None` for fewer than two samples.
pub fn mean_nearest_neighbor_distance(rotations: &[UnitQuaternion<f64>]) -> Option<f64> {
    if rotations.len() < 2 {
        return None;
    }
    let total: f64 = rotations
        .par_iter()
        .enumerate()
        .map(|(i, q)| {
            rotations
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| quat_distance(q, p))
                .fold(f64::INFINITY, f64::min)
        })
        .collect::<Vec<f64>>()
        .iter()
        .sum();
    Some(total / rotations.len() as f64)
}

/// Build the orientation set for a run.
///
/// Translation-only mode never touches the rotation service.
#[instrument(skip(sampler))]
pub fn sample_orientations(
    sampler: &dyn RotationSampler,
    quat_delta: f64,
    translation_only: bool,
) -> Result<OrientationSet, SamplingError> {
    if translation_only {
        return Ok(OrientationSet::translation_only());
    }

    let level = select_level(quat_delta)?;
    let rotations = sampler.sample_so3(level);
    let mean_resolution = mean_nearest_neighbor_distance(&rotations).unwrap_or(0.0);

    info!(
        level,
        samples = rotations.len(),
        requested = quat_delta,
        nominal = nominal_resolution(level),
        realized = mean_resolution,
        "sampled orientations"
    );

    Ok(OrientationSet {
        rotations,
        level: Some(level),
        mean_resolution,
    })
}
