use nalgebra::Vector3;
use reach_types::PointScale;
use tracing::{debug, instrument};

use crate::error::SamplingError;

/// A cubic lattice of offsets with the subset that lies inside a ball.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Every lattice point, x-major with z varying fastest.
    pub points: Vec<Vector3<f64>>,
    /// Indices into `points` with `|p| < radius`.
    pub inside: Vec<usize>,
    /// Lattice shape; each axis spans offsets `-n..=n`.
    pub shape: [usize; 3],
    /// Maps base-relative positions to voxel coordinates.
    pub point_scale: PointScale,
    pub radius: f64,
    pub delta: f64,
}

impl SpatialGrid {
    /// Number of lattice steps on each side of the origin.
    pub fn half_extent(&self) -> usize {
        (self.shape[0] - 1) / 2
    }

    pub fn flat_index(&self, [i, j, k]: [usize; 3]) -> usize {
        (i * self.shape[1] + j) * self.shape[2] + k
    }

    pub fn voxel_of(&self, index: usize) -> [usize; 3] {
        let k = index % self.shape[2];
        let j = (index / self.shape[2]) % self.shape[1];
        let i = index / (self.shape[1] * self.shape[2]);
        [i, j, k]
    }

    /// Points inside the ball, in `inside` order.
    pub fn inside_points(&self) -> impl Iterator<Item = &Vector3<f64>> + '_ {
        self.inside.iter().map(move |&i| &self.points[i])
    }
}

/// Largest lattice [`sample_ball`] will allocate.
pub const MAX_LATTICE_POINTS: usize = 1 << 24;

/// Sample a uniform lattice with spacing `delta` and keep the points inside a
/// ball of radius `max_radius`.
#[instrument]
pub fn sample_ball(max_radius: f64, delta: f64) -> Result<SpatialGrid, SamplingError> {
    if !max_radius.is_finite() || max_radius <= 0.0 {
        return Err(SamplingError::InvalidRadius(max_radius));
    }
    if !delta.is_finite() || delta <= 0.0 {
        return Err(SamplingError::InvalidStep(delta));
    }

    let steps = (max_radius / delta).floor();
    let too_large = SamplingError::GridTooLarge {
        nsteps: steps,
        max: MAX_LATTICE_POINTS,
    };
    if steps > MAX_LATTICE_POINTS as f64 {
        return Err(too_large);
    }
    let nsteps = steps as i64;
    let side = (2 * nsteps + 1) as usize;
    let lattice = side
        .checked_mul(side)
        .and_then(|n| n.checked_mul(side))
        .filter(|&n| n <= MAX_LATTICE_POINTS)
        .ok_or(too_large)?;
    let r2 = max_radius * max_radius;

    let mut points = Vec::with_capacity(lattice);
    let mut inside = Vec::new();
    for x in -nsteps..=nsteps {
        for y in -nsteps..=nsteps {
            for z in -nsteps..=nsteps {
                let p = Vector3::new(x as f64, y as f64, z as f64) * delta;
                if p.norm_squared() < r2 {
                    inside.push(points.len());
                }
                points.push(p);
            }
        }
    }

    debug!(
        lattice = points.len(),
        inside = inside.len(),
        nsteps,
        "sampled spatial grid"
    );

    Ok(SpatialGrid {
        points,
        inside,
        shape: [side, side, side],
        point_scale: PointScale::new(1.0 / delta, nsteps as f64),
        radius: max_radius,
        delta,
    })
}
