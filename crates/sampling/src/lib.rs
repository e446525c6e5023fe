pub mod error;
pub mod orientation;
pub mod spatial;

pub use error::SamplingError;
pub use orientation::{
    mean_nearest_neighbor_distance, quat_distance, sample_orientations, select_level,
    OrientationSet, LEVEL_RESOLUTIONS, MAX_SO3_LEVEL,
};
pub use spatial::{sample_ball, SpatialGrid, MAX_LATTICE_POINTS};
