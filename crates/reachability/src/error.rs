use file_format::SaveError;
use reach_sampling::SamplingError;
use robot_kernel::RobotError;

/// Errors from generating, saving or autogenerating a reachability model.
///
/// Cache *load* failures are not represented here: they degrade to "no data".
#[derive(Debug, thiserror::Error)]
pub enum ReachError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Robot(#[from] RobotError),

    #[error("no autogeneration parameters for robot {robot_hash} manipulator {manipulator}")]
    NoAutogenerationParameters {
        robot_hash: String,
        manipulator: String,
    },

    #[error("failed to save reachability model: {0}")]
    Save(#[from] SaveError),

    #[error("reachability model has no data")]
    NoData,
}
