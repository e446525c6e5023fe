//! Kinematic reachability maps for robot manipulators.
//!
//! [`ReachabilityModel`] samples positions in a ball around the manipulator's
//! base and orientations on SO(3), asks an injected [`IkSolver`] for every
//! pose, and accumulates a per-voxel density. Results round-trip through a
//! content-addressed [`CacheStore`].
//!
//! [`IkSolver`]: robot_kernel::IkSolver
//! [`CacheStore`]: file_format::CacheStore

pub mod autogen;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod guard;
pub mod model;

pub use autogen::{known_config, KnownConfig, KNOWN_CONFIGS};
pub use config::{EvaluationMode, GenerateConfig, DENSITY_NORMALIZATION};
pub use error::ReachError;
pub use evaluator::{evaluate, evaluate_sequential, Evaluation};
pub use guard::{BodiesDisabledGuard, RobotPoseGuard};
pub use model::{GenerationSummary, ReachabilityModel};
