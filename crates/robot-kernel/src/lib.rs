//! Interfaces to the simulation services a reachability run depends on.
//!
//! The IK solver, rotation sampler and scene are external collaborators. This
//! crate defines them as traits and ships deterministic doubles
//! ([`MockScene`], [`MockRobot`], [`MockIkSolver`]) plus the default
//! [`HopfGridSampler`] for SO(3).

pub mod mock_robot;
pub mod mock_solver;
pub mod so3_grid;
pub mod traits;
pub mod types;

pub use mock_robot::{MockRobot, MockScene, REFERENCE_ARM_HASH};
pub use mock_solver::MockIkSolver;
pub use so3_grid::HopfGridSampler;
pub use traits::*;
pub use types::*;
