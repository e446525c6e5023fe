//! MockIkSolver: deterministic stand-in for an analytic IK backend.
//!
//! Reachability is modeled as a spherical shell around the manipulator's base
//! anchor. Inside the shell the tool approach axis (+Z of the target) must lie
//! within a cone around the outward radial direction; the cone closes as the
//! target approaches full extension. Each reachable pose yields a fixed number
//! of solution branches.

use nalgebra::{Isometry3, Point3, Vector3};

use crate::mock_robot::MockRobot;
use crate::traits::IkSolver;
use crate::types::*;

#[derive(Debug, Clone)]
pub struct MockIkSolver {
    /// Base anchor in the robot frame.
    base: Point3<f64>,
    inner_reach: f64,
    outer_reach: f64,
    /// Half-angle of the approach cone at the inner boundary (radians).
    max_cone: f64,
    branches: u32,
}

impl MockIkSolver {
    /// Build a solver for `manip` from the robot's description.
    ///
    /// Targets are interpreted in the robot frame, which coincides with the
    /// world frame while the robot sits at the identity transform.
    pub fn for_manipulator(robot: &MockRobot, manip: &Manipulator) -> Result<Self, RobotError> {
        let base_joint = manip.base_joint().ok_or_else(|| RobotError::EmptyManipulator {
            name: manip.name.clone(),
        })?;
        let base = robot
            .local_anchor(base_joint)
            .ok_or(RobotError::JointNotFound { index: base_joint })?;
        let outer = (robot.local_end_effector() - base).norm();
        Ok(Self {
            base,
            inner_reach: 0.15 * outer,
            outer_reach: outer,
            max_cone: 2.0 * std::f64::consts::FRAC_PI_3,
            branches: 4,
        })
    }

    /// Explicit shell geometry.
    pub fn with_shell(base: [f64; 3], inner_reach: f64, outer_reach: f64) -> Self {
        Self {
            base: Point3::from(base),
            inner_reach,
            outer_reach,
            max_cone: 2.0 * std::f64::consts::FRAC_PI_3,
            branches: 4,
        }
    }

    pub fn with_branches(mut self, branches: u32) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_max_cone(mut self, max_cone: f64) -> Self {
        self.max_cone = max_cone;
        self
    }

    pub fn outer_reach(&self) -> f64 {
        self.outer_reach
    }

    pub fn inner_reach(&self) -> f64 {
        self.inner_reach
    }
}

impl IkSolver for MockIkSolver {
    fn find_ik_solutions(
        &self,
        _manip: &Manipulator,
        target: &Isometry3<f64>,
        _mode: CollisionMode,
    ) -> Option<Vec<JointConfig>> {
        let d = target.translation.vector - self.base.coords;
        let r = d.norm();
        if r < self.inner_reach || r > self.outer_reach {
            return None;
        }

        let span = (self.outer_reach - self.inner_reach).max(f64::EPSILON);
        let slack = 1.0 - (r - self.inner_reach) / span;
        let limit = self.max_cone * slack;

        let outward = if r > 1e-12 { d / r } else { Vector3::z() };
        let approach = target.rotation * Vector3::z();
        if approach.angle(&outward) > limit {
            return Some(Vec::new());
        }

        let azimuth = d.y.atan2(d.x);
        let elevation = if r > 1e-12 { (d.z / r).clamp(-1.0, 1.0).asin() } else { 0.0 };
        let elbow = (r / self.outer_reach).clamp(-1.0, 1.0).acos();
        let wrist = approach.angle(&outward);

        let solutions = (0..self.branches)
            .map(|b| {
                let elbow_sign = if b & 1 == 0 { 1.0 } else { -1.0 };
                let wrist_sign = if b & 2 == 0 { 1.0 } else { -1.0 };
                vec![azimuth, elevation, elbow_sign * elbow, wrist_sign * wrist]
            })
            .collect();
        Some(solutions)
    }
}
