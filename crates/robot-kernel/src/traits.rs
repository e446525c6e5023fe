use nalgebra::{Isometry3, Point3, UnitQuaternion};
use reach_types::TriangleMesh;

use crate::types::*;

/// Inverse-kinematics service for a robot's manipulators.
/// Implemented by the simulation backend and by MockIkSolver.
pub trait IkSolver {
    /// Find all joint configurations that place the manipulator's end effector at `target`.
    ///
    /// `None` means the solver could not produce an answer for this pose;
    /// `Some(vec![])` means it ran and found nothing. Callers treat both as
    /// "unreachable".
    fn find_ik_solutions(
        &self,
        manip: &Manipulator,
        target: &Isometry3<f64>,
        mode: CollisionMode,
    ) -> Option<Vec<JointConfig>>;
}

/// Uniform SO(3) sampling service.
pub trait RotationSampler {
    /// Return the fixed, reproducible sample set for `level`.
    fn sample_so3(&self, level: u32) -> Vec<UnitQuaternion<f64>>;
}

/// Scene and robot state exposed to the reachability analysis.
///
/// Holding `&mut` to a scene is the exclusive handle: nothing else may mutate
/// it while a run is in progress.
pub trait Scene {
    /// Human-readable robot name.
    fn robot_name(&self) -> &str;

    /// Content hash of the robot's kinematic description.
    fn robot_structure_hash(&self) -> String;

    /// The body that carries the robot.
    fn robot_body(&self) -> BodyId;

    /// Look up a manipulator by name.
    fn manipulator(&self, name: &str) -> Option<Manipulator>;

    /// World-frame anchor point of a joint under the current robot transform.
    fn joint_anchor(&self, joint: usize) -> Option<Point3<f64>>;

    /// World-frame end-effector transform of a manipulator.
    fn end_effector_transform(&self, manip: &Manipulator) -> Isometry3<f64>;

    fn robot_transform(&self) -> Isometry3<f64>;

    fn set_robot_transform(&mut self, transform: Isometry3<f64>);

    /// All bodies in the scene, the robot included.
    fn bodies(&self) -> Vec<BodyId>;

    fn is_body_enabled(&self, body: BodyId) -> bool;

    fn set_body_enabled(&mut self, body: BodyId, enabled: bool);

    /// Triangulate the robot under its current transform.
    fn triangulate_robot(&self) -> TriangleMesh;
}
