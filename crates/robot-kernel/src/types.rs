use serde::{Deserialize, Serialize};

/// Transient identifier of a body in the scene.
/// Stable within a scene session, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u64);

/// One joint-space solution returned by an IK solver.
pub type JointConfig = Vec<f64>;

/// A named kinematic chain of the robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manipulator {
    pub name: String,
    /// Indices of the arm joints from base to tip.
    pub arm_joints: Vec<usize>,
}

impl Manipulator {
    pub fn new(name: impl Into<String>, arm_joints: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            arm_joints,
        }
    }

    pub fn base_joint(&self) -> Option<usize> {
        self.arm_joints.first().copied()
    }

    pub fn tip_joint(&self) -> Option<usize> {
        self.arm_joints.last().copied()
    }
}

/// Whether an IK query should consider collisions with the environment.
///
/// Self-collision and joint limits always apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    IgnoreEnvironment,
    CheckEnvironment,
}

/// Errors from scene and robot queries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RobotError {
    #[error("manipulator not found: {name}")]
    ManipulatorNotFound { name: String },

    #[error("manipulator {name} has no arm joints")]
    EmptyManipulator { name: String },

    #[error("joint not found: {index}")]
    JointNotFound { index: usize },
}
