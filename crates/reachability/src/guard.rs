//! Scoped scene mutations that undo themselves on drop.
//!
//! Both guards hold the scene's exclusive borrow for their lifetime and give
//! it back through `Deref`/`DerefMut`, so nested guards compose.

use std::ops::{Deref, DerefMut};

use nalgebra::Isometry3;
use robot_kernel::{BodyId, Scene};
use tracing::trace;

/// Moves the robot to a pose and restores the previous one when dropped.
pub struct RobotPoseGuard<'a, S: Scene + ?Sized> {
    scene: &'a mut S,
    saved: Isometry3<f64>,
}

impl<'a, S: Scene + ?Sized> RobotPoseGuard<'a, S> {
    pub fn new(scene: &'a mut S, pose: Isometry3<f64>) -> Self {
        let saved = scene.robot_transform();
        scene.set_robot_transform(pose);
        Self { scene, saved }
    }

    /// The transform that will be restored.
    pub fn saved(&self) -> Isometry3<f64> {
        self.saved
    }
}

impl<S: Scene + ?Sized> Drop for RobotPoseGuard<'_, S> {
    fn drop(&mut self) {
        self.scene.set_robot_transform(self.saved);
        trace!("restored robot transform");
    }
}

impl<S: Scene + ?Sized> Deref for RobotPoseGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: Scene + ?Sized> DerefMut for RobotPoseGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

/// Disables every body except the robot and restores each body's prior
/// enable state when dropped.
pub struct BodiesDisabledGuard<'a, S: Scene + ?Sized> {
    scene: &'a mut S,
    saved: Vec<(BodyId, bool)>,
}

impl<'a, S: Scene + ?Sized> BodiesDisabledGuard<'a, S> {
    pub fn new(scene: &'a mut S) -> Self {
        let robot = scene.robot_body();
        let saved: Vec<(BodyId, bool)> = scene
            .bodies()
            .into_iter()
            .filter(|b| *b != robot)
            .map(|b| (b, scene.is_body_enabled(b)))
            .collect();
        for (body, _) in &saved {
            scene.set_body_enabled(*body, false);
        }
        trace!(bodies = saved.len(), "disabled non-robot bodies");
        Self { scene, saved }
    }
}

impl<S: Scene + ?Sized> Drop for BodiesDisabledGuard<'_, S> {
    fn drop(&mut self) {
        for (body, enabled) in &self.saved {
            self.scene.set_body_enabled(*body, *enabled);
        }
    }
}

impl<S: Scene + ?Sized> Deref for BodiesDisabledGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: Scene + ?Sized> DerefMut for BodiesDisabledGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion, Vector3};
    use robot_kernel::{MockRobot, MockScene};

    fn shifted() -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::new(1.0, -2.0, 0.5),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3),
        )
    }

    #[test]
    fn pose_guard_sets_and_restores() {
        let mut scene = MockScene::new(MockRobot::compact_arm());
        scene.set_robot_transform(shifted());
        {
            let guard = RobotPoseGuard::new(&mut scene, Isometry3::identity());
            assert_eq!(guard.robot_transform(), Isometry3::identity());
            assert_eq!(guard.saved(), shifted());
        }
        assert_eq!(scene.robot_transform(), shifted());
    }

    #[test]
    fn bodies_guard_keeps_robot_and_restores_prior_state() {
        let mut scene = MockScene::new(MockRobot::compact_arm());
        let table = scene.add_body("table");
        let shelf = scene.add_body("shelf");
        scene.set_body_enabled(shelf, false);
        {
            let guard = BodiesDisabledGuard::new(&mut scene);
            assert!(guard.is_body_enabled(guard.robot_body()));
            assert!(!guard.is_body_enabled(table));
            assert!(!guard.is_body_enabled(shelf));
        }
        assert!(scene.is_body_enabled(table));
        assert!(!scene.is_body_enabled(shelf));
    }

    #[test]
    fn guards_nest() {
        let mut scene = MockScene::new(MockRobot::compact_arm());
        let table = scene.add_body("table");
        scene.set_robot_transform(shifted());
        {
            let mut bodies = BodiesDisabledGuard::new(&mut scene);
            let pose = RobotPoseGuard::new(&mut *bodies, Isometry3::identity());
            assert!(!pose.is_body_enabled(table));
            assert_eq!(pose.robot_transform(), Isometry3::identity());
        }
        assert!(scene.is_body_enabled(table));
        assert_eq!(scene.robot_transform(), shifted());
    }
}
