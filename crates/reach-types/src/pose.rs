use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A rigid pose stored as a quaternion `(w, x, y, z)` and a translation.
///
/// This is the persisted form of an end-effector target. Conversions to and
/// from `nalgebra::Isometry3` are lossless up to quaternion normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Rotation quaternion, scalar first.
    pub rotation: [f64; 4],
    /// Translation [x, y, z].
    pub translation: [f64; 3],
}

impl Pose {
    pub const IDENTITY: Self = Self {
        rotation: [1.0, 0.0, 0.0, 0.0],
        translation: [0.0, 0.0, 0.0],
    };

    pub fn new(rotation: [f64; 4], translation: [f64; 3]) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        let q = iso.rotation.quaternion();
        let t = iso.translation.vector;
        Self {
            rotation: [q.w, q.i, q.j, q.k],
            translation: [t.x, t.y, t.z],
        }
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        let [w, i, j, k] = self.rotation;
        let rotation = UnitQuaternion::new_normalize(Quaternion::new(w, i, j, k));
        let [x, y, z] = self.translation;
        Isometry3::from_parts(Translation3::from(Vector3::new(x, y, z)), rotation)
    }

    /// Flatten to `[qw, qx, qy, qz, tx, ty, tz]`.
    pub fn to_array(&self) -> [f64; 7] {
        let [w, i, j, k] = self.rotation;
        let [x, y, z] = self.translation;
        [w, i, j, k, x, y, z]
    }

    pub fn from_array(arr: [f64; 7]) -> Self {
        Self {
            rotation: [arr[0], arr[1], arr[2], arr[3]],
            translation: [arr[4], arr[5], arr[6]],
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn isometry_conversion_preserves_pose() {
        let rot = UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1);
        let iso = Isometry3::from_parts(Translation3::new(0.1, -0.4, 0.9), rot);
        let back = Pose::from_isometry(&iso).to_isometry();
        assert_relative_eq!(back.translation.vector, iso.translation.vector, epsilon = 1e-12);
        assert!(back.rotation.angle_to(&iso.rotation) < 1e-12);
    }

    #[test]
    fn array_layout_is_quaternion_then_translation() {
        let pose = Pose::new([1.0, 0.0, 0.0, 0.0], [0.5, 0.25, -1.0]);
        assert_eq!(pose.to_array(), [1.0, 0.0, 0.0, 0.0, 0.5, 0.25, -1.0]);
        assert_eq!(Pose::from_array(pose.to_array()), pose);
    }
}
