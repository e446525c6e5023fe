//! MockRobot and MockScene: deterministic test doubles implementing Scene.
//!
//! The robot is a serial chain of joint anchors ending at an end-effector
//! point. Links are triangulated as square prisms. Used by the reachability
//! crate and the CLI in place of a full simulation backend.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use reach_types::TriangleMesh;
use sha2::{Digest, Sha256};

use crate::traits::Scene;
use crate::types::*;

/// Structure hash of the reference arm preset. Autogeneration knows good
/// parameters for this robot.
pub const REFERENCE_ARM_HASH: &str = "409764e862c254605cafb9de013eb531";

/// A joint with its anchor expressed in the robot frame.
#[derive(Debug, Clone)]
struct MockJoint {
    name: String,
    anchor: Point3<f64>,
}

/// A serial-chain robot with a fixed kinematic description.
#[derive(Debug, Clone)]
pub struct MockRobot {
    name: String,
    joints: Vec<MockJoint>,
    manipulators: Vec<Manipulator>,
    /// End-effector point in the robot frame.
    end_effector: Point3<f64>,
    link_radius: f64,
    transform: Isometry3<f64>,
    structure_hash: String,
}

impl MockRobot {
    /// Build a robot from named joint anchors (robot frame) and an end-effector point.
    ///
    /// A single manipulator named `"arm"` spans all joints.
    pub fn new(
        name: impl Into<String>,
        anchors: &[(&str, [f64; 3])],
        end_effector: [f64; 3],
        link_radius: f64,
    ) -> Self {
        let joints: Vec<MockJoint> = anchors
            .iter()
            .map(|(n, p)| MockJoint {
                name: n.to_string(),
                anchor: Point3::from(*p),
            })
            .collect();
        let arm = Manipulator::new("arm", (0..joints.len()).collect());
        let mut robot = Self {
            name: name.into(),
            joints,
            manipulators: vec![arm],
            end_effector: Point3::from(end_effector),
            link_radius,
            transform: Isometry3::identity(),
            structure_hash: String::new(),
        };
        robot.structure_hash = robot.compute_structure_hash();
        robot
    }

    /// Seven-joint arm standing on a pedestal; about 1.05 m from shoulder to tool.
    pub fn reference_arm() -> Self {
        Self::new(
            "reference-arm",
            &[
                ("shoulder_yaw", [0.22, 0.14, 0.346]),
                ("shoulder_pitch", [0.22, 0.14, 0.346]),
                ("upper_arm_roll", [0.22, 0.14, 0.346]),
                ("elbow", [0.265, 0.14, 0.896]),
                ("forearm_roll", [0.22, 0.14, 1.196]),
                ("wrist_pitch", [0.22, 0.14, 1.196]),
                ("wrist_roll", [0.22, 0.14, 1.256]),
            ],
            [0.22, 0.14, 1.396],
            0.04,
        )
        .with_structure_hash(REFERENCE_ARM_HASH)
    }

    /// Small four-joint arm with a computed structure hash.
    pub fn compact_arm() -> Self {
        Self::new(
            "compact-arm",
            &[
                ("base_yaw", [0.0, 0.0, 0.1]),
                ("shoulder", [0.0, 0.0, 0.1]),
                ("elbow", [0.0, 0.0, 0.35]),
                ("wrist", [0.0, 0.0, 0.55]),
            ],
            [0.0, 0.0, 0.65],
            0.025,
        )
    }

    /// Override the structure hash, e.g. to stand in for a known robot model.
    pub fn with_structure_hash(mut self, hash: impl Into<String>) -> Self {
        self.structure_hash = hash.into();
        self
    }

    /// Add another manipulator over a subset of joints.
    pub fn with_manipulator(mut self, manip: Manipulator) -> Self {
        self.manipulators.push(manip);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn structure_hash(&self) -> &str {
        &self.structure_hash
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joint_name(&self, joint: usize) -> Option<&str> {
        self.joints.get(joint).map(|j| j.name.as_str())
    }

    pub fn manipulators(&self) -> &[Manipulator] {
        &self.manipulators
    }

    /// Joint anchor in the robot frame.
    pub fn local_anchor(&self, joint: usize) -> Option<Point3<f64>> {
        self.joints.get(joint).map(|j| j.anchor)
    }

    /// End-effector point in the robot frame.
    pub fn local_end_effector(&self) -> Point3<f64> {
        self.end_effector
    }

    pub fn transform(&self) -> Isometry3<f64> {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Isometry3<f64>) {
        self.transform = transform;
    }

    /// SHA-256 over the kinematic description, truncated to 128 bits (hex).
    fn compute_structure_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for j in &self.joints {
            hasher.update(format!("{:.6},{:.6},{:.6};", j.anchor.x, j.anchor.y, j.anchor.z));
        }
        let e = self.end_effector;
        hasher.update(format!("ee:{:.6},{:.6},{:.6};", e.x, e.y, e.z));
        hasher.update(format!("r:{:.6}", self.link_radius));
        let digest = hasher.finalize();
        digest[..16].iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Chain of world-frame points from the first anchor to the end effector.
    fn world_chain(&self) -> Vec<Point3<f64>> {
        self.joints
            .iter()
            .map(|j| self.transform * j.anchor)
            .chain(std::iter::once(self.transform * self.end_effector))
            .collect()
    }
}

/// A body other than the robot (obstacle, table, ...).
#[derive(Debug, Clone)]
struct MockBody {
    id: BodyId,
    name: String,
    enabled: bool,
}

/// A scene with one robot and any number of passive bodies.
#[derive(Debug, Clone)]
pub struct MockScene {
    robot: MockRobot,
    robot_id: BodyId,
    robot_enabled: bool,
    bodies: Vec<MockBody>,
    next_id: u64,
}

impl MockScene {
    pub fn new(robot: MockRobot) -> Self {
        Self {
            robot,
            robot_id: BodyId(1),
            robot_enabled: true,
            bodies: Vec::new(),
            next_id: 2,
        }
    }

    /// Add an enabled passive body.
    pub fn add_body(&mut self, name: impl Into<String>) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(MockBody {
            id,
            name: name.into(),
            enabled: true,
        });
        id
    }

    pub fn body_name(&self, body: BodyId) -> Option<&str> {
        if body == self.robot_id {
            return Some(self.robot.name());
        }
        self.bodies.iter().find(|b| b.id == body).map(|b| b.name.as_str())
    }

    pub fn robot(&self) -> &MockRobot {
        &self.robot
    }

    pub fn robot_mut(&mut self) -> &mut MockRobot {
        &mut self.robot
    }
}

impl Scene for MockScene {
    fn robot_name(&self) -> &str {
        self.robot.name()
    }

    fn robot_structure_hash(&self) -> String {
        self.robot.structure_hash().to_string()
    }

    fn robot_body(&self) -> BodyId {
        self.robot_id
    }

    fn manipulator(&self, name: &str) -> Option<Manipulator> {
        self.robot.manipulators.iter().find(|m| m.name == name).cloned()
    }

    fn joint_anchor(&self, joint: usize) -> Option<Point3<f64>> {
        self.robot.local_anchor(joint).map(|a| self.robot.transform * a)
    }

    fn end_effector_transform(&self, _manip: &Manipulator) -> Isometry3<f64> {
        let tool = Isometry3::from_parts(
            Translation3::from(self.robot.end_effector.coords),
            UnitQuaternion::identity(),
        );
        self.robot.transform * tool
    }

    fn robot_transform(&self) -> Isometry3<f64> {
        self.robot.transform
    }

    fn set_robot_transform(&mut self, transform: Isometry3<f64>) {
        self.robot.set_transform(transform);
    }

    fn bodies(&self) -> Vec<BodyId> {
        std::iter::once(self.robot_id)
            .chain(self.bodies.iter().map(|b| b.id))
            .collect()
    }

    fn is_body_enabled(&self, body: BodyId) -> bool {
        if body == self.robot_id {
            return self.robot_enabled;
        }
        self.bodies.iter().any(|b| b.id == body && b.enabled)
    }

    fn set_body_enabled(&mut self, body: BodyId, enabled: bool) {
        if body == self.robot_id {
            self.robot_enabled = enabled;
            return;
        }
        if let Some(b) = self.bodies.iter_mut().find(|b| b.id == body) {
            b.enabled = enabled;
        }
    }

    fn triangulate_robot(&self) -> TriangleMesh {
        let chain = self.robot.world_chain();
        let mut mesh = TriangleMesh::new();
        for pair in chain.windows(2) {
            add_link_prism(&mut mesh, pair[0], pair[1], self.robot.link_radius);
        }
        mesh
    }
}

/// Append a square prism of half-width `r` around segment `a -> b`.
/// Zero-length segments (co-located joints) produce a cube.
fn add_link_prism(mesh: &mut TriangleMesh, a: Point3<f64>, b: Point3<f64>, r: f64) {
    let axis = b - a;
    let len = axis.norm();
    let dir = if len > 1e-9 { axis / len } else { Vector3::z() };
    let (a, b) = if len > 1e-9 {
        (a, b)
    } else {
        (a - dir * r, a + dir * r)
    };

    let helper = if dir.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    let u = dir.cross(&helper).normalize() * r;
    let v = dir.cross(&u);

    let corner = |base: Point3<f64>, su: f64, sv: f64| -> [f64; 3] {
        let p = base + u * su + v * sv;
        [p.x, p.y, p.z]
    };
    let ring_a = [corner(a, -1.0, -1.0), corner(a, 1.0, -1.0), corner(a, 1.0, 1.0), corner(a, -1.0, 1.0)];
    let ring_b = [corner(b, -1.0, -1.0), corner(b, 1.0, -1.0), corner(b, 1.0, 1.0), corner(b, -1.0, 1.0)];

    mesh.add_quad([ring_a[3], ring_a[2], ring_a[1], ring_a[0]]);
    mesh.add_quad(ring_b);
    for i in 0..4 {
        let j = (i + 1) % 4;
        mesh.add_quad([ring_a[i], ring_a[j], ring_b[j], ring_b[i]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_arm_uses_known_hash() {
        let robot = MockRobot::reference_arm();
        assert_eq!(robot.structure_hash(), REFERENCE_ARM_HASH);
    }

    #[test]
    fn computed_hash_is_stable_and_content_addressed() {
        let a = MockRobot::compact_arm();
        let b = MockRobot::compact_arm();
        assert_eq!(a.structure_hash(), b.structure_hash());
        assert_eq!(a.structure_hash().len(), 32);

        let moved = MockRobot::new("compact-arm", &[("base_yaw", [0.0, 0.0, 0.2])], [0.0, 0.0, 0.65], 0.025);
        assert_ne!(a.structure_hash(), moved.structure_hash());
    }

    #[test]
    fn hash_ignores_robot_name() {
        let a = MockRobot::new("a", &[("j", [0.0, 0.0, 0.1])], [0.0, 0.0, 0.5], 0.02);
        let b = MockRobot::new("b", &[("j", [0.0, 0.0, 0.1])], [0.0, 0.0, 0.5], 0.02);
        assert_eq!(a.structure_hash(), b.structure_hash());
    }

    #[test]
    fn anchors_follow_robot_transform() {
        let mut scene = MockScene::new(MockRobot::compact_arm());
        let shift = Isometry3::translation(1.0, -2.0, 0.5);
        scene.set_robot_transform(shift);
        let anchor = scene.joint_anchor(2).unwrap();
        assert_relative_eq!(anchor, Point3::new(1.0, -2.0, 0.85), epsilon = 1e-12);

        let manip = scene.manipulator("arm").unwrap();
        let ee = scene.end_effector_transform(&manip);
        assert_relative_eq!(ee.translation.vector, Vector3::new(1.0, -2.0, 1.15), epsilon = 1e-12);
    }

    #[test]
    fn body_enable_flags_toggle() {
        let mut scene = MockScene::new(MockRobot::compact_arm());
        let table = scene.add_body("table");
        assert_eq!(scene.bodies().len(), 2);
        assert!(scene.is_body_enabled(table));
        scene.set_body_enabled(table, false);
        assert!(!scene.is_body_enabled(table));
        assert!(scene.is_body_enabled(scene.robot_body()));
        assert_eq!(scene.body_name(table), Some("table"));
    }

    #[test]
    fn triangulation_has_one_prism_per_link() {
        let scene = MockScene::new(MockRobot::compact_arm());
        let mesh = scene.triangulate_robot();
        // 4 joints + end effector = 4 links, 12 triangles each
        assert_eq!(mesh.triangle_count(), 4 * 12);
        assert_eq!(mesh.vertex_count(), 4 * 24);
    }

    #[test]
    fn unknown_manipulator_is_none() {
        let scene = MockScene::new(MockRobot::compact_arm());
        assert!(scene.manipulator("leg").is_none());
    }
}
