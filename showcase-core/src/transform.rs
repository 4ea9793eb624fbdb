/// Object poses, rotation state and the matrices built from them
use nalgebra::{Matrix4, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Placement of a renderable object: translation, rotation and uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: RotationState,
    pub scale: f32,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: RotationState, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Translation * rotation * scale
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(self.position.x, self.position.y, self.position.z)
            * Transform::rotation_matrix(&self.rotation)
            * Transform::scale_matrix(self.scale, self.scale, self.scale)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vector3::zeros(), RotationState::zero(), 1.0)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state() {
        let state = RotationState::default();
        assert_eq!(state, RotationState::new(0.0, 0.0, 0.0));
        assert_eq!(Pose::default().rotation, state);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_pose_scales_then_translates() {
        let pose = Pose::new(Vector3::new(-2.0, -1.0, 0.0), RotationState::zero(), 2.0);
        let moved = pose.model_matrix().transform_point(&Point3::new(0.5, 0.5, 0.5));
        assert!((moved - Point3::new(-1.0, 0.0, 1.0)).norm() < 1e-6);
    }
}
