use crate::math::*;

/// Transformation represented by separate scaling, translation, and rotation factors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform
{
    /// Translation
    pub translation: Vector3<f32>,

    /// Per-axis scale factors
    pub scale: Vector3<f32>,

    /// Rotation
    pub rotation: Quaternion<f32>

}

impl Transform {

    pub fn identity() -> Transform {
        Transform {
            translation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            rotation: quaternion_id(),
        }
    }

    ///
    /// Interpolate towards `other`: linear for translation and scale,
    /// shortest-path spherical for rotation
    ///
    pub fn lerp(self, other: Transform, parameter: f32) -> Transform {
        Transform {
            translation: lerp_vector3(&self.translation, &other.translation, &parameter),
            scale: lerp_vector3(&self.scale, &other.scale, &parameter),
            rotation: slerp_quaternion(&self.rotation, &other.rotation, &parameter),
        }
    }

    ///
    /// Compose into a single `translation * rotation * scale` matrix
    ///
    pub fn to_matrix(&self) -> Matrix4<f32> {
        trs_to_matrix(self.translation, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::identity()
    }
}
