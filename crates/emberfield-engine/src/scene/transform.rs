use glam::{EulerRot, Mat4, Vec3};

/// Per-drawable transform: XYZ euler rotation plus translation.
///
/// Backdrops only ever mutate the aggregate transform of a whole drawable —
/// the geometry itself is immutable after generation.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Transform {
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub position: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
    }
}
