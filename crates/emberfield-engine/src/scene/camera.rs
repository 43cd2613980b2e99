use glam::{Mat4, Vec3};

/// Perspective camera.
///
/// Backdrop cameras never rotate; `position` is a plain translation (the
/// particle field sits at z = 5, the emblem at z = 3).
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Camera {
    pub fn perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
        }
    }

    /// Recomputes the aspect ratio from a viewport size.
    ///
    /// Zero-height viewports are ignored so a minimized window cannot poison
    /// the projection.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_aspect_uses_width_over_height() {
        let mut cam = Camera::default();
        cam.set_aspect(800.0, 600.0);
        assert!((cam.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn set_aspect_ignores_zero_height() {
        let mut cam = Camera::default();
        let before = cam.aspect;
        cam.set_aspect(800.0, 0.0);
        assert_eq!(cam.aspect, before);
    }

    #[test]
    fn view_projection_is_finite() {
        let mut cam = Camera::default();
        cam.position.z = 5.0;
        let vp = cam.view_projection();
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
