use glam::{Mat4, Vec3};

/// Orbit camera around a target point.
///
/// The pose is stored as spherical coordinates so rotate/pan/zoom stay
/// numerically stable no matter how long the user drags.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Radians around +Y; 0 looks down -Z from +Z.
    pub yaw: f32,
    /// Radians above the horizon.
    pub pitch: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Matches the initial preview pose: eye (0, 0.5, 2), 50 degree fov.
        Self::looking_from(Vec3::new(0.0, 0.5, 2.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(0.05);
        Self {
            target,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).asin(),
            fov_y: 50f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 1000.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        ) * self.distance;
        self.target + offset
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
        proj * view
    }

    /// Rotate around the target. Deltas are in screen pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.008;
        self.pitch = (self.pitch + dy * 0.008)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
    }

    /// Slide target and eye together in the view plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        // scale by distance so a drag covers the same screen fraction at any zoom
        let scale = self.distance * 0.0015;
        self.target += (right * -dx + up * dy) * scale;
    }

    /// Positive delta zooms in. Multiplicative so it never overshoots the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.05, 500.0);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Re-aim at a freshly decoded scene so it fills the viewport.
    pub fn frame(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let size = max - min;
        let max_dim = size.x.max(size.y).max(size.z);
        if max_dim <= 0.0 {
            return;
        }
        self.target = center;
        self.distance = max_dim * 2.5;
        self.near = (max_dim * 0.001).max(0.001);
        self.far = (max_dim * 100.0).max(10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_pose() {
        let cam = OrbitCamera::default();
        let pos = cam.position();
        assert!((pos - Vec3::new(0.0, 0.5, 2.0)).length() < 1e-4);
        assert!((cam.fov_y - 50f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut cam = OrbitCamera::default();
        let d0 = (cam.position() - cam.target).length();
        cam.orbit(120.0, -45.0);
        let d1 = (cam.position() - cam.target).length();
        assert!((d0 - d1).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut cam = OrbitCamera::default();
        for _ in 0..500 {
            cam.zoom(1.0);
        }
        assert!(cam.distance >= 0.05);
        for _ in 0..500 {
            cam.zoom(-1.0);
        }
        assert!(cam.distance <= 500.0);
    }

    #[test]
    fn test_frame_centers_on_scene() {
        let mut cam = OrbitCamera::default();
        cam.frame(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(cam.target, Vec3::new(1.0, 1.0, 0.0));
        assert!((cam.distance - 10.0).abs() < 1e-5);
    }
}
