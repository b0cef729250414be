/// Orbit camera controls driven from the keyboard
use goal3d_core::Camera;
use nalgebra::{Point3, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Keep the camera off the poles so `look_at` keeps a stable up vector
const MAX_ELEVATION: f32 = FRAC_PI_2 - 0.05;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;

/// Spherical camera rig around a target point
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Point3<f32>,
    distance: f32,
    azimuth: f32,
    elevation: f32,
    enabled: bool,
}

impl OrbitControls {
    /// Start from wherever the camera currently is
    pub fn new(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.norm().clamp(MIN_DISTANCE, MAX_DISTANCE);
        Self {
            target: camera.target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Turn around the target (radians); ignored while disabled
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        if !self.enabled {
            return;
        }
        self.azimuth += d_azimuth;
        self.elevation = (self.elevation + d_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Scale the distance to the target; ignored while disabled
    pub fn zoom(&mut self, factor: f32) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Per-frame hook: write the rig into the camera
    pub fn update(&self, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let offset = Vector3::new(sin_az * cos_el, sin_el, cos_az * cos_el) * self.distance;
        camera.position = self.target + offset;
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_preserves_initial_camera() {
        let mut camera = Camera::default();
        let start = camera.position;
        let controls = OrbitControls::new(&camera);
        controls.update(&mut camera);
        assert!((camera.position - start).norm() < 1e-5);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::new(&camera);
        controls.rotate(FRAC_PI_2, 0.0);
        controls.update(&mut camera);
        assert!((camera.position - Point3::new(5.0, 0.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_disabled_controls_leave_camera_alone() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::new(&camera);
        controls.set_enabled(false);
        controls.rotate(1.0, 0.5);
        controls.zoom(3.0);
        controls.update(&mut camera);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));

        controls.set_enabled(true);
        controls.update(&mut camera);
        assert!((camera.position - Point3::new(0.0, 0.0, 5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_elevation_and_zoom_are_clamped() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::new(&camera);
        controls.rotate(0.0, 10.0);
        controls.zoom(1000.0);
        controls.update(&mut camera);
        let offset = camera.position - camera.target;
        assert!((offset.norm() - MAX_DISTANCE).abs() < 1e-3);
        assert!(offset.y < MAX_DISTANCE);
    }
}
