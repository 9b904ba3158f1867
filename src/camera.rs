//! Camera pose, basis vectors and primary-ray generation.

use crate::math::{Matrix4, Vector3, PI};
use crate::ray::Ray;

const MOVEMENT_SPEED: f64 = 3.0;
const ROTATION_SPEED: f64 = 0.001;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub origin: Vector3,
    fov_angle: f64,
    fov_coefficient: f64,

    forward: Vector3,
    up: Vector3,
    right: Vector3,

    total_pitch: f64,
    total_yaw: f64,
}

impl Camera {
    pub fn new(origin: Vector3, fov_angle: f64) -> Camera {
        let mut camera = Camera {
            origin,
            fov_angle,
            fov_coefficient: 0.0,
            forward: Vector3::UNIT_Z,
            up: Vector3::UNIT_Y,
            right: Vector3::UNIT_X,
            total_pitch: 0.0,
            total_yaw: 0.0,
        };
        camera.fov_changed();
        camera
    }

    pub fn set_fov(&mut self, fov_angle: f64) {
        self.fov_angle = fov_angle;
        self.fov_changed();
    }

    fn fov_changed(&mut self) {
        self.fov_coefficient = (self.fov_angle * 0.5 * PI / 180.0).tan();
    }

    /// Rebuilds `forward`/`right`/`up` from `total_pitch`/`total_yaw`. Expensive
    /// enough (a full basis recompute) that callers should only invoke it after the
    /// angles actually change.
    fn apply_rotations(&mut self) {
        let rotation = Matrix4::rotation_x(self.total_pitch).then(Matrix4::rotation_y(self.total_yaw));
        self.forward = rotation.transform_vector(Vector3::UNIT_Z).normalized();
        self.right = Vector3::UNIT_Y.cross(self.forward).normalized();
        self.up = self.forward.cross(self.right).normalized();
    }

    pub fn translate_keyboard(&mut self, forward: f64, right: f64, delta_time: f64) {
        let speed = delta_time * MOVEMENT_SPEED;
        self.origin += self.forward * (forward * speed);
        self.origin += self.right * (right * speed);
    }

    pub fn rotate_mouse(&mut self, delta_x: f64, delta_y: f64, delta_time: f64) {
        let speed = delta_time * ROTATION_SPEED;
        self.total_yaw = Camera::normalize_rotation_angle(self.total_yaw + delta_x * speed);
        self.total_pitch = Camera::normalize_rotation_angle(self.total_pitch + delta_y * speed);
        self.apply_rotations();
    }

    /// Wraps an angle into `(-2*PI, 2*PI)`.
    fn normalize_rotation_angle(mut angle: f64) -> f64 {
        if angle == 0.0 {
            return angle;
        }
        let direction = angle.abs() / angle;
        while angle * direction > 2.0 * PI {
            angle -= 2.0 * PI * direction;
        }
        angle
    }

    /// A primary ray through pixel `(px, py)` of a `width x height` image. NDC
    /// conversion and the fov/aspect-ratio scale happen here; the camera's basis only
    /// rotates the resulting direction into world space.
    pub fn generate_ray(&self, px: u32, py: u32, width: u32, height: u32) -> Ray {
        let aspect_ratio = width as f64 / height as f64;
        let x = (2.0 * (px as f64 + 0.5) / width as f64 - 1.0) * aspect_ratio * self.fov_coefficient;
        let y = (1.0 - 2.0 * (py as f64 + 0.5) / height as f64) * self.fov_coefficient;

        let direction = self.right * x + self.up * y + self.forward * 1.0;
        Ray::new(self.origin, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_camera_looks_down_positive_z() {
        let camera = Camera::new(Vector3::ZERO, 90.0);
        let ray = camera.generate_ray(50, 50, 100, 100);
        assert!(ray.direction.z > 0.0);
    }

    #[test]
    fn wider_fov_widens_edge_ray_spread() {
        let narrow = Camera::new(Vector3::ZERO, 40.0);
        let wide = Camera::new(Vector3::ZERO, 120.0);
        let narrow_edge = narrow.generate_ray(0, 50, 100, 100);
        let wide_edge = wide.generate_ray(0, 50, 100, 100);
        assert!(wide_edge.direction.x.abs() > narrow_edge.direction.x.abs());
    }

    #[test]
    fn rotation_angle_wraps_into_range() {
        let wrapped = Camera::normalize_rotation_angle(5.0 * PI);
        assert!(wrapped.abs() <= 2.0 * PI + 1e-9);
    }
}
