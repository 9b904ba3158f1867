use crate::math::Vector3;

/// A world-space ray. `direction` is assumed normalized everywhere except the primary
/// ray produced by the camera, whose direction carries pixel-plane scale through the
/// camera-to-world transform and is left un-normalized (every `t` comparison for one ray
/// stays internally consistent regardless).
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
    pub t_min: f64,
    pub t_max: f64,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Ray { origin, direction, t_min: 1e-4, t_max: f64::INFINITY }
    }

    pub fn with_bounds(origin: Vector3, direction: Vector3, t_min: f64, t_max: f64) -> Self {
        Ray { origin, direction, t_min, t_max }
    }

    pub fn at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }
}

/// Outcome of an intersection test. `t` starts at `+infinity`; `did_hit` is the
/// authoritative flag (a `t` of infinity alone wouldn't distinguish a real very-far hit
/// from a miss since the ray's own `t_max` can be infinite too).
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    pub origin: Vector3,
    pub normal: Vector3,
    pub t: f64,
    pub did_hit: bool,
    pub material_index: usize,
}

impl Default for HitRecord {
    fn default() -> Self {
        HitRecord {
            origin: Vector3::ZERO,
            normal: Vector3::ZERO,
            t: f64::INFINITY,
            did_hit: false,
            material_index: 0,
        }
    }
}
