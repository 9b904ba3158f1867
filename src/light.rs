//! Point and directional lights.

use crate::math::{ColorRGB, Vector3};
use crate::noise;

#[derive(Debug, Clone, Copy)]
pub enum Light {
    Point { origin: Vector3, color: ColorRGB, intensity: f64 },
    Directional { direction: Vector3, color: ColorRGB, intensity: f64 },
}

impl Light {
    /// Un-normalized vector from `origin` toward the light. For a directional light
    /// this is the light's own direction scaled far out, matching the reference's
    /// `direction * FLT_MAX` -- the magnitude only matters insofar as it sets the ray's
    /// `t_max`, never its direction.
    pub fn direction_to(&self, origin: Vector3) -> Vector3 {
        match *self {
            Light::Point { origin: light_origin, .. } => light_origin - origin,
            Light::Directional { direction, .. } => direction * 1e10,
        }
    }

    /// Radiance arriving at a point `sqr_distance` away (point lights fall off with
    /// inverse-square distance; directional lights don't fall off at all).
    pub fn radiance(&self, sqr_distance_to_light: f64) -> ColorRGB {
        match *self {
            Light::Point { color, intensity, .. } => color * (intensity / sqr_distance_to_light),
            Light::Directional { color, intensity, .. } => color * intensity,
        }
    }

    /// A point inside a sphere of `radius` around a point light's origin, used to
    /// soften hard shadows by jittering the shadow ray's target. Directional lights
    /// have no `origin`, so soft shadows fall back to a single hard-shadow sample for
    /// them (see `renderer`'s shadow dispatch).
    pub fn random_point_in_radius(&self, radius: f64, noise_index: i32) -> Vector3 {
        let origin = match *self {
            Light::Point { origin, .. } => origin,
            Light::Directional { .. } => return Vector3::ZERO,
        };

        let u = noise::noise_zero_to_one(noise_index, 0);
        let theta = 2.0 * crate::math::PI * noise::noise_zero_to_one(noise_index, 1);
        let phi = (1.0 - 2.0 * u).acos();

        let sin_phi = phi.sin();
        let random_point = Vector3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), phi.cos());

        origin + random_point * radius
    }
}
