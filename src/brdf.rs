//! BRDF terms shared by the `Material` variants: Lambertian diffuse, Phong specular,
//! and the Cook-Torrance microfacet terms (Schlick Fresnel, GGX distribution, Smith
//! geometry).

use crate::math::{ColorRGB, Vector3, PI};

/// `kd * cd / PI`: diffuse reflectance scales a single diffuse color uniformly.
pub fn lambert(kd: f64, cd: ColorRGB) -> ColorRGB {
    cd * kd / PI
}

/// Per-channel diffuse reflectance (e.g. the remaining energy `1 - specular` after a
/// Cook-Torrance specular term). The reference mismatches channels here (`cd.r*kd.r,
/// cd.b*kd.b, cd.g*kd.g`); this multiplies channel-for-channel instead.
pub fn lambert_colored(kd: ColorRGB, cd: ColorRGB) -> ColorRGB {
    ColorRGB::new(cd.r * kd.r, cd.g * kd.g, cd.b * kd.b) / PI
}

/// Phong specular lobe. `R.V` is taken with its absolute value, which lets the lobe
/// fire even when the reflection points away from the viewer -- kept as-is rather
/// than clamped to `max(0, R.V)`, matching the reference exactly.
pub fn phong(ks: f64, exponent: f64, l: Vector3, v: Vector3, n: Vector3) -> ColorRGB {
    let r = Vector3::reflect(l, n);
    let specular = ks * v.dot(r).abs().powf(exponent);
    ColorRGB::splat(specular)
}

/// Schlick's approximation to the Fresnel reflectance at grazing angles.
pub fn fresnel_schlick(h: Vector3, v: Vector3, f0: ColorRGB) -> ColorRGB {
    f0 + (ColorRGB::WHITE - f0) * (1.0 - h.dot(v)).powf(5.0)
}

/// Trowbridge-Reitz / GGX normal distribution, using `roughness^4` (the squared
/// "perceptual roughness" convention).
pub fn normal_distribution_ggx(n: Vector3, h: Vector3, roughness: f64) -> f64 {
    let a = roughness.powf(4.0);
    let n_dot_h = n.dot(h);
    a / (PI * (n_dot_h * n_dot_h * (a - 1.0) + 1.0).powf(2.0))
}

/// Schlick-GGX geometry term for one direction (call twice, once for `v` and once
/// for `l`, to get the Smith term below).
pub fn geometry_schlick_ggx(n: Vector3, v: Vector3, roughness: f64) -> f64 {
    let orthogonality = n.dot(v);
    let k = (roughness + 1.0).powf(2.0) / 8.0;
    orthogonality / (orthogonality * (1.0 - k) + k)
}

/// Smith's geometry term: the product of the Schlick-GGX term in the view and light
/// directions, modeling both shadowing and masking.
pub fn geometry_smith(n: Vector3, v: Vector3, l: Vector3, roughness: f64) -> f64 {
    geometry_schlick_ggx(n, v, roughness) * geometry_schlick_ggx(n, l, roughness)
}
