//! Materials: a closed set of shading models dispatched through a `match`, matching
//! the teacher's own closed `Object` enum rather than a `dyn Material` trait object --
//! there are exactly four variants and none are added at runtime.

use crate::brdf;
use crate::math::{ColorRGB, Vector3};
use crate::ray::{HitRecord, Ray};

#[derive(Debug, Clone, Copy)]
pub enum Material {
    SolidColor { color: ColorRGB },
    Lambert { diffuse_color: ColorRGB, diffuse_reflectance: f64 },
    LambertPhong { diffuse_color: ColorRGB, kd: f64, ks: f64, phong_exponent: f64 },
    CookTorrance { albedo: ColorRGB, metalness: f64, roughness: f64 },
}

/// Out-parameter carrying whatever a `Shade` call decides about a follow-up bounce.
/// Only `CookTorrance` with `metalness == 1.0` (a pure metal) ever populates this --
/// diffuse materials never reflect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadeInfo {
    pub needs_bounce: bool,
    pub reflection_ray: Option<Ray>,
    pub reflectance: f64,
}

impl Material {
    /// `l` points from the surface toward the light; `v` points from the surface
    /// toward the viewer. Both must already be normalized.
    pub fn shade(&self, shade_info: &mut ShadeInfo, hit_record: &HitRecord, l: Vector3, v: Vector3) -> ColorRGB {
        match *self {
            Material::SolidColor { color } => color,
            Material::Lambert { diffuse_color, diffuse_reflectance } => {
                brdf::lambert(diffuse_reflectance, diffuse_color)
            }
            Material::LambertPhong { diffuse_color, kd, ks, phong_exponent } => {
                brdf::lambert(kd, diffuse_color) + brdf::phong(ks, phong_exponent, l, v, hit_record.normal)
            }
            Material::CookTorrance { albedo, metalness, roughness } => {
                Material::shade_cook_torrance(shade_info, hit_record, l, v, albedo, metalness, roughness)
            }
        }
    }

    fn shade_cook_torrance(
        shade_info: &mut ShadeInfo,
        hit_record: &HitRecord,
        l: Vector3,
        v: Vector3,
        albedo: ColorRGB,
        metalness: f64,
        roughness: f64,
    ) -> ColorRGB {
        let h = (l + v).normalized();
        let f0 = if metalness == 0.0 { ColorRGB::splat(0.04) } else { albedo };

        let fresnel = brdf::fresnel_schlick(h, v, f0);
        let normal_distribution = brdf::normal_distribution_ggx(hit_record.normal, h, roughness);
        let geometric_attenuation = brdf::geometry_smith(hit_record.normal, v, l, roughness);

        let reflip_coefficient = 1.0 / (4.0 * v.dot(hit_record.normal) * l.dot(hit_record.normal));
        let specular = fresnel * (normal_distribution * geometric_attenuation * reflip_coefficient);
        let diffuse = if metalness == 1.0 {
            ColorRGB::BLACK
        } else {
            brdf::lambert_colored(ColorRGB::WHITE - specular, albedo)
        };

        if metalness == 1.0 {
            shade_info.needs_bounce = true;
            shade_info.reflection_ray = Some(Ray::new(
                hit_record.origin + hit_record.normal * 1e-4,
                Vector3::reflect(-v, hit_record.normal),
            ));
            shade_info.reflectance = (1.0 - roughness).powf(2.0);
        }

        specular + diffuse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_color_ignores_lighting() {
        let mat = Material::SolidColor { color: ColorRGB::new(1.0, 0.0, 0.0) };
        let mut info = ShadeInfo::default();
        let hit = HitRecord::default();
        let result = mat.shade(&mut info, &hit, Vector3::UNIT_Y, Vector3::UNIT_Y);
        assert_eq!(result, ColorRGB::new(1.0, 0.0, 0.0));
        assert!(!info.needs_bounce);
    }

    #[test]
    fn pure_metal_requests_a_bounce() {
        let mat = Material::CookTorrance { albedo: ColorRGB::splat(0.9), metalness: 1.0, roughness: 0.1 };
        let mut info = ShadeInfo::default();
        let mut hit = HitRecord::default();
        hit.normal = Vector3::UNIT_Y;
        hit.origin = Vector3::ZERO;
        let l = Vector3::new(0.3, 1.0, 0.0).normalized();
        let v = Vector3::new(-0.3, 1.0, 0.0).normalized();
        mat.shade(&mut info, &hit, l, v);
        assert!(info.needs_bounce);
        assert!(info.reflection_ray.is_some());
    }

    #[test]
    fn dielectric_never_bounces() {
        let mat = Material::CookTorrance { albedo: ColorRGB::splat(0.5), metalness: 0.0, roughness: 0.5 };
        let mut info = ShadeInfo::default();
        let mut hit = HitRecord::default();
        hit.normal = Vector3::UNIT_Y;
        let l = Vector3::new(0.0, 1.0, 0.0);
        let v = Vector3::new(0.0, 1.0, 0.0);
        mat.shade(&mut info, &hit, l, v);
        assert!(!info.needs_bounce);
    }
}
