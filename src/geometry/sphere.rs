use crate::math::Vector3;
use crate::ray::{HitRecord, Ray};

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub origin: Vector3,
    pub radius: f64,
    pub material_index: usize,
}

impl Sphere {
    pub fn new(origin: Vector3, radius: f64, material_index: usize) -> Self {
        Sphere { origin, radius, material_index }
    }

    /// Closest hit within `[ray.t_min, ray.t_max)`, written into `hit_record`.
    pub fn hit(&self, ray: &Ray, hit_record: &mut HitRecord) -> bool {
        self.test(ray, Some(hit_record))
    }

    /// Any-hit test with no record bookkeeping -- used for shadow rays.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.test(ray, None)
    }

    fn test(&self, ray: &Ray, hit_record: Option<&mut HitRecord>) -> bool {
        let sphere_to_ray = ray.origin - self.origin;
        let a = ray.direction.sqr_magnitude();
        let b = ray.direction.dot(sphere_to_ray) * 2.0;
        let c = sphere_to_ray.sqr_magnitude() - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant <= 0.0 {
            return false;
        }

        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);
        let t = if t1 < ray.t_min { t2 } else { t1 };

        if t < ray.t_min || t >= ray.t_max {
            return false;
        }

        if let Some(hit_record) = hit_record {
            let origin = ray.at(t);
            hit_record.did_hit = true;
            hit_record.material_index = self.material_index;
            hit_record.t = t;
            hit_record.origin = origin;
            hit_record.normal = (origin - self.origin).normalized();
        }
        true
    }
}
