use crate::math::Vector3;
use crate::ray::{HitRecord, Ray};

#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub origin: Vector3,
    pub normal: Vector3,
    pub material_index: usize,
}

impl Plane {
    pub fn new(origin: Vector3, normal: Vector3, material_index: usize) -> Self {
        Plane { origin, normal, material_index }
    }

    pub fn hit(&self, ray: &Ray, hit_record: &mut HitRecord) -> bool {
        self.test(ray, Some(hit_record))
    }

    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.test(ray, None)
    }

    fn test(&self, ray: &Ray, hit_record: Option<&mut HitRecord>) -> bool {
        let denom = ray.direction.dot(self.normal);
        // A ray parallel to the plane gives `denom == 0`; the division below then
        // produces `t = +/-inf`, which the interval check rejects on its own, so no
        // separate parallel check is needed.
        let ray_to_plane = self.origin - ray.origin;
        let t = ray_to_plane.dot(self.normal) / denom;

        if t < ray.t_min || t >= ray.t_max {
            return false;
        }

        if let Some(hit_record) = hit_record {
            hit_record.did_hit = true;
            hit_record.material_index = self.material_index;
            hit_record.t = t;
            hit_record.origin = ray.at(t);
            hit_record.normal = self.normal;
        }
        true
    }
}
