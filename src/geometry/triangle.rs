use crate::geometry::CullMode;
use crate::math::{are_equal, Vector3};
use crate::ray::{HitRecord, Ray};

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Vector3,
    pub v1: Vector3,
    pub v2: Vector3,
    pub normal: Vector3,
    pub cull_mode: CullMode,
    pub material_index: usize,
}

impl Triangle {
    pub fn new(v0: Vector3, v1: Vector3, v2: Vector3, normal: Vector3, cull_mode: CullMode, material_index: usize) -> Self {
        Triangle { v0, v1, v2, normal, cull_mode, material_index }
    }

    /// True iff `hit_point` is on the inner side of edge `v0->v1`, judged against `normal`.
    fn is_point_inside_edge(v0: Vector3, v1: Vector3, hit_point: Vector3, normal: Vector3) -> bool {
        let edge = v1 - v0;
        let to_point = hit_point - v0;
        normal.dot(edge.cross(to_point)) >= 0.0
    }

    pub fn hit(&self, ray: &Ray, hit_record: &mut HitRecord) -> bool {
        self.test(ray, self.cull_mode, Some(hit_record))
    }

    /// Any-hit test for shadow rays: the visible side is inverted, so a triangle that
    /// normally culls its back face from the camera still casts a shadow from it.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.test(ray, self.cull_mode.inverted(), None)
    }

    fn test(&self, ray: &Ray, cull_mode: CullMode, hit_record: Option<&mut HitRecord>) -> bool {
        let orthogonality = ray.direction.dot(self.normal);
        if are_equal(orthogonality, 0.0)
            || (cull_mode == CullMode::BackFace && orthogonality > 0.0)
            || (cull_mode == CullMode::FrontFace && orthogonality < 0.0)
        {
            return false;
        }

        let l = self.v0 - ray.origin;
        let t = l.dot(self.normal) / orthogonality;
        if t < ray.t_min || t >= ray.t_max {
            return false;
        }

        let hit_point = ray.at(t);
        if !Triangle::is_point_inside_edge(self.v0, self.v1, hit_point, self.normal)
            || !Triangle::is_point_inside_edge(self.v1, self.v2, hit_point, self.normal)
            || !Triangle::is_point_inside_edge(self.v2, self.v0, hit_point, self.normal)
        {
            return false;
        }

        if let Some(hit_record) = hit_record {
            hit_record.did_hit = true;
            hit_record.material_index = self.material_index;
            hit_record.normal = self.normal;
            hit_record.origin = hit_point;
            hit_record.t = t;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_xy_triangle(cull_mode: CullMode) -> Triangle {
        let v0 = Vector3::new(-1.0, -1.0, 5.0);
        let v1 = Vector3::new(1.0, -1.0, 5.0);
        let v2 = Vector3::new(0.0, 1.0, 5.0);
        let normal = (v1 - v0).cross(v2 - v0).normalized();
        Triangle::new(v0, v1, v2, normal, cull_mode, 0)
    }

    #[test]
    fn ray_through_centroid_hits() {
        let tri = unit_xy_triangle(CullMode::NoCulling);
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Z);
        let mut hit = HitRecord::default();
        assert!(tri.hit(&ray, &mut hit));
        assert!((hit.t - 5.0).abs() < 1e-6);
    }

    #[test]
    fn ray_outside_edge_misses() {
        let tri = unit_xy_triangle(CullMode::NoCulling);
        let ray = Ray::new(Vector3::new(5.0, 5.0, 0.0), Vector3::UNIT_Z);
        assert!(!tri.does_hit(&ray));
    }

    #[test]
    fn back_face_culling_blocks_camera_ray_but_not_shadow_ray() {
        let tri = unit_xy_triangle(CullMode::BackFace);
        // This triangle's normal points in +z, same as the ray direction, so the ray
        // strikes its back face and a BackFace-culled hit test rejects it.
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Z);
        assert!(!tri.hit(&ray, &mut HitRecord::default()));
        // Shadow/any-hit rays invert the cull mode, so the same ray still registers.
        assert!(tri.does_hit(&ray));
    }
}
