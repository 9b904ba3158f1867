//! Scene aggregation: typed geometry lists, lights, materials and the active camera.
//!
//! Named `world` rather than `scene` so it doesn't collide with the teacher's
//! original `scene/` module, which stays in the tree as reference material until the
//! final trim pass.

use crate::camera::Camera;
use crate::geometry::{Plane, Sphere};
use crate::light::Light;
use crate::material::Material;
use crate::mesh::TriangleMesh;
use crate::ray::{HitRecord, Ray};

#[derive(Debug, Clone)]
pub struct World {
    pub camera: Camera,
    pub spheres: Vec<Sphere>,
    pub planes: Vec<Plane>,
    pub meshes: Vec<TriangleMesh>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
}

impl World {
    pub fn new(camera: Camera) -> Self {
        World {
            camera,
            spheres: Vec::new(),
            planes: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    /// The closest hit across every sphere, plane and mesh in the scene.
    pub fn closest_hit(&self, ray: &Ray) -> HitRecord {
        let mut closest = HitRecord::default();
        let mut temp = HitRecord::default();

        for sphere in &self.spheres {
            if sphere.hit(ray, &mut temp) && temp.t < closest.t {
                closest = temp;
            }
        }
        for plane in &self.planes {
            if plane.hit(ray, &mut temp) && temp.t < closest.t {
                closest = temp;
            }
        }
        for mesh in &self.meshes {
            if mesh.hit(ray, &mut temp) && temp.t < closest.t {
                closest = temp;
            }
        }

        closest
    }

    /// True as soon as any geometry blocks `ray` -- used for shadow rays, where only
    /// occlusion matters and the closest point is irrelevant.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.spheres.iter().any(|s| s.does_hit(ray))
            || self.planes.iter().any(|p| p.does_hit(ray))
            || self.meshes.iter().any(|m| m.does_hit(ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{ColorRGB, Vector3};

    fn empty_world() -> World {
        World::new(Camera::new(Vector3::ZERO, 90.0))
    }

    #[test]
    fn empty_world_never_hits() {
        let world = empty_world();
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Z);
        assert!(!world.closest_hit(&ray).did_hit);
        assert!(!world.does_hit(&ray));
    }

    #[test]
    fn closest_hit_picks_nearer_sphere_over_farther_one() {
        let mut world = empty_world();
        let red = world.add_material(Material::SolidColor { color: ColorRGB::new(1.0, 0.0, 0.0) });
        let blue = world.add_material(Material::SolidColor { color: ColorRGB::new(0.0, 0.0, 1.0) });
        world.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, 10.0), 1.0, blue));
        world.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, red));

        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Z);
        let hit = world.closest_hit(&ray);
        assert!(hit.did_hit);
        assert_eq!(hit.material_index, red);
    }
}
