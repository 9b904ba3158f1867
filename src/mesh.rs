//! Triangle meshes: local-space geometry plus a cached world-space transform and the
//! BVH built over that cache.

use crate::bvh::Bvh;
use crate::geometry::{CullMode, Triangle};
use crate::math::{Matrix4, Vector3};
use crate::ray::{HitRecord, Ray};

#[derive(Debug, Clone)]
pub struct TriangleMesh {
    positions: Vec<Vector3>,
    normals: Vec<Vector3>,
    indices: Vec<u32>,
    pub material_index: usize,
    pub cull_mode: CullMode,

    rotation: Matrix4,
    translation: Matrix4,
    scale: Matrix4,

    transformed_positions: Vec<Vector3>,
    transformed_normals: Vec<Vector3>,
    bvh: Bvh,
}

impl TriangleMesh {
    /// Builds a mesh from positions/indices, deriving one flat normal per triangle
    /// from its winding order.
    pub fn new(positions: Vec<Vector3>, indices: Vec<u32>, cull_mode: CullMode, material_index: usize) -> Self {
        let normals = TriangleMesh::calculate_normals(&positions, &indices);
        TriangleMesh::with_normals(positions, indices, normals, cull_mode, material_index)
    }

    pub fn with_normals(
        positions: Vec<Vector3>,
        indices: Vec<u32>,
        normals: Vec<Vector3>,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Self {
        assert_eq!(indices.len() % 3, 0, "mesh index buffer must hold whole triangles");
        assert_eq!(normals.len(), indices.len() / 3, "one normal per triangle");

        let bvh = Bvh::build(&positions, indices.clone());
        let mut mesh = TriangleMesh {
            positions,
            normals,
            indices,
            material_index,
            cull_mode,
            rotation: Matrix4::identity(),
            translation: Matrix4::identity(),
            scale: Matrix4::identity(),
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
            bvh,
        };
        mesh.update_transforms();
        mesh
    }

    fn calculate_normals(positions: &[Vector3], indices: &[u32]) -> Vec<Vector3> {
        indices
            .chunks_exact(3)
            .map(|tri| {
                let v0 = positions[tri[0] as usize];
                let v1 = positions[tri[1] as usize];
                let v2 = positions[tri[2] as usize];
                (v1 - v0).cross(v2 - v0).normalized()
            })
            .collect()
    }

    pub fn translate(&mut self, translation: Vector3) {
        self.translation = Matrix4::translation(translation);
        self.update_transforms();
    }

    pub fn rotate_y(&mut self, yaw: f64) {
        self.rotation = Matrix4::rotation_y(yaw);
        self.update_transforms();
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = Matrix4::scale(scale);
        self.update_transforms();
    }

    /// Composes rotation, translation then scale (an RTS matrix, not the more usual
    /// TRS) so rotating and scaling orbit the translated position -- needed for
    /// objects meant to revolve rather than spin in place. The BVH is built over
    /// transformed positions, so any transform change rebuilds it to keep node AABBs
    /// consistent with the triangles `hit`/`does_hit` actually test.
    fn update_transforms(&mut self) {
        let rts = Matrix4::compose(&[self.scale, self.translation, self.rotation]);

        self.transformed_positions = self.positions.iter().map(|p| rts.transform_point(*p)).collect();
        self.transformed_normals =
            self.normals.iter().map(|n| rts.transform_vector(*n).normalized()).collect();

        self.bvh = Bvh::build(&self.transformed_positions, self.indices.clone());
    }

    /// Builds the `Triangle`s for one leaf. `first_tri` is the leaf's offset into
    /// `bvh.order`, which maps each (possibly reordered) triangle slot back to its
    /// original index so the precomputed, transformed normal can still be found.
    fn triangle_from_leaf(&self, first_tri: usize, leaf: &[u32]) -> impl Iterator<Item = Triangle> + '_ {
        leaf.chunks_exact(3).enumerate().map(move |(i, tri)| {
            let original_tri = self.bvh.order[first_tri + i] as usize;
            Triangle::new(
                self.transformed_positions[tri[0] as usize],
                self.transformed_positions[tri[1] as usize],
                self.transformed_positions[tri[2] as usize],
                self.transformed_normals[original_tri],
                self.cull_mode,
                self.material_index,
            )
        })
    }

    pub fn hit(&self, ray: &Ray, hit_record: &mut HitRecord) -> bool {
        let mut found = false;
        let mut best = *hit_record;
        self.bvh.visit_leaves(ray, |first_tri, leaf| {
            for tri in self.triangle_from_leaf(first_tri, leaf) {
                let mut temp = HitRecord::default();
                if tri.hit(ray, &mut temp) && temp.t < best.t {
                    best = temp;
                    found = true;
                }
            }
            false
        });
        if found {
            *hit_record = best;
        }
        found
    }

    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.bvh.visit_leaves(ray, |first_tri, leaf| {
            self.triangle_from_leaf(first_tri, leaf).any(|tri| tri.does_hit(ray))
        })
    }

    /// The mesh's BVH root bounds, in transformed (world) space -- `(min, max)`.
    pub fn root_bounds(&self) -> (Vector3, Vector3) {
        let aabb = self.bvh.root_bounds();
        (aabb.min, aabb.max)
    }

    /// Number of nodes in the mesh's BVH, for determinism/regression checks.
    pub fn node_count(&self) -> usize {
        self.bvh.node_count()
    }
}
