use crate::math::Vector3;
use crate::ray::Ray;

/// Axis-aligned bounding box stored as (min, max). An empty box starts out inverted
/// (`min` at `+inf`, `max` at `-inf`) so the first `grow` call always wins.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb {
            min: Vector3::splat(f64::INFINITY),
            max: Vector3::splat(f64::NEG_INFINITY),
        }
    }
}

impl Aabb {
    pub fn grow_point(&mut self, p: Vector3) {
        self.min = Vector3::min(self.min, p);
        self.max = Vector3::max(self.max, p);
    }

    pub fn grow_aabb(&mut self, other: &Aabb) {
        self.min = Vector3::min(self.min, other.min);
        self.max = Vector3::max(self.max, other.max);
    }

    /// Half the true surface area (`2*(xy+yz+zx)`) -- SAH only ever compares costs
    /// against each other, so the constant factor is dropped, matching the reference.
    pub fn area(&self) -> f64 {
        let e = self.max - self.min;
        if e.x < 0.0 || e.y < 0.0 || e.z < 0.0 {
            return 0.0;
        }
        e.x * e.y + e.y * e.z + e.z * e.x
    }

    pub fn contains(&self, p: Vector3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Slab test: intersected iff `tmax >= tmin && tmax > 0`. NaN components (e.g. a
    /// degenerate, zero-extent AABB from a mesh with no triangles) make every
    /// comparison here false, which is already "no hit" -- no special-casing needed.
    pub fn hit(&self, ray: &Ray) -> bool {
        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;

        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t1 = (self.min[axis] - ray.origin[axis]) * inv_d;
            let mut t2 = (self.max[axis] - ray.origin[axis]) * inv_d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
        }

        tmax >= tmin && tmax > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_invalid_until_grown() {
        let aabb = Aabb::default();
        assert!(aabb.area() == 0.0 || aabb.area().is_infinite());
    }

    #[test]
    fn grown_box_contains_its_points() {
        let mut aabb = Aabb::default();
        aabb.grow_point(Vector3::new(-1.0, -1.0, -1.0));
        aabb.grow_point(Vector3::new(1.0, 1.0, 1.0));
        assert!(aabb.contains(Vector3::ZERO));
        assert!(!aabb.contains(Vector3::new(2.0, 0.0, 0.0)));
    }
}
