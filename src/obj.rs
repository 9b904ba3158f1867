//! A deliberately minimal Wavefront OBJ reader: only `v` (vertex) and `f` (a
//! triangular face) lines are recognized, matching the reference loader's own
//! narrow subset. Anything else (`vt`, `vn`, `g`, `usemtl`, ...) is ignored.

use crate::error::{RenderError, Result};
use crate::math::Vector3;

pub struct ObjMesh {
    pub positions: Vec<Vector3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vector3>,
}

pub fn load(path: &str) -> Result<ObjMesh> {
    let contents = std::fs::read_to_string(path)?;
    parse(&contents).ok_or_else(|| RenderError::AssetError(format!("malformed OBJ: {path}")))
}

fn parse(contents: &str) -> Option<ObjMesh> {
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for line in contents.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let x: f64 = tokens.next()?.parse().ok()?;
                let y: f64 = tokens.next()?.parse().ok()?;
                let z: f64 = tokens.next()?.parse().ok()?;
                positions.push(Vector3::new(x, y, z));
            }
            Some("f") => {
                let i0: u32 = tokens.next()?.parse().ok()?;
                let i1: u32 = tokens.next()?.parse().ok()?;
                let i2: u32 = tokens.next()?.parse().ok()?;
                indices.push(i0 - 1);
                indices.push(i1 - 1);
                indices.push(i2 - 1);
            }
            _ => {}
        }
    }

    if indices.is_empty() {
        return None;
    }

    let normals = indices
        .chunks_exact(3)
        .map(|tri| {
            let v0 = positions[tri[0] as usize];
            let v1 = positions[tri[1] as usize];
            let v2 = positions[tri[2] as usize];
            // A degenerate triangle (repeated vertex) produces a zero-length cross
            // product; `normalized` then divides by zero and the normal comes out
            // NaN, matching the reference's own tolerance for malformed input rather
            // than rejecting the whole mesh over one bad face.
            (v1 - v0).cross(v2 - v0).normalized()
        })
        .collect();

    Some(ObjMesh { positions, indices, normals })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_triangle() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse(obj).expect("valid obj");
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.normals.len(), 1);
    }

    #[test]
    fn ignores_comments_and_unsupported_directives() {
        let obj = "# a comment\nvt 0.0 0.0\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse(obj).expect("valid obj");
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse("").is_none());
    }
}
