// Render-ready mesh built from a contour mesh.
//
// The contour mesh carries positions and indices only. `RenderMesh` adds
// per-vertex normals, accumulated from the unnormalized face normals of every
// triangle touching the vertex (so larger faces weigh more) and normalized at
// the end. All contour triangles lie in the y = 0 plane and wind clockwise
// seen from above, so every normal comes out as +Y; the accumulation still
// runs so a mesh that has been displaced afterwards gets correct shading.
//
// The struct is serializable so the CLI can export a bake as JSON: flat
// position/normal triples plus a triangle index list.
//
// See also: `contour.rs` for the source mesh, `cavern_cli` for the exporter.

use serde::{Deserialize, Serialize};

use crate::contour::ContourMesh;

/// Indexed triangle list with per-vertex normals.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

impl RenderMesh {
    pub fn from_contour(mesh: &ContourMesh) -> Self {
        let mut normals = vec![[0.0f32; 3]; mesh.vertices.len()];
        for triangle in mesh.iter_triangles() {
            let [a, b, c] = triangle.vertices();
            let pa = mesh.vertices[a as usize];
            let pb = mesh.vertices[b as usize];
            let pc = mesh.vertices[c as usize];
            let face = cross(sub(pb, pa), sub(pc, pa));
            for v in [a, b, c] {
                let n = &mut normals[v as usize];
                n[0] += face[0];
                n[1] += face[1];
                n[2] += face[2];
            }
        }
        for n in &mut normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if len > 1e-10 {
                n[0] /= len;
                n[1] /= len;
                n[2] /= len;
            }
        }
        Self {
            positions: mesh.vertices.clone(),
            normals,
            indices: mesh.triangles.clone(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
