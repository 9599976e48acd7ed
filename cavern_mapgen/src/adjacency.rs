// Vertex → triangle adjacency for outline-edge queries.
//
// Built incrementally while the contour mesh is emitted: every triangle is
// recorded against each of its three vertex indices. Storage is an arena
// indexed directly by vertex index (vertex indices are dense and assigned in
// order), with a small inline list per vertex. It is append-only during a
// bake and dropped with the mesh.
//
// An edge (a, b) is an outline edge iff exactly one triangle touching `a`
// also touches `b`. Interior edges of the contour mesh are shared by two
// triangles, so the scan stops as soon as a second match is seen.

use smallvec::SmallVec;

/// A triangle as three vertex indices, in emission (winding) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    pub fn contains(&self, vertex: u32) -> bool {
        vertex == self.a || vertex == self.b || vertex == self.c
    }

    pub fn vertices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }

    /// The three edges in winding order: (a, b), (b, c), (c, a).
    pub fn edges(&self) -> [(u32, u32); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }
}

/// Triangles referencing each vertex, indexed by vertex index.
#[derive(Clone, Debug, Default)]
pub struct TriangleAdjacency {
    by_vertex: Vec<SmallVec<[Triangle; 6]>>,
}

impl TriangleAdjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `triangle` against each of its vertices.
    pub fn record(&mut self, triangle: Triangle) {
        for vertex in triangle.vertices() {
            let slot = vertex as usize;
            if slot >= self.by_vertex.len() {
                self.by_vertex.resize_with(slot + 1, SmallVec::new);
            }
            self.by_vertex[slot].push(triangle);
        }
    }

    /// Triangles that reference `vertex`. Empty for unknown vertices.
    pub fn triangles_at(&self, vertex: u32) -> &[Triangle] {
        self.by_vertex
            .get(vertex as usize)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// True iff exactly one recorded triangle contains both `a` and `b`.
    pub fn is_outline_edge(&self, a: u32, b: u32) -> bool {
        let mut shared = 0;
        for triangle in self.triangles_at(a) {
            if triangle.contains(b) {
                shared += 1;
                if shared > 1 {
                    break;
                }
            }
        }
        shared == 1
    }
}
