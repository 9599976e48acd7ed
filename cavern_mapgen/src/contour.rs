// Marching-squares contour mesh generation.
//
// Turns a binary grid into a triangle mesh covering its solid region, with
// the solid/open boundary cut through edge midpoints. For each `Square` (see
// `squares.rs`) the 4-bit configuration selects an ordered list of point
// roles from `TRIANGULATION`; the list traces a convex polygon over the
// solid part of the square, clockwise when viewed from +Y, and is emitted as
// a triangle fan anchored at its first point.
//
// Vertex welding falls out of the node arena: every point is resolved to its
// arena node first, and a node that already carries a vertex index reuses it.
// Adjacent squares reference the same midpoint and corner nodes, so seams
// between squares share vertices and the mesh is watertight. Vertices are
// appended in first-use order while squares are visited column by column.
//
// Every triangle is also recorded in a `TriangleAdjacency`, which backs the
// outline-edge queries on `ContourMesh`.
//
// Normals are not produced here; see `render.rs`.
//
// See also: `squares.rs` for the node lattice, `adjacency.rs` for the
// outline-edge test, `bake.rs` which runs this on the padded grid.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::adjacency::{Triangle, TriangleAdjacency};
use crate::grid::OccupancyGrid;
use crate::squares::{Node, Point, Square, SquareGrid};

// ---------------------------------------------------------------------------
// Triangulation table
// ---------------------------------------------------------------------------

/// Polygon point roles per configuration (bit3 = TL, bit2 = TR, bit1 = BR,
/// bit0 = BL).
pub const TRIANGULATION: [&[Point]; 16] = [
    // 0: empty
    &[],
    // 1: BL
    &[Point::CentreLeft, Point::CentreBottom, Point::BottomLeft],
    // 2: BR
    &[Point::BottomRight, Point::CentreBottom, Point::CentreRight],
    // 3: BR + BL
    &[
        Point::CentreRight,
        Point::BottomRight,
        Point::BottomLeft,
        Point::CentreLeft,
    ],
    // 4: TR
    &[Point::TopRight, Point::CentreRight, Point::CentreTop],
    // 5: TR + BL (saddle, joined)
    &[
        Point::CentreTop,
        Point::TopRight,
        Point::CentreRight,
        Point::CentreBottom,
        Point::BottomLeft,
        Point::CentreLeft,
    ],
    // 6: TR + BR
    &[
        Point::CentreTop,
        Point::TopRight,
        Point::BottomRight,
        Point::CentreBottom,
    ],
    // 7: all but TL
    &[
        Point::CentreTop,
        Point::TopRight,
        Point::BottomRight,
        Point::BottomLeft,
        Point::CentreLeft,
    ],
    // 8: TL
    &[Point::TopLeft, Point::CentreTop, Point::CentreLeft],
    // 9: TL + BL
    &[
        Point::TopLeft,
        Point::CentreTop,
        Point::CentreBottom,
        Point::BottomLeft,
    ],
    // 10: TL + BR (saddle, joined)
    &[
        Point::TopLeft,
        Point::CentreTop,
        Point::CentreRight,
        Point::BottomRight,
        Point::CentreBottom,
        Point::CentreLeft,
    ],
    // 11: all but TR
    &[
        Point::TopLeft,
        Point::CentreTop,
        Point::CentreRight,
        Point::BottomRight,
        Point::BottomLeft,
    ],
    // 12: TL + TR
    &[
        Point::TopLeft,
        Point::TopRight,
        Point::CentreRight,
        Point::CentreLeft,
    ],
    // 13: all but BR
    &[
        Point::TopLeft,
        Point::TopRight,
        Point::CentreRight,
        Point::CentreBottom,
        Point::BottomLeft,
    ],
    // 14: all but BL
    &[
        Point::TopLeft,
        Point::TopRight,
        Point::BottomRight,
        Point::CentreBottom,
        Point::CentreLeft,
    ],
    // 15: full quad
    &[
        Point::TopLeft,
        Point::TopRight,
        Point::BottomRight,
        Point::BottomLeft,
    ],
];

/// The polygon for a configuration.
///
/// Panics if `configuration > 15`, which the bitmask construction in
/// `Square::new` makes impossible.
pub fn polygon_points(configuration: u8) -> &'static [Point] {
    assert!(
        configuration < 16,
        "square configuration {configuration} outside 0..=15"
    );
    TRIANGULATION[configuration as usize]
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Welded contour mesh: positions in first-use order plus triangle indices.
#[derive(Clone, Debug, Default)]
pub struct ContourMesh {
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices (3 per triangle).
    pub triangles: Vec<u32>,
    adjacency: TriangleAdjacency,
}

impl ContourMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles in emission order.
    pub fn iter_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.triangles
            .chunks_exact(3)
            .map(|t| Triangle::new(t[0], t[1], t[2]))
    }

    pub fn adjacency(&self) -> &TriangleAdjacency {
        &self.adjacency
    }

    /// True iff the edge between two vertices borders exactly one triangle.
    pub fn is_outline_edge(&self, a: u32, b: u32) -> bool {
        self.adjacency.is_outline_edge(a, b)
    }

    /// Every outline edge once, as `(min, max)` vertex pairs in ascending order.
    pub fn outline_edges(&self) -> Vec<(u32, u32)> {
        let mut edges = BTreeSet::new();
        for triangle in self.iter_triangles() {
            for (a, b) in triangle.edges() {
                if self.is_outline_edge(a, b) {
                    edges.insert((a.min(b), a.max(b)));
                }
            }
        }
        edges.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Mesh generation
// ---------------------------------------------------------------------------

/// Accumulates vertices, indices, and adjacency during a bake.
#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<[f32; 3]>,
    triangles: Vec<u32>,
    adjacency: TriangleAdjacency,
}

impl MeshBuilder {
    /// Return the node's vertex index, assigning the next one (and appending
    /// its position) on first use.
    fn assign_vertex(&mut self, node: &mut Node) -> u32 {
        if let Some(index) = node.vertex_index {
            return index;
        }
        let Ok(index) = u32::try_from(self.vertices.len()) else {
            panic!("contour mesh exceeds u32 vertex indices");
        };
        self.vertices.push(node.position);
        node.vertex_index = Some(index);
        index
    }

    /// Fan-triangulate an ordered convex polygon of resolved vertex indices:
    /// (p0, p1, p2), (p0, p2, p3), ...
    fn mesh_from_points(&mut self, points: &[u32]) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        for pair in rest.windows(2) {
            self.create_triangle(first, pair[0], pair[1]);
        }
    }

    fn create_triangle(&mut self, a: u32, b: u32, c: u32) {
        let vertex_count = self.vertices.len() as u32;
        assert!(
            a < vertex_count && b < vertex_count && c < vertex_count,
            "triangle ({a}, {b}, {c}) references an unassigned vertex (have {vertex_count})"
        );
        self.triangles.extend_from_slice(&[a, b, c]);
        self.adjacency.record(Triangle::new(a, b, c));
    }

    fn finish(self) -> ContourMesh {
        ContourMesh {
            vertices: self.vertices,
            triangles: self.triangles,
            adjacency: self.adjacency,
        }
    }
}

/// Emit the polygon for one square. All of its points are resolved to vertex
/// indices before any triangle is created.
fn triangulate_square(square_grid: &mut SquareGrid, square: Square, builder: &mut MeshBuilder) {
    let points = polygon_points(square.configuration);
    if points.is_empty() {
        return;
    }
    let indices: SmallVec<[u32; 6]> = points
        .iter()
        .map(|&point| builder.assign_vertex(square_grid.node_mut(square.node_ref(point))))
        .collect();
    builder.mesh_from_points(&indices);
}

/// Build the welded contour mesh for `grid` with cells `cell_size` wide.
///
/// An all-open grid yields an empty mesh; an all-solid grid yields two
/// triangles per square over the control-node corners only.
pub fn generate_contour_mesh(grid: &OccupancyGrid, cell_size: f32) -> ContourMesh {
    debug_assert!(
        cell_size.is_finite() && cell_size > 0.0,
        "cell size must be validated before meshing"
    );
    let mut square_grid = SquareGrid::new(grid, cell_size);
    let mut builder = MeshBuilder::default();

    let squares_x = square_grid.squares_x();
    for x in 0..squares_x {
        for y in 0..square_grid.squares_y() {
            let square = square_grid.squares()[(x + y * squares_x) as usize];
            triangulate_square(&mut square_grid, square, &mut builder);
        }
    }

    builder.finish()
}
