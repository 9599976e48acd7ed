// Control-node lattice and marching-squares cells.
//
// Every grid cell becomes a `ControlNode` positioned at the cell center, with
// the whole grid centered on the origin of the x/z plane (y = 0). Each control
// node owns two midpoint `Node`s: `above` (half a cell along +z) and `right`
// (half a cell along +x). A `Square` is formed by every 2x2 block of control
// nodes:
//
// ```text
//   TL ---- CT ---- TR        TL = (x,   y+1)   CT = TL.right
//   |                |        TR = (x+1, y+1)   CR = BR.above
//   CL              CR        BR = (x+1, y)     CB = BL.right
//   |                |        BL = (x,   y)     CL = BL.above
//   BL ---- CB ---- BR
// ```
//
// Squares do not hold references to their nodes. All nodes live in one arena
// owned by `SquareGrid`, addressed by `(x, y, NodeSlot)`, and a square resolves
// each of its eight `Point` roles to a `NodeRef` by coordinate. Two adjacent
// squares that share an edge resolve the shared midpoint to the same arena
// slot, which is what lets the mesher weld them into one vertex.
//
// The 4-bit `configuration` packs corner activity as
// `TL << 3 | TR << 2 | BR << 1 | BL`.
//
// See also: `contour.rs` for the table that maps configurations to polygons
// and for the vertex-index assignment that mutates the arena.

use crate::grid::OccupancyGrid;

/// A mesh point candidate: a position plus its vertex index once assigned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub position: [f32; 3],
    /// `None` until this node contributes a vertex to the mesh; fixed after.
    pub vertex_index: Option<u32>,
}

impl Node {
    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            vertex_index: None,
        }
    }
}

/// A grid-cell node: the cell-center point, its solid flag, and the two
/// midpoint nodes it owns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlNode {
    pub node: Node,
    pub active: bool,
    pub above: Node,
    pub right: Node,
}

impl ControlNode {
    pub fn new(position: [f32; 3], active: bool, cell_size: f32) -> Self {
        let half = cell_size / 2.0;
        let [x, y, z] = position;
        Self {
            node: Node::new(position),
            active,
            above: Node::new([x, y, z + half]),
            right: Node::new([x + half, y, z]),
        }
    }

    fn slot(&self, slot: NodeSlot) -> &Node {
        match slot {
            NodeSlot::Corner => &self.node,
            NodeSlot::Above => &self.above,
            NodeSlot::Right => &self.right,
        }
    }

    fn slot_mut(&mut self, slot: NodeSlot) -> &mut Node {
        match slot {
            NodeSlot::Corner => &mut self.node,
            NodeSlot::Above => &mut self.above,
            NodeSlot::Right => &mut self.right,
        }
    }
}

/// Which of a control node's three nodes is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeSlot {
    Corner,
    Above,
    Right,
}

/// Arena address of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub x: u32,
    pub y: u32,
    pub slot: NodeSlot,
}

/// The eight point roles of a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Point {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CentreTop,
    CentreRight,
    CentreBottom,
    CentreLeft,
}

impl Point {
    /// True for the four corner roles.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Point::TopLeft | Point::TopRight | Point::BottomRight | Point::BottomLeft
        )
    }
}

/// One marching-squares cell, identified by its bottom-left control node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub x: u32,
    pub y: u32,
    /// Corner bitmask in `0..=15`.
    pub configuration: u8,
}

impl Square {
    /// Build the square whose bottom-left corner is control node `(x, y)`.
    pub fn new(
        x: u32,
        y: u32,
        top_left: bool,
        top_right: bool,
        bottom_right: bool,
        bottom_left: bool,
    ) -> Self {
        let configuration = (top_left as u8) << 3
            | (top_right as u8) << 2
            | (bottom_right as u8) << 1
            | bottom_left as u8;
        Self {
            x,
            y,
            configuration,
        }
    }

    /// Resolve a point role to the arena slot that holds it.
    pub fn node_ref(&self, point: Point) -> NodeRef {
        let (x, y) = (self.x, self.y);
        let (nx, ny, slot) = match point {
            Point::TopLeft => (x, y + 1, NodeSlot::Corner),
            Point::TopRight => (x + 1, y + 1, NodeSlot::Corner),
            Point::BottomRight => (x + 1, y, NodeSlot::Corner),
            Point::BottomLeft => (x, y, NodeSlot::Corner),
            Point::CentreTop => (x, y + 1, NodeSlot::Right),
            Point::CentreRight => (x + 1, y, NodeSlot::Above),
            Point::CentreBottom => (x, y, NodeSlot::Right),
            Point::CentreLeft => (x, y, NodeSlot::Above),
        };
        NodeRef {
            x: nx,
            y: ny,
            slot,
        }
    }
}

/// All control nodes of a grid plus the squares built over them.
#[derive(Clone, Debug)]
pub struct SquareGrid {
    /// Flat storage: index = x + y * node_count_x.
    control_nodes: Vec<ControlNode>,
    node_count_x: u32,
    node_count_y: u32,
    /// Flat storage: index = x + y * (node_count_x - 1).
    squares: Vec<Square>,
}

impl SquareGrid {
    /// Build control nodes for every cell of `grid` and one square per 2x2
    /// block. Grids narrower or shorter than 2 cells yield no squares.
    pub fn new(grid: &OccupancyGrid, cell_size: f32) -> Self {
        let node_count_x = grid.width();
        let node_count_y = grid.height();
        let map_width = node_count_x as f32 * cell_size;
        let map_height = node_count_y as f32 * cell_size;

        let mut control_nodes = Vec::with_capacity(node_count_x as usize * node_count_y as usize);
        for y in 0..node_count_y {
            for x in 0..node_count_x {
                let position = [
                    -map_width / 2.0 + x as f32 * cell_size + cell_size / 2.0,
                    0.0,
                    -map_height / 2.0 + y as f32 * cell_size + cell_size / 2.0,
                ];
                let active = grid.get(x as i32, y as i32).is_solid();
                control_nodes.push(ControlNode::new(position, active, cell_size));
            }
        }

        let mut square_grid = Self {
            control_nodes,
            node_count_x,
            node_count_y,
            squares: Vec::new(),
        };

        let squares_x = square_grid.squares_x();
        let squares_y = square_grid.squares_y();
        let mut squares = Vec::with_capacity(squares_x as usize * squares_y as usize);
        for y in 0..squares_y {
            for x in 0..squares_x {
                let active = |nx: u32, ny: u32| square_grid.control_node(nx, ny).active;
                squares.push(Square::new(
                    x,
                    y,
                    active(x, y + 1),
                    active(x + 1, y + 1),
                    active(x + 1, y),
                    active(x, y),
                ));
            }
        }
        square_grid.squares = squares;
        square_grid
    }

    pub fn node_count_x(&self) -> u32 {
        self.node_count_x
    }

    pub fn node_count_y(&self) -> u32 {
        self.node_count_y
    }

    pub fn squares_x(&self) -> u32 {
        self.node_count_x.saturating_sub(1)
    }

    pub fn squares_y(&self) -> u32 {
        self.node_count_y.saturating_sub(1)
    }

    /// All squares, ordered by `x` within each row of `y`.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn square(&self, x: u32, y: u32) -> Option<&Square> {
        if x < self.squares_x() && y < self.squares_y() {
            self.squares.get((x + y * self.squares_x()) as usize)
        } else {
            None
        }
    }

    /// Panics if `(x, y)` is outside the node lattice.
    pub fn control_node(&self, x: u32, y: u32) -> &ControlNode {
        assert!(
            x < self.node_count_x && y < self.node_count_y,
            "control node ({x}, {y}) outside {}x{} lattice",
            self.node_count_x,
            self.node_count_y
        );
        &self.control_nodes[(x + y * self.node_count_x) as usize]
    }

    pub fn node(&self, node_ref: NodeRef) -> &Node {
        self.control_node(node_ref.x, node_ref.y).slot(node_ref.slot)
    }

    pub fn node_mut(&mut self, node_ref: NodeRef) -> &mut Node {
        let NodeRef { x, y, slot } = node_ref;
        assert!(
            x < self.node_count_x && y < self.node_count_y,
            "control node ({x}, {y}) outside {}x{} lattice",
            self.node_count_x,
            self.node_count_y
        );
        let index = (x + y * self.node_count_x) as usize;
        self.control_nodes[index].slot_mut(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn approx_eq(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(p, q)| (p - q).abs() < 1e-6)
    }

    #[test]
    fn configuration_bit_order() {
        assert_eq!(Square::new(0, 0, true, false, false, false).configuration, 8);
        assert_eq!(Square::new(0, 0, false, true, false, false).configuration, 4);
        assert_eq!(Square::new(0, 0, false, false, true, false).configuration, 2);
        assert_eq!(Square::new(0, 0, false, false, false, true).configuration, 1);
        assert_eq!(Square::new(0, 0, true, true, true, true).configuration, 15);
    }

    #[test]
    fn square_grid_dimensions() {
        let grid = OccupancyGrid::filled(6, 4, Cell::Open);
        let squares = SquareGrid::new(&grid, 1.0);
        assert_eq!(squares.squares_x(), 5);
        assert_eq!(squares.squares_y(), 3);
        assert_eq!(squares.squares().len(), 15);
        assert!(squares.square(4, 2).is_some());
        assert!(squares.square(5, 0).is_none());
    }

    #[test]
    fn single_row_grid_has_no_squares() {
        let grid = OccupancyGrid::filled(5, 1, Cell::Solid);
        let squares = SquareGrid::new(&grid, 1.0);
        assert!(squares.squares().is_empty());
    }

    #[test]
    fn control_nodes_are_centered_on_origin() {
        let grid = OccupancyGrid::filled(4, 2, Cell::Open);
        let squares = SquareGrid::new(&grid, 2.0);
        // mapWidth = 8, mapHeight = 4.
        assert!(approx_eq(squares.control_node(0, 0).node.position, [-3.0, 0.0, -1.0]));
        assert!(approx_eq(squares.control_node(3, 1).node.position, [3.0, 0.0, 1.0]));
    }

    #[test]
    fn midpoints_are_offset_by_half_a_cell() {
        let grid = OccupancyGrid::filled(3, 3, Cell::Open);
        let squares = SquareGrid::new(&grid, 2.0);
        let cn = squares.control_node(1, 1);
        assert!(approx_eq(cn.node.position, [0.0, 0.0, 0.0]));
        assert!(approx_eq(cn.above.position, [0.0, 0.0, 1.0]));
        assert!(approx_eq(cn.right.position, [1.0, 0.0, 0.0]));
        assert_eq!(cn.above.vertex_index, None);
    }

    #[test]
    fn active_mirrors_solid_cells() {
        let grid = OccupancyGrid::from_ascii(&["#.", ".#"]).unwrap();
        let squares = SquareGrid::new(&grid, 1.0);
        assert!(squares.control_node(0, 1).active);
        assert!(squares.control_node(1, 0).active);
        assert!(!squares.control_node(0, 0).active);
        // TL and BR solid.
        assert_eq!(squares.squares()[0].configuration, 10);
    }

    #[test]
    fn adjacent_squares_share_edge_midpoints() {
        let grid = OccupancyGrid::filled(3, 3, Cell::Open);
        let squares = SquareGrid::new(&grid, 1.0);
        let left = squares.square(0, 0).unwrap();
        let right = squares.square(1, 0).unwrap();
        assert_eq!(left.node_ref(Point::CentreRight), right.node_ref(Point::CentreLeft));

        let below = squares.square(0, 0).unwrap();
        let above = squares.square(0, 1).unwrap();
        assert_eq!(below.node_ref(Point::CentreTop), above.node_ref(Point::CentreBottom));
    }

    #[test]
    fn midpoint_roles_sit_between_their_corners() {
        let grid = OccupancyGrid::filled(2, 2, Cell::Open);
        let squares = SquareGrid::new(&grid, 1.0);
        let square = squares.squares()[0];
        let pos = |p: Point| squares.node(square.node_ref(p)).position;
        let mid = |a: [f32; 3], b: [f32; 3]| {
            [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0, (a[2] + b[2]) / 2.0]
        };

        let between = [
            (Point::CentreTop, Point::TopLeft, Point::TopRight),
            (Point::CentreRight, Point::TopRight, Point::BottomRight),
            (Point::CentreBottom, Point::BottomLeft, Point::BottomRight),
            (Point::CentreLeft, Point::TopLeft, Point::BottomLeft),
        ];
        for (midpoint, a, b) in between {
            assert!(
                approx_eq(pos(midpoint), mid(pos(a), pos(b))),
                "{midpoint:?} between {a:?} and {b:?}"
            );
        }
    }

    #[test]
    fn node_mut_writes_through_to_the_arena() {
        let grid = OccupancyGrid::filled(2, 2, Cell::Solid);
        let mut squares = SquareGrid::new(&grid, 1.0);
        let r = squares.squares()[0].node_ref(Point::CentreTop);
        squares.node_mut(r).vertex_index = Some(7);
        assert_eq!(squares.control_node(0, 1).right.vertex_index, Some(7));
    }
}
