use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::{Cartesian2DCoordinate, Direction, Walls};
use crate::grid::Grid;
use crate::grid_iterators::RowIter;
use crate::units::{PassagesCount, SideLength};

/// Read only copy of one cell for renderers.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellSnapshot {
    pub coordinate: Cartesian2DCoordinate,
    pub walls: Walls,
    pub visited: bool,
    /// The carver is standing on this cell.
    pub is_current: bool,
}

/// Owned copy of a grid at one point of a carve.
///
/// Taking one never borrows the session, so a renderer can hold on to it while carving carries on.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct GridSnapshot {
    side_length: usize,
    cells: Vec<CellSnapshot>,
    current: Option<usize>,
}

impl GridSnapshot {
    pub fn new(grid: &Grid, current: Option<usize>) -> GridSnapshot {
        let current = current.filter(|&index| index < grid.size());
        let cells = grid.cells()
            .enumerate()
            .map(|(index, cell)| {
                CellSnapshot {
                    coordinate: cell.coordinate(),
                    walls: cell.walls(),
                    visited: cell.is_visited(),
                    is_current: current == Some(index),
                }
            })
            .collect();

        GridSnapshot {
            side_length: grid.side_length().0,
            cells,
            current,
        }
    }

    #[inline]
    pub fn side_length(&self) -> SideLength {
        SideLength(self.side_length)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Coordinates row by row, north to south.
    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.side_length())
    }

    #[inline]
    pub fn cells(&self) -> &[CellSnapshot] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, index: usize) -> Option<&CellSnapshot> {
        self.cells.get(index)
    }

    pub fn cell_at(&self, coord: Cartesian2DCoordinate) -> Option<&CellSnapshot> {
        if coord.x < self.side_length && coord.y < self.side_length {
            self.cells.get(coord.y * self.side_length + coord.x)
        } else {
            None
        }
    }

    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    /// Every cell has been reached by the carve.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.visited)
    }

    /// Is the wall between a cell and its neighbour in `direction` cleared from both sides?
    pub fn is_passage_open(&self, coord: Cartesian2DCoordinate, direction: Direction) -> bool {
        let neighbour = direction.offset_coordinate(coord).and_then(|n| self.cell_at(n));
        match (self.cell_at(coord), neighbour) {
            (Some(cell), Some(neighbour)) => {
                !cell.walls.has_wall(direction) && !neighbour.walls.has_wall(direction.opposite())
            }
            _ => false,
        }
    }

    /// Open passages as `(a, b)` row major index pairs with `a < b`, in row major order of `a`.
    pub fn passages(&self) -> Vec<(usize, usize)> {
        let side = self.side_length;
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(index, cell)| {
                [Direction::Right, Direction::Down]
                    .iter()
                    .filter(|&&dir| self.is_passage_open(cell.coordinate, dir))
                    .map(|&dir| match dir {
                        Direction::Right => (index, index + 1),
                        _ => (index, index + side),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn passages_count(&self) -> PassagesCount {
        PassagesCount(self.passages().len())
    }

    /// The maze as an undirected graph, one node per cell (node index == cell index) and one edge
    /// per open passage.
    pub fn passage_graph(&self) -> UnGraph<(), ()> {
        let passages = self.passages();
        let mut graph = UnGraph::with_capacity(self.size(), passages.len());
        for _ in 0..self.size() {
            let _ = graph.add_node(());
        }
        for (a, b) in passages {
            let _ = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        graph
    }

    /// Text serialisation of the maze graph: line 1 is `n m` (#vertices #edges), every other line
    /// is an edge between two vertices. Vertices are 1-based.
    pub fn edge_list(&self) -> String {
        let passages = self.passages();
        let mut graph_data = String::new();
        graph_data.push_str(self.size().to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(passages.len().to_string().as_ref());
        graph_data.push('\n');

        for (index_a, index_b) in passages {
            let src_as_1_based_index = index_a + 1;
            let dst_as_1_based_index = index_b + 1;

            graph_data.push_str(src_as_1_based_index.to_string().as_ref());
            graph_data.push(' ');
            graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
            graph_data.push('\n');
        }
        graph_data
    }
}
