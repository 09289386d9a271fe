use rand::Rng;
use smallvec::SmallVec;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::slice;

use crate::cells::{Cartesian2DCoordinate, Cell, Direction};
use crate::errors::*;
use crate::grid_iterators::{index_to_grid_coordinate, CellIter};
use crate::snapshot::GridSnapshot;
use crate::units::{CellsCount, ColumnIndex, PassagesCount, RowIndex, SideLength};

/// Neighbour cell indices paired with the direction taken to reach them.
pub type NeighbourSmallVec = SmallVec<[(Direction, usize); 4]>;

/// A square grid of cells stored flat in row major order, `index = row * side + column`.
///
/// Neighbours are never stored, they are worked out from coordinates on demand.
#[derive(Clone, Eq, PartialEq)]
pub struct Grid {
    side_length: usize,
    cells: Vec<Cell>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridIndex,
    NoNeighbour,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: side length: {:?}, visited: {:?}/{:?}, passages: {:?}",
               self.side_length, self.visited_count(), self.size(), self.passages_count().0)
    }
}

impl Grid {
    /// Builds a fresh `side_length * side_length` grid, every cell closed and unvisited.
    pub fn build(side_length: SideLength) -> Result<Grid> {
        let SideLength(n) = side_length;
        if n < 1 {
            return Err(ErrorKind::InvalidSize(n).into());
        }
        let cells_count = n.checked_mul(n).ok_or(ErrorKind::InvalidSize(n))?;

        let cells = CellIter::new(side_length).map(Cell::new).collect::<Vec<_>>();
        debug_assert_eq!(cells.len(), cells_count);

        Ok(Grid {
            side_length: n,
            cells,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells_count(&self) -> CellsCount {
        CellsCount(self.size())
    }

    #[inline]
    pub fn side_length(&self) -> SideLength {
        SideLength(self.side_length)
    }

    #[inline]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    pub fn cells(&self) -> slice::Iter<Cell> {
        self.cells.iter()
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_visited()).count()
    }

    /// Each passage is counted once, from the cell above or to the left of it.
    pub fn passages_count(&self) -> PassagesCount {
        let count = self.cells
            .iter()
            .enumerate()
            .map(|(index, _)| {
                [Direction::Right, Direction::Down]
                    .iter()
                    .filter(|&&dir| self.is_passage_open(index, dir))
                    .count()
            })
            .sum();
        PassagesCount(count)
    }

    #[inline]
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.size())
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0..grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y * self.side_length + coord.x)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_of(&self, column: ColumnIndex, row: RowIndex) -> Option<usize> {
        self.grid_coordinate_to_index(Cartesian2DCoordinate::from_row_column_indices(column, row))
    }

    #[inline]
    pub fn coordinate_of(&self, index: usize) -> Option<Cartesian2DCoordinate> {
        if index < self.size() {
            Some(index_to_grid_coordinate(self.side_length, index))
        } else {
            None
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        coord.x < self.side_length && coord.y < self.side_length
    }

    pub fn neighbour_at_direction(&self, index: usize, direction: Direction) -> Option<usize> {
        self.coordinate_of(index)
            .and_then(|coord| direction.offset_coordinate(coord))
            .and_then(|neighbour_coord| self.grid_coordinate_to_index(neighbour_coord))
    }

    /// Cells to the Up, Right, Down or Left of a cell, in that order, but not necessarily
    /// linked by a passage. Empty for an index off the grid.
    pub fn neighbours_of(&self, index: usize) -> NeighbourSmallVec {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(index, dir).map(|n| (dir, n)))
            .collect()
    }

    /// Neighbours not yet reached by a carve.
    pub fn unvisited_neighbours_of(&self, index: usize) -> NeighbourSmallVec {
        self.neighbours_of(index)
            .into_iter()
            .filter(|&(_, neighbour)| !self.cells[neighbour].is_visited())
            .collect()
    }

    /// Open a passage from a cell to its neighbour in `direction`, clearing the wall on both
    /// sides. Returns the neighbour's index.
    pub fn carve_passage(&mut self, index: usize, direction: Direction) -> ::std::result::Result<usize, CellLinkError> {
        if index >= self.size() {
            return Err(CellLinkError::InvalidGridIndex);
        }
        let neighbour = self.neighbour_at_direction(index, direction)
            .ok_or(CellLinkError::NoNeighbour)?;

        self.cells[index].remove_wall(direction);
        self.cells[neighbour].remove_opposite_wall(direction);
        Ok(neighbour)
    }

    /// Is there a neighbour in `direction` with the walls between the two cells cleared on both
    /// sides?
    pub fn is_passage_open(&self, index: usize, direction: Direction) -> bool {
        match (self.cell(index), self.neighbour_at_direction(index, direction)) {
            (Some(cell), Some(neighbour)) => {
                !cell.has_wall(direction) && !self.cells[neighbour].has_wall(direction.opposite())
            }
            _ => false,
        }
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.side_length())
    }

    pub fn snapshot(&self, current: Option<usize>) -> GridSnapshot {
        GridSnapshot::new(self, current)
    }
}

impl Index<usize> for Grid {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.cells[index]
    }
}

impl IndexMut<usize> for Grid {
    fn index_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.snapshot(None))
    }
}
